//! Publish command implementation

use crate::cli::config::ResolvedSettings;
use crate::cli::error::CliResult;
use crate::cli::utils::messages;
use clap::Args;
use pips3::core::artifacts::DEFAULT_DIST_DIR;
use pips3::{publish_packages, PackageRepository, PublishOptions, PublishReport};
use std::path::PathBuf;

/// Publish built packages
#[derive(Debug, Clone, Default, Args)]
pub struct PublishArgs {
    /// Directory containing the built packages (default: dist)
    #[arg(long, value_name = "DIR")]
    pub dist: Option<PathBuf>,

    /// Package name (derived from the first file name by default)
    #[arg(long, value_name = "NAME")]
    pub package: Option<String>,

    /// File extension to publish, repeatable (default: .gz and .whl)
    #[arg(long = "extension", value_name = "EXT")]
    pub extension: Vec<String>,

    /// Skip files that were already published instead of failing
    #[arg(long)]
    pub skip_existing: bool,
}

impl PublishArgs {
    /// Fill in flags given before the `publish` subcommand
    pub fn merge(self, root: PublishArgs) -> PublishArgs {
        let mut extension = root.extension;
        extension.extend(self.extension);
        PublishArgs {
            dist: self.dist.or(root.dist),
            package: self.package.or(root.package),
            extension,
            skip_existing: self.skip_existing || root.skip_existing,
        }
    }

    /// Merge flags with the layered settings
    fn options(self, settings: &ResolvedSettings) -> PublishOptions {
        PublishOptions {
            dist_dir: self
                .dist
                .or_else(|| settings.dist.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DIST_DIR)),
            extensions: (!self.extension.is_empty()).then_some(self.extension),
            package_name: self.package.or_else(|| settings.package.clone()),
            acl: settings.acl,
            skip_existing: self.skip_existing,
        }
    }
}

/// Execute the publish command
pub async fn execute_publish(
    repository: &PackageRepository,
    settings: &ResolvedSettings,
    args: PublishArgs,
) -> CliResult<()> {
    let options = args.options(settings);

    let report = publish_packages(repository, &options).await?;

    print_report(repository, &report);
    Ok(())
}

fn print_report(repository: &PackageRepository, report: &PublishReport) {
    for key in &report.skipped {
        println!("{}", messages::warning(format!("Skipped existing {}", key)));
    }

    let total = report.uploaded.len();
    for (i, key) in report.uploaded.iter().enumerate() {
        println!(
            "{}",
            messages::progress(
                i + 1,
                total,
                format!("Uploaded {}", messages::s3_url(repository.bucket(), key))
            )
        );
    }

    println!(
        "{}",
        messages::ok(format!(
            "Published {} ({} uploaded, {} skipped), index at {}/{}",
            report.package_name,
            report.uploaded.len(),
            report.skipped.len(),
            repository.endpoint(),
            report.index_key
        ))
    );
}
