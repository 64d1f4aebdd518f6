//! Index command implementation

use crate::cli::config::ResolvedSettings;
use crate::cli::error::{CliError, CliResult};
use crate::cli::utils::messages;
use clap::Args;
use pips3::PackageRepository;

/// Print or upload the index of a package
#[derive(Debug, Clone, Args)]
pub struct IndexArgs {
    /// Package whose index is generated (whole repository when omitted)
    #[arg(long, value_name = "NAME")]
    pub package: Option<String>,

    /// Upload the generated index instead of printing it
    #[arg(long, conflicts_with = "show_remote")]
    pub upload: bool,

    /// Print the index currently stored in the bucket
    #[arg(long)]
    pub show_remote: bool,
}

/// Execute the index command
pub async fn execute_index(
    repository: &PackageRepository,
    settings: &ResolvedSettings,
    args: IndexArgs,
) -> CliResult<()> {
    let package = args.package.or_else(|| settings.package.clone());

    if args.show_remote || args.upload {
        let Some(package) = package else {
            return Err(CliError::Config(format!(
                "--{} requires --package",
                if args.upload { "upload" } else { "show-remote" }
            )));
        };

        if args.show_remote {
            let body = repository
                .storage()
                .get_object(repository.bucket(), &repository.index_key(&package))
                .await?;
            println!("{}", String::from_utf8_lossy(&body));
            return Ok(());
        }

        let key = repository.upload_index(&package, None, settings.acl).await?;
        println!(
            "{}",
            messages::ok(format!(
                "Uploaded index to {}",
                messages::s3_url(repository.bucket(), &key)
            ))
        );
        return Ok(());
    }

    let html = repository.generate_index(None, package.as_deref()).await?;
    println!("{}", html);
    Ok(())
}
