//! List command implementation
//!
//! Streams keys page by page, so large repositories print as they are read.

use crate::cli::error::CliResult;
use crate::cli::utils::messages;
use clap::Args;
use futures::TryStreamExt;
use pips3::core::repository::DEFAULT_MAX_KEYS;
use pips3::PackageRepository;

/// List keys stored in the repository
#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Only list keys of this package
    #[arg(long, value_name = "NAME")]
    pub package: Option<String>,

    /// Keys requested per page (1-1000)
    #[arg(long, default_value_t = DEFAULT_MAX_KEYS)]
    pub max_keys: u32,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Execute the list command
pub async fn execute_list(
    repository: &PackageRepository,
    args: ListArgs,
) -> CliResult<()> {
    let mut keys = repository.list_keys(args.package.as_deref(), args.max_keys, None)?;

    if args.json {
        let all: Vec<String> = keys.try_collect().await?;
        println!("{}", serde_json::to_string_pretty(&all)?);
        return Ok(());
    }

    let mut count = 0usize;
    while let Some(key) = keys.try_next().await? {
        println!("{}", key);
        count += 1;
    }

    if count == 0 {
        eprintln!(
            "{}",
            messages::info(format!(
                "No keys under {}",
                messages::s3_url(
                    repository.bucket(),
                    &repository.listing_prefix(args.package.as_deref())
                )
            ))
        );
    }
    Ok(())
}
