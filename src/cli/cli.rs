//! Main CLI application structure

use clap::{Args, Parser};
use pips3::storage::{create_blob_storage, StorageKind};
use pips3::PackageRepository;
use std::path::PathBuf;
use tracing::debug;

use crate::cli::commands::{index, list, publish, Commands};
use crate::cli::config::{resolve_settings, ConfigSources};
use crate::cli::error::CliResult;

/// pips3 - publish Python packages to S3 as a simple package index
#[derive(Debug, Parser)]
#[command(name = "pips3")]
#[command(version = pips3::VERSION)]
#[command(about = "Use S3 compliant object storage as a simple Python package repository")]
#[command(long_about = "Uploads built wheels and source distributions to \
                         {prefix}/{package}/ in a bucket and regenerates the \
                         package's index.html.\n\n\
                         Settings resolve in this order: command-line flag, PIPS3_* \
                         environment variable, --config file or .pips3.toml, \
                         user config file ($XDG_CONFIG_HOME/pips3/config.toml).\n\n\
                         Examples:\n\
                           pips3 --endpoint https://pypi.example.com --bucket pypi --public\n\
                           pips3 list --package my-tool\n\
                           pips3 index --package my-tool --upload")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub repository: RepositoryArgs,

    /// Publish options when no subcommand is given
    #[command(flatten)]
    pub publish: publish::PublishArgs,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Repository, storage and ACL settings shared by every command
#[derive(Debug, Clone, Default, Args)]
pub struct RepositoryArgs {
    /// Public base URL of the repository, used in index links
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Bucket holding the repository
    #[arg(long, global = true)]
    pub bucket: Option<String>,

    /// Key prefix (default: simple)
    #[arg(long, global = true)]
    pub prefix: Option<String>,

    /// Config file (overrides .pips3.toml in the current directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// AWS region for the S3 client
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// S3 API endpoint for S3-compatible services
    #[arg(long, global = true, value_name = "URL")]
    pub s3_endpoint_url: Option<String>,

    /// Storage backend: s3, local or memory
    #[arg(long, global = true, value_name = "KIND")]
    pub storage: Option<StorageKind>,

    /// Root directory of the local storage backend
    #[arg(long, global = true, value_name = "DIR")]
    pub local_root: Option<PathBuf>,

    /// Make uploaded files public (public-read)
    #[arg(long, global = true, conflicts_with = "no_public")]
    pub public: bool,

    /// Keep uploaded files private
    #[arg(long, global = true)]
    pub no_public: bool,

    /// Grant the bucket owner full control of uploaded files
    #[arg(long, global = true, conflicts_with = "no_bucket_owner_full_control")]
    pub bucket_owner_full_control: bool,

    /// Do not grant the bucket owner full control
    #[arg(long, global = true)]
    pub no_bucket_owner_full_control: bool,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> CliResult<()> {
        pips3::init_logging(if self.verbose {
            "pips3=debug"
        } else {
            "pips3=info"
        });

        let layered = ConfigSources::discover(self.repository.config.as_deref()).load()?;
        let settings = resolve_settings(&self.repository, layered)?;
        debug!(
            "Resolved repository: endpoint={}, bucket={}, prefix={}, storage={}",
            settings.repository.endpoint,
            settings.repository.bucket,
            settings.repository.prefix,
            settings.storage.kind
        );

        let storage = create_blob_storage(&settings.storage).await?;
        let repository = PackageRepository::new(settings.repository.clone(), storage);

        match self.command {
            Some(Commands::Publish(args)) => {
                let args = args.merge(self.publish);
                publish::execute_publish(&repository, &settings, args).await
            }
            Some(Commands::List(args)) => list::execute_list(&repository, args).await,
            Some(Commands::Index(args)) => {
                index::execute_index(&repository, &settings, args).await
            }
            None => publish::execute_publish(&repository, &settings, self.publish).await,
        }
    }
}
