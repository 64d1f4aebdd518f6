//! Configuration resolution for the CLI
//!
//! Every setting resolves in this order: command-line flag, `PIPS3_*`
//! environment variable, explicit `--config` file (or `.pips3.toml` in the
//! current directory), user config file, built-in default.

use crate::cli::cli::RepositoryArgs;
use crate::cli::error::CliResult;
use config::{Config, Environment, File};
use pips3::core::repository::DEFAULT_PREFIX;
use pips3::storage::{BlobStorageConfig, StorageKind};
use pips3::{AclPolicy, PublishError, RepositoryConfig};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Project-level config file looked up in the current directory
pub const PROJECT_CONFIG_FILE: &str = ".pips3.toml";

/// Prefix of every environment variable the CLI reads
pub const ENV_PREFIX: &str = "PIPS3";

/// Settings as read from files and the environment, before flags apply
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FileSettings {
    pub endpoint: Option<String>,
    pub bucket: Option<String>,
    pub prefix: Option<String>,
    pub public: Option<bool>,
    pub bucket_owner_full_control: Option<bool>,
    pub package: Option<String>,
    pub dist: Option<PathBuf>,
    pub region: Option<String>,
    pub s3_endpoint_url: Option<String>,
    pub force_path_style: Option<bool>,
    pub storage: Option<StorageKind>,
    pub local_root: Option<PathBuf>,
}

/// Where layered settings come from
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Optional per-user file
    pub user_file: Option<PathBuf>,
    /// Project file, required when given explicitly with `--config`
    pub project_file: Option<PathBuf>,
    pub project_file_required: bool,
    /// Replaces the process environment (tests)
    pub env: Option<HashMap<String, String>>,
}

impl ConfigSources {
    /// Standard locations: `$XDG_CONFIG_HOME/pips3/config.toml`, then
    /// `--config` or `.pips3.toml`, then the process environment
    pub fn discover(explicit: Option<&Path>) -> Self {
        let user_file = dirs::config_dir().map(|dir| dir.join("pips3").join("config.toml"));
        let (project_file, project_file_required) = match explicit {
            Some(path) => (Some(path.to_path_buf()), true),
            None => (Some(PathBuf::from(PROJECT_CONFIG_FILE)), false),
        };
        Self {
            user_file,
            project_file,
            project_file_required,
            env: None,
        }
    }

    /// Merge all sources into one settings value
    pub fn load(&self) -> CliResult<FileSettings> {
        let mut builder = Config::builder();

        if let Some(user_file) = &self.user_file {
            debug!("Reading user config from {}", user_file.display());
            builder = builder.add_source(File::from(user_file.as_path()).required(false));
        }

        if let Some(project_file) = &self.project_file {
            debug!("Reading project config from {}", project_file.display());
            builder = builder.add_source(
                File::from(project_file.as_path()).required(self.project_file_required),
            );
        }

        let mut env = Environment::with_prefix(ENV_PREFIX);
        if let Some(vars) = &self.env {
            env = env.source(Some(vars.clone()));
        }
        builder = builder.add_source(env);

        Ok(builder.build()?.try_deserialize()?)
    }
}

/// Everything a command needs, fully resolved and validated
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub repository: RepositoryConfig,
    pub acl: AclPolicy,
    pub storage: BlobStorageConfig,
    pub package: Option<String>,
    pub dist: Option<PathBuf>,
}

/// Resolve a tri-state flag pair against the layered value
fn flag(on: bool, off: bool, layered: Option<bool>) -> bool {
    if on {
        true
    } else if off {
        false
    } else {
        layered.unwrap_or(false)
    }
}

/// Apply command-line flags over layered settings and validate the result.
///
/// Fails before any storage client exists, so configuration mistakes never
/// reach the network.
pub fn resolve_settings(args: &RepositoryArgs, layered: FileSettings) -> CliResult<ResolvedSettings> {
    let endpoint = args
        .endpoint
        .clone()
        .or(layered.endpoint)
        .ok_or_else(|| PublishError::InvalidConfig("S3 endpoint not specified".to_string()))?;

    let bucket = args
        .bucket
        .clone()
        .or(layered.bucket)
        .ok_or_else(|| PublishError::InvalidConfig("S3 bucket not specified".to_string()))?;

    let public = flag(args.public, args.no_public, layered.public);
    let owner_full_control = flag(
        args.bucket_owner_full_control,
        args.no_bucket_owner_full_control,
        layered.bucket_owner_full_control,
    );
    let acl = AclPolicy::from_flags(public, owner_full_control)?;

    let prefix = args
        .prefix
        .clone()
        .or(layered.prefix)
        .unwrap_or_else(|| DEFAULT_PREFIX.to_string());
    let repository = RepositoryConfig::new(endpoint, bucket)?.with_prefix(prefix)?;

    let endpoint_url = args.s3_endpoint_url.clone().or(layered.s3_endpoint_url);
    let storage = BlobStorageConfig {
        kind: args.storage.or(layered.storage).unwrap_or_default(),
        bucket: repository.bucket.clone(),
        region: args.region.clone().or(layered.region),
        force_path_style: layered.force_path_style.unwrap_or(endpoint_url.is_some()),
        endpoint_url,
        local_root: args
            .local_root
            .clone()
            .or(layered.local_root)
            .unwrap_or_else(|| BlobStorageConfig::default().local_root),
    };

    Ok(ResolvedSettings {
        repository,
        acl,
        storage,
        package: layered.package,
        dist: layered.dist,
    })
}
