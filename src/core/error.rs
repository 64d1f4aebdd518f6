//! Error type shared by the repository client, publisher and storage backends

use std::path::PathBuf;

/// Main publish error type
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Package {filename} already exists in the bucket for the project {package}")]
    PackageExists { filename: String, package: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot request both a public-read ACL and bucket-owner-full-control; choose one")]
    ConflictingAcl,

    #[error("No packages found in: {}", .0.display())]
    NoPackagesFound(PathBuf),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PublishError {
    /// True for errors raised while validating configuration, before any network call
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig(_) | Self::ConflictingAcl)
    }
}

/// Result alias used across the library
pub type PublishResult<T> = Result<T, PublishError>;
