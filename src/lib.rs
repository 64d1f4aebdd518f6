//! # pips3
//!
//! Use S3 compliant object storage as a simple Python package repository.
//!
//! Built wheels and source distributions are uploaded under
//! `{prefix}/{package}/` and a static `index.html` listing every artifact of
//! the package is regenerated next to them, so `pip install --index-url`
//! (or `--extra-index-url`) can point straight at the bucket's website
//! endpoint.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pips3::storage::{create_blob_storage, BlobStorageConfig};
//! use pips3::{publish_packages, PackageRepository, PublishOptions, RepositoryConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RepositoryConfig::new("https://my-bucket.s3-website.amazonaws.com", "my-bucket")?;
//!     let storage = create_blob_storage(&BlobStorageConfig::default()).await?;
//!     let repository = PackageRepository::new(config, storage);
//!
//!     let options = PublishOptions::from_flags(true, false)?;
//!     let report = publish_packages(&repository, &options).await?;
//!     println!("Uploaded {} file(s)", report.uploaded.len());
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod storage;

pub use crate::core::acl::AclPolicy;
pub use crate::core::error::{PublishError, PublishResult};
pub use crate::core::publish::{publish_packages, PublishOptions, PublishReport};
pub use crate::core::repository::{PackageRepository, RepositoryConfig};
pub use crate::storage::{BlobStorage, BlobStorageConfig, StorageKind};

/// Version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging (safe to call more than once)
///
/// `RUST_LOG` wins over `default_filter` when set.
pub fn init_logging(default_filter: &str) {
    // Only initialize logging once
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .finish();

        // This will fail silently if already initialized
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
