//! Object storage backends
//!
//! The repository client talks to storage only through [`BlobStorage`]. Three
//! backends exist: S3 (and S3-compatible services), a local directory tree,
//! and an in-memory store used for dry runs and tests.

pub mod local;
pub mod memory;
#[cfg(feature = "s3-storage")]
pub mod s3;

use crate::core::acl::AclPolicy;
use crate::core::error::{PublishError, PublishResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

pub use local::LocalBlobStorage;
pub use memory::{MemoryBlobStorage, StoredObject};
#[cfg(feature = "s3-storage")]
pub use s3::S3BlobStorage;

/// Largest page a list request may ask for
pub const MAX_LIST_KEYS: u32 = 1000;

/// One page of a key listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub keys: Vec<String>,
    /// Present when more keys follow
    pub next_continuation_token: Option<String>,
}

/// A single object write
#[derive(Debug, Clone)]
pub struct PutObject {
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: String,
    pub acl: AclPolicy,
    pub metadata: BTreeMap<String, String>,
}

/// Trait for blob storage backends
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// List up to `max_keys` keys starting with `prefix`, in lexicographic order
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        max_keys: u32,
        continuation_token: Option<&str>,
    ) -> PublishResult<ListPage>;

    /// Metadata lookup; a missing key is `Ok(false)`
    async fn exists(&self, bucket: &str, key: &str) -> PublishResult<bool>;

    /// Write an object, replacing any previous content
    async fn put_object(&self, bucket: &str, object: PutObject) -> PublishResult<()>;

    /// Read an object's bytes
    async fn get_object(&self, bucket: &str, key: &str) -> PublishResult<Vec<u8>>;

    /// Short backend name for log lines
    fn kind(&self) -> StorageKind;
}

/// Paginate an already sorted key sequence the way the in-process backends do.
///
/// The continuation token is the last key of the previous page.
pub(crate) fn paginate<I>(
    sorted_keys: I,
    prefix: &str,
    max_keys: u32,
    continuation_token: Option<&str>,
) -> ListPage
where
    I: IntoIterator<Item = String>,
{
    let limit = max_keys.clamp(1, MAX_LIST_KEYS) as usize;
    let mut matching = sorted_keys
        .into_iter()
        .filter(|k| k.starts_with(prefix))
        .filter(|k| continuation_token.map_or(true, |token| k.as_str() > token))
        .peekable();

    let mut keys = Vec::new();
    while keys.len() < limit {
        match matching.next() {
            Some(key) => keys.push(key),
            None => break,
        }
    }

    let next_continuation_token = if matching.peek().is_some() {
        keys.last().cloned()
    } else {
        None
    };

    ListPage {
        keys,
        next_continuation_token,
    }
}

/// Available storage backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    S3,
    Local,
    Memory,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::S3 => "s3",
            Self::Local => "local",
            Self::Memory => "memory",
        };
        f.write_str(name)
    }
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "s3" => Ok(Self::S3),
            "local" => Ok(Self::Local),
            "memory" => Ok(Self::Memory),
            other => Err(format!(
                "Unsupported storage type: {} (expected s3, local or memory)",
                other
            )),
        }
    }
}

/// Blob storage configuration
#[derive(Debug, Clone)]
pub struct BlobStorageConfig {
    pub kind: StorageKind,
    /// Bucket created up front by the in-memory backend
    pub bucket: String,
    pub region: Option<String>,
    /// S3 API endpoint for S3-compatible services (MinIO, R2, ...)
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
    /// Root directory of the local backend
    pub local_root: PathBuf,
}

impl Default for BlobStorageConfig {
    fn default() -> Self {
        Self {
            kind: StorageKind::default(),
            bucket: String::new(),
            region: None,
            endpoint_url: None,
            force_path_style: false,
            local_root: PathBuf::from("./bucket"),
        }
    }
}

/// Create blob storage from configuration
pub async fn create_blob_storage(config: &BlobStorageConfig) -> PublishResult<Arc<dyn BlobStorage>> {
    match config.kind {
        StorageKind::Local => {
            info!(
                "Creating local blob storage at '{}'",
                config.local_root.display()
            );
            Ok(Arc::new(LocalBlobStorage::new(config.local_root.clone())))
        }
        StorageKind::Memory => {
            info!("Creating in-memory blob storage (nothing is persisted)");
            let storage = MemoryBlobStorage::new();
            storage.create_bucket(&config.bucket);
            Ok(Arc::new(storage))
        }
        #[cfg(feature = "s3-storage")]
        StorageKind::S3 => {
            info!(
                "Creating S3 blob storage: region='{}', endpoint='{}'",
                config.region.as_deref().unwrap_or("<default>"),
                config.endpoint_url.as_deref().unwrap_or("<aws>"),
            );
            let storage = S3BlobStorage::new(
                config.region.clone(),
                config.endpoint_url.clone(),
                config.force_path_style,
            )
            .await?;
            Ok(Arc::new(storage))
        }
        #[cfg(not(feature = "s3-storage"))]
        StorageKind::S3 => Err(PublishError::InvalidConfig(
            "S3 storage requires the 's3-storage' feature to be enabled".to_string(),
        )),
    }
}

/// Error for a bucket the backend does not know
pub(crate) fn bucket_not_found(bucket: &str) -> PublishError {
    PublishError::Storage(format!("Bucket not found: {}", bucket))
}
