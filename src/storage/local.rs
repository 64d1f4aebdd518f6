//! Local filesystem blob storage
//!
//! Objects live at `{root}/{bucket}/{key}`, so the tree can be served as a
//! static site. ACLs and object metadata are accepted and ignored.

use crate::core::error::{PublishError, PublishResult};
use crate::storage::{paginate, BlobStorage, ListPage, PutObject, StorageKind};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Directory tree standing in for a bucket
pub struct LocalBlobStorage {
    base_path: PathBuf,
}

impl LocalBlobStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn bucket_path(&self, bucket: &str) -> PathBuf {
        self.base_path.join(bucket)
    }

    fn object_path(&self, bucket: &str, key: &str) -> PublishResult<PathBuf> {
        if key.split('/').any(|segment| segment == ".." || segment.is_empty()) {
            return Err(PublishError::Storage(format!("Invalid object key: {}", key)));
        }
        Ok(self.bucket_path(bucket).join(key))
    }
}

/// Relative path of `path` under `root`, joined with `/`
fn key_for(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let segments: Option<Vec<&str>> = relative.components().map(|c| c.as_os_str().to_str()).collect();
    Some(segments?.join("/"))
}

#[async_trait]
impl BlobStorage for LocalBlobStorage {
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        max_keys: u32,
        continuation_token: Option<&str>,
    ) -> PublishResult<ListPage> {
        let root = self.bucket_path(bucket);
        if !root.is_dir() {
            return Ok(ListPage::default());
        }

        let mut keys: Vec<String> = WalkDir::new(&root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| key_for(&root, entry.path()))
            .collect();
        keys.sort();

        let page = paginate(keys, prefix, max_keys, continuation_token);
        debug!("local list {}/{}: {} key(s)", bucket, prefix, page.keys.len());
        Ok(page)
    }

    async fn exists(&self, bucket: &str, key: &str) -> PublishResult<bool> {
        let full_path = self.object_path(bucket, key)?;
        Ok(full_path.is_file())
    }

    async fn put_object(&self, bucket: &str, object: PutObject) -> PublishResult<()> {
        let full_path = self.object_path(bucket, &object.key)?;

        // Create parent directory if needed
        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&full_path, &object.body).await?;
        debug!(
            "local put {} ({} bytes, acl {} ignored)",
            full_path.display(),
            object.body.len(),
            object.acl
        );
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> PublishResult<Vec<u8>> {
        let full_path = self.object_path(bucket, key)?;
        if !full_path.is_file() {
            return Err(PublishError::Storage(format!("Object not found: {}", key)));
        }
        Ok(tokio::fs::read(&full_path).await?)
    }

    fn kind(&self) -> StorageKind {
        StorageKind::Local
    }
}
