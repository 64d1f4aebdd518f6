//! In-memory blob storage, used for dry runs and tests

use crate::core::acl::{AclPolicy, Grant};
use crate::core::error::{PublishError, PublishResult};
use crate::storage::{bucket_not_found, paginate, BlobStorage, ListPage, PutObject, StorageKind};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// An object as the in-memory store keeps it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
    pub acl: AclPolicy,
    pub metadata: BTreeMap<String, String>,
}

impl StoredObject {
    /// Grants the object's canned ACL resolves to
    pub fn grants(&self) -> Vec<Grant> {
        self.acl.grants()
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    buckets: BTreeMap<String, BTreeMap<String, StoredObject>>,
    list_requests: usize,
    put_requests: usize,
}

/// Buckets of ordered keys held in process memory
#[derive(Debug, Default)]
pub struct MemoryBlobStorage {
    state: Mutex<MemoryState>,
}

impl MemoryBlobStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create an empty bucket; an existing bucket is left as is
    pub fn create_bucket(&self, bucket: &str) {
        self.state().buckets.entry(bucket.to_string()).or_default();
    }

    /// Snapshot of one stored object
    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.state().buckets.get(bucket)?.get(key).cloned()
    }

    /// All keys of a bucket in listing order
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.state()
            .buckets
            .get(bucket)
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of list requests served so far
    pub fn list_requests(&self) -> usize {
        self.state().list_requests
    }

    /// Number of writes served so far
    pub fn put_requests(&self) -> usize {
        self.state().put_requests
    }
}

#[async_trait]
impl BlobStorage for MemoryBlobStorage {
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        max_keys: u32,
        continuation_token: Option<&str>,
    ) -> PublishResult<ListPage> {
        let mut state = self.state();
        state.list_requests += 1;
        let objects = state.buckets.get(bucket).ok_or_else(|| bucket_not_found(bucket))?;
        let page = paginate(objects.keys().cloned(), prefix, max_keys, continuation_token);
        debug!(
            "memory list {}/{}: {} key(s), more: {}",
            bucket,
            prefix,
            page.keys.len(),
            page.next_continuation_token.is_some()
        );
        Ok(page)
    }

    async fn exists(&self, bucket: &str, key: &str) -> PublishResult<bool> {
        let state = self.state();
        let objects = state.buckets.get(bucket).ok_or_else(|| bucket_not_found(bucket))?;
        Ok(objects.contains_key(key))
    }

    async fn put_object(&self, bucket: &str, object: PutObject) -> PublishResult<()> {
        let mut state = self.state();
        state.put_requests += 1;
        let objects = state
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| bucket_not_found(bucket))?;
        objects.insert(
            object.key,
            StoredObject {
                body: object.body,
                content_type: object.content_type,
                acl: object.acl,
                metadata: object.metadata,
            },
        );
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> PublishResult<Vec<u8>> {
        let state = self.state();
        let objects = state.buckets.get(bucket).ok_or_else(|| bucket_not_found(bucket))?;
        objects
            .get(key)
            .map(|o| o.body.clone())
            .ok_or_else(|| PublishError::Storage(format!("Object not found: {}", key)))
    }

    fn kind(&self) -> StorageKind {
        StorageKind::Memory
    }
}
