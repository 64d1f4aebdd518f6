//! S3 blob storage (supports AWS S3 and S3-compatible services via endpoint)

use crate::core::error::{PublishError, PublishResult};
use crate::storage::{BlobStorage, ListPage, PutObject, StorageKind, MAX_LIST_KEYS};
use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use std::collections::HashMap;
use tracing::debug;

/// Region used when neither the caller nor the environment names one
const FALLBACK_REGION: &str = "us-east-1";

pub struct S3BlobStorage {
    client: aws_sdk_s3::Client,
}

impl S3BlobStorage {
    /// Build a client from the AWS default configuration chain.
    ///
    /// Credentials always come from the default provider chain (environment,
    /// profile, instance metadata). `endpoint_url` points the client at an
    /// S3-compatible service; `force_path_style` is needed by most of them.
    pub async fn new(
        region: Option<String>,
        endpoint_url: Option<String>,
        force_path_style: bool,
    ) -> PublishResult<Self> {
        use aws_config::meta::region::RegionProviderChain;
        use aws_config::Region;

        let region_provider = RegionProviderChain::first_try(region.map(Region::new))
            .or_default_provider()
            .or_else(Region::new(FALLBACK_REGION));

        let mut loader =
            aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region_provider);

        if let Some(endpoint_url) = endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }

        let shared_config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&shared_config)
            .force_path_style(force_path_style)
            .build();

        Ok(Self::from_client(aws_sdk_s3::Client::from_conf(s3_config)))
    }

    /// Wrap an already configured client
    pub fn from_client(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BlobStorage for S3BlobStorage {
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        max_keys: u32,
        continuation_token: Option<&str>,
    ) -> PublishResult<ListPage> {
        // clamped to MAX_LIST_KEYS, always fits in i32
        let max_keys = max_keys.clamp(1, MAX_LIST_KEYS) as i32;

        let response = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .max_keys(max_keys)
            .set_continuation_token(continuation_token.map(str::to_string))
            .send()
            .await
            .map_err(|e| storage_error("list objects in S3", e))?;

        let keys: Vec<String> = response
            .contents()
            .iter()
            .filter_map(|object| object.key().map(str::to_string))
            .collect();

        let next_continuation_token = response.next_continuation_token().map(str::to_string);
        debug!(
            "s3 list s3://{}/{}: {} key(s), more: {}",
            bucket,
            prefix,
            keys.len(),
            next_continuation_token.is_some()
        );

        Ok(ListPage {
            keys,
            next_continuation_token,
        })
    }

    async fn exists(&self, bucket: &str, key: &str) -> PublishResult<bool> {
        let result = self.client.head_object().bucket(bucket).key(key).send().await;

        match result {
            Ok(_) => Ok(true),
            Err(e) => {
                let not_found = e.as_service_error().is_some_and(|se| se.is_not_found())
                    || e.raw_response().is_some_and(|r| r.status().as_u16() == 404);
                if not_found {
                    Ok(false)
                } else {
                    Err(storage_error("check object existence in S3", e))
                }
            }
        }
    }

    async fn put_object(&self, bucket: &str, object: PutObject) -> PublishResult<()> {
        let metadata: HashMap<String, String> = object.metadata.into_iter().collect();

        self.client
            .put_object()
            .bucket(bucket)
            .key(&object.key)
            .body(ByteStream::from(object.body))
            .content_type(object.content_type)
            .set_acl(object.acl.canned().map(ObjectCannedAcl::from))
            .set_metadata((!metadata.is_empty()).then_some(metadata))
            .send()
            .await
            .map_err(|e| storage_error("upload to S3", e))?;

        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> PublishResult<Vec<u8>> {
        let result = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    PublishError::Storage(format!("Object not found: {}", key))
                } else {
                    storage_error("download from S3", e)
                }
            })?;

        let data = result
            .body
            .collect()
            .await
            .map_err(|e| PublishError::Storage(format!("Failed to read S3 response: {}", e)))?;

        Ok(data.into_bytes().to_vec())
    }

    fn kind(&self) -> StorageKind {
        StorageKind::S3
    }
}

fn storage_error<E: std::error::Error>(action: &str, err: E) -> PublishError {
    let detail = DisplayErrorContext(err).to_string();
    PublishError::Storage(format!("Failed to {}: {}", action, map_s3_error(&detail)))
}

/// Map AWS SDK error text to a user-friendly message
fn map_s3_error(err_str: &str) -> String {
    if err_str.contains("NoSuchBucket") {
        "Bucket not found".to_string()
    } else if err_str.contains("AccessDenied") || err_str.contains("access denied") {
        "Access denied".to_string()
    } else if err_str.contains("timeout") || err_str.contains("TimedOut") {
        "Request timeout".to_string()
    } else {
        format!("S3 error: {}", err_str)
    }
}
