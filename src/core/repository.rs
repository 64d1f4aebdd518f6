//! Repository client: key listing, package upload and index maintenance
//!
//! All keys live under `{prefix}/{package_name}/`. The client never overwrites
//! an artifact; the index page is regenerated and replaced on every publish.

use crate::core::acl::AclPolicy;
use crate::core::artifacts::validate_package_name;
use crate::core::error::{PublishError, PublishResult};
use crate::core::index::{is_index_key, render_index, INDEX_FILE_NAME};
use crate::storage::{BlobStorage, PutObject, MAX_LIST_KEYS};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// The pypi default (https://pypi.org/simple)
pub const DEFAULT_PREFIX: &str = "simple";

/// Keys requested per list call
pub const DEFAULT_MAX_KEYS: u32 = MAX_LIST_KEYS;

/// Object metadata entry carrying the artifact digest
pub const SHA256_METADATA_KEY: &str = "sha256";

/// Where the repository lives and how its links are built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Public base URL used in index links, without a trailing slash
    pub endpoint: String,
    pub bucket: String,
    /// Namespace root for every key, without surrounding slashes
    pub prefix: String,
}

impl RepositoryConfig {
    /// Validate endpoint and bucket; the prefix starts as [`DEFAULT_PREFIX`]
    pub fn new(endpoint: impl Into<String>, bucket: impl Into<String>) -> PublishResult<Self> {
        let endpoint = endpoint.into();
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return Err(PublishError::InvalidConfig(
                "S3 endpoint not specified".to_string(),
            ));
        }
        Url::parse(endpoint).map_err(|e| {
            PublishError::InvalidConfig(format!("Invalid endpoint URL '{}': {}", endpoint, e))
        })?;

        let bucket = bucket.into().trim().to_string();
        if bucket.is_empty() {
            return Err(PublishError::InvalidConfig(
                "S3 bucket not specified".to_string(),
            ));
        }

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket,
            prefix: DEFAULT_PREFIX.to_string(),
        })
    }

    /// Replace the key prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> PublishResult<Self> {
        let prefix = prefix.into().trim().trim_matches('/').to_string();
        if prefix.is_empty() {
            return Err(PublishError::InvalidConfig(
                "Key prefix cannot be empty".to_string(),
            ));
        }
        self.prefix = prefix;
        Ok(self)
    }
}

/// Use S3 compliant object storage as a simple package repository
pub struct PackageRepository {
    config: RepositoryConfig,
    storage: Arc<dyn BlobStorage>,
}

enum ListCursor {
    Start(Option<String>),
    Next(String),
    Done,
}

impl PackageRepository {
    pub fn new(config: RepositoryConfig, storage: Arc<dyn BlobStorage>) -> Self {
        debug!(
            "Repository s3://{}/{} on {} storage, links under {}",
            config.bucket,
            config.prefix,
            storage.kind(),
            config.endpoint
        );
        Self { config, storage }
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }

    pub fn prefix(&self) -> &str {
        &self.config.prefix
    }

    pub fn storage(&self) -> &Arc<dyn BlobStorage> {
        &self.storage
    }

    /// Listing prefix for the whole repository or one package, with trailing slash
    pub fn listing_prefix(&self, package_name: Option<&str>) -> String {
        match package_name {
            Some(name) => format!("{}/{}/", self.config.prefix, name),
            None => format!("{}/", self.config.prefix),
        }
    }

    /// `{prefix}/{package_name}/{filename}`
    pub fn package_key(&self, package_name: &str, filename: &str) -> String {
        format!("{}/{}/{}", self.config.prefix, package_name, filename)
    }

    /// `{prefix}/{package_name}/index.html`
    pub fn index_key(&self, package_name: &str) -> String {
        self.package_key(package_name, INDEX_FILE_NAME)
    }

    /// Stream every key under the prefix, optionally narrowed to one package.
    ///
    /// Each page requests up to `max_keys` keys and the stream follows the
    /// continuation token until the store stops returning one. Keys come in
    /// the store's lexicographic order. The stream is finite and cannot be
    /// restarted; call again for a fresh listing.
    pub fn list_keys<'a>(
        &'a self,
        package_name: Option<&str>,
        max_keys: u32,
        continuation_token: Option<String>,
    ) -> PublishResult<BoxStream<'a, PublishResult<String>>> {
        if max_keys == 0 || max_keys > MAX_LIST_KEYS {
            return Err(PublishError::InvalidConfig(format!(
                "max_keys must be between 1 and {}, got {}",
                MAX_LIST_KEYS, max_keys
            )));
        }
        if let Some(name) = package_name {
            validate_package_name(name)?;
        }

        let prefix = self.listing_prefix(package_name);
        info!("Listing objects in s3://{}/{}", self.config.bucket, prefix);

        let pages = stream::try_unfold(ListCursor::Start(continuation_token), move |cursor| {
            let prefix = prefix.clone();
            async move {
                let token = match cursor {
                    ListCursor::Done => return Ok::<_, PublishError>(None),
                    ListCursor::Start(token) => token,
                    ListCursor::Next(token) => Some(token),
                };

                let page = self
                    .storage
                    .list_objects(&self.config.bucket, &prefix, max_keys, token.as_deref())
                    .await?;

                let next = match page.next_continuation_token {
                    Some(token) => ListCursor::Next(token),
                    None => ListCursor::Done,
                };
                Ok::<_, PublishError>(Some((page.keys, next)))
            }
        });

        Ok(pages
            .map_ok(|keys| stream::iter(keys.into_iter().map(Ok::<String, PublishError>)))
            .try_flatten()
            .boxed())
    }

    /// Generate the index page.
    ///
    /// Given keys are rendered as is. Without keys the package's listing is
    /// fetched, skipping index documents so the page never links to itself.
    pub async fn generate_index(
        &self,
        keys: Option<&[String]>,
        package_name: Option<&str>,
    ) -> PublishResult<String> {
        if let Some(keys) = keys {
            return Ok(render_index(&self.config.endpoint, keys));
        }

        let keys: Vec<String> = self
            .list_keys(package_name, DEFAULT_MAX_KEYS, None)?
            .try_filter(|key| futures::future::ready(!is_index_key(key)))
            .try_collect()
            .await?;

        debug!("Rendering index with {} link(s)", keys.len());
        Ok(render_index(&self.config.endpoint, &keys))
    }

    /// Upload one package file unless its key already exists.
    ///
    /// The existence check and the write are two separate requests; a
    /// concurrent publisher can slip in between them.
    pub async fn upload_package(
        &self,
        path: &Path,
        package_name: &str,
        acl: AclPolicy,
    ) -> PublishResult<String> {
        validate_package_name(package_name)?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                PublishError::InvalidConfig(format!("Invalid package path: {}", path.display()))
            })?;

        let key = self.package_key(package_name, filename);
        info!(
            "Uploading {} to s3://{}/{}",
            path.display(),
            self.config.bucket,
            key
        );

        // If the file already exists, do not override
        if self.storage.exists(&self.config.bucket, &key).await? {
            return Err(PublishError::PackageExists {
                filename: filename.to_string(),
                package: package_name.to_string(),
            });
        }

        let body = tokio::fs::read(path).await?;
        let digest = format!("{:x}", Sha256::digest(&body));
        debug!("{} sha256={} ({} bytes, acl {})", filename, digest, body.len(), acl);

        let mut metadata = BTreeMap::new();
        metadata.insert(SHA256_METADATA_KEY.to_string(), digest);

        self.storage
            .put_object(
                &self.config.bucket,
                PutObject {
                    key: key.clone(),
                    body,
                    content_type: content_type_for(filename).to_string(),
                    acl,
                    metadata,
                },
            )
            .await?;

        Ok(key)
    }

    /// Upload the index page for a package, replacing any previous one.
    ///
    /// The page is generated from the current listing unless `index` is given.
    pub async fn upload_index(
        &self,
        package_name: &str,
        index: Option<String>,
        acl: AclPolicy,
    ) -> PublishResult<String> {
        validate_package_name(package_name)?;
        let index = match index {
            Some(index) => index,
            None => self.generate_index(None, Some(package_name)).await?,
        };

        let key = self.index_key(package_name);
        info!("Uploading index to s3://{}/{}", self.config.bucket, key);

        self.storage
            .put_object(
                &self.config.bucket,
                PutObject {
                    key: key.clone(),
                    body: index.into_bytes(),
                    content_type: "text/html".to_string(),
                    acl,
                    metadata: BTreeMap::new(),
                },
            )
            .await?;

        Ok(key)
    }
}

/// Content type stored with an artifact, by file extension
pub fn content_type_for(filename: &str) -> &'static str {
    if filename.ends_with(".whl") || filename.ends_with(".zip") {
        "application/zip"
    } else if filename.ends_with(".tar.gz") || filename.ends_with(".tgz") || filename.ends_with(".gz") {
        "application/gzip"
    } else {
        "application/octet-stream"
    }
}
