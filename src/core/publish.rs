//! Publish local build artifacts and refresh the package index

use crate::core::acl::AclPolicy;
use crate::core::artifacts::{
    find_package_files, package_name_from_path, validate_package_name, DEFAULT_DIST_DIR,
};
use crate::core::error::{PublishError, PublishResult};
use crate::core::repository::PackageRepository;
use std::path::PathBuf;
use tracing::{info, warn};

/// What to publish and how
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// Directory holding built packages
    pub dist_dir: PathBuf,
    /// Accepted file extensions; `None` for wheels and source archives
    pub extensions: Option<Vec<String>>,
    /// Package name override; derived from the first artifact otherwise
    pub package_name: Option<String>,
    pub acl: AclPolicy,
    /// Treat already-published artifacts as skipped instead of failing
    pub skip_existing: bool,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            dist_dir: PathBuf::from(DEFAULT_DIST_DIR),
            extensions: None,
            package_name: None,
            acl: AclPolicy::default(),
            skip_existing: false,
        }
    }
}

impl PublishOptions {
    /// Options from the caller-level ACL flags, which are mutually exclusive
    pub fn from_flags(public: bool, owner_full_control: bool) -> PublishResult<Self> {
        Ok(Self {
            acl: AclPolicy::from_flags(public, owner_full_control)?,
            ..Self::default()
        })
    }
}

/// Outcome of one publish run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub package_name: String,
    pub uploaded: Vec<String>,
    pub skipped: Vec<String>,
    pub index_key: String,
}

/// Publish the current package files.
///
/// Discovers artifacts in `options.dist_dir`, uploads each one in file name
/// order under the package derived from the first artifact, then regenerates and
/// uploads the package index. Nothing is written when no artifacts exist.
pub async fn publish_packages(
    repository: &PackageRepository,
    options: &PublishOptions,
) -> PublishResult<PublishReport> {
    if let Some(name) = &options.package_name {
        validate_package_name(name)?;
    }

    let mut files: Vec<PathBuf> =
        match find_package_files(&options.dist_dir, options.extensions.as_deref()) {
            Ok(files) => files.collect(),
            Err(PublishError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e),
        };
    files.sort();

    let Some(first) = files.first() else {
        return Err(PublishError::NoPackagesFound(options.dist_dir.clone()));
    };

    let package_name = match &options.package_name {
        Some(name) => name.clone(),
        None => package_name_from_path(first)?,
    };

    info!(
        "Publishing {} file(s) for '{}' to s3://{}/{} (acl: {})",
        files.len(),
        package_name,
        repository.bucket(),
        repository.listing_prefix(Some(&package_name)),
        options.acl
    );

    let mut report = PublishReport {
        package_name: package_name.clone(),
        ..PublishReport::default()
    };

    for file in &files {
        match repository
            .upload_package(file, &package_name, options.acl)
            .await
        {
            Ok(key) => report.uploaded.push(key),
            Err(PublishError::PackageExists { filename, package }) if options.skip_existing => {
                warn!(
                    "Package {} already exists for the project {}, skipping",
                    filename, package
                );
                report.skipped.push(repository.package_key(&package, &filename));
            }
            Err(e) => return Err(e),
        }
    }

    // Update the index
    report.index_key = repository
        .upload_index(&package_name, None, options.acl)
        .await?;

    info!(
        "Published '{}': {} uploaded, {} skipped",
        package_name,
        report.uploaded.len(),
        report.skipped.len()
    );
    Ok(report)
}
