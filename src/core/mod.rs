//! Core publishing modules

pub mod acl;
pub mod artifacts;
pub mod error;
pub mod index;
pub mod publish;
pub mod repository;

// Re-export main types for convenience
pub use acl::{AclPolicy, Grant, Grantee, Permission};
pub use artifacts::{
    find_package_files, package_name_from_path, validate_package_name, PackageFiles,
    DEFAULT_DIST_DIR, DEFAULT_EXTENSIONS,
};
pub use error::{PublishError, PublishResult};
pub use index::{render_index, INDEX_FILE_NAME};
pub use publish::{publish_packages, PublishOptions, PublishReport};
pub use repository::{PackageRepository, RepositoryConfig, DEFAULT_MAX_KEYS, DEFAULT_PREFIX};
