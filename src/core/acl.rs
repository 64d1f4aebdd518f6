//! Access-control settings applied to uploaded objects

use crate::core::error::{PublishError, PublishResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canned ACL requested for an upload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AclPolicy {
    /// Leave the store's default (private to the uploader)
    #[default]
    Private,
    /// Readable by anyone
    PublicRead,
    /// Full control granted to the bucket owner
    BucketOwnerFullControl,
}

impl AclPolicy {
    /// Build a policy from the two caller-level flags.
    ///
    /// The flags are mutually exclusive; asking for both is rejected here so
    /// that no request ever reaches the store.
    pub fn from_flags(public: bool, owner_full_control: bool) -> PublishResult<Self> {
        match (public, owner_full_control) {
            (true, true) => Err(PublishError::ConflictingAcl),
            (true, false) => Ok(Self::PublicRead),
            (false, true) => Ok(Self::BucketOwnerFullControl),
            (false, false) => Ok(Self::Private),
        }
    }

    /// The S3 canned ACL header value, `None` for the store default
    pub fn canned(&self) -> Option<&'static str> {
        match self {
            Self::Private => None,
            Self::PublicRead => Some("public-read"),
            Self::BucketOwnerFullControl => Some("bucket-owner-full-control"),
        }
    }

    /// Grants a store applies for this canned ACL
    pub fn grants(&self) -> Vec<Grant> {
        let owner = Grant::new(Grantee::Owner, Permission::FullControl);
        match self {
            Self::Private => vec![owner],
            Self::PublicRead => vec![owner, Grant::new(Grantee::AllUsers, Permission::Read)],
            Self::BucketOwnerFullControl => vec![
                owner,
                Grant::new(Grantee::BucketOwner, Permission::FullControl),
            ],
        }
    }
}

impl fmt::Display for AclPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canned().unwrap_or("private"))
    }
}

/// Who a grant applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grantee {
    Owner,
    BucketOwner,
    AllUsers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    FullControl,
    Read,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grant {
    pub grantee: Grantee,
    pub permission: Permission,
}

impl Grant {
    pub fn new(grantee: Grantee, permission: Permission) -> Self {
        Self {
            grantee,
            permission,
        }
    }
}
