//! CLI tests module

#![allow(clippy::all, clippy::unwrap_used, clippy::expect_used)]

pub mod config_tests;
pub mod list_e2e_tests;
pub mod publish_e2e_tests;
pub mod test_helpers;
