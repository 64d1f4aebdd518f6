//! Utility functions for CLI operations

pub mod messages;
