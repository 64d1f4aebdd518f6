//! Tagged status lines for CLI output

use std::fmt::Display;

fn tagged(tag: &str, msg: impl Display) -> String {
    format!("[{}] {}", tag, msg)
}

pub fn ok(msg: impl Display) -> String {
    tagged("OK", msg)
}

pub fn error(msg: impl Display) -> String {
    tagged("ERROR", msg)
}

pub fn warning(msg: impl Display) -> String {
    tagged("WARNING", msg)
}

pub fn info(msg: impl Display) -> String {
    tagged("INFO", msg)
}

/// `[3/7] msg`
pub fn progress(current: usize, total: usize, msg: impl Display) -> String {
    tagged(&format!("{}/{}", current, total), msg)
}

/// Location of an object as shown to users
pub fn s3_url(bucket: &str, key: &str) -> String {
    format!("s3://{}/{}", bucket, key)
}
