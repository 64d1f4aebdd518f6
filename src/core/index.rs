//! Rendering of the static package index page

/// Everything before the first anchor
pub const INDEX_HEADER: &str = "<!DOCTYPE html>\n<html>\n  <body>";

/// Everything after the last anchor
pub const INDEX_FOOTER: &str = "\n  </body>\n</html>";

/// File name of the index object stored next to a package's artifacts
pub const INDEX_FILE_NAME: &str = "index.html";

/// Last path segment of a key
pub fn key_basename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// True when the key points at an index document rather than an artifact
pub fn is_index_key(key: &str) -> bool {
    key_basename(key) == INDEX_FILE_NAME
}

/// Render the index page for `keys`, one anchor per key in iteration order.
///
/// Output is byte-for-byte reproducible for a given endpoint and key order.
pub fn render_index<I, S>(endpoint: &str, keys: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut html = String::from(INDEX_HEADER);
    for key in keys {
        let key = key.as_ref();
        html.push_str(&format!(
            "\n    <a href=\"{}/{}\">{}</a>",
            endpoint,
            key,
            key_basename(key)
        ));
    }
    html.push_str(INDEX_FOOTER);
    html
}
