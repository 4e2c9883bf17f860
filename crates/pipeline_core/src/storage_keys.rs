use std::path::{Component, Path};

/// Object key for `file` relative to `root`, joined with `/` regardless of
/// the host path separator. Returns `None` when `file` is not under `root`.
pub fn object_key_for(root: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?;
    let segments: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

/// `s3://bucket/key` form used in log lines.
pub fn object_uri(bucket: &str, key: &str) -> String {
    format!("s3://{bucket}/{key}")
}
