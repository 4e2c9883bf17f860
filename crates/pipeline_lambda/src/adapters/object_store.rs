use std::path::Path;

use pipeline_core::error::StoreError;

pub trait ObjectUploader {
    /// Uploads the full content of `local_path` to `bucket` under `key`.
    fn upload_file(&self, local_path: &Path, bucket: &str, key: &str) -> Result<(), StoreError>;
}
