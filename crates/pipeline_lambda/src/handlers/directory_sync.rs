use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use pipeline_core::contract::{normalize_proxy_event, LambdaResponse, SyncRequest};
use pipeline_core::error::StoreError;
use pipeline_core::storage_keys::{object_key_for, object_uri};
use serde_json::Value;
use walkdir::{DirEntry, WalkDir};

use crate::adapters::object_store::ObjectUploader;
use crate::config::DirectorySyncConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    pub source_directory: PathBuf,
    pub bucket: String,
    pub files_uploaded: usize,
}

pub fn handle_sync_event(
    event: Value,
    config: &DirectorySyncConfig,
    uploader: &dyn ObjectUploader,
) -> LambdaResponse {
    tracing::debug!(component = "directory_sync", event = %event, "request_received");

    let request = match decode_request(event) {
        Ok(value) => value,
        Err(message) => {
            tracing::error!(component = "directory_sync", error = %message, "request_rejected");
            return LambdaResponse::text(500, message);
        }
    };

    let source_directory = resolve_source_directory(
        config.advisory_source_directory.as_deref(),
        &config.scratch_directory,
    );

    let started_at = Instant::now();
    match sync_directory(&source_directory, &request.s3_bucket, uploader) {
        Ok(summary) => {
            let duration_ms = started_at.elapsed().as_millis() as u64;
            tracing::info!(
                component = "directory_sync",
                project_name = %request.project_name,
                source_directory = %summary.source_directory.display(),
                bucket = %summary.bucket,
                files_uploaded = summary.files_uploaded,
                duration_ms,
                "sync_completed"
            );
            LambdaResponse::text(
                200,
                format!(
                    "Files from {} uploaded successfully to {}.",
                    summary.source_directory.display(),
                    summary.bucket
                ),
            )
        }
        Err(error) => {
            tracing::error!(
                component = "directory_sync",
                project_name = %request.project_name,
                source_directory = %source_directory.display(),
                bucket = %request.s3_bucket,
                error = %error,
                "sync_failed"
            );
            LambdaResponse::text(500, error.to_string())
        }
    }
}

fn decode_request(event: Value) -> Result<SyncRequest, String> {
    let payload = normalize_proxy_event(event)?;
    serde_json::from_value(Value::Object(payload))
        .map_err(|error| format!("Malformed request: {error}"))
}

/// The advisory directory is used only when its entries can be listed;
/// otherwise the scratch directory takes its place.
pub fn resolve_source_directory(advisory: Option<&Path>, scratch: &Path) -> PathBuf {
    let Some(path) = advisory else {
        return scratch.to_path_buf();
    };

    match fs::read_dir(path) {
        Ok(_) => path.to_path_buf(),
        Err(error) => {
            tracing::debug!(
                component = "directory_sync",
                advisory_directory = %path.display(),
                scratch_directory = %scratch.display(),
                error = %error,
                "source directory is not accessible, using scratch directory instead"
            );
            scratch.to_path_buf()
        }
    }
}

/// Uploads every regular file under `source_directory`, one put per file.
/// Links to files are uploaded with the target's content; linked directories
/// are not descended into. The first failure aborts the walk; files already
/// uploaded stay uploaded.
pub fn sync_directory(
    source_directory: &Path,
    bucket: &str,
    uploader: &dyn ObjectUploader,
) -> Result<SyncSummary, StoreError> {
    let mut files_uploaded = 0usize;

    for entry in WalkDir::new(source_directory).follow_links(false) {
        let entry = entry.map_err(|error| StoreError::Other(error.to_string()))?;
        if !is_uploadable(&entry)? {
            continue;
        }

        let key = object_key_for(source_directory, entry.path()).ok_or_else(|| {
            StoreError::Other(format!(
                "{} is not under {}",
                entry.path().display(),
                source_directory.display()
            ))
        })?;

        tracing::debug!(
            component = "directory_sync",
            local_path = %entry.path().display(),
            destination = %object_uri(bucket, &key),
            "uploading"
        );
        uploader.upload_file(entry.path(), bucket, &key)?;
        files_uploaded += 1;
    }

    Ok(SyncSummary {
        source_directory: source_directory.to_path_buf(),
        bucket: bucket.to_string(),
        files_uploaded,
    })
}

fn is_uploadable(entry: &DirEntry) -> Result<bool, StoreError> {
    let file_type = entry.file_type();
    if !file_type.is_symlink() {
        return Ok(file_type.is_file());
    }

    let target = fs::metadata(entry.path()).map_err(|error| {
        StoreError::Other(format!("{}: {error}", entry.path().display()))
    })?;
    Ok(target.is_file())
}
