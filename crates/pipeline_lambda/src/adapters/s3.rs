use std::path::Path;

use aws_sdk_s3::primitives::ByteStream;
use pipeline_core::error::StoreError;

use crate::adapters::object_store::ObjectUploader;
use crate::adapters::store_error_from_sdk;

#[derive(Clone)]
pub struct S3ObjectUploader {
    s3_client: aws_sdk_s3::Client,
}

impl S3ObjectUploader {
    pub fn new(s3_client: aws_sdk_s3::Client) -> Self {
        Self { s3_client }
    }

    /// Client built from the default credential and region chain.
    pub async fn from_default_config() -> Self {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(aws_sdk_s3::Client::new(&aws_config))
    }
}

impl ObjectUploader for S3ObjectUploader {
    fn upload_file(&self, local_path: &Path, bucket: &str, key: &str) -> Result<(), StoreError> {
        let path = local_path.to_path_buf();
        let bucket = bucket.to_string();
        let object_key = key.to_string();
        let client = self.s3_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let body = ByteStream::from_path(&path).await.map_err(|error| {
                    StoreError::Other(format!("failed to read {}: {error}", path.display()))
                })?;
                client
                    .put_object()
                    .bucket(bucket)
                    .key(object_key)
                    .body(body)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(store_error_from_sdk)
            })
        })
    }
}
