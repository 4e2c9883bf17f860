use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use pipeline_core::error::StoreError;

pub mod comment_table;
pub mod dynamodb;
pub mod object_store;
pub mod s3;

/// Splits an SDK failure into a service verdict or everything else. The
/// smithy error types are shared by all service crates.
pub(crate) fn store_error_from_sdk<E, R>(error: SdkError<E, R>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match error.as_service_error() {
        Some(service_error) => StoreError::Service(
            service_error
                .message()
                .or_else(|| service_error.code())
                .map(str::to_string)
                .unwrap_or_else(|| service_error.to_string()),
        ),
        None => StoreError::Other(DisplayErrorContext(&error).to_string()),
    }
}
