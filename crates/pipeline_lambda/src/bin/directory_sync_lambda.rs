use lambda_runtime::{service_fn, Error, LambdaEvent};
use pipeline_core::contract::LambdaResponse;
use pipeline_lambda::adapters::s3::S3ObjectUploader;
use pipeline_lambda::config::DirectorySyncConfig;
use pipeline_lambda::handlers::directory_sync::handle_sync_event;
use pipeline_lambda::telemetry;
use serde_json::Value;

async fn handle_request(
    event: LambdaEvent<Value>,
    config: &DirectorySyncConfig,
    uploader: &S3ObjectUploader,
) -> Result<LambdaResponse, Error> {
    let span = tracing::info_span!("directory_sync", request_id = %event.context.request_id);
    Ok(span.in_scope(|| handle_sync_event(event.payload, config, uploader)))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    telemetry::init()?;
    let config = DirectorySyncConfig::from_env();
    let uploader = S3ObjectUploader::from_default_config().await;
    lambda_runtime::run(service_fn(|event| handle_request(event, &config, &uploader))).await
}
