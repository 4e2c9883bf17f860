use lambda_runtime::{service_fn, Error, LambdaEvent};
use pipeline_core::contract::LambdaResponse;
use pipeline_lambda::adapters::dynamodb::DynamoCommentTable;
use pipeline_lambda::config::CommentStoreConfig;
use pipeline_lambda::handlers::comment_store::handle_comment_event;
use pipeline_lambda::telemetry;
use serde_json::Value;

async fn handle_request(
    event: LambdaEvent<Value>,
    table: &DynamoCommentTable,
) -> Result<LambdaResponse, Error> {
    let span = tracing::info_span!(
        "comment_store",
        request_id = %event.context.request_id,
        table = table.table_name()
    );
    Ok(span.in_scope(|| handle_comment_event(event.payload, table)))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    telemetry::init()?;
    let config = CommentStoreConfig::from_env();
    let table = DynamoCommentTable::from_default_config(config.table_name).await;
    lambda_runtime::run(service_fn(|event| handle_request(event, &table))).await
}
