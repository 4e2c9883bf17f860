use pipeline_core::contract::{
    normalize_proxy_event, request_summary, respond, CommentData, CommentFields, CommentRequest,
    LambdaResponse, INVALID_OPERATION_MESSAGE,
};
use pipeline_core::error::HandlerError;
use pipeline_core::record::{CommentRecord, CommentUpdate};
use serde_json::Value;

use crate::adapters::comment_table::CommentTable;

pub const COMMENT_NOT_FOUND_MESSAGE: &str = "Comment not found";

/// Decodes the event, runs the requested operation against `table` and maps
/// every outcome to the response envelope.
pub fn handle_comment_event(event: Value, table: &dyn CommentTable) -> LambdaResponse {
    match dispatch(event, table) {
        Ok(response) => response,
        Err(error @ HandlerError::NotFound(_)) => {
            tracing::info!(component = "comment_store", outcome = %error, "comment_missing");
            error.into_response()
        }
        Err(error) => {
            tracing::error!(
                component = "comment_store",
                status_code = error.status_code(),
                error = %error,
                "request_failed"
            );
            error.into_response()
        }
    }
}

fn dispatch(event: Value, table: &dyn CommentTable) -> Result<LambdaResponse, HandlerError> {
    let payload = normalize_proxy_event(event).map_err(|message| {
        tracing::debug!(component = "comment_store", error = %message, "malformed_event");
        HandlerError::ClientError(INVALID_OPERATION_MESSAGE.to_string())
    })?;
    let request = CommentRequest::from_payload(&payload)?;
    tracing::debug!(
        component = "comment_store",
        request = %request_summary(&request),
        "request_received"
    );

    match request {
        CommentRequest::Create { fields } => create_comment(table, fields),
        CommentRequest::Read { comment_id } => read_comment(table, &comment_id),
        CommentRequest::Update { comment_id, data } => update_comment(table, &comment_id, &data),
        CommentRequest::Delete { comment_id } => delete_comment(table, &comment_id),
    }
}

/// Stores the caller's attributes as given, plus a generated id and the
/// current time.
pub fn create_comment(
    table: &dyn CommentTable,
    fields: CommentFields,
) -> Result<LambdaResponse, HandlerError> {
    let record = CommentRecord::stamp_new(fields);
    tracing::debug!(
        component = "comment_store",
        comment_id = %record.comment_id,
        timestamp = %record.timestamp,
        "creating_comment"
    );
    table.put_item(&record)?;

    tracing::info!(component = "comment_store", comment_id = %record.comment_id, "comment_created");
    Ok(respond(200, "Comment created successfully"))
}

pub fn read_comment(
    table: &dyn CommentTable,
    comment_id: &str,
) -> Result<LambdaResponse, HandlerError> {
    tracing::debug!(component = "comment_store", comment_id, "reading_comment");
    match table.get_item(comment_id)? {
        Some(record) => Ok(respond(200, record)),
        None => Err(HandlerError::NotFound(COMMENT_NOT_FOUND_MESSAGE.to_string())),
    }
}

/// Overwrites `name`, `comment` and `timestamp` only. A missing record is
/// created by the table rather than reported.
pub fn update_comment(
    table: &dyn CommentTable,
    comment_id: &str,
    data: &CommentData,
) -> Result<LambdaResponse, HandlerError> {
    let update = CommentUpdate::stamp_now(data);
    tracing::debug!(
        component = "comment_store",
        comment_id,
        timestamp = %update.timestamp,
        "updating_comment"
    );
    table.update_item(comment_id, &update)?;

    tracing::info!(component = "comment_store", comment_id, "comment_updated");
    Ok(respond(200, "Comment updated successfully"))
}

pub fn delete_comment(
    table: &dyn CommentTable,
    comment_id: &str,
) -> Result<LambdaResponse, HandlerError> {
    tracing::debug!(component = "comment_store", comment_id, "deleting_comment");
    table.delete_item(comment_id)?;

    tracing::info!(component = "comment_store", comment_id, "comment_deleted");
    Ok(respond(200, "Comment deleted successfully"))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use chrono::DateTime;
    use pipeline_core::error::StoreError;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum TableCall {
        Get(String),
        Put(CommentRecord),
        Update(String, CommentUpdate),
        Delete(String),
    }

    struct RecordingTable {
        calls: Mutex<Vec<TableCall>>,
        stored: Option<CommentRecord>,
        failure: Option<StoreError>,
    }

    impl RecordingTable {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                stored: None,
                failure: None,
            }
        }

        fn holding(record: CommentRecord) -> Self {
            Self {
                stored: Some(record),
                ..Self::new()
            }
        }

        fn failing_with(failure: StoreError) -> Self {
            Self {
                failure: Some(failure),
                ..Self::new()
            }
        }

        fn calls(&self) -> Vec<TableCall> {
            self.calls.lock().expect("poisoned mutex").clone()
        }

        fn record(&self, call: TableCall) -> Result<(), StoreError> {
            self.calls.lock().expect("poisoned mutex").push(call);
            match &self.failure {
                Some(failure) => Err(failure.clone()),
                None => Ok(()),
            }
        }
    }

    impl CommentTable for RecordingTable {
        fn get_item(&self, comment_id: &str) -> Result<Option<CommentRecord>, StoreError> {
            self.record(TableCall::Get(comment_id.to_string()))?;
            Ok(self
                .stored
                .clone()
                .filter(|record| record.comment_id == comment_id))
        }

        fn put_item(&self, record: &CommentRecord) -> Result<(), StoreError> {
            self.record(TableCall::Put(record.clone()))
        }

        fn update_item(&self, comment_id: &str, update: &CommentUpdate) -> Result<(), StoreError> {
            self.record(TableCall::Update(comment_id.to_string(), update.clone()))
        }

        fn delete_item(&self, comment_id: &str) -> Result<(), StoreError> {
            self.record(TableCall::Delete(comment_id.to_string()))
        }
    }

    fn stored_record() -> CommentRecord {
        CommentRecord {
            comment_id: "123".to_string(),
            timestamp: "2024-08-25T12:00:00.000000Z".to_string(),
            fields: BTreeMap::from([
                ("name".to_string(), json!("John Doe")),
                ("comment".to_string(), json!("This is a test comment")),
            ]),
        }
    }

    #[test]
    fn create_stamps_server_side_id_and_timestamp() {
        let table = RecordingTable::new();
        let response = handle_comment_event(
            json!({
                "operation": "create",
                "comment_data": {
                    "comment_id": "123",
                    "name": "John Doe",
                    "comment": "This is a test comment",
                    "timestamp": "2024-08-25T12:00:00Z"
                }
            }),
            &table,
        );

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, "\"Comment created successfully\"");

        let calls = table.calls();
        assert_eq!(calls.len(), 1);
        let TableCall::Put(record) = &calls[0] else {
            panic!("expected a put call, got {calls:?}");
        };
        assert_ne!(record.comment_id, "123");
        assert!(uuid::Uuid::parse_str(&record.comment_id).is_ok());
        assert!(DateTime::parse_from_rfc3339(&record.timestamp).is_ok());
        assert_eq!(record.text("name"), Some("John Doe"));
        assert_eq!(record.text("comment"), Some("This is a test comment"));
        assert_eq!(record.fields.len(), 2);
    }

    #[test]
    fn create_stores_partial_or_oddly_typed_data_as_given() {
        for comment_data in [json!({"comment": "hi"}), json!({"name": 42, "comment": "hi"})] {
            let table = RecordingTable::new();
            let response = handle_comment_event(
                json!({"operation": "create", "comment_data": comment_data.clone()}),
                &table,
            );

            assert_eq!(response.status_code, 200);
            assert_eq!(response.body, "\"Comment created successfully\"");
            let calls = table.calls();
            let [TableCall::Put(record)] = calls.as_slice() else {
                panic!("expected a single put call, got {calls:?}");
            };
            let stored = serde_json::to_value(&record.fields).expect("fields serialize");
            assert_eq!(stored, comment_data);
        }
    }

    #[test]
    fn create_without_comment_data_fails_before_touching_the_table() {
        let table = RecordingTable::new();
        let response = handle_comment_event(json!({"operation": "create"}), &table);

        assert_eq!(response.status_code, 500);
        assert_eq!(response.body, "\"Error: missing field `comment_data`\"");
        assert!(table.calls().is_empty());
    }

    #[test]
    fn read_returns_the_stored_record() {
        let table = RecordingTable::holding(stored_record());
        let response =
            handle_comment_event(json!({"operation": "read", "comment_id": "123"}), &table);

        assert_eq!(response.status_code, 200);
        let body: CommentRecord =
            serde_json::from_str(&response.body).expect("body should be a record");
        assert_eq!(body, stored_record());
        assert_eq!(table.calls(), vec![TableCall::Get("123".to_string())]);
    }

    #[test]
    fn read_of_unknown_id_is_not_found() {
        let table = RecordingTable::holding(stored_record());
        let response =
            handle_comment_event(json!({"operation": "read", "comment_id": "999"}), &table);

        assert_eq!(response.status_code, 404);
        assert_eq!(response.body, "\"Comment not found\"");
    }

    #[test]
    fn update_sets_only_name_comment_and_fresh_timestamp() {
        let table = RecordingTable::new();
        let response = handle_comment_event(
            json!({
                "operation": "update",
                "comment_id": "123",
                "comment_data": {
                    "name": "Jane Doe",
                    "comment": "This is an updated test comment",
                    "timestamp": "2024-08-26T12:00:00Z"
                }
            }),
            &table,
        );

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, "\"Comment updated successfully\"");

        let calls = table.calls();
        let [TableCall::Update(comment_id, update)] = calls.as_slice() else {
            panic!("expected a single update call, got {calls:?}");
        };
        assert_eq!(comment_id, "123");
        assert_eq!(update.name, "Jane Doe");
        assert_eq!(update.comment, "This is an updated test comment");
        assert_ne!(update.timestamp, "2024-08-26T12:00:00Z");
        assert!(DateTime::parse_from_rfc3339(&update.timestamp).is_ok());
    }

    #[test]
    fn delete_is_unconditional() {
        let table = RecordingTable::new();
        let response =
            handle_comment_event(json!({"operation": "delete", "comment_id": "123"}), &table);

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, "\"Comment deleted successfully\"");
        assert_eq!(table.calls(), vec![TableCall::Delete("123".to_string())]);
    }

    #[test]
    fn unknown_operation_is_rejected_without_store_calls() {
        let table = RecordingTable::new();
        let response = handle_comment_event(json!({"operation": "truncate"}), &table);

        assert_eq!(response.status_code, 400);
        assert_eq!(response.body, "\"Invalid operation\"");
        assert!(table.calls().is_empty());
    }

    #[test]
    fn non_object_event_is_a_bad_request() {
        let table = RecordingTable::new();
        let response = handle_comment_event(json!("create"), &table);

        assert_eq!(response.status_code, 400);
        assert!(table.calls().is_empty());
    }

    #[test]
    fn service_failure_is_reported_as_client_error_message() {
        let table = RecordingTable::failing_with(StoreError::Service(
            "Requested resource not found".to_string(),
        ));
        let response = handle_comment_event(
            json!({
                "operation": "create",
                "comment_data": {"name": "John Doe", "comment": "hi"}
            }),
            &table,
        );

        assert_eq!(response.status_code, 500);
        assert_eq!(
            response.body,
            "\"ClientError: Requested resource not found\""
        );
    }

    #[test]
    fn transport_failure_is_reported_as_unexpected() {
        let table = RecordingTable::failing_with(StoreError::Other("dispatch failure".to_string()));
        let response =
            handle_comment_event(json!({"operation": "read", "comment_id": "123"}), &table);

        assert_eq!(response.status_code, 500);
        assert_eq!(response.body, "\"Error: dispatch failure\"");
    }

    #[test]
    fn read_service_failure_is_not_reported_as_missing() {
        let table = RecordingTable::failing_with(StoreError::Service(
            "Requested resource not found".to_string(),
        ));
        let response =
            handle_comment_event(json!({"operation": "read", "comment_id": "123"}), &table);

        assert_eq!(response.status_code, 500);
        assert_eq!(
            response.body,
            "\"ClientError: Requested resource not found\""
        );
        assert_eq!(table.calls(), vec![TableCall::Get("123".to_string())]);
    }

    #[test]
    fn update_store_failure_is_a_server_error() {
        let table = RecordingTable::failing_with(StoreError::Service(
            "The conditional request failed".to_string(),
        ));
        let response = handle_comment_event(
            json!({
                "operation": "update",
                "comment_id": "123",
                "comment_data": {"name": "Jane Doe", "comment": "edited"}
            }),
            &table,
        );

        assert_eq!(response.status_code, 500);
        assert_eq!(
            response.body,
            "\"ClientError: The conditional request failed\""
        );
        assert_eq!(table.calls().len(), 1);
    }

    #[test]
    fn delete_store_failure_is_a_server_error() {
        let table = RecordingTable::failing_with(StoreError::Other("connection reset".to_string()));
        let response =
            handle_comment_event(json!({"operation": "delete", "comment_id": "123"}), &table);

        assert_eq!(response.status_code, 500);
        assert_eq!(response.body, "\"Error: connection reset\"");
        assert_eq!(table.calls(), vec![TableCall::Delete("123".to_string())]);
    }

    #[test]
    fn update_without_comment_data_fails_before_touching_the_table() {
        let table = RecordingTable::new();
        let response =
            handle_comment_event(json!({"operation": "update", "comment_id": "123"}), &table);

        assert_eq!(response.status_code, 500);
        assert_eq!(response.body, "\"Error: missing field `comment_data`\"");
        assert!(table.calls().is_empty());
    }

    #[test]
    fn accepts_proxy_wrapped_request() {
        let table = RecordingTable::new();
        let response = handle_comment_event(
            json!({"body": "{\"operation\":\"delete\",\"comment_id\":\"abc\"}"}),
            &table,
        );

        assert_eq!(response.status_code, 200);
        assert_eq!(table.calls(), vec![TableCall::Delete("abc".to_string())]);
    }
}
