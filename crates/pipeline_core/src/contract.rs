use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::HandlerError;

pub const INVALID_OPERATION_MESSAGE: &str = "Invalid operation";

/// Response envelope returned by every handler invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LambdaResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl LambdaResponse {
    /// Envelope whose body is sent as-is, without JSON encoding.
    pub fn text(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }
}

/// Wraps a status code and a body into the response envelope. The body is
/// always JSON-serialized, so plain strings arrive quoted.
pub fn respond(status_code: u16, body: impl Serialize) -> LambdaResponse {
    match serde_json::to_string(&body) {
        Ok(body) => LambdaResponse { status_code, body },
        Err(error) => LambdaResponse {
            status_code: 500,
            body: Value::String(format!("Error: failed to serialize response: {error}"))
                .to_string(),
        },
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncRequest {
    pub project_name: String,
    pub s3_bucket: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "create" => Some(Self::Create),
            "read" => Some(Self::Read),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Attributes of a new comment exactly as the caller sent them.
pub type CommentFields = BTreeMap<String, Value>;

/// Fields an update needs. Anything beyond `name` and `comment` is carried
/// in `extra` and not written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentData {
    pub name: String,
    pub comment: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A decoded comment-store request, one variant per operation.
#[derive(Debug, Clone, PartialEq)]
pub enum CommentRequest {
    Create {
        fields: CommentFields,
    },
    Read {
        comment_id: String,
    },
    Update {
        comment_id: String,
        data: CommentData,
    },
    Delete {
        comment_id: String,
    },
}

impl CommentRequest {
    /// Decodes a request object. An unrecognized or missing `operation` is a
    /// client error; a recognized operation lacking a field it needs is an
    /// unexpected error.
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, HandlerError> {
        let operation = payload
            .get("operation")
            .and_then(Value::as_str)
            .and_then(Operation::parse)
            .ok_or_else(|| HandlerError::ClientError(INVALID_OPERATION_MESSAGE.to_string()))?;

        match operation {
            Operation::Create => Ok(Self::Create {
                fields: comment_fields(payload)?,
            }),
            Operation::Read => Ok(Self::Read {
                comment_id: comment_id(payload)?,
            }),
            Operation::Update => Ok(Self::Update {
                comment_id: comment_id(payload)?,
                data: comment_data(payload)?,
            }),
            Operation::Delete => Ok(Self::Delete {
                comment_id: comment_id(payload)?,
            }),
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Self::Create { .. } => Operation::Create,
            Self::Read { .. } => Operation::Read,
            Self::Update { .. } => Operation::Update,
            Self::Delete { .. } => Operation::Delete,
        }
    }
}

fn comment_id(payload: &Map<String, Value>) -> Result<String, HandlerError> {
    payload
        .get("comment_id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| HandlerError::UnexpectedError("missing field `comment_id`".to_string()))
}

fn raw_comment_data(payload: &Map<String, Value>) -> Result<&Value, HandlerError> {
    payload
        .get("comment_data")
        .ok_or_else(|| HandlerError::UnexpectedError("missing field `comment_data`".to_string()))
}

/// Any object is accepted; its attributes are stored as given.
fn comment_fields(payload: &Map<String, Value>) -> Result<CommentFields, HandlerError> {
    match raw_comment_data(payload)? {
        Value::Object(fields) => Ok(fields
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()),
        _ => Err(HandlerError::UnexpectedError(
            "invalid comment_data: expected a JSON object".to_string(),
        )),
    }
}

fn comment_data(payload: &Map<String, Value>) -> Result<CommentData, HandlerError> {
    serde_json::from_value(raw_comment_data(payload)?.clone())
        .map_err(|error| HandlerError::UnexpectedError(format!("invalid comment_data: {error}")))
}

/// Unwraps an API Gateway proxy event to the request object it carries.
/// Events without a `body` field are taken as the request itself.
pub fn normalize_proxy_event(event: Value) -> Result<Map<String, Value>, String> {
    let Value::Object(mut object) = event else {
        return Err("Request payload must be a JSON object".to_string());
    };

    let Some(body) = object.remove("body") else {
        return Ok(object);
    };

    match body {
        Value::Null => Ok(Map::new()),
        Value::Object(inner) => Ok(inner),
        Value::String(text) => match serde_json::from_str(&text) {
            Ok(Value::Object(inner)) => Ok(inner),
            Ok(_) => Err("Request body must be a JSON object".to_string()),
            Err(error) => Err(format!("Malformed JSON body: {error}")),
        },
        _ => Err("Request body must be a JSON object".to_string()),
    }
}

/// Structured log detail for a decoded request, without comment text.
pub fn request_summary(request: &CommentRequest) -> Value {
    match request {
        CommentRequest::Create { fields } => json!({
            "operation": request.operation().as_str(),
            "name": fields.get("name"),
            "fields": fields.keys().collect::<Vec<_>>(),
        }),
        CommentRequest::Read { comment_id } | CommentRequest::Delete { comment_id } => json!({
            "operation": request.operation().as_str(),
            "comment_id": comment_id,
        }),
        CommentRequest::Update { comment_id, data } => json!({
            "operation": request.operation().as_str(),
            "comment_id": comment_id,
            "name": data.name,
        }),
    }
}
