use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::contract::{CommentData, CommentFields};

pub const COMMENT_ID_ATTRIBUTE: &str = "comment_id";
pub const NAME_ATTRIBUTE: &str = "name";
pub const COMMENT_ATTRIBUTE: &str = "comment";
pub const TIMESTAMP_ATTRIBUTE: &str = "timestamp";

/// Partial-field update applied by the update operation. Only these three
/// attributes may change.
pub const UPDATE_EXPRESSION: &str = "set #name = :n, #comment = :c, #timestamp = :t";

/// One guestbook entry, keyed by `comment_id`. Every other attribute the
/// caller supplied (usually `name` and `comment`) lives in `fields`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentRecord {
    pub comment_id: String,
    pub timestamp: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl CommentRecord {
    /// Builds a new record from caller data. Caller-supplied `comment_id` and
    /// `timestamp` values are discarded in favour of the given ones.
    pub fn create(mut fields: CommentFields, comment_id: String, timestamp: String) -> Self {
        fields.remove(COMMENT_ID_ATTRIBUTE);
        fields.remove(TIMESTAMP_ATTRIBUTE);

        Self {
            comment_id,
            timestamp,
            fields,
        }
    }

    /// Record with a fresh random identifier and the current time.
    pub fn stamp_new(fields: CommentFields) -> Self {
        Self::create(fields, new_comment_id(), current_timestamp())
    }

    /// Empty record for `comment_id`, the state an upsert starts from.
    pub fn blank(comment_id: impl Into<String>) -> Self {
        Self {
            comment_id: comment_id.into(),
            timestamp: String::new(),
            fields: BTreeMap::new(),
        }
    }

    pub fn text(&self, attribute: &str) -> Option<&str> {
        self.fields.get(attribute).and_then(Value::as_str)
    }

    pub fn apply(&mut self, update: &CommentUpdate) {
        self.fields
            .insert(NAME_ATTRIBUTE.to_string(), Value::String(update.name.clone()));
        self.fields.insert(
            COMMENT_ATTRIBUTE.to_string(),
            Value::String(update.comment.clone()),
        );
        self.timestamp = update.timestamp.clone();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentUpdate {
    pub name: String,
    pub comment: String,
    pub timestamp: String,
}

impl CommentUpdate {
    pub fn stamp_now(data: &CommentData) -> Self {
        Self {
            name: data.name.clone(),
            comment: data.comment.clone(),
            timestamp: current_timestamp(),
        }
    }

    /// `#placeholder -> attribute name` pairs for [`UPDATE_EXPRESSION`].
    pub fn attribute_names() -> [(&'static str, &'static str); 3] {
        [
            ("#name", NAME_ATTRIBUTE),
            ("#comment", COMMENT_ATTRIBUTE),
            ("#timestamp", TIMESTAMP_ATTRIBUTE),
        ]
    }

    /// `:placeholder -> value` pairs for [`UPDATE_EXPRESSION`].
    pub fn attribute_values(&self) -> [(&'static str, &str); 3] {
        [
            (":n", self.name.as_str()),
            (":c", self.comment.as_str()),
            (":t", self.timestamp.as_str()),
        ]
    }
}

pub fn new_comment_id() -> String {
    Uuid::new_v4().to_string()
}

/// RFC 3339 UTC with fixed microsecond precision, so string order matches
/// time order.
pub fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
