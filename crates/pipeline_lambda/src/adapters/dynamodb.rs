use std::collections::HashMap;
use std::future::Future;

use aws_sdk_dynamodb::types::AttributeValue;
use pipeline_core::error::StoreError;
use pipeline_core::record::{
    CommentRecord, CommentUpdate, COMMENT_ID_ATTRIBUTE, TIMESTAMP_ATTRIBUTE, UPDATE_EXPRESSION,
};
use serde_json::{Map, Number, Value};

use crate::adapters::comment_table::CommentTable;
use crate::adapters::store_error_from_sdk;

pub type Item = HashMap<String, AttributeValue>;

#[derive(Clone)]
pub struct DynamoCommentTable {
    client: aws_sdk_dynamodb::Client,
    table_name: String,
}

impl DynamoCommentTable {
    pub fn new(client: aws_sdk_dynamodb::Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Client built from the default credential and region chain.
    pub async fn from_default_config(table_name: impl Into<String>) -> Self {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(aws_sdk_dynamodb::Client::new(&aws_config), table_name)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

impl CommentTable for DynamoCommentTable {
    fn get_item(&self, comment_id: &str) -> Result<Option<CommentRecord>, StoreError> {
        let request = self
            .client
            .get_item()
            .table_name(self.table_name.clone())
            .key(COMMENT_ID_ATTRIBUTE, AttributeValue::S(comment_id.to_string()));

        let output = block_on(async move { request.send().await.map_err(store_error_from_sdk) })?;
        output.item().map(item_to_record).transpose()
    }

    fn put_item(&self, record: &CommentRecord) -> Result<(), StoreError> {
        let request = self
            .client
            .put_item()
            .table_name(self.table_name.clone())
            .set_item(Some(record_to_item(record)));

        block_on(async move {
            request
                .send()
                .await
                .map(|_| ())
                .map_err(store_error_from_sdk)
        })
    }

    fn update_item(&self, comment_id: &str, update: &CommentUpdate) -> Result<(), StoreError> {
        let mut request = self
            .client
            .update_item()
            .table_name(self.table_name.clone())
            .key(COMMENT_ID_ATTRIBUTE, AttributeValue::S(comment_id.to_string()))
            .update_expression(UPDATE_EXPRESSION);
        for (placeholder, attribute) in CommentUpdate::attribute_names() {
            request = request.expression_attribute_names(placeholder, attribute);
        }
        for (placeholder, value) in update.attribute_values() {
            request = request
                .expression_attribute_values(placeholder, AttributeValue::S(value.to_string()));
        }

        block_on(async move {
            request
                .send()
                .await
                .map(|_| ())
                .map_err(store_error_from_sdk)
        })
    }

    fn delete_item(&self, comment_id: &str) -> Result<(), StoreError> {
        let request = self
            .client
            .delete_item()
            .table_name(self.table_name.clone())
            .key(COMMENT_ID_ATTRIBUTE, AttributeValue::S(comment_id.to_string()));

        block_on(async move {
            request
                .send()
                .await
                .map(|_| ())
                .map_err(store_error_from_sdk)
        })
    }
}

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

pub fn record_to_item(record: &CommentRecord) -> Item {
    let mut item: Item = record
        .fields
        .iter()
        .map(|(name, value)| (name.clone(), value_to_attribute(value)))
        .collect();
    item.insert(
        COMMENT_ID_ATTRIBUTE.to_string(),
        AttributeValue::S(record.comment_id.clone()),
    );
    item.insert(
        TIMESTAMP_ATTRIBUTE.to_string(),
        AttributeValue::S(record.timestamp.clone()),
    );
    item
}

/// Only the key and the timestamp must be strings; every other attribute is
/// returned in whatever shape it was stored.
pub fn item_to_record(item: &Item) -> Result<CommentRecord, StoreError> {
    let fields = item
        .iter()
        .filter(|(name, _)| {
            !matches!(name.as_str(), COMMENT_ID_ATTRIBUTE | TIMESTAMP_ATTRIBUTE)
        })
        .filter_map(|(name, attribute)| {
            attribute_to_value(attribute).map(|value| (name.clone(), value))
        })
        .collect();

    Ok(CommentRecord {
        comment_id: string_attribute(item, COMMENT_ID_ATTRIBUTE)?,
        timestamp: string_attribute(item, TIMESTAMP_ATTRIBUTE)?,
        fields,
    })
}

fn string_attribute(item: &Item, name: &str) -> Result<String, StoreError> {
    match item.get(name) {
        Some(AttributeValue::S(value)) => Ok(value.clone()),
        Some(_) => Err(StoreError::Other(format!(
            "stored attribute `{name}` is not a string"
        ))),
        None => Err(StoreError::Other(format!(
            "stored item is missing attribute `{name}`"
        ))),
    }
}

pub fn value_to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(flag) => AttributeValue::Bool(*flag),
        Value::Number(number) => AttributeValue::N(number.to_string()),
        Value::String(text) => AttributeValue::S(text.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(value_to_attribute).collect()),
        Value::Object(fields) => AttributeValue::M(
            fields
                .iter()
                .map(|(name, value)| (name.clone(), value_to_attribute(value)))
                .collect(),
        ),
    }
}

/// Binary attributes have no JSON form and are dropped.
pub fn attribute_to_value(attribute: &AttributeValue) -> Option<Value> {
    match attribute {
        AttributeValue::S(text) => Some(Value::String(text.clone())),
        AttributeValue::N(number) => Some(number_value(number)),
        AttributeValue::Bool(flag) => Some(Value::Bool(*flag)),
        AttributeValue::Null(_) => Some(Value::Null),
        AttributeValue::L(items) => Some(Value::Array(
            items.iter().filter_map(attribute_to_value).collect(),
        )),
        AttributeValue::M(fields) => Some(Value::Object(
            fields
                .iter()
                .filter_map(|(name, attribute)| {
                    attribute_to_value(attribute).map(|value| (name.clone(), value))
                })
                .collect::<Map<String, Value>>(),
        )),
        AttributeValue::Ss(items) => Some(Value::Array(
            items.iter().cloned().map(Value::String).collect(),
        )),
        AttributeValue::Ns(items) => Some(Value::Array(
            items.iter().map(|number| number_value(number)).collect(),
        )),
        _ => None,
    }
}

fn number_value(number: &str) -> Value {
    serde_json::from_str::<Number>(number)
        .map(Value::Number)
        .unwrap_or_else(|_| Value::String(number.to_string()))
}
