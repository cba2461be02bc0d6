//! Request bodies derived from the base insert payload

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::picklist::Record;

/// Composite sObject collection insert: one record tagged with its type
pub fn composite_sobjects(object_name: &str, create: &Record) -> Value {
    let mut record = Record::new();
    record.insert("attributes".to_string(), json!({ "type": object_name }));
    for (name, value) in create {
        record.insert(name.clone(), value.clone());
    }

    json!({
        "allOrNone": false,
        "records": [Value::Object(record)],
    })
}

/// Composite request with a single POST sub-request
pub fn composite_request(object_name: &str, create: &Record, api_version: &str) -> Value {
    json!({
        "allOrNone": false,
        "compositeRequest": [
            {
                "method": "POST",
                "url": format!("/services/data/v{}/sobjects/{}", api_version, object_name),
                "referenceId": "ref1",
                "body": Value::Object(create.clone()),
            }
        ],
    })
}

/// Bulk API 2.0 ingest operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BulkOperation {
    Insert,
    Upsert,
}

/// Body of a Bulk API 2.0 "create job" request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkJobRequest {
    pub object: String,
    pub operation: BulkOperation,
    pub content_type: String,
    pub line_ending: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id_field_name: Option<String>,
}

impl BulkJobRequest {
    /// CSV job with LF line endings
    pub fn new(object: impl Into<String>, operation: BulkOperation) -> Self {
        Self {
            object: object.into(),
            operation,
            content_type: "CSV".to_string(),
            line_ending: "LF".to_string(),
            external_id_field_name: None,
        }
    }

    /// Upsert job keyed on `external_field`
    pub fn upsert(object: impl Into<String>, external_field: impl Into<String>) -> Self {
        let mut job = Self::new(object, BulkOperation::Upsert);
        job.external_id_field_name = Some(external_field.into());
        job
    }
}

/// Header line: field names in payload order
pub fn csv_header(create: &Record) -> String {
    create.keys().map(String::as_str).collect::<Vec<_>>().join(",")
}

/// Data line: strings double-quoted, everything else literal, null empty.
/// Illustrative only; embedded quotes and commas are not escaped.
pub fn csv_row(create: &Record) -> String {
    create
        .values()
        .map(|value| match value {
            Value::String(s) => format!("\"{}\"", s),
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(",")
}
