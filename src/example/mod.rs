//! Example payload generation from describe metadata
//!
//! Builds, for one object, a ready-to-edit set of requests: a SOQL query over
//! the visible fields, the smallest insert body the platform accepts, and the
//! update / upsert / composite / bulk requests derived from that body.
//!
//! # Example
//!
//! ```rust
//! use describekit::describe::{FieldDescriptor, FieldType, ObjectDescribe};
//! use describekit::example::synthesize;
//!
//! let describe = ObjectDescribe::new("Case")
//!     .with_field(FieldDescriptor::new("Name", FieldType::String).with_nillable(false));
//!
//! let examples = synthesize("Case", &describe);
//! assert_eq!(examples.query, "SELECT Name FROM Case LIMIT 10");
//! assert_eq!(examples.csv(), "Name\n\"Name_exemplo\"");
//! ```

pub mod fields;
pub mod variants;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::describe::ObjectDescribe;
use crate::picklist::Record;

pub use fields::{infer_external_id_field, mandatory_payload, placeholder_value, select_fields};
pub use variants::{BulkJobRequest, BulkOperation};

/// Configuration for example generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleOptions {
    /// Cap on projected fields and on required fields in the insert body
    #[serde(default = "default_max_fields")]
    pub max_fields: usize,
    /// LIMIT of the example query
    #[serde(default = "default_query_limit")]
    pub query_limit: usize,
    /// REST API version used in composite sub-request URLs
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Record id placeholder for the update example
    #[serde(default = "default_update_record_id")]
    pub update_record_id: String,
    /// External id value placeholder for the upsert example
    #[serde(default = "default_upsert_external_value")]
    pub upsert_external_value: String,
    /// Upsert field name used when none can be inferred
    #[serde(default = "default_fallback_external_field")]
    pub fallback_external_field: String,
}

fn default_max_fields() -> usize {
    8
}

fn default_query_limit() -> usize {
    10
}

fn default_api_version() -> String {
    "61.0".to_string()
}

fn default_update_record_id() -> String {
    "a0AXXXXXXXXXXXX".to_string()
}

fn default_upsert_external_value() -> String {
    "EXT-0001".to_string()
}

fn default_fallback_external_field() -> String {
    "ExternalId__c".to_string()
}

impl Default for ExampleOptions {
    fn default() -> Self {
        Self {
            max_fields: default_max_fields(),
            query_limit: default_query_limit(),
            api_version: default_api_version(),
            update_record_id: default_update_record_id(),
            upsert_external_value: default_upsert_external_value(),
            fallback_external_field: default_fallback_external_field(),
        }
    }
}

/// PATCH of an existing record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExample {
    pub record_id: String,
    pub payload: Record,
}

/// PATCH by external id
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertExample {
    /// Inferred key field, if the describe has a candidate
    pub external_field: Option<String>,
    pub external_value: String,
    pub payload: Record,
}

/// Everything generated for one object
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleSet {
    pub object_name: String,
    pub query: String,
    pub create: Record,
    pub update: UpdateExample,
    pub upsert: UpsertExample,
    pub composite_sobjects: Value,
    pub composite_request: Value,
    pub bulk_job: BulkJobRequest,
    /// Upsert job keyed on [`ExampleSet::upsert_external_field`]
    pub bulk_upsert_job: BulkJobRequest,
    pub csv_header: String,
    pub csv_row: String,
    #[serde(skip)]
    fallback_external_field: String,
}

impl ExampleSet {
    /// Upsert key, falling back to the configured generic name
    pub fn upsert_external_field(&self) -> &str {
        self.upsert
            .external_field
            .as_deref()
            .unwrap_or(&self.fallback_external_field)
    }

    /// Bulk upload body: header and one data line
    pub fn csv(&self) -> String {
        format!("{}\n{}", self.csv_header, self.csv_row)
    }
}

/// Generate examples with default options
pub fn synthesize(object_name: &str, describe: &ObjectDescribe) -> ExampleSet {
    synthesize_with_options(object_name, describe, &ExampleOptions::default())
}

/// Generate examples with custom options
pub fn synthesize_with_options(
    object_name: &str,
    describe: &ObjectDescribe,
    options: &ExampleOptions,
) -> ExampleSet {
    let fields = &describe.fields;

    let projection = select_fields(fields, options.max_fields);
    let query = format!(
        "SELECT {} FROM {} LIMIT {}",
        projection.join(", "),
        object_name,
        options.query_limit
    );

    let create = mandatory_payload(fields, options.max_fields);
    let external_field = infer_external_id_field(fields);
    let upsert_key = external_field
        .as_deref()
        .unwrap_or(&options.fallback_external_field);
    let bulk_upsert_job = BulkJobRequest::upsert(object_name, upsert_key);
    debug!(
        object = object_name,
        create_fields = create.len(),
        external_field = external_field.as_deref().unwrap_or(""),
        "synthesize: done"
    );

    ExampleSet {
        object_name: object_name.to_string(),
        query,
        update: UpdateExample {
            record_id: options.update_record_id.clone(),
            payload: create.clone(),
        },
        upsert: UpsertExample {
            external_field,
            external_value: options.upsert_external_value.clone(),
            payload: create.clone(),
        },
        composite_sobjects: variants::composite_sobjects(object_name, &create),
        composite_request: variants::composite_request(object_name, &create, &options.api_version),
        bulk_job: BulkJobRequest::new(object_name, BulkOperation::Insert),
        bulk_upsert_job,
        csv_header: variants::csv_header(&create),
        csv_row: variants::csv_row(&create),
        create,
        fallback_external_field: options.fallback_external_field.clone(),
    }
}
