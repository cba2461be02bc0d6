//! Field selection rules for generated examples

use serde_json::{json, Value};
use tracing::debug;

use crate::describe::{FieldDescriptor, FieldType};
use crate::picklist::Record;

/// Name fragments that hint at an alternate key
const EXTERNAL_KEY_HINTS: [&str; 4] = ["external", "codigo", "code", "identifier"];

/// Projection list for the example query: queryable fields in describe
/// order, at most `max`, `Id` when none are left.
pub fn select_fields(fields: &[FieldDescriptor], max: usize) -> Vec<String> {
    let selected: Vec<String> = fields
        .iter()
        .filter(|f| f.is_queryable())
        .take(max)
        .map(|f| f.name.clone())
        .collect();

    if selected.is_empty() {
        return vec!["Id".to_string()];
    }
    selected
}

/// Smallest insert body the platform accepts: every required field, capped
/// at `max`, filled with a placeholder for its type.
///
/// Never empty. Without required fields the first field (or `Name`) is set
/// to `"Exemplo"`.
pub fn mandatory_payload(fields: &[FieldDescriptor], max: usize) -> Record {
    let mut body = Record::new();
    for field in fields.iter().filter(|f| f.is_required_on_create()).take(max) {
        body.insert(field.name.clone(), placeholder_value(field));
    }

    if body.is_empty() {
        let name = fields
            .first()
            .map(|f| f.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("Name");
        debug!(field = name, "no required fields, using fallback payload");
        body.insert(name.to_string(), json!("Exemplo"));
    }
    body
}

/// Example value for a field of the given type
pub fn placeholder_value(field: &FieldDescriptor) -> Value {
    match field.field_type {
        FieldType::String
        | FieldType::TextArea
        | FieldType::Phone
        | FieldType::Email
        | FieldType::Url
        | FieldType::Picklist => json!(format!("{}_exemplo", field.name)),
        FieldType::Boolean => json!(true),
        FieldType::Int | FieldType::Double | FieldType::Currency | FieldType::Percent => json!(0),
        FieldType::Date => json!("2025-01-01"),
        FieldType::DateTime => json!("2025-01-01T12:00:00Z"),
        FieldType::Reference => json!("001XXXXXXXXXXXX"),
        _ => Value::Null,
    }
}

/// Field to upsert on: the first external id, else the first field whose
/// name looks like a key.
pub fn infer_external_id_field(fields: &[FieldDescriptor]) -> Option<String> {
    if let Some(field) = fields.iter().find(|f| f.external_id) {
        return Some(field.name.clone());
    }
    fields
        .iter()
        .find(|f| {
            let name = f.name.to_lowercase();
            EXTERNAL_KEY_HINTS.iter().any(|hint| name.contains(hint))
        })
        .map(|f| f.name.clone())
}
