//! Label to API code resolution for picklist fields
//!
//! Records arrive with human readable picklist labels; the backend wants the
//! API codes. Resolution is best effort: anything that cannot be matched is
//! passed through untouched, on the assumption it already is a code.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use super::bitmask::ValidFor;
use super::schema::{NormalizedPicklistSchema, PicklistField};
use crate::describe::PicklistValueEntry;

/// A single data record: field name to value
pub type Record = serde_json::Map<String, Value>;

/// What gets mapped: one record or a batch of them
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Single(Record),
    Many(Vec<Record>),
}

impl Payload {
    /// Classify a JSON value. Anything that is not an object or an array of
    /// objects has no typed form.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(record) => Some(Payload::Single(record)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(record) => Some(record),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()
                .map(Payload::Many),
            _ => None,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Payload::Single(record) => Value::Object(record),
            Payload::Many(records) => {
                Value::Array(records.into_iter().map(Value::Object).collect())
            }
        }
    }
}

/// Switches for picklist mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOptions {
    /// When off, payloads are returned unchanged
    #[serde(default = "default_true")]
    pub auto_map: bool,
    /// Only match against active values
    #[serde(default = "default_true")]
    pub active_only: bool,
}

fn default_true() -> bool {
    true
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            auto_map: true,
            active_only: true,
        }
    }
}

/// Current value of each controlling field, as known by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControllerValues {
    values: HashMap<String, String>,
}

impl ControllerValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`ControllerValues::insert`]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Take controller values from the record itself: every non-empty string
    /// of a field that controls another picklist in `schema`. A label is
    /// stored as its API code; anything else is kept verbatim.
    pub fn from_record(record: &Record, schema: &NormalizedPicklistSchema) -> Self {
        let mut values = Self::new();
        for (name, value) in record {
            if !schema.is_controller(name) {
                continue;
            }
            let Some(text) = value.as_str().filter(|s| !s.is_empty()) else {
                continue;
            };
            let code = schema
                .get(name)
                .filter(|field| !field.values.iter().any(|pv| pv.value == text))
                .and_then(|field| field.values.iter().find(|pv| pv.label == text))
                .map_or(text, |pv| pv.value.as_str());
            values.insert(name.clone(), code);
        }
        values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ControllerValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (k, v) in iter {
            values.insert(k, v);
        }
        values
    }
}

/// Outcome of looking up one label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution<'a> {
    Resolved(&'a str),
    Unresolved(&'a str),
}

impl<'a> Resolution<'a> {
    fn value(self) -> &'a str {
        match self {
            Resolution::Resolved(code) => code,
            Resolution::Unresolved(original) => original,
        }
    }
}

fn resolve_label<'a>(available: &[&'a PicklistValueEntry], label: &'a str) -> Resolution<'a> {
    match available.iter().find(|entry| entry.label == label) {
        Some(entry) => Resolution::Resolved(entry.value.as_str()),
        None => Resolution::Unresolved(label),
    }
}

/// Maps picklist labels to codes against one normalized schema
pub struct PicklistResolver<'a> {
    schema: &'a NormalizedPicklistSchema,
    controller_values: &'a ControllerValues,
    options: MapOptions,
}

impl<'a> PicklistResolver<'a> {
    pub fn new(
        schema: &'a NormalizedPicklistSchema,
        controller_values: &'a ControllerValues,
        options: MapOptions,
    ) -> Self {
        Self {
            schema,
            controller_values,
            options,
        }
    }

    /// Map a typed payload, keeping its shape
    pub fn map_payload(&self, payload: &Payload) -> Payload {
        if !self.is_active() {
            return payload.clone();
        }
        match payload {
            Payload::Single(record) => Payload::Single(self.map_record(record)),
            Payload::Many(records) => {
                Payload::Many(records.iter().map(|r| self.map_record(r)).collect())
            }
        }
    }

    /// Map a JSON payload. Objects are mapped as records, arrays element by
    /// element; everything else is returned as is.
    pub fn map_value(&self, payload: &Value) -> Value {
        if !self.is_active() {
            return payload.clone();
        }
        match payload {
            Value::Object(record) => Value::Object(self.map_record(record)),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| match item {
                        Value::Object(record) => Value::Object(self.map_record(record)),
                        other => other.clone(),
                    })
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Map a single record. The input is left untouched.
    pub fn map_record(&self, record: &Record) -> Record {
        let mut mapped = record.clone();
        if !self.is_active() {
            return mapped;
        }

        for (name, field) in self.schema.iter() {
            let Some(value) = record.get(name) else {
                continue;
            };
            if let Some(new_value) = self.map_field(name, field, value) {
                mapped.insert(name.to_string(), new_value);
            }
        }
        mapped
    }

    fn is_active(&self) -> bool {
        self.options.auto_map && !self.schema.is_empty()
    }

    /// New value for one field, or `None` to keep the original
    fn map_field(&self, name: &str, field: &PicklistField, value: &Value) -> Option<Value> {
        let text = value.as_str().filter(|s| !s.is_empty())?;
        let available = self.available_values(name, field);

        if field.is_multi() {
            let codes: Vec<&str> = text
                .split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|label| self.trace_resolution(name, resolve_label(&available, label)))
                .collect();
            return Some(Value::String(codes.join(";")));
        }

        match resolve_label(&available, text) {
            Resolution::Resolved(code) => Some(Value::String(code.to_string())),
            unresolved => {
                self.trace_resolution(name, unresolved);
                None
            }
        }
    }

    fn trace_resolution<'r>(&self, name: &str, resolution: Resolution<'r>) -> &'r str {
        if let Resolution::Unresolved(label) = resolution {
            debug!(field = name, label, "picklist label not resolved, passing through");
        }
        resolution.value()
    }

    /// Values a label may resolve to: narrowed by the controller's `validFor`
    /// bitmap when the controller value is known, then by the active flag.
    fn available_values<'f>(&self, name: &str, field: &'f PicklistField) -> Vec<&'f PicklistValueEntry> {
        let mut available: Vec<&PicklistValueEntry> = match self.controller_bitmap(field) {
            Some(encoded) => {
                let bits = ValidFor::decode(encoded);
                trace!(field = name, valid_for = encoded, "filtering dependent values");
                field
                    .values
                    .iter()
                    .enumerate()
                    .filter(|(position, _)| bits.as_ref().is_some_and(|b| b.allows(*position)))
                    .map(|(_, entry)| entry)
                    .collect()
            }
            None => field.values.iter().collect(),
        };

        if self.options.active_only {
            available.retain(|entry| entry.active);
        }
        available
    }

    /// `validFor` of the controller entry currently selected, if any
    fn controller_bitmap(&self, field: &PicklistField) -> Option<&'a str> {
        let controller = field.controller()?;
        let current = self.controller_values.get(controller)?;
        let controller_field = self.schema.get(controller)?;
        match controller_field.values.iter().find(|pv| pv.value == current) {
            Some(entry) => entry.valid_for.as_deref(),
            None => {
                debug!(controller, value = current, "unknown controller value, no filtering");
                None
            }
        }
    }
}

/// Map picklist labels to codes in a typed payload
pub fn map_picklists(
    payload: &Payload,
    schema: &NormalizedPicklistSchema,
    controller_values: &ControllerValues,
    options: MapOptions,
) -> Payload {
    PicklistResolver::new(schema, controller_values, options).map_payload(payload)
}

/// Map picklist labels to codes in an arbitrary JSON payload
pub fn map_picklists_value(
    payload: &Value,
    schema: &NormalizedPicklistSchema,
    controller_values: &ControllerValues,
    options: MapOptions,
) -> Value {
    PicklistResolver::new(schema, controller_values, options).map_value(payload)
}

/// Map the `records` of a composite sObject collection body
/// (`{"allOrNone": .., "records": [..]}`).
pub fn map_composite_sobjects(
    body: &Value,
    schema: &NormalizedPicklistSchema,
    controller_values: &ControllerValues,
    options: MapOptions,
) -> Value {
    let resolver = PicklistResolver::new(schema, controller_values, options);
    let mut mapped = body.clone();
    if let Some(records) = body.get("records").filter(|r| r.is_array()) {
        mapped["records"] = resolver.map_value(records);
    }
    mapped
}

/// Map the `body` of every sub-request of a composite request
pub fn map_composite_request(
    body: &Value,
    schema: &NormalizedPicklistSchema,
    controller_values: &ControllerValues,
    options: MapOptions,
) -> Value {
    let resolver = PicklistResolver::new(schema, controller_values, options);
    let mut mapped = body.clone();
    if let Some(requests) = mapped
        .get_mut("compositeRequest")
        .and_then(Value::as_array_mut)
    {
        for request in requests.iter_mut() {
            if let Some(Value::Object(record)) = request.get("body") {
                let new_body = resolver.map_record(record);
                request["body"] = Value::Object(new_body);
            }
        }
    }
    mapped
}
