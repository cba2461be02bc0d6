//! Normalized picklist view of a describe

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::describe::{FieldType, ObjectDescribe, PicklistValueEntry};

/// Single or multi select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PicklistKind {
    Picklist,
    MultiPicklist,
}

impl PicklistKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PicklistKind::Picklist => "picklist",
            PicklistKind::MultiPicklist => "multipicklist",
        }
    }

    fn from_field_type(field_type: &FieldType) -> Option<Self> {
        match field_type {
            FieldType::Picklist => Some(PicklistKind::Picklist),
            FieldType::MultiPicklist => Some(PicklistKind::MultiPicklist),
            _ => None,
        }
    }
}

/// Picklist-relevant slice of one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PicklistField {
    #[serde(rename = "type")]
    pub kind: PicklistKind,
    /// Values in describe order; the index of an entry is its bit position
    pub values: Vec<PicklistValueEntry>,
    pub controller_name: Option<String>,
    pub dependent_picklist: bool,
    /// `validFor` of each own value, aligned with `values`. Consulted when
    /// this field controls another one.
    pub valid_for: Vec<Option<String>>,
}

impl PicklistField {
    pub fn new(kind: PicklistKind, values: Vec<PicklistValueEntry>) -> Self {
        let valid_for = values.iter().map(|v| v.valid_for.clone()).collect();
        Self {
            kind,
            values,
            controller_name: None,
            dependent_picklist: false,
            valid_for,
        }
    }

    pub fn with_controller(mut self, controller: impl Into<String>) -> Self {
        self.controller_name = Some(controller.into());
        self.dependent_picklist = true;
        self
    }

    /// Controller name, only when this field really is dependent
    pub fn controller(&self) -> Option<&str> {
        if !self.dependent_picklist {
            return None;
        }
        self.controller_name.as_deref().filter(|name| !name.is_empty())
    }

    pub fn is_multi(&self) -> bool {
        self.kind == PicklistKind::MultiPicklist
    }
}

/// Picklist fields of one object, keyed by field name in describe order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedPicklistSchema {
    fields: IndexMap<String, PicklistField>,
}

impl NormalizedPicklistSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, field: PicklistField) {
        self.fields.insert(name.into(), field);
    }

    pub fn get(&self, name: &str) -> Option<&PicklistField> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Fields in describe order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PicklistField)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    /// Whether some field in the schema is controlled by `name`
    pub fn is_controller(&self, name: &str) -> bool {
        self.fields.values().any(|f| f.controller() == Some(name))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Extract the picklist view of a describe.
///
/// Non-picklist fields and picklists without values are left out.
pub fn normalize(describe: &ObjectDescribe) -> NormalizedPicklistSchema {
    let mut schema = NormalizedPicklistSchema::new();

    for field in &describe.fields {
        let Some(kind) = PicklistKind::from_field_type(&field.field_type) else {
            continue;
        };
        if field.picklist_values.is_empty() {
            debug!(field = %field.name, "normalize: picklist without values skipped");
            continue;
        }

        let mut entry = PicklistField::new(kind, field.picklist_values.clone());
        entry.controller_name = field.controller_name.clone();
        entry.dependent_picklist = field.dependent_picklist;
        schema.insert(field.name.clone(), entry);
    }

    debug!(
        object = describe.name.as_deref().unwrap_or(""),
        picklists = schema.len(),
        "normalize: done"
    );
    schema
}
