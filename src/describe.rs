//! Describe metadata model
//!
//! Typed view of an object's describe document: the ordered field list with
//! the flags the example synthesizer and the picklist resolver look at.
//! Documents are read from camelCase JSON as returned by the platform.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DescribeError, DescribeResult};

/// Describe result for a single SObject
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDescribe {
    /// API name (e.g., "Account", "Case", "Custom_Object__c")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Label for display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Fields in describe order
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: Vec<FieldDescriptor>,
}

impl ObjectDescribe {
    /// Create an empty describe for the named object
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            label: None,
            fields: Vec::new(),
        }
    }

    /// Parse a describe document from JSON text
    pub fn from_json_str(json: &str) -> DescribeResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Build a describe from an already parsed JSON document
    pub fn from_value(value: serde_json::Value) -> DescribeResult<Self> {
        if !value.is_object() {
            return Err(DescribeError::InvalidDocument(
                "describe document must be a JSON object".to_string(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Append a field, keeping describe order
    pub fn add_field(&mut self, field: FieldDescriptor) {
        self.fields.push(field);
    }

    /// Builder form of [`ObjectDescribe::add_field`]
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.add_field(field);
        self
    }

    /// Get a field by API name (exact match)
    pub fn get_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Description of one field of an SObject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// API name (e.g., "Status", "Custom_Field__c")
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Field type as reported by describe
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    /// Whether the field accepts null. Absent means nillable.
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub nillable: bool,
    /// Whether the platform fills a value on insert
    #[serde(default, deserialize_with = "null_as_default")]
    pub defaulted_on_create: bool,
    /// Formula / roll-up fields
    #[serde(default, deserialize_with = "null_as_default")]
    pub calculated: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deprecated_and_hidden: bool,
    /// Usable as an upsert key
    #[serde(default, deserialize_with = "null_as_default")]
    pub external_id: bool,
    /// For picklists: values in bit-position order
    #[serde(default, deserialize_with = "null_as_default")]
    pub picklist_values: Vec<PicklistValueEntry>,
    /// For dependent picklists: the controlling field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dependent_picklist: bool,
}

fn default_true() -> bool {
    true
}

fn null_as_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl FieldDescriptor {
    /// Create a new nillable field with no flags set
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: None,
            field_type,
            nillable: true,
            defaulted_on_create: false,
            calculated: false,
            deprecated_and_hidden: false,
            external_id: false,
            picklist_values: Vec::new(),
            controller_name: None,
            dependent_picklist: false,
        }
    }

    /// Set whether the field is nillable
    pub fn with_nillable(mut self, nillable: bool) -> Self {
        self.nillable = nillable;
        self
    }

    pub fn with_defaulted_on_create(mut self, defaulted: bool) -> Self {
        self.defaulted_on_create = defaulted;
        self
    }

    pub fn with_calculated(mut self, calculated: bool) -> Self {
        self.calculated = calculated;
        self
    }

    pub fn with_deprecated_and_hidden(mut self, hidden: bool) -> Self {
        self.deprecated_and_hidden = hidden;
        self
    }

    pub fn with_external_id(mut self, external_id: bool) -> Self {
        self.external_id = external_id;
        self
    }

    /// Set picklist values
    pub fn with_picklist_values(mut self, values: Vec<PicklistValueEntry>) -> Self {
        self.picklist_values = values;
        self
    }

    /// Mark this picklist as dependent on `controller`
    pub fn with_controller(mut self, controller: impl Into<String>) -> Self {
        self.controller_name = Some(controller.into());
        self.dependent_picklist = true;
        self
    }

    /// A field the platform rejects an insert without
    pub fn is_required_on_create(&self) -> bool {
        !self.nillable && !self.defaulted_on_create && !self.calculated
    }

    /// Visible to a plain SELECT
    pub fn is_queryable(&self) -> bool {
        !self.calculated && !self.deprecated_and_hidden
    }
}

/// One entry of a picklist's value set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PicklistValueEntry {
    /// Display string
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,
    /// API code
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub active: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub default_value: bool,
    /// Base64 bitmap over the dependent field's values. Only present on
    /// entries of a controlling field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_for: Option<String>,
}

impl PicklistValueEntry {
    /// Create an active entry
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            active: true,
            default_value: false,
            valid_for: None,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn with_valid_for(mut self, valid_for: impl Into<String>) -> Self {
        self.valid_for = Some(valid_for.into());
        self
    }
}

/// Salesforce field types as they appear in describe output
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldType {
    Id,
    #[default]
    String,
    TextArea,
    Phone,
    Email,
    Url,
    Picklist,
    MultiPicklist,
    Boolean,
    Int,
    Double,
    Currency,
    Percent,
    Date,
    DateTime,
    Reference,
    /// Any type this crate has no special handling for (address, combobox, ...)
    Other(String),
}

impl FieldType {
    /// Parse a describe type name. Unknown names are kept as [`FieldType::Other`].
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "id" => FieldType::Id,
            "string" => FieldType::String,
            "textarea" => FieldType::TextArea,
            "phone" => FieldType::Phone,
            "email" => FieldType::Email,
            "url" => FieldType::Url,
            "picklist" => FieldType::Picklist,
            "multipicklist" => FieldType::MultiPicklist,
            "boolean" => FieldType::Boolean,
            "int" => FieldType::Int,
            "double" => FieldType::Double,
            "currency" => FieldType::Currency,
            "percent" => FieldType::Percent,
            "date" => FieldType::Date,
            "datetime" => FieldType::DateTime,
            "reference" => FieldType::Reference,
            _ => FieldType::Other(s.to_string()),
        }
    }

    /// Describe type name
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Id => "id",
            FieldType::String => "string",
            FieldType::TextArea => "textarea",
            FieldType::Phone => "phone",
            FieldType::Email => "email",
            FieldType::Url => "url",
            FieldType::Picklist => "picklist",
            FieldType::MultiPicklist => "multipicklist",
            FieldType::Boolean => "boolean",
            FieldType::Int => "int",
            FieldType::Double => "double",
            FieldType::Currency => "currency",
            FieldType::Percent => "percent",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Reference => "reference",
            FieldType::Other(name) => name,
        }
    }

    pub fn is_picklist(&self) -> bool {
        matches!(self, FieldType::Picklist | FieldType::MultiPicklist)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|s| FieldType::parse(&s)).unwrap_or_default())
    }
}
