//! Picklist handling
//!
//! Normalizes the picklist fields of a describe, resolves labels to API
//! codes (including dependent picklists restricted by their controller's
//! `validFor` bitmap) and renders a text listing.
//!
//! # Example
//!
//! ```rust
//! use describekit::describe::{FieldDescriptor, FieldType, ObjectDescribe, PicklistValueEntry};
//! use describekit::picklist::{map_picklists, normalize, ControllerValues, MapOptions, Payload};
//! use serde_json::json;
//!
//! let describe = ObjectDescribe::new("Case").with_field(
//!     FieldDescriptor::new("Status", FieldType::Picklist).with_picklist_values(vec![
//!         PicklistValueEntry::new("Open", "O"),
//!         PicklistValueEntry::new("Closed", "C"),
//!     ]),
//! );
//! let schema = normalize(&describe);
//!
//! let payload = Payload::from_value(json!({"Status": "Closed"})).unwrap();
//! let mapped = map_picklists(&payload, &schema, &ControllerValues::new(), MapOptions::default());
//! assert_eq!(mapped.into_value(), json!({"Status": "C"}));
//! ```

pub mod bitmask;
pub mod report;
pub mod resolver;
pub mod schema;

pub use bitmask::{is_valid_for_position, ValidFor};
pub use report::{format_report, NO_PICKLISTS};
pub use resolver::{
    map_composite_request, map_composite_sobjects, map_picklists, map_picklists_value,
    ControllerValues, MapOptions, Payload, PicklistResolver, Record,
};
pub use schema::{normalize, NormalizedPicklistSchema, PicklistField, PicklistKind};
