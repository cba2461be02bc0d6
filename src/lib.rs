pub mod context;
pub mod describe;
pub mod error;
pub mod example;
pub mod picklist;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use context::SelectionContext;
pub use describe::{FieldDescriptor, FieldType, ObjectDescribe, PicklistValueEntry};
pub use error::{DescribeError, DescribeResult};
pub use example::{synthesize, synthesize_with_options, ExampleOptions, ExampleSet};
pub use picklist::{
    format_report, is_valid_for_position, map_picklists, map_picklists_value, normalize,
    ControllerValues, MapOptions, NormalizedPicklistSchema, Payload, Record,
};
