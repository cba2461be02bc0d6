//! Selected object context
//!
//! Holds the describe of the currently selected object together with the
//! picklist schema derived from it. Selecting another object builds a new
//! context; nothing inside is ever updated in place.

use serde_json::Value;

use crate::describe::ObjectDescribe;
use crate::example::{synthesize_with_options, ExampleOptions, ExampleSet};
use crate::picklist::{
    format_report, map_composite_request, map_composite_sobjects, normalize, ControllerValues,
    MapOptions, NormalizedPicklistSchema, PicklistResolver,
};

/// Describe and picklist schema of one selected object
#[derive(Debug, Clone)]
pub struct SelectionContext {
    object_name: String,
    describe: ObjectDescribe,
    picklists: NormalizedPicklistSchema,
}

impl SelectionContext {
    /// Select an object, normalizing its picklists
    pub fn select(object_name: impl Into<String>, describe: ObjectDescribe) -> Self {
        let picklists = normalize(&describe);
        Self {
            object_name: object_name.into(),
            describe,
            picklists,
        }
    }

    /// Select using the name carried by the describe document
    pub fn from_describe(describe: ObjectDescribe) -> Self {
        let name = describe.name.clone().unwrap_or_default();
        Self::select(name, describe)
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    pub fn describe(&self) -> &ObjectDescribe {
        &self.describe
    }

    pub fn picklists(&self) -> &NormalizedPicklistSchema {
        &self.picklists
    }

    pub fn examples(&self, options: &ExampleOptions) -> ExampleSet {
        synthesize_with_options(&self.object_name, &self.describe, options)
    }

    pub fn picklist_report(&self) -> String {
        format_report(&self.picklists)
    }

    /// Resolver bound to this object's picklists
    pub fn resolver<'a>(
        &'a self,
        controller_values: &'a ControllerValues,
        options: MapOptions,
    ) -> PicklistResolver<'a> {
        PicklistResolver::new(&self.picklists, controller_values, options)
    }

    /// Map the `records` of a composite sObject collection body
    pub fn map_composite_sobjects(
        &self,
        body: &Value,
        controller_values: &ControllerValues,
        options: MapOptions,
    ) -> Value {
        map_composite_sobjects(body, &self.picklists, controller_values, options)
    }

    /// Map every sub-request `body` of a composite request
    pub fn map_composite_request(
        &self,
        body: &Value,
        controller_values: &ControllerValues,
        options: MapOptions,
    ) -> Value {
        map_composite_request(body, &self.picklists, controller_values, options)
    }
}
