//! WebAssembly bindings for describekit
//!
//! JavaScript-friendly entry points for the browser page that shows
//! generated examples and submits mapped payloads.
//!
//! # Usage from JavaScript
//!
//! ```javascript
//! import init, { WasmSelection, formatPicklistReport } from 'describekit';
//!
//! await init();
//!
//! const describe = await (await fetch(`/api/describe/Case`)).json();
//! const selection = new WasmSelection('Case', describe);
//!
//! const examples = selection.generateExamples();
//! console.log(examples.query, examples.create);
//! console.log(selection.picklistReport());
//!
//! const mapped = selection.mapPicklists({ Status: 'Closed' }, {}, { activeOnly: true });
//!
//! // one-shot helpers over a describe document
//! console.log(formatPicklistReport(describe));
//! ```

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::context::SelectionContext;
use crate::describe::ObjectDescribe;
use crate::example::ExampleOptions;
use crate::picklist::{format_report, is_valid_for_position, normalize, ControllerValues, MapOptions};

/// Helper to serialize values as plain JS objects (not Maps)
fn to_js_value<T: Serialize>(value: &T) -> JsValue {
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    value.serialize(&serializer).unwrap_or(JsValue::NULL)
}

/// Read an optional JS argument, treating `undefined`/`null` as the default
fn from_js_or_default<T>(value: JsValue, what: &str) -> Result<T, JsValue>
where
    T: Default + serde::de::DeserializeOwned,
{
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid {}: {}", what, e)))
}

fn describe_from_js(describe_json: JsValue) -> Result<ObjectDescribe, JsValue> {
    let value: serde_json::Value = serde_wasm_bindgen::from_value(describe_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid JSON: {}", e)))?;
    ObjectDescribe::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn json_from_js(value: JsValue, what: &str) -> Result<serde_json::Value, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid {}: {}", what, e)))
}

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Selected object: describe plus derived picklist schema
#[wasm_bindgen]
pub struct WasmSelection {
    inner: SelectionContext,
}

#[wasm_bindgen]
impl WasmSelection {
    /// Select an object from its describe JSON
    #[wasm_bindgen(constructor)]
    pub fn new(object_name: &str, describe_json: JsValue) -> Result<WasmSelection, JsValue> {
        let describe = describe_from_js(describe_json)?;
        Ok(WasmSelection {
            inner: SelectionContext::select(object_name, describe),
        })
    }

    #[wasm_bindgen(getter, js_name = objectName)]
    pub fn object_name(&self) -> String {
        self.inner.object_name().to_string()
    }

    /// Normalized picklist schema keyed by field name
    #[wasm_bindgen(js_name = picklists)]
    pub fn picklists(&self) -> JsValue {
        to_js_value(self.inner.picklists())
    }

    /// Generate query, insert body and derived requests
    ///
    /// `options` is optional; see `ExampleOptions` (camelCase keys).
    #[wasm_bindgen(js_name = generateExamples)]
    pub fn generate_examples(&self, options: JsValue) -> Result<JsValue, JsValue> {
        let options: ExampleOptions = from_js_or_default(options, "options")?;
        let examples = self.inner.examples(&options);

        Ok(to_js_value(&serde_json::json!({
            "query": examples.query,
            "create": examples.create,
            "update": examples.update,
            "upsert": examples.upsert,
            "upsertExternalField": examples.upsert_external_field(),
            "compositeSObjects": examples.composite_sobjects,
            "compositeRequest": examples.composite_request,
            "bulkJob": examples.bulk_job,
            "bulkUpsertJob": examples.bulk_upsert_job,
            "csv": examples.csv(),
        })))
    }

    /// Text listing of the picklists
    #[wasm_bindgen(js_name = picklistReport)]
    pub fn picklist_report(&self) -> String {
        self.inner.picklist_report()
    }

    /// Replace picklist labels with API codes in a record or array of records
    #[wasm_bindgen(js_name = mapPicklists)]
    pub fn map_picklists(
        &self,
        payload: JsValue,
        controller_values: JsValue,
        options: JsValue,
    ) -> Result<JsValue, JsValue> {
        let payload = json_from_js(payload, "payload")?;
        let controllers: ControllerValues =
            from_js_or_default(controller_values, "controller values")?;
        let options: MapOptions = from_js_or_default(options, "options")?;

        let mapped = self.inner.resolver(&controllers, options).map_value(&payload);
        Ok(to_js_value(&mapped))
    }

    /// Map the records of a composite sObject collection body
    #[wasm_bindgen(js_name = mapCompositeSObjects)]
    pub fn map_composite_sobjects(
        &self,
        body: JsValue,
        controller_values: JsValue,
        options: JsValue,
    ) -> Result<JsValue, JsValue> {
        let body = json_from_js(body, "body")?;
        let controllers: ControllerValues =
            from_js_or_default(controller_values, "controller values")?;
        let options: MapOptions = from_js_or_default(options, "options")?;

        let mapped = self.inner.map_composite_sobjects(&body, &controllers, options);
        Ok(to_js_value(&mapped))
    }

    /// Map the sub-request bodies of a composite request
    #[wasm_bindgen(js_name = mapCompositeRequest)]
    pub fn map_composite_request(
        &self,
        body: JsValue,
        controller_values: JsValue,
        options: JsValue,
    ) -> Result<JsValue, JsValue> {
        let body = json_from_js(body, "body")?;
        let controllers: ControllerValues =
            from_js_or_default(controller_values, "controller values")?;
        let options: MapOptions = from_js_or_default(options, "options")?;

        let mapped = self.inner.map_composite_request(&body, &controllers, options);
        Ok(to_js_value(&mapped))
    }
}

/// Normalized picklist schema of a describe document
#[wasm_bindgen(js_name = normalizePicklists)]
pub fn normalize_picklists(describe_json: JsValue) -> Result<JsValue, JsValue> {
    let describe = describe_from_js(describe_json)?;
    Ok(to_js_value(&normalize(&describe)))
}

/// Text listing of the picklists of a describe document
#[wasm_bindgen(js_name = formatPicklistReport)]
pub fn format_picklist_report(describe_json: JsValue) -> Result<String, JsValue> {
    let describe = describe_from_js(describe_json)?;
    Ok(format_report(&normalize(&describe)))
}

/// Test one position of a `validFor` bitmap
#[wasm_bindgen(js_name = isValidForPosition)]
pub fn is_valid_for_position_js(valid_for: &str, position: i32) -> bool {
    is_valid_for_position(valid_for, i64::from(position))
}
