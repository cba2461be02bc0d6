//! Picklist normalization, dependent resolution and reporting against a
//! realistic Case describe

use std::fs;
use std::path::Path;

use describekit::picklist::{
    format_report, is_valid_for_position, map_composite_request, map_composite_sobjects,
    map_picklists, map_picklists_value, normalize, ControllerValues, MapOptions,
    NormalizedPicklistSchema, Payload, PicklistKind, NO_PICKLISTS,
};
use describekit::{FieldDescriptor, FieldType, ObjectDescribe, PicklistValueEntry};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn load_describe(name: &str) -> ObjectDescribe {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("describe_files")
        .join(name);
    let json = fs::read_to_string(&path).expect("Failed to read describe file");
    ObjectDescribe::from_json_str(&json).expect("Invalid describe file")
}

fn case_schema() -> NormalizedPicklistSchema {
    normalize(&load_describe("case_describe.json"))
}

fn map(payload: &Value, controllers: &ControllerValues) -> Value {
    map_picklists_value(payload, &case_schema(), controllers, MapOptions::default())
}

fn all_values() -> MapOptions {
    MapOptions {
        active_only: false,
        ..MapOptions::default()
    }
}

// ==================== Normalization ====================

#[test]
fn test_normalize_case_describe() {
    let schema = case_schema();
    let names: Vec<_> = schema.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["Category__c", "Subcategory__c", "Channels__c"]);

    let category = schema.get("Category__c").unwrap();
    assert_eq!(
        category.valid_for,
        vec![Some("Aw==".to_string()), Some("DA==".to_string()), None]
    );
    assert!(!category.dependent_picklist);

    let sub = schema.get("Subcategory__c").unwrap();
    assert_eq!(sub.controller(), Some("Category__c"));
    assert_eq!(sub.values.len(), 4);
    assert_eq!(sub.values[3].value, "LEG");

    assert_eq!(schema.get("Channels__c").unwrap().kind, PicklistKind::MultiPicklist);
}

#[test]
fn test_normalized_schema_serializes_like_describe() {
    let schema = case_schema();
    let value = serde_json::to_value(&schema).unwrap();
    assert_eq!(value["Subcategory__c"]["type"], json!("picklist"));
    assert_eq!(value["Subcategory__c"]["controllerName"], json!("Category__c"));
    assert_eq!(value["Subcategory__c"]["dependentPicklist"], json!(true));
    assert_eq!(value["Category__c"]["validFor"][2], Value::Null);
    assert_eq!(value["Channels__c"]["type"], json!("multipicklist"));
}

// ==================== Dependent picklists ====================

#[test]
fn test_dependent_filter_by_controller_code() {
    let controllers = ControllerValues::new().with("Category__c", "HW");
    assert_eq!(
        map(&json!({"Subcategory__c": "Laptop"}), &controllers),
        json!({"Subcategory__c": "LAP"})
    );
    // License is not valid for Hardware
    assert_eq!(
        map(&json!({"Subcategory__c": "License"}), &controllers),
        json!({"Subcategory__c": "License"})
    );
}

#[test]
fn test_controller_label_does_not_filter() {
    // controller values are matched by API code only
    let controllers = ControllerValues::new().with("Category__c", "Hardware");
    assert_eq!(
        map(&json!({"Subcategory__c": "License"}), &controllers),
        json!({"Subcategory__c": "LIC"})
    );
    assert_eq!(
        map(&json!({"Subcategory__c": "Monitor"}), &controllers),
        json!({"Subcategory__c": "MON"})
    );
}

#[test]
fn test_dependent_inactive_value() {
    let controllers = ControllerValues::new().with("Category__c", "SW");
    let record = json!({"Subcategory__c": "Legacy Tool"});

    assert_eq!(map(&record, &controllers), record);
    assert_eq!(
        map_picklists_value(&record, &case_schema(), &controllers, all_values()),
        json!({"Subcategory__c": "LEG"})
    );
}

#[test]
fn test_unknown_controller_value_does_not_filter() {
    for controllers in [
        ControllerValues::new(),
        ControllerValues::new().with("Category__c", "Nope"),
        // known value without a validFor bitmap
        ControllerValues::new().with("Category__c", "OT"),
    ] {
        assert_eq!(
            map(&json!({"Subcategory__c": "License"}), &controllers),
            json!({"Subcategory__c": "LIC"})
        );
    }
}

#[test]
fn test_malformed_controller_bitmap_fails_closed() {
    let describe = ObjectDescribe::new("Case")
        .with_field(
            FieldDescriptor::new("Cat__c", FieldType::Picklist).with_picklist_values(vec![
                PicklistValueEntry::new("X", "X").with_valid_for("***"),
            ]),
        )
        .with_field(
            FieldDescriptor::new("Sub__c", FieldType::Picklist)
                .with_picklist_values(vec![PicklistValueEntry::new("A", "a")])
                .with_controller("Cat__c"),
        );
    let schema = normalize(&describe);
    let controllers = ControllerValues::new().with("Cat__c", "X");

    let mapped =
        map_picklists_value(&json!({"Sub__c": "A"}), &schema, &controllers, MapOptions::default());
    assert_eq!(mapped, json!({"Sub__c": "A"}));
}

#[test]
fn test_single_byte_dependency_scenario() {
    // Cat__c = X permits only position 1 (0b0000_0010)
    let describe = ObjectDescribe::new("Case")
        .with_field(
            FieldDescriptor::new("Cat__c", FieldType::Picklist).with_picklist_values(vec![
                PicklistValueEntry::new("X", "X").with_valid_for("Ag=="),
            ]),
        )
        .with_field(
            FieldDescriptor::new("Sub__c", FieldType::Picklist)
                .with_picklist_values(vec![
                    PicklistValueEntry::new("A", "a-code"),
                    PicklistValueEntry::new("B", "b-code"),
                ])
                .with_controller("Cat__c"),
        );
    let schema = normalize(&describe);
    let controllers = ControllerValues::new().with("Cat__c", "X");

    assert!(!is_valid_for_position("Ag==", 0));
    assert!(is_valid_for_position("Ag==", 1));

    let resolve = |value: Value| {
        map_picklists_value(&value, &schema, &controllers, MapOptions::default())
    };
    assert_eq!(resolve(json!({"Sub__c": "B"})), json!({"Sub__c": "b-code"}));
    assert_eq!(resolve(json!({"Sub__c": "A"})), json!({"Sub__c": "A"}));
}

#[test]
fn test_controller_values_taken_from_record() {
    let schema = case_schema();
    let record = json!({"Category__c": "Hardware", "Subcategory__c": "Monitor", "Subject": "x"});
    let controllers = ControllerValues::from_record(record.as_object().unwrap(), &schema);
    assert_eq!(controllers.get("Category__c"), Some("HW"));

    let mapped = map_picklists_value(&record, &schema, &controllers, MapOptions::default());
    assert_eq!(
        mapped,
        json!({"Category__c": "HW", "Subcategory__c": "MON", "Subject": "x"})
    );
}

// ==================== Multi-select picklists ====================

#[test]
fn test_multipicklist_resolution() {
    let controllers = ControllerValues::new();
    assert_eq!(
        map(&json!({"Channels__c": " Email ;Phone;;Chat"}), &controllers),
        json!({"Channels__c": "EM;PH;Chat"})
    );

    let mapped = map_picklists_value(
        &json!({"Channels__c": "Chat;Email"}),
        &case_schema(),
        &controllers,
        all_values(),
    );
    assert_eq!(mapped, json!({"Channels__c": "CH;EM"}));
}

#[test]
fn test_multipicklist_idempotent() {
    let mut schema = NormalizedPicklistSchema::new();
    schema.insert(
        "Status__c",
        describekit::picklist::PicklistField::new(
            PicklistKind::MultiPicklist,
            vec![
                PicklistValueEntry::new("Open", "O"),
                PicklistValueEntry::new("Closed", "C"),
            ],
        ),
    );
    let controllers = ControllerValues::new();

    let once = map_picklists_value(
        &json!({"Status__c": "Open;Closed"}),
        &schema,
        &controllers,
        MapOptions::default(),
    );
    assert_eq!(once, json!({"Status__c": "O;C"}));

    let twice = map_picklists_value(&once, &schema, &controllers, MapOptions::default());
    assert_eq!(twice, once);
}

// ==================== Payload handling ====================

#[test]
fn test_input_is_not_mutated() {
    let payload = Payload::from_value(json!([
        {"Category__c": "Hardware", "Channels__c": "Email"},
        {"Category__c": "Software"}
    ]))
    .unwrap();
    let snapshot = payload.clone();

    let mapped = map_picklists(
        &payload,
        &case_schema(),
        &ControllerValues::new(),
        MapOptions::default(),
    );

    assert_eq!(payload, snapshot);
    assert_eq!(
        mapped.into_value(),
        json!([{"Category__c": "HW", "Channels__c": "EM"}, {"Category__c": "SW"}])
    );
}

#[test]
fn test_auto_map_disabled() {
    let payload = json!({"Category__c": "Hardware", "Channels__c": "Email;Phone"});
    let options = MapOptions {
        auto_map: false,
        ..MapOptions::default()
    };
    let mapped = map_picklists_value(&payload, &case_schema(), &ControllerValues::new(), options);
    assert_eq!(mapped, payload);
}

#[test]
fn test_pass_through_payloads() {
    let controllers = ControllerValues::new();
    for payload in [json!("Hardware"), json!(42), Value::Null, json!(true)] {
        assert_eq!(map(&payload, &controllers), payload);
    }

    let record = json!({"Category__c": "Hardware"});
    let mapped = map_picklists_value(
        &record,
        &NormalizedPicklistSchema::new(),
        &controllers,
        MapOptions::default(),
    );
    assert_eq!(mapped, record);
}

#[test]
fn test_field_order_preserved() {
    let mapped = map(
        &json!({"Subject": "s", "Category__c": "Software", "AccountId": "001"}),
        &ControllerValues::new(),
    );
    let keys: Vec<_> = mapped.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["Subject", "Category__c", "AccountId"]);
}

// ==================== Composite bodies ====================

#[test]
fn test_map_composite_sobjects() {
    let body = json!({
        "allOrNone": false,
        "records": [
            {"attributes": {"type": "Case"}, "Category__c": "Hardware"},
            {"attributes": {"type": "Case"}, "Channels__c": "Phone;Email"}
        ]
    });
    let mapped = map_composite_sobjects(
        &body,
        &case_schema(),
        &ControllerValues::new(),
        MapOptions::default(),
    );
    assert_eq!(
        mapped,
        json!({
            "allOrNone": false,
            "records": [
                {"attributes": {"type": "Case"}, "Category__c": "HW"},
                {"attributes": {"type": "Case"}, "Channels__c": "PH;EM"}
            ]
        })
    );

    let no_records = json!({"allOrNone": true});
    assert_eq!(
        map_composite_sobjects(
            &no_records,
            &case_schema(),
            &ControllerValues::new(),
            MapOptions::default()
        ),
        no_records
    );
}

#[test]
fn test_map_composite_request() {
    let body = json!({
        "allOrNone": false,
        "compositeRequest": [
            {
                "method": "POST",
                "url": "/services/data/v61.0/sobjects/Case",
                "referenceId": "ref1",
                "body": {"Category__c": "Software", "Subject": "Login"}
            },
            {"method": "GET", "url": "/services/data/v61.0/sobjects/Case/@{ref1.id}", "referenceId": "ref2"}
        ]
    });
    let mapped = map_composite_request(
        &body,
        &case_schema(),
        &ControllerValues::new(),
        MapOptions::default(),
    );
    assert_eq!(
        mapped["compositeRequest"][0]["body"],
        json!({"Category__c": "SW", "Subject": "Login"})
    );
    assert_eq!(mapped["compositeRequest"][1], body["compositeRequest"][1]);
}

// ==================== Report ====================

#[test]
fn test_report_for_case() {
    let expected = [
        "Category__c (picklist):",
        "  - Hardware → HW",
        "  - Software → SW",
        "  - Other → OT",
        "",
        "Subcategory__c (picklist):",
        "  - Laptop → LAP",
        "  - Monitor → MON",
        "  - License → LIC",
        "  - Legacy Tool → LEG [INACTIVE]",
        "  Dependencies: controlled by Category__c",
        "",
        "Channels__c (multipicklist):",
        "  - Email → EM",
        "  - Phone → PH",
        "  - Chat → CH [INACTIVE]",
    ]
    .join("\n");
    assert_eq!(format_report(&case_schema()), expected);
}

#[test]
fn test_report_without_picklists() {
    let describe = ObjectDescribe::new("Note")
        .with_field(FieldDescriptor::new("Body", FieldType::TextArea));
    assert_eq!(format_report(&normalize(&describe)), NO_PICKLISTS);
}
