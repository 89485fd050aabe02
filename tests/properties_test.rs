//! Property registry and typed accessor behaviour over the scripted
//! backend: suffix handling, access enforcement before native calls, the
//! growable enum range buffer, and blob size short-circuiting.

#![cfg(feature = "mock")]
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use xeneth::discovery::DeviceDescriptor;
use xeneth::error::Error;
use xeneth::properties::{PropertyKind, PropertyValue};
use xeneth::sdk::mock::{MockProperty, MockSdk, MockValue};
use xeneth::sdk::SdkContext;
use xeneth::XCamera;

fn open_with(backend: Arc<MockSdk>) -> XCamera {
    backend.push_device(DeviceDescriptor {
        url: "cam://0".into(),
        ..DeviceDescriptor::default()
    });
    let sdk = SdkContext::new(backend);
    XCamera::open(sdk, "cam://0", None).unwrap()
}

#[test]
fn suffixed_and_plain_names_resolve_to_the_same_property() {
    let backend = Arc::new(MockSdk::new());
    backend.push_property(MockProperty::new("Gain(0)", 0x301, MockValue::Float(1.5)));
    let camera = open_with(backend);

    assert!(camera.has_property("Gain"));
    assert!(camera.has_property("Gain(0)"));
    let by_plain = camera.property("Gain").unwrap();
    let by_suffix = camera.property("Gain(0)").unwrap();
    assert_eq!(by_plain.name(), "Gain");
    assert_eq!(by_suffix.name(), "Gain");
    // Native calls keep the reported spelling; the backend knows no "Gain".
    assert_eq!(by_plain.raw_name(), "Gain(0)");
    assert_eq!(by_plain.get_f64().unwrap(), 1.5);
    by_plain.set_f64(2.0).unwrap();
    assert_eq!(by_suffix.get_f64().unwrap(), 2.0);
}

#[test]
fn unknown_base_types_are_skipped_not_fatal() {
    let backend = Arc::new(MockSdk::new());
    backend.push_property(MockProperty::new("Weird", 0x340, MockValue::Long(0)));
    backend.push_property(MockProperty::new("Gain", 0x301, MockValue::Float(1.0)));
    let camera = open_with(backend);

    assert_eq!(camera.properties().len(), 1);
    assert!(!camera.has_property("Weird"));
    assert!(camera.has_property("Gain"));
}

#[test]
fn require_names_the_missing_property() {
    let backend = Arc::new(MockSdk::new());
    let camera = open_with(backend);
    let err = camera.properties().require("Missing(0)").unwrap_err();
    assert_eq!(err, Error::InvalidProperty("Missing".into()));
}

#[test]
fn registry_preserves_enumeration_order() {
    let backend = Arc::new(MockSdk::new());
    backend.push_property(MockProperty::new("B", 0x301, MockValue::Long(0)));
    backend.push_property(MockProperty::new("A", 0x301, MockValue::Long(0)));
    let camera = open_with(backend);

    let names: Vec<_> = camera.properties().names().collect();
    assert_eq!(names, vec!["B", "A"]);
}

#[test]
fn writing_a_read_only_property_never_reaches_the_backend() {
    let backend = Arc::new(MockSdk::new());
    // Readable only, no writable bit.
    backend.push_property(MockProperty::new("ChipTemp", 0x101, MockValue::Float(77.0)));
    let camera = open_with(backend.clone());
    let prop = camera.property("ChipTemp").unwrap();

    let err = prop.set_f64(80.0).unwrap_err();
    assert!(matches!(err, Error::AccessViolation { .. }));
    assert_eq!(backend.calls("set_property_value_f64"), 0);
    assert_eq!(prop.get_f64().unwrap(), 77.0);
}

#[test]
fn reading_a_write_only_property_never_reaches_the_backend() {
    let backend = Arc::new(MockSdk::new());
    // Writable only.
    backend.push_property(MockProperty::new("Reset", 0x220, MockValue::Text(String::new())));
    let camera = open_with(backend.clone());
    let prop = camera.property("Reset").unwrap();

    assert!(matches!(
        prop.get_text(),
        Err(Error::AccessViolation { .. })
    ));
    assert_eq!(backend.calls("get_property_value"), 0);
}

#[test]
fn read_once_properties_are_readable() {
    let backend = Arc::new(MockSdk::new());
    backend.push_property(MockProperty::new(
        "SerialNumber",
        0x1010, // text with only the read-once bit
        MockValue::Text("GB001234".into()),
    ));
    let camera = open_with(backend);
    let prop = camera.property("SerialNumber").unwrap();

    assert!(prop.is_read_once());
    assert!(!prop.is_readable());
    assert_eq!(prop.get_text().unwrap(), "GB001234");
}

#[test]
fn enum_range_buffer_doubles_until_the_text_fits() {
    let backend = Arc::new(MockSdk::new());
    // 700 bytes of range text: too big for the 512-byte first attempt,
    // fits after one doubling.
    let mut range = String::new();
    for i in 0..35 {
        if i > 0 {
            range.push(',');
        }
        range.push_str(&format!("choice_{i:02}=Display {i:02}"));
    }
    assert!(range.len() > 512 && range.len() < 1024);
    backend.push_property(MockProperty::new(
        "TriggerMode",
        0x302,
        MockValue::Enum {
            value: "choice_00".into(),
            range,
        },
    ));
    let camera = open_with(backend.clone());
    let prop = camera.property("TriggerMode").unwrap();

    let entries = prop.entries();
    assert_eq!(entries.len(), 35);
    assert_eq!(entries[2].name, "choice_02");
    assert_eq!(entries[2].display, "Display 02");
    // Both queries happened while the registry was built; reading the
    // cached choices adds none.
    assert_eq!(backend.calls("property_range_enum"), 2);
}

#[test]
fn small_enum_range_needs_one_query() {
    let backend = Arc::new(MockSdk::new());
    backend.push_property(MockProperty::new(
        "GainMode",
        0x302,
        MockValue::Enum {
            value: "Low".into(),
            range: "Low=Low gain,High=High gain".into(),
        },
    ));
    let camera = open_with(backend.clone());

    let entries = camera.property("GainMode").unwrap().entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(backend.calls("property_range_enum"), 1);
}

#[test]
fn enum_set_rejects_unknown_choice_without_a_native_set() {
    let backend = Arc::new(MockSdk::new());
    backend.push_property(MockProperty::new(
        "GainMode",
        0x302,
        MockValue::Enum {
            value: "Low".into(),
            range: "Low=Low gain,High=High gain".into(),
        },
    ));
    let camera = open_with(backend.clone());
    let prop = camera.property("GainMode").unwrap();

    let range_queries = backend.calls("property_range_enum");
    let err = prop.set_enum("Medium").unwrap_err();
    assert!(matches!(err, Error::InvalidValue { .. }));
    // The rejected write validated against the cached choices: no set call
    // and no fresh range query.
    assert_eq!(backend.calls("set_property_value_enum"), 0);
    assert_eq!(backend.calls("property_range_enum"), range_queries);

    prop.set_enum("High").unwrap();
    assert_eq!(prop.get_enum().unwrap(), "High");
}

#[test]
fn zero_size_blob_reads_empty_without_a_content_call() {
    let backend = Arc::new(MockSdk::new());
    backend.push_property(MockProperty::new("Correction", 0x308, MockValue::Blob(vec![])));
    let camera = open_with(backend.clone());

    let blob = camera.property("Correction").unwrap().get_blob().unwrap();
    assert!(blob.is_empty());
    assert_eq!(backend.calls("get_property_blob"), 0);
}

#[test]
fn blob_round_trips_through_size_and_content_calls() {
    let backend = Arc::new(MockSdk::new());
    backend.push_property(MockProperty::new(
        "Correction",
        0x308,
        MockValue::Blob(vec![1, 2, 3, 4]),
    ));
    let camera = open_with(backend.clone());
    let prop = camera.property("Correction").unwrap();

    assert_eq!(prop.get_blob().unwrap(), vec![1, 2, 3, 4]);
    assert_eq!(backend.calls("get_property_blob"), 1);

    prop.set_blob(&[9, 8]).unwrap();
    assert_eq!(prop.get_blob().unwrap(), vec![9, 8]);
}

#[test]
fn boolean_properties_ride_the_integer_accessors() {
    let backend = Arc::new(MockSdk::new());
    backend.push_property(MockProperty::new("AutoMode", 0x304, MockValue::Long(0)));
    let camera = open_with(backend.clone());
    let prop = camera.property("AutoMode").unwrap();

    assert_eq!(prop.kind(), PropertyKind::Boolean);
    assert!(!prop.get_bool().unwrap());
    prop.set_bool(true).unwrap();
    assert!(prop.get_bool().unwrap());
    assert_eq!(backend.calls("set_property_value_long"), 1);
}

#[test]
fn action_trigger_writes_one_through_the_integer_accessor() {
    let backend = Arc::new(MockSdk::new());
    backend.push_property(MockProperty::new("Calibrate", 0x220, MockValue::Long(0)));
    let camera = open_with(backend.clone());
    let prop = camera.property("Calibrate").unwrap();

    assert_eq!(prop.kind(), PropertyKind::Action);
    prop.trigger().unwrap();
    assert_eq!(backend.calls("set_property_value_long"), 1);
}

#[test]
fn generic_value_follows_the_kind() {
    let backend = Arc::new(MockSdk::new());
    backend.push_property(MockProperty::new("Gain", 0x301, MockValue::Float(2.5)));
    backend.push_property(MockProperty::new(
        "GainMode",
        0x302,
        MockValue::Enum {
            value: "Low".into(),
            range: "Low=Low,High=High".into(),
        },
    ));
    let camera = open_with(backend);

    assert_eq!(
        camera.property("Gain").unwrap().value().unwrap(),
        PropertyValue::Numeric(2.5)
    );
    assert_eq!(
        camera.property("GainMode").unwrap().value().unwrap(),
        PropertyValue::Enumerated("Low".into())
    );
}

#[test]
fn numeric_range_comes_from_the_range_text() {
    let backend = Arc::new(MockSdk::new());
    backend.push_property(MockProperty {
        name: "IntegrationTime".into(),
        tag: 0x301,
        category: "Sensor".into(),
        unit: "us".into(),
        range: "10>80000".into(),
        value: MockValue::Long(25_000),
    });
    let camera = open_with(backend);
    let prop = camera.property("IntegrationTime").unwrap();

    assert_eq!(prop.range().unwrap(), (10.0, 80_000.0));
    assert_eq!(prop.raw_range().unwrap(), "10>80000");
    assert_eq!(prop.unit(), "us");
    assert_eq!(prop.category(), "Sensor");
}
