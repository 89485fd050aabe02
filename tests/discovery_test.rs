//! Device enumeration against the scripted backend: the two-phase count
//! and fill protocol, cache reuse on the second phase, and the discovery
//! property surface.

#![cfg(feature = "mock")]
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use xeneth::discovery::{DeviceDescriptor, DeviceState, Discovery, EnumerationFlags};
use xeneth::sdk::mock::{MockProperty, MockSdk, MockValue};
use xeneth::sdk::SdkContext;

fn device(url: &str, serial: u32) -> DeviceDescriptor {
    DeviceDescriptor {
        name: "Gobi-640-GigE".into(),
        transport: "GigEVision".into(),
        url: url.into(),
        address: "192.168.2.2".into(),
        serial,
        pid: 0xF003,
        state: DeviceState::Available,
    }
}

#[test]
fn enumerate_returns_all_devices() {
    let backend = Arc::new(MockSdk::new());
    backend.push_device(device("cam://0", 1));
    backend.push_device(device("cam://1", 2));
    let sdk = SdkContext::new(backend.clone());

    let devices = Discovery::new(sdk)
        .enumerate(EnumerationFlags::ENABLE_ALL)
        .unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].url, "cam://0");
    assert_eq!(devices[1].serial, 2);
    assert_eq!(backend.calls("enumerate_devices"), 2);
}

#[test]
fn fill_phase_reuses_cached_probe() {
    let backend = Arc::new(MockSdk::new());
    backend.push_device(device("cam://0", 1));
    let sdk = SdkContext::new(backend.clone());

    Discovery::new(sdk)
        .enumerate(EnumerationFlags::GIGE_VISION)
        .unwrap();

    let flags = backend.enumerate_flags();
    assert_eq!(flags.len(), 2);
    assert_eq!(flags[0], EnumerationFlags::GIGE_VISION.bits());
    assert_eq!(
        flags[1],
        (EnumerationFlags::GIGE_VISION | EnumerationFlags::USE_CACHED).bits()
    );
}

#[test]
fn zero_devices_skips_the_fill_phase() {
    let backend = Arc::new(MockSdk::new());
    let sdk = SdkContext::new(backend.clone());

    let devices = Discovery::new(sdk)
        .enumerate(EnumerationFlags::ENABLE_ALL)
        .unwrap();

    assert!(devices.is_empty());
    assert_eq!(backend.calls("enumerate_devices"), 1);
}

#[test]
fn discovery_properties_round_trip() {
    let backend = Arc::new(MockSdk::new());
    backend.push_discovery_property(MockProperty {
        name: "GevSearchTimeout".into(),
        tag: 0x301,
        category: "Discovery".into(),
        unit: "ms".into(),
        range: "100>10000".into(),
        value: MockValue::Long(1000),
    });
    let sdk = SdkContext::new(backend);
    let discovery = Discovery::new(sdk);

    assert_eq!(discovery.property_count(), 1);
    assert_eq!(discovery.property_name(0).unwrap(), "GevSearchTimeout");
    assert_eq!(discovery.property_category("GevSearchTimeout").unwrap(), "Discovery");
    assert_eq!(discovery.property_type("GevSearchTimeout").unwrap(), 0x301);
    assert_eq!(discovery.get_long("GevSearchTimeout").unwrap(), 1000);
    assert_eq!(discovery.property_range("GevSearchTimeout").unwrap(), "100>10000");

    discovery.set_long("GevSearchTimeout", 2500).unwrap();
    assert_eq!(discovery.get_long("GevSearchTimeout").unwrap(), 2500);
}

#[test]
fn unknown_discovery_property_is_an_api_error() {
    let sdk = SdkContext::new(Arc::new(MockSdk::new()));
    let err = Discovery::new(sdk).get("NoSuchProperty").unwrap_err();
    assert_eq!(err.code(), Some(xeneth::error::codes::E_NOT_FOUND));
}
