//! Enumerates devices on the mock backend and dumps the property registry
//! of the first one.
//!
//! Run with `cargo run --example list_properties`.

use std::sync::Arc;

use anyhow::Context;
use xeneth::discovery::{DeviceDescriptor, DeviceState, Discovery, EnumerationFlags};
use xeneth::sdk::mock::{MockProperty, MockSdk, MockValue};
use xeneth::sdk::SdkContext;
use xeneth::XCamera;

fn scripted_backend() -> Arc<MockSdk> {
    let backend = Arc::new(MockSdk::new());
    backend.push_device(DeviceDescriptor {
        name: "Gobi-640-GigE".into(),
        transport: "GigEVision".into(),
        url: "cam://0".into(),
        address: "192.168.2.2".into(),
        serial: 0x1234_5678,
        pid: 0xF003,
        state: DeviceState::Available,
    });
    backend.push_property(MockProperty {
        name: "IntegrationTime(0)".into(),
        tag: 0x301,
        category: "Camera/Sensor".into(),
        unit: "us".into(),
        range: "10>80000".into(),
        value: MockValue::Long(25_000),
    });
    backend.push_property(MockProperty {
        name: "GainMode".into(),
        tag: 0x302,
        category: "Camera/Sensor".into(),
        unit: String::new(),
        range: String::new(),
        value: MockValue::Enum {
            value: "High".into(),
            range: "Low=Low gain,High=High gain".into(),
        },
    });
    backend.push_property(MockProperty {
        name: "AutoCorrectionEnabled".into(),
        tag: 0x304,
        category: "Camera/Correction".into(),
        unit: String::new(),
        range: String::new(),
        value: MockValue::Long(1),
    });
    backend.push_property(MockProperty {
        name: "SerialNumber".into(),
        tag: 0x110, // text, read-once only
        category: "Camera/Info".into(),
        unit: String::new(),
        range: String::new(),
        value: MockValue::Text("GB001234".into()),
    });
    backend
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let sdk = SdkContext::new(scripted_backend());
    let devices = Discovery::new(sdk.clone()).enumerate(EnumerationFlags::ENABLE_ALL)?;
    let device = devices.first().context("no devices found")?;
    println!(
        "{} ({}) at {} [{:?}]",
        device.name, device.transport, device.url, device.state
    );

    let camera = XCamera::open(sdk, &device.url, None)?;
    println!("{} properties:", camera.properties().len());
    for prop in camera.properties().iter() {
        let access = match (prop.is_readable() || prop.is_read_once(), prop.is_writable()) {
            (true, true) => "rw",
            (true, false) => "r-",
            (false, true) => "-w",
            (false, false) => "--",
        };
        let value = prop
            .value()
            .map(|v| v.to_string())
            .unwrap_or_else(|e| format!("<{e}>"));
        println!(
            "  {:<24} {:<10} {} {:<12} {} {}",
            prop.name(),
            prop.kind(),
            access,
            value,
            prop.unit(),
            prop.category(),
        );
    }
    Ok(())
}
