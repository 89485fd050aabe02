//! Captures a few frames from the mock backend and decodes their footers.
//!
//! Run with `cargo run --example live_capture`.

use std::sync::Arc;

use anyhow::Context;
use xeneth::camera::GetFrameFlags;
use xeneth::discovery::{DeviceDescriptor, DeviceState, Discovery, EnumerationFlags};
use xeneth::footer::HardwareFooter;
use xeneth::sdk::mock::MockSdk;
use xeneth::sdk::{SdkContext, StatusHook};
use xeneth::XCamera;

fn gobi_footer(frame: u32) -> Vec<u8> {
    let mut raw = Vec::new();
    raw.extend_from_slice(&66u16.to_le_bytes()); // len
    raw.extend_from_slice(&0xAA00u16.to_le_bytes()); // ver
    raw.extend_from_slice(&1_000_000i64.to_le_bytes()); // soc
    raw.extend_from_slice(&(1_000_000i64 + i64::from(frame) * 16_667).to_le_bytes()); // tft
    raw.extend_from_slice(&frame.to_le_bytes()); // tfc
    raw.extend_from_slice(&0u32.to_le_bytes()); // fltref
    raw.extend_from_slice(&28u32.to_le_bytes()); // hfl
    raw.extend_from_slice(&0xF003u16.to_le_bytes()); // pid / status
    raw.extend_from_slice(&25_000u32.to_le_bytes()); // tint
    raw.extend_from_slice(&0u32.to_le_bytes()); // timelo
    raw.extend_from_slice(&0u32.to_le_bytes()); // timehi
    raw.extend_from_slice(&295u16.to_le_bytes()); // temp_die
    raw.extend_from_slice(&[0u8; 2]); // reserved
    raw.extend_from_slice(&0u16.to_le_bytes()); // tag
    raw.extend_from_slice(&0u32.to_le_bytes()); // image_offset
    raw.extend_from_slice(&1u16.to_le_bytes()); // image_gain
    raw.extend_from_slice(&(frame as u16).to_le_bytes()); // frame_cnt
    raw.extend_from_slice(&[0u8; 2]); // reserved
    raw
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut backend = MockSdk::new();
    backend.footer_length = 60;
    let backend = Arc::new(backend);
    backend.push_device(DeviceDescriptor {
        name: "Gobi-640-GigE".into(),
        transport: "GigEVision".into(),
        url: "cam://0".into(),
        address: "192.168.2.2".into(),
        serial: 0x1234_5678,
        pid: 0xF003,
        state: DeviceState::Available,
    });
    let frame_bytes = 640 * 480 * 2;
    for frame in 0..3u32 {
        backend.push_frame_with_footer(
            vec![(frame as u8).wrapping_add(1); frame_bytes],
            gobi_footer(frame),
        );
    }

    let sdk = SdkContext::new(backend);
    let devices = Discovery::new(sdk.clone()).enumerate(EnumerationFlags::GIGE_VISION)?;
    let device = devices.first().context("no devices found")?;

    let hook = StatusHook::new(|message, param| {
        println!("status: {message:?} ({param})");
    });
    let mut camera = XCamera::open(sdk, &device.url, Some(hook))?;
    camera.start_capture()?;

    let mut buffer = camera.create_buffer(None)?;
    loop {
        if !camera.get_frame(&mut buffer, GetFrameFlags::FETCH_FOOTER)? {
            break;
        }
        let peak = buffer.image_data().iter().copied().max().unwrap_or(0);
        match buffer.footer() {
            Some(footer) => {
                print!(
                    "frame {} at {}us, peak byte {peak}",
                    footer.frame_counter, footer.time_of_reception_us
                );
                if let Some(HardwareFooter::Gobi(gobi)) = footer.hardware {
                    print!(", die {}K, tint {}us", gobi.temp_die, gobi.tint);
                }
                println!();
            }
            None => println!("frame without footer, peak byte {peak}"),
        }
    }

    camera.stop_capture()?;
    camera.close();
    Ok(())
}
