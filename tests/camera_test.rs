//! Camera lifecycle and frame fetching over the scripted backend: open and
//! close bookkeeping, capture state, the no-frame result, footer delivery,
//! status hooks and the file pass-throughs.

#![cfg(feature = "mock")]
#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use xeneth::camera::{CalibrationFlags, GetFrameFlags};
use xeneth::error::{codes, Error};
use xeneth::footer::HardwareFooter;
use xeneth::frame::FrameFormat;
use xeneth::sdk::mock::MockSdk;
use xeneth::sdk::{SdkContext, StatusHook, StatusMessage};
use xeneth::XCamera;

fn open(backend: Arc<MockSdk>) -> XCamera {
    let sdk = SdkContext::new(backend);
    XCamera::open(sdk, "cam://0", None).unwrap()
}

fn gobi_footer(frame_counter: u32) -> Vec<u8> {
    let mut raw = Vec::new();
    raw.extend_from_slice(&60u16.to_le_bytes());
    raw.extend_from_slice(&0xAA00u16.to_le_bytes());
    raw.extend_from_slice(&1_000_000i64.to_le_bytes());
    raw.extend_from_slice(&1_016_667i64.to_le_bytes());
    raw.extend_from_slice(&frame_counter.to_le_bytes());
    raw.extend_from_slice(&0u32.to_le_bytes());
    raw.extend_from_slice(&28u32.to_le_bytes());
    raw.extend_from_slice(&0xF003u16.to_le_bytes());
    raw.extend_from_slice(&25_000u32.to_le_bytes());
    raw.extend_from_slice(&0u32.to_le_bytes());
    raw.extend_from_slice(&0u32.to_le_bytes());
    raw.extend_from_slice(&295u16.to_le_bytes());
    raw.extend_from_slice(&[0u8; 2]);
    raw.extend_from_slice(&0u16.to_le_bytes());
    raw.extend_from_slice(&0u32.to_le_bytes());
    raw.extend_from_slice(&1u16.to_le_bytes());
    raw.extend_from_slice(&(frame_counter as u16).to_le_bytes());
    raw.extend_from_slice(&[0u8; 2]);
    raw
}

#[test]
fn open_close_cycle_releases_the_handle() {
    let backend = Arc::new(MockSdk::new());
    let mut camera = open(backend.clone());

    assert!(camera.is_initialized());
    camera.close();
    assert!(!camera.is_initialized());
    assert_eq!(backend.calls("close_camera"), 1);

    // A second close is a no-op.
    camera.close();
    assert_eq!(backend.calls("close_camera"), 1);
}

#[test]
fn drop_closes_the_connection() {
    let backend = Arc::new(MockSdk::new());
    {
        let _camera = open(backend.clone());
    }
    assert_eq!(backend.calls("close_camera"), 1);
}

#[test]
fn close_stops_a_running_capture_first() {
    let backend = Arc::new(MockSdk::new());
    let mut camera = open(backend.clone());
    camera.start_capture().unwrap();
    assert!(camera.is_capturing());

    camera.close();
    assert_eq!(backend.calls("stop_capture"), 1);
}

#[test]
fn uninitialized_open_yields_an_empty_registry() {
    let mut backend = MockSdk::new();
    backend.open_succeeds = false;
    let camera = open(Arc::new(backend));

    assert!(!camera.is_initialized());
    assert!(camera.properties().is_empty());
}

#[test]
fn get_frame_reports_data_and_no_frame_distinctly() {
    let backend = Arc::new(MockSdk::new());
    backend.push_frame(vec![0xAB; 640 * 480 * 2]);
    let camera = open(backend);
    camera.start_capture().unwrap();

    let mut buffer = camera.create_buffer(None).unwrap();
    assert_eq!(buffer.format(), FrameFormat::Gray16);

    assert!(camera.get_frame(&mut buffer, GetFrameFlags::empty()).unwrap());
    assert!(buffer.image_data().iter().all(|&b| b == 0xAB));

    // Queue exhausted: no frame is a false, not an error.
    assert!(!camera.get_frame(&mut buffer, GetFrameFlags::empty()).unwrap());
}

#[test]
fn frame_footer_arrives_past_the_image_region() {
    let mut backend = MockSdk::new();
    backend.footer_length = 60;
    let backend = Arc::new(backend);
    backend.push_frame_with_footer(vec![1; 640 * 480 * 2], gobi_footer(7));
    let camera = open(backend);
    camera.start_capture().unwrap();

    let mut buffer = camera.create_buffer(None).unwrap();
    assert_eq!(buffer.footer_rows(), 1);
    assert!(camera
        .get_frame(&mut buffer, GetFrameFlags::FETCH_FOOTER)
        .unwrap());

    let footer = buffer.footer().unwrap();
    assert_eq!(footer.version, 0xAA00);
    assert_eq!(footer.frame_counter, 7);
    match footer.hardware {
        Some(HardwareFooter::Gobi(gobi)) => {
            assert_eq!(gobi.temp_die, 295);
            assert_eq!(gobi.frame_counter, 7);
        }
        other => panic!("expected Gobi footer, got {other:?}"),
    }
}

#[test]
fn colour_frames_size_and_split_on_whole_pixels() {
    let mut backend = MockSdk::new();
    backend.frame_type = FrameFormat::Rgb32.to_native();
    backend.bit_size = 8;
    backend.footer_length = 60;
    let backend = Arc::new(backend);
    backend.push_frame_with_footer(vec![0x55; 640 * 480 * 3], gobi_footer(3));
    let camera = open(backend);
    camera.start_capture().unwrap();

    let mut buffer = camera.create_buffer(None).unwrap();
    assert_eq!(buffer.format(), FrameFormat::Rgb32);
    assert_eq!(buffer.image_size(), 640 * 480 * 3);
    // 60 footer bytes fit inside one 640 * 3 byte row.
    assert_eq!(buffer.footer_rows(), 1);
    assert_eq!(buffer.total_size(), 640 * 481 * 3);

    assert!(camera
        .get_frame(&mut buffer, GetFrameFlags::FETCH_FOOTER)
        .unwrap());
    assert!(buffer.image_data().iter().all(|&b| b == 0x55));

    // The footer starts right past the three-byte-pixel image region.
    let footer = buffer.footer().unwrap();
    assert_eq!(footer.frame_counter, 3);
    assert!(matches!(footer.hardware, Some(HardwareFooter::Gobi(_))));
}

#[test]
fn api_errors_carry_translated_messages() {
    let backend = Arc::new(MockSdk::new());
    let sdk = SdkContext::new(backend);
    let camera = XCamera::open(sdk.clone(), "cam://0", None).unwrap();

    // No such property: the backend answers with a real status code and the
    // context translates it.
    let err = sdk.check(codes::E_NOT_FOUND).unwrap_err();
    match &err {
        Error::Api { code, message } => {
            assert_eq!(*code, codes::E_NOT_FOUND);
            assert_eq!(message, "File/Data not found.");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert!(camera.property("Missing").is_none());
}

#[test]
fn unknown_codes_fall_back_to_a_generic_message() {
    let sdk = SdkContext::new(Arc::new(MockSdk::new()));
    let err = sdk.check(99_999).unwrap_err();
    assert!(err.to_string().contains("unknown error code 99999"));
}

#[test]
fn status_hook_lives_for_the_connection() {
    let backend = Arc::new(MockSdk::new());
    let sdk = SdkContext::new(backend.clone());

    let seen = Arc::new(AtomicU32::new(0));
    let hook = {
        let seen = Arc::clone(&seen);
        StatusHook::new(move |message, param| {
            assert_eq!(message, StatusMessage::Correction);
            seen.fetch_add(param, Ordering::SeqCst);
        })
    };
    let mut camera = XCamera::open(sdk, "cam://0", Some(hook)).unwrap();

    backend.emit_status(1, StatusMessage::Correction, 5);
    assert_eq!(seen.load(Ordering::SeqCst), 5);

    // After close the backend forgets the hook.
    camera.close();
    backend.emit_status(1, StatusMessage::Correction, 5);
    assert_eq!(seen.load(Ordering::SeqCst), 5);
}

#[test]
fn file_operations_pass_paths_through() {
    let backend = Arc::new(MockSdk::new());
    let camera = open(backend.clone());

    camera.load_settings("startup.xcf").unwrap();
    camera.save_settings("saved.xcf").unwrap();
    camera
        .load_calibration("pack.xca", CalibrationFlags::START_SOFTWARE_CORRECTION)
        .unwrap();
    camera.load_colour_profile("iron.png").unwrap();

    let ops = backend.file_operations();
    assert_eq!(
        ops,
        vec![
            ("load_settings".to_owned(), "startup.xcf".to_owned()),
            ("save_settings".to_owned(), "saved.xcf".to_owned()),
            ("load_calibration".to_owned(), "pack.xca".to_owned()),
            ("load_colour_profile".to_owned(), "iron.png".to_owned()),
        ]
    );
}

#[test]
fn geometry_getters_reflect_the_backend() {
    let mut backend = MockSdk::new();
    backend.width = 320;
    backend.height = 240;
    backend.bit_size = 8;
    backend.frame_type = 1;
    let camera = open(Arc::new(backend));

    assert_eq!(camera.width(), 320);
    assert_eq!(camera.height(), 240);
    assert_eq!(camera.bit_size(), 8);
    assert_eq!(camera.frame_type(), FrameFormat::Gray8);
    assert_eq!(camera.max_value(), 255);
    assert_eq!(camera.frame_size(), 320 * 240);
}
