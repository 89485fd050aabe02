//! Safe bindings for Xenics infrared cameras.
//!
//! The native vendor library exposes cameras through C entry points: status
//! codes, name-keyed properties, caller-owned frame buffers. This crate
//! wraps that surface in typed Rust:
//!
//! - [`sdk::SdkContext`] loads the library once and translates status codes.
//! - [`discovery::Discovery`] enumerates devices across transports.
//! - [`camera::XCamera`] owns one connection: capture control, frame
//!   fetches, settings and calibration files.
//! - [`registry::PropertyRegistry`] and [`properties::Property`] give typed
//!   access to every camera setting.
//! - [`frame::FrameBuffer`] and [`footer::FrameFooter`] handle frame
//!   geometry and per-frame footer decoding.
//!
//! # Backends
//!
//! The default `mock` feature provides a scriptable in-process backend used
//! by the tests and demos. Enabling `xeneth_sdk` compiles the real FFI
//! backend, which needs the vendor SDK at build time.
//!
//! ```no_run
//! use std::sync::Arc;
//! use xeneth::camera::{GetFrameFlags, XCamera};
//! use xeneth::discovery::{Discovery, EnumerationFlags};
//! use xeneth::sdk::{mock::MockSdk, SdkContext};
//!
//! # fn main() -> xeneth::error::Result<()> {
//! let sdk = SdkContext::new(Arc::new(MockSdk::new()));
//! let devices = Discovery::new(sdk.clone()).enumerate(EnumerationFlags::ENABLE_ALL)?;
//! let mut camera = XCamera::open(sdk, &devices[0].url, None)?;
//! camera.start_capture()?;
//! let mut buffer = camera.create_buffer(None)?;
//! if camera.get_frame(&mut buffer, GetFrameFlags::BLOCKING)? {
//!     println!("got {} image bytes", buffer.image_data().len());
//! }
//! camera.close();
//! # Ok(())
//! # }
//! ```

pub mod camera;
pub mod discovery;
pub mod error;
pub mod footer;
pub mod frame;
pub mod properties;
pub mod registry;
pub mod sdk;

pub use camera::{CalibrationFlags, ColourMode, GetFrameFlags, XCamera};
pub use discovery::{DeviceDescriptor, DeviceState, Discovery, EnumerationFlags};
pub use error::{Error, Result};
pub use footer::{FrameFooter, HardwareFooter};
pub use frame::{FrameBuffer, FrameFormat};
pub use properties::{EnumEntry, Property, PropertyKind, PropertyValue};
pub use registry::PropertyRegistry;
pub use sdk::{SdkContext, StatusHook, StatusMessage};
