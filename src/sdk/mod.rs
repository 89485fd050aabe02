//! The native SDK boundary.
//!
//! [`NativeSdk`] mirrors the C entry points of the vendor library: status
//! code returns, out-parameters, and explicit destination capacities wherever
//! the protocol's behaviour depends on buffer size (string reads, range
//! queries, blob and frame reads). Everything above this trait is safe,
//! typed Rust; everything below it is either the real FFI backend (behind the
//! `xeneth_sdk` feature) or a substitutable fake.
//!
//! [`SdkContext`] replaces the original's "load the library once" module
//! global with an explicit object created once per process and shared by
//! [`crate::discovery::Discovery`] and [`crate::camera::XCamera`]. It owns
//! the status-code message table, built at construction by querying the
//! backend's code-to-string facility once for every known code.

#[cfg(feature = "xeneth_sdk")]
mod ffi;
#[cfg(feature = "mock")]
pub mod mock;

use std::collections::HashMap;
use std::sync::Arc;

use crate::discovery::DeviceDescriptor;
use crate::error::{codes, Error, Result};

/// Camera handle issued by the native layer. Zero is never a valid open
/// handle.
pub type Handle = i32;

/// Buffer sizes used for fixed-capacity string reads.
pub mod limits {
    /// Maximum property name length.
    pub const MAX_PROPERTY_NAME_LEN: usize = 256;
    /// Maximum property category length.
    pub const MAX_PROPERTY_CATEGORY_LEN: usize = 1024;
    /// Maximum string/enum property value length.
    pub const MAX_PROPERTY_VALUE_LEN: usize = 1024;
    /// Maximum property unit length.
    pub const MAX_PROPERTY_UNIT_LEN: usize = 256;
    /// Maximum translated error message length.
    pub const MAX_ERROR_MESSAGE_LEN: usize = 1024;
    /// Initial guess for the growable enum range buffer.
    pub const ENUM_RANGE_INITIAL_LEN: usize = 512;
    /// Fixed buffer for discovery-scope range queries.
    pub const DISCOVERY_RANGE_LEN: usize = 256;
    /// Fixed buffer for camera-scope numeric range queries.
    pub const CAMERA_RANGE_LEN: usize = 4096;
}

/// Status messages delivered through the connection-state callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMessage {
    /// Loading the camera's main logic file.
    LoadLogic,
    /// Loading the camera's video output firmware.
    LoadVideoLogic,
    /// Accessing persistent data on the camera.
    DataStorage,
    /// Uploading correction data to the camera.
    Correction,
    /// A self-starting camera is starting.
    SelfStart,
    /// String event relaying critical errors and API events.
    Message,
    /// Loading the framegrabber.
    LoadGrabber,
    /// Device information passed when connecting a device.
    DeviceInformation,
    /// A message code this binding does not know about.
    Other(i32),
}

impl StatusMessage {
    /// Map a native message code onto a variant.
    pub fn from_native(value: i32) -> Self {
        match value {
            1 => StatusMessage::LoadLogic,
            2 => StatusMessage::LoadVideoLogic,
            3 => StatusMessage::DataStorage,
            4 => StatusMessage::Correction,
            5 => StatusMessage::SelfStart,
            6 => StatusMessage::Message,
            7 => StatusMessage::LoadGrabber,
            8 => StatusMessage::DeviceInformation,
            other => StatusMessage::Other(other),
        }
    }
}

/// Owns the user's status callback for the open-to-close lifetime of a
/// connection.
///
/// The native layer retains only an opaque pointer with no lifetime guarantee
/// of its own, so the camera facade keeps a strong reference to this hook for
/// as long as the connection is open. The callback may be invoked from a
/// thread not controlled by this crate; callers that also make ordinary calls
/// on the same connection are responsible for their own synchronization.
pub struct StatusHook {
    callback: Box<dyn Fn(StatusMessage, u32) + Send + Sync>,
}

impl StatusHook {
    /// Wrap a user callback.
    pub fn new(callback: impl Fn(StatusMessage, u32) + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            callback: Box::new(callback),
        })
    }

    /// Deliver a status message. Invoked by backends.
    pub fn notify(&self, message: StatusMessage, param: u32) {
        (self.callback)(message, param);
    }
}

impl std::fmt::Debug for StatusHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusHook").finish_non_exhaustive()
    }
}

/// The raw entry points of the native library.
///
/// Methods return the native status code (`0` = success) and write results
/// through out-parameters, mirroring the C signatures. Translation of
/// nonzero codes into [`Error::Api`] happens in [`SdkContext::check`], never
/// here. A handful of entry points (geometry getters, capture state) return
/// values directly because the C API does.
///
/// `max_len` parameters are passed wherever the native call's behaviour
/// depends on the destination capacity; backends must honour them, in
/// particular by returning `E_MISMATCHED` from range queries when the
/// capacity is too small.
#[allow(clippy::too_many_arguments)]
pub trait NativeSdk: Send + Sync {
    // --- discovery scope -------------------------------------------------

    /// Two-phase device enumeration. With `dest = None` only the count is
    /// written; with a destination slice, up to `count` descriptors are
    /// filled.
    fn enumerate_devices(
        &self,
        dest: Option<&mut [DeviceDescriptor]>,
        count: &mut u32,
        flags: u32,
    ) -> u32;

    /// Number of properties on the discovery subsystem.
    fn discovery_property_count(&self) -> u32;
    /// Name of the discovery property at `index`.
    fn discovery_property_name(&self, index: u32, dest: &mut String, max_len: usize) -> u32;
    /// Category path of a discovery property.
    fn discovery_property_category(&self, name: &str, dest: &mut String, max_len: usize) -> u32;
    /// Type tag of a discovery property.
    fn discovery_property_type(&self, name: &str, dest: &mut u32) -> u32;
    /// Discovery property value through the string accessor.
    fn discovery_get_property_value(&self, name: &str, dest: &mut String, max_len: usize) -> u32;
    /// Discovery property value through the integer accessor.
    fn discovery_get_property_value_long(&self, name: &str, dest: &mut i32) -> u32;
    /// Set a discovery property through the string accessor.
    fn discovery_set_property_value(&self, name: &str, value: &str) -> u32;
    /// Set a discovery property through the integer accessor.
    fn discovery_set_property_value_long(&self, name: &str, value: i32) -> u32;
    /// Raw range text of a discovery property.
    fn discovery_property_range(&self, name: &str, dest: &mut String, max_len: usize) -> u32;

    // --- connection lifecycle --------------------------------------------

    /// Open a connection. Returns the handle; a failed open reports an
    /// uninitialized device rather than an error.
    fn open_camera(&self, name: &str, hook: Option<Arc<StatusHook>>) -> Handle;
    /// Release a connection.
    fn close_camera(&self, handle: Handle);
    /// Whether the device reports itself initialized.
    fn is_initialized(&self, handle: Handle) -> bool;
    /// Whether the device reports itself capturing.
    fn is_capturing(&self, handle: Handle) -> bool;
    /// Start the acquisition.
    fn start_capture(&self, handle: Handle) -> u32;
    /// Stop the acquisition.
    fn stop_capture(&self, handle: Handle) -> u32;

    // --- geometry and info -----------------------------------------------

    /// Current frame width in pixels.
    fn width(&self, handle: Handle) -> u32;
    /// Current frame height in pixels.
    fn height(&self, handle: Handle) -> u32;
    /// Maximum frame width in pixels.
    fn max_width(&self, handle: Handle) -> u32;
    /// Maximum frame height in pixels.
    fn max_height(&self, handle: Handle) -> u32;
    /// Current frame size in bytes, excluding the footer.
    fn frame_size(&self, handle: Handle) -> u32;
    /// Per-frame footer length in bytes.
    fn frame_footer_length(&self, handle: Handle) -> u32;
    /// Native frame type code of the camera.
    fn frame_type(&self, handle: Handle) -> i32;
    /// Number of frames captured since the capture started.
    fn frame_count(&self, handle: Handle) -> u32;
    /// Current frame rate.
    fn frame_rate(&self, handle: Handle) -> u32;
    /// Pixel depth in bits.
    fn bit_size(&self, handle: Handle) -> u32;
    /// Maximum pixel value.
    fn max_value(&self, handle: Handle) -> u32;
    /// Current colour mode code.
    fn colour_mode(&self, handle: Handle) -> u32;
    /// Change the colour mode.
    fn set_colour_mode(&self, handle: Handle, mode: u32);

    // --- frames -----------------------------------------------------------

    /// Fetch a frame into `dest`. `size` is the image byte size the caller
    /// advertises (excluding footer rows, which the native layer writes past
    /// `size` when the footer-fetch flag is set).
    fn get_frame(
        &self,
        handle: Handle,
        frame_type: i32,
        flags: u32,
        dest: &mut [u8],
        size: u32,
    ) -> u32;

    // --- camera property system ------------------------------------------

    /// Number of properties on an open camera.
    fn property_count(&self, handle: Handle) -> u32;
    /// Name of the camera property at `index`.
    fn property_name(&self, handle: Handle, index: u32, dest: &mut String, max_len: usize) -> u32;
    /// Category path of a camera property.
    fn property_category(&self, handle: Handle, name: &str, dest: &mut String, max_len: usize)
        -> u32;
    /// Raw type tag of a camera property.
    fn property_type(&self, handle: Handle, name: &str, dest: &mut u32) -> u32;
    /// Unit string of a camera property.
    fn property_unit(&self, handle: Handle, name: &str, dest: &mut String, max_len: usize) -> u32;
    /// Raw range text of a numeric property (`"lo>hi"`).
    fn property_range(&self, handle: Handle, name: &str, dest: &mut String, max_len: usize) -> u32;
    /// Raw legal-value text of an enumerated property
    /// (`"name=Display,name2=Display 2"`). Must return `E_MISMATCHED` when
    /// `max_len` is too small.
    fn property_range_enum(
        &self,
        handle: Handle,
        name: &str,
        dest: &mut String,
        max_len: usize,
    ) -> u32;
    /// Numeric min/max range of a property.
    fn property_range_f64(&self, handle: Handle, name: &str, min: &mut f64, max: &mut f64) -> u32;

    /// Property value through the string accessor.
    fn get_property_value(&self, handle: Handle, name: &str, dest: &mut String, max_len: usize)
        -> u32;
    /// Property value through the floating-point accessor.
    fn get_property_value_f64(&self, handle: Handle, name: &str, dest: &mut f64) -> u32;
    /// Property value through the integer accessor.
    fn get_property_value_long(&self, handle: Handle, name: &str, dest: &mut i32) -> u32;
    /// Property value through the enum accessor (programmatic name).
    fn get_property_value_enum(
        &self,
        handle: Handle,
        name: &str,
        dest: &mut String,
        max_len: usize,
    ) -> u32;
    /// Blob content. The caller sizes `dest` from the integer accessor
    /// beforehand.
    fn get_property_blob(&self, handle: Handle, name: &str, dest: &mut [u8]) -> u32;

    /// Set a property through the string accessor.
    fn set_property_value(&self, handle: Handle, name: &str, value: &str) -> u32;
    /// Set a property through the floating-point accessor.
    fn set_property_value_f64(&self, handle: Handle, name: &str, value: f64) -> u32;
    /// Set a property through the integer accessor.
    fn set_property_value_long(&self, handle: Handle, name: &str, value: i32) -> u32;
    /// Set a property through the enum accessor.
    fn set_property_value_enum(&self, handle: Handle, name: &str, value: &str) -> u32;
    /// Set a blob property from raw bytes.
    fn set_property_blob(&self, handle: Handle, name: &str, value: &[u8]) -> u32;

    // --- file pass-throughs ----------------------------------------------

    /// Load camera settings from a file.
    fn load_settings(&self, handle: Handle, path: &str) -> u32;
    /// Save camera settings to a file.
    fn save_settings(&self, handle: Handle, path: &str) -> u32;
    /// Load a calibration file into the camera.
    fn load_calibration(&self, handle: Handle, path: &str, flags: u32) -> u32;
    /// Load a colour profile from a file.
    fn load_colour_profile(&self, handle: Handle, path: &str) -> u32;

    // --- errors -----------------------------------------------------------

    /// Translate a status code into a message. Returns nonzero on success,
    /// mirroring the C convention for this one call.
    fn error_to_string(&self, code: u32, dest: &mut String, max_len: usize) -> i32;
}

/// Process-wide entry point to a loaded native library.
///
/// Create one per process and share it (it is cheap to clone through `Arc`)
/// between discovery and any number of cameras. Tests construct it over a
/// fake [`NativeSdk`]; production code uses [`SdkContext::load`] with the
/// `xeneth_sdk` feature.
pub struct SdkContext {
    backend: Arc<dyn NativeSdk>,
    messages: HashMap<u32, String>,
}

impl SdkContext {
    /// Wrap a backend and build the status-code message table by querying
    /// its code-to-string facility once per known code.
    pub fn new(backend: Arc<dyn NativeSdk>) -> Arc<Self> {
        let mut messages = HashMap::with_capacity(codes::KNOWN_CODES.len());
        for &code in codes::KNOWN_CODES {
            let mut text = String::new();
            if backend.error_to_string(code, &mut text, limits::MAX_ERROR_MESSAGE_LEN) != 0
                && !text.is_empty()
            {
                messages.insert(code, text);
            }
        }
        tracing::info!(known_codes = messages.len(), "native SDK context created");
        Arc::new(Self { backend, messages })
    }

    /// Load the real FFI backend.
    #[cfg(feature = "xeneth_sdk")]
    pub fn load() -> Arc<Self> {
        Self::new(Arc::new(ffi::FfiSdk::new()))
    }

    /// The backend this context drives.
    pub fn backend(&self) -> &dyn NativeSdk {
        self.backend.as_ref()
    }

    /// Human-readable text for a status code.
    pub fn translate(&self, code: u32) -> String {
        self.messages
            .get(&code)
            .cloned()
            .unwrap_or_else(|| format!("unknown error code {code}"))
    }

    /// Map a native status code onto a result. Zero is success; anything
    /// else becomes [`Error::Api`] with the translated message.
    pub fn check(&self, code: u32) -> Result<()> {
        if code == codes::I_OK {
            Ok(())
        } else {
            Err(Error::Api {
                code,
                message: self.translate(code),
            })
        }
    }
}

impl std::fmt::Debug for SdkContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdkContext")
            .field("known_codes", &self.messages.len())
            .finish_non_exhaustive()
    }
}
