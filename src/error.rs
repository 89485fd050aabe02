//! Error types for the Xeneth binding.
//!
//! Every native entry point returns a status code; zero means success. The
//! [`crate::sdk::SdkContext`] translates nonzero codes into [`Error::Api`]
//! using a message table built once at context creation. On top of that sit
//! the client-side failures that are detected before any native call is made:
//! access violations, unknown property names and enum values outside the
//! legal set.
//!
//! Two conditions are deliberately NOT errors:
//! - "no frame available" from a non-blocking frame fetch is the `false`
//!   return of [`crate::camera::XCamera::get_frame`];
//! - `E_MISMATCHED` during an enum range query is recovered internally by
//!   doubling the destination buffer.

use thiserror::Error;

/// Fixed set of status codes reported by the native layer.
pub mod codes {
    /// Success.
    pub const I_OK: u32 = 0;
    /// Internal.
    pub const I_DIRTY: u32 = 1;
    /// Generic.
    pub const E_BUG: u32 = 10000;
    /// Camera was not successfully initialized.
    pub const E_NOINIT: u32 = 10001;
    /// Invalid logic file.
    pub const E_LOGICLOADFAILED: u32 = 10002;
    /// Command interface failure.
    pub const E_INTERFACE_ERROR: u32 = 10003;
    /// Provided value is incapable of being produced by the hardware.
    pub const E_OUT_OF_RANGE: u32 = 10004;
    /// Functionality not supported by this camera.
    pub const E_NOT_SUPPORTED: u32 = 10005;
    /// File/data not found.
    pub const E_NOT_FOUND: u32 = 10006;
    /// Filter has finished processing and will be removed.
    pub const E_FILTER_DONE: u32 = 10007;
    /// A frame was requested but none was available.
    pub const E_NO_FRAME: u32 = 10008;
    /// Couldn't save to file.
    pub const E_SAVE_ERROR: u32 = 10009;
    /// Buffer size mismatch.
    pub const E_MISMATCHED: u32 = 10010;
    /// The camera is busy.
    pub const E_BUSY: u32 = 10011;
    /// An unknown handle was passed to the C API.
    pub const E_INVALID_HANDLE: u32 = 10012;
    /// Operation timed out.
    pub const E_TIMEOUT: u32 = 10013;
    /// Frame grabber error.
    pub const E_FRAMEGRABBER: u32 = 10014;
    /// The frame could not be converted to the requested format.
    pub const E_NO_CONVERSION: u32 = 10015;
    /// Filter indicates the frame should be skipped.
    pub const E_FILTER_SKIP_FRAME: u32 = 10016;
    /// Version mismatch.
    pub const E_WRONG_VERSION: u32 = 10017;
    /// Packet loss prevented delivering the frame.
    pub const E_PACKET_ERROR: u32 = 10018;
    /// Wrong file format.
    pub const E_WRONG_FORMAT: u32 = 10019;
    /// Wrong dimensions.
    pub const E_WRONG_SIZE: u32 = 10020;
    /// Internal.
    pub const E_CAPSTOP: u32 = 10021;
    /// An allocation failed because the system ran out of memory.
    pub const E_OUT_OF_MEMORY: u32 = 10022;
    /// Reserved.
    pub const E_RFU: u32 = 10023;

    /// All status codes the native layer documents. The error message table
    /// is built by querying the native code-to-string facility once per
    /// entry.
    pub const KNOWN_CODES: &[u32] = &[
        I_OK,
        I_DIRTY,
        E_BUG,
        E_NOINIT,
        E_LOGICLOADFAILED,
        E_INTERFACE_ERROR,
        E_OUT_OF_RANGE,
        E_NOT_SUPPORTED,
        E_NOT_FOUND,
        E_FILTER_DONE,
        E_NO_FRAME,
        E_SAVE_ERROR,
        E_MISMATCHED,
        E_BUSY,
        E_INVALID_HANDLE,
        E_TIMEOUT,
        E_FRAMEGRABBER,
        E_NO_CONVERSION,
        E_FILTER_SKIP_FRAME,
        E_WRONG_VERSION,
        E_PACKET_ERROR,
        E_WRONG_FORMAT,
        E_WRONG_SIZE,
        E_CAPSTOP,
        E_OUT_OF_MEMORY,
        E_RFU,
    ];
}

/// Direction of a failed property access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyAccess {
    /// A read was attempted on a write-only property.
    Read,
    /// A write was attempted on a read-only property.
    Write,
}

impl std::fmt::Display for PropertyAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyAccess::Read => write!(f, "read (property is write-only)"),
            PropertyAccess::Write => write!(f, "written (property is read-only)"),
        }
    }
}

/// Errors produced by this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A native call returned a nonzero status code.
    #[error("native call failed with code {code}: {message}")]
    Api {
        /// The raw status code.
        code: u32,
        /// Translated message, or "unknown error code N".
        message: String,
    },

    /// A property access violated its access flags; detected client-side
    /// before any native call.
    #[error("property '{property}' cannot be {access}")]
    AccessViolation {
        /// Name of the property.
        property: String,
        /// Whether the illegal access was a read or a write.
        access: PropertyAccess,
    },

    /// Lookup of a property name with no registry entry.
    #[error("camera property '{0}' does not exist")]
    InvalidProperty(String),

    /// An enumerated property was set to a value outside its legal set.
    #[error("the value '{value}' is not valid for property '{property}'")]
    InvalidValue {
        /// Name of the property.
        property: String,
        /// The rejected value.
        value: String,
    },

    /// A frame buffer was requested for a format that carries no pixel
    /// geometry. The caller must resolve `Native` to a concrete format
    /// first.
    #[error("frame buffers require a concrete frame format, got {0:?}")]
    UnsupportedFrameFormat(crate::frame::FrameFormat),
}

impl Error {
    /// The raw status code, if this error wraps one.
    pub fn code(&self) -> Option<u32> {
        match self {
            Error::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_include_success_and_no_frame() {
        assert!(codes::KNOWN_CODES.contains(&codes::I_OK));
        assert!(codes::KNOWN_CODES.contains(&codes::E_NO_FRAME));
        assert_eq!(codes::KNOWN_CODES.len(), 26);
    }

    #[test]
    fn api_error_exposes_code() {
        let err = Error::Api {
            code: codes::E_TIMEOUT,
            message: "timeout".into(),
        };
        assert_eq!(err.code(), Some(codes::E_TIMEOUT));
        assert_eq!(Error::InvalidProperty("Gain".into()).code(), None);
    }
}
