//! Camera facade.
//!
//! [`XCamera`] ties the pieces together for one device: it opens a native
//! connection, builds the property registry, owns the status hook for the
//! lifetime of the connection, and exposes capture control and frame
//! fetches over caller-owned [`FrameBuffer`]s. Dropping a camera closes
//! the connection.

use std::sync::Arc;

use bitflags::bitflags;
use tracing::{debug, info, warn};

use crate::error::{codes, Result};
use crate::frame::{FrameBuffer, FrameFormat};
use crate::properties::Property;
use crate::registry::PropertyRegistry;
use crate::sdk::{Handle, SdkContext, StatusHook};

bitflags! {
    /// Frame fetch behaviour flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct GetFrameFlags: u32 {
        /// Wait for a frame instead of returning immediately when none is
        /// available.
        const BLOCKING = 1;
        /// Skip the internal 8-bit conversion pass.
        const NO_CONVERSION = 2;
        /// Also fetch the per-frame footer, written past the image region.
        const FETCH_FOOTER = 4;
    }
}

bitflags! {
    /// Flags for loading calibration packs.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CalibrationFlags: u32 {
        /// Start the software correction shipped with the pack.
        const START_SOFTWARE_CORRECTION = 1;
    }
}

bitflags! {
    /// Colour rendering of converted output. `empty()` is plain 8-bit
    /// intensity.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ColourMode: u32 {
        /// 16-bit intensity.
        const GRAY_16 = 1;
        /// Render through the loaded colour profile.
        const PROFILE = 2;
        /// Invert the colour profile.
        const INVERT = 256;
    }
}

/// One open camera connection.
pub struct XCamera {
    sdk: Arc<SdkContext>,
    handle: Handle,
    url: String,
    // Held open-to-close so the pointer registered with the native layer
    // stays valid.
    hook: Option<Arc<StatusHook>>,
    registry: PropertyRegistry,
}

impl XCamera {
    /// Open the device at `url` (for example `cam://0` or a GigE address).
    ///
    /// A connection that opens but reports itself uninitialized is returned
    /// as-is with an empty property registry; callers check
    /// [`XCamera::is_initialized`] before capturing.
    pub fn open(
        sdk: Arc<SdkContext>,
        url: &str,
        hook: Option<Arc<StatusHook>>,
    ) -> Result<Self> {
        let handle = sdk.backend().open_camera(url, hook.clone());
        let initialized = handle != 0 && sdk.backend().is_initialized(handle);
        let registry = if initialized {
            PropertyRegistry::populate(&sdk, handle)?
        } else {
            warn!(url, "device opened but reports uninitialized");
            PropertyRegistry::default()
        };
        info!(
            url,
            handle,
            initialized,
            properties = registry.len(),
            "camera opened"
        );
        Ok(Self {
            sdk,
            handle,
            url: url.to_owned(),
            hook,
            registry,
        })
    }

    /// The URL this camera was opened with.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the device reports itself fully initialized.
    pub fn is_initialized(&self) -> bool {
        self.handle != 0 && self.sdk.backend().is_initialized(self.handle)
    }

    /// Release the connection. Stops a running capture first. Safe to call
    /// more than once; [`Drop`] calls it too.
    pub fn close(&mut self) {
        if self.handle == 0 {
            return;
        }
        if self.sdk.backend().is_capturing(self.handle) {
            let code = self.sdk.backend().stop_capture(self.handle);
            if code != codes::I_OK {
                warn!(url = %self.url, code, "stop capture on close failed");
            }
        }
        self.sdk.backend().close_camera(self.handle);
        debug!(url = %self.url, "camera closed");
        self.handle = 0;
        self.hook = None;
    }

    // --- capture ----------------------------------------------------------

    /// Start the acquisition.
    pub fn start_capture(&self) -> Result<()> {
        self.sdk.check(self.sdk.backend().start_capture(self.handle))
    }

    /// Stop the acquisition.
    pub fn stop_capture(&self) -> Result<()> {
        self.sdk.check(self.sdk.backend().stop_capture(self.handle))
    }

    /// Whether the acquisition is running.
    pub fn is_capturing(&self) -> bool {
        self.handle != 0 && self.sdk.backend().is_capturing(self.handle)
    }

    /// Allocate a buffer matching this camera's geometry.
    ///
    /// `format` defaults to the camera's own frame type. The buffer reserves
    /// footer rows only when the camera reports a nonzero footer length.
    pub fn create_buffer(&self, format: Option<FrameFormat>) -> Result<FrameBuffer> {
        let backend = self.sdk.backend();
        let format = format.unwrap_or_else(|| self.frame_type());
        FrameBuffer::new(
            backend.width(self.handle) as usize,
            backend.height(self.handle) as usize,
            format,
            backend.frame_footer_length(self.handle) as usize,
        )
    }

    /// Fetch one frame into `buffer`.
    ///
    /// Returns `Ok(true)` when a frame was written, `Ok(false)` when none
    /// was available (only possible without [`GetFrameFlags::BLOCKING`]).
    /// Any other native status becomes an error.
    pub fn get_frame(&self, buffer: &mut FrameBuffer, flags: GetFrameFlags) -> Result<bool> {
        let frame_type = buffer.format().to_native();
        let size = buffer.image_size() as u32;
        let code =
            self.sdk
                .backend()
                .get_frame(self.handle, frame_type, flags.bits(), buffer.data_mut(), size);
        match code {
            codes::I_OK => Ok(true),
            codes::E_NO_FRAME => Ok(false),
            other => {
                self.sdk.check(other)?;
                Ok(false)
            }
        }
    }

    // --- geometry and info ------------------------------------------------

    /// Current frame width in pixels.
    pub fn width(&self) -> u32 {
        self.sdk.backend().width(self.handle)
    }

    /// Current frame height in pixels.
    pub fn height(&self) -> u32 {
        self.sdk.backend().height(self.handle)
    }

    /// Maximum frame width in pixels.
    pub fn max_width(&self) -> u32 {
        self.sdk.backend().max_width(self.handle)
    }

    /// Maximum frame height in pixels.
    pub fn max_height(&self) -> u32 {
        self.sdk.backend().max_height(self.handle)
    }

    /// Current frame size in bytes, excluding the footer.
    pub fn frame_size(&self) -> u32 {
        self.sdk.backend().frame_size(self.handle)
    }

    /// Per-frame footer length in bytes.
    pub fn frame_footer_length(&self) -> u32 {
        self.sdk.backend().frame_footer_length(self.handle)
    }

    /// The camera's native frame format.
    pub fn frame_type(&self) -> FrameFormat {
        FrameFormat::from_native(self.sdk.backend().frame_type(self.handle))
    }

    /// Number of frames captured since the capture started.
    pub fn frame_count(&self) -> u32 {
        self.sdk.backend().frame_count(self.handle)
    }

    /// Current frame rate.
    pub fn frame_rate(&self) -> u32 {
        self.sdk.backend().frame_rate(self.handle)
    }

    /// Pixel depth in bits.
    pub fn bit_size(&self) -> u32 {
        self.sdk.backend().bit_size(self.handle)
    }

    /// Maximum pixel value.
    pub fn max_value(&self) -> u32 {
        self.sdk.backend().max_value(self.handle)
    }

    /// Current colour mode.
    pub fn colour_mode(&self) -> ColourMode {
        ColourMode::from_bits_retain(self.sdk.backend().colour_mode(self.handle))
    }

    /// Change the colour mode.
    pub fn set_colour_mode(&self, mode: ColourMode) {
        self.sdk.backend().set_colour_mode(self.handle, mode.bits());
    }

    // --- properties -------------------------------------------------------

    /// The property registry built when this camera opened.
    pub fn properties(&self) -> &PropertyRegistry {
        &self.registry
    }

    /// Look up a property by name. The `"(0)"` instance suffix is ignored.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.registry.get(name)
    }

    /// Whether a property exists under `name`.
    pub fn has_property(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    // --- files ------------------------------------------------------------

    /// Load camera settings from a file.
    pub fn load_settings(&self, path: &str) -> Result<()> {
        self.sdk
            .check(self.sdk.backend().load_settings(self.handle, path))
    }

    /// Save current camera settings to a file.
    pub fn save_settings(&self, path: &str) -> Result<()> {
        self.sdk
            .check(self.sdk.backend().save_settings(self.handle, path))
    }

    /// Load a calibration pack into the camera.
    pub fn load_calibration(&self, path: &str, flags: CalibrationFlags) -> Result<()> {
        self.sdk.check(
            self.sdk
                .backend()
                .load_calibration(self.handle, path, flags.bits()),
        )
    }

    /// Load a colour profile used by [`ColourMode::PROFILE`].
    pub fn load_colour_profile(&self, path: &str) -> Result<()> {
        self.sdk
            .check(self.sdk.backend().load_colour_profile(self.handle, path))
    }
}

impl Drop for XCamera {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for XCamera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XCamera")
            .field("url", &self.url)
            .field("handle", &self.handle)
            .field("properties", &self.registry.len())
            .finish()
    }
}
