//! Device discovery.
//!
//! Wraps the native enumeration protocol: one call to learn the device
//! count, a second to fill descriptors. The second call always adds the
//! use-cached flag so it reuses the results of the first probe instead of
//! re-scanning every transport.
//!
//! The discovery subsystem also exposes its own small property set (probe
//! toggles and timeouts), addressed by name like camera properties but
//! living on no particular handle.

use std::sync::Arc;

use bitflags::bitflags;
use tracing::{debug, info};

use crate::error::Result;
use crate::sdk::{limits, SdkContext};

bitflags! {
    /// Transport selection and cache-control flags for enumeration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EnumerationFlags: u32 {
        /// Probe network interfaces.
        const NETWORK = 0x0000_0001;
        /// Probe serial ports.
        const SERIAL = 0x0000_0002;
        /// Probe CameraLink framegrabbers.
        const CAMERA_LINK = 0x0000_0004;
        /// Probe GigE Vision devices.
        const GIGE_VISION = 0x0000_0008;
        /// Probe CoaXPress framegrabbers.
        const COAX_PRESS = 0x0000_0010;
        /// Probe USB devices.
        const USB = 0x0000_0020;
        /// Probe USB3 Vision devices.
        const USB3_VISION = 0x0000_0040;
        /// Probe CameraLink GenCP devices.
        const GEN_CP = 0x0000_0080;
        /// Probe every supported transport.
        const ENABLE_ALL = 0x0000_FFFF;
        /// Reuse the device list from the previous probe.
        const USE_CACHED = 0x0100_0000;
        /// Drop the cached device list.
        const RELEASE_CACHED = 0x0200_0000;
    }
}

impl Default for EnumerationFlags {
    fn default() -> Self {
        EnumerationFlags::ENABLE_ALL
    }
}

/// Reachability of an enumerated device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceState {
    /// Ready to be opened.
    #[default]
    Available,
    /// Opened by some client already.
    Busy,
    /// Seen but not reachable, typically a network misconfiguration.
    Unreachable,
    /// A state code this binding does not know about.
    Unknown(i32),
}

impl DeviceState {
    /// Map a native state code onto a variant.
    pub fn from_native(value: i32) -> Self {
        match value {
            0 => DeviceState::Available,
            1 => DeviceState::Busy,
            2 => DeviceState::Unreachable,
            other => DeviceState::Unknown(other),
        }
    }
}

/// One enumerated device, with everything needed to open it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Model name.
    pub name: String,
    /// Transport the device was found on ("GigEVision", "CameraLink", ...).
    pub transport: String,
    /// Connection URL, the string [`crate::camera::XCamera::open`] takes.
    pub url: String,
    /// Transport-specific address (IP address, port name).
    pub address: String,
    /// Serial number.
    pub serial: u32,
    /// Product id. Also selects the frame footer layout.
    pub pid: u32,
    /// Reachability at enumeration time.
    pub state: DeviceState,
}

/// Entry point for finding devices before any camera is opened.
#[derive(Debug, Clone)]
pub struct Discovery {
    sdk: Arc<SdkContext>,
}

impl Discovery {
    pub fn new(sdk: Arc<SdkContext>) -> Self {
        Self { sdk }
    }

    /// Enumerate devices on the transports selected by `flags`.
    ///
    /// Runs the two-phase native protocol. A count of zero short-circuits
    /// to an empty list without a second native call.
    pub fn enumerate(&self, flags: EnumerationFlags) -> Result<Vec<DeviceDescriptor>> {
        let backend = self.sdk.backend();
        let mut count: u32 = 0;
        self.sdk
            .check(backend.enumerate_devices(None, &mut count, flags.bits()))?;
        debug!(count, ?flags, "device probe");
        if count == 0 {
            return Ok(Vec::new());
        }
        let mut devices = vec![DeviceDescriptor::default(); count as usize];
        let fill_flags = flags | EnumerationFlags::USE_CACHED;
        self.sdk.check(backend.enumerate_devices(
            Some(&mut devices),
            &mut count,
            fill_flags.bits(),
        ))?;
        devices.truncate(count as usize);
        info!(devices = devices.len(), "enumeration complete");
        Ok(devices)
    }

    /// Number of properties on the discovery subsystem.
    pub fn property_count(&self) -> u32 {
        self.sdk.backend().discovery_property_count()
    }

    /// Name of the discovery property at `index`.
    pub fn property_name(&self, index: u32) -> Result<String> {
        let mut name = String::new();
        self.sdk.check(self.sdk.backend().discovery_property_name(
            index,
            &mut name,
            limits::MAX_PROPERTY_NAME_LEN,
        ))?;
        Ok(name)
    }

    /// Category path of a discovery property.
    pub fn property_category(&self, name: &str) -> Result<String> {
        let mut category = String::new();
        self.sdk
            .check(self.sdk.backend().discovery_property_category(
                name,
                &mut category,
                limits::MAX_PROPERTY_CATEGORY_LEN,
            ))?;
        Ok(category)
    }

    /// Raw type tag of a discovery property.
    pub fn property_type(&self, name: &str) -> Result<u32> {
        let mut tag = 0u32;
        self.sdk
            .check(self.sdk.backend().discovery_property_type(name, &mut tag))?;
        Ok(tag)
    }

    /// Discovery property value as text.
    pub fn get(&self, name: &str) -> Result<String> {
        let mut value = String::new();
        self.sdk
            .check(self.sdk.backend().discovery_get_property_value(
                name,
                &mut value,
                limits::MAX_PROPERTY_VALUE_LEN,
            ))?;
        Ok(value)
    }

    /// Discovery property value as an integer.
    pub fn get_long(&self, name: &str) -> Result<i32> {
        let mut value = 0i32;
        self.sdk.check(
            self.sdk
                .backend()
                .discovery_get_property_value_long(name, &mut value),
        )?;
        Ok(value)
    }

    /// Set a discovery property from text.
    pub fn set(&self, name: &str, value: &str) -> Result<()> {
        self.sdk
            .check(self.sdk.backend().discovery_set_property_value(name, value))
    }

    /// Set a discovery property from an integer.
    pub fn set_long(&self, name: &str, value: i32) -> Result<()> {
        self.sdk.check(
            self.sdk
                .backend()
                .discovery_set_property_value_long(name, value),
        )
    }

    /// Raw range text of a discovery property.
    pub fn property_range(&self, name: &str) -> Result<String> {
        let mut range = String::new();
        self.sdk.check(self.sdk.backend().discovery_property_range(
            name,
            &mut range,
            limits::DISCOVERY_RANGE_LEN,
        ))?;
        Ok(range)
    }
}
