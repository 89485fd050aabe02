//! Scriptable in-process backend.
//!
//! [`MockSdk`] implements [`NativeSdk`](super::NativeSdk) over plain data
//! structures: a device list, a property table, and a frame queue that tests
//! and demos populate up front. Every entry point bumps a named call counter
//! so tests can assert not only on results but on which native calls a code
//! path performed.
//!
//! The mock honours the protocol quirks the safe layer is built around: the
//! two-phase enumeration contract, `E_MISMATCHED` from enum range queries
//! when the advertised capacity is smaller than the range text, and
//! `E_NO_FRAME` when the frame queue runs dry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

use crate::discovery::DeviceDescriptor;
use crate::error::codes;

use super::{Handle, NativeSdk, StatusHook, StatusMessage};

/// Value payload of a scripted property. The variant decides which accessor
/// family answers for the property.
#[derive(Debug, Clone)]
pub enum MockValue {
    /// Numeric property backed by the integer accessors.
    Long(i32),
    /// Numeric property backed by the floating-point accessors.
    Float(f64),
    /// Free-form string property.
    Text(String),
    /// Enumerated property: current programmatic name plus the raw
    /// `"name=Display,..."` range text.
    Enum {
        /// Currently selected programmatic name.
        value: String,
        /// Raw legal-value text served by the range query.
        range: String,
    },
    /// Binary property. The integer accessor reports its length.
    Blob(Vec<u8>),
}

/// One scripted property row.
#[derive(Debug, Clone)]
pub struct MockProperty {
    /// Property name exactly as the native layer would report it, including
    /// any `"(0)"` suffix.
    pub name: String,
    /// Raw type tag (base type plus access bits).
    pub tag: u32,
    /// Category path.
    pub category: String,
    /// Unit string.
    pub unit: String,
    /// Numeric range text (`"lo>hi"`), empty for non-numeric properties.
    pub range: String,
    /// Current value.
    pub value: MockValue,
}

impl MockProperty {
    /// Shorthand for a fully-accessible property with empty category, unit
    /// and range.
    pub fn new(name: &str, tag: u32, value: MockValue) -> Self {
        Self {
            name: name.to_owned(),
            tag,
            category: String::new(),
            unit: String::new(),
            range: String::new(),
            value,
        }
    }
}

#[derive(Default)]
struct State {
    devices: Vec<DeviceDescriptor>,
    enumerate_flags: Vec<u32>,
    discovery_props: Vec<MockProperty>,
    camera_props: Vec<MockProperty>,
    frames: Vec<(Vec<u8>, Option<Vec<u8>>)>,
    footer: Vec<u8>,
    open: HashMap<Handle, Option<Arc<StatusHook>>>,
    capturing: bool,
    calls: HashMap<&'static str, u32>,
    settings_files: Vec<(String, String)>,
}

/// In-process stand-in for the native library.
pub struct MockSdk {
    state: Mutex<State>,
    next_handle: AtomicI32,
    /// Whether freshly opened connections report themselves initialized.
    pub open_succeeds: bool,
    /// Frame geometry served by the getters.
    pub width: u32,
    /// See [`MockSdk::width`].
    pub height: u32,
    /// Native frame type code.
    pub frame_type: i32,
    /// Pixel depth in bits.
    pub bit_size: u32,
    /// Per-frame footer length in bytes.
    pub footer_length: u32,
    /// Colour mode code served by the getter.
    pub colour_mode: u32,
}

impl MockSdk {
    /// A mock with no devices, no properties and 16-bit 640x480 geometry.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            next_handle: AtomicI32::new(1),
            open_succeeds: true,
            width: 640,
            height: 480,
            frame_type: 2,
            bit_size: 16,
            footer_length: 0,
            colour_mode: 0,
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Add a device to the enumeration result.
    pub fn push_device(&self, device: DeviceDescriptor) {
        self.state().devices.push(device);
    }

    /// Add a discovery-scope property.
    pub fn push_discovery_property(&self, prop: MockProperty) {
        self.state().discovery_props.push(prop);
    }

    /// Add a camera-scope property.
    pub fn push_property(&self, prop: MockProperty) {
        self.state().camera_props.push(prop);
    }

    /// Queue frame pixel data to be served by the next frame fetch.
    pub fn push_frame(&self, pixels: Vec<u8>) {
        self.state().frames.push((pixels, None));
    }

    /// Queue frame pixel data together with the footer bytes to append
    /// past the advertised image size.
    pub fn push_frame_with_footer(&self, pixels: Vec<u8>, footer: Vec<u8>) {
        self.state().frames.push((pixels, Some(footer)));
    }

    /// Footer bytes served for frames queued without their own.
    pub fn set_footer(&self, footer: Vec<u8>) {
        self.state().footer = footer;
    }

    /// How many times the named entry point has been called.
    pub fn calls(&self, entry: &str) -> u32 {
        self.state().calls.get(entry).copied().unwrap_or(0)
    }

    /// Flags passed to each enumeration call, in order.
    pub fn enumerate_flags(&self) -> Vec<u32> {
        self.state().enumerate_flags.clone()
    }

    /// Settings/calibration file operations seen so far, as
    /// `(operation, path)` pairs.
    pub fn file_operations(&self) -> Vec<(String, String)> {
        self.state().settings_files.clone()
    }

    /// Deliver a status message to the hook registered for `handle`, if any.
    pub fn emit_status(&self, handle: Handle, message: StatusMessage, param: u32) {
        let hook = self.state().open.get(&handle).cloned().flatten();
        if let Some(hook) = hook {
            hook.notify(message, param);
        }
    }

    fn bump(&self, entry: &'static str) {
        *self.state().calls.entry(entry).or_insert(0) += 1;
    }

    fn with_camera_prop<T>(
        &self,
        name: &str,
        f: impl FnOnce(&mut MockProperty) -> T,
    ) -> Option<T> {
        let mut state = self.state();
        state
            .camera_props
            .iter_mut()
            .find(|p| p.name == name)
            .map(f)
    }

    fn with_discovery_prop<T>(
        &self,
        name: &str,
        f: impl FnOnce(&mut MockProperty) -> T,
    ) -> Option<T> {
        let mut state = self.state();
        state
            .discovery_props
            .iter_mut()
            .find(|p| p.name == name)
            .map(f)
    }
}

impl Default for MockSdk {
    fn default() -> Self {
        Self::new()
    }
}

fn write_bounded(dest: &mut String, text: &str, max_len: usize) {
    dest.clear();
    dest.push_str(&text.chars().take(max_len).collect::<String>());
}

fn value_as_text(value: &MockValue) -> String {
    match value {
        MockValue::Long(v) => v.to_string(),
        MockValue::Float(v) => v.to_string(),
        MockValue::Text(v) => v.clone(),
        MockValue::Enum { value, .. } => value.clone(),
        MockValue::Blob(v) => format!("<{} bytes>", v.len()),
    }
}

impl NativeSdk for MockSdk {
    fn enumerate_devices(
        &self,
        dest: Option<&mut [DeviceDescriptor]>,
        count: &mut u32,
        flags: u32,
    ) -> u32 {
        self.bump("enumerate_devices");
        let mut state = self.state();
        state.enumerate_flags.push(flags);
        match dest {
            None => {
                *count = state.devices.len() as u32;
            }
            Some(slice) => {
                let n = slice.len().min(state.devices.len()).min(*count as usize);
                slice[..n].clone_from_slice(&state.devices[..n]);
                *count = n as u32;
            }
        }
        codes::I_OK
    }

    fn discovery_property_count(&self) -> u32 {
        self.bump("discovery_property_count");
        self.state().discovery_props.len() as u32
    }

    fn discovery_property_name(&self, index: u32, dest: &mut String, max_len: usize) -> u32 {
        self.bump("discovery_property_name");
        let state = self.state();
        match state.discovery_props.get(index as usize) {
            Some(prop) => {
                write_bounded(dest, &prop.name, max_len);
                codes::I_OK
            }
            None => codes::E_NOT_FOUND,
        }
    }

    fn discovery_property_category(&self, name: &str, dest: &mut String, max_len: usize) -> u32 {
        self.bump("discovery_property_category");
        match self.with_discovery_prop(name, |p| p.category.clone()) {
            Some(category) => {
                write_bounded(dest, &category, max_len);
                codes::I_OK
            }
            None => codes::E_NOT_FOUND,
        }
    }

    fn discovery_property_type(&self, name: &str, dest: &mut u32) -> u32 {
        self.bump("discovery_property_type");
        match self.with_discovery_prop(name, |p| p.tag) {
            Some(tag) => {
                *dest = tag;
                codes::I_OK
            }
            None => codes::E_NOT_FOUND,
        }
    }

    fn discovery_get_property_value(&self, name: &str, dest: &mut String, max_len: usize) -> u32 {
        self.bump("discovery_get_property_value");
        match self.with_discovery_prop(name, |p| value_as_text(&p.value)) {
            Some(text) => {
                write_bounded(dest, &text, max_len);
                codes::I_OK
            }
            None => codes::E_NOT_FOUND,
        }
    }

    fn discovery_get_property_value_long(&self, name: &str, dest: &mut i32) -> u32 {
        self.bump("discovery_get_property_value_long");
        let value = self.with_discovery_prop(name, |p| match &p.value {
            MockValue::Long(v) => Some(*v),
            MockValue::Float(v) => Some(*v as i32),
            MockValue::Blob(v) => Some(v.len() as i32),
            _ => None,
        });
        match value {
            Some(Some(v)) => {
                *dest = v;
                codes::I_OK
            }
            Some(None) => codes::E_NOT_SUPPORTED,
            None => codes::E_NOT_FOUND,
        }
    }

    fn discovery_set_property_value(&self, name: &str, value: &str) -> u32 {
        self.bump("discovery_set_property_value");
        let text = value.to_owned();
        match self.with_discovery_prop(name, |p| p.value = MockValue::Text(text)) {
            Some(()) => codes::I_OK,
            None => codes::E_NOT_FOUND,
        }
    }

    fn discovery_set_property_value_long(&self, name: &str, value: i32) -> u32 {
        self.bump("discovery_set_property_value_long");
        match self.with_discovery_prop(name, |p| p.value = MockValue::Long(value)) {
            Some(()) => codes::I_OK,
            None => codes::E_NOT_FOUND,
        }
    }

    fn discovery_property_range(&self, name: &str, dest: &mut String, max_len: usize) -> u32 {
        self.bump("discovery_property_range");
        match self.with_discovery_prop(name, |p| p.range.clone()) {
            Some(range) => {
                write_bounded(dest, &range, max_len);
                codes::I_OK
            }
            None => codes::E_NOT_FOUND,
        }
    }

    fn open_camera(&self, _name: &str, hook: Option<Arc<StatusHook>>) -> Handle {
        self.bump("open_camera");
        let handle = self.next_handle.fetch_add(1, Ordering::Relaxed);
        self.state().open.insert(handle, hook);
        handle
    }

    fn close_camera(&self, handle: Handle) {
        self.bump("close_camera");
        let mut state = self.state();
        state.open.remove(&handle);
        state.capturing = false;
    }

    fn is_initialized(&self, handle: Handle) -> bool {
        self.bump("is_initialized");
        self.open_succeeds && self.state().open.contains_key(&handle)
    }

    fn is_capturing(&self, _handle: Handle) -> bool {
        self.bump("is_capturing");
        self.state().capturing
    }

    fn start_capture(&self, _handle: Handle) -> u32 {
        self.bump("start_capture");
        self.state().capturing = true;
        codes::I_OK
    }

    fn stop_capture(&self, _handle: Handle) -> u32 {
        self.bump("stop_capture");
        self.state().capturing = false;
        codes::I_OK
    }

    fn width(&self, _handle: Handle) -> u32 {
        self.width
    }

    fn height(&self, _handle: Handle) -> u32 {
        self.height
    }

    fn max_width(&self, _handle: Handle) -> u32 {
        self.width
    }

    fn max_height(&self, _handle: Handle) -> u32 {
        self.height
    }

    fn frame_size(&self, _handle: Handle) -> u32 {
        self.width * self.height * (self.bit_size.div_ceil(8))
    }

    fn frame_footer_length(&self, _handle: Handle) -> u32 {
        self.footer_length
    }

    fn frame_type(&self, _handle: Handle) -> i32 {
        self.frame_type
    }

    fn frame_count(&self, _handle: Handle) -> u32 {
        self.bump("frame_count");
        self.state().frames.len() as u32
    }

    fn frame_rate(&self, _handle: Handle) -> u32 {
        50
    }

    fn bit_size(&self, _handle: Handle) -> u32 {
        self.bit_size
    }

    fn max_value(&self, _handle: Handle) -> u32 {
        (1u32 << self.bit_size.min(31)) - 1
    }

    fn colour_mode(&self, _handle: Handle) -> u32 {
        self.colour_mode
    }

    fn set_colour_mode(&self, _handle: Handle, _mode: u32) {
        self.bump("set_colour_mode");
    }

    fn get_frame(
        &self,
        _handle: Handle,
        _frame_type: i32,
        _flags: u32,
        dest: &mut [u8],
        size: u32,
    ) -> u32 {
        self.bump("get_frame");
        let mut state = self.state();
        if state.frames.is_empty() {
            return codes::E_NO_FRAME;
        }
        let (pixels, own_footer) = state.frames.remove(0);
        let n = pixels.len().min(dest.len()).min(size as usize);
        dest[..n].copy_from_slice(&pixels[..n]);
        let footer = own_footer.unwrap_or_else(|| state.footer.clone());
        if !footer.is_empty() {
            let start = size as usize;
            let end = (start + footer.len()).min(dest.len());
            if end > start {
                dest[start..end].copy_from_slice(&footer[..end - start]);
            }
        }
        codes::I_OK
    }

    fn property_count(&self, _handle: Handle) -> u32 {
        self.bump("property_count");
        self.state().camera_props.len() as u32
    }

    fn property_name(&self, _handle: Handle, index: u32, dest: &mut String, max_len: usize) -> u32 {
        self.bump("property_name");
        let state = self.state();
        match state.camera_props.get(index as usize) {
            Some(prop) => {
                write_bounded(dest, &prop.name, max_len);
                codes::I_OK
            }
            None => codes::E_NOT_FOUND,
        }
    }

    fn property_category(
        &self,
        _handle: Handle,
        name: &str,
        dest: &mut String,
        max_len: usize,
    ) -> u32 {
        self.bump("property_category");
        match self.with_camera_prop(name, |p| p.category.clone()) {
            Some(category) => {
                write_bounded(dest, &category, max_len);
                codes::I_OK
            }
            None => codes::E_NOT_FOUND,
        }
    }

    fn property_type(&self, _handle: Handle, name: &str, dest: &mut u32) -> u32 {
        self.bump("property_type");
        match self.with_camera_prop(name, |p| p.tag) {
            Some(tag) => {
                *dest = tag;
                codes::I_OK
            }
            None => codes::E_NOT_FOUND,
        }
    }

    fn property_unit(&self, _handle: Handle, name: &str, dest: &mut String, max_len: usize) -> u32 {
        self.bump("property_unit");
        match self.with_camera_prop(name, |p| p.unit.clone()) {
            Some(unit) => {
                write_bounded(dest, &unit, max_len);
                codes::I_OK
            }
            None => codes::E_NOT_FOUND,
        }
    }

    fn property_range(&self, _handle: Handle, name: &str, dest: &mut String, max_len: usize) -> u32 {
        self.bump("property_range");
        match self.with_camera_prop(name, |p| p.range.clone()) {
            Some(range) => {
                write_bounded(dest, &range, max_len);
                codes::I_OK
            }
            None => codes::E_NOT_FOUND,
        }
    }

    fn property_range_enum(
        &self,
        _handle: Handle,
        name: &str,
        dest: &mut String,
        max_len: usize,
    ) -> u32 {
        self.bump("property_range_enum");
        let range = self.with_camera_prop(name, |p| match &p.value {
            MockValue::Enum { range, .. } => Some(range.clone()),
            _ => None,
        });
        match range {
            Some(Some(range)) => {
                // The real library refuses to truncate legal-value text.
                if max_len < range.len() + 1 {
                    return codes::E_MISMATCHED;
                }
                write_bounded(dest, &range, max_len);
                codes::I_OK
            }
            Some(None) => codes::E_NOT_SUPPORTED,
            None => codes::E_NOT_FOUND,
        }
    }

    fn property_range_f64(&self, _handle: Handle, name: &str, min: &mut f64, max: &mut f64) -> u32 {
        self.bump("property_range_f64");
        let range = self.with_camera_prop(name, |p| p.range.clone());
        match range {
            Some(range) => {
                if let Some((lo, hi)) = range.split_once('>') {
                    *min = lo.trim().parse().unwrap_or(0.0);
                    *max = hi.trim().parse().unwrap_or(0.0);
                }
                codes::I_OK
            }
            None => codes::E_NOT_FOUND,
        }
    }

    fn get_property_value(
        &self,
        _handle: Handle,
        name: &str,
        dest: &mut String,
        max_len: usize,
    ) -> u32 {
        self.bump("get_property_value");
        match self.with_camera_prop(name, |p| value_as_text(&p.value)) {
            Some(text) => {
                write_bounded(dest, &text, max_len);
                codes::I_OK
            }
            None => codes::E_NOT_FOUND,
        }
    }

    fn get_property_value_f64(&self, _handle: Handle, name: &str, dest: &mut f64) -> u32 {
        self.bump("get_property_value_f64");
        let value = self.with_camera_prop(name, |p| match &p.value {
            MockValue::Float(v) => Some(*v),
            MockValue::Long(v) => Some(f64::from(*v)),
            _ => None,
        });
        match value {
            Some(Some(v)) => {
                *dest = v;
                codes::I_OK
            }
            Some(None) => codes::E_NOT_SUPPORTED,
            None => codes::E_NOT_FOUND,
        }
    }

    fn get_property_value_long(&self, _handle: Handle, name: &str, dest: &mut i32) -> u32 {
        self.bump("get_property_value_long");
        let value = self.with_camera_prop(name, |p| match &p.value {
            MockValue::Long(v) => Some(*v),
            MockValue::Float(v) => Some(*v as i32),
            MockValue::Blob(v) => Some(v.len() as i32),
            _ => None,
        });
        match value {
            Some(Some(v)) => {
                *dest = v;
                codes::I_OK
            }
            Some(None) => codes::E_NOT_SUPPORTED,
            None => codes::E_NOT_FOUND,
        }
    }

    fn get_property_value_enum(
        &self,
        _handle: Handle,
        name: &str,
        dest: &mut String,
        max_len: usize,
    ) -> u32 {
        self.bump("get_property_value_enum");
        let value = self.with_camera_prop(name, |p| match &p.value {
            MockValue::Enum { value, .. } => Some(value.clone()),
            _ => None,
        });
        match value {
            Some(Some(v)) => {
                write_bounded(dest, &v, max_len);
                codes::I_OK
            }
            Some(None) => codes::E_NOT_SUPPORTED,
            None => codes::E_NOT_FOUND,
        }
    }

    fn get_property_blob(&self, _handle: Handle, name: &str, dest: &mut [u8]) -> u32 {
        self.bump("get_property_blob");
        let value = self.with_camera_prop(name, |p| match &p.value {
            MockValue::Blob(v) => Some(v.clone()),
            _ => None,
        });
        match value {
            Some(Some(bytes)) => {
                let n = bytes.len().min(dest.len());
                dest[..n].copy_from_slice(&bytes[..n]);
                codes::I_OK
            }
            Some(None) => codes::E_NOT_SUPPORTED,
            None => codes::E_NOT_FOUND,
        }
    }

    fn set_property_value(&self, _handle: Handle, name: &str, value: &str) -> u32 {
        self.bump("set_property_value");
        let text = value.to_owned();
        let result = self.with_camera_prop(name, |p| match &mut p.value {
            MockValue::Text(v) => {
                *v = text.clone();
                codes::I_OK
            }
            MockValue::Long(v) => match text.parse() {
                Ok(parsed) => {
                    *v = parsed;
                    codes::I_OK
                }
                Err(_) => codes::E_OUT_OF_RANGE,
            },
            MockValue::Float(v) => match text.parse() {
                Ok(parsed) => {
                    *v = parsed;
                    codes::I_OK
                }
                Err(_) => codes::E_OUT_OF_RANGE,
            },
            MockValue::Enum { value, .. } => {
                *value = text.clone();
                codes::I_OK
            }
            MockValue::Blob(_) => codes::E_NOT_SUPPORTED,
        });
        result.unwrap_or(codes::E_NOT_FOUND)
    }

    fn set_property_value_f64(&self, _handle: Handle, name: &str, value: f64) -> u32 {
        self.bump("set_property_value_f64");
        let result = self.with_camera_prop(name, |p| match &mut p.value {
            MockValue::Float(v) => {
                *v = value;
                codes::I_OK
            }
            MockValue::Long(v) => {
                *v = value as i32;
                codes::I_OK
            }
            _ => codes::E_NOT_SUPPORTED,
        });
        result.unwrap_or(codes::E_NOT_FOUND)
    }

    fn set_property_value_long(&self, _handle: Handle, name: &str, value: i32) -> u32 {
        self.bump("set_property_value_long");
        let result = self.with_camera_prop(name, |p| match &mut p.value {
            MockValue::Long(v) => {
                *v = value;
                codes::I_OK
            }
            MockValue::Float(v) => {
                *v = f64::from(value);
                codes::I_OK
            }
            _ => codes::E_NOT_SUPPORTED,
        });
        result.unwrap_or(codes::E_NOT_FOUND)
    }

    fn set_property_value_enum(&self, _handle: Handle, name: &str, value: &str) -> u32 {
        self.bump("set_property_value_enum");
        let text = value.to_owned();
        let result = self.with_camera_prop(name, |p| match &mut p.value {
            MockValue::Enum { value, range } => {
                let legal = range
                    .split(',')
                    .filter_map(|pair| pair.split_once('='))
                    .any(|(name, _)| name == text);
                if legal {
                    *value = text.clone();
                    codes::I_OK
                } else {
                    codes::E_OUT_OF_RANGE
                }
            }
            _ => codes::E_NOT_SUPPORTED,
        });
        result.unwrap_or(codes::E_NOT_FOUND)
    }

    fn set_property_blob(&self, _handle: Handle, name: &str, value: &[u8]) -> u32 {
        self.bump("set_property_blob");
        let bytes = value.to_vec();
        let result = self.with_camera_prop(name, |p| match &mut p.value {
            MockValue::Blob(v) => {
                *v = bytes.clone();
                codes::I_OK
            }
            _ => codes::E_NOT_SUPPORTED,
        });
        result.unwrap_or(codes::E_NOT_FOUND)
    }

    fn load_settings(&self, _handle: Handle, path: &str) -> u32 {
        self.bump("load_settings");
        self.state()
            .settings_files
            .push(("load_settings".to_owned(), path.to_owned()));
        codes::I_OK
    }

    fn save_settings(&self, _handle: Handle, path: &str) -> u32 {
        self.bump("save_settings");
        self.state()
            .settings_files
            .push(("save_settings".to_owned(), path.to_owned()));
        codes::I_OK
    }

    fn load_calibration(&self, _handle: Handle, path: &str, _flags: u32) -> u32 {
        self.bump("load_calibration");
        self.state()
            .settings_files
            .push(("load_calibration".to_owned(), path.to_owned()));
        codes::I_OK
    }

    fn load_colour_profile(&self, _handle: Handle, path: &str) -> u32 {
        self.bump("load_colour_profile");
        self.state()
            .settings_files
            .push(("load_colour_profile".to_owned(), path.to_owned()));
        codes::I_OK
    }

    fn error_to_string(&self, code: u32, dest: &mut String, max_len: usize) -> i32 {
        self.bump("error_to_string");
        let text = match code {
            codes::I_OK => "Success.",
            codes::I_DIRTY => "Internal.",
            codes::E_BUG => "Generic.",
            codes::E_NOINIT => "Camera was not initialized.",
            codes::E_LOGICLOADFAILED => "Invalid logic file.",
            codes::E_INTERFACE_ERROR => "Interface error.",
            codes::E_OUT_OF_RANGE => "Provided value is incapable of being produced by the hardware.",
            codes::E_NOT_SUPPORTED => "Functionality not supported by this camera.",
            codes::E_NOT_FOUND => "File/Data not found.",
            codes::E_FILTER_DONE => "Filter has finished processing, and will be removed.",
            codes::E_NO_FRAME => "A frame was requested by calling GetFrame, but none was available.",
            codes::E_SAVE_ERROR => "Couldn't save to file.",
            codes::E_MISMATCHED => "Buffer size mismatch.",
            codes::E_BUSY => "The API can not read a temperature because the camera is busy.",
            codes::E_INVALID_HANDLE => "An unknown handle was passed.",
            codes::E_TIMEOUT => "Operation timed out.",
            codes::E_FRAMEGRABBER => "Frame grabber error.",
            codes::E_NO_CONVERSION => "GetFrame could not convert the image data to the requested format.",
            codes::E_FILTER_SKIP_FRAME => "Filter indicates the frame should be skipped.",
            codes::E_WRONG_VERSION => "Version mismatch.",
            codes::E_PACKET_ERROR => "The requested frame cannot be provided because at least one packet has been lost.",
            codes::E_WRONG_FORMAT => "The emissivity map you tried to set should be a 16 bit grayscale png.",
            codes::E_WRONG_SIZE => "The emissivity map you tried to set has the wrong dimensions (w,h).",
            codes::E_CAPSTOP => "Internal frame capture stop.",
            codes::E_OUT_OF_MEMORY => "Could not allocate memory.",
            codes::E_RFU => "Reserved.",
            _ => return 0,
        };
        write_bounded(dest, text, max_len);
        1
    }
}
