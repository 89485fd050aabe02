//! Backend over the real vendor library, via `xeneth-sys`.
//!
//! Only compiled with the `xeneth_sdk` feature, which requires the vendor
//! SDK at build time. All unsafety in the crate lives here: C string
//! round-trips, out-pointer plumbing, and the status-callback trampoline.

#![allow(unsafe_code)]

use std::collections::HashMap;
use std::ffi::{c_char, c_ulong, c_void, CString};
use std::sync::{Arc, Mutex};

use crate::discovery::DeviceDescriptor;
use crate::error::codes;

use super::{Handle, NativeSdk, StatusHook, StatusMessage};

/// Reads a NUL-terminated fixed-size C char array into an owned string.
fn cstr_field(field: &[c_char]) -> String {
    let bytes: Vec<u8> = field
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Copies a NUL-terminated C buffer into `dest`.
fn read_cstr(buf: &[u8], dest: &mut String) {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    dest.clear();
    dest.push_str(&String::from_utf8_lossy(&buf[..end]));
}

unsafe extern "C" fn status_trampoline(user: *mut c_void, msg: c_ulong, param: c_ulong) {
    if user.is_null() {
        return;
    }
    let hook = &*(user as *const StatusHook);
    hook.notify(StatusMessage::from_native(msg as i32), param as u32);
}

/// [`NativeSdk`] over the loaded vendor library.
///
/// Keeps its own strong reference to each connection's status hook from open
/// to close, so the raw pointer handed to the library outlives any facade
/// that might drop its copy early.
pub struct FfiSdk {
    hooks: Mutex<HashMap<Handle, Arc<StatusHook>>>,
}

impl FfiSdk {
    pub fn new() -> Self {
        Self {
            hooks: Mutex::new(HashMap::new()),
        }
    }

    fn hooks(&self) -> std::sync::MutexGuard<'_, HashMap<Handle, Arc<StatusHook>>> {
        match self.hooks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn to_cstring(text: &str) -> Option<CString> {
    CString::new(text).ok()
}

macro_rules! cstring_or_bug {
    ($text:expr) => {
        match to_cstring($text) {
            Some(c) => c,
            None => return codes::E_BUG,
        }
    };
}

impl NativeSdk for FfiSdk {
    fn enumerate_devices(
        &self,
        dest: Option<&mut [DeviceDescriptor]>,
        count: &mut u32,
        flags: u32,
    ) -> u32 {
        match dest {
            None => unsafe {
                xeneth_sys::XCD_EnumerateDevices(std::ptr::null_mut(), count, flags) as u32
            },
            Some(slice) => {
                let mut raw: Vec<xeneth_sys::XDeviceInformation> =
                    vec![unsafe { std::mem::zeroed() }; slice.len()];
                for info in &mut raw {
                    info.size = std::mem::size_of::<xeneth_sys::XDeviceInformation>() as i32;
                }
                let mut n = slice.len().min(*count as usize) as u32;
                let code = unsafe {
                    xeneth_sys::XCD_EnumerateDevices(raw.as_mut_ptr(), &mut n, flags) as u32
                };
                if code == codes::I_OK {
                    for (out, info) in slice.iter_mut().zip(raw.iter().take(n as usize)) {
                        *out = DeviceDescriptor {
                            name: cstr_field(&info.name),
                            transport: cstr_field(&info.transport),
                            url: cstr_field(&info.url),
                            address: cstr_field(&info.address),
                            serial: info.serial,
                            pid: info.pid,
                            state: crate::discovery::DeviceState::from_native(info.state),
                        };
                    }
                    *count = n;
                }
                code
            }
        }
    }

    fn discovery_property_count(&self) -> u32 {
        let mut count: u32 = 0;
        unsafe { xeneth_sys::XCD_GetPropertyCount(&mut count) };
        count
    }

    fn discovery_property_name(&self, index: u32, dest: &mut String, max_len: usize) -> u32 {
        let mut buf = vec![0u8; max_len];
        let code = unsafe {
            xeneth_sys::XCD_GetPropertyName(index, buf.as_mut_ptr() as *mut c_char, max_len as i32)
                as u32
        };
        if code == codes::I_OK {
            read_cstr(&buf, dest);
        }
        code
    }

    fn discovery_property_category(&self, name: &str, dest: &mut String, max_len: usize) -> u32 {
        let name = cstring_or_bug!(name);
        let mut buf = vec![0u8; max_len];
        let code = unsafe {
            xeneth_sys::XCD_GetPropertyCategory(
                name.as_ptr(),
                buf.as_mut_ptr() as *mut c_char,
                max_len as i32,
            ) as u32
        };
        if code == codes::I_OK {
            read_cstr(&buf, dest);
        }
        code
    }

    fn discovery_property_type(&self, name: &str, dest: &mut u32) -> u32 {
        let name = cstring_or_bug!(name);
        let mut raw: xeneth_sys::XPropType = 0;
        let code = unsafe { xeneth_sys::XCD_GetPropertyType(name.as_ptr(), &mut raw) as u32 };
        if code == codes::I_OK {
            *dest = raw as u32;
        }
        code
    }

    fn discovery_get_property_value(&self, name: &str, dest: &mut String, max_len: usize) -> u32 {
        let name = cstring_or_bug!(name);
        let mut buf = vec![0u8; max_len];
        let code = unsafe {
            xeneth_sys::XCD_GetPropertyValue(
                name.as_ptr(),
                buf.as_mut_ptr() as *mut c_char,
                max_len as i32,
            ) as u32
        };
        if code == codes::I_OK {
            read_cstr(&buf, dest);
        }
        code
    }

    fn discovery_get_property_value_long(&self, name: &str, dest: &mut i32) -> u32 {
        let name = cstring_or_bug!(name);
        let mut raw: std::ffi::c_long = 0;
        let code = unsafe { xeneth_sys::XCD_GetPropertyValueL(name.as_ptr(), &mut raw) as u32 };
        if code == codes::I_OK {
            *dest = raw as i32;
        }
        code
    }

    fn discovery_set_property_value(&self, name: &str, value: &str) -> u32 {
        let name = cstring_or_bug!(name);
        let value = cstring_or_bug!(value);
        unsafe { xeneth_sys::XCD_SetPropertyValue(name.as_ptr(), value.as_ptr()) as u32 }
    }

    fn discovery_set_property_value_long(&self, name: &str, value: i32) -> u32 {
        let name = cstring_or_bug!(name);
        unsafe {
            xeneth_sys::XCD_SetPropertyValueL(name.as_ptr(), value as std::ffi::c_long) as u32
        }
    }

    fn discovery_property_range(&self, name: &str, dest: &mut String, max_len: usize) -> u32 {
        let name = cstring_or_bug!(name);
        let mut buf = vec![0u8; max_len];
        let code = unsafe {
            xeneth_sys::XCD_GetPropertyRange(
                name.as_ptr(),
                buf.as_mut_ptr() as *mut c_char,
                max_len as i32,
            ) as u32
        };
        if code == codes::I_OK {
            read_cstr(&buf, dest);
        }
        code
    }

    fn open_camera(&self, name: &str, hook: Option<Arc<StatusHook>>) -> Handle {
        let Some(name) = to_cstring(name) else {
            return 0;
        };
        let (callback, user) = match &hook {
            Some(hook) => (
                Some(status_trampoline as unsafe extern "C" fn(*mut c_void, c_ulong, c_ulong)),
                Arc::as_ptr(hook) as *mut c_void,
            ),
            None => (None, std::ptr::null_mut()),
        };
        let handle = unsafe { xeneth_sys::XC_OpenCamera(name.as_ptr(), callback, user) };
        if handle != 0 {
            if let Some(hook) = hook {
                self.hooks().insert(handle, hook);
            }
        }
        handle
    }

    fn close_camera(&self, handle: Handle) {
        unsafe { xeneth_sys::XC_CloseCamera(handle) };
        self.hooks().remove(&handle);
    }

    fn is_initialized(&self, handle: Handle) -> bool {
        unsafe { xeneth_sys::XC_IsInitialised(handle) != 0 }
    }

    fn is_capturing(&self, handle: Handle) -> bool {
        unsafe { xeneth_sys::XC_IsCapturing(handle) != 0 }
    }

    fn start_capture(&self, handle: Handle) -> u32 {
        unsafe { xeneth_sys::XC_StartCapture(handle) as u32 }
    }

    fn stop_capture(&self, handle: Handle) -> u32 {
        unsafe { xeneth_sys::XC_StopCapture(handle) as u32 }
    }

    fn width(&self, handle: Handle) -> u32 {
        unsafe { xeneth_sys::XC_GetWidth(handle) }
    }

    fn height(&self, handle: Handle) -> u32 {
        unsafe { xeneth_sys::XC_GetHeight(handle) }
    }

    fn max_width(&self, handle: Handle) -> u32 {
        unsafe { xeneth_sys::XC_GetMaxWidth(handle) }
    }

    fn max_height(&self, handle: Handle) -> u32 {
        unsafe { xeneth_sys::XC_GetMaxHeight(handle) }
    }

    fn frame_size(&self, handle: Handle) -> u32 {
        unsafe { xeneth_sys::XC_GetFrameSize(handle) }
    }

    fn frame_footer_length(&self, handle: Handle) -> u32 {
        unsafe { xeneth_sys::XC_GetFrameFooterLength(handle) as u32 }
    }

    fn frame_type(&self, handle: Handle) -> i32 {
        unsafe { xeneth_sys::XC_GetFrameType(handle) as i32 }
    }

    fn frame_count(&self, handle: Handle) -> u32 {
        unsafe { xeneth_sys::XC_GetFrameCount(handle) }
    }

    fn frame_rate(&self, handle: Handle) -> u32 {
        unsafe { xeneth_sys::XC_GetFrameRate(handle) }
    }

    fn bit_size(&self, handle: Handle) -> u32 {
        unsafe { xeneth_sys::XC_GetBitSize(handle) as u32 }
    }

    fn max_value(&self, handle: Handle) -> u32 {
        unsafe { xeneth_sys::XC_GetMaxValue(handle) }
    }

    fn colour_mode(&self, handle: Handle) -> u32 {
        unsafe { xeneth_sys::XC_GetColourMode(handle) as u32 }
    }

    fn set_colour_mode(&self, handle: Handle, mode: u32) {
        unsafe { xeneth_sys::XC_SetColourMode(handle, mode as c_ulong) };
    }

    fn get_frame(
        &self,
        handle: Handle,
        frame_type: i32,
        flags: u32,
        dest: &mut [u8],
        size: u32,
    ) -> u32 {
        unsafe {
            xeneth_sys::XC_GetFrame(
                handle,
                frame_type as c_ulong,
                flags as c_ulong,
                dest.as_mut_ptr() as *mut c_void,
                size,
            ) as u32
        }
    }

    fn property_count(&self, handle: Handle) -> u32 {
        unsafe { xeneth_sys::XC_GetPropertyCount(handle) as u32 }
    }

    fn property_name(&self, handle: Handle, index: u32, dest: &mut String, max_len: usize) -> u32 {
        let mut buf = vec![0u8; max_len];
        let code = unsafe {
            xeneth_sys::XC_GetPropertyName(
                handle,
                index as i32,
                buf.as_mut_ptr() as *mut c_char,
                max_len as i32,
            ) as u32
        };
        if code == codes::I_OK {
            read_cstr(&buf, dest);
        }
        code
    }

    fn property_category(
        &self,
        handle: Handle,
        name: &str,
        dest: &mut String,
        max_len: usize,
    ) -> u32 {
        let name = cstring_or_bug!(name);
        let mut buf = vec![0u8; max_len];
        let code = unsafe {
            xeneth_sys::XC_GetPropertyCategory(
                handle,
                name.as_ptr(),
                buf.as_mut_ptr() as *mut c_char,
                max_len as i32,
            ) as u32
        };
        if code == codes::I_OK {
            read_cstr(&buf, dest);
        }
        code
    }

    fn property_type(&self, handle: Handle, name: &str, dest: &mut u32) -> u32 {
        let name = cstring_or_bug!(name);
        let mut raw: xeneth_sys::XPropType = 0;
        let code =
            unsafe { xeneth_sys::XC_GetPropertyType(handle, name.as_ptr(), &mut raw) as u32 };
        if code == codes::I_OK {
            *dest = raw as u32;
        }
        code
    }

    fn property_unit(&self, handle: Handle, name: &str, dest: &mut String, max_len: usize) -> u32 {
        let name = cstring_or_bug!(name);
        let mut buf = vec![0u8; max_len];
        let code = unsafe {
            xeneth_sys::XC_GetPropertyUnit(
                handle,
                name.as_ptr(),
                buf.as_mut_ptr() as *mut c_char,
                max_len as i32,
            ) as u32
        };
        if code == codes::I_OK {
            read_cstr(&buf, dest);
        }
        code
    }

    fn property_range(&self, handle: Handle, name: &str, dest: &mut String, max_len: usize) -> u32 {
        let name = cstring_or_bug!(name);
        let mut buf = vec![0u8; max_len];
        let code = unsafe {
            xeneth_sys::XC_GetPropertyRange(
                handle,
                name.as_ptr(),
                buf.as_mut_ptr() as *mut c_char,
                max_len as i32,
            ) as u32
        };
        if code == codes::I_OK {
            read_cstr(&buf, dest);
        }
        code
    }

    fn property_range_enum(
        &self,
        handle: Handle,
        name: &str,
        dest: &mut String,
        max_len: usize,
    ) -> u32 {
        let name = cstring_or_bug!(name);
        let mut buf = vec![0u8; max_len];
        let code = unsafe {
            xeneth_sys::XC_GetPropertyRangeE(
                handle,
                name.as_ptr(),
                buf.as_mut_ptr() as *mut c_char,
                max_len as i32,
            ) as u32
        };
        if code == codes::I_OK {
            read_cstr(&buf, dest);
        }
        code
    }

    fn property_range_f64(&self, handle: Handle, name: &str, min: &mut f64, max: &mut f64) -> u32 {
        let name = cstring_or_bug!(name);
        unsafe { xeneth_sys::XC_GetPropertyRangeF(handle, name.as_ptr(), min, max) as u32 }
    }

    fn get_property_value(
        &self,
        handle: Handle,
        name: &str,
        dest: &mut String,
        max_len: usize,
    ) -> u32 {
        let name = cstring_or_bug!(name);
        let mut buf = vec![0u8; max_len];
        let code = unsafe {
            xeneth_sys::XC_GetPropertyValue(
                handle,
                name.as_ptr(),
                buf.as_mut_ptr() as *mut c_char,
                max_len as i32,
            ) as u32
        };
        if code == codes::I_OK {
            read_cstr(&buf, dest);
        }
        code
    }

    fn get_property_value_f64(&self, handle: Handle, name: &str, dest: &mut f64) -> u32 {
        let name = cstring_or_bug!(name);
        unsafe { xeneth_sys::XC_GetPropertyValueF(handle, name.as_ptr(), dest) as u32 }
    }

    fn get_property_value_long(&self, handle: Handle, name: &str, dest: &mut i32) -> u32 {
        let name = cstring_or_bug!(name);
        let mut raw: std::ffi::c_long = 0;
        let code =
            unsafe { xeneth_sys::XC_GetPropertyValueL(handle, name.as_ptr(), &mut raw) as u32 };
        if code == codes::I_OK {
            *dest = raw as i32;
        }
        code
    }

    fn get_property_value_enum(
        &self,
        handle: Handle,
        name: &str,
        dest: &mut String,
        max_len: usize,
    ) -> u32 {
        let name = cstring_or_bug!(name);
        let mut buf = vec![0u8; max_len];
        let code = unsafe {
            xeneth_sys::XC_GetPropertyValueE(
                handle,
                name.as_ptr(),
                buf.as_mut_ptr() as *mut c_char,
                max_len as i32,
            ) as u32
        };
        if code == codes::I_OK {
            read_cstr(&buf, dest);
        }
        code
    }

    fn get_property_blob(&self, handle: Handle, name: &str, dest: &mut [u8]) -> u32 {
        let name = cstring_or_bug!(name);
        unsafe {
            xeneth_sys::XC_GetPropertyBlob(
                handle,
                name.as_ptr(),
                dest.as_mut_ptr() as *mut c_char,
                dest.len() as u32,
            ) as u32
        }
    }

    fn set_property_value(&self, handle: Handle, name: &str, value: &str) -> u32 {
        let name = cstring_or_bug!(name);
        let value = cstring_or_bug!(value);
        let unit = cstring_or_bug!("");
        unsafe {
            xeneth_sys::XC_SetPropertyValue(handle, name.as_ptr(), value.as_ptr(), unit.as_ptr())
                as u32
        }
    }

    fn set_property_value_f64(&self, handle: Handle, name: &str, value: f64) -> u32 {
        let name = cstring_or_bug!(name);
        let unit = cstring_or_bug!("");
        unsafe {
            xeneth_sys::XC_SetPropertyValueF(handle, name.as_ptr(), value, unit.as_ptr()) as u32
        }
    }

    fn set_property_value_long(&self, handle: Handle, name: &str, value: i32) -> u32 {
        let name = cstring_or_bug!(name);
        let unit = cstring_or_bug!("");
        unsafe {
            xeneth_sys::XC_SetPropertyValueL(
                handle,
                name.as_ptr(),
                value as std::ffi::c_long,
                unit.as_ptr(),
            ) as u32
        }
    }

    fn set_property_value_enum(&self, handle: Handle, name: &str, value: &str) -> u32 {
        let name = cstring_or_bug!(name);
        let value = cstring_or_bug!(value);
        unsafe { xeneth_sys::XC_SetPropertyValueE(handle, name.as_ptr(), value.as_ptr()) as u32 }
    }

    fn set_property_blob(&self, handle: Handle, name: &str, value: &[u8]) -> u32 {
        let name = cstring_or_bug!(name);
        unsafe {
            xeneth_sys::XC_SetPropertyBlob(
                handle,
                name.as_ptr(),
                value.as_ptr() as *mut c_char,
                value.len() as u32,
            ) as u32
        }
    }

    fn load_settings(&self, handle: Handle, path: &str) -> u32 {
        let path = cstring_or_bug!(path);
        unsafe { xeneth_sys::XC_LoadSettings(handle, path.as_ptr()) as u32 }
    }

    fn save_settings(&self, handle: Handle, path: &str) -> u32 {
        let path = cstring_or_bug!(path);
        unsafe { xeneth_sys::XC_SaveSettings(handle, path.as_ptr()) as u32 }
    }

    fn load_calibration(&self, handle: Handle, path: &str, flags: u32) -> u32 {
        let path = cstring_or_bug!(path);
        unsafe { xeneth_sys::XC_LoadCalibration(handle, path.as_ptr(), flags as c_ulong) as u32 }
    }

    fn load_colour_profile(&self, handle: Handle, path: &str) -> u32 {
        let path = cstring_or_bug!(path);
        unsafe { xeneth_sys::XC_LoadColourProfile(handle, path.as_ptr()) as u32 }
    }

    fn error_to_string(&self, code: u32, dest: &mut String, max_len: usize) -> i32 {
        let mut buf = vec![0u8; max_len];
        let written = unsafe {
            xeneth_sys::XC_ErrorToString(
                code as i32,
                buf.as_mut_ptr() as *mut c_char,
                max_len as i32,
            )
        };
        if written != 0 {
            read_cstr(&buf, dest);
        }
        written
    }
}
