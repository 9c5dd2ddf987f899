//! Raw C ABI of `CybSDK_Native`
//!
//! Layouts and signatures here mirror the vendor library exactly and must not
//! be reordered. Everything is `extern "C"` (cdecl on 32-bit Windows).

use std::ffi::{c_char, c_int, c_uint, c_void};

/// Wide character as used by the native library for vendor/product names
pub type WideChar = libc::wchar_t;

/// Device info record as laid out by the native library
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawDeviceInfo {
    pub major_version: u8,
    pub minor_version: u8,
    pub vendor_id: u16,
    pub vendor_name: *const WideChar,
    pub product_id: u16,
    pub product_name: *const WideChar,
    pub device_path: *const c_char,
}

/// Opaque native device object
pub type RawDevice = *mut c_void;

// Virt (static entry points)
pub type GetSdkVersionFn = unsafe extern "C" fn() -> u16;
pub type FindDeviceFn = unsafe extern "C" fn() -> RawDevice;
pub type GetDeviceFn = unsafe extern "C" fn(*const RawDeviceInfo) -> RawDevice;
pub type FindDevicesFn = unsafe extern "C" fn(*mut c_uint) -> *mut RawDeviceInfo;
pub type DeleteFoundDevicesFn = unsafe extern "C" fn(*mut RawDeviceInfo);
pub type CreateMockupFn = unsafe extern "C" fn() -> RawDevice;
pub type DeleteDeviceFn = unsafe extern "C" fn(RawDevice);

// VirtDevice (per-handle entry points)
pub type DeviceBoolFn = unsafe extern "C" fn(RawDevice) -> bool;
pub type DeviceFloatFn = unsafe extern "C" fn(RawDevice) -> f32;
pub type DeviceVoidFn = unsafe extern "C" fn(RawDevice);
pub type DeviceIntArgFn = unsafe extern "C" fn(RawDevice, c_int);
pub type GetDeviceInfoFn = unsafe extern "C" fn(RawDevice) -> *const RawDeviceInfo;

/// Decode a NUL-terminated wide string owned by the native library
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated `wchar_t` sequence that
/// stays valid for the duration of the call.
pub unsafe fn wide_ptr_to_string(ptr: *const WideChar) -> String {
    if ptr.is_null() {
        return String::new();
    }
    let mut len = 0usize;
    // SAFETY: caller guarantees NUL termination.
    while unsafe { *ptr.add(len) } != 0 {
        len += 1;
    }
    // SAFETY: `len` units were just read successfully.
    let units = unsafe { std::slice::from_raw_parts(ptr, len) };
    decode_wide(units)
}

/// Decode wide characters (UTF-16 on Windows, UTF-32 elsewhere)
#[cfg(windows)]
pub fn decode_wide(units: &[WideChar]) -> String {
    String::from_utf16_lossy(units)
}

/// Decode wide characters (UTF-16 on Windows, UTF-32 elsewhere)
#[cfg(not(windows))]
pub fn decode_wide(units: &[WideChar]) -> String {
    units
        .iter()
        .map(|&u| char::from_u32(u as u32).unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Encode a string as a NUL-terminated wide buffer
#[cfg(windows)]
pub fn encode_wide(s: &str) -> Vec<WideChar> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Encode a string as a NUL-terminated wide buffer
#[cfg(not(windows))]
pub fn encode_wide(s: &str) -> Vec<WideChar> {
    s.chars()
        .map(|c| c as u32 as WideChar)
        .chain(std::iter::once(0))
        .collect()
}
