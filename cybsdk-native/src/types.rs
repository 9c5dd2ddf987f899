//! Common types for the native binding

use std::ffi::{CStr, CString};
use std::fmt;

use serde::Serialize;

use crate::ffi::{self, RawDeviceInfo, WideChar};

/// Version of this binding (matches the SDK release it was written against)
pub const BINDING_VERSION: SdkVersion = SdkVersion { major: 4, minor: 4 };

/// SDK version, encoded natively as `(major << 8) | minor`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SdkVersion {
    pub major: u8,
    pub minor: u8,
}

impl SdkVersion {
    /// Decode from the native `u16` representation
    pub fn from_raw(raw: u16) -> Self {
        Self {
            major: (raw >> 8) as u8,
            minor: (raw & 0xFF) as u8,
        }
    }

    /// Encode to the native `u16` representation
    pub fn raw(&self) -> u16 {
        (self.major as u16) << 8 | self.minor as u16
    }
}

impl fmt::Display for SdkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Which implementation backs a device handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeviceKind {
    /// Physical Virtualizer over USB
    Hardware,
    /// Native mockup driven by an XInput controller
    MockupXInput,
    /// Native mockup driven by the keyboard
    MockupKeyboard,
    /// In-process simulation, no native library involved
    Simulated,
}

impl DeviceKind {
    /// Whether the handle is backed by the native library
    pub fn is_native(&self) -> bool {
        !matches!(self, Self::Simulated)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hardware => "hardware",
            Self::MockupXInput => "xinput mockup",
            Self::MockupKeyboard => "keyboard mockup",
            Self::Simulated => "simulated",
        }
    }
}

/// USB information about a Virtualizer device
///
/// Owned copy of the native record; no identity beyond its field values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    /// Firmware major version
    pub major_version: u8,
    /// Firmware minor version
    pub minor_version: u8,
    /// USB vendor ID
    pub vendor_id: u16,
    /// Vendor name
    pub vendor_name: String,
    /// USB product ID
    pub product_id: u16,
    /// Product name
    pub product_name: String,
    /// Native device path (used to reopen the same device)
    pub device_path: String,
}

impl DeviceInfo {
    /// Copy a native record into owned memory
    ///
    /// # Safety
    ///
    /// All string pointers in `raw` must be null or valid NUL-terminated
    /// strings for the duration of the call.
    pub unsafe fn from_raw(raw: &RawDeviceInfo) -> Self {
        let device_path = if raw.device_path.is_null() {
            String::new()
        } else {
            // SAFETY: caller guarantees a valid C string.
            unsafe { CStr::from_ptr(raw.device_path) }
                .to_string_lossy()
                .into_owned()
        };
        Self {
            major_version: raw.major_version,
            minor_version: raw.minor_version,
            vendor_id: raw.vendor_id,
            // SAFETY: forwarded from caller.
            vendor_name: unsafe { ffi::wide_ptr_to_string(raw.vendor_name) },
            product_id: raw.product_id,
            product_name: unsafe { ffi::wide_ptr_to_string(raw.product_name) },
            device_path,
        }
    }

    /// Firmware version as "major.minor"
    pub fn firmware_version(&self) -> String {
        format!("{}.{}", self.major_version, self.minor_version)
    }
}

/// Buffers backing a [`RawDeviceInfo`] built from a [`DeviceInfo`]
///
/// The raw record borrows from these buffers, so it is only valid while this
/// value is alive.
pub(crate) struct MarshaledInfo {
    vendor_name: Vec<WideChar>,
    product_name: Vec<WideChar>,
    device_path: CString,
    major_version: u8,
    minor_version: u8,
    vendor_id: u16,
    product_id: u16,
}

impl MarshaledInfo {
    pub(crate) fn new(info: &DeviceInfo) -> Self {
        // Interior NULs cannot come from the native side; drop them if present.
        let path: Vec<u8> = info.device_path.bytes().filter(|&b| b != 0).collect();
        Self {
            vendor_name: ffi::encode_wide(&info.vendor_name),
            product_name: ffi::encode_wide(&info.product_name),
            device_path: CString::new(path).unwrap_or_default(),
            major_version: info.major_version,
            minor_version: info.minor_version,
            vendor_id: info.vendor_id,
            product_id: info.product_id,
        }
    }

    pub(crate) fn as_raw(&self) -> RawDeviceInfo {
        RawDeviceInfo {
            major_version: self.major_version,
            minor_version: self.minor_version,
            vendor_id: self.vendor_id,
            vendor_name: self.vendor_name.as_ptr(),
            product_id: self.product_id,
            product_name: self.product_name.as_ptr(),
            device_path: self.device_path.as_ptr(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_info() -> DeviceInfo {
        DeviceInfo {
            major_version: 2,
            minor_version: 7,
            vendor_id: 0x2BA2,
            vendor_name: "Cyberith GmbH".into(),
            product_id: 0x0001,
            product_name: "Virtualizer Elite 2".into(),
            device_path: r"\\?\hid#vid_2ba2&pid_0001".into(),
        }
    }

    #[test]
    fn test_version_split() {
        let v = SdkVersion::from_raw(0x0404);
        assert_eq!(v, SdkVersion { major: 4, minor: 4 });
        assert_eq!(v.raw(), 0x0404);
        assert_eq!(v.to_string(), "4.4");
    }

    #[test]
    fn test_binding_version() {
        assert_eq!(BINDING_VERSION.raw(), (4 << 8) | 4);
    }

    #[test]
    fn test_version_ordering() {
        assert!(SdkVersion::from_raw(0x0403) < SdkVersion::from_raw(0x0404));
        assert!(SdkVersion::from_raw(0x0500) > SdkVersion::from_raw(0x04FF));
    }

    #[test]
    fn test_marshal_roundtrip() {
        let info = sample_info();
        let marshaled = MarshaledInfo::new(&info);
        let raw = marshaled.as_raw();
        let back = unsafe { DeviceInfo::from_raw(&raw) };
        assert_eq!(back, info);
        assert_eq!(back.firmware_version(), "2.7");
    }

    #[test]
    fn test_null_strings_decode_empty() {
        let raw = RawDeviceInfo {
            major_version: 1,
            minor_version: 0,
            vendor_id: 1,
            vendor_name: std::ptr::null(),
            product_id: 2,
            product_name: std::ptr::null(),
            device_path: std::ptr::null(),
        };
        let info = unsafe { DeviceInfo::from_raw(&raw) };
        assert!(info.vendor_name.is_empty());
        assert!(info.product_name.is_empty());
        assert!(info.device_path.is_empty());
    }

    #[test]
    fn test_device_kind() {
        assert!(DeviceKind::Hardware.is_native());
        assert!(DeviceKind::MockupKeyboard.is_native());
        assert!(!DeviceKind::Simulated.is_native());
    }
}
