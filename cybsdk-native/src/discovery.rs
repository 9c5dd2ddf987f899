//! SDK entry point: versions, discovery and mockup creation

use std::ffi::c_uint;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::device::NativeDevice;
use crate::error::DeviceError;
use crate::library::NativeLibrary;
use crate::types::{DeviceInfo, DeviceKind, MarshaledInfo, SdkVersion, BINDING_VERSION};

/// Entry point of the Virtualizer SDK
///
/// Holds the loaded native library; every device created here keeps a
/// reference to it.
#[derive(Debug, Clone)]
pub struct Virt {
    library: Arc<NativeLibrary>,
}

impl Virt {
    /// Wrap an already loaded library
    pub fn new(library: Arc<NativeLibrary>) -> Self {
        Self { library }
    }

    /// Load the native library from the default locations
    pub fn load_default() -> Result<Self, DeviceError> {
        Ok(Self::new(Arc::new(NativeLibrary::load_default()?)))
    }

    /// Load the native library from `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DeviceError> {
        Ok(Self::new(Arc::new(NativeLibrary::load(path)?)))
    }

    /// The loaded library
    pub fn library(&self) -> &Arc<NativeLibrary> {
        &self.library
    }

    /// Version of this binding
    pub fn sdk_version() -> SdkVersion {
        BINDING_VERSION
    }

    /// Version reported by the native library
    pub fn native_sdk_version(&self) -> SdkVersion {
        // SAFETY: no arguments, plain value return.
        let raw = unsafe { (self.library.symbols().get_sdk_version)() };
        SdkVersion::from_raw(raw)
    }

    /// Find the standard Virtualizer device
    ///
    /// Returns `None` if no device is connected.
    pub fn find_device(&self) -> Option<NativeDevice> {
        // SAFETY: returns null or a new device owned by the caller.
        unsafe {
            let raw = (self.library.symbols().find_device)();
            NativeDevice::from_raw(self.library.clone(), raw, DeviceKind::Hardware)
        }
    }

    /// Get the device described by `info` (from [`Virt::find_devices`])
    pub fn get_device(&self, info: &DeviceInfo) -> Option<NativeDevice> {
        let marshaled = MarshaledInfo::new(info);
        let raw_info = marshaled.as_raw();
        // SAFETY: `raw_info` borrows `marshaled`, which outlives the call.
        unsafe {
            let raw = (self.library.symbols().get_device)(&raw_info);
            NativeDevice::from_raw(self.library.clone(), raw, DeviceKind::Hardware)
        }
    }

    /// Find all Virtualizer devices and copy out their info
    ///
    /// Native memory is released before returning.
    pub fn find_devices(&self) -> Vec<DeviceInfo> {
        let symbols = self.library.symbols();
        let mut count: c_uint = 0;
        // SAFETY: the library writes the element count and returns an array
        // of that many records (or null).
        let raw = unsafe { (symbols.find_devices)(&mut count) };
        debug!("Native FindDevices reported {} device(s)", count);

        if raw.is_null() {
            return Vec::new();
        }

        let devices = if count == 0 {
            Vec::new()
        } else {
            // SAFETY: `raw` points to `count` initialised records.
            let records = unsafe { std::slice::from_raw_parts(raw, count as usize) };
            records
                .iter()
                .map(|r| unsafe { DeviceInfo::from_raw(r) })
                .collect()
        };

        // SAFETY: array came from FindDevices and is not used after this.
        unsafe { (symbols.delete_found_devices)(raw) };
        devices
    }

    /// Create a mockup driven by an XInput controller
    pub fn create_mockup_xinput(&self) -> Option<NativeDevice> {
        info!("Creating XInput mockup device");
        // SAFETY: returns null or a new device owned by the caller.
        unsafe {
            let raw = (self.library.symbols().create_mockup_xinput)();
            NativeDevice::from_raw(self.library.clone(), raw, DeviceKind::MockupXInput)
        }
    }

    /// Create a mockup driven by the keyboard
    pub fn create_mockup_keyboard(&self) -> Option<NativeDevice> {
        info!("Creating keyboard mockup device");
        // SAFETY: returns null or a new device owned by the caller.
        unsafe {
            let raw = (self.library.symbols().create_mockup_keyboard)();
            NativeDevice::from_raw(self.library.clone(), raw, DeviceKind::MockupKeyboard)
        }
    }
}
