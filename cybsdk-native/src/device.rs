//! Native device handle invoking the vendor library

use std::ffi::c_void;
use std::ptr::NonNull;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::DeviceError;
use crate::library::NativeLibrary;
use crate::types::{DeviceInfo, DeviceKind};
use crate::VirtDevice;

/// Owned pointer to a native device object
struct Handle(NonNull<c_void>);

// SAFETY: the native object is not tied to the creating thread; all access
// goes through the mutex in `NativeDevice`, so calls are never concurrent.
unsafe impl Send for Handle {}

/// Device backed by `CybSDK_Native`
///
/// Every trait method is a direct call into the native library. The handle is
/// released with `CybSDK_Virt_DeleteDevice` on drop.
pub struct NativeDevice {
    library: Arc<NativeLibrary>,
    handle: Mutex<Handle>,
    kind: DeviceKind,
}

impl NativeDevice {
    /// Take ownership of a native device pointer
    ///
    /// Returns `None` for a null pointer, matching the SDK's "not found".
    ///
    /// # Safety
    ///
    /// `raw` must be null or a device created by `library` that is not owned
    /// by anything else.
    pub(crate) unsafe fn from_raw(
        library: Arc<NativeLibrary>,
        raw: *mut c_void,
        kind: DeviceKind,
    ) -> Option<Self> {
        let ptr = NonNull::new(raw)?;
        debug!("Acquired native {} device {:p}", kind.as_str(), ptr);
        Some(Self {
            library,
            handle: Mutex::new(Handle(ptr)),
            kind,
        })
    }

    fn call<R>(&self, f: impl FnOnce(*mut c_void) -> R) -> R {
        let handle = self.handle.lock();
        f(handle.0.as_ptr())
    }
}

// SAFETY (all blocks below): the handle is a live device created by
// `self.library`, whose symbol table matches the native signatures.
impl VirtDevice for NativeDevice {
    fn kind(&self) -> DeviceKind {
        self.kind
    }

    fn open(&self) -> Result<(), DeviceError> {
        let opened = self.call(|h| unsafe { (self.library.symbols().open)(h) });
        if opened {
            Ok(())
        } else {
            Err(DeviceError::OpenFailed)
        }
    }

    fn is_open(&self) -> bool {
        self.call(|h| unsafe { (self.library.symbols().is_open)(h) })
    }

    fn close(&self) -> Result<(), DeviceError> {
        let closed = self.call(|h| unsafe { (self.library.symbols().close)(h) });
        if closed {
            Ok(())
        } else {
            Err(DeviceError::CloseFailed)
        }
    }

    fn get_device_info(&self) -> Result<DeviceInfo, DeviceError> {
        self.call(|h| {
            let raw = unsafe { (self.library.symbols().get_device_info)(h) };
            if raw.is_null() {
                return Err(DeviceError::NullDeviceInfo);
            }
            // The record is owned by the device object, which the lock keeps alive.
            Ok(unsafe { DeviceInfo::from_raw(&*raw) })
        })
    }

    fn get_player_height(&self) -> f32 {
        self.call(|h| unsafe { (self.library.symbols().get_player_height)(h) })
    }

    fn reset_player_height(&self) {
        self.call(|h| unsafe { (self.library.symbols().reset_player_height)(h) })
    }

    fn get_player_orientation(&self) -> f32 {
        self.call(|h| unsafe { (self.library.symbols().get_player_orientation)(h) })
    }

    fn reset_player_orientation(&self) {
        self.call(|h| unsafe { (self.library.symbols().reset_player_orientation)(h) })
    }

    fn get_movement_speed(&self) -> f32 {
        self.call(|h| unsafe { (self.library.symbols().get_movement_speed)(h) })
    }

    fn get_movement_direction(&self) -> f32 {
        self.call(|h| unsafe { (self.library.symbols().get_movement_direction)(h) })
    }

    fn has_haptic(&self) -> bool {
        self.call(|h| unsafe { (self.library.symbols().has_haptic)(h) })
    }

    fn haptic_play(&self) {
        self.call(|h| unsafe { (self.library.symbols().haptic_play)(h) })
    }

    fn haptic_stop(&self) {
        self.call(|h| unsafe { (self.library.symbols().haptic_stop)(h) })
    }

    fn haptic_set_gain(&self, gain: i32) {
        self.call(|h| unsafe { (self.library.symbols().haptic_set_gain)(h, gain) })
    }

    fn haptic_set_frequency(&self, frequency: i32) {
        self.call(|h| unsafe { (self.library.symbols().haptic_set_frequency)(h, frequency) })
    }

    fn haptic_set_volume(&self, volume: i32) {
        self.call(|h| unsafe { (self.library.symbols().haptic_set_volume)(h, volume) })
    }
}

impl Drop for NativeDevice {
    fn drop(&mut self) {
        let handle = self.handle.get_mut();
        // SAFETY: we own the pointer and nothing else can reach it now.
        unsafe { (self.library.symbols().delete_device)(handle.0.as_ptr()) };
        debug!("Released native {} device", self.kind.as_str());
    }
}

impl std::fmt::Debug for NativeDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeDevice")
            .field("kind", &self.kind)
            .field("library", &self.library.path())
            .finish_non_exhaustive()
    }
}
