//! Runtime binding to the Cyberith Virtualizer native SDK
//!
//! This crate loads the vendor's closed-source `CybSDK_Native` library at
//! runtime and exposes its devices through a single capability trait:
//!
//! - Native devices (real hardware, XInput and keyboard mockups)
//! - Simulated devices (pure Rust, for tests and running without hardware)
//! - Monitoring middleware that traces every call
//!
//! Every native call is a direct, synchronous pass-through.

pub mod error;
pub mod ffi;
pub mod library;
pub mod monitor;
pub mod simulated;
pub mod types;

mod device;
mod discovery;

pub use device::NativeDevice;
pub use discovery::Virt;
pub use error::DeviceError;
pub use library::{default_search_paths, NativeLibrary, LIBRARY_PATH_ENV};
pub use monitor::{CallCategory, CallFilter, MonitorConfig, MonitorDevice};
pub use simulated::{HapticState, SimulatedDevice, SimulatedReadings};
pub use types::{DeviceInfo, DeviceKind, SdkVersion, BINDING_VERSION};

use std::sync::Arc;

/// Main interface all Virtualizer devices implement
///
/// Methods map one-to-one onto the native `CybSDK_VirtDevice_*` entry points.
/// Nothing is validated or retried here; readings are only meaningful between
/// a successful [`open`](VirtDevice::open) and [`close`](VirtDevice::close).
pub trait VirtDevice: Send + Sync {
    /// Which implementation backs this device
    fn kind(&self) -> DeviceKind;

    /// Open the connection to the device
    ///
    /// No other application can have the device open at the same time.
    fn open(&self) -> Result<(), DeviceError>;

    /// Check if the connection was opened before
    fn is_open(&self) -> bool;

    /// Close the connection to the device
    fn close(&self) -> Result<(), DeviceError>;

    /// USB information of this device
    fn get_device_info(&self) -> Result<DeviceInfo, DeviceError>;

    /// Current player height relative to the default height
    ///
    /// 1.0 = 1 cm. Below minus threshold is crouching, above threshold is
    /// jumping. The default height is set by
    /// [`reset_player_height`](VirtDevice::reset_player_height).
    fn get_player_height(&self) -> f32;

    /// Assign the current height as the default height
    ///
    /// Call while the player stands upright.
    fn reset_player_height(&self);

    /// Absolute player orientation, 0.0..1.0 (= 0°..360°), clockwise
    fn get_player_orientation(&self) -> f32;

    /// Assign the current orientation as the origin
    ///
    /// Newer Virtualizers orient themselves automatically; kept for older units.
    fn reset_player_orientation(&self);

    /// Movement speed, 1.0 = 1 m/s
    fn get_movement_speed(&self) -> f32;

    /// Movement direction relative to the player orientation
    ///
    /// -1.0..1.0 (= -180°..180°), clockwise.
    fn get_movement_direction(&self) -> f32;

    /// Whether the device has a haptic unit
    fn has_haptic(&self) -> bool;

    /// Play a signal on the haptic unit
    fn haptic_play(&self);

    /// Stop the haptic unit
    fn haptic_stop(&self);

    /// Set the gain (dB) level of the haptic unit, 0..=3
    fn haptic_set_gain(&self, gain: i32);

    /// Set the frequency (Hz) of the haptic sine wave, 0..=80
    fn haptic_set_frequency(&self, frequency: i32);

    /// Set the haptic amplitude in the baseplate, 0 (none) ..= 100 (full)
    fn haptic_set_volume(&self, volume: i32);
}

/// Type alias for a shared device
pub type SharedDevice = Arc<dyn VirtDevice>;
