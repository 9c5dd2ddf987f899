//! MonitorDevice middleware for tracing device calls
//!
//! Wraps any [`VirtDevice`] and emits a `tracing` event for every call that
//! passes through it, together with its arguments and result.
//!
//! # Example
//!
//! ```ignore
//! use cybsdk_native::{MonitorConfig, MonitorDevice, Virt};
//!
//! let virt = Virt::load_default()?;
//! let device = Arc::new(virt.find_device().unwrap());
//! let monitored = MonitorDevice::wrap(device, MonitorConfig::default());
//! ```

use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use crate::error::DeviceError;
use crate::types::{DeviceInfo, DeviceKind};
use crate::VirtDevice;

const TARGET: &str = "cybsdk::monitor";

/// Category of a device call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallCategory {
    /// open / is_open / close / device info
    Lifecycle,
    /// height, orientation, speed, direction and their resets
    Telemetry,
    /// haptic unit control
    Haptic,
}

/// Which calls to report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallFilter {
    #[default]
    All,
    Only(CallCategory),
}

impl FromStr for CallFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" | "" => Ok(Self::All),
            "lifecycle" | "life" | "conn" => Ok(Self::Only(CallCategory::Lifecycle)),
            "telemetry" | "data" | "tel" => Ok(Self::Only(CallCategory::Telemetry)),
            "haptic" | "haptics" => Ok(Self::Only(CallCategory::Haptic)),
            _ => Err(format!("Unknown filter: {}", s)),
        }
    }
}

impl CallFilter {
    fn allows(&self, category: CallCategory) -> bool {
        match self {
            Self::All => true,
            Self::Only(c) => *c == category,
        }
    }
}

/// Configuration for [`MonitorDevice`]
#[derive(Debug, Clone, Default)]
pub struct MonitorConfig {
    pub filter: CallFilter,
}

impl MonitorConfig {
    pub fn with_filter(mut self, filter: CallFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Device middleware that reports every call
pub struct MonitorDevice {
    inner: Arc<dyn VirtDevice>,
    config: MonitorConfig,
}

impl MonitorDevice {
    /// Wrap a device with monitoring middleware
    pub fn wrap(device: Arc<dyn VirtDevice>, config: MonitorConfig) -> Arc<dyn VirtDevice> {
        Arc::new(Self {
            inner: device,
            config,
        })
    }

    fn report(&self, category: CallCategory, call: &str, detail: std::fmt::Arguments<'_>) {
        if self.config.filter.allows(category) {
            info!(target: TARGET, kind = self.inner.kind().as_str(), "{call} {detail}");
        }
    }
}

impl VirtDevice for MonitorDevice {
    fn kind(&self) -> DeviceKind {
        self.inner.kind()
    }

    fn open(&self) -> Result<(), DeviceError> {
        let result = self.inner.open();
        self.report(CallCategory::Lifecycle, "Open", format_args!("-> {:?}", result));
        result
    }

    fn is_open(&self) -> bool {
        let open = self.inner.is_open();
        self.report(CallCategory::Lifecycle, "IsOpen", format_args!("-> {open}"));
        open
    }

    fn close(&self) -> Result<(), DeviceError> {
        let result = self.inner.close();
        self.report(CallCategory::Lifecycle, "Close", format_args!("-> {:?}", result));
        result
    }

    fn get_device_info(&self) -> Result<DeviceInfo, DeviceError> {
        let result = self.inner.get_device_info();
        self.report(
            CallCategory::Lifecycle,
            "GetDeviceInfo",
            format_args!("-> {:?}", result),
        );
        result
    }

    fn get_player_height(&self) -> f32 {
        let v = self.inner.get_player_height();
        self.report(CallCategory::Telemetry, "GetPlayerHeight", format_args!("-> {v:.2}"));
        v
    }

    fn reset_player_height(&self) {
        self.inner.reset_player_height();
        self.report(CallCategory::Telemetry, "ResetPlayerHeight", format_args!(""));
    }

    fn get_player_orientation(&self) -> f32 {
        let v = self.inner.get_player_orientation();
        self.report(
            CallCategory::Telemetry,
            "GetPlayerOrientation",
            format_args!("-> {v:.4}"),
        );
        v
    }

    fn reset_player_orientation(&self) {
        self.inner.reset_player_orientation();
        self.report(CallCategory::Telemetry, "ResetPlayerOrientation", format_args!(""));
    }

    fn get_movement_speed(&self) -> f32 {
        let v = self.inner.get_movement_speed();
        self.report(CallCategory::Telemetry, "GetMovementSpeed", format_args!("-> {v:.2}"));
        v
    }

    fn get_movement_direction(&self) -> f32 {
        let v = self.inner.get_movement_direction();
        self.report(
            CallCategory::Telemetry,
            "GetMovementDirection",
            format_args!("-> {v:.4}"),
        );
        v
    }

    fn has_haptic(&self) -> bool {
        let v = self.inner.has_haptic();
        self.report(CallCategory::Haptic, "HasHaptic", format_args!("-> {v}"));
        v
    }

    fn haptic_play(&self) {
        self.inner.haptic_play();
        self.report(CallCategory::Haptic, "HapticPlay", format_args!(""));
    }

    fn haptic_stop(&self) {
        self.inner.haptic_stop();
        self.report(CallCategory::Haptic, "HapticStop", format_args!(""));
    }

    fn haptic_set_gain(&self, gain: i32) {
        self.inner.haptic_set_gain(gain);
        self.report(CallCategory::Haptic, "HapticSetGain", format_args!("({gain})"));
    }

    fn haptic_set_frequency(&self, frequency: i32) {
        self.inner.haptic_set_frequency(frequency);
        self.report(
            CallCategory::Haptic,
            "HapticSetFrequency",
            format_args!("({frequency})"),
        );
    }

    fn haptic_set_volume(&self, volume: i32) {
        self.inner.haptic_set_volume(volume);
        self.report(CallCategory::Haptic, "HapticSetVolume", format_args!("({volume})"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulated::{SimulatedDevice, SimulatedReadings};

    #[test]
    fn test_call_filter_parse() {
        assert_eq!(CallFilter::from_str("all").unwrap(), CallFilter::All);
        assert_eq!(
            CallFilter::from_str("Telemetry").unwrap(),
            CallFilter::Only(CallCategory::Telemetry)
        );
        assert_eq!(
            CallFilter::from_str("haptic").unwrap(),
            CallFilter::Only(CallCategory::Haptic)
        );
        assert_eq!(
            CallFilter::from_str("conn").unwrap(),
            CallFilter::Only(CallCategory::Lifecycle)
        );
        assert!(CallFilter::from_str("bogus").is_err());
    }

    #[test]
    fn test_filter_allows() {
        let f = CallFilter::Only(CallCategory::Haptic);
        assert!(f.allows(CallCategory::Haptic));
        assert!(!f.allows(CallCategory::Telemetry));
        assert!(CallFilter::All.allows(CallCategory::Lifecycle));
    }

    #[test]
    fn test_monitor_passes_through() {
        let sim = Arc::new(SimulatedDevice::new());
        sim.set_readings(SimulatedReadings {
            height_cm: 3.0,
            orientation: 0.5,
            speed_mps: 1.25,
            direction: -0.5,
        });
        let dev = MonitorDevice::wrap(sim.clone(), MonitorConfig::default());

        assert_eq!(dev.kind(), DeviceKind::Simulated);
        dev.open().unwrap();
        assert!(dev.is_open());
        assert_eq!(dev.get_player_height(), 3.0);
        assert_eq!(dev.get_player_orientation(), 0.5);
        assert_eq!(dev.get_movement_speed(), 1.25);
        assert_eq!(dev.get_movement_direction(), -0.5);

        dev.haptic_set_volume(60);
        dev.haptic_play();
        assert_eq!(sim.haptic_state().volume, 60);
        assert!(sim.haptic_state().playing);
    }
}
