//! In-process simulated Virtualizer
//!
//! Behaves like a connected device without touching the native library.
//! Readings are set through [`SimulatedDevice::set_readings`]; height and
//! orientation resets behave like the real SDK (relative to a stored origin).

use parking_lot::Mutex;
use tracing::trace;

use crate::error::DeviceError;
use crate::types::{DeviceInfo, DeviceKind};
use crate::VirtDevice;

/// Absolute sensor values fed into a [`SimulatedDevice`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimulatedReadings {
    /// Absolute ring height in cm
    pub height_cm: f32,
    /// Raw orientation, 0.0..1.0
    pub orientation: f32,
    /// Movement speed in m/s
    pub speed_mps: f32,
    /// Movement direction relative to orientation, -1.0..1.0
    pub direction: f32,
}

/// Haptic unit state as last written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HapticState {
    pub playing: bool,
    pub gain: i32,
    pub frequency: i32,
    pub volume: i32,
}

#[derive(Debug, Default)]
struct State {
    open: bool,
    readings: SimulatedReadings,
    height_origin: f32,
    orientation_origin: f32,
    haptic: HapticState,
}

/// Simulated device
#[derive(Debug)]
pub struct SimulatedDevice {
    info: DeviceInfo,
    has_haptic: bool,
    /// If false, `open` fails (simulates a device held by another app)
    openable: bool,
    state: Mutex<State>,
}

impl Default for SimulatedDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedDevice {
    pub fn new() -> Self {
        Self {
            info: DeviceInfo {
                major_version: 1,
                minor_version: 0,
                vendor_id: 0x0000,
                vendor_name: "Simulated".into(),
                product_id: 0x0000,
                product_name: "Simulated Virtualizer".into(),
                device_path: "sim://0".into(),
            },
            has_haptic: true,
            openable: true,
            state: Mutex::new(State::default()),
        }
    }

    /// Replace the reported device info
    pub fn with_info(mut self, info: DeviceInfo) -> Self {
        self.info = info;
        self
    }

    /// Whether the simulated device reports a haptic unit
    pub fn with_haptic(mut self, has_haptic: bool) -> Self {
        self.has_haptic = has_haptic;
        self
    }

    /// Make `open` fail
    pub fn unopenable(mut self) -> Self {
        self.openable = false;
        self
    }

    /// Set absolute sensor values
    pub fn set_readings(&self, readings: SimulatedReadings) {
        self.state.lock().readings = readings;
    }

    /// Current absolute sensor values
    pub fn readings(&self) -> SimulatedReadings {
        self.state.lock().readings
    }

    /// Last written haptic state
    pub fn haptic_state(&self) -> HapticState {
        self.state.lock().haptic
    }
}

impl VirtDevice for SimulatedDevice {
    fn kind(&self) -> DeviceKind {
        DeviceKind::Simulated
    }

    fn open(&self) -> Result<(), DeviceError> {
        if !self.openable {
            return Err(DeviceError::OpenFailed);
        }
        self.state.lock().open = true;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.state.lock().open
    }

    fn close(&self) -> Result<(), DeviceError> {
        let mut state = self.state.lock();
        if !state.open {
            return Err(DeviceError::CloseFailed);
        }
        state.open = false;
        Ok(())
    }

    fn get_device_info(&self) -> Result<DeviceInfo, DeviceError> {
        Ok(self.info.clone())
    }

    fn get_player_height(&self) -> f32 {
        let state = self.state.lock();
        state.readings.height_cm - state.height_origin
    }

    fn reset_player_height(&self) {
        let mut state = self.state.lock();
        state.height_origin = state.readings.height_cm;
        trace!("Simulated height origin set to {}", state.height_origin);
    }

    fn get_player_orientation(&self) -> f32 {
        let state = self.state.lock();
        (state.readings.orientation - state.orientation_origin).rem_euclid(1.0)
    }

    fn reset_player_orientation(&self) {
        let mut state = self.state.lock();
        state.orientation_origin = state.readings.orientation;
    }

    fn get_movement_speed(&self) -> f32 {
        self.state.lock().readings.speed_mps
    }

    fn get_movement_direction(&self) -> f32 {
        self.state.lock().readings.direction
    }

    fn has_haptic(&self) -> bool {
        self.has_haptic
    }

    fn haptic_play(&self) {
        self.state.lock().haptic.playing = true;
    }

    fn haptic_stop(&self) {
        self.state.lock().haptic.playing = false;
    }

    fn haptic_set_gain(&self, gain: i32) {
        self.state.lock().haptic.gain = gain;
    }

    fn haptic_set_frequency(&self, frequency: i32) {
        self.state.lock().haptic.frequency = frequency;
    }

    fn haptic_set_volume(&self, volume: i32) {
        self.state.lock().haptic.volume = volume;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_close_cycle() {
        let dev = SimulatedDevice::new();
        assert!(!dev.is_open());
        dev.open().unwrap();
        assert!(dev.is_open());
        dev.close().unwrap();
        assert!(!dev.is_open());
        assert!(matches!(dev.close(), Err(DeviceError::CloseFailed)));
    }

    #[test]
    fn test_unopenable() {
        let dev = SimulatedDevice::new().unopenable();
        assert!(matches!(dev.open(), Err(DeviceError::OpenFailed)));
        assert!(!dev.is_open());
    }

    #[test]
    fn test_height_reset_is_relative() {
        let dev = SimulatedDevice::new();
        dev.set_readings(SimulatedReadings {
            height_cm: 120.0,
            ..Default::default()
        });
        assert_eq!(dev.get_player_height(), 120.0);
        dev.reset_player_height();
        assert_eq!(dev.get_player_height(), 0.0);

        dev.set_readings(SimulatedReadings {
            height_cm: 132.5,
            ..Default::default()
        });
        assert!((dev.get_player_height() - 12.5).abs() < 1e-4);
    }

    #[test]
    fn test_orientation_reset_wraps() {
        let dev = SimulatedDevice::new();
        dev.set_readings(SimulatedReadings {
            orientation: 0.75,
            ..Default::default()
        });
        dev.reset_player_orientation();
        assert_eq!(dev.get_player_orientation(), 0.0);

        dev.set_readings(SimulatedReadings {
            orientation: 0.25,
            ..Default::default()
        });
        assert!((dev.get_player_orientation() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_haptic_state_recorded() {
        let dev = SimulatedDevice::new();
        dev.haptic_set_gain(2);
        dev.haptic_set_frequency(40);
        dev.haptic_set_volume(75);
        dev.haptic_play();
        assert_eq!(
            dev.haptic_state(),
            HapticState {
                playing: true,
                gain: 2,
                frequency: 40,
                volume: 75
            }
        );
        dev.haptic_stop();
        assert!(!dev.haptic_state().playing);
    }
}
