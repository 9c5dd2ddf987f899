//! High-level session interface for Cyberith Virtualizer devices
//!
//! This crate wraps any [`VirtDevice`] (native hardware, native mockups,
//! simulated or monitored) in a [`Virtualizer`] session that tracks the
//! connection state and offers typed readings on top of the raw floats.

pub mod error;
pub mod haptic;
pub mod locomotion;
pub mod posture;
pub mod telemetry;

pub use error::VirtualizerError;
pub use haptic::{HapticFrequency, HapticGain, HapticVolume};
pub use locomotion::WalkerControl;
pub use posture::{Posture, PostureThresholds};
pub use telemetry::Telemetry;

// Re-export the binding types consumers need alongside the session
pub use cybsdk_native::{DeviceInfo, DeviceKind, SdkVersion, SharedDevice, Virt, VirtDevice};

use std::sync::Arc;

use tracing::{debug, info, warn};

/// Native mockup flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockupKind {
    /// Driven by an XInput controller
    XInput,
    /// Driven by the keyboard
    Keyboard,
}

/// Connection to one Virtualizer device
///
/// Every operation except [`open`](Self::open), [`close`](Self::close),
/// [`is_open`](Self::is_open) and [`kind`](Self::kind) fails with
/// [`VirtualizerError::NotOpen`] while the device is not open.
pub struct Virtualizer {
    device: SharedDevice,
}

impl Virtualizer {
    /// Create a session over an existing device
    pub fn new(device: SharedDevice) -> Self {
        Self { device }
    }

    /// Find the standard Virtualizer device
    pub fn find(virt: &Virt) -> Result<Self, VirtualizerError> {
        let device = virt
            .find_device()
            .ok_or_else(|| VirtualizerError::NotFound("no Virtualizer connected".into()))?;
        debug!("Found Virtualizer: {:?}", device);
        Ok(Self::new(Arc::new(device)))
    }

    /// Create a native mockup device
    pub fn mockup(virt: &Virt, kind: MockupKind) -> Result<Self, VirtualizerError> {
        let device = match kind {
            MockupKind::XInput => virt.create_mockup_xinput(),
            MockupKind::Keyboard => virt.create_mockup_keyboard(),
        }
        .ok_or_else(|| VirtualizerError::NotFound(format!("{kind:?} mockup unavailable")))?;
        Ok(Self::new(Arc::new(device)))
    }

    /// The underlying device
    pub fn device(&self) -> &SharedDevice {
        &self.device
    }

    /// Which implementation backs this session
    pub fn kind(&self) -> DeviceKind {
        self.device.kind()
    }

    fn ensure_open(&self) -> Result<(), VirtualizerError> {
        if self.device.is_open() {
            Ok(())
        } else {
            Err(VirtualizerError::NotOpen)
        }
    }

    // === Connection ===

    /// Open the connection
    pub fn open(&self) -> Result<(), VirtualizerError> {
        self.device.open()?;
        info!("Opened {} Virtualizer", self.kind().as_str());
        Ok(())
    }

    /// Close the connection
    pub fn close(&self) -> Result<(), VirtualizerError> {
        self.device.close()?;
        info!("Closed {} Virtualizer", self.kind().as_str());
        Ok(())
    }

    /// Whether the connection is open
    pub fn is_open(&self) -> bool {
        self.device.is_open()
    }

    // === Device Info ===

    /// USB info of the device
    ///
    /// Readable while the connection is closed, e.g. when another
    /// application holds the device open.
    pub fn info(&self) -> Result<DeviceInfo, VirtualizerError> {
        Ok(self.device.get_device_info()?)
    }

    // === Telemetry ===

    /// Height relative to the default height, cm
    pub fn player_height(&self) -> Result<f32, VirtualizerError> {
        self.ensure_open()?;
        Ok(self.device.get_player_height())
    }

    /// Orientation, 0.0..1.0
    pub fn player_orientation(&self) -> Result<f32, VirtualizerError> {
        self.ensure_open()?;
        Ok(self.device.get_player_orientation())
    }

    /// Movement speed, m/s
    pub fn movement_speed(&self) -> Result<f32, VirtualizerError> {
        self.ensure_open()?;
        Ok(self.device.get_movement_speed())
    }

    /// Movement direction, -1.0..1.0
    pub fn movement_direction(&self) -> Result<f32, VirtualizerError> {
        self.ensure_open()?;
        Ok(self.device.get_movement_direction())
    }

    /// Read all telemetry values at once
    pub fn telemetry(&self) -> Result<Telemetry, VirtualizerError> {
        self.ensure_open()?;
        Ok(Telemetry {
            height_cm: self.device.get_player_height(),
            orientation: self.device.get_player_orientation(),
            speed_mps: self.device.get_movement_speed(),
            direction: self.device.get_movement_direction(),
        })
    }

    /// Classify the current height
    pub fn posture(&self, thresholds: &PostureThresholds) -> Result<Posture, VirtualizerError> {
        Ok(thresholds.classify(self.player_height()?))
    }

    /// Walker control from the current readings
    pub fn walker_control(
        &self,
        thresholds: &PostureThresholds,
        speed_scale: f32,
    ) -> Result<WalkerControl, VirtualizerError> {
        let telemetry = self.telemetry()?;
        let posture = thresholds.classify(telemetry.height_cm);
        Ok(WalkerControl::from_telemetry(
            &telemetry,
            posture,
            speed_scale,
        ))
    }

    // === Calibration ===

    /// Use the current height as the default height (player standing upright)
    pub fn reset_player_height(&self) -> Result<(), VirtualizerError> {
        self.ensure_open()?;
        self.device.reset_player_height();
        debug!("Player height reset");
        Ok(())
    }

    /// Use the current orientation as the origin
    pub fn reset_player_orientation(&self) -> Result<(), VirtualizerError> {
        self.ensure_open()?;
        self.device.reset_player_orientation();
        debug!("Player orientation reset");
        Ok(())
    }

    // === Haptics ===

    /// Whether the device has a haptic unit
    pub fn has_haptic(&self) -> Result<bool, VirtualizerError> {
        self.ensure_open()?;
        Ok(self.device.has_haptic())
    }

    /// Start playing the haptic signal
    pub fn haptic_play(&self) -> Result<(), VirtualizerError> {
        self.ensure_open()?;
        self.warn_without_haptic();
        self.device.haptic_play();
        Ok(())
    }

    /// Stop the haptic unit
    pub fn haptic_stop(&self) -> Result<(), VirtualizerError> {
        self.ensure_open()?;
        self.device.haptic_stop();
        Ok(())
    }

    pub fn set_haptic_gain(&self, gain: HapticGain) -> Result<(), VirtualizerError> {
        self.ensure_open()?;
        self.device.haptic_set_gain(i32::from(gain.value()));
        Ok(())
    }

    pub fn set_haptic_frequency(&self, frequency: HapticFrequency) -> Result<(), VirtualizerError> {
        self.ensure_open()?;
        self.device.haptic_set_frequency(i32::from(frequency.hz()));
        Ok(())
    }

    pub fn set_haptic_volume(&self, volume: HapticVolume) -> Result<(), VirtualizerError> {
        self.ensure_open()?;
        self.device.haptic_set_volume(i32::from(volume.percent()));
        Ok(())
    }

    fn warn_without_haptic(&self) {
        if !self.device.has_haptic() {
            warn!("Device reports no haptic unit; command sent anyway");
        }
    }
}

impl std::fmt::Debug for Virtualizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Virtualizer")
            .field("kind", &self.kind())
            .field("open", &self.is_open())
            .finish()
    }
}
