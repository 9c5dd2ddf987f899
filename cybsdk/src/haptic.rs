//! Typed haptic unit parameters

use crate::error::VirtualizerError;

/// Gain level of the haptic unit (dB steps 0..=3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum HapticGain {
    #[default]
    Level0 = 0,
    Level1 = 1,
    Level2 = 2,
    Level3 = 3,
}

impl HapticGain {
    pub const MAX: u8 = 3;

    pub fn value(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for HapticGain {
    type Error = VirtualizerError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Self::Level0),
            1 => Ok(Self::Level1),
            2 => Ok(Self::Level2),
            3 => Ok(Self::Level3),
            _ => Err(VirtualizerError::InvalidParameter(format!(
                "Gain must be 0-{}, got {v}",
                Self::MAX
            ))),
        }
    }
}

/// Frequency of the haptic sine wave in Hz (0..=80)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HapticFrequency(u8);

impl HapticFrequency {
    pub const MAX_HZ: u8 = 80;

    pub fn new(hz: u8) -> Result<Self, VirtualizerError> {
        if hz > Self::MAX_HZ {
            return Err(VirtualizerError::InvalidParameter(format!(
                "Frequency must be 0-{} Hz, got {hz}",
                Self::MAX_HZ
            )));
        }
        Ok(Self(hz))
    }

    pub fn hz(&self) -> u8 {
        self.0
    }
}

/// Haptic amplitude in the baseplate, percent (0..=100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HapticVolume(u8);

impl HapticVolume {
    pub const MAX: u8 = 100;

    pub fn new(percent: u8) -> Result<Self, VirtualizerError> {
        if percent > Self::MAX {
            return Err(VirtualizerError::InvalidParameter(format!(
                "Volume must be 0-{}, got {percent}",
                Self::MAX
            )));
        }
        Ok(Self(percent))
    }

    pub fn percent(&self) -> u8 {
        self.0
    }
}
