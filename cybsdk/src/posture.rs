//! Jump / crouch detection from relative player height

use serde::{Deserialize, Serialize};

/// Default jump threshold, cm above the default height
pub const DEFAULT_JUMP_THRESHOLD_CM: f32 = 10.0;

/// Default crouch threshold, cm relative to the default height
pub const DEFAULT_CROUCH_THRESHOLD_CM: f32 = -15.0;

/// Player posture derived from height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Posture {
    Standing,
    Jumping,
    Crouching,
}

impl Posture {
    /// Numeric code used on the wire (0 standing, 1 jumping, 2 crouching)
    pub fn code(&self) -> u8 {
        match self {
            Self::Standing => 0,
            Self::Jumping => 1,
            Self::Crouching => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Standing),
            1 => Some(Self::Jumping),
            2 => Some(Self::Crouching),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standing => "standing",
            Self::Jumping => "jumping",
            Self::Crouching => "crouching",
        }
    }
}

/// Height thresholds for posture classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostureThresholds {
    /// Heights strictly above this are jumping
    #[serde(default = "default_jump")]
    pub jump_threshold_cm: f32,
    /// Heights strictly below this are crouching
    #[serde(default = "default_crouch")]
    pub crouch_threshold_cm: f32,
}

fn default_jump() -> f32 {
    DEFAULT_JUMP_THRESHOLD_CM
}
fn default_crouch() -> f32 {
    DEFAULT_CROUCH_THRESHOLD_CM
}

impl Default for PostureThresholds {
    fn default() -> Self {
        Self {
            jump_threshold_cm: DEFAULT_JUMP_THRESHOLD_CM,
            crouch_threshold_cm: DEFAULT_CROUCH_THRESHOLD_CM,
        }
    }
}

impl PostureThresholds {
    /// Classify a height relative to the default height
    pub fn classify(&self, height_cm: f32) -> Posture {
        if height_cm > self.jump_threshold_cm {
            Posture::Jumping
        } else if height_cm < self.crouch_threshold_cm {
            Posture::Crouching
        } else {
            Posture::Standing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_defaults() {
        let t = PostureThresholds::default();
        assert_eq!(t.classify(0.0), Posture::Standing);
        assert_eq!(t.classify(10.5), Posture::Jumping);
        assert_eq!(t.classify(-20.0), Posture::Crouching);
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        let t = PostureThresholds::default();
        assert_eq!(t.classify(10.0), Posture::Standing);
        assert_eq!(t.classify(-15.0), Posture::Standing);
    }

    #[test]
    fn test_custom_thresholds() {
        let t = PostureThresholds {
            jump_threshold_cm: 5.0,
            crouch_threshold_cm: -5.0,
        };
        assert_eq!(t.classify(6.0), Posture::Jumping);
        assert_eq!(t.classify(-6.0), Posture::Crouching);
    }

    #[test]
    fn test_codes() {
        for p in [Posture::Standing, Posture::Jumping, Posture::Crouching] {
            assert_eq!(Posture::from_code(p.code()), Some(p));
        }
        assert_eq!(Posture::from_code(9), None);
    }
}
