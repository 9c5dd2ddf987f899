//! Walker control derived from Virtualizer readings
//!
//! Converts orientation and speed into a direction vector plus speed, the
//! shape simulators expect for a walking character.

use serde::Serialize;

use crate::posture::Posture;
use crate::telemetry::Telemetry;

/// Control input for a walking character
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WalkerControl {
    /// Unit direction vector (x, y, z), z always 0
    pub direction: [f32; 3],
    /// Speed in m/s (after scaling)
    pub speed: f32,
    /// Whether the walker should jump
    pub jump: bool,
}

impl WalkerControl {
    /// Build a control from a telemetry snapshot
    ///
    /// The yaw is the player orientation; `speed_scale` multiplies the
    /// measured speed.
    pub fn from_telemetry(telemetry: &Telemetry, posture: Posture, speed_scale: f32) -> Self {
        let yaw = telemetry.orientation_degrees().to_radians();
        Self {
            direction: [yaw.cos(), yaw.sin(), 0.0],
            speed: telemetry.speed_mps * speed_scale,
            jump: posture == Posture::Jumping,
        }
    }

    /// Yaw of the direction vector in degrees, 0..360
    pub fn yaw_degrees(&self) -> f32 {
        self.direction[1]
            .atan2(self.direction[0])
            .to_degrees()
            .rem_euclid(360.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_facing_origin() {
        let t = Telemetry {
            speed_mps: 1.5,
            ..Default::default()
        };
        let c = WalkerControl::from_telemetry(&t, Posture::Standing, 1.0);
        assert!(approx(c.direction[0], 1.0));
        assert!(approx(c.direction[1], 0.0));
        assert_eq!(c.direction[2], 0.0);
        assert!(approx(c.speed, 1.5));
        assert!(!c.jump);
    }

    #[test]
    fn test_quarter_turn() {
        let t = Telemetry {
            orientation: 0.25,
            speed_mps: 2.0,
            ..Default::default()
        };
        let c = WalkerControl::from_telemetry(&t, Posture::Jumping, 0.5);
        assert!(approx(c.direction[0], 0.0));
        assert!(approx(c.direction[1], 1.0));
        assert!(approx(c.speed, 1.0));
        assert!(c.jump);
        assert!((c.yaw_degrees() - 90.0).abs() < 1e-2);
    }

    #[test]
    fn test_direction_is_unit_length() {
        for i in 0..16 {
            let t = Telemetry {
                orientation: i as f32 / 16.0,
                ..Default::default()
            };
            let c = WalkerControl::from_telemetry(&t, Posture::Standing, 1.0);
            let len = (c.direction[0].powi(2) + c.direction[1].powi(2)).sqrt();
            assert!(approx(len, 1.0));
        }
    }
}
