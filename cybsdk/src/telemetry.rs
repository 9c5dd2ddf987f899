//! Telemetry snapshot and unit conversions

use serde::Serialize;

/// One reading of all scalar telemetry values
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Telemetry {
    /// Height relative to the default height, cm
    pub height_cm: f32,
    /// Orientation, 0.0..1.0 of a full turn
    pub orientation: f32,
    /// Movement speed, m/s
    pub speed_mps: f32,
    /// Movement direction relative to orientation, -1.0..1.0 of a half turn
    pub direction: f32,
}

impl Telemetry {
    /// Orientation in degrees, 0..360
    pub fn orientation_degrees(&self) -> f32 {
        orientation_to_degrees(self.orientation)
    }

    /// Movement direction in degrees, -180..180
    pub fn direction_degrees(&self) -> f32 {
        direction_to_degrees(self.direction)
    }

    /// Absolute heading of the movement in degrees, 0..360
    pub fn heading_degrees(&self) -> f32 {
        (self.orientation_degrees() + self.direction_degrees()).rem_euclid(360.0)
    }

    /// Whether the player is moving at all
    pub fn is_moving(&self) -> bool {
        self.speed_mps > f32::EPSILON
    }
}

/// Convert a normalized orientation (0..1) to degrees
pub fn orientation_to_degrees(orientation: f32) -> f32 {
    orientation * 360.0
}

/// Convert a normalized direction (-1..1) to degrees
pub fn direction_to_degrees(direction: f32) -> f32 {
    direction * 180.0
}
