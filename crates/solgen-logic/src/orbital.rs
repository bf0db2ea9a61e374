//! Circular orbit model.
//!
//! An orbit does not own its parent: it names the owning solar system by
//! [`SystemId`] and the caller resolves the center when it needs a position.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;
use crate::world::SystemId;

/// Position on a circle of radius `distance` around `center`, at `angle` radians.
pub fn orbit_position(center: Vec2, angle: f32, distance: f32) -> Vec2 {
    center + Vec2::from_angle(angle) * distance
}

/// Wrap an angle into `[0, 2π)`.
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Circular-motion reference for a feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orbital {
    /// Owning system, resolved by lookup
    pub parent: SystemId,
    /// Current angle in radians, always in `[0, 2π)`
    angle: f32,
    /// Distance from the parent center, never negative
    distance: f32,
    /// Radians per second; the sign is the direction of travel
    pub angular_speed: f32,
}

impl Orbital {
    pub fn new(parent: SystemId, angle: f32, distance: f32) -> Self {
        Self {
            parent,
            angle: wrap_angle(angle),
            distance: distance.max(0.0),
            angular_speed: 0.0,
        }
    }

    pub fn with_angular_speed(mut self, angular_speed: f32) -> Self {
        self.angular_speed = angular_speed;
        self
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn position(&self, center: Vec2) -> Vec2 {
        orbit_position(center, self.angle, self.distance)
    }

    /// Move along the orbit for `time_step` seconds.
    pub fn advance(&mut self, time_step: f32) {
        self.angle = wrap_angle(self.angle + self.angular_speed * time_step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_on_circle() {
        let center = Vec2::new(100.0, -50.0);
        let orbital = Orbital::new(SystemId(0), std::f32::consts::PI, 20.0);
        let pos = orbital.position(center);
        assert!((pos.x - 80.0).abs() < 1e-4);
        assert!((pos.y + 50.0).abs() < 1e-4);
        assert!((pos.distance(&center) - 20.0).abs() < 1e-4);
    }

    #[test]
    fn angle_wraps_full_turn() {
        let orbital = Orbital::new(SystemId(0), TAU + 1.0, 10.0);
        assert!((orbital.angle() - 1.0).abs() < 1e-5);

        let negative = Orbital::new(SystemId(0), -1.0, 10.0);
        assert!((negative.angle() - (TAU - 1.0)).abs() < 1e-5);
    }

    #[test]
    fn negative_distance_clamps_to_zero() {
        let orbital = Orbital::new(SystemId(3), 0.5, -4.0);
        assert_eq!(orbital.distance(), 0.0);
        assert_eq!(orbital.position(Vec2::new(1.0, 1.0)), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn advance_keeps_distance_and_wraps() {
        let mut orbital = Orbital::new(SystemId(0), 6.0, 50.0).with_angular_speed(1.0);
        orbital.advance(1.0);
        assert!(orbital.angle() < TAU);
        assert!((orbital.angle() - (7.0 - TAU)).abs() < 1e-5);
        assert_eq!(orbital.distance(), 50.0);

        let mut reverse = Orbital::new(SystemId(0), 0.25, 50.0).with_angular_speed(-1.0);
        reverse.advance(0.5);
        assert!((reverse.angle() - (TAU - 0.25)).abs() < 1e-5);
    }
}
