//! Physical body components: anything that moves and can feel gravity.

use serde::{Deserialize, Serialize};
use solgen_logic::geometry::Vec2;
use solgen_logic::gravity::BodyClass;

/// Position and motion of a physical body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f32,
}

impl Body {
    pub fn new(position: Vec2, mass: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            mass,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }
}

/// Marker: the body takes part in gravity simulation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReceivesGravity;

/// Hull classes. Stations are never relocated by penetration recovery.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum HullType {
    Standard,
    Big,
    Station,
}

impl HullType {
    /// Default mass for a freshly spawned hull.
    pub fn mass(&self) -> f32 {
        match self {
            HullType::Standard => 1.0,
            HullType::Big => 4.0,
            HullType::Station => 50.0,
        }
    }
}

/// A ship body
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ship {
    pub hull: HullType,
}

impl Ship {
    pub fn new(hull: HullType) -> Self {
        Self { hull }
    }

    pub fn body_class(&self) -> BodyClass {
        match self.hull {
            HullType::Station => BodyClass::Station,
            HullType::Standard | HullType::Big => BodyClass::Ship,
        }
    }
}

/// Force accumulated during the current frame. Cleared by integration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Force(pub Vec2);
