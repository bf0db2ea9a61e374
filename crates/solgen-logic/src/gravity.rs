//! Gravity decision for a single body.
//!
//! Precedence per frame, exactly one source at most:
//! 1. inside the nearest planet's full height: that planet
//!    (or penetration recovery for ships below `min_ground_height`),
//! 2. else inside the nearest star's influence radius: the star,
//! 3. else nothing.
//!
//! Magnitude is `G / max(d, floor)²` where the floor is the planet's ground
//! height or the star's hot radius.

use crate::geometry::Vec2;
use crate::world::{Planet, Star};

/// Used when a body sits exactly on a source's center.
pub const FALLBACK_DIRECTION: Vec2 = Vec2 { x: 0.0, y: 1.0 };

/// Gravity parameters of a planet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetField {
    pub position: Vec2,
    pub ground_height: f32,
    pub min_ground_height: f32,
    pub full_height: f32,
    pub gravitation_constant: f32,
}

impl From<&Planet> for PlanetField {
    fn from(planet: &Planet) -> Self {
        Self {
            position: planet.position(),
            ground_height: planet.ground_height(),
            min_ground_height: planet.min_ground_height(),
            full_height: planet.full_height(),
            gravitation_constant: planet.gravitation_constant(),
        }
    }
}

/// Gravity parameters of a star.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarField {
    pub position: Vec2,
    pub influence_radius: f32,
    pub hot_radius: f32,
    pub gravitation_constant: f32,
}

impl From<&Star> for StarField {
    fn from(star: &Star) -> Self {
        Self {
            position: star.position,
            influence_radius: star.influence_radius,
            hot_radius: star.hot_radius,
            gravitation_constant: star.gravitation_constant,
        }
    }
}

/// How a body reacts to penetrating a planet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyClass {
    /// Debris, projectiles: gravity only.
    #[default]
    Free,
    /// Movable ship: pushed back to the surface on penetration.
    Ship,
    /// Immovable hull: never relocated.
    Station,
}

/// What gravity does to one body this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GravityOutcome {
    None,
    Planet {
        force: Vec2,
        distance: f32,
        /// A station was below the recovery threshold and got plain gravity.
        recovery_suppressed: bool,
    },
    Star {
        force: Vec2,
        /// Reported for heat damage, which is applied elsewhere
        distance: f32,
    },
    /// Move the body here and zero its velocity. No force this frame.
    Recover { position: Vec2 },
}

impl GravityOutcome {
    pub fn force(&self) -> Vec2 {
        match self {
            GravityOutcome::Planet { force, .. } | GravityOutcome::Star { force, .. } => *force,
            GravityOutcome::None | GravityOutcome::Recover { .. } => Vec2::ZERO,
        }
    }
}

/// Inverse-square magnitude with the distance clamped to `floor`.
pub fn gravity_force(gravitation_constant: f32, distance: f32, floor: f32) -> f32 {
    let d = distance.max(floor).max(f32::EPSILON);
    gravitation_constant / (d * d)
}

/// Unit vector from `from` toward `to`, or [`FALLBACK_DIRECTION`] when they coincide.
fn direction(from: Vec2, to: Vec2) -> Vec2 {
    let dir = (to - from).normalize();
    if dir.is_zero() {
        FALLBACK_DIRECTION
    } else {
        dir
    }
}

/// Point at `full_height` from `center`, on the ray through `body`.
pub fn surface_position(center: Vec2, body: Vec2, full_height: f32) -> Vec2 {
    center + direction(center, body) * full_height
}

/// Decide the single gravity effect on a body at `position`.
pub fn resolve_gravity(
    position: Vec2,
    class: BodyClass,
    planet: Option<&PlanetField>,
    star: Option<&StarField>,
) -> GravityOutcome {
    if let Some(planet) = planet {
        let distance = position.distance(&planet.position);
        if distance < planet.full_height {
            let below_threshold = distance < planet.min_ground_height;
            if below_threshold && class == BodyClass::Ship {
                return GravityOutcome::Recover {
                    position: surface_position(planet.position, position, planet.full_height),
                };
            }
            let magnitude = gravity_force(planet.gravitation_constant, distance, planet.ground_height);
            return GravityOutcome::Planet {
                force: direction(position, planet.position) * magnitude,
                distance,
                recovery_suppressed: below_threshold && class == BodyClass::Station,
            };
        }
    }

    if let Some(star) = star {
        let distance = position.distance(&star.position);
        if distance < star.influence_radius {
            let magnitude = gravity_force(star.gravitation_constant, distance, star.hot_radius);
            return GravityOutcome::Star {
                force: direction(position, star.position) * magnitude,
                distance,
            };
        }
    }

    GravityOutcome::None
}
