//! Concrete world objects produced by generation.
//!
//! These are what the rest of the game sees: read-only geometry plus the name
//! of the config each object was built from. Only planets (orbit and spin) and
//! mazes (activation latch) change after generation.

use serde::{Deserialize, Serialize};

use crate::config::{SolarSystemSize, StarConfig};
use crate::geometry::Vec2;
use crate::orbital::{wrap_angle, Orbital};

/// A viewpoint this close to a maze's rim activates it.
pub const MAZE_ACTIVATION_MARGIN: f32 = 20.0;

/// Index of a solar system in the galaxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SystemId(pub u32);

/// The sun at the center of every system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub position: Vec2,
    pub influence_radius: f32,
    pub hot_radius: f32,
    pub gravitation_constant: f32,
    pub color: String,
}

impl Star {
    pub fn new(position: Vec2, config: &StarConfig, color: impl Into<String>) -> Self {
        Self {
            position,
            influence_radius: config.influence_radius,
            hot_radius: config.hot_radius,
            gravitation_constant: config.gravitation_constant,
            color: color.into(),
        }
    }
}

/// Radius tiers of a planet. Always `ground <= min_ground <= full`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetHeights {
    ground: f32,
    min_ground: f32,
    full: f32,
}

impl PlanetHeights {
    /// Build heights, pulling `min_ground` into `[ground, full]` and `full`
    /// up to at least `ground`.
    pub fn new(ground: f32, min_ground: f32, full: f32) -> Self {
        let ground = ground.max(0.0);
        let full = full.max(ground);
        Self {
            ground,
            min_ground: min_ground.clamp(ground, full),
            full,
        }
    }

    pub fn ground(&self) -> f32 {
        self.ground
    }

    pub fn min_ground(&self) -> f32 {
        self.min_ground
    }

    pub fn full(&self) -> f32 {
        self.full
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Planet {
    position: Vec2,
    orbital: Option<Orbital>,
    heights: PlanetHeights,
    /// Surface rotation in radians
    angle: f32,
    /// Radians per second
    spin_rate: f32,
    gravitation_constant: f32,
    config_name: String,
}

impl Planet {
    /// Planet on an orbit around `center`.
    pub fn orbiting(
        orbital: Orbital,
        center: Vec2,
        heights: PlanetHeights,
        gravitation_constant: f32,
        config_name: impl Into<String>,
    ) -> Self {
        Self {
            position: orbital.position(center),
            orbital: Some(orbital),
            heights,
            angle: 0.0,
            spin_rate: 0.0,
            gravitation_constant,
            config_name: config_name.into(),
        }
    }

    /// Planet pinned at `position`, for hand-built scenes.
    pub fn stationary(position: Vec2, heights: PlanetHeights, gravitation_constant: f32) -> Self {
        Self {
            position,
            orbital: None,
            heights,
            angle: 0.0,
            spin_rate: 0.0,
            gravitation_constant,
            config_name: String::new(),
        }
    }

    pub fn with_spin(mut self, angle: f32, spin_rate: f32) -> Self {
        self.angle = wrap_angle(angle);
        self.spin_rate = spin_rate;
        self
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn orbital(&self) -> Option<&Orbital> {
        self.orbital.as_ref()
    }

    pub fn ground_height(&self) -> f32 {
        self.heights.ground()
    }

    pub fn min_ground_height(&self) -> f32 {
        self.heights.min_ground()
    }

    pub fn full_height(&self) -> f32 {
        self.heights.full()
    }

    pub fn heights(&self) -> PlanetHeights {
        self.heights
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn spin_rate(&self) -> f32 {
        self.spin_rate
    }

    pub fn gravitation_constant(&self) -> f32 {
        self.gravitation_constant
    }

    pub fn config_name(&self) -> &str {
        &self.config_name
    }

    /// Advance orbit and spin by `time_step` seconds.
    pub fn update(&mut self, time_step: f32, system_center: Vec2) {
        if let Some(orbital) = self.orbital.as_mut() {
            orbital.advance(time_step);
            self.position = orbital.position(system_center);
        }
        self.angle = wrap_angle(self.angle + self.spin_rate * time_step);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Maze {
    pub position: Vec2,
    pub radius: f32,
    pub angle: f32,
    pub config_name: String,
    pub bosses: Vec<String>,
    pub outer_enemy_frequency: f32,
    activated: bool,
}

impl Maze {
    pub fn new(position: Vec2, radius: f32, angle: f32, config_name: impl Into<String>) -> Self {
        Self {
            position,
            radius,
            angle: wrap_angle(angle),
            config_name: config_name.into(),
            bosses: Vec::new(),
            outer_enemy_frequency: 1.0,
            activated: false,
        }
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Latch activation once `viewpoint` comes near. Returns true on the
    /// frame the maze activates.
    pub fn update(&mut self, viewpoint: Vec2) -> bool {
        if self.activated {
            return false;
        }
        if viewpoint.distance(&self.position) < self.radius + MAZE_ACTIVATION_MARGIN {
            self.activated = true;
            log::info!("Maze '{}' at {} activated", self.config_name, self.position);
            return true;
        }
        false
    }
}

/// Asteroid belt occupying a disk on its orbit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Belt {
    pub position: Vec2,
    pub radius: f32,
    pub orbital: Orbital,
    /// Asteroids per 1000 square units
    pub density: f32,
    pub config_name: String,
}

impl Belt {
    pub fn asteroid_count(&self) -> u32 {
        let area = std::f32::consts::PI * self.radius * self.radius;
        (area / 1000.0 * self.density).round() as u32
    }
}

/// Feature built by a registered custom generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomFeature {
    pub kind: String,
    pub position: Vec2,
    pub radius: f32,
    pub orbital: Option<Orbital>,
}

/// Result of building one feature generator.
#[derive(Debug, Clone)]
pub enum Feature {
    Planet(Planet),
    Maze(Maze),
    Belt(Belt),
    Custom(CustomFeature),
}

impl Feature {
    pub fn position(&self) -> Vec2 {
        match self {
            Feature::Planet(p) => p.position(),
            Feature::Maze(m) => m.position,
            Feature::Belt(b) => b.position,
            Feature::Custom(c) => c.position,
        }
    }

    /// Radius the feature occupies in its system.
    pub fn radius(&self) -> f32 {
        match self {
            Feature::Planet(p) => p.full_height(),
            Feature::Maze(m) => m.radius,
            Feature::Belt(b) => b.radius,
            Feature::Custom(c) => c.radius,
        }
    }
}

/// A finished solar system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolarSystem {
    pub id: SystemId,
    pub name: String,
    pub config_name: String,
    pub size: SolarSystemSize,
    pub center: Vec2,
    pub radius: f32,
    pub star: Star,
    pub planets: Vec<Planet>,
    pub mazes: Vec<Maze>,
    pub belts: Vec<Belt>,
    pub customs: Vec<CustomFeature>,
}

impl SolarSystem {
    pub(crate) fn push(&mut self, feature: Feature) {
        match feature {
            Feature::Planet(p) => self.planets.push(p),
            Feature::Maze(m) => self.mazes.push(m),
            Feature::Belt(b) => self.belts.push(b),
            Feature::Custom(c) => self.customs.push(c),
        }
    }

    /// `(center, radius)` of every feature in the system.
    pub fn feature_disks(&self) -> Vec<(Vec2, f32)> {
        let planets = self.planets.iter().map(|p| (p.position(), p.full_height()));
        let mazes = self.mazes.iter().map(|m| (m.position, m.radius));
        let belts = self.belts.iter().map(|b| (b.position, b.radius));
        let customs = self.customs.iter().map(|c| (c.position, c.radius));
        planets.chain(mazes).chain(belts).chain(customs).collect()
    }

    pub fn feature_count(&self) -> usize {
        self.planets.len() + self.mazes.len() + self.belts.len() + self.customs.len()
    }
}
