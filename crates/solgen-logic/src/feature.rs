//! Feature generators: the placeable building blocks of a solar system.
//!
//! A generator is created unplaced with its radius already fixed, handed to
//! the placement solver as a [`PlacementRequest`], and finally consumed by
//! [`FeatureGenerator::build`] together with the immutable [`PlacedFeature`]
//! the solver produced.
//!
//! Planets, mazes and belts are built in. Anything else goes through
//! [`CustomFeatureGenerator`] and is looked up by name in a [`FeatureRegistry`].

use std::collections::BTreeMap;

use crate::config::{BeltConfig, GalaxyConfig, GenerationTuning, MazeConfig, PlanetConfig};
use crate::error::GenerationError;
use crate::geometry::Vec2;
use crate::orbital::Orbital;
use crate::random::GalaxyRng;
use crate::world::{Belt, CustomFeature, Feature, Maze, Planet, PlanetHeights};

/// Broad category of a feature, used in logs and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    Planet,
    Maze,
    Belt,
    Custom,
}

impl std::fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FeatureKind::Planet => "planet",
            FeatureKind::Maze => "maze",
            FeatureKind::Belt => "belt",
            FeatureKind::Custom => "custom feature",
        };
        f.write_str(name)
    }
}

/// Where in the system the solver may put a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementPolicy {
    /// Anywhere between the minimum orbit and the system edge.
    Orbit,
    /// Only in the outer band of the system, away from the star and inner planets.
    OuterEdge,
}

/// What the solver needs to know about a pending feature.
#[derive(Debug, Clone, Copy)]
pub struct PlacementRequest {
    pub kind: FeatureKind,
    pub radius: f32,
    pub policy: PlacementPolicy,
}

/// Slot assigned by the placement solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedFeature {
    pub position: Vec2,
    /// Center of the owning system at placement time
    pub center: Vec2,
    pub radius: f32,
    pub orbital: Orbital,
}

// ── Built-in generators ─────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PlanetGenerator {
    pub config_name: String,
    pub heights: PlanetHeights,
    pub gravitation_constant: f32,
    /// Arc speed along the orbit; signed for direction
    pub orbit_speed: f32,
    /// Arc speed of the surface; signed for direction
    pub spin_speed: f32,
}

impl PlanetGenerator {
    pub fn new(config_name: impl Into<String>, heights: PlanetHeights, gravitation_constant: f32) -> Self {
        Self {
            config_name: config_name.into(),
            heights,
            gravitation_constant,
            orbit_speed: 0.0,
            spin_speed: 0.0,
        }
    }

    /// Roll a planet from `config`.
    pub fn random(config: &PlanetConfig, tuning: &GenerationTuning, rng: &mut GalaxyRng) -> Self {
        let ground = rng.range(config.min_ground_height, config.max_ground_height);
        let full = ground + config.atmosphere_height;
        let heights = PlanetHeights::new(ground, ground + config.recovery_margin, full);
        let gravitation = rng.range(config.min_gravitation, config.max_gravitation);
        Self {
            config_name: config.name.clone(),
            heights,
            gravitation_constant: gravitation,
            orbit_speed: tuning.planet_orbit_speed * rng.sign(),
            spin_speed: tuning.planet_spin_speed * rng.sign(),
        }
    }

    pub fn radius(&self) -> f32 {
        self.heights.full()
    }

    fn build(self, placed: &PlacedFeature, rng: &mut GalaxyRng) -> Planet {
        let distance = placed.orbital.distance().max(1.0);
        let orbital = placed
            .orbital
            .with_angular_speed(self.orbit_speed / distance);
        let spin_rate = self.spin_speed / self.heights.ground().max(1.0);
        Planet::orbiting(
            orbital,
            placed.center,
            self.heights,
            self.gravitation_constant,
            self.config_name,
        )
        .with_spin(rng.angle(), spin_rate)
    }
}

#[derive(Debug, Clone)]
pub struct MazeGenerator {
    pub config_name: String,
    pub radius: f32,
    pub bosses: Vec<String>,
    pub outer_enemy_frequency: f32,
}

impl MazeGenerator {
    pub fn new(config_name: impl Into<String>, radius: f32) -> Self {
        Self {
            config_name: config_name.into(),
            radius,
            bosses: Vec::new(),
            outer_enemy_frequency: 1.0,
        }
    }

    pub fn random(config: &MazeConfig, rng: &mut GalaxyRng) -> Self {
        Self {
            config_name: config.name.clone(),
            radius: rng.range(config.min_radius, config.max_radius),
            bosses: config.bosses.clone(),
            outer_enemy_frequency: config.outer_enemy_frequency,
        }
    }

    fn build(self, placed: &PlacedFeature, rng: &mut GalaxyRng) -> Maze {
        let mut maze = Maze::new(placed.position, self.radius, rng.angle(), self.config_name);
        maze.bosses = self.bosses;
        maze.outer_enemy_frequency = self.outer_enemy_frequency;
        maze
    }
}

#[derive(Debug, Clone)]
pub struct BeltGenerator {
    pub config_name: String,
    pub radius: f32,
    pub density: f32,
}

impl BeltGenerator {
    pub fn random(config: &BeltConfig, rng: &mut GalaxyRng) -> Self {
        Self {
            config_name: config.name.clone(),
            radius: rng.range(config.min_radius, config.max_radius),
            density: rng.range(config.min_density, config.max_density),
        }
    }

    fn build(self, placed: &PlacedFeature) -> Belt {
        Belt {
            position: placed.position,
            radius: self.radius,
            orbital: placed.orbital,
            density: self.density,
            config_name: self.config_name,
        }
    }
}

// ── Custom generators ───────────────────────────────────────────────────

/// A feature type the core does not know about.
pub trait CustomFeatureGenerator: std::fmt::Debug {
    /// Name the generator is registered under.
    fn name(&self) -> &str;

    fn radius(&self) -> f32;

    fn policy(&self) -> PlacementPolicy {
        PlacementPolicy::Orbit
    }

    fn build(self: Box<Self>, placed: &PlacedFeature, rng: &mut GalaxyRng) -> Feature;
}

/// Creates a custom generator for a system. `allow_hard` is false for the
/// spawn system.
pub type CustomFactory = fn(
    config: &GalaxyConfig,
    allow_hard: bool,
    rng: &mut GalaxyRng,
) -> Result<Box<dyn CustomFeatureGenerator>, GenerationError>;

/// Table of custom feature generators, keyed by name.
#[derive(Clone, Default)]
pub struct FeatureRegistry {
    factories: BTreeMap<String, CustomFactory>,
}

impl std::fmt::Debug for FeatureRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.factories.keys()).finish()
    }
}

impl FeatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the stock custom features (`small_maze`, `wreck_field`).
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register("small_maze", small_maze_factory);
        registry.register("wreck_field", wreck_field_factory);
        registry
    }

    /// Add or replace a factory.
    pub fn register(&mut self, name: impl Into<String>, factory: CustomFactory) {
        self.factories.insert(name.into(), factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn create(
        &self,
        name: &str,
        config: &GalaxyConfig,
        allow_hard: bool,
        rng: &mut GalaxyRng,
    ) -> Result<Box<dyn CustomFeatureGenerator>, GenerationError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| GenerationError::UnknownCustomFeature(name.to_string()))?;
        factory(config, allow_hard, rng)
    }
}

/// Half-size maze with a busier rim.
#[derive(Debug, Clone)]
pub struct SmallMazeGenerator {
    inner: MazeGenerator,
}

impl SmallMazeGenerator {
    const SIZE_FACTOR: f32 = 0.5;
    const OUTER_ENEMY_BOOST: f32 = 1.21;

    pub fn from_maze(mut maze: MazeGenerator) -> Self {
        maze.radius *= Self::SIZE_FACTOR;
        maze.outer_enemy_frequency *= Self::OUTER_ENEMY_BOOST;
        Self { inner: maze }
    }
}

impl CustomFeatureGenerator for SmallMazeGenerator {
    fn name(&self) -> &str {
        "small_maze"
    }

    fn radius(&self) -> f32 {
        self.inner.radius
    }

    fn policy(&self) -> PlacementPolicy {
        PlacementPolicy::OuterEdge
    }

    fn build(self: Box<Self>, placed: &PlacedFeature, rng: &mut GalaxyRng) -> Feature {
        Feature::Maze(self.inner.build(placed, rng))
    }
}

fn small_maze_factory(
    config: &GalaxyConfig,
    allow_hard: bool,
    rng: &mut GalaxyRng,
) -> Result<Box<dyn CustomFeatureGenerator>, GenerationError> {
    let pool = config.maze_pool(allow_hard);
    let maze_config = rng
        .weighted(&pool, |m| m.weight)
        .ok_or_else(|| GenerationError::InvalidConfiguration("no maze config for small maze".into()))?;
    let maze = MazeGenerator::random(maze_config, rng);
    Ok(Box::new(SmallMazeGenerator::from_maze(maze)))
}

/// Field of drifting wrecks; static once placed.
#[derive(Debug, Clone)]
pub struct WreckFieldGenerator {
    pub radius: f32,
}

impl WreckFieldGenerator {
    const MIN_RADIUS: f32 = 10.0;
    const MAX_RADIUS: f32 = 20.0;
}

impl CustomFeatureGenerator for WreckFieldGenerator {
    fn name(&self) -> &str {
        "wreck_field"
    }

    fn radius(&self) -> f32 {
        self.radius
    }

    fn build(self: Box<Self>, placed: &PlacedFeature, _rng: &mut GalaxyRng) -> Feature {
        Feature::Custom(CustomFeature {
            kind: self.name().to_string(),
            position: placed.position,
            radius: self.radius,
            orbital: Some(placed.orbital),
        })
    }
}

fn wreck_field_factory(
    _config: &GalaxyConfig,
    _allow_hard: bool,
    rng: &mut GalaxyRng,
) -> Result<Box<dyn CustomFeatureGenerator>, GenerationError> {
    let radius = rng.range(WreckFieldGenerator::MIN_RADIUS, WreckFieldGenerator::MAX_RADIUS);
    Ok(Box::new(WreckFieldGenerator { radius }))
}

// ── The tagged generator ────────────────────────────────────────────────

/// Any pending feature of a solar system.
#[derive(Debug)]
pub enum FeatureGenerator {
    Planet(PlanetGenerator),
    Maze(MazeGenerator),
    Belt(BeltGenerator),
    Custom(Box<dyn CustomFeatureGenerator>),
}

impl FeatureGenerator {
    pub fn kind(&self) -> FeatureKind {
        match self {
            FeatureGenerator::Planet(_) => FeatureKind::Planet,
            FeatureGenerator::Maze(_) => FeatureKind::Maze,
            FeatureGenerator::Belt(_) => FeatureKind::Belt,
            FeatureGenerator::Custom(_) => FeatureKind::Custom,
        }
    }

    pub fn radius(&self) -> f32 {
        match self {
            FeatureGenerator::Planet(p) => p.radius(),
            FeatureGenerator::Maze(m) => m.radius,
            FeatureGenerator::Belt(b) => b.radius,
            FeatureGenerator::Custom(c) => c.radius(),
        }
    }

    pub fn policy(&self) -> PlacementPolicy {
        match self {
            FeatureGenerator::Maze(_) => PlacementPolicy::OuterEdge,
            FeatureGenerator::Custom(c) => c.policy(),
            _ => PlacementPolicy::Orbit,
        }
    }

    pub fn request(&self) -> PlacementRequest {
        PlacementRequest {
            kind: self.kind(),
            radius: self.radius(),
            policy: self.policy(),
        }
    }

    /// Turn the generator into its world object at the slot it was given.
    pub fn build(self, placed: &PlacedFeature, rng: &mut GalaxyRng) -> Feature {
        match self {
            FeatureGenerator::Planet(p) => Feature::Planet(p.build(placed, rng)),
            FeatureGenerator::Maze(m) => Feature::Maze(m.build(placed, rng)),
            FeatureGenerator::Belt(b) => Feature::Belt(b.build(placed)),
            FeatureGenerator::Custom(c) => c.build(placed, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::SystemId;

    fn slot(distance: f32, radius: f32) -> PlacedFeature {
        let orbital = Orbital::new(SystemId(0), 0.0, distance);
        PlacedFeature {
            position: orbital.position(Vec2::ZERO),
            center: Vec2::ZERO,
            radius,
            orbital,
        }
    }

    #[test]
    fn planet_radius_is_full_height() {
        let config = GalaxyConfig::default();
        let mut rng = GalaxyRng::seeded(9);
        let generator = PlanetGenerator::random(&config.planets[0], &config.tuning, &mut rng);
        let h = generator.heights;
        assert!(h.ground() >= config.planets[0].min_ground_height);
        assert!(h.ground() < h.min_ground() && h.min_ground() < h.full());
        assert_eq!(generator.radius(), h.full());
    }

    #[test]
    fn planet_build_uses_slot() {
        let mut rng = GalaxyRng::seeded(1);
        let mut generator = PlanetGenerator::new("rock", PlanetHeights::new(20.0, 22.0, 34.0), 900.0);
        generator.orbit_speed = 0.2;
        let feature = FeatureGenerator::Planet(generator).build(&slot(200.0, 34.0), &mut rng);
        let Feature::Planet(planet) = feature else {
            panic!("expected a planet");
        };
        assert_eq!(planet.position(), Vec2::new(200.0, 0.0));
        assert!((planet.orbital().unwrap().angular_speed - 0.001).abs() < 1e-6);
        assert_eq!(planet.config_name(), "rock");
    }

    #[test]
    fn maze_prefers_outer_edge() {
        let maze = FeatureGenerator::Maze(MazeGenerator::new("m", 30.0));
        assert_eq!(maze.policy(), PlacementPolicy::OuterEdge);
        assert_eq!(maze.kind(), FeatureKind::Maze);
        let planet = FeatureGenerator::Planet(PlanetGenerator::new("p", PlanetHeights::new(1.0, 1.0, 2.0), 1.0));
        assert_eq!(planet.policy(), PlacementPolicy::Orbit);
    }

    #[test]
    fn small_maze_is_halved_and_busier() {
        let mut maze = MazeGenerator::new("derelict_station", 40.0);
        maze.bosses = vec!["warden".into()];
        let small = SmallMazeGenerator::from_maze(maze);
        assert_eq!(small.radius(), 20.0);
        assert_eq!(small.policy(), PlacementPolicy::OuterEdge);

        let mut rng = GalaxyRng::seeded(2);
        let feature = Box::new(small).build(&slot(500.0, 20.0), &mut rng);
        let Feature::Maze(built) = feature else {
            panic!("small maze must build a maze");
        };
        assert!((built.outer_enemy_frequency - 1.21).abs() < 1e-6);
        assert_eq!(built.bosses, vec!["warden".to_string()]);
    }

    #[test]
    fn registry_creates_by_name() {
        let registry = FeatureRegistry::with_builtin();
        let config = GalaxyConfig::default();
        let mut rng = GalaxyRng::seeded(5);

        assert!(registry.contains("wreck_field"));
        let wrecks = registry.create("wreck_field", &config, false, &mut rng).unwrap();
        assert!(wrecks.radius() >= 10.0 && wrecks.radius() < 20.0);

        let err = registry.create("dyson_sphere", &config, false, &mut rng).unwrap_err();
        assert!(matches!(err, GenerationError::UnknownCustomFeature(_)));
    }

    #[test]
    fn belt_keeps_orbital() {
        let mut rng = GalaxyRng::seeded(4);
        let config = GalaxyConfig::default();
        let generator = BeltGenerator::random(&config.belts[0], &mut rng);
        let placed = slot(300.0, generator.radius);
        let Feature::Belt(belt) = FeatureGenerator::Belt(generator).build(&placed, &mut rng) else {
            panic!("expected a belt");
        };
        assert_eq!(belt.orbital.distance(), 300.0);
        assert_eq!(belt.position, placed.position);
    }
}
