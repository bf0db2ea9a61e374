//! Simulation engine - main entry point for running the simulation

use hecs::{Entity, World};
use solgen_logic::config::GalaxyConfig;
use solgen_logic::galaxy::GalaxyBuilder;
use solgen_logic::geometry::Vec2;

use crate::components::*;
use crate::error::EngineError;
use crate::registry::{FrameReport, PlanetManager};
use crate::systems::integration_system;

/// What to generate
#[derive(Debug, Clone)]
pub struct GalaxySettings {
    /// Fixed seed for reproducible galaxies; random when `None`
    pub seed: Option<u64>,
    pub number_of_systems: u32,
    pub config: GalaxyConfig,
}

impl Default for GalaxySettings {
    fn default() -> Self {
        Self {
            seed: None,
            number_of_systems: 8,
            config: GalaxyConfig::default(),
        }
    }
}

/// Main simulation engine
pub struct SimulationEngine {
    /// ECS world containing all physical bodies
    pub world: World,
    /// Registry of every generated system
    pub planets: PlanetManager,
    /// Simulation time in seconds since start
    pub sim_time: f64,
    /// Report of the most recent update
    pub last_report: FrameReport,

    seed: Option<u64>,
    viewpoint: Vec2,
    time_scale: f32,
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationEngine {
    /// Create a new empty simulation
    pub fn new() -> Self {
        Self {
            world: World::new(),
            planets: PlanetManager::new(),
            sim_time: 0.0,
            last_report: FrameReport::default(),
            seed: None,
            viewpoint: Vec2::ZERO,
            time_scale: 1.0,
        }
    }

    /// Generate and register a galaxy. Returns the seed used.
    pub fn generate(&mut self, settings: GalaxySettings) -> Result<u64, EngineError> {
        let seed = settings.seed.unwrap_or_else(rand::random);
        let systems = GalaxyBuilder::new(settings.config).build_seeded(settings.number_of_systems, seed)?;
        self.planets.register(systems)?;
        self.seed = Some(seed);
        Ok(seed)
    }

    /// Spawn a gravity-affected ship.
    pub fn spawn_ship(&mut self, position: Vec2, hull: HullType) -> Entity {
        self.world.spawn((
            Body::new(position, hull.mass()),
            ReceivesGravity,
            Ship::new(hull),
            Force::default(),
        ))
    }

    /// Spawn a gravity-affected body that is not a ship.
    pub fn spawn_body(&mut self, position: Vec2, velocity: Vec2, mass: f32) -> Entity {
        self.world.spawn((
            Body::new(position, mass).with_velocity(velocity),
            ReceivesGravity,
            Force::default(),
        ))
    }

    /// Update the simulation by delta_seconds
    pub fn update(&mut self, delta_seconds: f32) -> Result<&FrameReport, EngineError> {
        let scaled_delta = delta_seconds * self.time_scale;

        // Planets, mazes and gravity forces
        self.last_report = self.planets.update(scaled_delta, self.viewpoint, &mut self.world)?;

        // Forces into motion
        integration_system(&mut self.world, scaled_delta);

        self.sim_time += scaled_delta as f64;
        Ok(&self.last_report)
    }

    /// Seed of the generated galaxy
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Point the nearest-planet cache and maze activation follow (usually the camera)
    pub fn viewpoint(&self) -> Vec2 {
        self.viewpoint
    }

    pub fn set_viewpoint(&mut self, viewpoint: Vec2) {
        self.viewpoint = viewpoint;
    }

    /// Get time scale
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Set time scale (1.0 = real-time)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Get body count
    pub fn body_count(&self) -> usize {
        self.world.query::<&Body>().iter().count()
    }
}
