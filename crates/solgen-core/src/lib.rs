//! SolGen Core - Galaxy Simulation Engine
//!
//! Generates a galaxy with `solgen-logic`, registers it in a
//! [`registry::PlanetManager`] and steps gravity for every physical body.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Ships, stations, debris
//! - **Components**: Pure data attached to entities (Body, Ship, Force, etc.)
//! - **Systems**: Gravity resolution and force integration
//!
//! Solar systems, planets and mazes are not entities; the planet manager owns
//! them and exposes nearest-entity queries.
//!
//! # Example
//!
//! ```rust,no_run
//! use solgen_core::prelude::*;
//! use solgen_logic::geometry::Vec2;
//!
//! let mut engine = SimulationEngine::new();
//!
//! // Generate a galaxy
//! engine.generate(GalaxySettings::default()).unwrap();
//! engine.spawn_ship(Vec2::new(0.0, 200.0), HullType::Standard);
//!
//! // Run simulation
//! loop {
//!     engine.update(1.0 / 60.0).unwrap(); // 60 FPS
//! }
//! ```

pub mod components;
pub mod engine;
pub mod error;
pub mod registry;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::{GalaxySettings, SimulationEngine};
    pub use crate::error::{EngineError, RegistryError};
    pub use crate::registry::{FeatureId, FrameReport, PlanetManager};
}
