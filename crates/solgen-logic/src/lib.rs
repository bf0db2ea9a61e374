//! Pure generation logic for SolGen.
//!
//! Everything needed to turn a configuration and a seed into a galaxy of solar
//! systems, plus the per-body gravity decision. No ECS and no I/O: functions
//! take plain data and an explicit random source, so the same seed always
//! produces the same galaxy and every piece is unit-testable on its own.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Size classes, solar system/planet/maze/belt configs, tuning (serde) |
//! | [`error`] | `GenerationError` and generator stages |
//! | [`feature`] | Feature generators (planet, maze, belt, custom) and the custom registry |
//! | [`galaxy`] | Galaxy builder driving one system generator per slot |
//! | [`geometry`] | `Vec2` and disk overlap |
//! | [`gravity`] | Single-source gravity resolution and penetration recovery |
//! | [`orbital`] | Circular orbit around a system center |
//! | [`placement`] | Rejection-sampling placement solver |
//! | [`random`] | Seedable `GalaxyRng` threaded through generation |
//! | [`solar_system`] | Staged solar system generator and templates |
//! | [`world`] | Built world objects: systems, stars, planets, mazes, belts |

pub mod config;
pub mod error;
pub mod feature;
pub mod galaxy;
pub mod geometry;
pub mod gravity;
pub mod orbital;
pub mod placement;
pub mod random;
pub mod solar_system;
pub mod world;
