//! Planet manager - the registry of every built solar system.
//!
//! Systems are registered once, after the whole galaxy has been generated.
//! Planets, mazes and belts stay owned by their system; the manager keeps
//! flat [`FeatureId`] handle lists for scanning and caches the planet nearest
//! to the viewpoint each frame.

use hecs::World;
use serde::{Deserialize, Serialize};
use solgen_logic::geometry::Vec2;
use solgen_logic::gravity::{PlanetField, StarField};
use solgen_logic::world::{Belt, Maze, Planet, SolarSystem, SystemId};

use crate::error::RegistryError;
use crate::systems::{gravity_system, GravityReport};

/// Handle to a feature inside a registered system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeatureId {
    pub system: SystemId,
    pub index: u32,
}

/// Result of one registry update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub gravity: GravityReport,
    /// Mazes that activated this frame
    pub activated_mazes: Vec<FeatureId>,
}

/// Owns every solar system of the galaxy.
#[derive(Debug, Default)]
pub struct PlanetManager {
    systems: Vec<SolarSystem>,
    planets: Vec<FeatureId>,
    mazes: Vec<FeatureId>,
    belts: Vec<FeatureId>,
    nearest_planet: Option<FeatureId>,
    registered: bool,
}

fn handles(system: SystemId, count: usize) -> impl Iterator<Item = FeatureId> {
    (0..count as u32).map(move |index| FeatureId { system, index })
}

/// Linear scan for the handle whose position is closest to `point`.
fn nearest(
    ids: &[FeatureId],
    point: Vec2,
    position: impl Fn(FeatureId) -> Option<Vec2>,
) -> Option<FeatureId> {
    ids.iter()
        .filter_map(|&id| position(id).map(|p| (id, p.distance_squared(&point))))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

impl PlanetManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a finished galaxy. Allowed once.
    ///
    /// Handles address systems by their position in `systems`, which the
    /// galaxy builder keeps equal to their [`SystemId`].
    pub fn register(&mut self, systems: Vec<SolarSystem>) -> Result<(), RegistryError> {
        if self.registered {
            return Err(RegistryError::AlreadyRegistered);
        }

        for (i, system) in systems.iter().enumerate() {
            let id = SystemId(i as u32);
            if system.id != id {
                log::warn!(
                    "System '{}' carries id {} but is registered at {}",
                    system.name,
                    system.id.0,
                    i
                );
            }
            self.planets.extend(handles(id, system.planets.len()));
            self.mazes.extend(handles(id, system.mazes.len()));
            self.belts.extend(handles(id, system.belts.len()));
        }
        self.systems = systems;
        self.registered = true;

        log::info!(
            "Registered {} systems: {} planets, {} mazes, {} belts",
            self.systems.len(),
            self.planets.len(),
            self.mazes.len(),
            self.belts.len()
        );
        Ok(())
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn systems(&self) -> &[SolarSystem] {
        &self.systems
    }

    pub fn system(&self, id: SystemId) -> Option<&SolarSystem> {
        self.systems.get(id.0 as usize)
    }

    pub fn planet(&self, id: FeatureId) -> Option<&Planet> {
        self.system(id.system)?.planets.get(id.index as usize)
    }

    pub fn maze(&self, id: FeatureId) -> Option<&Maze> {
        self.system(id.system)?.mazes.get(id.index as usize)
    }

    pub fn belt(&self, id: FeatureId) -> Option<&Belt> {
        self.system(id.system)?.belts.get(id.index as usize)
    }

    pub fn planets(&self) -> impl Iterator<Item = (FeatureId, &Planet)> + '_ {
        self.planets
            .iter()
            .filter_map(move |&id| self.planet(id).map(|p| (id, p)))
    }

    pub fn mazes(&self) -> impl Iterator<Item = (FeatureId, &Maze)> + '_ {
        self.mazes
            .iter()
            .filter_map(move |&id| self.maze(id).map(|m| (id, m)))
    }

    pub fn belts(&self) -> impl Iterator<Item = (FeatureId, &Belt)> + '_ {
        self.belts
            .iter()
            .filter_map(move |&id| self.belt(id).map(|b| (id, b)))
    }

    pub fn planet_count(&self) -> usize {
        self.planets.len()
    }

    pub fn maze_count(&self) -> usize {
        self.mazes.len()
    }

    pub fn belt_count(&self) -> usize {
        self.belts.len()
    }

    /// Nearest planet as of the last [`PlanetManager::update`].
    pub fn nearest_planet_cached(&self) -> Option<FeatureId> {
        self.nearest_planet
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn nearest_planet(&self, point: Vec2) -> Option<FeatureId> {
        nearest(&self.planets, point, |id| self.planet(id).map(Planet::position))
    }

    pub fn nearest_maze(&self, point: Vec2) -> Option<FeatureId> {
        nearest(&self.mazes, point, |id| self.maze(id).map(|m| m.position))
    }

    pub fn nearest_system(&self, point: Vec2) -> Option<SystemId> {
        self.systems
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.center
                    .distance_squared(&point)
                    .total_cmp(&b.center.distance_squared(&point))
            })
            .map(|(i, _)| SystemId(i as u32))
    }

    /// Whether something may be spawned at `point`: outside the nearest
    /// star's hot radius and, when `consider_planets` is set, outside every
    /// planet's full height.
    pub fn is_place_empty(&self, point: Vec2, consider_planets: bool) -> bool {
        if let Some(system) = self.nearest_system(point).and_then(|id| self.system(id)) {
            if point.distance(&system.star.position) < system.star.hot_radius {
                return false;
            }
        }
        if consider_planets {
            return self
                .planets()
                .all(|(_, p)| point.distance(&p.position()) >= p.full_height());
        }
        true
    }

    // ── Frame update ────────────────────────────────────────────────────

    /// Advance planets and mazes, refresh the nearest planet from
    /// `viewpoint`, then run gravity for the nearest system.
    pub fn update(
        &mut self,
        time_step: f32,
        viewpoint: Vec2,
        world: &mut World,
    ) -> Result<FrameReport, RegistryError> {
        if !self.registered {
            return Err(RegistryError::EmptyRegistryQuery);
        }

        let mut activated_mazes = Vec::new();
        for (i, system) in self.systems.iter_mut().enumerate() {
            let center = system.center;
            for planet in &mut system.planets {
                planet.update(time_step, center);
            }
            for (index, maze) in system.mazes.iter_mut().enumerate() {
                if maze.update(viewpoint) {
                    activated_mazes.push(FeatureId {
                        system: SystemId(i as u32),
                        index: index as u32,
                    });
                }
            }
        }

        self.nearest_planet = self.nearest_planet(viewpoint);
        let planet = self
            .nearest_planet
            .and_then(|id| self.planet(id))
            .map(PlanetField::from);
        let star = self
            .nearest_system(viewpoint)
            .and_then(|id| self.system(id))
            .map(|s| StarField::from(&s.star));

        let gravity = gravity_system(world, planet.as_ref(), star.as_ref());
        Ok(FrameReport {
            gravity,
            activated_mazes,
        })
    }
}
