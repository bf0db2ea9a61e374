//! Placement solver: assigns non-overlapping orbital slots to features.
//!
//! Algorithm: randomized rejection sampling over orbital distance.
//! 1. Per request, derive the allowed distance band:
//!    - inner bound clears the star's hot radius and the minimum orbit,
//!    - outer bound keeps the whole disk (plus buffer) inside the system,
//!    - outer-edge requests (mazes) start at `edge_ratio × system_radius`.
//! 2. Sample a distance; accept it when the feature's orbital ring
//!    `[d − r − buffer, d + r + buffer]` misses every ring already taken.
//!    Ring separation implies disk separation at every orbital phase, so
//!    features that orbit at runtime never drift into each other.
//! 3. On acceptance, sample the angle and emit the slot.
//! 4. After `max_attempts` rejections the request fails on its own; other
//!    requests are unaffected.
//!
//! Requests are solved strictly in the caller's order, so a slot never
//! depends on requests that come after it. Callers that want the outer band
//! kept free for mazes list those first.

use crate::config::{GenerationTuning, StarConfig};
use crate::error::GenerationError;
use crate::feature::{PlacedFeature, PlacementPolicy, PlacementRequest};
use crate::geometry::Vec2;
use crate::orbital::Orbital;
use crate::random::GalaxyRng;
use crate::world::SystemId;

/// Occupied orbital ring, buffer included.
#[derive(Debug, Clone, Copy)]
struct Ring {
    inner: f32,
    outer: f32,
}

impl Ring {
    fn around(distance: f32, radius: f32, buffer: f32) -> Self {
        Self {
            inner: distance - radius - buffer,
            outer: distance + radius + buffer,
        }
    }

    /// Rings touching at a single edge count as clear.
    fn overlaps(&self, distance: f32, radius: f32) -> bool {
        distance + radius > self.inner && distance - radius < self.outer
    }
}

/// Solver for one solar system.
#[derive(Debug, Clone)]
pub struct PlacementSolver {
    pub system: SystemId,
    pub center: Vec2,
    pub buffer: f32,
    pub min_orbital_distance: f32,
    pub star_hot_radius: f32,
    pub edge_ratio: f32,
    pub max_attempts: u32,
}

impl PlacementSolver {
    pub fn new(system: SystemId, center: Vec2, tuning: &GenerationTuning, star: &StarConfig) -> Self {
        Self {
            system,
            center,
            buffer: tuning.orbital_feature_buffer,
            min_orbital_distance: tuning.min_orbital_distance,
            star_hot_radius: star.hot_radius,
            edge_ratio: tuning.maze_edge_ratio,
            max_attempts: tuning.max_placement_attempts,
        }
    }

    /// Allowed `[lo, hi]` orbital distance for a request. `lo > hi` means no slot exists.
    pub fn distance_bounds(&self, system_radius: f32, request: &PlacementRequest) -> (f32, f32) {
        let mut lo = self
            .min_orbital_distance
            .max(self.star_hot_radius + request.radius + self.buffer);
        if request.policy == PlacementPolicy::OuterEdge {
            lo = lo.max(self.edge_ratio * system_radius);
        }
        let hi = system_radius - self.buffer - request.radius;
        (lo, hi)
    }

    /// Place every request. One result per request, in request order.
    pub fn place(
        &self,
        system_radius: f32,
        requests: &[PlacementRequest],
        rng: &mut GalaxyRng,
    ) -> Vec<Result<PlacedFeature, GenerationError>> {
        let mut taken: Vec<Ring> = Vec::with_capacity(requests.len());
        let mut results = Vec::with_capacity(requests.len());

        for request in requests {
            let result = self.place_one(system_radius, request, &taken, rng);
            if let Ok(placed) = &result {
                taken.push(Ring::around(placed.orbital.distance(), placed.radius, self.buffer));
                log::debug!(
                    "Placed {} r={:.1} at d={:.1} in system {}",
                    request.kind,
                    request.radius,
                    placed.orbital.distance(),
                    self.system.0
                );
            }
            results.push(result);
        }

        results
    }

    fn place_one(
        &self,
        system_radius: f32,
        request: &PlacementRequest,
        taken: &[Ring],
        rng: &mut GalaxyRng,
    ) -> Result<PlacedFeature, GenerationError> {
        let exhausted = |attempts| GenerationError::PlacementExhausted {
            kind: request.kind,
            radius: request.radius,
            attempts,
        };

        let (lo, hi) = self.distance_bounds(system_radius, request);
        if request.radius <= 0.0 || lo > hi {
            return Err(exhausted(0));
        }

        for _ in 0..self.max_attempts {
            let distance = rng.range(lo, hi);
            if taken.iter().any(|ring| ring.overlaps(distance, request.radius)) {
                continue;
            }
            let orbital = Orbital::new(self.system, rng.angle(), distance);
            return Ok(PlacedFeature {
                position: orbital.position(self.center),
                center: self.center,
                radius: request.radius,
                orbital,
            });
        }

        Err(exhausted(self.max_attempts))
    }
}
