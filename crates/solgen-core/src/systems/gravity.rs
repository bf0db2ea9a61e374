//! Gravity system - applies the nearest planet or star to every body

use hecs::{Entity, World};
use solgen_logic::geometry::Vec2;
use solgen_logic::gravity::{resolve_gravity, BodyClass, GravityOutcome, PlanetField, StarField};

use crate::components::{Body, Force, ReceivesGravity, Ship};

/// Summary of one gravity pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GravityReport {
    /// Bodies pulled by the planet
    pub planet: u32,
    /// Bodies pulled by the star
    pub star: u32,
    /// Ships moved back to the planet surface
    pub recovered: u32,
    /// Stations below the recovery threshold that got plain gravity
    pub recovery_suppressed: u32,
    /// Bodies inside the star's influence and their distance to it, for heat damage
    pub star_exposures: Vec<(Entity, f32)>,
}

impl GravityReport {
    pub fn affected(&self) -> u32 {
        self.planet + self.star + self.recovered
    }
}

/// Apply at most one gravity source to each body that receives gravity.
pub fn gravity_system(
    world: &mut World,
    planet: Option<&PlanetField>,
    star: Option<&StarField>,
) -> GravityReport {
    let mut report = GravityReport::default();
    let mut updates: Vec<(Entity, GravityOutcome)> = Vec::with_capacity(64);

    // Collect outcomes (can't mutate while iterating)
    for (entity, (body, _, ship)) in world
        .query::<(&Body, &ReceivesGravity, Option<&Ship>)>()
        .iter()
    {
        let class = ship.map(Ship::body_class).unwrap_or(BodyClass::Free);
        let outcome = resolve_gravity(body.position, class, planet, star);
        if outcome != GravityOutcome::None {
            updates.push((entity, outcome));
        }
    }

    // Apply outcomes
    for (entity, outcome) in updates {
        match outcome {
            GravityOutcome::None => {}
            GravityOutcome::Planet {
                force,
                recovery_suppressed,
                ..
            } => {
                if recovery_suppressed {
                    log::debug!("Station {:?} below recovery threshold, not moved", entity);
                    report.recovery_suppressed += 1;
                }
                add_force(world, entity, force);
                report.planet += 1;
            }
            GravityOutcome::Star { force, distance } => {
                add_force(world, entity, force);
                report.star += 1;
                report.star_exposures.push((entity, distance));
            }
            GravityOutcome::Recover { position } => {
                if let Ok(mut body) = world.get::<&mut Body>(entity) {
                    log::debug!(
                        "Recovered {:?} from {} to planet surface at {}",
                        entity,
                        body.position,
                        position
                    );
                    body.position = position;
                    body.velocity = Vec2::ZERO;
                }
                if let Ok(mut accumulated) = world.get::<&mut Force>(entity) {
                    accumulated.0 = Vec2::ZERO;
                }
                report.recovered += 1;
            }
        }
    }

    report
}

fn add_force(world: &mut World, entity: Entity, force: Vec2) {
    let added = world
        .get::<&mut Force>(entity)
        .map(|mut accumulated| accumulated.0 += force)
        .is_ok();
    if !added {
        if let Err(e) = world.insert_one(entity, Force(force)) {
            log::warn!("Gravity target {:?} vanished before its force was applied: {}", entity, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::HullType;

    fn planet() -> PlanetField {
        PlanetField {
            position: Vec2::ZERO,
            ground_height: 50.0,
            min_ground_height: 55.0,
            full_height: 200.0,
            gravitation_constant: 1000.0,
        }
    }

    fn star() -> StarField {
        StarField {
            position: Vec2::new(1000.0, 0.0),
            influence_radius: 78.0,
            hot_radius: 58.5,
            gravitation_constant: 2000.0,
        }
    }

    fn ship(world: &mut World, position: Vec2, hull: HullType) -> Entity {
        world.spawn((
            Body::new(position, hull.mass()).with_velocity(Vec2::new(3.0, 4.0)),
            ReceivesGravity,
            Ship::new(hull),
            Force::default(),
        ))
    }

    #[test]
    fn sunk_ship_is_relocated_without_force() {
        let mut world = World::new();
        let e = ship(&mut world, Vec2::new(0.0, -40.0), HullType::Standard);

        let report = gravity_system(&mut world, Some(&planet()), Some(&star()));

        assert_eq!(report.recovered, 1);
        assert_eq!(report.planet, 0);
        let body = *world.get::<&Body>(e).unwrap();
        assert!((body.position.distance(&Vec2::ZERO) - 200.0).abs() < 1e-3);
        assert!(body.position.y < 0.0, "keeps its side of the planet");
        assert_eq!(body.velocity, Vec2::ZERO);
        assert_eq!(world.get::<&Force>(e).unwrap().0, Vec2::ZERO);
    }

    #[test]
    fn ship_in_atmosphere_gets_force() {
        let mut world = World::new();
        let e = ship(&mut world, Vec2::new(150.0, 0.0), HullType::Big);

        let report = gravity_system(&mut world, Some(&planet()), None);

        assert_eq!(report.planet, 1);
        let force = world.get::<&Force>(e).unwrap().0;
        assert!((force.length() - 1000.0 / (150.0 * 150.0)).abs() < 1e-6);
        assert!(force.x < 0.0);
        assert_eq!(world.get::<&Body>(e).unwrap().position, Vec2::new(150.0, 0.0));
    }

    #[test]
    fn station_is_counted_not_moved() {
        let mut world = World::new();
        let e = ship(&mut world, Vec2::new(30.0, 0.0), HullType::Station);

        let report = gravity_system(&mut world, Some(&planet()), None);

        assert_eq!(report.recovery_suppressed, 1);
        assert_eq!(report.recovered, 0);
        assert_eq!(world.get::<&Body>(e).unwrap().position, Vec2::new(30.0, 0.0));
    }

    #[test]
    fn bodies_without_marker_are_ignored() {
        let mut world = World::new();
        let e = world.spawn((Body::new(Vec2::new(100.0, 0.0), 1.0),));

        let report = gravity_system(&mut world, Some(&planet()), None);

        assert_eq!(report, GravityReport::default());
        assert!(world.get::<&Force>(e).is_err());
    }

    #[test]
    fn star_exposure_reported_and_force_inserted() {
        let mut world = World::new();
        let e = world.spawn((Body::new(Vec2::new(950.0, 0.0), 1.0), ReceivesGravity));

        let report = gravity_system(&mut world, Some(&planet()), Some(&star()));

        assert_eq!(report.star, 1);
        assert_eq!(report.star_exposures, vec![(e, 50.0)]);
        let force = world.get::<&Force>(e).unwrap().0;
        assert!((force.length() - 2000.0 / (58.5 * 58.5)).abs() < 1e-6);
    }

    #[test]
    fn one_source_per_body() {
        let mut world = World::new();
        for i in 0..50 {
            let x = i as f32 * 25.0;
            world.spawn((Body::new(Vec2::new(x, 0.0), 1.0), ReceivesGravity));
        }

        let report = gravity_system(&mut world, Some(&planet()), Some(&star()));

        // x in 0..=175 is inside the planet, x in 925..=1075 inside the star
        assert_eq!(report.planet, 8);
        assert_eq!(report.star, 7);
        assert_eq!(report.recovered, 0);
        assert_eq!(report.star_exposures.len(), 7);
        for (e, _) in &report.star_exposures {
            let x = world.get::<&Body>(*e).unwrap().position.x;
            assert!((925.0..=1075.0).contains(&x));
        }
    }

    #[test]
    fn force_on_despawned_entity_is_dropped() {
        let mut world = World::new();
        let e = world.spawn((Body::new(Vec2::ZERO, 1.0), ReceivesGravity));
        world.despawn(e).unwrap();

        add_force(&mut world, e, Vec2::new(1.0, 0.0));

        assert!(!world.contains(e));
        assert_eq!(world.len(), 0);
    }

    #[test]
    fn planet_shadows_overlapping_star() {
        let mut world = World::new();
        let e = world.spawn((Body::new(Vec2::new(120.0, 0.0), 1.0), ReceivesGravity));
        let near_star = StarField {
            position: Vec2::new(150.0, 0.0),
            ..star()
        };

        let report = gravity_system(&mut world, Some(&planet()), Some(&near_star));

        assert_eq!(report.planet, 1);
        assert_eq!(report.star, 0);
        assert!(report.star_exposures.iter().all(|(x, _)| *x != e));
        let force = world.get::<&Force>(e).unwrap().0;
        let expected = 1000.0 / (120.0 * 120.0);
        assert!((force.x + expected).abs() < 1e-6, "planet force only, got {}", force);
        assert_eq!(force.y, 0.0);
    }
}
