//! Integration system - turns accumulated forces into motion

use hecs::World;
use solgen_logic::geometry::Vec2;

use crate::components::{Body, Force};

/// Apply `a = F / m` to velocity, advance positions, then clear forces.
pub fn integration_system(world: &mut World, delta_seconds: f32) {
    for (_, (body, force)) in world.query_mut::<(&mut Body, Option<&mut Force>)>() {
        if let Some(force) = force {
            if body.mass > 0.0 {
                body.velocity += force.0 * (delta_seconds / body.mass);
            }
            force.0 = Vec2::ZERO;
        }
        body.position += body.velocity * delta_seconds;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_accelerates_by_mass() {
        let mut world = World::new();
        let light = world.spawn((Body::new(Vec2::ZERO, 1.0), Force(Vec2::new(2.0, 0.0))));
        let heavy = world.spawn((Body::new(Vec2::ZERO, 4.0), Force(Vec2::new(2.0, 0.0))));

        integration_system(&mut world, 0.5);

        let light_body = *world.get::<&Body>(light).unwrap();
        let heavy_body = *world.get::<&Body>(heavy).unwrap();
        assert_eq!(light_body.velocity, Vec2::new(1.0, 0.0));
        assert_eq!(heavy_body.velocity, Vec2::new(0.25, 0.0));
        assert_eq!(light_body.position, Vec2::new(0.5, 0.0));
        assert_eq!(world.get::<&Force>(light).unwrap().0, Vec2::ZERO);
    }

    #[test]
    fn bodies_without_force_drift() {
        let mut world = World::new();
        let e = world.spawn((Body::new(Vec2::new(1.0, 1.0), 1.0).with_velocity(Vec2::new(0.0, -2.0)),));

        integration_system(&mut world, 1.0);

        assert_eq!(world.get::<&Body>(e).unwrap().position, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn massless_body_ignores_force() {
        let mut world = World::new();
        let e = world.spawn((Body::new(Vec2::ZERO, 0.0), Force(Vec2::new(5.0, 5.0))));

        integration_system(&mut world, 1.0);

        let body = *world.get::<&Body>(e).unwrap();
        assert_eq!(body.velocity, Vec2::ZERO);
        assert_eq!(body.position, Vec2::ZERO);
    }
}
