//! Integration tests for the full galaxy generation pipeline.
//!
//! Exercises: GalaxyConfig → GalaxyBuilder → SolarSystemGenerator
//! → PlacementSolver → FeatureGenerator::build → SolarSystem
//!
//! All tests are pure logic: no ECS, no rendering.

use solgen_logic::config::{GalaxyConfig, SolarSystemSize};
use solgen_logic::feature::FeatureRegistry;
use solgen_logic::galaxy::GalaxyBuilder;
use solgen_logic::geometry::{disks_overlap, Vec2};
use solgen_logic::random::GalaxyRng;
use solgen_logic::solar_system::{SolarSystemGenerator, SystemTemplate};
use solgen_logic::world::{SolarSystem, SystemId};

const CONFIG_JSON: &str = include_str!("../../../data/galaxy_config.json");

// ── Helpers ────────────────────────────────────────────────────────────

fn build(seed: u64, systems: u32) -> Vec<SolarSystem> {
    let config = GalaxyConfig::from_json_str(CONFIG_JSON).expect("bundled config parses");
    GalaxyBuilder::new(config)
        .build_seeded(systems, seed)
        .expect("galaxy builds")
}

/// Positions far from the origin lose f32 precision.
fn tolerance(system: &SolarSystem) -> f32 {
    1e-2 + system.center.length() * 1e-6
}

fn assert_system_geometry(system: &SolarSystem, buffer: f32) {
    let tol = tolerance(system);
    let disks = system.feature_disks();
    for (i, (a, ra)) in disks.iter().enumerate() {
        let d = a.distance(&system.center);
        assert!(
            d + ra + buffer <= system.radius + tol,
            "{}: feature at {} r={} escapes radius {}",
            system.name,
            d,
            ra,
            system.radius
        );
        for (b, rb) in &disks[i + 1..] {
            assert!(
                !disks_overlap(*a, *ra, *b, *rb, buffer),
                "{}: features at {} and {} overlap",
                system.name,
                a,
                b
            );
        }
    }
}

// ── Config ─────────────────────────────────────────────────────────────

#[test]
fn bundled_config_matches_default() {
    let parsed = GalaxyConfig::from_json_str(CONFIG_JSON).unwrap();
    let builtin = GalaxyConfig::default();
    assert_eq!(parsed.system_names, builtin.system_names);
    assert_eq!(parsed.sizes.len(), builtin.sizes.len());
    assert_eq!(parsed.systems.len(), builtin.systems.len());
    assert_eq!(parsed.planets.len(), builtin.planets.len());
    assert_eq!(parsed.mazes.len(), builtin.mazes.len());
    assert_eq!(parsed.belts.len(), builtin.belts.len());
    assert_eq!(parsed.star.influence_radius, builtin.star.influence_radius);
}

// ── Geometry invariants ────────────────────────────────────────────────

#[test]
fn features_never_overlap_and_stay_inside() {
    let buffer = GalaxyConfig::default().tuning.orbital_feature_buffer;
    for seed in [1, 7, 42, 99, 2024] {
        for system in build(seed, 8) {
            assert_system_geometry(&system, buffer);
        }
    }
}

#[test]
fn mazes_hug_the_outer_edge() {
    for seed in [3, 42, 500] {
        for system in build(seed, 8) {
            for maze in &system.mazes {
                let d = maze.position.distance(&system.center);
                assert!(
                    d >= 0.8 * system.radius - tolerance(&system),
                    "{}: maze at {} inside 0.8 x {}",
                    system.name,
                    d,
                    system.radius
                );
            }
        }
    }
}

#[test]
fn features_clear_the_star() {
    for system in build(17, 6) {
        for (position, radius) in system.feature_disks() {
            assert!(position.distance(&system.center) - radius >= system.star.hot_radius - tolerance(&system));
        }
    }
}

#[test]
fn every_system_has_a_planet() {
    for system in build(42, 10) {
        assert!(!system.planets.is_empty(), "{} has no planets", system.name);
        for planet in &system.planets {
            assert!(planet.ground_height() <= planet.min_ground_height());
            assert!(planet.min_ground_height() <= planet.full_height());
        }
    }
}

// ── Determinism ────────────────────────────────────────────────────────

#[test]
fn deterministic_output() {
    let a = build(42, 6);
    let b = build(42, 6);
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.name, y.name);
        assert_eq!(x.config_name, y.config_name);
        assert_eq!(x.size, y.size);
        assert_eq!(x.center, y.center);
        assert_eq!(x.radius.to_bits(), y.radius.to_bits());
        let (dx, dy) = (x.feature_disks(), y.feature_disks());
        assert_eq!(dx.len(), dy.len());
        for ((p, r), (q, s)) in dx.iter().zip(&dy) {
            assert_eq!(p.x.to_bits(), q.x.to_bits());
            assert_eq!(p.y.to_bits(), q.y.to_bits());
            assert_eq!(r.to_bits(), s.to_bits());
        }
    }
}

#[test]
fn different_seeds_produce_variation() {
    let a = build(1, 4);
    let b = build(2, 4);
    let differs = a
        .iter()
        .zip(&b)
        .any(|(x, y)| x.radius != y.radius || x.feature_count() != y.feature_count());
    assert!(differs);
}

// ── Spawn system ───────────────────────────────────────────────────────

#[test]
fn spawn_system_is_easy() {
    let config = GalaxyConfig::from_json_str(CONFIG_JSON).unwrap();
    for seed in 0..25 {
        let systems = GalaxyBuilder::new(config.clone()).build_seeded(1, seed).unwrap();
        let spawn = &systems[0];
        assert_eq!(spawn.center, Vec2::ZERO);
        let hard_systems: Vec<_> = config
            .systems
            .iter()
            .filter(|s| s.hard_only)
            .map(|s| s.name.as_str())
            .collect();
        assert!(!hard_systems.contains(&spawn.config_name.as_str()));
    }
}

// ── Templates and custom features ──────────────────────────────────────

#[test]
fn custom_template_with_builtin_features() {
    let config = GalaxyConfig::default();
    let builder = GalaxyBuilder::new(config.clone()).with_template(
        1,
        SystemTemplate::Custom {
            size: Some(SolarSystemSize::Large),
            density: 0.5,
            custom_features: vec!["small_maze".into(), "wreck_field".into()],
        },
    );
    let systems = builder.build_seeded(2, 77).unwrap();
    let custom = &systems[1];
    assert_eq!(custom.size, SolarSystemSize::Large);
    assert!(custom.feature_count() >= 2);
    assert_system_geometry(custom, config.tuning.orbital_feature_buffer);
}

#[test]
fn staged_generation_matches_generate() {
    let config = GalaxyConfig::default();
    let registry = FeatureRegistry::with_builtin();
    let center = Vec2::new(4000.0, 0.0);

    let mut rng = GalaxyRng::seeded(5);
    let mut staged =
        SolarSystemGenerator::new(&config, &registry, SystemTemplate::Default, SystemId(2), center);
    staged.select_config(&mut rng).unwrap();
    staged.initialize_default_generators(&mut rng).unwrap();
    staged.calculate_positions(&mut rng).unwrap();
    let staged = staged.build(&mut rng).unwrap();

    let mut rng = GalaxyRng::seeded(5);
    let direct = SolarSystemGenerator::new(&config, &registry, SystemTemplate::Default, SystemId(2), center)
        .generate(&mut rng)
        .unwrap();

    assert_eq!(staged.radius.to_bits(), direct.radius.to_bits());
    assert_eq!(staged.feature_count(), direct.feature_count());
}

// ── Scale ──────────────────────────────────────────────────────────────

#[test]
fn large_galaxy_stays_valid() {
    let systems = build(31337, 40);
    assert_eq!(systems.len(), 40);
    let buffer = GalaxyConfig::default().tuning.orbital_feature_buffer;
    for system in &systems {
        assert_system_geometry(system, buffer);
    }
    let names: std::collections::HashSet<_> = systems.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names.len(), systems.len());
}
