//! SolGen Headless Simulation Harness
//!
//! Builds galaxies from the bundled config with fixed seeds, checks placement
//! and gravity invariants, and runs the engine for a few hundred frames.
//! No renderer, no window.
//!
//! Usage:
//!   cargo run -p solgen-simtest
//!   cargo run -p solgen-simtest -- --verbose

mod logger;

use hecs::World;
use solgen_core::components::{Body, Force, HullType, ReceivesGravity, Ship};
use solgen_core::engine::{GalaxySettings, SimulationEngine};
use solgen_core::systems::gravity_system;
use solgen_logic::config::{GalaxyConfig, StarConfig};
use solgen_logic::feature::{FeatureKind, PlacementPolicy, PlacementRequest};
use solgen_logic::galaxy::GalaxyBuilder;
use solgen_logic::geometry::{disks_overlap, Vec2};
use solgen_logic::gravity::{resolve_gravity, BodyClass, GravityOutcome, PlanetField, StarField};
use solgen_logic::placement::PlacementSolver;
use solgen_logic::random::GalaxyRng;
use solgen_logic::world::{SolarSystem, SystemId};

use logger::Logger;

// ── Galaxy config (same JSON the tests use) ─────────────────────────────
const CONFIG_JSON: &str = include_str!("../../../data/galaxy_config.json");

const SEEDS: [u64; 5] = [1, 7, 42, 1234, 98765];
const SYSTEMS_PER_GALAXY: u32 = 10;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    if let Err(e) = Logger::init(level) {
        eprintln!("logger already installed: {}", e);
    }
    println!("=== SolGen Simulation Harness ===\n");

    let config = match GalaxyConfig::from_json_str(CONFIG_JSON) {
        Ok(config) => config,
        Err(e) => {
            println!("  ✗ config_parse: {}", e);
            std::process::exit(1);
        }
    };

    let mut results = Vec::new();

    // 1. Config sanity
    results.extend(validate_config(&config, verbose));

    // 2. Placement invariants across seeds
    results.extend(validate_galaxies(&config, verbose));

    // 3. Determinism
    results.extend(validate_determinism(&config, verbose));

    // 4. Placement scenario
    results.extend(validate_placement_scenario(verbose));

    // 5. Gravity decisions
    results.extend(validate_gravity(verbose));

    // 6. Engine run
    results.extend(validate_engine(&config, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Config ───────────────────────────────────────────────────────────

fn validate_config(config: &GalaxyConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Config ---");
    let mut results = Vec::new();

    results.push(TestResult {
        name: "config_pools_not_empty".into(),
        passed: !config.sizes.is_empty() && !config.planets.is_empty() && !config.mazes.is_empty(),
        detail: format!(
            "{} sizes, {} systems, {} planets, {} mazes, {} belts",
            config.sizes.len(),
            config.systems.len(),
            config.planets.len(),
            config.mazes.len(),
            config.belts.len()
        ),
    });

    let spawn_pool = config.system_pool(false);
    results.push(TestResult {
        name: "config_spawn_pool".into(),
        passed: !spawn_pool.is_empty() && spawn_pool.iter().all(|s| !s.hard_only),
        detail: format!("{} configs usable for the spawn system", spawn_pool.len()),
    });

    let largest_maze = config.mazes.iter().map(|m| m.max_radius).fold(0.0, f32::max);
    let smallest_system = config.sizes.iter().map(|s| s.min_radius).fold(f32::MAX, f32::min);
    let edge_band = smallest_system * (1.0 - config.tuning.maze_edge_ratio);
    results.push(TestResult {
        name: "config_maze_fits_edge_band".into(),
        passed: largest_maze + config.tuning.orbital_feature_buffer < edge_band,
        detail: format!(
            "largest maze {:.0} vs outer band {:.0} of smallest system",
            largest_maze, edge_band
        ),
    });

    if verbose {
        for size in &config.sizes {
            println!(
                "  {}: {}-{} features, radius {:.0}-{:.0}",
                size.size, size.min_features, size.max_features, size.min_radius, size.max_radius
            );
        }
    }

    results
}

// ── 2. Galaxy invariants ────────────────────────────────────────────────

fn validate_galaxies(config: &GalaxyConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Galaxy Generation ---");
    let mut results = Vec::new();
    let builder = GalaxyBuilder::new(config.clone());
    let buffer = config.tuning.orbital_feature_buffer;

    for seed in SEEDS {
        let systems = match builder.build_seeded(SYSTEMS_PER_GALAXY, seed) {
            Ok(systems) => systems,
            Err(e) => {
                results.push(TestResult {
                    name: format!("galaxy_build_seed_{}", seed),
                    passed: false,
                    detail: e.to_string(),
                });
                continue;
            }
        };

        if verbose {
            for s in &systems {
                println!(
                    "  seed {} #{} {:<12} {:<7} r={:>4.0} planets={} mazes={} belts={} customs={}",
                    seed,
                    s.id.0,
                    s.name,
                    s.size.to_string(),
                    s.radius,
                    s.planets.len(),
                    s.mazes.len(),
                    s.belts.len(),
                    s.customs.len()
                );
            }
        }

        let overlaps: usize = systems.iter().map(|s| count_overlaps(s, buffer)).sum();
        results.push(TestResult {
            name: format!("no_overlap_seed_{}", seed),
            passed: overlaps == 0,
            detail: format!("{} overlapping feature pairs", overlaps),
        });

        let escaped: usize = systems.iter().map(|s| count_escaped(s, buffer)).sum();
        results.push(TestResult {
            name: format!("containment_seed_{}", seed),
            passed: escaped == 0,
            detail: format!("{} features outside their system", escaped),
        });

        let inner_mazes: Vec<String> = systems
            .iter()
            .flat_map(|s| {
                s.mazes
                    .iter()
                    .filter(|m| m.position.distance(&s.center) < 0.8 * s.radius - tolerance(s))
                    .map(move |m| format!("{} in {}", m.config_name, s.name))
            })
            .collect();
        results.push(TestResult {
            name: format!("maze_edge_bias_seed_{}", seed),
            passed: inner_mazes.is_empty(),
            detail: if inner_mazes.is_empty() {
                format!("{} mazes on the outer band", systems.iter().map(|s| s.mazes.len()).sum::<usize>())
            } else {
                format!("inner mazes: {:?}", inner_mazes)
            },
        });

        let without_planets = systems.iter().filter(|s| s.planets.is_empty()).count();
        results.push(TestResult {
            name: format!("planets_present_seed_{}", seed),
            passed: without_planets == 0,
            detail: format!("{} systems without planets", without_planets),
        });

        let spawn_ok = systems.first().map_or(false, |s| {
            s.center == Vec2::ZERO
                && config
                    .systems
                    .iter()
                    .any(|c| c.name == s.config_name && !c.hard_only)
        });
        results.push(TestResult {
            name: format!("spawn_system_seed_{}", seed),
            passed: spawn_ok,
            detail: "system 0 at origin with a non-hard config".into(),
        });
    }

    results
}

/// Positions far from the origin lose f32 precision.
fn tolerance(system: &SolarSystem) -> f32 {
    1e-2 + system.center.length() * 1e-6
}

fn count_overlaps(system: &SolarSystem, buffer: f32) -> usize {
    let disks = system.feature_disks();
    let mut count = 0;
    for (i, (a, ra)) in disks.iter().enumerate() {
        for (b, rb) in &disks[i + 1..] {
            if disks_overlap(*a, *ra, *b, *rb, buffer) {
                count += 1;
            }
        }
    }
    count
}

fn count_escaped(system: &SolarSystem, buffer: f32) -> usize {
    system
        .feature_disks()
        .iter()
        .filter(|(p, r)| p.distance(&system.center) + r + buffer > system.radius + tolerance(system))
        .count()
}

// ── 3. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(config: &GalaxyConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Determinism ---");
    let mut results = Vec::new();
    let builder = GalaxyBuilder::new(config.clone());

    let dump = |seed: u64| -> Result<String, String> {
        let systems = builder.build_seeded(SYSTEMS_PER_GALAXY, seed).map_err(|e| e.to_string())?;
        serde_json::to_string(&systems).map_err(|e| e.to_string())
    };

    match (dump(42), dump(42), dump(43)) {
        (Ok(a), Ok(b), Ok(c)) => {
            results.push(TestResult {
                name: "same_seed_same_galaxy".into(),
                passed: a == b,
                detail: format!("{} bytes of galaxy JSON", a.len()),
            });
            results.push(TestResult {
                name: "different_seed_different_galaxy".into(),
                passed: a != c,
                detail: "seeds 42 and 43 differ".into(),
            });
        }
        (a, _, c) => {
            let error = a.err().or(c.err()).unwrap_or_default();
            results.push(TestResult {
                name: "determinism_build".into(),
                passed: false,
                detail: error,
            });
        }
    }

    if verbose {
        if let Ok(systems) = builder.build_seeded(1, 42) {
            if let Ok(json) = serde_json::to_string_pretty(&systems) {
                println!("{}", json);
            }
        }
    }

    results
}

// ── 4. Placement scenario ───────────────────────────────────────────────

fn validate_placement_scenario(verbose: bool) -> Vec<TestResult> {
    println!("--- Placement Scenario ---");
    let mut results = Vec::new();
    let config = GalaxyConfig::default();
    let solver = PlacementSolver::new(SystemId(0), Vec2::ZERO, &config.tuning, &StarConfig::default());
    // Mazes lead, as in generated systems
    let requests = [
        PlacementRequest {
            kind: FeatureKind::Maze,
            radius: 50.0,
            policy: PlacementPolicy::OuterEdge,
        },
        PlacementRequest {
            kind: FeatureKind::Planet,
            radius: 100.0,
            policy: PlacementPolicy::Orbit,
        },
    ];
    let placed = solver.place(1000.0, &requests, &mut GalaxyRng::seeded(42));

    match (&placed[1], &placed[0]) {
        (Ok(planet), Ok(maze)) => {
            let planet_d = planet.position.length();
            let maze_d = maze.position.length();
            let gap = planet.position.distance(&maze.position);
            if verbose {
                println!(
                    "  planet at {} (d={:.1}), maze at {} (d={:.1}), gap {:.1}",
                    planet.position, planet_d, maze.position, maze_d, gap
                );
            }
            results.push(TestResult {
                name: "scenario_planet_band".into(),
                passed: planet_d >= config.tuning.min_orbital_distance && planet_d <= 900.0,
                detail: format!("planet at d={:.1}", planet_d),
            });
            results.push(TestResult {
                name: "scenario_maze_edge".into(),
                passed: maze_d >= 800.0,
                detail: format!("maze at d={:.1}", maze_d),
            });
            results.push(TestResult {
                name: "scenario_gap".into(),
                passed: gap >= 150.0,
                detail: format!("planet-maze gap {:.1}", gap),
            });
        }
        (a, b) => {
            results.push(TestResult {
                name: "scenario_placement".into(),
                passed: false,
                detail: format!("planet: {:?}, maze: {:?}", a.as_ref().err(), b.as_ref().err()),
            });
        }
    }

    results
}

// ── 5. Gravity ──────────────────────────────────────────────────────────

fn scenario_planet() -> PlanetField {
    PlanetField {
        position: Vec2::ZERO,
        ground_height: 50.0,
        min_ground_height: 55.0,
        full_height: 200.0,
        gravitation_constant: 1000.0,
    }
}

fn validate_gravity(verbose: bool) -> Vec<TestResult> {
    println!("--- Gravity ---");
    let mut results = Vec::new();
    let planet = scenario_planet();

    // Recovery: ship at distance 40 ends at distance 200, same direction
    let mut world = World::new();
    let sunk = world.spawn((
        Body::new(Vec2::new(40.0, 0.0), 1.0).with_velocity(Vec2::new(-5.0, 2.0)),
        ReceivesGravity,
        Ship::new(HullType::Standard),
        Force::default(),
    ));
    let report = gravity_system(&mut world, Some(&planet), None);
    let recovered = world
        .get::<&Body>(sunk)
        .map(|b| *b)
        .map_err(|e| e.to_string());
    let force = world.get::<&Force>(sunk).map(|f| f.0).unwrap_or_default();
    match recovered {
        Ok(body) => {
            let d = body.position.length();
            results.push(TestResult {
                name: "recovery_relocates".into(),
                passed: report.recovered == 1
                    && (d - 200.0).abs() < 1e-3
                    && body.position.x > 0.0
                    && body.velocity == Vec2::ZERO
                    && force == Vec2::ZERO,
                detail: format!("ship moved to {} (d={:.2}), velocity {}", body.position, d, body.velocity),
            });
        }
        Err(e) => results.push(TestResult {
            name: "recovery_relocates".into(),
            passed: false,
            detail: e,
        }),
    }

    // Atmosphere: ship at 150 gets 1000 / 150²
    let outcome = resolve_gravity(Vec2::new(0.0, 150.0), BodyClass::Ship, Some(&planet), None);
    let expected = 1000.0 / (150.0 * 150.0);
    let (passed, detail) = match outcome {
        GravityOutcome::Planet { force, .. } => (
            (force.length() - expected).abs() < 1e-6 && force.y < 0.0,
            format!("force {:.5} (expected {:.5})", force.length(), expected),
        ),
        other => (false, format!("unexpected outcome {:?}", other)),
    };
    results.push(TestResult {
        name: "atmosphere_force".into(),
        passed,
        detail,
    });

    // Monotonicity
    let mut last = 0.0;
    let mut monotonic = true;
    let mut d = 199.0;
    while d > planet.ground_height {
        let magnitude = resolve_gravity(Vec2::new(d, 0.0), BodyClass::Free, Some(&planet), None)
            .force()
            .length();
        if magnitude <= last {
            monotonic = false;
        }
        last = magnitude;
        d -= 7.0;
    }
    results.push(TestResult {
        name: "gravity_monotonic".into(),
        passed: monotonic,
        detail: format!("strictly increasing down to d>{}", planet.ground_height),
    });

    // Exclusivity over a grid covering planet, star and empty space
    let star = StarField {
        position: Vec2::new(260.0, 0.0),
        influence_radius: 78.0,
        hot_radius: 58.5,
        gravitation_constant: 2000.0,
    };
    let mut world = World::new();
    let mut bodies = 0;
    for x in (-250..=400).step_by(10) {
        for y in (-250..=250).step_by(10) {
            world.spawn((Body::new(Vec2::new(x as f32, y as f32), 1.0), ReceivesGravity));
            bodies += 1;
        }
    }
    let report = gravity_system(&mut world, Some(&planet), Some(&star));
    let star_inside_planet = report
        .star_exposures
        .iter()
        .filter_map(|(e, _)| world.get::<&Body>(*e).ok().map(|b| b.position))
        .any(|p| p.distance(&planet.position) < planet.full_height);
    if verbose {
        println!(
            "  grid of {}: planet {}, star {}, untouched {}",
            bodies,
            report.planet,
            report.star,
            bodies - report.affected()
        );
    }
    results.push(TestResult {
        name: "single_source_per_body".into(),
        passed: report.affected() <= bodies && report.star > 0 && report.planet > 0 && !star_inside_planet,
        detail: format!("{} planet, {} star of {} bodies", report.planet, report.star, bodies),
    });

    results
}

// ── 6. Engine ───────────────────────────────────────────────────────────

fn validate_engine(config: &GalaxyConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Engine ---");
    let mut results = Vec::new();
    let mut engine = SimulationEngine::new();

    let settings = GalaxySettings {
        seed: Some(42),
        number_of_systems: 4,
        config: config.clone(),
    };
    if let Err(e) = engine.generate(settings) {
        results.push(TestResult {
            name: "engine_generate".into(),
            passed: false,
            detail: e.to_string(),
        });
        return results;
    }

    let home = engine
        .planets
        .nearest_planet(Vec2::ZERO)
        .and_then(|id| engine.planets.planet(id))
        .map(|p| (p.position(), p.full_height()));
    let Some((home_position, home_height)) = home else {
        results.push(TestResult {
            name: "engine_home_planet".into(),
            passed: false,
            detail: "spawn system has no planet".into(),
        });
        return results;
    };

    engine.set_viewpoint(home_position);
    let ships: Vec<_> = (0..8)
        .map(|i| {
            let angle = i as f32 * std::f32::consts::TAU / 8.0;
            let offset = Vec2::from_angle(angle) * (home_height * (0.2 + 0.1 * i as f32));
            let hull = if i == 0 { HullType::Station } else { HullType::Standard };
            engine.spawn_ship(home_position + offset, hull)
        })
        .collect();

    let mut recovered = 0;
    let mut planet_pulls = 0;
    for _ in 0..300 {
        match engine.update(1.0 / 60.0) {
            Ok(report) => {
                recovered += report.gravity.recovered;
                planet_pulls += report.gravity.planet;
            }
            Err(e) => {
                results.push(TestResult {
                    name: "engine_update".into(),
                    passed: false,
                    detail: e.to_string(),
                });
                return results;
            }
        }
        if let Some(id) = engine.planets.nearest_planet(engine.viewpoint()) {
            if let Some(planet) = engine.planets.planet(id) {
                engine.set_viewpoint(planet.position());
            }
        }
    }

    let finite = ships.iter().all(|&e| {
        engine
            .world
            .get::<&Body>(e)
            .map(|b| b.position.x.is_finite() && b.position.y.is_finite())
            .unwrap_or(false)
    });

    if verbose {
        println!(
            "  {} frames, t={:.2}s, {} recoveries, {} planet pulls",
            300, engine.sim_time, recovered, planet_pulls
        );
    }

    results.push(TestResult {
        name: "engine_recovers_sunk_ships".into(),
        passed: recovered > 0,
        detail: format!("{} recoveries over 300 frames", recovered),
    });
    results.push(TestResult {
        name: "engine_positions_finite".into(),
        passed: finite,
        detail: format!("{} ships tracked", ships.len()),
    });
    results.push(TestResult {
        name: "engine_planet_gravity".into(),
        passed: planet_pulls > 0,
        detail: format!("{} planet pulls", planet_pulls),
    });

    results
}
