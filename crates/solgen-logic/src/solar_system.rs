//! Solar system generation as an explicit state machine.
//!
//! `Unconfigured → ConfigSelected → GeneratorsInitialized → PositionsCalculated → Built`
//!
//! The first four are [`GenerationStage`]s. Built is the [`SolarSystem`]
//! returned by `build`.
//!
//! Each stage method checks the current stage and returns
//! [`GenerationError::StageOutOfOrder`] when called early or twice.
//! [`SolarSystemGenerator::build`] consumes the generator, so a built system
//! can't gain features afterwards.

use crate::config::{GalaxyConfig, SizeClassConfig, SolarSystemConfig, SolarSystemSize};
use crate::error::{GenerationError, GenerationStage};
use crate::feature::{
    BeltGenerator, FeatureGenerator, FeatureRegistry, MazeGenerator, PlacedFeature, PlacementPolicy,
    PlanetGenerator,
};
use crate::geometry::Vec2;
use crate::placement::PlacementSolver;
use crate::random::GalaxyRng;
use crate::world::{SolarSystem, Star, SystemId};

/// Feature density used by [`SystemTemplate::Default`].
pub const DEFAULT_DENSITY: f32 = 0.8;

/// What kind of system to generate.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SystemTemplate {
    /// Weighted random size class, default density, no custom features.
    #[default]
    Default,
    /// Caller-chosen size (random when `None`), density and extra features
    /// looked up by name in the [`FeatureRegistry`].
    Custom {
        size: Option<SolarSystemSize>,
        density: f32,
        custom_features: Vec<String>,
    },
}

impl SystemTemplate {
    pub fn density(&self) -> f32 {
        match self {
            SystemTemplate::Default => DEFAULT_DENSITY,
            SystemTemplate::Custom { density, .. } => *density,
        }
    }

    pub fn size(&self) -> Option<SolarSystemSize> {
        match self {
            SystemTemplate::Default => None,
            SystemTemplate::Custom { size, .. } => *size,
        }
    }

    pub fn custom_features(&self) -> &[String] {
        match self {
            SystemTemplate::Default => &[],
            SystemTemplate::Custom {
                custom_features, ..
            } => custom_features,
        }
    }
}

/// Choices made in the `ConfigSelected` stage.
#[derive(Debug, Clone)]
struct Selection<'a> {
    size: &'a SizeClassConfig,
    system: &'a SolarSystemConfig,
    name: String,
    /// Upper bound handed to the placement solver
    radius: f32,
}

/// Generates one solar system.
#[derive(Debug)]
pub struct SolarSystemGenerator<'a> {
    config: &'a GalaxyConfig,
    registry: &'a FeatureRegistry,
    template: SystemTemplate,
    id: SystemId,
    center: Vec2,
    stage: GenerationStage,
    selection: Option<Selection<'a>>,
    generators: Vec<FeatureGenerator>,
    placements: Vec<Option<PlacedFeature>>,
    dropped: Vec<GenerationError>,
}

impl<'a> SolarSystemGenerator<'a> {
    pub fn new(
        config: &'a GalaxyConfig,
        registry: &'a FeatureRegistry,
        template: SystemTemplate,
        id: SystemId,
        center: Vec2,
    ) -> Self {
        Self {
            config,
            registry,
            template,
            id,
            center,
            stage: GenerationStage::Unconfigured,
            selection: None,
            generators: Vec::new(),
            placements: Vec::new(),
            dropped: Vec::new(),
        }
    }

    pub fn id(&self) -> SystemId {
        self.id
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn stage(&self) -> GenerationStage {
        self.stage
    }

    pub fn template(&self) -> &SystemTemplate {
        &self.template
    }

    /// Selected size class, once configured.
    pub fn size(&self) -> Option<SolarSystemSize> {
        self.selection.as_ref().map(|s| s.size.size)
    }

    /// Name of the selected solar system config, once configured.
    pub fn config_name(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.system.name.as_str())
    }

    /// Placement bound, once configured.
    pub fn radius(&self) -> Option<f32> {
        self.selection.as_ref().map(|s| s.radius)
    }

    pub fn generators(&self) -> &[FeatureGenerator] {
        &self.generators
    }

    /// One entry per generator after `calculate_positions`; `None` for dropped ones.
    pub fn placements(&self) -> &[Option<PlacedFeature>] {
        &self.placements
    }

    /// Placement failures swallowed so far.
    pub fn dropped(&self) -> &[GenerationError] {
        &self.dropped
    }

    /// The spawn system never draws hard-only configs.
    fn allow_hard(&self) -> bool {
        self.id.0 != 0
    }

    fn expect_stage(&self, expected: GenerationStage) -> Result<(), GenerationError> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(GenerationError::StageOutOfOrder {
                expected,
                found: self.stage,
            })
        }
    }

    // ── Stages ──────────────────────────────────────────────────────────

    /// Pick a size class, a solar system config, a name and a radius.
    pub fn select_config(&mut self, rng: &mut GalaxyRng) -> Result<(), GenerationError> {
        self.expect_stage(GenerationStage::Unconfigured)?;
        let config = self.config;

        let size = match self.template.size() {
            Some(size) => config.size_class(size)?,
            None => rng
                .weighted(&config.sizes, |s| s.weight)
                .ok_or_else(|| GenerationError::InvalidConfiguration("no size classes".into()))?,
        };

        let pool = config.system_pool(self.allow_hard());
        let system = rng
            .weighted(&pool, |c| c.weight)
            .copied()
            .ok_or_else(|| {
                GenerationError::InvalidConfiguration(format!(
                    "no solar system config usable for system {}",
                    self.id.0
                ))
            })?;

        let radius = rng.range(size.min_radius, size.max_radius);

        self.selection = Some(Selection {
            size,
            system,
            name: system_name(config, self.id),
            radius,
        });
        self.stage = GenerationStage::ConfigSelected;
        Ok(())
    }

    /// Roll the default planets, belts and mazes plus the template's custom features.
    pub fn initialize_default_generators(&mut self, rng: &mut GalaxyRng) -> Result<(), GenerationError> {
        self.expect_stage(GenerationStage::ConfigSelected)?;
        let config = self.config;
        let tuning = &config.tuning;
        let allow_hard = self.allow_hard();
        let Some(selection) = self.selection.as_ref() else {
            return Err(GenerationError::StageOutOfOrder {
                expected: GenerationStage::ConfigSelected,
                found: self.stage,
            });
        };

        let rolled = rng.count(selection.size.min_features, selection.size.max_features);
        let total = ((rolled as f32 * self.template.density()).round() as u32).max(1);

        // At least one planet always remains.
        let mazes = tuning.mazes_per_system.min(total - 1);
        let belt_pool = config.belt_pool(allow_hard);
        let mut belts = 0;
        if !belt_pool.is_empty() {
            for _ in 0..tuning.max_belts {
                if mazes + belts + 1 < total && rng.chance(tuning.belt_chance) {
                    belts += 1;
                }
            }
        }
        let planets = total - mazes - belts;

        let planet_pool = config.planet_pool(selection.system, allow_hard);
        let maze_pool = config.maze_pool(allow_hard);
        if planet_pool.is_empty() {
            return Err(GenerationError::InvalidConfiguration(format!(
                "no planet config fits '{}'",
                selection.system.name
            )));
        }
        if mazes > 0 && maze_pool.is_empty() {
            return Err(GenerationError::InvalidConfiguration(
                "no maze configs available".into(),
            ));
        }

        let mut generators = Vec::with_capacity(total as usize);
        for _ in 0..planets {
            if let Some(planet) = rng.weighted(&planet_pool, |p| p.weight) {
                generators.push(FeatureGenerator::Planet(PlanetGenerator::random(
                    planet, tuning, rng,
                )));
            }
        }
        for _ in 0..belts {
            if let Some(belt) = rng.weighted(&belt_pool, |b| b.weight) {
                generators.push(FeatureGenerator::Belt(BeltGenerator::random(belt, rng)));
            }
        }
        for _ in 0..mazes {
            if let Some(maze) = rng.weighted(&maze_pool, |m| m.weight) {
                generators.push(FeatureGenerator::Maze(MazeGenerator::random(maze, rng)));
            }
        }
        for name in self.template.custom_features() {
            let custom = self.registry.create(name, config, allow_hard, rng)?;
            generators.push(FeatureGenerator::Custom(custom));
        }
        // Edge-band features go first so the placement solver sees the
        // outer band empty when it reaches them.
        generators.sort_by_key(|g| g.policy() != PlacementPolicy::OuterEdge);

        log::debug!(
            "System {}: {} planets, {} belts, {} mazes, {} custom",
            self.id.0,
            planets,
            belts,
            mazes,
            self.template.custom_features().len()
        );

        self.generators = generators;
        self.stage = GenerationStage::GeneratorsInitialized;
        Ok(())
    }

    /// Queue an extra generator. Only valid right after initialization.
    pub fn add_generator(&mut self, generator: FeatureGenerator) -> Result<(), GenerationError> {
        self.expect_stage(GenerationStage::GeneratorsInitialized)?;
        self.generators.push(generator);
        Ok(())
    }

    /// Run the placement solver over every generator. Features without a slot
    /// are dropped with a warning.
    pub fn calculate_positions(&mut self, rng: &mut GalaxyRng) -> Result<(), GenerationError> {
        self.expect_stage(GenerationStage::GeneratorsInitialized)?;
        let radius = self.radius().unwrap_or_default();

        let solver = PlacementSolver::new(self.id, self.center, &self.config.tuning, &self.config.star);
        let requests: Vec<_> = self.generators.iter().map(FeatureGenerator::request).collect();

        let mut placements = Vec::with_capacity(requests.len());
        for result in solver.place(radius, &requests, rng) {
            match result {
                Ok(placed) => placements.push(Some(placed)),
                Err(e) if e.is_recoverable() => {
                    log::warn!("System {}: dropping feature: {}", self.id.0, e);
                    self.dropped.push(e);
                    placements.push(None);
                }
                Err(e) => return Err(e),
            }
        }

        self.placements = placements;
        self.stage = GenerationStage::PositionsCalculated;
        Ok(())
    }

    /// Build every placed feature and assemble the system.
    pub fn build(self, rng: &mut GalaxyRng) -> Result<SolarSystem, GenerationError> {
        self.expect_stage(GenerationStage::PositionsCalculated)?;
        let Some(selection) = self.selection else {
            return Err(GenerationError::StageOutOfOrder {
                expected: GenerationStage::ConfigSelected,
                found: GenerationStage::Unconfigured,
            });
        };

        let buffer = self.config.tuning.orbital_feature_buffer;
        let star = Star::new(self.center, &self.config.star, selection.system.star_color.clone());
        let radius = self
            .placements
            .iter()
            .flatten()
            .map(|p| p.orbital.distance() + p.radius + buffer)
            .fold(star.influence_radius + buffer, f32::max);

        let mut system = SolarSystem {
            id: self.id,
            name: selection.name,
            config_name: selection.system.name.clone(),
            size: selection.size.size,
            center: self.center,
            radius,
            star,
            planets: Vec::new(),
            mazes: Vec::new(),
            belts: Vec::new(),
            customs: Vec::new(),
        };

        for (generator, placed) in self.generators.into_iter().zip(self.placements) {
            if let Some(placed) = placed {
                system.push(generator.build(&placed, rng));
            }
        }

        log::info!(
            "Built system {} '{}' ({}, {}): {} planets, {} mazes, {} belts, radius {:.0}",
            system.id.0,
            system.name,
            system.size,
            system.config_name,
            system.planets.len(),
            system.mazes.len(),
            system.belts.len(),
            system.radius
        );
        Ok(system)
    }

    /// Run all stages in order.
    pub fn generate(mut self, rng: &mut GalaxyRng) -> Result<SolarSystem, GenerationError> {
        self.select_config(rng)?;
        self.initialize_default_generators(rng)?;
        self.calculate_positions(rng)?;
        self.build(rng)
    }
}

/// Names cycle through the configured list, numbered after the first lap.
fn system_name(config: &GalaxyConfig, id: SystemId) -> String {
    let count = config.system_names.len().max(1);
    let index = id.0 as usize;
    let base = config
        .system_names
        .get(index % count)
        .cloned()
        .unwrap_or_else(|| format!("System {}", index));
    match index / count {
        0 => base,
        lap => format!("{} {}", base, lap + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::FeatureKind;
    use crate::geometry::disks_overlap;

    fn generator<'a>(
        config: &'a GalaxyConfig,
        registry: &'a FeatureRegistry,
        id: u32,
    ) -> SolarSystemGenerator<'a> {
        SolarSystemGenerator::new(config, registry, SystemTemplate::Default, SystemId(id), Vec2::ZERO)
    }

    #[test]
    fn stages_must_run_in_order() {
        let config = GalaxyConfig::default();
        let registry = FeatureRegistry::new();
        let template = SystemTemplate::Custom {
            size: Some(SolarSystemSize::Large),
            density: 0.3,
            custom_features: Vec::new(),
        };
        let mut rng = GalaxyRng::seeded(1);
        let mut gen = SolarSystemGenerator::new(&config, &registry, template, SystemId(1), Vec2::ZERO);

        let err = gen.calculate_positions(&mut rng).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::StageOutOfOrder {
                expected: GenerationStage::GeneratorsInitialized,
                found: GenerationStage::Unconfigured,
            }
        ));

        let extra = || {
            FeatureGenerator::Belt(BeltGenerator {
                config_name: "extra".into(),
                radius: 10.0,
                density: 1.0,
            })
        };

        gen.select_config(&mut rng).unwrap();
        assert!(gen.select_config(&mut rng).is_err());
        assert!(gen.add_generator(extra()).is_err());

        gen.initialize_default_generators(&mut rng).unwrap();
        gen.add_generator(extra()).unwrap();
        gen.calculate_positions(&mut rng).unwrap();
        assert_eq!(gen.stage(), GenerationStage::PositionsCalculated);
        assert_eq!(gen.placements().len(), gen.generators().len());
        assert!(gen.add_generator(extra()).is_err());

        let system = gen.build(&mut rng).unwrap();
        assert!(system.belts.iter().any(|b| b.config_name == "extra"));
    }

    #[test]
    fn build_before_positions_fails() {
        let config = GalaxyConfig::default();
        let registry = FeatureRegistry::new();
        let mut rng = GalaxyRng::seeded(2);
        let mut gen = generator(&config, &registry, 1);
        gen.select_config(&mut rng).unwrap();
        assert!(matches!(
            gen.build(&mut rng),
            Err(GenerationError::StageOutOfOrder { .. })
        ));
    }

    #[test]
    fn default_mix_has_planet_and_maze() {
        let config = GalaxyConfig::default();
        let registry = FeatureRegistry::new();
        for seed in 0..20 {
            let mut rng = GalaxyRng::seeded(seed);
            let mut gen = generator(&config, &registry, 3);
            gen.select_config(&mut rng).unwrap();
            gen.initialize_default_generators(&mut rng).unwrap();
            let kinds: Vec<_> = gen.generators().iter().map(FeatureGenerator::kind).collect();
            assert!(kinds.contains(&FeatureKind::Planet), "seed {seed}");
            assert_eq!(kinds.iter().filter(|k| **k == FeatureKind::Maze).count(), 1);
            assert_eq!(kinds[0], FeatureKind::Maze, "maze must be placed first");
        }
    }

    #[test]
    fn edge_customs_precede_orbiting_features() {
        let config = GalaxyConfig::default();
        let registry = FeatureRegistry::with_builtin();
        let template = SystemTemplate::Custom {
            size: Some(SolarSystemSize::Large),
            density: 1.0,
            custom_features: vec!["wreck_field".into(), "small_maze".into()],
        };
        let mut rng = GalaxyRng::seeded(13);
        let mut gen = SolarSystemGenerator::new(&config, &registry, template, SystemId(2), Vec2::ZERO);
        gen.select_config(&mut rng).unwrap();
        gen.initialize_default_generators(&mut rng).unwrap();

        let policies: Vec<_> = gen.generators().iter().map(FeatureGenerator::policy).collect();
        let edge = policies.iter().take_while(|p| **p == PlacementPolicy::OuterEdge).count();
        assert_eq!(edge, 2, "maze and small maze lead: {policies:?}");
        assert!(policies[edge..].iter().all(|p| *p == PlacementPolicy::Orbit));
    }

    #[test]
    fn spawn_system_avoids_hard_configs() {
        let config = GalaxyConfig::default();
        let registry = FeatureRegistry::new();
        for seed in 0..30 {
            let mut rng = GalaxyRng::seeded(seed);
            let system = generator(&config, &registry, 0).generate(&mut rng).unwrap();
            assert_ne!(system.config_name, "red_giant");
            assert!(system.planets.iter().all(|p| p.config_name() != "volcanic"));
            assert!(system.mazes.iter().all(|m| m.config_name != "pirate_fortress"));
            assert!(system.belts.iter().all(|b| b.config_name != "crystal"));
        }
    }

    #[test]
    fn built_system_respects_geometry() {
        let config = GalaxyConfig::default();
        let registry = FeatureRegistry::with_builtin();
        let template = SystemTemplate::Custom {
            size: Some(SolarSystemSize::Large),
            density: 1.0,
            custom_features: vec!["wreck_field".into()],
        };
        let center = Vec2::new(2000.0, -500.0);
        let mut rng = GalaxyRng::seeded(11);
        let system = SolarSystemGenerator::new(&config, &registry, template, SystemId(4), center)
            .generate(&mut rng)
            .unwrap();

        assert_eq!(system.size, SolarSystemSize::Large);
        let buffer = config.tuning.orbital_feature_buffer;
        let disks = system.feature_disks();
        for (i, (a, ra)) in disks.iter().enumerate() {
            assert!(a.distance(&center) + ra + buffer <= system.radius + 1e-2);
            for (b, rb) in &disks[i + 1..] {
                assert!(!disks_overlap(*a, *ra, *b, *rb, buffer));
            }
        }
        for maze in &system.mazes {
            assert!(maze.position.distance(&center) >= 0.8 * system.radius - 1e-2);
        }
    }

    #[test]
    fn unknown_custom_feature_fails_system() {
        let config = GalaxyConfig::default();
        let registry = FeatureRegistry::with_builtin();
        let template = SystemTemplate::Custom {
            size: None,
            density: DEFAULT_DENSITY,
            custom_features: vec!["ringworld".into()],
        };
        let mut rng = GalaxyRng::seeded(5);
        let result = SolarSystemGenerator::new(&config, &registry, template, SystemId(1), Vec2::ZERO)
            .generate(&mut rng);
        assert!(matches!(result, Err(GenerationError::UnknownCustomFeature(name)) if name == "ringworld"));
    }

    #[test]
    fn empty_planet_pool_is_invalid() {
        let mut config = GalaxyConfig::default();
        for system in &mut config.systems {
            system.planet_palette = vec!["gas_giant".into()];
        }
        let registry = FeatureRegistry::new();
        let mut rng = GalaxyRng::seeded(8);
        let err = generator(&config, &registry, 1).generate(&mut rng).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidConfiguration(_)));
    }

    #[test]
    fn radius_never_below_star() {
        let config = GalaxyConfig::default();
        let registry = FeatureRegistry::new();
        let mut rng = GalaxyRng::seeded(21);
        let mut gen = generator(&config, &registry, 2);
        gen.select_config(&mut rng).unwrap();
        gen.initialize_default_generators(&mut rng).unwrap();
        gen.calculate_positions(&mut rng).unwrap();
        let system = gen.build(&mut rng).unwrap();
        let floor = config.star.influence_radius + config.tuning.orbital_feature_buffer;
        assert!(system.radius >= floor);
        assert!(system.star.position == system.center);
    }

    #[test]
    fn names_cycle_with_lap_suffix() {
        let config = GalaxyConfig::default();
        let count = config.system_names.len() as u32;
        assert_eq!(system_name(&config, SystemId(0)), config.system_names[0]);
        assert_eq!(
            system_name(&config, SystemId(count)),
            format!("{} 2", config.system_names[0])
        );
    }
}
