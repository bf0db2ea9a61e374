//! Galaxy builder: one solar system generator per slot.
//!
//! Slot `i` becomes system `i`; system 0 is the spawn system. System 0 sits at
//! the origin and system `i` at a random angle, `i × system_spacing` away.
//! Systems are generated independently. Nothing keeps two systems apart beyond
//! the spacing, which the default configuration sizes generously.

use std::collections::BTreeMap;

use crate::config::GalaxyConfig;
use crate::error::GenerationError;
use crate::feature::FeatureRegistry;
use crate::geometry::Vec2;
use crate::random::GalaxyRng;
use crate::solar_system::{SolarSystemGenerator, SystemTemplate};
use crate::world::{SolarSystem, SystemId};

/// Builds whole galaxies from one config.
#[derive(Debug, Clone)]
pub struct GalaxyBuilder {
    config: GalaxyConfig,
    registry: FeatureRegistry,
    templates: BTreeMap<u32, SystemTemplate>,
}

impl GalaxyBuilder {
    pub fn new(config: GalaxyConfig) -> Self {
        Self {
            config,
            registry: FeatureRegistry::with_builtin(),
            templates: BTreeMap::new(),
        }
    }

    /// Replace the custom feature registry.
    pub fn with_registry(mut self, registry: FeatureRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Use `template` for system `index` instead of [`SystemTemplate::Default`].
    pub fn with_template(mut self, index: u32, template: SystemTemplate) -> Self {
        self.templates.insert(index, template);
        self
    }

    pub fn config(&self) -> &GalaxyConfig {
        &self.config
    }

    /// Center of system `index`.
    fn system_center(&self, index: u32, rng: &mut GalaxyRng) -> Vec2 {
        if index == 0 {
            return Vec2::ZERO;
        }
        Vec2::from_angle(rng.angle()) * (index as f32 * self.config.tuning.system_spacing)
    }

    /// Generate `number_of_systems` systems. Any configuration error aborts the
    /// whole build; nothing partial is returned.
    pub fn build(
        &self,
        number_of_systems: u32,
        rng: &mut GalaxyRng,
    ) -> Result<Vec<SolarSystem>, GenerationError> {
        let mut systems = Vec::with_capacity(number_of_systems as usize);
        for index in 0..number_of_systems {
            let center = self.system_center(index, rng);
            let template = self.templates.get(&index).cloned().unwrap_or_default();
            let generator =
                SolarSystemGenerator::new(&self.config, &self.registry, template, SystemId(index), center);
            systems.push(generator.generate(rng)?);
        }

        let planets: usize = systems.iter().map(|s| s.planets.len()).sum();
        log::info!(
            "Galaxy built: {} systems, {} planets",
            systems.len(),
            planets
        );
        Ok(systems)
    }

    /// [`GalaxyBuilder::build`] with a fresh generator seeded from `seed`.
    pub fn build_seeded(
        &self,
        number_of_systems: u32,
        seed: u64,
    ) -> Result<Vec<SolarSystem>, GenerationError> {
        let mut rng = GalaxyRng::seeded(seed);
        self.build(number_of_systems, &mut rng)
    }
}
