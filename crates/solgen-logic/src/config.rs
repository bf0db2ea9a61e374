//! Configuration records consumed by the generators.
//!
//! A [`GalaxyConfig`] is loaded once (usually from `data/galaxy_config.json`)
//! and handed to generators by reference. Generators never mutate it.

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// Minimum clearance kept between feature disks beyond their radii.
pub const ORBITAL_FEATURE_BUFFER: f32 = 8.0;
/// Mazes are kept beyond this fraction of the system radius.
pub const MAZE_EDGE_RATIO: f32 = 0.8;
/// Candidate slots sampled per feature before it is dropped.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 200;

fn default_weight() -> f32 {
    1.0
}

/// System size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolarSystemSize {
    Small,
    Medium,
    Large,
}

impl std::fmt::Display for SolarSystemSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SolarSystemSize::Small => "small",
            SolarSystemSize::Medium => "medium",
            SolarSystemSize::Large => "large",
        };
        f.write_str(name)
    }
}

/// Feature-count and radius ranges for one size class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeClassConfig {
    pub size: SolarSystemSize,
    pub min_features: u32,
    pub max_features: u32,
    pub min_radius: f32,
    pub max_radius: f32,
    #[serde(default = "default_weight")]
    pub weight: f32,
}

/// Named look of a solar system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolarSystemConfig {
    pub name: String,
    pub star_color: String,
    /// Planet config names allowed in this system; empty allows all.
    #[serde(default)]
    pub planet_palette: Vec<String>,
    /// Never used for the spawn system.
    #[serde(default)]
    pub hard_only: bool,
    #[serde(default = "default_weight")]
    pub weight: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanetConfig {
    pub name: String,
    pub min_ground_height: f32,
    pub max_ground_height: f32,
    /// Added to the ground height to get the gravity influence boundary.
    pub atmosphere_height: f32,
    /// Distance above the ground at which sunk ships get pulled out.
    pub recovery_margin: f32,
    pub min_gravitation: f32,
    pub max_gravitation: f32,
    #[serde(default)]
    pub hard_only: bool,
    #[serde(default = "default_weight")]
    pub weight: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeConfig {
    pub name: String,
    pub min_radius: f32,
    pub max_radius: f32,
    #[serde(default)]
    pub bosses: Vec<String>,
    /// Multiplier applied to how often enemies spawn on the maze rim.
    #[serde(default = "default_weight")]
    pub outer_enemy_frequency: f32,
    #[serde(default)]
    pub hard_only: bool,
    #[serde(default = "default_weight")]
    pub weight: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeltConfig {
    pub name: String,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Asteroids per 1000 square units.
    pub min_density: f32,
    pub max_density: f32,
    #[serde(default)]
    pub hard_only: bool,
    #[serde(default = "default_weight")]
    pub weight: f32,
}

/// Fixed parameters shared by every star.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarConfig {
    /// Gravity and heat act inside this radius.
    pub influence_radius: f32,
    /// Minimum-distance clamp for star gravity; also the no-spawn core.
    pub hot_radius: f32,
    pub gravitation_constant: f32,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            influence_radius: 78.0,
            hot_radius: 58.5,
            gravitation_constant: 2000.0,
        }
    }
}

/// Knobs for the placement solver and default feature mix.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationTuning {
    pub orbital_feature_buffer: f32,
    pub min_orbital_distance: f32,
    pub max_placement_attempts: u32,
    pub maze_edge_ratio: f32,
    pub mazes_per_system: u32,
    pub belt_chance: f32,
    pub max_belts: u32,
    /// Distance between consecutive system centers.
    pub system_spacing: f32,
    /// Orbital arc speed of planets, in units per second.
    pub planet_orbit_speed: f32,
    /// Surface arc speed of planet spin, in units per second.
    pub planet_spin_speed: f32,
}

impl Default for GenerationTuning {
    fn default() -> Self {
        Self {
            orbital_feature_buffer: ORBITAL_FEATURE_BUFFER,
            min_orbital_distance: 86.0,
            max_placement_attempts: MAX_PLACEMENT_ATTEMPTS,
            maze_edge_ratio: MAZE_EDGE_RATIO,
            mazes_per_system: 1,
            belt_chance: 0.35,
            max_belts: 2,
            system_spacing: 2000.0,
            planet_orbit_speed: 0.2,
            planet_spin_speed: 0.5,
        }
    }
}

/// Everything the generators read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalaxyConfig {
    pub system_names: Vec<String>,
    pub sizes: Vec<SizeClassConfig>,
    pub systems: Vec<SolarSystemConfig>,
    pub planets: Vec<PlanetConfig>,
    pub mazes: Vec<MazeConfig>,
    pub belts: Vec<BeltConfig>,
    #[serde(default)]
    pub star: StarConfig,
    #[serde(default)]
    pub tuning: GenerationTuning,
}

impl GalaxyConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, GenerationError> {
        let config: GalaxyConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject ranges and pools the generators cannot work with.
    pub fn validate(&self) -> Result<(), GenerationError> {
        let invalid = |msg: String| Err(GenerationError::InvalidConfiguration(msg));

        if self.system_names.is_empty() {
            return invalid("no system names".into());
        }
        if self.systems.is_empty() {
            return invalid("no solar system configs".into());
        }
        if self.planets.is_empty() {
            return invalid("no planet configs".into());
        }
        for s in &self.sizes {
            if s.min_features > s.max_features || s.min_radius > s.max_radius {
                return invalid(format!("size class {} has an inverted range", s.size));
            }
            if s.min_radius <= self.star.influence_radius {
                return invalid(format!("size class {} is smaller than its star", s.size));
            }
        }
        for p in &self.planets {
            if p.min_ground_height <= 0.0 || p.min_ground_height > p.max_ground_height {
                return invalid(format!("planet '{}' has a bad ground height range", p.name));
            }
            if p.recovery_margin < 0.0 || p.recovery_margin > p.atmosphere_height {
                return invalid(format!(
                    "planet '{}' recovery margin must lie within its atmosphere",
                    p.name
                ));
            }
            if p.min_gravitation > p.max_gravitation {
                return invalid(format!("planet '{}' has an inverted gravitation range", p.name));
            }
        }
        for m in &self.mazes {
            if m.min_radius <= 0.0 || m.min_radius > m.max_radius {
                return invalid(format!("maze '{}' has a bad radius range", m.name));
            }
        }
        for b in &self.belts {
            if b.min_radius <= 0.0 || b.min_radius > b.max_radius {
                return invalid(format!("belt '{}' has a bad radius range", b.name));
            }
        }
        if self.star.hot_radius > self.star.influence_radius {
            return invalid("star hot radius exceeds its influence radius".into());
        }
        Ok(())
    }

    /// Size class record for `size`.
    pub fn size_class(&self, size: SolarSystemSize) -> Result<&SizeClassConfig, GenerationError> {
        self.sizes.iter().find(|s| s.size == size).ok_or_else(|| {
            GenerationError::InvalidConfiguration(format!("no size class '{}'", size))
        })
    }

    /// Solar system configs usable for the given system index.
    pub fn system_pool(&self, allow_hard: bool) -> Vec<&SolarSystemConfig> {
        self.systems
            .iter()
            .filter(|c| allow_hard || !c.hard_only)
            .collect()
    }

    /// Planet configs allowed by `system`'s palette.
    pub fn planet_pool(&self, system: &SolarSystemConfig, allow_hard: bool) -> Vec<&PlanetConfig> {
        self.planets
            .iter()
            .filter(|p| allow_hard || !p.hard_only)
            .filter(|p| system.planet_palette.is_empty() || system.planet_palette.contains(&p.name))
            .collect()
    }

    pub fn maze_pool(&self, allow_hard: bool) -> Vec<&MazeConfig> {
        self.mazes
            .iter()
            .filter(|m| allow_hard || !m.hard_only)
            .collect()
    }

    pub fn belt_pool(&self, allow_hard: bool) -> Vec<&BeltConfig> {
        self.belts
            .iter()
            .filter(|b| allow_hard || !b.hard_only)
            .collect()
    }
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        let names = [
            "Aldebaran", "Betelgeuse", "Canopus", "Deneb", "Electra", "Fomalhaut", "Gienah",
            "Hadar", "Izar", "Kochab", "Lesath", "Mirfak", "Nunki", "Rigel", "Sadr", "Vega",
        ];
        Self {
            system_names: names.iter().map(|s| s.to_string()).collect(),
            sizes: vec![
                SizeClassConfig {
                    size: SolarSystemSize::Small,
                    min_features: 2,
                    max_features: 3,
                    min_radius: 320.0,
                    max_radius: 420.0,
                    weight: 1.0,
                },
                SizeClassConfig {
                    size: SolarSystemSize::Medium,
                    min_features: 3,
                    max_features: 5,
                    min_radius: 450.0,
                    max_radius: 600.0,
                    weight: 2.0,
                },
                SizeClassConfig {
                    size: SolarSystemSize::Large,
                    min_features: 4,
                    max_features: 7,
                    min_radius: 620.0,
                    max_radius: 800.0,
                    weight: 1.0,
                },
            ],
            systems: vec![
                SolarSystemConfig {
                    name: "yellow_dwarf".into(),
                    star_color: "#fff4d6".into(),
                    planet_palette: Vec::new(),
                    hard_only: false,
                    weight: 3.0,
                },
                SolarSystemConfig {
                    name: "blue_giant".into(),
                    star_color: "#a8c8ff".into(),
                    planet_palette: vec!["ice".into(), "barren".into()],
                    hard_only: false,
                    weight: 1.0,
                },
                SolarSystemConfig {
                    name: "red_giant".into(),
                    star_color: "#ff7a4d".into(),
                    planet_palette: vec!["desert".into(), "volcanic".into(), "barren".into()],
                    hard_only: true,
                    weight: 1.0,
                },
            ],
            planets: vec![
                planet("desert", (14.0, 22.0), (800.0, 1200.0), false, 2.0),
                planet("ice", (12.0, 20.0), (600.0, 1000.0), false, 1.5),
                planet("barren", (10.0, 18.0), (500.0, 900.0), false, 1.0),
                planet("volcanic", (18.0, 25.0), (1200.0, 1600.0), true, 1.0),
            ],
            mazes: vec![
                MazeConfig {
                    name: "derelict_station".into(),
                    min_radius: 25.0,
                    max_radius: 35.0,
                    bosses: vec!["warden".into()],
                    outer_enemy_frequency: 1.0,
                    hard_only: false,
                    weight: 2.0,
                },
                MazeConfig {
                    name: "pirate_fortress".into(),
                    min_radius: 30.0,
                    max_radius: 40.0,
                    bosses: vec!["corsair_captain".into(), "corsair_mate".into()],
                    outer_enemy_frequency: 1.21,
                    hard_only: true,
                    weight: 1.0,
                },
            ],
            belts: vec![
                BeltConfig {
                    name: "rocky".into(),
                    min_radius: 15.0,
                    max_radius: 30.0,
                    min_density: 0.5,
                    max_density: 1.5,
                    hard_only: false,
                    weight: 1.0,
                },
                BeltConfig {
                    name: "crystal".into(),
                    min_radius: 15.0,
                    max_radius: 25.0,
                    min_density: 1.0,
                    max_density: 2.5,
                    hard_only: true,
                    weight: 1.0,
                },
            ],
            star: StarConfig::default(),
            tuning: GenerationTuning::default(),
        }
    }
}

fn planet(
    name: &str,
    ground: (f32, f32),
    gravitation: (f32, f32),
    hard_only: bool,
    weight: f32,
) -> PlanetConfig {
    PlanetConfig {
        name: name.into(),
        min_ground_height: ground.0,
        max_ground_height: ground.1,
        atmosphere_height: 14.0,
        recovery_margin: 2.0,
        min_gravitation: gravitation.0,
        max_gravitation: gravitation.1,
        hard_only,
        weight,
    }
}
