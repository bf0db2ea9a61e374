//! Errors raised while generating a galaxy.

use crate::feature::FeatureKind;

/// Stage of a solar system generator, used to report out-of-order calls.
///
/// There is no built stage: `build` consumes the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    Unconfigured,
    ConfigSelected,
    GeneratorsInitialized,
    PositionsCalculated,
}

impl std::fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GenerationStage::Unconfigured => "unconfigured",
            GenerationStage::ConfigSelected => "config selected",
            GenerationStage::GeneratorsInitialized => "generators initialized",
            GenerationStage::PositionsCalculated => "positions calculated",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during generation
#[derive(Debug)]
pub enum GenerationError {
    /// No free orbital slot was found for one feature. The feature is dropped.
    PlacementExhausted {
        kind: FeatureKind,
        radius: f32,
        attempts: u32,
    },
    /// A size class or config pool has no usable entries.
    InvalidConfiguration(String),
    /// A solar system generator stage was invoked before its predecessor.
    StageOutOfOrder {
        expected: GenerationStage,
        found: GenerationStage,
    },
    /// A custom system template asked for a feature nobody registered.
    UnknownCustomFeature(String),
    /// Config text could not be parsed.
    Json(serde_json::Error),
}

impl GenerationError {
    /// Per-feature failures are swallowed by the system generator; everything
    /// else aborts the system being built.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, GenerationError::PlacementExhausted { .. })
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(e: serde_json::Error) -> Self {
        GenerationError::Json(e)
    }
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationError::PlacementExhausted {
                kind,
                radius,
                attempts,
            } => write!(
                f,
                "No slot for {} (radius {:.1}) after {} attempts",
                kind, radius, attempts
            ),
            GenerationError::InvalidConfiguration(msg) => {
                write!(f, "Invalid configuration: {}", msg)
            }
            GenerationError::StageOutOfOrder { expected, found } => write!(
                f,
                "Generator stage out of order: expected {}, found {}",
                expected, found
            ),
            GenerationError::UnknownCustomFeature(name) => {
                write!(f, "No custom feature registered as '{}'", name)
            }
            GenerationError::Json(e) => write!(f, "Config parse error: {}", e),
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerationError::Json(e) => Some(e),
            _ => None,
        }
    }
}
