//! Errors raised by the registry and the engine.

use solgen_logic::error::GenerationError;

/// Errors from the planet manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// `register` was called a second time.
    AlreadyRegistered,
    /// Queried or updated before any galaxy was registered.
    EmptyRegistryQuery,
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::AlreadyRegistered => write!(f, "Galaxy already registered"),
            RegistryError::EmptyRegistryQuery => {
                write!(f, "Registry queried before a galaxy was registered")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Errors surfaced by [`crate::engine::SimulationEngine`]
#[derive(Debug)]
pub enum EngineError {
    Generation(GenerationError),
    Registry(RegistryError),
}

impl From<GenerationError> for EngineError {
    fn from(e: GenerationError) -> Self {
        EngineError::Generation(e)
    }
}

impl From<RegistryError> for EngineError {
    fn from(e: RegistryError) -> Self {
        EngineError::Registry(e)
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Generation(e) => write!(f, "Generation failed: {}", e),
            EngineError::Registry(e) => write!(f, "Registry error: {}", e),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Generation(e) => Some(e),
            EngineError::Registry(e) => Some(e),
        }
    }
}
