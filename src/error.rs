//! Engine error handling
//!
//! One error type for the whole crate. Per-frame code never returns these;
//! they surface from setup paths (config, asset loading, entity lookup).

use std::path::PathBuf;

use crate::ecs::{ComponentKind, EntityId};

/// Type alias for engine results
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to load asset '{path}': {reason}")]
    AssetLoad { path: String, reason: String },

    #[error("asset '{path}' did not load within {timeout_ms}ms")]
    AssetTimeout { path: String, timeout_ms: u64 },

    #[error("asset '{path}' contains no animation clip")]
    MissingClip { path: String },

    #[error("failed to read config file {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path:?}: {error}")]
    ConfigParse { path: PathBuf, error: String },

    #[error("unknown config format for {path:?} (expected .toml or .json)")]
    UnknownConfigFormat { path: PathBuf },

    #[error("entity {id} does not exist")]
    UnknownEntity { id: EntityId },

    #[error("entity {entity} has no {component} component")]
    MissingComponent {
        entity: EntityId,
        component: ComponentKind,
    },
}

/// Create an asset load error
pub fn asset_load_error(path: &str, reason: impl std::fmt::Display) -> EngineError {
    EngineError::AssetLoad {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

/// Report an entity that matched a system's requirement set but is missing
/// one of the required components.
///
/// Requirement matching makes this unreachable; in debug builds it panics,
/// in release builds it logs and the caller skips the entity.
pub fn contract_violation(system: &str, entity: EntityId, component: ComponentKind) {
    let error = EngineError::MissingComponent { entity, component };
    debug_assert!(false, "[{}] {}", system, error);
    log::error!("[{}] contract violation: {}", system, error);
}
