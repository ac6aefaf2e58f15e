//! Error types for the artifact engine.

use thiserror::Error;

use crate::catalog::ArtifactId;

/// Result type alias using the engine's error type.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Failures surfaced by engine operations.
///
/// None of these are fatal: callers log and carry on with unchanged state.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Artifact id not present in the catalog
    #[error("Artifact not found: {0}")]
    ArtifactNotFound(ArtifactId),

    /// Catalog contains the same id twice
    #[error("Duplicate artifact id in catalog: {0}")]
    DuplicateArtifactId(ArtifactId),

    /// View mode name not recognised
    #[error("Unknown view mode: {0}")]
    UnknownViewMode(String),

    /// Sort order name not recognised
    #[error("Unknown sort order: {0}")]
    UnknownSortOrder(String),

    /// Filter field name not recognised
    #[error("Unknown filter field: {0}")]
    UnknownFilterField(String),

    /// Catalog or settings JSON failed to parse
    #[error("Catalog error: {0}")]
    Catalog(#[from] serde_json::Error),
}
