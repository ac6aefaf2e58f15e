//! Static artifact catalog consumed read-only by the store and discovery pipeline.
//!
//! The catalog ships as JSON (`assets/catalog.json`) and is loaded through the
//! Bevy asset server in the app, or parsed directly with
//! [`Catalog::from_json_str`] in library use.

/// Artifact records and their identity type.
pub mod artifact;

/// Catalog container with facet, collection and language lookup tables.
pub mod tables;

pub use artifact::{Artifact, ArtifactId, TimelineEntry};
pub use tables::{Catalog, CollectionInfo, LanguageLabel};
