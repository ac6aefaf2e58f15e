//! Artifact scene composition and presentation.
//!
//! Composition is pure: a shape descriptor, view mode, elapsed time and
//! context produce a [`composer::RenderableScene`]. The spawn and animation
//! modules turn that description into entities and keep them moving.

/// Per-frame pose updates for the artifact and particle field.
pub mod animation;

/// Layers, materials, lights, decoration and camera for each view mode.
pub mod composer;

/// Seeded scatter of particle and star positions.
pub mod particles;

/// Entity spawning and rebuild-on-change for the active scene.
pub mod spawn;

pub use composer::{RenderableScene, SceneComposer, SceneContext};
pub use spawn::{ActiveScene, ArtifactScenePlugin};
