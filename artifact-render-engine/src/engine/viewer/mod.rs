//! Viewer session lifecycle and the systems that drive it.
//!
//! A session starts when the store reports an artifact being viewed, spends a
//! fixed simulated generation delay in Loading, then animates in Ready until
//! it is closed or replaced.

pub mod lifecycle;

/// Command handling, store synchronisation, cancel key and clock systems.
pub mod systems;

pub use lifecycle::{SceneKey, SessionToken, ViewMode, ViewerLifecycle, ViewerPhase};
pub use systems::{ViewerCommand, ViewerPhaseChanged};
