//! Artifact visualisation and discovery engine.
//!
//! Maps catalog artifacts to procedural 3D scenes animated under three view
//! modes, runs the simulated generation and search lifecycles, and exposes
//! both to a web host over JSON-RPC.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod rpc;
pub mod settings;

pub use error::{EngineError, Result};
