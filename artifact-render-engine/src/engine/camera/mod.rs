//! Artifact camera: bounded orbit and zoom around the scene origin.
//!
//! The composed scene decides the framing and whether the view is interactive;
//! this module applies mouse input inside those limits.

/// Viewport camera resource and controller system.
pub mod viewport_camera;

pub use viewport_camera::{ArtifactCamera, OrbitCameraPlugin, ViewportCamera, camera_controller};
