//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, catalog loading and
//! plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with logging, asset loading, the engine plugins and
/// platform-specific configuration.
pub mod app_setup;

/// Application state machine driven by catalog loading.
pub mod app_state;

/// Engine plugin and the system set ordering it installs.
pub mod plugin;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
