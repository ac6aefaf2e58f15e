//! Shared tuning constants for the artifact viewer and discovery engine.

pub mod palette;
pub mod render_settings;
pub mod timing;
