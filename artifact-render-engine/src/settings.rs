use std::time::Duration;

use bevy::prelude::*;
use constants::render_settings::{COMPACT_PARTICLE_COUNT, STAR_COUNT, VIEWER_PARTICLE_COUNT};
use constants::timing::GENERATION_DELAY_MS;
use serde::{Deserialize, Serialize};

use crate::engine::discovery::search::SearchProfile;
use crate::error::Result;

/// Runtime configuration for the engine plugins.
///
/// Every field defaults from the `constants` crate, so a host only needs to
/// supply the values it wants to override.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Simulated mesh generation delay before a viewer session is ready.
    pub generation_delay_ms: u64,
    /// Which search surface the discovery pipeline emulates.
    pub search_profile: SearchProfile,
    pub viewer_particle_count: usize,
    pub compact_particle_count: usize,
    pub star_count: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            generation_delay_ms: GENERATION_DELAY_MS,
            search_profile: SearchProfile::Explore,
            viewer_particle_count: VIEWER_PARTICLE_COUNT,
            compact_particle_count: COMPACT_PARTICLE_COUNT,
            star_count: STAR_COUNT,
        }
    }
}

impl EngineSettings {
    /// Parse host overrides; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn generation_delay(&self) -> Duration {
        Duration::from_millis(self.generation_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let settings = EngineSettings::from_json_str(r#"{ "generation_delay_ms": 500 }"#).unwrap();

        assert_eq!(settings.generation_delay(), Duration::from_millis(500));
        assert_eq!(settings.search_profile, SearchProfile::Explore);
        assert_eq!(settings.viewer_particle_count, VIEWER_PARTICLE_COUNT);
    }

    #[test]
    fn profile_is_read_by_name() {
        let settings = EngineSettings::from_json_str(r#"{ "search_profile": "hero" }"#).unwrap();
        assert_eq!(settings.search_profile, SearchProfile::Hero);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(EngineSettings::from_json_str("{ not json").is_err());
    }
}
