use bevy::prelude::*;

use crate::engine::discovery::search::DiscoveryPipeline;
use crate::engine::discovery::systems::{
    DiscoveryCommand, SearchCompleted, handle_discovery_commands, tick_discovery_clock,
};
use crate::engine::scene::composer::SceneComposer;
use crate::engine::store::ArtifactStore;
use crate::engine::viewer::lifecycle::ViewerLifecycle;
use crate::engine::viewer::systems::{
    ViewerCommand, ViewerPhaseChanged, handle_cancel_key, handle_viewer_commands,
    sync_viewer_with_store, tick_viewer_clock, view_mode_shortcuts,
};
use crate::settings::EngineSettings;

/// Frame ordering for engine systems. Configured as a chain in `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineSet {
    /// Keyboard shortcuts and the cancel key.
    Input,
    /// Viewer and discovery commands.
    Commands,
    /// Lifecycle follows the store.
    Sync,
    /// Generation timer, animation clock and search latency.
    Clocks,
    Scene,
    Animation,
}

/// Core engine: lifecycle, discovery and store systems.
///
/// Store-dependent systems wait until an [`ArtifactStore`] and
/// [`DiscoveryPipeline`] exist, which happens once the catalog is loaded.
#[derive(Default)]
pub struct ArtifactEnginePlugin {
    pub settings: EngineSettings,
}

impl ArtifactEnginePlugin {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }
}

impl Plugin for ArtifactEnginePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.settings.clone())
            .insert_resource(ViewerLifecycle::new(self.settings.generation_delay()))
            .insert_resource(SceneComposer::from_settings(&self.settings))
            .add_event::<ViewerCommand>()
            .add_event::<ViewerPhaseChanged>()
            .add_event::<DiscoveryCommand>()
            .add_event::<SearchCompleted>()
            .configure_sets(
                Update,
                (
                    EngineSet::Input,
                    EngineSet::Commands,
                    EngineSet::Sync,
                    EngineSet::Clocks,
                    EngineSet::Scene,
                    EngineSet::Animation,
                )
                    .chain(),
            );

        app.add_systems(
            Update,
            (
                handle_cancel_key.run_if(resource_exists::<ArtifactStore>),
                view_mode_shortcuts,
            )
                .in_set(EngineSet::Input)
                .run_if(resource_exists::<ButtonInput<KeyCode>>),
        )
        .add_systems(
            Update,
            (
                handle_viewer_commands.run_if(resource_exists::<ArtifactStore>),
                handle_discovery_commands.run_if(resource_exists::<DiscoveryPipeline>),
            )
                .in_set(EngineSet::Commands),
        )
        .add_systems(
            Update,
            sync_viewer_with_store
                .in_set(EngineSet::Sync)
                .run_if(resource_exists::<ArtifactStore>),
        )
        .add_systems(
            Update,
            (
                tick_viewer_clock,
                tick_discovery_clock.run_if(resource_exists::<DiscoveryPipeline>),
            )
                .in_set(EngineSet::Clocks),
        );
    }
}
