use bevy::asset::AssetMetaCheck;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::catalog::Catalog;
use crate::engine::camera::OrbitCameraPlugin;
use crate::engine::core::app_state::{
    AppState, CatalogLoader, load_catalog_system, start_catalog_loading,
};
use crate::engine::core::plugin::ArtifactEnginePlugin;
use crate::engine::core::window_config::create_window_config;
use crate::engine::scene::ArtifactScenePlugin;
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::settings::EngineSettings;

/// Log filter for the engine: quiet GPU backends, verbose engine.
pub const LOG_FILTER: &str = "wgpu=error,naga=warn,artifact_render_engine=debug";

pub fn create_app(settings: EngineSettings) -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        // Registers Catalog as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<Catalog>::new(&["json"]))
        .add_plugins(ArtifactEnginePlugin::new(settings))
        .add_plugins(ArtifactScenePlugin)
        .add_plugins(OrbitCameraPlugin)
        .add_plugins(WebRpcPlugin)
        .init_resource::<CatalogLoader>();

    app.add_systems(Startup, start_catalog_loading).add_systems(
        Update,
        load_catalog_system.run_if(in_state(AppState::LoadingCatalog)),
    );

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    let log_config = LogPlugin {
        filter: LOG_FILTER.to_string(),
        ..default()
    };

    DefaultPlugins
        .set(window_config)
        .set(asset_config)
        .set(log_config)
}
