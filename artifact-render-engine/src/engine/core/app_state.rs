use std::sync::Arc;

use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::catalog::Catalog;
use crate::engine::discovery::search::DiscoveryPipeline;
use crate::engine::store::ArtifactStore;
use crate::settings::EngineSettings;

/// Path of the bundled catalog, relative to the asset root.
pub const CATALOG_PATH: &str = "catalog.json";

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    LoadingCatalog,
    Browsing,
}

#[derive(Resource, Default)]
pub struct CatalogLoader {
    handle: Option<Handle<Catalog>>,
    failed: bool,
}

/// Build the browsing resources around a loaded catalog.
pub fn catalog_resources(
    catalog: Arc<Catalog>,
    settings: &EngineSettings,
) -> (ArtifactStore, DiscoveryPipeline) {
    (
        ArtifactStore::new(catalog.clone()),
        DiscoveryPipeline::new(catalog, settings.search_profile),
    )
}

pub fn start_catalog_loading(mut loader: ResMut<CatalogLoader>, asset_server: Res<AssetServer>) {
    info!("Loading catalog from {}", CATALOG_PATH);
    loader.handle = Some(asset_server.load(CATALOG_PATH));
}

/// Install the store and discovery pipeline once the catalog asset is ready.
pub fn load_catalog_system(
    mut commands: Commands,
    mut loader: ResMut<CatalogLoader>,
    asset_server: Res<AssetServer>,
    catalogs: Res<Assets<Catalog>>,
    settings: Res<EngineSettings>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loader.failed {
        return;
    }
    let Some(handle) = loader.handle.clone() else {
        return;
    };

    if let Some(LoadState::Failed(err)) = asset_server.get_load_state(&handle) {
        error!("Catalog failed to load: {}", err);
        loader.failed = true;
        return;
    }

    let Some(mut catalog) = catalogs.get(&handle).cloned() else {
        return;
    };
    catalog.fill_facet_tables();

    if let Err(err) = catalog.validate() {
        error!("Catalog rejected: {}", err);
        loader.failed = true;
        return;
    }

    info!("✓ Catalog loaded with {} artifacts", catalog.len());
    let (store, pipeline) = catalog_resources(Arc::new(catalog), &settings);
    commands.insert_resource(store);
    commands.insert_resource(pipeline);

    info!("→ Transitioning to Browsing state");
    next_state.set(AppState::Browsing);
}
