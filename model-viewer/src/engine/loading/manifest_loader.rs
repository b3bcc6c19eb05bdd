use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::catalog::MANIFEST_PATH;

use crate::engine::assets::catalog::{AssetCatalog, ViewerManifest};
use crate::engine::core::app_state::AppState;
use crate::engine::scene::lifecycle::{SelectAssetEvent, SelectionSource};

#[derive(Resource, Default)]
pub struct ManifestLoader {
    handle: Option<Handle<ViewerManifest>>,
}

// Start the loading process
pub fn start_loading(mut manifest_loader: ResMut<ManifestLoader>, asset_server: Res<AssetServer>) {
    info!("Loading viewer manifest from {}", MANIFEST_PATH);
    manifest_loader.handle = Some(asset_server.load(MANIFEST_PATH));
}

/// Resolve the manifest into an `AssetCatalog`, falling back to the built-in
/// catalog when the file is missing or invalid, then enter the running state.
pub fn load_manifest_system(
    manifest_loader: Res<ManifestLoader>,
    asset_server: Res<AssetServer>,
    manifests: Res<Assets<ViewerManifest>>,
    mut commands: Commands,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let Some(handle) = manifest_loader.handle.as_ref() else {
        return;
    };

    let catalog = if let Some(manifest) = manifests.get(handle) {
        match AssetCatalog::from_manifest(manifest) {
            Ok(catalog) => {
                info!(
                    "Viewer manifest loaded: {} menu entries, {} side buttons",
                    catalog.menu_assets().len(),
                    catalog.side_button_assets().len()
                );
                catalog
            }
            Err(err) => {
                warn!("Viewer manifest rejected ({err}); using built-in catalog");
                AssetCatalog::default()
            }
        }
    } else if let LoadState::Failed(err) = asset_server.load_state(handle.id()) {
        warn!("Viewer manifest unavailable ({err}); using built-in catalog");
        AssetCatalog::default()
    } else {
        return;
    };

    commands.insert_resource(catalog);
    next_state.set(AppState::Running);
}

/// Ask for the catalog's initial asset once the viewer is running.
pub fn request_initial_asset(
    catalog: Res<AssetCatalog>,
    mut select_events: EventWriter<SelectAssetEvent>,
) {
    select_events.write(SelectAssetEvent {
        name: catalog.initial_asset().to_string(),
        source: SelectionSource::Startup,
    });
}
