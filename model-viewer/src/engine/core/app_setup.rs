// Standard library and external crates
use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::log::{Level, LogPlugin};
use bevy::pbr::wireframe::{WireframeConfig, WireframePlugin};
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

// Crate engine modules
use crate::engine::animation::controller::{AnimationController, advance_animation};
use crate::engine::assets::catalog::ViewerManifest;
use crate::engine::camera::orbit_camera::{orbit_input_system, orbit_update_system};
use crate::engine::core::app_state::AppState;
use crate::engine::core::viewer_state::ViewerState;
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::manifest_loader::{
    ManifestLoader, load_manifest_system, request_initial_asset, start_loading,
};
use crate::engine::loading::model_loader::ModelLoader;
use crate::engine::scene::environment::{spawn_environment, sync_backdrop};
use crate::engine::scene::lifecycle::{
    AssetLoadFailedEvent, AssetLoadedEvent, ModelReadyEvent, SceneLifecycle, SelectAssetEvent,
    apply_finished_loads, handle_select_asset_events,
};
use crate::engine::systems::fps_tracking::{fps_notification_system, fps_text_update_system};
use crate::engine::systems::hotkeys::{
    ViewerActionEvent, ViewerToggledEvent, apply_viewer_actions, handle_hotkeys,
};
use crate::engine::systems::render_loop::{ViewerTickSet, configure_viewer_tick};

// Web RPC and UI
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::ui::{ViewerUiPlugin, update_pointer_over_ui};

const LOG_FILTER: &str = "wgpu=error,naga=warn,model_viewer=info";

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers ViewerManifest as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<ViewerManifest>::new(&["json"]))
        .add_plugins(WebRpcPlugin)
        .add_plugins(WireframePlugin::default())
        .insert_resource(WireframeConfig {
            global: false,
            default_color: Color::WHITE,
        });

    // Initialise resources early
    app.init_resource::<ManifestLoader>()
        .init_resource::<ModelLoader>()
        .init_resource::<ViewerState>()
        .init_resource::<SceneLifecycle>()
        .init_resource::<AnimationController>()
        .add_event::<SelectAssetEvent>()
        .add_event::<AssetLoadedEvent>()
        .add_event::<AssetLoadFailedEvent>()
        .add_event::<ModelReadyEvent>()
        .add_event::<ViewerActionEvent>()
        .add_event::<ViewerToggledEvent>();

    configure_viewer_tick(&mut app);

    // Plugin for menu, morph panel and overlays
    app.add_plugins(ViewerUiPlugin);

    // State-based system scheduling
    app.add_systems(Startup, (spawn_environment, start_loading))
        .add_systems(
            Update,
            load_manifest_system.run_if(in_state(AppState::Loading)),
        )
        .add_systems(OnEnter(AppState::Running), request_initial_asset);

    // Per-frame viewer systems, ordered by ViewerTickSet
    app.add_systems(
        Update,
        (
            handle_hotkeys,
            orbit_input_system.after(update_pointer_over_ui),
        )
            .in_set(ViewerTickSet::Input),
    )
    .add_systems(
        Update,
        (
            apply_viewer_actions,
            sync_backdrop.run_if(resource_changed::<ViewerState>),
            handle_select_asset_events,
            apply_finished_loads,
        )
            .chain()
            .in_set(ViewerTickSet::Apply),
    )
    .add_systems(Update, advance_animation.in_set(ViewerTickSet::Advance))
    .add_systems(Update, orbit_update_system.in_set(ViewerTickSet::Orbit))
    .add_systems(
        Update,
        (fps_text_update_system, fps_notification_system).in_set(ViewerTickSet::Readout),
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
        level: Level::INFO,
        ..default()
    };

    DefaultPlugins
        .set(window_config)
        .set(asset_config)
        .set(log_config)
}
