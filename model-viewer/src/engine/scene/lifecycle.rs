use bevy::ecs::system::SystemParam;
use bevy::gltf::Gltf;
use bevy::pbr::wireframe::Wireframe;
use bevy::prelude::*;
use bevy::scene::SceneInstanceReady;
use serde::{Deserialize, Serialize};

use super::release::{NodeReleaser, ReleaseReport};
use crate::engine::animation::controller::{AnimationController, MixerBound};
use crate::engine::assets::catalog::AssetCatalog;
use crate::engine::core::viewer_state::ViewerState;
use crate::engine::loading::model_loader::{LoadPoll, LoadedModel, ModelLoader};

/// Where an asset request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionSource {
    Startup,
    Menu,
    SideButton,
    Rpc,
}

/// Request to display the named asset. The only way the scene changes.
#[derive(Event, Debug, Clone)]
pub struct SelectAssetEvent {
    pub name: String,
    pub source: SelectionSource,
}

#[derive(Event, Debug, Clone)]
pub struct AssetLoadedEvent {
    pub name: String,
    pub has_animation: bool,
    /// What was freed from the previous node, if there was one.
    pub release: Option<ReleaseReport>,
}

#[derive(Event, Debug, Clone)]
pub struct AssetLoadFailedEvent {
    pub name: String,
    pub reason: String,
}

/// Sent once the current node's scene has been instantiated.
#[derive(Event, Debug, Clone, Copy)]
pub struct ModelReadyEvent {
    pub root: Entity,
}

/// Marks the root entity of the displayed asset.
#[derive(Component)]
pub struct ModelRoot;

#[derive(Debug, Clone)]
pub struct CurrentModel {
    pub name: String,
    pub root: Entity,
    source: Handle<Gltf>,
}

/// The single active node plus swap bookkeeping.
#[derive(Resource, Debug, Default)]
pub struct SceneLifecycle {
    current: Option<CurrentModel>,
    loads: u32,
    disposals: u32,
}

impl SceneLifecycle {
    pub fn current_root(&self) -> Option<Entity> {
        self.current.as_ref().map(|current| current.root)
    }

    pub fn loads(&self) -> u32 {
        self.loads
    }

    pub fn disposals(&self) -> u32 {
        self.disposals
    }

    fn take_current(&mut self) -> Option<CurrentModel> {
        self.current.take()
    }

    fn record_disposal(&mut self) {
        self.disposals += 1;
    }

    fn attach(&mut self, model: CurrentModel) {
        self.current = Some(model);
        self.loads += 1;
    }
}

#[cfg(test)]
impl SceneLifecycle {
    /// A lifecycle that already displays `root`.
    pub(crate) fn displaying(name: &str, root: Entity) -> Self {
        let mut lifecycle = Self::default();
        lifecycle.attach(CurrentModel {
            name: name.to_string(),
            root,
            source: Handle::default(),
        });
        lifecycle
    }
}

/// Validate selections and hand them to the loader.
pub fn handle_select_asset_events(
    mut select_events: EventReader<SelectAssetEvent>,
    catalog: Res<AssetCatalog>,
    asset_server: Res<AssetServer>,
    mut loader: ResMut<ModelLoader>,
    mut viewer_state: ResMut<ViewerState>,
) {
    for event in select_events.read() {
        if !catalog.contains(&event.name) {
            warn!("Ignoring request for unknown asset `{}`", event.name);
            continue;
        }

        info!("Loading asset `{}` ({:?})", event.name, event.source);
        viewer_state.request(&event.name);
        if let Some(superseded) = loader.request(&asset_server, &catalog, &event.name) {
            debug!("Request for `{}` superseded by `{}`", superseded, event.name);
        }
    }
}

/// Everything a swap touches: the outgoing node, the mixer and the state.
#[derive(SystemParam)]
pub struct ModelSwap<'w, 's> {
    commands: Commands<'w, 's>,
    releaser: NodeReleaser<'w, 's>,
    gltfs: ResMut<'w, Assets<Gltf>>,
    graphs: ResMut<'w, Assets<AnimationGraph>>,
    lifecycle: ResMut<'w, SceneLifecycle>,
    controller: ResMut<'w, AnimationController>,
    viewer_state: ResMut<'w, ViewerState>,
}

impl ModelSwap<'_, '_> {
    /// Release the current node, bind a mixer for `model` and attach it.
    pub fn swap_in(&mut self, model: LoadedModel) -> AssetLoadedEvent {
        let release = match self.lifecycle.take_current() {
            Some(previous) => {
                let report = if previous.source.id() == model.source.id() {
                    self.releaser.detach(previous.root, &mut self.commands)
                } else {
                    let report = self.releaser.release(previous.root, &mut self.commands);
                    self.gltfs.remove(previous.source.id());
                    report
                };
                self.lifecycle.record_disposal();
                info!(
                    "Released `{}`: {} resources over {} entities",
                    previous.name,
                    report.resources(),
                    report.entities
                );
                Some(report)
            }
            None => None,
        };

        if let Some(graph) = self.controller.clear() {
            self.graphs.remove(graph.id());
        }

        let has_animation = model.has_animation();
        if let Some(clip) = model.clips.first() {
            let (graph, clip_node) = AnimationGraph::from_clip(clip.clone());
            let graph = self.graphs.add(graph);
            self.controller
                .bind(graph, clip.clone(), clip_node, &self.viewer_state.toggles);
        }

        let name = model.name.clone();
        attach_model(&mut self.commands, &mut self.lifecycle, model);
        self.viewer_state.mark_displayed(&name);

        info!(
            "Displaying `{}` ({} loads, {} disposals, animated: {})",
            name,
            self.lifecycle.loads(),
            self.lifecycle.disposals(),
            has_animation
        );
        AssetLoadedEvent {
            name,
            has_animation,
            release,
        }
    }
}

/// Swap in a finished load, or report a failed one.
pub fn apply_finished_loads(
    mut loader: ResMut<ModelLoader>,
    asset_server: Res<AssetServer>,
    mut swap: ModelSwap,
    mut loaded_events: EventWriter<AssetLoadedEvent>,
    mut failed_events: EventWriter<AssetLoadFailedEvent>,
) {
    match loader.poll(&asset_server, &swap.gltfs) {
        LoadPoll::Idle | LoadPoll::Pending => {}
        LoadPoll::Failed { name, error } => {
            error!("Asset `{}` failed to load: {}", name, error);
            swap.viewer_state.revert_request();
            failed_events.write(AssetLoadFailedEvent {
                name,
                reason: error.to_string(),
            });
        }
        LoadPoll::Ready(model) => {
            loaded_events.write(swap.swap_in(model));
        }
    }
}

fn attach_model(commands: &mut Commands, lifecycle: &mut SceneLifecycle, model: LoadedModel) {
    let root = commands
        .spawn((
            Name::new(model.name.clone()),
            SceneRoot(model.scene),
            ModelRoot,
        ))
        .observe(on_model_ready)
        .id();

    lifecycle.attach(CurrentModel {
        name: model.name,
        root,
        source: model.source,
    });
}

/// Bind players and apply the wireframe flag once the node's scene exists.
fn on_model_ready(
    trigger: Trigger<SceneInstanceReady>,
    mut commands: Commands,
    lifecycle: Res<SceneLifecycle>,
    controller: Res<AnimationController>,
    viewer_state: Res<ViewerState>,
    children: Query<&Children>,
    mut players: Query<&mut AnimationPlayer>,
    mesh_entities: Query<(), With<Mesh3d>>,
    mut ready_events: EventWriter<ModelReadyEvent>,
) {
    let root = trigger.target();
    if lifecycle.current_root() != Some(root) {
        debug!("Ignoring scene readiness of detached node {}", root);
        return;
    }

    let mut bound = 0;
    for entity in children.iter_descendants(root) {
        if let Ok(mut player) = players.get_mut(entity) {
            if let Some(graph) = controller.attach_player(&mut player) {
                commands
                    .entity(entity)
                    .insert((AnimationGraphHandle(graph), MixerBound));
                bound += 1;
            }
        }
    }
    if bound > 0 {
        debug!("Bound {} animation player(s)", bound);
    }

    set_wireframe(
        &mut commands,
        children
            .iter_descendants(root)
            .filter(|entity| mesh_entities.contains(*entity)),
        viewer_state.toggles.wireframe,
    );

    ready_events.write(ModelReadyEvent { root });
}

/// Show or hide the wireframe overlay on the given mesh entities.
pub fn set_wireframe(
    commands: &mut Commands,
    meshes: impl IntoIterator<Item = Entity>,
    enabled: bool,
) {
    for entity in meshes {
        if enabled {
            commands.entity(entity).insert(Wireframe);
        } else {
            commands.entity(entity).remove::<Wireframe>();
        }
    }
}
