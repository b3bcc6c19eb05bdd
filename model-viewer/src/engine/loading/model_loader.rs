use bevy::asset::{LoadState, RecursiveDependencyLoadState};
use bevy::gltf::Gltf;
use bevy::prelude::*;
use thiserror::Error;

use crate::engine::assets::catalog::AssetCatalog;

/// Reasons a model request does not produce a displayable node.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssetLoadError {
    #[error("failed to load `{path}`: {reason}")]
    Load { path: String, reason: String },
    #[error("`{0}` contains no scene")]
    NoScene(String),
}

/// In-flight model request. Dropping it drops the only strong handle.
#[derive(Debug)]
pub struct PendingLoad {
    pub name: String,
    pub path: String,
    handle: Handle<Gltf>,
}

/// A parsed model ready to be attached.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub name: String,
    pub scene: Handle<Scene>,
    pub clips: Vec<Handle<AnimationClip>>,
    pub source: Handle<Gltf>,
}

impl LoadedModel {
    pub fn has_animation(&self) -> bool {
        !self.clips.is_empty()
    }
}

#[derive(Debug)]
pub enum LoadPoll {
    Idle,
    Pending,
    Ready(LoadedModel),
    Failed { name: String, error: AssetLoadError },
}

/// Wraps the glTF loader: one request in flight, latest request wins.
#[derive(Resource, Default)]
pub struct ModelLoader {
    pending: Option<PendingLoad>,
}

impl ModelLoader {
    /// Start loading `name`. Returns the name of a request this one replaced.
    pub fn request(
        &mut self,
        asset_server: &AssetServer,
        catalog: &AssetCatalog,
        name: &str,
    ) -> Option<String> {
        let path = catalog.path_for(name);
        debug!("Requesting model `{}` from {}", name, path);
        let handle = asset_server.load::<Gltf>(path.clone());

        self.pending
            .replace(PendingLoad {
                name: name.to_string(),
                path,
                handle,
            })
            .map(|superseded| superseded.name)
    }

    /// Check the in-flight request. `Ready` and `Failed` consume it.
    pub fn poll(&mut self, asset_server: &AssetServer, gltfs: &Assets<Gltf>) -> LoadPoll {
        let Some(pending) = self.pending.as_ref() else {
            return LoadPoll::Idle;
        };

        match asset_server.load_state(pending.handle.id()) {
            LoadState::Failed(err) => {
                let error = AssetLoadError::Load {
                    path: pending.path.clone(),
                    reason: err.to_string(),
                };
                let name = pending.name.clone();
                self.pending = None;
                return LoadPoll::Failed { name, error };
            }
            LoadState::Loaded => {}
            _ => return LoadPoll::Pending,
        }

        match asset_server.recursive_dependency_load_state(pending.handle.id()) {
            RecursiveDependencyLoadState::Loaded => {}
            RecursiveDependencyLoadState::Failed(err) => {
                warn!(
                    "Some dependencies of `{}` failed to load, displaying anyway: {}",
                    pending.name, err
                );
            }
            _ => return LoadPoll::Pending,
        }

        let Some(gltf) = gltfs.get(pending.handle.id()) else {
            return LoadPoll::Pending;
        };

        let scene = gltf
            .default_scene
            .clone()
            .or_else(|| gltf.scenes.first().cloned());
        let clips = gltf.animations.clone();

        let Some(pending) = self.pending.take() else {
            return LoadPoll::Idle;
        };

        match scene {
            Some(scene) => LoadPoll::Ready(LoadedModel {
                name: pending.name,
                scene,
                clips,
                source: pending.handle,
            }),
            None => LoadPoll::Failed {
                error: AssetLoadError::NoScene(pending.path),
                name: pending.name,
            },
        }
    }
}
