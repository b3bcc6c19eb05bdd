use std::collections::HashSet;

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::render::mesh::skinning::{SkinnedMesh, SkinnedMeshInverseBindposes};
use serde::Serialize;

/// Number of unique GPU-side resources freed while detaching a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReleaseReport {
    pub skeletons: usize,
    pub textures: usize,
    pub materials: usize,
    pub geometries: usize,
    pub entities: usize,
}

impl ReleaseReport {
    pub fn resources(&self) -> usize {
        self.skeletons + self.textures + self.materials + self.geometries
    }
}

/// Everything a mesh entity of a loaded node may own.
type MeshParts = (
    Option<&'static Mesh3d>,
    Option<&'static MeshMaterial3d<StandardMaterial>>,
    Option<&'static SkinnedMesh>,
);

/// Frees the assets referenced by a node's subtree and despawns it.
#[derive(SystemParam)]
pub struct NodeReleaser<'w, 's> {
    children: Query<'w, 's, &'static Children>,
    parts: Query<'w, 's, MeshParts>,
    meshes: ResMut<'w, Assets<Mesh>>,
    materials: ResMut<'w, Assets<StandardMaterial>>,
    images: ResMut<'w, Assets<Image>>,
    bindposes: ResMut<'w, Assets<SkinnedMeshInverseBindposes>>,
}

impl NodeReleaser<'_, '_> {
    /// Release skeletons, textures, materials and geometry below `root`,
    /// then despawn it. Handles shared between meshes are released once.
    pub fn release(&mut self, root: Entity, commands: &mut Commands) -> ReleaseReport {
        let mut report = ReleaseReport::default();
        let mut skeletons = HashSet::new();
        let mut textures = HashSet::new();
        let mut materials = HashSet::new();
        let mut geometries = HashSet::new();

        let subtree: Vec<Entity> = self.subtree(root).collect();
        for entity in subtree {
            report.entities += 1;
            let Ok((mesh, material, skin)) = self.parts.get(entity) else {
                continue;
            };

            if let Some(skin) = skin {
                let id = skin.inverse_bindposes.id();
                if skeletons.insert(id) && self.bindposes.remove(id).is_some() {
                    report.skeletons += 1;
                }
            }

            if let Some(material) = material {
                let id = material.id();
                if materials.insert(id) {
                    if let Some(released) = self.materials.remove(id) {
                        report.materials += 1;
                        for texture in material_textures(&released) {
                            if textures.insert(texture) && self.images.remove(texture).is_some() {
                                report.textures += 1;
                            }
                        }
                    }
                }
            }

            if let Some(mesh) = mesh {
                let id = mesh.id();
                if geometries.insert(id) && self.meshes.remove(id).is_some() {
                    report.geometries += 1;
                }
            }
        }

        commands.entity(root).despawn();
        report
    }

    /// Despawn `root` without freeing assets still shared with a reload
    /// of the same file.
    pub fn detach(&self, root: Entity, commands: &mut Commands) -> ReleaseReport {
        let report = ReleaseReport {
            entities: self.subtree(root).count(),
            ..default()
        };
        commands.entity(root).despawn();
        report
    }

    fn subtree(&self, root: Entity) -> impl Iterator<Item = Entity> + '_ {
        std::iter::once(root).chain(self.children.iter_descendants(root))
    }
}

fn material_textures(material: &StandardMaterial) -> impl Iterator<Item = AssetId<Image>> + '_ {
    [
        &material.base_color_texture,
        &material.normal_map_texture,
        &material.metallic_roughness_texture,
        &material.emissive_texture,
        &material.occlusion_texture,
    ]
    .into_iter()
    .flatten()
    .map(Handle::id)
}
