/// Flat reference grid drawn over the ground plane
use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::view::NoFrustumCulling;
use constants::palette::{GRID_LINE_ALPHA, GRID_LINE_COLOUR};
use constants::render_settings::{GRID_DIVISIONS, GRID_SIZE};

use super::environment::hex_colour;

// Keeps the lines from z-fighting with the ground plane
const GRID_LIFT: f32 = 0.5;

#[derive(Component)]
pub struct GroundGrid;

/// Spawn the ground grid as a single line-list mesh.
pub fn spawn_ground_grid(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> Entity {
    let grid_material = materials.add(StandardMaterial {
        base_color: hex_colour(GRID_LINE_COLOUR).with_alpha(GRID_LINE_ALPHA),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    commands
        .spawn((
            Name::new("ground grid"),
            Mesh3d(meshes.add(create_grid_mesh(GRID_SIZE, GRID_DIVISIONS))),
            MeshMaterial3d(grid_material),
            Visibility::Visible,
            NoFrustumCulling,
            Transform::from_xyz(0.0, GRID_LIFT, 0.0),
            GroundGrid,
        ))
        .id()
}

/// Line endpoints for a square grid centred on the origin in the XZ plane.
/// Each of the `divisions + 1` positions per axis yields one line along X and
/// one along Z.
pub fn grid_line_vertices(size: f32, divisions: u32) -> Vec<[f32; 3]> {
    let half = size / 2.0;
    let step = size / divisions.max(1) as f32;
    let mut vertices = Vec::with_capacity((divisions as usize + 1) * 4);

    for i in 0..=divisions {
        let offset = -half + i as f32 * step;

        // Line running along Z (fixed X)
        vertices.push([offset, 0.0, -half]);
        vertices.push([offset, 0.0, half]);

        // Line running along X (fixed Z)
        vertices.push([-half, 0.0, offset]);
        vertices.push([half, 0.0, offset]);
    }

    vertices
}

fn create_grid_mesh(size: f32, divisions: u32) -> Mesh {
    let vertices = grid_line_vertices(size, divisions);
    let indices = (0..vertices.len() as u32).collect();

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vertices);
    mesh.insert_indices(Indices::U32(indices));

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_two_lines_per_division_boundary() {
        let vertices = grid_line_vertices(2000.0, 20);
        assert_eq!(vertices.len(), 21 * 4);
    }

    #[test]
    fn grid_spans_the_requested_size() {
        let vertices = grid_line_vertices(2000.0, 20);
        let max_x = vertices.iter().map(|v| v[0]).fold(f32::MIN, f32::max);
        let min_z = vertices.iter().map(|v| v[2]).fold(f32::MAX, f32::min);

        assert_eq!(max_x, 1000.0);
        assert_eq!(min_z, -1000.0);
        assert!(vertices.iter().all(|v| v[1] == 0.0));
    }

    #[test]
    fn grid_lines_are_evenly_spaced() {
        let vertices = grid_line_vertices(2000.0, 20);
        // First vertex of consecutive Z-running lines
        assert_eq!(vertices[0][0], -1000.0);
        assert_eq!(vertices[4][0], -900.0);
    }
}
