use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use bevy::render::camera::PerspectiveProjection;
use constants::palette::{BG_DARK, BG_LIGHT, FOG_END, FOG_START, GROUND_COLOUR};
use constants::render_settings::{
    AMBIENT_BRIGHTNESS, CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR, CAMERA_START,
    DIRECTIONAL_LIGHT_ILLUMINANCE, DIRECTIONAL_LIGHT_POSITION, GROUND_SIZE, ORBIT_TARGET,
};

use super::grid::spawn_ground_grid;
use crate::engine::camera::orbit_camera::OrbitController;
use crate::engine::core::viewer_state::ViewerState;

/// Marks the single viewer camera.
#[derive(Component)]
pub struct ViewerCamera;

/// Convert a `0xRRGGBB` value into an sRGB colour.
pub fn hex_colour(hex: u32) -> Color {
    let [_, r, g, b] = hex.to_be_bytes();
    Color::srgb_u8(r, g, b)
}

/// Clear and fog colour for the background flag.
pub fn backdrop_colour(bg_dark: bool) -> Color {
    hex_colour(if bg_dark { BG_DARK } else { BG_LIGHT })
}

pub fn spawn_environment(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    viewer_state: Res<ViewerState>,
) {
    let backdrop = backdrop_colour(viewer_state.toggles.bg_dark);
    commands.insert_resource(ClearColor(backdrop));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: AMBIENT_BRIGHTNESS,
        ..default()
    });

    commands.spawn((
        Name::new("viewer camera"),
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            ..default()
        }),
        Transform::from_translation(CAMERA_START).looking_at(ORBIT_TARGET, Vec3::Y),
        DistanceFog {
            color: backdrop,
            falloff: FogFalloff::Linear {
                start: FOG_START,
                end: FOG_END,
            },
            ..default()
        },
        OrbitController::from_position(CAMERA_START, ORBIT_TARGET),
        ViewerCamera,
    ));

    commands.spawn((
        Name::new("key light"),
        DirectionalLight {
            illuminance: DIRECTIONAL_LIGHT_ILLUMINANCE,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(DIRECTIONAL_LIGHT_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        Name::new("ground"),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(GROUND_SIZE, GROUND_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: hex_colour(GROUND_COLOUR),
            perceptual_roughness: 1.0,
            ..default()
        })),
    ));

    spawn_ground_grid(&mut commands, &mut meshes, &mut materials);
}

/// Keep the clear colour and every fog colour on the background flag.
pub fn sync_backdrop(
    viewer_state: Res<ViewerState>,
    mut clear_colour: ResMut<ClearColor>,
    mut fogs: Query<&mut DistanceFog>,
) {
    let colour = backdrop_colour(viewer_state.toggles.bg_dark);
    clear_colour.0 = colour;
    for mut fog in &mut fogs {
        fog.color = colour;
    }
}
