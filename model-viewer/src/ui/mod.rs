//! On-screen viewer UI built from Bevy UI nodes.
//!
//! Right-side asset menu with its side buttons, the morph target panel, and
//! the passive overlays (hotkey legend, FPS readout, error toast).

/// Right-side menu: title, asset entries, outside-click and Escape collapse.
pub mod menu;

/// Morph target sliders rebuilt for every displayed asset.
///
/// One group per morph-capable mesh, one slider per target, bound live to the weights.
pub mod morph_panel;

/// Hotkey legend, FPS readout and the auto-hiding error toast.
pub mod overlays;

/// Side buttons shown next to the anchor menu entry.
pub mod side_buttons;

/// UI resources and marker components.
pub mod state;

use bevy::prelude::*;
use bevy::ui::RelativeCursorPosition;

pub use state::PointerOverUi;

use crate::engine::core::app_state::AppState;
use crate::engine::systems::render_loop::ViewerTickSet;

use menu::{
    apply_menu_state, collapse_menu_on_outside_input, menu_entry_interaction,
    menu_title_interaction, side_button_interaction, spawn_menu,
};
use morph_panel::{
    clear_morph_controls, morph_slider_interaction, rebuild_morph_controls,
    reflect_morph_sliders, spawn_morph_panel,
};
use overlays::{Toast, show_load_failure_toast, spawn_overlays, tick_toast};
use side_buttons::{apply_side_button_visibility, reanchor_side_buttons};
use state::{BlocksOrbit, MenuState, SideButtonState};

pub const TEXT_COLOUR: Color = Color::srgb(1.0, 1.0, 1.0);
pub const BUTTON_IDLE: Color = Color::srgb(0.22, 0.24, 0.28);
pub const BUTTON_HOVERED: Color = Color::srgb(0.26, 0.28, 0.32);
pub const BUTTON_PRESSED: Color = Color::srgb(0.18, 0.20, 0.24);
pub const BUTTON_SELECTED: Color = Color::srgb(0.30, 0.34, 0.40);

/// Logical-pixel rectangle of a laid-out UI node, y pointing down.
pub fn node_rect(node: &ComputedNode, transform: &GlobalTransform) -> Rect {
    let scale = node.inverse_scale_factor();
    Rect::from_center_size(
        transform.translation().truncate() * scale,
        node.size() * scale,
    )
}

pub fn update_pointer_over_ui(
    regions: Query<&RelativeCursorPosition, With<BlocksOrbit>>,
    mut pointer: ResMut<PointerOverUi>,
) {
    let over = regions.iter().any(RelativeCursorPosition::mouse_over);
    pointer.set_if_neq(PointerOverUi(over));
}

// Registers the viewer UI, its resources, and systems.
pub struct ViewerUiPlugin;

impl Plugin for ViewerUiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MenuState>()
            .init_resource::<SideButtonState>()
            .init_resource::<PointerOverUi>()
            .init_resource::<Toast>()
            .add_systems(Startup, spawn_overlays)
            .add_systems(OnEnter(AppState::Running), (spawn_menu, spawn_morph_panel))
            .add_systems(
                Update,
                (
                    update_pointer_over_ui,
                    menu_title_interaction,
                    menu_entry_interaction,
                    side_button_interaction,
                    collapse_menu_on_outside_input,
                    morph_slider_interaction,
                )
                    .in_set(ViewerTickSet::Input),
            )
            .add_systems(
                Update,
                (
                    (
                        apply_menu_state,
                        apply_side_button_visibility,
                        reanchor_side_buttons,
                    )
                        .chain(),
                    (
                        clear_morph_controls,
                        rebuild_morph_controls,
                        reflect_morph_sliders,
                    )
                        .chain(),
                    (show_load_failure_toast, tick_toast).chain(),
                )
                    .in_set(ViewerTickSet::Readout),
            );
    }
}
