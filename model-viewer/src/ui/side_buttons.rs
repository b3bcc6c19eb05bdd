use bevy::prelude::*;
use bevy::window::WindowResized;
use constants::layout::{SIDE_BUTTON_GAP, SIDE_BUTTON_HEIGHT};

use super::node_rect;
use super::state::{AnchorEntry, MenuBody, MenuState, SideButton, SideButtonState};

/// Top offsets, relative to the menu body, stacking `count` buttons so that
/// button `i` is centred `i * SIDE_BUTTON_GAP` below `anchor_center`.
pub fn side_button_offsets(anchor_center: f32, count: usize) -> Vec<f32> {
    (0..count)
        .map(|i| anchor_center + i as f32 * SIDE_BUTTON_GAP - SIDE_BUTTON_HEIGHT / 2.0)
        .collect()
}

pub fn apply_side_button_visibility(
    state: Res<SideButtonState>,
    mut buttons: Query<&mut Node, With<SideButton>>,
) {
    if !state.is_changed() {
        return;
    }

    let display = if state.visible { Display::Flex } else { Display::None };
    for mut node in &mut buttons {
        node.display = display;
    }
}

/// Align the side buttons with the anchor entry when they are shown, when the
/// menu opens, on window resize, and whenever the anchor's layout moves.
pub fn reanchor_side_buttons(
    state: Res<SideButtonState>,
    menu: Res<MenuState>,
    mut resized: EventReader<WindowResized>,
    anchors: Query<(Ref<ComputedNode>, &GlobalTransform), With<AnchorEntry>>,
    bodies: Query<(&ComputedNode, &GlobalTransform), With<MenuBody>>,
    mut buttons: Query<(&SideButton, &mut Node)>,
) {
    let window_resized = resized.read().count() > 0;
    if !state.visible || !menu.expanded {
        return;
    }

    let Ok((anchor_node, anchor_transform)) = anchors.single() else {
        return;
    };
    let Ok((body_node, body_transform)) = bodies.single() else {
        return;
    };

    let triggered = state.is_changed()
        || menu.is_changed()
        || window_resized
        || anchor_node.is_changed();
    if !triggered {
        return;
    }

    let anchor = node_rect(&anchor_node, anchor_transform);
    let body = node_rect(body_node, body_transform);
    let anchor_center = anchor.center().y - body.min.y;

    let offsets = side_button_offsets(anchor_center, buttons.iter().count());
    for (button, mut node) in &mut buttons {
        let Some(top) = offsets.get(button.index) else {
            continue;
        };
        if node.top != Val::Px(*top) {
            node.top = Val::Px(*top);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::catalog::AssetCatalog;
    use crate::engine::scene::lifecycle::SelectAssetEvent;
    use crate::ui::menu::{menu_entry_interaction, spawn_menu};
    use crate::ui::state::MenuEntry;
    use bevy::ecs::system::RunSystemOnce;

    fn menu_world() -> World {
        let mut world = World::new();
        world.insert_resource(AssetCatalog::default());
        world.init_resource::<MenuState>();
        world.init_resource::<SideButtonState>();
        world.init_resource::<Events<SelectAssetEvent>>();
        world
            .run_system_once(spawn_menu)
            .expect("spawn menu system runs");
        world
    }

    /// Press the entry named `name` and release every other one.
    fn press_entry(world: &mut World, name: &str) {
        let entries: Vec<(Entity, String)> = world
            .query::<(Entity, &MenuEntry)>()
            .iter(world)
            .map(|(entity, entry)| (entity, entry.0.clone()))
            .collect();
        for (entity, entry) in entries {
            let interaction = if entry == name {
                Interaction::Pressed
            } else {
                Interaction::None
            };
            world.entity_mut(entity).insert(interaction);
        }

        world
            .run_system_once(menu_entry_interaction)
            .expect("entry system runs");
        world
            .run_system_once(apply_side_button_visibility)
            .expect("visibility system runs");
    }

    fn side_button_displays(world: &mut World) -> Vec<Display> {
        world
            .query_filtered::<&Node, With<SideButton>>()
            .iter(world)
            .map(|node| node.display)
            .collect()
    }

    #[test]
    fn buttons_are_stacked_from_the_anchor_centre() {
        let offsets = side_button_offsets(100.0, 6);
        assert_eq!(offsets.len(), 6);

        let centres: Vec<f32> = offsets
            .iter()
            .map(|top| top + SIDE_BUTTON_HEIGHT / 2.0)
            .collect();
        assert_eq!(centres, vec![100.0, 146.0, 192.0, 238.0, 284.0, 330.0]);
    }

    #[test]
    fn no_buttons_no_offsets() {
        assert!(side_button_offsets(42.0, 0).is_empty());
    }

    #[test]
    fn only_the_anchor_entry_shows_all_six_buttons() {
        let mut world = menu_world();
        let names = world.resource::<AssetCatalog>().menu_assets().to_vec();

        for name in names.iter().chain([&names[0]]) {
            press_entry(&mut world, name);

            let expected = if name == "Samba Dancing" {
                Display::Flex
            } else {
                Display::None
            };
            let displays = side_button_displays(&mut world);
            assert_eq!(displays.len(), 6);
            assert!(
                displays.iter().all(|display| *display == expected),
                "after selecting {name}"
            );
        }

        let requested: Vec<String> = world
            .resource_mut::<Events<SelectAssetEvent>>()
            .drain()
            .map(|event| event.name)
            .collect();
        assert_eq!(requested.len(), names.len() + 1);
    }
}
