use bevy::prelude::*;
use bevy::ui::RelativeCursorPosition;
use constants::layout::{MENU_ENTRY_HEIGHT, MENU_WIDTH, SIDE_BUTTON_HEIGHT, SIDE_BUTTON_WIDTH};

use super::state::*;
use super::{BUTTON_HOVERED, BUTTON_IDLE, BUTTON_PRESSED, BUTTON_SELECTED, TEXT_COLOUR};
use crate::engine::assets::catalog::AssetCatalog;
use crate::engine::scene::lifecycle::{SelectAssetEvent, SelectionSource};

const MENU_TITLE: &str = "Controls";

fn title_label(expanded: bool) -> String {
    format!("{MENU_TITLE} {}", if expanded { "v" } else { "<" })
}

fn button_node(width: Val, height: f32) -> Node {
    Node {
        width,
        height: Val::Px(height),
        display: Display::Flex,
        align_items: AlignItems::Center,
        justify_content: JustifyContent::Center,
        border: UiRect::all(Val::Px(1.0)),
        ..default()
    }
}

fn label(text: impl Into<String>, size: f32) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(TEXT_COLOUR),
    )
}

// Spawns the right-side menu: title, collapsible body with the asset entries,
// and the side buttons stacked to the left of the body
pub fn spawn_menu(mut commands: Commands, catalog: Res<AssetCatalog>, menu: Res<MenuState>) {
    commands
        .spawn((
            MenuRoot,
            MenuRegion,
            BlocksOrbit,
            RelativeCursorPosition::default(),
            Name::new("ControlsMenu"),
            BackgroundColor(Color::srgb(0.10, 0.11, 0.13)),
            Node {
                width: Val::Px(MENU_WIDTH),
                position_type: PositionType::Absolute,
                right: Val::Px(0.0),
                top: Val::Px(0.0),
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Stretch,
                ..default()
            },
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    MenuTitle,
                    Button,
                    Name::new("Title"),
                    BackgroundColor(Color::srgb(0.14, 0.16, 0.20)),
                    BorderColor(Color::srgba(0.0, 0.0, 0.0, 0.25)),
                    button_node(Val::Percent(100.0), MENU_ENTRY_HEIGHT + 6.0),
                ))
                .with_children(|title| {
                    title.spawn((MenuTitleLabel, label(title_label(menu.expanded), 18.0)));
                });

            parent
                .spawn((
                    MenuBody,
                    Name::new("Body"),
                    BackgroundColor(Color::srgb(0.12, 0.13, 0.15)),
                    Node {
                        width: Val::Percent(100.0),
                        padding: UiRect::axes(Val::Px(8.0), Val::Px(8.0)),
                        row_gap: Val::Px(4.0),
                        display: if menu.expanded { Display::Flex } else { Display::None },
                        flex_direction: FlexDirection::Column,
                        ..default()
                    },
                ))
                .with_children(|body| {
                    for (index, asset) in catalog.side_button_assets().iter().enumerate() {
                        body.spawn((
                            SideButton {
                                index,
                                asset: asset.clone(),
                            },
                            MenuRegion,
                            BlocksOrbit,
                            RelativeCursorPosition::default(),
                            Button,
                            Name::new(format!("SideButton {asset}")),
                            BackgroundColor(BUTTON_IDLE),
                            BorderColor(Color::srgba(0.0, 0.0, 0.0, 0.25)),
                            Node {
                                position_type: PositionType::Absolute,
                                right: Val::Percent(100.0),
                                margin: UiRect::right(Val::Px(8.0)),
                                display: Display::None,
                                ..button_node(Val::Px(SIDE_BUTTON_WIDTH), SIDE_BUTTON_HEIGHT)
                            },
                        ))
                        .with_children(|btn| {
                            btn.spawn(label(asset.clone(), 15.0));
                        });
                    }

                    for asset in catalog.menu_assets() {
                        let mut entry = body.spawn((
                            MenuEntry(asset.clone()),
                            Button,
                            Name::new(format!("Entry {asset}")),
                            BackgroundColor(BUTTON_IDLE),
                            BorderColor(Color::srgba(0.0, 0.0, 0.0, 0.25)),
                            button_node(Val::Percent(100.0), MENU_ENTRY_HEIGHT),
                        ));
                        if catalog.is_anchor(asset) {
                            entry.insert(AnchorEntry);
                        }
                        entry.with_children(|btn| {
                            btn.spawn(label(asset.clone(), 15.0));
                        });
                    }
                });
        });
}

// Title click opens/closes the body
pub fn menu_title_interaction(
    mut q: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>, With<MenuTitle>),
    >,
    mut menu: ResMut<MenuState>,
) {
    for (interaction, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                menu.toggle();
                *bg = BackgroundColor(BUTTON_PRESSED);
            }
            Interaction::Hovered => *bg = BackgroundColor(BUTTON_HOVERED),
            Interaction::None => *bg = BackgroundColor(Color::srgb(0.14, 0.16, 0.20)),
        }
    }
}

// Entry click loads the asset and shows side buttons only for the anchor entry
pub fn menu_entry_interaction(
    mut q: Query<
        (&Interaction, &MenuEntry, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    catalog: Res<AssetCatalog>,
    mut menu: ResMut<MenuState>,
    mut side_buttons: ResMut<SideButtonState>,
    mut select_events: EventWriter<SelectAssetEvent>,
) {
    for (interaction, entry, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                let show = menu.select(&entry.0, &catalog);
                side_buttons.visible = show;
                select_events.write(SelectAssetEvent {
                    name: entry.0.clone(),
                    source: SelectionSource::Menu,
                });
                *bg = BackgroundColor(BUTTON_PRESSED);
            }
            Interaction::Hovered => *bg = BackgroundColor(BUTTON_HOVERED),
            Interaction::None => {
                let selected = menu.selected_entry.as_deref() == Some(entry.0.as_str());
                *bg = BackgroundColor(if selected { BUTTON_SELECTED } else { BUTTON_IDLE });
            }
        }
    }
}

// Side button click loads its asset; visibility is left alone
pub fn side_button_interaction(
    mut q: Query<
        (&Interaction, &SideButton, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut select_events: EventWriter<SelectAssetEvent>,
) {
    for (interaction, button, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                select_events.write(SelectAssetEvent {
                    name: button.asset.clone(),
                    source: SelectionSource::SideButton,
                });
                *bg = BackgroundColor(BUTTON_PRESSED);
            }
            Interaction::Hovered => *bg = BackgroundColor(BUTTON_HOVERED),
            Interaction::None => *bg = BackgroundColor(BUTTON_IDLE),
        }
    }
}

/// Collapse the menu on a click outside it or on Escape.
pub fn collapse_menu_on_outside_input(
    mouse_button: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    regions: Query<&RelativeCursorPosition, With<MenuRegion>>,
    mut menu: ResMut<MenuState>,
) {
    if !menu.expanded {
        return;
    }

    let clicked_outside = mouse_button.just_pressed(MouseButton::Left)
        && !regions.iter().any(RelativeCursorPosition::mouse_over);

    if clicked_outside || keyboard.just_pressed(KeyCode::Escape) {
        menu.collapse();
    }
}

pub fn apply_menu_state(
    menu: Res<MenuState>,
    mut bodies: Query<&mut Node, With<MenuBody>>,
    mut titles: Query<&mut Text, With<MenuTitleLabel>>,
    mut entries: Query<(&MenuEntry, &Interaction, &mut BackgroundColor)>,
) {
    if !menu.is_changed() {
        return;
    }

    if let Ok(mut body) = bodies.single_mut() {
        body.display = if menu.expanded { Display::Flex } else { Display::None };
    }
    for mut text in &mut titles {
        *text = Text::new(title_label(menu.expanded));
    }
    for (entry, interaction, mut bg) in &mut entries {
        if *interaction == Interaction::None {
            let selected = menu.selected_entry.as_deref() == Some(entry.0.as_str());
            *bg = BackgroundColor(if selected { BUTTON_SELECTED } else { BUTTON_IDLE });
        }
    }
}
