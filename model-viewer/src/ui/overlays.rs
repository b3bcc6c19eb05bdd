use bevy::prelude::*;
use constants::layout::TOAST_SECONDS;

use super::TEXT_COLOUR;
use crate::engine::scene::lifecycle::AssetLoadFailedEvent;
use crate::engine::systems::fps_tracking::FpsText;
use crate::engine::systems::hotkeys::ViewerAction;

#[derive(Component)]
pub struct HotkeyLegend;
#[derive(Component)]
pub struct ErrorToast;
#[derive(Component)]
pub struct ErrorToastText;

/// Message shown in the error toast and the time it has left.
#[derive(Resource, Debug, Default)]
pub struct Toast {
    message: Option<String>,
    remaining: f32,
}

impl Toast {
    pub fn show(&mut self, message: String) {
        self.message = Some(message);
        self.remaining = TOAST_SECONDS;
    }

    /// Count down by `delta` seconds. Returns `true` when the toast just expired.
    pub fn tick(&mut self, delta: f32) -> bool {
        if self.message.is_none() {
            return false;
        }
        self.remaining -= delta;
        if self.remaining <= 0.0 {
            self.message = None;
            self.remaining = 0.0;
            return true;
        }
        false
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// One line listing every hotkey, in legend order.
pub fn legend_text() -> String {
    ViewerAction::ALL
        .iter()
        .map(|action| format!("{} {}", action.key_label(), action.label()))
        .collect::<Vec<_>>()
        .join("   ")
}

pub fn spawn_overlays(mut commands: Commands) {
    // Hotkey legend, bottom centre
    commands
        .spawn((
            Name::new("HotkeyLegend"),
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(8.0),
                left: Val::Px(0.0),
                right: Val::Px(0.0),
                justify_content: JustifyContent::Center,
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                HotkeyLegend,
                Text::new(legend_text()),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(TEXT_COLOUR),
                BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.45)),
                Node {
                    padding: UiRect::axes(Val::Px(10.0), Val::Px(4.0)),
                    ..default()
                },
            ));
        });

    // FPS readout, bottom right
    commands.spawn((
        FpsText,
        Name::new("FpsText"),
        Text::new("FPS: --"),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(TEXT_COLOUR),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(8.0),
            right: Val::Px(8.0),
            ..default()
        },
    ));

    // Error toast, top centre, hidden until a load fails
    commands
        .spawn((
            ErrorToast,
            Name::new("ErrorToast"),
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(12.0),
                left: Val::Px(0.0),
                right: Val::Px(0.0),
                justify_content: JustifyContent::Center,
                display: Display::None,
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                ErrorToastText,
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(TEXT_COLOUR),
                BackgroundColor(Color::srgba(0.45, 0.08, 0.08, 0.9)),
                Node {
                    padding: UiRect::axes(Val::Px(12.0), Val::Px(6.0)),
                    ..default()
                },
            ));
        });
}

pub fn show_load_failure_toast(
    mut failed_events: EventReader<AssetLoadFailedEvent>,
    mut toast: ResMut<Toast>,
    mut toasts: Query<&mut Node, With<ErrorToast>>,
    mut texts: Query<&mut Text, With<ErrorToastText>>,
) {
    let Some(event) = failed_events.read().last() else {
        return;
    };

    toast.show(format!("Could not load \"{}\": {}", event.name, event.reason));
    for mut text in &mut texts {
        text.0 = toast.message().unwrap_or_default().to_string();
    }
    for mut node in &mut toasts {
        node.display = Display::Flex;
    }
}

pub fn tick_toast(
    time: Res<Time>,
    mut toast: ResMut<Toast>,
    mut toasts: Query<&mut Node, With<ErrorToast>>,
) {
    if toast.message().is_none() {
        return;
    }
    if toast.tick(time.delta_secs()) {
        for mut node in &mut toasts {
            node.display = Display::None;
        }
    }
}
