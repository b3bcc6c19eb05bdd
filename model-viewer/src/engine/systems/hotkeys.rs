use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::animation::controller::AnimationController;
use crate::engine::camera::orbit_camera::OrbitController;
use crate::engine::core::viewer_state::ViewerState;
use crate::engine::scene::grid::GroundGrid;
use crate::engine::scene::lifecycle::{SceneLifecycle, set_wireframe};

/// The six viewer toggles reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerAction {
    Wireframe,
    SlowMotion,
    Grid,
    AutoRotate,
    Pause,
    Background,
}

impl ViewerAction {
    /// Legend order.
    pub const ALL: [Self; 6] = [
        Self::Wireframe,
        Self::SlowMotion,
        Self::Grid,
        Self::AutoRotate,
        Self::Pause,
        Self::Background,
    ];

    pub fn key(self) -> KeyCode {
        match self {
            Self::Wireframe => KeyCode::KeyV,
            Self::SlowMotion => KeyCode::KeyL,
            Self::Grid => KeyCode::KeyG,
            Self::AutoRotate => KeyCode::KeyO,
            Self::Pause => KeyCode::KeyP,
            Self::Background => KeyCode::KeyB,
        }
    }

    pub fn from_key(key: KeyCode) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.key() == key)
    }

    /// Convert string identifier to action for RPC compatibility.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "wireframe" => Some(Self::Wireframe),
            "slow_motion" | "slowmo" => Some(Self::SlowMotion),
            "grid" => Some(Self::Grid),
            "auto_rotate" => Some(Self::AutoRotate),
            "pause" => Some(Self::Pause),
            "background" => Some(Self::Background),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Wireframe => "wireframe",
            Self::SlowMotion => "slow-mo",
            Self::Grid => "grid",
            Self::AutoRotate => "auto-rotate",
            Self::Pause => "pause",
            Self::Background => "background",
        }
    }

    pub fn key_label(self) -> &'static str {
        match self {
            Self::Wireframe => "V",
            Self::SlowMotion => "L",
            Self::Grid => "G",
            Self::AutoRotate => "O",
            Self::Pause => "P",
            Self::Background => "B",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionSource {
    Keyboard,
    Rpc,
}

/// Request to flip one viewer toggle.
#[derive(Event, Debug, Clone, Copy)]
pub struct ViewerActionEvent {
    pub action: ViewerAction,
    pub source: ActionSource,
}

/// Sent after a toggle has been applied, with the toggle's new value.
#[derive(Event, Debug, Clone, Copy)]
pub struct ViewerToggledEvent {
    pub action: ViewerAction,
    pub enabled: bool,
}

const MODIFIERS: [KeyCode; 8] = [
    KeyCode::ShiftLeft,
    KeyCode::ShiftRight,
    KeyCode::ControlLeft,
    KeyCode::ControlRight,
    KeyCode::AltLeft,
    KeyCode::AltRight,
    KeyCode::SuperLeft,
    KeyCode::SuperRight,
];

/// Map bare key presses to viewer actions.
pub fn handle_hotkeys(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut action_events: EventWriter<ViewerActionEvent>,
) {
    if keyboard.any_pressed(MODIFIERS) {
        return;
    }

    for key in keyboard.get_just_pressed() {
        if let Some(action) = ViewerAction::from_key(*key) {
            action_events.write(ViewerActionEvent {
                action,
                source: ActionSource::Keyboard,
            });
        }
    }
}

/// Apply each requested toggle exactly once.
pub fn apply_viewer_actions(
    mut commands: Commands,
    mut action_events: EventReader<ViewerActionEvent>,
    mut toggled_events: EventWriter<ViewerToggledEvent>,
    mut viewer_state: ResMut<ViewerState>,
    mut controller: ResMut<AnimationController>,
    lifecycle: Res<SceneLifecycle>,
    children: Query<&Children>,
    mesh_entities: Query<(), With<Mesh3d>>,
    mut grids: Query<&mut Visibility, With<GroundGrid>>,
    mut orbits: Query<&mut OrbitController>,
) {
    for event in action_events.read() {
        let enabled = match event.action {
            ViewerAction::Grid => {
                let mut shown = false;
                for mut visibility in &mut grids {
                    shown = *visibility == Visibility::Hidden;
                    *visibility = if shown {
                        Visibility::Visible
                    } else {
                        Visibility::Hidden
                    };
                }
                shown
            }
            ViewerAction::AutoRotate => {
                let mut rotating = false;
                for mut orbit in &mut orbits {
                    orbit.auto_rotate = !orbit.auto_rotate;
                    rotating = orbit.auto_rotate;
                }
                rotating
            }
            action => {
                let Some(enabled) = viewer_state.toggles.flip(action) else {
                    continue;
                };
                match action {
                    ViewerAction::Wireframe => {
                        if let Some(root) = lifecycle.current_root() {
                            set_wireframe(
                                &mut commands,
                                children
                                    .iter_descendants(root)
                                    .filter(|entity| mesh_entities.contains(*entity)),
                                enabled,
                            );
                        }
                    }
                    ViewerAction::SlowMotion | ViewerAction::Pause => {
                        controller.apply_toggles(&viewer_state.toggles);
                    }
                    _ => {}
                }
                enabled
            }
        };

        info!(
            "{} {} via {:?}",
            event.action.label(),
            if enabled { "on" } else { "off" },
            event.source
        );
        toggled_events.write(ViewerToggledEvent {
            action: event.action,
            enabled,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scene::lifecycle::SceneLifecycle;
    use constants::render_settings::{CAMERA_START, ORBIT_TARGET};

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<ViewerState>()
            .init_resource::<AnimationController>()
            .init_resource::<SceneLifecycle>()
            .add_event::<ViewerActionEvent>()
            .add_event::<ViewerToggledEvent>()
            .add_systems(Update, (handle_hotkeys, apply_viewer_actions).chain());
        app
    }

    fn bind_mixer(app: &mut App) {
        let toggles = app.world().resource::<ViewerState>().toggles;
        let (_, node) = AnimationGraph::from_clip(Handle::default());
        app.world_mut()
            .resource_mut::<AnimationController>()
            .bind(Handle::default(), Handle::default(), node, &toggles);
    }

    fn tap(app: &mut App, key: KeyCode) {
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(key);
        app.update();
        let mut input = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        input.release(key);
        input.clear();
    }

    fn time_scale(app: &App) -> Option<f32> {
        app.world().resource::<AnimationController>().time_scale()
    }

    #[test]
    fn every_hotkey_maps_to_one_action() {
        for action in ViewerAction::ALL {
            assert_eq!(ViewerAction::from_key(action.key()), Some(action));

            let wire_name = serde_json::to_value(action).expect("serialise action");
            assert_eq!(
                wire_name.as_str().and_then(ViewerAction::from_string),
                Some(action)
            );
        }
        assert_eq!(ViewerAction::from_key(KeyCode::KeyX), None);
    }

    #[test]
    fn pause_and_slow_motion_sequence() {
        let mut app = test_app();
        bind_mixer(&mut app);
        assert_eq!(time_scale(&app), Some(1.0));

        tap(&mut app, KeyCode::KeyP);
        assert_eq!(time_scale(&app), Some(0.0));

        tap(&mut app, KeyCode::KeyL);
        assert_eq!(time_scale(&app), Some(0.0));

        tap(&mut app, KeyCode::KeyP);
        assert_eq!(time_scale(&app), Some(0.35));
    }

    #[test]
    fn holding_a_key_flips_once() {
        let mut app = test_app();
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyV);
        app.update();
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .clear();
        app.update();

        assert!(app.world().resource::<ViewerState>().toggles.wireframe);
    }

    #[test]
    fn modified_keys_are_ignored() {
        let mut app = test_app();
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::ControlLeft);
        tap(&mut app, KeyCode::KeyB);

        assert!(!app.world().resource::<ViewerState>().toggles.bg_dark);
    }

    #[test]
    fn grid_and_auto_rotate_live_on_their_entities() {
        let mut app = test_app();
        let grid = app
            .world_mut()
            .spawn((GroundGrid, Visibility::Visible))
            .id();
        let camera = app
            .world_mut()
            .spawn(OrbitController::from_position(CAMERA_START, ORBIT_TARGET))
            .id();

        tap(&mut app, KeyCode::KeyG);
        tap(&mut app, KeyCode::KeyO);

        assert_eq!(
            app.world().get::<Visibility>(grid),
            Some(&Visibility::Hidden)
        );
        assert_eq!(
            app.world()
                .get::<OrbitController>(camera)
                .map(|orbit| orbit.auto_rotate),
            Some(true)
        );
        assert_eq!(
            app.world().resource::<ViewerState>().toggles,
            Default::default()
        );

        tap(&mut app, KeyCode::KeyG);
        assert_eq!(
            app.world().get::<Visibility>(grid),
            Some(&Visibility::Visible)
        );
    }

    #[test]
    fn rpc_actions_flip_like_keys() {
        let mut app = test_app();
        app.world_mut().send_event(ViewerActionEvent {
            action: ViewerAction::Background,
            source: ActionSource::Rpc,
        });
        app.update();

        assert!(app.world().resource::<ViewerState>().toggles.bg_dark);
    }
}
