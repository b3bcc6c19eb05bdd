use bevy::prelude::*;

use crate::engine::core::app_state::AppState;

/// Per-frame phases of the viewer, run in order every `Update` while the
/// viewer is running. Bevy renders after `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewerTickSet {
    /// Keyboard, mouse and UI interaction.
    Input,
    /// Toggles, asset selection and finished loads.
    Apply,
    /// Mixer time and animation player speed.
    Advance,
    /// Camera auto-rotate and placement.
    Orbit,
    /// FPS and other on-screen readouts.
    Readout,
}

pub fn configure_viewer_tick(app: &mut App) {
    app.configure_sets(
        Update,
        (
            ViewerTickSet::Input,
            ViewerTickSet::Apply,
            ViewerTickSet::Advance,
            ViewerTickSet::Orbit,
            ViewerTickSet::Readout,
        )
            .chain()
            .run_if(in_state(AppState::Running)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    #[derive(Resource, Default)]
    struct Trace(Vec<ViewerTickSet>);

    fn record(set: ViewerTickSet) -> impl FnMut(ResMut<Trace>) {
        move |mut trace: ResMut<Trace>| trace.0.push(set)
    }

    fn tick_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .init_state::<AppState>()
            .init_resource::<Trace>();
        configure_viewer_tick(&mut app);

        // Registered out of order on purpose
        app.add_systems(Update, record(ViewerTickSet::Readout).in_set(ViewerTickSet::Readout))
            .add_systems(Update, record(ViewerTickSet::Orbit).in_set(ViewerTickSet::Orbit))
            .add_systems(Update, record(ViewerTickSet::Input).in_set(ViewerTickSet::Input))
            .add_systems(Update, record(ViewerTickSet::Advance).in_set(ViewerTickSet::Advance))
            .add_systems(Update, record(ViewerTickSet::Apply).in_set(ViewerTickSet::Apply));
        app
    }

    #[test]
    fn nothing_ticks_while_loading() {
        let mut app = tick_app();
        app.update();
        assert!(app.world().resource::<Trace>().0.is_empty());
    }

    #[test]
    fn phases_run_in_order_once_running() {
        let mut app = tick_app();
        app.world_mut()
            .resource_mut::<NextState<AppState>>()
            .set(AppState::Running);
        app.update();

        assert_eq!(
            app.world().resource::<Trace>().0,
            vec![
                ViewerTickSet::Input,
                ViewerTickSet::Apply,
                ViewerTickSet::Advance,
                ViewerTickSet::Orbit,
                ViewerTickSet::Readout,
            ]
        );
    }
}
