use bevy::prelude::*;
use serde::Serialize;

use crate::engine::animation::controller::time_scale;
use crate::engine::systems::hotkeys::ViewerAction;

/// The four viewer flags that outlive asset swaps.
///
/// Grid visibility and camera auto-rotate are not stored here; they live on
/// the grid entity and the orbit controller they affect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ViewerToggles {
    pub wireframe: bool,
    pub slow_mo: bool,
    pub paused: bool,
    pub bg_dark: bool,
}

impl ViewerToggles {
    /// Flip the flag owned by `action` and return its new value.
    /// Returns `None` for actions whose state lives elsewhere.
    pub fn flip(&mut self, action: ViewerAction) -> Option<bool> {
        let flag = match action {
            ViewerAction::Wireframe => &mut self.wireframe,
            ViewerAction::SlowMotion => &mut self.slow_mo,
            ViewerAction::Pause => &mut self.paused,
            ViewerAction::Background => &mut self.bg_dark,
            ViewerAction::Grid | ViewerAction::AutoRotate => return None,
        };
        *flag = !*flag;
        Some(*flag)
    }

    /// Mixer time-scale implied by the pause and slow-motion flags.
    pub fn time_scale(&self) -> f32 {
        time_scale(self.paused, self.slow_mo)
    }
}

/// Process-wide viewer state.
#[derive(Resource, Debug, Default)]
pub struct ViewerState {
    /// Most recently requested asset, whether or not it has loaded yet.
    pub requested_asset: Option<String>,
    /// Asset currently attached to the scene.
    pub displayed_asset: Option<String>,
    pub toggles: ViewerToggles,
}

impl ViewerState {
    pub fn request(&mut self, name: &str) {
        self.requested_asset = Some(name.to_string());
    }

    pub fn mark_displayed(&mut self, name: &str) {
        self.displayed_asset = Some(name.to_string());
    }

    /// Undo a request that failed to load.
    pub fn revert_request(&mut self) {
        self.requested_asset = self.displayed_asset.clone();
    }
}
