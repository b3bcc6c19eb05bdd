/// Vertical distance between stacked side buttons, in logical pixels.
pub const SIDE_BUTTON_GAP: f32 = 46.0;
pub const SIDE_BUTTON_WIDTH: f32 = 150.0;
pub const SIDE_BUTTON_HEIGHT: f32 = 36.0;

pub const MENU_WIDTH: f32 = 220.0;
pub const MENU_ENTRY_HEIGHT: f32 = 30.0;

pub const MORPH_PANEL_WIDTH: f32 = 260.0;
pub const MORPH_SLIDER_WIDTH: f32 = 120.0;
pub const MORPH_SLIDER_HEIGHT: f32 = 12.0;

/// Morph slider range and step.
pub const MORPH_MIN: f32 = 0.0;
pub const MORPH_MAX: f32 = 1.0;
pub const MORPH_STEP: f32 = 0.01;

/// How long a load error stays on screen, in seconds.
pub const TOAST_SECONDS: f32 = 4.0;
