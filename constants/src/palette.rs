/// Light background and fog colour (sRGB hex).
pub const BG_LIGHT: u32 = 0xa0a0a0;

/// Dark background and fog colour (sRGB hex).
pub const BG_DARK: u32 = 0x070707;

pub const GROUND_COLOUR: u32 = 0x999999;

pub const GRID_LINE_COLOUR: u32 = 0x000000;
pub const GRID_LINE_ALPHA: f32 = 0.2;

/// Linear fog falloff distances in world units.
pub const FOG_START: f32 = 200.0;
pub const FOG_END: f32 = 1000.0;
