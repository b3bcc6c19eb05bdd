pub const NORMAL_TIME_SCALE: f32 = 1.0;
pub const SLOW_MOTION_TIME_SCALE: f32 = 0.35;
pub const PAUSED_TIME_SCALE: f32 = 0.0;
