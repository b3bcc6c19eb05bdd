use bevy::math::Vec3;

pub const CAMERA_FOV_DEGREES: f32 = 45.0;
pub const CAMERA_NEAR: f32 = 1.0;
pub const CAMERA_FAR: f32 = 2000.0;
pub const CAMERA_START: Vec3 = Vec3::new(100.0, 200.0, 300.0);

/// Point the orbit controller looks at and rotates around.
pub const ORBIT_TARGET: Vec3 = Vec3::new(0.0, 100.0, 0.0);

/// Auto-rotate speed. 2.0 is one orbit every 30 seconds.
pub const AUTO_ROTATE_SPEED: f32 = 1.6;

pub const ORBIT_MIN_DISTANCE: f32 = 10.0;
pub const ORBIT_MAX_DISTANCE: f32 = 1500.0;
pub const ORBIT_MIN_PITCH: f32 = -1.55;
pub const ORBIT_MAX_PITCH: f32 = 1.55;
pub const ORBIT_ROTATE_SENSITIVITY: f32 = 0.005;

pub const GROUND_SIZE: f32 = 2000.0;
pub const GRID_SIZE: f32 = 2000.0;
pub const GRID_DIVISIONS: u32 = 20;

pub const DIRECTIONAL_LIGHT_POSITION: Vec3 = Vec3::new(0.0, 200.0, 100.0);
pub const DIRECTIONAL_LIGHT_ILLUMINANCE: f32 = 4_000.0;
pub const AMBIENT_BRIGHTNESS: f32 = 600.0;
