use std::f32::consts::PI;

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use constants::render_settings::{
    AUTO_ROTATE_SPEED, ORBIT_MAX_DISTANCE, ORBIT_MAX_PITCH, ORBIT_MIN_DISTANCE, ORBIT_MIN_PITCH,
    ORBIT_ROTATE_SENSITIVITY,
};

use crate::ui::PointerOverUi;

// Distance multiplier per scroll line
const ZOOM_STEP: f32 = 0.95;

/// Orbit state of the viewer camera around a fixed target.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct OrbitController {
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
}

impl OrbitController {
    /// Derive orbit angles from a camera placed at `position` looking at `target`.
    pub fn from_position(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length().max(ORBIT_MIN_DISTANCE);

        Self {
            target,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            distance,
            auto_rotate: false,
            auto_rotate_speed: AUTO_ROTATE_SPEED,
        }
    }

    /// Auto-rotate rate in radians per second; speed 2.0 is one turn per 30 s.
    pub fn auto_rotate_rate(&self) -> f32 {
        PI * self.auto_rotate_speed / 30.0
    }

    /// Per-frame update: advances yaw while auto-rotating.
    pub fn update(&mut self, delta: f32) {
        if self.auto_rotate {
            self.yaw -= self.auto_rotate_rate() * delta;
        }
    }

    /// Orbit by a mouse drag of `delta` pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        self.yaw -= delta.x * ORBIT_ROTATE_SENSITIVITY;
        self.pitch = (self.pitch + delta.y * ORBIT_ROTATE_SENSITIVITY)
            .clamp(ORBIT_MIN_PITCH, ORBIT_MAX_PITCH);
    }

    /// Dolly in for positive `lines`, out for negative.
    pub fn zoom(&mut self, lines: f32) {
        self.distance =
            (self.distance * ZOOM_STEP.powf(lines)).clamp(ORBIT_MIN_DISTANCE, ORBIT_MAX_DISTANCE);
    }

    pub fn translation(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target
            + self.distance * Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    pub fn apply(&self, transform: &mut Transform) {
        *transform =
            Transform::from_translation(self.translation()).looking_at(self.target, Vec3::Y);
    }
}

/// Left-drag orbits and the wheel dollies. Drags that begin over the UI
/// are ignored until the button is released.
pub fn orbit_input_system(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    pointer_over_ui: Res<PointerOverUi>,
    mut dragging: Local<bool>,
    mut controllers: Query<&mut OrbitController>,
) {
    if mouse_button.just_pressed(MouseButton::Left) {
        *dragging = !pointer_over_ui.0;
    }
    if !mouse_button.pressed(MouseButton::Left) {
        *dragging = false;
    }

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }
    if pointer_over_ui.0 {
        scroll_accum = 0.0;
    }

    let Ok(mut controller) = controllers.single_mut() else {
        return;
    };

    if *dragging && mouse_delta != Vec2::ZERO {
        controller.rotate(mouse_delta);
    }
    if scroll_accum.abs() > f32::EPSILON {
        controller.zoom(scroll_accum);
    }
}

/// Advance auto-rotate and place the camera.
pub fn orbit_update_system(
    time: Res<Time>,
    mut cameras: Query<(&mut OrbitController, &mut Transform)>,
) {
    for (mut controller, mut transform) in &mut cameras {
        controller.update(time.delta_secs());
        controller.apply(&mut transform);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use constants::render_settings::{CAMERA_START, ORBIT_TARGET};

    #[test]
    fn start_position_round_trips() {
        let controller = OrbitController::from_position(CAMERA_START, ORBIT_TARGET);
        assert!(controller.translation().distance(CAMERA_START) < 1e-3);
        assert!(!controller.auto_rotate);
    }

    #[test]
    fn auto_rotate_turns_at_the_configured_rate() {
        let mut controller = OrbitController::from_position(CAMERA_START, ORBIT_TARGET);
        let yaw = controller.yaw;

        controller.update(1.0);
        assert_eq!(controller.yaw, yaw);

        controller.auto_rotate = true;
        controller.update(1.0);
        let expected = PI * AUTO_ROTATE_SPEED / 30.0;
        assert!((yaw - controller.yaw - expected).abs() < 1e-6);

        let distance = controller.translation().distance(ORBIT_TARGET);
        assert!((distance - controller.distance).abs() < 1e-3);
    }

    #[test]
    fn zoom_and_pitch_are_clamped() {
        let mut controller = OrbitController::from_position(CAMERA_START, ORBIT_TARGET);

        controller.zoom(1_000.0);
        assert_eq!(controller.distance, ORBIT_MIN_DISTANCE);
        controller.zoom(-1_000.0);
        assert_eq!(controller.distance, ORBIT_MAX_DISTANCE);

        controller.rotate(Vec2::new(0.0, 10_000.0));
        assert_eq!(controller.pitch, ORBIT_MAX_PITCH);
        controller.rotate(Vec2::new(0.0, -10_000.0));
        assert_eq!(controller.pitch, ORBIT_MIN_PITCH);
    }

    #[test]
    fn applied_transform_faces_the_target() {
        let controller = OrbitController::from_position(CAMERA_START, ORBIT_TARGET);
        let mut transform = Transform::default();
        controller.apply(&mut transform);

        let to_target = (ORBIT_TARGET - transform.translation).normalize();
        assert!(transform.forward().dot(to_target) > 0.999);
    }
}
