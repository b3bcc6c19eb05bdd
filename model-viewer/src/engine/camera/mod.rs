//! Orbit camera for inspecting the displayed model.
//!
//! Mouse orbit and dolly around a fixed target, with optional auto-rotate.

/// Orbit controller component and its input/update systems.
pub mod orbit_camera;
