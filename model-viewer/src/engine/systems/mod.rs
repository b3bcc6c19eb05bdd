//! Per-frame runtime systems.
//!
//! Hotkey dispatch, FPS readouts and the ordering of the viewer's frame.

/// FPS tracking and notification systems for performance monitoring.
///
/// Sends frame rate updates to the host page via RPC and updates the on-screen readout.
pub mod fps_tracking;

/// Single-key viewer toggles (wireframe, slow motion, grid, auto-rotate, pause, background).
pub mod hotkeys;

/// Ordered system sets making up one viewer frame.
pub mod render_loop;
