//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, state transitions,
//! and the process-wide viewer state for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with asset loading, scene lifecycle, UI and
/// per-frame systems, plus platform-specific configurations.
pub mod app_setup;

/// Application state machine: manifest loading, then runtime execution.
pub mod app_state;

/// Selected/displayed asset names and the four viewer toggle flags.
pub mod viewer_state;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
