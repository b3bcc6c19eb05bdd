//! Fixed settings shared by the viewer crates.
//!
//! Values here are compile-time defaults. The asset catalog can be
//! overridden at runtime by the viewer manifest; everything else is fixed.

/// Default asset catalog: menu entries, side-button assets and path parts.
pub mod catalog;

/// Menu, side-button and morph-panel layout metrics.
pub mod layout;

/// Background, fog, ground and grid colours.
pub mod palette;

/// Animation time-scale values for normal, slow-motion and paused playback.
pub mod playback;

/// Camera, orbit, light and ground settings.
pub mod render_settings;
