//! Animation playback for the displayed asset.
//!
//! Owns at most one mixer, created when a loaded asset carries clips, and
//! keeps every bound `AnimationPlayer` running at the mixer's time-scale.

/// Mixer resource, time-scale function and player binding systems.
pub mod controller;
