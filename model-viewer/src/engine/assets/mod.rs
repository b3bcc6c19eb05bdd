//! Asset catalog: which models the viewer offers and where their files live.
//!
//! The catalog comes from the viewer manifest when it loads and validates,
//! otherwise from the built-in defaults.

/// Viewer manifest asset, validated catalog resource and path resolution.
pub mod catalog;
