//! Loading systems for the viewer manifest and the displayed model.
//!
//! The manifest is loaded once at startup; models are loaded on demand,
//! one request in flight at a time.

/// Viewer manifest loading with fallback to the built-in catalog.
///
/// Moves the application into the running state once the catalog is known.
pub mod manifest_loader;

/// Asynchronous model loading through the glTF loader.
///
/// Tracks the single in-flight request and reports readiness or failure.
pub mod model_loader;
