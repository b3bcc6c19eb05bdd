//! Scene graph management for the displayed model and its surroundings.
//!
//! Owns the asset swap protocol, resource release for detached nodes, and
//! the fixed environment (camera, lights, ground, grid).

/// Camera, lights, ground plane and background/fog colour sync.
pub mod environment;

/// Line-list reference grid over the ground plane.
pub mod grid;

/// Asset swap protocol: select, load, release the old node, attach the new one.
///
/// Also binds animation players and applies the wireframe flag once a node's
/// scene has been instantiated.
pub mod lifecycle;

/// Frees the skeletons, textures, materials and geometry of a detached node.
pub mod release;
