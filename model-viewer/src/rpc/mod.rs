//! JSON-RPC 2.0 communication layer for embedding the viewer in a host page.
//!
//! Implements bidirectional messaging between the Bevy viewer and its parent
//! window via iframe postMessage, supporting both request-response and
//! notification patterns. On native builds the transport is a no-op.
//!
//! ## Message Flow
//!
//! ```text
//! Host page (Parent Window)  <──postMessage──>  Bevy (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ Process request
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        │ <────────── Notification (no ID) ─────┤
//! ```
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//!
//! ## Methods
//!
//! - `get_assets`: Menu entries, side-button assets and the anchor entry
//! - `select_asset { name }`: Display a catalog asset
//! - `viewer_action { action }`: Flip a toggle (`wireframe`, `slow_motion`,
//!   `grid`, `auto_rotate`, `pause`, `background`)
//! - `get_state`: Requested/displayed asset and every toggle
//! - `get_fps`: Current frame rate
//!
//! ## Notifications
//!
//! - `fps_update` every 0.5 s
//! - `asset_loaded`, `asset_load_failed`
//! - `viewer_state_changed` after each toggle

/// JSON-RPC 2.0 bidirectional communication system for host page integration.
///
/// Handles request-response patterns, notifications, and WASM message listeners.
pub mod web_rpc;
