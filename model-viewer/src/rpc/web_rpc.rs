use crate::engine::animation::controller::AnimationController;
use crate::engine::assets::catalog::AssetCatalog;
use crate::engine::camera::orbit_camera::OrbitController;
use crate::engine::core::viewer_state::ViewerState;
use crate::engine::scene::grid::GroundGrid;
use crate::engine::scene::lifecycle::{
    AssetLoadFailedEvent, AssetLoadedEvent, SelectAssetEvent, SelectionSource,
};
use crate::engine::systems::fps_tracking::smoothed_fps;
use crate::engine::systems::hotkeys::{
    ActionSource, ViewerAction, ViewerActionEvent, ViewerToggledEvent,
};
use bevy::diagnostic::DiagnosticsStore;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication between the host page and Bevy.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to the host page.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Viewer mutation requested over RPC, applied through the regular event paths.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcCommand {
    SelectAsset(String),
    Action(ViewerAction),
}

/// Read-only view of the viewer used to answer requests.
pub struct RpcContext<'a> {
    pub catalog: &'a AssetCatalog,
    pub viewer_state: &'a ViewerState,
    pub time_scale: Option<f32>,
    pub grid_visible: bool,
    pub auto_rotate: bool,
    pub fps: f32,
}

/// Plugin establishing the WebRPC communication layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    (process_incoming_messages, handle_rpc_messages)
                        .chain()
                        .run_if(resource_exists::<AssetCatalog>),
                    notify_viewer_events,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(e) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", e);
        }
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing incoming RPC message from the host page.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    diagnostics: Res<DiagnosticsStore>,
    catalog: Res<AssetCatalog>,
    viewer_state: Res<ViewerState>,
    controller: Res<AnimationController>,
    grids: Query<&Visibility, With<GroundGrid>>,
    orbits: Query<&OrbitController>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut select_events: EventWriter<SelectAssetEvent>,
    mut action_events: EventWriter<ViewerActionEvent>,
) {
    let context = RpcContext {
        catalog: &catalog,
        viewer_state: &viewer_state,
        time_scale: controller.time_scale(),
        grid_visible: grids
            .iter()
            .any(|visibility| *visibility != Visibility::Hidden),
        auto_rotate: orbits.iter().any(|orbit| orbit.auto_rotate),
        fps: smoothed_fps(&diagnostics).unwrap_or(0.0) as f32,
    };
    let mut commands = Vec::new();

    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);
                if let Some(response) = handle_rpc_request(&request, &context, &mut commands) {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("Discarding malformed RPC message: {}", parse_error);
            }
        }
    }

    for command in commands {
        match command {
            RpcCommand::SelectAsset(name) => {
                select_events.write(SelectAssetEvent {
                    name,
                    source: SelectionSource::Rpc,
                });
            }
            RpcCommand::Action(action) => {
                action_events.write(ViewerActionEvent {
                    action,
                    source: ActionSource::Rpc,
                });
            }
        }
    }
}

/// Handle individual RPC request. Returns a response only for requests with IDs;
/// notifications are processed but never answered.
fn handle_rpc_request(
    request: &RpcRequest,
    context: &RpcContext,
    commands: &mut Vec<RpcCommand>,
) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "get_assets" => handle_get_assets(context.catalog),
        "select_asset" => handle_select_asset(&request.params, context.catalog, commands),
        "viewer_action" => handle_viewer_action(&request.params, commands),
        "get_state" => Ok(viewer_state_json(context)),
        "get_fps" => Ok(serde_json::json!({ "fps": context.fps })),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            Err(RpcError::method_not_found(&request.method))
        }
    };

    let id = request.id.clone()?;
    Some(match result {
        Ok(result_value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        },
        Err(error) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        },
    })
}

fn handle_get_assets(catalog: &AssetCatalog) -> Result<serde_json::Value, RpcError> {
    Ok(serde_json::json!({
        "menu": catalog.menu_assets(),
        "side_buttons": catalog.side_button_assets(),
        "anchor": catalog.anchor_asset(),
    }))
}

/// Validate the asset name against the catalog before queuing the selection.
fn handle_select_asset(
    params: &serde_json::Value,
    catalog: &AssetCatalog,
    commands: &mut Vec<RpcCommand>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct SelectAssetParams {
        name: String,
    }

    let asset_params = serde_json::from_value::<SelectAssetParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'name' parameter"))?;

    if !catalog.contains(&asset_params.name) {
        return Err(RpcError::invalid_params(&format!(
            "Unknown asset: {}",
            asset_params.name
        )));
    }

    info!("Asset selection requested via RPC: {}", asset_params.name);
    commands.push(RpcCommand::SelectAsset(asset_params.name.clone()));

    Ok(serde_json::json!({
        "success": true,
        "requested_asset": asset_params.name
    }))
}

fn handle_viewer_action(
    params: &serde_json::Value,
    commands: &mut Vec<RpcCommand>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct ViewerActionParams {
        action: String,
    }

    let action_params = serde_json::from_value::<ViewerActionParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'action' parameter"))?;

    let action = ViewerAction::from_string(&action_params.action).ok_or_else(|| {
        RpcError::invalid_params(&format!("Unknown action: {}", action_params.action))
    })?;

    commands.push(RpcCommand::Action(action));

    Ok(serde_json::json!({
        "success": true,
        "action": action
    }))
}

fn viewer_state_json(context: &RpcContext) -> serde_json::Value {
    let toggles = context.viewer_state.toggles;
    serde_json::json!({
        "requested_asset": context.viewer_state.requested_asset,
        "displayed_asset": context.viewer_state.displayed_asset,
        "wireframe": toggles.wireframe,
        "slow_mo": toggles.slow_mo,
        "paused": toggles.paused,
        "bg_dark": toggles.bg_dark,
        "grid": context.grid_visible,
        "auto_rotate": context.auto_rotate,
        "time_scale": context.time_scale,
    })
}

/// Forward swap results and toggle changes to the host page.
fn notify_viewer_events(
    mut loaded_events: EventReader<AssetLoadedEvent>,
    mut failed_events: EventReader<AssetLoadFailedEvent>,
    mut toggled_events: EventReader<ViewerToggledEvent>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in loaded_events.read() {
        rpc_interface.send_notification(
            "asset_loaded",
            serde_json::json!({
                "name": event.name,
                "has_animation": event.has_animation,
                "released": event.release,
            }),
        );
    }

    for event in failed_events.read() {
        rpc_interface.send_notification(
            "asset_load_failed",
            serde_json::json!({
                "name": event.name,
                "reason": event.reason,
            }),
        );
    }

    for event in toggled_events.read() {
        rpc_interface.send_notification(
            "viewer_state_changed",
            serde_json::json!({
                "action": event.action,
                "enabled": event.enabled,
            }),
        );
    }
}

/// Send queued notifications and responses to the host page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to parent window.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op for non-WASM targets.
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: "Method not found".to_string(),
            data: Some(serde_json::json!({ "method": method })),
        }
    }

    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: &str, params: serde_json::Value) -> RpcRequest {
        RpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: Some(serde_json::json!(7)),
        }
    }

    fn answer(
        request: &RpcRequest,
        catalog: &AssetCatalog,
        viewer_state: &ViewerState,
    ) -> (Option<RpcResponse>, Vec<RpcCommand>) {
        let context = RpcContext {
            catalog,
            viewer_state,
            time_scale: Some(1.0),
            grid_visible: true,
            auto_rotate: false,
            fps: 60.0,
        };
        let mut commands = Vec::new();
        let response = handle_rpc_request(request, &context, &mut commands);
        (response, commands)
    }

    #[test]
    fn get_assets_lists_menu_and_side_buttons() {
        let catalog = AssetCatalog::default();
        let (response, commands) = answer(
            &request("get_assets", serde_json::Value::Null),
            &catalog,
            &ViewerState::default(),
        );

        let result = response.and_then(|r| r.result).expect("result");
        assert_eq!(result["menu"][0], "Samba Dancing");
        assert_eq!(result["side_buttons"].as_array().map(Vec::len), Some(6));
        assert_eq!(result["anchor"], "Samba Dancing");
        assert!(commands.is_empty());
    }

    #[test]
    fn select_asset_validates_the_name() {
        let catalog = AssetCatalog::default();
        let state = ViewerState::default();

        let (response, commands) = answer(
            &request("select_asset", serde_json::json!({ "name": "Taunt" })),
            &catalog,
            &state,
        );
        assert!(response.is_some_and(|r| r.error.is_none()));
        assert_eq!(commands, vec![RpcCommand::SelectAsset("Taunt".to_string())]);

        let (response, commands) = answer(
            &request("select_asset", serde_json::json!({ "name": "teapot" })),
            &catalog,
            &state,
        );
        let error = response.and_then(|r| r.error).expect("error");
        assert_eq!(error.code, -32602);
        assert!(commands.is_empty());
    }

    #[test]
    fn viewer_action_accepts_wire_names() {
        let (response, commands) = answer(
            &request("viewer_action", serde_json::json!({ "action": "slow_motion" })),
            &AssetCatalog::default(),
            &ViewerState::default(),
        );

        let result = response.and_then(|r| r.result).expect("result");
        assert_eq!(result["action"], "slow_motion");
        assert_eq!(commands, vec![RpcCommand::Action(ViewerAction::SlowMotion)]);
    }

    #[test]
    fn unknown_methods_report_method_not_found() {
        let (response, _) = answer(
            &request("place_asset", serde_json::Value::Null),
            &AssetCatalog::default(),
            &ViewerState::default(),
        );
        let error = response.and_then(|r| r.error).expect("error");
        assert_eq!(error, RpcError::method_not_found("place_asset"));
    }

    #[test]
    fn notifications_are_applied_without_a_reply() {
        let mut notification = request("viewer_action", serde_json::json!({ "action": "pause" }));
        notification.id = None;

        let (response, commands) = answer(
            &notification,
            &AssetCatalog::default(),
            &ViewerState::default(),
        );
        assert!(response.is_none());
        assert_eq!(commands, vec![RpcCommand::Action(ViewerAction::Pause)]);
    }

    #[test]
    fn get_state_reports_flags_and_assets() {
        let mut state = ViewerState::default();
        state.request("vCube");
        state.mark_displayed("vCube");
        state.toggles.bg_dark = true;

        let (response, _) = answer(
            &request("get_state", serde_json::Value::Null),
            &AssetCatalog::default(),
            &state,
        );
        let result = response.and_then(|r| r.result).expect("result");
        assert_eq!(result["displayed_asset"], "vCube");
        assert_eq!(result["bg_dark"], true);
        assert_eq!(result["paused"], false);
        assert_eq!(result["grid"], true);
        assert_eq!(result["time_scale"], 1.0);
    }

    #[test]
    fn requests_without_params_parse() {
        let parsed: RpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"get_fps","id":1}"#)
                .expect("request json");
        assert!(parsed.params.is_null());
    }
}
