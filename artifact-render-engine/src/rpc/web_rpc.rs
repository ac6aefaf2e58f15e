use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::catalog::ArtifactId;
use crate::engine::core::plugin::EngineSet;
use crate::engine::discovery::filters::{Facet, SortOrder};
use crate::engine::discovery::search::DiscoveryPipeline;
use crate::engine::discovery::systems::{DiscoveryCommand, SearchCompleted};
use crate::engine::store::ArtifactStore;
use crate::engine::viewer::lifecycle::{ViewMode, ViewerLifecycle};
use crate::engine::viewer::systems::{ViewerCommand, ViewerPhaseChanged};
use crate::error::EngineError;

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
    pub params: Value,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<Value>,
    pub error: Option<RpcError>,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: Value,
}

/// JSON-RPC error structure following specification.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<Value>,
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_request(message: &str) -> Self {
        Self {
            code: -32600,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: "Method not found".to_string(),
            data: Some(json!({ "method": method })),
        }
    }

    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}

impl From<EngineError> for RpcError {
    fn from(err: EngineError) -> Self {
        Self::invalid_params(&err.to_string())
    }
}

/// Facet or sort change requested through `set_filter`.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterChange {
    Culture(Facet),
    Category(Facet),
    Sort(SortOrder),
}

/// Decoded RPC method with validated parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcCommand {
    OpenArtifact(ArtifactId),
    CloseArtifact,
    SetViewMode(ViewMode),
    SubmitQuery(String),
    ClearQuery,
    SetFilter(FilterChange),
    ToggleSave(ArtifactId),
    GetViewerState,
    GetDisplaySet,
    GetCatalogTables,
}

/// Map a method name and params onto an [`RpcCommand`].
pub fn parse_rpc_command(method: &str, params: &Value) -> Result<RpcCommand, RpcError> {
    #[derive(Deserialize)]
    struct IdParams {
        id: u32,
    }

    #[derive(Deserialize)]
    struct ModeParams {
        mode: String,
    }

    #[derive(Deserialize)]
    struct QueryParams {
        query: String,
    }

    #[derive(Deserialize)]
    struct FilterParams {
        field: String,
        value: String,
    }

    fn parse<T: for<'de> Deserialize<'de>>(params: &Value, expected: &str) -> Result<T, RpcError> {
        serde_json::from_value::<T>(params.clone())
            .map_err(|_| RpcError::invalid_params(&format!("Expected {expected}")))
    }

    let command = match method {
        "open_artifact" => {
            let p: IdParams = parse(params, "'id' parameter")?;
            RpcCommand::OpenArtifact(ArtifactId(p.id))
        }
        "close_artifact" => RpcCommand::CloseArtifact,
        "set_view_mode" => {
            let p: ModeParams = parse(params, "'mode' parameter")?;
            RpcCommand::SetViewMode(ViewMode::from_name(&p.mode)?)
        }
        "submit_query" => {
            let p: QueryParams = parse(params, "'query' parameter")?;
            RpcCommand::SubmitQuery(p.query)
        }
        "clear_query" => RpcCommand::ClearQuery,
        "set_filter" => {
            let p: FilterParams = parse(params, "'field' and 'value' parameters")?;
            let change = match p.field.as_str() {
                "culture" => FilterChange::Culture(Facet::from(p.value)),
                "category" => FilterChange::Category(Facet::from(p.value)),
                "sort" => FilterChange::Sort(SortOrder::from_name(&p.value)?),
                _ => return Err(EngineError::UnknownFilterField(p.field.clone()).into()),
            };
            RpcCommand::SetFilter(change)
        }
        "toggle_save" => {
            let p: IdParams = parse(params, "'id' parameter")?;
            RpcCommand::ToggleSave(ArtifactId(p.id))
        }
        "get_viewer_state" => RpcCommand::GetViewerState,
        "get_display_set" => RpcCommand::GetDisplaySet,
        "get_catalog_tables" => RpcCommand::GetCatalogTables,
        _ => return Err(RpcError::method_not_found(method)),
    };

    Ok(command)
}

impl RpcCommand {
    /// Read-only methods, answered once the frame's commands have applied.
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            Self::GetViewerState | Self::GetDisplaySet | Self::GetCatalogTables
        )
    }
}

/// Resource managing bidirectional RPC communication between the web host and Bevy.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
    deferred_queries: Vec<(Value, RpcCommand)>,
}

impl WebRpcInterface {
    /// Send notification to the host without expecting response.
    pub fn send_notification(&mut self, method: &str, params: Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to the host.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }

    pub fn pending_notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }

    pub fn pending_responses(&self) -> &[RpcResponse] {
        &self.outgoing_responses
    }
}

/// Plugin establishing WebRPC communication layer for iframe-based deployment.
///
/// Requests are applied before the engine's command systems so their effects
/// land in the same frame. Queries are answered after the clocks, together
/// with the notification flush, so they see those effects.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_event::<OutgoingRpcMessage>()
            .add_systems(
                Update,
                (process_incoming_messages, handle_rpc_messages)
                    .chain()
                    .before(EngineSet::Commands),
            )
            .add_systems(
                Update,
                (
                    answer_deferred_queries,
                    forward_engine_notifications,
                    send_outgoing_messages,
                )
                    .chain()
                    .after(EngineSet::Clocks),
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

/// Raw RPC message text received from the host.
#[derive(Event, Debug, Clone)]
pub struct IncomingRpcMessage {
    pub content: String,
}

/// Serialized response or notification as posted to the host.
#[derive(Event, Debug, Clone)]
pub struct OutgoingRpcMessage {
    pub content: String,
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
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut viewer_commands: EventWriter<ViewerCommand>,
    mut discovery_commands: EventWriter<DiscoveryCommand>,
    mut store: Option<ResMut<ArtifactStore>>,
    pipeline: Option<Res<DiscoveryPipeline>>,
    lifecycle: Res<ViewerLifecycle>,
) {
    for event in events.read() {
        let request = match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) if request.jsonrpc == "2.0" => request,
            Ok(request) => {
                rpc_interface.queue_response(create_error_response(
                    request.id.unwrap_or(Value::Null),
                    RpcError::invalid_request("Unsupported jsonrpc version"),
                ));
                continue;
            }
            Err(parse_error) => {
                warn!("Unparseable RPC message: {}", parse_error);
                rpc_interface.queue_response(create_error_response(
                    Value::Null,
                    RpcError::invalid_request(&parse_error.to_string()),
                ));
                continue;
            }
        };

        debug!("Processing RPC method: {}", request.method);

        let command = match parse_rpc_command(&request.method, &request.params) {
            Ok(command) if command.is_query() => {
                // A query without an id has nobody to answer.
                if let Some(id) = request.id {
                    rpc_interface.deferred_queries.push((id, command));
                }
                continue;
            }
            other => other,
        };

        let result = command.and_then(|command| {
            execute_rpc_command(
                command,
                &mut viewer_commands,
                &mut discovery_commands,
                store.as_deref_mut(),
                pipeline.as_deref(),
                &lifecycle,
            )
        });

        if let Err(error) = &result {
            warn!("RPC {} failed: {}", request.method, error.message);
        }

        // Only generate responses for requests with IDs (notifications have no ID).
        if let Some(id) = request.id {
            let response = match result {
                Ok(value) => RpcResponse {
                    jsonrpc: "2.0".to_string(),
                    result: Some(value),
                    error: None,
                    id: Some(id),
                },
                Err(error) => create_error_response(id, error),
            };
            rpc_interface.queue_response(response);
        }
    }
}

fn execute_rpc_command(
    command: RpcCommand,
    viewer_commands: &mut EventWriter<ViewerCommand>,
    discovery_commands: &mut EventWriter<DiscoveryCommand>,
    store: Option<&mut ArtifactStore>,
    pipeline: Option<&DiscoveryPipeline>,
    lifecycle: &ViewerLifecycle,
) -> Result<Value, RpcError> {
    match command {
        RpcCommand::OpenArtifact(id) => {
            let store = store.ok_or_else(catalog_not_loaded)?;
            if !store.catalog().contains(id) {
                return Err(EngineError::ArtifactNotFound(id).into());
            }
            viewer_commands.write(ViewerCommand::Open(id));
            Ok(json!({ "success": true, "id": id }))
        }
        RpcCommand::CloseArtifact => {
            viewer_commands.write(ViewerCommand::Close);
            Ok(json!({ "success": true }))
        }
        RpcCommand::SetViewMode(mode) => {
            viewer_commands.write(ViewerCommand::SetViewMode(mode));
            Ok(json!({ "success": true, "accepted": lifecycle.is_ready(), "mode": mode }))
        }
        RpcCommand::SubmitQuery(query) => {
            let accepted = !query.trim().is_empty();
            discovery_commands.write(DiscoveryCommand::Submit(query));
            Ok(json!({ "success": true, "accepted": accepted }))
        }
        RpcCommand::ClearQuery => {
            discovery_commands.write(DiscoveryCommand::Clear);
            Ok(json!({ "success": true }))
        }
        RpcCommand::SetFilter(change) => {
            discovery_commands.write(match change {
                FilterChange::Culture(facet) => DiscoveryCommand::SetCulture(facet),
                FilterChange::Category(facet) => DiscoveryCommand::SetCategory(facet),
                FilterChange::Sort(sort) => DiscoveryCommand::SetSort(sort),
            });
            Ok(json!({ "success": true }))
        }
        RpcCommand::ToggleSave(id) => {
            let store = store.ok_or_else(catalog_not_loaded)?;
            let saved = store.toggle_save(id);
            Ok(json!({ "id": id, "saved": saved }))
        }
        query => answer_query(query, store.map(|s| &*s), pipeline, lifecycle),
    }
}

/// Answer queries deferred by `handle_rpc_messages`.
fn answer_deferred_queries(
    mut rpc_interface: ResMut<WebRpcInterface>,
    store: Option<Res<ArtifactStore>>,
    pipeline: Option<Res<DiscoveryPipeline>>,
    lifecycle: Res<ViewerLifecycle>,
) {
    let queries = std::mem::take(&mut rpc_interface.deferred_queries);
    for (id, query) in queries {
        let response = match answer_query(query, store.as_deref(), pipeline.as_deref(), &lifecycle)
        {
            Ok(value) => RpcResponse {
                jsonrpc: "2.0".to_string(),
                result: Some(value),
                error: None,
                id: Some(id),
            },
            Err(error) => create_error_response(id, error),
        };
        rpc_interface.queue_response(response);
    }
}

fn answer_query(
    query: RpcCommand,
    store: Option<&ArtifactStore>,
    pipeline: Option<&DiscoveryPipeline>,
    lifecycle: &ViewerLifecycle,
) -> Result<Value, RpcError> {
    match query {
        RpcCommand::GetViewerState => {
            let snapshot = ViewerPhaseChanged::snapshot(lifecycle);
            Ok(json!({
                "phase": snapshot.phase,
                "artifact_id": snapshot.artifact_id,
                "view_mode": snapshot.view_mode,
                "token": snapshot.token,
                "elapsed_ms": lifecycle.elapsed().map(|d| d.as_millis() as u64),
                "remaining_ms": lifecycle.remaining().map(|d| d.as_millis() as u64),
            }))
        }
        RpcCommand::GetDisplaySet => {
            let pipeline = pipeline.ok_or_else(catalog_not_loaded)?;
            Ok(json!({
                "query": pipeline.state().query,
                "phase": pipeline.phase(),
                "filters": pipeline.filters(),
                "artifacts": pipeline.display_set(),
            }))
        }
        RpcCommand::GetCatalogTables => {
            let store = store.ok_or_else(catalog_not_loaded)?;
            let catalog = store.catalog();
            let featured: Vec<ArtifactId> = catalog.featured().iter().map(|a| a.id).collect();
            let saved: Vec<ArtifactId> = store.saved_artifacts().iter().map(|a| a.id).collect();
            Ok(json!({
                "cultures": catalog.cultures(),
                "categories": catalog.categories(),
                "collections": catalog.collections(),
                "languages": catalog.languages(),
                "featured": featured,
                "saved": saved,
            }))
        }
        other => Err(RpcError::internal_error(&format!(
            "{other:?} is not a query"
        ))),
    }
}

fn catalog_not_loaded() -> RpcError {
    RpcError::internal_error("Catalog not loaded")
}

/// Relay engine events to the host as notifications.
fn forward_engine_notifications(
    mut phase_events: EventReader<ViewerPhaseChanged>,
    mut search_events: EventReader<SearchCompleted>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in phase_events.read() {
        match serde_json::to_value(event) {
            Ok(params) => rpc_interface.send_notification("viewer_phase_changed", params),
            Err(e) => error!("Failed to serialize viewer notification: {}", e),
        }
    }

    for event in search_events.read() {
        match serde_json::to_value(event) {
            Ok(params) => rpc_interface.send_notification("search_completed", params),
            Err(e) => error!("Failed to serialize search notification: {}", e),
        }
    }
}

/// Create standardized error response.
fn create_error_response(id: Value, error: RpcError) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(error),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the host.
fn send_outgoing_messages(
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut outgoing: EventWriter<OutgoingRpcMessage>,
) {
    let notifications = std::mem::take(&mut rpc_interface.outgoing_notifications);
    let responses = std::mem::take(&mut rpc_interface.outgoing_responses);

    // Send notifications first.
    for notification in &notifications {
        post_serialized(notification, &mut outgoing);
    }

    // Send responses second to maintain order.
    for response in &responses {
        post_serialized(response, &mut outgoing);
    }
}

fn post_serialized<T: Serialize>(message: &T, outgoing: &mut EventWriter<OutgoingRpcMessage>) {
    match serde_json::to_string(message) {
        Ok(json) => {
            send_message_to_parent(&json);
            outgoing.write(OutgoingRpcMessage { content: json });
        }
        Err(e) => {
            error!("Failed to serialize message: {}", e);
        }
    }
}

/// Send serialized message to parent window.
fn send_message_to_parent(json: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = window() {
            if let Some(parent) = window.parent().ok().flatten() {
                if let Err(e) = parent.post_message(&JsValue::from_str(json), "*") {
                    error!("Failed to send message to parent: {:?}", e);
                }
            } else {
                warn!("No parent window available for message transmission");
            }
        } else {
            error!("Window object not available");
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op for non-WASM targets.
        let _ = json;
    }
}
