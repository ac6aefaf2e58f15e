//! JSON-RPC 2.0 bridge between the engine and its embedding web page.
//!
//! The presentation layer (gallery, search bar, filter chips, viewer chrome)
//! lives in the host page. It drives the engine through iframe postMessage and
//! receives lifecycle updates as notifications.
//!
//! ## Message Flow
//!
//! ```text
//! Host page (parent)  <──postMessage──>  Engine (iframe)
//!        │                                      │
//!        ├─ Request (with ID) ────────────────> │
//!        │                                      ├─ parse_rpc_command
//!        │                                      ├─ write ViewerCommand / DiscoveryCommand
//!        │ <─────────────── Response (with ID) ─┤
//!        │                                      │
//!        │ <──────────── Notification (no ID) ──┤
//! ```
//!
//! Requests are handled before the engine's command set runs, so an
//! `open_artifact` takes effect in the same frame it arrives. The `get_*`
//! queries are held back and answered after the engine's clocks, so a batch
//! such as `open_artifact` then `get_viewer_state` reports Loading. Their
//! responses follow the responses to the frame's other requests; match them
//! by id.
//!
//! Every posted message is also written as an `OutgoingRpcMessage` event for
//! native hosts.
//!
//! ## Adding New RPC Methods
//!
//! 1. Add a variant to `RpcCommand` and a `match` arm in `parse_rpc_command()`
//!    that deserializes and validates its params.
//! 2. Handle the variant in `execute_rpc_command()` by writing an engine
//!    event or mutating the store. Read-only methods go in `answer_query()`
//!    and are listed in `RpcCommand::is_query()`.
//!
//! ```rust,ignore
//! "your_method" => {
//!     let p: YourParams = parse(params, "'field' parameter")?;
//!     RpcCommand::YourMethod(p.field)
//! }
//! ```
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32600`: Invalid request (unparseable JSON, wrong `jsonrpc` version)
//! - `-32601`: Method not found
//! - `-32602`: Invalid params, including unknown artifact ids, view modes,
//!   sort orders and filter fields
//! - `-32603`: Internal error (catalog not loaded yet)
//!
//! ## Methods
//!
//! ### Viewer
//! - `open_artifact { id }`: Start a generation session for an artifact
//! - `close_artifact`: Close the viewer
//! - `set_view_mode { mode }`: `3d`, `hologram` or `wireframe`; ignored unless Ready
//! - `get_viewer_state`: Phase, artifact, mode, token and generation timing
//!
//! ### Discovery
//! - `submit_query { query }`: Run a simulated catalog search
//! - `clear_query`: Drop the query and any in-flight search
//! - `set_filter { field, value }`: `culture`, `category` or `sort`
//! - `get_display_set`: Filtered and sorted artifacts for the gallery
//!
//! ### Collection
//! - `toggle_save { id }`: Flip the saved flag, returns the new value
//! - `get_catalog_tables`: Facets, collections, languages, featured and saved ids
//!
//! ## Notifications
//!
//! - `viewer_phase_changed`: Every Idle/Loading/Ready transition and mode switch
//! - `search_completed`: The latest search applied its results

/// JSON-RPC 2.0 request parsing, dispatch and postMessage transport.
pub mod web_rpc;
