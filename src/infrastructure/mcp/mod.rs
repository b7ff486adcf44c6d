//! MCP protocol surface: JSON-RPC types, tool handlers, HTTP server.

pub mod handlers;
pub mod http_server;
pub mod types;

pub use handlers::AppState;
pub use http_server::{build_router, build_state, start_server};
