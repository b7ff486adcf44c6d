//! Infrastructure layer: configuration loading and the MCP surface.

pub mod config;
pub mod mcp;
