//! Stdio tool server (JSON-RPC 2.0, Model Context Protocol).
//!
//! - [`protocol`]: request/response and tool schema types.
//! - [`server`]: line-oriented request loop.
//! - [`tools`]: tool definitions, parameter decoding, dispatch.
//! - [`handlers`]: the text each tool returns.

pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;

pub use server::McpServer;
pub use tools::ToolContext;
