//! Error taxonomy.
//!
//! Report loading never surfaces [`ReportError`] to tool callers; the store
//! logs it and serves an empty report. [`McpError`] covers protocol-level
//! failures only; unreadable files requested by a tool come back as text.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to read or decode a report (or ScanCode input) file.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Protocol-level failures of the tool server.
#[derive(Error, Debug)]
pub enum McpError {
    /// Request is not a valid JSON-RPC call
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Tool arguments missing or of the wrong type
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// No tool registered under this name
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl McpError {
    /// JSON-RPC error code for this failure.
    pub fn error_code(&self) -> i32 {
        match self {
            McpError::InvalidRequest(_) => -32600,
            McpError::InvalidParams(_) => -32602,
            McpError::ToolNotFound(_) => -32601,
            McpError::Json(_) => -32700,
            McpError::Io(_) => -32603,
        }
    }
}
