//! MCP server implementation

use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::error::McpError;
use crate::mcp::protocol::*;
use crate::mcp::tools::{self, ToolContext};

/// Handles Model Context Protocol requests, one JSON object per line.
pub struct McpServer {
    ctx: ToolContext,
}

impl McpServer {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }

    /// Serve stdin/stdout until stdin closes.
    pub async fn run(&self) -> Result<(), McpError> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<(), McpError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("MCP server started");

        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }

            let response = match std::str::from_utf8(&buf) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    debug!("Received request: {}", line);
                    self.handle_line(line).await
                }
                Err(e) => {
                    error!("Request is not valid UTF-8: {}", e);
                    Some(JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {}", e)))
                }
            };

            if let Some(response) = response {
                let response_str = serde_json::to_string(&response)?;
                writer.write_all(response_str.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
                debug!("Sent response: {}", response_str);
            }
        }

        info!("MCP server stopped");
        Ok(())
    }

    /// Response for one raw input line; `None` for notifications.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                return Some(JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {}", e)));
            }
        };

        let id = value.get("id").filter(|id| !id.is_null()).cloned();
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                let e = McpError::InvalidRequest(e.to_string());
                warn!(error = %e, "malformed request");
                Some(JsonRpcResponse::error(id, e.error_code(), e.to_string()))
            }
        }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        // notifications never get a response
        let id = request.id?;

        if request.jsonrpc != "2.0" {
            let e = McpError::InvalidRequest(format!("unsupported jsonrpc version '{}'", request.jsonrpc));
            return Some(JsonRpcResponse::error(Some(id), e.error_code(), e.to_string()));
        }

        let response = match request.method.as_str() {
            "initialize" => to_response(Some(id), &initialize_response()),
            "ping" => JsonRpcResponse::success(Some(id), serde_json::json!({})),
            "tools/list" => {
                let list = ToolListResponse { tools: tools::definitions() };
                to_response(Some(id), &list)
            }
            "tools/call" => self.handle_tool_call(id, request.params).await,
            other => JsonRpcResponse::error(
                Some(id),
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            ),
        };
        Some(response)
    }

    async fn handle_tool_call(&self, id: Value, params: Value) -> JsonRpcResponse {
        let params: CallToolParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => {
                return JsonRpcResponse::error(
                    Some(id),
                    INVALID_PARAMS,
                    format!("Missing tool name: {}", e),
                )
            }
        };

        info!(tool = %params.name, "tools/call");
        if !self.ctx.store.is_loaded() {
            debug!("report not loaded yet, answering from an empty report");
        }

        match tools::call(&self.ctx, &params.name, params.arguments).await {
            Ok(text) => to_response(Some(id), &CallToolResult::text(text)),
            Err(e) => {
                warn!(tool = %params.name, error = %e, "tool call rejected");
                JsonRpcResponse::error(Some(id), e.error_code(), e.to_string())
            }
        }
    }
}

fn initialize_response() -> InitializeResponse {
    InitializeResponse {
        protocol_version: PROTOCOL_VERSION,
        server_info: ServerInfo {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        },
        capabilities: Capabilities {
            tools: ToolsCapability { list_changed: false },
        },
    }
}

fn to_response<T: Serialize>(id: Option<Value>, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, -32603, format!("Internal error: {}", e)),
    }
}
