//! JSON-RPC envelope checks applied before routing.

use crate::types::{JsonRpcRequest, McpError, McpResult, JSONRPC_VERSION};

pub fn validate_request(request: &JsonRpcRequest) -> McpResult<()> {
    if request.jsonrpc != JSONRPC_VERSION {
        return Err(McpError::InvalidRequest(format!(
            "jsonrpc must be \"{JSONRPC_VERSION}\", got \"{}\"",
            request.jsonrpc
        )));
    }

    if request.method.trim().is_empty() {
        return Err(McpError::InvalidRequest("method must not be empty".to_string()));
    }

    Ok(())
}
