//! Newline-delimited JSON framing.

use serde::Serialize;
use serde_json::Value;

use crate::types::{JsonRpcMessage, McpError, McpResult, RequestId};

/// Decode one line. Malformed JSON is a parse error; well-formed JSON that
/// is not a JSON-RPC message is an invalid request. A notification never
/// carries an `id`, so an `id` that is not a string, number or null makes
/// the line an invalid request rather than a notification.
pub fn parse_message(line: &str) -> McpResult<JsonRpcMessage> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(McpError::ParseError("Empty message".to_string()));
    }

    let value: Value = serde_json::from_str(trimmed).map_err(|e| McpError::ParseError(e.to_string()))?;
    let has_id = value.get("id").is_some();
    let message: JsonRpcMessage = serde_json::from_value(value).map_err(|_| {
        McpError::InvalidRequest("not a JSON-RPC 2.0 request or notification".to_string())
    })?;

    match message {
        JsonRpcMessage::Notification(_) if has_id => Err(McpError::InvalidRequest(
            "request id must be a string, number or null".to_string(),
        )),
        message => Ok(message),
    }
}

/// Recover the request id from a line that failed to decode, so the error
/// reply can still be correlated. Falls back to `null`.
pub fn recover_id(line: &str) -> RequestId {
    serde_json::from_str::<Value>(line.trim())
        .ok()
        .map(|v| RequestId::from_value(v.get("id")))
        .unwrap_or(RequestId::Null)
}

/// Serialize to a single JSON line with a trailing newline.
pub fn frame_message<T: Serialize>(message: &T) -> McpResult<String> {
    let mut json = serde_json::to_string(message).map_err(McpError::Json)?;
    json.push('\n');
    Ok(json)
}
