//! JSON-RPC 2.0 envelopes exchanged over the transport.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// JSON-RPC 2.0 protocol version.
pub const JSONRPC_VERSION: &str = "2.0";

/// Request identifier. JSON-RPC allows a string, a number or null; any
/// JSON number is echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    String(String),
    Number(Number),
    Null,
}

impl RequestId {
    /// Best-effort id recovery from a raw JSON value.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) => RequestId::String(s.clone()),
            Some(Value::Number(n)) => RequestId::Number(n.clone()),
            _ => RequestId::Null,
        }
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::String(s) => write!(f, "{s}"),
            RequestId::Number(n) => write!(f, "{n}"),
            RequestId::Null => write!(f, "null"),
        }
    }
}

/// A JSON-RPC 2.0 request message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: RequestId,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// A JSON-RPC 2.0 notification (no id, no response expected).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcNotification {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// A JSON-RPC 2.0 success response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: RequestId,
    pub result: Value,
}

/// A JSON-RPC 2.0 error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub jsonrpc: String,
    pub id: RequestId,
    pub error: JsonRpcErrorObject,
}

/// The error object within a JSON-RPC error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Any inbound message. Variant order matters for untagged decoding: a
/// message with an `id` that fails to decode as a request would otherwise
/// match `Notification`, so `framing::parse_message` rejects that case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcMessage {
    Request(JsonRpcRequest),
    Notification(JsonRpcNotification),
    Response(JsonRpcResponse),
    Error(JsonRpcError),
}

/// What the server writes back for a request.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum JsonRpcReply {
    Result(JsonRpcResponse),
    Error(JsonRpcError),
}

impl JsonRpcReply {
    pub fn id(&self) -> &RequestId {
        match self {
            JsonRpcReply::Result(r) => &r.id,
            JsonRpcReply::Error(e) => &e.id,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, JsonRpcReply::Error(_))
    }
}

impl JsonRpcResponse {
    pub fn new(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result,
        }
    }
}

impl JsonRpcError {
    pub fn new(id: RequestId, code: i32, message: String) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error: JsonRpcErrorObject {
                code,
                message,
                data: None,
            },
        }
    }
}
