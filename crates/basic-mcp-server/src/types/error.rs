//! Protocol-level errors and their JSON-RPC codes.

use mcp_dispatch::{Category, ErrorKind, ResponseEnvelope};

use super::message::{JsonRpcError, RequestId};

/// Standard JSON-RPC 2.0 error codes.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// MCP server error codes.
pub mod mcp_error_codes {
    pub const NOT_INITIALIZED: i32 = -32002;
    pub const RESOURCE_NOT_FOUND: i32 = -32802;
    pub const TOOL_NOT_FOUND: i32 = -32803;
    pub const PROMPT_NOT_FOUND: i32 = -32804;
}

#[derive(thiserror::Error, Debug)]
pub enum McpError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Server not initialized: send `initialize` first")]
    NotInitialized,

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Prompt not found: {0}")]
    PromptNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl McpError {
    pub fn code(&self) -> i32 {
        use error_codes::*;
        use mcp_error_codes::*;
        match self {
            McpError::ParseError(_) | McpError::Json(_) => PARSE_ERROR,
            McpError::InvalidRequest(_) => INVALID_REQUEST,
            McpError::MethodNotFound(_) => METHOD_NOT_FOUND,
            McpError::InvalidParams(_) => INVALID_PARAMS,
            McpError::InternalError(_) | McpError::Io(_) => INTERNAL_ERROR,
            McpError::NotInitialized => NOT_INITIALIZED,
            McpError::ResourceNotFound(_) => RESOURCE_NOT_FOUND,
            McpError::ToolNotFound(_) => TOOL_NOT_FOUND,
            McpError::PromptNotFound(_) => PROMPT_NOT_FOUND,
        }
    }

    /// Whether this error must end the transport loop. Anything else is
    /// answered or logged and the loop continues.
    pub fn is_fatal(&self) -> bool {
        matches!(self, McpError::Io(_))
    }

    pub fn to_json_rpc_error(&self, id: RequestId) -> JsonRpcError {
        JsonRpcError::new(id, self.code(), self.to_string())
    }

    /// Map a failed dispatch for a method whose result has no `isError` flag.
    pub fn from_envelope(category: Category, name: &str, envelope: &ResponseEnvelope) -> Self {
        match envelope.error_kind() {
            Some(ErrorKind::UnknownCapability) => match category {
                Category::Tool => McpError::ToolNotFound(name.to_string()),
                Category::Resource => McpError::ResourceNotFound(name.to_string()),
                Category::Prompt => McpError::PromptNotFound(name.to_string()),
            },
            Some(ErrorKind::ResourceNotFound) => McpError::ResourceNotFound(name.to_string()),
            Some(ErrorKind::Validation) => McpError::InvalidParams(envelope.text()),
            Some(ErrorKind::NotInitialized) => McpError::NotInitialized,
            Some(ErrorKind::HandlerFailure) | None => McpError::InternalError(envelope.text()),
        }
    }
}

pub type McpResult<T> = Result<T, McpError>;

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_dispatch::DispatchError;

    #[test]
    fn test_envelope_kinds_map_to_codes() {
        let missing = ResponseEnvelope::failure(&DispatchError::ResourceNotFound("bogus://x".into()));
        let err = McpError::from_envelope(Category::Resource, "bogus://x", &missing);
        assert_eq!(err.code(), mcp_error_codes::RESOURCE_NOT_FOUND);
        assert_eq!(err.to_string(), "Resource not found: bogus://x");

        let unknown = ResponseEnvelope::failure(&DispatchError::UnknownCapability("farewell".into()));
        let err = McpError::from_envelope(Category::Prompt, "farewell", &unknown);
        assert_eq!(err.code(), mcp_error_codes::PROMPT_NOT_FOUND);

        let not_ready = ResponseEnvelope::failure(&DispatchError::NotInitialized);
        let err = McpError::from_envelope(Category::Tool, "add", &not_ready);
        assert_eq!(err.code(), mcp_error_codes::NOT_INITIALIZED);
    }

    #[test]
    fn test_only_io_errors_are_fatal() {
        assert!(McpError::Io(std::io::Error::other("broken pipe")).is_fatal());
        assert!(!McpError::ParseError("eof".into()).is_fatal());
        assert!(!McpError::NotInitialized.is_fatal());
        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!McpError::Json(json).is_fatal());
    }
}
