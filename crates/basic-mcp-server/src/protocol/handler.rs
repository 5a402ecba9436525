//! Receives JSON-RPC messages and routes them to the dispatcher.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use mcp_dispatch::{Category, DispatchError, Dispatcher, Request, ResponseEnvelope};

use crate::config::ServerConfig;
use crate::session::{SessionManager, SessionState};
use crate::types::*;

use super::negotiation::negotiate;
use super::validator::validate_request;

/// Methods that touch a capability category. All of them require a
/// completed handshake and an enabled category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CapabilityMethod {
    ToolsList,
    ToolsCall,
    ResourcesList,
    ResourcesRead,
    PromptsList,
    PromptsGet,
}

impl CapabilityMethod {
    fn parse(method: &str) -> Option<Self> {
        Some(match method {
            "tools/list" => Self::ToolsList,
            "tools/call" => Self::ToolsCall,
            "resources/list" => Self::ResourcesList,
            "resources/read" => Self::ResourcesRead,
            "prompts/list" => Self::PromptsList,
            "prompts/get" => Self::PromptsGet,
            _ => return None,
        })
    }

    fn category(self) -> Category {
        match self {
            Self::ToolsList | Self::ToolsCall => Category::Tool,
            Self::ResourcesList | Self::ResourcesRead => Category::Resource,
            Self::PromptsList | Self::PromptsGet => Category::Prompt,
        }
    }
}

/// Protocol front end. Owns the session; shares the dispatcher and config.
pub struct ProtocolHandler {
    dispatcher: Arc<Dispatcher>,
    config: Arc<ServerConfig>,
    session: SessionManager,
}

impl ProtocolHandler {
    pub fn new(dispatcher: Arc<Dispatcher>, config: Arc<ServerConfig>) -> Self {
        Self {
            dispatcher,
            config,
            session: SessionManager::new(),
        }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Handle one inbound message. Notifications and stray responses
    /// produce no reply.
    pub async fn handle_message(&self, msg: JsonRpcMessage) -> Option<JsonRpcReply> {
        match msg {
            JsonRpcMessage::Request(req) => Some(self.handle_request(req).await),
            JsonRpcMessage::Notification(notif) => {
                self.handle_notification(notif);
                None
            }
            JsonRpcMessage::Response(_) | JsonRpcMessage::Error(_) => {
                tracing::warn!("Ignoring response message sent by client");
                None
            }
        }
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcReply {
        if let Err(e) = validate_request(&request) {
            return JsonRpcReply::Error(e.to_json_rpc_error(request.id));
        }

        let id = request.id.clone();
        match self.dispatch_request(&request).await {
            Ok(value) => JsonRpcReply::Result(JsonRpcResponse::new(id, value)),
            Err(e) => {
                tracing::debug!("{} (id {id}) failed: {e}", request.method);
                JsonRpcReply::Error(e.to_json_rpc_error(id))
            }
        }
    }

    async fn dispatch_request(&self, request: &JsonRpcRequest) -> McpResult<Value> {
        let params = request.params.clone();
        match request.method.as_str() {
            "initialize" => self.handle_initialize(params),
            "ping" => Ok(Value::Object(serde_json::Map::new())),
            method => match CapabilityMethod::parse(method) {
                Some(m) if self.config.capabilities.contains(m.category()) => {
                    self.handle_capability(m, params).await
                }
                _ => Err(McpError::MethodNotFound(method.to_string())),
            },
        }
    }

    async fn handle_capability(&self, method: CapabilityMethod, params: Option<Value>) -> McpResult<Value> {
        if self.session.state() == SessionState::Uninitialized {
            tracing::warn!("{method:?} rejected: session not initialized");
            return match method {
                CapabilityMethod::ToolsCall => to_result(ResponseEnvelope::failure(&DispatchError::NotInitialized)),
                _ => Err(McpError::NotInitialized),
            };
        }

        match method {
            CapabilityMethod::ToolsList => self.handle_tools_list(),
            CapabilityMethod::ToolsCall => self.handle_tools_call(params).await,
            CapabilityMethod::ResourcesList => self.handle_resources_list(),
            CapabilityMethod::ResourcesRead => self.handle_resources_read(params).await,
            CapabilityMethod::PromptsList => self.handle_prompts_list(),
            CapabilityMethod::PromptsGet => self.handle_prompts_get(params).await,
        }
    }

    fn handle_notification(&self, notification: JsonRpcNotification) {
        match notification.method.as_str() {
            "notifications/initialized" | "initialized" => match self.session.state() {
                SessionState::Ready => tracing::info!("Client confirmed initialization"),
                SessionState::Uninitialized => {
                    tracing::warn!("Received initialized notification before initialize")
                }
            },
            "notifications/cancelled" => {
                match notification.params.map(serde_json::from_value::<CancelledParams>) {
                    Some(Ok(p)) => tracing::info!(
                        "Client cancelled request {}: {}",
                        p.request_id,
                        p.reason.as_deref().unwrap_or("no reason given")
                    ),
                    _ => tracing::info!("Received cancellation notification"),
                }
            }
            other => tracing::debug!("Unknown notification: {other}"),
        }
    }

    fn handle_initialize(&self, params: Option<Value>) -> McpResult<Value> {
        let init_params: InitializeParams = parse_params(params, "initialize")?;

        if self.session.state() == SessionState::Ready {
            return Err(McpError::InvalidRequest("session already initialized".to_string()));
        }

        let (session, result) = negotiate(init_params, &self.config);
        self.session.establish(session)?;
        to_result(result)
    }

    fn handle_tools_list(&self) -> McpResult<Value> {
        to_result(ToolListResult {
            tools: self.list(Category::Tool),
        })
    }

    async fn handle_tools_call(&self, params: Option<Value>) -> McpResult<Value> {
        let call: ToolCallParams = parse_params(params, "tools/call")?;

        let envelope = match into_arguments(call.arguments) {
            Ok(arguments) => self.dispatcher.dispatch(Request::tool(call.name, arguments)).await,
            Err(e) => ResponseEnvelope::failure(&DispatchError::Validation(e)),
        };
        to_result(envelope)
    }

    fn handle_resources_list(&self) -> McpResult<Value> {
        to_result(ResourceListResult {
            resources: self.list(Category::Resource),
        })
    }

    async fn handle_resources_read(&self, params: Option<Value>) -> McpResult<Value> {
        let read: ResourceReadParams = parse_params(params, "resources/read")?;

        let envelope = self.dispatcher.dispatch(Request::resource(read.uri.as_str())).await;
        if envelope.is_error {
            return Err(McpError::from_envelope(Category::Resource, &read.uri, &envelope));
        }

        let mime_type = self
            .dispatcher
            .describe(Category::Resource, &read.uri)
            .and_then(|d| d.mime_type.as_deref());
        to_result(ReadResourceResult::from_content(&read.uri, mime_type, envelope.content))
    }

    fn handle_prompts_list(&self) -> McpResult<Value> {
        to_result(PromptListResult {
            prompts: self.list(Category::Prompt),
        })
    }

    async fn handle_prompts_get(&self, params: Option<Value>) -> McpResult<Value> {
        let get: PromptGetParams = parse_params(params, "prompts/get")?;
        let arguments = into_arguments(get.arguments).map_err(|e| McpError::InvalidParams(e.to_string()))?;

        let envelope = self
            .dispatcher
            .dispatch(Request::prompt(get.name.as_str(), arguments))
            .await;
        if envelope.is_error {
            return Err(McpError::from_envelope(Category::Prompt, &get.name, &envelope));
        }

        let description = self
            .dispatcher
            .describe(Category::Prompt, &get.name)
            .map(|d| d.description.as_str())
            .unwrap_or_default();
        to_result(PromptGetResult::from_content(description, envelope.content))
    }

    fn list<'a, T>(&'a self, category: Category) -> Vec<T>
    where
        T: From<&'a mcp_dispatch::CapabilityDescriptor>,
    {
        self.dispatcher.list(category).iter().map(T::from).collect()
    }
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>, method: &str) -> McpResult<T> {
    params
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| McpError::InvalidParams(e.to_string()))?
        .ok_or_else(|| McpError::InvalidParams(format!("{method} params required")))
}

fn to_result<T: Serialize>(value: T) -> McpResult<Value> {
    serde_json::to_value(value).map_err(|e| McpError::InternalError(e.to_string()))
}
