//! Protocol integration tests: handshake, capability methods, error mapping.

use serde_json::{json, Value};

use basic_mcp_server::config::{CategorySet, ServerConfig};
use basic_mcp_server::session::SessionState;
use basic_mcp_server::types::*;
use basic_mcp_server::{build_handler, ProtocolHandler};

// ─────────────────────── helpers ───────────────────────

fn handler() -> ProtocolHandler {
    build_handler(ServerConfig::default()).unwrap()
}

fn mcp_request(id: i64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
}

fn init_request(version: &str) -> Value {
    mcp_request(
        0,
        "initialize",
        json!({
            "protocolVersion": version,
            "capabilities": {},
            "clientInfo": { "name": "test-client", "version": "1.0" }
        }),
    )
}

fn call_tool(id: i64, name: &str, arguments: Value) -> Value {
    mcp_request(id, "tools/call", json!({"name": name, "arguments": arguments}))
}

async fn send(handler: &ProtocolHandler, msg: Value) -> Option<Value> {
    let parsed: JsonRpcMessage = serde_json::from_value(msg).unwrap();
    handler
        .handle_message(parsed)
        .await
        .map(|reply| serde_json::to_value(reply).unwrap())
}

async fn send_unwrap(handler: &ProtocolHandler, msg: Value) -> Value {
    send(handler, msg).await.expect("expected response")
}

async fn ready_handler() -> ProtocolHandler {
    let handler = handler();
    let resp = send_unwrap(&handler, init_request("2025-06-18")).await;
    assert!(resp.get("result").is_some(), "initialize failed: {resp}");
    handler
}

fn text_of(result: &Value) -> &str {
    result["content"][0]["text"].as_str().unwrap()
}

// ─────────────────────── handshake ───────────────────────

#[tokio::test]
async fn test_initialize_echoes_supported_version() {
    let handler = handler();
    let resp = send_unwrap(&handler, init_request("2024-11-05")).await;

    assert_eq!(resp["id"], 0);
    assert_eq!(resp["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(resp["result"]["serverInfo"]["name"], "basic-mcp-server");
    let caps = &resp["result"]["capabilities"];
    assert!(caps.get("tools").is_some());
    assert!(caps.get("resources").is_some());
    assert!(caps.get("prompts").is_some());
    assert_eq!(handler.session().state(), SessionState::Ready);
}

#[tokio::test]
async fn test_initialize_unknown_version_offers_latest() {
    let handler = handler();
    let resp = send_unwrap(&handler, init_request("2000-01-01")).await;
    assert_eq!(resp["result"]["protocolVersion"], LATEST_PROTOCOL_VERSION);
}

#[tokio::test]
async fn test_second_initialize_rejected() {
    let handler = ready_handler().await;
    let resp = send_unwrap(&handler, init_request("2024-11-05")).await;
    assert_eq!(resp["error"]["code"], -32600);

    let session = handler.session().session().unwrap();
    assert_eq!(session.protocol_version, "2025-06-18");
}

#[tokio::test]
async fn test_initialize_without_params() {
    let handler = handler();
    let resp = send_unwrap(&handler, json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"})).await;
    assert_eq!(resp["error"]["code"], -32602);
    assert_eq!(handler.session().state(), SessionState::Uninitialized);
}

#[tokio::test]
async fn test_notifications_get_no_reply() {
    let handler = ready_handler().await;
    let initialized = json!({"jsonrpc": "2.0", "method": "notifications/initialized"});
    assert!(send(&handler, initialized).await.is_none());

    let cancelled = json!({
        "jsonrpc": "2.0",
        "method": "notifications/cancelled",
        "params": {"requestId": 7, "reason": "user aborted"}
    });
    assert!(send(&handler, cancelled).await.is_none());
}

// ─────────────────────── session gating ───────────────────────

#[tokio::test]
async fn test_every_category_rejected_before_initialize() {
    let handler = handler();

    let resp = send_unwrap(&handler, call_tool(1, "add", json!({"a": 1, "b": 2}))).await;
    assert_eq!(resp["result"]["isError"], true);
    assert!(text_of(&resp["result"]).contains("not initialized"));

    for (id, method, params) in [
        (2, "tools/list", json!({})),
        (3, "resources/list", json!({})),
        (4, "resources/read", json!({"uri": "text://welcome"})),
        (5, "prompts/list", json!({})),
        (6, "prompts/get", json!({"name": "greeting", "arguments": {"name": "A"}})),
    ] {
        let resp = send_unwrap(&handler, mcp_request(id, method, params)).await;
        assert_eq!(resp["error"]["code"], -32002, "{method} was not rejected");
    }
}

#[tokio::test]
async fn test_ping_allowed_before_initialize() {
    let handler = handler();
    let resp = send_unwrap(&handler, mcp_request(1, "ping", json!({}))).await;
    assert_eq!(resp["result"], json!({}));
}

// ─────────────────────── tools ───────────────────────

#[tokio::test]
async fn test_tools_list_is_stable_and_ordered() {
    let handler = ready_handler().await;
    let first = send_unwrap(&handler, mcp_request(1, "tools/list", json!({}))).await;
    let second = send_unwrap(&handler, mcp_request(2, "tools/list", json!({}))).await;
    assert_eq!(first["result"], second["result"]);

    let names: Vec<&str> = first["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["echo", "add", "hello", "calculate", "current_time"]);

    let add = &first["result"]["tools"][1];
    assert_eq!(add["inputSchema"]["type"], "object");
    assert_eq!(add["inputSchema"]["required"], json!(["a", "b"]));
}

#[tokio::test]
async fn test_add_success() {
    let handler = ready_handler().await;
    let resp = send_unwrap(&handler, call_tool(1, "add", json!({"a": 2, "b": 3}))).await;
    assert_eq!(resp["result"]["isError"], false);
    assert_eq!(text_of(&resp["result"]), "2 + 3 = 5");
}

#[tokio::test]
async fn test_add_missing_argument() {
    let handler = ready_handler().await;
    let resp = send_unwrap(&handler, call_tool(1, "add", json!({"a": 2}))).await;
    assert_eq!(resp["result"]["isError"], true);
    assert_eq!(
        text_of(&resp["result"]),
        "invalid arguments: missing required argument `b`"
    );
}

#[tokio::test]
async fn test_add_wrong_type() {
    let handler = ready_handler().await;
    let resp = send_unwrap(&handler, call_tool(1, "add", json!({"a": "2", "b": 3}))).await;
    assert_eq!(resp["result"]["isError"], true);
    assert!(text_of(&resp["result"]).contains("`a` must be of type number, got string"));
}

#[tokio::test]
async fn test_unknown_tool_is_error_envelope() {
    let handler = ready_handler().await;
    let resp = send_unwrap(&handler, call_tool(1, "subtract", json!({"a": 5, "b": 3}))).await;
    assert!(resp.get("error").is_none());
    assert_eq!(resp["result"]["isError"], true);
    assert_eq!(text_of(&resp["result"]), "unknown capability `subtract`");
}

#[tokio::test]
async fn test_non_object_arguments() {
    let handler = ready_handler().await;
    let resp = send_unwrap(&handler, call_tool(1, "echo", json!("hello"))).await;
    assert_eq!(resp["result"]["isError"], true);
    assert!(text_of(&resp["result"]).contains("must be of type object, got string"));
}

#[tokio::test]
async fn test_current_time_enum_checked() {
    let handler = ready_handler().await;
    let resp = send_unwrap(&handler, call_tool(1, "current_time", json!({"format": "unix"}))).await;
    assert_eq!(resp["result"]["isError"], true);
    assert!(text_of(&resp["result"]).contains("must be one of"));

    let resp = send_unwrap(&handler, call_tool(2, "current_time", json!({"format": "japanese"}))).await;
    assert_eq!(resp["result"]["isError"], false);
    assert!(text_of(&resp["result"]).contains('年'));
}

#[tokio::test]
async fn test_calculate_failure_keeps_session_alive() {
    let handler = ready_handler().await;
    let resp = send_unwrap(&handler, call_tool(1, "calculate", json!({"expression": "1/0"}))).await;
    assert_eq!(resp["result"]["isError"], true);
    assert_eq!(
        text_of(&resp["result"]),
        "handler failed: calculation error: division by zero"
    );

    let resp = send_unwrap(&handler, call_tool(2, "calculate", json!({"expression": "6*7"}))).await;
    assert_eq!(text_of(&resp["result"]), "6*7 = 42");
}

// ─────────────────────── resources ───────────────────────

#[tokio::test]
async fn test_resources_list() {
    let handler = ready_handler().await;
    let resp = send_unwrap(&handler, mcp_request(1, "resources/list", json!({}))).await;
    let resources = resp["result"]["resources"].as_array().unwrap();
    assert_eq!(resources.len(), 2);
    assert_eq!(resources[0]["uri"], "text://welcome");
    assert_eq!(resources[0]["mimeType"], "text/plain");
    assert_eq!(resources[1]["uri"], "json://server_info");
}

#[tokio::test]
async fn test_read_welcome() {
    let handler = ready_handler().await;
    let resp = send_unwrap(&handler, mcp_request(1, "resources/read", json!({"uri": "text://welcome"}))).await;
    let contents = &resp["result"]["contents"][0];
    assert_eq!(contents["uri"], "text://welcome");
    assert_eq!(contents["mimeType"], "text/plain");
    assert!(!contents["text"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_read_server_info_is_json() {
    let handler = ready_handler().await;
    let resp = send_unwrap(&handler, mcp_request(1, "resources/read", json!({"uri": "json://server_info"}))).await;
    let text = resp["result"]["contents"][0]["text"].as_str().unwrap();
    let info: Value = serde_json::from_str(text).unwrap();
    assert_eq!(info["name"], "basic-mcp-server");
    assert_eq!(info["capabilities"], json!(["tools", "resources", "prompts"]));
}

#[tokio::test]
async fn test_read_unknown_resource() {
    let handler = ready_handler().await;
    let resp = send_unwrap(&handler, mcp_request(1, "resources/read", json!({"uri": "bogus://x"}))).await;
    assert_eq!(resp["error"]["code"], -32802);
    assert!(resp["error"]["message"].as_str().unwrap().contains("bogus://x"));
}

// ─────────────────────── prompts ───────────────────────

#[tokio::test]
async fn test_prompts_list_arguments() {
    let handler = ready_handler().await;
    let resp = send_unwrap(&handler, mcp_request(1, "prompts/list", json!({}))).await;
    let greeting = &resp["result"]["prompts"][0];
    assert_eq!(greeting["name"], "greeting");
    assert_eq!(greeting["arguments"][0]["name"], "name");
    assert_eq!(greeting["arguments"][0]["required"], true);
    assert_eq!(greeting["arguments"][1]["required"], false);
}

#[tokio::test]
async fn test_prompts_get() {
    let handler = ready_handler().await;
    let resp = send_unwrap(
        &handler,
        mcp_request(1, "prompts/get", json!({"name": "greeting", "arguments": {"name": "Ren", "time_of_day": "evening"}})),
    )
    .await;
    let result = &resp["result"];
    assert!(!result["description"].as_str().unwrap().is_empty());
    assert_eq!(result["messages"][0]["role"], "user");
    assert_eq!(result["messages"][0]["content"]["type"], "text");
    assert!(result["messages"][0]["content"]["text"]
        .as_str()
        .unwrap()
        .starts_with("Good evening, Ren."));
}

#[tokio::test]
async fn test_prompts_get_errors() {
    let handler = ready_handler().await;
    let resp = send_unwrap(&handler, mcp_request(1, "prompts/get", json!({"name": "greeting"}))).await;
    assert_eq!(resp["error"]["code"], -32602);
    assert!(resp["error"]["message"].as_str().unwrap().contains("`name`"));

    let resp = send_unwrap(&handler, mcp_request(2, "prompts/get", json!({"name": "farewell"}))).await;
    assert_eq!(resp["error"]["code"], -32804);
}

// ─────────────────────── configuration ───────────────────────

#[tokio::test]
async fn test_disabled_category_not_served() {
    let config = ServerConfig {
        capabilities: CategorySet {
            tools: true,
            resources: false,
            prompts: true,
        },
        ..ServerConfig::default()
    };
    let handler = build_handler(config).unwrap();
    let resp = send_unwrap(&handler, init_request("2025-06-18")).await;
    assert!(resp["result"]["capabilities"].get("resources").is_none());

    let resp = send_unwrap(&handler, mcp_request(1, "resources/list", json!({}))).await;
    assert_eq!(resp["error"]["code"], -32601);

    let resp = send_unwrap(&handler, mcp_request(2, "tools/list", json!({}))).await;
    assert!(resp.get("result").is_some());
}

#[tokio::test]
async fn test_unknown_method() {
    let handler = ready_handler().await;
    let resp = send_unwrap(&handler, mcp_request(1, "sampling/createMessage", json!({}))).await;
    assert_eq!(resp["error"]["code"], -32601);
}

#[tokio::test]
async fn test_bad_jsonrpc_version() {
    let handler = ready_handler().await;
    let resp = send_unwrap(&handler, json!({"jsonrpc": "1.0", "id": 9, "method": "ping"})).await;
    assert_eq!(resp["id"], 9);
    assert_eq!(resp["error"]["code"], -32600);
}
