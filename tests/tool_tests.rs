//! Tool surface and MCP dispatch tests against an in-memory engine
//!
//! Run with: cargo test --test tool_tests

mod common;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::{session, EngineCall, FakeEngine};
use mcp_mem0::mcp::tools::{get_all_memories, save_memory, search_memories};
use mcp_mem0::mcp::{McpHandler, McpRequest, MemoryToolHandler, StdioServer, ToolOutcome};
use mcp_mem0::types::MemoryMessage;

fn request(id: Option<i64>, method: &str, params: Value) -> McpRequest {
    McpRequest {
        jsonrpc: "2.0".to_string(),
        id: id.map(|i| json!(i)),
        method: method.to_string(),
        params,
    }
}

// ============================================================================
// save_memory
// ============================================================================

#[tokio::test]
async fn save_defaults_to_sentinel_user() {
    let engine = FakeEngine::returning(json!({"results": []}));
    let outcome = save_memory(&session(&engine), "hello", None).await;

    assert_eq!(
        outcome,
        ToolOutcome::Success("Successfully saved memory for user: hello".to_string())
    );
    assert_eq!(
        engine.calls(),
        vec![EngineCall::Add {
            messages: vec![MemoryMessage::user("hello")],
            user_id: "user".to_string(),
        }]
    );
}

#[tokio::test]
async fn save_scopes_to_given_user() {
    let engine = FakeEngine::returning(json!({"results": []}));
    let outcome = save_memory(&session(&engine), "hello", Some("alice")).await;

    assert!(outcome.text().contains("alice"));
    assert!(matches!(
        &engine.calls()[0],
        EngineCall::Add { user_id, .. } if user_id == "alice"
    ));

    // Empty id falls back to the default
    save_memory(&session(&engine), "again", Some("")).await;
    assert!(matches!(
        &engine.calls()[1],
        EngineCall::Add { user_id, .. } if user_id == "user"
    ));
}

#[tokio::test]
async fn save_truncates_long_text_in_confirmation() {
    let engine = FakeEngine::returning(json!({}));
    let text = "x".repeat(150);
    let outcome = save_memory(&session(&engine), &text, None).await;

    let expected = format!("Successfully saved memory for user: {}...", "x".repeat(100));
    assert_eq!(outcome.text(), expected);

    // The engine still receives the full text
    assert!(matches!(
        &engine.calls()[0],
        EngineCall::Add { messages, .. } if messages[0].content.len() == 150
    ));
}

#[tokio::test]
async fn save_keeps_short_text() {
    let engine = FakeEngine::returning(json!({}));
    let text = "y".repeat(50);
    let outcome = save_memory(&session(&engine), &text, None).await;
    assert_eq!(
        outcome.text(),
        format!("Successfully saved memory for user: {}", text)
    );
}

#[tokio::test]
async fn save_failure_becomes_result_text() {
    let engine = FakeEngine::failing("connection refused");
    let outcome = save_memory(&session(&engine), "hello", Some("bob")).await;

    assert!(outcome.is_failure());
    assert!(outcome.text().starts_with("Error saving memory for bob:"));
    assert!(outcome.text().contains("connection refused"));
}

// ============================================================================
// get_all_memories / search_memories
// ============================================================================

#[tokio::test]
async fn get_all_flattens_keyed_results() {
    let engine = FakeEngine::returning(json!({"results": [{"memory": "a"}, {"memory": "b"}]}));
    let outcome = get_all_memories(&session(&engine), None).await;

    assert_eq!(outcome, ToolOutcome::Success("[\n  \"a\",\n  \"b\"\n]".to_string()));
    assert_eq!(
        engine.calls(),
        vec![EngineCall::GetAll {
            user_id: "user".to_string()
        }]
    );
}

#[tokio::test]
async fn get_all_flattens_bare_sequence() {
    let engine = FakeEngine::returning(json!(["x", {"memory": "y"}]));
    let outcome = get_all_memories(&session(&engine), Some("alice")).await;

    let memories: Vec<String> = serde_json::from_str(outcome.text()).unwrap();
    assert_eq!(memories, vec!["x", "y"]);
}

#[tokio::test]
async fn get_all_reports_unexpected_shape_as_soft_error() {
    let engine = FakeEngine::returning(json!(42));
    let outcome = get_all_memories(&session(&engine), None).await;

    assert!(!outcome.is_failure());
    let payload: Value = serde_json::from_str(outcome.text()).unwrap();
    assert_eq!(
        payload["error"],
        "Unexpected format received from mem0.get_all"
    );
    assert_eq!(payload["data"], "42");
}

#[tokio::test]
async fn get_all_failure_mentions_user() {
    let engine = FakeEngine::failing("timeout");
    let outcome = get_all_memories(&session(&engine), Some("carol")).await;

    assert!(outcome.is_failure());
    assert!(outcome
        .text()
        .starts_with("Error retrieving memories for carol:"));
    // Plain text, not JSON
    assert!(serde_json::from_str::<Value>(outcome.text()).is_err());
}

#[tokio::test]
async fn search_forwards_limit() {
    let engine = FakeEngine::returning(json!({"results": [{"memory": "likes tea"}]}));
    let outcome = search_memories(&session(&engine), "drinks", Some("dave"), 3).await;

    assert_eq!(outcome.text(), "[\n  \"likes tea\"\n]");
    assert_eq!(
        engine.calls(),
        vec![EngineCall::Search {
            query: "drinks".to_string(),
            user_id: "dave".to_string(),
            limit: 3,
        }]
    );
}

#[tokio::test]
async fn search_never_returns_more_than_limit() {
    let engine = FakeEngine::returning(json!(["1", "2", "3", "4", "5"]));
    let outcome = search_memories(&session(&engine), "numbers", None, 3).await;

    let memories: Vec<String> = serde_json::from_str(outcome.text()).unwrap();
    assert_eq!(memories, vec!["1", "2", "3"]);
}

#[tokio::test]
async fn search_unexpected_shape_and_failure() {
    let engine = FakeEngine::returning(json!({"hits": 2}));
    let outcome = search_memories(&session(&engine), "q", None, 3).await;
    let payload: Value = serde_json::from_str(outcome.text()).unwrap();
    assert_eq!(payload["error"], "Unexpected format received from mem0.search");

    let engine = FakeEngine::failing("rate limited");
    let outcome = search_memories(&session(&engine), "q", None, 3).await;
    assert!(outcome.is_failure());
    assert!(outcome.text().starts_with("Error searching memories for user:"));
}

// ============================================================================
// MCP dispatch
// ============================================================================

#[tokio::test]
async fn initialize_and_list_tools() {
    let handler = MemoryToolHandler::new(session(&FakeEngine::returning(json!([]))));

    let init = handler
        .handle_request(request(Some(1), "initialize", json!({})))
        .await
        .unwrap();
    let result = init.result.unwrap();
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["serverInfo"]["name"], "mcp-mem0");

    let list = handler
        .handle_request(request(Some(2), "tools/list", Value::Null))
        .await
        .unwrap();
    let tools = list.result.unwrap()["tools"].clone();
    let names: Vec<&str> = tools
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["save_memory", "get_all_memories", "search_memories"]);
}

#[tokio::test]
async fn call_tool_returns_text_content() {
    let engine = FakeEngine::returning(json!({"results": [{"memory": "a"}]}));
    let handler = MemoryToolHandler::new(session(&engine));

    let response = handler
        .handle_request(request(
            Some(3),
            "tools/call",
            json!({"name": "search_memories", "arguments": {"query": "a"}}),
        ))
        .await
        .unwrap();

    assert!(response.error.is_none());
    let result = response.result.unwrap();
    assert_eq!(result["content"][0]["type"], "text");
    assert_eq!(result["content"][0]["text"], "[\n  \"a\"\n]");
    assert!(result.get("isError").is_none());
    assert!(matches!(
        &engine.calls()[0],
        EngineCall::Search { limit: 3, user_id, .. } if user_id == "user"
    ));
}

#[tokio::test]
async fn engine_failure_is_a_tool_result_not_a_protocol_error() {
    let handler = MemoryToolHandler::new(session(&FakeEngine::failing("boom")));

    let response = handler
        .handle_request(request(
            Some(4),
            "tools/call",
            json!({"name": "save_memory", "arguments": {"text": "hi", "user_id": "erin"}}),
        ))
        .await
        .unwrap();

    assert!(response.error.is_none());
    let result = response.result.unwrap();
    assert_eq!(result["isError"], true);
    assert!(result["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("erin"));
}

#[tokio::test]
async fn bad_arguments_and_unknown_tools_are_invalid_params() {
    let handler = MemoryToolHandler::new(session(&FakeEngine::returning(json!([]))));

    let missing = handler
        .handle_request(request(
            Some(5),
            "tools/call",
            json!({"name": "save_memory", "arguments": {}}),
        ))
        .await
        .unwrap();
    assert_eq!(missing.error.unwrap().code, -32602);

    let unknown = handler
        .handle_request(request(
            Some(6),
            "tools/call",
            json!({"name": "delete_everything"}),
        ))
        .await
        .unwrap();
    let error = unknown.error.unwrap();
    assert_eq!(error.code, -32602);
    assert!(error.message.contains("delete_everything"));
}

#[tokio::test]
async fn notifications_get_no_response() {
    let handler = MemoryToolHandler::new(session(&FakeEngine::returning(json!([]))));
    let response = handler
        .handle_request(request(None, "notifications/initialized", Value::Null))
        .await;
    assert!(response.is_none());
}

#[tokio::test]
async fn unknown_method_is_method_not_found() {
    let handler = MemoryToolHandler::new(session(&FakeEngine::returning(json!([]))));
    let response = handler
        .handle_request(request(Some(7), "resources/list", Value::Null))
        .await
        .unwrap();
    assert_eq!(response.error.unwrap().code, -32601);
}

// ============================================================================
// stdio transport
// ============================================================================

#[tokio::test]
async fn stdio_serves_line_delimited_json_rpc() {
    let engine = FakeEngine::returning(json!(["remembered"]));
    let server = StdioServer::new(MemoryToolHandler::new(session(&engine)));

    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        "\n\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
        "not json\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"get_all_memories","arguments":{"user_id":"frank"}}}"#,
        "\n",
    );

    let mut output = Vec::new();
    server.serve(input.as_bytes(), &mut output).await.unwrap();

    let lines: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["id"], 1);
    assert_eq!(lines[1]["error"]["code"], -32700);
    assert_eq!(lines[2]["id"], 2);
    assert_eq!(
        lines[2]["result"]["content"][0]["text"],
        "[\n  \"remembered\"\n]"
    );
    assert_eq!(
        engine.calls(),
        vec![EngineCall::GetAll {
            user_id: "frank".to_string()
        }]
    );
}
