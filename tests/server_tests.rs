mod common;

use common::{BASIC_CONFIG, Call, MockSlackApi, conversation, harness, member};
use serde_json::{Value, json};
use slack_tools::tools::StdioServer;

fn parse(response: Option<String>) -> Value {
    serde_json::from_str(&response.expect("expected a response")).unwrap()
}

fn call(id: u64, name: &str, arguments: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments }
    })
    .to_string()
}

fn directory_api() -> MockSlackApi {
    let api = MockSlackApi::default();
    *api.members.lock().unwrap() = vec![
        member("U1", "andy", "", "Andy Bennett", "Andy"),
        member("U2", "alec", "Al", "Alec Smith", "Alec"),
    ];
    *api.channels.lock().unwrap() = vec![conversation("C1", Some("general"))];
    api
}

#[tokio::test]
async fn test_initialize_and_list_tools() {
    let h = harness(MockSlackApi::default(), None);
    let mut server = StdioServer::new(h.tools);

    let init = parse(
        server
            .handle_message(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
            .await,
    );
    assert_eq!(init["id"], 1);
    assert_eq!(init["result"]["serverInfo"]["name"], "slack");

    let list = parse(
        server
            .handle_message(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#)
            .await,
    );
    let tools = list["result"]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
    assert_eq!(
        names,
        vec![
            "slack_setup",
            "send_direct_message",
            "send_message_to_channel",
            "get_recent_messages",
            "update_status",
            "refresh_slack_directory",
        ]
    );
    assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));
}

#[tokio::test]
async fn test_notifications_get_no_response() {
    let h = harness(MockSlackApi::default(), None);
    let mut server = StdioServer::new(h.tools);

    let response = server
        .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
        .await;
    assert!(response.is_none());
}

#[tokio::test]
async fn test_protocol_errors() {
    let h = harness(MockSlackApi::default(), None);
    let mut server = StdioServer::new(h.tools);

    let bad_json = parse(server.handle_message("{not json").await);
    assert_eq!(bad_json["error"]["code"], -32700);

    let unknown = parse(
        server
            .handle_message(r#"{"jsonrpc":"2.0","id":3,"method":"resources/list"}"#)
            .await,
    );
    assert_eq!(unknown["error"]["code"], -32601);

    let unknown_tool = parse(server.handle_message(&call(4, "delete_workspace", json!({}))).await);
    assert_eq!(unknown_tool["error"]["code"], -32602);

    let missing_args = parse(
        server
            .handle_message(&call(5, "send_message_to_channel", json!({ "message": "hi" })))
            .await,
    );
    assert_eq!(missing_args["error"]["code"], -32602);
}

#[tokio::test]
async fn test_tool_failure_is_text_flagged_as_error() {
    let h = harness(MockSlackApi::default(), None);
    let mut server = StdioServer::new(h.tools);

    let response = parse(
        server
            .handle_message(&call(
                6,
                "send_direct_message",
                json!({ "user_names": ["andy"], "message": "hi" }),
            ))
            .await,
    );

    let result = &response["result"];
    assert_eq!(result["isError"], true);
    assert!(
        result["content"][0]["text"]
            .as_str()
            .unwrap()
            .starts_with("Slack not configured")
    );
}

#[tokio::test]
async fn test_setup_writes_config_and_syncs() {
    let h = harness(directory_api(), Some(BASIC_CONFIG));
    let config_path = h.config_path();
    let api = h.api.clone();
    let tokens = h.tokens.clone();
    let mut server = StdioServer::new(h.tools);

    let response = parse(
        server
            .handle_message(&call(7, "slack_setup", json!({ "user_token": "xoxp-new" })))
            .await,
    );

    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    assert_eq!(
        text,
        "Slack setup completed successfully! Config updated! Added 2 users. Config updated! Added 1 channels."
    );
    assert_eq!(response["result"]["isError"], false);
    assert_eq!(tokens.lock().unwrap().last().map(String::as_str), Some("xoxp-new"));

    let raw = std::fs::read_to_string(&config_path).unwrap();
    assert!(raw.starts_with("user_token: xoxp-new"));
    assert!(raw.contains("andy:"));
    assert!(raw.contains("general: C1"));
    assert!(api.calls().contains(&Call::ListUsers));
}

#[tokio::test]
async fn test_refresh_directory_keeps_token_and_entries() {
    let mut h = harness(directory_api(), Some(BASIC_CONFIG));
    h.api
        .members
        .lock()
        .unwrap()
        .push(member("U4", "dana", "", "Dana Lee", "Dana"));

    let reply = h.tools.refresh_directory().await;

    assert_eq!(
        reply,
        "Directory refreshed! Config updated! Added 1 users. Config updated! Added 0 channels."
    );
    let config = h.store().load_required().unwrap();
    assert_eq!(config.user_token, "xoxp-test");
    assert_eq!(config.users().count(), 3);
}

#[tokio::test]
async fn test_session_follows_token_on_disk() {
    let mut h = harness(MockSlackApi::default(), Some(BASIC_CONFIG));
    assert_eq!(*h.tokens.lock().unwrap(), vec!["xoxp-test".to_string()]);

    let rotated = BASIC_CONFIG.replace("xoxp-test", "xoxp-rotated");
    std::fs::write(h.config_path(), rotated).unwrap();
    h.tools.send_channel("general", "hi", None).await;

    assert_eq!(
        *h.tokens.lock().unwrap(),
        vec!["xoxp-test".to_string(), "xoxp-rotated".to_string()]
    );
}

#[tokio::test]
async fn test_non_object_request_is_invalid() {
    let h = harness(MockSlackApi::default(), None);
    let mut server = StdioServer::new(h.tools);

    for line in ["[1,2]", "42"] {
        let response = parse(server.handle_message(line).await);
        assert_eq!(response["error"]["code"], -32600);
        assert!(response["id"].is_null());
    }
}

#[tokio::test]
async fn test_serve_survives_invalid_utf8_line() {
    let h = harness(MockSlackApi::default(), None);
    let mut server = StdioServer::new(h.tools);

    let mut input = Vec::new();
    input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n");
    input.extend_from_slice(b"\xff\xfe garbage\n");
    input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n");
    let mut output = Vec::new();

    server.serve(&input[..], &mut output).await.unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[1]["error"]["code"], -32700);
    assert_eq!(responses[2]["id"], 2);
    assert!(responses[2]["result"].is_object());
}
