//! Tool server speaking newline-delimited JSON-RPC 2.0 on stdin/stdout.
//!
//! Requests are handled strictly one at a time. Logging goes to stderr;
//! stdout carries protocol messages only.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::borrow::Cow;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use super::handlers::SlackTools;
use super::schema::{
    RECENT_ACTIVITY_TOOL, REFRESH_DIRECTORY_TOOL, SEND_CHANNEL_TOOL, SEND_DIRECT_TOOL, SETUP_TOOL,
    UPDATE_STATUS_TOOL, tool_definitions,
};
use crate::errors::NOT_CONFIGURED_MESSAGE;
use crate::features::StatusRequest;

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "slack";

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

#[derive(Deserialize)]
struct SetupArgs {
    user_token: String,
}

#[derive(Deserialize)]
struct SendDirectArgs {
    user_names: Vec<String>,
    message: String,
}

#[derive(Deserialize)]
struct SendChannelArgs {
    channel_name: String,
    message: String,
    #[serde(default)]
    users: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct RecentActivityArgs {
    #[serde(default)]
    limit: Option<u32>,
}

#[derive(Deserialize)]
struct UpdateStatusArgs {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    emoji: Option<String>,
    #[serde(default)]
    presence: Option<String>,
    #[serde(default)]
    expiration_minutes: Option<i64>,
}

fn parse_args<T: DeserializeOwned>(arguments: &Value) -> Result<T, String> {
    let arguments = if arguments.is_null() {
        json!({})
    } else {
        arguments.clone()
    };
    serde_json::from_value(arguments).map_err(|e| format!("Invalid arguments: {e}"))
}

fn is_error_text(text: &str) -> bool {
    text.starts_with("Error") || text == NOT_CONFIGURED_MESSAGE
}

pub struct StdioServer {
    tools: SlackTools,
}

impl StdioServer {
    #[must_use]
    pub fn new(tools: SlackTools) -> Self {
        Self { tools }
    }

    /// Read requests from stdin until EOF, answering each on stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if reading stdin or writing stdout fails.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        info!("Slack tool server started");
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await?;
        info!("Slack tool server stopped");
        Ok(())
    }

    /// Serve newline-delimited requests from `reader` until EOF.
    ///
    /// Lines that are not valid UTF-8 are decoded lossily and answered with a
    /// parse error, so one bad line never ends the session.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if reading or writing fails.
    pub async fn serve<R, W>(&mut self, mut reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                return Ok(());
            }

            let decoded = String::from_utf8_lossy(&buf);
            if matches!(decoded, Cow::Owned(_)) {
                warn!("Received a line that is not valid UTF-8");
            }
            let line = decoded.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(response) = self.handle_message(line).await {
                let mut bytes = response.into_bytes();
                bytes.push(b'\n');
                writer.write_all(&bytes).await?;
                writer.flush().await?;
            }
        }
    }

    /// Handle one JSON-RPC message. Notifications (no `id`) produce no response.
    pub async fn handle_message(&mut self, line: &str) -> Option<String> {
        let request: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                return Some(error_response(
                    Value::Null,
                    PARSE_ERROR,
                    &format!("Parse error: {e}"),
                ));
            }
        };

        if !request.is_object() {
            return Some(error_response(
                Value::Null,
                INVALID_REQUEST,
                "Invalid Request: expected a JSON object",
            ));
        }

        let method = request
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let Some(id) = request.get("id").cloned() else {
            debug!("Received notification {}", method);
            return None;
        };
        let params = request.get("params").cloned().unwrap_or(Value::Null);

        let response = match method {
            "initialize" => success_response(
                id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": { "tools": {} },
                    "serverInfo": {
                        "name": SERVER_NAME,
                        "version": env!("CARGO_PKG_VERSION")
                    }
                }),
            ),
            "ping" => success_response(id, json!({})),
            "tools/list" => success_response(id, json!({ "tools": tool_definitions() })),
            "tools/call" => self.handle_tools_call(id, &params).await,
            _ => error_response(id, METHOD_NOT_FOUND, &format!("Method not found: {method}")),
        };
        Some(response)
    }

    async fn handle_tools_call(&mut self, id: Value, params: &Value) -> String {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        info!("Tool call: {}", name);
        match self.call_tool(name, &arguments).await {
            Ok(text) => success_response(
                id,
                json!({
                    "content": [{ "type": "text", "text": text }],
                    "isError": is_error_text(&text),
                }),
            ),
            Err(message) => {
                warn!("Rejected tool call {}: {}", name, message);
                error_response(id, INVALID_PARAMS, &message)
            }
        }
    }

    /// Dispatch a tool by name. `Err` is reserved for protocol-level problems
    /// (unknown tool, malformed arguments); tool failures are `Ok` text.
    async fn call_tool(&mut self, name: &str, arguments: &Value) -> Result<String, String> {
        let text = match name {
            SETUP_TOOL => {
                let args: SetupArgs = parse_args(arguments)?;
                self.tools.setup(&args.user_token).await
            }
            SEND_DIRECT_TOOL => {
                let args: SendDirectArgs = parse_args(arguments)?;
                self.tools.send_direct(&args.user_names, &args.message).await
            }
            SEND_CHANNEL_TOOL => {
                let args: SendChannelArgs = parse_args(arguments)?;
                self.tools
                    .send_channel(&args.channel_name, &args.message, args.users.as_deref())
                    .await
            }
            RECENT_ACTIVITY_TOOL => {
                let args: RecentActivityArgs = parse_args(arguments)?;
                self.tools.get_recent_activity(args.limit).await
            }
            UPDATE_STATUS_TOOL => {
                let args: UpdateStatusArgs = parse_args(arguments)?;
                let request = StatusRequest {
                    text: args.text,
                    emoji: args.emoji,
                    presence: args.presence,
                    expiration_minutes: args.expiration_minutes,
                };
                self.tools.update_status(&request).await
            }
            REFRESH_DIRECTORY_TOOL => self.tools.refresh_directory().await,
            _ => return Err(format!("Unknown tool: {name}")),
        };
        Ok(text)
    }
}

fn success_response(id: Value, result: Value) -> String {
    json!({ "jsonrpc": "2.0", "id": id, "result": result }).to_string()
}

fn error_response(id: Value, code: i64, message: &str) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code, "message": message }
    })
    .to_string()
}
