use serde_json::{Value, json};

pub const SETUP_TOOL: &str = "slack_setup";
pub const SEND_DIRECT_TOOL: &str = "send_direct_message";
pub const SEND_CHANNEL_TOOL: &str = "send_message_to_channel";
pub const RECENT_ACTIVITY_TOOL: &str = "get_recent_messages";
pub const UPDATE_STATUS_TOOL: &str = "update_status";
pub const REFRESH_DIRECTORY_TOOL: &str = "refresh_slack_directory";

/// Tool descriptors returned by `tools/list`.
#[must_use]
pub fn tool_definitions() -> Value {
    json!([
        {
            "name": SETUP_TOOL,
            "description": "Set up the Slack config file with a user token and populate the local user and channel directory. Overwrites any existing config.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user_token": { "type": "string", "description": "Slack user token (xoxp-...)" }
                },
                "required": ["user_token"]
            }
        },
        {
            "name": SEND_DIRECT_TOOL,
            "description": "Send a direct message to one user, or a group message when several users are given. Users can be named by username, display name, real name, or first name (e.g. \"andy\", \"Andy Bennett\").",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "user_names": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "One or more recipients"
                    },
                    "message": { "type": "string", "description": "Text of the message" }
                },
                "required": ["user_names", "message"]
            }
        },
        {
            "name": SEND_CHANNEL_TOOL,
            "description": "Send a message to a channel, optionally @-mentioning users at the start of the message.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "channel_name": { "type": "string", "description": "Channel name without '#', e.g. \"general\"" },
                    "message": { "type": "string", "description": "Text of the message" },
                    "users": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Optional user names to mention"
                    }
                },
                "required": ["channel_name", "message"]
            }
        },
        {
            "name": RECENT_ACTIVITY_TOOL,
            "description": "Fetch recent direct, group, and private-channel messages plus channel messages mentioning you, newest first and grouped by conversation.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "limit": {
                        "type": "integer",
                        "minimum": 1,
                        "maximum": 100,
                        "description": "Maximum messages per section (default 20)"
                    }
                }
            }
        },
        {
            "name": UPDATE_STATUS_TOOL,
            "description": "Update your Slack status text, emoji, and expiration, and/or set presence to online or away. Pass empty text and emoji together with a presence to clear the status.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "text": { "type": "string", "description": "Status text" },
                    "emoji": { "type": "string", "description": "Status emoji, e.g. \":coffee:\"" },
                    "presence": { "type": "string", "enum": ["online", "away"], "description": "Presence to set" },
                    "expiration_minutes": {
                        "type": "integer",
                        "minimum": 0,
                        "maximum": 1440,
                        "description": "Minutes until the status clears; 0 keeps it indefinitely"
                    }
                }
            }
        },
        {
            "name": REFRESH_DIRECTORY_TOOL,
            "description": "Pick up users and channels added since setup without changing the token or existing entries.",
            "inputSchema": {
                "type": "object",
                "properties": {}
            }
        }
    ])
}
