//! Slack API client module
//!
//! Production implementation of `SlackApi`. Messaging and identity calls go
//! through slack-morphism; directory, search, and profile calls use raw
//! form-encoded requests against the Web API.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use slack_morphism::hyper_tokio::{SlackClientHyperConnector, SlackHyperClient};
use slack_morphism::prelude::{SlackApiChatPostMessageRequest, SlackApiConversationsOpenRequest};
use slack_morphism::{
    SlackApiToken, SlackApiTokenValue, SlackChannelId, SlackMessageContent, SlackUserId,
};
use std::time::Duration;
use tracing::{debug, warn};

use super::api::{
    Conversation, HistoryMessage, Member, Presence, SearchMatch, SlackApi, StatusProfile,
};
use crate::core::config::DEFAULT_SLACK_API_BASE_URL;
use crate::errors::SlackError;

// Build the Slack client connector safely without panicking.
// If connector construction fails, store None and surface a SlackError at call sites.
static SLACK_CLIENT: std::sync::LazyLock<Option<SlackHyperClient>> =
    std::sync::LazyLock::new(|| match SlackClientHyperConnector::new() {
        Ok(connector) => Some(SlackHyperClient::new(connector)),
        Err(e) => {
            warn!("Failed to create Slack HTTP connector: {}", e);
            None
        }
    });

static HTTP_CLIENT: std::sync::LazyLock<Client> = std::sync::LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new())
});

/// Page size requested from cursor-paginated list methods.
const PAGE_LIMIT: &str = "200";

type Params = Vec<(&'static str, String)>;

/// Pass a Web API body through when `ok` is true, otherwise surface Slack's error code.
fn check_ok(body: Value) -> Result<Value, SlackError> {
    if body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
        return Ok(body);
    }

    Err(SlackError::ApiError(
        body.get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string(),
    ))
}

/// The cursor for the next page, if the response says there is one.
fn next_cursor(body: &Value) -> Option<String> {
    body.pointer("/response_metadata/next_cursor")
        .and_then(Value::as_str)
        .filter(|cursor| !cursor.is_empty())
        .map(str::to_string)
}

/// Slack API client bound to one user token
pub struct SlackClient {
    token: SlackApiToken,
    base_url: String,
}

impl SlackClient {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self::with_base_url(token, DEFAULT_SLACK_API_BASE_URL.to_string())
    }

    #[must_use]
    pub fn with_base_url(token: String, base_url: String) -> Self {
        Self {
            token: SlackApiToken::new(SlackApiTokenValue::new(token)),
            base_url,
        }
    }

    #[must_use]
    pub fn token(&self) -> &SlackApiToken {
        &self.token
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    fn connector() -> Result<&'static SlackHyperClient, SlackError> {
        SLACK_CLIENT.as_ref().ok_or_else(|| {
            SlackError::GeneralError("Slack HTTP connector not initialized".to_string())
        })
    }

    /// POST a form-encoded Web API call and return the body once `ok` is true.
    async fn call(
        &self,
        method: &str,
        params: &[(&'static str, String)],
    ) -> Result<Value, SlackError> {
        debug!("Calling Slack API method {}", method);

        let resp = HTTP_CLIENT
            .post(self.method_url(method))
            .bearer_auth(&self.token.token_value.0)
            .form(params)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(SlackError::HttpError(format!(
                "{method} HTTP {}",
                resp.status()
            )));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| SlackError::ParseError(format!("{method} JSON parse error: {e}")))?;

        check_ok(body)
    }

    /// Follow `response_metadata.next_cursor` until exhausted, collecting `key` from each page.
    async fn call_paginated<T: DeserializeOwned>(
        &self,
        method: &str,
        key: &str,
        params: Params,
    ) -> Result<Vec<T>, SlackError> {
        let mut items = Vec::new();
        let mut cursor = String::new();

        loop {
            let mut page_params = params.clone();
            if !cursor.is_empty() {
                page_params.push(("cursor", cursor.clone()));
            }

            let mut body = self.call(method, &page_params).await?;
            let page: Vec<T> = match body.get_mut(key) {
                Some(value) => serde_json::from_value(value.take())?,
                None => Vec::new(),
            };
            items.extend(page);

            match next_cursor(&body) {
                Some(next) => cursor = next,
                None => break,
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl SlackApi for SlackClient {
    async fn auth_test(&self) -> Result<String, SlackError> {
        let session = Self::connector()?.open_session(&self.token);
        let test_resp = session.auth_test().await?;
        Ok(test_resp.user_id.0)
    }

    async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), SlackError> {
        let session = Self::connector()?.open_session(&self.token);
        let post_req = SlackApiChatPostMessageRequest::new(
            SlackChannelId(channel_id.to_string()),
            SlackMessageContent::new().with_text(text.to_string()),
        );

        session.chat_post_message(&post_req).await?;
        Ok(())
    }

    async fn open_conversation(&self, user_ids: &[String]) -> Result<String, SlackError> {
        let session = Self::connector()?.open_session(&self.token);
        let open_req = SlackApiConversationsOpenRequest::new()
            .with_users(user_ids.iter().cloned().map(SlackUserId).collect());

        let result = session.conversations_open(&open_req).await?;
        Ok(result.channel.id.0)
    }

    async fn list_users(&self) -> Result<Vec<Member>, SlackError> {
        self.call_paginated("users.list", "members", vec![("limit", PAGE_LIMIT.to_string())])
            .await
    }

    async fn list_conversations(&self, types: &str) -> Result<Vec<Conversation>, SlackError> {
        self.call_paginated(
            "conversations.list",
            "channels",
            vec![
                ("types", types.to_string()),
                ("limit", PAGE_LIMIT.to_string()),
            ],
        )
        .await
    }

    async fn conversation_history(
        &self,
        channel_id: &str,
        limit: u32,
    ) -> Result<Vec<HistoryMessage>, SlackError> {
        let body = self
            .call(
                "conversations.history",
                &[
                    ("channel", channel_id.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        let messages = body.get("messages").cloned().unwrap_or(Value::Array(vec![]));
        Ok(serde_json::from_value(messages)?)
    }

    async fn conversation_members(&self, channel_id: &str) -> Result<Vec<String>, SlackError> {
        self.call_paginated(
            "conversations.members",
            "members",
            vec![("channel", channel_id.to_string())],
        )
        .await
    }

    async fn search_messages(
        &self,
        query: &str,
        count: u32,
    ) -> Result<Vec<SearchMatch>, SlackError> {
        let body = self
            .call(
                "search.messages",
                &[
                    ("query", query.to_string()),
                    ("count", count.to_string()),
                    ("sort", "timestamp".to_string()),
                    ("sort_dir", "desc".to_string()),
                ],
            )
            .await?;

        let matches = body
            .pointer("/messages/matches")
            .cloned()
            .unwrap_or(Value::Array(vec![]));
        Ok(serde_json::from_value(matches)?)
    }

    async fn set_profile_status(&self, profile: &StatusProfile) -> Result<(), SlackError> {
        let payload = json!({
            "status_text": profile.status_text,
            "status_emoji": profile.status_emoji,
            "status_expiration": profile.status_expiration,
        });

        self.call("users.profile.set", &[("profile", payload.to_string())])
            .await?;
        Ok(())
    }

    async fn set_presence(&self, presence: Presence) -> Result<(), SlackError> {
        self.call(
            "users.setPresence",
            &[("presence", presence.as_str().to_string())],
        )
        .await?;
        Ok(())
    }
}
