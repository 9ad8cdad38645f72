//! The seam between the tool features and Slack's Web API.
//!
//! Features only talk to `dyn SlackApi`, so a session can be rebuilt from a
//! new token at any time and tests can substitute a scripted implementation.

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::SlackError;

/// Conversation types used by the activity report.
pub const PRIVATE_CONVERSATION_TYPES: &str = "im,mpim,private_channel";

/// Conversation types synced into the channel directory.
pub const CHANNEL_CONVERSATION_TYPES: &str = "public_channel,private_channel";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberProfile {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub real_name: String,
    #[serde(default)]
    pub first_name: String,
}

/// An entry of `users.list`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Member {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub profile: MemberProfile,
}

fn default_true() -> bool {
    true
}

/// An entry of `conversations.list`.
#[derive(Debug, Clone, Deserialize)]
pub struct Conversation {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_archived: bool,
    // IMs and some private channels omit the flag; treat that as membership.
    #[serde(default = "default_true")]
    pub is_member: bool,
    #[serde(default)]
    pub is_im: bool,
    #[serde(default)]
    pub is_mpim: bool,
    #[serde(default)]
    pub is_private: bool,
}

/// An entry of `conversations.history`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryMessage {
    pub ts: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchChannel {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// An entry of `search.messages` → `messages.matches`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchMatch {
    pub ts: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub channel: SearchChannel,
}

/// Profile fields pushed by `users.profile.set`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusProfile {
    pub status_text: String,
    pub status_emoji: String,
    /// Absolute Unix timestamp; `0` means the status never expires.
    pub status_expiration: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Auto,
    Away,
}

impl Presence {
    /// Wire value for `users.setPresence`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Presence::Auto => "auto",
            Presence::Away => "away",
        }
    }
}

/// The Slack Web API operations this crate consumes.
///
/// Every method maps `ok: false` responses onto `SlackError::ApiError`
/// carrying Slack's error code.
#[async_trait]
pub trait SlackApi: Send + Sync {
    /// `auth.test`: the user ID owning the token.
    async fn auth_test(&self) -> Result<String, SlackError>;

    /// `chat.postMessage` into a channel, IM, group, or user ID.
    async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), SlackError>;

    /// `conversations.open` for a set of users; returns the conversation ID.
    async fn open_conversation(&self, user_ids: &[String]) -> Result<String, SlackError>;

    /// `users.list`, all pages.
    async fn list_users(&self) -> Result<Vec<Member>, SlackError>;

    /// `conversations.list` for a comma-separated list of types, all pages.
    async fn list_conversations(&self, types: &str) -> Result<Vec<Conversation>, SlackError>;

    /// `conversations.history`, newest first.
    async fn conversation_history(
        &self,
        channel_id: &str,
        limit: u32,
    ) -> Result<Vec<HistoryMessage>, SlackError>;

    /// `conversations.members`: member user IDs.
    async fn conversation_members(&self, channel_id: &str) -> Result<Vec<String>, SlackError>;

    /// `search.messages` sorted by timestamp, newest first.
    async fn search_messages(&self, query: &str, count: u32)
    -> Result<Vec<SearchMatch>, SlackError>;

    /// `users.profile.set` with the status fields.
    async fn set_profile_status(&self, profile: &StatusProfile) -> Result<(), SlackError>;

    /// `users.setPresence`.
    async fn set_presence(&self, presence: Presence) -> Result<(), SlackError>;
}
