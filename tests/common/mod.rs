//! Scripted `SlackApi` used by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use slack_tools::core::ConfigStore;
use slack_tools::errors::SlackError;
use slack_tools::slack::api::{
    CHANNEL_CONVERSATION_TYPES, Conversation, HistoryMessage, Member, MemberProfile,
    SearchChannel, SearchMatch,
};
use slack_tools::slack::{Presence, SlackApi, StatusProfile};
use slack_tools::tools::{Connector, SlackTools};

pub const SELF_ID: &str = "U0SELF";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    AuthTest,
    Post { channel: String, text: String },
    Open(Vec<String>),
    ListUsers,
    ListConversations(String),
    History { channel: String, limit: u32 },
    Members(String),
    Search { query: String, count: u32 },
    Profile(StatusProfile),
    Presence(Presence),
}

#[derive(Default)]
pub struct MockSlackApi {
    pub members: Mutex<Vec<Member>>,
    pub channels: Mutex<Vec<Conversation>>,
    pub private_conversations: Vec<Conversation>,
    pub history: HashMap<String, Vec<HistoryMessage>>,
    pub conversation_members: HashMap<String, Vec<String>>,
    pub search_results: Vec<SearchMatch>,
    /// Error code returned by `chat.postMessage`, if set.
    pub post_error: Option<String>,
    pub list_users_error: Option<String>,
    pub presence_error: Option<String>,
    pub calls: Mutex<Vec<Call>>,
}

impl MockSlackApi {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Post { channel, text } => Some((channel, text)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl SlackApi for MockSlackApi {
    async fn auth_test(&self) -> Result<String, SlackError> {
        self.record(Call::AuthTest);
        Ok(SELF_ID.to_string())
    }

    async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), SlackError> {
        self.record(Call::Post {
            channel: channel_id.to_string(),
            text: text.to_string(),
        });
        match &self.post_error {
            Some(code) => Err(SlackError::ApiError(code.clone())),
            None => Ok(()),
        }
    }

    async fn open_conversation(&self, user_ids: &[String]) -> Result<String, SlackError> {
        self.record(Call::Open(user_ids.to_vec()));
        Ok("G0GROUP".to_string())
    }

    async fn list_users(&self) -> Result<Vec<Member>, SlackError> {
        self.record(Call::ListUsers);
        match &self.list_users_error {
            Some(code) => Err(SlackError::ApiError(code.clone())),
            None => Ok(self.members.lock().unwrap().clone()),
        }
    }

    async fn list_conversations(&self, types: &str) -> Result<Vec<Conversation>, SlackError> {
        self.record(Call::ListConversations(types.to_string()));
        if types == CHANNEL_CONVERSATION_TYPES {
            Ok(self.channels.lock().unwrap().clone())
        } else {
            Ok(self.private_conversations.clone())
        }
    }

    async fn conversation_history(
        &self,
        channel_id: &str,
        limit: u32,
    ) -> Result<Vec<HistoryMessage>, SlackError> {
        self.record(Call::History {
            channel: channel_id.to_string(),
            limit,
        });
        Ok(self.history.get(channel_id).cloned().unwrap_or_default())
    }

    async fn conversation_members(&self, channel_id: &str) -> Result<Vec<String>, SlackError> {
        self.record(Call::Members(channel_id.to_string()));
        Ok(self
            .conversation_members
            .get(channel_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn search_messages(
        &self,
        query: &str,
        count: u32,
    ) -> Result<Vec<SearchMatch>, SlackError> {
        self.record(Call::Search {
            query: query.to_string(),
            count,
        });
        Ok(self.search_results.clone())
    }

    async fn set_profile_status(&self, profile: &StatusProfile) -> Result<(), SlackError> {
        self.record(Call::Profile(profile.clone()));
        Ok(())
    }

    async fn set_presence(&self, presence: Presence) -> Result<(), SlackError> {
        self.record(Call::Presence(presence));
        match &self.presence_error {
            Some(code) => Err(SlackError::ApiError(code.clone())),
            None => Ok(()),
        }
    }
}

/// Hands out the same mock for every token and remembers the tokens seen.
pub struct MockConnector {
    pub api: Arc<MockSlackApi>,
    pub tokens: Arc<Mutex<Vec<String>>>,
}

impl Connector for MockConnector {
    fn connect(&self, token: &str) -> Arc<dyn SlackApi> {
        self.tokens.lock().unwrap().push(token.to_string());
        self.api.clone()
    }
}

pub struct Harness {
    pub dir: tempfile::TempDir,
    pub api: Arc<MockSlackApi>,
    pub tokens: Arc<Mutex<Vec<String>>>,
    pub tools: SlackTools,
}

impl Harness {
    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.yaml")
    }

    pub fn store(&self) -> ConfigStore {
        ConfigStore::new(self.config_path())
    }
}

/// Build `SlackTools` over `api`, optionally seeding the config file first.
pub fn harness(api: MockSlackApi, config_yaml: Option<&str>) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    if let Some(yaml) = config_yaml {
        std::fs::write(&path, yaml).unwrap();
    }

    let api = Arc::new(api);
    let tokens = Arc::new(Mutex::new(Vec::new()));
    let connector = MockConnector {
        api: Arc::clone(&api),
        tokens: Arc::clone(&tokens),
    };
    let tools = SlackTools::new(ConfigStore::new(&path), connector);

    Harness {
        dir,
        api,
        tokens,
        tools,
    }
}

pub const BASIC_CONFIG: &str = "\
user_token: xoxp-test
users:
  andy:
    id: U1
    username: andy
    display_name: ''
    real_name: Andy Bennett
    first_name: Andy
  alec:
    id: U2
    username: alec
    display_name: Al
    real_name: Alec Smith
    first_name: Alec
channels:
  general: C1
";

pub fn member(id: &str, name: &str, display: &str, real: &str, first: &str) -> Member {
    Member {
        id: id.to_string(),
        name: name.to_string(),
        deleted: false,
        is_bot: false,
        profile: MemberProfile {
            display_name: display.to_string(),
            real_name: real.to_string(),
            first_name: first.to_string(),
        },
    }
}

pub fn conversation(id: &str, name: Option<&str>) -> Conversation {
    Conversation {
        id: id.to_string(),
        name: name.map(str::to_string),
        is_archived: false,
        is_member: true,
        is_im: false,
        is_mpim: false,
        is_private: false,
    }
}

pub fn history(ts: &str, user: &str, text: &str) -> HistoryMessage {
    HistoryMessage {
        ts: ts.to_string(),
        user: Some(user.to_string()),
        bot_id: None,
        subtype: None,
        text: text.to_string(),
    }
}

pub fn search_match(ts: &str, user: &str, channel: &str, text: &str) -> SearchMatch {
    SearchMatch {
        ts: ts.to_string(),
        user: Some(user.to_string()),
        username: None,
        text: text.to_string(),
        channel: SearchChannel {
            id: format!("C-{channel}"),
            name: channel.to_string(),
        },
    }
}
