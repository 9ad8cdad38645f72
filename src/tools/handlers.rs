//! The callable tools. Every entry point returns a human-readable string;
//! failures are folded into `Error: ...` text at this boundary and nowhere
//! else.

use std::sync::Arc;
use tracing::{info, warn};

use crate::core::{Config, ConfigStore};
use crate::errors::{NOT_CONFIGURED_MESSAGE, SlackError};
use crate::features::activity::{clamp_limit, recent_activity};
use crate::features::directory::{describe_sync, sync_channels, sync_users};
use crate::features::dispatch::{send_channel, send_direct};
use crate::features::status::{StatusRequest, update_status};
use crate::slack::{SlackApi, SlackClient};

/// Builds an API session from a user token.
pub trait Connector: Send + Sync {
    fn connect(&self, token: &str) -> Arc<dyn SlackApi>;
}

/// Production connector: one `SlackClient` per token.
#[derive(Debug, Clone)]
pub struct SlackConnector {
    base_url: String,
}

impl SlackConnector {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Connector for SlackConnector {
    fn connect(&self, token: &str) -> Arc<dyn SlackApi> {
        Arc::new(SlackClient::with_base_url(
            token.to_string(),
            self.base_url.clone(),
        ))
    }
}

fn render(result: Result<String, SlackError>, error_prefix: &str) -> String {
    match result {
        Ok(text) => text,
        Err(SlackError::NotConfigured) => NOT_CONFIGURED_MESSAGE.to_string(),
        Err(e) => {
            warn!("Tool call failed ({:?}): {}", e.kind(), e);
            format!("{error_prefix}: {e}")
        }
    }
}

pub struct SlackTools {
    store: ConfigStore,
    connector: Box<dyn Connector>,
    /// Token the session was built from, and the session itself.
    session: Option<(String, Arc<dyn SlackApi>)>,
}

impl SlackTools {
    /// Create the tool set, opening a session right away if a token is already stored.
    ///
    /// A missing or unreadable config is not fatal; `setup` can create it later.
    pub fn new(store: ConfigStore, connector: impl Connector + 'static) -> Self {
        let session = match store.load() {
            Ok(Some(config)) if config.has_token() => {
                let session = connector.connect(&config.user_token);
                Some((config.user_token, session))
            }
            Ok(_) => None,
            Err(e) => {
                warn!("Could not load config on startup: {}", e);
                None
            }
        };

        Self {
            store,
            connector: Box::new(connector),
            session,
        }
    }

    #[must_use]
    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// The session for the token currently on disk.
    ///
    /// Reconnects when the stored token differs from the one the session was
    /// built with, so a setup run by another process takes effect here too.
    fn session(&mut self) -> Result<Arc<dyn SlackApi>, SlackError> {
        let config = self.store.load()?;
        self.session_for(config.as_ref())
    }

    fn session_for(&mut self, config: Option<&Config>) -> Result<Arc<dyn SlackApi>, SlackError> {
        if let Some(config) = config.filter(|c| c.has_token()) {
            let stale = self
                .session
                .as_ref()
                .is_none_or(|(token, _)| *token != config.user_token);
            if stale {
                let session = self.connector.connect(&config.user_token);
                self.session = Some((config.user_token.clone(), session));
            }
        }

        self.session
            .as_ref()
            .map(|(_, session)| Arc::clone(session))
            .ok_or(SlackError::NotConfigured)
    }

    /// Session plus a freshly loaded config; mappings are never cached between calls.
    fn session_and_config(&mut self) -> Result<(Arc<dyn SlackApi>, Config), SlackError> {
        let config = self.store.load_required()?;
        let session = self.session_for(Some(&config))?;
        Ok((session, config))
    }

    /// Store a new token (discarding any previous config), reconnect, and sync the directory.
    pub async fn setup(&mut self, user_token: &str) -> String {
        render(self.try_setup(user_token).await, "Error during setup")
    }

    async fn try_setup(&mut self, user_token: &str) -> Result<String, SlackError> {
        let token = user_token.trim();
        if token.is_empty() {
            return Err(SlackError::InvalidInput(
                "A Slack user token is required".to_string(),
            ));
        }

        self.store.save(&Config::new(token))?;
        let session = self.connector.connect(token);
        self.session = Some((token.to_string(), Arc::clone(&session)));
        info!("Wrote new config to {}", self.store.path().display());

        let users = sync_users(session.as_ref(), &self.store).await;
        let channels = sync_channels(session.as_ref(), &self.store).await;

        Ok(format!(
            "Slack setup completed successfully! {}. {}.",
            describe_sync(&users, "users"),
            describe_sync(&channels, "channels")
        ))
    }

    /// Re-run the directory sync with the stored token.
    pub async fn refresh_directory(&mut self) -> String {
        render(self.try_refresh_directory().await, "Error")
    }

    async fn try_refresh_directory(&mut self) -> Result<String, SlackError> {
        let session = self.session()?;
        let users = sync_users(session.as_ref(), &self.store).await;
        let channels = sync_channels(session.as_ref(), &self.store).await;

        Ok(format!(
            "Directory refreshed! {}. {}.",
            describe_sync(&users, "users"),
            describe_sync(&channels, "channels")
        ))
    }

    pub async fn send_direct(&mut self, user_names: &[String], message: &str) -> String {
        render(self.try_send_direct(user_names, message).await, "Error")
    }

    async fn try_send_direct(
        &mut self,
        user_names: &[String],
        message: &str,
    ) -> Result<String, SlackError> {
        let (session, config) = self.session_and_config()?;
        send_direct(session.as_ref(), &config, user_names, message).await
    }

    pub async fn send_channel(
        &mut self,
        channel_name: &str,
        message: &str,
        users: Option<&[String]>,
    ) -> String {
        let result = self
            .try_send_channel(channel_name, message, users.unwrap_or_default())
            .await;
        render(result, "Error")
    }

    async fn try_send_channel(
        &mut self,
        channel_name: &str,
        message: &str,
        users: &[String],
    ) -> Result<String, SlackError> {
        let (session, config) = self.session_and_config()?;
        send_channel(session.as_ref(), &config, channel_name, message, users).await
    }

    pub async fn get_recent_activity(&mut self, limit: Option<u32>) -> String {
        render(self.try_get_recent_activity(limit).await, "Error")
    }

    async fn try_get_recent_activity(&mut self, limit: Option<u32>) -> Result<String, SlackError> {
        let (session, config) = self.session_and_config()?;
        let self_user_id = session.auth_test().await?;
        recent_activity(session.as_ref(), &config, &self_user_id, clamp_limit(limit)).await
    }

    pub async fn update_status(&mut self, request: &StatusRequest) -> String {
        let result = match self.session() {
            Ok(session) => Ok(update_status(session.as_ref(), request).await.join("\n")),
            Err(e) => Err(e),
        };
        render(result, "Error")
    }
}
