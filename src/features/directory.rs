//! Additive sync of workspace users and channels into the config store.
//!
//! Existing keys are never overwritten, so hand-edited entries survive a
//! re-sync. The file is only rewritten when something new was added.

use tracing::info;

use crate::core::{ConfigStore, UserRecord};
use crate::errors::SlackError;
use crate::slack::SlackApi;
use crate::slack::api::{CHANNEL_CONVERSATION_TYPES, Member};

fn user_record(member: &Member) -> UserRecord {
    UserRecord {
        id: member.id.clone(),
        username: member.name.clone(),
        display_name: member.profile.display_name.clone(),
        real_name: member.profile.real_name.clone(),
        first_name: member.profile.first_name.clone(),
    }
}

/// Merge active, non-bot workspace members into `users`, keyed by lower-cased username.
///
/// # Errors
///
/// Returns `NotConfigured` without a config file, or the Slack / file error.
pub async fn sync_users(api: &dyn SlackApi, store: &ConfigStore) -> Result<usize, SlackError> {
    let mut config = store.load_required()?;
    let members = api.list_users().await?;

    config.ensure_sections();
    let users = config.users_mut();
    let mut added = 0;

    for member in members.iter().filter(|m| !m.is_bot && !m.deleted) {
        let key = member.name.to_lowercase();
        if key.is_empty() || users.contains_key(&key) {
            continue;
        }
        users.insert(key, user_record(member));
        added += 1;
    }

    if added > 0 {
        store.save(&config)?;
    }
    info!("User sync added {} of {} members", added, members.len());
    Ok(added)
}

/// Merge unarchived channels the caller belongs to into `channels`, keyed by lower-cased name.
///
/// # Errors
///
/// Returns `NotConfigured` without a config file, or the Slack / file error.
pub async fn sync_channels(api: &dyn SlackApi, store: &ConfigStore) -> Result<usize, SlackError> {
    let mut config = store.load_required()?;
    let conversations = api.list_conversations(CHANNEL_CONVERSATION_TYPES).await?;

    config.ensure_sections();
    let channels = config.channels_mut();
    let mut added = 0;

    for conversation in conversations
        .iter()
        .filter(|c| !c.is_archived && c.is_member)
    {
        let key = conversation
            .name
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        if key.is_empty() || channels.contains_key(&key) {
            continue;
        }
        channels.insert(key, conversation.id.clone());
        added += 1;
    }

    if added > 0 {
        store.save(&config)?;
    }
    info!(
        "Channel sync added {} of {} conversations",
        added,
        conversations.len()
    );
    Ok(added)
}

/// Sync result as reported to the tool caller; failures are folded into the string.
#[must_use]
pub fn describe_sync(result: &Result<usize, SlackError>, what: &str) -> String {
    match result {
        Ok(added) => format!("Config updated! Added {added} {what}"),
        Err(e) => format!("Error syncing {what}: {e}"),
    }
}
