//! Recent-activity report: direct/group/private conversation history merged
//! with channel mentions of the caller.

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use tracing::{info, warn};

use super::resolve::sender_name;
use crate::core::{Config, Message};
use crate::errors::SlackError;
use crate::slack::SlackApi;
use crate::slack::api::{Conversation, PRIVATE_CONVERSATION_TYPES};
use crate::slack::mentions::{SelfMentionStripper, mention_token};
use crate::utils::filters::filter_user_messages;

pub const DEFAULT_ACTIVITY_LIMIT: u32 = 20;
pub const MAX_ACTIVITY_LIMIT: u32 = 100;

/// History fetched per conversation, regardless of the overall limit.
const HISTORY_PER_CONVERSATION: u32 = 20;

pub const NO_RECENT_MESSAGES: &str = "No recent messages found.";

const DIRECT_HEADER: &str = "## Direct & Group Messages";
const MENTIONS_HEADER: &str = "## Channel Mentions";

#[must_use]
pub fn clamp_limit(limit: Option<u32>) -> u32 {
    limit
        .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
        .clamp(1, MAX_ACTIVITY_LIMIT)
}

fn parse_ts(ts: &str) -> f64 {
    ts.parse().unwrap_or(0.0)
}

/// Render a Slack `ts` (seconds since the epoch) in local time.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_timestamp(ts: f64) -> String {
    let secs = ts.trunc() as i64;
    let nanos = (ts.fract() * 1e9) as u32;

    DateTime::from_timestamp(secs, nanos)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

async fn conversation_context(
    api: &dyn SlackApi,
    config: &Config,
    conversation: &Conversation,
    self_user_id: &str,
) -> Result<String, SlackError> {
    if conversation.is_im {
        return Ok("Direct Message".to_string());
    }

    if conversation.is_mpim {
        let members = api.conversation_members(&conversation.id).await?;
        let names: Vec<String> = members
            .iter()
            .filter(|id| id.as_str() != self_user_id)
            .map(|id| sender_name(config, id))
            .collect();
        return Ok(format!("Group: {}", names.join(", ")));
    }

    let name = conversation.name.as_deref().unwrap_or(&conversation.id);
    Ok(format!("Private Channel: #{name}"))
}

/// Messages from other people in the caller's IMs, group DMs, and private channels.
async fn collect_conversation_messages(
    api: &dyn SlackApi,
    config: &Config,
    self_user_id: &str,
    limit: u32,
) -> Result<Vec<Message>, SlackError> {
    let conversations = api.list_conversations(PRIVATE_CONVERSATION_TYPES).await?;
    let per_conversation = limit.min(HISTORY_PER_CONVERSATION);
    let mut messages = Vec::new();

    for conversation in conversations.iter().filter(|c| !c.is_archived) {
        let history = match api
            .conversation_history(&conversation.id, per_conversation)
            .await
        {
            Ok(history) => history,
            Err(e) => {
                warn!("Skipping history of {}: {}", conversation.id, e);
                continue;
            }
        };

        let kept = filter_user_messages(history, self_user_id);
        if kept.is_empty() {
            continue;
        }

        let context = match conversation_context(api, config, conversation, self_user_id).await {
            Ok(context) => context,
            Err(e) => {
                warn!("Skipping members of {}: {}", conversation.id, e);
                continue;
            }
        };

        for msg in kept {
            let timestamp = parse_ts(&msg.ts);
            messages.push(Message {
                timestamp,
                formatted_time: format_timestamp(timestamp),
                sender: msg
                    .user
                    .as_deref()
                    .map(|id| sender_name(config, id))
                    .unwrap_or_default(),
                text: msg.text,
                context: context.clone(),
            });
        }
    }

    Ok(messages)
}

/// Channel messages mentioning the caller, newest first as returned by search.
async fn collect_mentions(
    api: &dyn SlackApi,
    config: &Config,
    self_user_id: &str,
    limit: u32,
) -> Result<Vec<Message>, SlackError> {
    let matches = api
        .search_messages(&mention_token(self_user_id), limit)
        .await?;

    let stripper = SelfMentionStripper::new(self_user_id);

    Ok(matches
        .into_iter()
        .take(limit as usize)
        .map(|m| {
            let timestamp = parse_ts(&m.ts);
            let channel = if m.channel.name.is_empty() {
                &m.channel.id
            } else {
                &m.channel.name
            };
            let sender = match (m.user.as_deref(), m.username.as_deref()) {
                (Some(id), _) => sender_name(config, id),
                (None, Some(username)) => username.to_string(),
                (None, None) => "unknown".to_string(),
            };

            Message {
                timestamp,
                formatted_time: format_timestamp(timestamp),
                sender,
                text: stripper.strip(&m.text),
                context: format!("#{channel}"),
            }
        })
        .collect())
}

/// Sort newest first and keep at most `limit` messages.
#[must_use]
pub fn newest_first(mut messages: Vec<Message>, limit: usize) -> Vec<Message> {
    messages.sort_by(|a, b| b.timestamp.total_cmp(&a.timestamp));
    messages.truncate(limit);
    messages
}

/// Group by context, keeping contexts in the order they are first seen.
#[must_use]
pub fn group_by_context(messages: Vec<Message>) -> IndexMap<String, Vec<Message>> {
    let mut groups: IndexMap<String, Vec<Message>> = IndexMap::new();
    for msg in messages {
        groups.entry(msg.context.clone()).or_default().push(msg);
    }
    groups
}

fn push_section(lines: &mut Vec<String>, header: &str, groups: &IndexMap<String, Vec<Message>>) {
    if groups.is_empty() {
        return;
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(header.to_string());

    for (context, messages) in groups {
        lines.push(String::new());
        lines.push(format!("### {context}"));
        for msg in messages {
            lines.push(format!(
                "- [{}] {}: {}",
                msg.formatted_time, msg.sender, msg.text
            ));
        }
    }
}

/// Render both sections; a section with no rows is left out entirely.
#[must_use]
pub fn render_report(
    direct: &IndexMap<String, Vec<Message>>,
    mentions: &IndexMap<String, Vec<Message>>,
) -> String {
    let mut lines = Vec::new();
    push_section(&mut lines, DIRECT_HEADER, direct);
    push_section(&mut lines, MENTIONS_HEADER, mentions);

    if lines.is_empty() {
        NO_RECENT_MESSAGES.to_string()
    } else {
        lines.join("\n")
    }
}

/// Build the recent-activity report for `self_user_id`.
///
/// # Errors
///
/// Returns the Slack error if listing conversations or searching fails.
pub async fn recent_activity(
    api: &dyn SlackApi,
    config: &Config,
    self_user_id: &str,
    limit: u32,
) -> Result<String, SlackError> {
    let limit = limit.clamp(1, MAX_ACTIVITY_LIMIT);

    let direct = collect_conversation_messages(api, config, self_user_id, limit).await?;
    let direct = group_by_context(newest_first(direct, limit as usize));

    let mentions = collect_mentions(api, config, self_user_id, limit).await?;
    let mentions = group_by_context(mentions);

    info!(
        "Activity report: {} direct contexts, {} mention channels",
        direct.len(),
        mentions.len()
    );
    Ok(render_report(&direct, &mentions))
}
