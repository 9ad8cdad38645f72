use std::collections::HashSet;
use tracing::info;

use super::resolve::resolve_all;
use crate::core::Config;
use crate::errors::SlackError;
use crate::slack::SlackApi;
use crate::slack::mentions::prepend_mentions;

/// Send a direct message to one user, or a group message to several.
///
/// All names are resolved before anything is sent, so an unknown recipient
/// means nothing goes out at all.
///
/// # Errors
///
/// Returns `UserNotFound` for the first unknown name, `InvalidInput` for an
/// empty recipient list, or the Slack error from opening/posting.
pub async fn send_direct(
    api: &dyn SlackApi,
    config: &Config,
    names: &[String],
    text: &str,
) -> Result<String, SlackError> {
    if names.is_empty() {
        return Err(SlackError::InvalidInput(
            "At least one user name is required".to_string(),
        ));
    }

    let mut user_ids = resolve_all(config, names)?;
    let mut seen = HashSet::new();
    user_ids.retain(|id| seen.insert(id.clone()));

    if let [user_id] = user_ids.as_slice() {
        // Posting to a user ID lands in the implicit IM with that user.
        api.post_message(user_id, text).await?;
        info!("Sent direct message to {}", user_id);
        return Ok(format!(
            "Direct message sent successfully to {}!",
            names.join(", ")
        ));
    }

    let group_id = api.open_conversation(&user_ids).await?;
    api.post_message(&group_id, text).await?;
    info!(
        "Sent group message to {} ({} members)",
        group_id,
        user_ids.len()
    );

    Ok(format!(
        "Group message sent successfully to {}!",
        names.join(", ")
    ))
}

/// Post to a channel from the directory, optionally @-mentioning users first.
///
/// # Errors
///
/// Returns `ChannelNotFound`/`UserNotFound` before sending, or the Slack error from posting.
pub async fn send_channel(
    api: &dyn SlackApi,
    config: &Config,
    channel_name: &str,
    text: &str,
    mentions: &[String],
) -> Result<String, SlackError> {
    let channel_key = channel_name.trim().to_lowercase();
    let channel_id = config
        .channel_id(&channel_key)
        .ok_or_else(|| SlackError::ChannelNotFound(channel_key.clone()))?;

    let mention_ids = resolve_all(config, mentions)?;
    let final_text = prepend_mentions(&mention_ids, text);

    api.post_message(channel_id, &final_text).await?;
    info!("Sent message to channel {} ({})", channel_key, channel_id);

    let mentioned = if mentions.is_empty() {
        String::new()
    } else {
        format!(" (mentioning {})", mentions.join(", "))
    };
    Ok(format!(
        "Message sent successfully to #{channel_key}!{mentioned}"
    ))
}
