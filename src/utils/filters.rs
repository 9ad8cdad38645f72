use crate::slack::api::HistoryMessage;

/// Filters conversation history down to messages written by other people:
/// drops the caller's own messages, bot posts, authorless entries, and
/// anything with a subtype (joins, edits, topic changes, ...).
#[must_use]
pub fn filter_user_messages(
    messages: Vec<HistoryMessage>,
    self_user_id: &str,
) -> Vec<HistoryMessage> {
    messages
        .into_iter()
        .filter(|msg| {
            let is_user_message = msg.user.is_some();
            let is_bot_message = msg.bot_id.is_some();
            let is_system_message = msg.subtype.is_some();
            let is_from_self = msg.user.as_deref() == Some(self_user_id);

            is_user_message && !is_bot_message && !is_system_message && !is_from_self
        })
        .collect()
}
