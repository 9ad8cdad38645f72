use regex::Regex;

/// Slack mention markup for a user ID.
#[must_use]
pub fn mention_token(user_id: &str) -> String {
    format!("<@{user_id}>")
}

/// Prefix `body` with space-joined mention tokens. No mentions leaves `body` untouched.
#[must_use]
pub fn prepend_mentions(user_ids: &[String], body: &str) -> String {
    if user_ids.is_empty() {
        return body.to_string();
    }

    let mentions: Vec<String> = user_ids.iter().map(|id| mention_token(id)).collect();
    format!("{} {}", mentions.join(" "), body)
}

/// Removes every mention of one user from message text, in both the `<@ID>`
/// and `<@ID|label>` forms, then tidies the surrounding whitespace.
///
/// The pattern is compiled once, so build one per report and reuse it.
#[derive(Debug, Clone)]
pub struct SelfMentionStripper {
    pattern: Option<Regex>,
}

impl SelfMentionStripper {
    #[must_use]
    pub fn new(user_id: &str) -> Self {
        let pattern = format!(r"\s*<@{}(?:\|[^>]*)?>\s*", regex::escape(user_id));
        Self {
            pattern: Regex::new(&pattern).ok(),
        }
    }

    #[must_use]
    pub fn strip(&self, text: &str) -> String {
        match &self.pattern {
            Some(re) => re.replace_all(text, " ").trim().to_string(),
            None => text.to_string(),
        }
    }
}
