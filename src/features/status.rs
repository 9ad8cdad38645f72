use chrono::Utc;
use tracing::info;

use crate::errors::SlackError;
use crate::slack::{Presence, SlackApi, StatusProfile};

/// Longest status expiration accepted, one day.
pub const MAX_EXPIRATION_MINUTES: i64 = 1440;

pub const NO_CHANGES_MESSAGE: &str =
    "No changes requested. Provide a status text, emoji, expiration, or presence.";

/// Arguments of the `update_status` tool. `None` means "not passed",
/// `Some("")` means "explicitly empty".
#[derive(Debug, Clone, Default)]
pub struct StatusRequest {
    pub text: Option<String>,
    pub emoji: Option<String>,
    pub presence: Option<String>,
    pub expiration_minutes: Option<i64>,
}

fn trimmed(value: Option<&String>) -> &str {
    value.map_or("", |v| v.trim())
}

impl StatusRequest {
    #[must_use]
    pub fn clamped_minutes(&self) -> i64 {
        self.expiration_minutes
            .unwrap_or(0)
            .clamp(0, MAX_EXPIRATION_MINUTES)
    }

    fn presence_value(&self) -> Option<&str> {
        Some(trimmed(self.presence.as_ref())).filter(|p| !p.is_empty())
    }

    /// Whether the profile status should be pushed.
    ///
    /// Any text, emoji or expiration triggers it. Passing text/emoji as
    /// empty strings together with a presence also triggers it, which
    /// clears the status while changing presence.
    #[must_use]
    pub fn wants_status_update(&self) -> bool {
        let text = trimmed(self.text.as_ref());
        let emoji = trimmed(self.emoji.as_ref());
        let explicitly_cleared = (self.text.is_some() || self.emoji.is_some())
            && text.is_empty()
            && emoji.is_empty()
            && self.presence_value().is_some();

        !text.is_empty() || !emoji.is_empty() || self.clamped_minutes() > 0 || explicitly_cleared
    }

    /// Profile fields to send, with the expiration made absolute relative to `now`.
    #[must_use]
    pub fn profile(&self, now: i64) -> StatusProfile {
        StatusProfile {
            status_text: trimmed(self.text.as_ref()).to_string(),
            status_emoji: normalize_emoji(trimmed(self.emoji.as_ref())),
            status_expiration: expiration_timestamp(self.clamped_minutes(), now),
        }
    }
}

/// `now + minutes * 60`, or `0` (never expires) when `minutes` is zero.
#[must_use]
pub fn expiration_timestamp(minutes: i64, now: i64) -> i64 {
    if minutes > 0 { now + minutes * 60 } else { 0 }
}

/// Wrap a bare emoji name in colons: `coffee` → `:coffee:`.
#[must_use]
pub fn normalize_emoji(emoji: &str) -> String {
    let name = emoji.trim().trim_matches(':');
    if name.is_empty() {
        String::new()
    } else {
        format!(":{name}:")
    }
}

/// Map user-facing presence words onto Slack's presence values.
///
/// # Errors
///
/// Returns `InvalidInput` for anything other than `online` or `away`.
pub fn parse_presence(value: &str) -> Result<Presence, SlackError> {
    match value.trim().to_lowercase().as_str() {
        "online" => Ok(Presence::Auto),
        "away" => Ok(Presence::Away),
        _ => Err(SlackError::InvalidInput(format!(
            "Invalid presence '{}'. Use 'online' or 'away'.",
            value.trim()
        ))),
    }
}

fn describe_status(profile: &StatusProfile, minutes: i64) -> String {
    if profile.status_text.is_empty() && profile.status_emoji.is_empty() && minutes == 0 {
        return "Status cleared.".to_string();
    }

    if profile.status_text.is_empty() && profile.status_emoji.is_empty() {
        return format!("Status expiration set to {minutes} minutes.");
    }

    let shown = [profile.status_emoji.as_str(), profile.status_text.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let expiry = if minutes > 0 {
        format!(" (expires in {minutes} minutes)")
    } else {
        String::new()
    };
    format!("Status updated to '{shown}'{expiry}.")
}

/// Apply the status and presence sub-updates independently.
///
/// Each sub-update contributes one line, so a rejected presence does not
/// hide a successful status change.
pub async fn update_status(api: &dyn SlackApi, request: &StatusRequest) -> Vec<String> {
    let mut results = Vec::new();

    if request.wants_status_update() {
        let profile = request.profile(Utc::now().timestamp());
        match api.set_profile_status(&profile).await {
            Ok(()) => {
                info!("Updated profile status");
                results.push(describe_status(&profile, request.clamped_minutes()));
            }
            Err(e) => results.push(format!("Error updating status: {e}")),
        }
    }

    if let Some(value) = request.presence_value() {
        match parse_presence(value) {
            Ok(presence) => match api.set_presence(presence).await {
                Ok(()) => {
                    info!("Set presence to {}", presence.as_str());
                    let shown = if presence == Presence::Auto { "online" } else { "away" };
                    results.push(format!("Presence set to {shown}."));
                }
                Err(e) => results.push(format!("Error updating presence: {e}")),
            },
            Err(e) => results.push(format!("Error: {e}")),
        }
    }

    if results.is_empty() {
        results.push(NO_CHANGES_MESSAGE.to_string());
    }
    results
}
