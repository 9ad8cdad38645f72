use crate::core::Config;
use crate::errors::SlackError;

/// Find a user ID by any of the stored name variants (username, display
/// name, real name, first name), compared case-insensitively.
///
/// Records are scanned in insertion order and the first match wins; there
/// is no ranking when several users share a name.
#[must_use]
pub fn resolve_user<'a>(config: &'a Config, query: &str) -> Option<&'a str> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    config
        .users()
        .find(|user| {
            user.name_fields()
                .iter()
                .any(|field| !field.is_empty() && field.to_lowercase() == needle)
        })
        .map(|user| user.id.as_str())
}

/// Resolve every name or fail on the first one that is unknown.
///
/// # Errors
///
/// Returns `SlackError::UserNotFound` naming the first unresolved entry.
pub fn resolve_all(config: &Config, names: &[String]) -> Result<Vec<String>, SlackError> {
    names
        .iter()
        .map(|name| {
            resolve_user(config, name)
                .map(str::to_string)
                .ok_or_else(|| SlackError::UserNotFound(name.clone()))
        })
        .collect()
}

/// Human-readable name for a user ID, falling back to the raw ID.
#[must_use]
pub fn sender_name(config: &Config, user_id: &str) -> String {
    config
        .users()
        .find(|user| user.id == user_id)
        .and_then(|user| {
            [&user.display_name, &user.real_name, &user.username]
                .into_iter()
                .find(|name| !name.is_empty())
        })
        .map_or_else(|| user_id.to_string(), Clone::clone)
}
