use serde::{Deserialize, Serialize};

/// A workspace member as cached in the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub real_name: String,
    #[serde(default)]
    pub first_name: String,
}

impl UserRecord {
    /// Name variants checked by the resolver, in priority order.
    #[must_use]
    pub fn name_fields(&self) -> [&str; 4] {
        [
            &self.username,
            &self.display_name,
            &self.real_name,
            &self.first_name,
        ]
    }
}

/// A message collected for the activity report. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub timestamp: f64,
    pub formatted_time: String,
    pub sender: String,
    pub text: String,
    pub context: String,
}
