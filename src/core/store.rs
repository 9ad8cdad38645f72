//! YAML-backed store for the access token and the name→ID directory.
//!
//! The file is always read in full and rewritten in full. Callers are
//! expected to `load()` right before they need the mappings instead of
//! holding on to a `Config` between tool calls, so the on-disk state is
//! always the one in effect.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::models::UserRecord;
use crate::errors::SlackError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub user_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<IndexMap<String, UserRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<IndexMap<String, String>>,
}

impl Config {
    /// A fresh config as written by `setup`: the token plus empty sections.
    #[must_use]
    pub fn new(user_token: impl Into<String>) -> Self {
        Self {
            user_token: user_token.into(),
            users: Some(IndexMap::new()),
            channels: Some(IndexMap::new()),
        }
    }

    /// Make sure both mapping sections exist before merging into them.
    pub fn ensure_sections(&mut self) {
        self.users.get_or_insert_with(IndexMap::new);
        self.channels.get_or_insert_with(IndexMap::new);
    }

    pub fn users(&self) -> impl Iterator<Item = &UserRecord> {
        self.users.iter().flat_map(IndexMap::values)
    }

    pub fn users_mut(&mut self) -> &mut IndexMap<String, UserRecord> {
        self.users.get_or_insert_with(IndexMap::new)
    }

    pub fn channels_mut(&mut self) -> &mut IndexMap<String, String> {
        self.channels.get_or_insert_with(IndexMap::new)
    }

    /// Look up a channel ID by name; the name is lower-cased first.
    #[must_use]
    pub fn channel_id(&self, name: &str) -> Option<&str> {
        self.channels
            .as_ref()
            .and_then(|channels| channels.get(&name.to_lowercase()))
            .map(String::as_str)
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        !self.user_token.trim().is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file. A missing file means "not configured" and is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<Config>, SlackError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // An empty file deserializes to YAML null, which is not a Config.
        if raw.trim().is_empty() {
            return Ok(None);
        }

        let config: Config = serde_yaml::from_str(&raw)?;
        Ok(Some(config))
    }

    /// Like `load`, but treats a missing file as `SlackError::NotConfigured`.
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` when there is no file, or the underlying I/O or parse error.
    pub fn load_required(&self) -> Result<Config, SlackError> {
        self.load()?.ok_or(SlackError::NotConfigured)
    }

    /// Overwrite the file with `config`, preserving map key order.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, config: &Config) -> Result<(), SlackError> {
        let raw = serde_yaml::to_string(config)?;
        std::fs::write(&self.path, raw)?;
        debug!("Wrote config to {}", self.path.display());
        Ok(())
    }
}
