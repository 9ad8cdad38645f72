//! All Slack-specific functionality

pub mod api;
pub mod client;
pub mod mentions;

// Re-export main types for convenience
pub use api::{Presence, SlackApi, StatusProfile};
pub use client::SlackClient;
