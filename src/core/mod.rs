//! Process settings, the persisted directory, and shared models

pub mod config;
pub mod models;
pub mod store;

pub use models::{Message, UserRecord};
pub use store::{Config, ConfigStore};
