//! slack-tools - Slack messaging tools served over a local stdio protocol.
//!
//! The crate exposes a handful of tools (setup, direct/group messages,
//! channel messages, a recent-activity report, status and presence) backed
//! by Slack's Web API with a user token. The only state it owns is a YAML
//! file holding the token and a name→ID directory of users and channels.
//!
//! # Architecture
//!
//! - `core`: process settings and the YAML config store
//! - `slack`: the `SlackApi` seam and its slack-morphism/reqwest client
//! - `features`: directory sync, name resolution, sending, activity, status
//! - `tools`: string-returning tool entry points and the JSON-RPC server
//!
//! # Example
//!
//! ```no_run
//! use slack_tools::core::ConfigStore;
//! use slack_tools::tools::{SlackConnector, SlackTools};
//!
//! #[tokio::main]
//! async fn main() {
//!     slack_tools::setup_logging();
//!
//!     let store = ConfigStore::new("config.yaml");
//!     let mut tools = SlackTools::new(store, SlackConnector::new("https://slack.com/api"));
//!
//!     let reply = tools
//!         .send_channel("general", "Deploy finished", Some(&["andy".to_string()][..]))
//!         .await;
//!     println!("{reply}");
//! }
//! ```

pub mod core;
pub mod errors;
pub mod features;
pub mod slack;
pub mod tools;
pub mod utils;

/// Configure structured JSON logging on stderr.
///
/// stdout is reserved for protocol messages, so logs never go there. The
/// level comes from `RUST_LOG` and defaults to `info`. Calling this more
/// than once is harmless.
///
/// # Example
///
/// ```
/// slack_tools::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let default_level = if cfg!(feature = "debug-logs") {
        "debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_target(true)
        .with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
