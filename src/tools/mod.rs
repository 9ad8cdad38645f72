//! Tool surface and the stdio server that exposes it

pub mod handlers;
pub mod schema;
pub mod server;

pub use handlers::{Connector, SlackConnector, SlackTools};
pub use server::StdioServer;
