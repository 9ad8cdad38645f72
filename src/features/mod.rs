pub mod activity;
pub mod directory;
pub mod dispatch;
pub mod resolve;
pub mod status;

pub use resolve::{resolve_user, sender_name};
pub use status::StatusRequest;
