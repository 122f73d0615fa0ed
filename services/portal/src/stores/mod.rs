pub mod auth;
pub mod content;

pub use auth::AuthStore;
pub use content::{ContentState, ContentStore, LoadReport};
