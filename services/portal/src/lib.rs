pub mod adapters;
pub mod config;
pub mod context;
pub mod error;
pub mod stores;
pub mod views;
pub mod web;
pub mod widgets;
pub mod wire;

pub use config::Config;
pub use context::PortalContext;
pub use error::ApiError;
