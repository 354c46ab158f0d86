//! Core server plumbing: configuration, shared state, startup

mod config;
mod server;
mod state;

pub use config::{Config, ConfigError};
pub use server::Server;
pub use state::ServerState;
