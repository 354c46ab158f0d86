//! Pedidos Client - HTTP client for the Pedidos de Faturamento backend
//!
//! Provides typed network calls to the backend API, authenticated with a
//! Portal session token. Used by front-ends and by the backend's own
//! integration tests.

pub mod config;
pub mod error;
pub mod http;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;

// Re-export shared types for convenience
pub use shared::models::{
    ConfirmRequest, IssueOutcome, Order, OrderCreate, OrderItem, OrderStatus, OrderUpdate,
    RevertOutcome, Shortfall, StockItem, StockQuantityUpdate,
};
