//! Shared types for the Pedidos de Faturamento backend
//!
//! Common types used across the server and client crates: domain models,
//! the unified error system, and stock-code normalization.

pub mod code;
pub mod error;
pub mod models;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use code::StockCode;
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{
    ConfirmRequest, IssueOutcome, Order, OrderCreate, OrderItem, OrderStatus, OrderUpdate,
    RevertOutcome, SessionInfo, Shortfall, StockItem, StockQuantityUpdate, VerifySessionRequest,
    VerifySessionResponse,
};
