//! Utility module - shared helpers and re-exported error types

pub mod logger;
pub mod validation;

// Re-export error types from shared so handlers import from one place
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
