//! Unified error system for the Pedidos backend
//!
//! This module provides:
//! - [`ErrorCode`]: standardized error codes for all error types
//! - [`ErrorCategory`]: classification of errors by domain
//! - [`AppError`]: rich error type with codes, messages, and details
//! - [`ApiResponse`]: unified API response format
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication / session errors
//! - 2xxx: Order errors
//! - 3xxx: Stock errors
//! - 9xxx: System errors
//!
//! Validation errors (wrong status, missing order, shortfalls) are always
//! reported before any mutation; the partial-failure codes
//! ([`ErrorCode::StockWriteFailed`], [`ErrorCode::OrderStatusWriteFailed`],
//! [`ErrorCode::StockInconsistent`]) mean side effects were applied and the
//! store state needs attention; the two classes are kept distinct so callers
//! never mistake one class for the other.
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! // Create a simple error
//! let err = AppError::new(ErrorCode::OrderNotFound);
//!
//! // Create an error with custom message and details
//! let err = AppError::validation("Missing required field")
//!     .with_detail("field", "razao_social");
//!
//! // Convert to API response
//! let response = ApiResponse::<()>::error(&err);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
