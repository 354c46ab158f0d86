//! Issuance workflow errors
//!
//! Two classes, never conflated:
//!
//! - validation errors: rejected before any mutation, safe to retry after
//!   fixing the condition;
//! - partial failures: a write failed after earlier writes succeeded; the
//!   error says what was applied and what compensation restored, so the
//!   operator knows whether the store needs inspection.

use serde_json::json;
use thiserror::Error;

use shared::error::{AppError, ErrorCode};
use shared::models::Shortfall;

use crate::store::StoreError;

/// Issuance / reversal errors
#[derive(Debug, Error)]
pub enum IssuanceError {
    // ---- validation (no side effects applied) ----
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Order {0} has already been issued")]
    AlreadyIssued(String),

    #[error("Order {0} is not issued")]
    NotIssued(String),

    #[error("Operator confirmation required")]
    NotConfirmed,

    #[error("Insufficient stock for {} item(s)", .0.len())]
    InsufficientStock(Vec<Shortfall>),

    // ---- partial failures (side effects were applied) ----
    /// A stock write failed mid-loop; every previously applied write was
    /// compensated, the store is consistent again.
    #[error("Stock write failed for {codigo}: {message}; prior writes were restored")]
    StockWriteFailed { codigo: String, message: String },

    /// The order status write failed after all stock writes succeeded; the
    /// stock writes were compensated.
    #[error("Order status write failed: {message}; stock writes were restored")]
    OrderStatusWriteFailed { message: String },

    /// Compensation itself failed: the listed codes still carry the
    /// transition's writes. Manual reconciliation required.
    #[error("Stock inconsistent after failed transition: {message}")]
    StockInconsistent {
        message: String,
        /// Codes whose writes could not be restored
        unrestored: Vec<String>,
    },

    // ---- infrastructure ----
    #[error("Data store error: {0}")]
    Store(#[from] StoreError),
}

impl From<IssuanceError> for AppError {
    fn from(err: IssuanceError) -> Self {
        match err {
            IssuanceError::OrderNotFound(id) => {
                AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
            }
            IssuanceError::AlreadyIssued(id) => AppError::with_message(
                ErrorCode::OrderAlreadyIssued,
                format!("Order {id} has already been issued"),
            ),
            IssuanceError::NotIssued(id) => AppError::with_message(
                ErrorCode::OrderNotIssued,
                format!("Order {id} is not issued"),
            ),
            IssuanceError::NotConfirmed => AppError::new(ErrorCode::ConfirmationRequired),
            IssuanceError::InsufficientStock(shortfalls) => {
                AppError::new(ErrorCode::InsufficientStock)
                    .with_detail("shortfalls", json!(shortfalls))
            }
            IssuanceError::StockWriteFailed { codigo, message } => {
                AppError::with_message(
                    ErrorCode::StockWriteFailed,
                    format!("Stock write failed for {codigo}: {message}"),
                )
                .with_detail("codigo", codigo)
                .with_detail("restored", true)
            }
            IssuanceError::OrderStatusWriteFailed { message } => {
                AppError::with_message(
                    ErrorCode::OrderStatusWriteFailed,
                    format!("Order status write failed: {message}"),
                )
                .with_detail("restored", true)
            }
            IssuanceError::StockInconsistent {
                message,
                unrestored,
            } => AppError::with_message(
                ErrorCode::StockInconsistent,
                format!("Stock inconsistent: {message}"),
            )
            .with_detail("unrestored", json!(unrestored)),
            IssuanceError::Store(e) => match e {
                StoreError::NotFound(what) => AppError::not_found(what),
                other => AppError::store(other.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_map_to_4xx() {
        let err: AppError = IssuanceError::OrderNotFound("x".to_string()).into();
        assert_eq!(err.code, ErrorCode::OrderNotFound);
        assert!(!err.is_partial_failure());

        let err: AppError = IssuanceError::NotConfirmed.into();
        assert_eq!(err.code, ErrorCode::ConfirmationRequired);

        let err: AppError = IssuanceError::InsufficientStock(vec![Shortfall::CodeNotFound {
            codigo: "ZZZ".to_string(),
        }])
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert!(err.details.unwrap().contains_key("shortfalls"));
    }

    #[test]
    fn test_partial_failures_are_flagged() {
        let err: AppError = IssuanceError::StockWriteFailed {
            codigo: "A1".to_string(),
            message: "timeout".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::StockWriteFailed);
        assert!(err.is_partial_failure());

        let err: AppError = IssuanceError::StockInconsistent {
            message: "credit for B2 failed".to_string(),
            unrestored: vec!["B2".to_string()],
        }
        .into();
        assert_eq!(err.code, ErrorCode::StockInconsistent);
        assert!(err.is_partial_failure());
    }
}
