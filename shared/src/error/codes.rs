//! Unified error codes for the Pedidos backend
//!
//! This module defines all error codes used across the server, client and
//! frontend. Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication / session errors
//! - 2xxx: Order errors
//! - 3xxx: Stock errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 6,
    /// Value out of range
    ValueOutOfRange = 7,

    // ==================== 1xxx: Auth / Session ====================
    /// No session token was provided
    NotAuthenticated = 1001,
    /// The Portal rejected the session token
    SessionInvalid = 1002,
    /// The session has expired
    SessionExpired = 1003,
    /// The Portal verification service could not be reached
    PortalUnavailable = 1004,

    // ==================== 2xxx: Order ====================
    /// Order not found
    OrderNotFound = 2001,
    /// Order has already been issued
    OrderAlreadyIssued = 2002,
    /// Order is not issued (nothing to revert)
    OrderNotIssued = 2003,
    /// Order is still issued (revert before deleting)
    OrderStillIssued = 2004,
    /// Operator confirmation is required for this transition
    ConfirmationRequired = 2005,
    /// Order has no items
    OrderEmpty = 2006,
    /// The order status write failed after stock was already debited
    OrderStatusWriteFailed = 2101,

    // ==================== 3xxx: Stock ====================
    /// Stock item not found for a line item's code
    StockCodeNotFound = 3001,
    /// Requested quantity exceeds the available quantity
    InsufficientStock = 3002,
    /// A stock quantity write failed mid-transition
    StockWriteFailed = 3101,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Remote data store request failed
    StoreError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Stock is in an inconsistent state: a transition failed and
    /// compensation could not restore every quantity
    StockInconsistent = 9101,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default human-readable message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::RequiredField => "Required field missing",
            Self::ValueOutOfRange => "Value out of range",

            Self::NotAuthenticated => "Session token not provided",
            Self::SessionInvalid => "Invalid session",
            Self::SessionExpired => "Session expired",
            Self::PortalUnavailable => "Authentication service unavailable",

            Self::OrderNotFound => "Order not found",
            Self::OrderAlreadyIssued => "Order has already been issued",
            Self::OrderNotIssued => "Order is not issued",
            Self::OrderStillIssued => "Order is still issued; revert it first",
            Self::ConfirmationRequired => "Operator confirmation required",
            Self::OrderEmpty => "Order has no items",
            Self::OrderStatusWriteFailed => "Order status update failed after stock was debited",

            Self::StockCodeNotFound => "Stock code not found",
            Self::InsufficientStock => "Insufficient stock quantity",
            Self::StockWriteFailed => "Stock quantity update failed",

            Self::InternalError => "Internal server error",
            Self::StoreError => "Data store request failed",
            Self::NetworkError => "Network error",
            Self::StockInconsistent => "Stock left inconsistent; manual reconciliation required",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            6 => Self::RequiredField,
            7 => Self::ValueOutOfRange,

            1001 => Self::NotAuthenticated,
            1002 => Self::SessionInvalid,
            1003 => Self::SessionExpired,
            1004 => Self::PortalUnavailable,

            2001 => Self::OrderNotFound,
            2002 => Self::OrderAlreadyIssued,
            2003 => Self::OrderNotIssued,
            2004 => Self::OrderStillIssued,
            2005 => Self::ConfirmationRequired,
            2006 => Self::OrderEmpty,
            2101 => Self::OrderStatusWriteFailed,

            3001 => Self::StockCodeNotFound,
            3002 => Self::InsufficientStock,
            3101 => Self::StockWriteFailed,

            9001 => Self::InternalError,
            9002 => Self::StoreError,
            9003 => Self::NetworkError,
            9101 => Self::StockInconsistent,

            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}
