//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound | Self::OrderNotFound | Self::StockCodeNotFound => {
                StatusCode::NOT_FOUND
            }

            // 409 Conflict - wrong state for the requested transition
            Self::AlreadyExists
            | Self::OrderAlreadyIssued
            | Self::OrderNotIssued
            | Self::OrderStillIssued => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated | Self::SessionInvalid | Self::SessionExpired => {
                StatusCode::UNAUTHORIZED
            }

            // 502 Bad Gateway - the Portal could not be reached
            Self::PortalUnavailable => StatusCode::BAD_GATEWAY,

            // 422 Unprocessable Entity - business rule violations
            Self::InsufficientStock => StatusCode::UNPROCESSABLE_ENTITY,

            // 400 Bad Request
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::RequiredField
            | Self::ValueOutOfRange
            | Self::ConfirmationRequired
            | Self::OrderEmpty => StatusCode::BAD_REQUEST,

            // 500 Internal Server Error - including every partial-failure
            // code: side effects were applied and the caller must not retry
            // blindly
            Self::Unknown
            | Self::OrderStatusWriteFailed
            | Self::StockWriteFailed
            | Self::InternalError
            | Self::StoreError
            | Self::NetworkError
            | Self::StockInconsistent => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_4xx() {
        assert_eq!(
            ErrorCode::OrderNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::OrderAlreadyIssued.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::ConfirmationRequired.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::InsufficientStock.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_partial_failures_are_5xx() {
        assert_eq!(
            ErrorCode::StockWriteFailed.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::OrderStatusWriteFailed.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::StockInconsistent.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_mapping() {
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::SessionExpired.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::PortalUnavailable.http_status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
