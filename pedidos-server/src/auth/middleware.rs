//! Session middleware
//!
//! Axum middleware verifying the `X-Session-Token` header against the
//! Portal before any protected handler runs.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use shared::error::AppError;
use shared::models::SessionInfo;

use crate::core::ServerState;
use crate::security_log;

/// Header carrying the opaque Portal session token
pub const SESSION_TOKEN_HEADER: &str = "x-session-token";

/// Session middleware - requires a verified Portal session
///
/// Extracts the token from `X-Session-Token` and verifies it against the
/// Portal. On success the verified [`SessionInfo`] is injected into the
/// request extensions.
///
/// # Paths that skip verification
///
/// - `OPTIONS *` (CORS preflight)
/// - non-`/api/` paths (static frontend, 404s)
/// - `/api/health`
///
/// # Errors
///
/// | Condition | HTTP status |
/// |-----------|-------------|
/// | Missing header | 401 NotAuthenticated |
/// | Portal rejects the token | 401 SessionInvalid |
/// | Portal unreachable | 502 PortalUnavailable |
pub async fn require_session(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // Allow CORS preflight OPTIONS requests through
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Non-API routes skip verification (they 404 normally)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    // Public API routes
    if path == "/api/health" {
        return Ok(next.run(req).await);
    }

    let token = match req
        .headers()
        .get(SESSION_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|t| !t.is_empty())
    {
        Some(token) => token.to_string(),
        None => {
            security_log!("WARN", "session_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    match state.portal.verify_session(&token).await {
        Ok(session) => {
            req.extensions_mut().insert(session);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "session_rejected",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );
            Err(e)
        }
    }
}

