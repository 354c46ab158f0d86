//! Portal verification client

use std::time::Duration;

use shared::error::{AppError, AppResult};
use shared::models::{SessionInfo, VerifySessionRequest, VerifySessionResponse};

use crate::core::Config;

/// Client for the Portal's session verification endpoint
///
/// A token is valid, invalid or expired; the backend has no visibility into
/// its internals and keeps no session state of its own.
#[derive(Debug, Clone)]
pub struct PortalClient {
    client: reqwest::Client,
    base_url: String,
}

impl PortalClient {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .expect("Failed to build Portal HTTP client");

        Self {
            client,
            base_url: config.portal_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Verify a session token against the Portal
    ///
    /// - Portal answers non-2xx or `valid: false` → `SessionInvalid`
    /// - Portal unreachable → `PortalUnavailable` (surfaced as 502, never
    ///   conflated with an invalid token)
    pub async fn verify_session(&self, token: &str) -> AppResult<SessionInfo> {
        let url = format!("{}/api/verify-session", self.base_url);
        let body = VerifySessionRequest {
            session_token: token.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Portal verification request failed: {}", e);
                AppError::portal_unavailable(e.to_string())
            })?;

        if !response.status().is_success() {
            return Err(AppError::session_invalid());
        }

        let verified: VerifySessionResponse = response
            .json()
            .await
            .map_err(|e| AppError::portal_unavailable(format!("invalid Portal response: {e}")))?;

        if !verified.valid {
            return Err(AppError::session_invalid());
        }

        Ok(verified.session.unwrap_or_default())
    }
}
