//! Portal session types
//!
//! Sessions are opaque tokens issued by the external Portal. The backend
//! never inspects a token: it forwards it to the Portal's verify endpoint
//! and trusts the answer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body for `POST {PORTAL_URL}/api/verify-session`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifySessionRequest {
    #[serde(rename = "sessionToken")]
    pub session_token: String,
}

/// Portal verify-session answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifySessionResponse {
    pub valid: bool,
    #[serde(default)]
    pub session: Option<SessionInfo>,
}

/// Verified session payload, attached to authenticated requests
///
/// The Portal owns this shape; everything beyond the common identity fields
/// is carried opaquely in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionInfo {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_name() {
        let req = VerifySessionRequest {
            session_token: "abc123".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"sessionToken":"abc123"}"#
        );
    }

    #[test]
    fn test_unknown_session_fields_preserved() {
        let json = r#"{"valid": true, "session": {"username": "ana", "role": "staff"}}"#;
        let resp: VerifySessionResponse = serde_json::from_str(json).unwrap();
        assert!(resp.valid);
        let session = resp.session.unwrap();
        assert_eq!(session.username.as_deref(), Some("ana"));
        assert_eq!(session.extra.get("role").unwrap(), "staff");
    }

    #[test]
    fn test_invalid_without_session() {
        let resp: VerifySessionResponse = serde_json::from_str(r#"{"valid": false}"#).unwrap();
        assert!(!resp.valid);
        assert!(resp.session.is_none());
    }
}
