//! Session authentication
//!
//! Authentication is fully delegated to the external Portal: this module
//! only forwards the opaque `X-Session-Token` header to the Portal's verify
//! endpoint and attaches the verified session to the request.

mod middleware;
mod portal;

pub use middleware::require_session;
pub use portal::PortalClient;
