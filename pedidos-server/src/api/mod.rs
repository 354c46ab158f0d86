//! API route modules
//!
//! # Structure
//!
//! - [`health`] - public health check
//! - [`orders`] - order CRUD and the issue/revert transitions
//! - [`stock`] - stock ledger listing and restocking writes
//!
//! Every `/api/*` route except `/api/health` sits behind the Portal
//! session middleware.

pub mod health;
pub mod orders;
pub mod stock;

use axum::Router;
use axum::middleware;

use crate::auth::require_session;
use crate::core::ServerState;

/// Assemble the full API router
pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(orders::router())
        .merge(stock::router())
        .layer(middleware::from_fn_with_state(state, require_session))
}
