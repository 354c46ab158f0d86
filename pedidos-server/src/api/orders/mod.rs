//! Order API module
//!
//! CRUD over `/api/pedidos` plus the two workflow transitions:
//! `POST /{id}/emitir` and `POST /{id}/reverter`.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/pedidos", order_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .patch(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/emitir", post(handler::issue))
        .route("/{id}/reverter", post(handler::revert))
}
