//! Stock API module

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/estoque", stock_routes())
}

fn stock_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{codigo}", patch(handler::update_quantity))
}
