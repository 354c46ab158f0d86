//! Stock API handlers
//!
//! Reads plus the external restocking write. Issuance never goes through
//! these routes; it debits through the coordinator.

use axum::{
    Json,
    extract::{Path, State},
};

use shared::models::{StockItem, StockQuantityUpdate};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// GET /api/estoque - the full stock ledger
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<StockItem>>> {
    let rows = state.store.list_stock().await?;
    Ok(Json(rows))
}

/// PATCH /api/estoque/{codigo} - set an absolute available quantity
/// (restocking, corrections)
pub async fn update_quantity(
    State(state): State<ServerState>,
    Path(codigo): Path<String>,
    Json(payload): Json<StockQuantityUpdate>,
) -> AppResult<Json<StockItem>> {
    if !payload.quantidade.is_finite() || payload.quantidade < 0.0 {
        return Err(AppError::validation(format!(
            "quantidade must be a non-negative number, got {}",
            payload.quantidade
        )));
    }

    let row = state
        .store
        .set_stock_quantity(&codigo, payload.quantidade)
        .await?;
    tracing::info!(codigo = %row.codigo, quantidade = row.quantidade, "Stock quantity set");
    Ok(Json(row))
}
