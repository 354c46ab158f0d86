//! Order API handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde_json::json;
use validator::Validate;

use shared::models::{
    ConfirmRequest, IssueOutcome, Order, OrderCreate, OrderItem, OrderStatus, OrderUpdate,
    RevertOutcome, SessionInfo,
};

use crate::core::ServerState;
use crate::utils::validation::{
    MAX_SHORT_TEXT_LEN, MAX_TEXT_LEN, validate_cnpj, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Drop items that never participate in the workflow (blank code or zero
/// quantity) and renumber the survivors for display.
fn persistable_items(items: Vec<OrderItem>) -> Vec<OrderItem> {
    items
        .into_iter()
        .filter(|item| item.counts_for_stock())
        .enumerate()
        .map(|(pos, mut item)| {
            item.item = Some(pos as u32 + 1);
            item
        })
        .collect()
}

/// GET /api/pedidos - all orders, newest code first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let orders = state.store.list_orders().await?;
    Ok(Json(orders))
}

/// GET /api/pedidos/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state
        .store
        .get_order(&id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found")))?;
    Ok(Json(order))
}

/// POST /api/pedidos - register a new order
///
/// Always created pending; the sequential code is assigned here when the
/// caller does not supply one.
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let cnpj = validate_cnpj(&payload.cnpj)?;

    let items = persistable_items(payload.items);
    if items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }

    let codigo = match payload.codigo {
        Some(codigo) => codigo,
        None => state.store.next_order_code().await?,
    };

    let order = Order {
        id: None,
        codigo,
        status: OrderStatus::Pending,
        data_emissao: None,
        items,
        cnpj: Some(cnpj),
        razao_social: Some(payload.razao_social),
        inscricao_estadual: payload.inscricao_estadual,
        endereco: Some(payload.endereco),
        telefone: payload.telefone,
        contato: payload.contato,
        email: payload.email.map(|e| e.to_lowercase()),
        documento: payload.documento,
        valor_total: payload.valor_total,
        local_entrega: payload.local_entrega,
        setor: payload.setor,
        previsao_entrega: payload.previsao_entrega,
        transportadora: payload.transportadora,
        valor_frete: payload.valor_frete,
        vendedor: Some(payload.vendedor),
        peso: payload.peso,
        quantidade: payload.quantidade,
        volumes: payload.volumes,
        created_at: None,
    };

    let created = state.store.create_order(order).await?;
    tracing::info!(codigo = created.codigo, "Order registered");
    Ok(Json(created))
}

/// PATCH /api/pedidos/{id} - partial update of pass-through fields and
/// items
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(mut payload): Json<OrderUpdate>,
) -> AppResult<Json<Order>> {
    if let Some(cnpj) = payload.cnpj.take() {
        payload.cnpj = Some(validate_cnpj(&cnpj)?);
    }
    if let Some(razao_social) = &payload.razao_social {
        validate_required_text(razao_social, "razao_social", MAX_TEXT_LEN)?;
    }
    if let Some(endereco) = &payload.endereco {
        validate_required_text(endereco, "endereco", MAX_TEXT_LEN)?;
    }
    if let Some(vendedor) = &payload.vendedor {
        validate_required_text(vendedor, "vendedor", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(items) = payload.items.take() {
        let items = persistable_items(items);
        if items.is_empty() {
            return Err(AppError::new(ErrorCode::OrderEmpty));
        }
        payload.items = Some(items);
    }

    let updated = state.store.update_order(&id, payload).await?;
    tracing::info!(codigo = updated.codigo, "Order updated");
    Ok(Json(updated))
}

/// DELETE /api/pedidos/{id} - hard delete
///
/// An issued order must be reverted first; deletion itself never touches
/// stock.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let order = state
        .store
        .get_order(&id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found")))?;

    if order.status.is_issued() {
        return Err(AppError::with_message(
            ErrorCode::OrderStillIssued,
            format!("Order {} is issued; revert it before deleting", order.codigo),
        ));
    }

    state.store.delete_order(&id).await?;
    tracing::info!(codigo = order.codigo, "Order deleted");
    Ok(Json(json!({ "success": true })))
}

/// POST /api/pedidos/{id}/emitir - issue a pending order
///
/// Debits stock for every line item and marks the order issued. The body
/// carries the operator's confirmation; without it the transition is
/// rejected before any write.
pub async fn issue(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Extension(session): Extension<SessionInfo>,
    Json(confirm): Json<ConfirmRequest>,
) -> AppResult<Json<IssueOutcome>> {
    let outcome = state.issuance.issue(&id, confirm.confirmado).await?;
    tracing::info!(
        codigo = outcome.order.codigo,
        operator = session.username.as_deref().unwrap_or("unknown"),
        "Issuance confirmed"
    );
    Ok(Json(outcome))
}

/// POST /api/pedidos/{id}/reverter - revert an issued order
///
/// Credits stock back for every line item still present in the ledger and
/// returns the order to pending.
pub async fn revert(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Extension(session): Extension<SessionInfo>,
    Json(confirm): Json<ConfirmRequest>,
) -> AppResult<Json<RevertOutcome>> {
    let outcome = state.issuance.revert(&id, confirm.confirmado).await?;
    tracing::info!(
        codigo = outcome.order.codigo,
        operator = session.username.as_deref().unwrap_or("unknown"),
        "Reversal confirmed"
    );
    Ok(Json(outcome))
}
