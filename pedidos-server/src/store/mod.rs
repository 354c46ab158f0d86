//! Data store access
//!
//! The orders and stock tables live in a hosted relational store reached
//! through its generic REST query interface. [`DataStore`] is the seam the
//! rest of the crate programs against; [`RestStore`] talks to the real
//! store, [`MemoryStore`] backs tests and local development.

mod memory;
mod rest;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use shared::StockCode;
use shared::models::{Order, OrderStatus, OrderUpdate, StockItem};

pub use memory::MemoryStore;
pub use rest::RestStore;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Store request failed: {0}")]
    Request(String),

    #[error("Store answered {status}: {body}")]
    Response { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        Self::Request(e.to_string())
    }
}

impl From<StoreError> for shared::error::AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(what) => shared::error::AppError::not_found(what),
            other => shared::error::AppError::store(other.to_string()),
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Access to the two store tables
///
/// Writes are field-level partial updates, mirroring the store's
/// PATCH-for-update semantics. `set_order_status` always writes status and
/// issuance timestamp together so the status/timestamp coupling can never
/// be observed half-applied.
#[async_trait]
pub trait DataStore: Send + Sync + std::fmt::Debug {
    // ---- orders ----

    /// All orders, newest code first
    async fn list_orders(&self) -> StoreResult<Vec<Order>>;

    async fn get_order(&self, id: &str) -> StoreResult<Option<Order>>;

    /// Insert a new order row, returning the stored representation
    async fn create_order(&self, order: Order) -> StoreResult<Order>;

    /// Partial update of an order's pass-through fields and items
    async fn update_order(&self, id: &str, update: OrderUpdate) -> StoreResult<Order>;

    /// Write status and issuance timestamp in a single update
    async fn set_order_status(
        &self,
        id: &str,
        status: OrderStatus,
        data_emissao: Option<DateTime<Utc>>,
    ) -> StoreResult<Order>;

    /// Hard delete; no audit trail, no stock side effect
    async fn delete_order(&self, id: &str) -> StoreResult<()>;

    /// Next sequential human-facing order code (`max(existing) + 1`)
    async fn next_order_code(&self) -> StoreResult<i64>;

    // ---- stock ----

    async fn list_stock(&self) -> StoreResult<Vec<StockItem>>;

    /// Look up a ledger row by normalized code
    async fn get_stock_item(&self, code: &StockCode) -> StoreResult<Option<StockItem>>;

    /// Write an absolute available quantity for a row, addressed by the
    /// row's raw `codigo` value as stored
    async fn set_stock_quantity(&self, codigo: &str, quantidade: f64) -> StoreResult<StockItem>;
}
