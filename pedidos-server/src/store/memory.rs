//! In-memory data store
//!
//! Backs tests and local development. Stock rows are indexed by normalized
//! code; orders by their row id. Quantity writes address rows by raw
//! `codigo` exactly like the REST interface does.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use shared::StockCode;
use shared::models::{Order, OrderStatus, OrderUpdate, StockItem};

use super::{DataStore, StoreError, StoreResult};

/// In-memory store keyed like the remote tables
#[derive(Debug, Default)]
pub struct MemoryStore {
    orders: DashMap<String, Order>,
    stock: DashMap<StockCode, StockItem>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the stock ledger
    pub fn with_stock(self, rows: impl IntoIterator<Item = StockItem>) -> Self {
        for row in rows {
            self.stock.insert(row.stock_code(), row);
        }
        self
    }

    /// Seed a stock row from code and quantity
    pub fn with_stock_item(self, codigo: &str, quantidade: f64) -> Self {
        self.stock.insert(
            StockCode::new(codigo),
            StockItem {
                codigo: codigo.to_string(),
                quantidade,
                descricao: None,
                ncm: None,
            },
        );
        self
    }

    /// Remove a stock row, simulating external deletion from the ledger
    pub fn remove_stock_item(&self, codigo: &str) {
        self.stock.remove(&StockCode::new(codigo));
    }
}

fn apply_update(order: &mut Order, update: OrderUpdate) {
    macro_rules! patch {
        ($($field:ident),*) => {
            $(if let Some(value) = update.$field {
                order.$field = Some(value);
            })*
        };
    }
    patch!(
        cnpj,
        razao_social,
        inscricao_estadual,
        endereco,
        telefone,
        contato,
        email,
        documento,
        valor_total,
        local_entrega,
        setor,
        previsao_entrega,
        transportadora,
        valor_frete,
        vendedor,
        peso,
        quantidade,
        volumes
    );
    if let Some(items) = update.items {
        order.items = items;
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        let mut orders: Vec<Order> = self.orders.iter().map(|e| e.value().clone()).collect();
        orders.sort_by(|a, b| b.codigo.cmp(&a.codigo));
        Ok(orders)
    }

    async fn get_order(&self, id: &str) -> StoreResult<Option<Order>> {
        Ok(self.orders.get(id).map(|e| e.value().clone()))
    }

    async fn create_order(&self, mut order: Order) -> StoreResult<Order> {
        let id = order
            .id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        order.id = Some(id.clone());
        self.orders.insert(id, order.clone());
        Ok(order)
    }

    async fn update_order(&self, id: &str, update: OrderUpdate) -> StoreResult<Order> {
        let mut entry = self
            .orders
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("order {id}")))?;
        apply_update(entry.value_mut(), update);
        Ok(entry.value().clone())
    }

    async fn set_order_status(
        &self,
        id: &str,
        status: OrderStatus,
        data_emissao: Option<DateTime<Utc>>,
    ) -> StoreResult<Order> {
        let mut entry = self
            .orders
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("order {id}")))?;
        let order = entry.value_mut();
        order.status = status;
        order.data_emissao = data_emissao;
        Ok(order.clone())
    }

    async fn delete_order(&self, id: &str) -> StoreResult<()> {
        self.orders
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(format!("order {id}")))?;
        Ok(())
    }

    async fn next_order_code(&self) -> StoreResult<i64> {
        let max = self.orders.iter().map(|e| e.value().codigo).max().unwrap_or(0);
        Ok(max + 1)
    }

    async fn list_stock(&self) -> StoreResult<Vec<StockItem>> {
        let mut rows: Vec<StockItem> = self.stock.iter().map(|e| e.value().clone()).collect();
        rows.sort_by(|a, b| a.codigo.cmp(&b.codigo));
        Ok(rows)
    }

    async fn get_stock_item(&self, code: &StockCode) -> StoreResult<Option<StockItem>> {
        Ok(self.stock.get(code).map(|e| e.value().clone()))
    }

    async fn set_stock_quantity(&self, codigo: &str, quantidade: f64) -> StoreResult<StockItem> {
        let mut entry = self
            .stock
            .get_mut(&StockCode::new(codigo))
            .ok_or_else(|| StoreError::NotFound(format!("stock item {codigo}")))?;
        entry.value_mut().quantidade = quantidade;
        Ok(entry.value().clone())
    }
}
