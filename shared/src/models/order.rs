//! Order model (table `pedidos_faturamento`)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::serde_helpers::{lenient_f64, lenient_i64};
use crate::code::StockCode;

/// Order status
///
/// `Issued` if and only if `data_emissao` is set; both fields are always
/// written in the same store update.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "pendente")]
    Pending,
    #[serde(rename = "emitida")]
    Issued,
}

impl OrderStatus {
    pub fn is_issued(&self) -> bool {
        matches!(self, Self::Issued)
    }
}

/// Order line item (embedded in the order row, not separately persisted)
///
/// `quantidade` and `codigoEstoque` drive the stock workflow; the remaining
/// fields are display data carried through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Display position (1-based)
    #[serde(default)]
    pub item: Option<u32>,
    /// Stock code referencing an `estoque` row
    #[serde(rename = "codigoEstoque", default)]
    pub codigo_estoque: String,
    #[serde(default)]
    pub especificacao: Option<String>,
    /// Unit (UN, MT, KG, PC, CX, LT)
    #[serde(default)]
    pub unidade: Option<String>,
    #[serde(deserialize_with = "lenient_f64", default)]
    pub quantidade: f64,
    #[serde(rename = "valorUnitario", deserialize_with = "lenient_f64", default)]
    pub valor_unitario: f64,
    /// Formatted line total as written by the form ("R$ 1.234,56")
    #[serde(rename = "valorTotal", default)]
    pub valor_total: Option<String>,
    #[serde(default)]
    pub ncm: Option<String>,
}

impl OrderItem {
    /// The normalized stock code for this item.
    pub fn stock_code(&self) -> StockCode {
        StockCode::new(&self.codigo_estoque)
    }

    /// Whether this item participates in availability checks and stock
    /// debits: blank codes and zero quantities are skipped.
    pub fn counts_for_stock(&self) -> bool {
        !self.stock_code().is_empty() && self.quantidade > 0.0
    }
}

/// Order entity
///
/// Customer, delivery and shipping attributes are opaque pass-through data:
/// the workflow reads and writes only `status`, `data_emissao` and `items`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Store-assigned row id (absent on insert so the store generates it)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Human-facing sequential code, unique, assigned at creation
    #[serde(deserialize_with = "lenient_i64", default)]
    pub codigo: i64,
    #[serde(default)]
    pub status: OrderStatus,
    /// Set when the order is issued, cleared when reverted
    #[serde(default)]
    pub data_emissao: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<OrderItem>,

    // ---- invoicing (pass-through) ----
    #[serde(default)]
    pub cnpj: Option<String>,
    #[serde(default)]
    pub razao_social: Option<String>,
    #[serde(default)]
    pub inscricao_estadual: Option<String>,
    #[serde(default)]
    pub endereco: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub contato: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub documento: Option<String>,
    #[serde(default)]
    pub valor_total: Option<String>,

    // ---- delivery (pass-through) ----
    #[serde(default)]
    pub local_entrega: Option<String>,
    #[serde(default)]
    pub setor: Option<String>,
    #[serde(default)]
    pub previsao_entrega: Option<String>,

    // ---- shipping (pass-through) ----
    #[serde(default)]
    pub transportadora: Option<String>,
    #[serde(default)]
    pub valor_frete: Option<String>,
    #[serde(default)]
    pub vendedor: Option<String>,
    #[serde(default)]
    pub peso: Option<String>,
    #[serde(default)]
    pub quantidade: Option<String>,
    #[serde(default)]
    pub volumes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Order {
    /// Items that participate in the stock workflow, in display order.
    pub fn stock_items(&self) -> impl Iterator<Item = &OrderItem> {
        self.items.iter().filter(|i| i.counts_for_stock())
    }
}

/// Create order payload
///
/// `codigo` is optional: when absent the server assigns `max(existing) + 1`.
/// Status is always `pendente` on creation; issuance is a separate
/// transition.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreate {
    pub codigo: Option<i64>,
    #[validate(length(min = 14, max = 18, message = "CNPJ must have 14 digits"))]
    pub cnpj: String,
    #[validate(length(min = 1, message = "razao_social must not be empty"))]
    pub razao_social: String,
    #[validate(length(min = 1, message = "endereco must not be empty"))]
    pub endereco: String,
    #[validate(length(min = 1, message = "vendedor must not be empty"))]
    pub vendedor: String,
    pub items: Vec<OrderItem>,

    #[serde(default)]
    pub inscricao_estadual: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub contato: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub documento: Option<String>,
    #[serde(default)]
    pub valor_total: Option<String>,
    #[serde(default)]
    pub local_entrega: Option<String>,
    #[serde(default)]
    pub setor: Option<String>,
    #[serde(default)]
    pub previsao_entrega: Option<String>,
    #[serde(default)]
    pub transportadora: Option<String>,
    #[serde(default)]
    pub valor_frete: Option<String>,
    #[serde(default)]
    pub peso: Option<String>,
    #[serde(default)]
    pub quantidade: Option<String>,
    #[serde(default)]
    pub volumes: Option<String>,
}

/// Update order payload (partial update; omitted fields are untouched)
///
/// `status` and `data_emissao` are deliberately absent: status transitions go
/// through the issuance endpoints only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cnpj: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub razao_social: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inscricao_estadual: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endereco: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contato: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documento: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valor_total: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_entrega: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previsao_entrega: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transportadora: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valor_frete: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendedor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peso: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantidade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volumes: Option<String>,
}
