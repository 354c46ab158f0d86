//! Stock model (table `estoque`)

use serde::{Deserialize, Serialize};

use super::serde_helpers::{lenient_f64, string_or_number};
use crate::code::StockCode;

/// Stock ledger row
///
/// `codigo` is the business code order items join on; `quantidade` is the
/// available quantity and is only mutated by issuance/reversal (or external
/// restocking through the stock endpoint).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockItem {
    #[serde(deserialize_with = "string_or_number")]
    pub codigo: String,
    #[serde(deserialize_with = "lenient_f64", default)]
    pub quantidade: f64,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub ncm: Option<String>,
}

impl StockItem {
    /// The normalized business code for this row.
    pub fn stock_code(&self) -> StockCode {
        StockCode::new(&self.codigo)
    }
}

/// Quantity write payload for `PATCH /api/estoque/{codigo}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockQuantityUpdate {
    pub quantidade: f64,
}
