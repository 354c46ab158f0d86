//! Issuance workflow payloads

use serde::{Deserialize, Serialize};

use super::order::Order;
use super::stock::StockItem;

/// One reason an order cannot be issued
///
/// The availability check reports every shortfall it finds, not just the
/// first, so the operator sees the complete picture before retrying.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Shortfall {
    /// The line item's code has no row in the stock ledger
    CodeNotFound { codigo: String },
    /// The ledger row exists but holds less than the requested quantity
    Insufficient {
        codigo: String,
        requested: f64,
        available: f64,
    },
}

impl Shortfall {
    pub fn codigo(&self) -> &str {
        match self {
            Self::CodeNotFound { codigo } => codigo,
            Self::Insufficient { codigo, .. } => codigo,
        }
    }
}

/// Operator confirmation, supplied by the caller instead of a blocking
/// prompt
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ConfirmRequest {
    #[serde(default)]
    pub confirmado: bool,
}

/// Result of a successful issuance: the refreshed order plus the refreshed
/// ledger rows it touched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueOutcome {
    pub order: Order,
    pub stock: Vec<StockItem>,
}

/// Result of a successful reversal
///
/// `skipped` lists stock codes that vanished from the ledger between
/// issuance and reversal: their quantities were NOT credited back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevertOutcome {
    pub order: Order,
    pub stock: Vec<StockItem>,
    #[serde(default)]
    pub skipped: Vec<String>,
}
