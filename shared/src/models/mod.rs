//! Domain models
//!
//! Wire-format types for the two store tables (`pedidos_faturamento`,
//! `estoque`), the issuance workflow payloads, and Portal session types.
//! Column names follow the store schema, so serde renames map the embedded
//! item keys (`codigoEstoque`, `valorUnitario`, …) onto Rust field names.

mod issuance;
mod order;
mod serde_helpers;
mod session;
mod stock;

pub use issuance::{ConfirmRequest, IssueOutcome, RevertOutcome, Shortfall};
pub use order::{Order, OrderCreate, OrderItem, OrderStatus, OrderUpdate};
pub use session::{SessionInfo, VerifySessionRequest, VerifySessionResponse};
pub use stock::{StockItem, StockQuantityUpdate};
