//! Order issuance / stock reconciliation workflow
//!
//! This module owns the only state machine in the system:
//!
//! ```text
//! Pending --issue(checked, confirmed)--> Issued
//! Issued  --revert(confirmed)---------> Pending
//! ```
//!
//! - **availability**: pure pre-check of every line item against a ledger
//!   snapshot
//! - **coordinator**: the issue/revert transitions, per-code locking, and
//!   compensation when a write fails mid-sequence
//! - **quantity**: decimal arithmetic for debits and credits
//!
//! The coordinator serializes transitions per stock code, so two concurrent
//! issuances touching the same code cannot both pass the availability check
//! against a stale snapshot and drive the quantity negative.

mod availability;
mod coordinator;
mod error;
pub mod quantity;

pub use availability::{StockIndex, check_availability};
pub use coordinator::IssuanceService;
pub use error::IssuanceError;
