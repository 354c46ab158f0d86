//! Stock code normalization
//!
//! The data store joins order items to stock rows by an untyped code column.
//! Operators type these codes by hand, so the same code shows up as `"a1 "`,
//! `"A1"` or `" a1"` across orders. Every comparison in the system goes
//! through [`StockCode`], which canonicalizes to trimmed ASCII uppercase.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Canonical stock code: trimmed, ASCII-uppercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StockCode(String);

impl StockCode {
    /// Normalize a raw code as entered by an operator or stored in a row.
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Blank codes never participate in availability checks or debits.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

// Deserialization normalizes too, so a code is canonical no matter where it
// came from.
impl<'de> Deserialize<'de> for StockCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(&raw))
    }
}

impl fmt::Display for StockCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StockCode {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<&String> for StockCode {
    fn from(raw: &String) -> Self {
        Self::new(raw)
    }
}
