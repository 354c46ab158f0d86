//! Quantity arithmetic using rust_decimal for precision
//!
//! Stock quantities travel as `f64` on the wire; all debit/credit math is
//! done in `Decimal` and converted back, so an issue/revert round trip
//! restores the exact starting quantity.

use rust_decimal::prelude::*;

/// Quantities are kept to 3 decimal places (fractional units: KG, MT, LT)
const DECIMAL_PLACES: u32 = 3;

pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

pub fn to_f64(value: Decimal) -> f64 {
    value.round_dp(DECIMAL_PLACES).to_f64().unwrap_or(0.0)
}

/// New available quantity after debiting `requested` from `available`.
pub fn debit(available: f64, requested: f64) -> f64 {
    to_f64(to_decimal(available) - to_decimal(requested))
}

/// New available quantity after crediting `requested` back onto `available`.
pub fn credit(available: f64, requested: f64) -> f64 {
    to_f64(to_decimal(available) + to_decimal(requested))
}

/// Whether `requested` exceeds `available` (decimal comparison, no float
/// wobble).
pub fn exceeds(requested: f64, available: f64) -> bool {
    to_decimal(requested) > to_decimal(available)
}
