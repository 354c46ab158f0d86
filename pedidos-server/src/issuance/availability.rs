//! Availability check
//!
//! Pure, read-only check of an order's line items against a snapshot of the
//! stock ledger. No side effects, safe to call any number of times.

use std::collections::HashMap;

use shared::StockCode;
use shared::models::{OrderItem, Shortfall, StockItem};

use super::quantity;

/// Read-through snapshot of the stock ledger, keyed by normalized code
///
/// Built from a fresh `list_stock` read each time a transition runs; there
/// is no ambient cache to go stale between operations. When the ledger holds
/// duplicate rows for the same normalized code, the first row wins and the
/// duplicates are logged.
#[derive(Debug, Default)]
pub struct StockIndex {
    rows: HashMap<StockCode, StockItem>,
}

impl StockIndex {
    pub fn from_rows(rows: Vec<StockItem>) -> Self {
        let mut index: HashMap<StockCode, StockItem> = HashMap::with_capacity(rows.len());
        for row in rows {
            let code = row.stock_code();
            if code.is_empty() {
                continue;
            }
            if let Some(existing) = index.get(&code) {
                tracing::warn!(
                    codigo = %code,
                    kept = %existing.codigo,
                    duplicate = %row.codigo,
                    "Duplicate stock code in ledger; keeping first row"
                );
                continue;
            }
            index.insert(code, row);
        }
        Self { rows: index }
    }

    pub fn get(&self, code: &StockCode) -> Option<&StockItem> {
        self.rows.get(code)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Total requested quantity per stock code, in first-occurrence order
///
/// Line items normally reference distinct codes, but nothing stops an
/// operator from entering the same code twice; those demands must be summed
/// before they are checked or debited, or the pieces would each pass the
/// check individually and jointly overdraw the row.
pub fn aggregate_demand(items: &[OrderItem]) -> Vec<(StockCode, f64)> {
    let mut order_of: Vec<StockCode> = Vec::new();
    let mut totals: HashMap<StockCode, rust_decimal::Decimal> = HashMap::new();

    for item in items.iter().filter(|i| i.counts_for_stock()) {
        let code = item.stock_code();
        totals
            .entry(code.clone())
            .and_modify(|total| *total += quantity::to_decimal(item.quantidade))
            .or_insert_with(|| {
                order_of.push(code);
                quantity::to_decimal(item.quantidade)
            });
    }

    order_of
        .into_iter()
        .map(|code| {
            let total = quantity::to_f64(totals[&code]);
            (code, total)
        })
        .collect()
}

/// Check whether the ledger snapshot covers every line item
///
/// Items with a blank code or zero quantity are skipped; demands for the
/// same code are summed. All shortfalls are collected - a missing code does
/// not stop the scan, so the operator sees every problem in one pass.
pub fn check_availability(items: &[OrderItem], index: &StockIndex) -> Result<(), Vec<Shortfall>> {
    let mut shortfalls = Vec::new();

    for (code, requested) in aggregate_demand(items) {
        match index.get(&code) {
            None => shortfalls.push(Shortfall::CodeNotFound {
                codigo: code.into_inner(),
            }),
            Some(row) => {
                if quantity::exceeds(requested, row.quantidade) {
                    shortfalls.push(Shortfall::Insufficient {
                        codigo: code.into_inner(),
                        requested,
                        available: row.quantidade,
                    });
                }
            }
        }
    }

    if shortfalls.is_empty() {
        Ok(())
    } else {
        Err(shortfalls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(code: &str, qty: f64) -> OrderItem {
        OrderItem {
            codigo_estoque: code.to_string(),
            unidade: Some("UN".to_string()),
            quantidade: qty,
            ..Default::default()
        }
    }

    fn row(code: &str, qty: f64) -> StockItem {
        StockItem {
            codigo: code.to_string(),
            quantidade: qty,
            descricao: None,
            ncm: None,
        }
    }

    fn index(rows: Vec<StockItem>) -> StockIndex {
        StockIndex::from_rows(rows)
    }

    #[test]
    fn test_sufficient_stock_passes() {
        let idx = index(vec![row("A1", 10.0)]);
        assert!(check_availability(&[item("A1", 5.0)], &idx).is_ok());
        assert!(check_availability(&[item("A1", 10.0)], &idx).is_ok());
    }

    #[test]
    fn test_insufficient_quantity_reported() {
        let idx = index(vec![row("B2", 3.0)]);
        let shortfalls = check_availability(&[item("B2", 5.0)], &idx).unwrap_err();
        assert_eq!(
            shortfalls,
            vec![Shortfall::Insufficient {
                codigo: "B2".to_string(),
                requested: 5.0,
                available: 3.0,
            }]
        );
    }

    #[test]
    fn test_unknown_code_reported() {
        let idx = index(vec![]);
        let shortfalls = check_availability(&[item("ZZZ", 1.0)], &idx).unwrap_err();
        assert_eq!(
            shortfalls,
            vec![Shortfall::CodeNotFound {
                codigo: "ZZZ".to_string()
            }]
        );
    }

    #[test]
    fn test_all_shortfalls_collected() {
        // One under-stocked item and one unknown code: both must be
        // reported, not just the first.
        let idx = index(vec![row("A1", 10.0), row("B2", 3.0)]);
        let items = [item("A1", 5.0), item("B2", 5.0), item("ZZZ", 1.0)];
        let shortfalls = check_availability(&items, &idx).unwrap_err();
        assert_eq!(shortfalls.len(), 2);
        assert_eq!(shortfalls[0].codigo(), "B2");
        assert_eq!(shortfalls[1].codigo(), "ZZZ");
    }

    #[test]
    fn test_blank_and_zero_items_skipped() {
        let idx = index(vec![]);
        let items = [item("", 5.0), item("  ", 2.0), item("ZZZ", 0.0)];
        assert!(check_availability(&items, &idx).is_ok());
    }

    #[test]
    fn test_normalized_lookup() {
        // Ledger row stored as " a1 ", line item typed as "A1"
        let idx = index(vec![row(" a1 ", 10.0)]);
        assert!(check_availability(&[item("A1", 5.0)], &idx).is_ok());
        assert!(check_availability(&[item(" a1", 5.0)], &idx).is_ok());
    }

    #[test]
    fn test_repeated_demand_is_summed() {
        // Two lines for the same code must be checked as one demand
        let idx = index(vec![row("A1", 10.0)]);
        let items = [item("A1", 6.0), item("a1 ", 6.0)];
        let shortfalls = check_availability(&items, &idx).unwrap_err();
        assert_eq!(
            shortfalls,
            vec![Shortfall::Insufficient {
                codigo: "A1".to_string(),
                requested: 12.0,
                available: 10.0,
            }]
        );

        let demands = aggregate_demand(&items);
        assert_eq!(demands, vec![(StockCode::new("A1"), 12.0)]);
    }

    #[test]
    fn test_repeated_check_is_identical() {
        let idx = index(vec![row("A1", 3.0)]);
        let items = [item("A1", 5.0)];
        let first = check_availability(&items, &idx).unwrap_err();
        let second = check_availability(&items, &idx).unwrap_err();
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_ledger_rows_first_wins() {
        let idx = index(vec![row("A1", 10.0), row(" a1", 0.0)]);
        assert_eq!(idx.len(), 1);
        assert!(check_availability(&[item("A1", 5.0)], &idx).is_ok());
    }
}
