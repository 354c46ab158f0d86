//! Issue / revert coordinators
//!
//! Each transition is a short sequence of store writes (one per stock code,
//! then the order status). The two stores offer no transaction spanning
//! both, so the coordinator:
//!
//! - holds a per-code async lock across the check-then-debit sequence, so
//!   concurrent transitions on the same code serialize instead of racing a
//!   stale snapshot;
//! - remembers every applied write and compensates them when a later write
//!   fails, reporting distinctly when compensation itself fails.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use shared::StockCode;
use shared::models::{IssueOutcome, Order, OrderStatus, RevertOutcome, StockItem};

use super::availability::{StockIndex, aggregate_demand, check_availability};
use super::error::IssuanceError;
use super::quantity;
use crate::store::DataStore;

/// A quantity write with enough context to undo it
#[derive(Debug, Clone)]
struct QuantityWrite {
    /// Raw `codigo` as stored (the write address)
    codigo: String,
    /// Normalized code (for locks and reporting)
    code: StockCode,
    previous: f64,
    next: f64,
}

/// Coordinates the Pending -> Issued -> Pending transitions
///
/// Owns the per-code lock registry; one instance is shared by every
/// handler.
#[derive(Debug)]
pub struct IssuanceService {
    store: Arc<dyn DataStore>,
    locks: DashMap<StockCode, Arc<Mutex<()>>>,
}

impl IssuanceService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            store,
            locks: DashMap::new(),
        }
    }

    /// Issue a pending order: check availability, debit every code, mark
    /// the order issued.
    ///
    /// `confirmed` carries the operator's approval; the decision itself is
    /// made by the caller, never in here.
    pub async fn issue(
        &self,
        order_id: &str,
        confirmed: bool,
    ) -> Result<IssueOutcome, IssuanceError> {
        let order = self.load(order_id).await?;
        if order.status.is_issued() {
            return Err(IssuanceError::AlreadyIssued(order.codigo.to_string()));
        }

        let demands = aggregate_demand(&order.items);
        let _guards = self.acquire_locks(&demands).await;

        // Fresh ledger snapshot, read under the locks
        let index = StockIndex::from_rows(self.store.list_stock().await?);
        check_availability(&order.items, &index).map_err(IssuanceError::InsufficientStock)?;

        if !confirmed {
            return Err(IssuanceError::NotConfirmed);
        }

        let plan: Vec<QuantityWrite> = demands
            .iter()
            .filter_map(|(code, requested)| {
                index.get(code).map(|row| QuantityWrite {
                    codigo: row.codigo.clone(),
                    code: code.clone(),
                    previous: row.quantidade,
                    next: quantity::debit(row.quantidade, *requested),
                })
            })
            .collect();

        self.apply_writes(&plan).await?;

        let issued_at = Utc::now();
        let order = match self
            .store
            .set_order_status(order_id, OrderStatus::Issued, Some(issued_at))
            .await
        {
            Ok(order) => order,
            Err(e) => {
                tracing::error!(
                    order = order_id,
                    error = %e,
                    "Order status write failed; compensating stock debits"
                );
                let unrestored = self.compensate(&plan).await;
                return Err(if unrestored.is_empty() {
                    IssuanceError::OrderStatusWriteFailed {
                        message: e.to_string(),
                    }
                } else {
                    IssuanceError::StockInconsistent {
                        message: format!(
                            "status write failed and {} debit(s) could not be restored",
                            unrestored.len()
                        ),
                        unrestored,
                    }
                });
            }
        };

        tracing::info!(codigo = order.codigo, debits = plan.len(), "Order issued");

        let stock = self.refresh_stock(&plan, &index).await;
        Ok(IssueOutcome { order, stock })
    }

    /// Revert an issued order: credit every code back, return the order to
    /// pending.
    ///
    /// A stock row that vanished since issuance is skipped and reported in
    /// the outcome; its quantity is never credited anywhere.
    pub async fn revert(
        &self,
        order_id: &str,
        confirmed: bool,
    ) -> Result<RevertOutcome, IssuanceError> {
        let order = self.load(order_id).await?;
        if !order.status.is_issued() {
            return Err(IssuanceError::NotIssued(order.codigo.to_string()));
        }

        if !confirmed {
            return Err(IssuanceError::NotConfirmed);
        }

        let demands = aggregate_demand(&order.items);
        let _guards = self.acquire_locks(&demands).await;

        let index = StockIndex::from_rows(self.store.list_stock().await?);

        let mut plan = Vec::with_capacity(demands.len());
        let mut skipped = Vec::new();
        for (code, requested) in &demands {
            match index.get(code) {
                Some(row) => plan.push(QuantityWrite {
                    codigo: row.codigo.clone(),
                    code: code.clone(),
                    previous: row.quantidade,
                    next: quantity::credit(row.quantidade, *requested),
                }),
                None => {
                    tracing::warn!(
                        codigo = %code,
                        "Stock row vanished since issuance; quantity not credited"
                    );
                    skipped.push(code.to_string());
                }
            }
        }

        self.apply_writes(&plan).await?;

        let order = match self
            .store
            .set_order_status(order_id, OrderStatus::Pending, None)
            .await
        {
            Ok(order) => order,
            Err(e) => {
                tracing::error!(
                    order = order_id,
                    error = %e,
                    "Order status write failed; compensating stock credits"
                );
                let unrestored = self.compensate(&plan).await;
                return Err(if unrestored.is_empty() {
                    IssuanceError::OrderStatusWriteFailed {
                        message: e.to_string(),
                    }
                } else {
                    IssuanceError::StockInconsistent {
                        message: format!(
                            "status write failed and {} credit(s) could not be restored",
                            unrestored.len()
                        ),
                        unrestored,
                    }
                });
            }
        };

        tracing::info!(
            codigo = order.codigo,
            credits = plan.len(),
            skipped = skipped.len(),
            "Order issuance reverted"
        );

        let stock = self.refresh_stock(&plan, &index).await;
        Ok(RevertOutcome {
            order,
            stock,
            skipped,
        })
    }

    async fn load(&self, order_id: &str) -> Result<Order, IssuanceError> {
        self.store
            .get_order(order_id)
            .await?
            .ok_or_else(|| IssuanceError::OrderNotFound(order_id.to_string()))
    }

    fn lock_handle(&self, code: &StockCode) -> Arc<Mutex<()>> {
        self.locks.entry(code.clone()).or_default().clone()
    }

    /// Take the lock of every code the order touches. Sorted acquisition
    /// keeps two overlapping orders from deadlocking.
    async fn acquire_locks(&self, demands: &[(StockCode, f64)]) -> Vec<OwnedMutexGuard<()>> {
        let mut codes: Vec<&StockCode> = demands.iter().map(|(code, _)| code).collect();
        codes.sort();
        let mut guards = Vec::with_capacity(codes.len());
        for code in codes {
            guards.push(self.lock_handle(code).lock_owned().await);
        }
        guards
    }

    /// Apply the planned writes in order; on failure compensate what was
    /// already applied and report which class of failure this is.
    async fn apply_writes(&self, plan: &[QuantityWrite]) -> Result<(), IssuanceError> {
        for (pos, write) in plan.iter().enumerate() {
            if let Err(e) = self
                .store
                .set_stock_quantity(&write.codigo, write.next)
                .await
            {
                tracing::error!(
                    codigo = %write.code,
                    error = %e,
                    "Stock write failed; compensating prior writes"
                );
                let unrestored = self.compensate(&plan[..pos]).await;
                return Err(if unrestored.is_empty() {
                    IssuanceError::StockWriteFailed {
                        codigo: write.code.to_string(),
                        message: e.to_string(),
                    }
                } else {
                    IssuanceError::StockInconsistent {
                        message: format!(
                            "write for {} failed and {} earlier write(s) could not be restored",
                            write.code,
                            unrestored.len()
                        ),
                        unrestored,
                    }
                });
            }
        }
        Ok(())
    }

    /// Write back the `previous` quantity of every applied write, newest
    /// first. Returns the codes that could not be restored.
    async fn compensate(&self, applied: &[QuantityWrite]) -> Vec<String> {
        let mut unrestored = Vec::new();
        for write in applied.iter().rev() {
            if let Err(e) = self
                .store
                .set_stock_quantity(&write.codigo, write.previous)
                .await
            {
                tracing::error!(codigo = %write.code, error = %e, "Compensation write failed");
                unrestored.push(write.code.to_string());
            }
        }
        unrestored
    }

    /// Reload the touched ledger rows for the caller. The transition has
    /// already committed, so a failed reload degrades to the locally
    /// computed view instead of failing the operation.
    async fn refresh_stock(&self, plan: &[QuantityWrite], index: &StockIndex) -> Vec<StockItem> {
        match self.store.list_stock().await {
            Ok(rows) => {
                let fresh = StockIndex::from_rows(rows);
                plan.iter()
                    .filter_map(|write| fresh.get(&write.code).cloned())
                    .collect()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not refresh stock view after transition");
                plan.iter()
                    .filter_map(|write| {
                        index.get(&write.code).map(|row| {
                            let mut row = row.clone();
                            row.quantidade = write.next;
                            row
                        })
                    })
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreError, StoreResult};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use shared::models::{OrderItem, OrderUpdate};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn item(code: &str, qty: f64) -> OrderItem {
        OrderItem {
            codigo_estoque: code.to_string(),
            unidade: Some("UN".to_string()),
            quantidade: qty,
            ..Default::default()
        }
    }

    fn order(codigo: i64, items: Vec<OrderItem>) -> Order {
        Order {
            codigo,
            items,
            ..Default::default()
        }
    }

    async fn seed_order(store: &MemoryStore, codigo: i64, items: Vec<OrderItem>) -> String {
        let created = store.create_order(order(codigo, items)).await.unwrap();
        created.id.unwrap()
    }

    async fn quantity_of(store: &dyn crate::store::DataStore, code: &str) -> f64 {
        store
            .get_stock_item(&StockCode::new(code))
            .await
            .unwrap()
            .unwrap()
            .quantidade
    }

    #[tokio::test]
    async fn test_issue_then_revert_round_trip() {
        let store = Arc::new(MemoryStore::new().with_stock_item("A1", 10.0));
        let service = IssuanceService::new(store.clone());
        let id = seed_order(&store, 1, vec![item("A1", 5.0)]).await;

        let outcome = service.issue(&id, true).await.unwrap();
        assert!(outcome.order.status.is_issued());
        assert!(outcome.order.data_emissao.is_some());
        assert_eq!(outcome.stock.len(), 1);
        assert_eq!(outcome.stock[0].quantidade, 5.0);
        assert_eq!(quantity_of(store.as_ref(), "A1").await, 5.0);

        let outcome = service.revert(&id, true).await.unwrap();
        assert!(!outcome.order.status.is_issued());
        assert!(outcome.order.data_emissao.is_none());
        assert!(outcome.skipped.is_empty());
        assert_eq!(quantity_of(store.as_ref(), "A1").await, 10.0);
    }

    #[tokio::test]
    async fn test_insufficient_quantity_rejected_without_mutation() {
        let store = Arc::new(MemoryStore::new().with_stock_item("B2", 3.0));
        let service = IssuanceService::new(store.clone());
        let id = seed_order(&store, 2, vec![item("B2", 5.0)]).await;

        let err = service.issue(&id, true).await.unwrap_err();
        match err {
            IssuanceError::InsufficientStock(shortfalls) => {
                assert_eq!(
                    shortfalls,
                    vec![shared::models::Shortfall::Insufficient {
                        codigo: "B2".to_string(),
                        requested: 5.0,
                        available: 3.0,
                    }]
                );
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        assert_eq!(quantity_of(store.as_ref(), "B2").await, 3.0);
        let order = store.get_order(&id).await.unwrap().unwrap();
        assert!(!order.status.is_issued());
        assert!(order.data_emissao.is_none());
    }

    #[tokio::test]
    async fn test_unknown_code_rejected_without_mutation() {
        let store = Arc::new(MemoryStore::new());
        let service = IssuanceService::new(store.clone());
        let id = seed_order(&store, 3, vec![item("ZZZ", 1.0)]).await;

        let err = service.issue(&id, true).await.unwrap_err();
        match err {
            IssuanceError::InsufficientStock(shortfalls) => {
                assert_eq!(
                    shortfalls,
                    vec![shared::models::Shortfall::CodeNotFound {
                        codigo: "ZZZ".to_string()
                    }]
                );
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
        assert!(!store.get_order(&id).await.unwrap().unwrap().status.is_issued());
    }

    #[tokio::test]
    async fn test_one_shortfall_blocks_every_debit() {
        let store = Arc::new(
            MemoryStore::new()
                .with_stock_item("A1", 10.0)
                .with_stock_item("B2", 3.0),
        );
        let service = IssuanceService::new(store.clone());
        let id = seed_order(&store, 4, vec![item("A1", 5.0), item("B2", 5.0)]).await;

        let err = service.issue(&id, true).await.unwrap_err();
        match err {
            IssuanceError::InsufficientStock(shortfalls) => {
                assert_eq!(shortfalls.len(), 1);
                assert_eq!(shortfalls[0].codigo(), "B2");
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        // A1 was never touched: issuance aborted before any debit
        assert_eq!(quantity_of(store.as_ref(), "A1").await, 10.0);
        assert_eq!(quantity_of(store.as_ref(), "B2").await, 3.0);
    }

    #[tokio::test]
    async fn test_confirmation_gate_blocks_before_any_write() {
        let store = Arc::new(MemoryStore::new().with_stock_item("A1", 10.0));
        let service = IssuanceService::new(store.clone());
        let id = seed_order(&store, 5, vec![item("A1", 5.0)]).await;

        assert!(matches!(
            service.issue(&id, false).await,
            Err(IssuanceError::NotConfirmed)
        ));
        assert_eq!(quantity_of(store.as_ref(), "A1").await, 10.0);
        assert!(!store.get_order(&id).await.unwrap().unwrap().status.is_issued());

        // Same gate on the way back
        service.issue(&id, true).await.unwrap();
        assert!(matches!(
            service.revert(&id, false).await,
            Err(IssuanceError::NotConfirmed)
        ));
        assert_eq!(quantity_of(store.as_ref(), "A1").await, 5.0);
    }

    #[tokio::test]
    async fn test_wrong_state_transitions_rejected() {
        let store = Arc::new(MemoryStore::new().with_stock_item("A1", 10.0));
        let service = IssuanceService::new(store.clone());
        let id = seed_order(&store, 6, vec![item("A1", 5.0)]).await;

        // Reverting a pending order
        assert!(matches!(
            service.revert(&id, true).await,
            Err(IssuanceError::NotIssued(_))
        ));
        assert_eq!(quantity_of(store.as_ref(), "A1").await, 10.0);

        // Issuing twice
        service.issue(&id, true).await.unwrap();
        assert!(matches!(
            service.issue(&id, true).await,
            Err(IssuanceError::AlreadyIssued(_))
        ));
        // The second attempt debited nothing
        assert_eq!(quantity_of(store.as_ref(), "A1").await, 5.0);

        // Unknown order
        assert!(matches!(
            service.issue("missing", true).await,
            Err(IssuanceError::OrderNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_issuance_cannot_overdraw() {
        let store = Arc::new(MemoryStore::new().with_stock_item("A1", 10.0));
        let service = Arc::new(IssuanceService::new(store.clone()));
        let first = seed_order(&store, 7, vec![item("A1", 10.0)]).await;
        let second = seed_order(&store, 8, vec![item("A1", 10.0)]).await;

        let (r1, r2) = tokio::join!(service.issue(&first, true), service.issue(&second, true));

        let successes = [r1.is_ok(), r2.is_ok()].iter().filter(|ok| **ok).count();
        assert_eq!(successes, 1, "exactly one of the two issuances may win");

        let loser = if r1.is_ok() { r2 } else { r1 };
        assert!(matches!(loser, Err(IssuanceError::InsufficientStock(_))));

        // Never -10: the loser checked against the post-debit quantity
        assert_eq!(quantity_of(store.as_ref(), "A1").await, 0.0);
    }

    #[tokio::test]
    async fn test_duplicate_codes_are_debited_once_with_summed_quantity() {
        let store = Arc::new(MemoryStore::new().with_stock_item("A1", 15.0));
        let service = IssuanceService::new(store.clone());
        let id = seed_order(&store, 9, vec![item("A1", 6.0), item("a1", 6.0)]).await;

        service.issue(&id, true).await.unwrap();
        assert_eq!(quantity_of(store.as_ref(), "A1").await, 3.0);

        service.revert(&id, true).await.unwrap();
        assert_eq!(quantity_of(store.as_ref(), "A1").await, 15.0);
    }

    #[tokio::test]
    async fn test_issue_without_stock_items_only_flips_status() {
        let store = Arc::new(MemoryStore::new());
        let service = IssuanceService::new(store.clone());
        let id = seed_order(&store, 10, vec![item("", 5.0), item("X", 0.0)]).await;

        let outcome = service.issue(&id, true).await.unwrap();
        assert!(outcome.order.status.is_issued());
        assert!(outcome.stock.is_empty());
    }

    #[tokio::test]
    async fn test_revert_skips_vanished_stock_row() {
        let store = Arc::new(
            MemoryStore::new()
                .with_stock_item("A1", 10.0)
                .with_stock_item("B2", 8.0),
        );
        let service = IssuanceService::new(store.clone());
        let id = seed_order(&store, 11, vec![item("A1", 4.0), item("B2", 2.0)]).await;

        service.issue(&id, true).await.unwrap();
        store.remove_stock_item("B2");

        let outcome = service.revert(&id, true).await.unwrap();
        assert_eq!(outcome.skipped, vec!["B2".to_string()]);
        assert!(!outcome.order.status.is_issued());
        // A1 was credited back, B2's quantity is gone with its row
        assert_eq!(quantity_of(store.as_ref(), "A1").await, 10.0);
    }

    // ---- failure injection ----

    /// Store wrapper that fails quantity or status writes on demand
    #[derive(Debug)]
    struct FlakyStore {
        inner: MemoryStore,
        /// Codes whose quantity writes always fail
        fail_codes: Vec<StockCode>,
        /// When set, every quantity write after the first N fails
        /// (compensation included)
        fail_stock_after: Option<usize>,
        stock_writes: AtomicUsize,
        fail_order_status: bool,
    }

    impl FlakyStore {
        fn new(inner: MemoryStore) -> Self {
            Self {
                inner,
                fail_codes: Vec::new(),
                fail_stock_after: None,
                stock_writes: AtomicUsize::new(0),
                fail_order_status: false,
            }
        }
    }

    #[async_trait]
    impl crate::store::DataStore for FlakyStore {
        async fn list_orders(&self) -> StoreResult<Vec<Order>> {
            self.inner.list_orders().await
        }

        async fn get_order(&self, id: &str) -> StoreResult<Option<Order>> {
            self.inner.get_order(id).await
        }

        async fn create_order(&self, order: Order) -> StoreResult<Order> {
            self.inner.create_order(order).await
        }

        async fn update_order(&self, id: &str, update: OrderUpdate) -> StoreResult<Order> {
            self.inner.update_order(id, update).await
        }

        async fn set_order_status(
            &self,
            id: &str,
            status: OrderStatus,
            data_emissao: Option<DateTime<Utc>>,
        ) -> StoreResult<Order> {
            if self.fail_order_status {
                return Err(StoreError::Request("injected status failure".to_string()));
            }
            self.inner.set_order_status(id, status, data_emissao).await
        }

        async fn delete_order(&self, id: &str) -> StoreResult<()> {
            self.inner.delete_order(id).await
        }

        async fn next_order_code(&self) -> StoreResult<i64> {
            self.inner.next_order_code().await
        }

        async fn list_stock(&self) -> StoreResult<Vec<StockItem>> {
            self.inner.list_stock().await
        }

        async fn get_stock_item(&self, code: &StockCode) -> StoreResult<Option<StockItem>> {
            self.inner.get_stock_item(code).await
        }

        async fn set_stock_quantity(&self, codigo: &str, quantidade: f64) -> StoreResult<StockItem> {
            let writes = self.stock_writes.fetch_add(1, Ordering::SeqCst);
            if let Some(after) = self.fail_stock_after
                && writes >= after
            {
                return Err(StoreError::Request("injected stock failure".to_string()));
            }
            if self.fail_codes.contains(&StockCode::new(codigo)) {
                return Err(StoreError::Request("injected stock failure".to_string()));
            }
            self.inner.set_stock_quantity(codigo, quantidade).await
        }
    }

    #[tokio::test]
    async fn test_failed_debit_is_compensated() {
        let inner = MemoryStore::new()
            .with_stock_item("A1", 10.0)
            .with_stock_item("B2", 8.0);
        let mut flaky = FlakyStore::new(inner);
        flaky.fail_codes.push(StockCode::new("B2"));
        let store = Arc::new(flaky);

        let service = IssuanceService::new(store.clone());
        let id = seed_order(&store.inner, 12, vec![item("A1", 4.0), item("B2", 2.0)]).await;

        let err = service.issue(&id, true).await.unwrap_err();
        match err {
            IssuanceError::StockWriteFailed { codigo, .. } => assert_eq!(codigo, "B2"),
            other => panic!("expected StockWriteFailed, got {other:?}"),
        }

        // The A1 debit was rolled back, the order never left pending
        assert_eq!(quantity_of(store.as_ref(), "A1").await, 10.0);
        assert_eq!(quantity_of(store.as_ref(), "B2").await, 8.0);
        let order = store.get_order(&id).await.unwrap().unwrap();
        assert!(!order.status.is_issued());
        assert!(order.data_emissao.is_none());
    }

    #[tokio::test]
    async fn test_failed_compensation_reports_inconsistency() {
        let inner = MemoryStore::new()
            .with_stock_item("A1", 10.0)
            .with_stock_item("B2", 8.0);
        let mut flaky = FlakyStore::new(inner);
        // First write (A1 debit) succeeds, everything after fails - the B2
        // debit and the compensating A1 restore.
        flaky.fail_stock_after = Some(1);
        let store = Arc::new(flaky);

        let service = IssuanceService::new(store.clone());
        let id = seed_order(&store.inner, 13, vec![item("A1", 4.0), item("B2", 2.0)]).await;

        let err = service.issue(&id, true).await.unwrap_err();
        match err {
            IssuanceError::StockInconsistent { unrestored, .. } => {
                assert_eq!(unrestored, vec!["A1".to_string()]);
            }
            other => panic!("expected StockInconsistent, got {other:?}"),
        }

        // A1 still carries the unrestorable debit; the order stayed pending
        assert_eq!(quantity_of(store.as_ref(), "A1").await, 6.0);
        assert!(!store.get_order(&id).await.unwrap().unwrap().status.is_issued());
    }

    #[tokio::test]
    async fn test_failed_status_write_restores_debits() {
        let inner = MemoryStore::new().with_stock_item("A1", 10.0);
        let mut flaky = FlakyStore::new(inner);
        flaky.fail_order_status = true;
        let store = Arc::new(flaky);

        let service = IssuanceService::new(store.clone());
        let id = seed_order(&store.inner, 14, vec![item("A1", 4.0)]).await;

        let err = service.issue(&id, true).await.unwrap_err();
        assert!(matches!(err, IssuanceError::OrderStatusWriteFailed { .. }));

        // Debits were compensated: quantity and status both unchanged
        assert_eq!(quantity_of(store.as_ref(), "A1").await, 10.0);
        let order = store.get_order(&id).await.unwrap().unwrap();
        assert!(!order.status.is_issued());
        assert!(order.data_emissao.is_none());
    }
}
