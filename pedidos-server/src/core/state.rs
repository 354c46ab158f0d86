use std::sync::Arc;

use crate::auth::PortalClient;
use crate::core::Config;
use crate::issuance::IssuanceService;
use crate::store::{DataStore, RestStore};

/// Server state - shared handles to every service
///
/// `ServerState` is cloned into every handler; all fields are cheap to
/// clone (`Arc` or small).
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | config | Config | Configuration (immutable) |
/// | store | Arc<dyn DataStore> | Remote data store (or in-memory in tests) |
/// | portal | PortalClient | Portal session verification |
/// | issuance | Arc<IssuanceService> | Issue/revert coordinator |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Data store handle
    pub store: Arc<dyn DataStore>,
    /// Portal session verification client
    pub portal: PortalClient,
    /// Issuance/reversal coordinator (owns the per-code locks)
    pub issuance: Arc<IssuanceService>,
}

impl ServerState {
    /// Initialize state against the configured remote store and Portal
    pub fn initialize(config: &Config) -> Self {
        let store: Arc<dyn DataStore> = Arc::new(RestStore::new(config));
        let portal = PortalClient::new(config);
        Self::with_store(config.clone(), store, portal)
    }

    /// Build state with an explicit store, used by tests to swap in
    /// [`crate::store::MemoryStore`]
    pub fn with_store(config: Config, store: Arc<dyn DataStore>, portal: PortalClient) -> Self {
        let issuance = Arc::new(IssuanceService::new(store.clone()));
        Self {
            config,
            store,
            portal,
            issuance,
        }
    }
}
