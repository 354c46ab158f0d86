//! Pedidos de Faturamento - backend service
//!
//! # Architecture
//!
//! This crate is the backend for the order-management application. It owns
//! the order issuance / stock reconciliation workflow and fronts two
//! external collaborators:
//!
//! - the hosted relational data store, reached through its REST query
//!   interface (`store`),
//! - the Portal authentication service, which verifies opaque session
//!   tokens (`auth`).
//!
//! # Module structure
//!
//! ```text
//! pedidos-server/src/
//! ├── core/          # Config, state, server startup
//! ├── auth/          # Portal session verification middleware
//! ├── api/           # HTTP routes and handlers
//! ├── issuance/      # Availability check + issue/revert coordinators
//! ├── store/         # Data store access (REST + in-memory)
//! └── utils/         # Logging, validation helpers
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod issuance;
pub mod store;
pub mod utils;

// Re-export public types
pub use auth::PortalClient;
pub use core::{Config, Server, ServerState};
pub use issuance::{IssuanceError, IssuanceService, StockIndex, check_availability};
pub use store::{DataStore, MemoryStore, RestStore, StoreError};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - structured tracing with a dedicated target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load `.env` and initialize logging. Call once, before anything else.
pub fn setup_environment() {
    dotenv::dotenv().ok();
    init_logger();
}

pub fn print_banner() {
    println!(
        r#"
    ____           ___     __
   / __ \___  ____/ (_)___/ /___  _____
  / /_/ / _ \/ __  / / __  / __ \/ ___/
 / ____/  __/ /_/ / / /_/ / /_/ (__  )
/_/    \___/\__,_/_/\__,_/\____/____/
        de Faturamento
    "#
    );
}
