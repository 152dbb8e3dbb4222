//! # storage-adapters
//!
//! Implementations of the `domains` repository ports.
//!
//! - [`postgres`]: sqlx/PostgreSQL (feature `db-postgres`, on by default)
//! - [`memory`]: process-local store with the same constraints, for local runs and tests
//!
//! Both route composite writes through [`transaction::TransactionCoordinator`]
//! and account every connection checkout in [`pool::PoolStats`].

pub mod memory;
pub mod pool;
pub mod transaction;

#[cfg(feature = "db-postgres")]
pub mod postgres;

pub use memory::{FailPoint, InMemoryStore};
pub use pool::{PoolSnapshot, PoolStats};
pub use transaction::{TransactionBackend, TransactionCoordinator, TxFuture, TxState};

#[cfg(feature = "db-postgres")]
pub use postgres::{PgStore, PoolConfig};
