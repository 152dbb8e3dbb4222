//! Connection checkout accounting.
//!
//! Every connection a repository takes, for a single statement or for a whole
//! transaction, is paired with a [`Lease`]. The lease records the release when
//! it is dropped, so the count stays exact on every exit path including early
//! returns and panics.
//!
//! The counts are `prometheus-client` metrics so the same numbers can be
//! scraped once [`PoolStats::register`] has added them to a [`Registry`].

use std::ops::{Deref, DerefMut};

use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;

/// Shared checkout/release metrics for one store.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    checked_out: Counter,
    released: Counter,
    in_use: Gauge,
}

/// Point-in-time view of [`PoolStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub checked_out: u64,
    pub released: u64,
}

impl PoolSnapshot {
    pub fn in_use(&self) -> u64 {
        self.checked_out.saturating_sub(self.released)
    }
}

impl PoolStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the pool metrics to `registry`. Clones share their values with
    /// `self`, so leases taken later are visible through the registry.
    pub fn register(&self, registry: &mut Registry) {
        registry.register(
            "pool_checkouts",
            "Connections checked out of the storage pool",
            self.checked_out.clone(),
        );
        registry.register(
            "pool_releases",
            "Connections returned to the storage pool",
            self.released.clone(),
        );
        registry.register(
            "pool_in_use",
            "Connections currently checked out",
            self.in_use.clone(),
        );
    }

    /// Record a checkout. The returned guard records the release.
    pub fn lease(&self) -> Lease {
        self.checked_out.inc();
        self.in_use.inc();
        Lease {
            released: self.released.clone(),
            in_use: self.in_use.clone(),
        }
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        // Released first, so a concurrent checkout can only raise in_use.
        let released = self.released.get();
        let checked_out = self.checked_out.get();
        PoolSnapshot {
            checked_out,
            released,
        }
    }
}

/// Proof of one outstanding checkout.
#[derive(Debug)]
#[must_use = "dropping a lease records the release immediately"]
pub struct Lease {
    released: Counter,
    in_use: Gauge,
}

impl Drop for Lease {
    fn drop(&mut self) {
        self.released.inc();
        self.in_use.dec();
    }
}

/// A checked-out resource together with its lease. The resource is dropped
/// (returned to its pool) before the release is recorded.
#[derive(Debug)]
pub struct Leased<T> {
    inner: T,
    _lease: Lease,
}

impl<T> Leased<T> {
    pub fn new(inner: T, lease: Lease) -> Self {
        Self {
            inner,
            _lease: lease,
        }
    }
}

impl<T> Deref for Leased<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> DerefMut for Leased<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}
