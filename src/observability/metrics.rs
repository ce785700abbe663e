//! Operation counters for a store handle
//!
//! Counters only, monotonic, reset when the handle is opened.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Per-store operational counters
#[derive(Debug, Default)]
pub struct StoreMetrics {
    inserts: AtomicU64,
    updates: AtomicU64,
    deletes: AtomicU64,
    finds: AtomicU64,
    searches: AtomicU64,
    constraint_violations: AtomicU64,
    not_found: AtomicU64,
    storage_failures: AtomicU64,
}

impl StoreMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_inserts(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_updates(&self) {
        self.updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_deletes(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_finds(&self) {
        self.finds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_searches(&self) {
        self.searches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_constraint_violations(&self) {
        self.constraint_violations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_not_found(&self) {
        self.not_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_storage_failures(&self) {
        self.storage_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            inserts: self.inserts.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            finds: self.finds.load(Ordering::Relaxed),
            searches: self.searches.load(Ordering::Relaxed),
            constraint_violations: self.constraint_violations.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            storage_failures: self.storage_failures.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub inserts: u64,
    pub updates: u64,
    pub deletes: u64,
    pub finds: u64,
    pub searches: u64,
    pub constraint_violations: u64,
    pub not_found: u64,
    pub storage_failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        assert_eq!(StoreMetrics::new().snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_increments() {
        let metrics = StoreMetrics::new();
        metrics.increment_inserts();
        metrics.increment_inserts();
        metrics.increment_searches();
        metrics.increment_storage_failures();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.inserts, 2);
        assert_eq!(snapshot.searches, 1);
        assert_eq!(snapshot.storage_failures, 1);
        assert_eq!(snapshot.deletes, 0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let metrics = StoreMetrics::new();
        metrics.increment_finds();
        let json = serde_json::to_value(metrics.snapshot()).unwrap();
        assert_eq!(json["finds"], 1);
    }
}
