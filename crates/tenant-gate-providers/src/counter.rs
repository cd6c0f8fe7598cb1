// crates/tenant-gate-providers/src/counter.rs
// ============================================================================
// Module: Rate Counter Store
// Description: Atomic counter primitives for fixed-window rate limiting.
// Purpose: Abstract the shared Redis-equivalent counter store behind a seam.
// Dependencies: tokio, async-trait
// ============================================================================

//! ## Overview
//! Fixed-window limiters need four primitives from a shared store: atomic
//! `INCR`, `EXPIRE`, `GET`, and `SET-IF-ABSENT` with TTL. Production
//! deployments back this seam with a Redis-equivalent; the bundled
//! [`MemoryCounterStore`] provides the same semantics in-process for
//! standalone deployments and tests.
//!
//! ## Invariants
//! - `incr` is atomic; callers never wrap it in client-side locking.
//! - Counters are created lazily on first increment and expire on their
//!   own; nothing deletes them explicitly.
//! - An increment that has happened is never rolled back, even when the
//!   request that caused it is abandoned.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Atomic counter store interface.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically increments the counter and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`CounterStoreError`] when the store is unreachable.
    async fn incr(&self, key: &str) -> Result<i64, CounterStoreError>;

    /// Sets the key's time-to-live; returns false when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`CounterStoreError`] when the store is unreachable.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, CounterStoreError>;

    /// Reads the counter value, when the key exists.
    ///
    /// # Errors
    ///
    /// Returns [`CounterStoreError`] when the store is unreachable.
    async fn get(&self, key: &str) -> Result<Option<i64>, CounterStoreError>;

    /// Stores a value with TTL only when the key is absent; returns whether
    /// the write happened.
    ///
    /// # Errors
    ///
    /// Returns [`CounterStoreError`] when the store is unreachable.
    async fn set_if_absent(
        &self,
        key: &str,
        value: i64,
        ttl: Duration,
    ) -> Result<bool, CounterStoreError>;
}

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// One stored counter with optional expiry.
///
/// # Invariants
/// - `expires_at == None` means the key never expires.
#[derive(Debug, Clone, Copy)]
struct CounterEntry {
    /// Current counter value.
    value: i64,
    /// Expiry instant, when a TTL has been applied.
    expires_at: Option<Instant>,
}

impl CounterEntry {
    /// Returns true when the entry has expired at `now`.
    fn expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

/// In-process counter store with Redis-equivalent semantics.
///
/// # Invariants
/// - Expired entries behave exactly like absent keys.
/// - All operations lock one mutex; increments are therefore atomic.
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    /// Counters keyed by namespaced window key.
    entries: Mutex<HashMap<String, CounterEntry>>,
}

impl MemoryCounterStore {
    /// Builds an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn incr(&self, key: &str) -> Result<i64, CounterStoreError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let entry = entries.entry(key.to_string()).or_insert(CounterEntry {
            value: 0,
            expires_at: None,
        });
        if entry.expired(now) {
            entry.value = 0;
            entry.expires_at = None;
        }
        entry.value += 1;
        Ok(entry.value)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, CounterStoreError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        match entries.get_mut(key) {
            Some(entry) if !entry.expired(now) => {
                entry.expires_at = Some(now + ttl);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn get(&self, key: &str) -> Result<Option<i64>, CounterStoreError> {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        Ok(entries.get(key).filter(|entry| !entry.expired(now)).map(|entry| entry.value))
    }

    async fn set_if_absent(
        &self,
        key: &str,
        value: i64,
        ttl: Duration,
    ) -> Result<bool, CounterStoreError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let absent = entries.get(key).is_none_or(|entry| entry.expired(now));
        if absent {
            entries.insert(
                key.to_string(),
                CounterEntry {
                    value,
                    expires_at: Some(now + ttl),
                },
            );
        }
        Ok(absent)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Counter store failures.
///
/// # Invariants
/// - Variants are stable for error classification; rate admission fails
///   open on these errors by design.
#[derive(Debug, Error)]
pub enum CounterStoreError {
    /// Store is unreachable or an operation failed.
    #[error("counter store unavailable: {0}")]
    Unavailable(String),
}
