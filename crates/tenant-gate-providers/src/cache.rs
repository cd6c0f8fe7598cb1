// crates/tenant-gate-providers/src/cache.rs
// ============================================================================
// Module: Record Cache
// Description: Byte-record cache seam for the tenant access cache.
// Purpose: Abstract the shared TTL cache behind a trait with a memory impl.
// Dependencies: tokio
// ============================================================================

//! ## Overview
//! The Tenant Access Cache stores encoded access records in a shared,
//! TTL-bound byte cache. The seam carries only `get` and `put`; eviction is
//! the store's concern. The bundled [`MemoryRecordCache`] provides the same
//! semantics in-process.
//!
//! ## Invariants
//! - Expired entries behave exactly like absent keys.
//! - Cache failures are recoverable: readers fall through to the source of
//!   truth, writers treat failed puts as best-effort.

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

/// TTL-bound byte-record cache interface.
#[async_trait]
pub trait RecordCache: Send + Sync {
    /// Reads a cached payload, when present and fresh.
    ///
    /// # Errors
    ///
    /// Returns [`RecordCacheError`] when the cache is unreachable.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, RecordCacheError>;

    /// Stores a payload under the key with the provided TTL.
    ///
    /// # Errors
    ///
    /// Returns [`RecordCacheError`] when the cache is unreachable.
    async fn put(&self, key: &str, payload: &[u8], ttl: Duration) -> Result<(), RecordCacheError>;
}

// ============================================================================
// SECTION: In-Memory Cache
// ============================================================================

/// One cached payload with its expiry.
#[derive(Debug, Clone)]
struct CacheEntry {
    /// Cached payload bytes.
    payload: Vec<u8>,
    /// Expiry instant.
    expires_at: Instant,
}

/// In-process record cache.
///
/// # Invariants
/// - Expired entries are pruned lazily on read and overwrite.
#[derive(Debug, Default)]
pub struct MemoryRecordCache {
    /// Entries keyed by cache key.
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryRecordCache {
    /// Builds an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordCache for MemoryRecordCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, RecordCacheError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if now < entry.expires_at => Ok(Some(entry.payload.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, payload: &[u8], ttl: Duration) -> Result<(), RecordCacheError> {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                payload: payload.to_vec(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Record cache failures.
///
/// # Invariants
/// - Variants are stable for error classification; lookups degrade to the
///   source of truth on these errors.
#[derive(Debug, Error)]
pub enum RecordCacheError {
    /// Cache is unreachable or an operation failed.
    #[error("record cache unavailable: {0}")]
    Unavailable(String),
}
