// crates/tenant-gate-gateway/src/access_cache/tests.rs
// ============================================================================
// Module: Tenant Access Cache Tests
// Description: Unit tests for cache-aside access resolution.
// Purpose: Validate hits, write-backs, decode recovery, and degradation.
// Dependencies: tenant-gate-gateway, tokio
// ============================================================================

//! ## Overview
//! Exercises the cache-aside flow with in-memory fixtures: fresh hits skip
//! the directory, misses fetch and write back, corrupted payloads trigger a
//! re-fetch instead of a crash, and directory or cache outages degrade to
//! the synthetic unknown record without surfacing errors.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use tenant_gate_core::TenantAccess;
use tenant_gate_core::TenantCode;
use tenant_gate_core::TenantStatus;
use tenant_gate_providers::DirectoryError;
use tenant_gate_providers::DirectoryTenantRecord;
use tenant_gate_providers::MemoryRecordCache;
use tenant_gate_providers::RecordCache;
use tenant_gate_providers::RecordCacheError;
use tenant_gate_providers::StaticTenantDirectory;
use tenant_gate_providers::TenantDirectory;

use crate::audit::NoopAuditSink;

use super::TenantAccessCache;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

const TTL: Duration = Duration::from_secs(300);
const NOW_MS: i64 = 1_717_000_000_000;

/// Directory wrapper that counts lookups.
struct CountingDirectory {
    /// Wrapped directory.
    inner: StaticTenantDirectory,
    /// Number of lookups observed.
    lookups: AtomicUsize,
}

#[async_trait]
impl TenantDirectory for CountingDirectory {
    async fn lookup(
        &self,
        tenant: &TenantCode,
    ) -> Result<Option<DirectoryTenantRecord>, DirectoryError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.lookup(tenant).await
    }
}

/// Directory that always reports an outage.
struct DownDirectory;

#[async_trait]
impl TenantDirectory for DownDirectory {
    async fn lookup(
        &self,
        _tenant: &TenantCode,
    ) -> Result<Option<DirectoryTenantRecord>, DirectoryError> {
        Err(DirectoryError::Unavailable("directory down".to_string()))
    }
}

/// Cache whose writes always fail.
struct ReadOnlyCache {
    /// Wrapped cache used for reads.
    inner: MemoryRecordCache,
}

#[async_trait]
impl RecordCache for ReadOnlyCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, RecordCacheError> {
        self.inner.get(key).await
    }

    async fn put(&self, _key: &str, _payload: &[u8], _ttl: Duration) -> Result<(), RecordCacheError> {
        Err(RecordCacheError::Unavailable("writes disabled".to_string()))
    }
}

fn acme_record() -> DirectoryTenantRecord {
    DirectoryTenantRecord {
        active: true,
        status: "active".to_string(),
        features: vec!["tier:gold".to_string()],
        permissions: vec!["catalog:read".to_string()],
        ..DirectoryTenantRecord::default()
    }
}

fn counting_directory() -> Arc<CountingDirectory> {
    Arc::new(CountingDirectory {
        inner: StaticTenantDirectory::new().with_record("acme", acme_record()),
        lookups: AtomicUsize::new(0),
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn miss_fetches_and_writes_back() {
    let cache = Arc::new(MemoryRecordCache::new());
    let directory = counting_directory();
    let access_cache = TenantAccessCache::new(
        Arc::clone(&cache) as Arc<_>,
        Arc::clone(&directory) as Arc<_>,
        TTL,
        Arc::new(NoopAuditSink),
    );
    let tenant = TenantCode::normalize("acme");

    let access = access_cache.resolve(&tenant, NOW_MS).await;
    assert!(access.admits());
    assert_eq!(access.tier.as_str(), "gold");
    assert_eq!(access.fetched_at_ms, NOW_MS);
    assert_eq!(directory.lookups.load(Ordering::SeqCst), 1);

    // The second resolution is served from the cache.
    let again = access_cache.resolve(&tenant, NOW_MS + 1).await;
    assert_eq!(again, access);
    assert_eq!(directory.lookups.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn expired_entry_refetches() {
    let cache = Arc::new(MemoryRecordCache::new());
    let directory = counting_directory();
    let access_cache = TenantAccessCache::new(
        Arc::clone(&cache) as Arc<_>,
        Arc::clone(&directory) as Arc<_>,
        TTL,
        Arc::new(NoopAuditSink),
    );
    let tenant = TenantCode::normalize("acme");

    let _ = access_cache.resolve(&tenant, NOW_MS).await;
    tokio::time::advance(TTL + Duration::from_secs(1)).await;
    let _ = access_cache.resolve(&tenant, NOW_MS).await;
    assert_eq!(directory.lookups.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn corrupted_entry_triggers_refetch() {
    let cache = Arc::new(MemoryRecordCache::new());
    cache.put("tenant-access:acme", b"{corrupted", TTL).await.expect("seed");
    let directory = counting_directory();
    let access_cache = TenantAccessCache::new(
        Arc::clone(&cache) as Arc<_>,
        Arc::clone(&directory) as Arc<_>,
        TTL,
        Arc::new(NoopAuditSink),
    );

    let access = access_cache.resolve(&TenantCode::normalize("acme"), NOW_MS).await;
    assert!(access.admits());
    assert_eq!(directory.lookups.load(Ordering::SeqCst), 1);

    // The re-fetch replaced the corrupted payload.
    let payload = cache.get("tenant-access:acme").await.expect("get").expect("present");
    assert!(TenantAccess::decode_cached(&payload).is_ok());
}

#[tokio::test(start_paused = true)]
async fn unknown_tenant_synthesizes_inert_record() {
    let access_cache = TenantAccessCache::new(
        Arc::new(MemoryRecordCache::new()),
        counting_directory() as Arc<_>,
        TTL,
        Arc::new(NoopAuditSink),
    );

    let access = access_cache.resolve(&TenantCode::normalize("ghost"), NOW_MS).await;
    assert!(!access.admits());
    assert_eq!(access.status, TenantStatus::Unknown);
    assert_eq!(access.tier.as_str(), "free");
}

#[tokio::test(start_paused = true)]
async fn directory_outage_degrades_to_unknown() {
    let access_cache = TenantAccessCache::new(
        Arc::new(MemoryRecordCache::new()),
        Arc::new(DownDirectory),
        TTL,
        Arc::new(NoopAuditSink),
    );

    let access = access_cache.resolve(&TenantCode::normalize("acme"), NOW_MS).await;
    assert!(!access.admits());
    assert_eq!(access.status, TenantStatus::Unknown);
}

#[tokio::test(start_paused = true)]
async fn cache_write_failure_does_not_fail_the_lookup() {
    let directory = counting_directory();
    let access_cache = TenantAccessCache::new(
        Arc::new(ReadOnlyCache {
            inner: MemoryRecordCache::new(),
        }),
        Arc::clone(&directory) as Arc<_>,
        TTL,
        Arc::new(NoopAuditSink),
    );
    let tenant = TenantCode::normalize("acme");

    let access = access_cache.resolve(&tenant, NOW_MS).await;
    assert!(access.admits());

    // Every resolution falls through to the directory since writes fail.
    let _ = access_cache.resolve(&tenant, NOW_MS).await;
    assert_eq!(directory.lookups.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn blank_tenant_resolves_under_the_unknown_sentinel() {
    let access_cache = TenantAccessCache::new(
        Arc::new(MemoryRecordCache::new()),
        counting_directory() as Arc<_>,
        TTL,
        Arc::new(NoopAuditSink),
    );

    let access = access_cache.resolve(&TenantCode::normalize("   "), NOW_MS).await;
    assert!(!access.admits());
}
