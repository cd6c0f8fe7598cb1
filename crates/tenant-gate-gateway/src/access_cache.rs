// crates/tenant-gate-gateway/src/access_cache.rs
// ============================================================================
// Module: Tenant Access Cache
// Description: Cache-aside resolution of tenant access records.
// Purpose: Resolve tenant state with TTL caching and fail-closed degradation.
// Dependencies: tenant-gate-core, tenant-gate-providers
// ============================================================================

//! ## Overview
//! Cache-aside over the shared record cache: a hit with a decodable payload
//! is returned as-is; a miss, an undecodable payload, or a cache outage
//! falls through to the Tenant Directory. When the directory has no record
//! (or is unreachable) the cache synthesizes an inert unknown/free/inactive
//! record instead of failing the request path; the authorization step then
//! denies deterministically. Directory fetches are written back
//! best-effort; a failed cache write never fails the lookup.
//!
//! ## Invariants
//! - Keys are normalized tenant codes; blank input resolves under the
//!   `unknown` sentinel.
//! - No error escapes `resolve`; infrastructure failures degrade to the
//!   synthetic record and an audit warning.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use tenant_gate_core::TenantAccess;
use tenant_gate_core::TenantCode;
use tenant_gate_core::TenantStatus;
use tenant_gate_core::TierName;
use tenant_gate_core::derive_tier;
use tenant_gate_providers::DirectoryTenantRecord;
use tenant_gate_providers::RecordCache;
use tenant_gate_providers::TenantDirectory;

use crate::audit::AdmissionAuditEvent;
use crate::audit::AdmissionAuditSink;
use crate::telemetry::GateLabel;

// ============================================================================
// SECTION: Cache
// ============================================================================

/// Cache-aside tenant access resolver.
///
/// # Invariants
/// - Records are snapshots; a fresh fetch replaces, never mutates.
pub struct TenantAccessCache {
    /// Shared record cache backing store.
    cache: Arc<dyn RecordCache>,
    /// Tenant directory source of truth.
    directory: Arc<dyn TenantDirectory>,
    /// Cache TTL for access records.
    ttl: Duration,
    /// Audit sink for degraded-dependency warnings.
    audit: Arc<dyn AdmissionAuditSink>,
}

impl TenantAccessCache {
    /// Builds a new access cache.
    #[must_use]
    pub fn new(
        cache: Arc<dyn RecordCache>,
        directory: Arc<dyn TenantDirectory>,
        ttl: Duration,
        audit: Arc<dyn AdmissionAuditSink>,
    ) -> Self {
        Self {
            cache,
            directory,
            ttl,
            audit,
        }
    }

    /// Resolves the tenant's access record, consulting the cache first.
    pub async fn resolve(&self, tenant: &TenantCode, now_ms: i64) -> TenantAccess {
        let key = cache_key(tenant);
        match self.cache.get(&key).await {
            Ok(Some(payload)) => match TenantAccess::decode_cached(&payload) {
                Ok(record) => return record,
                Err(err) => {
                    self.audit.record(&AdmissionAuditEvent::degraded(
                        GateLabel::TenantAuthz.as_str(),
                        format!("cached access record discarded: {err}"),
                        Some(tenant.as_str()),
                    ));
                }
            },
            Ok(None) => {}
            Err(err) => {
                self.audit.record(&AdmissionAuditEvent::degraded(
                    GateLabel::TenantAuthz.as_str(),
                    format!("access cache read failed: {err}"),
                    Some(tenant.as_str()),
                ));
            }
        }
        self.fetch_and_store(tenant, &key, now_ms).await
    }

    /// Fetches from the directory and writes back best-effort.
    async fn fetch_and_store(&self, tenant: &TenantCode, key: &str, now_ms: i64) -> TenantAccess {
        match self.directory.lookup(tenant).await {
            Ok(Some(record)) => {
                let access = map_directory_record(&record, now_ms);
                self.store_best_effort(tenant, key, &access).await;
                access
            }
            Ok(None) => TenantAccess::unknown(now_ms),
            Err(err) => {
                self.audit.record(&AdmissionAuditEvent::degraded(
                    GateLabel::TenantAuthz.as_str(),
                    format!("directory lookup failed: {err}"),
                    Some(tenant.as_str()),
                ));
                TenantAccess::unknown(now_ms)
            }
        }
    }

    /// Writes a record back to the cache, auditing failures.
    async fn store_best_effort(&self, tenant: &TenantCode, key: &str, access: &TenantAccess) {
        let payload = match access.encode_cached() {
            Ok(payload) => payload,
            Err(err) => {
                self.audit.record(&AdmissionAuditEvent::degraded(
                    GateLabel::TenantAuthz.as_str(),
                    format!("access record encode failed: {err}"),
                    Some(tenant.as_str()),
                ));
                return;
            }
        };
        if let Err(err) = self.cache.put(key, &payload, self.ttl).await {
            self.audit.record(&AdmissionAuditEvent::degraded(
                GateLabel::TenantAuthz.as_str(),
                format!("access cache write failed: {err}"),
                Some(tenant.as_str()),
            ));
        }
    }
}

// ============================================================================
// SECTION: Mapping
// ============================================================================

/// Builds the cache key for a tenant's access record.
fn cache_key(tenant: &TenantCode) -> String {
    format!("tenant-access:{tenant}")
}

/// Maps a directory record onto the access snapshot consumed by the engine.
fn map_directory_record(record: &DirectoryTenantRecord, now_ms: i64) -> TenantAccess {
    let status = if record.status.trim().is_empty() {
        TenantStatus::Unknown
    } else {
        TenantStatus::parse(&record.status)
    };
    let tier: TierName = derive_tier(
        record.features.iter().map(String::as_str),
        record.resource_allocations.keys().map(String::as_str),
    );
    TenantAccess {
        active: record.active,
        status,
        tier,
        permissions: record.permissions.iter().cloned().collect(),
        fetched_at_ms: now_ms,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
