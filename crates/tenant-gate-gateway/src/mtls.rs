// crates/tenant-gate-gateway/src/mtls.rs
// ============================================================================
// Module: Certificate Trust Evaluator
// Description: Partner mTLS trust decisions over cached registry records.
// Purpose: Gate partner routes on presented client certificate trust.
// Dependencies: tenant-gate-core, tenant-gate-providers, rustls-pki-types
// ============================================================================

//! ## Overview
//! Partner routes require a trusted client certificate. The evaluator loads
//! the tenant's non-revoked records through a bounded in-process TTL cache;
//! concurrent misses for one tenant collapse into a single registry read.
//! A presented leaf matches a record when the record is live (skew-widened
//! validity window), not revoked, and carries the same SHA-256 DER
//! fingerprint.
//!
//! ## Invariants
//! - The gate fails closed: a registry outage means no certificate is
//!   trusted. Outage results are not cached, so recovery is immediate.
//! - The cache is bounded; expired entries are pruned before eviction.
//! - `now` is supplied by the caller; the evaluator never reads the wall
//!   clock for validity decisions.
//!
//! Security posture: certificate trust is a stronger boundary than the soft
//! rate limit, hence the opposite failure default.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rustls_pki_types::CertificateDer;
use tenant_gate_core::TenantCode;
use tenant_gate_core::TrustedCertificateRecord;
use tenant_gate_core::sha256_fingerprint;
use tenant_gate_providers::CertificateRegistry;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::audit::AdmissionAuditEvent;
use crate::audit::AdmissionAuditSink;
use crate::path_match::PathPatternSet;
use crate::telemetry::GateLabel;

// ============================================================================
// SECTION: Decision
// ============================================================================

/// Outcome of the mTLS trust gate for one request.
///
/// # Invariants
/// - Only `MissingCertificate` and `Denied` block the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MtlsDecision {
    /// Route is not a partner route (or no tenant resolved); proceed.
    NotRequired,
    /// A presented certificate matched a trusted record.
    Trusted,
    /// mTLS is required but no certificate chain was presented.
    MissingCertificate,
    /// No trusted record matched the presented certificate.
    Denied,
}

impl MtlsDecision {
    /// Returns true when the decision blocks the request.
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::MissingCertificate | Self::Denied)
    }
}

// ============================================================================
// SECTION: Evaluator
// ============================================================================

/// One cached per-tenant record list.
///
/// # Invariants
/// - `fetched_at` drives both freshness and eviction order.
#[derive(Debug, Clone)]
struct CachedCertificates {
    /// Non-revoked records for the tenant.
    records: Arc<Vec<TrustedCertificateRecord>>,
    /// Instant the records were fetched.
    fetched_at: Instant,
}

/// Partner mTLS trust evaluator.
///
/// # Invariants
/// - The record cache is the only shared mutable state; reads dominate and
///   misses collapse into single-flight loads per tenant.
pub struct CertificateTrustEvaluator {
    /// Certificate registry source of truth.
    registry: Arc<dyn CertificateRegistry>,
    /// Partner route patterns requiring mTLS.
    partner_routes: PathPatternSet,
    /// Clock skew tolerance for validity windows.
    clock_skew: time::Duration,
    /// Cache TTL for per-tenant record lists.
    cache_ttl: Duration,
    /// Maximum tenants held in the cache.
    max_entries: usize,
    /// Cached record lists keyed by tenant.
    entries: Mutex<HashMap<TenantCode, CachedCertificates>>,
    /// Per-tenant single-flight load locks.
    loads: Mutex<HashMap<TenantCode, Arc<Mutex<()>>>>,
    /// Audit sink for degraded-dependency warnings.
    audit: Arc<dyn AdmissionAuditSink>,
}

impl CertificateTrustEvaluator {
    /// Builds a new evaluator.
    #[must_use]
    pub fn new(
        registry: Arc<dyn CertificateRegistry>,
        partner_routes: PathPatternSet,
        clock_skew: Duration,
        cache_ttl: Duration,
        max_entries: usize,
        audit: Arc<dyn AdmissionAuditSink>,
    ) -> Self {
        Self {
            registry,
            partner_routes,
            clock_skew: time::Duration::try_from(clock_skew)
                .unwrap_or(time::Duration::ZERO),
            cache_ttl,
            max_entries: max_entries.max(1),
            entries: Mutex::new(HashMap::new()),
            loads: Mutex::new(HashMap::new()),
            audit,
        }
    }

    /// Evaluates partner mTLS trust for one request.
    pub async fn evaluate(
        &self,
        tenant: Option<&TenantCode>,
        path: &str,
        peer_certificates: &[CertificateDer<'_>],
        now: OffsetDateTime,
    ) -> MtlsDecision {
        let Some(tenant) = tenant else {
            return MtlsDecision::NotRequired;
        };
        if !self.partner_routes.matches(path) {
            return MtlsDecision::NotRequired;
        }
        let Some(leaf) = peer_certificates.first() else {
            self.audit.record(&AdmissionAuditEvent::denied(
                GateLabel::MtlsTrust.as_str(),
                "missing client certificate",
                Some(tenant.as_str()),
                Some(path),
            ));
            return MtlsDecision::MissingCertificate;
        };
        let fingerprint = sha256_fingerprint(leaf.as_ref());
        let records = self.load_records(tenant).await;
        let trusted =
            records.iter().any(|record| record.matches(&fingerprint, now, self.clock_skew));
        if trusted {
            self.audit.record(&AdmissionAuditEvent::allowed(
                GateLabel::MtlsTrust.as_str(),
                Some(tenant.as_str()),
                Some(path),
            ));
            MtlsDecision::Trusted
        } else {
            self.audit.record(&AdmissionAuditEvent::denied(
                GateLabel::MtlsTrust.as_str(),
                "no trusted certificate matched",
                Some(tenant.as_str()),
                Some(path),
            ));
            MtlsDecision::Denied
        }
    }

    /// Loads the tenant's records through the single-flight cache.
    async fn load_records(&self, tenant: &TenantCode) -> Arc<Vec<TrustedCertificateRecord>> {
        if let Some(records) = self.fresh_records(tenant).await {
            return records;
        }
        let load_lock = {
            let mut loads = self.loads.lock().await;
            Arc::clone(loads.entry(tenant.clone()).or_insert_with(|| Arc::new(Mutex::new(()))))
        };
        let _guard = load_lock.lock().await;
        // A concurrent load may have filled the cache while we waited.
        if let Some(records) = self.fresh_records(tenant).await {
            self.release_load_lock(tenant).await;
            return records;
        }
        let records = match self.registry.certificates(tenant).await {
            Ok(records) => {
                let records =
                    Arc::new(records.into_iter().filter(|record| !record.revoked).collect::<Vec<_>>());
                self.insert_records(tenant, Arc::clone(&records)).await;
                records
            }
            Err(err) => {
                self.audit.record(&AdmissionAuditEvent::degraded(
                    GateLabel::MtlsTrust.as_str(),
                    format!("certificate registry unavailable, denying closed: {err}"),
                    Some(tenant.as_str()),
                ));
                Arc::new(Vec::new())
            }
        };
        self.release_load_lock(tenant).await;
        records
    }

    /// Returns the cached records when still fresh.
    async fn fresh_records(&self, tenant: &TenantCode) -> Option<Arc<Vec<TrustedCertificateRecord>>> {
        let entries = self.entries.lock().await;
        entries.get(tenant).and_then(|cached| {
            if cached.fetched_at.elapsed() < self.cache_ttl {
                Some(Arc::clone(&cached.records))
            } else {
                None
            }
        })
    }

    /// Inserts freshly loaded records, evicting when the cache is full.
    async fn insert_records(&self, tenant: &TenantCode, records: Arc<Vec<TrustedCertificateRecord>>) {
        let mut entries = self.entries.lock().await;
        if entries.len() >= self.max_entries && !entries.contains_key(tenant) {
            let ttl = self.cache_ttl;
            entries.retain(|_, cached| cached.fetched_at.elapsed() < ttl);
        }
        if entries.len() >= self.max_entries && !entries.contains_key(tenant) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, cached)| cached.fetched_at)
                .map(|(key, _)| key.clone());
            if let Some(key) = oldest {
                entries.remove(&key);
            }
        }
        entries.insert(
            tenant.clone(),
            CachedCertificates {
                records,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Drops the tenant's load lock entry once a load settles.
    async fn release_load_lock(&self, tenant: &TenantCode) {
        let mut loads = self.loads.lock().await;
        loads.remove(tenant);
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
