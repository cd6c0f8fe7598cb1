// crates/tenant-gate-gateway/src/telemetry.rs
// ============================================================================
// Module: Admission Telemetry
// Description: Observability hooks for admission gate decisions.
// Purpose: Provide metric events and latency buckets without hard deps.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module exposes a thin metrics interface for admission decision
//! counters and latency histograms. It is intentionally dependency-light so
//! deployments can plug in Prometheus or OpenTelemetry without redesign.
//!
//! Security posture: telemetry labels are classification values, never raw
//! request data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default latency buckets in milliseconds for admission histograms.
pub const ADMISSION_LATENCY_BUCKETS_MS: &[u64] =
    &[1, 2, 5, 10, 25, 50, 100, 250, 500, 1_000, 2_500, 5_000];

// ============================================================================
// SECTION: Metric Labels
// ============================================================================

/// Admission gate classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum GateLabel {
    /// Tenant authorization decision engine.
    TenantAuthz,
    /// Tiered and global rate admission.
    RateAdmission,
    /// Partner mTLS certificate trust.
    MtlsTrust,
    /// GraphQL query complexity guard.
    QueryComplexity,
}

impl GateLabel {
    /// Returns a stable label for the gate.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TenantAuthz => "tenant_authz",
            Self::RateAdmission => "rate_admission",
            Self::MtlsTrust => "mtls_trust",
            Self::QueryComplexity => "query_complexity",
        }
    }
}

/// Admission outcome classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum GateOutcome {
    /// Request admitted.
    Allow,
    /// Request rejected.
    Deny,
    /// Gate degraded to its fail-open or fail-closed default.
    Degraded,
}

impl GateOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
            Self::Degraded => "degraded",
        }
    }
}

/// Admission metric event payload.
///
/// # Invariants
/// - Optional fields are `None` when the metadata is unavailable.
#[derive(Debug, Clone)]
pub struct AdmissionMetricEvent {
    /// Gate that produced the decision.
    pub gate: GateLabel,
    /// Decision outcome.
    pub outcome: GateOutcome,
    /// Tenant code, when resolved.
    pub tenant: Option<String>,
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Metrics sink for admission decisions and latencies.
pub trait AdmissionMetrics: Send + Sync {
    /// Records a decision counter event.
    fn record_decision(&self, event: AdmissionMetricEvent);
    /// Records a latency observation for the decision.
    fn record_latency(&self, event: AdmissionMetricEvent, latency: Duration);
}

/// No-op metrics sink.
///
/// # Invariants
/// - Metrics are intentionally discarded.
pub struct NoopMetrics;

impl AdmissionMetrics for NoopMetrics {
    fn record_decision(&self, _event: AdmissionMetricEvent) {}

    fn record_latency(&self, _event: AdmissionMetricEvent, _latency: Duration) {}
}
