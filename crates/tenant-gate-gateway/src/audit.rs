// crates/tenant-gate-gateway/src/audit.rs
// ============================================================================
// Module: Admission Audit
// Description: Structured audit events for admission decisions.
// Purpose: Surface allow/deny outcomes and degraded dependencies to sinks.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every gate decision and every degraded-dependency event (counter store
//! outage, cache write failure, registry outage) is recorded through the
//! [`AdmissionAuditSink`] seam. Internal failures are never silently
//! swallowed and never process-fatal; they surface here at warning
//! severity while the gate applies its documented fail-open or fail-closed
//! rule.
//!
//! Security posture: audit events must not leak request payloads; they
//! carry classification labels and identifiers only.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

// ============================================================================
// SECTION: Event Types
// ============================================================================

/// Audit severity for admission events.
///
/// # Invariants
/// - Variants are stable for log filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSeverity {
    /// Routine decision event.
    Info,
    /// Degraded dependency or recoverable internal failure.
    Warning,
}

/// Admission audit event payload.
///
/// # Invariants
/// - `decision` is `allow`, `deny`, or `degraded`.
/// - Optional fields are `None` when the metadata is unavailable.
#[derive(Debug, Clone, Serialize)]
pub struct AdmissionAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event severity.
    pub severity: AuditSeverity,
    /// Gate that produced the event.
    pub gate: &'static str,
    /// Decision label.
    pub decision: &'static str,
    /// Deny or degradation reason label.
    pub reason: Option<String>,
    /// Tenant code, when resolved.
    pub tenant: Option<String>,
    /// Request path, when relevant.
    pub path: Option<String>,
}

impl AdmissionAuditEvent {
    /// Builds an allow event for a gate.
    #[must_use]
    pub fn allowed(gate: &'static str, tenant: Option<&str>, path: Option<&str>) -> Self {
        Self {
            event: "admission_decision",
            severity: AuditSeverity::Info,
            gate,
            decision: "allow",
            reason: None,
            tenant: tenant.map(str::to_string),
            path: path.map(str::to_string),
        }
    }

    /// Builds a deny event for a gate.
    #[must_use]
    pub fn denied(
        gate: &'static str,
        reason: impl Into<String>,
        tenant: Option<&str>,
        path: Option<&str>,
    ) -> Self {
        Self {
            event: "admission_decision",
            severity: AuditSeverity::Info,
            gate,
            decision: "deny",
            reason: Some(reason.into()),
            tenant: tenant.map(str::to_string),
            path: path.map(str::to_string),
        }
    }

    /// Builds a warning event for a degraded dependency.
    #[must_use]
    pub fn degraded(gate: &'static str, reason: impl Into<String>, tenant: Option<&str>) -> Self {
        Self {
            event: "admission_degraded",
            severity: AuditSeverity::Warning,
            gate,
            decision: "degraded",
            reason: Some(reason.into()),
            tenant: tenant.map(str::to_string),
            path: None,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for admission events.
pub trait AdmissionAuditSink: Send + Sync {
    /// Records an admission audit event.
    fn record(&self, event: &AdmissionAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AdmissionAuditSink for StderrAuditSink {
    #[allow(clippy::print_stderr, reason = "Stderr is the sink's delivery channel.")]
    fn record(&self, event: &AdmissionAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            eprintln!("{payload}");
        }
    }
}

/// No-op audit sink for tests.
pub struct NoopAuditSink;

impl AdmissionAuditSink for NoopAuditSink {
    fn record(&self, _event: &AdmissionAuditEvent) {}
}
