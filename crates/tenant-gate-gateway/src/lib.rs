// crates/tenant-gate-gateway/src/lib.rs
// ============================================================================
// Module: Tenant Gate Gateway Library
// Description: The four admission gates plus orchestration and responses.
// Purpose: Decide, per request, tenant authorization, rate, mTLS, and shape.
// Dependencies: tenant-gate-core, tenant-gate-config, tenant-gate-providers
// ============================================================================

//! ## Overview
//! `tenant-gate-gateway` hosts the admission gates that run on every
//! request before it reaches business services: the Tenant Authorization
//! Decision Engine (identity resolution, consistency checks, tenant state),
//! the Tiered Admission Controller (fixed-window tier and global limits),
//! the Certificate Trust Evaluator (partner mTLS), and the Query Complexity
//! Guard. The three outer gates are independent and composable; a request
//! may be subject to all of them, in any order.
//!
//! Security posture: tenant isolation and certificate trust fail closed;
//! rate admission fails open on counter-store outage. Every degradation is
//! audited, never silently swallowed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod access_cache;
pub mod admission;
pub mod audit;
pub mod complexity_guard;
pub mod engine;
pub mod mtls;
pub mod path_match;
pub mod response;
pub mod telemetry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use access_cache::TenantAccessCache;
pub use admission::AdmissionScope;
pub use admission::TieredAdmissionController;
pub use audit::AdmissionAuditEvent;
pub use audit::AdmissionAuditSink;
pub use audit::AuditSeverity;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use complexity_guard::QueryComplexityGuard;
pub use engine::AdmissionRequest;
pub use engine::EngineDecision;
pub use engine::Principal;
pub use engine::TenantDecisionEngine;
pub use mtls::CertificateTrustEvaluator;
pub use mtls::MtlsDecision;
pub use path_match::PathPattern;
pub use path_match::PathPatternError;
pub use path_match::PathPatternSet;
pub use path_match::tenant_path_segment;
pub use response::GateRejection;
pub use response::RATE_LIMIT_LIMIT_HEADER;
pub use response::RATE_LIMIT_REMAINING_HEADER;
pub use response::TENANT_VERIFIED_HEADER;
pub use response::append_rate_headers;
pub use response::complexity_rejection;
pub use response::decision_headers;
pub use response::engine_rejection;
pub use response::mtls_rejection;
pub use telemetry::ADMISSION_LATENCY_BUCKETS_MS;
pub use telemetry::AdmissionMetricEvent;
pub use telemetry::AdmissionMetrics;
pub use telemetry::GateLabel;
pub use telemetry::GateOutcome;
pub use telemetry::NoopMetrics;
