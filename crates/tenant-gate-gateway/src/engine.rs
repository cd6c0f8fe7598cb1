// crates/tenant-gate-gateway/src/engine.rs
// ============================================================================
// Module: Tenant Authorization Decision Engine
// Description: Per-request tenant resolution, consistency checks, admission.
// Purpose: Produce the final allow/deny decision for tenant-scoped routes.
// Dependencies: tenant-gate-core, tenant-gate-config, crate gates
// ============================================================================

//! ## Overview
//! The engine resolves up to four tenant candidates per request (the
//! pre-resolved attribute, the tenant header, a `/tenants/{id}/...` path
//! segment, and a JWT claim), cross-checks them, applies the super-admin
//! escape hatch, and gates the resolved tenant through the access cache and
//! the tiered admission controller.
//!
//! ## Invariants
//! - Tenant isolation fails closed: any conflict between non-empty signals
//!   denies; signals are never merged.
//! - The super-admin escape hatch applies only when no tenant signal exists
//!   anywhere; an operator addressing a tenant is subject to that tenant's
//!   state checks.
//! - All request state travels in an explicit [`AdmissionRequest`]; the
//!   engine holds no per-request mutable state of its own.
//! - `now_ms` is supplied by the caller; the engine never reads the wall
//!   clock.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::net::IpAddr;
use std::sync::Arc;

use tenant_gate_config::EngineConfig;
use tenant_gate_core::DenyReason;
use tenant_gate_core::GateDecision;
use tenant_gate_core::RateOutcome;
use tenant_gate_core::TenantCode;
use tenant_gate_core::TenantStatus;
use tenant_gate_core::TenantVerification;
use tenant_gate_core::TierName;

use crate::access_cache::TenantAccessCache;
use crate::admission::AdmissionScope;
use crate::admission::TieredAdmissionController;
use crate::audit::AdmissionAuditEvent;
use crate::audit::AdmissionAuditSink;
use crate::path_match::PathPatternError;
use crate::path_match::PathPatternSet;
use crate::path_match::tenant_path_segment;
use crate::telemetry::AdmissionMetricEvent;
use crate::telemetry::AdmissionMetrics;
use crate::telemetry::GateLabel;
use crate::telemetry::GateOutcome;

// ============================================================================
// SECTION: Request Context
// ============================================================================

/// Authenticated principal attached to a request.
///
/// # Invariants
/// - `authorities` are exact-match strings; no pattern semantics.
#[derive(Debug, Clone, Default)]
pub struct Principal {
    /// Stable subject identifier.
    pub subject: String,
    /// Granted authority strings.
    pub authorities: BTreeSet<String>,
    /// Token claims, keyed by claim name.
    pub claims: BTreeMap<String, String>,
}

/// Explicit per-request context consumed by the engine.
///
/// # Invariants
/// - Header keys are ASCII-lowercased by the transport glue.
/// - This is a plain value; nothing request-scoped lives in process-wide
///   state.
#[derive(Debug, Clone, Default)]
pub struct AdmissionRequest {
    /// Request path.
    pub path: String,
    /// Tenant attribute resolved by an upstream filter, when present.
    pub pre_resolved_tenant: Option<String>,
    /// Request headers (lowercased names).
    pub headers: BTreeMap<String, String>,
    /// Peer IP address, when known.
    pub peer_ip: Option<IpAddr>,
    /// Authenticated principal, when the request is authenticated.
    pub principal: Option<Principal>,
}

// ============================================================================
// SECTION: Decision
// ============================================================================

/// Final engine decision for one request.
///
/// # Invariants
/// - `rate` is present exactly when a configured window was consulted.
#[derive(Debug, Clone)]
pub struct EngineDecision {
    /// Allow/deny outcome.
    pub decision: GateDecision,
    /// Verification label for the response header.
    pub verification: TenantVerification,
    /// Tier resolved for the tenant, when one was.
    pub tier: Option<TierName>,
    /// Rate outcome of the deciding window, when one was consulted.
    pub rate: Option<RateOutcome>,
}

impl EngineDecision {
    /// Builds a deny decision with the `false` verification label.
    fn deny(reason: DenyReason) -> Self {
        Self {
            decision: GateDecision::Deny(reason),
            verification: TenantVerification::Denied,
            tier: None,
            rate: None,
        }
    }
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Tenant authorization decision engine.
///
/// # Invariants
/// - Decisions are deterministic for identical inputs and store state.
pub struct TenantDecisionEngine {
    /// Bypass patterns exempt from verification.
    bypass: PathPatternSet,
    /// Lowercased tenant header name.
    tenant_header: String,
    /// Ordered JWT claim names for the tenant candidate.
    claim_names: Vec<String>,
    /// Exact-match super-admin authorities.
    super_admin_authorities: BTreeSet<String>,
    /// Tenant access resolution.
    access_cache: TenantAccessCache,
    /// Tier and global rate admission.
    admission: TieredAdmissionController,
    /// Audit sink for decisions.
    audit: Arc<dyn AdmissionAuditSink>,
    /// Metrics sink for decision counters.
    metrics: Arc<dyn AdmissionMetrics>,
}

impl TenantDecisionEngine {
    /// Builds an engine from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PathPatternError`] when a bypass pattern cannot be parsed.
    pub fn new(
        config: &EngineConfig,
        access_cache: TenantAccessCache,
        admission: TieredAdmissionController,
        audit: Arc<dyn AdmissionAuditSink>,
        metrics: Arc<dyn AdmissionMetrics>,
    ) -> Result<Self, PathPatternError> {
        Ok(Self {
            bypass: PathPatternSet::parse(&config.bypass_patterns)?,
            tenant_header: config.tenant_header.to_ascii_lowercase(),
            claim_names: config.jwt_claim_names.clone(),
            super_admin_authorities: config.super_admin_authorities.iter().cloned().collect(),
            access_cache,
            admission,
            audit,
            metrics,
        })
    }

    /// Produces the admission decision for one request.
    pub async fn decide(&self, request: &AdmissionRequest, now_ms: i64) -> EngineDecision {
        if self.bypass.matches(&request.path) {
            return EngineDecision {
                decision: GateDecision::Allow,
                verification: TenantVerification::NotRequired,
                tier: None,
                rate: None,
            };
        }

        let Some(principal) = &request.principal else {
            return self.audited(request, EngineDecision::deny(DenyReason::Unauthenticated));
        };

        let pre_resolved = non_empty(request.pre_resolved_tenant.as_deref());
        let header = non_empty(request.headers.get(&self.tenant_header).map(String::as_str));
        let path_tenant = tenant_path_segment(&request.path);
        let path_tenant = non_empty(path_tenant.as_deref());
        let jwt_tenant = self.jwt_tenant(principal);
        let is_super_admin = principal
            .authorities
            .iter()
            .any(|authority| self.super_admin_authorities.contains(authority));

        let no_signal = pre_resolved.is_none()
            && header.is_none()
            && path_tenant.is_none()
            && jwt_tenant.is_none();
        if is_super_admin && no_signal {
            // Global operator access: no tenant scoping requested anywhere.
            return self.audited(
                request,
                EngineDecision {
                    decision: GateDecision::Allow,
                    verification: TenantVerification::SuperAdmin,
                    tier: None,
                    rate: None,
                },
            );
        }

        if !is_super_admin {
            if let Some(jwt) = jwt_tenant.as_deref() {
                // The token claim is authoritative against every non-empty
                // competing signal; an absent signal is not a mismatch.
                let conflicting = [pre_resolved.as_deref(), header.as_deref(), path_tenant.as_deref()]
                    .into_iter()
                    .flatten()
                    .any(|candidate| !candidate.eq_ignore_ascii_case(jwt));
                if conflicting {
                    return self.audited(request, EngineDecision::deny(DenyReason::AmbiguousTenant));
                }
            } else {
                if let (Some(header), Some(path)) = (header.as_deref(), path_tenant.as_deref())
                    && !header.eq_ignore_ascii_case(path)
                {
                    return self.audited(request, EngineDecision::deny(DenyReason::AmbiguousTenant));
                }
                if let (Some(pre), Some(path)) = (pre_resolved.as_deref(), path_tenant.as_deref())
                    && !pre.eq_ignore_ascii_case(path)
                {
                    return self.audited(request, EngineDecision::deny(DenyReason::AmbiguousTenant));
                }
            }
        }

        let final_tenant = pre_resolved.or(header).or(path_tenant).or(jwt_tenant);
        let Some(raw_tenant) = final_tenant else {
            // No signal resolved: operators keep their escape hatch, every
            // other principal is denied on tenant-scoped routes.
            let decision = if is_super_admin {
                EngineDecision {
                    decision: GateDecision::Allow,
                    verification: TenantVerification::SuperAdmin,
                    tier: None,
                    rate: None,
                }
            } else {
                EngineDecision::deny(DenyReason::MissingTenant)
            };
            return self.audited(request, decision);
        };

        let tenant = TenantCode::normalize(&raw_tenant);
        let access = self.access_cache.resolve(&tenant, now_ms).await;
        if !access.admits() {
            let reason = match access.status {
                TenantStatus::Suspended => DenyReason::TenantSuspended,
                TenantStatus::Unknown => DenyReason::TenantUnknown,
                TenantStatus::Inactive | TenantStatus::Active => DenyReason::TenantInactive,
            };
            return self.audited(request, EngineDecision::deny(reason));
        }

        let scope = AdmissionScope {
            tenant: &tenant,
            peer_ip: request.peer_ip,
            subject: Some(principal.subject.as_str()).filter(|subject| !subject.is_empty()),
        };
        let rate = self.admission.admit(&scope, &access.tier, is_super_admin).await;
        if let Some(outcome) = rate
            && !outcome.allowed
        {
            return self.audited(
                request,
                EngineDecision {
                    decision: GateDecision::Deny(DenyReason::RateLimited),
                    verification: TenantVerification::Denied,
                    tier: Some(access.tier.clone()),
                    rate: Some(outcome),
                },
            );
        }

        self.audited(
            request,
            EngineDecision {
                decision: GateDecision::Allow,
                verification: TenantVerification::Tenant(tenant),
                tier: Some(access.tier),
                rate,
            },
        )
    }

    /// Resolves the first non-empty configured JWT claim.
    fn jwt_tenant(&self, principal: &Principal) -> Option<String> {
        self.claim_names.iter().find_map(|name| {
            principal
                .claims
                .get(name)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        })
    }

    /// Records the decision through the audit and metrics seams.
    fn audited(&self, request: &AdmissionRequest, decision: EngineDecision) -> EngineDecision {
        let tenant = match &decision.verification {
            TenantVerification::Tenant(code) => Some(code.as_str()),
            TenantVerification::SuperAdmin => Some("super-admin"),
            TenantVerification::Denied | TenantVerification::NotRequired => None,
        };
        let event = match decision.decision {
            GateDecision::Allow => AdmissionAuditEvent::allowed(
                GateLabel::TenantAuthz.as_str(),
                tenant,
                Some(&request.path),
            ),
            GateDecision::Deny(reason) => AdmissionAuditEvent::denied(
                GateLabel::TenantAuthz.as_str(),
                reason.as_str(),
                tenant,
                Some(&request.path),
            ),
        };
        self.audit.record(&event);
        self.metrics.record_decision(AdmissionMetricEvent {
            gate: GateLabel::TenantAuthz,
            outcome: if decision.decision.is_allow() {
                GateOutcome::Allow
            } else {
                GateOutcome::Deny
            },
            tenant: tenant.map(str::to_string),
        });
        decision
    }
}

/// Trims an optional signal, treating blank values as absent.
fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|value| !value.is_empty()).map(str::to_string)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
