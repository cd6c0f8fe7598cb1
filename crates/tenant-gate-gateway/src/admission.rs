// crates/tenant-gate-gateway/src/admission.rs
// ============================================================================
// Module: Tiered Admission Controller
// Description: Fixed-window rate admission per tenant tier plus global.
// Purpose: Enforce tier and global windows over the shared counter store.
// Dependencies: tenant-gate-core, tenant-gate-config, tenant-gate-providers
// ============================================================================

//! ## Overview
//! Two independent fixed-window limiters gate each request: the per-tenant
//! tier window (`tenant-tier:{tier}:{tenant}`) and an optional global
//! window keyed by a configurable strategy. Each window is an atomic
//! `INCR`; the increment that creates the counter also sets its expiry.
//! Window boundaries are fixed, not sliding: a full burst at the end of
//! one window followed by another at the start of the next is accepted.
//!
//! ## Invariants
//! - Super-admins are exempt from rate admission.
//! - A tier with no configuration is unlimited.
//! - Counter store failures fail open: availability of the gateway takes
//!   priority over strict limiting when the store itself is down. Every
//!   such degradation is audited.
//! - Increments are never rolled back; an abandoned request still spends
//!   its quota.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use tenant_gate_config::AdmissionConfig;
use tenant_gate_config::GlobalLimitConfig;
use tenant_gate_config::GlobalLimitStrategy;
use tenant_gate_config::TierLimitConfig;
use tenant_gate_core::RateOutcome;
use tenant_gate_core::RateWindow;
use tenant_gate_core::TenantCode;
use tenant_gate_core::TierName;
use tenant_gate_core::global_window_key;
use tenant_gate_core::tier_window_key;
use tenant_gate_providers::CounterStore;

use crate::audit::AdmissionAuditEvent;
use crate::audit::AdmissionAuditSink;
use crate::telemetry::GateLabel;

// ============================================================================
// SECTION: Admission Scope
// ============================================================================

/// Request attributes the limiters key on.
///
/// # Invariants
/// - `tenant` is always present; IP and subject are optional fallbacks for
///   the global strategy.
#[derive(Debug, Clone)]
pub struct AdmissionScope<'a> {
    /// Tenant the request resolved to.
    pub tenant: &'a TenantCode,
    /// Peer IP address, when known.
    pub peer_ip: Option<IpAddr>,
    /// Authenticated principal subject, when known.
    pub subject: Option<&'a str>,
}

// ============================================================================
// SECTION: Controller
// ============================================================================

/// Fixed-window admission controller.
///
/// # Invariants
/// - All counter keys are tenant/tier/strategy-namespaced; no key is shared
///   across tenants.
pub struct TieredAdmissionController {
    /// Shared atomic counter store.
    store: Arc<dyn CounterStore>,
    /// Per-tier window configuration.
    tiers: BTreeMap<TierName, TierLimitConfig>,
    /// Optional global window configuration.
    global: Option<GlobalLimitConfig>,
    /// Audit sink for degraded-dependency warnings.
    audit: Arc<dyn AdmissionAuditSink>,
}

impl TieredAdmissionController {
    /// Builds a controller from validated configuration.
    #[must_use]
    pub fn from_config(
        config: &AdmissionConfig,
        store: Arc<dyn CounterStore>,
        audit: Arc<dyn AdmissionAuditSink>,
    ) -> Self {
        let tiers = config
            .tiers
            .iter()
            .map(|(tier, limit)| (TierName::normalize(tier), *limit))
            .collect();
        Self {
            store,
            tiers,
            global: config.global_limit,
            audit,
        }
    }

    /// Admits or rejects one request against the tier and global windows.
    ///
    /// Returns `None` when no limiter applies (super-admin, or neither a
    /// tier window nor a global window is configured); otherwise the
    /// outcome of the deciding window.
    pub async fn admit(
        &self,
        scope: &AdmissionScope<'_>,
        tier: &TierName,
        is_super_admin: bool,
    ) -> Option<RateOutcome> {
        if is_super_admin {
            return None;
        }

        let tier_outcome = match self.tiers.get(tier) {
            Some(limit) => {
                let key = tier_window_key(tier, scope.tenant);
                let outcome = self.check_window(key, limit.capacity, limit.window()).await;
                if !outcome.allowed {
                    return Some(outcome);
                }
                Some(outcome)
            }
            None => None,
        };

        let global_outcome = match &self.global {
            Some(global) => {
                let key = global_window_key(
                    global.strategy.as_str(),
                    &resolve_global_key(scope, global.strategy),
                );
                let outcome = self.check_window(key, global.capacity, global.window()).await;
                if !outcome.allowed {
                    return Some(outcome);
                }
                Some(outcome)
            }
            None => None,
        };

        // Both windows admitted; surface the tier outcome when present so
        // the rate headers reflect the tenant's own plan.
        tier_outcome.or(global_outcome)
    }

    /// Runs one fixed-window check against the counter store.
    async fn check_window(&self, key: String, capacity: u32, duration: Duration) -> RateOutcome {
        let window = match RateWindow::new(key, capacity, duration) {
            Ok(window) => window,
            Err(err) => {
                self.audit.record(&AdmissionAuditEvent::degraded(
                    GateLabel::RateAdmission.as_str(),
                    format!("invalid rate window skipped: {err}"),
                    None,
                ));
                return RateOutcome::unlimited();
            }
        };
        let count = match self.store.incr(&window.key).await {
            Ok(count) => count,
            Err(err) => {
                self.audit.record(&AdmissionAuditEvent::degraded(
                    GateLabel::RateAdmission.as_str(),
                    format!("counter increment failed, admitting open: {err}"),
                    None,
                ));
                return RateOutcome {
                    allowed: true,
                    limit: window.capacity,
                    remaining: window.capacity.saturating_sub(1),
                };
            }
        };
        if count == 1
            && let Err(err) = self.store.expire(&window.key, window.window).await
        {
            self.audit.record(&AdmissionAuditEvent::degraded(
                GateLabel::RateAdmission.as_str(),
                format!("window expiry could not be set: {err}"),
                None,
            ));
        }
        RateOutcome::from_count(window.capacity, count)
    }
}

// ============================================================================
// SECTION: Key Resolution
// ============================================================================

/// Resolves the global window key for the configured strategy.
///
/// Falls back to the tenant code when the strategy's attribute is absent,
/// keeping the window keyed deterministically rather than skipping it.
fn resolve_global_key(scope: &AdmissionScope<'_>, strategy: GlobalLimitStrategy) -> String {
    match strategy {
        GlobalLimitStrategy::Tenant => scope.tenant.as_str().to_string(),
        GlobalLimitStrategy::Ip => scope
            .peer_ip
            .map_or_else(|| scope.tenant.as_str().to_string(), |ip| ip.to_string()),
        GlobalLimitStrategy::User => scope
            .subject
            .map_or_else(|| scope.tenant.as_str().to_string(), str::to_string),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
