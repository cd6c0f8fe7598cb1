// crates/tenant-gate-core/src/core/decision.rs
// ============================================================================
// Module: Gate Decisions
// Description: Allow/deny outcomes and tenant verification labels.
// Purpose: Provide stable decision types shared by all admission gates.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every gate produces a [`GateDecision`]; the decision engine additionally
//! produces a [`TenantVerification`] that becomes the `X-Tenant-Verified`
//! response header. Deny reasons are stable labels for audit sinks and for
//! mapping to the structured HTTP error surface.
//!
//! ## Invariants
//! - Decisions are deterministic for identical inputs.
//! - Deny reasons never carry raw request data; they are classification
//!   labels only.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::TenantCode;

// ============================================================================
// SECTION: Deny Reasons
// ============================================================================

/// Classification of why a gate denied a request.
///
/// # Invariants
/// - Variants are stable for audit labeling and error mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// Request carried no authenticated principal.
    Unauthenticated,
    /// Conflicting tenant signals were present.
    AmbiguousTenant,
    /// No tenant could be resolved and the route requires one.
    MissingTenant,
    /// Tenant is deactivated.
    TenantInactive,
    /// Tenant is suspended.
    TenantSuspended,
    /// Tenant is unknown to the directory (or the directory is down).
    TenantUnknown,
    /// A fixed-window limit rejected the request.
    RateLimited,
}

impl DenyReason {
    /// Returns a stable label for audit events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::AmbiguousTenant => "ambiguous_tenant",
            Self::MissingTenant => "missing_tenant",
            Self::TenantInactive => "tenant_inactive",
            Self::TenantSuspended => "tenant_suspended",
            Self::TenantUnknown => "tenant_unknown",
            Self::RateLimited => "rate_limited",
        }
    }

    /// Returns true when a retry after the current window may succeed.
    #[must_use]
    pub const fn retryable(self) -> bool {
        matches!(self, Self::RateLimited)
    }
}

// ============================================================================
// SECTION: Gate Decision
// ============================================================================

/// Outcome of one admission gate.
///
/// # Invariants
/// - `Deny` always carries a classification reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Request may proceed.
    Allow,
    /// Request is rejected.
    Deny(DenyReason),
}

impl GateDecision {
    /// Returns true when the request was admitted.
    #[must_use]
    pub const fn is_allow(self) -> bool {
        matches!(self, Self::Allow)
    }
}

// ============================================================================
// SECTION: Tenant Verification
// ============================================================================

/// Resolved tenant identity attached to the response.
///
/// # Invariants
/// - Wire forms are the tenant code, `"super-admin"`, or `"false"`; bypassed
///   routes emit no header at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantVerification {
    /// Request verified against a concrete tenant.
    Tenant(TenantCode),
    /// Global operator access with no tenant scoping requested.
    SuperAdmin,
    /// Verification failed.
    Denied,
    /// Route is exempt from tenant verification.
    NotRequired,
}

impl TenantVerification {
    /// Returns the `X-Tenant-Verified` header value, when one applies.
    #[must_use]
    pub fn header_value(&self) -> Option<&str> {
        match self {
            Self::Tenant(code) => Some(code.as_str()),
            Self::SuperAdmin => Some("super-admin"),
            Self::Denied => Some("false"),
            Self::NotRequired => None,
        }
    }
}
