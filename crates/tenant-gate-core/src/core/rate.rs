// crates/tenant-gate-core/src/core/rate.rs
// ============================================================================
// Module: Rate Windows
// Description: Fixed-window rate descriptors and counter key namespaces.
// Purpose: Provide validated window definitions shared by tier and global limiters.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`RateWindow`] describes one fixed-window counter: its namespaced key,
//! its capacity, and its window duration. Windows are *fixed*, not sliding:
//! a burst of `capacity` requests at the end of one window followed by a
//! full burst at the start of the next is accepted. That boundary behavior
//! is a documented property of the algorithm.
//!
//! ## Invariants
//! - `capacity >= 1` and `window > 0`, enforced at construction.
//! - Keys are namespaced per tenant/tier/strategy; no key is ever shared
//!   across tenants.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::TenantCode;
use crate::core::identifiers::TierName;

// ============================================================================
// SECTION: Rate Window
// ============================================================================

/// One fixed-window counter definition.
///
/// # Invariants
/// - `capacity >= 1`; `window > 0`.
/// - The counter behind `key` is created lazily on first increment and
///   expires on its own; nothing deletes it explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateWindow {
    /// Namespaced counter key.
    pub key: String,
    /// Maximum requests admitted within one window.
    pub capacity: u32,
    /// Window duration.
    pub window: Duration,
}

impl RateWindow {
    /// Builds a validated rate window.
    ///
    /// # Errors
    ///
    /// Returns [`RateWindowError`] when capacity or window is out of range.
    pub fn new(key: impl Into<String>, capacity: u32, window: Duration) -> Result<Self, RateWindowError> {
        if capacity == 0 {
            return Err(RateWindowError::ZeroCapacity);
        }
        if window.is_zero() {
            return Err(RateWindowError::ZeroWindow);
        }
        Ok(Self {
            key: key.into(),
            capacity,
            window,
        })
    }
}

/// Invalid rate window definitions.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateWindowError {
    /// Capacity must admit at least one request.
    #[error("rate window capacity must be greater than zero")]
    ZeroCapacity,
    /// Window duration must be positive.
    #[error("rate window duration must be greater than zero")]
    ZeroWindow,
}

// ============================================================================
// SECTION: Key Namespaces
// ============================================================================

/// Builds the per-tenant tier window key (`tenant-tier:{tier}:{tenant}`).
#[must_use]
pub fn tier_window_key(tier: &TierName, tenant: &TenantCode) -> String {
    format!("tenant-tier:{tier}:{tenant}")
}

/// Builds the global window key (`{strategy}:{resolved}`).
#[must_use]
pub fn global_window_key(strategy: &str, resolved: &str) -> String {
    format!("{strategy}:{resolved}")
}

// ============================================================================
// SECTION: Rate Outcome
// ============================================================================

/// Result of consulting the fixed-window limiters for one request.
///
/// # Invariants
/// - `remaining` is zero whenever `allowed` is false.
/// - `limit` reflects the capacity of the window that produced the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateOutcome {
    /// Whether the request was admitted.
    pub allowed: bool,
    /// Capacity of the deciding window.
    pub limit: u32,
    /// Requests left in the deciding window after this one.
    pub remaining: u32,
}

impl RateOutcome {
    /// Builds an unlimited outcome for callers exempt from rate admission.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            allowed: true,
            limit: u32::MAX,
            remaining: u32::MAX,
        }
    }

    /// Builds an outcome from a post-increment count against a window.
    #[must_use]
    pub fn from_count(capacity: u32, count: i64) -> Self {
        let allowed = count >= 1 && count <= i64::from(capacity);
        let remaining = if allowed {
            u32::try_from(count).map_or(0, |used| capacity.saturating_sub(used))
        } else {
            0
        };
        Self {
            allowed,
            limit: capacity,
            remaining,
        }
    }
}
