// crates/tenant-gate-core/src/core/identifiers.rs
// ============================================================================
// Module: Tenant Gate Identifiers
// Description: Canonical opaque identifiers for tenants and subscription tiers.
// Purpose: Provide strongly typed, serializable identifiers with stable wire forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module defines the canonical identifiers used throughout the
//! admission-control core. Tenant codes arrive from untrusted request
//! surfaces (headers, paths, token claims) and are normalized at the
//! construction boundary: trimmed, lowercased, with blank input mapped to a
//! stable `"unknown"` sentinel so cache keys and counter keys never contain
//! raw whitespace variants.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Sentinel tenant code used when the raw identifier is blank.
pub const UNKNOWN_TENANT: &str = "unknown";

/// Default tier assigned when no tier can be derived for a tenant.
pub const DEFAULT_TIER: &str = "free";

// ============================================================================
// SECTION: Tenant Code
// ============================================================================

/// Normalized tenant identifier.
///
/// # Invariants
/// - Always trimmed and ASCII-lowercased, including when deserialized.
/// - Never empty; blank input normalizes to [`UNKNOWN_TENANT`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct TenantCode(String);

impl TenantCode {
    /// Normalizes a raw tenant identifier into a canonical code.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self(UNKNOWN_TENANT.to_string());
        }
        Self(trimmed.to_ascii_lowercase())
    }

    /// Returns true when the code is the blank-input sentinel.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_TENANT
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for TenantCode {
    fn from(value: &str) -> Self {
        Self::normalize(value)
    }
}

impl From<String> for TenantCode {
    fn from(value: String) -> Self {
        Self::normalize(&value)
    }
}

// ============================================================================
// SECTION: Tier Name
// ============================================================================

/// Subscription tier label for a tenant.
///
/// # Invariants
/// - Always trimmed and ASCII-lowercased, including when deserialized.
/// - Never empty; blank input normalizes to [`DEFAULT_TIER`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct TierName(String);

impl TierName {
    /// Normalizes a raw tier label.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self(DEFAULT_TIER.to_string());
        }
        Self(trimmed.to_ascii_lowercase())
    }

    /// Returns the default tier.
    #[must_use]
    pub fn free() -> Self {
        Self(DEFAULT_TIER.to_string())
    }

    /// Returns the tier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TierName {
    fn default() -> Self {
        Self::free()
    }
}

impl fmt::Display for TierName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for TierName {
    fn from(value: &str) -> Self {
        Self::normalize(value)
    }
}

impl From<String> for TierName {
    fn from(value: String) -> Self {
        Self::normalize(&value)
    }
}
