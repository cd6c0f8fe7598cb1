// crates/tenant-gate-core/src/core/access.rs
// ============================================================================
// Module: Tenant Access Records
// Description: Tenant access state, cache wire form, and tier derivation.
// Purpose: Model the directory-sourced access record consumed by the engine.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`TenantAccess`] record captures what the Tenant Directory knows about a
//! tenant at a point in time: whether it is active, its lifecycle status, its
//! subscription tier, and its permission grants. Records are immutable
//! snapshots; a fresh directory fetch replaces a record rather than mutating
//! it in place.
//!
//! ## Invariants
//! - `active` and `status` are independent gates: the source does not
//!   guarantee `status ∈ {Inactive, Suspended}` implies `active == false`,
//!   so callers must check both.
//! - Cache wire form is a compact JSON object; decode failures are
//!   recoverable and trigger a directory re-fetch, never a panic.
//!
//! Security posture: access records gate tenant admission and must fail
//! closed when absent or undecodable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::TierName;

// ============================================================================
// SECTION: Tenant Status
// ============================================================================

/// Tenant lifecycle status reported by the Tenant Directory.
///
/// # Invariants
/// - Variants are stable for wire encoding and audit labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantStatus {
    /// Tenant is active.
    Active,
    /// Tenant has been deactivated.
    Inactive,
    /// Tenant is suspended (billing or policy hold).
    Suspended,
    /// Tenant state could not be determined.
    Unknown,
}

impl TenantStatus {
    /// Parses a directory status label, mapping unrecognized values to
    /// [`TenantStatus::Unknown`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => Self::Active,
            "inactive" => Self::Inactive,
            "suspended" => Self::Suspended,
            _ => Self::Unknown,
        }
    }

    /// Returns a stable label for audit events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Suspended => "suspended",
            Self::Unknown => "unknown",
        }
    }

    /// Returns true when the status alone forbids admission.
    #[must_use]
    pub const fn blocks_admission(self) -> bool {
        matches!(self, Self::Inactive | Self::Suspended)
    }
}

// ============================================================================
// SECTION: Tenant Access Record
// ============================================================================

/// Point-in-time tenant access snapshot.
///
/// # Invariants
/// - Immutable once constructed; replaced wholesale on refresh.
/// - `fetched_at_ms` is supplied by the caller; the core never reads the
///   wall clock itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantAccess {
    /// Whether the directory reports the tenant as active.
    pub active: bool,
    /// Tenant lifecycle status.
    pub status: TenantStatus,
    /// Subscription tier derived for the tenant.
    pub tier: TierName,
    /// Permission grants attached to the tenant.
    pub permissions: BTreeSet<String>,
    /// Snapshot timestamp in unix milliseconds.
    pub fetched_at_ms: i64,
}

impl TenantAccess {
    /// Builds the synthetic record used when the directory has no answer.
    ///
    /// The record is inert (`active == false`, status unknown, free tier) so
    /// the authorization step denies deterministically instead of the cache
    /// layer surfacing an infrastructure error.
    #[must_use]
    pub fn unknown(fetched_at_ms: i64) -> Self {
        Self {
            active: false,
            status: TenantStatus::Unknown,
            tier: TierName::free(),
            permissions: BTreeSet::new(),
            fetched_at_ms,
        }
    }

    /// Returns true when both admission gates pass.
    #[must_use]
    pub fn admits(&self) -> bool {
        self.active && !self.status.blocks_admission()
    }

    /// Encodes the record into its compact cache wire form.
    ///
    /// # Errors
    ///
    /// Returns [`AccessCodecError`] when serialization fails.
    pub fn encode_cached(&self) -> Result<Vec<u8>, AccessCodecError> {
        let wire = CachedAccessRecord {
            active: self.active,
            status: self.status,
            tier: self.tier.as_str().to_string(),
            permissions: self.permissions.iter().cloned().collect(),
            fetched_at_ms: self.fetched_at_ms,
        };
        serde_json::to_vec(&wire).map_err(|err| AccessCodecError::Encode(err.to_string()))
    }

    /// Decodes a record from its compact cache wire form.
    ///
    /// # Errors
    ///
    /// Returns [`AccessCodecError`] when the payload is not a valid record.
    pub fn decode_cached(bytes: &[u8]) -> Result<Self, AccessCodecError> {
        let wire: CachedAccessRecord =
            serde_json::from_slice(bytes).map_err(|err| AccessCodecError::Decode(err.to_string()))?;
        Ok(Self {
            active: wire.active,
            status: wire.status,
            tier: TierName::normalize(&wire.tier),
            permissions: wire.permissions.into_iter().collect(),
            fetched_at_ms: wire.fetched_at_ms,
        })
    }
}

/// Compact cache wire form for [`TenantAccess`].
///
/// # Invariants
/// - Field names are single letters to keep cached payloads small.
#[derive(Debug, Serialize, Deserialize)]
struct CachedAccessRecord {
    /// Active flag.
    #[serde(rename = "a")]
    active: bool,
    /// Lifecycle status.
    #[serde(rename = "s")]
    status: TenantStatus,
    /// Tier label.
    #[serde(rename = "t")]
    tier: String,
    /// Permission grants.
    #[serde(rename = "p", default)]
    permissions: Vec<String>,
    /// Snapshot timestamp in unix milliseconds.
    #[serde(rename = "f", default)]
    fetched_at_ms: i64,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Cache wire codec failures for access records.
///
/// # Invariants
/// - Decode failures are recoverable; callers re-fetch from the directory.
#[derive(Debug, Error)]
pub enum AccessCodecError {
    /// Record serialization failed.
    #[error("access record encode failed: {0}")]
    Encode(String),
    /// Cached payload could not be decoded.
    #[error("access record decode failed: {0}")]
    Decode(String),
}

// ============================================================================
// SECTION: Tier Derivation
// ============================================================================

/// Derives a tenant's tier from its enabled features and allocation keys.
///
/// Scans the feature labels first, then the resource-allocation keys, for a
/// substring of the form `tier`, an optional single `:`/`/`/`_`/`-`
/// separator, and a word. The first match wins; tenants with no tier marker
/// fall back to the free tier.
#[must_use]
pub fn derive_tier<'a, F, A>(features: F, allocation_keys: A) -> TierName
where
    F: IntoIterator<Item = &'a str>,
    A: IntoIterator<Item = &'a str>,
{
    for label in features.into_iter().chain(allocation_keys) {
        if let Some(tier) = scan_tier_marker(label) {
            return TierName::normalize(&tier);
        }
    }
    TierName::free()
}

/// Scans a single label for a `tier[:/_-]?<word>` marker.
fn scan_tier_marker(label: &str) -> Option<String> {
    let lowered = label.to_ascii_lowercase();
    let bytes = lowered.as_bytes();
    let mut search_from = 0;
    while let Some(found) = lowered.get(search_from..).and_then(|rest| rest.find("tier")) {
        let marker_end = search_from + found + "tier".len();
        let mut cursor = marker_end;
        if bytes.get(cursor).is_some_and(|byte| matches!(byte, b':' | b'/' | b'_' | b'-')) {
            cursor += 1;
        }
        let word_start = cursor;
        while bytes.get(cursor).is_some_and(|byte| byte.is_ascii_alphanumeric() || *byte == b'_') {
            cursor += 1;
        }
        if cursor > word_start {
            return lowered.get(word_start..cursor).map(str::to_string);
        }
        search_from = marker_end;
    }
    None
}
