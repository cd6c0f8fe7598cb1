// crates/tenant-gate-core/tests/access.rs
// ============================================================================
// Module: Tenant Access Tests
// Description: Unit tests for access records, the cache codec, and tiers.
// Purpose: Validate round-trips, decode failures, and tier derivation.
// Dependencies: tenant-gate-core
// ============================================================================

//! ## Overview
//! Exercises the tenant access record codec (field-for-field round trip,
//! corrupted payload handling), the admission predicate over the
//! active/status pair, and the tier marker scan.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use tenant_gate_core::TenantAccess;
use tenant_gate_core::TenantCode;
use tenant_gate_core::TenantStatus;
use tenant_gate_core::TierName;
use tenant_gate_core::derive_tier;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

fn sample_access() -> TenantAccess {
    TenantAccess {
        active: true,
        status: TenantStatus::Active,
        tier: TierName::normalize("gold"),
        permissions: BTreeSet::from(["catalog:read".to_string(), "billing:read".to_string()]),
        fetched_at_ms: 1_717_000_000_000,
    }
}

// ============================================================================
// SECTION: Codec Tests
// ============================================================================

#[test]
fn cache_round_trip_preserves_every_field() {
    let record = sample_access();
    let bytes = record.encode_cached().expect("encode");
    let decoded = TenantAccess::decode_cached(&bytes).expect("decode");
    assert_eq!(decoded, record);
}

#[test]
fn corrupted_payload_fails_decode_without_panicking() {
    let err = TenantAccess::decode_cached(b"{not json").expect_err("corrupted payload");
    assert!(err.to_string().contains("decode failed"));
}

#[test]
fn missing_optional_fields_default_on_decode() {
    let decoded =
        TenantAccess::decode_cached(br#"{"a":false,"s":"suspended","t":"free"}"#).expect("decode");
    assert!(!decoded.active);
    assert_eq!(decoded.status, TenantStatus::Suspended);
    assert!(decoded.permissions.is_empty());
    assert_eq!(decoded.fetched_at_ms, 0);
}

// ============================================================================
// SECTION: Admission Predicate Tests
// ============================================================================

#[test]
fn active_flag_and_status_gate_independently() {
    let mut record = sample_access();
    assert!(record.admits());

    record.active = false;
    assert!(!record.admits());

    // The source does not guarantee the flags agree; an active flag with a
    // suspended status must still deny.
    record.active = true;
    record.status = TenantStatus::Suspended;
    assert!(!record.admits());

    record.status = TenantStatus::Inactive;
    assert!(!record.admits());
}

#[test]
fn unknown_record_is_inert() {
    let record = TenantAccess::unknown(42);
    assert!(!record.admits());
    assert_eq!(record.status, TenantStatus::Unknown);
    assert_eq!(record.tier, TierName::free());
    assert_eq!(record.fetched_at_ms, 42);
}

#[test]
fn status_parse_maps_unrecognized_to_unknown() {
    assert_eq!(TenantStatus::parse("ACTIVE"), TenantStatus::Active);
    assert_eq!(TenantStatus::parse(" suspended "), TenantStatus::Suspended);
    assert_eq!(TenantStatus::parse("archived"), TenantStatus::Unknown);
}

// ============================================================================
// SECTION: Tier Derivation Tests
// ============================================================================

#[test]
fn tier_marker_in_features_wins() {
    let tier = derive_tier(["analytics", "tier:gold"], ["quota-tier-silver"]);
    assert_eq!(tier.as_str(), "gold");
}

#[test]
fn allocation_keys_are_scanned_after_features() {
    let tier = derive_tier(["analytics", "exports"], ["rate_tier_premium"]);
    assert_eq!(tier.as_str(), "premium");
}

#[test]
fn separator_is_optional() {
    let tier = derive_tier(["tiergold"], []);
    assert_eq!(tier.as_str(), "gold");
}

#[test]
fn no_marker_defaults_to_free() {
    let tier = derive_tier(["analytics"], ["cpu", "memory"]);
    assert_eq!(tier, TierName::free());
}

#[test]
fn marker_without_word_is_skipped() {
    let tier = derive_tier(["premium_tier", "tier-silver"], []);
    assert_eq!(tier.as_str(), "silver");
}

// ============================================================================
// SECTION: Identifier Tests
// ============================================================================

#[test]
fn tenant_code_normalizes_case_and_whitespace() {
    assert_eq!(TenantCode::normalize("  AcMe "), TenantCode::normalize("acme"));
    assert_eq!(TenantCode::normalize("   ").as_str(), "unknown");
    assert!(TenantCode::normalize("").is_unknown());
}
