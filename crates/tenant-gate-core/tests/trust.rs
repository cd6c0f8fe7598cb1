// crates/tenant-gate-core/tests/trust.rs
// ============================================================================
// Module: Certificate Trust Tests
// Description: Unit tests for fingerprinting and validity evaluation.
// Purpose: Validate skew-widened windows and case-insensitive matching.
// Dependencies: tenant-gate-core, time
// ============================================================================

//! ## Overview
//! Exercises the trusted-certificate matching rules: revocation, skewed
//! validity boundaries (inclusive on both edges), unbounded windows, and
//! constant-time case-insensitive fingerprint comparison.

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

use tenant_gate_core::TenantCode;
use tenant_gate_core::TrustedCertificateRecord;
use tenant_gate_core::fingerprints_match;
use tenant_gate_core::sha256_fingerprint;
use time::Duration;
use time::OffsetDateTime;
use time::macros::datetime;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

const NOW: OffsetDateTime = datetime!(2026-06-01 12:00:00 UTC);
const SKEW: Duration = Duration::seconds(30);

fn record(valid_from: Option<OffsetDateTime>, valid_to: Option<OffsetDateTime>) -> TrustedCertificateRecord {
    TrustedCertificateRecord {
        tenant: TenantCode::normalize("acme"),
        fingerprint_sha256: sha256_fingerprint(b"partner-cert-der"),
        subject_dn: "CN=partner.acme.example".to_string(),
        valid_from,
        valid_to,
        revoked: false,
    }
}

// ============================================================================
// SECTION: Fingerprint Tests
// ============================================================================

#[test]
fn fingerprint_is_lowercase_hex_of_der_digest() {
    let fingerprint = sha256_fingerprint(b"partner-cert-der");
    assert_eq!(fingerprint.len(), 64);
    assert!(fingerprint.chars().all(|ch| ch.is_ascii_hexdigit() && !ch.is_ascii_uppercase()));
}

#[test]
fn fingerprints_compare_case_insensitively() {
    let fingerprint = sha256_fingerprint(b"partner-cert-der");
    assert!(fingerprints_match(&fingerprint.to_ascii_uppercase(), &fingerprint));
    assert!(!fingerprints_match(&fingerprint, &sha256_fingerprint(b"other")));
}

// ============================================================================
// SECTION: Validity Tests
// ============================================================================

#[test]
fn expiry_boundary_is_inclusive_of_skew() {
    let fingerprint = sha256_fingerprint(b"partner-cert-der");

    // valid_to exactly `now - skew` is still accepted.
    let at_boundary = record(None, Some(NOW - SKEW));
    assert!(at_boundary.matches(&fingerprint, NOW, SKEW));

    // One second past the skewed boundary is rejected.
    let past_boundary = record(None, Some(NOW - SKEW - Duration::seconds(1)));
    assert!(!past_boundary.matches(&fingerprint, NOW, SKEW));
}

#[test]
fn not_yet_valid_is_rejected_beyond_skew() {
    let fingerprint = sha256_fingerprint(b"partner-cert-der");

    let at_boundary = record(Some(NOW + SKEW), None);
    assert!(at_boundary.matches(&fingerprint, NOW, SKEW));

    let before_window = record(Some(NOW + SKEW + Duration::seconds(1)), None);
    assert!(!before_window.matches(&fingerprint, NOW, SKEW));
}

#[test]
fn unbounded_record_matches_any_time() {
    let fingerprint = sha256_fingerprint(b"partner-cert-der");
    let unbounded = record(None, None);
    assert!(unbounded.matches(&fingerprint, NOW, Duration::ZERO));
    assert!(unbounded.matches(&fingerprint, NOW + Duration::days(3650), Duration::ZERO));
}

#[test]
fn revoked_record_never_matches() {
    let fingerprint = sha256_fingerprint(b"partner-cert-der");
    let mut revoked = record(None, None);
    revoked.revoked = true;
    assert!(!revoked.matches(&fingerprint, NOW, SKEW));
}
