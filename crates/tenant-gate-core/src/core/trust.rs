// crates/tenant-gate-core/src/core/trust.rs
// ============================================================================
// Module: Certificate Trust Records
// Description: Trusted certificate fingerprints and validity evaluation.
// Purpose: Provide the matching rules for partner mTLS certificate trust.
// Dependencies: serde, sha2, subtle, time
// ============================================================================

//! ## Overview
//! The Certificate Registry issues [`TrustedCertificateRecord`] values per
//! tenant. A presented client certificate is trusted when at least one
//! record matches: not revoked, within its validity window (widened by the
//! configured clock skew, absent bounds meaning unbounded), and carrying the
//! same SHA-256 fingerprint of the DER encoding.
//!
//! ## Invariants
//! - Records are immutable once issued; revocation is a registry-owned flag.
//! - Fingerprints compare case-insensitively and in constant time on the
//!   normalized hex form.
//!
//! Security posture: certificate trust is a hard boundary and fails closed;
//! the registry being unreachable means no certificate is trusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use time::Duration;
use time::OffsetDateTime;

use crate::core::identifiers::TenantCode;

// ============================================================================
// SECTION: Trusted Certificate Record
// ============================================================================

/// One trusted certificate entry for a tenant.
///
/// # Invariants
/// - `fingerprint_sha256` is hex; casing is not significant.
/// - Absent validity bounds mean unbounded on that side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedCertificateRecord {
    /// Tenant the certificate is trusted for.
    pub tenant: TenantCode,
    /// SHA-256 fingerprint of the DER-encoded certificate, hex.
    pub fingerprint_sha256: String,
    /// Subject distinguished name recorded at issuance.
    pub subject_dn: String,
    /// Start of the validity window, when bounded.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub valid_from: Option<OffsetDateTime>,
    /// End of the validity window, when bounded.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub valid_to: Option<OffsetDateTime>,
    /// Whether the registry has revoked the record.
    #[serde(default)]
    pub revoked: bool,
}

impl TrustedCertificateRecord {
    /// Returns true when the record trusts the presented fingerprint at
    /// `now`, widening the validity window by `clock_skew` on both sides.
    #[must_use]
    pub fn matches(&self, presented_fingerprint: &str, now: OffsetDateTime, clock_skew: Duration) -> bool {
        if self.revoked {
            return false;
        }
        if !self.valid_at(now, clock_skew) {
            return false;
        }
        fingerprints_match(&self.fingerprint_sha256, presented_fingerprint)
    }

    /// Returns true when `now` falls within the skew-widened validity window.
    #[must_use]
    pub fn valid_at(&self, now: OffsetDateTime, clock_skew: Duration) -> bool {
        if let Some(valid_from) = self.valid_from
            && now < valid_from - clock_skew
        {
            return false;
        }
        if let Some(valid_to) = self.valid_to
            && now > valid_to + clock_skew
        {
            return false;
        }
        true
    }
}

// ============================================================================
// SECTION: Fingerprinting
// ============================================================================

/// Computes the lowercase hex SHA-256 fingerprint of DER certificate bytes.
#[must_use]
pub fn sha256_fingerprint(der: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(der);
    hex_encode(&hasher.finalize())
}

/// Compares two hex fingerprints case-insensitively in constant time.
#[must_use]
pub fn fingerprints_match(expected: &str, presented: &str) -> bool {
    let expected = expected.trim().to_ascii_lowercase();
    let presented = presented.trim().to_ascii_lowercase();
    expected.as_bytes().ct_eq(presented.as_bytes()).into()
}

/// Encodes bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}
