// crates/tenant-gate-core/tests/rate.rs
// ============================================================================
// Module: Rate Window Tests
// Description: Unit tests for window validation, keys, and outcomes.
// Purpose: Validate fixed-window descriptors and count accounting.
// Dependencies: tenant-gate-core
// ============================================================================

//! ## Overview
//! Exercises rate window construction invariants, counter key namespacing,
//! and the post-increment outcome arithmetic that backs the rate headers.

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

use std::time::Duration;

use tenant_gate_core::RateOutcome;
use tenant_gate_core::RateWindow;
use tenant_gate_core::RateWindowError;
use tenant_gate_core::TenantCode;
use tenant_gate_core::TierName;
use tenant_gate_core::global_window_key;
use tenant_gate_core::tier_window_key;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn window_requires_positive_capacity_and_duration() {
    let err = RateWindow::new("k", 0, Duration::from_secs(60)).expect_err("zero capacity");
    assert_eq!(err, RateWindowError::ZeroCapacity);

    let err = RateWindow::new("k", 10, Duration::ZERO).expect_err("zero window");
    assert_eq!(err, RateWindowError::ZeroWindow);

    let window = RateWindow::new("k", 1, Duration::from_secs(1)).expect("minimal window");
    assert_eq!(window.capacity, 1);
}

#[test]
fn keys_are_namespaced_per_tenant_and_strategy() {
    let tier = TierName::normalize("Gold");
    let tenant = TenantCode::normalize(" Acme ");
    assert_eq!(tier_window_key(&tier, &tenant), "tenant-tier:gold:acme");
    assert_eq!(global_window_key("ip", "10.1.2.3"), "ip:10.1.2.3");
}

#[test]
fn outcome_tracks_remaining_until_capacity() {
    let first = RateOutcome::from_count(3, 1);
    assert!(first.allowed);
    assert_eq!(first.remaining, 2);

    let at_capacity = RateOutcome::from_count(3, 3);
    assert!(at_capacity.allowed);
    assert_eq!(at_capacity.remaining, 0);

    let over = RateOutcome::from_count(3, 4);
    assert!(!over.allowed);
    assert_eq!(over.remaining, 0);
    assert_eq!(over.limit, 3);
}

#[test]
fn unlimited_outcome_always_allows() {
    let outcome = RateOutcome::unlimited();
    assert!(outcome.allowed);
    assert_eq!(outcome.remaining, u32::MAX);
}
