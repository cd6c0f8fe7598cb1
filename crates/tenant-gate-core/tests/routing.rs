// crates/tenant-gate-core/tests/routing.rs
// ============================================================================
// Module: Route Metadata Tests
// Description: Unit tests for consumed route variant and split metadata.
// Purpose: Validate wire forms and active-slot resolution.
// Dependencies: tenant-gate-core, serde_json
// ============================================================================

//! ## Overview
//! The admission core consumes route metadata produced by the routing
//! layer; these tests pin the wire forms and the active-slot accessor.

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

use tenant_gate_core::RouteVariant;
use tenant_gate_core::SplitSlot;
use tenant_gate_core::TrafficSplit;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn variant_decodes_from_routing_layer_payload() {
    let variant: RouteVariant = serde_json::from_str(
        r#"{"variant_id":"canary","percentage":10,"service_uri":"http://catalog-canary:8080"}"#,
    )
    .expect("decode variant");
    assert_eq!(variant.variant_id, "canary");
    assert_eq!(variant.percentage, 10);
}

#[test]
fn split_resolves_the_active_slot() {
    let split: TrafficSplit = serde_json::from_str(
        r#"{"active_slot":"green","blue_uri":"http://svc-blue","green_uri":"http://svc-green"}"#,
    )
    .expect("decode split");
    assert_eq!(split.active_slot, SplitSlot::Green);
    assert_eq!(split.active_uri(), "http://svc-green");

    let flipped = TrafficSplit {
        active_slot: SplitSlot::Blue,
        ..split
    };
    assert_eq!(flipped.active_uri(), "http://svc-blue");
}
