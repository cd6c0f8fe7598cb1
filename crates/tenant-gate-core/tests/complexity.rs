// crates/tenant-gate-core/tests/complexity.rs
// ============================================================================
// Module: Query Complexity Tests
// Description: Unit tests for the structural query analyzer.
// Purpose: Validate depth, breadth, and complexity accounting plus limits.
// Dependencies: tenant-gate-core
// ============================================================================

//! ## Overview
//! Exercises the single-pass analyzer against nested, commented, and quoted
//! query shapes, and verifies that each limit rejects independently with a
//! message naming the configured value.

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

use tenant_gate_core::ComplexityError;
use tenant_gate_core::ComplexityLimits;
use tenant_gate_core::analyze;
use tenant_gate_core::analyze_within_limits;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

fn permissive_limits() -> ComplexityLimits {
    ComplexityLimits {
        max_depth: 32,
        max_breadth: 64,
        max_complexity: 512,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn nested_query_counts_depth_and_levels() {
    let analysis = analyze("{a{b{c}} d}");
    assert_eq!(analysis.depth, 3);
    // Level 1 holds `a` and `d`; deeper levels hold one identifier each.
    assert_eq!(analysis.breadth, 2);
    assert_eq!(analysis.complexity, 4);
}

#[test]
fn reserved_words_do_not_count() {
    let analysis = analyze("query Fetch {user}");
    assert_eq!(analysis.depth, 1);
    // `Fetch` counts at the floored level 1 alongside `user`.
    assert_eq!(analysis.complexity, 2);
    assert_eq!(analysis.breadth, 2);
}

#[test]
fn identifiers_before_first_brace_count_at_level_one() {
    let analysis = analyze("alpha beta {gamma}");
    assert_eq!(analysis.depth, 1);
    assert_eq!(analysis.complexity, 3);
    assert_eq!(analysis.breadth, 3);
}

#[test]
fn quoted_strings_are_skipped() {
    let analysis = analyze(r#"{items(filter: "{not \" a { brace}") {id}}"#);
    assert_eq!(analysis.depth, 2);
    assert_eq!(analysis.complexity, 3);
}

#[test]
fn line_comments_are_skipped() {
    let analysis = analyze("{a # {deep{deep{deep\n b}");
    assert_eq!(analysis.depth, 1);
    assert_eq!(analysis.complexity, 2);
    assert_eq!(analysis.breadth, 2);
}

#[test]
fn unbalanced_closing_braces_do_not_underflow() {
    let analysis = analyze("}}} {a}");
    assert_eq!(analysis.depth, 1);
    assert_eq!(analysis.complexity, 1);
}

#[test]
fn empty_query_is_zero() {
    let analysis = analyze("");
    assert_eq!(analysis.depth, 0);
    assert_eq!(analysis.breadth, 0);
    assert_eq!(analysis.complexity, 0);
}

#[test]
fn depth_limit_rejects_with_configured_value() {
    let limits = ComplexityLimits {
        max_depth: 2,
        ..permissive_limits()
    };
    let err = analyze_within_limits("{a{b{c}}}", &limits).expect_err("depth over limit");
    assert!(matches!(err, ComplexityError::DepthExceeded { observed: 3, limit: 2 }));
    assert!(err.to_string().contains('2'));
    assert_eq!(err.code(), "ERR_QUERY_DEPTH");
}

#[test]
fn breadth_limit_rejects_independently() {
    let limits = ComplexityLimits {
        max_breadth: 2,
        ..permissive_limits()
    };
    let err = analyze_within_limits("{a b c}", &limits).expect_err("breadth over limit");
    assert!(matches!(err, ComplexityError::BreadthExceeded { observed: 3, limit: 2 }));
    assert_eq!(err.code(), "ERR_QUERY_BREADTH");
}

#[test]
fn complexity_limit_rejects_independently() {
    let limits = ComplexityLimits {
        max_complexity: 3,
        ..permissive_limits()
    };
    let err = analyze_within_limits("{a{b} c{d}}", &limits).expect_err("complexity over limit");
    assert!(matches!(err, ComplexityError::ComplexityExceeded { observed: 4, limit: 3 }));
    assert_eq!(err.code(), "ERR_QUERY_COMPLEXITY");
}

#[test]
fn within_limits_returns_analysis() {
    let analysis = analyze_within_limits("{a{b}}", &permissive_limits()).expect("within limits");
    assert_eq!(analysis.depth, 2);
    assert_eq!(analysis.complexity, 2);
}
