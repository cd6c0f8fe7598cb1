// crates/tenant-gate-core/src/core/complexity.rs
// ============================================================================
// Module: Query Complexity Analysis
// Description: Structural analysis of GraphQL query text.
// Purpose: Measure depth, breadth, and field count before forwarding downstream.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A single-pass character scan measures the structural cost of a GraphQL
//! query without parsing it: brace nesting gives depth, identifier tokens
//! give complexity, and the widest single nesting level gives breadth.
//! Quoted strings (with backslash escapes) and `#` line comments are
//! skipped, so braces and words inside them never count.
//!
//! ## Invariants
//! - The analysis is pure: no allocation outlives the call, no external
//!   state is consulted.
//! - Reserved GraphQL words never count toward complexity or breadth.
//! - Identifiers before the first brace count at level 1.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Reserved words excluded from complexity counting.
const RESERVED_WORDS: &[&str] =
    &["query", "mutation", "subscription", "fragment", "on", "true", "false", "null"];

// ============================================================================
// SECTION: Analysis Result
// ============================================================================

/// Structural metrics for one query.
///
/// # Invariants
/// - `breadth` is the maximum single-level identifier count, not a sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryComplexityAnalysis {
    /// Maximum brace nesting depth observed.
    pub depth: u32,
    /// Widest identifier count at any single nesting level.
    pub breadth: u32,
    /// Total non-reserved identifier count.
    pub complexity: u32,
}

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Structural limits enforced on inbound queries.
///
/// # Invariants
/// - Each limit is enforced independently; any single violation rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityLimits {
    /// Maximum allowed nesting depth.
    pub max_depth: u32,
    /// Maximum allowed single-level breadth.
    pub max_breadth: u32,
    /// Maximum allowed total complexity.
    pub max_complexity: u32,
}

/// Query-shape violations.
///
/// # Invariants
/// - Each variant names the exceeded metric and the configured limit.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComplexityError {
    /// Nesting depth exceeded the configured maximum.
    #[error("query depth {observed} exceeds the maximum allowed depth {limit}")]
    DepthExceeded {
        /// Observed nesting depth.
        observed: u32,
        /// Configured depth limit.
        limit: u32,
    },
    /// Single-level breadth exceeded the configured maximum.
    #[error("query breadth {observed} exceeds the maximum allowed breadth {limit}")]
    BreadthExceeded {
        /// Observed breadth.
        observed: u32,
        /// Configured breadth limit.
        limit: u32,
    },
    /// Total complexity exceeded the configured maximum.
    #[error("query complexity {observed} exceeds the maximum allowed complexity {limit}")]
    ComplexityExceeded {
        /// Observed complexity.
        observed: u32,
        /// Configured complexity limit.
        limit: u32,
    },
}

impl ComplexityError {
    /// Returns the stable error code for the exceeded metric.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::DepthExceeded { .. } => "ERR_QUERY_DEPTH",
            Self::BreadthExceeded { .. } => "ERR_QUERY_BREADTH",
            Self::ComplexityExceeded { .. } => "ERR_QUERY_COMPLEXITY",
        }
    }
}

// ============================================================================
// SECTION: Analysis
// ============================================================================

/// Analyzes the structural cost of a query in a single pass.
#[must_use]
pub fn analyze(query: &str) -> QueryComplexityAnalysis {
    let mut scanner = Scanner::default();
    for ch in query.chars() {
        scanner.step(ch);
    }
    scanner.finish()
}

/// Analyzes a query and enforces the configured limits.
///
/// # Errors
///
/// Returns [`ComplexityError`] naming the first exceeded metric, checking
/// depth, then breadth, then complexity.
pub fn analyze_within_limits(
    query: &str,
    limits: &ComplexityLimits,
) -> Result<QueryComplexityAnalysis, ComplexityError> {
    let analysis = analyze(query);
    if analysis.depth > limits.max_depth {
        return Err(ComplexityError::DepthExceeded {
            observed: analysis.depth,
            limit: limits.max_depth,
        });
    }
    if analysis.breadth > limits.max_breadth {
        return Err(ComplexityError::BreadthExceeded {
            observed: analysis.breadth,
            limit: limits.max_breadth,
        });
    }
    if analysis.complexity > limits.max_complexity {
        return Err(ComplexityError::ComplexityExceeded {
            observed: analysis.complexity,
            limit: limits.max_complexity,
        });
    }
    Ok(analysis)
}

// ============================================================================
// SECTION: Scanner
// ============================================================================

/// Single-pass scan state.
///
/// # Invariants
/// - `depth` tracks the current brace nesting; `max_depth` the maximum seen.
/// - `word` accumulates the identifier token currently being read.
#[derive(Default)]
struct Scanner {
    /// Current brace nesting level.
    depth: u32,
    /// Maximum nesting level observed.
    max_depth: u32,
    /// Identifier counts per nesting level (level floored at 1).
    level_counts: BTreeMap<u32, u32>,
    /// Total non-reserved identifier count.
    complexity: u32,
    /// Identifier token currently being accumulated.
    word: String,
    /// Inside a quoted string.
    in_string: bool,
    /// Previous character was a backslash inside a string.
    escaped: bool,
    /// Inside a `#` line comment.
    in_comment: bool,
}

impl Scanner {
    /// Consumes one character of query text.
    fn step(&mut self, ch: char) {
        if self.in_comment {
            if ch == '\n' {
                self.in_comment = false;
            }
            return;
        }
        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if ch == '\\' {
                self.escaped = true;
            } else if ch == '"' {
                self.in_string = false;
            }
            return;
        }
        match ch {
            '"' => {
                self.flush_word();
                self.in_string = true;
            }
            '#' => {
                self.flush_word();
                self.in_comment = true;
            }
            '{' => {
                self.flush_word();
                self.depth += 1;
                self.max_depth = self.max_depth.max(self.depth);
            }
            '}' => {
                self.flush_word();
                self.depth = self.depth.saturating_sub(1);
            }
            _ if ch.is_ascii_alphabetic() || ch == '_' => {
                self.word.push(ch);
            }
            _ if ch.is_ascii_digit() && !self.word.is_empty() => {
                self.word.push(ch);
            }
            _ => {
                self.flush_word();
            }
        }
    }

    /// Completes the current identifier token, if any.
    fn flush_word(&mut self) {
        if self.word.is_empty() {
            return;
        }
        let reserved = RESERVED_WORDS.contains(&self.word.as_str());
        if !reserved {
            self.complexity += 1;
            let level = self.depth.max(1);
            *self.level_counts.entry(level).or_insert(0) += 1;
        }
        self.word.clear();
    }

    /// Finishes the scan and produces the analysis.
    fn finish(mut self) -> QueryComplexityAnalysis {
        self.flush_word();
        let breadth = self.level_counts.values().copied().max().unwrap_or(0);
        QueryComplexityAnalysis {
            depth: self.max_depth,
            breadth,
            complexity: self.complexity,
        }
    }
}
