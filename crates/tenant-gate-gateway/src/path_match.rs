// crates/tenant-gate-gateway/src/path_match.rs
// ============================================================================
// Module: Path Patterns
// Description: Segment-based path patterns for bypass and partner routes.
// Purpose: Match request paths against configured pattern lists.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Bypass lists and partner-route lists are expressed as slash-separated
//! patterns: literal segments, `*` for exactly one segment, and a trailing
//! `**` for any remaining suffix (including none). Patterns are parsed once
//! into matchers at construction; matching is allocation-free.
//!
//! ## Invariants
//! - `**` is only valid as the final segment.
//! - Matching is case-sensitive on the path as received.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Pattern
// ============================================================================

/// One segment matcher within a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SegmentMatcher {
    /// Exact segment match.
    Literal(String),
    /// Matches exactly one segment of any content.
    AnyOne,
}

/// One parsed path pattern.
///
/// # Invariants
/// - `trailing_any` corresponds to a final `**` in the source pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    /// Segment matchers in order.
    segments: Vec<SegmentMatcher>,
    /// Whether the pattern accepts any remaining suffix.
    trailing_any: bool,
}

impl PathPattern {
    /// Parses a pattern string.
    ///
    /// # Errors
    ///
    /// Returns [`PathPatternError`] for blank patterns or a misplaced `**`.
    pub fn parse(raw: &str) -> Result<Self, PathPatternError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PathPatternError::Blank);
        }
        let mut segments = Vec::new();
        let mut trailing_any = false;
        let parts: Vec<&str> = trimmed.split('/').filter(|part| !part.is_empty()).collect();
        for (index, part) in parts.iter().enumerate() {
            match *part {
                "**" => {
                    if index + 1 != parts.len() {
                        return Err(PathPatternError::MisplacedWildcard(trimmed.to_string()));
                    }
                    trailing_any = true;
                }
                "*" => segments.push(SegmentMatcher::AnyOne),
                literal => segments.push(SegmentMatcher::Literal(literal.to_string())),
            }
        }
        Ok(Self {
            segments,
            trailing_any,
        })
    }

    /// Returns true when the pattern matches the request path.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = path_segments(path).collect();
        if self.trailing_any {
            if parts.len() < self.segments.len() {
                return false;
            }
        } else if parts.len() != self.segments.len() {
            return false;
        }
        self.segments.iter().zip(parts.iter()).all(|(matcher, part)| match matcher {
            SegmentMatcher::Literal(expected) => expected == part,
            SegmentMatcher::AnyOne => true,
        })
    }
}

// ============================================================================
// SECTION: Pattern Set
// ============================================================================

/// An ordered list of path patterns.
///
/// # Invariants
/// - An empty set matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathPatternSet {
    /// Parsed patterns in configuration order.
    patterns: Vec<PathPattern>,
}

impl PathPatternSet {
    /// Parses a list of pattern strings.
    ///
    /// # Errors
    ///
    /// Returns [`PathPatternError`] for the first invalid pattern.
    pub fn parse<I, S>(raw: I) -> Result<Self, PathPatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut patterns = Vec::new();
        for entry in raw {
            patterns.push(PathPattern::parse(entry.as_ref())?);
        }
        Ok(Self {
            patterns,
        })
    }

    /// Returns true when any pattern matches the path.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(path))
    }

    /// Returns true when the set contains no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

// ============================================================================
// SECTION: Tenant Path Segment
// ============================================================================

/// Extracts the tenant candidate from a `/tenants/{id}/...` path, when one
/// is present.
#[must_use]
pub fn tenant_path_segment(path: &str) -> Option<String> {
    let mut segments = path_segments(path);
    while let Some(segment) = segments.next() {
        if segment == "tenants" {
            return segments.next().filter(|next| !next.trim().is_empty()).map(str::to_string);
        }
    }
    None
}

/// Iterates the non-empty segments of a request path.
fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Invalid path pattern definitions.
///
/// # Invariants
/// - Variants are stable for configuration error reporting.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathPatternError {
    /// Pattern is blank.
    #[error("path pattern must not be blank")]
    Blank,
    /// `**` may only appear as the final segment.
    #[error("'**' must be the final segment in pattern: {0}")]
    MisplacedWildcard(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
