// crates/tenant-gate-core/src/core/mod.rs
// ============================================================================
// Module: Tenant Gate Core Model
// Description: Domain model for the admission-control core.
// Purpose: Group identifiers, records, and pure analysis under one namespace.
// Dependencies: crate submodules
// ============================================================================

//! ## Overview
//! The core model is pure data plus pure computation: identifiers, access
//! records, rate windows, certificate trust records, route metadata, query
//! complexity analysis, and decision types. Nothing in this tree performs
//! I/O or reads the wall clock.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod access;
pub mod complexity;
pub mod decision;
pub mod identifiers;
pub mod rate;
pub mod routing;
pub mod trust;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use access::AccessCodecError;
pub use access::TenantAccess;
pub use access::TenantStatus;
pub use access::derive_tier;
pub use complexity::ComplexityError;
pub use complexity::ComplexityLimits;
pub use complexity::QueryComplexityAnalysis;
pub use complexity::analyze;
pub use complexity::analyze_within_limits;
pub use decision::DenyReason;
pub use decision::GateDecision;
pub use decision::TenantVerification;
pub use identifiers::DEFAULT_TIER;
pub use identifiers::TenantCode;
pub use identifiers::TierName;
pub use identifiers::UNKNOWN_TENANT;
pub use rate::RateOutcome;
pub use rate::RateWindow;
pub use rate::RateWindowError;
pub use rate::global_window_key;
pub use rate::tier_window_key;
pub use routing::RouteVariant;
pub use routing::SplitSlot;
pub use routing::TrafficSplit;
pub use trust::TrustedCertificateRecord;
pub use trust::fingerprints_match;
pub use trust::sha256_fingerprint;
