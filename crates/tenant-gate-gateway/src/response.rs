// crates/tenant-gate-gateway/src/response.rs
// ============================================================================
// Module: Gate Responses
// Description: Response headers and structured rejection bodies.
// Purpose: Map gate outcomes onto the HTTP surface the gateway emits.
// Dependencies: axum, serde, tenant-gate-core
// ============================================================================

//! ## Overview
//! Admission outcomes surface to clients as headers plus structured JSON
//! error bodies with stable codes: `ERR_RATE_LIMITED` (429),
//! `ERR_MTLS_REQUIRED` / `ERR_MTLS_DENIED` (403), `ERR_TENANT_DENIED`
//! (403), `ERR_UNAUTHENTICATED` (401), and the query-shape codes (400).
//! Every rate-limited response carries `X-RateLimit-Limit` and
//! `X-RateLimit-Remaining`; every engine decision carries
//! `X-Tenant-Verified` unless the route bypasses verification.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::http::HeaderMap;
use axum::http::HeaderName;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use serde::Serialize;
use tenant_gate_core::ComplexityError;
use tenant_gate_core::DenyReason;
use tenant_gate_core::RateOutcome;

use crate::engine::EngineDecision;
use crate::mtls::MtlsDecision;

// ============================================================================
// SECTION: Header Names
// ============================================================================

/// Header carrying the verified tenant, `super-admin`, or `false`.
pub const TENANT_VERIFIED_HEADER: &str = "x-tenant-verified";
/// Header carrying the deciding window's capacity.
pub const RATE_LIMIT_LIMIT_HEADER: &str = "x-ratelimit-limit";
/// Header carrying the requests left in the deciding window.
pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";

// ============================================================================
// SECTION: Rejection
// ============================================================================

/// One structured gate rejection.
///
/// # Invariants
/// - `code` is stable; clients may branch on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateRejection {
    /// HTTP status for the rejection.
    pub status: StatusCode,
    /// Stable error code.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Whether a retry may succeed without changing the request.
    pub retryable: bool,
}

/// JSON body emitted for rejections.
#[derive(Debug, Serialize)]
struct RejectionBody<'a> {
    /// Stable error code.
    code: &'static str,
    /// Human-readable message.
    message: &'a str,
    /// Whether a retry may succeed without changing the request.
    retryable: bool,
}

impl GateRejection {
    /// Returns the JSON body for the rejection.
    #[must_use]
    pub fn body(&self) -> serde_json::Value {
        serde_json::to_value(RejectionBody {
            code: self.code,
            message: &self.message,
            retryable: self.retryable,
        })
        .unwrap_or_else(|_| serde_json::json!({ "code": self.code }))
    }
}

// ============================================================================
// SECTION: Builders
// ============================================================================

/// Builds the rejection for an engine deny decision.
#[must_use]
pub fn engine_rejection(reason: DenyReason) -> GateRejection {
    match reason {
        DenyReason::Unauthenticated => GateRejection {
            status: StatusCode::UNAUTHORIZED,
            code: "ERR_UNAUTHENTICATED",
            message: "authentication required".to_string(),
            retryable: false,
        },
        DenyReason::RateLimited => GateRejection {
            status: StatusCode::TOO_MANY_REQUESTS,
            code: "ERR_RATE_LIMITED",
            message: "rate limit exceeded; retry after the current window".to_string(),
            retryable: true,
        },
        reason => GateRejection {
            status: StatusCode::FORBIDDEN,
            code: "ERR_TENANT_DENIED",
            message: format!("tenant verification failed: {}", reason.as_str()),
            retryable: false,
        },
    }
}

/// Builds the rejection for a blocking mTLS decision, when one applies.
#[must_use]
pub fn mtls_rejection(decision: &MtlsDecision) -> Option<GateRejection> {
    match decision {
        MtlsDecision::NotRequired | MtlsDecision::Trusted => None,
        MtlsDecision::MissingCertificate => Some(GateRejection {
            status: StatusCode::FORBIDDEN,
            code: "ERR_MTLS_REQUIRED",
            message: "partner route requires a client certificate".to_string(),
            retryable: false,
        }),
        MtlsDecision::Denied => Some(GateRejection {
            status: StatusCode::FORBIDDEN,
            code: "ERR_MTLS_DENIED",
            message: "client certificate is not trusted for this tenant".to_string(),
            retryable: false,
        }),
    }
}

/// Builds the rejection for a query-shape violation.
#[must_use]
pub fn complexity_rejection(error: &ComplexityError) -> GateRejection {
    GateRejection {
        status: StatusCode::BAD_REQUEST,
        code: error.code(),
        message: error.to_string(),
        retryable: false,
    }
}

// ============================================================================
// SECTION: Headers
// ============================================================================

/// Builds the response headers for an engine decision.
#[must_use]
pub fn decision_headers(decision: &EngineDecision) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(value) = decision.verification.header_value() {
        insert_header(&mut headers, TENANT_VERIFIED_HEADER, value);
    }
    if let Some(rate) = &decision.rate {
        append_rate_headers(&mut headers, rate);
    }
    headers
}

/// Appends the rate-limit headers for an outcome.
pub fn append_rate_headers(headers: &mut HeaderMap, outcome: &RateOutcome) {
    insert_header(headers, RATE_LIMIT_LIMIT_HEADER, &outcome.limit.to_string());
    insert_header(headers, RATE_LIMIT_REMAINING_HEADER, &outcome.remaining.to_string());
}

/// Inserts a header, substituting `false` when the value is unencodable.
fn insert_header(headers: &mut HeaderMap, name: &'static str, value: &str) {
    let value =
        HeaderValue::from_str(value).unwrap_or_else(|_| HeaderValue::from_static("false"));
    headers.insert(HeaderName::from_static(name), value);
}

// ============================================================================
// SECTION: Tests
// ============================================================================
