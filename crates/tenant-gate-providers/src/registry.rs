// crates/tenant-gate-providers/src/registry.rs
// ============================================================================
// Module: Certificate Registry
// Description: Certificate registry backends for partner mTLS trust.
// Purpose: Load per-tenant trusted certificate records with bounded reads.
// Dependencies: tenant-gate-core, reqwest
// ============================================================================

//! ## Overview
//! The Certificate Registry owns the per-tenant list of trusted partner
//! certificates and their revocation flags. The registry filters to
//! non-revoked records itself; the trust evaluator re-checks the flag
//! anyway. Any failure to load records surfaces as
//! [`RegistryError::Unavailable`] and the caller treats the tenant as
//! having no trusted certificates.
//!
//! ## Invariants
//! - Reads are idempotent and safely retryable.
//! - Every HTTP call carries bounded connect and request timeouts.
//!
//! Security posture: certificate trust is a hard boundary; registry outages
//! fail closed at the evaluator.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use tenant_gate_core::TenantCode;
use tenant_gate_core::TrustedCertificateRecord;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Certificate registry interface.
#[async_trait]
pub trait CertificateRegistry: Send + Sync {
    /// Loads the tenant's trusted certificate records.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the registry cannot answer.
    async fn certificates(
        &self,
        tenant: &TenantCode,
    ) -> Result<Vec<TrustedCertificateRecord>, RegistryError>;
}

// ============================================================================
// SECTION: HTTP Backend
// ============================================================================

/// HTTP-backed certificate registry client.
///
/// # Invariants
/// - Base URL is normalized without a trailing slash.
/// - Tenant codes are restricted to URL-safe characters before any request.
pub struct HttpCertificateRegistry {
    /// Registry base URL (no trailing slash).
    base_url: String,
    /// HTTP client configured with timeouts.
    client: Client,
}

impl HttpCertificateRegistry {
    /// Builds a new HTTP registry client.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the HTTP client cannot be built.
    pub fn new(
        mut base_url: String,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, RegistryError> {
        Url::parse(&base_url)
            .map_err(|err| RegistryError::InvalidBaseUrl(err.to_string()))?;
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|err| RegistryError::Unavailable(err.to_string()))?;
        let trimmed_len = base_url.trim_end_matches('/').len();
        base_url.truncate(trimmed_len);
        Ok(Self {
            base_url,
            client,
        })
    }
}

#[async_trait]
impl CertificateRegistry for HttpCertificateRegistry {
    async fn certificates(
        &self,
        tenant: &TenantCode,
    ) -> Result<Vec<TrustedCertificateRecord>, RegistryError> {
        ensure_url_safe(tenant)?;
        let url = format!("{}/v1/tenants/{}/certificates", self.base_url, tenant);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| RegistryError::Unavailable(err.to_string()))?;
        match response.status() {
            StatusCode::OK => response
                .json::<Vec<TrustedCertificateRecord>>()
                .await
                .map_err(|err| RegistryError::Decode(err.to_string())),
            StatusCode::NOT_FOUND => Ok(Vec::new()),
            status => Err(RegistryError::Unavailable(format!("registry error: status {status}"))),
        }
    }
}

/// Rejects tenant codes that cannot be embedded in a request path.
fn ensure_url_safe(tenant: &TenantCode) -> Result<(), RegistryError> {
    let safe = tenant
        .as_str()
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'));
    if safe {
        Ok(())
    } else {
        Err(RegistryError::InvalidTenant(format!("tenant code not url-safe: {tenant}")))
    }
}

// ============================================================================
// SECTION: Static Backend
// ============================================================================

/// In-memory certificate registry for standalone deployments and tests.
///
/// # Invariants
/// - Records are snapshots; loads clone and never mutate.
#[derive(Debug, Default)]
pub struct StaticCertificateRegistry {
    /// Records keyed by normalized tenant code.
    records: BTreeMap<TenantCode, Vec<TrustedCertificateRecord>>,
}

impl StaticCertificateRegistry {
    /// Builds an empty static registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record for a tenant.
    #[must_use]
    pub fn with_record(mut self, record: TrustedCertificateRecord) -> Self {
        self.records.entry(record.tenant.clone()).or_default().push(record);
        self
    }
}

#[async_trait]
impl CertificateRegistry for StaticCertificateRegistry {
    async fn certificates(
        &self,
        tenant: &TenantCode,
    ) -> Result<Vec<TrustedCertificateRecord>, RegistryError> {
        Ok(self.records.get(tenant).cloned().unwrap_or_default())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Certificate registry failures.
///
/// # Invariants
/// - Variants are stable for error classification.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Registry base URL is malformed.
    #[error("invalid registry base url: {0}")]
    InvalidBaseUrl(String),
    /// Tenant code cannot be used for a registry lookup.
    #[error("invalid tenant: {0}")]
    InvalidTenant(String),
    /// Registry response could not be decoded.
    #[error("registry decode failed: {0}")]
    Decode(String),
    /// Registry is unreachable or returned an unexpected status.
    #[error("registry unavailable: {0}")]
    Unavailable(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
