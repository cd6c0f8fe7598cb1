// crates/tenant-gate-providers/src/directory.rs
// ============================================================================
// Module: Tenant Directory
// Description: Tenant directory lookup backends for the admission core.
// Purpose: Resolve tenant access state with bounded, retry-safe reads.
// Dependencies: tenant-gate-core, reqwest
// ============================================================================

//! ## Overview
//! The Tenant Directory answers one read-only question: what does the
//! platform currently know about a tenant? Lookups are idempotent and
//! safely retryable. The HTTP backend maps `200` to a record, `404` to an
//! explicit "not found", and everything else (including transport failures)
//! to [`DirectoryError::Unavailable`] so the access cache can degrade to a
//! synthesized deny instead of surfacing an exception.
//!
//! ## Invariants
//! - Lookups never mutate directory state.
//! - Every HTTP call carries bounded connect and request timeouts.
//!
//! Security posture: directory responses gate tenant admission; treat them
//! as untrusted input with explicit missing-field defaults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use tenant_gate_core::TenantCode;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Wire Schema
// ============================================================================

/// Tenant record as returned by the directory.
///
/// # Invariants
/// - Every field has an explicit missing-field default; a sparse response
///   decodes to an inert record rather than failing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryTenantRecord {
    /// Whether the tenant is active.
    #[serde(default)]
    pub active: bool,
    /// Raw lifecycle status label (mapped by the caller).
    #[serde(default)]
    pub status: String,
    /// Enabled feature labels.
    #[serde(default)]
    pub features: Vec<String>,
    /// Resource allocation entries, keyed by allocation name.
    #[serde(default)]
    pub resource_allocations: BTreeMap<String, serde_json::Value>,
    /// Permission grants.
    #[serde(default)]
    pub permissions: Vec<String>,
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Tenant directory lookup interface.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// Resolves the tenant's current directory record, when one exists.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the directory cannot answer.
    async fn lookup(&self, tenant: &TenantCode) -> Result<Option<DirectoryTenantRecord>, DirectoryError>;
}

// ============================================================================
// SECTION: HTTP Backend
// ============================================================================

/// HTTP-backed tenant directory client.
///
/// # Invariants
/// - Base URL is normalized without a trailing slash.
/// - Tenant codes are restricted to URL-safe characters before any request.
pub struct HttpTenantDirectory {
    /// Directory base URL (no trailing slash).
    base_url: String,
    /// HTTP client configured with timeouts.
    client: Client,
}

impl HttpTenantDirectory {
    /// Builds a new HTTP directory client.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the HTTP client cannot be built.
    pub fn new(
        mut base_url: String,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, DirectoryError> {
        Url::parse(&base_url)
            .map_err(|err| DirectoryError::InvalidBaseUrl(err.to_string()))?;
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|err| DirectoryError::Unavailable(err.to_string()))?;
        let trimmed_len = base_url.trim_end_matches('/').len();
        base_url.truncate(trimmed_len);
        Ok(Self {
            base_url,
            client,
        })
    }
}

#[async_trait]
impl TenantDirectory for HttpTenantDirectory {
    async fn lookup(&self, tenant: &TenantCode) -> Result<Option<DirectoryTenantRecord>, DirectoryError> {
        ensure_url_safe(tenant)?;
        let url = format!("{}/v1/tenants/{}/access", self.base_url, tenant);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| DirectoryError::Unavailable(err.to_string()))?;
        match response.status() {
            StatusCode::OK => {
                let record = response
                    .json::<DirectoryTenantRecord>()
                    .await
                    .map_err(|err| DirectoryError::Decode(err.to_string()))?;
                Ok(Some(record))
            }
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(DirectoryError::Unavailable(format!("directory error: status {status}"))),
        }
    }
}

/// Rejects tenant codes that cannot be embedded in a request path.
fn ensure_url_safe(tenant: &TenantCode) -> Result<(), DirectoryError> {
    let safe = tenant
        .as_str()
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'));
    if safe {
        Ok(())
    } else {
        Err(DirectoryError::InvalidTenant(format!("tenant code not url-safe: {tenant}")))
    }
}

// ============================================================================
// SECTION: Static Backend
// ============================================================================

/// In-memory tenant directory for standalone deployments and tests.
///
/// # Invariants
/// - Records are snapshots; lookups clone and never mutate.
#[derive(Debug, Default)]
pub struct StaticTenantDirectory {
    /// Records keyed by normalized tenant code.
    records: BTreeMap<TenantCode, DirectoryTenantRecord>,
}

impl StaticTenantDirectory {
    /// Builds an empty static directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record for a tenant.
    #[must_use]
    pub fn with_record(mut self, tenant: impl Into<TenantCode>, record: DirectoryTenantRecord) -> Self {
        self.records.insert(tenant.into(), record);
        self
    }
}

#[async_trait]
impl TenantDirectory for StaticTenantDirectory {
    async fn lookup(&self, tenant: &TenantCode) -> Result<Option<DirectoryTenantRecord>, DirectoryError> {
        Ok(self.records.get(tenant).cloned())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Tenant directory failures.
///
/// # Invariants
/// - Variants are stable for error classification.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Directory base URL is malformed.
    #[error("invalid directory base url: {0}")]
    InvalidBaseUrl(String),
    /// Tenant code cannot be used for a directory lookup.
    #[error("invalid tenant: {0}")]
    InvalidTenant(String),
    /// Directory response could not be decoded.
    #[error("directory decode failed: {0}")]
    Decode(String),
    /// Directory is unreachable or returned an unexpected status.
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
