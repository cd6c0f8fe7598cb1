// crates/tenant-gate-config/src/config.rs
// ============================================================================
// Module: Admission Configuration
// Description: Configuration schema and validation for the admission core.
// Purpose: Provide strict, fail-closed settings with hard limits.
// Dependencies: tenant-gate-core, serde
// ============================================================================

//! ## Overview
//! The configuration tree mirrors the admission gates: engine settings
//! (bypass patterns, tenant header, claim names, operator authorities),
//! per-tier fixed windows, the global limiter, partner mTLS settings,
//! complexity limits, and the directory/registry endpoints. Every section
//! validates against hard bounds; out-of-range values are rejected rather
//! than clamped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use tenant_gate_core::ComplexityLimits;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum number of bypass path patterns.
pub(crate) const MAX_BYPASS_PATTERNS: usize = 128;
/// Maximum number of partner-route path patterns.
pub(crate) const MAX_PARTNER_PATTERNS: usize = 128;
/// Maximum number of JWT tenant-claim names.
pub(crate) const MAX_CLAIM_NAMES: usize = 16;
/// Maximum number of super-admin authority strings.
pub(crate) const MAX_SUPER_ADMIN_AUTHORITIES: usize = 32;
/// Maximum number of configured tiers.
pub(crate) const MAX_TIERS: usize = 64;
/// Maximum requests per tier or global window.
pub(crate) const MAX_WINDOW_CAPACITY: u32 = 1_000_000;
/// Minimum fixed-window duration in seconds.
pub(crate) const MIN_WINDOW_SECS: u64 = 1;
/// Maximum fixed-window duration in seconds.
pub(crate) const MAX_WINDOW_SECS: u64 = 86_400;
/// Maximum refill rate per minute for the global limiter.
pub(crate) const MAX_REFILL_PER_MINUTE: u32 = 1_000_000;
/// Minimum external-call connect timeout in milliseconds.
pub(crate) const MIN_CONNECT_TIMEOUT_MS: u64 = 100;
/// Maximum external-call connect timeout in milliseconds.
pub(crate) const MAX_CONNECT_TIMEOUT_MS: u64 = 10_000;
/// Minimum external-call request timeout in milliseconds.
pub(crate) const MIN_REQUEST_TIMEOUT_MS: u64 = 500;
/// Maximum external-call request timeout in milliseconds.
pub(crate) const MAX_REQUEST_TIMEOUT_MS: u64 = 30_000;
/// Minimum cache TTL in seconds.
pub(crate) const MIN_CACHE_TTL_SECS: u64 = 1;
/// Maximum cache TTL in seconds.
pub(crate) const MAX_CACHE_TTL_SECS: u64 = 3_600;
/// Maximum clock skew in seconds for certificate validity windows.
pub(crate) const MAX_CLOCK_SKEW_SECS: u64 = 300;
/// Maximum in-process certificate cache entries.
pub(crate) const MAX_CERT_CACHE_ENTRIES: usize = 65_536;
/// Maximum configured query depth.
pub(crate) const MAX_QUERY_DEPTH: u32 = 256;
/// Maximum configured query breadth.
pub(crate) const MAX_QUERY_BREADTH: u32 = 4_096;
/// Maximum configured query complexity.
pub(crate) const MAX_QUERY_COMPLEXITY: u32 = 65_536;

// ============================================================================
// SECTION: Root Configuration
// ============================================================================

/// Resolved configuration for the admission-control core.
///
/// # Invariants
/// - `validate` must pass before any gate consumes the configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdmissionConfig {
    /// Decision engine settings.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Per-tier fixed-window limits, keyed by tier name.
    #[serde(default)]
    pub tiers: BTreeMap<String, TierLimitConfig>,
    /// Optional global limiter applied across all tiers.
    #[serde(default)]
    pub global_limit: Option<GlobalLimitConfig>,
    /// Partner-route mTLS settings.
    #[serde(default)]
    pub mtls: MtlsConfig,
    /// Query complexity limits.
    #[serde(default)]
    pub complexity: ComplexityConfig,
    /// Tenant directory endpoint settings.
    #[serde(default)]
    pub directory: DirectoryConfig,
    /// Certificate registry endpoint settings.
    #[serde(default)]
    pub registry: RegistryConfig,
}

impl AdmissionConfig {
    /// Validates every configuration section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        if self.tiers.len() > MAX_TIERS {
            return Err(ConfigError::Invalid(format!("at most {MAX_TIERS} tiers are supported")));
        }
        for (tier, limit) in &self.tiers {
            if tier.trim().is_empty() {
                return Err(ConfigError::Invalid("tier names must not be blank".to_string()));
            }
            limit.validate(tier)?;
        }
        if let Some(global) = &self.global_limit {
            global.validate()?;
        }
        self.mtls.validate()?;
        self.complexity.validate()?;
        self.directory.validate()?;
        self.registry.validate()?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Engine Settings
// ============================================================================

/// Decision engine settings.
///
/// # Invariants
/// - `tenant_header` is never blank.
/// - `jwt_claim_names` are consulted in declaration order.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Path patterns exempt from tenant verification entirely.
    #[serde(default = "default_bypass_patterns")]
    pub bypass_patterns: Vec<String>,
    /// Request header carrying the tenant code.
    #[serde(default = "default_tenant_header")]
    pub tenant_header: String,
    /// Ordered JWT claim names consulted for the tenant candidate.
    #[serde(default = "default_jwt_claim_names")]
    pub jwt_claim_names: Vec<String>,
    /// Authority strings granting super-admin status (exact match).
    #[serde(default = "default_super_admin_authorities")]
    pub super_admin_authorities: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bypass_patterns: default_bypass_patterns(),
            tenant_header: default_tenant_header(),
            jwt_claim_names: default_jwt_claim_names(),
            super_admin_authorities: default_super_admin_authorities(),
        }
    }
}

impl EngineConfig {
    /// Validates engine settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.tenant_header.trim().is_empty() {
            return Err(ConfigError::Invalid("engine.tenant_header must not be blank".to_string()));
        }
        if self.bypass_patterns.len() > MAX_BYPASS_PATTERNS {
            return Err(ConfigError::Invalid(format!(
                "engine.bypass_patterns supports at most {MAX_BYPASS_PATTERNS} entries"
            )));
        }
        if self.jwt_claim_names.len() > MAX_CLAIM_NAMES {
            return Err(ConfigError::Invalid(format!(
                "engine.jwt_claim_names supports at most {MAX_CLAIM_NAMES} entries"
            )));
        }
        if self.jwt_claim_names.iter().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "engine.jwt_claim_names must not contain blank entries".to_string(),
            ));
        }
        if self.super_admin_authorities.len() > MAX_SUPER_ADMIN_AUTHORITIES {
            return Err(ConfigError::Invalid(format!(
                "engine.super_admin_authorities supports at most {MAX_SUPER_ADMIN_AUTHORITIES} entries"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Tier Limits
// ============================================================================

/// Fixed-window limit for one tier.
///
/// # Invariants
/// - `capacity >= 1`; `window_secs` within the supported range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TierLimitConfig {
    /// Maximum requests admitted per window.
    pub capacity: u32,
    /// Window duration in seconds.
    pub window_secs: u64,
}

impl TierLimitConfig {
    /// Validates the tier limit against hard bounds.
    fn validate(&self, tier: &str) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::Invalid(format!(
                "tiers.{tier}.capacity must be greater than zero"
            )));
        }
        if self.capacity > MAX_WINDOW_CAPACITY {
            return Err(ConfigError::Invalid(format!("tiers.{tier}.capacity too large")));
        }
        if self.window_secs < MIN_WINDOW_SECS || self.window_secs > MAX_WINDOW_SECS {
            return Err(ConfigError::Invalid(format!(
                "tiers.{tier}.window_secs must be between {MIN_WINDOW_SECS} and {MAX_WINDOW_SECS}"
            )));
        }
        Ok(())
    }

    /// Returns the window duration.
    #[must_use]
    pub const fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

// ============================================================================
// SECTION: Global Limiter
// ============================================================================

/// Key strategy for the global limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GlobalLimitStrategy {
    /// Key the global window by tenant code.
    #[default]
    Tenant,
    /// Key the global window by peer IP address.
    Ip,
    /// Key the global window by authenticated principal subject.
    User,
}

impl GlobalLimitStrategy {
    /// Returns the stable key-namespace label for the strategy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tenant => "tenant",
            Self::Ip => "ip",
            Self::User => "user",
        }
    }
}

/// Global fixed-window limiter settings.
///
/// # Invariants
/// - The window duration is derived from capacity and refill rate:
///   `ceil(capacity * 60 / refill_per_minute)` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct GlobalLimitConfig {
    /// Key strategy for the window.
    #[serde(default)]
    pub strategy: GlobalLimitStrategy,
    /// Maximum requests admitted per window.
    pub capacity: u32,
    /// Equivalent refill rate per minute used to derive the window length.
    pub refill_per_minute: u32,
}

impl GlobalLimitConfig {
    /// Validates the global limiter settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::Invalid(
                "global_limit.capacity must be greater than zero".to_string(),
            ));
        }
        if self.capacity > MAX_WINDOW_CAPACITY {
            return Err(ConfigError::Invalid("global_limit.capacity too large".to_string()));
        }
        if self.refill_per_minute == 0 {
            return Err(ConfigError::Invalid(
                "global_limit.refill_per_minute must be greater than zero".to_string(),
            ));
        }
        if self.refill_per_minute > MAX_REFILL_PER_MINUTE {
            return Err(ConfigError::Invalid("global_limit.refill_per_minute too large".to_string()));
        }
        if self.window_secs() > MAX_WINDOW_SECS {
            return Err(ConfigError::Invalid(
                "global_limit derived window exceeds the maximum window length".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the derived window length in seconds.
    #[must_use]
    pub const fn window_secs(&self) -> u64 {
        let total = self.capacity as u64 * 60;
        total.div_ceil(self.refill_per_minute as u64)
    }

    /// Returns the derived window duration.
    #[must_use]
    pub const fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs())
    }
}

// ============================================================================
// SECTION: Partner mTLS
// ============================================================================

/// Partner-route mTLS settings.
///
/// # Invariants
/// - The certificate cache TTL is independent of record validity windows.
#[derive(Debug, Clone, Deserialize)]
pub struct MtlsConfig {
    /// Path patterns protected by partner mTLS.
    #[serde(default)]
    pub partner_route_patterns: Vec<String>,
    /// Per-tenant certificate cache TTL in seconds.
    #[serde(default = "default_cert_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Clock skew tolerance in seconds for validity windows.
    #[serde(default = "default_clock_skew_secs")]
    pub clock_skew_secs: u64,
    /// Maximum tenants held in the in-process certificate cache.
    #[serde(default = "default_cert_cache_entries")]
    pub max_cache_entries: usize,
}

impl Default for MtlsConfig {
    fn default() -> Self {
        Self {
            partner_route_patterns: Vec::new(),
            cache_ttl_secs: default_cert_cache_ttl_secs(),
            clock_skew_secs: default_clock_skew_secs(),
            max_cache_entries: default_cert_cache_entries(),
        }
    }
}

impl MtlsConfig {
    /// Validates mTLS settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.partner_route_patterns.len() > MAX_PARTNER_PATTERNS {
            return Err(ConfigError::Invalid(format!(
                "mtls.partner_route_patterns supports at most {MAX_PARTNER_PATTERNS} entries"
            )));
        }
        if self.cache_ttl_secs < MIN_CACHE_TTL_SECS || self.cache_ttl_secs > MAX_CACHE_TTL_SECS {
            return Err(ConfigError::Invalid(format!(
                "mtls.cache_ttl_secs must be between {MIN_CACHE_TTL_SECS} and {MAX_CACHE_TTL_SECS}"
            )));
        }
        if self.clock_skew_secs > MAX_CLOCK_SKEW_SECS {
            return Err(ConfigError::Invalid(format!(
                "mtls.clock_skew_secs must not exceed {MAX_CLOCK_SKEW_SECS}"
            )));
        }
        if self.max_cache_entries == 0 {
            return Err(ConfigError::Invalid(
                "mtls.max_cache_entries must be greater than zero".to_string(),
            ));
        }
        if self.max_cache_entries > MAX_CERT_CACHE_ENTRIES {
            return Err(ConfigError::Invalid("mtls.max_cache_entries too large".to_string()));
        }
        Ok(())
    }

    /// Returns the certificate cache TTL.
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

// ============================================================================
// SECTION: Complexity Limits
// ============================================================================

/// Query complexity limit settings.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ComplexityConfig {
    /// Maximum allowed nesting depth.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
    /// Maximum allowed single-level breadth.
    #[serde(default = "default_max_breadth")]
    pub max_breadth: u32,
    /// Maximum allowed total complexity.
    #[serde(default = "default_max_complexity")]
    pub max_complexity: u32,
}

impl Default for ComplexityConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_breadth: default_max_breadth(),
            max_complexity: default_max_complexity(),
        }
    }
}

impl ComplexityConfig {
    /// Validates complexity limits.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 || self.max_breadth == 0 || self.max_complexity == 0 {
            return Err(ConfigError::Invalid(
                "complexity limits must be greater than zero".to_string(),
            ));
        }
        if self.max_depth > MAX_QUERY_DEPTH {
            return Err(ConfigError::Invalid(format!(
                "complexity.max_depth must not exceed {MAX_QUERY_DEPTH}"
            )));
        }
        if self.max_breadth > MAX_QUERY_BREADTH {
            return Err(ConfigError::Invalid(format!(
                "complexity.max_breadth must not exceed {MAX_QUERY_BREADTH}"
            )));
        }
        if self.max_complexity > MAX_QUERY_COMPLEXITY {
            return Err(ConfigError::Invalid(format!(
                "complexity.max_complexity must not exceed {MAX_QUERY_COMPLEXITY}"
            )));
        }
        Ok(())
    }

    /// Returns the limits consumed by the analyzer.
    #[must_use]
    pub const fn limits(&self) -> ComplexityLimits {
        ComplexityLimits {
            max_depth: self.max_depth,
            max_breadth: self.max_breadth,
            max_complexity: self.max_complexity,
        }
    }
}

// ============================================================================
// SECTION: External Endpoints
// ============================================================================

/// Tenant directory endpoint settings.
///
/// # Invariants
/// - Timeouts are bounded; no external call may hang indefinitely.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    /// Directory base URL (no trailing slash required).
    #[serde(default)]
    pub base_url: String,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Access record cache TTL in seconds.
    #[serde(default = "default_access_cache_ttl_secs")]
    pub access_cache_ttl_secs: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            access_cache_ttl_secs: default_access_cache_ttl_secs(),
        }
    }
}

impl DirectoryConfig {
    /// Validates directory endpoint settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_timeouts("directory", self.connect_timeout_ms, self.request_timeout_ms)?;
        if self.access_cache_ttl_secs < MIN_CACHE_TTL_SECS
            || self.access_cache_ttl_secs > MAX_CACHE_TTL_SECS
        {
            return Err(ConfigError::Invalid(format!(
                "directory.access_cache_ttl_secs must be between {MIN_CACHE_TTL_SECS} and {MAX_CACHE_TTL_SECS}"
            )));
        }
        Ok(())
    }

    /// Returns the access record cache TTL.
    #[must_use]
    pub const fn access_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.access_cache_ttl_secs)
    }

    /// Returns the connect timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Certificate registry endpoint settings.
///
/// # Invariants
/// - Timeouts are bounded; no external call may hang indefinitely.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// Registry base URL (no trailing slash required).
    #[serde(default)]
    pub base_url: String,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl RegistryConfig {
    /// Validates registry endpoint settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_timeouts("registry", self.connect_timeout_ms, self.request_timeout_ms)
    }

    /// Returns the connect timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Validates a connect/request timeout pair against hard bounds.
fn validate_timeouts(section: &str, connect_ms: u64, request_ms: u64) -> Result<(), ConfigError> {
    if connect_ms < MIN_CONNECT_TIMEOUT_MS || connect_ms > MAX_CONNECT_TIMEOUT_MS {
        return Err(ConfigError::Invalid(format!(
            "{section}.connect_timeout_ms must be between {MIN_CONNECT_TIMEOUT_MS} and {MAX_CONNECT_TIMEOUT_MS}"
        )));
    }
    if request_ms < MIN_REQUEST_TIMEOUT_MS || request_ms > MAX_REQUEST_TIMEOUT_MS {
        return Err(ConfigError::Invalid(format!(
            "{section}.request_timeout_ms must be between {MIN_REQUEST_TIMEOUT_MS} and {MAX_REQUEST_TIMEOUT_MS}"
        )));
    }
    Ok(())
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration validation failures.
///
/// # Invariants
/// - Messages name the offending setting path.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A setting is out of range or malformed.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default bypass patterns exempt from tenant verification.
pub(crate) fn default_bypass_patterns() -> Vec<String> {
    vec!["/auth/**".to_string(), "/admin/login".to_string(), "/health".to_string()]
}

/// Default tenant header name.
pub(crate) fn default_tenant_header() -> String {
    "X-Tenant-Id".to_string()
}

/// Default JWT claim names consulted for the tenant candidate.
pub(crate) fn default_jwt_claim_names() -> Vec<String> {
    vec!["tenant".to_string(), "tenant_id".to_string(), "org".to_string()]
}

/// Default super-admin authority strings.
pub(crate) fn default_super_admin_authorities() -> Vec<String> {
    vec!["ROLE_SUPER_ADMIN".to_string()]
}

/// Default certificate cache TTL in seconds.
pub(crate) const fn default_cert_cache_ttl_secs() -> u64 {
    300
}

/// Default clock skew in seconds.
pub(crate) const fn default_clock_skew_secs() -> u64 {
    30
}

/// Default certificate cache entry bound.
pub(crate) const fn default_cert_cache_entries() -> usize {
    1_024
}

/// Default maximum query depth.
pub(crate) const fn default_max_depth() -> u32 {
    10
}

/// Default maximum query breadth.
pub(crate) const fn default_max_breadth() -> u32 {
    50
}

/// Default maximum query complexity.
pub(crate) const fn default_max_complexity() -> u32 {
    200
}

/// Default external-call connect timeout in milliseconds.
pub(crate) const fn default_connect_timeout_ms() -> u64 {
    500
}

/// Default external-call request timeout in milliseconds.
pub(crate) const fn default_request_timeout_ms() -> u64 {
    5_000
}

/// Default access record cache TTL in seconds.
pub(crate) const fn default_access_cache_ttl_secs() -> u64 {
    300
}
