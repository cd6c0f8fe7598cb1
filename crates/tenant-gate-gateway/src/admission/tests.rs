// crates/tenant-gate-gateway/src/admission/tests.rs
// ============================================================================
// Module: Tiered Admission Tests
// Description: Unit tests for fixed-window tier and global admission.
// Purpose: Validate capacity boundaries, fail-open, and key strategies.
// Dependencies: tenant-gate-gateway, tokio
// ============================================================================

//! ## Overview
//! Exercises the admission controller against the in-memory counter store
//! under paused tokio time: capacity boundaries, fresh-window resets,
//! super-admin exemption, global strategy keys, and the fail-open default
//! when the counter store is down.

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

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tenant_gate_config::AdmissionConfig;
use tenant_gate_config::GlobalLimitConfig;
use tenant_gate_config::GlobalLimitStrategy;
use tenant_gate_config::TierLimitConfig;
use tenant_gate_core::TenantCode;
use tenant_gate_core::TierName;
use tenant_gate_providers::CounterStore;
use tenant_gate_providers::CounterStoreError;
use tenant_gate_providers::MemoryCounterStore;

use crate::audit::NoopAuditSink;

use super::AdmissionScope;
use super::TieredAdmissionController;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Counter store that refuses every operation.
struct DownCounterStore;

#[async_trait]
impl CounterStore for DownCounterStore {
    async fn incr(&self, _key: &str) -> Result<i64, CounterStoreError> {
        Err(CounterStoreError::Unavailable("store down".to_string()))
    }

    async fn expire(&self, _key: &str, _ttl: Duration) -> Result<bool, CounterStoreError> {
        Err(CounterStoreError::Unavailable("store down".to_string()))
    }

    async fn get(&self, _key: &str) -> Result<Option<i64>, CounterStoreError> {
        Err(CounterStoreError::Unavailable("store down".to_string()))
    }

    async fn set_if_absent(
        &self,
        _key: &str,
        _value: i64,
        _ttl: Duration,
    ) -> Result<bool, CounterStoreError> {
        Err(CounterStoreError::Unavailable("store down".to_string()))
    }
}

fn tiered_config(capacity: u32, window_secs: u64) -> AdmissionConfig {
    let mut config = AdmissionConfig::default();
    config.tiers.insert(
        "gold".to_string(),
        TierLimitConfig {
            capacity,
            window_secs,
        },
    );
    config
}

fn controller(config: &AdmissionConfig, store: Arc<dyn CounterStore>) -> TieredAdmissionController {
    TieredAdmissionController::from_config(config, store, Arc::new(NoopAuditSink))
}

fn scope(tenant: &TenantCode) -> AdmissionScope<'_> {
    AdmissionScope {
        tenant,
        peer_ip: None,
        subject: None,
    }
}

// ============================================================================
// SECTION: Tier Window Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn capacity_admits_then_rejects() {
    let config = tiered_config(3, 60);
    let controller = controller(&config, Arc::new(MemoryCounterStore::new()));
    let tenant = TenantCode::normalize("acme");
    let tier = TierName::normalize("gold");

    for expected_remaining in [2, 1, 0] {
        let outcome =
            controller.admit(&scope(&tenant), &tier, false).await.expect("limited tier");
        assert!(outcome.allowed);
        assert_eq!(outcome.limit, 3);
        assert_eq!(outcome.remaining, expected_remaining);
    }

    let rejected = controller.admit(&scope(&tenant), &tier, false).await.expect("limited tier");
    assert!(!rejected.allowed);
    assert_eq!(rejected.remaining, 0);
}

#[tokio::test(start_paused = true)]
async fn fresh_window_resets_the_count() {
    let config = tiered_config(1, 60);
    let controller = controller(&config, Arc::new(MemoryCounterStore::new()));
    let tenant = TenantCode::normalize("acme");
    let tier = TierName::normalize("gold");

    assert!(controller.admit(&scope(&tenant), &tier, false).await.expect("first").allowed);
    assert!(!controller.admit(&scope(&tenant), &tier, false).await.expect("second").allowed);

    tokio::time::advance(Duration::from_secs(61)).await;

    assert!(controller.admit(&scope(&tenant), &tier, false).await.expect("new window").allowed);
}

#[tokio::test(start_paused = true)]
async fn unconfigured_tier_is_unlimited() {
    let config = tiered_config(1, 60);
    let controller = controller(&config, Arc::new(MemoryCounterStore::new()));
    let tenant = TenantCode::normalize("acme");
    let tier = TierName::normalize("platinum");

    for _ in 0..10 {
        assert!(controller.admit(&scope(&tenant), &tier, false).await.is_none());
    }
}

#[tokio::test(start_paused = true)]
async fn super_admin_is_exempt() {
    let config = tiered_config(1, 60);
    let controller = controller(&config, Arc::new(MemoryCounterStore::new()));
    let tenant = TenantCode::normalize("acme");
    let tier = TierName::normalize("gold");

    for _ in 0..5 {
        assert!(controller.admit(&scope(&tenant), &tier, true).await.is_none());
    }
    // The exempt calls consumed nothing from the tenant's window.
    assert!(controller.admit(&scope(&tenant), &tier, false).await.expect("window").allowed);
}

#[tokio::test(start_paused = true)]
async fn tenants_do_not_share_windows() {
    let config = tiered_config(1, 60);
    let controller = controller(&config, Arc::new(MemoryCounterStore::new()));
    let tier = TierName::normalize("gold");
    let acme = TenantCode::normalize("acme");
    let globex = TenantCode::normalize("globex");

    assert!(controller.admit(&scope(&acme), &tier, false).await.expect("acme").allowed);
    assert!(controller.admit(&scope(&globex), &tier, false).await.expect("globex").allowed);
    assert!(!controller.admit(&scope(&acme), &tier, false).await.expect("acme again").allowed);
}

// ============================================================================
// SECTION: Global Window Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn global_window_applies_without_tier_config() {
    let config = AdmissionConfig {
        global_limit: Some(GlobalLimitConfig {
            strategy: GlobalLimitStrategy::Tenant,
            capacity: 2,
            refill_per_minute: 2,
        }),
        ..AdmissionConfig::default()
    };
    let controller = controller(&config, Arc::new(MemoryCounterStore::new()));
    let tenant = TenantCode::normalize("acme");
    let tier = TierName::normalize("free");

    assert!(controller.admit(&scope(&tenant), &tier, false).await.expect("first").allowed);
    assert!(controller.admit(&scope(&tenant), &tier, false).await.expect("second").allowed);
    assert!(!controller.admit(&scope(&tenant), &tier, false).await.expect("third").allowed);
}

#[tokio::test(start_paused = true)]
async fn ip_strategy_keys_by_peer_address() {
    let config = AdmissionConfig {
        global_limit: Some(GlobalLimitConfig {
            strategy: GlobalLimitStrategy::Ip,
            capacity: 1,
            refill_per_minute: 1,
        }),
        ..AdmissionConfig::default()
    };
    let controller = controller(&config, Arc::new(MemoryCounterStore::new()));
    let tenant = TenantCode::normalize("acme");
    let tier = TierName::normalize("free");

    let first_peer = AdmissionScope {
        tenant: &tenant,
        peer_ip: Some(IpAddr::from([10, 0, 0, 1])),
        subject: None,
    };
    let second_peer = AdmissionScope {
        tenant: &tenant,
        peer_ip: Some(IpAddr::from([10, 0, 0, 2])),
        subject: None,
    };

    assert!(controller.admit(&first_peer, &tier, false).await.expect("peer one").allowed);
    assert!(controller.admit(&second_peer, &tier, false).await.expect("peer two").allowed);
    assert!(!controller.admit(&first_peer, &tier, false).await.expect("peer one again").allowed);
}

#[tokio::test(start_paused = true)]
async fn missing_strategy_attribute_falls_back_to_tenant() {
    let config = AdmissionConfig {
        global_limit: Some(GlobalLimitConfig {
            strategy: GlobalLimitStrategy::User,
            capacity: 1,
            refill_per_minute: 1,
        }),
        ..AdmissionConfig::default()
    };
    let controller = controller(&config, Arc::new(MemoryCounterStore::new()));
    let tenant = TenantCode::normalize("acme");
    let tier = TierName::normalize("free");

    assert!(controller.admit(&scope(&tenant), &tier, false).await.expect("first").allowed);
    // Same tenant, still no subject: the fallback key is shared.
    assert!(!controller.admit(&scope(&tenant), &tier, false).await.expect("second").allowed);
}

// ============================================================================
// SECTION: Failure Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn counter_store_outage_fails_open() {
    let config = tiered_config(1, 60);
    let controller = controller(&config, Arc::new(DownCounterStore));
    let tenant = TenantCode::normalize("acme");
    let tier = TierName::normalize("gold");

    for _ in 0..5 {
        let outcome = controller.admit(&scope(&tenant), &tier, false).await.expect("window");
        assert!(outcome.allowed);
        assert_eq!(outcome.limit, 1);
    }
}
