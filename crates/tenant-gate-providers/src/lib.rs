// crates/tenant-gate-providers/src/lib.rs
// ============================================================================
// Module: Tenant Gate Providers Library
// Description: External collaborator seams for the admission core.
// Purpose: Resolve tenant access, certificates, and counters behind traits.
// Dependencies: tenant-gate-core, reqwest, tokio
// ============================================================================

//! ## Overview
//! The admission core consults three external systems: the Tenant Directory
//! (tenant access state), the Certificate Registry (trusted partner
//! certificates), and the Rate Counter Store (atomic fixed-window
//! counters). Each is modeled as a trait seam with an HTTP or in-memory
//! reference implementation. Every HTTP client carries bounded connect and
//! request timeouts; nothing in this crate may hang indefinitely.
//!
//! Security posture: all three collaborators sit on trust boundaries. The
//! directory and registry return data that gates admission; outages surface
//! as typed `Unavailable` errors so callers can apply their documented
//! fail-open or fail-closed rule.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod cache;
pub mod counter;
pub mod directory;
pub mod registry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use cache::MemoryRecordCache;
pub use cache::RecordCache;
pub use cache::RecordCacheError;
pub use counter::CounterStore;
pub use counter::CounterStoreError;
pub use counter::MemoryCounterStore;
pub use directory::DirectoryError;
pub use directory::DirectoryTenantRecord;
pub use directory::HttpTenantDirectory;
pub use directory::StaticTenantDirectory;
pub use directory::TenantDirectory;
pub use registry::CertificateRegistry;
pub use registry::HttpCertificateRegistry;
pub use registry::RegistryError;
pub use registry::StaticCertificateRegistry;
