// crates/tenant-gate-core/src/core/routing.rs
// ============================================================================
// Module: Route Metadata
// Description: Upstream variant and traffic-split metadata consumed by gates.
// Purpose: Describe where an admitted request is ultimately routed.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The admission core does not pick upstreams. It consumes route metadata
//! (weighted variants and blue/green splits) only to reason about the route
//! a request resolves to (for example, whether that route is a partner route
//! requiring mTLS). The selection algorithm itself lives in the routing
//! layer and is out of scope here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Route Variants
// ============================================================================

/// One weighted upstream variant for a route.
///
/// # Invariants
/// - `percentage` is a share of traffic in `[0, 100]`; enforcement of the
///   sum across variants belongs to the routing layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteVariant {
    /// Variant identifier.
    pub variant_id: String,
    /// Share of traffic directed at the variant, in percent.
    pub percentage: u8,
    /// Upstream service URI for the variant.
    pub service_uri: String,
}

// ============================================================================
// SECTION: Traffic Split
// ============================================================================

/// Active slot of a blue/green traffic split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitSlot {
    /// Blue slot is live.
    Blue,
    /// Green slot is live.
    Green,
}

/// Blue/green split metadata for a route.
///
/// # Invariants
/// - Both URIs are always populated; `active_slot` selects between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficSplit {
    /// Which slot currently receives traffic.
    pub active_slot: SplitSlot,
    /// Upstream URI for the blue slot.
    pub blue_uri: String,
    /// Upstream URI for the green slot.
    pub green_uri: String,
}

impl TrafficSplit {
    /// Returns the URI of the active slot.
    #[must_use]
    pub fn active_uri(&self) -> &str {
        match self.active_slot {
            SplitSlot::Blue => &self.blue_uri,
            SplitSlot::Green => &self.green_uri,
        }
    }
}
