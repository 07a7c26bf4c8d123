//! # Pricing Engine
//!
//! Pure pricing math for one line item: selling price, fully-loaded cost,
//! and margin.
//!
//! ## The Two Chains
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SELLING SIDE                        COST SIDE (order matters!)         │
//! │                                                                         │
//! │  mrp_per_area                        ex_factory_price                   │
//! │       │ × (1 - discount%)                 │ × (1 - company discount%)   │
//! │       ▼                                   ▼                             │
//! │  rate_per_area                       ex_after_company                   │
//! │       │ × area/container                  │ + insurance% of it          │
//! │       ▼                                   ▼                             │
//! │  price_per_box                       gst_base ── × gst% ──► gst_cost    │
//! │       │ × quantity                        │                             │
//! │       ▼                                   ▼                             │
//! │  amount                              cost_per_area (+ freight/area)     │
//! │                                           │ × area/container, × qty     │
//! │                                           ▼                             │
//! │  margin = amount - total_cost  ◄─── total_cost                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Precision Policy
//! Every intermediate value is carried at full `f64` precision. Chained
//! percentage steps compound, so rounding inside the chain would drift the
//! final margin. [`round2`] is applied exactly once, at the presentation
//! boundary.
//!
//! ## Totality
//! The engine has no error type. Inputs arrive pre-normalized (absent
//! numerics are already 0.0 in [`SkuSnapshot`]) and both divisions —
//! area-to-containers and margin percent — are guarded to yield 0.

use serde::{Deserialize, Serialize};

use crate::types::{AreaBasis, CostSettings, SkuSnapshot};

/// Fraction of one container's area treated as negligible waste when
/// deriving a container count from a coverage area.
///
/// Remainders under 10% of a container round down (the shortfall is
/// absorbed by cutting waste), everything else rounds up so enough
/// material is ordered. The 0.1 threshold is a business rule, not a
/// numerical artifact.
pub const AREA_WASTE_TOLERANCE: f64 = 0.1;

// =============================================================================
// Price Breakdown
// =============================================================================

/// Every derived figure for one priced line.
///
/// These are outputs only — never hand-edited, always recomputed as a
/// whole by [`price_line`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    /// Selling rate per area unit after the customer discount.
    pub rate_per_area: f64,
    /// Selling price of one container.
    pub price_per_box: f64,
    /// Line amount: quantity × price_per_box.
    pub amount: f64,
    /// Fully-loaded cost per area unit.
    pub cost_per_area: f64,
    /// Fully-loaded cost of one container.
    pub cost_per_box: f64,
    /// Total cost: quantity × cost_per_box.
    pub total_cost: f64,
    /// amount − total_cost.
    pub margin_amount: f64,
    /// margin_amount / amount × 100; 0 when amount is 0.
    pub margin_percent: f64,
}

// =============================================================================
// Pricing
// =============================================================================

/// Computes the full selling/cost/margin breakdown for one line item.
///
/// ## Arguments
/// * `sku` - frozen catalog snapshot (numerics already normalized)
/// * `quantity` - whole containers; callers clamp to ≥ 1 before pricing
/// * `discount_percent` - customer-facing discount off MRP (0-100)
/// * `settings` - company discount and freight-per-area globals
/// * `basis` - which area-per-container figure to convert with
///
/// ## Example
/// ```
/// use quote_core::pricing::price_line;
/// use quote_core::types::{AreaBasis, CostSettings, SkuSnapshot};
///
/// let sku = SkuSnapshot {
///     catalog_id: "c1".into(),
///     name: "Forest Oak".into(),
///     size: "600x1200".into(),
///     surface: "Standard".into(),
///     ex_factory_price: 50.0,
///     mrp_per_area: 100.0,
///     mrp_per_container: 0.0,
///     gst_percent: 18.0,
///     insurance_percent: 1.0,
///     actual_area_per_container: 10.0,
///     billed_area_per_container: 10.0,
///     weight: 0.0,
///     freight: 0.0,
/// };
/// let settings = CostSettings { company_discount_percent: 5.0, freight_per_area: 2.0 };
///
/// let line = price_line(&sku, 2, 10.0, &settings, AreaBasis::Actual);
/// assert_eq!(line.rate_per_area, 90.0);
/// assert_eq!(line.price_per_box, 900.0);
/// assert_eq!(line.amount, 1800.0);
/// ```
pub fn price_line(
    sku: &SkuSnapshot,
    quantity: i64,
    discount_percent: f64,
    settings: &CostSettings,
    basis: AreaBasis,
) -> PriceBreakdown {
    let area_per_container = sku.area_per_container(basis);
    let qty = quantity as f64;

    // Selling side
    let rate_per_area = sku.mrp_per_area * (1.0 - discount_percent / 100.0);
    let price_per_box = rate_per_area * area_per_container;
    let amount = qty * price_per_box;

    // Cost side - chained percentage adjustments, order matters
    let ex_after_company = sku.ex_factory_price * (1.0 - settings.company_discount_percent / 100.0);
    let insurance_cost = ex_after_company * (sku.insurance_percent / 100.0);
    let gst_base = ex_after_company + insurance_cost;
    let gst_cost = gst_base * (sku.gst_percent / 100.0);
    let cost_per_area = ex_after_company + insurance_cost + gst_cost + settings.freight_per_area;
    let cost_per_box = cost_per_area * area_per_container;
    let total_cost = qty * cost_per_box;

    let margin_amount = amount - total_cost;

    PriceBreakdown {
        rate_per_area,
        price_per_box,
        amount,
        cost_per_area,
        cost_per_box,
        total_cost,
        margin_amount,
        margin_percent: margin_percent(margin_amount, amount),
    }
}

/// margin / amount × 100, guarded so a zero or negative amount yields 0
/// instead of Infinity/NaN.
#[inline]
pub fn margin_percent(margin_amount: f64, amount: f64) -> f64 {
    if amount > 0.0 {
        margin_amount / amount * 100.0
    } else {
        0.0
    }
}

// =============================================================================
// Area → Containers
// =============================================================================

/// Derives a container count from a desired coverage area.
///
/// Ceiling rule with a tolerance band:
/// ```text
/// x = area_needed / area_per_container
/// fractional = x - floor(x)
/// containers = fractional < 0.1 ? floor(x) : floor(x) + 1
/// ```
///
/// A non-positive area-per-container yields 0 (callers clamp a priced
/// line to the 1-container minimum).
pub fn containers_for_area(area_needed: f64, area_per_container: f64) -> i64 {
    if area_per_container <= 0.0 || area_needed <= 0.0 {
        return 0;
    }

    let x = area_needed / area_per_container;
    let fractional = x - x.floor();

    if fractional < AREA_WASTE_TOLERANCE {
        x.floor() as i64
    } else {
        x.floor() as i64 + 1
    }
}

// =============================================================================
// Presentation Rounding
// =============================================================================

/// Rounds a monetary value to 2 decimals.
///
/// Presentation-time only. Internal computation stays at full precision;
/// calling this inside the pricing chain would compound rounding error
/// across the percentage steps.
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sku() -> SkuSnapshot {
        SkuSnapshot {
            catalog_id: "c1".to_string(),
            name: "Forest Oak".to_string(),
            size: "600x1200".to_string(),
            surface: "Standard".to_string(),
            ex_factory_price: 50.0,
            mrp_per_area: 100.0,
            mrp_per_container: 0.0,
            gst_percent: 18.0,
            insurance_percent: 1.0,
            actual_area_per_container: 10.0,
            billed_area_per_container: 12.0,
            weight: 28.0,
            freight: 0.0,
        }
    }

    #[test]
    fn test_selling_side_scenario() {
        // mrp 100, 10% discount → rate 90; apc 10 → box 900; qty 2 → 1800
        let settings = CostSettings::default();
        let line = price_line(&sku(), 2, 10.0, &settings, AreaBasis::Actual);

        assert_eq!(line.rate_per_area, 90.0);
        assert_eq!(line.price_per_box, 900.0);
        assert_eq!(line.amount, 1800.0);
    }

    #[test]
    fn test_cost_chain_matches_formula() {
        // Each step verified against the chain, full precision throughout
        let settings = CostSettings {
            company_discount_percent: 5.0,
            freight_per_area: 2.0,
        };
        let line = price_line(&sku(), 2, 10.0, &settings, AreaBasis::Actual);

        let ex_after_company = 50.0 * (1.0 - 0.05); // 47.5
        let insurance = ex_after_company * 0.01; // 0.475
        let gst_base = ex_after_company + insurance; // 47.975
        let gst = gst_base * 0.18; // 8.6355
        let cost_per_area = ex_after_company + insurance + gst + 2.0; // 58.6105
        let cost_per_box = cost_per_area * 10.0;
        let total_cost = 2.0 * cost_per_box;

        assert!((line.cost_per_area - cost_per_area).abs() < 1e-12);
        assert!((line.cost_per_box - cost_per_box).abs() < 1e-12);
        assert!((line.total_cost - total_cost).abs() < 1e-12);
        assert!((line.margin_amount - (line.amount - total_cost)).abs() < 1e-12);
    }

    #[test]
    fn test_margin_percent_definition() {
        let settings = CostSettings {
            company_discount_percent: 5.0,
            freight_per_area: 2.0,
        };
        let line = price_line(&sku(), 3, 12.5, &settings, AreaBasis::Billed);

        assert!((line.margin_percent - line.margin_amount / line.amount * 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_margin_percent_zero_amount_guard() {
        assert_eq!(margin_percent(0.0, 0.0), 0.0);
        assert_eq!(margin_percent(-5.0, 0.0), 0.0);

        // Full 100% discount drives amount to zero: margin% must be 0, not -inf
        let settings = CostSettings::default();
        let line = price_line(&sku(), 2, 100.0, &settings, AreaBasis::Actual);
        assert_eq!(line.amount, 0.0);
        assert_eq!(line.margin_percent, 0.0);
        assert!(line.margin_percent.is_finite());
    }

    #[test]
    fn test_zero_area_container_yields_zero_not_nan() {
        let mut zero_area = sku();
        zero_area.actual_area_per_container = 0.0;

        let line = price_line(&zero_area, 2, 10.0, &CostSettings::default(), AreaBasis::Actual);
        assert_eq!(line.amount, 0.0);
        assert_eq!(line.margin_percent, 0.0);
        assert!(line.margin_amount.is_finite());
    }

    #[test]
    fn test_basis_selects_area_figure() {
        let settings = CostSettings::default();
        let actual = price_line(&sku(), 1, 0.0, &settings, AreaBasis::Actual);
        let billed = price_line(&sku(), 1, 0.0, &settings, AreaBasis::Billed);

        assert_eq!(actual.price_per_box, 1000.0); // 100 × 10
        assert_eq!(billed.price_per_box, 1200.0); // 100 × 12
    }

    #[test]
    fn test_containers_for_area_tolerance_band() {
        // remainder 5% of a container → down
        assert_eq!(containers_for_area(100.5, 10.0), 10);
        // remainder 50% → up
        assert_eq!(containers_for_area(105.0, 10.0), 10 + 1);
        // exact multiple → no change
        assert_eq!(containers_for_area(100.0, 10.0), 10);
    }

    #[test]
    fn test_containers_for_area_boundary() {
        // fractional 0.0999 is inside the tolerance band → rounds down
        assert_eq!(containers_for_area(0.999, 10.0), 0);
        // fractional exactly 0.1 is outside → rounds up
        assert_eq!(containers_for_area(1.0, 10.0), 1);
        // same boundary one container up: x = 1.125 (exact in binary) → up
        assert_eq!(containers_for_area(9.0, 8.0), 2);
        // x = 1.0625 → fractional 0.0625 → down
        assert_eq!(containers_for_area(8.5, 8.0), 1);
    }

    #[test]
    fn test_containers_for_area_guards() {
        assert_eq!(containers_for_area(100.0, 0.0), 0);
        assert_eq!(containers_for_area(100.0, -1.0), 0);
        assert_eq!(containers_for_area(0.0, 10.0), 0);
    }

    #[test]
    fn test_round2_presentation_only() {
        assert_eq!(round2(58.6105), 58.61);
        assert_eq!(round2(58.616), 58.62);
        assert_eq!(round2(-1.005), -1.0); // f64 artifact: -1.005 stores below the midpoint
        assert_eq!(round2(1800.0), 1800.0);
    }
}
