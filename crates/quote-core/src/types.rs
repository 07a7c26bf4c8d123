//! # Domain Types
//!
//! Core domain types used throughout TileQuote.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CatalogEntry   │   │   SkuSnapshot   │   │    Customer     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │──►│  catalog_id     │   │  id (UUID)      │       │
//! │  │  name/size/     │   │  all numerics   │   │  name           │       │
//! │  │  surface        │   │  normalized     │   │  code "0101"    │       │
//! │  │  Option<f64>    │   │  to f64         │   │  (lazy)         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │   AreaBasis     │   │  CostSettings   │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  Actual         │   │  company disc % │                             │
//! │  │  Billed         │   │  freight / area │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A line item never holds a live reference to the catalog. At selection
//! time the chosen `CatalogEntry` is frozen into a `SkuSnapshot`, and that
//! frozen copy is what the pricing engine reads from then on. Catalog edits
//! after selection cannot change an existing quotation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cascade::surface_label;

// =============================================================================
// Area Basis
// =============================================================================

/// Which area-per-container figure is used when converting between area
/// and container counts.
///
/// Suppliers quote two areas per container: the physical coverage
/// ("actual") and the contracted/rounded figure they bill by ("billed").
/// The choice is a quotation-level flag; it applies to subsequent edits
/// and new selections only, never retroactively to stored line amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum AreaBasis {
    /// Physical coverage area of one container.
    Actual,
    /// Contracted area the supplier bills one container as.
    Billed,
}

impl Default for AreaBasis {
    fn default() -> Self {
        AreaBasis::Actual
    }
}

// =============================================================================
// Catalog Entry
// =============================================================================

/// One concrete purchasable product variant (name + size + surface +
/// pricing attributes).
///
/// Immutable after creation: the owning catalog flow edits by archiving
/// and re-creating, so ids stay stable for historical snapshots.
///
/// Nullable numeric columns are `Option<f64>`; they normalize to 0.0 in
/// a single step when frozen into a [`SkuSnapshot`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CatalogEntry {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Product name shown to the sales user (e.g. "Forest Oak").
    pub name: String,

    /// Tile size (e.g. "600x1200").
    pub size: String,

    /// Surface finish. `None`/blank means the unnamed standard finish.
    pub surface: Option<String>,

    /// Ex-factory price per area unit, before any discount.
    pub ex_factory_price: Option<f64>,

    /// Maximum retail price per area unit.
    pub mrp_per_area: Option<f64>,

    /// Maximum retail price for one full container.
    pub mrp_per_container: Option<f64>,

    /// GST percentage applied on the insured ex-factory cost.
    pub gst_percent: Option<f64>,

    /// Insurance percentage applied on the discounted ex-factory cost.
    pub insurance_percent: Option<f64>,

    /// Physical coverage area of one container.
    pub actual_area_per_container: Option<f64>,

    /// Contracted/billed area of one container.
    pub billed_area_per_container: Option<f64>,

    /// Weight of one container (for freight planning rollups).
    pub weight: Option<f64>,

    /// Flat freight figure carried on the entry itself.
    pub freight: Option<f64>,

    /// Archived entries are invisible to the cascade resolver.
    pub archived: bool,

    /// When the entry was created.
    pub created_at: DateTime<Utc>,

    /// When the entry was last updated.
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// SKU Snapshot
// =============================================================================

/// Frozen, normalized copy of a [`CatalogEntry`] embedded in a line item.
///
/// All optional numerics collapse to 0.0 here — this is the single
/// normalization step, so the pricing engine downstream never sees an
/// absent value and never produces NaN from one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuSnapshot {
    /// Id of the catalog entry this was frozen from.
    pub catalog_id: String,
    pub name: String,
    pub size: String,
    /// Display label; blank surfaces carry the "Standard" sentinel.
    pub surface: String,
    pub ex_factory_price: f64,
    pub mrp_per_area: f64,
    pub mrp_per_container: f64,
    pub gst_percent: f64,
    pub insurance_percent: f64,
    pub actual_area_per_container: f64,
    pub billed_area_per_container: f64,
    pub weight: f64,
    pub freight: f64,
}

/// Maps every absent form of a numeric field to 0.0.
#[inline]
fn num(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

impl From<&CatalogEntry> for SkuSnapshot {
    fn from(entry: &CatalogEntry) -> Self {
        SkuSnapshot {
            catalog_id: entry.id.clone(),
            name: entry.name.clone(),
            size: entry.size.clone(),
            surface: surface_label(entry.surface.as_deref()),
            ex_factory_price: num(entry.ex_factory_price),
            mrp_per_area: num(entry.mrp_per_area),
            mrp_per_container: num(entry.mrp_per_container),
            gst_percent: num(entry.gst_percent),
            insurance_percent: num(entry.insurance_percent),
            actual_area_per_container: num(entry.actual_area_per_container),
            billed_area_per_container: num(entry.billed_area_per_container),
            weight: num(entry.weight),
            freight: num(entry.freight),
        }
    }
}

impl SkuSnapshot {
    /// Area-per-container figure for the given basis.
    #[inline]
    pub fn area_per_container(&self, basis: AreaBasis) -> f64 {
        match basis {
            AreaBasis::Actual => self.actual_area_per_container,
            AreaBasis::Billed => self.billed_area_per_container,
        }
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer in the directory.
///
/// `code` is the stable 4-digit identifier used to build quotation
/// numbers. It is allocated lazily the first time a quotation is
/// persisted for the customer, and never changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    /// Allocated 4-digit code ("0101", "0102", ...), absent until the
    /// first quotation is saved.
    pub code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Cost Settings
// =============================================================================

/// Global cost inputs for the pricing engine.
///
/// Threaded explicitly into every computation — deliberately not a
/// module-level singleton, so pricing stays a pure function of its
/// arguments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostSettings {
    /// Discount the company receives off the ex-factory price (0-100).
    pub company_discount_percent: f64,
    /// Freight cost per area unit, added after GST.
    pub freight_per_area: f64,
}

impl Default for CostSettings {
    fn default() -> Self {
        CostSettings {
            company_discount_percent: 0.0,
            freight_per_area: 0.0,
        }
    }
}

// =============================================================================
// Column Preferences
// =============================================================================

/// Which derived columns a rendered quotation shows.
///
/// Display-only flags; they never affect computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnPrefs {
    pub show_rate_per_area: bool,
    pub show_price_per_box: bool,
    pub show_amount: bool,
    /// Margin columns are internal; hidden on customer-facing output.
    pub show_margin: bool,
}

impl Default for ColumnPrefs {
    fn default() -> Self {
        ColumnPrefs {
            show_rate_per_area: true,
            show_price_per_box: true,
            show_amount: true,
            show_margin: false,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_with(surface: Option<&str>) -> CatalogEntry {
        CatalogEntry {
            id: "cat-1".to_string(),
            name: "Forest Oak".to_string(),
            size: "600x1200".to_string(),
            surface: surface.map(|s| s.to_string()),
            ex_factory_price: Some(50.0),
            mrp_per_area: Some(100.0),
            mrp_per_container: None,
            gst_percent: Some(18.0),
            insurance_percent: None,
            actual_area_per_container: Some(10.0),
            billed_area_per_container: Some(10.5),
            weight: Some(28.0),
            freight: None,
            archived: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_snapshot_normalizes_absent_numerics_to_zero() {
        let snap = SkuSnapshot::from(&entry_with(Some("Glossy")));
        assert_eq!(snap.mrp_per_container, 0.0);
        assert_eq!(snap.insurance_percent, 0.0);
        assert_eq!(snap.freight, 0.0);
        // Present values pass through untouched
        assert_eq!(snap.ex_factory_price, 50.0);
    }

    #[test]
    fn test_snapshot_surface_sentinel() {
        assert_eq!(SkuSnapshot::from(&entry_with(None)).surface, "Standard");
        assert_eq!(SkuSnapshot::from(&entry_with(Some(""))).surface, "Standard");
        assert_eq!(SkuSnapshot::from(&entry_with(Some("Matt"))).surface, "Matt");
    }

    #[test]
    fn test_area_per_container_follows_basis() {
        let snap = SkuSnapshot::from(&entry_with(None));
        assert_eq!(snap.area_per_container(AreaBasis::Actual), 10.0);
        assert_eq!(snap.area_per_container(AreaBasis::Billed), 10.5);
    }

    #[test]
    fn test_area_basis_default() {
        assert_eq!(AreaBasis::default(), AreaBasis::Actual);
    }
}
