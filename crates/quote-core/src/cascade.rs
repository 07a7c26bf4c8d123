//! # Cascade Types
//!
//! Pure types and rules for the catalog narrowing cascade:
//! name → size → surface → entry.
//!
//! ## Cascade Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Catalog Narrowing Cascade                           │
//! │                                                                         │
//! │  "Forest Oak" ──► sizes ──► surfaces ──► entries ──► one SkuSnapshot   │
//! │                                                                         │
//! │  At every stage:                                                        │
//! │    0 candidates  → NoMatch (valid terminal state, NOT an error)        │
//! │    1 candidate   → advance automatically, no user input                │
//! │    2+ candidates → present options, wait for a choice                  │
//! │                                                                         │
//! │  Entries with a NULL/blank surface are shown under the "Standard"      │
//! │  sentinel label; filtering by that label means "surface is absent",    │
//! │  not a literal text match.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The async driver that issues the stage queries lives in quote-db; this
//! module owns the vocabulary shared between the driver and its callers.

use serde::{Deserialize, Serialize};

/// Display label grouping entries whose surface column is NULL or blank.
pub const STANDARD_SURFACE: &str = "Standard";

// =============================================================================
// Stage Options
// =============================================================================

/// One selectable size at the size stage, with its member count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeOption {
    pub size: String,
    /// How many catalog entries share this size.
    pub count: i64,
}

/// One selectable surface at the surface stage, with its member count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceOption {
    /// Display label; blank surfaces appear as [`STANDARD_SURFACE`].
    pub surface: String,
    pub count: i64,
}

/// Which cascade stage produced a zero-candidate result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeStage {
    Size,
    Surface,
    Entry,
}

impl std::fmt::Display for CascadeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CascadeStage::Size => write!(f, "size"),
            CascadeStage::Surface => write!(f, "surface"),
            CascadeStage::Entry => write!(f, "entry"),
        }
    }
}

// =============================================================================
// Surface Sentinel Rules
// =============================================================================

/// Maps a raw surface column value to its display label.
///
/// NULL and whitespace-only surfaces collapse to [`STANDARD_SURFACE`] so
/// they stay selectable instead of being dropped from the surface stage.
pub fn surface_label(surface: Option<&str>) -> String {
    match surface {
        Some(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => STANDARD_SURFACE.to_string(),
    }
}

/// True when a chosen surface label is the sentinel, meaning the final
/// stage must filter on "surface is absent" rather than a literal match.
#[inline]
pub fn is_standard_surface(label: &str) -> bool {
    label == STANDARD_SURFACE
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_label_sentinel_cases() {
        assert_eq!(surface_label(None), "Standard");
        assert_eq!(surface_label(Some("")), "Standard");
        assert_eq!(surface_label(Some("   ")), "Standard");
        assert_eq!(surface_label(Some("Glossy")), "Glossy");
        // Stray padding from catalog imports is trimmed
        assert_eq!(surface_label(Some(" Matt ")), "Matt");
    }

    #[test]
    fn test_is_standard_surface() {
        assert!(is_standard_surface(STANDARD_SURFACE));
        assert!(!is_standard_surface("Glossy"));
        // Case sensitive: the sentinel is an exact label, not a word
        assert!(!is_standard_surface("standard"));
    }
}
