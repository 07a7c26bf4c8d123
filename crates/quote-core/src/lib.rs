//! # quote-core: Pure Business Logic for TileQuote
//!
//! This crate is the **heart** of TileQuote. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        TileQuote Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              UI / Export Collaborators (external)               │   │
//! │  │    cascade menus ──► line editor ──► totals ──► PDF/HTML       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ quote-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  pricing  │  │ quotation │  │  cascade  │  │   │
//! │  │   │ SkuSnap.. │  │ PriceBr.. │  │ Room tree │  │ narrowing │  │   │
//! │  │   │ Customer  │  │ margins   │  │ totals    │  │ sentinel  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    quote-db (Database Layer)                    │   │
//! │  │       SQLite queries, migrations, sequences, repositories       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CatalogEntry, SkuSnapshot, Customer, settings)
//! - [`pricing`] - Selling/cost/margin chains and the area ceiling rule
//! - [`quotation`] - The Quotation → Room → LineItem tree and its mutations
//! - [`cascade`] - Vocabulary of the name → size → surface narrowing cascade
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, everywhere
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Full-precision math**: f64 throughout the chains, rounding only at
//!    presentation ([`pricing::round2`])
//! 4. **Total pricing**: normalization + division guards mean the engine
//!    can't throw and can't emit NaN

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cascade;
pub mod error;
pub mod pricing;
pub mod quotation;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cascade::{CascadeStage, SizeOption, SurfaceOption, STANDARD_SURFACE};
pub use error::{CoreError, ValidationError};
pub use pricing::PriceBreakdown;
pub use quotation::{LineItem, MoveDirection, Quotation, Room};
pub use types::{AreaBasis, CatalogEntry, ColumnPrefs, CostSettings, Customer, SkuSnapshot};
