//! # quote-db: Database Layer for TileQuote
//!
//! This crate provides database access for TileQuote.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        TileQuote Data Flow                              │
//! │                                                                         │
//! │  Caller (UI command / export job)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     quote-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │   Resolver   │  │   │
//! │  │   │   (pool.rs)   │◄───│ catalog       │◄───│  cascade     │  │   │
//! │  │   │               │    │ customer      │    │  driver      │  │   │
//! │  │   │ SqlitePool    │    │ quotation     │    └──────────────┘  │   │
//! │  │   │ + migrations  │    │ sequence      │                      │   │
//! │  │   └───────────────┘    └───────────────┘                      │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database (WAL mode)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//! - [`resolver`] - Cascade driver over the catalog repository
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quote_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/tilequote.db")).await?;
//!
//! let mut resolver = quote_db::CatalogResolver::new(db.catalog());
//! let outcome = resolver.start("Forest Oak").await?;
//!
//! let saved = db.quotations().save(&quotation).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod resolver;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};
pub use resolver::{CascadeOutcome, CatalogResolver};

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::customer::CustomerRepository;
pub use repository::quotation::{QuotationRepository, QuotationSummary};
pub use repository::sequence::SequenceAllocator;
