//! # Catalog Resolver
//!
//! Drives the name → size → surface → entry cascade against the catalog
//! repository, auto-advancing whenever a stage has exactly one candidate.
//!
//! ## Auto-Selection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │               Why Stages Skip Themselves                                │
//! │                                                                         │
//! │  User types "Forest Oak 600x1200 Matt" — a fully qualified name.       │
//! │  Without auto-selection they would still have to click through:        │
//! │                                                                         │
//! │    sizes:    [600x1200]        ← one option, hollow menu               │
//! │    surfaces: [Matt]            ← one option, hollow menu               │
//! │    entries:  [the one entry]   ← one option, hollow confirmation       │
//! │                                                                         │
//! │  The resolver clicks those for them: any stage with exactly one        │
//! │  candidate advances immediately, including the final stage, which     │
//! │  emits the entry with no confirmation step.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Zero candidates is `NoMatch` — a valid terminal state the UI renders
//! as an empty state. A failed stage query is a `DbError` the caller can
//! retry; the cascade keeps its position and never advances on failure.

use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::catalog::CatalogRepository;
use quote_core::cascade::{CascadeStage, SizeOption, SurfaceOption};
use quote_core::CatalogEntry;

// =============================================================================
// Outcome
// =============================================================================

/// What the cascade needs next.
#[derive(Debug, Clone)]
pub enum CascadeOutcome {
    /// Multiple sizes match; the user picks one.
    ChooseSize(Vec<SizeOption>),
    /// Multiple surfaces match; the user picks one.
    ChooseSurface(Vec<SurfaceOption>),
    /// Multiple concrete entries remain; the user picks one.
    ChooseEntry(Vec<CatalogEntry>),
    /// Narrowed to exactly one entry — the chosen SKU.
    Resolved(Box<CatalogEntry>),
    /// A stage returned zero candidates. Terminal, but not an error.
    NoMatch(CascadeStage),
}

// =============================================================================
// Resolver
// =============================================================================

/// Stateful driver for one narrowing session.
///
/// ## Usage
/// ```rust,ignore
/// let mut resolver = CatalogResolver::new(db.catalog());
/// match resolver.start("Forest Oak").await? {
///     CascadeOutcome::ChooseSurface(options) => { /* render menu */ }
///     CascadeOutcome::Resolved(entry) => { /* freeze a snapshot */ }
///     ...
/// }
/// ```
#[derive(Debug)]
pub struct CatalogResolver {
    catalog: CatalogRepository,
    name: Option<String>,
    size: Option<String>,
    surface: Option<String>,
}

impl CatalogResolver {
    /// Creates a resolver with no selection.
    pub fn new(catalog: CatalogRepository) -> Self {
        CatalogResolver {
            catalog,
            name: None,
            size: None,
            surface: None,
        }
    }

    /// Starts (or restarts) the cascade for a product name. Downstream
    /// selections from a previous run are discarded.
    pub async fn start(&mut self, name: &str) -> DbResult<CascadeOutcome> {
        debug!(name = %name, "Cascade start");
        self.name = Some(name.to_string());
        self.size = None;
        self.surface = None;

        let sizes = self.catalog.list_sizes(name).await?;
        match sizes.len() {
            0 => Ok(CascadeOutcome::NoMatch(CascadeStage::Size)),
            1 => {
                let only = sizes[0].size.clone();
                self.choose_size(&only).await
            }
            _ => Ok(CascadeOutcome::ChooseSize(sizes)),
        }
    }

    /// Applies a size choice and advances.
    pub async fn choose_size(&mut self, size: &str) -> DbResult<CascadeOutcome> {
        let name = self.selected_name()?;
        debug!(name = %name, size = %size, "Cascade size chosen");

        let surfaces = self.catalog.list_surfaces(&name, size).await?;
        // Selection is committed only after the stage query succeeded, so
        // a failed fetch leaves the cascade exactly where it was.
        self.size = Some(size.to_string());
        self.surface = None;

        match surfaces.len() {
            0 => Ok(CascadeOutcome::NoMatch(CascadeStage::Surface)),
            1 => {
                let only = surfaces[0].surface.clone();
                self.choose_surface(&only).await
            }
            _ => Ok(CascadeOutcome::ChooseSurface(surfaces)),
        }
    }

    /// Applies a surface choice and advances to the final stage.
    pub async fn choose_surface(&mut self, surface: &str) -> DbResult<CascadeOutcome> {
        let name = self.selected_name()?;
        let size = self
            .size
            .clone()
            .ok_or_else(|| DbError::Internal("surface chosen before size".to_string()))?;
        debug!(name = %name, size = %size, surface = %surface, "Cascade surface chosen");

        let mut entries = self.catalog.list_final_entries(&name, &size, surface).await?;
        self.surface = Some(surface.to_string());

        match entries.len() {
            0 => Ok(CascadeOutcome::NoMatch(CascadeStage::Entry)),
            1 => Ok(CascadeOutcome::Resolved(Box::new(entries.remove(0)))),
            _ => Ok(CascadeOutcome::ChooseEntry(entries)),
        }
    }

    /// Final pick when the last stage still held several entries.
    pub async fn choose_entry(&self, entry_id: &str) -> DbResult<CascadeOutcome> {
        match self.catalog.get_by_id(entry_id).await? {
            Some(entry) if !entry.archived => Ok(CascadeOutcome::Resolved(Box::new(entry))),
            _ => Ok(CascadeOutcome::NoMatch(CascadeStage::Entry)),
        }
    }

    /// The current (name, size, surface) selection, for rendering crumbs.
    pub fn selection(&self) -> (Option<&str>, Option<&str>, Option<&str>) {
        (
            self.name.as_deref(),
            self.size.as_deref(),
            self.surface.as_deref(),
        )
    }

    fn selected_name(&self) -> DbResult<String> {
        self.name
            .clone()
            .ok_or_else(|| DbError::Internal("cascade stage used before start".to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
