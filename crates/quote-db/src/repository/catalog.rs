//! # Catalog Repository
//!
//! Database operations for catalog entries, including the three cascade
//! stage queries the resolver narrows with.
//!
//! ## Cascade Stage Queries
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 How The Stage Queries Narrow                            │
//! │                                                                         │
//! │  list_sizes("Forest Oak")                                              │
//! │    → [ ("600x1200", 3), ("800x800", 1) ]                               │
//! │                                                                         │
//! │  list_surfaces("Forest Oak", "600x1200")                               │
//! │    → [ ("Glossy", 1), ("Matt", 1), ("Standard", 1) ]                   │
//! │        ▲ NULL/blank surfaces are grouped under "Standard",             │
//! │          never dropped                                                 │
//! │                                                                         │
//! │  list_final_entries("Forest Oak", "600x1200", "Standard")              │
//! │    → entries WHERE surface IS NULL OR TRIM(surface) = ''               │
//! │        ▲ the sentinel filters on absence, not the literal text         │
//! │                                                                         │
//! │  All three see only archived = 0 rows.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use quote_core::cascade::{is_standard_surface, SizeOption, SurfaceOption, STANDARD_SURFACE};
use quote_core::CatalogEntry;

/// Column list shared by every SELECT that materializes a [`CatalogEntry`].
const ENTRY_COLUMNS: &str = "id, name, size, surface, ex_factory_price, mrp_per_area, \
     mrp_per_container, gst_percent, insurance_percent, actual_area_per_container, \
     billed_area_per_container, weight, freight, archived, created_at, updated_at";

/// Repository for catalog database operations.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Gets an entry by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<CatalogEntry>> {
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM catalog_entries WHERE id = ?1");
        let entry = sqlx::query_as::<_, CatalogEntry>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entry)
    }

    /// Distinct sizes (with member counts) for the given product name.
    /// First stage of the cascade.
    pub async fn list_sizes(&self, name: &str) -> DbResult<Vec<SizeOption>> {
        debug!(name = %name, "Listing sizes");

        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT size, COUNT(*)
            FROM catalog_entries
            WHERE name = ?1 AND archived = 0
            GROUP BY size
            ORDER BY size
            "#,
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(size, count)| SizeOption { size, count })
            .collect())
    }

    /// Distinct surfaces (with member counts) for name + size. Second
    /// stage. NULL/blank surfaces are grouped under the "Standard"
    /// sentinel rather than dropped.
    pub async fn list_surfaces(&self, name: &str, size: &str) -> DbResult<Vec<SurfaceOption>> {
        debug!(name = %name, size = %size, "Listing surfaces");

        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT COALESCE(NULLIF(TRIM(surface), ''), ?3) AS surface_label, COUNT(*)
            FROM catalog_entries
            WHERE name = ?1 AND size = ?2 AND archived = 0
            GROUP BY COALESCE(NULLIF(TRIM(surface), ''), ?3)
            ORDER BY surface_label
            "#,
        )
        .bind(name)
        .bind(size)
        .bind(STANDARD_SURFACE)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(surface, count)| SurfaceOption { surface, count })
            .collect())
    }

    /// Final stage filter. When `surface` is the sentinel label, the
    /// condition is "surface is absent", not a literal text match.
    pub async fn list_final_entries(
        &self,
        name: &str,
        size: &str,
        surface: &str,
    ) -> DbResult<Vec<CatalogEntry>> {
        debug!(name = %name, size = %size, surface = %surface, "Listing final entries");

        let entries = if is_standard_surface(surface) {
            let sql = format!(
                "SELECT {ENTRY_COLUMNS} FROM catalog_entries \
                 WHERE name = ?1 AND size = ?2 AND archived = 0 \
                 AND (surface IS NULL OR TRIM(surface) = '') \
                 ORDER BY id"
            );
            sqlx::query_as::<_, CatalogEntry>(&sql)
                .bind(name)
                .bind(size)
                .fetch_all(&self.pool)
                .await?
        } else {
            let sql = format!(
                "SELECT {ENTRY_COLUMNS} FROM catalog_entries \
                 WHERE name = ?1 AND size = ?2 AND archived = 0 \
                 AND TRIM(surface) = ?3 \
                 ORDER BY id"
            );
            sqlx::query_as::<_, CatalogEntry>(&sql)
                .bind(name)
                .bind(size)
                .bind(surface)
                .fetch_all(&self.pool)
                .await?
        };

        Ok(entries)
    }

    /// Inserts a new entry.
    pub async fn insert(&self, entry: &CatalogEntry) -> DbResult<()> {
        debug!(id = %entry.id, name = %entry.name, "Inserting catalog entry");

        sqlx::query(
            r#"
            INSERT INTO catalog_entries (
                id, name, size, surface,
                ex_factory_price, mrp_per_area, mrp_per_container,
                gst_percent, insurance_percent,
                actual_area_per_container, billed_area_per_container,
                weight, freight, archived, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7,
                ?8, ?9,
                ?10, ?11,
                ?12, ?13, ?14, ?15, ?16
            )
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.name)
        .bind(&entry.size)
        .bind(&entry.surface)
        .bind(entry.ex_factory_price)
        .bind(entry.mrp_per_area)
        .bind(entry.mrp_per_container)
        .bind(entry.gst_percent)
        .bind(entry.insurance_percent)
        .bind(entry.actual_area_per_container)
        .bind(entry.billed_area_per_container)
        .bind(entry.weight)
        .bind(entry.freight)
        .bind(entry.archived)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Archives an entry, hiding it from the cascade.
    ///
    /// The catalog flow never updates pricing in place — it archives the
    /// old row and inserts a replacement, so existing snapshots stay
    /// truthful about what was quoted.
    pub async fn archive(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Archiving catalog entry");

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE catalog_entries
            SET archived = 1, updated_at = ?2
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("CatalogEntry", id));
        }

        Ok(())
    }

    /// Counts live entries (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM catalog_entries WHERE archived = 0")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

/// Helper to generate a new catalog entry ID.
pub fn generate_entry_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
