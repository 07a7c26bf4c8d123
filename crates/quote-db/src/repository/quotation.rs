//! # Quotation Repository
//!
//! Persistence for the full Quotation → Room → LineItem tree.
//!
//! ## Save Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       One Save, One Transaction                         │
//! │                                                                         │
//! │  save(quotation)                                                       │
//! │       │                                                                 │
//! │       ├── no number yet? ── allocate customer code (sequence repo)     │
//! │       │                     │                                           │
//! │       │                     ▼                                           │
//! │       │            ┌─ BEGIN ────────────────────────────┐              │
//! │       │            │  INSERT header (number reserved    │              │
//! │       │            │         by UNIQUE constraint)      │              │
//! │       │            │  INSERT rooms                      │              │
//! │       │            │  INSERT items                      │              │
//! │       │            └─ COMMIT ───────────────────────────┘              │
//! │       │                     │                                           │
//! │       │         UNIQUE collision on the number?                        │
//! │       │         → whole transaction rolls back, retry with a           │
//! │       │           freshly re-read count (bounded attempts)             │
//! │       │                                                                 │
//! │       └── already numbered? ── same transaction shape, header          │
//! │                                UPDATE + rooms/items rewritten          │
//! │                                                                         │
//! │  A crash mid-save can never leave a header without its rooms/items.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Transient SQLite failures (writer lock, pool timeout) retry with
//! backoff; everything else surfaces unmodified.

use std::future::Future;
use std::time::Duration;

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::sequence::SequenceAllocator;
use quote_core::pricing::PriceBreakdown;
use quote_core::quotation::{LineItem, Quotation, Room};
use quote_core::types::{AreaBasis, ColumnPrefs, SkuSnapshot};
use quote_core::validation;

/// Bounded retries when a generated quotation number loses the UNIQUE race.
const NUMBER_ATTEMPTS: u32 = 10;

/// Bounded retries for transient storage failures.
const TRANSIENT_ATTEMPTS: u32 = 3;

/// First backoff delay; doubles per transient retry.
const BACKOFF_BASE_MS: u64 = 50;

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct QuotationRow {
    id: String,
    customer_id: String,
    name: String,
    quotation_number: String,
    area_basis: AreaBasis,
    columns_json: String,
    total_amount: f64,
    total_margin_amount: f64,
    total_margin_percent: f64,
    distinct_products: i64,
    total_containers: i64,
    total_weight: f64,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct RoomRow {
    id: String,
    name: String,
    sort_order: i64,
    room_total: f64,
    room_margin_amount: f64,
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: String,
    room_id: String,
    sku_snapshot: Option<String>,
    quantity: i64,
    discount_percent: f64,
    area_needed: Option<f64>,
    sort_order: i64,
    rate_per_area: f64,
    price_per_box: f64,
    amount: f64,
    cost_per_area: f64,
    cost_per_box: f64,
    total_cost: f64,
    margin_amount: f64,
    margin_percent: f64,
}

impl ItemRow {
    fn into_line_item(self) -> DbResult<LineItem> {
        let sku: Option<SkuSnapshot> = match self.sku_snapshot {
            Some(json) => Some(serde_json::from_str(&json)?),
            None => None,
        };
        Ok(LineItem {
            id: self.id,
            sku,
            quantity: self.quantity,
            discount_percent: self.discount_percent,
            area_needed: self.area_needed,
            sort_order: self.sort_order,
            derived: PriceBreakdown {
                rate_per_area: self.rate_per_area,
                price_per_box: self.price_per_box,
                amount: self.amount,
                cost_per_area: self.cost_per_area,
                cost_per_box: self.cost_per_box,
                total_cost: self.total_cost,
                margin_amount: self.margin_amount,
                margin_percent: self.margin_percent,
            },
        })
    }
}

/// Row for quotation list views: enough to render a line without loading
/// the tree.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QuotationSummary {
    pub id: String,
    pub name: String,
    pub quotation_number: String,
    pub customer_id: String,
    pub customer_name: String,
    pub total_amount: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for quotation database operations.
#[derive(Debug, Clone)]
pub struct QuotationRepository {
    pool: SqlitePool,
}

impl QuotationRepository {
    /// Creates a new QuotationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        QuotationRepository { pool }
    }

    /// Persists a quotation as one unit.
    ///
    /// First save allocates the customer code and quotation number;
    /// subsequent saves rewrite the tree under the existing number.
    /// Returns the persisted quotation (with its number populated).
    pub async fn save(&self, quotation: &Quotation) -> DbResult<Quotation> {
        validation::validate_quotation_name(&quotation.name).map_err(DbError::Validation)?;

        match &quotation.quotation_number {
            Some(number) => {
                retry_transient(|| self.rewrite_tree(quotation, number)).await?;
                info!(id = %quotation.id, number = %number, "Quotation updated");
                Ok(quotation.clone())
            }
            None => self.create(quotation).await,
        }
    }

    /// Create path: allocate the number and insert the tree, retrying
    /// with a freshly re-read count when the UNIQUE constraint reports
    /// a concurrent claim of the same number.
    async fn create(&self, quotation: &Quotation) -> DbResult<Quotation> {
        let sequences = SequenceAllocator::new(self.pool.clone());
        let code = sequences
            .allocate_customer_code(&quotation.customer_id)
            .await?;

        for attempt in 0..NUMBER_ATTEMPTS {
            let number = sequences
                .next_quotation_number(&quotation.customer_id, &code, attempt)
                .await?;

            match retry_transient(|| self.insert_tree(quotation, &number)).await {
                Ok(()) => {
                    info!(id = %quotation.id, number = %number, "Quotation created");
                    let mut saved = quotation.clone();
                    saved.quotation_number = Some(number);
                    return Ok(saved);
                }
                Err(e) if e.violates_unique("quotations.quotation_number") => {
                    warn!(
                        id = %quotation.id,
                        number = %number,
                        attempt,
                        "Quotation number taken, retrying with fresh count"
                    );
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Err(DbError::AllocationExhausted {
            attempts: NUMBER_ATTEMPTS,
            context: format!("quotation number for customer {}", quotation.customer_id),
        })
    }

    /// Inserts header, rooms, and items in one transaction.
    async fn insert_tree(&self, quotation: &Quotation, number: &str) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO quotations (
                id, customer_id, name, quotation_number, area_basis, columns_json,
                total_amount, total_margin_amount, total_margin_percent,
                distinct_products, total_containers, total_weight,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(&quotation.id)
        .bind(&quotation.customer_id)
        .bind(&quotation.name)
        .bind(number)
        .bind(quotation.area_basis)
        .bind(serde_json::to_string(&quotation.columns)?)
        .bind(quotation.total_amount)
        .bind(quotation.total_margin_amount)
        .bind(quotation.total_margin_percent)
        .bind(quotation.distinct_products as i64)
        .bind(quotation.total_containers)
        .bind(quotation.total_weight)
        .bind(quotation.created_at)
        .bind(chrono::Utc::now())
        .execute(&mut *tx)
        .await?;

        insert_rooms_and_items(&mut tx, quotation).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Update path: header rewritten, rooms/items replaced, one transaction.
    async fn rewrite_tree(&self, quotation: &Quotation, number: &str) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE quotations SET
                name = ?2, area_basis = ?3, columns_json = ?4,
                total_amount = ?5, total_margin_amount = ?6, total_margin_percent = ?7,
                distinct_products = ?8, total_containers = ?9, total_weight = ?10,
                updated_at = ?11
            WHERE id = ?1 AND quotation_number = ?12
            "#,
        )
        .bind(&quotation.id)
        .bind(&quotation.name)
        .bind(quotation.area_basis)
        .bind(serde_json::to_string(&quotation.columns)?)
        .bind(quotation.total_amount)
        .bind(quotation.total_margin_amount)
        .bind(quotation.total_margin_percent)
        .bind(quotation.distinct_products as i64)
        .bind(quotation.total_containers)
        .bind(quotation.total_weight)
        .bind(chrono::Utc::now())
        .bind(number)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Quotation", &quotation.id));
        }

        sqlx::query("DELETE FROM quotation_items WHERE quotation_id = ?1")
            .bind(&quotation.id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM quotation_rooms WHERE quotation_id = ?1")
            .bind(&quotation.id)
            .execute(&mut *tx)
            .await?;

        insert_rooms_and_items(&mut tx, quotation).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Loads the fully materialized tree with all stored derived fields,
    /// ready for read-only rendering without re-deriving anything.
    pub async fn load(&self, id: &str) -> DbResult<Option<Quotation>> {
        let header = sqlx::query_as::<_, QuotationRow>(
            r#"
            SELECT id, customer_id, name, quotation_number, area_basis, columns_json,
                   total_amount, total_margin_amount, total_margin_percent,
                   distinct_products, total_containers, total_weight,
                   created_at, updated_at
            FROM quotations WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(header) = header else {
            return Ok(None);
        };

        let room_rows = sqlx::query_as::<_, RoomRow>(
            r#"
            SELECT id, name, sort_order, room_total, room_margin_amount
            FROM quotation_rooms WHERE quotation_id = ?1
            ORDER BY sort_order
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let item_rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, room_id, sku_snapshot, quantity, discount_percent, area_needed,
                   sort_order, rate_per_area, price_per_box, amount,
                   cost_per_area, cost_per_box, total_cost, margin_amount, margin_percent
            FROM quotation_items WHERE quotation_id = ?1
            ORDER BY sort_order
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let columns: ColumnPrefs = serde_json::from_str(&header.columns_json)?;

        let mut rooms: Vec<Room> = room_rows
            .into_iter()
            .map(|r| Room {
                id: r.id,
                name: r.name,
                sort_order: r.sort_order,
                items: Vec::new(),
                room_total: r.room_total,
                room_margin_amount: r.room_margin_amount,
            })
            .collect();

        for row in item_rows {
            let room_id = row.room_id.clone();
            let item = row.into_line_item()?;
            if let Some(room) = rooms.iter_mut().find(|r| r.id == room_id) {
                room.items.push(item);
            }
        }

        debug!(id = %id, rooms = rooms.len(), "Quotation loaded");

        Ok(Some(Quotation {
            id: header.id,
            name: header.name,
            customer_id: header.customer_id,
            quotation_number: Some(header.quotation_number),
            area_basis: header.area_basis,
            columns,
            rooms,
            total_amount: header.total_amount,
            total_margin_amount: header.total_margin_amount,
            total_margin_percent: header.total_margin_percent,
            distinct_products: header.distinct_products as usize,
            total_containers: header.total_containers,
            total_weight: header.total_weight,
            created_at: header.created_at,
            updated_at: header.updated_at,
        }))
    }

    /// Summaries for the quotation list view, newest first.
    pub async fn list(&self) -> DbResult<Vec<QuotationSummary>> {
        let rows = sqlx::query_as::<_, QuotationSummary>(
            r#"
            SELECT q.id, q.name, q.quotation_number, q.customer_id,
                   c.name AS customer_name, q.total_amount, q.created_at
            FROM quotations q
            INNER JOIN customers c ON c.id = q.customer_id
            ORDER BY q.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Deletes a quotation and its tree (rooms/items cascade).
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM quotations WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Quotation", id));
        }

        Ok(())
    }
}

/// Inserts the room and item rows of a quotation inside the caller's
/// transaction.
async fn insert_rooms_and_items(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    quotation: &Quotation,
) -> DbResult<()> {
    for room in &quotation.rooms {
        sqlx::query(
            r#"
            INSERT INTO quotation_rooms (
                id, quotation_id, name, sort_order, room_total, room_margin_amount
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&room.id)
        .bind(&quotation.id)
        .bind(&room.name)
        .bind(room.sort_order)
        .bind(room.room_total)
        .bind(room.room_margin_amount)
        .execute(&mut **tx)
        .await?;

        for item in &room.items {
            let snapshot_json = match &item.sku {
                Some(sku) => Some(serde_json::to_string(sku)?),
                None => None,
            };

            sqlx::query(
                r#"
                INSERT INTO quotation_items (
                    id, room_id, quotation_id, sku_snapshot,
                    quantity, discount_percent, area_needed, sort_order,
                    rate_per_area, price_per_box, amount,
                    cost_per_area, cost_per_box, total_cost,
                    margin_amount, margin_percent
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
                "#,
            )
            .bind(&item.id)
            .bind(&room.id)
            .bind(&quotation.id)
            .bind(snapshot_json)
            .bind(item.quantity)
            .bind(item.discount_percent)
            .bind(item.area_needed)
            .bind(item.sort_order)
            .bind(item.derived.rate_per_area)
            .bind(item.derived.price_per_box)
            .bind(item.derived.amount)
            .bind(item.derived.cost_per_area)
            .bind(item.derived.cost_per_box)
            .bind(item.derived.total_cost)
            .bind(item.derived.margin_amount)
            .bind(item.derived.margin_percent)
            .execute(&mut **tx)
            .await?;
        }
    }

    Ok(())
}

/// Retries an operation on transient storage failures with doubling
/// backoff. Non-transient errors pass through on the first occurrence.
async fn retry_transient<T, Fut, F>(mut op: F) -> DbResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DbResult<T>>,
{
    let mut delay = Duration::from_millis(BACKOFF_BASE_MS);
    let mut attempt = 0;
    loop {
        match op().await {
            Err(e) if e.is_transient() && attempt < TRANSIENT_ATTEMPTS => {
                warn!(error = %e, attempt, "Transient storage failure, backing off");
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
            other => return other,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use quote_core::types::CostSettings;

    fn sku(id: &str) -> SkuSnapshot {
        SkuSnapshot {
            catalog_id: id.to_string(),
            name: "Forest Oak".to_string(),
            size: "600x1200".to_string(),
            surface: "Standard".to_string(),
            ex_factory_price: 50.0,
            mrp_per_area: 100.0,
            mrp_per_container: 1000.0,
            gst_percent: 18.0,
            insurance_percent: 1.0,
            actual_area_per_container: 10.0,
            billed_area_per_container: 10.5,
            weight: 28.0,
            freight: 0.0,
        }
    }

    fn settings() -> CostSettings {
        CostSettings {
            company_discount_percent: 5.0,
            freight_per_area: 2.0,
        }
    }

    fn quotation_for(customer_id: &str) -> Quotation {
        let mut q = Quotation::new(customer_id, "Site A");
        let room = q.rooms[0].id.clone();
        let item = q.add_item(&room, sku("c1"), 10.0, &settings()).unwrap();
        q.set_quantity(&room, &item, 3, &settings()).unwrap();
        q
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = db.customers().create("Sharma Interiors", None).await.unwrap();

        let q = quotation_for(&customer.id);
        let saved = db.quotations().save(&q).await.unwrap();
        assert_eq!(saved.quotation_number.as_deref(), Some("#QT0101A"));

        let loaded = db.quotations().load(&q.id).await.unwrap().unwrap();
        assert_eq!(loaded.quotation_number.as_deref(), Some("#QT0101A"));
        assert_eq!(loaded.rooms.len(), 1);
        assert_eq!(loaded.rooms[0].items.len(), 1);
        assert_eq!(loaded.rooms[0].items[0].quantity, 3);
        assert_eq!(loaded.total_amount.to_bits(), q.total_amount.to_bits());
        // Snapshot came back intact, not as a live lookup
        let snap = loaded.rooms[0].items[0].sku.as_ref().unwrap();
        assert_eq!(snap.catalog_id, "c1");
    }

    #[tokio::test]
    async fn test_sequential_numbers_per_customer() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = db.customers().create("Sharma Interiors", None).await.unwrap();

        let first = db.quotations().save(&quotation_for(&customer.id)).await.unwrap();
        let second = db.quotations().save(&quotation_for(&customer.id)).await.unwrap();

        assert_eq!(first.quotation_number.as_deref(), Some("#QT0101A"));
        assert_eq!(second.quotation_number.as_deref(), Some("#QT0101B"));
    }

    #[tokio::test]
    async fn test_concurrent_saves_never_share_a_number() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = db.customers().create("Sharma Interiors", None).await.unwrap();

        let qa = quotation_for(&customer.id);
        let qb = quotation_for(&customer.id);
        let repo_a = db.quotations();
        let repo_b = db.quotations();

        let (a, b) = tokio::join!(repo_a.save(&qa), repo_b.save(&qb));
        let a = a.unwrap().quotation_number.unwrap();
        let b = b.unwrap().quotation_number.unwrap();

        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_collision_retries_with_fresh_count() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = db.customers().create("Sharma Interiors", None).await.unwrap();

        let first = db.quotations().save(&quotation_for(&customer.id)).await.unwrap();
        db.quotations().save(&quotation_for(&customer.id)).await.unwrap();

        // Delete "A": the next count-based candidate is "B", which is taken,
        // so the allocator must walk forward instead of failing the save
        db.quotations().delete(&first.id).await.unwrap();
        let third = db.quotations().save(&quotation_for(&customer.id)).await.unwrap();

        assert_eq!(third.quotation_number.as_deref(), Some("#QT0101C"));
    }

    #[tokio::test]
    async fn test_update_keeps_number_and_rewrites_tree() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = db.customers().create("Sharma Interiors", None).await.unwrap();

        let saved = db.quotations().save(&quotation_for(&customer.id)).await.unwrap();

        let mut edited = saved.clone();
        let room = edited.rooms[0].id.clone();
        let item = edited.rooms[0].items[0].id.clone();
        edited.set_quantity(&room, &item, 7, &settings()).unwrap();
        let resaved = db.quotations().save(&edited).await.unwrap();

        assert_eq!(resaved.quotation_number, saved.quotation_number);

        let loaded = db.quotations().load(&edited.id).await.unwrap().unwrap();
        assert_eq!(loaded.rooms[0].items[0].quantity, 7);
        assert_eq!(loaded.rooms[0].items.len(), 1); // replaced, not appended
        assert_eq!(loaded.total_amount.to_bits(), edited.total_amount.to_bits());
    }

    #[tokio::test]
    async fn test_failed_save_leaves_no_orphan_header() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let q = quotation_for("no-such-customer");
        assert!(db.quotations().save(&q).await.is_err());

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotations")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_list_summaries() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = db.customers().create("Sharma Interiors", None).await.unwrap();
        db.quotations().save(&quotation_for(&customer.id)).await.unwrap();

        let list = db.quotations().list().await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].customer_name, "Sharma Interiors");
        assert_eq!(list[0].quotation_number, "#QT0101A");
        assert!(list[0].total_amount > 0.0);
    }
}
