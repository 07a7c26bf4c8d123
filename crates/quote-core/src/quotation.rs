//! # Quotation Tree
//!
//! The Quotation → Room → LineItem tree and every mutation it supports.
//!
//! ## Totals Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Totals Stay Consistent                           │
//! │                                                                         │
//! │  Every mutation ends with recompute_totals():                          │
//! │                                                                         │
//! │    items ──fold──► room_total ──fold──► total_amount                   │
//! │          ──fold──► room_margin ──fold──► total_margin_amount           │
//! │                                                                         │
//! │  Parent sums are NEVER patched incrementally. A full fold over the     │
//! │  then-current children cannot drift, no matter which mutation path     │
//! │  produced the tree.                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Basis Asymmetry
//! Switching the quotation's area basis does NOT rewrite stored line
//! amounts — those were fixed by whichever basis was active when the item
//! was last edited. The new basis applies to subsequent edits and
//! additions only. Repricing happens exclusively inside the edit
//! operations, and the totals fold reads stored amounts, so this falls
//! out of the structure rather than being special-cased.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::pricing::{self, PriceBreakdown};
use crate::types::{AreaBasis, ColumnPrefs, CostSettings, SkuSnapshot};

// =============================================================================
// Line Item
// =============================================================================

/// One priced product line inside a room.
///
/// `sku` is a frozen snapshot, not a live catalog reference. The derived
/// block is always the output of the pricing engine for the editable
/// fields + snapshot; it is never mutated independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: String,

    /// Frozen catalog snapshot. An item can briefly exist without one
    /// (e.g. a row restored from a partial import); every pricing
    /// mutation on such an item is a no-op.
    pub sku: Option<SkuSnapshot>,

    /// Whole containers, ≥ 1.
    pub quantity: i64,

    /// Customer-facing discount off MRP (0-100).
    pub discount_percent: f64,

    /// Optional alternate input: desired coverage area. When set, the
    /// quantity was derived from it via the ceiling rule.
    pub area_needed: Option<f64>,

    /// Position within the room.
    pub sort_order: i64,

    /// Derived figures (flattened from the engine's breakdown).
    #[serde(flatten)]
    pub derived: PriceBreakdown,
}

impl LineItem {
    /// Line amount shorthand used by the folds.
    #[inline]
    pub fn amount(&self) -> f64 {
        self.derived.amount
    }

    #[inline]
    pub fn margin_amount(&self) -> f64 {
        self.derived.margin_amount
    }
}

// =============================================================================
// Room
// =============================================================================

/// A named grouping of line items (a physical room or an arbitrary
/// section of the quotation).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub name: String,
    pub sort_order: i64,
    pub items: Vec<LineItem>,

    /// Derived: Σ item amount.
    pub room_total: f64,
    /// Derived: Σ item margin amount.
    pub room_margin_amount: f64,
}

impl Room {
    fn new(name: impl Into<String>, sort_order: i64) -> Self {
        Room {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            sort_order,
            items: Vec::new(),
            room_total: 0.0,
            room_margin_amount: 0.0,
        }
    }

    fn item_mut(&mut self, item_id: &str) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|i| i.id == item_id)
    }
}

// =============================================================================
// Quotation
// =============================================================================

/// Direction for reordering an item within its room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Up,
    Down,
}

/// A full quotation: rooms of priced line items plus derived totals.
///
/// Authored entirely in memory; `quotation_number` stays `None` until the
/// persistence layer allocates one on first save.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    pub id: String,
    pub name: String,
    pub customer_id: String,

    /// Externally visible number ("#QT0101A"), assigned at persistence.
    pub quotation_number: Option<String>,

    /// Which area-per-container figure subsequent edits use.
    pub area_basis: AreaBasis,

    /// Display preferences for rendered output.
    pub columns: ColumnPrefs,

    pub rooms: Vec<Room>,

    // Derived totals - recomputed after every mutation
    pub total_amount: f64,
    pub total_margin_amount: f64,
    pub total_margin_percent: f64,

    // Auxiliary rollups - same discipline, folded over the leaf set
    pub distinct_products: usize,
    pub total_containers: i64,
    pub total_weight: f64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quotation {
    /// Creates an empty quotation with one default room.
    pub fn new(customer_id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Quotation {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            customer_id: customer_id.into(),
            quotation_number: None,
            area_basis: AreaBasis::default(),
            columns: ColumnPrefs::default(),
            rooms: vec![Room::new("Room 1", 0)],
            total_amount: 0.0,
            total_margin_amount: 0.0,
            total_margin_percent: 0.0,
            distinct_products: 0,
            total_containers: 0,
            total_weight: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    // -------------------------------------------------------------------------
    // Room operations
    // -------------------------------------------------------------------------

    /// Appends a new room ("Room N") and returns its id.
    pub fn add_room(&mut self) -> String {
        let sort_order = self.rooms.len() as i64;
        let room = Room::new(format!("Room {}", self.rooms.len() + 1), sort_order);
        let id = room.id.clone();
        self.rooms.push(room);
        id
    }

    /// Removes a room. The last remaining room cannot be removed.
    pub fn remove_room(&mut self, room_id: &str) -> CoreResult<()> {
        if self.rooms.len() <= 1 {
            return Err(CoreError::LastRoom);
        }
        let idx = self.room_index(room_id)?;
        self.rooms.remove(idx);
        for (i, room) in self.rooms.iter_mut().enumerate() {
            room.sort_order = i as i64;
        }
        self.recompute_totals();
        Ok(())
    }

    /// Renames a room.
    pub fn rename_room(&mut self, room_id: &str, name: impl Into<String>) -> CoreResult<()> {
        let name = name.into();
        crate::validation::validate_room_name(&name)?;
        self.room_mut(room_id)?.name = name;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Item operations
    // -------------------------------------------------------------------------

    /// Adds a line item built from a resolved snapshot, quantity 1, at the
    /// end of the room. Returns the new item's id.
    pub fn add_item(
        &mut self,
        room_id: &str,
        sku: SkuSnapshot,
        default_discount: f64,
        settings: &CostSettings,
    ) -> CoreResult<String> {
        let basis = self.area_basis;
        let room = self.room_mut(room_id)?;

        let mut item = LineItem {
            id: Uuid::new_v4().to_string(),
            sku: Some(sku),
            quantity: 1,
            discount_percent: default_discount.clamp(0.0, 100.0),
            area_needed: None,
            sort_order: room.items.len() as i64,
            derived: PriceBreakdown::default(),
        };
        reprice(&mut item, basis, settings);

        let id = item.id.clone();
        room.items.push(item);
        self.recompute_totals();
        Ok(id)
    }

    /// Sets the container count for an item (clamped to ≥ 1) and reprices.
    pub fn set_quantity(
        &mut self,
        room_id: &str,
        item_id: &str,
        quantity: i64,
        settings: &CostSettings,
    ) -> CoreResult<()> {
        let basis = self.area_basis;
        let item = self.item_mut(room_id, item_id)?;
        if item.sku.is_none() {
            return Ok(()); // cannot price what has no catalog reference
        }

        item.quantity = quantity.max(1);
        reprice(item, basis, settings);
        self.recompute_totals();
        Ok(())
    }

    /// Derives the container count from a coverage area via the ceiling
    /// rule, then proceeds as `set_quantity`.
    pub fn set_area_needed(
        &mut self,
        room_id: &str,
        item_id: &str,
        area: f64,
        settings: &CostSettings,
    ) -> CoreResult<()> {
        let basis = self.area_basis;
        let item = self.item_mut(room_id, item_id)?;
        let Some(sku) = &item.sku else {
            return Ok(());
        };

        let derived = pricing::containers_for_area(area, sku.area_per_container(basis));
        item.area_needed = Some(area);
        item.quantity = derived.max(1);
        reprice(item, basis, settings);
        self.recompute_totals();
        Ok(())
    }

    /// Sets the customer discount (clamped to 0-100) and reprices.
    pub fn set_discount(
        &mut self,
        room_id: &str,
        item_id: &str,
        discount_percent: f64,
        settings: &CostSettings,
    ) -> CoreResult<()> {
        let basis = self.area_basis;
        let item = self.item_mut(room_id, item_id)?;
        if item.sku.is_none() {
            return Ok(());
        }

        item.discount_percent = discount_percent.clamp(0.0, 100.0);
        reprice(item, basis, settings);
        self.recompute_totals();
        Ok(())
    }

    /// Removes an item from a room.
    pub fn remove_item(&mut self, room_id: &str, item_id: &str) -> CoreResult<()> {
        let room = self.room_mut(room_id)?;
        let before = room.items.len();
        room.items.retain(|i| i.id != item_id);
        if room.items.len() == before {
            return Err(CoreError::ItemNotFound(item_id.to_string()));
        }
        for (i, item) in room.items.iter_mut().enumerate() {
            item.sort_order = i as i64;
        }
        self.recompute_totals();
        Ok(())
    }

    /// Swaps an item with its adjacent sibling. Order-only: totals are
    /// untouched, so no recompute is needed.
    pub fn move_item(
        &mut self,
        room_id: &str,
        item_id: &str,
        direction: MoveDirection,
    ) -> CoreResult<()> {
        let room = self.room_mut(room_id)?;
        let idx = room
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| CoreError::ItemNotFound(item_id.to_string()))?;

        let target = match direction {
            MoveDirection::Up if idx > 0 => idx - 1,
            MoveDirection::Down if idx + 1 < room.items.len() => idx + 1,
            _ => return Ok(()), // already at the edge
        };

        room.items.swap(idx, target);
        room.items[idx].sort_order = idx as i64;
        room.items[target].sort_order = target as i64;
        Ok(())
    }

    /// Relocates an item to the end of another room. Both rooms' totals
    /// are re-derived by the closing fold.
    pub fn move_item_to_room(
        &mut self,
        from_room_id: &str,
        item_id: &str,
        to_room_id: &str,
    ) -> CoreResult<()> {
        if from_room_id == to_room_id {
            return Ok(());
        }
        self.room_index(to_room_id)?; // destination must exist before we detach

        let from = self.room_mut(from_room_id)?;
        let idx = from
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| CoreError::ItemNotFound(item_id.to_string()))?;
        let mut item = from.items.remove(idx);
        for (i, it) in from.items.iter_mut().enumerate() {
            it.sort_order = i as i64;
        }

        let to = self.room_mut(to_room_id)?;
        item.sort_order = to.items.len() as i64;
        to.items.push(item);

        self.recompute_totals();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Quotation-level operations
    // -------------------------------------------------------------------------

    /// Changes which area figure subsequent edits use. Stored line
    /// amounts are intentionally NOT rewritten (see module docs).
    pub fn set_area_basis(&mut self, basis: AreaBasis) {
        self.area_basis = basis;
    }

    pub fn set_column_prefs(&mut self, columns: ColumnPrefs) {
        self.columns = columns;
    }

    /// Produces a conceptual new revision: fresh ids throughout, no
    /// persisted number, quantities re-derived from base state (area
    /// inputs where present) and everything repriced with the current
    /// settings and basis.
    pub fn duplicate(&self, settings: &CostSettings) -> Quotation {
        let now = Utc::now();
        let mut copy = self.clone();
        copy.id = Uuid::new_v4().to_string();
        copy.quotation_number = None;
        copy.created_at = now;
        copy.updated_at = now;

        for room in &mut copy.rooms {
            room.id = Uuid::new_v4().to_string();
            for item in &mut room.items {
                item.id = Uuid::new_v4().to_string();
                let Some(sku) = &item.sku else { continue };
                if let Some(area) = item.area_needed {
                    let qty =
                        pricing::containers_for_area(area, sku.area_per_container(copy.area_basis));
                    item.quantity = qty.max(1);
                }
                reprice(item, copy.area_basis, settings);
            }
        }
        copy.recompute_totals();
        copy
    }

    // -------------------------------------------------------------------------
    // Totals
    // -------------------------------------------------------------------------

    /// Re-derives every total bottom-up from the current leaves.
    ///
    /// Idempotent: running it twice on an unchanged tree is bit-identical.
    pub fn recompute_totals(&mut self) {
        for room in &mut self.rooms {
            room.room_total = room.items.iter().map(LineItem::amount).sum();
            room.room_margin_amount = room.items.iter().map(LineItem::margin_amount).sum();
        }

        self.total_amount = self.rooms.iter().map(|r| r.room_total).sum();
        self.total_margin_amount = self.rooms.iter().map(|r| r.room_margin_amount).sum();
        self.total_margin_percent =
            pricing::margin_percent(self.total_margin_amount, self.total_amount);

        let mut products: HashSet<&str> = HashSet::new();
        let mut containers = 0_i64;
        let mut weight = 0.0_f64;
        for item in self.rooms.iter().flat_map(|r| r.items.iter()) {
            containers += item.quantity;
            if let Some(sku) = &item.sku {
                products.insert(sku.catalog_id.as_str());
                weight += sku.weight * item.quantity as f64;
            }
        }
        self.distinct_products = products.len();
        self.total_containers = containers;
        self.total_weight = weight;
    }

    // -------------------------------------------------------------------------
    // Lookup helpers
    // -------------------------------------------------------------------------

    fn room_index(&self, room_id: &str) -> CoreResult<usize> {
        self.rooms
            .iter()
            .position(|r| r.id == room_id)
            .ok_or_else(|| CoreError::RoomNotFound(room_id.to_string()))
    }

    fn room_mut(&mut self, room_id: &str) -> CoreResult<&mut Room> {
        self.rooms
            .iter_mut()
            .find(|r| r.id == room_id)
            .ok_or_else(|| CoreError::RoomNotFound(room_id.to_string()))
    }

    fn item_mut(&mut self, room_id: &str, item_id: &str) -> CoreResult<&mut LineItem> {
        self.room_mut(room_id)?
            .item_mut(item_id)
            .ok_or_else(|| CoreError::ItemNotFound(item_id.to_string()))
    }
}

/// Runs the pricing engine and writes the derived block. No-op for items
/// without a snapshot.
fn reprice(item: &mut LineItem, basis: AreaBasis, settings: &CostSettings) {
    if let Some(sku) = &item.sku {
        item.derived = pricing::price_line(
            sku,
            item.quantity,
            item.discount_percent,
            settings,
            basis,
        );
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sku(id: &str, mrp: f64) -> SkuSnapshot {
        SkuSnapshot {
            catalog_id: id.to_string(),
            name: format!("Tile {}", id),
            size: "600x1200".to_string(),
            surface: "Standard".to_string(),
            ex_factory_price: 50.0,
            mrp_per_area: mrp,
            mrp_per_container: 0.0,
            gst_percent: 18.0,
            insurance_percent: 1.0,
            actual_area_per_container: 10.0,
            billed_area_per_container: 12.0,
            weight: 25.0,
            freight: 0.0,
        }
    }

    fn settings() -> CostSettings {
        CostSettings {
            company_discount_percent: 5.0,
            freight_per_area: 2.0,
        }
    }

    fn totals_are_consistent(q: &Quotation) -> bool {
        let room_sum: f64 = q.rooms.iter().map(|r| r.room_total).sum();
        let item_sum: f64 = q
            .rooms
            .iter()
            .flat_map(|r| r.items.iter())
            .map(LineItem::amount)
            .sum();
        (q.total_amount - room_sum).abs() < 1e-9 && (room_sum - item_sum).abs() < 1e-9
    }

    #[test]
    fn test_new_quotation_has_one_room() {
        let q = Quotation::new("cust-1", "Site A");
        assert_eq!(q.rooms.len(), 1);
        assert_eq!(q.rooms[0].name, "Room 1");
        assert_eq!(q.total_amount, 0.0);
    }

    #[test]
    fn test_totals_consistent_after_mutation_sequence() {
        let mut q = Quotation::new("cust-1", "Site A");
        let room_a = q.rooms[0].id.clone();
        let room_b = q.add_room();

        let i1 = q.add_item(&room_a, sku("c1", 100.0), 10.0, &settings()).unwrap();
        let i2 = q.add_item(&room_a, sku("c2", 80.0), 0.0, &settings()).unwrap();
        let i3 = q.add_item(&room_b, sku("c3", 120.0), 5.0, &settings()).unwrap();

        q.set_quantity(&room_a, &i1, 4, &settings()).unwrap();
        q.set_discount(&room_a, &i2, 15.0, &settings()).unwrap();
        q.set_area_needed(&room_b, &i3, 57.0, &settings()).unwrap();
        q.remove_item(&room_a, &i2).unwrap();

        assert!(totals_are_consistent(&q));
        assert_eq!(q.distinct_products, 2);
        assert!(q.total_weight > 0.0);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut q = Quotation::new("cust-1", "Site A");
        let room = q.rooms[0].id.clone();
        q.add_item(&room, sku("c1", 100.0), 7.5, &settings()).unwrap();

        q.recompute_totals();
        let first = (q.total_amount, q.total_margin_amount, q.total_margin_percent);
        q.recompute_totals();
        let second = (q.total_amount, q.total_margin_amount, q.total_margin_percent);

        assert_eq!(first.0.to_bits(), second.0.to_bits());
        assert_eq!(first.1.to_bits(), second.1.to_bits());
        assert_eq!(first.2.to_bits(), second.2.to_bits());
    }

    #[test]
    fn test_margin_percent_zero_when_amount_zero() {
        let mut q = Quotation::new("cust-1", "Site A");
        let room = q.rooms[0].id.clone();
        let item = q.add_item(&room, sku("c1", 100.0), 0.0, &settings()).unwrap();
        q.set_discount(&room, &item, 100.0, &settings()).unwrap();

        assert_eq!(q.total_amount, 0.0);
        assert_eq!(q.total_margin_percent, 0.0);
    }

    #[test]
    fn test_move_item_between_rooms_preserves_grand_total() {
        let mut q = Quotation::new("cust-1", "Site A");
        let room_a = q.rooms[0].id.clone();
        let room_b = q.add_room();

        let i1 = q.add_item(&room_a, sku("c1", 100.0), 10.0, &settings()).unwrap();
        q.add_item(&room_a, sku("c2", 80.0), 0.0, &settings()).unwrap();
        q.set_quantity(&room_a, &i1, 3, &settings()).unwrap();

        let before_grand = q.total_amount;
        let before_a = q.rooms[0].room_total;

        q.move_item_to_room(&room_a, &i1, &room_b).unwrap();

        assert_eq!(q.total_amount.to_bits(), before_grand.to_bits());
        assert!(q.rooms[0].room_total < before_a);
        assert_eq!(q.rooms[1].room_total, before_a - q.rooms[0].room_total);
        assert!(totals_are_consistent(&q));
    }

    #[test]
    fn test_area_basis_switch_is_not_retroactive() {
        let mut q = Quotation::new("cust-1", "Site A");
        let room = q.rooms[0].id.clone();
        let item = q.add_item(&room, sku("c1", 100.0), 0.0, &settings()).unwrap();

        // Priced under Actual (apc 10): 1 × 100 × 10
        assert_eq!(q.rooms[0].items[0].derived.amount, 1000.0);

        q.set_area_basis(AreaBasis::Billed);
        // Stored amount untouched by the flag flip
        assert_eq!(q.rooms[0].items[0].derived.amount, 1000.0);

        // The next edit picks up the new basis (apc 12): 2 × 100 × 12
        q.set_quantity(&room, &item, 2, &settings()).unwrap();
        assert_eq!(q.rooms[0].items[0].derived.amount, 2400.0);
    }

    #[test]
    fn test_set_area_needed_uses_ceiling_rule_and_clamps() {
        let mut q = Quotation::new("cust-1", "Site A");
        let room = q.rooms[0].id.clone();
        let item = q.add_item(&room, sku("c1", 100.0), 0.0, &settings()).unwrap();

        // 57 area / 10 per container = 5.7 → rounds up to 6
        q.set_area_needed(&room, &item, 57.0, &settings()).unwrap();
        assert_eq!(q.rooms[0].items[0].quantity, 6);
        assert_eq!(q.rooms[0].items[0].area_needed, Some(57.0));

        // 50.5 / 10 = 5.05 → within tolerance, rounds down to 5
        q.set_area_needed(&room, &item, 50.5, &settings()).unwrap();
        assert_eq!(q.rooms[0].items[0].quantity, 5);

        // Tiny area derives 0 containers → clamped to the 1 minimum
        q.set_area_needed(&room, &item, 0.5, &settings()).unwrap();
        assert_eq!(q.rooms[0].items[0].quantity, 1);
    }

    #[test]
    fn test_mutation_without_snapshot_is_noop() {
        let mut q = Quotation::new("cust-1", "Site A");
        let room = q.rooms[0].id.clone();
        let item = q.add_item(&room, sku("c1", 100.0), 0.0, &settings()).unwrap();
        q.rooms[0].items[0].sku = None;

        let before = q.rooms[0].items[0].quantity;
        q.set_quantity(&room, &item, 9, &settings()).unwrap();
        q.set_discount(&room, &item, 50.0, &settings()).unwrap();
        q.set_area_needed(&room, &item, 200.0, &settings()).unwrap();

        assert_eq!(q.rooms[0].items[0].quantity, before);
        assert_eq!(q.rooms[0].items[0].discount_percent, 0.0);
    }

    #[test]
    fn test_quantity_clamped_to_minimum_one() {
        let mut q = Quotation::new("cust-1", "Site A");
        let room = q.rooms[0].id.clone();
        let item = q.add_item(&room, sku("c1", 100.0), 0.0, &settings()).unwrap();

        q.set_quantity(&room, &item, 0, &settings()).unwrap();
        assert_eq!(q.rooms[0].items[0].quantity, 1);
        q.set_quantity(&room, &item, -5, &settings()).unwrap();
        assert_eq!(q.rooms[0].items[0].quantity, 1);
    }

    #[test]
    fn test_remove_last_room_blocked() {
        let mut q = Quotation::new("cust-1", "Site A");
        let only = q.rooms[0].id.clone();
        assert!(matches!(q.remove_room(&only), Err(CoreError::LastRoom)));

        let second = q.add_room();
        q.remove_room(&second).unwrap();
        assert_eq!(q.rooms.len(), 1);
    }

    #[test]
    fn test_move_item_swaps_neighbors_only() {
        let mut q = Quotation::new("cust-1", "Site A");
        let room = q.rooms[0].id.clone();
        let i1 = q.add_item(&room, sku("c1", 100.0), 0.0, &settings()).unwrap();
        let i2 = q.add_item(&room, sku("c2", 80.0), 0.0, &settings()).unwrap();

        // Up at the top edge is a no-op
        q.move_item(&room, &i1, MoveDirection::Up).unwrap();
        assert_eq!(q.rooms[0].items[0].id, i1);

        q.move_item(&room, &i2, MoveDirection::Up).unwrap();
        assert_eq!(q.rooms[0].items[0].id, i2);
        assert_eq!(q.rooms[0].items[0].sort_order, 0);
        assert_eq!(q.rooms[0].items[1].sort_order, 1);
    }

    #[test]
    fn test_duplicate_is_a_fresh_revision() {
        let mut q = Quotation::new("cust-1", "Site A");
        let room = q.rooms[0].id.clone();
        let item = q.add_item(&room, sku("c1", 100.0), 10.0, &settings()).unwrap();
        q.set_area_needed(&room, &item, 57.0, &settings()).unwrap();
        q.quotation_number = Some("#QT0101A".to_string());

        let copy = q.duplicate(&settings());

        assert_ne!(copy.id, q.id);
        assert_eq!(copy.quotation_number, None);
        assert_ne!(copy.rooms[0].id, q.rooms[0].id);
        assert_ne!(copy.rooms[0].items[0].id, item);
        // Quantity re-derived from the stored area input
        assert_eq!(copy.rooms[0].items[0].quantity, 6);
        assert_eq!(copy.total_amount.to_bits(), q.total_amount.to_bits());
    }
}
