//! Order builder: per-item ticket quantities and the derived order total.
//!
//! A [`SelectionState`] is the draft a user builds on the checkout screen
//! before confirming. It is created empty, changed only through the quantity
//! operations below and thrown away after a successful checkout.
//!
//! Every input is sanitised rather than rejected:
//!
//! - requested quantities below zero are stored as zero
//! - ids missing from the catalog may be stored but add nothing to the total
//!
//! ```
//! use ticketing::{Catalog, CatalogItem, ItemId, Money, SelectionState};
//!
//! let catalog: Catalog = [
//!     CatalogItem::new("1", "General Admission", Money::from_cents(299)),
//!     CatalogItem::new("2", "VIP Access", Money::from_cents(599)),
//! ]
//! .into_iter()
//! .collect();
//!
//! let mut selection = SelectionState::new();
//! selection.increment_quantity(&ItemId::from("1"));
//! selection.increment_quantity(&ItemId::from("1"));
//! selection.decrement_quantity(&ItemId::from("2"));
//!
//! assert_eq!(selection.current_quantity(&ItemId::from("2")), 0);
//! assert_eq!(selection.compute_total(&catalog), Money::from_cents(598));
//! ```

use crate::catalog::{Catalog, CatalogItem};
use crate::types::{ItemId, Money};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One priced line of an order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Ticket tier
    pub item_id: ItemId,
    /// Tier name at the time of ordering
    pub name: String,
    /// Units selected (always positive)
    pub quantity: u32,
    /// Price of one unit
    pub unit_price: Money,
    /// `quantity * unit_price`
    pub subtotal: Money,
}

impl OrderLine {
    fn priced(item: &CatalogItem, quantity: u32) -> Self {
        Self {
            item_id: item.id.clone(),
            name: item.name.clone(),
            quantity,
            unit_price: item.unit_price,
            subtotal: item.unit_price.saturating_multiply(quantity),
        }
    }
}

/// Quantities the user has selected, keyed by catalog item id
///
/// An id with no entry has quantity zero. Stored zeros are treated exactly
/// like absent entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    quantities: HashMap<ItemId, u32>,
}

impl SelectionState {
    /// Creates an empty selection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the quantity for `item_id` with `max(0, requested)`
    ///
    /// Requests above `u32::MAX` are stored as `u32::MAX`. No other entry is
    /// touched and unknown ids are accepted.
    pub fn set_quantity(&mut self, item_id: &ItemId, requested: i64) {
        let quantity = u32::try_from(requested.max(0)).unwrap_or(u32::MAX);
        self.quantities.insert(item_id.clone(), quantity);
    }

    /// Adds one unit of `item_id`
    pub fn increment_quantity(&mut self, item_id: &ItemId) {
        let current = i64::from(self.current_quantity(item_id));
        self.set_quantity(item_id, current + 1);
    }

    /// Removes one unit of `item_id`, stopping at zero
    pub fn decrement_quantity(&mut self, item_id: &ItemId) {
        let current = i64::from(self.current_quantity(item_id));
        self.set_quantity(item_id, current - 1);
    }

    /// Stored quantity for `item_id`, or zero
    #[must_use]
    pub fn current_quantity(&self, item_id: &ItemId) -> u32 {
        self.quantities.get(item_id).copied().unwrap_or(0)
    }

    /// Sum of `quantity * unit_price` over the selected items known to `catalog`
    ///
    /// Ids the catalog does not know contribute nothing. Arithmetic is exact
    /// in cents and saturates at `u64::MAX` instead of wrapping.
    #[must_use]
    pub fn compute_total(&self, catalog: &Catalog) -> Money {
        self.quantities
            .iter()
            .filter(|(_, quantity)| **quantity > 0)
            .filter_map(|(item_id, quantity)| {
                catalog
                    .get(item_id)
                    .map(|item| item.unit_price.saturating_multiply(*quantity))
            })
            .sum()
    }

    /// Priced lines for every positive quantity the catalog knows, in catalog order
    #[must_use]
    pub fn order_lines(&self, catalog: &Catalog) -> Vec<OrderLine> {
        catalog
            .iter()
            .filter_map(|item| match self.current_quantity(&item.id) {
                0 => None,
                quantity => Some(OrderLine::priced(item, quantity)),
            })
            .collect()
    }

    /// Total units selected across all ids, known or not
    #[must_use]
    pub fn total_units(&self) -> u64 {
        self.quantities.values().map(|q| u64::from(*q)).sum()
    }

    /// Whether no id has a positive quantity
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quantities.values().all(|quantity| *quantity == 0)
    }

    /// Discards every entry
    pub fn clear(&mut self) {
        self.quantities.clear();
    }
}
