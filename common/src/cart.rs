use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Sku, SkuId};

/// A visitor's cart: SKU id -> quantity.
///
/// Zero-quantity lines are never stored; decrementing removes a line when it
/// empties, and decrementing an absent line is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: BTreeMap<SkuId, u32>,
}

/// One quantity > 0 cart line joined against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine<'a> {
    pub sku: &'a Sku,
    pub quantity: u32,
    pub line_total: u64,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quantity(&self, id: &SkuId) -> u32 {
        self.lines.get(id).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, id: &SkuId) {
        let qty = self.lines.entry(id.clone()).or_insert(0);
        *qty = qty.saturating_add(1);
    }

    /// Floors at zero; an emptied line is removed rather than kept at 0.
    pub fn decrement(&mut self, id: &SkuId) {
        if let Some(qty) = self.lines.get_mut(id) {
            *qty = qty.saturating_sub(1);
            if *qty == 0 {
                self.lines.remove(id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Cart total in minor units. SKUs missing from the catalog contribute
    /// nothing.
    pub fn total(&self, catalog: &Catalog) -> u64 {
        self.lines
            .iter()
            .filter_map(|(id, qty)| catalog.price_of(id).map(|price| price * *qty as u64))
            .sum()
    }

    /// The quantity > 0 lines with per-line totals, for the cart summary.
    pub fn line_items<'a>(&self, catalog: &'a Catalog) -> Vec<CartLine<'a>> {
        self.lines
            .iter()
            .filter_map(|(id, qty)| {
                catalog.get(id).map(|sku| CartLine {
                    sku,
                    quantity: *qty,
                    line_total: sku.price * *qty as u64,
                })
            })
            .collect()
    }
}
