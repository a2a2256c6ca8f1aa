use serde::{Deserialize, Serialize};

use crate::currency::Currency;

/// Unique catalog item identifier, stable for the life of the drop.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SkuId(pub String);

/// A purchasable catalog item with a fixed unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sku {
    pub id: SkuId,
    pub name: String,
    /// Secondary display line ("17 samples • Best intro").
    #[serde(default)]
    pub subtitle: String,
    /// Unit price in minor units.
    pub price: u64,
    /// Optional merchandising tag ("Popular", "Icon").
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub currency: Currency,
}

/// The fixed SKU list offered under one drop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub drop_slug: String,
    pub skus: Vec<Sku>,
}

impl Catalog {
    pub fn get(&self, id: &SkuId) -> Option<&Sku> {
        self.skus.iter().find(|s| &s.id == id)
    }

    pub fn price_of(&self, id: &SkuId) -> Option<u64> {
        self.get(id).map(|s| s.price)
    }
}
