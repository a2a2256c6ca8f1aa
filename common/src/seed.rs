//! Compiled-in seed data: the two curated launch drops and their catalogs.
//!
//! The server falls back to these rows when no snapshot exists; the UI's
//! demo mode renders them directly.

use crate::catalog::{Catalog, Sku, SkuId};
use crate::currency::Currency;
use crate::drop::{Drop, DropId};

/// Prefix for the per-drop demo counters in browser storage.
const RAISED_KEY_PREFIX: &str = "groupdrop:raised:";

/// Stable storage key for a drop's demo-mode counter.
pub fn raised_storage_key(slug: &str) -> String {
    format!("{RAISED_KEY_PREFIX}{slug}")
}

/// Inverse of [`raised_storage_key`], for storage change notifications.
pub fn slug_for_storage_key(key: &str) -> Option<&str> {
    key.strip_prefix(RAISED_KEY_PREFIX)
}

pub fn seed_drops() -> Vec<Drop> {
    vec![
        Drop {
            id: DropId("drop-aesop".into()),
            slug: "aesop".into(),
            title: "Aesop Hand Wash Bundle".into(),
            target: 500_000,
            raised: 310_000,
            closes_at: None,
            currency: Currency::Usd,
        },
        Drop {
            id: DropId("drop-lelabo".into()),
            slug: "lelabo".into(),
            title: "Le Labo Discovery Set".into(),
            target: 750_000,
            raised: 90_000,
            closes_at: None,
            currency: Currency::Usd,
        },
    ]
}

pub fn seed_catalogs() -> Vec<Catalog> {
    vec![
        Catalog {
            drop_slug: "aesop".into(),
            skus: vec![
                sku("aesop-1", "Aesop Resurrection Hand Wash", "500mL", 4_500, None),
                sku("aesop-2", "Aesop Resurrection Hand Balm", "75mL", 3_300, None),
                sku("aesop-3", "Aesop Hand Care Duo", "Bundle", 7_200, Some("Bundle")),
            ],
        },
        Catalog {
            drop_slug: "lelabo".into(),
            skus: vec![
                sku("discovery-set", "Discovery Set", "17 samples • Best intro", 7_900, Some("Popular")),
                sku("santal-33", "Santal 33", "15mL • Travel spray", 8_900, Some("Icon")),
                sku("another-13", "Another 13", "15mL • Travel spray", 8_900, None),
                sku("the-matcha-26", "Thé Matcha 26", "15mL • Travel spray", 8_900, None),
                sku("hand-pomade", "Hand Pomade", "55mL • Light hydration", 2_900, None),
                sku("shipping-protection", "Shipping Protection", "Optional • Peace of mind", 400, None),
            ],
        },
    ]
}

fn sku(id: &str, name: &str, subtitle: &str, price: u64, tag: Option<&str>) -> Sku {
    Sku {
        id: SkuId(id.into()),
        name: name.into(),
        subtitle: subtitle.into(),
        price,
        tag: tag.map(Into::into),
        currency: Currency::Usd,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_drop_has_a_catalog() {
        let drops = seed_drops();
        let catalogs = seed_catalogs();
        for d in &drops {
            assert!(
                catalogs.iter().any(|c| c.drop_slug == d.slug),
                "no catalog for '{}'",
                d.slug
            );
        }
    }

    #[test]
    fn seed_drops_start_below_target() {
        for d in seed_drops() {
            assert!(d.raised < d.target, "'{}' seeds already funded", d.slug);
        }
    }

    #[test]
    fn storage_keys_roundtrip() {
        let key = raised_storage_key("aesop");
        assert_eq!(key, "groupdrop:raised:aesop");
        assert_eq!(slug_for_storage_key(&key), Some("aesop"));
        assert_eq!(slug_for_storage_key("unrelated"), None);
    }
}
