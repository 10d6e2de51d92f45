//! # Catalog
//!
//! The built-in, immutable product catalog.
//!
//! The catalog is constructed once at startup and never mutated; carts and
//! transactions hold clones of its entries.

use std::collections::BTreeMap;

use crate::credits::Credits;
use crate::types::{CatalogItem, Category};

/// An ordered, immutable list of catalog items.
///
/// Order matters: it is the tie-break order for sorted views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Builds a catalog from an explicit item list.
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Catalog { items }
    }

    /// The storefront's eight built-in items.
    pub fn builtin() -> Self {
        Catalog::new(vec![
            item(
                1,
                "M-179 ACHILLES",
                Category::Weapon,
                12_500,
                "https://images.unsplash.com/photo-1595590424283-b8f17842773f?q=80&w=2070&auto=format&fit=crop",
                &[("damage", "350-420"), ("rpm", "600"), ("weight", "4.5kg")],
            ),
            item(
                2,
                "ARASAKA MK.IV",
                Category::Implant,
                45_000,
                "https://images.unsplash.com/photo-1550751827-4bd374c3f58b?q=80&w=2070&auto=format&fit=crop",
                &[("slot", "Cortex"), ("ram", "+4"), ("cooldown", "-15%")],
            ),
            item(
                3,
                "OPTICAL CAMO",
                Category::Gear,
                8_500,
                "https://images.unsplash.com/photo-1535378437327-b71494669e9d?q=80&w=2070&auto=format&fit=crop",
                &[("duration", "15s"), ("visibility", "0%"), ("recharge", "45s")],
            ),
            item(
                4,
                "MONOWIRE",
                Category::Weapon,
                22_000,
                "https://images.unsplash.com/photo-1542751371-adc38448a05e?q=80&w=2070&auto=format&fit=crop",
                &[("damage", "280"), ("reach", "5m"), ("speed", "Very Fast")],
            ),
            item(
                5,
                "KERENZIKOV",
                Category::Implant,
                32_000,
                "https://images.unsplash.com/photo-1511512578047-dfb367046420?q=80&w=2071&auto=format&fit=crop",
                &[("slowmo", "90%"), ("duration", "3.5s"), ("reflex", "+5")],
            ),
            item(
                6,
                "TITANIUM BONES",
                Category::Implant,
                15_000,
                "https://images.unsplash.com/photo-1589254065878-42c9da997008?q=80&w=2070&auto=format&fit=crop",
                &[("capacity", "+60%"), ("armor", "+200"), ("fall_dmg", "-40%")],
            ),
            item(
                7,
                "UNITY",
                Category::Weapon,
                4_500,
                "https://images.unsplash.com/photo-1585562104172-79949987c64c?q=80&w=2070&auto=format&fit=crop",
                &[("damage", "80-100"), ("rpm", "350"), ("slots", "2")],
            ),
            item(
                8,
                "MAXDOC MK.3",
                Category::Gear,
                500,
                "https://images.unsplash.com/photo-1628143426054-b55c2d33456b?q=80&w=2070&auto=format&fit=crop",
                &[("heal", "80%"), ("instant", "Yes"), ("weight", "0.2kg")],
            ),
        ])
    }

    /// Looks up an item by id.
    pub fn get(&self, id: u32) -> Option<&CatalogItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    /// All items in catalog order.
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::builtin()
    }
}

fn item(
    id: u32,
    name: &str,
    category: Category,
    price: u64,
    image: &str,
    stats: &[(&str, &str)],
) -> CatalogItem {
    CatalogItem {
        id,
        name: name.to_string(),
        category,
        price: Credits::from_units(price),
        image: image.to_string(),
        stats: stats
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>(),
    }
}
