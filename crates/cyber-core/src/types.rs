//! # Domain Types
//!
//! Core domain types used throughout Cyber Market.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CatalogItem    │   │  Transaction    │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (u32)       │   │  id (millis)    │   │  id (provider)  │       │
//! │  │  name           │   │  items (frozen) │   │  username       │       │
//! │  │  category       │   │  total          │   │  credits        │       │
//! │  │  price          │   │  timestamp      │   └─────────────────┘       │
//! │  │  stats (bag)    │   └─────────────────┘                             │
//! │  └─────────────────┘                                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  AccountDocument  { credits, cart, favorites, transactions }    │   │
//! │  │  The persisted shape, keyed by identity id                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::credits::Credits;
use crate::error::ValidationError;

// =============================================================================
// Category
// =============================================================================

/// The fixed set of catalog categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Weapon,
    Implant,
    Gear,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Weapon => "weapon",
            Category::Implant => "implant",
            Category::Gear => "gear",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weapon" => Ok(Category::Weapon),
            "implant" => Ok(Category::Implant),
            "gear" => Ok(Category::Gear),
            other => Err(ValidationError::InvalidFormat {
                field: "category".to_string(),
                reason: format!("unknown category '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Catalog Item
// =============================================================================

/// A purchasable catalog entry.
///
/// `stats` is an open label → value bag: each item carries its own set of
/// display stats (damage/rpm for weapons, slot/ram for implants, ...). The
/// map is ordered so that rendering is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Unique catalog id.
    pub id: u32,

    /// Display name.
    pub name: String,

    /// Serialized as `type` to match the storefront's data files.
    #[serde(rename = "type")]
    pub category: Category,

    /// Price in credits.
    pub price: Credits,

    /// Image reference (URL).
    pub image: String,

    /// Display stats.
    pub stats: BTreeMap<String, String>,
}

// =============================================================================
// User
// =============================================================================

/// The authenticated user as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque identity id handed out by the provider.
    pub id: String,

    /// Display name (the username the user signed up with).
    pub username: String,

    /// Current balance.
    pub credits: Credits,
}

// =============================================================================
// Identity
// =============================================================================

/// A provider-side identity.
///
/// `handle` is derived from the username (see
/// [`identity_handle`](crate::validation::identity_handle)) and is the
/// provider's lookup key; `id` is the opaque key for the account document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub handle: String,
    pub username: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Transaction
// =============================================================================

/// An immutable record of a completed checkout.
///
/// Uses the snapshot pattern: `items` is a frozen copy of the cart at the
/// moment of purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Timestamp-derived id (milliseconds since the epoch).
    pub id: String,

    /// Cart contents at checkout time.
    pub items: Vec<CatalogItem>,

    /// Sum of `items` prices.
    pub total: Credits,

    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

// =============================================================================
// Account Document
// =============================================================================

/// The persisted per-identity document.
///
/// ```json
/// {
///   "credits": 37500,
///   "cart": [ ... ],
///   "favorites": [1, 4],
///   "transactions": [ ... ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AccountDocument {
    pub credits: Credits,

    #[serde(default)]
    pub cart: Vec<CatalogItem>,

    #[serde(default)]
    pub favorites: BTreeSet<u32>,

    /// Newest first.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl AccountDocument {
    /// A fresh document for a new identity.
    pub fn fresh(starting_credits: Credits) -> Self {
        AccountDocument {
            credits: starting_credits,
            cart: Vec::new(),
            favorites: BTreeSet::new(),
            transactions: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parsing() {
        assert_eq!("weapon".parse::<Category>().unwrap(), Category::Weapon);
        assert_eq!(" IMPLANT ".parse::<Category>().unwrap(), Category::Implant);
        assert_eq!("gear".parse::<Category>().unwrap(), Category::Gear);
        assert!("cyberdeck".parse::<Category>().is_err());
    }

    #[test]
    fn test_catalog_item_serializes_category_as_type() {
        let item = CatalogItem {
            id: 3,
            name: "OPTICAL CAMO".to_string(),
            category: Category::Gear,
            price: Credits::from_units(8_500),
            image: String::new(),
            stats: BTreeMap::from([("duration".to_string(), "15s".to_string())]),
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "gear");
        assert_eq!(json["price"], 8_500);
        assert_eq!(json["stats"]["duration"], "15s");
    }

    #[test]
    fn test_account_document_defaults_missing_collections() {
        let doc: AccountDocument = serde_json::from_str(r#"{"credits": 1200}"#).unwrap();
        assert_eq!(doc, AccountDocument::fresh(Credits::from_units(1_200)));
    }
}
