//! # Catalog View
//!
//! The filtered, sorted catalog the grid renders.
//!
//! ## Pipeline
//! ```text
//! catalog (ordered)
//!     │
//!     ├── category filter   (All passes everything)
//!     ├── search filter     (case-insensitive substring on name)
//!     │
//!     ▼
//! stable sort by SortKey    (None keeps catalog order; ties keep it too)
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::{CatalogItem, Category};

/// Sort order for the catalog view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    Name,
}

impl SortKey {
    fn compare(&self, a: &CatalogItem, b: &CatalogItem) -> Ordering {
        match self {
            SortKey::PriceAsc => a.price.cmp(&b.price),
            SortKey::PriceDesc => b.price.cmp(&a.price),
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::Name => "name",
        })
    }
}

impl FromStr for SortKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "price-asc" => Ok(SortKey::PriceAsc),
            "price-desc" => Ok(SortKey::PriceDesc),
            "name" => Ok(SortKey::Name),
            other => Err(ValidationError::InvalidFormat {
                field: "sort".to_string(),
                reason: format!("unknown sort key '{}'", other),
            }),
        }
    }
}

/// Category selection; `All` is a pass-through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(category) => category.fmt(f),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse::<Category>().map(CategoryFilter::Only)
    }
}

/// The view parameters the UI controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    pub search: String,
    pub sort_by: Option<SortKey>,
    pub category: CategoryFilter,
}

impl CatalogQuery {
    /// Returns the items passing both filters, in view order.
    ///
    /// Pure: same items and query, same output.
    pub fn apply<'a>(&self, items: &'a [CatalogItem]) -> Vec<&'a CatalogItem> {
        let needle = self.search.to_lowercase();

        let mut visible: Vec<&CatalogItem> = items
            .iter()
            .filter(|item| self.category.matches(item.category))
            .filter(|item| item.name.to_lowercase().contains(&needle))
            .collect();

        if let Some(key) = self.sort_by {
            // sort_by is stable
            visible.sort_by(|a, b| key.compare(a, b));
        }

        visible
    }
}
