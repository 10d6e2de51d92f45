//! # Account
//!
//! Cart, favorites and checkout for one session.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         checkout(now)                                   │
//! │                                                                         │
//! │   cart empty? ────────────────────────► Err(EmptyCart)     (no change)  │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │   total = Σ cart prices  (recomputed, never cached)                    │
//! │       │                                                                 │
//! │   credits.checked_sub(total) ── None ─► Err(InsufficientFunds)          │
//! │       │ Some(rest)                                          (no change) │
//! │       ▼                                                                 │
//! │   ┌───────────────────────────────────────────────┐                     │
//! │   │ transactions.insert(0, snapshot of cart)      │  all or nothing:    │
//! │   │ credits = rest                                │  nothing above can  │
//! │   │ cart.clear()                                  │  fail past here     │
//! │   └───────────────────────────────────────────────┘                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::credits::Credits;
use crate::error::{CoreError, CoreResult};
use crate::types::{AccountDocument, CatalogItem, Transaction};

// =============================================================================
// Cart
// =============================================================================

/// The session's ordered list of items pending purchase.
///
/// ## Invariants
/// - Duplicates are allowed; there is no quantity field
/// - `total()` is the sum of the current entries, computed on every call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CatalogItem>,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    /// Appends an entry.
    pub fn push(&mut self, item: CatalogItem) {
        self.items.push(item);
    }

    /// Removes the entry at `index`. Out of range is a no-op.
    pub fn remove(&mut self, index: usize) -> Option<CatalogItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of all entry prices.
    pub fn total(&self) -> Credits {
        self.items.iter().map(|i| i.price).sum()
    }

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

impl From<Vec<CatalogItem>> for Cart {
    fn from(items: Vec<CatalogItem>) -> Self {
        Cart { items }
    }
}

// =============================================================================
// Favorites
// =============================================================================

/// Set of favorited catalog ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites {
    ids: BTreeSet<u32>,
}

impl Favorites {
    pub fn new() -> Self {
        Favorites::default()
    }

    /// Flips membership of `id` and returns whether it is now a favorite.
    pub fn toggle(&mut self, id: u32) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &BTreeSet<u32> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

impl From<BTreeSet<u32>> for Favorites {
    fn from(ids: BTreeSet<u32>) -> Self {
        Favorites { ids }
    }
}

// =============================================================================
// Account
// =============================================================================

/// Everything a session owns: balance, cart, favorites and history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub credits: Credits,
    pub cart: Cart,
    pub favorites: Favorites,
    /// Newest first.
    pub transactions: Vec<Transaction>,
}

impl Account {
    /// An empty account holding `credits`.
    pub fn new(credits: Credits) -> Self {
        Account {
            credits,
            cart: Cart::new(),
            favorites: Favorites::new(),
            transactions: Vec::new(),
        }
    }

    /// Converts the cart into a transaction and debits the balance.
    ///
    /// On error the account is untouched.
    pub fn checkout(&mut self, now: DateTime<Utc>) -> CoreResult<Transaction> {
        if self.cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let total = self.cart.total();
        let remaining = self
            .credits
            .checked_sub(total)
            .ok_or(CoreError::InsufficientFunds {
                required: total,
                available: self.credits,
            })?;

        let transaction = Transaction {
            id: self.next_transaction_id(now),
            items: self.cart.items().to_vec(),
            total,
            timestamp: now,
        };

        self.transactions.insert(0, transaction.clone());
        self.credits = remaining;
        self.cart.clear();

        Ok(transaction)
    }

    /// Millisecond timestamp, suffixed when two checkouts share a millisecond.
    fn next_transaction_id(&self, now: DateTime<Utc>) -> String {
        let base = now.timestamp_millis().to_string();
        let taken = |id: &str| self.transactions.iter().any(|t| t.id == id);

        if !taken(&base) {
            return base;
        }

        (1..)
            .map(|n| format!("{}-{}", base, n))
            .find(|candidate| !taken(candidate))
            .unwrap_or(base)
    }

    /// Snapshot of the persisted shape.
    pub fn to_document(&self) -> AccountDocument {
        AccountDocument {
            credits: self.credits,
            cart: self.cart.items().to_vec(),
            favorites: self.favorites.ids().clone(),
            transactions: self.transactions.clone(),
        }
    }
}

impl From<AccountDocument> for Account {
    fn from(doc: AccountDocument) -> Self {
        Account {
            credits: doc.credits,
            cart: Cart::from(doc.cart),
            favorites: Favorites::from(doc.favorites),
            transactions: doc.transactions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use chrono::TimeZone;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    fn account_with(credits: u64, ids: &[u32]) -> Account {
        let catalog = Catalog::builtin();
        let mut account = Account::new(Credits::from_units(credits));
        for id in ids {
            account.cart.push(catalog.get(*id).unwrap().clone());
        }
        account
    }

    #[test]
    fn test_cart_total_tracks_adds_and_removes() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::new();

        cart.push(catalog.get(1).unwrap().clone()); // 12 500
        cart.push(catalog.get(7).unwrap().clone()); // 4 500
        cart.push(catalog.get(1).unwrap().clone()); // 12 500 (duplicate)
        assert_eq!(cart.total().units(), 29_500);

        let removed = cart.remove(1).unwrap();
        assert_eq!(removed.id, 7);
        assert_eq!(cart.total().units(), 25_000);

        assert!(cart.remove(5).is_none());
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total().units(), 25_000);
    }

    #[test]
    fn test_checkout_success() {
        let mut account = account_with(50_000, &[1]);

        let tx = account.checkout(at(1_700_000_000_000)).unwrap();

        assert_eq!(account.credits.units(), 37_500);
        assert!(account.cart.is_empty());
        assert_eq!(account.transactions.len(), 1);
        assert_eq!(tx.total.units(), 12_500);
        assert_eq!(tx.id, "1700000000000");
        assert_eq!(account.transactions[0], tx);
    }

    #[test]
    fn test_checkout_insufficient_funds_changes_nothing() {
        let mut account = account_with(50_000, &[1, 2]); // 57 500
        let before = account.clone();

        let err = account.checkout(at(1)).unwrap_err();

        assert_eq!(
            err,
            CoreError::InsufficientFunds {
                required: Credits::from_units(57_500),
                available: Credits::from_units(50_000),
            }
        );
        assert_eq!(account, before);
        assert_eq!(account.cart.len(), 2);
    }

    #[test]
    fn test_checkout_exact_balance_reaches_zero() {
        let mut account = account_with(12_500, &[1]);
        account.checkout(at(1)).unwrap();
        assert!(account.credits.is_zero());
    }

    #[test]
    fn test_checkout_empty_cart_is_noop() {
        let mut account = Account::new(Credits::from_units(100));
        assert_eq!(account.checkout(at(1)), Err(CoreError::EmptyCart));
        assert!(account.transactions.is_empty());
        assert_eq!(account.credits.units(), 100);
    }

    #[test]
    fn test_transactions_are_prepended_with_unique_ids() {
        let catalog = Catalog::builtin();
        let mut account = account_with(50_000, &[8]);
        account.checkout(at(5)).unwrap();
        account.cart.push(catalog.get(7).unwrap().clone());
        account.checkout(at(5)).unwrap();

        assert_eq!(account.transactions[0].id, "5-1");
        assert_eq!(account.transactions[0].items[0].id, 7);
        assert_eq!(account.transactions[1].id, "5");
    }

    #[test]
    fn test_favorite_toggle_twice_restores_set() {
        let mut favorites = Favorites::from(BTreeSet::from([2, 5]));
        let original = favorites.clone();

        assert!(favorites.toggle(3));
        assert!(!favorites.toggle(3));
        assert_eq!(favorites, original);

        assert!(!favorites.toggle(2));
        assert!(favorites.toggle(2));
        assert_eq!(favorites, original);
    }

    #[test]
    fn test_document_conversion_preserves_state() {
        let mut account = account_with(50_000, &[3, 3]);
        account.favorites.toggle(4);
        let doc = account.to_document();

        assert_eq!(doc.cart.len(), 2);
        assert!(doc.favorites.contains(&4));
        assert_eq!(Account::from(doc), account);
    }
}
