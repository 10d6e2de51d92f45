//! # cyber-core: Pure Domain Logic for Cyber Market
//!
//! Everything the storefront decides without touching the outside world:
//! the catalog, credit arithmetic, the cart, checkout, favorites and the
//! filtered catalog view.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cyber Market Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Front end (terminal / web)                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              cyber-session (SessionStore, mirror)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cyber-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │ catalog  │ │ credits  │ │ account  │ │   view   │          │   │
//! │  │   │  items   │ │  Credits │ │ Cart     │ │ filter + │          │   │
//! │  │   │  stats   │ │  ¥ fmt   │ │ checkout │ │ sort     │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog items, users, transactions, the persisted document
//! - [`credits`] - `Credits` with unsigned integer arithmetic
//! - [`catalog`] - The built-in catalog
//! - [`account`] - Cart, favorites and checkout
//! - [`view`] - Category/search filter and stable sorting
//! - [`validation`] - Credential rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use cyber_core::{Account, Catalog, Credits};
//!
//! let catalog = Catalog::builtin();
//! let mut account = Account::new(Credits::from_units(50_000));
//!
//! account.cart.push(catalog.get(1).unwrap().clone()); // 12 500
//! let receipt = account.checkout(chrono::Utc::now()).unwrap();
//!
//! assert_eq!(receipt.total.units(), 12_500);
//! assert_eq!(account.credits.units(), 37_500);
//! ```

pub mod account;
pub mod catalog;
pub mod credits;
pub mod error;
pub mod types;
pub mod validation;
pub mod view;

pub use account::{Account, Cart, Favorites};
pub use catalog::Catalog;
pub use credits::Credits;
pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;
pub use view::{CatalogQuery, CategoryFilter, SortKey};

/// Credits granted to a fresh identity and to anonymous guests.
pub const DEFAULT_STARTING_CREDITS: u64 = 50_000;

/// Domain appended to usernames to form provider handles.
pub const DEFAULT_IDENTITY_DOMAIN: &str = "cybermarket.net";

/// Minimum accepted password length at signup.
pub const DEFAULT_MIN_PASSWORD_LEN: usize = 6;
