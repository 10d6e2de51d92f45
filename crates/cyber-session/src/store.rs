//! # Session Store
//!
//! The one owned session of a running front end.
//!
//! ## Phases
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌───────────┐   login / signup (Ok)    ┌───────────────┐             │
//! │   │ Anonymous │ ───────────────────────► │ Authenticated │             │
//! │   │ guest acct│ ◄─────────────────────── │ mirrored      │             │
//! │   └───────────┘   logout / remote        └───────────────┘             │
//! │                   sign-out                                              │
//! │                                                                         │
//! │  Both phases can shop. Only the authenticated phase mirrors.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Mutations
//! Every change to credits, cart, favorites or history is applied in memory
//! first and then, when authenticated, queued on the [`Mirror`]. The
//! in-memory account is what the UI renders; the provider catches up.

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::backend::{Credentials, SessionBackend};
use crate::config::SessionConfig;
use crate::error::{AuthErrorKind, BackendError};
use crate::mirror::Mirror;
use cyber_core::validation::{validate_new_password, validate_password, validate_username};
use cyber_core::{
    Account, Cart, Catalog, CatalogItem, CatalogQuery, CategoryFilter, CoreError, Credits,
    Favorites, Identity, SortKey, Transaction, User, ValidationError,
};

pub const MSG_CHECKOUT_COMPLETE: &str = "TRANSACTION COMPLETE. ITEMS TRANSFERRED.";
pub const MSG_INSUFFICIENT_FUNDS: &str = "INSUFFICIENT FUNDS. TRANSACTION DENIED.";
pub const MSG_EMPTY_CART: &str = "NO ITEMS IN LOADOUT.";

// =============================================================================
// Action Result
// =============================================================================

/// What an operation reports back to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    /// Set for failed authentication operations only.
    pub error: Option<AuthErrorKind>,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        ActionResult {
            success: true,
            message: message.into(),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        ActionResult {
            success: false,
            message: message.into(),
            error: None,
        }
    }

    pub fn auth_failure(kind: AuthErrorKind, message: impl Into<String>) -> Self {
        ActionResult {
            success: false,
            message: message.into(),
            error: Some(kind),
        }
    }

    fn from_backend(err: &BackendError) -> Self {
        let kind = AuthErrorKind::from(err);
        Self::auth_failure(kind, kind.message())
    }

    fn from_validation(err: &ValidationError) -> Self {
        match (err, err.field()) {
            (ValidationError::Required { .. }, "username") => {
                Self::auth_failure(AuthErrorKind::InvalidCredentials, "IDENTITY REQUIRED")
            }
            (ValidationError::Required { .. }, _) => {
                Self::auth_failure(AuthErrorKind::InvalidCredentials, "ACCESS CODE REQUIRED")
            }
            (ValidationError::TooShort { min, .. }, "password") => Self::auth_failure(
                AuthErrorKind::WeakCredential,
                format!("ACCESS CODE TOO WEAK. MINIMUM {} CHARACTERS.", min),
            ),
            (_, "username") => Self::auth_failure(
                AuthErrorKind::InvalidCredentials,
                format!("INVALID NETRUNNER_ID: {}", err).to_uppercase(),
            ),
            _ => Self::auth_failure(
                AuthErrorKind::InvalidCredentials,
                format!("INVALID ACCESS CODE: {}", err).to_uppercase(),
            ),
        }
    }
}

// =============================================================================
// Session Store
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Anonymous,
    Authenticated,
}

/// Cart, favorites, balance, history and view parameters for one session.
pub struct SessionStore {
    backend: Arc<dyn SessionBackend>,
    mirror: Mirror,
    config: SessionConfig,
    catalog: Catalog,
    identity: Option<Identity>,
    account: Account,
    query: CatalogQuery,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("phase", &self.phase())
            .field("identity", &self.identity)
            .field("account", &self.account)
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// An anonymous session over the built-in catalog.
    ///
    /// Spawns the mirror task, so this must run inside a tokio runtime.
    pub fn new(backend: Arc<dyn SessionBackend>, config: SessionConfig) -> Self {
        Self::with_catalog(backend, config, Catalog::builtin())
    }

    pub fn with_catalog(
        backend: Arc<dyn SessionBackend>,
        config: SessionConfig,
        catalog: Catalog,
    ) -> Self {
        let mirror = Mirror::spawn(backend.clone());
        let account = Account::new(config.starting_credits());

        SessionStore {
            backend,
            mirror,
            config,
            catalog,
            identity: None,
            account,
            query: CatalogQuery::default(),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn phase(&self) -> SessionPhase {
        if self.identity.is_some() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        }
    }

    /// The signed-in user, `None` while anonymous.
    pub fn user(&self) -> Option<User> {
        self.identity.as_ref().map(|identity| User {
            id: identity.id.clone(),
            username: identity.username.clone(),
            credits: self.account.credits,
        })
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn credits(&self) -> Credits {
        self.account.credits
    }

    pub fn cart(&self) -> &Cart {
        &self.account.cart
    }

    /// Recomputed from the current entries on every call.
    pub fn cart_total(&self) -> Credits {
        self.account.cart.total()
    }

    pub fn favorites(&self) -> &Favorites {
        &self.account.favorites
    }

    pub fn is_favorite(&self, id: u32) -> bool {
        self.account.favorites.contains(id)
    }

    /// Newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.account.transactions
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn query(&self) -> &CatalogQuery {
        &self.query
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The catalog as the UI should list it.
    pub fn filtered_items(&self) -> Vec<&CatalogItem> {
        self.query.apply(self.catalog.items())
    }

    // =========================================================================
    // View Parameters
    // =========================================================================

    pub fn set_search_query(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
        debug!(search = %self.query.search, "Search query set");
    }

    pub fn set_sort_by(&mut self, sort_by: Option<SortKey>) {
        self.query.sort_by = sort_by;
        debug!(?sort_by, "Sort key set");
    }

    pub fn set_selected_category(&mut self, category: CategoryFilter) {
        debug!(%category, "Category filter set");
        self.query.category = category;
    }

    // =========================================================================
    // Cart & Favorites
    // =========================================================================

    pub fn add_to_cart(&mut self, item: &CatalogItem) {
        self.account.cart.push(item.clone());
        debug!(item_id = item.id, cart_len = self.account.cart.len(), "Added to cart");
        self.mirror_account();
    }

    /// Adds a catalog item by id. Unknown ids are ignored.
    pub fn add_to_cart_by_id(&mut self, id: u32) -> bool {
        let Some(item) = self.catalog.get(id).cloned() else {
            debug!(item_id = id, error = %CoreError::UnknownItem(id), "Add ignored");
            return false;
        };

        self.add_to_cart(&item);
        true
    }

    /// Removes the entry at `index`. Out of range is a no-op.
    pub fn remove_from_cart(&mut self, index: usize) -> bool {
        match self.account.cart.remove(index) {
            Some(item) => {
                debug!(index, item_id = item.id, "Removed from cart");
                self.mirror_account();
                true
            }
            None => {
                debug!(index, cart_len = self.account.cart.len(), "Remove ignored");
                false
            }
        }
    }

    pub fn clear_cart(&mut self) {
        self.account.cart.clear();
        debug!("Cart cleared");
        self.mirror_account();
    }

    /// Returns whether `id` is a favorite afterwards.
    pub fn toggle_favorite(&mut self, id: u32) -> bool {
        let now_favorite = self.account.favorites.toggle(id);
        debug!(item_id = id, now_favorite, "Favorite toggled");
        self.mirror_account();
        now_favorite
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Converts the cart into a transaction.
    ///
    /// All or nothing: on failure credits and cart are unchanged.
    pub fn checkout(&mut self) -> ActionResult {
        match self.account.checkout(Utc::now()) {
            Ok(transaction) => {
                info!(
                    transaction_id = %transaction.id,
                    total = transaction.total.units(),
                    items = transaction.item_count(),
                    remaining = self.account.credits.units(),
                    "Checkout complete"
                );
                self.mirror_account();
                ActionResult::ok(MSG_CHECKOUT_COMPLETE)
            }
            Err(CoreError::InsufficientFunds {
                required,
                available,
            }) => {
                info!(
                    required = required.units(),
                    available = available.units(),
                    "Checkout denied"
                );
                ActionResult::failure(MSG_INSUFFICIENT_FUNDS)
            }
            Err(CoreError::EmptyCart) => {
                debug!("Checkout with empty cart");
                ActionResult::failure(MSG_EMPTY_CART)
            }
            Err(e) => ActionResult::failure(e.to_string()),
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Signs in and replaces the in-memory state with the stored account.
    ///
    /// On failure the current session, anonymous or not, is untouched.
    pub async fn login(&mut self, credentials: &Credentials) -> ActionResult {
        if let Err(e) = validate_username(&credentials.username)
            .and_then(|_| validate_password(&credentials.password))
        {
            debug!(error = %e, "Login rejected by validation");
            return ActionResult::from_validation(&e);
        }

        let identity = match self.backend.sign_in(credentials).await {
            Ok(identity) => identity,
            Err(e) => {
                info!(username = %credentials.username, error = %e, "Login failed");
                return ActionResult::from_backend(&e);
            }
        };

        self.establish(identity, "ACCESS GRANTED").await
    }

    /// Registers a new identity with a fresh account, then signs in.
    pub async fn signup(&mut self, credentials: &Credentials) -> ActionResult {
        if let Err(e) = validate_username(&credentials.username).and_then(|_| {
            validate_new_password(&credentials.password, self.config.min_password_len)
        }) {
            debug!(error = %e, "Signup rejected by validation");
            return ActionResult::from_validation(&e);
        }

        let identity = match self.backend.sign_up(credentials).await {
            Ok(identity) => identity,
            Err(e) => {
                info!(username = %credentials.username, error = %e, "Signup failed");
                return ActionResult::from_backend(&e);
            }
        };

        info!(id = %identity.id, handle = %identity.handle, "Signup complete");
        self.establish(identity, "IDENTITY CREATED").await
    }

    /// Loads the identity's account and makes it the current session.
    ///
    /// A missing document is created with the starting balance and persisted
    /// before the session switches over.
    async fn establish(&mut self, identity: Identity, greeting: &str) -> ActionResult {
        // Queued snapshots must land before the document is read back
        self.mirror.flush().await;

        let account = match self.backend.load_account(&identity.id).await {
            Ok(Some(doc)) => Account::from(doc),
            Ok(None) => {
                let fresh = Account::new(self.config.starting_credits());
                if let Err(e) = self
                    .backend
                    .save_account(&identity.id, &fresh.to_document())
                    .await
                {
                    warn!(id = %identity.id, error = %e, "Failed to persist fresh account");
                    return ActionResult::from_backend(&e);
                }
                debug!(id = %identity.id, "Fresh account persisted");
                fresh
            }
            Err(e) => {
                warn!(id = %identity.id, error = %e, "Failed to load account");
                return ActionResult::from_backend(&e);
            }
        };

        info!(
            id = %identity.id,
            username = %identity.username,
            credits = account.credits.units(),
            cart_len = account.cart.len(),
            transactions = account.transactions.len(),
            "Session authenticated"
        );

        let message = format!("{}. WELCOME, {}.", greeting, identity.username.to_uppercase());
        self.identity = Some(identity);
        self.account = account;

        ActionResult::ok(message)
    }

    /// Ends the session and returns to a fresh anonymous state.
    ///
    /// Pending mirror writes are flushed first. A provider sign-out failure
    /// is logged; the local session ends regardless.
    pub async fn logout(&mut self) {
        self.mirror.flush().await;

        if let Some(identity) = self.identity.as_ref() {
            if let Err(e) = self.backend.sign_out(identity).await {
                warn!(id = %identity.id, error = %e, "Provider sign-out failed");
            }
            info!(id = %identity.id, "Logged out");
        }

        self.reset();
    }

    /// Provider-initiated sign-out: same teardown as [`logout`](Self::logout)
    /// without calling the provider.
    pub fn handle_remote_sign_out(&mut self) {
        if let Some(identity) = self.identity.as_ref() {
            info!(id = %identity.id, "Signed out by provider");
        }
        self.reset();
    }

    /// Waits for queued mirror writes.
    pub async fn flush(&self) {
        self.mirror.flush().await;
    }

    fn reset(&mut self) {
        self.identity = None;
        self.account = Account::new(self.config.starting_credits());
        self.query = CatalogQuery::default();
    }

    fn mirror_account(&self) {
        if let Some(identity) = &self.identity {
            self.mirror.enqueue(&identity.id, self.account.to_document());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SqliteBackend;
    use cyber_core::Category;
    use cyber_db::{Database, DbConfig};

    async fn store() -> SessionStore {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = SessionConfig::default();
        let backend = Arc::new(SqliteBackend::new(db, &config));
        SessionStore::new(backend, config)
    }

    #[tokio::test]
    async fn test_starts_anonymous_with_guest_balance() {
        let store = store().await;
        assert_eq!(store.phase(), SessionPhase::Anonymous);
        assert!(store.user().is_none());
        assert_eq!(store.credits().units(), 50_000);
        assert!(store.cart().is_empty());
        assert_eq!(store.filtered_items().len(), store.catalog().len());
    }

    #[tokio::test]
    async fn test_checkout_success() {
        let mut store = store().await;
        assert!(store.add_to_cart_by_id(1));

        let result = store.checkout();
        assert!(result.success);
        assert_eq!(result.message, MSG_CHECKOUT_COMPLETE);
        assert_eq!(store.credits().units(), 37_500);
        assert_eq!(store.transactions().len(), 1);
        assert_eq!(store.transactions()[0].total.units(), 12_500);
        assert!(store.cart().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_insufficient_funds() {
        let mut store = store().await;
        store.add_to_cart_by_id(1);
        store.add_to_cart_by_id(2);
        assert_eq!(store.cart_total().units(), 57_500);

        let result = store.checkout();
        assert!(!result.success);
        assert_eq!(result.message, MSG_INSUFFICIENT_FUNDS);
        assert_eq!(store.credits().units(), 50_000);
        assert_eq!(store.cart().len(), 2);
        assert!(store.transactions().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_empty_cart() {
        let mut store = store().await;
        let result = store.checkout();
        assert!(!result.success);
        assert_eq!(result.message, MSG_EMPTY_CART);
        assert_eq!(store.credits().units(), 50_000);
    }

    #[tokio::test]
    async fn test_cart_edits() {
        let mut store = store().await;
        assert!(!store.add_to_cart_by_id(99));

        store.add_to_cart_by_id(7);
        store.add_to_cart_by_id(8);
        store.add_to_cart_by_id(7);
        assert_eq!(store.cart_total().units(), 9_500);

        assert!(!store.remove_from_cart(3));
        assert!(store.remove_from_cart(0));
        assert_eq!(store.cart_total().units(), 5_000);

        store.clear_cart();
        assert!(store.cart().is_empty());
        assert!(store.cart_total().is_zero());
    }

    #[tokio::test]
    async fn test_view_parameters() {
        let mut store = store().await;
        store.set_selected_category(CategoryFilter::Only(Category::Weapon));
        store.set_sort_by(Some(SortKey::PriceAsc));

        let ids: Vec<u32> = store.filtered_items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![7, 1, 4]);

        store.set_search_query("mono");
        let ids: Vec<u32> = store.filtered_items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![4]);
    }

    #[tokio::test]
    async fn test_validation_messages() {
        let mut store = store().await;

        let result = store.login(&Credentials::new("", "x")).await;
        assert_eq!(result.message, "IDENTITY REQUIRED");
        assert_eq!(result.error, Some(AuthErrorKind::InvalidCredentials));

        let result = store.login(&Credentials::new("vee", " ")).await;
        assert_eq!(result.message, "ACCESS CODE REQUIRED");

        let result = store.signup(&Credentials::new("vee", "abc")).await;
        assert!(!result.success);
        assert_eq!(result.error, Some(AuthErrorKind::WeakCredential));
        assert_eq!(store.phase(), SessionPhase::Anonymous);
    }

    #[tokio::test]
    async fn test_signup_login_logout() {
        let mut store = store().await;

        let result = store.signup(&Credentials::new("vee", "samurai77")).await;
        assert!(result.success, "{}", result.message);
        assert_eq!(store.phase(), SessionPhase::Authenticated);
        assert_eq!(store.user().unwrap().username, "vee");

        store.add_to_cart_by_id(3);
        store.toggle_favorite(5);
        store.set_search_query("camo");

        store.logout().await;
        assert_eq!(store.phase(), SessionPhase::Anonymous);
        assert!(store.cart().is_empty());
        assert!(store.favorites().is_empty());
        assert!(store.transactions().is_empty());
        assert_eq!(store.credits().units(), 50_000);
        assert!(store.query().search.is_empty());

        let result = store.login(&Credentials::new("vee", "samurai77")).await;
        assert!(result.success);
        assert_eq!(store.cart().len(), 1);
        assert!(store.is_favorite(5));
    }

    #[tokio::test]
    async fn test_remote_sign_out() {
        let mut store = store().await;
        store.signup(&Credentials::new("vee", "samurai77")).await;
        store.add_to_cart_by_id(1);

        store.handle_remote_sign_out();
        assert_eq!(store.phase(), SessionPhase::Anonymous);
        assert!(store.cart().is_empty());
    }
}
