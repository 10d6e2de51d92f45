//! End-to-end behavior of `SessionStore` against scripted and SQLite
//! providers.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use cyber_core::{AccountDocument, Identity};
use cyber_db::{Database, DbConfig};
use cyber_session::{
    AuthErrorKind, BackendError, BackendResult, Credentials, SessionBackend, SessionConfig,
    SessionPhase, SessionStore, SqliteBackend,
};

// =============================================================================
// Scripted Provider
// =============================================================================

/// In-memory provider whose failures are switched on per test.
///
/// Unlike `SqliteBackend`, `sign_up` creates no document, so the store's
/// fresh-account path runs.
#[derive(Default)]
struct ScriptedBackend {
    identities: Mutex<HashMap<String, (Identity, String)>>,
    documents: Mutex<HashMap<String, AccountDocument>>,
    saves: Mutex<Vec<AccountDocument>>,
    fail_sign_in: Mutex<Option<BackendError>>,
    fail_load: AtomicBool,
    fail_saves: AtomicBool,
    fail_sign_out: AtomicBool,
}

impl ScriptedBackend {
    fn stored(&self, identity_id: &str) -> Option<AccountDocument> {
        self.documents.lock().unwrap().get(identity_id).cloned()
    }

    fn save_count(&self) -> usize {
        self.saves.lock().unwrap().len()
    }

    fn handle(username: &str) -> String {
        format!("{}@test", username.to_lowercase())
    }
}

#[async_trait]
impl SessionBackend for ScriptedBackend {
    async fn sign_up(&self, credentials: &Credentials) -> BackendResult<Identity> {
        let handle = Self::handle(&credentials.username);
        let mut identities = self.identities.lock().unwrap();

        if identities.contains_key(&handle) {
            return Err(BackendError::IdentityExists(handle));
        }

        let identity = Identity {
            id: format!("id-{}", identities.len() + 1),
            handle: handle.clone(),
            username: credentials.username.clone(),
            created_at: Utc::now(),
        };
        identities.insert(handle, (identity.clone(), credentials.password.clone()));
        Ok(identity)
    }

    async fn sign_in(&self, credentials: &Credentials) -> BackendResult<Identity> {
        if let Some(err) = self.fail_sign_in.lock().unwrap().clone() {
            return Err(err);
        }

        let identities = self.identities.lock().unwrap();
        match identities.get(&Self::handle(&credentials.username)) {
            Some((identity, password)) if *password == credentials.password => {
                Ok(identity.clone())
            }
            _ => Err(BackendError::InvalidCredentials),
        }
    }

    async fn sign_out(&self, _identity: &Identity) -> BackendResult<()> {
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("sign-out endpoint down".into()));
        }
        Ok(())
    }

    async fn load_account(&self, identity_id: &str) -> BackendResult<Option<AccountDocument>> {
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("read timed out".into()));
        }
        Ok(self.stored(identity_id))
    }

    async fn save_account(&self, identity_id: &str, doc: &AccountDocument) -> BackendResult<()> {
        tokio::task::yield_now().await;

        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("write rejected".into()));
        }
        self.saves.lock().unwrap().push(doc.clone());
        self.documents
            .lock()
            .unwrap()
            .insert(identity_id.to_string(), doc.clone());
        Ok(())
    }
}

fn scripted() -> (Arc<ScriptedBackend>, SessionStore) {
    let backend = Arc::new(ScriptedBackend::default());
    let store = SessionStore::new(backend.clone(), SessionConfig::default());
    (backend, store)
}

fn creds(username: &str) -> Credentials {
    Credentials::new(username, "samurai77")
}

fn current_document(store: &SessionStore) -> AccountDocument {
    AccountDocument {
        credits: store.credits(),
        cart: store.cart().items().to_vec(),
        favorites: store.favorites().ids().clone(),
        transactions: store.transactions().to_vec(),
    }
}

// =============================================================================
// Cart & Checkout Properties
// =============================================================================

#[tokio::test]
async fn cart_total_tracks_every_edit() {
    let (_, mut store) = scripted();

    // Deterministic walk over adds and removes
    let mut seed: u32 = 7;
    for _ in 0..200 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let roll = (seed >> 16) % 10;

        if roll < 6 {
            store.add_to_cart_by_id(1 + roll % 8);
        } else {
            let len = store.cart().len().max(1);
            store.remove_from_cart((seed as usize) % (len + 1));
        }

        let expected: u64 = store.cart().items().iter().map(|i| i.price.units()).sum();
        assert_eq!(store.cart_total().units(), expected);
    }
}

#[tokio::test]
async fn checkout_never_overdraws() {
    let (_, mut store) = scripted();

    // 50 000 start; implant at 45 000 fits once
    for _ in 0..3 {
        store.add_to_cart_by_id(2);
        let before_credits = store.credits();
        let before_cart = store.cart().len();
        let total = store.cart_total();

        let result = store.checkout();

        if total <= before_credits {
            assert!(result.success);
            assert_eq!(store.credits().units(), before_credits.units() - total.units());
            assert!(store.cart().is_empty());
            assert_eq!(store.transactions()[0].total, total);
        } else {
            assert!(!result.success);
            assert_eq!(store.credits(), before_credits);
            assert_eq!(store.cart().len(), before_cart);
        }
    }

    assert_eq!(store.credits().units(), 5_000);
    assert_eq!(store.transactions().len(), 1);
}

#[tokio::test]
async fn transactions_are_newest_first() {
    let (_, mut store) = scripted();

    store.add_to_cart_by_id(8);
    assert!(store.checkout().success);
    store.add_to_cart_by_id(7);
    store.add_to_cart_by_id(7);
    assert!(store.checkout().success);

    let totals: Vec<u64> = store.transactions().iter().map(|t| t.total.units()).collect();
    assert_eq!(totals, vec![9_000, 500]);
    assert_ne!(store.transactions()[0].id, store.transactions()[1].id);
    assert_eq!(store.credits().units(), 40_500);
}

#[tokio::test]
async fn double_toggle_restores_favorites() {
    let (_, mut store) = scripted();
    store.toggle_favorite(3);
    let before = store.favorites().clone();

    assert!(store.toggle_favorite(6));
    assert!(!store.toggle_favorite(6));
    assert_eq!(store.favorites(), &before);
}

// =============================================================================
// Mirror
// =============================================================================

#[tokio::test]
async fn anonymous_session_is_not_mirrored() {
    let (backend, mut store) = scripted();

    store.add_to_cart_by_id(1);
    store.toggle_favorite(1);
    assert!(store.checkout().success);
    store.flush().await;

    assert_eq!(backend.save_count(), 0);
}

#[tokio::test]
async fn mirror_writes_arrive_in_order() {
    let (backend, mut store) = scripted();
    assert!(store.signup(&creds("vee")).await.success);
    let baseline = backend.save_count();

    store.add_to_cart_by_id(1);
    store.add_to_cart_by_id(7);
    store.remove_from_cart(0);
    store.toggle_favorite(4);
    assert!(store.checkout().success);
    store.flush().await;

    let saves = backend.saves.lock().unwrap()[baseline..].to_vec();
    let cart_lens: Vec<usize> = saves.iter().map(|d| d.cart.len()).collect();
    assert_eq!(cart_lens, vec![1, 2, 1, 1, 0]);

    let id = store.user().unwrap().id;
    assert_eq!(backend.stored(&id).unwrap(), current_document(&store));
}

#[tokio::test]
async fn failed_mirror_write_leaves_memory_authoritative() {
    let (backend, mut store) = scripted();
    assert!(store.signup(&creds("vee")).await.success);
    let id = store.user().unwrap().id;

    backend.fail_saves.store(true, Ordering::SeqCst);
    store.add_to_cart_by_id(1);
    let result = store.checkout();
    store.flush().await;

    assert!(result.success);
    assert_eq!(store.credits().units(), 37_500);
    assert_eq!(store.transactions().len(), 1);

    let stored = backend.stored(&id).unwrap();
    assert_eq!(stored.credits.units(), 50_000);
    assert!(stored.transactions.is_empty());

    // Next successful write carries the full current state
    backend.fail_saves.store(false, Ordering::SeqCst);
    store.toggle_favorite(2);
    store.flush().await;
    assert_eq!(backend.stored(&id).unwrap(), current_document(&store));
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn signup_persists_fresh_account() {
    let (backend, mut store) = scripted();

    let result = store.signup(&creds("vee")).await;
    assert!(result.success);
    assert_eq!(store.phase(), SessionPhase::Authenticated);

    let id = store.user().unwrap().id;
    let stored = backend.stored(&id).unwrap();
    assert_eq!(stored.credits.units(), 50_000);
    assert!(stored.cart.is_empty());
    assert!(stored.favorites.is_empty());
}

#[tokio::test]
async fn login_discards_guest_state() {
    let (_, mut store) = scripted();
    assert!(store.signup(&creds("vee")).await.success);
    store.logout().await;

    store.add_to_cart_by_id(5);
    assert!(store.login(&creds("vee")).await.success);
    assert!(store.cart().is_empty());
}

#[tokio::test]
async fn login_restores_earlier_session() {
    let backend = Arc::new(ScriptedBackend::default());

    let mut first = SessionStore::new(backend.clone(), SessionConfig::default());
    assert!(first.signup(&creds("vee")).await.success);
    first.add_to_cart_by_id(7);
    assert!(first.checkout().success);
    first.add_to_cart_by_id(3);
    first.toggle_favorite(4);
    let expected = current_document(&first);
    first.logout().await;

    let mut second = SessionStore::new(backend.clone(), SessionConfig::default());
    let result = second.login(&creds("vee")).await;

    assert!(result.success);
    assert_eq!(current_document(&second), expected);
    assert_eq!(second.credits().units(), 45_500);
    assert!(second.is_favorite(4));
}

#[tokio::test]
async fn login_failure_keeps_current_session() {
    let (backend, mut store) = scripted();
    assert!(store.signup(&creds("vee")).await.success);
    store.add_to_cart_by_id(1);
    let user = store.user();

    let result = store.login(&Credentials::new("vee", "wrong-pass")).await;
    assert!(!result.success);
    assert_eq!(result.error, Some(AuthErrorKind::InvalidCredentials));
    assert_eq!(store.user(), user);
    assert_eq!(store.cart().len(), 1);

    *backend.fail_sign_in.lock().unwrap() = Some(BackendError::Unavailable("dns".into()));
    let result = store.login(&creds("vee")).await;
    assert_eq!(result.error, Some(AuthErrorKind::Network));
    assert_eq!(store.phase(), SessionPhase::Authenticated);
    assert_eq!(store.cart().len(), 1);
}

#[tokio::test]
async fn login_load_failure_keeps_anonymous_state() {
    let (backend, mut store) = scripted();
    assert!(store.signup(&creds("vee")).await.success);
    store.logout().await;

    store.add_to_cart_by_id(8);
    backend.fail_load.store(true, Ordering::SeqCst);

    let result = store.login(&creds("vee")).await;
    assert!(!result.success);
    assert_eq!(result.error, Some(AuthErrorKind::Network));
    assert_eq!(store.phase(), SessionPhase::Anonymous);
    assert_eq!(store.cart().len(), 1);
}

#[tokio::test]
async fn duplicate_signup_leaves_existing_account_alone() {
    let backend = Arc::new(ScriptedBackend::default());

    let mut owner = SessionStore::new(backend.clone(), SessionConfig::default());
    assert!(owner.signup(&creds("vee")).await.success);
    owner.add_to_cart_by_id(1);
    assert!(owner.checkout().success);
    owner.add_to_cart_by_id(8);
    owner.flush().await;
    let id = owner.user().unwrap().id;
    let before = backend.stored(&id).unwrap();

    let mut intruder = SessionStore::new(backend.clone(), SessionConfig::default());
    let result = intruder.signup(&Credentials::new("VEE", "different1")).await;

    assert!(!result.success);
    assert_eq!(result.error, Some(AuthErrorKind::IdentityConflict));
    assert_eq!(intruder.phase(), SessionPhase::Anonymous);
    assert_eq!(backend.stored(&id).unwrap(), before);
}

#[tokio::test]
async fn logout_survives_provider_failure() {
    let (backend, mut store) = scripted();
    assert!(store.signup(&creds("vee")).await.success);
    store.add_to_cart_by_id(2);
    store.toggle_favorite(2);
    backend.fail_sign_out.store(true, Ordering::SeqCst);

    store.logout().await;

    assert_eq!(store.phase(), SessionPhase::Anonymous);
    assert!(store.user().is_none());
    assert!(store.cart().is_empty());
    assert!(store.favorites().is_empty());
    assert!(store.transactions().is_empty());
    assert_eq!(store.credits().units(), 50_000);
}

#[tokio::test]
async fn logout_flushes_pending_writes() {
    let (backend, mut store) = scripted();
    assert!(store.signup(&creds("vee")).await.success);
    let id = store.user().unwrap().id;

    store.add_to_cart_by_id(6);
    store.toggle_favorite(6);
    store.logout().await;

    let stored = backend.stored(&id).unwrap();
    assert_eq!(stored.cart.len(), 1);
    assert!(stored.favorites.contains(&6));
}

// =============================================================================
// SQLite Provider
// =============================================================================

#[tokio::test]
async fn sqlite_round_trip_across_sessions() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let config = SessionConfig::default();
    let backend = Arc::new(SqliteBackend::new(db.clone(), &config));

    let mut first = SessionStore::new(backend.clone(), config.clone());
    assert!(first.signup(&creds("silverhand")).await.success);
    first.add_to_cart_by_id(4);
    assert!(first.checkout().success);
    first.toggle_favorite(1);
    first.logout().await;

    let mut second = SessionStore::new(backend.clone(), config.clone());
    let result = second.login(&creds("SilverHand")).await;
    assert!(result.success, "{}", result.message);
    assert_eq!(second.credits().units(), 28_000);
    assert_eq!(second.transactions().len(), 1);
    assert_eq!(second.transactions()[0].items[0].name, "MONOWIRE");
    assert!(second.is_favorite(1));

    let dup = second.signup(&creds("silverhand")).await;
    assert_eq!(dup.error, Some(AuthErrorKind::IdentityConflict));
    assert_eq!(second.credits().units(), 28_000);
}
