//! # Provider Contract
//!
//! Everything the session needs from the outside world: identities keyed by a
//! username-derived handle, and one account document per identity.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SessionStore ──► Arc<dyn SessionBackend>                              │
//! │                        │                                                │
//! │          ┌─────────────┴──────────────┐                                 │
//! │          ▼                            ▼                                 │
//! │   SqliteBackend                 (any other provider)                   │
//! │   argon2 + cyber-db                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::Utc;
use std::fmt;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::error::{BackendError, BackendResult};
use cyber_core::validation::{identity_handle, validate_new_password};
use cyber_core::{AccountDocument, Credits, Identity};
use cyber_db::Database;

// =============================================================================
// Credentials
// =============================================================================

/// A username/password pair as typed by the user.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// Contract
// =============================================================================

/// Authentication and persistence provider.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Registers a new identity.
    ///
    /// ## Errors
    /// - `IdentityExists` when the handle is taken
    /// - `WeakCredential` when the provider refuses the password
    async fn sign_up(&self, credentials: &Credentials) -> BackendResult<Identity>;

    /// Resolves an existing identity.
    async fn sign_in(&self, credentials: &Credentials) -> BackendResult<Identity>;

    async fn sign_out(&self, identity: &Identity) -> BackendResult<()>;

    /// `None` when the identity has never saved a document.
    async fn load_account(&self, identity_id: &str) -> BackendResult<Option<AccountDocument>>;

    /// Replaces the identity's document.
    async fn save_account(&self, identity_id: &str, doc: &AccountDocument) -> BackendResult<()>;
}

// =============================================================================
// SQLite Provider
// =============================================================================

/// Local provider over `cyber-db`, with Argon2 password hashes.
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    db: Database,
    identity_domain: String,
    min_password_len: usize,
    starting_credits: Credits,
}

impl SqliteBackend {
    pub fn new(db: Database, config: &SessionConfig) -> Self {
        SqliteBackend {
            db,
            identity_domain: config.identity_domain.clone(),
            min_password_len: config.min_password_len,
            starting_credits: config.starting_credits(),
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn handle(&self, username: &str) -> String {
        identity_handle(username, &self.identity_domain)
    }
}

#[async_trait]
impl SessionBackend for SqliteBackend {
    async fn sign_up(&self, credentials: &Credentials) -> BackendResult<Identity> {
        validate_new_password(&credentials.password, self.min_password_len)
            .map_err(|e| BackendError::WeakCredential(e.to_string()))?;

        let identity = Identity {
            id: Uuid::new_v4().to_string(),
            handle: self.handle(&credentials.username),
            username: credentials.username.trim().to_string(),
            created_at: Utc::now(),
        };
        let password_hash = hash_password(&credentials.password)?;

        self.db
            .identities()
            .create_with_document(
                &identity,
                &password_hash,
                &AccountDocument::fresh(self.starting_credits),
            )
            .await?;

        info!(id = %identity.id, handle = %identity.handle, "Identity registered");
        Ok(identity)
    }

    async fn sign_in(&self, credentials: &Credentials) -> BackendResult<Identity> {
        let handle = self.handle(&credentials.username);

        let record = self
            .db
            .identities()
            .find_by_handle(&handle)
            .await?
            .ok_or(BackendError::InvalidCredentials)?;

        if !verify_password(&credentials.password, &record.password_hash) {
            debug!(handle = %handle, "Password mismatch");
            return Err(BackendError::InvalidCredentials);
        }

        Ok(record.to_identity())
    }

    async fn sign_out(&self, identity: &Identity) -> BackendResult<()> {
        // No server-side session to revoke
        debug!(id = %identity.id, "Signed out");
        Ok(())
    }

    async fn load_account(&self, identity_id: &str) -> BackendResult<Option<AccountDocument>> {
        Ok(self.db.accounts().load(identity_id).await?)
    }

    async fn save_account(&self, identity_id: &str, doc: &AccountDocument) -> BackendResult<()> {
        Ok(self.db.accounts().save(identity_id, doc).await?)
    }
}

// =============================================================================
// Password Hashing
// =============================================================================

/// Hash a password as an Argon2 PHC string.
pub fn hash_password(password: &str) -> BackendResult<String> {
    use argon2::{
        password_hash::{rand_core::OsRng, SaltString},
        Argon2, PasswordHasher,
    };

    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| BackendError::Other(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored PHC string. Malformed hashes never match.
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
