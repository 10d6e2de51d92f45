//! # Identity Repository
//!
//! Identities are created together with their first account document so a
//! registered handle always has somewhere to load from.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::account::{EncodedDocument, UPSERT_DOCUMENT};
use cyber_core::{AccountDocument, Identity};

/// A stored identity, including its password hash.
///
/// The hash never leaves the persistence layer: callers verify against it
/// and hand out [`Identity`] via [`IdentityRecord::to_identity`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IdentityRecord {
    pub id: String,
    pub handle: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl IdentityRecord {
    pub fn to_identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            handle: self.handle.clone(),
            username: self.username.clone(),
            created_at: self.created_at,
        }
    }
}

/// Repository for identity rows.
#[derive(Debug, Clone)]
pub struct IdentityRepository {
    pool: SqlitePool,
}

impl IdentityRepository {
    pub fn new(pool: SqlitePool) -> Self {
        IdentityRepository { pool }
    }

    /// Inserts an identity and its initial document atomically.
    ///
    /// ## Errors
    /// - `UniqueViolation { field: "handle", .. }` if the handle is taken
    pub async fn create_with_document(
        &self,
        identity: &Identity,
        password_hash: &str,
        doc: &AccountDocument,
    ) -> DbResult<()> {
        debug!(id = %identity.id, handle = %identity.handle, "Creating identity");

        let encoded = EncodedDocument::encode(doc)?;
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO identities (id, handle, username, password_hash, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&identity.id)
        .bind(&identity.handle)
        .bind(&identity.username)
        .bind(password_hash)
        .bind(identity.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return DbError::duplicate("handle", identity.handle.clone());
                }
            }
            DbError::from(e)
        })?;

        sqlx::query(UPSERT_DOCUMENT)
            .bind(&identity.id)
            .bind(encoded.credits)
            .bind(&encoded.cart)
            .bind(&encoded.favorites)
            .bind(&encoded.transactions)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Looks up an identity by its handle.
    pub async fn find_by_handle(&self, handle: &str) -> DbResult<Option<IdentityRecord>> {
        let record = sqlx::query_as::<_, IdentityRecord>(
            r#"
            SELECT id, handle, username, password_hash, created_at
            FROM identities
            WHERE handle = ?1
            "#,
        )
        .bind(handle)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Gets an identity by id, failing with `NotFound` when absent.
    pub async fn get_by_id(&self, id: &str) -> DbResult<IdentityRecord> {
        sqlx::query_as::<_, IdentityRecord>(
            r#"
            SELECT id, handle, username, password_hash, created_at
            FROM identities
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Identity", id))
    }
}
