//! # Account Repository
//!
//! One document per identity. Scalars are columns; collections are JSON text.
//!
//! ```text
//! AccountDocument                         account_documents row
//! ───────────────                         ─────────────────────
//! credits: Credits(37500)        ──►      credits      = 37500
//! cart: [CatalogItem, ..]        ──►      cart         = '[{"id":1,..}]'
//! favorites: {1, 4}              ──►      favorites    = '[1,4]'
//! transactions: [Transaction..]  ──►      transactions = '[{"id":"17..",..}]'
//! ```
//!
//! `save` is a full-document upsert: the row always reflects the most recent
//! write for that identity.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use cyber_core::{AccountDocument, Credits};

pub(crate) const UPSERT_DOCUMENT: &str = r#"
    INSERT INTO account_documents (
        identity_id, credits, cart, favorites, transactions, updated_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    ON CONFLICT(identity_id) DO UPDATE SET
        credits = excluded.credits,
        cart = excluded.cart,
        favorites = excluded.favorites,
        transactions = excluded.transactions,
        updated_at = excluded.updated_at
"#;

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    credits: i64,
    cart: String,
    favorites: String,
    transactions: String,
}

impl AccountRow {
    fn into_document(self) -> DbResult<AccountDocument> {
        let credits = u64::try_from(self.credits)
            .map_err(|_| DbError::Serialization(format!("negative credits: {}", self.credits)))?;

        Ok(AccountDocument {
            credits: Credits::from_units(credits),
            cart: serde_json::from_str(&self.cart)?,
            favorites: serde_json::from_str(&self.favorites)?,
            transactions: serde_json::from_str(&self.transactions)?,
        })
    }
}

/// Column values for one document, ready to bind.
#[derive(Debug)]
pub(crate) struct EncodedDocument {
    pub credits: i64,
    pub cart: String,
    pub favorites: String,
    pub transactions: String,
}

impl EncodedDocument {
    pub fn encode(doc: &AccountDocument) -> DbResult<Self> {
        let credits = i64::try_from(doc.credits.units()).map_err(|_| {
            DbError::Serialization(format!("credits out of range: {}", doc.credits))
        })?;

        Ok(EncodedDocument {
            credits,
            cart: serde_json::to_string(&doc.cart)?,
            favorites: serde_json::to_string(&doc.favorites)?,
            transactions: serde_json::to_string(&doc.transactions)?,
        })
    }
}

/// Repository for account documents.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        AccountRepository { pool }
    }

    /// Loads the document for an identity. `None` when none was ever saved.
    pub async fn load(&self, identity_id: &str) -> DbResult<Option<AccountDocument>> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT credits, cart, favorites, transactions
            FROM account_documents
            WHERE identity_id = ?1
            "#,
        )
        .bind(identity_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_document).transpose()
    }

    /// Writes the whole document, replacing any previous one.
    ///
    /// ## Errors
    /// - `ForeignKeyViolation` if the identity does not exist
    pub async fn save(&self, identity_id: &str, doc: &AccountDocument) -> DbResult<()> {
        debug!(
            identity_id = %identity_id,
            credits = doc.credits.units(),
            cart_len = doc.cart.len(),
            transactions = doc.transactions.len(),
            "Saving account document"
        );

        let encoded = EncodedDocument::encode(doc)?;

        sqlx::query(UPSERT_DOCUMENT)
            .bind(identity_id)
            .bind(encoded.credits)
            .bind(&encoded.cart)
            .bind(&encoded.favorites)
            .bind(&encoded.transactions)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;
    use cyber_core::{Account, Catalog, Identity};

    async fn db_with_identity(id: &str) -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let identity = Identity {
            id: id.to_string(),
            handle: format!("{}@cybermarket.net", id),
            username: id.to_string(),
            created_at: Utc::now(),
        };
        db.identities()
            .create_with_document(&identity, "hash", &AccountDocument::fresh(Credits::from_units(50_000)))
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn test_load_missing_document() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.accounts().load("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_after_checkout() {
        let db = db_with_identity("v").await;
        let catalog = Catalog::builtin();

        let mut account = Account::new(Credits::from_units(50_000));
        account.cart.push(catalog.get(1).unwrap().clone());
        account.cart.push(catalog.get(7).unwrap().clone());
        account.checkout(Utc::now()).unwrap();
        account.favorites.toggle(4);
        account.cart.push(catalog.get(8).unwrap().clone());

        let doc = account.to_document();
        db.accounts().save("v", &doc).await.unwrap();

        let loaded = db.accounts().load("v").await.unwrap().unwrap();
        assert_eq!(loaded, doc);
        assert_eq!(loaded.credits.units(), 33_000);
        assert_eq!(loaded.transactions[0].items.len(), 2);
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_document() {
        let db = db_with_identity("v").await;

        let mut doc = AccountDocument::fresh(Credits::from_units(50_000));
        doc.credits = Credits::from_units(10);
        db.accounts().save("v", &doc).await.unwrap();
        doc.credits = Credits::from_units(20);
        db.accounts().save("v", &doc).await.unwrap();

        let loaded = db.accounts().load("v").await.unwrap().unwrap();
        assert_eq!(loaded.credits.units(), 20);
    }

    #[tokio::test]
    async fn test_save_for_unknown_identity_fails() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let doc = AccountDocument::fresh(Credits::from_units(1));

        let result = db.accounts().save("ghost", &doc).await;
        assert!(matches!(result, Err(DbError::ForeignKeyViolation { .. })));
    }

    #[test]
    fn test_encode_rejects_credits_beyond_i64() {
        let doc = AccountDocument::fresh(Credits::from_units(u64::MAX));
        assert!(matches!(
            EncodedDocument::encode(&doc),
            Err(DbError::Serialization(_))
        ));
    }
}
