//! # cyber-db: Persistence Provider for Cyber Market
//!
//! SQLite storage for identities and their account documents. This is the
//! concrete store behind the session crate's provider contract.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cyber Market Data Flow                            │
//! │                                                                         │
//! │  SessionStore::login / mirror write                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     cyber-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │    │   Repositories     │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │◄───│ IdentityRepository │  │ (embedded) │  │   │
//! │  │   │  SqlitePool   │    │ AccountRepository  │  │ 001_*.sql  │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  cyber-market.db (local file, WAL mode)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cyber_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("cyber-market.db")).await?;
//! let doc = db.accounts().load(&identity_id).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::account::AccountRepository;
pub use repository::identity::{IdentityRecord, IdentityRepository};
