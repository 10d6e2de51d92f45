//! # cyber-session: Session Store for Cyber Market
//!
//! Owns the running session (cart, favorites, balance, history, view
//! parameters) and keeps the provider's copy of the account in step.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  apps/terminal (or any UI)                                             │
//! │       │  &mut SessionStore                                             │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  cyber-session (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │  SessionStore ──► Mirror task ──┐                               │   │
//! │  │       │                         │                               │   │
//! │  │       └──► Arc<dyn SessionBackend> ◄──┘                         │   │
//! │  │                 │                                               │   │
//! │  │                 └── SqliteBackend (argon2)                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                         │                                       │
//! │       ▼                         ▼                                       │
//! │  cyber-core (rules)        cyber-db (SQLite)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let config = SessionConfig::load(None)?;
//! let db = Database::new(DbConfig::new(config.database_path())).await?;
//! let backend = Arc::new(SqliteBackend::new(db, &config));
//!
//! let mut store = SessionStore::new(backend, config);
//! store.add_to_cart_by_id(1);
//! let result = store.checkout();
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod mirror;
pub mod store;

pub use backend::{Credentials, SessionBackend, SqliteBackend};
pub use config::SessionConfig;
pub use error::{AuthErrorKind, BackendError, BackendResult, ConfigError, ConfigResult};
pub use mirror::Mirror;
pub use store::{ActionResult, SessionPhase, SessionStore};
