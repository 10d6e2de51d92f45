//! # Repository Module
//!
//! Database repository implementations for Cyber Market.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SqliteBackend (cyber-session)                                         │
//! │       │                                                                 │
//! │       │  db.identities().find_by_handle("v@cybermarket.net")           │
//! │       ▼                                                                 │
//! │  IdentityRepository                  AccountRepository                 │
//! │  ├── create_with_document()          ├── load(identity_id)             │
//! │  ├── find_by_handle()                └── save(identity_id, doc)        │
//! │  └── get_by_id()                                                       │
//! │       │                                     │                           │
//! │       ▼                                     ▼                           │
//! │  identities                          account_documents                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`IdentityRepository`](identity::IdentityRepository) - Credentials and handles
//! - [`AccountRepository`](account::AccountRepository) - Per-identity documents

pub mod account;
pub mod identity;
