//! # Session Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  BackendError (provider outcome)      AuthErrorKind (what the UI sees) │
//! │  ───────────────────────────────      ──────────────────────────────── │
//! │  IdentityExists          ──────────►  IdentityConflict                 │
//! │  InvalidCredentials      ──────────►  InvalidCredentials               │
//! │  WeakCredential          ──────────►  WeakCredential                   │
//! │  Unavailable             ──────────►  Network                          │
//! │  Other                   ──────────►  Unknown                          │
//! │                                                                         │
//! │  ConfigError: loading market.toml and env overrides                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these escape a store operation: they end up in an
//! [`ActionResult`](crate::ActionResult) or a log line.

use cyber_db::DbError;
use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Provider Errors
// =============================================================================

/// Outcome categories of the authentication/persistence provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The handle is already registered.
    #[error("Identity already exists: {0}")]
    IdentityExists(String),

    /// Unknown handle or wrong password. Deliberately not distinguished.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The provider refused the password.
    #[error("Credential rejected: {0}")]
    WeakCredential(String),

    /// Storage or network failure.
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Provider error: {0}")]
    Other(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

impl From<DbError> for BackendError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation { value, .. } => BackendError::IdentityExists(value),
            e if e.is_unavailable() => BackendError::Unavailable(e.to_string()),
            e => BackendError::Other(e.to_string()),
        }
    }
}

// =============================================================================
// User-Facing Categories
// =============================================================================

/// User-facing failure category for authentication operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthErrorKind {
    InvalidCredentials,
    IdentityConflict,
    WeakCredential,
    Network,
    Unknown,
}

impl AuthErrorKind {
    /// Default terminal message for the category.
    pub fn message(&self) -> &'static str {
        match self {
            AuthErrorKind::InvalidCredentials => "ACCESS DENIED. INVALID CREDENTIALS.",
            AuthErrorKind::IdentityConflict => "IDENTITY ALREADY REGISTERED.",
            AuthErrorKind::WeakCredential => "ACCESS CODE TOO WEAK.",
            AuthErrorKind::Network => "UPLINK FAILURE. NETWORK UNREACHABLE.",
            AuthErrorKind::Unknown => "SYSTEM FAULT. TRY AGAIN.",
        }
    }
}

impl From<&BackendError> for AuthErrorKind {
    fn from(err: &BackendError) -> Self {
        match err {
            BackendError::IdentityExists(_) => AuthErrorKind::IdentityConflict,
            BackendError::InvalidCredentials => AuthErrorKind::InvalidCredentials,
            BackendError::WeakCredential(_) => AuthErrorKind::WeakCredential,
            BackendError::Unavailable(_) => AuthErrorKind::Network,
            BackendError::Other(_) => AuthErrorKind::Unknown,
        }
    }
}

impl std::fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthErrorKind::InvalidCredentials => write!(f, "invalid_credentials"),
            AuthErrorKind::IdentityConflict => write!(f, "identity_conflict"),
            AuthErrorKind::WeakCredential => write!(f, "weak_credential"),
            AuthErrorKind::Network => write!(f, "network"),
            AuthErrorKind::Unknown => write!(f, "unknown"),
        }
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("No config path available")]
    NoConfigPath,
}

pub type ConfigResult<T> = Result<T, ConfigError>;
