//! # Validation Module
//!
//! Credential rules applied before anything reaches the provider.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Front end                                                     │
//! │  └── "IDENTITY REQUIRED" / "ACCESS CODE REQUIRED"                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── username: required, 3-32 chars, [A-Za-z0-9_-]                     │
//! │  └── password: required; at signup, minimum length                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Provider                                                      │
//! │  └── UNIQUE handle, password hash check                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cyber_core::validation::{identity_handle, validate_username};
//!
//! assert!(validate_username("v_netrunner").is_ok());
//! assert!(validate_username("").is_err());
//! assert_eq!(identity_handle(" Johnny ", "cybermarket.net"), "johnny@cybermarket.net");
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 32;
const PASSWORD_MAX: usize = 128;

/// Validates a username (the user-facing identity).
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    let len = username.chars().count();
    if len < USERNAME_MIN {
        return Err(ValidationError::TooShort {
            field: "username".to_string(),
            min: USERNAME_MIN,
        });
    }
    if len > USERNAME_MAX {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: USERNAME_MAX,
        });
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a password presented at login.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.chars().count() > PASSWORD_MAX {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: PASSWORD_MAX,
        });
    }

    Ok(())
}

/// Validates a password chosen at signup.
///
/// A `TooShort` error here is what the provider contract calls a weak
/// credential.
pub fn validate_new_password(password: &str, min_len: usize) -> ValidationResult<()> {
    validate_password(password)?;

    if password.chars().count() < min_len {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: min_len,
        });
    }

    Ok(())
}

/// Derives the provider handle for a username.
///
/// Handles are case-insensitive: `Johnny` and `johnny` are the same
/// identity.
pub fn identity_handle(username: &str, domain: &str) -> String {
    format!("{}@{}", username.trim().to_lowercase(), domain)
}
