//! # Error Types
//!
//! Domain-specific error types for cyber-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cyber-core errors (this file)                                         │
//! │  ├── CoreError        - Checkout / cart rule violations                │
//! │  └── ValidationError  - Credential input failures                      │
//! │                                                                         │
//! │  cyber-db errors (separate crate)                                      │
//! │  └── DbError          - SQLite failures                                │
//! │                                                                         │
//! │  cyber-session errors                                                  │
//! │  ├── BackendError     - Provider outcomes                              │
//! │  └── ActionResult     - What the UI sees                               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ActionResult → Front end          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::credits::Credits;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule failures.
///
/// None of these mutate state: the operation that returns one leaves the
/// account exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Cart total exceeds the available balance.
    ///
    /// ## User Workflow
    /// ```text
    /// credits: 50 000, cart: 12 500 + 45 000
    ///      │
    ///      ▼
    /// InsufficientFunds { required: 57 500, available: 50 000 }
    ///      │
    ///      ▼
    /// UI shows: "INSUFFICIENT FUNDS. TRANSACTION DENIED."
    /// ```
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Credits, available: Credits },

    /// Checkout requested with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Catalog id that does not exist.
    #[error("Unknown catalog item: {0}")]
    UnknownItem(u32),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// The field this error refers to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientFunds {
            required: Credits::from_units(57_500),
            available: Credits::from_units(50_000),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds: required ¥ 57,500, available ¥ 50,000"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::TooShort {
            field: "password".to_string(),
            min: 6,
        };
        assert_eq!(err.to_string(), "password must be at least 6 characters");
        assert_eq!(err.field(), "password");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let err: CoreError = ValidationError::Required {
            field: "username".to_string(),
        }
        .into();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
