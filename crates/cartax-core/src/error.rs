//! # Error Types
//!
//! Domain-specific error types for cartax-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cartax-core errors (this file)                                        │
//! │  ├── TaxError         - Failures of a tax application pass             │
//! │  └── ValidationError  - Cart data rejected at the boundary             │
//! │                                                                         │
//! │  cartax-cli errors (app)                                               │
//! │  └── CliError         - Config, file and JSON failures                 │
//! │                                                                         │
//! │  Flow: ValidationError → TaxError → CliError → exit code               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An entity with no matching rates at all is NOT an error: it is the normal
//! untaxed path. Only an incomplete set of rates for an entity is.

use thiserror::Error;

use crate::key::TaxCategory;

// =============================================================================
// Tax Error
// =============================================================================

/// Errors raised while applying tax rates to a cart.
///
/// Any of these aborts the whole pass; the cart is left as it was.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxError {
    /// Rates matched an entity but a required category is missing.
    ///
    /// ## When This Occurs
    /// The tax provider returned rates for the entity, but not all of them:
    /// ```text
    /// rates: ["LI1&list"]           line item LI1
    ///      │                              │
    ///      └──────── matched ─────────────┘
    ///                   │
    ///                   ▼
    ///  "extended" required, absent
    ///                   │
    ///                   ▼
    /// MissingTaxCategory { entity_id: "LI1", category: Extended }
    /// ```
    /// This is a contract violation by the provider (stale or partial
    /// computation) and is never recovered locally.
    #[error("Missing tax category '{category}' for entity '{entity_id}'")]
    MissingTaxCategory {
        entity_id: String,
        category: TaxCategory,
    },

    /// More than one rate matched a shipping quote under the strict policy.
    #[error(
        "Ambiguous tax rate for shipping method '{method_code}' option '{option_name}': {matches} matches"
    )]
    AmbiguousShippingRate {
        method_code: String,
        option_name: String,
        matches: usize,
    },

    /// A computed amount does not fit in `Money`.
    #[error("Tax amount overflow for entity '{entity_id}'")]
    AmountOverflow { entity_id: String },

    /// Cart data failed boundary validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors for cart entities.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. an entity id containing the key delimiter).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with TaxError.
pub type TaxResult<T> = Result<T, TaxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TaxError::MissingTaxCategory {
            entity_id: "LI1".to_string(),
            category: TaxCategory::Extended,
        };
        assert_eq!(
            err.to_string(),
            "Missing tax category 'extended' for entity 'LI1'"
        );

        let err = TaxError::AmbiguousShippingRate {
            method_code: "FedEx".to_string(),
            option_name: "Ground".to_string(),
            matches: 2,
        };
        assert_eq!(
            err.to_string(),
            "Ambiguous tax rate for shipping method 'FedEx' option 'Ground': 2 matches"
        );
    }

    #[test]
    fn test_validation_converts_to_tax_error() {
        let validation_err = ValidationError::InvalidFormat {
            field: "line item id".to_string(),
            reason: "must not contain '&'".to_string(),
        };
        let tax_err: TaxError = validation_err.into();
        assert!(matches!(tax_err, TaxError::Validation(_)));
        assert_eq!(
            tax_err.to_string(),
            "Validation error: line item id has invalid format: must not contain '&'"
        );
    }
}
