//! # Validation Module
//!
//! Boundary checks run before a cart pass touches anything.
//!
//! ## Why Ids Are Checked
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Line item id "A&B"                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Provider keys its rates "A&B&extended", "A&B&list"                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Split on first '&' → entity "A", categories "B&extended", "B&list"     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Item "A&B" silently untaxed, or worse: item "A" picks up junk rates   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cartax_core::validation::{validate_entity_id, validate_quantity};
//!
//! assert!(validate_entity_id("line item id", "LI1").is_ok());
//! assert!(validate_entity_id("line item id", "LI&1").is_err());
//! assert!(validate_quantity(0).is_ok());
//! ```

use crate::error::ValidationError;
use crate::key::KEY_DELIMITER;
use crate::policy::TaxPolicy;
use crate::types::{LineItem, Shipment, ShoppingCart};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Rejects ids that contain the composite key delimiter.
pub fn validate_entity_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.contains(KEY_DELIMITER) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("'{}' must not contain '{}'", id, KEY_DELIMITER),
        });
    }

    Ok(())
}

/// Validates a line item quantity.
///
/// ## Rules
/// - Must be non-negative (zero is a valid, untaxed-in-total line)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates one line item: quantity always, id per policy.
pub fn validate_line_item(item: &LineItem, policy: &TaxPolicy) -> ValidationResult<()> {
    validate_quantity(item.quantity)?;
    if policy.reject_delimited_ids {
        validate_entity_id("line item id", item.entity_id())?;
    }

    Ok(())
}

/// Validates one shipment id per policy.
pub fn validate_shipment(shipment: &Shipment, policy: &TaxPolicy) -> ValidationResult<()> {
    if policy.reject_delimited_ids {
        validate_entity_id("shipment id", &shipment.id)?;
    }

    Ok(())
}

/// Validates every line item and shipment of a cart.
pub fn validate_cart(cart: &ShoppingCart, policy: &TaxPolicy) -> ValidationResult<()> {
    for item in cart.items() {
        validate_line_item(item, policy)?;
    }
    for shipment in cart.shipments() {
        validate_shipment(shipment, policy)?;
    }

    Ok(())
}
