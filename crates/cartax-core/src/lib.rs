//! # cartax-core: Tax Application for Shopping Carts
//!
//! Takes the flat list of tax rates a tax provider computed for a cart and
//! distributes it over the cart's line items, shipments and totals. Pure
//! business logic with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cart Pricing Pipeline                              │
//! │                                                                         │
//! │  ┌──────────────────┐        ┌──────────────────────────────────────┐  │
//! │  │  Tax provider    │ rates  │    ★ cartax-core (THIS CRATE) ★      │  │
//! │  │  (external)      │───────►│                                      │  │
//! │  └──────────────────┘        │  key ──► index ──► engine            │  │
//! │                              │   │                  │               │  │
//! │  ┌──────────────────┐  cart  │ TaxLineKey     apply_to_cart         │  │
//! │  │  Cart storage    │───────►│ TaxCategory    apply_to_line_item    │  │
//! │  │  (external)      │◄───────│                apply_to_shipment     │  │
//! │  └──────────────────┘ priced │                apply_to_shipping_rate│  │
//! │                              │                                      │  │
//! │                              │  NO I/O • NO DATABASE • NO NETWORK   │  │
//! │                              └──────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Cart entities (ShoppingCart, LineItem, Shipment, ShippingRate, TaxRate)
//! - [`money`] - Decimal money with checked arithmetic
//! - [`key`] - Composite tax line keys, parsed once
//! - [`index`] - Rates grouped by entity id
//! - [`engine`] - The TaxApplicationEngine
//! - [`policy`] - Explicit choices for ambiguous provider input
//! - [`validation`] - Boundary checks on cart data
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use cartax_core::{apply_to_cart, LineItem, Money, Shipment, ShoppingCart, TaxRate};
//!
//! let mut cart = ShoppingCart::new(
//!     vec![LineItem::new("LI1", 2, Money::from_cents(1000), Money::from_cents(800))],
//!     vec![Shipment::new("SH1", Money::from_cents(500))],
//! );
//! let rates = vec![
//!     TaxRate::new("LI1&extended", Money::from_cents(100)),
//!     TaxRate::new("LI1&list", Money::from_cents(50)),
//!     TaxRate::new("LI1&sale", Money::from_cents(30)),
//!     TaxRate::new("SH1&total", Money::from_cents(40)),
//!     TaxRate::new("SH1&price", Money::from_cents(40)),
//! ];
//!
//! apply_to_cart(&mut cart, &rates).unwrap();
//! assert_eq!(cart.tax_total, Money::from_cents(240));
//! assert_eq!(cart.items()[0].sale_price_with_tax.to_string(), "8.30");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod engine;
pub mod error;
pub mod index;
pub mod key;
pub mod money;
pub mod policy;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use engine::{
    apply_to_cart, apply_to_line_item, apply_to_shipment, apply_to_shipping_rate,
    TaxApplicationEngine,
};
pub use error::{TaxError, TaxResult, ValidationError};
pub use key::{TaxCategory, TaxLineKey};
pub use money::Money;
pub use policy::{ShippingQuoteMatch, TaxPolicy};
pub use types::*;
