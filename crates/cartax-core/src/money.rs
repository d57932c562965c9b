//! # Money Module
//!
//! Provides the `Money` type used for every price, tax amount and total the
//! engine touches.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PROVIDER AMOUNTS ARE NOT ALWAYS WHOLE CENTS                            │
//! │                                                                         │
//! │  Per-unit extended tax from the provider:   0.825                       │
//! │  Quantity:                                  3                           │
//! │                                                                         │
//! │  f64:            0.825 × 3 = 2.4749999999999996   → drift               │
//! │  integer cents:  0.825 does not fit               → rejected / rounded  │
//! │  Decimal:        0.825 × 3 = 2.475                → exact               │
//! │                                                                         │
//! │  Rounding to cents is the caller's presentation concern, not ours.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cartax_core::money::Money;
//! use rust_decimal::Decimal;
//!
//! let extended_tax = Money::new(Decimal::new(825, 3)); // 0.825 per unit
//! let line_tax = extended_tax.checked_multiply_quantity(3).unwrap();
//! assert_eq!(line_tax, Money::new(Decimal::new(2475, 3)));
//!
//! let list_price = Money::from_cents(1000);
//! assert_eq!(list_price.checked_add(Money::from_cents(50)), Some(Money::from_cents(1050)));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in major currency units, backed by `rust_decimal`.
///
/// ## Design Decisions
/// - **Decimal, not float**: provider amounts keep every digit they were sent with
/// - **Checked arithmetic only**: the engine never wraps or panics on overflow;
///   an absurd amount surfaces as an error
/// - **Wire form**: accepts JSON numbers or strings, writes strings (`"10.50"`)
///   so no precision is lost on the way out
///
/// ## Where Money Flows
/// ```text
/// TaxRate.rate ──┬──► LineItem.tax_total (× quantity) ──┐
///                ├──► LineItem.*_price_with_tax          ├──► ShoppingCart.tax_total
///                ├──► Shipment.tax_total ────────────────┘
///                ├──► Shipment.shipping_price_with_tax
///                └──► ShippingRate.rate_with_tax
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Wraps a decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from a count of cents.
    ///
    /// ## Example
    /// ```rust
    /// use cartax_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Money::from_cents(1050).amount(), Decimal::new(1050, 2)); // 10.50
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Returns the decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Multiplies by a quantity, returning `None` on overflow.
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(Decimal::from(qty)).map(Money)
    }

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Sums amounts, returning `None` if any partial sum overflows.
    ///
    /// ## Example
    /// ```rust
    /// use cartax_core::money::Money;
    ///
    /// let parts = [Money::from_cents(200), Money::from_cents(40)];
    /// assert_eq!(Money::checked_sum(parts), Some(Money::from_cents(240)));
    /// assert_eq!(Money::checked_sum(std::iter::empty()), Some(Money::zero()));
    /// ```
    pub fn checked_sum<I>(amounts: I) -> Option<Self>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |total, amount| total.checked_add(amount))
    }
}

/// Plain decimal rendering (`10.50`). Currency formatting is the caller's
/// concern.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
