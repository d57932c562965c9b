//! # Tax Application Engine
//!
//! Distributes provider-computed tax rates over a cart's line items,
//! shipments and totals.
//!
//! ## Pass Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     apply_to_cart(cart, rates)                          │
//! │                                                                         │
//! │  1. validate_cart        ids without '&', quantities ≥ 0               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  2. TaxRateIndex::build  parse every key once, group by entity id      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  3. compute              LineItemTax / ShipmentTax per entity          │
//! │           │              (any MissingTaxCategory aborts here)          │
//! │           ▼                                                             │
//! │  4. commit               write derived fields, cart total = Σ parts    │
//! │                                                                         │
//! │  Nothing is written before step 4, so a failed pass leaves the cart    │
//! │  exactly as it was.                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Category Rules
//! | Entity    | Required             | Optional            |
//! |-----------|----------------------|---------------------|
//! | LineItem  | `extended`, `list`   | `sale` (else list)  |
//! | Shipment  | `total`, `price`     |                     |
//!
//! An entity with no rates at all is untaxed: with-tax fields equal the base
//! fields and its total is zero.

use tracing::{debug, trace, warn};

use crate::error::{TaxError, TaxResult};
use crate::index::{EntityRates, TaxRateIndex};
use crate::key::TaxCategory;
use crate::money::Money;
use crate::policy::{ShippingQuoteMatch, TaxPolicy};
use crate::types::{CartTaxSummary, LineItem, Shipment, ShippingRate, ShoppingCart, TaxRate};
use crate::validation::{validate_cart, validate_line_item, validate_shipment};

// =============================================================================
// Computed Results
// =============================================================================

/// Derived line item fields, computed before anything is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineItemTax {
    list_price_with_tax: Money,
    sale_price_with_tax: Money,
    tax_total: Money,
    matched: bool,
}

impl LineItemTax {
    fn write_to(self, item: &mut LineItem) {
        item.list_price_with_tax = self.list_price_with_tax;
        item.sale_price_with_tax = self.sale_price_with_tax;
        item.tax_total = self.tax_total;
    }
}

/// Derived shipment fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ShipmentTax {
    shipping_price_with_tax: Money,
    tax_total: Money,
    matched: bool,
}

impl ShipmentTax {
    fn write_to(self, shipment: &mut Shipment) {
        shipment.shipping_price_with_tax = self.shipping_price_with_tax;
        shipment.tax_total = self.tax_total;
    }
}

fn required(rates: &EntityRates, entity_id: &str, category: TaxCategory) -> TaxResult<Money> {
    rates
        .find(&category)
        .ok_or_else(|| TaxError::MissingTaxCategory {
            entity_id: entity_id.to_string(),
            category,
        })
}

fn add(base: Money, delta: Money, entity_id: &str) -> TaxResult<Money> {
    base.checked_add(delta).ok_or_else(|| TaxError::AmountOverflow {
        entity_id: entity_id.to_string(),
    })
}

fn line_item_tax(item: &LineItem, index: &TaxRateIndex) -> TaxResult<LineItemTax> {
    let entity_id = item.entity_id();

    let Some(rates) = index.rates_for(entity_id) else {
        trace!(entity_id, "Line item has no tax rates");
        return Ok(LineItemTax {
            list_price_with_tax: item.list_price,
            sale_price_with_tax: item.sale_price,
            tax_total: Money::zero(),
            matched: false,
        });
    };

    let extended = required(rates, entity_id, TaxCategory::Extended)?;
    let list = required(rates, entity_id, TaxCategory::List)?;
    let sale = rates.find(&TaxCategory::Sale).unwrap_or(list);

    let tax_total = extended
        .checked_multiply_quantity(item.quantity)
        .ok_or_else(|| TaxError::AmountOverflow {
            entity_id: entity_id.to_string(),
        })?;

    Ok(LineItemTax {
        list_price_with_tax: add(item.list_price, list, entity_id)?,
        sale_price_with_tax: add(item.sale_price, sale, entity_id)?,
        tax_total,
        matched: true,
    })
}

fn shipment_tax(shipment: &Shipment, index: &TaxRateIndex) -> TaxResult<ShipmentTax> {
    let entity_id = shipment.id.as_str();

    let Some(rates) = index.rates_for(entity_id) else {
        trace!(entity_id, "Shipment has no tax rates");
        return Ok(ShipmentTax {
            shipping_price_with_tax: shipment.shipping_price,
            tax_total: Money::zero(),
            matched: false,
        });
    };

    let total = required(rates, entity_id, TaxCategory::Total)?;
    let price = required(rates, entity_id, TaxCategory::Price)?;

    Ok(ShipmentTax {
        shipping_price_with_tax: add(shipment.shipping_price, price, entity_id)?,
        tax_total: total,
        matched: true,
    })
}

// =============================================================================
// Engine
// =============================================================================

/// Stateless tax application service. Holds only its policy.
///
/// ## Example
/// ```rust
/// use cartax_core::{LineItem, Money, ShoppingCart, TaxApplicationEngine, TaxPolicy, TaxRate};
///
/// let engine = TaxApplicationEngine::new(TaxPolicy::default());
/// let mut cart = ShoppingCart::new(
///     vec![LineItem::new("LI1", 2, Money::from_cents(1000), Money::from_cents(800))],
///     vec![],
/// );
/// let rates = [
///     TaxRate::new("LI1&extended", Money::from_cents(100)),
///     TaxRate::new("LI1&list", Money::from_cents(50)),
/// ];
///
/// let summary = engine.apply_to_cart(&mut cart, &rates).unwrap();
/// assert_eq!(summary.tax_total, Money::from_cents(200));
/// assert_eq!(cart.items()[0].sale_price_with_tax, Money::from_cents(850));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TaxApplicationEngine {
    policy: TaxPolicy,
}

impl TaxApplicationEngine {
    pub fn new(policy: TaxPolicy) -> Self {
        TaxApplicationEngine { policy }
    }

    pub fn policy(&self) -> &TaxPolicy {
        &self.policy
    }

    /// Applies rates to every line item and shipment and sets the cart total.
    ///
    /// The cart total is reset on every pass, so applying the same rates
    /// twice gives the same result. On error the cart is not modified.
    pub fn apply_to_cart(
        &self,
        cart: &mut ShoppingCart,
        tax_rates: &[TaxRate],
    ) -> TaxResult<CartTaxSummary> {
        validate_cart(cart, &self.policy)?;

        let index = TaxRateIndex::build(tax_rates);
        debug!(
            items = cart.items().len(),
            shipments = cart.shipments().len(),
            rates = index.len(),
            rated_entities = index.entity_count(),
            "Applying tax rates to cart"
        );

        let item_taxes = cart
            .items()
            .iter()
            .map(|item| line_item_tax(item, &index))
            .collect::<TaxResult<Vec<_>>>()?;
        let shipment_taxes = cart
            .shipments()
            .iter()
            .map(|shipment| shipment_tax(shipment, &index))
            .collect::<TaxResult<Vec<_>>>()?;

        let mut summary = CartTaxSummary::default();
        for tax in &item_taxes {
            summary.items_tax = add(summary.items_tax, tax.tax_total, "cart")?;
            summary.taxed_items += usize::from(tax.matched);
        }
        for tax in &shipment_taxes {
            summary.shipping_tax = add(summary.shipping_tax, tax.tax_total, "cart")?;
            summary.taxed_shipments += usize::from(tax.matched);
        }
        summary.tax_total = add(summary.items_tax, summary.shipping_tax, "cart")?;

        if let Some(items) = cart.items.as_mut() {
            for (item, tax) in items.iter_mut().zip(item_taxes) {
                tax.write_to(item);
            }
        }
        if let Some(shipments) = cart.shipments.as_mut() {
            for (shipment, tax) in shipments.iter_mut().zip(shipment_taxes) {
                tax.write_to(shipment);
            }
        }
        cart.tax_total = summary.tax_total;

        debug!(
            tax_total = %summary.tax_total,
            taxed_items = summary.taxed_items,
            taxed_shipments = summary.taxed_shipments,
            "Cart taxes applied"
        );
        Ok(summary)
    }

    /// Returns a taxed copy of the cart, leaving the input untouched.
    pub fn priced_cart(&self, cart: &ShoppingCart, tax_rates: &[TaxRate]) -> TaxResult<ShoppingCart> {
        let mut priced = cart.clone();
        self.apply_to_cart(&mut priced, tax_rates)?;
        Ok(priced)
    }

    /// Applies rates to a single line item.
    ///
    /// Runs the same boundary checks as a cart pass, so a negative quantity
    /// is rejected here too.
    pub fn apply_to_line_item(&self, item: &mut LineItem, tax_rates: &[TaxRate]) -> TaxResult<()> {
        validate_line_item(item, &self.policy)?;
        let index = TaxRateIndex::build(tax_rates);
        line_item_tax(item, &index)?.write_to(item);
        Ok(())
    }

    /// Applies rates to a single shipment.
    pub fn apply_to_shipment(&self, shipment: &mut Shipment, tax_rates: &[TaxRate]) -> TaxResult<()> {
        validate_shipment(shipment, &self.policy)?;
        let index = TaxRateIndex::build(tax_rates);
        shipment_tax(shipment, &index)?.write_to(shipment);
        Ok(())
    }

    /// Applies rates to a shipping quote.
    ///
    /// Quotes key on `"<methodCode>&<optionName>"`, and the option name is
    /// compared byte-for-byte with the text after the first `&`, letter case
    /// included. No match leaves
    /// `rate_with_tax == rate`; several matches resolve per
    /// [`ShippingQuoteMatch`].
    pub fn apply_to_shipping_rate(
        &self,
        shipping_rate: &mut ShippingRate,
        tax_rates: &[TaxRate],
    ) -> TaxResult<()> {
        let index = TaxRateIndex::build(tax_rates);
        self.apply_quote(shipping_rate, &index)
    }

    /// Applies rates to every quote, indexing the rates once.
    ///
    /// Under the strict policy the first ambiguous quote fails the batch and
    /// no quote is modified.
    pub fn apply_to_shipping_rates(
        &self,
        shipping_rates: &mut [ShippingRate],
        tax_rates: &[TaxRate],
    ) -> TaxResult<()> {
        let index = TaxRateIndex::build(tax_rates);
        let taxed = shipping_rates
            .iter()
            .map(|quote| self.quote_with_tax(quote, &index))
            .collect::<TaxResult<Vec<_>>>()?;

        for (quote, rate_with_tax) in shipping_rates.iter_mut().zip(taxed) {
            quote.rate_with_tax = rate_with_tax;
        }
        Ok(())
    }

    fn apply_quote(&self, shipping_rate: &mut ShippingRate, index: &TaxRateIndex) -> TaxResult<()> {
        shipping_rate.rate_with_tax = self.quote_with_tax(shipping_rate, index)?;
        Ok(())
    }

    fn quote_with_tax(&self, quote: &ShippingRate, index: &TaxRateIndex) -> TaxResult<Money> {
        let Some(rates) = index.rates_for(&quote.shipping_method_code) else {
            return Ok(quote.rate);
        };

        let mut matches = rates.matching_label(&quote.option_name);
        let Some(first) = matches.next() else {
            return Ok(quote.rate);
        };

        let extra = matches.count();
        if extra > 0 {
            match self.policy.shipping_quote_match {
                ShippingQuoteMatch::FirstMatch => warn!(
                    method_code = %quote.shipping_method_code,
                    option_name = %quote.option_name,
                    matches = extra + 1,
                    "Several tax rates match shipping quote, using the first"
                ),
                ShippingQuoteMatch::Strict => {
                    return Err(TaxError::AmbiguousShippingRate {
                        method_code: quote.shipping_method_code.clone(),
                        option_name: quote.option_name.clone(),
                        matches: extra + 1,
                    })
                }
            }
        }

        add(quote.rate, first, &quote.shipping_method_code)
    }
}

// =============================================================================
// Default-Policy Shorthands
// =============================================================================

/// [`TaxApplicationEngine::apply_to_cart`] with the default policy.
pub fn apply_to_cart(cart: &mut ShoppingCart, tax_rates: &[TaxRate]) -> TaxResult<CartTaxSummary> {
    TaxApplicationEngine::default().apply_to_cart(cart, tax_rates)
}

/// [`TaxApplicationEngine::apply_to_line_item`] with the default policy.
pub fn apply_to_line_item(item: &mut LineItem, tax_rates: &[TaxRate]) -> TaxResult<()> {
    TaxApplicationEngine::default().apply_to_line_item(item, tax_rates)
}

/// [`TaxApplicationEngine::apply_to_shipment`] with the default policy.
pub fn apply_to_shipment(shipment: &mut Shipment, tax_rates: &[TaxRate]) -> TaxResult<()> {
    TaxApplicationEngine::default().apply_to_shipment(shipment, tax_rates)
}

/// [`TaxApplicationEngine::apply_to_shipping_rate`] with the default policy.
pub fn apply_to_shipping_rate(shipping_rate: &mut ShippingRate, tax_rates: &[TaxRate]) -> TaxResult<()> {
    TaxApplicationEngine::default().apply_to_shipping_rate(shipping_rate, tax_rates)
}

// =============================================================================
// Unit Tests
// =============================================================================
