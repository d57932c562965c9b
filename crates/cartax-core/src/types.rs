//! # Domain Types
//!
//! Cart entities as the tax engine sees them.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌───────────────────────────────┐                                      │
//! │  │         ShoppingCart          │  tax_total = Σ children              │
//! │  │  items: Option<Vec<LineItem>> │                                      │
//! │  │  shipments: Option<Vec<..>>   │                                      │
//! │  └──────┬─────────────────┬──────┘                                      │
//! │         │                 │                                             │
//! │  ┌──────▼────────┐  ┌─────▼─────────┐   ┌─────────────────┐            │
//! │  │   LineItem    │  │   Shipment    │   │  ShippingRate   │ (quote,    │
//! │  │  list_price   │  │ shipping_price│   │  rate           │  not on    │
//! │  │  sale_price   │  │               │   │                 │  the cart) │
//! │  │  quantity     │  │               │   │                 │            │
//! │  └───────────────┘  └───────────────┘   └─────────────────┘            │
//! │                                                                         │
//! │  ┌───────────────────────────┐                                          │
//! │  │         TaxRate           │  "<entityId>&<category>" + amount        │
//! │  └───────────────────────────┘                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Base prices are populated by the caller. Fields ending in `_with_tax` and
//! `tax_total` are derived and written only by the engine.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::key::TaxLineKey;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// A computed tax amount for one tax line, as delivered by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxRate {
    /// Composite key `"<entityId>&<category>"`.
    pub line_id: String,

    /// Tax amount in major currency units; may carry sub-cent digits.
    pub rate: Money,
}

impl TaxRate {
    /// Creates a tax rate record.
    ///
    /// ## Example
    /// ```rust
    /// use cartax_core::{Money, TaxRate};
    ///
    /// let rate = TaxRate::new("LI1&extended", Money::from_cents(100));
    /// assert_eq!(rate.key().entity_id, "LI1");
    /// ```
    pub fn new(line_id: impl Into<String>, rate: Money) -> Self {
        TaxRate {
            line_id: line_id.into(),
            rate,
        }
    }

    /// Parses the composite line id.
    pub fn key(&self) -> TaxLineKey {
        TaxLineKey::parse(&self.line_id)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A cart entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Entity id. Absent ids match rates keyed with an empty entity id.
    #[serde(default)]
    pub id: Option<String>,

    pub quantity: i64,

    pub list_price: Money,

    pub sale_price: Money,

    #[serde(default)]
    pub list_price_with_tax: Money,

    #[serde(default)]
    pub sale_price_with_tax: Money,

    #[serde(default)]
    pub tax_total: Money,
}

impl LineItem {
    /// Creates an untaxed line item.
    pub fn new(id: impl Into<String>, quantity: i64, list_price: Money, sale_price: Money) -> Self {
        LineItem {
            id: Some(id.into()),
            quantity,
            list_price,
            sale_price,
            ..Default::default()
        }
    }

    /// The id used for rate matching (`""` when absent).
    #[inline]
    pub fn entity_id(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }
}

// =============================================================================
// Shipment
// =============================================================================

/// A shipping line committed to the cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: String,

    pub shipping_price: Money,

    #[serde(default)]
    pub shipping_price_with_tax: Money,

    #[serde(default)]
    pub tax_total: Money,
}

impl Shipment {
    /// Creates an untaxed shipment.
    pub fn new(id: impl Into<String>, shipping_price: Money) -> Self {
        Shipment {
            id: id.into(),
            shipping_price,
            ..Default::default()
        }
    }
}

// =============================================================================
// Shipping Rate
// =============================================================================

/// A rated shipping option offered to the shopper. Not stored on the cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShippingRate {
    pub shipping_method_code: String,

    pub option_name: String,

    pub rate: Money,

    #[serde(default)]
    pub rate_with_tax: Money,
}

impl ShippingRate {
    /// Creates an untaxed quote.
    pub fn new(
        shipping_method_code: impl Into<String>,
        option_name: impl Into<String>,
        rate: Money,
    ) -> Self {
        ShippingRate {
            shipping_method_code: shipping_method_code.into(),
            option_name: option_name.into(),
            rate,
            ..Default::default()
        }
    }
}

// =============================================================================
// Shopping Cart
// =============================================================================

/// The aggregate root.
///
/// Absent collections (`None`) are treated exactly like empty ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingCart {
    #[serde(default)]
    pub items: Option<Vec<LineItem>>,

    #[serde(default)]
    pub shipments: Option<Vec<Shipment>>,

    #[serde(default)]
    pub tax_total: Money,
}

impl ShoppingCart {
    /// Creates a cart with both collections present.
    pub fn new(items: Vec<LineItem>, shipments: Vec<Shipment>) -> Self {
        ShoppingCart {
            items: Some(items),
            shipments: Some(shipments),
            tax_total: Money::zero(),
        }
    }

    /// Line items, empty when absent.
    pub fn items(&self) -> &[LineItem] {
        self.items.as_deref().unwrap_or_default()
    }

    /// Shipments, empty when absent.
    pub fn shipments(&self) -> &[Shipment] {
        self.shipments.as_deref().unwrap_or_default()
    }
}

// =============================================================================
// Cart Tax Summary
// =============================================================================

/// Outcome of a cart pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTaxSummary {
    /// Σ line item tax totals.
    pub items_tax: Money,

    /// Σ shipment tax totals.
    pub shipping_tax: Money,

    /// `items_tax + shipping_tax`; equals the cart's `tax_total`.
    pub tax_total: Money,

    /// Line items that matched at least one rate.
    pub taxed_items: usize,

    /// Shipments that matched at least one rate.
    pub taxed_shipments: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_line_item_entity_id_defaults_to_empty() {
        let mut item = LineItem::new("LI1", 1, Money::zero(), Money::zero());
        assert_eq!(item.entity_id(), "LI1");
        item.id = None;
        assert_eq!(item.entity_id(), "");
    }

    #[test]
    fn test_cart_accessors_treat_absent_as_empty() {
        let cart = ShoppingCart::default();
        assert!(cart.items.is_none());
        assert!(cart.items().is_empty());
        assert!(cart.shipments().is_empty());
    }

    #[test]
    fn test_cart_json_shape() {
        let json = r#"{
            "items": [
                { "id": "LI1", "quantity": 2, "listPrice": 10.00, "salePrice": "8.00" }
            ],
            "shipments": null
        }"#;
        let cart: ShoppingCart = serde_json::from_str(json).unwrap();
        let item = &cart.items()[0];
        assert_eq!(item.list_price, Money::from_cents(1000));
        assert_eq!(item.tax_total, Money::zero());
        assert!(cart.shipments.is_none());

        let out = serde_json::to_value(&cart).unwrap();
        assert_eq!(out["items"][0]["listPriceWithTax"], "0");
        assert_eq!(out["items"][0]["salePrice"], "8.00");
        assert_eq!(out["taxTotal"], "0");
    }

    #[test]
    fn test_tax_rate_json_shape() {
        let rate: TaxRate = serde_json::from_str(r#"{ "lineId": "SH1&price", "rate": 0.45 }"#).unwrap();
        assert_eq!(rate, TaxRate::new("SH1&price", Money::from_cents(45)));

        let rate: TaxRate = serde_json::from_str(r#"{ "lineId": "LI1&extended", "rate": 0.825 }"#).unwrap();
        assert_eq!(rate.rate, Money::new(dec!(0.825)));
    }
}
