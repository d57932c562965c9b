//! # Pricing Run
//!
//! Reads the input documents, runs the engine, builds the output document.
//!
//! ```text
//!  cart.json ─────┐
//!  rates.json ────┼──► TaxApplicationEngine ──► PricingOutput (stdout)
//!  quotes.json ───┘        (policy from Config)
//!  (optional)
//! ```

use std::path::Path;

use cartax_core::{CartTaxSummary, ShippingRate, ShoppingCart, TaxApplicationEngine, TaxRate};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::error::{CliError, CliResult};

/// Paths of the documents for one run.
#[derive(Debug, Clone)]
pub struct PricingInput<'a> {
    pub cart: &'a Path,
    pub rates: &'a Path,
    pub shipping_rates: Option<&'a Path>,
}

/// What the CLI prints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingOutput {
    pub cart: ShoppingCart,
    pub summary: CartTaxSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_rates: Option<Vec<ShippingRate>>,
}

/// Reads and deserializes a JSON document.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Runs one pricing pass over the given documents.
pub fn run(engine: &TaxApplicationEngine, input: &PricingInput<'_>) -> CliResult<PricingOutput> {
    let mut cart: ShoppingCart = read_json(input.cart)?;
    let tax_rates: Vec<TaxRate> = read_json(input.rates)?;

    let summary = engine.apply_to_cart(&mut cart, &tax_rates)?;
    info!(
        tax_total = %summary.tax_total,
        taxed_items = summary.taxed_items,
        taxed_shipments = summary.taxed_shipments,
        "Cart priced"
    );

    let shipping_rates = match input.shipping_rates {
        Some(path) => {
            let mut quotes: Vec<ShippingRate> = read_json(path)?;
            engine.apply_to_shipping_rates(&mut quotes, &tax_rates)?;
            info!(quotes = quotes.len(), "Shipping quotes priced");
            Some(quotes)
        }
        None => None,
    };

    Ok(PricingOutput {
        cart,
        summary,
        shipping_rates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartax_core::{Money, TaxError, TaxPolicy};
    use rust_decimal_macros::dec;
    use std::fs;
    use tempfile::TempDir;

    const CART: &str = r#"{
        "items": [
            { "id": "LI1", "quantity": 2, "listPrice": 10.00, "salePrice": 8.00 }
        ],
        "shipments": [
            { "id": "SH1", "shippingPrice": "5.00" }
        ]
    }"#;

    const RATES: &str = r#"[
        { "lineId": "LI1&extended", "rate": 0.825 },
        { "lineId": "LI1&list", "rate": 0.50 },
        { "lineId": "SH1&total", "rate": 0.40 },
        { "lineId": "SH1&price", "rate": 0.40 },
        { "lineId": "UPS&Ground", "rate": 0.60 },
        { "lineId": "UPS&Ground", "rate": 0.70 }
    ]"#;

    const QUOTES: &str = r#"[
        { "shippingMethodCode": "UPS", "optionName": "Ground", "rate": 6.00 }
    ]"#;

    fn write_docs(dir: &TempDir) {
        fs::write(dir.path().join("cart.json"), CART).unwrap();
        fs::write(dir.path().join("rates.json"), RATES).unwrap();
        fs::write(dir.path().join("quotes.json"), QUOTES).unwrap();
    }

    #[test]
    fn test_run_prices_cart_and_quotes() {
        let dir = tempfile::tempdir().unwrap();
        write_docs(&dir);
        let cart = dir.path().join("cart.json");
        let rates = dir.path().join("rates.json");
        let quotes = dir.path().join("quotes.json");

        let output = run(
            &TaxApplicationEngine::default(),
            &PricingInput {
                cart: &cart,
                rates: &rates,
                shipping_rates: Some(&quotes),
            },
        )
        .unwrap();

        // 0.825 × 2 + 0.40
        assert_eq!(output.summary.tax_total, Money::new(dec!(2.05)));
        assert_eq!(output.cart.tax_total, Money::new(dec!(2.05)));
        assert_eq!(output.cart.items()[0].sale_price_with_tax, Money::from_cents(850));
        let quotes = output.shipping_rates.unwrap();
        assert_eq!(quotes[0].rate_with_tax, Money::from_cents(660));
    }

    #[test]
    fn test_run_strict_policy_rejects_duplicate_quotes() {
        let dir = tempfile::tempdir().unwrap();
        write_docs(&dir);
        let cart = dir.path().join("cart.json");
        let rates = dir.path().join("rates.json");
        let quotes = dir.path().join("quotes.json");

        let result = run(
            &TaxApplicationEngine::new(TaxPolicy::strict()),
            &PricingInput {
                cart: &cart,
                rates: &rates,
                shipping_rates: Some(&quotes),
            },
        );

        assert!(matches!(
            result,
            Err(CliError::Tax(TaxError::AmbiguousShippingRate { matches: 2, .. }))
        ));
    }

    #[test]
    fn test_output_omits_absent_quotes() {
        let dir = tempfile::tempdir().unwrap();
        write_docs(&dir);
        let cart = dir.path().join("cart.json");
        let rates = dir.path().join("rates.json");

        let output = run(
            &TaxApplicationEngine::default(),
            &PricingInput {
                cart: &cart,
                rates: &rates,
                shipping_rates: None,
            },
        )
        .unwrap();

        let json = serde_json::to_value(&output).unwrap();
        assert!(json.get("shippingRates").is_none());
        assert!(json["summary"]["taxTotal"].is_string());
        let tax_total: Money = serde_json::from_value(json["summary"]["taxTotal"].clone()).unwrap();
        assert_eq!(tax_total, Money::new(dec!(2.05)));
    }

    #[test]
    fn test_bad_json_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rates.json");
        fs::write(&path, "{ not json").unwrap();

        match read_json::<Vec<TaxRate>>(&path) {
            Err(CliError::Json { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected JSON error, got {:?}", other),
        }
    }
}
