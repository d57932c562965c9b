//! # Tax Policy
//!
//! The two decisions the provider contract leaves open, made explicit.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          TaxPolicy                                      │
//! │                                                                         │
//! │  shipping_quote_match     several rates match one shipping quote:      │
//! │    first_match (default)  → use the first, log a warning               │
//! │    strict                 → AmbiguousShippingRate error                │
//! │                                                                         │
//! │  reject_delimited_ids     an entity id contains '&':                   │
//! │    true (default)         → reject the cart before applying anything   │
//! │    false                  → apply anyway (id can never match a rate)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pure data: loading it from files or the environment is the app's job.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// =============================================================================
// Shipping Quote Match
// =============================================================================

/// How a shipping quote resolves several matching rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingQuoteMatch {
    /// Take the first matching rate in provider order.
    #[default]
    FirstMatch,

    /// Treat more than one matching rate as an error.
    Strict,
}

impl std::fmt::Display for ShippingQuoteMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShippingQuoteMatch::FirstMatch => write!(f, "first_match"),
            ShippingQuoteMatch::Strict => write!(f, "strict"),
        }
    }
}

impl std::str::FromStr for ShippingQuoteMatch {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first_match" | "first" => Ok(ShippingQuoteMatch::FirstMatch),
            "strict" => Ok(ShippingQuoteMatch::Strict),
            other => Err(ValidationError::InvalidFormat {
                field: "shipping_quote_match".to_string(),
                reason: format!("unknown value '{}', expected first_match or strict", other),
            }),
        }
    }
}

// =============================================================================
// Tax Policy
// =============================================================================

/// Engine policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxPolicy {
    #[serde(default)]
    pub shipping_quote_match: ShippingQuoteMatch,

    #[serde(default = "default_true")]
    pub reject_delimited_ids: bool,
}

fn default_true() -> bool {
    true
}

impl Default for TaxPolicy {
    fn default() -> Self {
        TaxPolicy {
            shipping_quote_match: ShippingQuoteMatch::default(),
            reject_delimited_ids: default_true(),
        }
    }
}

impl TaxPolicy {
    /// Default policy with strict quote matching.
    pub fn strict() -> Self {
        TaxPolicy {
            shipping_quote_match: ShippingQuoteMatch::Strict,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let policy = TaxPolicy::default();
        assert_eq!(policy.shipping_quote_match, ShippingQuoteMatch::FirstMatch);
        assert!(policy.reject_delimited_ids);
    }

    #[test]
    fn test_quote_match_from_str() {
        assert_eq!("strict".parse::<ShippingQuoteMatch>().unwrap(), ShippingQuoteMatch::Strict);
        assert_eq!("FIRST".parse::<ShippingQuoteMatch>().unwrap(), ShippingQuoteMatch::FirstMatch);
        assert!("loose".parse::<ShippingQuoteMatch>().is_err());
        assert_eq!(ShippingQuoteMatch::Strict.to_string(), "strict");
    }

    #[test]
    fn test_partial_policy_uses_field_defaults() {
        let policy: TaxPolicy = serde_json::from_str(r#"{ "shipping_quote_match": "strict" }"#).unwrap();
        assert_eq!(policy, TaxPolicy::strict());
    }
}
