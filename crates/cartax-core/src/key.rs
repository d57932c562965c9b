//! # Tax Line Keys
//!
//! The tax provider identifies each rate with a composite string
//! `"<entityId>&<category>"`. This module parses that string exactly once
//! into a [`TaxLineKey`] so the rest of the engine works with structured
//! values instead of re-splitting strings.
//!
//! ## Key Anatomy
//! ```text
//!   "LI1&extended"          "FedEx&Ground & Rush"
//!    ─┬─ ────┬───            ──┬── ──────┬──────
//!     │      │                 │         │
//!  entity  category         method    option name (byte-exact,
//!   id    (known, any         code     everything after the
//!         letter case)                 FIRST '&')
//! ```

use std::fmt;

/// The delimiter between entity id and category in a composite key.
pub const KEY_DELIMITER: char = '&';

// =============================================================================
// Tax Category
// =============================================================================

/// The adjustment type a tax rate carries.
///
/// Line items use `Extended`, `List` and `Sale`; shipments use `Total` and
/// `Price`. Shipping quotes do not use this type; they match on the raw
/// category text of [`TaxLineKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaxCategory {
    /// Per-unit tax on a line item, multiplied by quantity.
    Extended,
    /// Tax delta on the list price.
    List,
    /// Tax delta on the sale price.
    Sale,
    /// Tax total of a shipment.
    Total,
    /// Tax delta on the shipping price.
    Price,
    /// Any other category, kept verbatim.
    Other(String),
}

impl TaxCategory {
    /// Parses a category, recognising the known names case-insensitively.
    ///
    /// ## Example
    /// ```rust
    /// use cartax_core::key::TaxCategory;
    ///
    /// assert_eq!(TaxCategory::parse("EXTENDED"), TaxCategory::Extended);
    /// assert_eq!(
    ///     TaxCategory::parse("Ground"),
    ///     TaxCategory::Other("Ground".to_string())
    /// );
    /// ```
    pub fn parse(raw: &str) -> Self {
        const KNOWN: [(&str, TaxCategory); 5] = [
            ("extended", TaxCategory::Extended),
            ("list", TaxCategory::List),
            ("sale", TaxCategory::Sale),
            ("total", TaxCategory::Total),
            ("price", TaxCategory::Price),
        ];

        KNOWN
            .into_iter()
            .find(|(name, _)| raw.eq_ignore_ascii_case(name))
            .map(|(_, category)| category)
            .unwrap_or_else(|| TaxCategory::Other(raw.to_string()))
    }

    /// Returns the canonical text of the category.
    pub fn as_str(&self) -> &str {
        match self {
            TaxCategory::Extended => "extended",
            TaxCategory::List => "list",
            TaxCategory::Sale => "sale",
            TaxCategory::Total => "total",
            TaxCategory::Price => "price",
            TaxCategory::Other(name) => name,
        }
    }

    /// True for the five categories with a fixed meaning.
    pub fn is_known(&self) -> bool {
        !matches!(self, TaxCategory::Other(_))
    }
}

impl fmt::Display for TaxCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Tax Line Key
// =============================================================================

/// Structured form of a composite tax line id.
///
/// The category is kept as the provider sent it. Line items and shipments
/// interpret it through [`TaxLineKey::tax_category`]; shipping quotes compare
/// it byte-for-byte against the option name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaxLineKey {
    pub entity_id: String,
    /// Text after the first delimiter, `None` when the key has no delimiter.
    pub category: Option<String>,
}

impl TaxLineKey {
    /// Builds a key from an entity id and category text.
    pub fn new(entity_id: impl Into<String>, category: impl Into<String>) -> Self {
        TaxLineKey {
            entity_id: entity_id.into(),
            category: Some(category.into()),
        }
    }

    /// Splits a composite key on the FIRST delimiter.
    ///
    /// Never fails: a key without a delimiter is all entity id and carries no
    /// category, so it matches the entity but satisfies no required category
    /// and no shipping option.
    ///
    /// ## Example
    /// ```rust
    /// use cartax_core::key::{TaxCategory, TaxLineKey};
    ///
    /// let key = TaxLineKey::parse("LI1&List");
    /// assert_eq!(key.entity_id, "LI1");
    /// assert_eq!(key.category.as_deref(), Some("List"));
    /// assert_eq!(key.tax_category(), Some(TaxCategory::List));
    ///
    /// let key = TaxLineKey::parse("FedEx&Ground&Rush");
    /// assert_eq!(key.entity_id, "FedEx");
    /// assert_eq!(key.category.as_deref(), Some("Ground&Rush"));
    ///
    /// assert_eq!(TaxLineKey::parse("UPS").category, None);
    /// ```
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(KEY_DELIMITER) {
            Some((entity_id, category)) => TaxLineKey::new(entity_id, category),
            None => TaxLineKey {
                entity_id: raw.to_string(),
                category: None,
            },
        }
    }

    /// The category interpreted for line items and shipments.
    pub fn tax_category(&self) -> Option<TaxCategory> {
        self.category.as_deref().map(TaxCategory::parse)
    }
}

/// Re-composes the provider's string form.
impl fmt::Display for TaxLineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.category {
            Some(category) => write!(f, "{}{}{}", self.entity_id, KEY_DELIMITER, category),
            None => f.write_str(&self.entity_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_categories_any_case() {
        assert_eq!(TaxCategory::parse("extended"), TaxCategory::Extended);
        assert_eq!(TaxCategory::parse("List"), TaxCategory::List);
        assert_eq!(TaxCategory::parse("SALE"), TaxCategory::Sale);
        assert_eq!(TaxCategory::parse("Total"), TaxCategory::Total);
        assert_eq!(TaxCategory::parse("pRiCe"), TaxCategory::Price);
        assert!(TaxCategory::parse("price").is_known());
    }

    #[test]
    fn test_other_category_is_verbatim() {
        let category = TaxCategory::parse("Next Day Air");
        assert_eq!(category, TaxCategory::Other("Next Day Air".to_string()));
        assert_eq!(category.to_string(), "Next Day Air");
        assert!(!category.is_known());
    }

    #[test]
    fn test_parse_splits_on_first_delimiter() {
        let key = TaxLineKey::parse("SH1&total");
        assert_eq!(key, TaxLineKey::new("SH1", "total"));
        assert_eq!(key.tax_category(), Some(TaxCategory::Total));

        let key = TaxLineKey::parse("UPS&Ground&Saver");
        assert_eq!(key.entity_id, "UPS");
        assert_eq!(key.category.as_deref(), Some("Ground&Saver"));
    }

    #[test]
    fn test_category_text_keeps_letter_case() {
        let key = TaxLineKey::parse("UPS&TOTAL");
        assert_eq!(key.category.as_deref(), Some("TOTAL"));
        assert_eq!(key.tax_category(), Some(TaxCategory::Total));
    }

    #[test]
    fn test_parse_without_delimiter_has_no_category() {
        let key = TaxLineKey::parse("LI1");
        assert_eq!(key.entity_id, "LI1");
        assert_eq!(key.category, None);
        assert_eq!(key.tax_category(), None);
    }

    #[test]
    fn test_trailing_delimiter_is_empty_category() {
        let key = TaxLineKey::parse("UPS&");
        assert_eq!(key.category.as_deref(), Some(""));
    }

    #[test]
    fn test_parse_empty_entity_id() {
        // Line items without an id match rates keyed "&<category>".
        let key = TaxLineKey::parse("&list");
        assert_eq!(key.entity_id, "");
        assert_eq!(key.tax_category(), Some(TaxCategory::List));
    }

    #[test]
    fn test_display_recomposes_verbatim() {
        assert_eq!(TaxLineKey::parse("LI1&Extended").to_string(), "LI1&Extended");
        assert_eq!(TaxLineKey::parse("LI1").to_string(), "LI1");
    }
}
