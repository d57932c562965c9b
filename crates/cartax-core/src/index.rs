//! # Tax Rate Index
//!
//! Groups a flat rate list by entity id once per pass, so each entity lookup
//! is a map access instead of a scan over every rate.
//!
//! ```text
//!  rates (flat, provider order)            TaxRateIndex
//!  ───────────────────────────             ─────────────────────────────
//!  LI1&extended  100                       "LI1" → [Extended 100,
//!  SH1&total      45         build()                List      50]
//!  LI1&list       50        ───────►       "SH1" → [Total     45,
//!  SH1&price      45                                Price     45]
//! ```
//!
//! Entries keep provider order within an entity, so when the provider sends
//! the same key twice the first one wins.

use std::collections::HashMap;

use crate::key::{TaxCategory, TaxLineKey};
use crate::money::Money;
use crate::types::TaxRate;

/// One indexed rate: the category as sent, its interpretation, and the amount.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RateEntry {
    label: Option<String>,
    category: Option<TaxCategory>,
    amount: Money,
}

/// Rates for one entity, in provider order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityRates {
    entries: Vec<RateEntry>,
}

impl EntityRates {
    /// First amount recorded for `category`, compared case-insensitively for
    /// the known names.
    pub fn find(&self, category: &TaxCategory) -> Option<Money> {
        self.entries
            .iter()
            .find(|entry| entry.category.as_ref() == Some(category))
            .map(|entry| entry.amount)
    }

    /// Every amount whose category text equals `label` byte-for-byte.
    ///
    /// Keys without a delimiter never match, not even an empty label.
    pub fn matching_label<'a>(&'a self, label: &'a str) -> impl Iterator<Item = Money> + 'a {
        self.entries
            .iter()
            .filter(move |entry| entry.label.as_deref() == Some(label))
            .map(|entry| entry.amount)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rates grouped by entity id.
#[derive(Debug, Clone, Default)]
pub struct TaxRateIndex {
    by_entity: HashMap<String, EntityRates>,
    rate_count: usize,
}

impl TaxRateIndex {
    /// Parses every key and groups the amounts by entity id.
    ///
    /// ## Example
    /// ```rust
    /// use cartax_core::index::TaxRateIndex;
    /// use cartax_core::key::TaxCategory;
    /// use cartax_core::{Money, TaxRate};
    ///
    /// let index = TaxRateIndex::build(&[
    ///     TaxRate::new("LI1&extended", Money::from_cents(100)),
    ///     TaxRate::new("LI1&list", Money::from_cents(50)),
    /// ]);
    /// let rates = index.rates_for("LI1").unwrap();
    /// assert_eq!(rates.find(&TaxCategory::List), Some(Money::from_cents(50)));
    /// assert!(index.rates_for("LI2").is_none());
    /// ```
    pub fn build(tax_rates: &[TaxRate]) -> Self {
        let mut by_entity: HashMap<String, EntityRates> = HashMap::new();

        for rate in tax_rates {
            let key = rate.key();
            let category = key.tax_category();
            let TaxLineKey { entity_id, category: label } = key;
            by_entity.entry(entity_id).or_default().entries.push(RateEntry {
                label,
                category,
                amount: rate.rate,
            });
        }

        TaxRateIndex {
            by_entity,
            rate_count: tax_rates.len(),
        }
    }

    /// Rates keyed to `entity_id`, or `None` when the entity is untaxed.
    pub fn rates_for(&self, entity_id: &str) -> Option<&EntityRates> {
        self.by_entity.get(entity_id)
    }

    /// Number of distinct entity ids.
    pub fn entity_count(&self) -> usize {
        self.by_entity.len()
    }

    /// Number of rates indexed.
    pub fn len(&self) -> usize {
        self.rate_count
    }

    pub fn is_empty(&self) -> bool {
        self.rate_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(key: &str, cents: i64) -> TaxRate {
        TaxRate::new(key, Money::from_cents(cents))
    }

    #[test]
    fn test_groups_by_entity() {
        let index = TaxRateIndex::build(&[
            rate("LI1&extended", 100),
            rate("SH1&total", 45),
            rate("LI1&list", 50),
        ]);

        assert_eq!(index.len(), 3);
        assert_eq!(index.entity_count(), 2);
        assert_eq!(index.rates_for("LI1").map(EntityRates::len), Some(2));
        assert_eq!(
            index.rates_for("SH1").and_then(|r| r.find(&TaxCategory::Total)),
            Some(Money::from_cents(45))
        );
    }

    #[test]
    fn test_first_duplicate_wins() {
        let index = TaxRateIndex::build(&[rate("LI1&list", 50), rate("LI1&LIST", 70)]);
        let rates = index.rates_for("LI1").unwrap();

        assert_eq!(rates.find(&TaxCategory::List), Some(Money::from_cents(50)));
        assert_eq!(rates.matching_label("list").count(), 1);
        assert_eq!(rates.matching_label("LIST").count(), 1);
    }

    #[test]
    fn test_label_match_is_byte_exact() {
        let index = TaxRateIndex::build(&[rate("UPS&total", 60), rate("UPS&Ground", 70)]);
        let rates = index.rates_for("UPS").unwrap();

        assert_eq!(rates.matching_label("Total").count(), 0);
        assert_eq!(rates.matching_label("ground").count(), 0);
        assert_eq!(
            rates.matching_label("Ground").collect::<Vec<_>>(),
            vec![Money::from_cents(70)]
        );
    }

    #[test]
    fn test_key_without_delimiter_matches_no_label() {
        let index = TaxRateIndex::build(&[rate("UPS", 60)]);
        let rates = index.rates_for("UPS").unwrap();

        assert_eq!(rates.len(), 1);
        assert_eq!(rates.matching_label("").count(), 0);
        assert_eq!(rates.find(&TaxCategory::Total), None);
    }

    #[test]
    fn test_empty_index() {
        let index = TaxRateIndex::build(&[]);
        assert!(index.is_empty());
        assert!(index.rates_for("").is_none());
    }
}
