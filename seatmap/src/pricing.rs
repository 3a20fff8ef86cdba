//! Price tiers
//!
//! A seat carries a [`PriceTier`]; the [`PriceTable`] turns tiers into whole
//! dollar prices. The table is configuration, not part of the venue document.

use crate::venue::PriceTier;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Whole-dollar price
pub type Price = u32;

/// Sum of up to eight prices; wide enough that it cannot overflow
pub type Subtotal = u64;

/// Mapping from price tier to price
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceTable {
    prices: BTreeMap<PriceTier, Price>,
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl PriceTable {
    /// The standard four-tier table: 150, 100, 75, 50
    #[must_use]
    pub fn standard() -> Self {
        Self::from_pairs([(1, 150), (2, 100), (3, 75), (4, 50)])
    }

    /// Build a table from `(tier, price)` pairs
    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (u8, Price)>) -> Self {
        Self {
            prices: pairs
                .into_iter()
                .map(|(tier, price)| (PriceTier(tier), price))
                .collect(),
        }
    }

    /// Price for a tier, if the table knows it
    #[must_use]
    pub fn get(&self, tier: PriceTier) -> Option<Price> {
        self.prices.get(&tier).copied()
    }

    /// Price for a tier, counting unknown tiers as zero
    #[must_use]
    pub fn price_of(&self, tier: PriceTier) -> Price {
        self.get(tier).unwrap_or_else(|| {
            tracing::warn!(tier = tier.0, "Unknown price tier, counting as 0");
            0
        })
    }

    /// Tiers with their prices, cheapest tier number first
    pub fn iter(&self) -> impl Iterator<Item = (PriceTier, Price)> + '_ {
        self.prices.iter().map(|(tier, price)| (*tier, *price))
    }

    /// Number of tiers
    #[must_use]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Whether the table has no tiers
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Error parsing a price table from its `tier=price,...` form
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid price table entry '{entry}': expected <tier>=<price>")]
pub struct ParsePriceTableError {
    /// The offending entry
    pub entry: String,
}

impl FromStr for PriceTable {
    type Err = ParsePriceTableError;

    /// Parse `"1=150,2=100,3=75,4=50"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut prices = BTreeMap::new();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let invalid = || ParsePriceTableError {
                entry: entry.to_string(),
            };
            let (tier, price) = entry.split_once('=').ok_or_else(invalid)?;
            let tier = tier.trim().parse::<u8>().map_err(|_| invalid())?;
            let price = price.trim().parse::<Price>().map_err(|_| invalid())?;
            prices.insert(PriceTier(tier), price);
        }
        if prices.is_empty() {
            return Err(ParsePriceTableError {
                entry: s.to_string(),
            });
        }
        Ok(Self { prices })
    }
}

impl fmt::Display for PriceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (tier, price) in self.iter() {
            if !first {
                f.write_str(",")?;
            }
            first = false;
            write!(f, "{tier}={price}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_prices() {
        let table = PriceTable::standard();
        assert_eq!(table.get(PriceTier(1)), Some(150));
        assert_eq!(table.get(PriceTier(2)), Some(100));
        assert_eq!(table.get(PriceTier(3)), Some(75));
        assert_eq!(table.get(PriceTier(4)), Some(50));
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn unknown_tier_counts_as_zero() {
        let table = PriceTable::standard();
        assert_eq!(table.get(PriceTier(9)), None);
        assert_eq!(table.price_of(PriceTier(9)), 0);
    }

    #[test]
    fn parses_and_displays() {
        let table: PriceTable = "1=200, 2=120".parse().unwrap();
        assert_eq!(table.get(PriceTier(1)), Some(200));
        assert_eq!(table.get(PriceTier(2)), Some(120));
        assert_eq!(table.to_string(), "1=200,2=120");
    }

    #[test]
    fn rejects_malformed_entries() {
        assert!("1=abc".parse::<PriceTable>().is_err());
        assert!("one=100".parse::<PriceTable>().is_err());
        assert!("1:100".parse::<PriceTable>().is_err());
        assert!("".parse::<PriceTable>().is_err());
    }
}
