//! Market pairs, exchange-specific market ids and listing results.

use crate::CanonicalSymbol;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A tradable market: `base` priced in `quote`.
///
/// Ordering and hashing follow `(quote, base)`, the key used by the
/// market identity cache.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MarketPair {
    /// Pricing / settlement currency (e.g. BTC in a BTC market)
    pub quote: CanonicalSymbol,
    /// Traded asset (e.g. ETH)
    pub base: CanonicalSymbol,
}

impl MarketPair {
    pub fn new(quote: CanonicalSymbol, base: CanonicalSymbol) -> Self {
        Self { quote, base }
    }

    /// Convenience constructor from raw strings, upper-cased.
    pub fn from_strs(quote: &str, base: &str) -> Self {
        Self::new(CanonicalSymbol::new(quote), CanonicalSymbol::new(base))
    }

    /// Get the pair symbol (e.g. "ETH/BTC").
    pub fn symbol(&self) -> String {
        format!("{}/{}", self.base, self.quote)
    }
}

impl fmt::Display for MarketPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// Opaque market identifier meaningful to a single adapter only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarketId {
    Number(i64),
    Text(String),
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketId::Number(n) => write!(f, "{}", n),
            MarketId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MarketId {
    fn from(s: &str) -> Self {
        MarketId::Text(s.to_string())
    }
}

impl From<String> for MarketId {
    fn from(s: String) -> Self {
        MarketId::Text(s)
    }
}

impl From<i64> for MarketId {
    fn from(n: i64) -> Self {
        MarketId::Number(n)
    }
}

/// Result of a market listing: quote -> sorted, de-duplicated bases.
pub type MarketListing = BTreeMap<CanonicalSymbol, Vec<CanonicalSymbol>>;

/// Group pairs by quote into a [`MarketListing`].
pub fn group_by_quote<'a, I>(pairs: I) -> MarketListing
where
    I: IntoIterator<Item = &'a MarketPair>,
{
    let mut listing = MarketListing::new();
    for pair in pairs {
        listing
            .entry(pair.quote.clone())
            .or_default()
            .push(pair.base.clone());
    }
    for bases in listing.values_mut() {
        bases.sort();
        bases.dedup();
    }
    listing
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pair_symbol() {
        let pair = MarketPair::from_strs("btc", "eth");
        assert_eq!(pair.quote.as_str(), "BTC");
        assert_eq!(pair.base.as_str(), "ETH");
        assert_eq!(pair.symbol(), "ETH/BTC");
        assert_eq!(pair.to_string(), "ETH/BTC");
    }

    #[test]
    fn test_pair_ordering_by_quote_first() {
        let a = MarketPair::from_strs("BTC", "ZRX");
        let b = MarketPair::from_strs("ETH", "ADA");
        assert!(a < b);
    }

    #[test]
    fn test_market_id_untagged_serde() {
        let text: MarketId = serde_json::from_str(r#""BTC-ETH""#).unwrap();
        assert_eq!(text, MarketId::from("BTC-ETH"));

        let num: MarketId = serde_json::from_str("42").unwrap();
        assert_eq!(num, MarketId::Number(42));
        assert_eq!(num.to_string(), "42");
    }

    #[test]
    fn test_group_by_quote() {
        let pairs = vec![
            MarketPair::from_strs("BTC", "ETH"),
            MarketPair::from_strs("BTC", "ADA"),
            MarketPair::from_strs("ETH", "OMG"),
            MarketPair::from_strs("BTC", "ETH"),
        ];

        let listing = group_by_quote(&pairs);

        assert_eq!(listing.len(), 2);
        assert_eq!(
            listing[&CanonicalSymbol::new("BTC")],
            vec![CanonicalSymbol::new("ADA"), CanonicalSymbol::new("ETH")]
        );
        assert_eq!(
            listing[&CanonicalSymbol::new("ETH")],
            vec![CanonicalSymbol::new("OMG")]
        );
    }
}
