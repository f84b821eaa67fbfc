//! Canonical asset symbols and the quote-currency allow-list.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised when a string cannot be used as an asset symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("empty symbol")]
    Empty,

    #[error("invalid character {ch:?} in symbol {symbol:?}")]
    InvalidChar { symbol: String, ch: char },
}

/// Uppercase asset code used uniformly across adapters (e.g. "BTC", "USDT").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalSymbol(CompactString);

impl CanonicalSymbol {
    /// Build a symbol, trimming and upper-casing the input without validation.
    pub fn new(symbol: &str) -> Self {
        Self(CompactString::new(symbol.trim().to_ascii_uppercase()))
    }

    /// Build a symbol, rejecting empty input and separator characters.
    pub fn parse(symbol: &str) -> Result<Self, SymbolError> {
        let trimmed = symbol.trim();
        if trimmed.is_empty() {
            return Err(SymbolError::Empty);
        }
        if let Some(ch) = trimmed
            .chars()
            .find(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '?' | '&' | '#'))
        {
            return Err(SymbolError::InvalidChar {
                symbol: trimmed.to_string(),
                ch,
            });
        }
        Ok(Self::new(trimmed))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CanonicalSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalSymbol {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for CanonicalSymbol {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for CanonicalSymbol {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for CanonicalSymbol {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Quote currencies a consumer is interested in.
///
/// Markets whose canonical quote is not a member are dropped from listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteAllowList(BTreeSet<CanonicalSymbol>);

impl QuoteAllowList {
    /// Quotes used when nothing else is configured.
    pub const DEFAULT_QUOTES: [&'static str; 4] = ["ETH", "BTC", "USDT", "USD"];

    pub fn new<I, S>(quotes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            quotes
                .into_iter()
                .map(|q| CanonicalSymbol::new(q.as_ref()))
                .collect(),
        )
    }

    #[inline]
    pub fn contains(&self, quote: &CanonicalSymbol) -> bool {
        self.0.contains(quote)
    }

    /// Check membership for a raw string, case-insensitively.
    pub fn contains_str(&self, quote: &str) -> bool {
        self.0.contains(&CanonicalSymbol::new(quote))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanonicalSymbol> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for QuoteAllowList {
    fn default() -> Self {
        Self::new(Self::DEFAULT_QUOTES)
    }
}

impl FromIterator<CanonicalSymbol> for QuoteAllowList {
    fn from_iter<T: IntoIterator<Item = CanonicalSymbol>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
