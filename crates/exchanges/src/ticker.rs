//! Exchange-native ticker aliases.
//!
//! Most exchanges already use canonical asset codes; the table only lists
//! the exceptions (e.g. Binance's `BCC` for Bitcoin Cash).

use cointrage_core::CanonicalSymbol;
use std::collections::HashMap;

/// Forward table `native -> canonical` with reverse lookup.
#[derive(Debug, Clone, Default)]
pub struct TickerMap {
    forward: HashMap<String, CanonicalSymbol>,
    reverse: HashMap<CanonicalSymbol, String>,
}

impl TickerMap {
    pub fn new<I, K, V>(aliases: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut map = Self::default();
        for (native, canonical) in aliases {
            map.insert(native.as_ref(), canonical.as_ref());
        }
        map
    }

    /// Add an alias. A later alias for the same canonical symbol does not
    /// replace the reverse entry of an earlier one.
    pub fn insert(&mut self, native: &str, canonical: &str) {
        let native = native.trim().to_ascii_uppercase();
        let canonical = CanonicalSymbol::new(canonical);
        self.reverse
            .entry(canonical.clone())
            .or_insert_with(|| native.clone());
        self.forward.insert(native, canonical);
    }

    /// Canonical form of an exchange-native ticker. Unmapped tickers are
    /// their own canonical form.
    pub fn normalize(&self, native: &str) -> CanonicalSymbol {
        let upper = native.trim().to_ascii_uppercase();
        match self.forward.get(&upper) {
            Some(canonical) => canonical.clone(),
            None => CanonicalSymbol::new(&upper),
        }
    }

    /// Exchange-native spelling of a canonical ticker, used when building
    /// outbound requests.
    pub fn to_native(&self, canonical: &CanonicalSymbol) -> String {
        self.reverse
            .get(canonical)
            .cloned()
            .unwrap_or_else(|| canonical.as_str().to_string())
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Iterate over `(native, canonical)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CanonicalSymbol)> {
        self.forward.iter().map(|(k, v)| (k.as_str(), v))
    }
}
