//! Multi-exchange and multi-market discovery.
//!
//! Batch helpers built on [`ExchangeAdapter`]. How a failure of one
//! exchange or one market affects the whole batch is chosen by the caller
//! through [`FailurePolicy`].

use crate::adapter::ExchangeAdapter;
use crate::error::ExchangeResult;
use crate::registry::AdapterRegistry;
use cointrage_core::{CanonicalSymbol, MarketListing, MarketPair, OrderBook};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Partial-failure handling for batch operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Return the first error.
    FailFast,
    /// Log the error and continue with the rest.
    #[default]
    SkipFailures,
}

/// List markets on every registered exchange concurrently.
pub async fn list_all(
    registry: &AdapterRegistry,
    policy: FailurePolicy,
) -> ExchangeResult<BTreeMap<String, MarketListing>> {
    let adapters: Vec<_> = registry.adapters().cloned().collect();
    let results = join_all(adapters.iter().map(|adapter| async move {
        (adapter.name().to_string(), adapter.list_markets().await)
    }))
    .await;

    let mut listings = BTreeMap::new();
    for (name, result) in results {
        match result {
            Ok(listing) => {
                listings.insert(name, listing);
            }
            Err(e) if policy == FailurePolicy::SkipFailures => {
                warn!("{}: Failed to list markets: {}", name, e);
            }
            Err(e) => return Err(e),
        }
    }

    info!("Listed markets on {}/{} exchanges", listings.len(), adapters.len());
    Ok(listings)
}

/// Fetch books for `bases` under `quote` in order and return the first one
/// with both sides populated. `Ok(None)` when no base qualifies.
pub async fn first_non_empty_book(
    adapter: &dyn ExchangeAdapter,
    quote: &CanonicalSymbol,
    bases: &[CanonicalSymbol],
    depth: Option<usize>,
    policy: FailurePolicy,
) -> ExchangeResult<Option<OrderBook>> {
    for base in bases {
        let pair = MarketPair::new(quote.clone(), base.clone());
        match adapter.get_order_book(&pair, depth).await {
            Ok(book) if book.is_two_sided() => return Ok(Some(book)),
            Ok(_) => debug!("{}: Order book {} is one-sided, trying next", adapter.name(), pair),
            Err(e) if policy == FailurePolicy::SkipFailures => {
                warn!("{}: Failed to fetch order book {}: {}", adapter.name(), pair, e);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{AdapterSettings, RestExchange};
    use crate::book::{BookShape, LevelFormat};
    use crate::listing::{ListingShape, PairOrder, SymbolFormat};
    use crate::profile::{Endpoint, ExchangeProfile};
    use crate::transport::MockTransport;
    use crate::ErrorKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn profile(name: &str) -> ExchangeProfile {
        ExchangeProfile::new(
            name,
            Endpoint::get(&format!("https://{}.test/markets", name)),
            ListingShape::Strings {
                path: vec![],
                format: SymbolFormat::delimited("-", PairOrder::QuoteFirst),
            },
            Endpoint::get(&format!("https://{}.test/book/{{base}}-{{quote}}", name)),
            BookShape::sides(&[], &["asks"], &["bids"], LevelFormat::pairs()),
        )
    }

    fn symbols(raw: &[&str]) -> Vec<CanonicalSymbol> {
        raw.iter().map(|s| CanonicalSymbol::new(s)).collect()
    }

    fn setup() -> (Arc<MockTransport>, AdapterRegistry) {
        let mock = Arc::new(MockTransport::new());
        mock.respond_json("https://alpha.test/markets", json!(["BTC-ETH", "BTC-LTC", "BTC-XRP"]))
            .respond("https://beta.test/markets", 503, "");
        let registry = AdapterRegistry::from_profiles(
            vec![profile("alpha"), profile("beta")],
            mock.clone(),
            &AdapterSettings::default(),
        )
        .unwrap();
        (mock, registry)
    }

    #[tokio::test]
    async fn test_list_all_skips_failures() {
        let (_mock, registry) = setup();
        let listings = list_all(&registry, FailurePolicy::SkipFailures).await.unwrap();

        assert_eq!(listings.keys().cloned().collect::<Vec<_>>(), vec!["alpha".to_string()]);
        assert_eq!(listings["alpha"][&CanonicalSymbol::new("BTC")], symbols(&["ETH", "LTC", "XRP"]));
    }

    #[tokio::test]
    async fn test_list_all_fail_fast() {
        let (_mock, registry) = setup();
        let err = list_all(&registry, FailurePolicy::FailFast).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_first_non_empty_book() {
        let (mock, _registry) = setup();
        mock.respond("https://alpha.test/book/ETH-BTC", 500, "")
            .respond_json("https://alpha.test/book/LTC-BTC", json!({"asks": [[0.01, 1]], "bids": []}))
            .respond_json(
                "https://alpha.test/book/XRP-BTC",
                json!({"asks": [[0.0001, 10]], "bids": [[0.00009, 5]]}),
            );
        let adapter = RestExchange::new(profile("alpha"), mock.clone(), &AdapterSettings::default());
        let quote = CanonicalSymbol::new("BTC");
        let bases = symbols(&["ETH", "LTC", "XRP"]);

        let book = first_non_empty_book(&adapter, &quote, &bases, None, FailurePolicy::SkipFailures)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(book.pair, MarketPair::from_strs("BTC", "XRP"));

        let err = first_non_empty_book(&adapter, &quote, &bases, None, FailurePolicy::FailFast)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_first_non_empty_book_none() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_json("https://alpha.test/markets", json!(["BTC-ETH"]));
        let adapter = RestExchange::new(profile("alpha"), mock, &AdapterSettings::default());

        let result = first_non_empty_book(
            &adapter,
            &CanonicalSymbol::new("BTC"),
            &symbols(&["ZZZ"]),
            None,
            FailurePolicy::SkipFailures,
        )
        .await
        .unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_failure_policy_default() {
        assert_eq!(FailurePolicy::default(), FailurePolicy::SkipFailures);
        let policy: FailurePolicy = serde_json::from_str("\"fail_fast\"").unwrap();
        assert_eq!(policy, FailurePolicy::FailFast);
    }
}
