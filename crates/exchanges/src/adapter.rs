//! Exchange adapter contract and the profile-driven REST implementation.

use crate::book::BookNormalizer;
use crate::cache::{MarketCache, MarketRecord, MarketTable, RefreshPolicy};
use crate::error::{ExchangeError, ExchangeResult};
use crate::listing::decode_listing;
use crate::profile::{Endpoint, ExchangeProfile};
use crate::template::Placeholders;
use crate::ticker::TickerMap;
use crate::transport::Transport;
use async_trait::async_trait;
use cointrage_core::{group_by_quote, CanonicalSymbol, MarketId, MarketListing, MarketPair, OrderBook, QuoteAllowList};
use futures_util::future::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Market data capabilities every exchange provides.
#[async_trait]
pub trait ExchangeAdapter: Send + Sync {
    /// Registry name (lowercase).
    fn name(&self) -> &str;

    /// List tradable markets grouped by quote. Only allow-listed quotes are
    /// returned. Replaces the adapter's market identity cache on success.
    async fn list_markets(&self) -> ExchangeResult<MarketListing>;

    /// Fetch a fresh order book snapshot. `depth` caps the levels per side.
    async fn get_order_book(&self, pair: &MarketPair, depth: Option<usize>) -> ExchangeResult<OrderBook>;
}

/// Per-adapter settings shared by every exchange in a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterSettings {
    #[serde(default)]
    pub quotes: QuoteAllowList,
    #[serde(default)]
    pub refresh_policy: RefreshPolicy,
}

/// Generic REST adapter driven by an [`ExchangeProfile`].
///
/// Cloning is cheap; clones share the market identity cache.
#[derive(Clone)]
pub struct RestExchange {
    inner: Arc<Inner>,
}

struct Inner {
    profile: ExchangeProfile,
    tickers: TickerMap,
    quotes: QuoteAllowList,
    transport: Arc<dyn Transport>,
    cache: MarketCache,
}

impl RestExchange {
    pub fn new(profile: ExchangeProfile, transport: Arc<dyn Transport>, settings: &AdapterSettings) -> Self {
        let tickers = profile.tickers();
        Self {
            inner: Arc::new(Inner {
                profile,
                tickers,
                quotes: settings.quotes.clone(),
                transport,
                cache: MarketCache::new(settings.refresh_policy),
            }),
        }
    }

    pub fn profile(&self) -> &ExchangeProfile {
        &self.inner.profile
    }

    pub fn tickers(&self) -> &TickerMap {
        &self.inner.tickers
    }

    /// True once a listing has succeeded.
    pub async fn is_populated(&self) -> bool {
        self.inner.cache.is_populated().await
    }

    /// Exchange market id for `pair`, listing markets once on a miss.
    pub async fn resolve_id(&self, pair: &MarketPair) -> ExchangeResult<MarketId> {
        Ok(self.resolve(pair).await?.id)
    }

    async fn resolve(&self, pair: &MarketPair) -> ExchangeResult<MarketRecord> {
        // weak, since the cache that holds the refresh is owned by `inner`
        let inner = Arc::downgrade(&self.inner);
        self.inner
            .cache
            .resolve(&self.inner.profile.name, pair, move || {
                async move {
                    match inner.upgrade() {
                        Some(inner) => inner.refresh_markets().await.map(|_| ()),
                        None => Ok(()),
                    }
                }
                .boxed()
            })
            .await
    }
}

impl Inner {
    async fn fetch(
        &self,
        endpoint: &Endpoint,
        placeholders: &Placeholders,
        pair: Option<&MarketPair>,
    ) -> ExchangeResult<Value> {
        let request = endpoint.to_request(placeholders)?;
        let url = request.url.clone();
        debug!("{}: Requesting {}", self.profile.name, url);

        let response = self.transport.request(request).await?;
        let parsed = response.json();

        let null = Value::Null;
        let body = parsed.as_ref().unwrap_or(&null);
        if let Some(err) = self.profile.translate_error(response.status, body, &url, pair) {
            debug!("{}: {} returned {}", self.profile.name, url, err);
            return Err(err);
        }
        if !response.is_success() {
            return Err(ExchangeError::status(response.status, &url));
        }
        parsed
    }

    async fn refresh_markets(&self) -> ExchangeResult<MarketListing> {
        let payload = self
            .fetch(&self.profile.markets, &Placeholders::default(), None)
            .await?;
        let listed = decode_listing(&payload, &self.profile.listing, &self.quotes, &self.tickers)?;
        let listed_count = listed.len();

        let mut table = MarketTable::new();
        for market in listed {
            let quote = self.tickers.normalize(&market.quote);
            let base = self.tickers.normalize(&market.base);
            if CanonicalSymbol::parse(base.as_str()).is_err() {
                debug!("{}: Skipping invalid base symbol {:?}", self.profile.name, market.base);
                continue;
            }

            let id = match (market.id, market.symbol) {
                (Some(id), _) => id,
                (None, Some(symbol)) => MarketId::Text(symbol),
                (None, None) => MarketId::Text(format!("{}{}", market.base, market.quote)),
            };
            // first listing of a pair wins
            table.entry(MarketPair::new(quote, base)).or_insert(MarketRecord {
                id,
                native_base: market.base,
                native_quote: market.quote,
            });
        }

        // every observed pair stays resolvable; the allow-list only shapes the result
        let listing = group_by_quote(table.keys().filter(|pair| self.quotes.contains(&pair.quote)));
        info!(
            "{}: Found {} markets, {} in {} allowed quotes ({} listed)",
            self.profile.name,
            table.len(),
            listing.values().map(Vec::len).sum::<usize>(),
            listing.len(),
            listed_count
        );
        self.cache.replace(table).await;
        Ok(listing)
    }
}

#[async_trait]
impl ExchangeAdapter for RestExchange {
    fn name(&self) -> &str {
        &self.inner.profile.name
    }

    async fn list_markets(&self) -> ExchangeResult<MarketListing> {
        self.inner.refresh_markets().await
    }

    async fn get_order_book(&self, pair: &MarketPair, depth: Option<usize>) -> ExchangeResult<OrderBook> {
        let record = self.resolve(pair).await?;
        let profile = &self.inner.profile;

        let placeholders = Placeholders {
            base: self.inner.tickers.to_native(&pair.base),
            quote: self.inner.tickers.to_native(&pair.quote),
            id: record.id.to_string(),
            depth: depth.unwrap_or(profile.default_depth),
        };
        let payload = self
            .inner
            .fetch(&profile.order_book, &placeholders, Some(pair))
            .await?;

        let mut book = BookNormalizer::new(&profile.book, &profile.scaling, profile.swap_sides).normalize(
            &payload,
            pair.clone(),
            &placeholders,
        )?;
        if let Some(depth) = depth {
            book.truncate(depth);
        }

        debug!(
            "{}: Order book {} with {} asks, {} bids",
            profile.name,
            pair,
            book.asks.len(),
            book.bids.len()
        );
        Ok(book)
    }
}

impl std::fmt::Debug for RestExchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestExchange")
            .field("name", &self.inner.profile.name)
            .field("cache", &self.inner.cache)
            .finish_non_exhaustive()
    }
}
