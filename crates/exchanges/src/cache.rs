//! Market identity cache.
//!
//! Maps a canonical [`MarketPair`] to the exchange-native market id and
//! tickers. The table is populated by the adapter's listing call and
//! refreshed on a miss, at most once per lookup.

use crate::error::{ExchangeError, ExchangeResult};
use cointrage_core::{MarketId, MarketPair};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use tracing::debug;

/// What the exchange needs to address a market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketRecord {
    pub id: MarketId,
    pub native_base: String,
    pub native_quote: String,
}

pub type MarketTable = HashMap<MarketPair, MarketRecord>;

/// How concurrent misses refresh the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Every miss issues its own listing request.
    #[default]
    Independent,
    /// Misses arriving while a refresh is running wait for that refresh.
    Coalesced,
}

type InflightRefresh = Shared<BoxFuture<'static, ExchangeResult<()>>>;

pub struct MarketCache {
    table: RwLock<Option<Arc<MarketTable>>>,
    inflight: Mutex<Option<(u64, InflightRefresh)>>,
    generation: AtomicU64,
    policy: RefreshPolicy,
}

impl MarketCache {
    pub fn new(policy: RefreshPolicy) -> Self {
        Self {
            table: RwLock::new(None),
            inflight: Mutex::new(None),
            generation: AtomicU64::new(0),
            policy,
        }
    }

    pub fn policy(&self) -> RefreshPolicy {
        self.policy
    }

    pub async fn get(&self, pair: &MarketPair) -> Option<MarketRecord> {
        self.table
            .read()
            .await
            .as_ref()
            .and_then(|table| table.get(pair).cloned())
    }

    /// Swap in a freshly listed table. Readers holding the old snapshot keep it.
    pub async fn replace(&self, table: MarketTable) {
        *self.table.write().await = Some(Arc::new(table));
    }

    pub async fn snapshot(&self) -> Option<Arc<MarketTable>> {
        self.table.read().await.clone()
    }

    pub async fn is_populated(&self) -> bool {
        self.table.read().await.is_some()
    }

    /// Look up `pair`, running `refresh` once on a miss.
    ///
    /// `refresh` must repopulate the cache through [`MarketCache::replace`].
    /// A pair still missing afterwards is [`ExchangeError::UnknownMarket`].
    pub async fn resolve<F>(&self, exchange: &str, pair: &MarketPair, refresh: F) -> ExchangeResult<MarketRecord>
    where
        F: FnOnce() -> BoxFuture<'static, ExchangeResult<()>>,
    {
        if let Some(record) = self.get(pair).await {
            return Ok(record);
        }

        debug!("{} cache miss for {}, refreshing markets", exchange, pair);
        self.refresh(refresh).await?;

        self.get(pair).await.ok_or_else(|| ExchangeError::UnknownMarket {
            exchange: exchange.to_string(),
            pair: pair.clone(),
        })
    }

    async fn refresh<F>(&self, refresh: F) -> ExchangeResult<()>
    where
        F: FnOnce() -> BoxFuture<'static, ExchangeResult<()>>,
    {
        match self.policy {
            RefreshPolicy::Independent => refresh().await,
            RefreshPolicy::Coalesced => {
                let (generation, future) = {
                    let mut inflight = self.inflight();
                    match inflight.as_ref() {
                        Some((generation, future)) => (*generation, future.clone()),
                        None => {
                            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
                            let future = refresh().shared();
                            *inflight = Some((generation, future.clone()));
                            (generation, future)
                        }
                    }
                };

                // Cleared on completion and on cancellation, so the slot never
                // outlives its waiters.
                let _clear = InflightGuard {
                    cache: self,
                    generation,
                };
                future.await
            }
        }
    }

    fn inflight(&self) -> std::sync::MutexGuard<'_, Option<(u64, InflightRefresh)>> {
        self.inflight.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// True while a coalesced refresh is shared between waiters.
    pub fn is_refreshing(&self) -> bool {
        self.inflight().is_some()
    }
}

/// Drops the shared refresh of `generation` from the inflight slot.
struct InflightGuard<'a> {
    cache: &'a MarketCache,
    generation: u64,
}

impl Drop for InflightGuard<'_> {
    fn drop(&mut self) {
        let mut inflight = self.cache.inflight();
        if matches!(inflight.as_ref(), Some((current, _)) if *current == self.generation) {
            *inflight = None;
        }
    }
}

impl Default for MarketCache {
    fn default() -> Self {
        Self::new(RefreshPolicy::default())
    }
}

impl fmt::Debug for MarketCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarketCache")
            .field("policy", &self.policy)
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
