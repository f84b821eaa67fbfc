//! HitBTC (API v1). Ticker keys are `BASEQUOTE` with no separator.

use crate::book::{BookShape, LevelFormat};
use crate::listing::{ListingShape, SymbolFormat};
use crate::profile::{Endpoint, ExchangeProfile};

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "hitbtc",
        Endpoint::get("https://api.hitbtc.com/api/1/public/ticker"),
        ListingShape::Keys {
            path: vec![],
            format: SymbolFormat::KnownQuoteSuffix,
            id: None,
            filters: vec![],
        },
        Endpoint::get("https://api.hitbtc.com/api/1/public/{base}{quote}/orderbook?format_price=number&format_amount=number"),
        BookShape::sides(&[], &["asks"], &["bids"], LevelFormat::pairs()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::ExchangeAdapter;
    use crate::exchanges::testing::{adapter, entry, listed};
    use cointrage_core::{MarketPair, OrderLevel};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_ticker_keys_and_book() {
        let (mock, exchange) = adapter(
            profile(),
            json!({
                "ETHBTC": {"ask": "0.09", "bid": "0.089", "volume": "100"},
                "XMRUSDT": {"ask": "300", "bid": "299", "volume": "10"},
                "BCNETH": {"ask": "0.000001", "bid": "0.0000009", "volume": "1"},
                "XMREUR": {"ask": "250", "bid": "249", "volume": "5"}
            }),
        );

        let markets = exchange.list_markets().await.unwrap();
        assert_eq!(
            listed(&markets),
            vec![entry("BTC", &["ETH"]), entry("ETH", &["BCN"]), entry("USDT", &["XMR"])]
        );

        mock.respond_json(
            "https://api.hitbtc.com/api/1/public/XMRUSDT/orderbook?format_price=number&format_amount=number",
            json!({"asks": [[300.1, 2], [300.5, 1]], "bids": [[299.9, 3]]}),
        );
        let book = exchange
            .get_order_book(&MarketPair::from_strs("USDT", "XMR"), None)
            .await
            .unwrap();
        assert_eq!(book.best_ask(), Some(&OrderLevel::new(300.1, 2.0)));
        assert_eq!(book.best_bid(), Some(&OrderLevel::new(299.9, 3.0)));
    }
}
