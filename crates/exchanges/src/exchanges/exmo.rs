//! EXMO. Both endpoints key their payload by the `BASE_QUOTE` pair name.

use crate::book::{BookShape, LevelFormat};
use crate::listing::{ListingShape, PairOrder, SymbolFormat};
use crate::profile::{Endpoint, ExchangeProfile};

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "exmo",
        Endpoint::get("https://api.exmo.com/v1/pair_settings"),
        ListingShape::Keys {
            path: vec![],
            format: SymbolFormat::delimited("_", PairOrder::BaseFirst),
            id: None,
            filters: vec![],
        },
        Endpoint::get("https://api.exmo.com/v1/order_book/?pair={base}_{quote}&limit={depth}"),
        BookShape::sides(&["{base}_{quote}"], &["ask"], &["bid"], LevelFormat::pairs()),
    )
    .with_rate_limit("180 requests per minute")
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
    async fn test_pair_keyed_book() {
        let (mock, exchange) = adapter(
            profile(),
            json!({
                "BTC_USD": {"min_quantity": "0.001", "max_quantity": "100"},
                "ETH_BTC": {"min_quantity": "0.01", "max_quantity": "1000"},
                "BTC_RUB": {"min_quantity": "0.001", "max_quantity": "100"}
            }),
        );

        let markets = exchange.list_markets().await.unwrap();
        assert_eq!(listed(&markets), vec![entry("BTC", &["ETH"]), entry("USD", &["BTC"])]);

        mock.respond_json(
            "https://api.exmo.com/v1/order_book/?pair=ETH_BTC&limit=50",
            json!({"ETH_BTC": {
                "ask_quantity": "12",
                "ask": [["0.0921", "2", "0.1842"], ["0.0925", "10", "0.925"]],
                "bid": [["0.0915", "1.5", "0.13725"]]
            }}),
        );
        let book = exchange
            .get_order_book(&MarketPair::from_strs("BTC", "ETH"), None)
            .await
            .unwrap();
        assert_eq!(book.asks, vec![OrderLevel::new(0.0921, 2.0), OrderLevel::new(0.0925, 10.0)]);
        assert_eq!(book.bids, vec![OrderLevel::new(0.0915, 1.5)]);
    }
}
