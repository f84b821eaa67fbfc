//! Binance.
//!
//! Listing comes from the public product feed; books from the v1 depth
//! endpoint. An unknown symbol is HTTP 400 with code -1121.

use crate::book::{BookShape, LevelFormat};
use crate::error::ErrorKind;
use crate::listing::{ListingFilter, ListingShape, PairSource};
use crate::profile::{Endpoint, ErrorRule, ExchangeProfile};
use serde_json::json;

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "binance",
        Endpoint::get("https://www.binance.com/exchange/public/product"),
        ListingShape::Records {
            path: vec!["data".into()],
            pair: PairSource::Fields {
                quote: "quoteAsset".into(),
                base: "baseAsset".into(),
            },
            id: None,
            filters: vec![
                ListingFilter::equals("active", json!(true)),
                ListingFilter::equals("status", json!("TRADING")),
            ],
        },
        Endpoint::get("https://www.binance.com/api/v1/depth?symbol={base}{quote}&limit={depth}"),
        BookShape::sides(&[], &["asks"], &["bids"], LevelFormat::pairs()),
    )
    .with_aliases(&[("BCC", "BCH")])
    .with_error_rule(ErrorRule::on_field(&["code"], json!(-1121), ErrorKind::UnknownMarket).with_status(400))
    .with_rate_limit("1200 request weight per minute")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::ExchangeAdapter;
    use crate::exchanges::testing::{adapter, entry, listed};
    use cointrage_core::{MarketPair, OrderLevel};
    use pretty_assertions::assert_eq;

    fn listing() -> serde_json::Value {
        json!({"data": [
            {"symbol": "BCCBTC", "quoteAsset": "BTC", "baseAsset": "BCC", "active": true, "status": "TRADING"},
            {"symbol": "ETHBTC", "quoteAsset": "BTC", "baseAsset": "ETH", "active": true, "status": "TRADING"},
            {"symbol": "BNBETH", "quoteAsset": "ETH", "baseAsset": "BNB", "active": true, "status": "TRADING"},
            {"symbol": "HSRBTC", "quoteAsset": "BTC", "baseAsset": "HSR", "active": false, "status": "BREAK"},
            {"symbol": "ETHBNB", "quoteAsset": "BNB", "baseAsset": "ETH", "active": true, "status": "TRADING"}
        ]})
    }

    #[tokio::test]
    async fn test_list_markets() {
        let (_mock, exchange) = adapter(profile(), listing());
        let markets = exchange.list_markets().await.unwrap();
        assert_eq!(
            listed(&markets),
            vec![entry("BTC", &["BCH", "ETH"]), entry("ETH", &["BNB"])]
        );
    }

    #[tokio::test]
    async fn test_order_book_uses_native_ticker() {
        let (mock, exchange) = adapter(profile(), listing());
        mock.respond_json(
            "https://www.binance.com/api/v1/depth?symbol=BCCBTC&limit=50",
            json!({
                "lastUpdateId": 1027024,
                "bids": [["0.11500000", "2.00000000", []], ["0.11400000", "1.00000000", []]],
                "asks": [["0.11600000", "0.50000000", []]]
            }),
        );

        let book = exchange
            .get_order_book(&MarketPair::from_strs("BTC", "BCH"), None)
            .await
            .unwrap();
        assert_eq!(book.asks, vec![OrderLevel::new(0.116, 0.5)]);
        assert_eq!(book.bids, vec![OrderLevel::new(0.115, 2.0), OrderLevel::new(0.114, 1.0)]);
    }

    #[tokio::test]
    async fn test_invalid_symbol() {
        let (mock, exchange) = adapter(profile(), listing());
        mock.respond(
            "https://www.binance.com/api/v1/depth?symbol=ETHBTC&limit=5",
            400,
            r#"{"code":-1121,"msg":"Invalid symbol."}"#,
        );

        let err = exchange
            .get_order_book(&MarketPair::from_strs("BTC", "ETH"), Some(5))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownMarket);
    }
}
