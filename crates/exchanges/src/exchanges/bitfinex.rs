//! Bitfinex (v1 API). Symbols are lowercase `basequote` with a three letter quote.

use crate::book::{BookShape, LevelFormat};
use crate::listing::{ListingShape, SymbolFormat};
use crate::profile::{Endpoint, ExchangeProfile};

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "bitfinex",
        Endpoint::get("https://api.bitfinex.com/v1/symbols"),
        ListingShape::Strings {
            path: vec![],
            format: SymbolFormat::QuoteSuffix { len: 3 },
        },
        Endpoint::get("https://api.bitfinex.com/v1/book/{base_lower}{quote_lower}"),
        BookShape::sides(&[], &["asks"], &["bids"], LevelFormat::named(&["price"], &["amount"])),
    )
    .with_aliases(&[("DAT", "DATA")])
    .with_rate_limit("30 requests per minute")
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
    async fn test_list_markets_and_book() {
        let (mock, exchange) = adapter(profile(), json!(["btcusd", "ethbtc", "datbtc", "eoseur"]));

        let markets = exchange.list_markets().await.unwrap();
        assert_eq!(
            listed(&markets),
            vec![entry("BTC", &["DATA", "ETH"]), entry("USD", &["BTC"])]
        );

        mock.respond_json(
            "https://api.bitfinex.com/v1/book/datbtc",
            json!({
                "bids": [{"price": "0.0000412", "amount": "1500.0", "timestamp": "1516000000.0"}],
                "asks": [
                    {"price": "0.0000420", "amount": "30.5", "timestamp": "1516000000.0"},
                    {"price": "0.0000415", "amount": "100.0", "timestamp": "1516000000.0"}
                ]
            }),
        );
        let book = exchange
            .get_order_book(&MarketPair::from_strs("BTC", "DATA"), None)
            .await
            .unwrap();
        assert_eq!(book.asks, vec![OrderLevel::new(0.0000415, 100.0), OrderLevel::new(0.000042, 30.5)]);
        assert_eq!(book.bids, vec![OrderLevel::new(0.0000412, 1500.0)]);
    }
}
