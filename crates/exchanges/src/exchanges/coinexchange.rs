//! CoinExchange. Books are addressed by numeric market id.

use crate::book::{BookShape, LevelFormat};
use crate::listing::{ListingFilter, ListingShape, PairSource};
use crate::profile::{Endpoint, ExchangeProfile};
use serde_json::json;

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "coinexchange",
        Endpoint::get("https://www.coinexchange.io/api/v1/getmarkets"),
        ListingShape::Records {
            path: vec!["result".into()],
            pair: PairSource::Fields {
                quote: "BaseCurrencyCode".into(),
                base: "MarketAssetCode".into(),
            },
            id: Some("MarketID".into()),
            filters: vec![ListingFilter::equals("Active", json!(true))],
        },
        Endpoint::get("https://www.coinexchange.io/api/v1/getorderbook?market_id={id}"),
        BookShape::sides(
            &["result"],
            &["SellOrders"],
            &["BuyOrders"],
            LevelFormat::named(&["Price"], &["Quantity"]),
        ),
    )
}
