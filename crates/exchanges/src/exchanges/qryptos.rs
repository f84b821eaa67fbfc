//! Qryptos. Products carry integer ids used by the price level endpoint.

use crate::book::{BookShape, LevelFormat};
use crate::listing::{ListingShape, PairSource};
use crate::profile::{Endpoint, ExchangeProfile};

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "qryptos",
        Endpoint::get("https://api.qryptos.com/products"),
        ListingShape::Records {
            path: vec![],
            pair: PairSource::Fields {
                quote: "quoted_currency".into(),
                base: "base_currency".into(),
            },
            id: Some("id".into()),
            filters: vec![],
        },
        Endpoint::get("https://api.qryptos.com/products/{id}/price_levels"),
        BookShape::sides(
            &[],
            &["sell_price_levels"],
            &["buy_price_levels"],
            LevelFormat::pairs(),
        ),
    )
    .with_rate_limit("300 requests per 5 minutes")
}
