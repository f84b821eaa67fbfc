//! GDAX. Public endpoints are throttled per IP (3 req/s, bursts of 6).

use crate::book::{BookShape, LevelFormat};
use crate::listing::{ListingShape, PairSource};
use crate::profile::{Endpoint, ExchangeProfile};

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "gdax",
        Endpoint::get("https://api.gdax.com/products"),
        ListingShape::Records {
            path: vec![],
            pair: PairSource::Fields {
                quote: "quote_currency".into(),
                base: "base_currency".into(),
            },
            id: Some("id".into()),
            filters: vec![],
        },
        Endpoint::get("https://api.gdax.com/products/{base}-{quote}/book?level=2"),
        BookShape::sides(&[], &["asks"], &["bids"], LevelFormat::pairs()),
    )
    .with_rate_limit("3 requests per second, bursts of 6")
}
