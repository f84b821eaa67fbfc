//! IDEX. Both endpoints are POST; markets are `QUOTE_BASE`.

use crate::book::{BookShape, LevelFormat};
use crate::listing::{ListingFilter, ListingShape, PairOrder, SymbolFormat};
use crate::profile::{Endpoint, ExchangeProfile};
use serde_json::json;

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "idex",
        Endpoint::post("https://api.idex.market/returnTicker", json!({})),
        ListingShape::Keys {
            path: vec![],
            format: SymbolFormat::delimited("_", PairOrder::QuoteFirst),
            id: None,
            filters: vec![ListingFilter::non_zero("baseVolume")],
        },
        Endpoint::post(
            "https://api.idex.market/returnOrderBook",
            json!({"market": "{quote}_{base}"}),
        ),
        BookShape::sides(&[], &["asks"], &["bids"], LevelFormat::named(&["price"], &["amount"])),
    )
}
