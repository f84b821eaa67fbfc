//! BitGrail. Markets are grouped by quote and keyed `BASE/QUOTE`.

use crate::book::{BookShape, LevelFormat};
use crate::listing::{ListingShape, PairOrder, SymbolFormat};
use crate::profile::{Endpoint, ExchangeProfile};

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "bitgrail",
        Endpoint::get("https://api.bitgrail.com/v1/markets"),
        ListingShape::Grouped {
            path: vec!["response".into()],
            members: vec!["markets".into()],
            base: None,
            format: Some(SymbolFormat::delimited("/", PairOrder::BaseFirst)),
        },
        Endpoint::get("https://api.bitgrail.com/v1/{quote}-{base}/orderbook"),
        BookShape::sides(
            &["response"],
            &["asks"],
            &["bids"],
            LevelFormat::named(&["price"], &["amount"]),
        ),
    )
}
