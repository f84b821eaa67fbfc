//! Liqui (API v3). Depth responses are keyed by the requested pair.

use crate::book::{BookShape, LevelFormat};
use crate::listing::{ListingShape, PairOrder, SymbolFormat};
use crate::profile::{Endpoint, ExchangeProfile};

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "liqui",
        Endpoint::get("https://api.liqui.io/api/3/info"),
        ListingShape::Keys {
            path: vec!["pairs".into()],
            format: SymbolFormat::delimited("_", PairOrder::BaseFirst),
            id: None,
            filters: vec![],
        },
        Endpoint::get("https://api.liqui.io/api/3/depth/{base_lower}_{quote_lower}?limit={depth}"),
        BookShape::sides(
            &["{base_lower}_{quote_lower}"],
            &["asks"],
            &["bids"],
            LevelFormat::pairs(),
        ),
    )
}
