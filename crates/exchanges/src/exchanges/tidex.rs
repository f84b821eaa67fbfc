//! Tidex (API v3). Hidden pairs are dropped from the listing.

use crate::book::{BookShape, LevelFormat};
use crate::listing::{ListingFilter, ListingShape, PairOrder, SymbolFormat};
use crate::profile::{Endpoint, ExchangeProfile};
use serde_json::json;

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "tidex",
        Endpoint::get("https://api.tidex.com/api/3/info"),
        ListingShape::Keys {
            path: vec!["pairs".into()],
            format: SymbolFormat::delimited("_", PairOrder::BaseFirst),
            id: None,
            filters: vec![ListingFilter::equals("hidden", json!(0))],
        },
        Endpoint::get("https://api.tidex.com/api/3/depth/{base_lower}_{quote_lower}?limit={depth}"),
        BookShape::sides(
            &["{base_lower}_{quote_lower}"],
            &["asks"],
            &["bids"],
            LevelFormat::pairs(),
        ),
    )
}
