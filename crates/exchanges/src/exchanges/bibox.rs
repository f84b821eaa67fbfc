//! Bibox (API v1). Both endpoints are `mdata` commands.

use crate::book::{BookShape, LevelFormat};
use crate::listing::{ListingShape, PairSource};
use crate::profile::{Endpoint, ExchangeProfile};

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "bibox",
        Endpoint::get("https://api.bibox.com/v1/mdata?cmd=marketAll"),
        ListingShape::Records {
            path: vec!["result".into()],
            pair: PairSource::Fields {
                quote: "currency_symbol".into(),
                base: "coin_symbol".into(),
            },
            id: Some("id".into()),
            filters: vec![],
        },
        Endpoint::get("https://api.bibox.com/v1/mdata?cmd=depth&pair={base}_{quote}&size={depth}"),
        BookShape::sides(&["result"], &["asks"], &["bids"], LevelFormat::named(&["price"], &["volume"])),
    )
}
