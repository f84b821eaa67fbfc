//! Allcoin. The price list is keyed by lowercase quote; NEO is listed as ANS.

use crate::book::{BookShape, LevelFormat};
use crate::listing::ListingShape;
use crate::profile::{Endpoint, ExchangeProfile};

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "allcoin",
        Endpoint::get("https://www.allcoin.ca/Api_Market/getPriceList"),
        ListingShape::Grouped {
            path: vec![],
            members: vec![],
            base: Some("coin_from".into()),
            format: None,
        },
        Endpoint::get("https://www.allcoin.ca/market/depths?depth={base_lower}2{quote_lower}"),
        BookShape::sides(&[], &["asks"], &["bids"], LevelFormat::pairs()),
    )
    .with_aliases(&[("ANS", "NEO")])
}
