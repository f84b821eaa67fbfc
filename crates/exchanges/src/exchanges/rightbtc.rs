//! RightBTC. Depth is reported as integers scaled by the quote's decimals.

use crate::book::{BookShape, LevelFormat, Scaling};
use crate::listing::{ListingShape, PairSource};
use crate::profile::{Endpoint, ExchangeProfile};

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "rightbtc",
        Endpoint::get("https://www.rightbtc.com/api/public/trading_pairs"),
        ListingShape::Records {
            path: vec!["status".into(), "message".into()],
            pair: PairSource::Fields {
                quote: "ask_asset_symbol".into(),
                base: "bid_asset_symbol".into(),
            },
            id: None,
            filters: vec![],
        },
        Endpoint::get("https://www.rightbtc.com/api/public/depth/{base}{quote}/{depth}"),
        BookShape::sides(&["result"], &["ask"], &["bid"], LevelFormat::pairs()),
    )
    .with_scaling(Scaling::by_quote(18, &[("BTC", 8)]))
}
