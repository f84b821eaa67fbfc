//! Cryptopia. Markets are labelled `BASE/QUOTE`; depth uses `BASE_QUOTE`.

use crate::book::{BookShape, LevelFormat};
use crate::listing::{ListingShape, PairOrder, PairSource, SymbolFormat};
use crate::profile::{Endpoint, ExchangeProfile};

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "cryptopia",
        Endpoint::get("https://www.cryptopia.co.nz/api/GetMarkets"),
        ListingShape::Records {
            path: vec!["Data".into()],
            pair: PairSource::Symbol {
                field: "Label".into(),
                format: SymbolFormat::delimited("/", PairOrder::BaseFirst),
            },
            id: Some("TradePairId".into()),
            filters: vec![],
        },
        Endpoint::get("https://www.cryptopia.co.nz/api/GetMarketOrders/{base}_{quote}/{depth}"),
        BookShape::sides(&["Data"], &["Sell"], &["Buy"], LevelFormat::named(&["Price"], &["Volume"])),
    )
}
