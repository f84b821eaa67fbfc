//! BitBay. Markets come from the trading ticker; books from the legacy
//! public API.

use crate::book::{BookShape, LevelFormat};
use crate::listing::{ListingShape, PairOrder, SymbolFormat};
use crate::profile::{Endpoint, ExchangeProfile};

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "bitbay",
        Endpoint::get("https://api.bitbay.net/rest/trading/ticker"),
        ListingShape::Keys {
            path: vec!["items".into()],
            format: SymbolFormat::delimited("-", PairOrder::BaseFirst),
            id: None,
            filters: vec![],
        },
        Endpoint::get("https://bitbay.net/API/Public/{base}{quote}/market.json"),
        BookShape::sides(&[], &["asks"], &["bids"], LevelFormat::pairs()),
    )
}
