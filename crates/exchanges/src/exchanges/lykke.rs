//! Lykke HFT API. The book is a list of side groups flagged by `IsBuy`;
//! sell volumes are negative.

use crate::book::{BookShape, LevelFormat};
use crate::listing::{ListingShape, PairOrder, PairSource, SymbolFormat};
use crate::profile::{Endpoint, ExchangeProfile};

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "lykke",
        Endpoint::get("https://hft-api.lykke.com/api/AssetPairs"),
        ListingShape::Records {
            path: vec![],
            pair: PairSource::Symbol {
                field: "Name".into(),
                format: SymbolFormat::delimited("/", PairOrder::BaseFirst),
            },
            id: Some("Id".into()),
            filters: vec![],
        },
        Endpoint::get("https://hft-api.lykke.com/api/OrderBooks/{base}{quote}"),
        BookShape::flagged(&[], "IsBuy", &["Prices"], LevelFormat::named(&["Price"], &["Volume"])),
    )
}
