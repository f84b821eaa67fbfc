//! Zaif. Pairs are lower-case `base_quote`.

use crate::book::{BookShape, LevelFormat};
use crate::listing::{ListingShape, PairOrder, PairSource, SymbolFormat};
use crate::profile::{Endpoint, ExchangeProfile};

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "zaif",
        Endpoint::get("https://api.zaif.jp/api/1/currency_pairs/all"),
        ListingShape::Records {
            path: vec![],
            pair: PairSource::Symbol {
                field: "currency_pair".into(),
                format: SymbolFormat::delimited("_", PairOrder::BaseFirst),
            },
            id: None,
            filters: vec![],
        },
        Endpoint::get("https://api.zaif.jp/api/1/depth/{base_lower}_{quote_lower}"),
        BookShape::sides(&[], &["asks"], &["bids"], LevelFormat::pairs()),
    )
}
