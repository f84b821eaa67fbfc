//! OKEx. Symbols are `base_quote`; asks arrive highest first.

use crate::book::{BookShape, LevelFormat};
use crate::listing::{ListingFilter, ListingShape, PairOrder, PairSource, SymbolFormat};
use crate::profile::{Endpoint, ExchangeProfile};

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "okex",
        Endpoint::get("https://www.okex.com/v2/markets/tickers"),
        ListingShape::Records {
            path: vec!["data".into()],
            pair: PairSource::Symbol {
                field: "symbol".into(),
                format: SymbolFormat::delimited("_", PairOrder::BaseFirst),
            },
            id: None,
            filters: vec![ListingFilter::non_zero("volume")],
        },
        Endpoint::get("https://www.okex.com/api/v1/depth.do?symbol={base_lower}_{quote_lower}"),
        BookShape::sides(&[], &["asks"], &["bids"], LevelFormat::pairs()),
    )
    .with_rate_limit("20 requests per 2 seconds")
}
