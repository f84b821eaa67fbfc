//! KuCoin (v1 API).

use crate::book::{BookShape, LevelFormat};
use crate::listing::{ListingFilter, ListingShape, PairSource};
use crate::profile::{Endpoint, ExchangeProfile};
use serde_json::json;

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "kucoin",
        Endpoint::get("https://api.kucoin.com/v1/market/open/symbols"),
        ListingShape::Records {
            path: vec!["data".into()],
            pair: PairSource::Fields {
                quote: "coinTypePair".into(),
                base: "coinType".into(),
            },
            id: Some("symbol".into()),
            filters: vec![
                ListingFilter::equals("trading", json!(true)),
                ListingFilter::non_zero("vol"),
            ],
        },
        Endpoint::get("https://api.kucoin.com/v1/open/orders?symbol={base}-{quote}&limit={depth}"),
        BookShape::sides(&["data"], &["SELL"], &["BUY"], LevelFormat::pairs()),
    )
}
