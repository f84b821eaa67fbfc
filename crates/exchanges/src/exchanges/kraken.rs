//! Kraken. Pair names have no separator and spell bitcoin `XBT`; depth is
//! keyed by the requested pair.

use crate::book::{BookShape, LevelFormat};
use crate::error::ErrorKind;
use crate::listing::{ListingShape, SymbolFormat};
use crate::profile::{Endpoint, ErrorRule, ExchangeProfile};
use serde_json::json;

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "kraken",
        Endpoint::get("https://api.kraken.com/0/public/AssetPairs"),
        ListingShape::Keys {
            path: vec!["result".into()],
            format: SymbolFormat::KnownQuoteSuffix,
            id: None,
            filters: vec![],
        },
        Endpoint::get("https://api.kraken.com/0/public/Depth?pair={base}{quote}&count={depth}"),
        BookShape::sides(&["result", "{base}{quote}"], &["asks"], &["bids"], LevelFormat::pairs()),
    )
    .with_aliases(&[("XBT", "BTC")])
    .with_error_rule(ErrorRule::on_field(
        &["error", "0"],
        json!("EQuery:Unknown asset pair"),
        ErrorKind::UnknownMarket,
    ))
    .with_rate_limit("1 request per second")
}
