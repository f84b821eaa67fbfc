//! Huobi Pro. Depth lives under `tick`; symbols are lowercase `basequote`.

use crate::book::{BookShape, LevelFormat};
use crate::error::ErrorKind;
use crate::listing::{ListingShape, PairSource};
use crate::profile::{Endpoint, ErrorRule, ExchangeProfile};
use serde_json::json;

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "huobi",
        Endpoint::get("https://api.huobi.pro/v1/common/symbols"),
        ListingShape::Records {
            path: vec!["data".into()],
            pair: PairSource::Fields {
                quote: "quote-currency".into(),
                base: "base-currency".into(),
            },
            id: None,
            filters: vec![],
        },
        Endpoint::get("https://api.huobi.pro/market/depth?symbol={base_lower}{quote_lower}&type=step1"),
        BookShape::sides(&["tick"], &["asks"], &["bids"], LevelFormat::pairs()),
    )
    .with_error_rule(ErrorRule::on_field(&["err-code"], json!("invalid-parameter"), ErrorKind::UnknownMarket))
}
