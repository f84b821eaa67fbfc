//! Bittrex.
//!
//! Market names are `QUOTE-BASE`. Markets without volume are skipped.

use crate::book::{BookShape, LevelFormat};
use crate::error::ErrorKind;
use crate::listing::{ListingFilter, ListingShape, PairOrder, PairSource, SymbolFormat};
use crate::profile::{Endpoint, ErrorRule, ExchangeProfile};
use serde_json::json;

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "bittrex",
        Endpoint::get("https://bittrex.com/api/v1.1/public/getmarketsummaries"),
        ListingShape::Records {
            path: vec!["result".into()],
            pair: PairSource::Symbol {
                field: "MarketName".into(),
                format: SymbolFormat::delimited("-", PairOrder::QuoteFirst),
            },
            id: None,
            filters: vec![ListingFilter::non_zero("Volume")],
        },
        Endpoint::get("https://bittrex.com/api/v1.1/public/getorderbook?market={quote}-{base}&type=both"),
        BookShape::sides(
            &["result"],
            &["sell"],
            &["buy"],
            LevelFormat::named(&["Rate"], &["Quantity"]),
        ),
    )
    .with_error_rule(ErrorRule::on_field(&["message"], json!("INVALID_MARKET"), ErrorKind::UnknownMarket))
}
