//! EtherDelta.
//!
//! Books are addressed by token contract address, taken from the ticker
//! listing. Tokens listed by raw address have no symbol and are skipped.

use crate::book::{BookShape, LevelFormat};
use crate::listing::{ListingFilter, ListingShape, PairOrder, SymbolFormat};
use crate::profile::{Endpoint, ExchangeProfile};

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "etherdelta",
        Endpoint::get("https://api.etherdelta.com/returnTicker"),
        ListingShape::Keys {
            path: vec![],
            format: SymbolFormat::delimited("_", PairOrder::QuoteFirst),
            id: Some("tokenAddr".into()),
            filters: vec![
                ListingFilter::non_zero("baseVolume"),
                ListingFilter::ExcludeBasePrefix { prefix: "0x".into() },
            ],
        },
        Endpoint::get("https://api.etherdelta.com/orders/{id}/0"),
        BookShape::sides(
            &[],
            &["sells"],
            &["buys"],
            LevelFormat::named(&["price"], &["ethAvailableVolume"]),
        ),
    )
}
