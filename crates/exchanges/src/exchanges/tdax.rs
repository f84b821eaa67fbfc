//! TDAX. Prices are integers scaled by the quote's decimals, quantities
//! always by 18.

use crate::book::{BookShape, LevelFormat, Scaling};
use crate::listing::{ListingShape, PairSource};
use crate::profile::{Endpoint, ExchangeProfile};

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "tdax",
        Endpoint::get("https://api.tdax.com/public/getmarkets"),
        ListingShape::Records {
            path: vec![],
            pair: PairSource::Fields {
                quote: "BaseCurrency".into(),
                base: "MarketCurrency".into(),
            },
            id: None,
            filters: vec![],
        },
        Endpoint::get("https://api.tdax.com/orders?Symbol={base}_{quote}"),
        BookShape::sides(&[], &["Asks"], &["Bids"], LevelFormat::named(&["Price"], &["RemainQty"])),
    )
    .with_scaling(Scaling::by_quote(18, &[("BTC", 8)]).with_quantity_decimals(18))
}
