//! SouthXchange. The listing is an array of `[base, quote]` tuples.

use crate::book::{BookShape, LevelFormat};
use crate::listing::{ListingShape, PairSource};
use crate::profile::{Endpoint, ExchangeProfile};

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "southxchange",
        Endpoint::get("https://www.southxchange.com/api/markets"),
        ListingShape::Records {
            path: vec![],
            pair: PairSource::Fields {
                quote: "1".into(),
                base: "0".into(),
            },
            id: None,
            filters: vec![],
        },
        Endpoint::get("https://www.southxchange.com/api/book/{base}/{quote}"),
        BookShape::sides(
            &[],
            &["SellOrders"],
            &["BuyOrders"],
            LevelFormat::named(&["Price"], &["Amount"]),
        ),
    )
    .with_rate_limit("undocumented")
}
