//! Ethfinex.
//!
//! Books come from the v2 API as one signed list of `[price, count, amount]`
//! where a negative amount is an ask.

use crate::book::{BookShape, LevelFormat};
use crate::listing::{ListingShape, SymbolFormat};
use crate::profile::{Endpoint, ExchangeProfile};
use cointrage_core::Side;

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "ethfinex",
        Endpoint::get("https://api.ethfinex.com/v1/symbols"),
        ListingShape::Strings {
            path: vec![],
            format: SymbolFormat::QuoteSuffix { len: 3 },
        },
        Endpoint::get("https://api.ethfinex.com/v2/book/t{base}{quote}/P0?len=100"),
        BookShape::signed(
            &[],
            &[],
            LevelFormat::Positional {
                rate: 0,
                quantity: 2,
            },
            Side::Ask,
        ),
    )
    .with_aliases(&[("DAT", "DATA")])
}
