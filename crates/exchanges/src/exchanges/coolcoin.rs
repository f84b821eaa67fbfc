//! Coolcoin (site endpoints, no public API).
//!
//! The depth script returns `[bids, asks]`.

use crate::book::{BookShape, LevelFormat};
use crate::listing::ListingShape;
use crate::profile::{Endpoint, ExchangeProfile};

pub fn profile() -> ExchangeProfile {
    ExchangeProfile::new(
        "coolcoin",
        Endpoint::get("https://www.coolcoin.com/ajax/coin/coinlist"),
        ListingShape::Grouped {
            path: vec!["data".into()],
            members: vec![],
            base: None,
            format: None,
        },
        Endpoint::get("https://www.coolcoin.com/coin/{quote_lower}/{base_lower}/depth.js"),
        BookShape::sides(&[], &["1"], &["0"], LevelFormat::pairs()),
    )
}
