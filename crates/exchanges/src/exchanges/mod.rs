//! Built-in exchange catalog.
//!
//! Every exchange is an [`ExchangeProfile`]; the generic
//! [`RestExchange`](crate::RestExchange) does the rest. Profiles loaded from
//! a file with [`load_profiles`](crate::load_profiles) can override these by
//! name.

mod allcoin;
mod bibox;
mod binance;
mod bitbay;
mod bitfinex;
mod bitgrail;
mod bittrex;
mod coinexchange;
mod coolcoin;
mod cryptopia;
mod etherdelta;
mod ethfinex;
mod exmo;
mod gdax;
mod hitbtc;
mod huobi;
mod idex;
mod kraken;
mod kucoin;
mod liqui;
mod lykke;
mod okex;
mod qryptos;
mod rightbtc;
mod southxchange;
mod tdax;
mod tidex;
mod zaif;

use crate::profile::ExchangeProfile;

/// Profiles for every built-in exchange, sorted by name.
pub fn builtin_profiles() -> Vec<ExchangeProfile> {
    vec![
        allcoin::profile(),
        bibox::profile(),
        binance::profile(),
        bitbay::profile(),
        bitfinex::profile(),
        bitgrail::profile(),
        bittrex::profile(),
        coinexchange::profile(),
        coolcoin::profile(),
        cryptopia::profile(),
        etherdelta::profile(),
        ethfinex::profile(),
        exmo::profile(),
        gdax::profile(),
        hitbtc::profile(),
        huobi::profile(),
        idex::profile(),
        kraken::profile(),
        kucoin::profile(),
        liqui::profile(),
        lykke::profile(),
        okex::profile(),
        qryptos::profile(),
        rightbtc::profile(),
        southxchange::profile(),
        tdax::profile(),
        tidex::profile(),
        zaif::profile(),
    ]
}

/// Built-in profile by name (case-insensitive).
pub fn builtin_profile(name: &str) -> Option<ExchangeProfile> {
    builtin_profiles()
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
}
