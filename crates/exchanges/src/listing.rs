//! Market listing decoding.
//!
//! Turns a listing payload into exchange-native `(quote, base)` entries with
//! their market ids. Canonicalization and quote filtering happen in the
//! adapter; this module only knows about payload shapes.

use crate::book::{number, type_name};
use crate::error::{ExchangeError, ExchangeResult};
use crate::template::{display_path, lookup, Placeholders};
use crate::ticker::TickerMap;
use cointrage_core::{MarketId, QuoteAllowList};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Order of the two tickers inside a combined market symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairOrder {
    /// `BTC-ETH`
    QuoteFirst,
    /// `ETH_BTC`
    BaseFirst,
}

/// How a combined market symbol splits into base and quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SymbolFormat {
    Delimited { separator: String, order: PairOrder },
    /// Quote is the last `len` characters (`ethbtc`)
    QuoteSuffix { len: usize },
    /// Quote is whichever allowed quote the symbol ends with (`ETHUSDT`)
    KnownQuoteSuffix,
}

impl SymbolFormat {
    pub fn delimited(separator: &str, order: PairOrder) -> Self {
        SymbolFormat::Delimited {
            separator: separator.to_string(),
            order,
        }
    }

    /// Split into `(native quote, native base)`, both upper-cased.
    pub fn split(&self, symbol: &str, quotes: &QuoteAllowList, tickers: &TickerMap) -> Option<(String, String)> {
        let symbol = symbol.trim().to_ascii_uppercase();
        let (quote, base) = match self {
            SymbolFormat::Delimited { separator, order } => {
                let (left, right) = symbol.split_once(separator.to_ascii_uppercase().as_str())?;
                match order {
                    PairOrder::QuoteFirst => (left.to_string(), right.to_string()),
                    PairOrder::BaseFirst => (right.to_string(), left.to_string()),
                }
            }
            SymbolFormat::QuoteSuffix { len } => {
                if symbol.len() <= *len || !symbol.is_char_boundary(symbol.len() - len) {
                    return None;
                }
                let (base, quote) = symbol.split_at(symbol.len() - len);
                (quote.to_string(), base.to_string())
            }
            SymbolFormat::KnownQuoteSuffix => {
                let mut candidates: Vec<String> = quotes.iter().map(|q| tickers.to_native(q)).collect();
                // USDT before USD
                candidates.sort_by(|a, b| b.len().cmp(&a.len()));
                candidates.into_iter().find_map(|quote| {
                    symbol
                        .strip_suffix(quote.as_str())
                        .filter(|base| !base.is_empty())
                        .map(|base| (quote.clone(), base.to_string()))
                })?
            }
        };
        if quote.is_empty() || base.is_empty() {
            return None;
        }
        Some((quote, base))
    }
}

/// Where the pair of a listing record comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PairSource {
    Fields { quote: String, base: String },
    Symbol { field: String, format: SymbolFormat },
}

/// Predicate a listing entry must pass to be kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListingFilter {
    /// Field equals a fixed JSON value
    Equals { field: String, value: Value },
    /// Field is a non-zero number; missing or unparsable counts as zero
    NonZero { field: String },
    /// Drop entries whose native base starts with `prefix` (raw contract addresses)
    ExcludeBasePrefix { prefix: String },
}

impl ListingFilter {
    pub fn equals(field: &str, value: Value) -> Self {
        ListingFilter::Equals {
            field: field.to_string(),
            value,
        }
    }

    pub fn non_zero(field: &str) -> Self {
        ListingFilter::NonZero {
            field: field.to_string(),
        }
    }

    fn accepts(&self, entry: &Value, native_base: &str) -> bool {
        match self {
            ListingFilter::Equals { field, value } => record_field(entry, field) == Some(value),
            ListingFilter::NonZero { field } => record_field(entry, field)
                .and_then(|v| number(v).ok())
                .map(|n| n != 0.0)
                .unwrap_or(false),
            ListingFilter::ExcludeBasePrefix { prefix } => {
                !native_base.starts_with(prefix.to_ascii_uppercase().as_str())
            }
        }
    }
}

/// Declarative description of a listing payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListingShape {
    /// Array (or object values) of market records
    Records {
        #[serde(default)]
        path: Vec<String>,
        pair: PairSource,
        /// Field holding the market id
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        filters: Vec<ListingFilter>,
    },
    /// Object keyed by market symbol
    Keys {
        #[serde(default)]
        path: Vec<String>,
        format: SymbolFormat,
        /// Field of the keyed value holding the market id
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        filters: Vec<ListingFilter>,
    },
    /// Array of plain symbol strings
    Strings {
        #[serde(default)]
        path: Vec<String>,
        format: SymbolFormat,
    },
    /// Object keyed by quote; each group lists its markets either as an
    /// array (strings or records) or as the keys of an object
    Grouped {
        #[serde(default)]
        path: Vec<String>,
        /// Path from a group to its member container
        #[serde(default)]
        members: Vec<String>,
        /// Field naming the base inside record members
        #[serde(default)]
        base: Option<String>,
        /// Members are full market symbols rather than bare bases
        #[serde(default)]
        format: Option<SymbolFormat>,
    },
}

/// One market as the exchange lists it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedMarket {
    /// Native quote, upper-cased
    pub quote: String,
    /// Native base, upper-cased
    pub base: String,
    /// Raw combined symbol when the listing provides one
    pub symbol: Option<String>,
    pub id: Option<MarketId>,
}

/// Decode a listing payload. Entries whose symbol cannot be split are
/// skipped; a missing container or required field is a schema error.
pub fn decode_listing(
    payload: &Value,
    shape: &ListingShape,
    quotes: &QuoteAllowList,
    tickers: &TickerMap,
) -> ExchangeResult<Vec<ListedMarket>> {
    let placeholders = Placeholders::default();
    let container = |path: &[String]| {
        lookup(payload, path, &placeholders)
            .filter(|v| !v.is_null())
            .ok_or_else(|| ExchangeError::schema(format!("listing container {} missing", display_path(path))))
    };

    let mut markets = Vec::new();
    match shape {
        ListingShape::Records {
            path,
            pair,
            id,
            filters,
        } => {
            for entry in entries(container(path)?, path)? {
                let (quote, base, symbol) = match pair {
                    PairSource::Fields { quote, base } => (
                        text_field(entry, quote)?.to_ascii_uppercase(),
                        text_field(entry, base)?.to_ascii_uppercase(),
                        None,
                    ),
                    PairSource::Symbol { field, format } => {
                        let raw = text_field(entry, field)?;
                        match format.split(&raw, quotes, tickers) {
                            Some((quote, base)) => (quote, base, Some(raw)),
                            None => {
                                debug!("Skipping unparsable market symbol {}", raw);
                                continue;
                            }
                        }
                    }
                };
                if !filters.iter().all(|f| f.accepts(entry, &base)) {
                    continue;
                }
                let id = match id {
                    Some(field) => Some(id_field(entry, field)?),
                    None => None,
                };
                markets.push(ListedMarket {
                    quote,
                    base,
                    symbol,
                    id,
                });
            }
        }
        ListingShape::Keys {
            path,
            format,
            id,
            filters,
        } => {
            let object = container(path)?.as_object().ok_or_else(|| {
                ExchangeError::schema(format!("expected object at {}", display_path(path)))
            })?;
            for (key, entry) in object {
                let Some((quote, base)) = format.split(key, quotes, tickers) else {
                    debug!("Skipping unparsable market symbol {}", key);
                    continue;
                };
                if !filters.iter().all(|f| f.accepts(entry, &base)) {
                    continue;
                }
                let id = match id {
                    Some(field) => Some(id_field(entry, field)?),
                    None => None,
                };
                markets.push(ListedMarket {
                    quote,
                    base,
                    symbol: Some(key.clone()),
                    id,
                });
            }
        }
        ListingShape::Strings { path, format } => {
            let items = container(path)?.as_array().ok_or_else(|| {
                ExchangeError::schema(format!("expected list at {}", display_path(path)))
            })?;
            for item in items {
                let raw = item
                    .as_str()
                    .ok_or_else(|| ExchangeError::schema(format!("expected symbol string, got {}", type_name(item))))?;
                match format.split(raw, quotes, tickers) {
                    Some((quote, base)) => markets.push(ListedMarket {
                        quote,
                        base,
                        symbol: Some(raw.to_string()),
                        id: None,
                    }),
                    None => debug!("Skipping unparsable market symbol {}", raw),
                }
            }
        }
        ListingShape::Grouped {
            path,
            members,
            base,
            format,
        } => {
            let object = container(path)?.as_object().ok_or_else(|| {
                ExchangeError::schema(format!("expected object at {}", display_path(path)))
            })?;
            for (group_quote, group) in object {
                let names = group_members(group, members, base.as_deref(), group_quote)?;
                for name in names {
                    let (quote, native_base, symbol) = match format {
                        Some(format) => match format.split(&name, quotes, tickers) {
                            Some((quote, base)) => (quote, base, Some(name)),
                            None => {
                                debug!("Skipping unparsable market symbol {}", name);
                                continue;
                            }
                        },
                        None => (group_quote.to_ascii_uppercase(), name.to_ascii_uppercase(), None),
                    };
                    markets.push(ListedMarket {
                        quote,
                        base: native_base,
                        symbol,
                        id: None,
                    });
                }
            }
        }
    }
    Ok(markets)
}

fn group_members(
    group: &Value,
    members: &[String],
    base: Option<&str>,
    group_quote: &str,
) -> ExchangeResult<Vec<String>> {
    let container = lookup(group, members, &Placeholders::default()).ok_or_else(|| {
        ExchangeError::schema(format!(
            "market group {} lacks {}",
            group_quote,
            display_path(members)
        ))
    })?;
    match container {
        Value::Object(map) => Ok(map.keys().cloned().collect()),
        Value::Array(items) => items
            .iter()
            .map(|item| match (item, base) {
                (Value::String(s), _) => Ok(s.clone()),
                (_, Some(field)) => text_field(item, field),
                (other, None) => Err(ExchangeError::schema(format!(
                    "expected base string in group {}, got {}",
                    group_quote,
                    type_name(other)
                ))),
            })
            .collect(),
        other => Err(ExchangeError::schema(format!(
            "expected list for market group {}, got {}",
            group_quote,
            type_name(other)
        ))),
    }
}

fn entries<'a>(container: &'a Value, path: &[String]) -> ExchangeResult<Vec<&'a Value>> {
    match container {
        Value::Array(items) => Ok(items.iter().collect()),
        Value::Object(map) => Ok(map.values().collect()),
        other => Err(ExchangeError::schema(format!(
            "expected records at {}, got {}",
            display_path(path),
            type_name(other)
        ))),
    }
}

/// Named field of a record object, or a numbered slot of a record array.
fn record_field<'a>(entry: &'a Value, name: &str) -> Option<&'a Value> {
    match entry {
        Value::Array(items) => items.get(name.parse::<usize>().ok()?),
        _ => entry.get(name),
    }
}

fn text_field(entry: &Value, field: &str) -> ExchangeResult<String> {
    match record_field(entry, field) {
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(ExchangeError::schema(format!(
            "field {} should be a string, got {}",
            field,
            type_name(other)
        ))),
        None => Err(ExchangeError::schema(format!("listing entry lacks field {}", field))),
    }
}

fn id_field(entry: &Value, field: &str) -> ExchangeResult<MarketId> {
    match record_field(entry, field) {
        Some(Value::Number(n)) => n
            .as_i64()
            .map(MarketId::Number)
            .ok_or_else(|| ExchangeError::schema(format!("market id {} is not an integer", n))),
        Some(Value::String(s)) => Ok(MarketId::Text(s.clone())),
        Some(other) => Err(ExchangeError::schema(format!(
            "market id field {} has type {}",
            field,
            type_name(other)
        ))),
        None => Err(ExchangeError::schema(format!("listing entry lacks id field {}", field))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn pairs(markets: &[ListedMarket]) -> Vec<(String, String)> {
        markets.iter().map(|m| (m.quote.clone(), m.base.clone())).collect()
    }

    fn owned(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(q, b)| (q.to_string(), b.to_string())).collect()
    }

    #[test]
    fn test_split_formats() {
        let quotes = QuoteAllowList::default();
        let tickers = TickerMap::default();

        let dash = SymbolFormat::delimited("-", PairOrder::QuoteFirst);
        assert_eq!(dash.split("BTC-ETH", &quotes, &tickers), Some(("BTC".into(), "ETH".into())));
        assert_eq!(dash.split("BTCETH", &quotes, &tickers), None);

        let under = SymbolFormat::delimited("_", PairOrder::BaseFirst);
        assert_eq!(under.split("eth_btc", &quotes, &tickers), Some(("BTC".into(), "ETH".into())));

        let suffix = SymbolFormat::QuoteSuffix { len: 3 };
        assert_eq!(suffix.split("ethbtc", &quotes, &tickers), Some(("BTC".into(), "ETH".into())));
        assert_eq!(suffix.split("btc", &quotes, &tickers), None);

        let known = SymbolFormat::KnownQuoteSuffix;
        assert_eq!(known.split("ETHUSDT", &quotes, &tickers), Some(("USDT".into(), "ETH".into())));
        assert_eq!(known.split("BTCUSD", &quotes, &tickers), Some(("USD".into(), "BTC".into())));
        assert_eq!(known.split("ETHBTC", &quotes, &tickers), Some(("BTC".into(), "ETH".into())));
        assert_eq!(known.split("XMREUR", &quotes, &tickers), None);
    }

    #[test]
    fn test_records_with_fields_and_filters() {
        let shape = ListingShape::Records {
            path: vec!["data".into()],
            pair: PairSource::Fields {
                quote: "quoteAsset".into(),
                base: "baseAsset".into(),
            },
            id: None,
            filters: vec![ListingFilter::equals("status", json!("TRADING"))],
        };
        let payload = json!({"data": [
            {"quoteAsset": "BTC", "baseAsset": "BCC", "status": "TRADING"},
            {"quoteAsset": "BTC", "baseAsset": "OLD", "status": "BREAK"},
            {"quoteAsset": "usdt", "baseAsset": "eth", "status": "TRADING"}
        ]});

        let markets = decode_listing(&payload, &shape, &QuoteAllowList::default(), &TickerMap::default()).unwrap();
        assert_eq!(pairs(&markets), owned(&[("BTC", "BCC"), ("USDT", "ETH")]));
        assert_eq!(markets[0].id, None);
    }

    #[test]
    fn test_records_with_symbol_and_numeric_id() {
        let shape = ListingShape::Records {
            path: vec!["result".into()],
            pair: PairSource::Symbol {
                field: "MarketName".into(),
                format: SymbolFormat::delimited("-", PairOrder::QuoteFirst),
            },
            id: Some("MarketID".into()),
            filters: vec![ListingFilter::non_zero("Volume")],
        };
        let payload = json!({"result": [
            {"MarketName": "BTC-LTC", "MarketID": 17, "Volume": "12.5"},
            {"MarketName": "BTC-DEAD", "MarketID": 18, "Volume": 0},
            {"MarketName": "BTC-NOVOL", "MarketID": 19},
            {"MarketName": "garbage", "MarketID": 20, "Volume": 1}
        ]});

        let markets = decode_listing(&payload, &shape, &QuoteAllowList::default(), &TickerMap::default()).unwrap();
        assert_eq!(markets.len(), 1);
        assert_eq!(markets[0].id, Some(MarketId::Number(17)));
        assert_eq!(markets[0].symbol.as_deref(), Some("BTC-LTC"));
    }

    #[test]
    fn test_positional_records() {
        let shape = ListingShape::Records {
            path: vec![],
            pair: PairSource::Fields {
                quote: "1".into(),
                base: "0".into(),
            },
            id: None,
            filters: vec![],
        };
        let payload = json!([["LTC", "BTC"], ["xmr", "usd"]]);

        let markets = decode_listing(&payload, &shape, &QuoteAllowList::default(), &TickerMap::default()).unwrap();
        let pairs: Vec<(&str, &str)> = markets.iter().map(|m| (m.quote.as_str(), m.base.as_str())).collect();
        assert_eq!(pairs, vec![("BTC", "LTC"), ("USD", "XMR")]);

        let err = decode_listing(&json!([["LTC"]]), &shape, &QuoteAllowList::default(), &TickerMap::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_keys_with_address_id() {
        let shape = ListingShape::Keys {
            path: vec![],
            format: SymbolFormat::delimited("_", PairOrder::QuoteFirst),
            id: Some("tokenAddr".into()),
            filters: vec![
                ListingFilter::non_zero("baseVolume"),
                ListingFilter::ExcludeBasePrefix { prefix: "0x".into() },
            ],
        };
        let payload = json!({
            "ETH_ZRX": {"tokenAddr": "0xe41d", "baseVolume": 10.0},
            "ETH_0x12ab": {"tokenAddr": "0x12ab", "baseVolume": 1.0},
            "ETH_IDLE": {"tokenAddr": "0x0000", "baseVolume": 0}
        });

        let markets = decode_listing(&payload, &shape, &QuoteAllowList::default(), &TickerMap::default()).unwrap();
        assert_eq!(pairs(&markets), owned(&[("ETH", "ZRX")]));
        assert_eq!(markets[0].id, Some(MarketId::Text("0xe41d".into())));
    }

    #[test]
    fn test_strings_and_grouped() {
        let strings = ListingShape::Strings {
            path: vec![],
            format: SymbolFormat::QuoteSuffix { len: 3 },
        };
        let markets = decode_listing(
            &json!(["ethbtc", "ltcusd", "x"]),
            &strings,
            &QuoteAllowList::default(),
            &TickerMap::default(),
        )
        .unwrap();
        assert_eq!(pairs(&markets), owned(&[("BTC", "ETH"), ("USD", "LTC")]));

        let grouped = ListingShape::Grouped {
            path: vec!["data".into()],
            members: vec![],
            base: Some("coin_from".into()),
            format: None,
        };
        let markets = decode_listing(
            &json!({"data": {"btc": [{"coin_from": "ans"}, "ltc"]}}),
            &grouped,
            &QuoteAllowList::default(),
            &TickerMap::default(),
        )
        .unwrap();
        assert_eq!(pairs(&markets), owned(&[("BTC", "ANS"), ("BTC", "LTC")]));
    }

    #[test]
    fn test_grouped_object_members() {
        let keyed = ListingShape::Grouped {
            path: vec!["data".into()],
            members: vec![],
            base: None,
            format: None,
        };
        let markets = decode_listing(
            &json!({"data": {"eth": {"omg": {}, "zrx": {}}}}),
            &keyed,
            &QuoteAllowList::default(),
            &TickerMap::default(),
        )
        .unwrap();
        assert_eq!(pairs(&markets), owned(&[("ETH", "OMG"), ("ETH", "ZRX")]));

        let symbols = ListingShape::Grouped {
            path: vec!["response".into()],
            members: vec!["markets".into()],
            base: None,
            format: Some(SymbolFormat::delimited("/", PairOrder::BaseFirst)),
        };
        let markets = decode_listing(
            &json!({"response": {"BTC": {"markets": {"XRB/BTC": {}, "bad": {}}}}}),
            &symbols,
            &QuoteAllowList::default(),
            &TickerMap::default(),
        )
        .unwrap();
        assert_eq!(pairs(&markets), owned(&[("BTC", "XRB")]));
        assert_eq!(markets[0].symbol.as_deref(), Some("XRB/BTC"));
    }

    #[test]
    fn test_schema_errors() {
        let shape = ListingShape::Records {
            path: vec!["data".into()],
            pair: PairSource::Fields {
                quote: "quote".into(),
                base: "base".into(),
            },
            id: None,
            filters: vec![],
        };
        let quotes = QuoteAllowList::default();
        let tickers = TickerMap::default();

        let err = decode_listing(&json!({"error": "maintenance"}), &shape, &quotes, &tickers).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);

        let err = decode_listing(&json!({"data": [{"quote": "BTC"}]}), &shape, &quotes, &tickers).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);

        let err = decode_listing(&json!({"data": "nope"}), &shape, &quotes, &tickers).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_shape_from_json() {
        let shape: ListingShape = serde_json::from_value(json!({
            "kind": "records",
            "path": ["data"],
            "pair": {"kind": "symbol", "field": "symbol", "format": {"kind": "delimited", "separator": "_", "order": "base_first"}}
        }))
        .unwrap();
        match shape {
            ListingShape::Records { id, filters, .. } => {
                assert_eq!(id, None);
                assert!(filters.is_empty());
            }
            other => panic!("unexpected shape {:?}", other),
        }
    }
}
