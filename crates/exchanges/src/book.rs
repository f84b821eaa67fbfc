//! Order book normalization.
//!
//! Converts an exchange payload into a canonical [`OrderBook`]. The payload
//! dialect (positional pairs, named fields, sign-encoded sides, scaled
//! integers, transposed sides) is declared by a [`BookShape`] plus the
//! profile's [`Scaling`] and `swap_sides` flag. Output is always re-sorted,
//! whatever order the exchange returned.

use crate::error::{ExchangeError, ExchangeResult};
use crate::template::{display_path, lookup, Placeholders};
use cointrage_core::{CanonicalSymbol, MarketPair, OrderBook, OrderLevel, Side};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// How a single level is encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LevelFormat {
    /// `[price, size, ...]` arrays
    Positional { rate: usize, quantity: usize },
    /// Objects; the first candidate field present wins
    Named {
        rate: Vec<String>,
        quantity: Vec<String>,
    },
}

impl LevelFormat {
    /// `[price, size]`
    pub fn pairs() -> Self {
        LevelFormat::Positional {
            rate: 0,
            quantity: 1,
        }
    }

    pub fn named(rate: &[&str], quantity: &[&str]) -> Self {
        LevelFormat::Named {
            rate: rate.iter().map(|s| s.to_string()).collect(),
            quantity: quantity.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Where the two sides live inside the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BookLayout {
    /// Separate ask and bid lists. A missing list is an empty side.
    Sides {
        asks: Vec<String>,
        bids: Vec<String>,
        level: LevelFormat,
    },
    /// List of side groups, each holding its own levels. Groups whose
    /// `flag` field is `true` are bids; quantities are taken as absolute.
    Flagged {
        #[serde(default)]
        groups: Vec<String>,
        flag: String,
        levels: Vec<String>,
        level: LevelFormat,
    },
    /// One list; the sign of the quantity selects the side.
    Signed {
        #[serde(default)]
        levels: Vec<String>,
        level: LevelFormat,
        /// Side denoted by a negative quantity
        #[serde(default = "default_negative_side")]
        negative: Side,
    },
}

fn default_negative_side() -> Side {
    Side::Ask
}

/// Declarative description of an order book payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookShape {
    /// Path to the required container (e.g. `["tick"]`, `["result"]`)
    #[serde(default)]
    pub root: Vec<String>,
    pub layout: BookLayout,
}

impl BookShape {
    pub fn sides(root: &[&str], asks: &[&str], bids: &[&str], level: LevelFormat) -> Self {
        Self {
            root: crate::template::path(root),
            layout: BookLayout::Sides {
                asks: crate::template::path(asks),
                bids: crate::template::path(bids),
                level,
            },
        }
    }

    pub fn flagged(root: &[&str], flag: &str, levels: &[&str], level: LevelFormat) -> Self {
        Self {
            root: crate::template::path(root),
            layout: BookLayout::Flagged {
                groups: Vec::new(),
                flag: flag.to_string(),
                levels: crate::template::path(levels),
                level,
            },
        }
    }

    pub fn signed(root: &[&str], levels: &[&str], level: LevelFormat, negative: Side) -> Self {
        Self {
            root: crate::template::path(root),
            layout: BookLayout::Signed {
                levels: crate::template::path(levels),
                level,
                negative,
            },
        }
    }
}

/// Amounts reported in smallest units.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaling {
    #[default]
    None,
    /// Divide rate and quantity by `10^decimals`, decimals chosen by quote.
    QuoteDecimals {
        default: u32,
        #[serde(default)]
        per_quote: BTreeMap<String, u32>,
        /// Fixed decimals for quantities, which otherwise follow the quote
        #[serde(default, skip_serializing_if = "Option::is_none")]
        quantity: Option<u32>,
    },
}

impl Scaling {
    /// Largest accepted decimal count.
    pub const MAX_DECIMALS: u32 = 30;

    pub fn by_quote(default: u32, per_quote: &[(&str, u32)]) -> Self {
        Scaling::QuoteDecimals {
            default,
            per_quote: per_quote
                .iter()
                .map(|(q, d)| (q.to_ascii_uppercase(), *d))
                .collect(),
            quantity: None,
        }
    }

    /// Quantities use `decimals` whatever the quote.
    pub fn with_quantity_decimals(self, decimals: u32) -> Self {
        match self {
            Scaling::None => Scaling::None,
            Scaling::QuoteDecimals {
                default, per_quote, ..
            } => Scaling::QuoteDecimals {
                default,
                per_quote,
                quantity: Some(decimals),
            },
        }
    }

    pub fn decimals(&self, quote: &CanonicalSymbol) -> u32 {
        match self {
            Scaling::None => 0,
            Scaling::QuoteDecimals {
                default, per_quote, ..
            } => per_quote.get(quote.as_str()).copied().unwrap_or(*default),
        }
    }

    pub fn quantity_decimals(&self, quote: &CanonicalSymbol) -> u32 {
        match self {
            Scaling::QuoteDecimals {
                quantity: Some(decimals),
                ..
            } => *decimals,
            _ => self.decimals(quote),
        }
    }

    /// Largest decimal count configured for any quote.
    pub fn max_decimals(&self) -> u32 {
        match self {
            Scaling::None => 0,
            Scaling::QuoteDecimals {
                default,
                per_quote,
                quantity,
            } => per_quote
                .values()
                .chain(quantity.iter())
                .copied()
                .fold(*default, u32::max),
        }
    }

    fn divisor(&self, quote: &CanonicalSymbol) -> f64 {
        power_of_ten(self.decimals(quote))
    }

    fn quantity_divisor(&self, quote: &CanonicalSymbol) -> f64 {
        power_of_ten(self.quantity_decimals(quote))
    }
}

fn power_of_ten(decimals: u32) -> f64 {
    10f64.powi(decimals.min(Scaling::MAX_DECIMALS) as i32)
}

/// Normalizer bound to one profile's shape and scaling.
#[derive(Debug, Clone, Copy)]
pub struct BookNormalizer<'a> {
    shape: &'a BookShape,
    scaling: &'a Scaling,
    swap_sides: bool,
}

impl<'a> BookNormalizer<'a> {
    pub fn new(shape: &'a BookShape, scaling: &'a Scaling, swap_sides: bool) -> Self {
        Self {
            shape,
            scaling,
            swap_sides,
        }
    }

    pub fn normalize(
        &self,
        payload: &Value,
        pair: MarketPair,
        placeholders: &Placeholders,
    ) -> ExchangeResult<OrderBook> {
        if payload.is_null() {
            return Err(ExchangeError::schema(format!("empty order book payload for {}", pair)));
        }

        let root = lookup(payload, &self.shape.root, placeholders)
            .filter(|v| !v.is_null())
            .ok_or_else(|| {
                ExchangeError::schema(format!(
                    "order book container {} missing for {}",
                    display_path(&self.shape.root),
                    pair
                ))
            })?;

        let divisor = self.scaling.divisor(&pair.quote);
        let quantity_divisor = self.scaling.quantity_divisor(&pair.quote);

        let (mut asks, mut bids) = match &self.shape.layout {
            BookLayout::Sides { asks, bids, level } => {
                let asks = side_levels(root, asks, level, placeholders)?;
                let bids = side_levels(root, bids, level, placeholders)?;
                (asks, bids)
            }
            BookLayout::Flagged {
                groups,
                flag,
                levels,
                level,
            } => flagged_levels(root, groups, flag, levels, level, placeholders)?,
            BookLayout::Signed {
                levels,
                level,
                negative,
            } => signed_levels(root, levels, level, *negative, placeholders)?,
        };

        for level in asks.iter_mut().chain(bids.iter_mut()) {
            level.rate /= divisor;
            level.quantity /= quantity_divisor;
            if !level.is_valid() {
                return Err(ExchangeError::schema(format!(
                    "invalid level rate={} quantity={} for {}",
                    level.rate, level.quantity, pair
                )));
            }
        }

        if self.swap_sides {
            std::mem::swap(&mut asks, &mut bids);
        }

        Ok(OrderBook::from_levels(pair, asks, bids))
    }
}

fn side_levels(
    root: &Value,
    path: &[String],
    format: &LevelFormat,
    placeholders: &Placeholders,
) -> ExchangeResult<Vec<OrderLevel>> {
    match lookup(root, path, placeholders) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items.iter().map(|item| parse_level(item, format)).collect(),
        Some(other) => Err(ExchangeError::schema(format!(
            "expected list at {}, got {}",
            display_path(path),
            type_name(other)
        ))),
    }
}

fn flagged_levels(
    root: &Value,
    groups: &[String],
    flag: &str,
    levels: &[String],
    format: &LevelFormat,
    placeholders: &Placeholders,
) -> ExchangeResult<(Vec<OrderLevel>, Vec<OrderLevel>)> {
    let items = match lookup(root, groups, placeholders) {
        None | Some(Value::Null) => return Ok((Vec::new(), Vec::new())),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(ExchangeError::schema(format!(
                "expected side groups at {}, got {}",
                display_path(groups),
                type_name(other)
            )))
        }
    };

    let mut asks = Vec::new();
    let mut bids = Vec::new();
    for group in items {
        let is_bid = group.get(flag).and_then(Value::as_bool).unwrap_or(false);
        let side = side_levels(group, levels, format, placeholders)?
            .into_iter()
            .map(|level| OrderLevel::new(level.rate, level.quantity.abs()));
        if is_bid {
            bids.extend(side);
        } else {
            asks.extend(side);
        }
    }
    Ok((asks, bids))
}

fn signed_levels(
    root: &Value,
    path: &[String],
    format: &LevelFormat,
    negative: Side,
    placeholders: &Placeholders,
) -> ExchangeResult<(Vec<OrderLevel>, Vec<OrderLevel>)> {
    let items = match lookup(root, path, placeholders) {
        None | Some(Value::Null) => return Ok((Vec::new(), Vec::new())),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(ExchangeError::schema(format!(
                "expected list at {}, got {}",
                display_path(path),
                type_name(other)
            )))
        }
    };

    let mut asks = Vec::new();
    let mut bids = Vec::new();
    for item in items {
        let level = parse_level(item, format)?;
        // zero carries no side
        if level.quantity == 0.0 {
            continue;
        }
        let side = if level.quantity < 0.0 {
            negative
        } else {
            negative.opposite()
        };
        let level = OrderLevel::new(level.rate, level.quantity.abs());
        match side {
            Side::Ask => asks.push(level),
            Side::Bid => bids.push(level),
        }
    }
    Ok((asks, bids))
}

fn parse_level(item: &Value, format: &LevelFormat) -> ExchangeResult<OrderLevel> {
    match format {
        LevelFormat::Positional { rate, quantity } => {
            let fields = item.as_array().ok_or_else(|| {
                ExchangeError::schema(format!("expected level array, got {}", type_name(item)))
            })?;
            let rate = fields
                .get(*rate)
                .ok_or_else(|| ExchangeError::schema(format!("level has no index {}", rate)))?;
            let quantity = fields
                .get(*quantity)
                .ok_or_else(|| ExchangeError::schema(format!("level has no index {}", quantity)))?;
            Ok(OrderLevel::new(number(rate)?, number(quantity)?))
        }
        LevelFormat::Named { rate, quantity } => {
            let fields = item.as_object().ok_or_else(|| {
                ExchangeError::schema(format!("expected level object, got {}", type_name(item)))
            })?;
            let pick = |names: &[String]| {
                names
                    .iter()
                    .find_map(|n| fields.get(n.as_str()).filter(|v| !v.is_null()))
                    .ok_or_else(|| ExchangeError::schema(format!("level lacks any of {:?}", names)))
            };
            Ok(OrderLevel::new(number(pick(rate)?)?, number(pick(quantity)?)?))
        }
    }
}

/// Numeric value from a JSON number or numeric string.
pub(crate) fn number(value: &Value) -> ExchangeResult<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ExchangeError::Parse(format!("number out of range: {}", n))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ExchangeError::Parse(format!("invalid number {:?}", s))),
        other => Err(ExchangeError::schema(format!(
            "expected number, got {}",
            type_name(other)
        ))),
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
