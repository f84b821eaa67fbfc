//! Canonical order book snapshot.
//!
//! Asks are kept in ascending order by rate (best ask first) and bids in
//! descending order by rate (best bid first).

use crate::MarketPair;
use serde::{Deserialize, Serialize};

/// Side of the order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

/// One price/size point of an order book.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderLevel {
    pub rate: f64,
    pub quantity: f64,
}

impl OrderLevel {
    pub fn new(rate: f64, quantity: f64) -> Self {
        Self { rate, quantity }
    }

    /// A level is valid when its rate is a positive finite number and its
    /// quantity a non-negative finite number.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.rate.is_finite() && self.rate > 0.0 && self.quantity.is_finite() && self.quantity >= 0.0
    }
}

/// Sort levels into canonical order for `side`.
///
/// The sort is stable, so levels sharing a rate keep their source order.
pub fn sort_levels(side: Side, levels: &mut [OrderLevel]) {
    match side {
        Side::Ask => levels.sort_by(|a, b| a.rate.total_cmp(&b.rate)),
        Side::Bid => levels.sort_by(|a, b| b.rate.total_cmp(&a.rate)),
    }
}

/// Order book snapshot for a single market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    pub pair: MarketPair,
    pub asks: Vec<OrderLevel>,
    pub bids: Vec<OrderLevel>,
}

impl OrderBook {
    /// Build a book, sorting both sides into canonical order.
    pub fn from_levels(pair: MarketPair, mut asks: Vec<OrderLevel>, mut bids: Vec<OrderLevel>) -> Self {
        sort_levels(Side::Ask, &mut asks);
        sort_levels(Side::Bid, &mut bids);
        Self { pair, asks, bids }
    }

    /// Empty book for `pair`.
    pub fn empty(pair: MarketPair) -> Self {
        Self {
            pair,
            asks: Vec::new(),
            bids: Vec::new(),
        }
    }

    /// Get the best ask (lowest rate).
    pub fn best_ask(&self) -> Option<&OrderLevel> {
        self.asks.first()
    }

    /// Get the best bid (highest rate).
    pub fn best_bid(&self) -> Option<&OrderLevel> {
        self.bids.first()
    }

    /// Absolute spread between best ask and best bid.
    pub fn spread(&self) -> Option<f64> {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) => Some(ask.rate - bid.rate),
            _ => None,
        }
    }

    /// Get the bid-ask spread in basis points of the best bid.
    pub fn spread_bps(&self) -> Option<i32> {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) if bid.rate > 0.0 => {
                Some(((ask.rate - bid.rate) / bid.rate * 10_000.0).round() as i32)
            }
            _ => None,
        }
    }

    /// Keep at most `depth` levels per side.
    pub fn truncate(&mut self, depth: usize) {
        self.asks.truncate(depth);
        self.bids.truncate(depth);
    }

    /// Levels for one side.
    pub fn side(&self, side: Side) -> &[OrderLevel] {
        match side {
            Side::Ask => &self.asks,
            Side::Bid => &self.bids,
        }
    }

    /// Check if the book has any data.
    pub fn is_empty(&self) -> bool {
        self.asks.is_empty() && self.bids.is_empty()
    }

    /// Check if both sides carry at least one level.
    pub fn is_two_sided(&self) -> bool {
        !self.asks.is_empty() && !self.bids.is_empty()
    }

    /// Asks ascending and bids descending by rate.
    pub fn check_sorted(&self) -> bool {
        self.asks.windows(2).all(|w| w[0].rate <= w[1].rate)
            && self.bids.windows(2).all(|w| w[0].rate >= w[1].rate)
    }
}
