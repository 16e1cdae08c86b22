//! Ordered mapping from price to price level.
//!
//! Grounded in the teacher's `BTreeMap<Decimal, PriceLevel>` design (the
//! earlier-generation `src/orderbook.rs`, which already keys by `Decimal`
//! rather than the later generation's scaled `i64`). `BTreeMap` gives
//! `O(log P)` insert/remove/find for free and ordered iteration in either
//! direction; this wrapper only adds the side-aware "first means best"
//! framing spec.md's ordered-price-map contract describes, so callers never
//! need to know whether "first" means ascending or descending.

use crate::price_level::PriceLevel;
use crate::types::Side;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// A side-aware ordered price map: bids are best-first descending, asks are
/// best-first ascending. The map itself always stores entries in natural
/// ascending `Decimal` order; `side` only determines which end of the map
/// `first()`/`iter_forward()` address.
#[derive(Clone, Debug)]
pub struct PriceMap {
    side: Side,
    levels: BTreeMap<Decimal, PriceLevel>,
}

impl PriceMap {
    pub fn new(side: Side) -> Self {
        PriceMap {
            side,
            levels: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn find(&self, price: Decimal) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    pub fn find_mut(&mut self, price: Decimal) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    /// Returns the level at `price`, creating an empty one if absent.
    pub fn entry(&mut self, price: Decimal) -> &mut PriceLevel {
        self.levels
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
    }

    /// Removes the level at `price` outright (used once it empties).
    pub fn remove(&mut self, price: Decimal) -> Option<PriceLevel> {
        self.levels.remove(&price)
    }

    /// The best level: highest price for bids, lowest for asks.
    pub fn first(&self) -> Option<&PriceLevel> {
        match self.side {
            Side::Buy => self.levels.values().next_back(),
            Side::Sell => self.levels.values().next(),
        }
    }

    /// The best level, mutable.
    pub fn first_mut(&mut self) -> Option<&mut PriceLevel> {
        match self.side {
            Side::Buy => self.levels.values_mut().next_back(),
            Side::Sell => self.levels.values_mut().next(),
        }
    }

    /// The worst (furthest-from-mid) level.
    pub fn last(&self) -> Option<&PriceLevel> {
        match self.side {
            Side::Buy => self.levels.values().next(),
            Side::Sell => self.levels.values().next_back(),
        }
    }

    /// Iterates best-first.
    pub fn iter_forward(&self) -> Box<dyn Iterator<Item = &PriceLevel> + '_> {
        match self.side {
            Side::Buy => Box::new(self.levels.values().rev()),
            Side::Sell => Box::new(self.levels.values()),
        }
    }

    /// Iterates worst-first (the reverse of `iter_forward`).
    pub fn iter_reverse(&self) -> Box<dyn Iterator<Item = &PriceLevel> + '_> {
        match self.side {
            Side::Buy => Box::new(self.levels.values()),
            Side::Sell => Box::new(self.levels.values().rev()),
        }
    }

    /// Sum of aggregate amounts across all levels.
    pub fn total_volume(&self) -> Decimal {
        self.levels.values().map(|l| l.amount()).sum()
    }
}
