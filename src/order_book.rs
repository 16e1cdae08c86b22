//! Per-pair order book: two ordered price maps, a by-id index, and the
//! depth/stats read views.
//!
//! Grounded in the teacher's `OrderBook` (`domain/services/orderbook/orderbook.rs`):
//! same `order_map: HashMap<OrderId, (Side, Price)>` for O(1) cancel lookup,
//! same cached-best-price idea (here the cache lives inside `PriceMap`
//! itself rather than a separate field, since `BTreeMap::values().next()` is
//! already O(1) amortized and avoids a second source of truth to keep in
//! sync).

use crate::price_map::PriceMap;
use crate::types::{Order, OrderId, Pair, Side};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderBookError {
    #[error("order {0} already rests in the book")]
    DuplicateId(OrderId),
    #[error("order {0} is not a limit order with a positive remainder")]
    NotRestable(OrderId),
}

/// One row of a depth snapshot: a price level with its own amount, the
/// cumulative amount from the top of the side, and the resting order ids at
/// that level in queue (price-time priority) order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepthRow {
    pub price: Decimal,
    pub amount: Decimal,
    pub total: Decimal,
    pub orders: Vec<OrderId>,
}

/// A book-local depth snapshot (no pair/timestamp — the engine's
/// `market_depth` wraps this with those).
#[derive(Clone, Debug, Default)]
pub struct BookDepth {
    pub bids: Vec<DepthRow>,
    pub asks: Vec<DepthRow>,
}

#[derive(Clone, Debug)]
pub struct OrderBookStats {
    pub best_bid: Option<Decimal>,
    pub best_ask: Option<Decimal>,
    pub spread: Option<Decimal>,
    pub bid_volume: Decimal,
    pub ask_volume: Decimal,
    pub order_count: usize,
}

pub struct OrderBook {
    pair: Pair,
    bids: PriceMap,
    asks: PriceMap,
    /// By-id index of every resting order: `(side, price)`.
    order_map: HashMap<OrderId, (Side, Decimal)>,
    last_update_time: DateTime<Utc>,
}

impl OrderBook {
    pub fn new(pair: Pair) -> Self {
        let now = Utc::now();
        OrderBook {
            pair,
            bids: PriceMap::new(Side::Buy),
            asks: PriceMap::new(Side::Sell),
            order_map: HashMap::new(),
            last_update_time: now,
        }
    }

    pub fn pair(&self) -> &Pair {
        &self.pair
    }

    pub fn last_update_time(&self) -> DateTime<Utc> {
        self.last_update_time
    }

    fn touch(&mut self) {
        self.last_update_time = Utc::now();
    }

    fn side_map(&self, side: Side) -> &PriceMap {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    fn side_map_mut(&mut self, side: Side) -> &mut PriceMap {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    /// Counter-side map for the given side: bids for a sell, asks for a buy.
    pub fn counter_side(&self, side: Side) -> &PriceMap {
        self.side_map(side.opposite())
    }

    pub fn counter_side_mut(&mut self, side: Side) -> &mut PriceMap {
        self.side_map_mut(side.opposite())
    }

    pub fn bids(&self) -> &PriceMap {
        &self.bids
    }

    pub fn asks(&self) -> &PriceMap {
        &self.asks
    }

    /// Requires `order.order_type == Limit`, `order.remaining() > 0`, and no
    /// existing entry with the same id.
    pub fn add_resting(&mut self, order: Order) -> Result<(), OrderBookError> {
        use crate::types::OrderType;
        if order.order_type != OrderType::Limit || order.remaining() <= Decimal::ZERO {
            return Err(OrderBookError::NotRestable(order.id));
        }
        if self.order_map.contains_key(&order.id) {
            return Err(OrderBookError::DuplicateId(order.id));
        }
        let id = order.id;
        let side = order.side;
        let price = order.price;
        self.side_map_mut(side).entry(price).append(order);
        self.order_map.insert(id, (side, price));
        self.touch();
        Ok(())
    }

    /// Removes the order from its level and the by-id index. Drops the level
    /// if it empties. Returns the order (status unchanged) if present.
    pub fn remove(&mut self, order_id: OrderId) -> Option<Order> {
        let (side, price) = self.order_map.remove(&order_id)?;
        let map = self.side_map_mut(side);
        let removed = map.find_mut(price).and_then(|l| l.remove_by_id(order_id));
        if let Some(level) = map.find(price) {
            if level.is_empty() {
                map.remove(price);
            }
        }
        self.touch();
        removed
    }

    pub fn get_order_by_id(&self, order_id: OrderId) -> Option<&Order> {
        let (side, price) = self.order_map.get(&order_id)?;
        self.side_map(*side)
            .find(*price)
            .and_then(|l| l.iter().find(|o| o.id == order_id))
    }

    pub fn contains(&self, order_id: OrderId) -> bool {
        self.order_map.contains_key(&order_id)
    }

    /// Applies a fill to the current head of the given side's best level
    /// (the maker in a match). Returns a snapshot of the maker after the
    /// fill, with `status` and `filled_amount` already updated. Removes the
    /// order from the by-id index if it became terminal, and drops the level
    /// from the map if it emptied.
    pub fn apply_fill_to_head(&mut self, side: Side, fill: Decimal) -> Option<Order> {
        let price = self.side_map(side).first()?.price;
        let map = self.side_map_mut(side);
        let level = map.find_mut(price)?;
        let popped = level.apply_fill(fill);
        let snapshot = match popped {
            Some(order) => Some(order),
            None => level.head().cloned(),
        };
        if let Some(order) = &snapshot {
            if order.status.is_terminal() {
                self.order_map.remove(&order.id);
            }
        }
        if level.is_empty() {
            map.remove(price);
        }
        self.touch();
        snapshot
    }

    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.first().map(|l| l.price)
    }

    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.first().map(|l| l.price)
    }

    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) => Some(ask - bid),
            _ => None,
        }
    }

    pub fn volume(&self, side: Side) -> Decimal {
        self.side_map(side).total_volume()
    }

    pub fn order_count(&self) -> usize {
        self.order_map.len()
    }

    /// From the top of each side, up to `max_levels` entries, each carrying
    /// cumulative `total` from the top. Snapshot — does not borrow the book.
    pub fn depth(&self, max_levels: usize) -> BookDepth {
        let collect = |map: &PriceMap| -> Vec<DepthRow> {
            let mut total = Decimal::ZERO;
            map.iter_forward()
                .take(max_levels)
                .map(|level| {
                    total += level.amount();
                    DepthRow {
                        price: level.price,
                        amount: level.amount(),
                        total,
                        orders: level.iter().map(|o| o.id).collect(),
                    }
                })
                .collect()
        };
        BookDepth {
            bids: collect(&self.bids),
            asks: collect(&self.asks),
        }
    }

    pub fn stats(&self) -> OrderBookStats {
        OrderBookStats {
            best_bid: self.best_bid(),
            best_ask: self.best_ask(),
            spread: self.spread(),
            bid_volume: self.volume(Side::Buy),
            ask_volume: self.volume(Side::Sell),
            order_count: self.order_count(),
        }
    }

    /// Fatal invariant per spec: once a `submit`/`cancel` call returns, the
    /// book must never be crossed. The matching loop only rests a residual
    /// once the counter side's best price no longer satisfies the limit
    /// price gate, so this should never fire; it exists to halt the engine
    /// rather than silently serve a crossed book if that reasoning is wrong.
    pub fn assert_not_crossed(&self) {
        if let (Some(bid), Some(ask)) = (self.best_bid(), self.best_ask()) {
            assert!(
                bid < ask,
                "order book for {} is crossed: best_bid {bid} >= best_ask {ask}",
                self.pair
            );
        }
    }
}
