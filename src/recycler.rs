//! Bounded free list for `Order` records, to dampen allocation churn at high
//! submission rates.
//!
//! Grounded in `joaquinbejar-OrderBook-rs`'s `MatchingPool`
//! (`src/orderbook/pool.rs`): a pop-or-allocate `get_*` paired with a
//! clear-and-push-back `return_*`, both behind interior mutability so the
//! pool can be shared through a `&self` reference. This is purely an
//! optimization; per spec, no correctness property may depend on it —
//! `release` silently drops the order once the free list is full, and
//! `acquire` falls back to a fresh allocation when the list is empty.

use crate::types::{Order, OrderId, OrderStatus, OrderType, Pair, Side, TimeInForce};
use chrono::Utc;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use uuid::Uuid;

pub struct OrderRecycler {
    free_list: Mutex<Vec<Order>>,
    capacity: usize,
}

impl OrderRecycler {
    pub fn new(capacity: usize) -> Self {
        OrderRecycler {
            free_list: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
        }
    }

    /// Pops a recycled order and resets every field, or allocates a fresh one
    /// if the free list is empty.
    pub fn acquire(
        &self,
        pair: Pair,
        side: Side,
        order_type: OrderType,
        time_in_force: TimeInForce,
        price: Decimal,
        amount: Decimal,
        user_id: String,
    ) -> Order {
        let mut order = self.free_list.lock().pop().unwrap_or_else(blank_order);
        order.id = Uuid::new_v4();
        order.pair = pair;
        order.side = side;
        order.order_type = order_type;
        order.time_in_force = time_in_force;
        order.price = price;
        order.amount = amount;
        order.filled_amount = Decimal::ZERO;
        order.status = OrderStatus::Pending;
        order.timestamp = Utc::now();
        order.user_id = user_id;
        order
    }

    /// Returns an order to the free list. No-op when the list is at
    /// capacity.
    pub fn release(&self, order: Order) {
        let mut list = self.free_list.lock();
        if list.len() < self.capacity {
            list.push(order);
        }
    }

    pub fn len(&self) -> usize {
        self.free_list.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn blank_order() -> Order {
    Order {
        id: OrderId::nil(),
        pair: Pair::new(""),
        side: Side::Buy,
        order_type: OrderType::Limit,
        time_in_force: TimeInForce::default(),
        price: Decimal::ZERO,
        amount: Decimal::ZERO,
        filled_amount: Decimal::ZERO,
        status: OrderStatus::Pending,
        timestamp: Utc::now(),
        user_id: String::new(),
    }
}
