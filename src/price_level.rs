//! FIFO queue of resting orders at a single price, plus a cached aggregate
//! unfilled amount.
//!
//! Grounded in the teacher's `PriceLevel` (`orders: VecDeque<Order>` +
//! `total_volume`, both in `src/orderbook.rs` and
//! `domain/services/orderbook/orderbook.rs`); this version generalizes the
//! aggregate to `Decimal` and adds `apply_fill` for in-place partial fills
//! without first dequeuing the maker.

use crate::types::{Order, OrderId};
use rust_decimal::Decimal;
use std::collections::VecDeque;

#[derive(Clone, Debug)]
pub struct PriceLevel {
    pub price: Decimal,
    orders: VecDeque<Order>,
    amount: Decimal,
}

impl PriceLevel {
    pub fn new(price: Decimal) -> Self {
        PriceLevel {
            price,
            orders: VecDeque::new(),
            amount: Decimal::ZERO,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Aggregate unfilled amount across all resting orders at this level.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Enqueues at the tail; `amount += order.remaining()`.
    pub fn append(&mut self, order: Order) {
        self.amount += order.remaining();
        self.orders.push_back(order);
    }

    /// Removes the order with the given id, wherever it sits in the queue.
    /// `O(N_level)`, acceptable since per-level depth is small.
    pub fn remove_by_id(&mut self, order_id: OrderId) -> Option<Order> {
        let pos = self.orders.iter().position(|o| o.id == order_id)?;
        let order = self.orders.remove(pos)?;
        self.amount -= order.remaining();
        assert!(
            self.amount >= Decimal::ZERO,
            "price level amount went negative after removing order {order_id}"
        );
        Some(order)
    }

    /// Peeks the front of the queue without removing it.
    pub fn head(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// Dequeues the front order. Caller is responsible for updating `amount`.
    pub fn pop_head(&mut self) -> Option<Order> {
        self.orders.pop_front()
    }

    /// Applies a fill to the head order: `filled_amount += fill`,
    /// `amount -= fill`, `status` advances to `Filled`/`Partial` accordingly.
    /// Pops and returns the head if it becomes fully filled; otherwise the
    /// head stays in the queue with its status updated in place.
    pub fn apply_fill(&mut self, fill: Decimal) -> Option<Order> {
        use crate::types::OrderStatus;
        let fully_filled = {
            let head = self.orders.front_mut()?;
            head.filled_amount += fill;
            self.amount -= fill;
            assert!(
                self.amount >= Decimal::ZERO,
                "price level amount went negative after a fill of {fill}"
            );
            let fully_filled = head.filled_amount == head.amount;
            head.status = if fully_filled {
                OrderStatus::Filled
            } else {
                OrderStatus::Partial
            };
            fully_filled
        };
        if fully_filled {
            self.orders.pop_front()
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }
}
