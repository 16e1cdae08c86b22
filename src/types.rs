//! Core domain types: orders, trades, sides, and the pair identifier.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Opaque order identifier.
pub type OrderId = Uuid;

/// Opaque trade identifier.
pub type TradeId = Uuid;

/// Interned pair symbol, e.g. `BTC-USDT`. Cheap to clone and hash, since the
/// engine keys its per-pair registry and order lookups by it.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Pair(Arc<str>);

impl Pair {
    pub fn new(symbol: impl AsRef<str>) -> Self {
        Pair(Arc::from(symbol.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Pair {
    fn from(s: &str) -> Self {
        Pair::new(s)
    }
}

impl From<String> for Pair {
    fn from(s: String) -> Self {
        Pair::new(s)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum OrderType {
    Market,
    Limit,
}

/// Time-in-force. The core spec is GTC-only; IOC is kept as a thin,
/// explicitly-flagged extension of the same matching core (see
/// `MatchingEngine::submit`), not a feature the depth/stats/event
/// contracts know anything about.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default, Serialize, Deserialize)]
pub enum TimeInForce {
    #[default]
    Gtc,
    Ioc,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Partial,
    Filled,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Cancelled)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub pair: Pair,
    pub side: Side,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    /// `> 0` for limit orders; ignored (left at `0`) for market orders.
    pub price: Decimal,
    /// Total quantity in base units, `> 0`.
    pub amount: Decimal,
    /// Monotonically non-decreasing, `0 <= filled_amount <= amount`.
    pub filled_amount: Decimal,
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
}

impl Order {
    /// Quantity not yet filled.
    pub fn remaining(&self) -> Decimal {
        self.amount - self.filled_amount
    }

    pub fn is_buy(&self) -> bool {
        self.side == Side::Buy
    }
}

/// Converts a wall-clock timestamp to the 64-bit millisecond epoch
/// `Order`/`Trade` cross the external-interface boundary as (spec.md §6).
pub fn timestamp_millis(t: DateTime<Utc>) -> i64 {
    t.timestamp_millis()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub pair: Pair,
    pub price: Decimal,
    pub amount: Decimal,
    pub volume: Decimal,
    pub timestamp: DateTime<Utc>,
    pub taker_side: Side,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub maker_fee: Decimal,
    pub taker_fee: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_order() -> Order {
        Order {
            id: Uuid::new_v4(),
            pair: Pair::new("BTC-USDT"),
            side: Side::Buy,
            order_type: OrderType::Limit,
            time_in_force: TimeInForce::default(),
            price: dec!(50000),
            amount: dec!(1.0),
            filled_amount: dec!(0.4),
            status: OrderStatus::Partial,
            timestamp: Utc::now(),
            user_id: "u1".to_string(),
        }
    }

    #[test]
    fn remaining_is_amount_minus_filled() {
        assert_eq!(sample_order().remaining(), dec!(0.6));
    }

    #[test]
    fn side_opposite_round_trips() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }

    #[test]
    fn terminal_statuses() {
        assert!(OrderStatus::Filled.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Partial.is_terminal());
    }

    #[test]
    fn pair_interns_and_displays() {
        let p = Pair::new("ETH-USDT");
        assert_eq!(p.as_str(), "ETH-USDT");
        assert_eq!(format!("{p}"), "ETH-USDT");
    }

    #[test]
    fn timestamp_millis_matches_chrono() {
        let now = Utc::now();
        assert_eq!(timestamp_millis(now), now.timestamp_millis());
    }
}
