//! A central-limit order book matching engine for spot trading pairs.
//!
//! Accepts market and limit orders, matches them against resting liquidity
//! under price-time priority, and emits a synchronous stream of trade and
//! order-lifecycle events. This crate owns no network I/O and no process
//! entrypoint beyond its own demo binary and benches — it is meant to be
//! embedded by a transport layer that owns admission over the wire, auth,
//! and fan-out to subscribers.

pub mod config;
pub mod decimal;
pub mod events;
pub mod matching_engine;
pub mod order_book;
pub mod price_level;
pub mod price_map;
pub mod recycler;
pub mod registry;
pub mod types;

pub use config::EngineConfig;
pub use events::{EventBus, EventHandler, MatchingEngineEvent};
pub use matching_engine::{EngineStats, MarketDepth, MatchingEngine, MatchingError};
pub use order_book::{BookDepth, DepthRow, OrderBook, OrderBookError, OrderBookStats};
pub use recycler::OrderRecycler;
pub use registry::PairRegistry;
pub use types::{
    timestamp_millis, Order, OrderId, OrderStatus, OrderType, Pair, Side, TimeInForce, Trade,
    TradeId,
};
