//! Engine configuration.
//!
//! The teacher's `Config` (this file, pre-transformation) loads everything
//! from the process environment (`dotenv` + `std::env::var`) because it
//! belongs to the binary that owns a RabbitMQ connection and an instrument
//! list at startup. This crate has no process boundary of its own — the
//! engine is embedded by a transport layer that already knows its own fee
//! schedule and limits — so `EngineConfig` is built from explicit values
//! instead, with `Default` giving the same constants spec.md names (rate
//! limit default, zero fees).

use rust_decimal::Decimal;

/// Default admission rate limit: orders admitted per trailing one-second
/// window, per spec.md §4.5.1.
pub const DEFAULT_MAX_ORDERS_PER_SECOND: usize = 50_000;

/// Default number of levels a depth snapshot returns per side when the
/// caller doesn't specify one.
pub const DEFAULT_DEPTH_LEVELS: usize = 50;

/// Default capacity of the optional order recycler's free list.
pub const DEFAULT_RECYCLER_CAPACITY: usize = 4096;

#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Fee rate charged to the maker side of a trade, as a fraction of
    /// volume (e.g. `0.001` for 10 bps). Must be `>= 0` and `<= 1`.
    pub maker_fee_rate: Decimal,
    /// Fee rate charged to the taker side of a trade.
    pub taker_fee_rate: Decimal,
    /// Admission cap: orders admitted per trailing one-second window.
    pub max_orders_per_second: usize,
    /// Levels returned by `market_depth` when the caller passes no limit.
    pub default_depth_levels: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            maker_fee_rate: Decimal::ZERO,
            taker_fee_rate: Decimal::ZERO,
            max_orders_per_second: DEFAULT_MAX_ORDERS_PER_SECOND,
            default_depth_levels: DEFAULT_DEPTH_LEVELS,
        }
    }
}

impl EngineConfig {
    pub fn new(maker_fee_rate: Decimal, taker_fee_rate: Decimal) -> Self {
        EngineConfig {
            maker_fee_rate,
            taker_fee_rate,
            ..EngineConfig::default()
        }
    }

    pub fn with_max_orders_per_second(mut self, limit: usize) -> Self {
        self.max_orders_per_second = limit;
        self
    }

    pub fn with_default_depth_levels(mut self, levels: usize) -> Self {
        self.default_depth_levels = levels;
        self
    }
}
