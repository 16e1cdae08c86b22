//! The core matching engine: per-pair submit/cancel, market and limit
//! execution, event emission, fee attribution, and admission control.
//!
//! Grounded module-for-module in the teacher's
//! `domain/services/matching_engine/matching_engine.rs`: the same
//! "pop best opposing level head, compute `fill = min(remaining,
//! maker.remaining)`, update both sides, loop" shape, generalized from a
//! single per-instrument engine keyed on scaled `i64` to `Decimal` arithmetic
//! over the spec's explicit per-pair `OrderBook`s. Admission control and the
//! synchronous event bus have no teacher counterpart and are called out at
//! their definition sites below.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use chrono::Utc;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::decimal;
use crate::events::{EventBus, MatchingEngineEvent};
use crate::order_book::{BookDepth, OrderBook, OrderBookStats};
use crate::registry::PairRegistry;
use crate::types::{Order, OrderId, OrderStatus, OrderType, Pair, Side, TimeInForce, Trade};

/// Admission-level failures. None of these ever escape `submit` as an
/// `Err` — per spec.md §7 the contract with callers is total: every
/// submission receives a terminal `order-update`. `cancel`'s only failure
/// mode (`UnknownOrder`) is folded into its `bool` return instead, and
/// `DuplicateOrderId` is raised downstream by `OrderBook::add_resting`
/// (`OrderBookError::DuplicateId`) rather than duplicated here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchingError {
    #[error("order amount must be a positive, valid decimal")]
    InvalidAmount,
    #[error("limit order price must be a positive, valid decimal")]
    InvalidLimitPrice,
    #[error("more than {0} orders admitted in the trailing one-second window")]
    RateLimited(usize),
}

/// `{pair, bids[], asks[], last_update_time}` — the engine-level depth
/// snapshot, wrapping `OrderBook::depth`'s book-local rows with the pair and
/// timestamp spec.md's external interface names.
#[derive(Clone, Debug)]
pub struct MarketDepth {
    pub pair: Pair,
    pub bids: Vec<crate::order_book::DepthRow>,
    pub asks: Vec<crate::order_book::DepthRow>,
    pub last_update_time: chrono::DateTime<Utc>,
}

#[derive(Clone, Debug, Default)]
pub struct EngineStats {
    pub orders_admitted: u64,
    pub trades_emitted: u64,
    /// Size of the trailing one-second admission window at the moment of
    /// the call — an indicator of recent submission rate, not a precise
    /// rate (entries outside the window are pruned lazily on next submit).
    pub recent_rate: usize,
    /// Resident set size in bytes, best-effort. `None` where the host
    /// doesn't expose `/proc/self/statm` (i.e. non-Linux).
    pub resident_memory_bytes: Option<u64>,
}

/// Sliding one-second admission window, per spec.md §4.5.1. Bounded by
/// construction: every push prunes entries older than one second first, so
/// the deque never grows past `max_orders_per_second + 1`.
struct AdmissionWindow {
    timestamps: Mutex<VecDeque<Instant>>,
    limit: usize,
}

impl AdmissionWindow {
    fn new(limit: usize) -> Self {
        AdmissionWindow {
            timestamps: Mutex::new(VecDeque::new()),
            limit,
        }
    }

    /// Prunes entries older than one second, then admits iff the remaining
    /// count is still under the limit. Returns the window size observed
    /// (post-prune, including this admission if it succeeded).
    fn try_admit(&self) -> Result<usize, usize> {
        let now = Instant::now();
        let mut window = self.timestamps.lock();
        while let Some(&oldest) = window.front() {
            if now.duration_since(oldest) > Duration::from_secs(1) {
                window.pop_front();
            } else {
                break;
            }
        }
        if window.len() >= self.limit {
            return Err(window.len());
        }
        window.push_back(now);
        Ok(window.len())
    }

    fn len(&self) -> usize {
        self.timestamps.lock().len()
    }
}

/// Per-pair CLOB matching engine. Construction takes the fee schedule and
/// admission limit via `EngineConfig`, plus the event bus every mutation
/// publishes to. Holds a lazily-populated map from pair to order book
/// (`PairRegistry`); a `submit`/`cancel` call locks exactly one pair's
/// `OrderBook` for its whole critical section, so independent pairs run
/// fully in parallel while a single pair never interleaves two operations
/// (spec.md §5).
pub struct MatchingEngine {
    config: EngineConfig,
    registry: PairRegistry,
    event_bus: EventBus,
    admission: AdmissionWindow,
    orders_admitted: AtomicU64,
    trades_emitted: AtomicU64,
}

impl MatchingEngine {
    pub fn new(config: EngineConfig, event_bus: EventBus) -> Self {
        let admission = AdmissionWindow::new(config.max_orders_per_second);
        MatchingEngine {
            config,
            registry: PairRegistry::new(),
            event_bus,
            admission,
            orders_admitted: AtomicU64::new(0),
            trades_emitted: AtomicU64::new(0),
        }
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Admits, routes, and matches `order`. Never fails: rejections are
    /// surfaced by setting `order.status = Cancelled` and publishing a single
    /// `order-update`, exactly as spec.md §4.5.1 describes.
    pub fn submit(&self, mut order: Order) {
        if let Err(reason) = self.admit(&order) {
            tracing::warn!(order_id = %order.id, pair = %order.pair, error = %reason, "order rejected at admission");
            order.status = OrderStatus::Cancelled;
            self.event_bus.publish(MatchingEngineEvent::OrderUpdate(order));
            return;
        }
        self.orders_admitted.fetch_add(1, Ordering::Relaxed);

        match order.order_type {
            OrderType::Market => self.process_market_order(order),
            OrderType::Limit => self.process_limit_order(order),
        }
    }

    fn admit(&self, order: &Order) -> Result<(), MatchingError> {
        self.admission
            .try_admit()
            .map_err(MatchingError::RateLimited)?;
        if order.amount <= Decimal::ZERO {
            return Err(MatchingError::InvalidAmount);
        }
        if order.order_type == OrderType::Limit && order.price <= Decimal::ZERO {
            return Err(MatchingError::InvalidLimitPrice);
        }
        Ok(())
    }

    fn process_market_order(&self, mut order: Order) {
        let book = self.registry.get_or_create(&order.pair);
        let mut book = book.lock();

        let mut remaining = order.amount;
        while remaining > Decimal::ZERO {
            let Some(fill) = self.match_once(&mut book, &mut order, remaining, None) else {
                break;
            };
            remaining -= fill;
        }

        order.status = if order.filled_amount == order.amount {
            OrderStatus::Filled
        } else if order.filled_amount > Decimal::ZERO {
            OrderStatus::Partial
        } else {
            OrderStatus::Cancelled
        };
        // Market orders never rest, regardless of outcome.
        book.assert_not_crossed();
        drop(book);
        self.event_bus
            .publish(MatchingEngineEvent::OrderUpdate(order));
    }

    fn process_limit_order(&self, mut order: Order) {
        let book = self.registry.get_or_create(&order.pair);
        let mut book = book.lock();

        let mut remaining = order.remaining();
        while remaining > Decimal::ZERO {
            let Some(fill) = self.match_once(&mut book, &mut order, remaining, Some(order.price))
            else {
                break;
            };
            remaining -= fill;
        }

        if order.filled_amount == order.amount {
            order.status = OrderStatus::Filled;
        } else {
            if order.filled_amount > Decimal::ZERO {
                order.status = OrderStatus::Partial;
            }
            if order.time_in_force == TimeInForce::Ioc {
                // Thin extension beyond spec.md's GTC-only state machine: an
                // IOC order with a residual is cancelled instead of resting.
                order.status = OrderStatus::Cancelled;
            } else {
                match book.add_resting(order.clone()) {
                    Ok(()) => {}
                    Err(err) => {
                        tracing::error!(order_id = %order.id, %err, "add_resting failed for an admitted order");
                        order.status = OrderStatus::Cancelled;
                    }
                }
            }
        }
        book.assert_not_crossed();
        drop(book);
        self.event_bus
            .publish(MatchingEngineEvent::OrderUpdate(order));
    }

    /// One iteration of the matching loop shared by market and limit orders:
    /// peek the best counter-side level, apply the limit price gate (if
    /// any), execute exactly one maker/taker fill, and emit its events.
    /// Returns the fill amount, or `None` if matching should stop (no
    /// counter liquidity, price gate failed, or a defensive zero-fill).
    fn match_once(
        &self,
        book: &mut OrderBook,
        order: &mut Order,
        remaining: Decimal,
        limit_price: Option<Decimal>,
    ) -> Option<Decimal> {
        let counter_price = book.counter_side(order.side).first()?.price;

        if let Some(price) = limit_price {
            let acceptable = if order.is_buy() {
                counter_price <= price
            } else {
                counter_price >= price
            };
            if !acceptable {
                return None;
            }
        }

        let head_remaining = book
            .counter_side(order.side)
            .first()?
            .head()?
            .remaining();
        let fill = remaining.min(head_remaining);
        if fill <= Decimal::ZERO {
            return None;
        }

        // Compute the trade's economics before mutating the book, so an
        // overflow rejects the fill outright instead of applying it against
        // the maker and then fabricating a zero-volume trade. Per spec.md
        // §4.1, arithmetic that exceeds the supported domain is treated as
        // an invalid order and rejected, not silently zeroed.
        let Some(volume) = decimal::volume(counter_price, fill) else {
            tracing::warn!(
                order_id = %order.id, pair = %order.pair,
                "trade volume overflow at price {counter_price} fill {fill}, stopping match"
            );
            return None;
        };
        let Some(maker_fee) = decimal::fee(volume, self.config.maker_fee_rate) else {
            tracing::warn!(order_id = %order.id, pair = %order.pair, "maker fee overflow, stopping match");
            return None;
        };
        let Some(taker_fee) = decimal::fee(volume, self.config.taker_fee_rate) else {
            tracing::warn!(order_id = %order.id, pair = %order.pair, "taker fee overflow, stopping match");
            return None;
        };

        let maker_side = order.side.opposite();
        let maker = book.apply_fill_to_head(maker_side, fill)?;

        order.filled_amount += fill;
        order.status = if order.filled_amount == order.amount {
            OrderStatus::Filled
        } else {
            OrderStatus::Partial
        };

        let trade = self.build_trade(order, &maker, counter_price, fill, volume, maker_fee, taker_fee);
        self.trades_emitted.fetch_add(1, Ordering::Relaxed);
        self.event_bus.publish(MatchingEngineEvent::Trade(trade));
        self.event_bus
            .publish(MatchingEngineEvent::OrderUpdate(maker));
        self.event_bus
            .publish(MatchingEngineEvent::OrderUpdate(order.clone()));

        Some(fill)
    }

    #[allow(clippy::too_many_arguments)]
    fn build_trade(
        &self,
        taker: &Order,
        maker: &Order,
        price: Decimal,
        fill: Decimal,
        volume: Decimal,
        maker_fee: Decimal,
        taker_fee: Decimal,
    ) -> Trade {
        let (buy_order_id, sell_order_id) = if taker.is_buy() {
            (taker.id, maker.id)
        } else {
            (maker.id, taker.id)
        };
        Trade {
            id: Uuid::new_v4(),
            pair: taker.pair.clone(),
            price,
            amount: fill,
            volume,
            timestamp: Utc::now(),
            taker_side: taker.side,
            buy_order_id,
            sell_order_id,
            maker_fee,
            taker_fee,
        }
    }

    /// Locates `order_id` in `pair`'s book, removes it, marks it cancelled,
    /// and publishes `order-cancelled`. Returns whether an order was found —
    /// a completed or absent order yields `false` and emits nothing.
    pub fn cancel(&self, order_id: OrderId, pair: &Pair) -> bool {
        let Some(book) = self.registry.get(pair) else {
            return false;
        };
        let mut book = book.lock();
        let Some(mut order) = book.remove(order_id) else {
            return false;
        };
        drop(book);
        order.status = OrderStatus::Cancelled;
        self.event_bus
            .publish(MatchingEngineEvent::OrderCancelled(order));
        true
    }

    /// Creates the pair's book on first use (empty sides) if it doesn't
    /// exist yet.
    pub fn market_depth(&self, pair: &Pair, max_levels: usize) -> MarketDepth {
        let book = self.registry.get_or_create(pair);
        let book = book.lock();
        let BookDepth { bids, asks } = book.depth(max_levels);
        MarketDepth {
            pair: pair.clone(),
            bids,
            asks,
            last_update_time: book.last_update_time(),
        }
    }

    pub fn order_book_stats(&self, pair: &Pair) -> OrderBookStats {
        let book = self.registry.get_or_create(pair);
        book.lock().stats()
    }

    pub fn supported_pairs(&self) -> Vec<String> {
        self.registry
            .supported_pairs()
            .into_iter()
            .map(|p| p.as_str().to_string())
            .collect()
    }

    pub fn engine_stats(&self) -> EngineStats {
        EngineStats {
            orders_admitted: self.orders_admitted.load(Ordering::Relaxed),
            trades_emitted: self.trades_emitted.load(Ordering::Relaxed),
            recent_rate: self.admission.len(),
            resident_memory_bytes: resident_memory_bytes(),
        }
    }
}

/// Best-effort resident-set-size probe via `/proc/self/statm`, whose second
/// field is resident pages. `None` on platforms without a `/proc` (anything
/// non-Linux) — spec.md calls this "per-process memory probe if available".
fn resident_memory_bytes() -> Option<u64> {
    let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
    let pages: u64 = statm.split_whitespace().nth(1)?.parse().ok()?;
    let page_size = 4096u64;
    Some(pages * page_size)
}
