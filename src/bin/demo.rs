//! Walks the matching engine through a handful of orders on one pair and
//! logs every event it emits, to show the engine running end to end without
//! any transport layer around it.
//!
//! Grounded in the teacher's `src/bin/main.rs` `OrderConsoleHandler`
//! (`event_types()` + a `match` over event variants, logged via `tracing`),
//! simplified down to the synchronous `EventHandler` this crate's event bus
//! uses and with the RabbitMQ/API wiring removed — this binary has nothing
//! to publish to but its own log.

use chrono::Utc;
use rust_decimal_macros::dec;
use tracing::info;
use uuid::Uuid;

use ultimate_matching::{
    EngineConfig, EventBus, EventHandler, MatchingEngine, MatchingEngineEvent, Order, OrderType,
    Pair, Side, TimeInForce,
};

struct ConsoleHandler;

impl EventHandler for ConsoleHandler {
    fn handle_event(&self, event: &MatchingEngineEvent) {
        match event {
            MatchingEngineEvent::Trade(trade) => info!(
                pair = %trade.pair,
                price = %trade.price,
                amount = %trade.amount,
                taker_side = ?trade.taker_side,
                "trade"
            ),
            MatchingEngineEvent::OrderUpdate(order) => info!(
                order_id = %order.id,
                status = ?order.status,
                filled = %order.filled_amount,
                "order-update"
            ),
            MatchingEngineEvent::OrderCancelled(order) => {
                info!(order_id = %order.id, "order-cancelled")
            }
        }
    }
}

fn limit_order(pair: &Pair, side: Side, price: rust_decimal::Decimal, amount: rust_decimal::Decimal) -> Order {
    Order {
        id: Uuid::new_v4(),
        pair: pair.clone(),
        side,
        order_type: OrderType::Limit,
        time_in_force: TimeInForce::default(),
        price,
        amount,
        filled_amount: rust_decimal::Decimal::ZERO,
        status: ultimate_matching::OrderStatus::Pending,
        timestamp: Utc::now(),
        user_id: "demo-user".to_string(),
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let event_bus = EventBus::new();
    event_bus.on(std::sync::Arc::new(ConsoleHandler));

    let engine = MatchingEngine::new(EngineConfig::new(dec!(0.001), dec!(0.002)), event_bus);
    let pair = Pair::new("BTC-USDT");

    info!("submitting resting sell liquidity");
    engine.submit(limit_order(&pair, Side::Sell, dec!(50100), dec!(0.5)));
    engine.submit(limit_order(&pair, Side::Sell, dec!(50200), dec!(1.0)));

    info!("submitting a crossing buy");
    engine.submit(limit_order(&pair, Side::Buy, dec!(50200), dec!(1.2)));

    let stats = engine.order_book_stats(&pair);
    info!(
        best_bid = ?stats.best_bid,
        best_ask = ?stats.best_ask,
        spread = ?stats.spread,
        order_count = stats.order_count,
        "final book state"
    );
}
