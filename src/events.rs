//! Typed, synchronous, in-process publish/subscribe for the three domain
//! event kinds the engine emits.
//!
//! The teacher carries two async/channel-based generations of this
//! component (`domain/services/events/event_bus.rs`, a
//! `tokio::sync::broadcast` bus paired with `dispatcher.rs`'s
//! spawned-task-per-handler fan-out; and the older `src/events/bus.rs`,
//! a `crossbeam_channel` + `parking_lot` polling bus). Neither satisfies the
//! requirement that delivery be synchronous and serialized with the emitting
//! engine step — spawning a task, or requiring a subscriber to poll a
//! channel later, both let a handler observe events out of step with the
//! matching loop that produced them. This bus instead calls every registered
//! handler directly, in registration order, on the thread that called
//! `publish`. A handler that panics is caught and logged; it never aborts
//! the matching step that raised the event. The handler trait shape
//! (`event_types` + `handle_event`) is carried over from the teacher's
//! `EventHandler`, made synchronous.

use crate::types::{Order, Trade};
use parking_lot::RwLock;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub enum MatchingEngineEvent {
    Trade(Trade),
    OrderUpdate(Order),
    OrderCancelled(Order),
}

/// The three event kinds `on`/`EventBus::on_kind` can subscribe to.
pub const TRADE: &str = "trade";
pub const ORDER_UPDATE: &str = "order-update";
pub const ORDER_CANCELLED: &str = "order-cancelled";
const ALL_KINDS: &[&str] = &[TRADE, ORDER_UPDATE, ORDER_CANCELLED];

impl MatchingEngineEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            MatchingEngineEvent::Trade(_) => TRADE,
            MatchingEngineEvent::OrderUpdate(_) => ORDER_UPDATE,
            MatchingEngineEvent::OrderCancelled(_) => ORDER_CANCELLED,
        }
    }
}

/// Synchronous event handler. Implementors must not call back into
/// `MatchingEngine::submit`/`cancel` for the same engine from within
/// `handle_event` — doing so while the engine's per-pair lock is held is
/// undefined behavior per the engine's non-reentrancy contract.
pub trait EventHandler: Send + Sync {
    /// Event kinds this handler wants to see. Defaults to all three.
    fn event_types(&self) -> &'static [&'static str] {
        ALL_KINDS
    }

    fn handle_event(&self, event: &MatchingEngineEvent);
}

/// Wraps a plain closure as an `EventHandler` subscribed to every kind.
impl<F> EventHandler for F
where
    F: Fn(&MatchingEngineEvent) + Send + Sync,
{
    fn handle_event(&self, event: &MatchingEngineEvent) {
        self(event)
    }
}

/// Adapts a closure into a handler subscribed to a single named kind, for
/// `EventBus::on_kind`.
struct KindFilteredHandler<F> {
    kind: &'static str,
    f: F,
}

impl<F> EventHandler for KindFilteredHandler<F>
where
    F: Fn(&MatchingEngineEvent) + Send + Sync,
{
    fn event_types(&self) -> &'static [&'static str] {
        std::slice::from_ref(&self.kind)
    }

    fn handle_event(&self, event: &MatchingEngineEvent) {
        (self.f)(event)
    }
}

#[derive(Clone, Default)]
pub struct EventBus {
    handlers: Arc<RwLock<Vec<Arc<dyn EventHandler>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus::default()
    }

    /// Registers a handler. Handlers are invoked in registration order,
    /// filtered to the event kinds they declare via `event_types()`.
    pub fn on(&self, handler: Arc<dyn EventHandler>) {
        self.handlers.write().push(handler);
    }

    /// Registers a closure that only sees events of one named kind (`trade`,
    /// `order-update`, `order-cancelled`) — the engine's external-interface
    /// `on(event_kind, handler)` registration shape.
    pub fn on_kind<F>(&self, kind: &'static str, handler: F)
    where
        F: Fn(&MatchingEngineEvent) + Send + Sync + 'static,
    {
        self.on(Arc::new(KindFilteredHandler { kind, f: handler }));
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Delivers `event` to every registered handler subscribed to its kind,
    /// in registration order, on the calling thread. A handler that panics
    /// is logged and skipped; it does not prevent delivery to the remaining
    /// handlers or propagate to the caller.
    pub fn publish(&self, event: MatchingEngineEvent) {
        let handlers = self.handlers.read().clone();
        let kind = event.kind();
        for handler in handlers.iter() {
            if !handler.event_types().contains(&kind) {
                continue;
            }
            let result = panic::catch_unwind(AssertUnwindSafe(|| handler.handle_event(&event)));
            if result.is_err() {
                tracing::error!(kind, "event handler panicked, continuing");
            }
        }
    }
}
