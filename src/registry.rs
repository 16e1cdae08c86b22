//! Lazy per-pair order book registry.
//!
//! Grounded in the teacher's `orderbook_manager` trait shape and
//! `domain/services/matching_engine/service.rs`'s
//! `HashMap<Uuid, Arc<RwLock<MatchingEngine>>>` field — but made
//! functionally complete, since the teacher's `MatchingEngineServiceImpl` is
//! a stub whose methods return a placeholder "use the async API instead"
//! error. The creation path here is atomic relative to `submit`/`cancel` on
//! that pair: `get_or_create` takes the registry write lock only long enough
//! to insert a fresh `Mutex<OrderBook>`, then every subsequent access goes
//! through that per-pair mutex, matching the concurrency model's "one
//! submit/cancel in flight per pair, independent pairs run in parallel"
//! contract.

use crate::order_book::OrderBook;
use crate::types::Pair;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
pub struct PairRegistry {
    books: RwLock<HashMap<Pair, Arc<Mutex<OrderBook>>>>,
}

impl PairRegistry {
    pub fn new() -> Self {
        PairRegistry::default()
    }

    /// Returns the pair's order book, creating it on first use.
    pub fn get_or_create(&self, pair: &Pair) -> Arc<Mutex<OrderBook>> {
        if let Some(book) = self.books.read().get(pair) {
            return book.clone();
        }
        let mut books = self.books.write();
        books
            .entry(pair.clone())
            .or_insert_with(|| Arc::new(Mutex::new(OrderBook::new(pair.clone()))))
            .clone()
    }

    /// Returns the pair's order book if it has ever been created, without
    /// creating it.
    pub fn get(&self, pair: &Pair) -> Option<Arc<Mutex<OrderBook>>> {
        self.books.read().get(pair).cloned()
    }

    pub fn supported_pairs(&self) -> Vec<Pair> {
        self.books.read().keys().cloned().collect()
    }

    pub fn pair_count(&self) -> usize {
        self.books.read().len()
    }
}
