//! Append-only storage for stock events.
//!
//! The store is where the atomicity the mutations need actually lives: an
//! append checks the expected stream version and inserts in one unit, so two
//! concurrent commands built from the same loaded state cannot both commit.
//! One loses with a `Conflict` — never with an overdrawn lot or a duplicated
//! lot number. There are no retries here; whether to re-load and re-submit is
//! the caller's call.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::warn;
use uuid::Uuid;

use lotkeeper_core::{
    Aggregate, AggregateRoot, DomainError, DomainResult, ExpectedVersion, ProductId,
};
use lotkeeper_events::EventEnvelope;

use crate::stock::{ProductStock, StockCommand, StockEvent};

/// Append-only, per-product stock event streams.
pub trait StockEventStore: Send + Sync {
    /// Append events to a product's stream.
    ///
    /// Implementations must check `expected` against the current stream
    /// version and assign monotonically increasing sequence numbers, all
    /// atomically with the insert. Returns the new stream version.
    fn append(
        &self,
        product_id: ProductId,
        events: Vec<StockEvent>,
        expected: ExpectedVersion,
    ) -> DomainResult<u64>;

    /// Load the full stream for a product, oldest first.
    ///
    /// A product with no stream yet yields an empty vector.
    fn load(&self, product_id: ProductId) -> DomainResult<Vec<EventEnvelope<StockEvent>>>;
}

impl<S> StockEventStore for Arc<S>
where
    S: StockEventStore + ?Sized,
{
    fn append(
        &self,
        product_id: ProductId,
        events: Vec<StockEvent>,
        expected: ExpectedVersion,
    ) -> DomainResult<u64> {
        (**self).append(product_id, events, expected)
    }

    fn load(&self, product_id: ProductId) -> DomainResult<Vec<EventEnvelope<StockEvent>>> {
        (**self).load(product_id)
    }
}

/// In-memory store for tests and the offline/dev build.
///
/// A single mutex over the stream map serializes appends, which is exactly
/// the row-level atomicity the production data-access collaborator is
/// assumed to provide.
#[derive(Debug, Default)]
pub struct InMemoryStockStore {
    streams: Mutex<HashMap<ProductId, Vec<EventEnvelope<StockEvent>>>>,
}

impl InMemoryStockStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StockEventStore for InMemoryStockStore {
    fn append(
        &self,
        product_id: ProductId,
        events: Vec<StockEvent>,
        expected: ExpectedVersion,
    ) -> DomainResult<u64> {
        if events.is_empty() {
            return Err(DomainError::validation("nothing to append"));
        }

        let mut streams = self
            .streams
            .lock()
            .map_err(|_| DomainError::conflict("stock store poisoned"))?;
        let stream = streams.entry(product_id).or_default();

        let current = stream.len() as u64;
        if let Err(err) = expected.check(current) {
            warn!(product = %product_id, %current, "stale append rejected");
            return Err(err);
        }

        for (offset, event) in events.into_iter().enumerate() {
            let sequence_number = current + offset as u64 + 1;
            stream.push(EventEnvelope::new(Uuid::now_v7(), sequence_number, event));
        }

        Ok(stream.len() as u64)
    }

    fn load(&self, product_id: ProductId) -> DomainResult<Vec<EventEnvelope<StockEvent>>> {
        let streams = self
            .streams
            .lock()
            .map_err(|_| DomainError::conflict("stock store poisoned"))?;
        Ok(streams.get(&product_id).cloned().unwrap_or_default())
    }
}

/// Rehydrate a product's stock position from its stream.
pub fn load_stock(store: &dyn StockEventStore, product_id: ProductId) -> DomainResult<ProductStock> {
    let mut stock = ProductStock::empty(product_id);
    for envelope in store.load(product_id)? {
        stock.apply(envelope.payload());
    }
    Ok(stock)
}

/// Load, decide, and commit one command at the loaded version.
///
/// A concurrent writer that committed in between surfaces as `Conflict`.
pub fn execute(store: &dyn StockEventStore, command: &StockCommand) -> DomainResult<ProductStock> {
    let product_id = command.product_id();
    let mut stock = load_stock(store, product_id)?;
    let events = stock.handle(command)?;
    store.append(
        product_id,
        events.clone(),
        ExpectedVersion::Exact(stock.version()),
    )?;
    for event in &events {
        stock.apply(event);
    }
    Ok(stock)
}
