//! `lotkeeper-inventory` — products, lots, and location resolution.
//!
//! The resolver holds the pure visibility/derivation queries; the
//! `ProductStock` aggregate owns the lot state machine; the store gives
//! mutations their atomic read-modify-write boundary.

pub mod lot;
pub mod product;
pub mod resolver;
pub mod stock;
pub mod store;

pub use lot::ProductLot;
pub use product::Product;
pub use stock::{
    AddStock, CreateProduct, ProductStock, RecordSale, RecordTransfer, StockCommand, StockEvent,
};
pub use store::{execute, load_stock, InMemoryStockStore, StockEventStore};
