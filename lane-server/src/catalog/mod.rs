//! City catalog: the store of known cities with coordinates and
//! market-area codes.
//!
//! The catalog is owned externally; this service consumes it through
//! the `CityCatalog` trait and only ever writes via idempotent upsert
//! (the discovery write-back). Ships with an in-memory implementation
//! seeded from JSON.

mod error;
mod memory;
mod store;

pub use error::CatalogError;
pub use memory::InMemoryCatalog;
pub use store::CityCatalog;
