//! The catalog trait seam.

use async_trait::async_trait;

use crate::domain::{City, StateCode};

use super::error::CatalogError;

/// Read-and-upsert interface over the city store.
///
/// This abstraction allows the pairing engine to be tested with mock
/// data, and keeps the write-through cache an explicit operation
/// instead of hidden global state.
#[async_trait]
pub trait CityCatalog: Send + Sync {
    /// Look up a city by name and state, case-insensitively.
    async fn find_exact(&self, name: &str, state: StateCode)
    -> Result<Option<City>, CatalogError>;

    /// All cities within `radius_miles` of the given point.
    ///
    /// Includes any city at the center point itself; callers exclude
    /// the center by identity, not by distance.
    async fn find_within_radius(
        &self,
        lat: f64,
        lon: f64,
        radius_miles: f64,
    ) -> Result<Vec<City>, CatalogError>;

    /// Insert or replace a city, keyed by `(name, state)`.
    ///
    /// Idempotent; last write wins. City records are facts, not
    /// counters, so concurrent upserts of the same city are safe.
    async fn upsert(&self, city: City) -> Result<(), CatalogError>;
}
