//! In-memory city catalog.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{City, CityKey, StateCode};
use crate::geo::{Point, distance_miles};

use super::error::CatalogError;
use super::store::CityCatalog;

/// Thread-safe in-memory catalog keyed by `(name, state)`.
///
/// Radius queries are a linear scan over all records; city catalogs
/// are tens of thousands of rows at most, which scans in well under a
/// millisecond and keeps this implementation index-free.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    inner: Arc<RwLock<HashMap<CityKey, City>>>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog from a list of cities.
    pub fn from_cities(cities: Vec<City>) -> Self {
        let map = cities.into_iter().map(|c| (c.key(), c)).collect();
        Self {
            inner: Arc::new(RwLock::new(map)),
        }
    }

    /// Load a catalog from a JSON seed file (an array of city records).
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let body = std::fs::read_to_string(path)?;
        let cities: Vec<City> = serde_json::from_str(&body)?;
        Ok(Self::from_cities(cities))
    }

    /// Number of cities in the catalog.
    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.len()
    }

    /// Check whether the catalog is empty.
    pub async fn is_empty(&self) -> bool {
        let guard = self.inner.read().await;
        guard.is_empty()
    }
}

#[async_trait]
impl CityCatalog for InMemoryCatalog {
    async fn find_exact(
        &self,
        name: &str,
        state: StateCode,
    ) -> Result<Option<City>, CatalogError> {
        let key = CityKey::new(name, state);
        let guard = self.inner.read().await;
        Ok(guard.get(&key).cloned())
    }

    async fn find_within_radius(
        &self,
        lat: f64,
        lon: f64,
        radius_miles: f64,
    ) -> Result<Vec<City>, CatalogError> {
        let center = Point::new(lat, lon);
        let guard = self.inner.read().await;

        let hits = guard
            .values()
            .filter(|c| c.has_coordinates())
            .filter(|c| distance_miles(center, c.point()) <= radius_miles)
            .cloned()
            .collect();

        Ok(hits)
    }

    async fn upsert(&self, city: City) -> Result<(), CatalogError> {
        let mut guard = self.inner.write().await;
        guard.insert(city.key(), city);
        Ok(())
    }
}
