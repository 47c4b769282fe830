//! Discovery fallback with catalog write-through.
//!
//! Wraps the places client behind the `CityDiscovery` seam. Results
//! are memoized briefly (coordinate-bucket keys bound the cache
//! cardinality), and every usable city that the catalog has never
//! seen is upserted so future lookups in the same metro skip the
//! external call entirely. That upsert is the system's only durable
//! caching behavior.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use tracing::{debug, warn};

use crate::catalog::CityCatalog;
use crate::domain::{City, CityKey, MarketCode, StateCode};
use crate::geo::distance_miles;

use super::client::{PlaceItem, PlacesClient};

/// Cache key: (lat bucket, lon bucket, radius band in miles).
/// Buckets are 0.05 degrees, roughly 3.5 miles of latitude.
type DiscoverKey = (i32, i32, u16);

/// Bucket scale: degrees are multiplied by this and rounded.
const BUCKET_SCALE: f64 = 20.0;

/// Configuration for the discovery fallback.
#[derive(Debug, Clone)]
pub struct FallbackConfig {
    /// TTL for memoized discovery responses.
    pub ttl: Duration,

    /// Maximum number of memoized responses.
    pub max_capacity: u64,

    /// How far to look for a catalog neighbor when inferring a market
    /// code for a newly discovered city (miles).
    pub market_inference_radius: f64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            max_capacity: 500,
            market_inference_radius: 40.0,
        }
    }
}

/// Trait for discovering cities near a point.
///
/// This abstraction allows the pairing engine to be tested with mock
/// data. Implementations must degrade to an empty list on upstream
/// failure; a missing fallback is a shortfall, never a request abort.
#[async_trait]
pub trait CityDiscovery: Send + Sync {
    /// Find cities near a point that may not be in the catalog.
    ///
    /// `query` is free-text seed material (typically the center city
    /// and state); it is sanitized before use.
    async fn discover_near(
        &self,
        query: &str,
        lat: f64,
        lon: f64,
        radius_miles: f64,
        limit: usize,
    ) -> Vec<City>;
}

/// Places client with catalog write-through.
pub struct DiscoveryFallback {
    client: PlacesClient,
    catalog: Arc<dyn CityCatalog>,
    cache: MokaCache<DiscoverKey, Arc<Vec<City>>>,
    config: FallbackConfig,
}

impl DiscoveryFallback {
    /// Create a new fallback around a places client and the catalog.
    pub fn new(client: PlacesClient, catalog: Arc<dyn CityCatalog>, config: FallbackConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            client,
            catalog,
            cache,
            config,
        }
    }

    fn cache_key(lat: f64, lon: f64, radius_miles: f64) -> DiscoverKey {
        (
            (lat * BUCKET_SCALE).round() as i32,
            (lon * BUCKET_SCALE).round() as i32,
            radius_miles.round() as u16,
        )
    }

    /// Convert raw place items into city records, dropping anything
    /// missing a city name, state, or coordinates, and deduplicating
    /// by `(name, state)`.
    fn usable_cities(items: Vec<PlaceItem>) -> Vec<City> {
        let mut seen: Vec<CityKey> = Vec::new();
        let mut cities = Vec::new();

        for item in items {
            let Some(name) = item.address.city.filter(|n| !n.trim().is_empty()) else {
                continue;
            };
            let Some(state) = item
                .address
                .state_code
                .as_deref()
                .and_then(|s| StateCode::parse_normalized(s).ok())
            else {
                continue;
            };
            let Some(position) = item.position else {
                continue;
            };
            if !position.lat.is_finite() || !position.lng.is_finite() {
                continue;
            }

            let city = City {
                name: name.trim().to_string(),
                state,
                latitude: position.lat,
                longitude: position.lng,
                zip: item.address.postal_code,
                market: None,
                market_name: None,
            };

            let key = city.key();
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            cities.push(city);
        }

        cities
    }

    /// Assign a market code to a discovered city from its nearest
    /// postable catalog neighbor.
    ///
    /// KMA codes partition geography, so a city inherits the market of
    /// whatever known city sits closest to it. Cities with no neighbor
    /// in range stay market-less and the selector skips them.
    async fn infer_market(&self, city: &City) -> Option<MarketCode> {
        let neighbors = self
            .catalog
            .find_within_radius(
                city.latitude,
                city.longitude,
                self.config.market_inference_radius,
            )
            .await
            .ok()?;

        neighbors
            .into_iter()
            .filter(|n| n.is_postable())
            .min_by(|a, b| {
                let da = distance_miles(city.point(), a.point());
                let db = distance_miles(city.point(), b.point());
                da.total_cmp(&db)
            })
            .and_then(|n| n.market)
    }

    /// Write newly discovered cities back into the catalog.
    ///
    /// Cities already present are left alone (the catalog record may
    /// carry richer data than the API result). Upsert is keyed by
    /// `(name, state)`, so re-discovering a city never duplicates it.
    async fn write_back(&self, cities: &[City]) {
        for city in cities {
            let existing = self.catalog.find_exact(&city.name, city.state).await;
            match existing {
                Ok(Some(_)) => continue,
                Ok(None) => {
                    if let Err(e) = self.catalog.upsert(city.clone()).await {
                        warn!("catalog write-back failed for {}, {}: {e}", city.name, city.state);
                    }
                }
                Err(e) => {
                    warn!("catalog lookup failed for {}, {}: {e}", city.name, city.state);
                }
            }
        }
    }
}

#[async_trait]
impl CityDiscovery for DiscoveryFallback {
    async fn discover_near(
        &self,
        query: &str,
        lat: f64,
        lon: f64,
        radius_miles: f64,
        limit: usize,
    ) -> Vec<City> {
        let key = Self::cache_key(lat, lon, radius_miles);

        if let Some(cached) = self.cache.get(&key).await {
            return cached.as_ref().clone();
        }

        let items = match self.client.search(query, lat, lon, radius_miles, limit).await {
            Ok(items) => items,
            Err(e) => {
                // Upstream failure is a shortfall, not an abort
                warn!("discovery unavailable near ({lat:.3}, {lon:.3}): {e}");
                return Vec::new();
            }
        };

        let mut cities = Self::usable_cities(items);

        for city in &mut cities {
            if city.market.is_none() {
                city.market = self.infer_market(city).await;
            }
        }

        debug!(
            "discovered {} usable cities near ({lat:.3}, {lon:.3}) within {radius_miles} mi",
            cities.len()
        );

        self.write_back(&cities).await;

        self.cache.insert(key, Arc::new(cities.clone())).await;

        cities
    }
}
