//! Pair generation orchestration.
//!
//! Resolves the lane endpoints, searches each side for diverse
//! candidates, and walks an explicit shortfall state machine:
//! strict catalog search, then discovery fallback over widening
//! radius bands, then (only when fill-to-10 is requested) relaxed
//! fill that permits duplicate market codes for the remaining slots.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::catalog::{CatalogError, CityCatalog};
use crate::discovery::CityDiscovery;
use crate::domain::{CandidatePair, City, Lane, PairingResult, StateCode};

use super::config::{PairingConfig, PairingOptions};
use super::select::{RankedCity, fill_closest, select_diverse};

/// Shortfall reason reported when market uniqueness had to be relaxed
/// or the minimum could not be reached at all.
const REASON_SPARSE_MARKET: &str = "sparse_market_low_city_density";

/// Error from pair generation.
///
/// Insufficient diversity is deliberately not here: a shortfall is a
/// soft outcome carried in `PairingResult::shortfall_reason`.
#[derive(Debug, thiserror::Error)]
pub enum PairingError {
    /// Origin or destination not found in the catalog with usable
    /// coordinates. Fatal for the lane, never retried.
    #[error("unresolvable location: {city}, {state}")]
    UnresolvableLocation { city: String, state: StateCode },

    /// Catalog lookup failed
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Phases of the shortfall state machine.
///
/// Transitions always move forward: `Strict` to `Fallback` when the
/// strict pass is short of the minimum, `Fallback` to `RelaxedFill`
/// when the bands are exhausted and the request asked to fill toward
/// ten, anything to `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Strict,
    Fallback,
    RelaxedFill,
    Done,
}

/// One side (pickup or delivery) of an in-progress search.
struct SideSearch {
    center: City,
    selected: Vec<RankedCity>,
    /// Candidate pool from the widest radius queried so far.
    pool: Vec<City>,
    /// The radius band actually used; relaxed fill never exceeds it.
    radius_used: f64,
}

/// The pairing engine.
pub struct PairingEngine {
    catalog: Arc<dyn CityCatalog>,
    discovery: Arc<dyn CityDiscovery>,
    config: PairingConfig,
}

impl PairingEngine {
    /// Create a new engine over the given collaborators.
    pub fn new(
        catalog: Arc<dyn CityCatalog>,
        discovery: Arc<dyn CityDiscovery>,
        config: PairingConfig,
    ) -> Self {
        Self {
            catalog,
            discovery,
            config,
        }
    }

    /// Generate alternative pickup/delivery pairs for a lane.
    ///
    /// Returns a result even when fewer than `min_pairs` pairs could
    /// be produced; callers treat a sub-minimum result with
    /// `shortfall_reason` set as a soft warning, not a failure.
    pub async fn generate_pairs(
        &self,
        lane: &Lane,
        options: &PairingOptions,
    ) -> Result<PairingResult, PairingError> {
        self.generate_between(
            &lane.origin_city,
            lane.origin_state,
            &lane.dest_city,
            lane.dest_state,
            options,
        )
        .await
    }

    /// Generate pairs between two named endpoints.
    ///
    /// The pairing boundary only needs geography; the rest of the
    /// lane matters at export time.
    pub async fn generate_between(
        &self,
        origin_city: &str,
        origin_state: StateCode,
        dest_city: &str,
        dest_state: StateCode,
        options: &PairingOptions,
    ) -> Result<PairingResult, PairingError> {
        let mut phase = SearchPhase::Strict;
        let target = if options.prefer_fill_to_10 {
            self.config.fill_target
        } else {
            options.min_pairs
        };

        // Resolve both endpoints; either side missing is fatal
        let (origin, dest) = tokio::join!(
            self.resolve(origin_city, origin_state),
            self.resolve(dest_city, dest_state),
        );
        let (origin, dest) = (origin?, dest?);

        // Strict phase: catalog only, first radius band. The two
        // sides are independent and run concurrently.
        debug!(
            "phase {:?}: catalog search at {} mi around {origin_city}, {origin_state} and {dest_city}, {dest_state}",
            phase,
            self.config.base_radius()
        );
        let (pickup_side, delivery_side) = tokio::join!(
            self.strict_side(&origin, target),
            self.strict_side(&dest, target),
        );
        let mut pickup_side = pickup_side?;
        let mut delivery_side = delivery_side?;
        let mut used_fallback = false;

        if pair_count(&pickup_side, &delivery_side) < options.min_pairs {
            phase = SearchPhase::Fallback;
            info!(
                "phase {:?}: strict pass produced {} pairs, need {}",
                phase,
                pair_count(&pickup_side, &delivery_side),
                options.min_pairs
            );

            for side in [&mut pickup_side, &mut delivery_side] {
                if side.selected.len() < options.min_pairs {
                    self.fallback_side(side, target).await?;
                    used_fallback = true;
                }
            }
        }

        // Relaxed fill is opt-in per request: without fill-to-10 a
        // market-sparse side stays short and reports the shortfall.
        let mut relaxed = false;
        if self.config.allow_relaxed_fill
            && options.prefer_fill_to_10
            && pair_count(&pickup_side, &delivery_side) < target
        {
            phase = SearchPhase::RelaxedFill;
            info!(
                "phase {:?}: {} pairs, relaxing market uniqueness toward {target}",
                phase,
                pair_count(&pickup_side, &delivery_side)
            );

            for side in [&mut pickup_side, &mut delivery_side] {
                if side.selected.len() < target {
                    let extra = fill_closest(
                        &side.center,
                        &side.pool,
                        side.radius_used,
                        target - side.selected.len(),
                        &side.selected,
                    );
                    if !extra.is_empty() {
                        relaxed = true;
                        side.selected.extend(extra);
                    }
                }
            }
        }

        let pairs = build_pairs(&pickup_side, &delivery_side);
        let shortfall_reason = if relaxed || pairs.len() < options.min_pairs {
            Some(REASON_SPARSE_MARKET.to_string())
        } else {
            None
        };

        let unique_origin_markets = unique_markets(&origin, &pickup_side.selected);
        let unique_dest_markets = unique_markets(&dest, &delivery_side.selected);

        phase = SearchPhase::Done;
        debug!(
            "phase {:?}: {} pairs, {} origin markets, {} dest markets, fallback={}, shortfall={:?}",
            phase,
            pairs.len(),
            unique_origin_markets,
            unique_dest_markets,
            used_fallback,
            shortfall_reason
        );

        Ok(PairingResult {
            pairs,
            unique_origin_markets,
            unique_dest_markets,
            used_fallback,
            shortfall_reason,
        })
    }

    /// Resolve a city name/state against the catalog.
    async fn resolve(&self, name: &str, state: StateCode) -> Result<City, PairingError> {
        let found = self.catalog.find_exact(name, state).await?;

        found
            .filter(|c| c.has_coordinates())
            .ok_or_else(|| PairingError::UnresolvableLocation {
                city: name.to_string(),
                state,
            })
    }

    /// Strict-phase search of one side: catalog pool at the base band.
    async fn strict_side(&self, center: &City, target: usize) -> Result<SideSearch, PairingError> {
        let radius = self.config.base_radius();
        let pool = self
            .catalog
            .find_within_radius(center.latitude, center.longitude, radius)
            .await?;

        let selected = select_diverse(center, &pool, radius, target, &HashSet::new());

        Ok(SideSearch {
            center: center.clone(),
            selected,
            pool,
            radius_used: radius,
        })
    }

    /// Fallback-phase search: widen through the radius bands, merging
    /// discovered cities into the catalog pool and re-selecting.
    async fn fallback_side(
        &self,
        side: &mut SideSearch,
        target: usize,
    ) -> Result<(), PairingError> {
        let center = side.center.clone();
        let query = format!("{} {}", center.name, center.state);

        for &band in &self.config.radius_bands_miles {
            let discovered = self
                .discovery
                .discover_near(
                    &query,
                    center.latitude,
                    center.longitude,
                    band,
                    self.config.discovery_limit,
                )
                .await;

            // Discovery writes new cities through to the catalog, so
            // the fresh radius query sees them; merge anyway in case
            // the write-back was lossy.
            let mut pool = self
                .catalog
                .find_within_radius(center.latitude, center.longitude, band)
                .await?;
            let known: HashSet<_> = pool.iter().map(|c| c.key()).collect();
            pool.extend(
                discovered
                    .into_iter()
                    .filter(|c| !known.contains(&c.key())),
            );

            side.selected = select_diverse(&center, &pool, band, target, &HashSet::new());
            side.pool = pool;
            side.radius_used = band;

            debug!(
                "fallback band {band} mi near {}, {}: {} diverse candidates",
                center.name,
                center.state,
                side.selected.len()
            );

            if side.selected.len() >= target {
                break;
            }
        }

        Ok(())
    }
}

/// How many pairs positional pairing would produce.
fn pair_count(pickup: &SideSearch, delivery: &SideSearch) -> usize {
    pickup.selected.len().min(delivery.selected.len())
}

/// Pair candidates positionally: pickup[i] with delivery[i].
fn build_pairs(pickup: &SideSearch, delivery: &SideSearch) -> Vec<CandidatePair> {
    pickup
        .selected
        .iter()
        .zip(delivery.selected.iter())
        .map(|(p, d)| {
            CandidatePair::new(
                p.city.clone(),
                d.city.clone(),
                p.distance_miles,
                d.distance_miles,
            )
        })
        .collect()
}

/// Distinct market codes across a side's selections plus the true
/// endpoint's own market.
fn unique_markets(center: &City, selected: &[RankedCity]) -> usize {
    let mut markets: HashSet<_> = selected
        .iter()
        .filter_map(|r| r.city.market.clone())
        .collect();

    if let Some(m) = center.market.clone() {
        markets.insert(m);
    }

    markets.len()
}
