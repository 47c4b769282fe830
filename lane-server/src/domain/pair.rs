//! Pairing results.

use serde::Serialize;

use super::city::City;

/// One alternative pickup/delivery city combination.
///
/// Transient: produced per pairing request, never persisted here.
#[derive(Debug, Clone, Serialize)]
pub struct CandidatePair {
    pub pickup: City,
    pub delivery: City,
    pub pickup_distance_miles: f64,
    pub delivery_distance_miles: f64,

    /// Lower is better: the combined detour both endpoints add.
    pub score: f64,
}

impl CandidatePair {
    pub fn new(
        pickup: City,
        delivery: City,
        pickup_distance_miles: f64,
        delivery_distance_miles: f64,
    ) -> Self {
        let score = pickup_distance_miles + delivery_distance_miles;
        Self {
            pickup,
            delivery,
            pickup_distance_miles,
            delivery_distance_miles,
            score,
        }
    }
}

/// The outcome of one lane-pairing call.
#[derive(Debug, Clone, Serialize)]
pub struct PairingResult {
    pub pairs: Vec<CandidatePair>,

    /// Distinct market codes across accepted pickups plus the true
    /// origin's own market. Callers commonly gate postings on this
    /// being at least 5.
    pub unique_origin_markets: usize,

    /// Distinct market codes across accepted deliveries plus the true
    /// destination's own market.
    pub unique_dest_markets: usize,

    /// Whether the discovery fallback phase had to run.
    pub used_fallback: bool,

    /// Set when fewer diverse candidates existed than requested, or
    /// when relaxed fill was needed to reach the minimum.
    pub shortfall_reason: Option<String>,
}
