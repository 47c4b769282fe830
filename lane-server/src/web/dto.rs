//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{CandidatePair, City, Lane, PairingResult};

/// Request to generate pairs for a lane's endpoints.
///
/// Only geography is needed here; the full lane record matters at
/// export time. Legacy field spellings are accepted as aliases.
#[derive(Debug, Deserialize)]
pub struct PairingRequest {
    /// Origin city name
    #[serde(alias = "originCity")]
    pub origin_city: String,

    /// Origin two-letter state code
    #[serde(alias = "originState")]
    pub origin_state: String,

    /// Origin postal code (optional; resolution is by name and state)
    #[serde(default, alias = "originZip")]
    pub origin_zip: Option<String>,

    /// Destination city name
    #[serde(
        alias = "destCity",
        alias = "destination_city",
        alias = "destinationCity"
    )]
    pub dest_city: String,

    /// Destination two-letter state code
    #[serde(
        alias = "destState",
        alias = "destination_state",
        alias = "destinationState"
    )]
    pub dest_state: String,

    /// Destination postal code (optional)
    #[serde(default, alias = "destZip", alias = "destination_zip")]
    pub dest_zip: Option<String>,

    /// Minimum acceptable pair count (defaults to 5)
    pub min_pairs: Option<usize>,

    /// Keep filling toward ten pairs instead of stopping at the minimum
    pub prefer_fill_to_10: Option<bool>,
}

/// A city in a pairing response.
#[derive(Debug, Serialize)]
pub struct CityView {
    pub name: String,

    pub state: String,

    /// Postal code, when the catalog knows one
    pub zip: Option<String>,

    /// Market area code
    pub market: Option<String>,

    /// Human-readable market name
    pub market_name: Option<String>,
}

impl CityView {
    pub fn from_city(city: &City) -> Self {
        Self {
            name: city.name.clone(),
            state: city.state.to_string(),
            zip: city.zip.clone(),
            market: city.market.as_ref().map(|m| m.to_string()),
            market_name: city.market_name.clone(),
        }
    }
}

/// One pickup/delivery pair in a response.
#[derive(Debug, Serialize)]
pub struct PairView {
    pub pickup: CityView,

    pub delivery: CityView,

    /// Miles from the true origin to the pickup
    pub pickup_distance_miles: f64,

    /// Miles from the true destination to the delivery
    pub delivery_distance_miles: f64,

    /// Combined detour; lower is better
    pub score: f64,
}

impl PairView {
    pub fn from_pair(pair: &CandidatePair) -> Self {
        Self {
            pickup: CityView::from_city(&pair.pickup),
            delivery: CityView::from_city(&pair.delivery),
            pickup_distance_miles: pair.pickup_distance_miles,
            delivery_distance_miles: pair.delivery_distance_miles,
            score: pair.score,
        }
    }
}

/// Response for pair generation.
#[derive(Debug, Serialize)]
pub struct PairingResponse {
    /// Generated pairs, best first
    pub pairs: Vec<PairView>,

    /// Distinct market codes on the pickup side (endpoint included)
    pub unique_origin_markets: usize,

    /// Distinct market codes on the delivery side (endpoint included)
    pub unique_dest_markets: usize,

    /// Whether external discovery had to run
    pub used_fallback: bool,

    /// Set when market uniqueness was relaxed or the minimum was missed
    pub shortfall_reason: Option<String>,
}

impl PairingResponse {
    pub fn from_result(result: &PairingResult) -> Self {
        Self {
            pairs: result.pairs.iter().map(PairView::from_pair).collect(),
            unique_origin_markets: result.unique_origin_markets,
            unique_dest_markets: result.unique_dest_markets,
            used_fallback: result.used_fallback,
            shortfall_reason: result.shortfall_reason.clone(),
        }
    }
}

/// Request to export a lane's postings as CSV.
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    /// The lane record itself, fields at the top level
    #[serde(flatten)]
    pub lane: Lane,

    /// Minimum acceptable pair count (defaults to 5)
    pub min_pairs: Option<usize>,

    /// Keep filling toward ten pairs instead of stopping at the minimum
    pub prefer_fill_to_10: Option<bool>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
