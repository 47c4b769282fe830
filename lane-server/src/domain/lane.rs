//! The canonical lane record.

use serde::{Deserialize, Serialize};

use super::city::StateCode;
use super::dates::FlexibleDate;
use super::equipment::EquipmentCode;
use super::reference::ReferenceId;

/// Full or partial truckload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadSize {
    Full,
    Partial,
}

impl LoadSize {
    /// The single-letter flag the board expects in output rows.
    pub fn board_flag(&self) -> &'static str {
        match self {
            LoadSize::Full => "F",
            LoadSize::Partial => "P",
        }
    }
}

/// Posting weight: a fixed value, or a range sampled per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeightSpec {
    Fixed(u32),
    Randomized { min: u32, max: u32 },
}

impl WeightSpec {
    /// The heaviest value this spec can produce.
    ///
    /// Used for equipment-limit validation: a randomized range is
    /// rejected outright if its maximum exceeds the legal limit,
    /// never sampled-then-clamped.
    pub fn max_value(&self) -> u32 {
        match self {
            WeightSpec::Fixed(w) => *w,
            WeightSpec::Randomized { max, .. } => *max,
        }
    }

    /// Whether the spec is internally consistent.
    pub fn is_valid(&self) -> bool {
        match self {
            WeightSpec::Fixed(w) => *w > 0,
            WeightSpec::Randomized { min, max } => *min > 0 && min <= max,
        }
    }
}

/// A lane as supplied by the lane-management collaborator.
///
/// Historical clients spell several fields differently ("destination
/// city" alone has three known aliases); serde normalizes them all
/// into these canonical names at the boundary, and the core never
/// branches on alternate spellings.
///
/// The pairing engine treats this as read-only input, except that it
/// resolves origin/destination against the city catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lane {
    #[serde(alias = "originCity")]
    pub origin_city: String,
    #[serde(alias = "originState")]
    pub origin_state: StateCode,
    #[serde(default, alias = "originZip")]
    pub origin_zip: Option<String>,

    #[serde(alias = "destCity", alias = "destination_city", alias = "destinationCity")]
    pub dest_city: String,
    #[serde(alias = "destState", alias = "destination_state", alias = "destinationState")]
    pub dest_state: StateCode,
    #[serde(default, alias = "destZip", alias = "destination_zip")]
    pub dest_zip: Option<String>,

    #[serde(alias = "equipment_code", alias = "equipmentCode")]
    pub equipment: EquipmentCode,

    /// Trailer length in feet.
    #[serde(alias = "length", alias = "lengthFt")]
    pub length_ft: u32,

    pub weight: WeightSpec,

    #[serde(alias = "pickupEarliest", alias = "pickup_earliest_date")]
    pub pickup_earliest: FlexibleDate,
    #[serde(default, alias = "pickupLatest", alias = "pickup_latest_date")]
    pub pickup_latest: Option<FlexibleDate>,

    pub full_partial: LoadSize,

    #[serde(default)]
    pub commodity: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,

    #[serde(default)]
    pub reference_id: Option<ReferenceId>,
}
