//! Expansion of a pairing result into board-ready posting rows.
//!
//! One posting per origin/destination combination (the base lane plus
//! each generated pair), one row per posting per contact method.
//! Validation is strict: an overweight load is rejected outright,
//! never clamped to the equipment limit.

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};

use rand::Rng;
use serde::Serialize;

use crate::domain::{
    City, EquipmentCode, Lane, PairingResult, ReferenceId, WeightSpec, format_board_date,
};

/// Errors from row building. All are fatal for the lane's export;
/// other lanes in a batch continue unaffected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Trailer length missing or zero
    #[error("lane has no usable trailer length")]
    InvalidLength,

    /// Randomized weight range empty or zero
    #[error("invalid weight specification (min {min}, max {max})")]
    InvalidWeightRange { min: u32, max: u32 },

    /// Weight exceeds the equipment's legal maximum
    #[error("weight {weight} lbs exceeds the {equipment} limit of {limit} lbs")]
    WeightExceedsLimit {
        equipment: String,
        weight: u32,
        limit: u32,
    },

    /// No contact methods configured; rows would be empty
    #[error("no contact methods configured")]
    NoContactMethods,
}

/// Options for row building.
#[derive(Debug, Clone)]
pub struct RowOptions {
    /// Contact methods; each posting expands into one row per entry.
    pub contact_methods: Vec<String>,

    /// Maximum legal weight per equipment code. External posting-rule
    /// configuration; codes absent from the table are not limited
    /// here.
    pub weight_limits: HashMap<String, u32>,

    /// Two-letter reference-ID prefix.
    pub reference_prefix: [u8; 2],
}

impl Default for RowOptions {
    fn default() -> Self {
        let mut weight_limits = HashMap::new();
        weight_limits.insert("V".to_string(), 46_000); // dry van
        weight_limits.insert("R".to_string(), 42_000); // reefer
        weight_limits.insert("F".to_string(), 48_000); // flatbed

        Self {
            contact_methods: vec!["Email".to_string(), "Primary Phone".to_string()],
            weight_limits,
            reference_prefix: *b"RR",
        }
    }
}

impl RowOptions {
    fn weight_limit(&self, equipment: &EquipmentCode) -> Option<u32> {
        self.weight_limits.get(equipment.as_str()).copied()
    }
}

/// One flat output row in the board's fixed column schema.
///
/// Field order here is the CSV column order; serde renames carry the
/// board's header names. Never mutated after creation.
#[derive(Debug, Clone, Serialize)]
pub struct OutputRow {
    #[serde(rename = "Pickup Earliest*")]
    pub pickup_earliest: String,
    #[serde(rename = "Pickup Latest")]
    pub pickup_latest: String,
    #[serde(rename = "Length (ft)*")]
    pub length_ft: u32,
    #[serde(rename = "Weight (lbs)*")]
    pub weight_lbs: u32,
    #[serde(rename = "Full/Partial*")]
    pub full_partial: String,
    #[serde(rename = "Equipment*")]
    pub equipment: String,
    #[serde(rename = "Contact Method*")]
    pub contact_method: String,
    #[serde(rename = "Origin City*")]
    pub origin_city: String,
    #[serde(rename = "Origin State*")]
    pub origin_state: String,
    #[serde(rename = "Origin Postal Code")]
    pub origin_zip: String,
    #[serde(rename = "Destination City*")]
    pub dest_city: String,
    #[serde(rename = "Destination State*")]
    pub dest_state: String,
    #[serde(rename = "Destination Postal Code")]
    pub dest_zip: String,
    #[serde(rename = "Comment")]
    pub comment: String,
    #[serde(rename = "Commodity")]
    pub commodity: String,
    #[serde(rename = "Reference ID")]
    pub reference_id: String,
}

/// One origin/destination combination before contact-method expansion.
struct Posting {
    origin_city: String,
    origin_state: String,
    origin_zip: String,
    dest_city: String,
    dest_state: String,
    dest_zip: String,
}

impl Posting {
    fn base(lane: &Lane) -> Self {
        Self {
            origin_city: lane.origin_city.clone(),
            origin_state: lane.origin_state.to_string(),
            origin_zip: lane.origin_zip.clone().unwrap_or_default(),
            dest_city: lane.dest_city.clone(),
            dest_state: lane.dest_state.to_string(),
            dest_zip: lane.dest_zip.clone().unwrap_or_default(),
        }
    }

    fn from_pair(pickup: &City, delivery: &City) -> Self {
        Self {
            origin_city: pickup.name.clone(),
            origin_state: pickup.state.to_string(),
            origin_zip: pickup.zip.clone().unwrap_or_default(),
            dest_city: delivery.name.clone(),
            dest_state: delivery.state.to_string(),
            dest_zip: delivery.zip.clone().unwrap_or_default(),
        }
    }
}

/// Validate the lane against the options.
fn validate(lane: &Lane, options: &RowOptions) -> Result<(), ValidationError> {
    if options.contact_methods.is_empty() {
        return Err(ValidationError::NoContactMethods);
    }

    if lane.length_ft == 0 {
        return Err(ValidationError::InvalidLength);
    }

    if !lane.weight.is_valid() {
        let (min, max) = match lane.weight {
            WeightSpec::Fixed(w) => (w, w),
            WeightSpec::Randomized { min, max } => (min, max),
        };
        return Err(ValidationError::InvalidWeightRange { min, max });
    }

    if let Some(limit) = options.weight_limit(&lane.equipment) {
        let heaviest = lane.weight.max_value();
        if heaviest > limit {
            return Err(ValidationError::WeightExceedsLimit {
                equipment: lane.equipment.to_string(),
                weight: heaviest,
                limit,
            });
        }
    }

    Ok(())
}

/// Draw a weight for one row.
///
/// Randomized specs are sampled per row independently, so sibling
/// postings don't all carry an identical suspicious weight.
fn draw_weight(spec: WeightSpec, rng: &mut impl Rng) -> u32 {
    match spec {
        WeightSpec::Fixed(w) => w,
        WeightSpec::Randomized { min, max } => rng.gen_range(min..=max),
    }
}

/// Reference ID for the export: the lane's own if set, otherwise
/// derived from a hash of the lane's identity. Attached only after
/// pairing is finalized.
fn reference_for(lane: &Lane, options: &RowOptions) -> ReferenceId {
    if let Some(id) = &lane.reference_id {
        return id.clone();
    }

    let mut hasher = DefaultHasher::new();
    lane.origin_city.to_lowercase().hash(&mut hasher);
    lane.origin_state.as_str().hash(&mut hasher);
    lane.dest_city.to_lowercase().hash(&mut hasher);
    lane.dest_state.as_str().hash(&mut hasher);
    lane.pickup_earliest.date().hash(&mut hasher);

    ReferenceId::derive(options.reference_prefix, hasher.finish())
}

/// Expand a lane and its pairing result into output rows.
///
/// Row count is always `(1 + pairs) * contact_methods`.
pub fn build_rows(
    lane: &Lane,
    pairing: &PairingResult,
    options: &RowOptions,
) -> Result<Vec<OutputRow>, ValidationError> {
    validate(lane, options)?;

    let reference = reference_for(lane, options);
    let pickup_earliest = format_board_date(lane.pickup_earliest.date());
    let pickup_latest = format_board_date(
        lane.pickup_latest
            .map(|d| d.date())
            .unwrap_or_else(|| lane.pickup_earliest.date()),
    );

    let mut postings = vec![Posting::base(lane)];
    postings.extend(
        pairing
            .pairs
            .iter()
            .map(|p| Posting::from_pair(&p.pickup, &p.delivery)),
    );

    let mut rng = rand::thread_rng();
    let mut rows = Vec::with_capacity(postings.len() * options.contact_methods.len());

    for posting in &postings {
        for method in &options.contact_methods {
            rows.push(OutputRow {
                pickup_earliest: pickup_earliest.clone(),
                pickup_latest: pickup_latest.clone(),
                length_ft: lane.length_ft,
                weight_lbs: draw_weight(lane.weight, &mut rng),
                full_partial: lane.full_partial.board_flag().to_string(),
                equipment: lane.equipment.to_string(),
                contact_method: method.clone(),
                origin_city: posting.origin_city.clone(),
                origin_state: posting.origin_state.clone(),
                origin_zip: posting.origin_zip.clone(),
                dest_city: posting.dest_city.clone(),
                dest_state: posting.dest_state.clone(),
                dest_zip: posting.dest_zip.clone(),
                comment: lane.comment.clone().unwrap_or_default(),
                commodity: lane.commodity.clone().unwrap_or_default(),
                reference_id: reference.to_string(),
            });
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        CandidatePair, EquipmentCode, LoadSize, MarketCode, StateCode,
    };

    fn city(name: &str, state: &str, market: &str) -> City {
        City {
            name: name.to_string(),
            state: StateCode::parse(state).unwrap(),
            latitude: 41.0,
            longitude: -87.0,
            zip: Some("60000".to_string()),
            market: Some(MarketCode::parse(market).unwrap()),
            market_name: None,
        }
    }

    fn test_lane(equipment: &str, weight: WeightSpec) -> Lane {
        Lane {
            origin_city: "Chicago".to_string(),
            origin_state: StateCode::parse("IL").unwrap(),
            origin_zip: Some("60601".to_string()),
            dest_city: "Atlanta".to_string(),
            dest_state: StateCode::parse("GA").unwrap(),
            dest_zip: None,
            equipment: EquipmentCode::parse(equipment).unwrap(),
            length_ft: 53,
            weight,
            pickup_earliest: chrono::NaiveDate::from_ymd_opt(2026, 9, 14).unwrap().into(),
            pickup_latest: None,
            full_partial: LoadSize::Full,
            commodity: Some("Produce".to_string()),
            comment: None,
            reference_id: None,
        }
    }

    fn pairing_with(n: usize) -> PairingResult {
        let pairs = (0..n)
            .map(|i| {
                CandidatePair::new(
                    city(&format!("Pickup{i}"), "IL", "AAA"),
                    city(&format!("Delivery{i}"), "GA", "BBB"),
                    10.0,
                    12.0,
                )
            })
            .collect();

        PairingResult {
            pairs,
            unique_origin_markets: n + 1,
            unique_dest_markets: n + 1,
            used_fallback: false,
            shortfall_reason: None,
        }
    }

    #[test]
    fn row_count_is_postings_times_contact_methods() {
        let lane = test_lane("V", WeightSpec::Fixed(44_000));
        let options = RowOptions::default();

        for pairs in [0, 1, 5] {
            let rows = build_rows(&lane, &pairing_with(pairs), &options).unwrap();
            assert_eq!(rows.len(), (1 + pairs) * options.contact_methods.len());
        }
    }

    #[test]
    fn base_posting_comes_first() {
        let lane = test_lane("V", WeightSpec::Fixed(44_000));
        let rows = build_rows(&lane, &pairing_with(2), &RowOptions::default()).unwrap();

        assert_eq!(rows[0].origin_city, "Chicago");
        assert_eq!(rows[0].dest_city, "Atlanta");
        assert_eq!(rows[0].contact_method, "Email");
        assert_eq!(rows[1].contact_method, "Primary Phone");
        assert_eq!(rows[2].origin_city, "Pickup0");
    }

    #[test]
    fn dates_emitted_in_board_format() {
        let lane = test_lane("V", WeightSpec::Fixed(44_000));
        let rows = build_rows(&lane, &pairing_with(0), &RowOptions::default()).unwrap();

        assert_eq!(rows[0].pickup_earliest, "09/14/2026");
        // Latest defaults to earliest when unset
        assert_eq!(rows[0].pickup_latest, "09/14/2026");
    }

    #[test]
    fn reefer_over_limit_is_rejected() {
        let lane = test_lane("R", WeightSpec::Fixed(43_000));
        let err = build_rows(&lane, &pairing_with(3), &RowOptions::default()).unwrap_err();

        assert_eq!(
            err,
            ValidationError::WeightExceedsLimit {
                equipment: "R".to_string(),
                weight: 43_000,
                limit: 42_000,
            }
        );
    }

    #[test]
    fn randomized_range_over_limit_is_rejected() {
        let lane = test_lane(
            "R",
            WeightSpec::Randomized {
                min: 40_000,
                max: 43_000,
            },
        );
        assert!(matches!(
            build_rows(&lane, &pairing_with(0), &RowOptions::default()),
            Err(ValidationError::WeightExceedsLimit { .. })
        ));
    }

    #[test]
    fn randomized_weight_stays_in_range() {
        let lane = test_lane(
            "V",
            WeightSpec::Randomized {
                min: 42_000,
                max: 45_000,
            },
        );
        let rows = build_rows(&lane, &pairing_with(5), &RowOptions::default()).unwrap();

        for row in &rows {
            assert!((42_000..=45_000).contains(&row.weight_lbs));
        }
    }

    #[test]
    fn invalid_weight_range_is_rejected() {
        let lane = test_lane(
            "V",
            WeightSpec::Randomized {
                min: 45_000,
                max: 42_000,
            },
        );
        assert!(matches!(
            build_rows(&lane, &pairing_with(0), &RowOptions::default()),
            Err(ValidationError::InvalidWeightRange { .. })
        ));
    }

    #[test]
    fn zero_length_is_rejected() {
        let mut lane = test_lane("V", WeightSpec::Fixed(44_000));
        lane.length_ft = 0;
        assert_eq!(
            build_rows(&lane, &pairing_with(0), &RowOptions::default()).unwrap_err(),
            ValidationError::InvalidLength
        );
    }

    #[test]
    fn unknown_equipment_has_no_limit() {
        let lane = test_lane("SD", WeightSpec::Fixed(47_000));
        assert!(build_rows(&lane, &pairing_with(0), &RowOptions::default()).is_ok());
    }

    #[test]
    fn reference_id_is_shared_and_compliant() {
        let lane = test_lane("V", WeightSpec::Fixed(44_000));
        let rows = build_rows(&lane, &pairing_with(3), &RowOptions::default()).unwrap();

        let first = &rows[0].reference_id;
        assert!(rows.iter().all(|r| &r.reference_id == first));
        assert!(ReferenceId::parse(first).is_ok());
    }

    #[test]
    fn explicit_reference_id_wins() {
        let mut lane = test_lane("V", WeightSpec::Fixed(44_000));
        lane.reference_id = Some(ReferenceId::parse("AB12345").unwrap());

        let rows = build_rows(&lane, &pairing_with(0), &RowOptions::default()).unwrap();
        assert_eq!(rows[0].reference_id, "AB12345");
    }
}
