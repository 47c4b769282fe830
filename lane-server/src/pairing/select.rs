//! Market-diversity candidate selection.
//!
//! Given a center city and a candidate pool, pick the largest subset
//! in which no two cities share a market-area code, closest first.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::{City, MarketCode};
use crate::geo::distance_miles;

/// A candidate with its distance from the search center.
#[derive(Debug, Clone)]
pub struct RankedCity {
    pub city: City,
    pub distance_miles: f64,
}

/// Rank candidates by distance from the center.
///
/// Drops candidates that are not postable (missing coordinates or
/// market code), outside the radius, the center itself (identity
/// check, not a distance epsilon), or in an excluded market.
///
/// Tie-break for equidistant candidates: a city with postal code data
/// wins over one without, shorter postal codes win over longer
/// (generic placeholder records tend to carry long composite codes),
/// then alphabetical name for determinism.
fn rank_candidates(
    center: &City,
    candidates: &[City],
    max_radius_miles: f64,
    exclude_markets: &HashSet<MarketCode>,
) -> Vec<RankedCity> {
    let center_key = center.key();
    let center_point = center.point();

    let mut ranked: Vec<RankedCity> = candidates
        .iter()
        .filter(|c| c.is_postable())
        .filter(|c| c.key() != center_key)
        .filter(|c| {
            c.market
                .as_ref()
                .is_none_or(|m| !exclude_markets.contains(m))
        })
        .map(|c| RankedCity {
            distance_miles: distance_miles(center_point, c.point()),
            city: c.clone(),
        })
        .filter(|r| r.distance_miles <= max_radius_miles)
        .collect();

    ranked.sort_by(|a, b| {
        a.distance_miles
            .total_cmp(&b.distance_miles)
            .then_with(|| zip_specificity(&a.city).cmp(&zip_specificity(&b.city)))
            .then_with(|| a.city.name.to_lowercase().cmp(&b.city.name.to_lowercase()))
    });

    ranked
}

/// Sort key for postal-code specificity: present beats absent, then
/// shorter beats longer.
fn zip_specificity(city: &City) -> (u8, usize) {
    match &city.zip {
        Some(zip) => (0, zip.len()),
        None => (1, 0),
    }
}

/// Select up to `max_count` candidates with pairwise-distinct market
/// codes, closest first.
///
/// Returning fewer than `max_count` is a normal outcome when the pool
/// lacks enough distinct markets, not an error.
pub fn select_diverse(
    center: &City,
    candidates: &[City],
    max_radius_miles: f64,
    max_count: usize,
    exclude_markets: &HashSet<MarketCode>,
) -> Vec<RankedCity> {
    let ranked = rank_candidates(center, candidates, max_radius_miles, exclude_markets);

    let mut taken_markets: HashSet<MarketCode> = HashSet::new();
    let mut selected: Vec<RankedCity> = Vec::new();

    for candidate in ranked {
        if selected.len() >= max_count {
            break;
        }

        // is_postable guarantees the market is present
        let Some(market) = candidate.city.market.clone() else {
            continue;
        };

        if taken_markets.insert(market) {
            selected.push(candidate);
        }
    }

    debug!(
        "selected {} of {} requested diverse candidates near {}, {} (radius {max_radius_miles} mi)",
        selected.len(),
        max_count,
        center.name,
        center.state
    );

    selected
}

/// Relaxed-mode fill: the closest in-radius candidates regardless of
/// market repetition, skipping cities already selected.
///
/// Only invoked when strict selection plus fallback could not reach
/// the minimum; the radius bound still applies.
pub fn fill_closest(
    center: &City,
    candidates: &[City],
    max_radius_miles: f64,
    needed: usize,
    already_selected: &[RankedCity],
) -> Vec<RankedCity> {
    if needed == 0 {
        return Vec::new();
    }

    let taken: Vec<_> = already_selected.iter().map(|r| r.city.key()).collect();
    let ranked = rank_candidates(center, candidates, max_radius_miles, &HashSet::new());

    ranked
        .into_iter()
        .filter(|r| !taken.contains(&r.city.key()))
        .take(needed)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StateCode;

    fn city(name: &str, lat: f64, lon: f64, market: Option<&str>) -> City {
        City {
            name: name.to_string(),
            state: StateCode::parse("IL").unwrap(),
            latitude: lat,
            longitude: lon,
            zip: None,
            market: market.map(|m| MarketCode::parse(m).unwrap()),
            market_name: None,
        }
    }

    fn chicago() -> City {
        city("Chicago", 41.8781, -87.6298, Some("CHI"))
    }

    // Real suburbs at increasing distance from Chicago
    fn suburb_pool() -> Vec<City> {
        vec![
            city("Cicero", 41.8456, -87.7539, Some("CHI")),
            city("Evanston", 42.0451, -87.6877, Some("EVN")),
            city("Aurora", 41.7606, -88.3201, Some("AUR")),
            city("Joliet", 41.5250, -88.0817, Some("JOL")),
            city("Kenosha", 42.5847, -87.8212, Some("KEN")),
            city("Rockford", 42.2711, -89.0940, Some("RFD")),
        ]
    }

    #[test]
    fn takes_one_city_per_market() {
        let pool = suburb_pool();
        let selected = select_diverse(&chicago(), &pool, 75.0, 10, &HashSet::new());

        let mut markets: Vec<_> = selected
            .iter()
            .map(|r| r.city.market.clone().unwrap())
            .collect();
        let before = markets.len();
        markets.dedup();
        assert_eq!(markets.len(), before, "duplicate market selected");
    }

    #[test]
    fn orders_by_ascending_distance() {
        let pool = suburb_pool();
        let selected = select_diverse(&chicago(), &pool, 125.0, 10, &HashSet::new());

        for window in selected.windows(2) {
            assert!(window[0].distance_miles <= window[1].distance_miles);
        }
    }

    #[test]
    fn respects_max_count() {
        let pool = suburb_pool();
        let selected = select_diverse(&chicago(), &pool, 125.0, 2, &HashSet::new());
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn respects_radius() {
        let pool = suburb_pool();
        // Rockford is ~75-80 miles out; a 50-mile radius excludes it
        let selected = select_diverse(&chicago(), &pool, 50.0, 10, &HashSet::new());
        assert!(selected.iter().all(|r| r.distance_miles <= 50.0));
        assert!(!selected.iter().any(|r| r.city.name == "Rockford"));
    }

    #[test]
    fn excludes_center_by_identity() {
        let mut pool = suburb_pool();
        pool.push(chicago());
        pool.push(city("CHICAGO", 41.8781, -87.6298, Some("CHI")));

        let selected = select_diverse(&chicago(), &pool, 75.0, 10, &HashSet::new());
        assert!(
            !selected
                .iter()
                .any(|r| r.city.name.eq_ignore_ascii_case("chicago"))
        );
    }

    #[test]
    fn same_market_as_center_is_allowed() {
        // Cicero shares Chicago's market; that only blocks other
        // selections in the same market, not Cicero itself
        let pool = suburb_pool();
        let selected = select_diverse(&chicago(), &pool, 75.0, 10, &HashSet::new());
        assert!(selected.iter().any(|r| r.city.name == "Cicero"));
    }

    #[test]
    fn skips_unpostable_candidates() {
        let pool = vec![
            city("NoMarket", 41.9, -87.7, None),
            city("Evanston", 42.0451, -87.6877, Some("EVN")),
        ];
        let selected = select_diverse(&chicago(), &pool, 75.0, 10, &HashSet::new());
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].city.name, "Evanston");
    }

    #[test]
    fn excluded_markets_are_skipped() {
        let pool = suburb_pool();
        let mut exclude = HashSet::new();
        exclude.insert(MarketCode::parse("EVN").unwrap());

        let selected = select_diverse(&chicago(), &pool, 75.0, 10, &exclude);
        assert!(!selected.iter().any(|r| r.city.name == "Evanston"));
    }

    #[test]
    fn under_filled_pool_is_not_an_error() {
        let pool = vec![city("Evanston", 42.0451, -87.6877, Some("EVN"))];
        let selected = select_diverse(&chicago(), &pool, 75.0, 5, &HashSet::new());
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn equidistant_tiebreak_prefers_postal_code() {
        // Two candidates at the same coordinates, different markets
        let mut with_zip = city("Berwyn", 41.8506, -87.7937, Some("BER"));
        with_zip.zip = Some("60402".to_string());
        let without_zip = city("Stickney", 41.8506, -87.7937, Some("STK"));

        let pool = vec![without_zip, with_zip];
        let selected = select_diverse(&chicago(), &pool, 75.0, 2, &HashSet::new());
        assert_eq!(selected[0].city.name, "Berwyn");
    }

    #[test]
    fn equidistant_tiebreak_falls_back_to_name() {
        let a = city("Alpha", 41.8506, -87.7937, Some("AAA"));
        let b = city("Beta", 41.8506, -87.7937, Some("BBB"));

        let pool = vec![b, a];
        let selected = select_diverse(&chicago(), &pool, 75.0, 2, &HashSet::new());
        assert_eq!(selected[0].city.name, "Alpha");
    }

    #[test]
    fn fill_closest_permits_duplicate_markets() {
        let pool = vec![
            city("Cicero", 41.8456, -87.7539, Some("CHI")),
            city("Berwyn", 41.8506, -87.7937, Some("CHI")),
            city("Oak Park", 41.8850, -87.7845, Some("CHI")),
        ];

        let strict = select_diverse(&chicago(), &pool, 75.0, 5, &HashSet::new());
        assert_eq!(strict.len(), 1); // all share one market

        let fill = fill_closest(&chicago(), &pool, 75.0, 2, &strict);
        assert_eq!(fill.len(), 2);
        // Already-selected city is not repeated
        assert!(!fill.iter().any(|r| r.city.key() == strict[0].city.key()));
    }

    #[test]
    fn fill_closest_still_respects_radius() {
        let pool = vec![
            city("Cicero", 41.8456, -87.7539, Some("CHI")),
            city("Springfield", 39.7817, -89.6501, Some("SPI")), // ~180 mi
        ];

        let fill = fill_closest(&chicago(), &pool, 125.0, 5, &[]);
        assert_eq!(fill.len(), 1);
        assert_eq!(fill[0].city.name, "Cicero");
    }
}
