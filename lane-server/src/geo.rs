//! Great-circle distance between coordinates.

/// Mean earth radius in statute miles.
const EARTH_RADIUS_MILES: f64 = 3959.0;

/// A point on the earth in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

impl Point {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Haversine distance in miles between two points.
///
/// Spherical-earth approximation; accurate to well under a mile at the
/// radii this engine cares about (75-125 miles). NaN inputs propagate,
/// so callers must validate coordinates before calling.
pub fn distance_miles(a: Point, b: Point) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_MILES * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_at_identity() {
        let p = Point::new(41.8781, -87.6298);
        assert_eq!(distance_miles(p, p), 0.0);
    }

    #[test]
    fn chicago_to_atlanta() {
        let chicago = Point::new(41.8781, -87.6298);
        let atlanta = Point::new(33.7490, -84.3880);

        let dist = distance_miles(chicago, atlanta);
        // Published great-circle distance is ~588 miles
        assert!((dist - 588.0).abs() < 5.0, "got {dist}");
    }

    #[test]
    fn short_hop() {
        // Chicago to Joliet, IL: ~35 miles
        let chicago = Point::new(41.8781, -87.6298);
        let joliet = Point::new(41.5250, -88.0817);

        let dist = distance_miles(chicago, joliet);
        assert!((25.0..45.0).contains(&dist), "got {dist}");
    }

    #[test]
    fn nan_propagates() {
        let p = Point::new(f64::NAN, 0.0);
        let q = Point::new(0.0, 0.0);
        assert!(distance_miles(p, q).is_nan());
    }
}
