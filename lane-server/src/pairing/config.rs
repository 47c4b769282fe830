//! Pairing engine configuration.

/// Configuration parameters for pair generation.
#[derive(Debug, Clone)]
pub struct PairingConfig {
    /// Radius bands in miles, tried in order when a side is short.
    /// Candidates beyond the last band are never admitted, even in
    /// relaxed mode.
    pub radius_bands_miles: Vec<f64>,

    /// Target pair count when fill-to-10 is requested.
    pub fill_target: usize,

    /// Maximum results requested per external discovery call.
    pub discovery_limit: usize,

    /// Whether relaxed fill (duplicate market codes) may run at all.
    /// Even when enabled it only engages for requests that ask to
    /// fill toward ten, after the fallback bands are exhausted.
    pub allow_relaxed_fill: bool,

    /// Unique-market threshold callers typically gate postings on.
    /// Reported via result counts; not enforced here.
    pub min_unique_markets: usize,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            radius_bands_miles: vec![75.0, 100.0, 125.0],
            fill_target: 10,
            discovery_limit: 20,
            allow_relaxed_fill: true,
            min_unique_markets: 5,
        }
    }
}

impl PairingConfig {
    /// The first (strict-phase) radius band.
    pub fn base_radius(&self) -> f64 {
        self.radius_bands_miles.first().copied().unwrap_or(75.0)
    }

    /// The widest configured band.
    pub fn max_radius(&self) -> f64 {
        self.radius_bands_miles.last().copied().unwrap_or(75.0)
    }
}

/// Per-request pairing options.
#[derive(Debug, Clone)]
pub struct PairingOptions {
    /// Minimum acceptable pair count before fallback kicks in.
    pub min_pairs: usize,

    /// Aim for 10 pairs and permit relaxed fill up to that target.
    pub prefer_fill_to_10: bool,
}

impl Default for PairingOptions {
    fn default() -> Self {
        Self {
            min_pairs: 5,
            prefer_fill_to_10: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PairingConfig::default();
        assert_eq!(config.radius_bands_miles, vec![75.0, 100.0, 125.0]);
        assert_eq!(config.base_radius(), 75.0);
        assert_eq!(config.max_radius(), 125.0);
        assert_eq!(config.fill_target, 10);
        assert!(config.allow_relaxed_fill);
        assert_eq!(config.min_unique_markets, 5);
    }

    #[test]
    fn default_options() {
        let options = PairingOptions::default();
        assert_eq!(options.min_pairs, 5);
        assert!(!options.prefer_fill_to_10);
    }
}
