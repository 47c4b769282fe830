//! City records and their identifying codes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::Point;

/// Error returned when parsing an invalid state code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid state code: {reason}")]
pub struct InvalidState {
    reason: &'static str,
}

/// A valid 2-letter US/Canada state or province code.
///
/// State codes are always 2 uppercase ASCII letters. This type
/// guarantees that any `StateCode` value is valid by construction.
///
/// # Examples
///
/// ```
/// use lane_server::domain::StateCode;
///
/// let il = StateCode::parse("IL").unwrap();
/// assert_eq!(il.as_str(), "IL");
///
/// // Lowercase is normalized by parse_normalized, rejected by parse
/// assert!(StateCode::parse("il").is_err());
/// assert!(StateCode::parse_normalized("il").is_ok());
///
/// // Wrong length is rejected
/// assert!(StateCode::parse("I").is_err());
/// assert!(StateCode::parse("ILL").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateCode([u8; 2]);

impl StateCode {
    /// Parse a state code from a string.
    ///
    /// The input must be exactly 2 uppercase ASCII letters (A-Z).
    pub fn parse(s: &str) -> Result<Self, InvalidState> {
        let bytes = s.as_bytes();

        if bytes.len() != 2 {
            return Err(InvalidState {
                reason: "must be exactly 2 characters",
            });
        }

        for &b in bytes {
            if !b.is_ascii_uppercase() {
                return Err(InvalidState {
                    reason: "must be uppercase ASCII letters A-Z",
                });
            }
        }

        Ok(StateCode([bytes[0], bytes[1]]))
    }

    /// Parse a state code, trimming whitespace and accepting lowercase.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidState> {
        Self::parse(&s.trim().to_uppercase())
    }

    /// Returns the state code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only valid ASCII uppercase letters are stored
        std::str::from_utf8(&self.0).unwrap()
    }
}

impl fmt::Debug for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateCode({})", self.as_str())
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StateCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StateCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        StateCode::parse_normalized(&s).map_err(serde::de::Error::custom)
    }
}

/// Error returned when parsing an invalid market code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid market code: {reason}")]
pub struct InvalidMarketCode {
    reason: &'static str,
}

/// A Key Market Area (KMA) code, as assigned by the load board.
///
/// Market codes group postal codes into metro regions; two postings in
/// the same market area are treated as non-diverse by the board's
/// duplicate detection. Codes are 2-8 uppercase alphanumeric
/// characters (e.g. "CHI", "IL_CHI", "ATL").
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct MarketCode(String);

impl MarketCode {
    /// Parse a market code from a string, uppercasing on the way in.
    pub fn parse(s: &str) -> Result<Self, InvalidMarketCode> {
        let trimmed = s.trim();

        if trimmed.len() < 2 || trimmed.len() > 8 {
            return Err(InvalidMarketCode {
                reason: "must be 2-8 characters",
            });
        }

        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(InvalidMarketCode {
                reason: "must be alphanumeric (underscore allowed)",
            });
        }

        Ok(MarketCode(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for MarketCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MarketCode({})", self.0)
    }
}

impl fmt::Display for MarketCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for MarketCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for MarketCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        MarketCode::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Case-insensitive identity of a city: lowercased name + state.
///
/// The catalog is keyed by this, so "Chicago, IL" and "CHICAGO, IL"
/// resolve to the same record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CityKey {
    name: String,
    state: StateCode,
}

impl CityKey {
    pub fn new(name: &str, state: StateCode) -> Self {
        Self {
            name: name.trim().to_lowercase(),
            state,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> StateCode {
        self.state
    }
}

/// A city known to the catalog.
///
/// Created by catalog ingestion or by discovery write-back; never
/// deleted by this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub state: StateCode,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub market: Option<MarketCode>,
    #[serde(default)]
    pub market_name: Option<String>,
}

impl City {
    /// The catalog identity of this city.
    pub fn key(&self) -> CityKey {
        CityKey::new(&self.name, self.state)
    }

    /// The city's coordinates as a geo point.
    pub fn point(&self) -> Point {
        Point::new(self.latitude, self.longitude)
    }

    /// Whether this city can participate in pairing.
    ///
    /// A city without finite coordinates or a market code cannot be
    /// posted against and is excluded from candidate sets.
    pub fn is_postable(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite() && self.market.is_some()
    }

    /// Whether this city has usable coordinates (postable or not).
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Roundtrip: parse then as_str returns the original
        #[test]
        fn state_roundtrip(s in "[A-Z]{2}") {
            let code = StateCode::parse(&s).unwrap();
            prop_assert_eq!(code.as_str(), s.as_str());
        }

        /// Wrong-length strings are always rejected
        #[test]
        fn state_wrong_length_rejected(s in "[A-Z]{0,1}|[A-Z]{3,8}") {
            prop_assert!(StateCode::parse(&s).is_err());
        }

        /// Any valid market code parses and uppercases
        #[test]
        fn market_parse_uppercases(s in "[a-zA-Z0-9_]{2,8}") {
            let m = MarketCode::parse(&s).unwrap();
            let upper = s.to_uppercase();
            prop_assert_eq!(m.as_str(), upper.as_str());
        }
    }
}
