//! Equipment code type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid equipment code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid equipment code: {reason}")]
pub struct InvalidEquipmentCode {
    reason: &'static str,
}

/// A load-board equipment code.
///
/// Codes are 1-3 uppercase alphanumeric characters, e.g. "V" (dry
/// van), "R" (reefer), "F" (flatbed), "SD" (step deck).
///
/// # Examples
///
/// ```
/// use lane_server::domain::EquipmentCode;
///
/// let van = EquipmentCode::parse("V").unwrap();
/// assert_eq!(van.as_str(), "V");
///
/// assert!(EquipmentCode::parse("v").is_ok()); // normalized to "V"
/// assert!(EquipmentCode::parse("").is_err());
/// assert!(EquipmentCode::parse("LONG").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct EquipmentCode(String);

impl EquipmentCode {
    /// Parse an equipment code, uppercasing on the way in.
    pub fn parse(s: &str) -> Result<Self, InvalidEquipmentCode> {
        let trimmed = s.trim();

        if trimmed.is_empty() || trimmed.len() > 3 {
            return Err(InvalidEquipmentCode {
                reason: "must be 1-3 characters",
            });
        }

        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(InvalidEquipmentCode {
                reason: "must be ASCII alphanumeric",
            });
        }

        Ok(EquipmentCode(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EquipmentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EquipmentCode({})", self.0)
    }
}

impl fmt::Display for EquipmentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for EquipmentCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EquipmentCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        EquipmentCode::parse(&s).map_err(serde::de::Error::custom)
    }
}
