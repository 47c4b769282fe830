//! Posting reference IDs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Width of the numeric part of a reference ID.
const DIGIT_WIDTH: usize = 5;

/// Error returned when parsing an invalid reference ID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid reference id: {reason}")]
pub struct InvalidReferenceId {
    reason: &'static str,
}

/// A short alphanumeric posting reference: two-letter prefix plus a
/// fixed-width digit run, e.g. "RR14213".
///
/// The board's cosmetic convention forbids two consecutive zero digits
/// anywhere in the numeric part, so derivation re-rolls (increments)
/// until the value is compliant. Reference IDs are attached to rows
/// only after pairing is finalized.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ReferenceId(String);

impl ReferenceId {
    /// Parse a reference ID, validating format and the zero rule.
    pub fn parse(s: &str) -> Result<Self, InvalidReferenceId> {
        let trimmed = s.trim();

        if trimmed.len() != 2 + DIGIT_WIDTH {
            return Err(InvalidReferenceId {
                reason: "must be 2 letters followed by 5 digits",
            });
        }

        let (prefix, digits) = trimmed.split_at(2);

        if !prefix.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(InvalidReferenceId {
                reason: "prefix must be 2 uppercase letters",
            });
        }

        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(InvalidReferenceId {
                reason: "suffix must be 5 digits",
            });
        }

        if digits.contains("00") {
            return Err(InvalidReferenceId {
                reason: "digits must not contain consecutive zeros",
            });
        }

        Ok(ReferenceId(trimmed.to_string()))
    }

    /// Derive a compliant reference ID from a seed value.
    ///
    /// The seed (typically a sequence number or lane hash) is reduced
    /// to the digit width; if the padded digit run would contain "00",
    /// the value is incremented (wrapping) until compliant.
    pub fn derive(prefix: [u8; 2], seed: u64) -> Self {
        debug_assert!(prefix.iter().all(|b| b.is_ascii_uppercase()));

        let modulus = 10u64.pow(DIGIT_WIDTH as u32);
        let mut value = seed % modulus;

        loop {
            let digits = format!("{value:0width$}", width = DIGIT_WIDTH);
            if !digits.contains("00") {
                let prefix = std::str::from_utf8(&prefix).unwrap_or("RR");
                return ReferenceId(format!("{prefix}{digits}"));
            }
            value = (value + 1) % modulus;
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReferenceId({})", self.0)
    }
}

impl fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ReferenceId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ReferenceId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ReferenceId::parse(&s).map_err(serde::de::Error::custom)
    }
}
