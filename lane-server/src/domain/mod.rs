//! Domain types for the lane posting engine.
//!
//! This module contains the core domain model types that represent
//! validated freight data. All types enforce their invariants at
//! construction time, so code that receives these types can trust
//! their validity.

mod city;
mod dates;
mod equipment;
mod lane;
mod pair;
mod reference;

pub use city::{City, CityKey, InvalidMarketCode, InvalidState, MarketCode, StateCode};
pub use dates::{DateError, FlexibleDate, format_board_date, parse_board_date};
pub use equipment::{EquipmentCode, InvalidEquipmentCode};
pub use lane::{Lane, LoadSize, WeightSpec};
pub use pair::{CandidatePair, PairingResult};
pub use reference::{InvalidReferenceId, ReferenceId};
