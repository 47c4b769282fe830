//! Market-diversity selection and pair generation.

mod config;
mod engine;
mod select;


pub use config::{PairingConfig, PairingOptions};
pub use engine::{PairingEngine, PairingError, SearchPhase};
pub use select::{RankedCity, fill_closest, select_diverse};
