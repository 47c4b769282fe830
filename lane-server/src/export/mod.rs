//! Posting row expansion and CSV output.

mod csv;
mod rows;

pub use csv::write_csv;
pub use rows::{OutputRow, RowOptions, ValidationError, build_rows};
