//! Web layer for the lane posting service.
//!
//! Provides HTTP endpoints for generating pairs and exporting
//! board-ready posting rows as CSV.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
