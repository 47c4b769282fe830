//! Application state for the web layer.

use std::sync::Arc;

use crate::export::RowOptions;
use crate::pairing::PairingEngine;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Pair generation engine
    pub engine: Arc<PairingEngine>,

    /// Row-building configuration (contact methods, weight limits)
    pub row_options: Arc<RowOptions>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(engine: PairingEngine, row_options: RowOptions) -> Self {
        Self {
            engine: Arc::new(engine),
            row_options: Arc::new(row_options),
        }
    }
}
