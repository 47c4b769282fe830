//! Catalog error types.

/// Errors from the city catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Seed file could not be read
    #[error("failed to read catalog seed: {0}")]
    Io(#[from] std::io::Error),

    /// Seed file was not valid JSON
    #[error("failed to parse catalog seed: {0}")]
    Json(#[from] serde_json::Error),

    /// Backing store failure
    #[error("catalog store error: {0}")]
    Store(String),
}
