//! External place-discovery service client and fallback.
//!
//! When the catalog lacks enough distinct-market cities near a lane
//! endpoint, the engine asks a third-party places API for candidates.
//! Newly discovered cities are written back into the catalog so the
//! same metro never pays for the external call twice.

mod client;
mod error;
mod fallback;

pub use client::{PlaceItem, PlacesClient, PlacesConfig, sanitize_query};
pub use error::DiscoveryError;
pub use fallback::{CityDiscovery, DiscoveryFallback, FallbackConfig};
