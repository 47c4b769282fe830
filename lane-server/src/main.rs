use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use lane_server::catalog::{CityCatalog, InMemoryCatalog};
use lane_server::discovery::{DiscoveryFallback, FallbackConfig, PlacesClient, PlacesConfig};
use lane_server::export::RowOptions;
use lane_server::pairing::{PairingConfig, PairingEngine};
use lane_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Get the discovery API key from environment
    let api_key = std::env::var("PLACES_API_KEY").unwrap_or_else(|_| {
        eprintln!("Warning: PLACES_API_KEY not set. Discovery fallback calls will fail.");
        String::new()
    });

    // Load the city catalog seed
    let catalog = match std::env::var("CATALOG_SEED") {
        Ok(path) => {
            let catalog = InMemoryCatalog::load_json(&path).expect("Failed to load city catalog");
            println!("Loaded {} cities from {path}", catalog.len().await);
            catalog
        }
        Err(_) => {
            eprintln!("Warning: CATALOG_SEED not set. Starting with an empty catalog.");
            InMemoryCatalog::new()
        }
    };
    let catalog: Arc<dyn CityCatalog> = Arc::new(catalog);

    // Create the places client
    let places_config = PlacesConfig::new(&api_key);
    let places_client = PlacesClient::new(places_config).expect("Failed to create places client");

    // Wrap it with memoization and catalog write-through
    let discovery =
        DiscoveryFallback::new(places_client, catalog.clone(), FallbackConfig::default());

    // Create the pairing engine
    let engine = PairingEngine::new(catalog, Arc::new(discovery), PairingConfig::default());

    // Build app state
    let state = AppState::new(engine, RowOptions::default());

    // Create router
    let app = create_router(state);

    // Bind and serve
    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    println!("Lane Posting Service listening on http://{addr}");
    println!();
    println!("API Endpoints:");
    println!("  GET  /health           - Health check");
    println!("  POST /pairings         - Generate pickup/delivery pairs");
    println!("  POST /postings/export  - Export posting rows as CSV");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
