//! dealbase HTTP/JSON gateway.
//!
//! Exposes the record service over REST for the tabbed form UI: CRUD routes
//! per entity plus a health endpoint. Bodies reuse the protocol crate's
//! serde forms, so sparse updates keep their absent/null/value distinction
//! end to end.

pub mod config;
pub mod error;
pub mod json;
pub mod routes;

pub use config::{Args, GatewayConfig};
pub use error::AppError;

use std::sync::Arc;

use axum::Router;
use dealbase_client::Client;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Record service client.
    pub client: Arc<Client>,
    /// Gateway configuration.
    pub config: GatewayConfig,
}

impl AppState {
    /// Create new application state.
    pub fn new(client: Client, config: GatewayConfig) -> Self {
        Self {
            client: Arc::new(client),
            config,
        }
    }
}

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::health::routes())
        .merge(routes::companies::routes())
        .merge(routes::customers::routes())
        .merge(routes::deals::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
