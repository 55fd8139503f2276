pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod observability;
pub mod routes;

pub use config::Config;
pub use routes::AppState;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Router with every API route plus tracing and CORS layers.
pub fn create_app(state: AppState) -> axum::Router {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
