//! Ecclesia website backend
//!
//! Stores contact and join requests from the website and serves the random verse
//! shown on the home page.

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod validation;

use std::sync::Arc;

use axum::{http::StatusCode, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use config::Config;
use db::Store;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/verse/random", get(api::random_verse))
        .route("/contact", get(api::list_contacts).post(api::create_contact))
        // Keeps unknown API paths away from the website fallback
        .fallback(api::not_found);

    let health_routes = Router::new().route("/health", get(health_check));

    let mut router = Router::new().nest("/api", api_routes).merge(health_routes);

    // Built website, with client-side routes falling back to index.html
    if let Some(dir) = state.config.static_dir.as_ref() {
        let index = ServeFile::new(dir.join("index.html"));
        router = router.fallback_service(ServeDir::new(dir).fallback(index));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    state.config.request_timeout,
                ))
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
