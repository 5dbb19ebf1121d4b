//! HTTP Gateway
//!
//! Axum-based REST gateway for the listing lifecycle service.
//!
//! Route map:
//!
//! - `GET  /api/v1/health`
//! - `POST /api/v1/listings`
//! - `GET  /api/v1/listings`
//! - `GET  /api/v1/listings/{id}`
//! - `PUT  /api/v1/listings/{id}`
//! - `PATCH /api/v1/listings/{id}/status`
//! - `DELETE /api/v1/listings/{id}` (archive)
//! - `DELETE /api/v1/listings/{id}/permanent`
//! - `POST /api/v1/listings/batch-delete`
//! - `/docs` Swagger UI

pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use state::AppState;

/// Build the gateway router over the given application state
pub fn build_router(state: Arc<AppState>) -> Router {
    let listing_routes = Router::new()
        .route("/", post(handlers::create_listing).get(handlers::list_listings))
        .route("/batch-delete", post(handlers::batch_delete_listings))
        .route(
            "/{id}",
            get(handlers::get_listing)
                .put(handlers::update_listing)
                .delete(handlers::archive_listing),
        )
        .route("/{id}/status", patch(handlers::update_listing_status))
        .route("/{id}/permanent", delete(handlers::delete_listing));

    Router::new()
        .route("/api/v1/health", get(handlers::health_check))
        .nest("/api/v1/listings", listing_routes)
        .with_state(state)
        // OpenAPI / Swagger UI (stateless, added after with_state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}

/// Start HTTP Gateway server
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) {
    let app = build_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("❌ FATAL: Failed to bind to {}: {}", addr, e);
            eprintln!(
                "   Hint: Port {} may already be in use. Check with: lsof -i :{}",
                port, port
            );
            std::process::exit(1);
        }
    };

    println!("🚀 Gateway listening on http://{}", addr);
    println!("📖 API Docs: http://{}/docs", addr);

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("❌ FATAL: Server error: {}", e);
        std::process::exit(1);
    }
}
