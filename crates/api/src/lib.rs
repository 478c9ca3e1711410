//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Bearer authentication middleware
//! - The request validation layer
//! - The `{success, code, data, error}` response envelope

pub mod middleware;
pub mod response;
pub mod routes;
pub mod validation;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use wallet_core::limits::LimitPolicy;
use wallet_shared::JwtService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Daily deposit and withdrawal ceilings.
    pub limits: Arc<LimitPolicy>,
}

impl AppState {
    /// Bundles the shared services.
    #[must_use]
    pub fn new(db: DatabaseConnection, jwt_service: JwtService, limits: LimitPolicy) -> Self {
        Self {
            db: Arc::new(db),
            jwt_service: Arc::new(jwt_service),
            limits: Arc::new(limits),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    routes::api_routes_with_state(state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
