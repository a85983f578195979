use axum::{routing::{get, post}, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{handlers, state::AppState};

/// Create the main application router with all API endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // Create CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Connection flows
        .route("/api/connect/status", get(handlers::connection_status))
        .route("/api/connect/bank", post(handlers::connect_bank))
        .route("/api/connect/credit-cards", post(handlers::connect_credit_cards))
        .route("/api/connect/web3", post(handlers::connect_web3))
        .route("/api/connect/reset", post(handlers::reset_connections))
        // Aggregation views
        .route("/api/home", get(handlers::get_home))
        .route("/api/networth", get(handlers::get_net_worth))
        .route("/api/power", get(handlers::get_spending_power))
        .route("/api/power/options", post(handlers::get_spending_options))
        // Add shared state
        .with_state(state)
        // Add middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
