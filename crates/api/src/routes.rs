//! API Routes

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .route("/oracle-pubkey", get(handlers::oracle_pubkey))

        // Wallet risk data
        .route(
            "/oracle-data",
            get(handlers::get_oracle_data).post(handlers::update_oracle_data),
        )
        .route("/delete-oracle-entry", post(handlers::delete_oracle_entry))

        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
