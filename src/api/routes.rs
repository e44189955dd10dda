use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Recommendation (encrypted bodies, bearer token required)
        .route("/places", post(handlers::recommend_places))
        .route("/validity", post(handlers::check_validity))
        .route("/train", post(handlers::train_model))
        // Live events
        .route("/live-events", get(handlers::get_live_events))
        .route("/live-events", post(handlers::add_live_event))
        // Friendship
        .route("/friendship/add", post(handlers::add_friendship))
        .route("/friendship/confirm", post(handlers::confirm_friendship))
        .route("/friendship/remove", delete(handlers::remove_friendship))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
