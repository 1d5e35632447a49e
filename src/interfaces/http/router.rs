//! REST API router

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::middleware::auth_middleware;
use super::modules::{auth, health, slots};
use super::state::AppState;

pub fn create_api_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/auth/login", post(auth::login));

    // Everything else needs a bearer token
    let protected_routes = Router::new()
        .route("/api/v1/auth/me", get(auth::me))
        .route("/api/v1/slots", get(slots::list_slots))
        .route("/api/v1/slots/summary", get(slots::summary))
        .route("/api/v1/slots/search", get(slots::search))
        .route("/api/v1/slots/{id}", get(slots::get_slot))
        .route("/api/v1/slots/{id}/park", post(slots::park))
        .route("/api/v1/slots/{id}/reserve", post(slots::reserve))
        .route("/api/v1/slots/{id}/arrive", post(slots::arrive))
        .route("/api/v1/slots/{id}/checkout", post(slots::checkout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public_routes
        .merge(protected_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
