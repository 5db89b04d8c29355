use axum::{
    middleware,
    routing::{delete, get},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/user", user_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Routes that act on the authenticated user
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/likes", get(handlers::get_likes).post(handlers::add_like))
        .route("/likes/:movie_id", delete(handlers::remove_like))
        .route("/recommendations", get(handlers::get_recommendations))
}
