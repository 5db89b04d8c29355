use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{LikeResponse, LikesResponse, MovieId, RecommendationsResponse},
    services::likes::parse_movie_id,
};

use super::{AuthUser, AppState};

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// POST /api/user/likes
///
/// Expects `{"movieId": <integer>}`. Any body that does not carry an
/// integral `movieId`, including unparseable JSON, is a 400.
pub async fn add_like(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<LikeResponse>> {
    let Json(body) = payload.map_err(|e| {
        tracing::debug!(request_id = %request_id, error = %e, "Rejected like body");
        AppError::InvalidInput("Please provide a valid movie ID (number).".to_string())
    })?;
    let movie_id = parse_movie_id(body.get("movieId"))?;

    tracing::info!(request_id = %request_id, user_id = %user_id, movie_id, "Processing like");

    let liked = state.likes.add_like(&user_id, movie_id).await?;

    Ok(Json(LikeResponse {
        success: true,
        message: "Movie liked successfully and recommendation update triggered.".to_string(),
        liked_movies: liked.into_vec(),
    }))
}

/// DELETE /api/user/likes/:movie_id
pub async fn remove_like(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    AuthUser(user_id): AuthUser,
    Path(raw_movie_id): Path<String>,
) -> AppResult<Json<LikeResponse>> {
    let movie_id: MovieId = raw_movie_id.parse().map_err(|_| {
        AppError::InvalidInput("Invalid movie ID format in URL parameter.".to_string())
    })?;

    tracing::info!(request_id = %request_id, user_id = %user_id, movie_id, "Processing unlike");

    let liked = state.likes.remove_like(&user_id, movie_id).await?;

    Ok(Json(LikeResponse {
        success: true,
        message: "Movie unliked successfully".to_string(),
        liked_movies: liked.into_vec(),
    }))
}

/// GET /api/user/likes
pub async fn get_likes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<LikesResponse>> {
    let liked = state.likes.get_likes(&user_id).await?;

    Ok(Json(LikesResponse {
        success: true,
        liked_movies: liked.into_vec(),
    }))
}

/// GET /api/user/recommendations
pub async fn get_recommendations(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<RecommendationsResponse>> {
    let recommendations = state.likes.get_recommendations(&user_id).await?;

    tracing::debug!(user_id = %user_id, count = recommendations.len(), "Serving recommendations");

    Ok(Json(RecommendationsResponse {
        success: true,
        recommendations,
    }))
}
