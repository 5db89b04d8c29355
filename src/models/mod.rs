use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod user;

pub use user::{LikedMovies, UserRecord};

/// Numeric movie identifier as issued by TMDB
pub type MovieId = i64;

/// Opaque user identifier
///
/// Assigned by the upstream identity provider; this service never inspects
/// its structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// HTTP wire types
// ============================================================================

/// Response to a like or unlike
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub success: bool,
    pub message: String,
    pub liked_movies: Vec<MovieId>,
}

/// Response from GET /api/user/likes
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikesResponse {
    pub success: bool,
    pub liked_movies: Vec<MovieId>,
}

/// Response from GET /api/user/recommendations
#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub success: bool,
    pub recommendations: Vec<MovieId>,
}

/// Body posted to the recommendation service
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationUpdateRequest {
    pub user_id: String,
}
