use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{error::AppError, models::UserId};

/// Header set by the upstream auth gateway once a session is verified
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller
///
/// Rejects with 401 when the gateway did not attach a user.
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserId);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| AuthUser(UserId::new(id)))
            .ok_or_else(|| AppError::Unauthorized("Not authorized, no user".to_string()))
    }
}
