use crate::{
    error::AppResult,
    models::{LikedMovies, MovieId, UserId},
};

/// Storage for the liked/recommended slice of a user record
///
/// Every method returns `Ok(None)` when the user does not exist, so callers
/// can tell a missing user apart from a user with no data.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    /// Adds a movie to the liked set and returns the updated set.
    /// Adding an already-liked movie leaves the set unchanged.
    async fn add_liked_movie(
        &self,
        user_id: &UserId,
        movie_id: MovieId,
    ) -> AppResult<Option<LikedMovies>>;

    /// Removes a movie from the liked set and returns the updated set
    async fn remove_liked_movie(
        &self,
        user_id: &UserId,
        movie_id: MovieId,
    ) -> AppResult<Option<LikedMovies>>;

    /// Liked set, empty if never written
    async fn liked_movies(&self, user_id: &UserId) -> AppResult<Option<LikedMovies>>;

    /// Recommended sequence in the order the recommendation service stored it
    async fn recommended_movies(&self, user_id: &UserId) -> AppResult<Option<Vec<MovieId>>>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
