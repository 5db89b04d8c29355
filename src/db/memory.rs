use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    db::UserRepository,
    error::AppResult,
    models::{LikedMovies, MovieId, UserId, UserRecord},
};

/// Process-local user store, the test double for the HTTP layer
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, UserRecord>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a user record
    pub async fn insert_user(&self, user: UserRecord) {
        self.users.write().await.insert(user.id.clone(), user);
    }

    /// Stores a recommendation list the way the recommendation service would
    pub async fn set_recommendations(&self, user_id: &UserId, recommended: Vec<MovieId>) -> bool {
        match self.users.write().await.get_mut(user_id) {
            Some(user) => {
                user.recommended_movies = recommended;
                user.updated_at = chrono::Utc::now();
                true
            }
            None => false,
        }
    }

    pub async fn get_user(&self, user_id: &UserId) -> Option<UserRecord> {
        self.users.read().await.get(user_id).cloned()
    }
}

#[async_trait::async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn add_liked_movie(
        &self,
        user_id: &UserId,
        movie_id: MovieId,
    ) -> AppResult<Option<LikedMovies>> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(user_id).map(|user| {
            if user.liked_movies.insert(movie_id) {
                user.updated_at = chrono::Utc::now();
            }
            user.liked_movies.clone()
        }))
    }

    async fn remove_liked_movie(
        &self,
        user_id: &UserId,
        movie_id: MovieId,
    ) -> AppResult<Option<LikedMovies>> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(user_id).map(|user| {
            if user.liked_movies.remove(movie_id) {
                user.updated_at = chrono::Utc::now();
            }
            user.liked_movies.clone()
        }))
    }

    async fn liked_movies(&self, user_id: &UserId) -> AppResult<Option<LikedMovies>> {
        let users = self.users.read().await;
        Ok(users.get(user_id).map(|user| user.liked_movies.clone()))
    }

    async fn recommended_movies(&self, user_id: &UserId) -> AppResult<Option<Vec<MovieId>>> {
        let users = self.users.read().await;
        Ok(users.get(user_id).map(|user| user.recommended_movies.clone()))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
