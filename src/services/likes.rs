use std::sync::Arc;

use serde_json::Value;

use crate::{
    db::UserRepository,
    error::{AppError, AppResult},
    models::{LikedMovies, MovieId, UserId},
    services::recommendations::RecommendationTrigger,
};

/// Like bookkeeping plus the recommendation side channel
///
/// Success of every operation depends on the repository alone. The
/// recommendation trigger is fire-and-forget.
#[derive(Clone)]
pub struct LikesService {
    repository: Arc<dyn UserRepository>,
    trigger: RecommendationTrigger,
}

impl LikesService {
    pub fn new(repository: Arc<dyn UserRepository>, trigger: RecommendationTrigger) -> Self {
        Self {
            repository,
            trigger,
        }
    }

    /// Adds `movie_id` to the user's liked set and schedules a
    /// recommendation update
    pub async fn add_like(&self, user_id: &UserId, movie_id: MovieId) -> AppResult<LikedMovies> {
        let liked = self
            .repository
            .add_liked_movie(user_id, movie_id)
            .await?
            .ok_or_else(user_not_found)?;

        tracing::info!(
            user_id = %user_id,
            movie_id,
            liked_count = liked.len(),
            backend = self.repository.name(),
            "Movie liked"
        );

        self.trigger.trigger(user_id.clone());

        Ok(liked)
    }

    /// Removes `movie_id` from the user's liked set
    pub async fn remove_like(&self, user_id: &UserId, movie_id: MovieId) -> AppResult<LikedMovies> {
        let liked = self
            .repository
            .remove_liked_movie(user_id, movie_id)
            .await?
            .ok_or_else(user_not_found)?;

        tracing::info!(user_id = %user_id, movie_id, liked_count = liked.len(), "Movie unliked");

        Ok(liked)
    }

    pub async fn get_likes(&self, user_id: &UserId) -> AppResult<LikedMovies> {
        self.repository
            .liked_movies(user_id)
            .await?
            .ok_or_else(user_not_found)
    }

    /// Recommended IDs exactly as the recommendation service stored them
    pub async fn get_recommendations(&self, user_id: &UserId) -> AppResult<Vec<MovieId>> {
        self.repository
            .recommended_movies(user_id)
            .await?
            .ok_or_else(user_not_found)
    }
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

/// Extracts an integral movie ID from a JSON value
///
/// Strings, floats with a fractional part, booleans and nulls are rejected.
pub fn parse_movie_id(value: Option<&Value>) -> AppResult<MovieId> {
    value.and_then(Value::as_i64).ok_or_else(|| {
        AppError::InvalidInput("Please provide a valid movie ID (number).".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{InMemoryUserRepository, MockUserRepository};
    use crate::models::UserRecord;
    use crate::services::notifier::{MockRecommendationNotifier, NotificationError};
    use serde_json::json;
    use std::time::Duration;

    fn counting_notifier(times: usize) -> Arc<MockRecommendationNotifier> {
        let mut notifier = MockRecommendationNotifier::new();
        notifier.expect_name().return_const("mock");
        notifier.expect_notify().times(times).returning(|_| {
            Err(NotificationError::Timeout(Duration::from_secs(15)))
        });
        Arc::new(notifier)
    }

    async fn service_with_user(
        notifier: Arc<MockRecommendationNotifier>,
    ) -> (LikesService, crate::services::recommendations::DispatcherHandle, UserId) {
        let repo = InMemoryUserRepository::new();
        let user = UserId::new("u1");
        repo.insert_user(UserRecord::new(user.clone())).await;

        let (trigger, handle) = RecommendationTrigger::spawn(notifier, Duration::from_secs(1));
        (LikesService::new(Arc::new(repo), trigger), handle, user)
    }

    #[tokio::test]
    async fn test_like_twice_keeps_one_entry_and_notifies_twice() {
        let notifier = counting_notifier(2);
        let (service, handle, user) = service_with_user(notifier.clone()).await;

        let first = service.add_like(&user, 42).await.unwrap();
        assert_eq!(first.as_slice(), &[42]);

        let second = service.add_like(&user, 42).await.unwrap();
        assert_eq!(second.as_slice(), &[42]);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_like_unknown_user_is_not_found_and_not_notified() {
        let notifier = counting_notifier(0);
        let (service, handle, _) = service_with_user(notifier.clone()).await;

        let result = service.add_like(&UserId::new("ghost"), 42).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_persistence_failure_is_server_error() {
        let mut repo = MockUserRepository::new();
        repo.expect_add_liked_movie()
            .returning(|_, _| Err(AppError::Database(sqlx::Error::PoolTimedOut)));

        let notifier = counting_notifier(0);
        let (trigger, handle) =
            RecommendationTrigger::spawn(notifier.clone(), Duration::from_secs(1));
        let service = LikesService::new(Arc::new(repo), trigger);

        let result = service.add_like(&UserId::new("u1"), 7).await;
        assert!(matches!(result, Err(AppError::Database(_))));

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_empty_user_reads_as_empty() {
        let (service, handle, user) = service_with_user(counting_notifier(0)).await;

        assert!(service.get_likes(&user).await.unwrap().is_empty());
        assert!(service.get_recommendations(&user).await.unwrap().is_empty());

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_remove_like_does_not_notify() {
        let notifier = counting_notifier(1);
        let (service, handle, user) = service_with_user(notifier.clone()).await;

        service.add_like(&user, 5).await.unwrap();
        let liked = service.remove_like(&user, 5).await.unwrap();
        assert!(liked.is_empty());

        handle.shutdown().await;
    }

    #[test]
    fn test_parse_movie_id() {
        assert_eq!(parse_movie_id(Some(&json!(42))).unwrap(), 42);
        assert_eq!(parse_movie_id(Some(&json!(-3))).unwrap(), -3);

        for bad in [json!("42"), json!(4.5), json!(true), json!(null), json!([42])] {
            assert!(matches!(
                parse_movie_id(Some(&bad)),
                Err(AppError::InvalidInput(_))
            ));
        }
        assert!(parse_movie_id(None).is_err());
    }
}
