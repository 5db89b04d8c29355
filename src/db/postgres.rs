use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::UserRepository,
    error::AppResult,
    models::{LikedMovies, MovieId, UserId},
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the bundled schema migrations
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Appends only when the movie is absent. Runs as one statement so two
/// concurrent likes of the same movie cannot both append.
const ADD_LIKED_MOVIE: &str = r#"
    UPDATE users
    SET liked_movies = CASE
            WHEN $2 = ANY(COALESCE(liked_movies, '{}'::BIGINT[])) THEN liked_movies
            ELSE array_append(COALESCE(liked_movies, '{}'::BIGINT[]), $2::BIGINT)
        END,
        updated_at = now()
    WHERE id = $1
    RETURNING liked_movies
"#;

const REMOVE_LIKED_MOVIE: &str = r#"
    UPDATE users
    SET liked_movies = array_remove(COALESCE(liked_movies, '{}'::BIGINT[]), $2::BIGINT),
        updated_at = now()
    WHERE id = $1
    RETURNING liked_movies
"#;

/// `users` table backed repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_array(&self, column: &str, user_id: &UserId) -> AppResult<Option<Vec<MovieId>>> {
        let query = format!("SELECT {} FROM users WHERE id = $1", column);
        let row: Option<(Option<Vec<i64>>,)> = sqlx::query_as(&query)
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(ids,)| ids.unwrap_or_default()))
    }

    async fn update_liked(
        &self,
        statement: &str,
        user_id: &UserId,
        movie_id: MovieId,
    ) -> AppResult<Option<LikedMovies>> {
        let row: Option<(Option<Vec<i64>>,)> = sqlx::query_as(statement)
            .bind(user_id.as_str())
            .bind(movie_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(ids,)| ids.unwrap_or_default().into_iter().collect()))
    }
}

#[async_trait::async_trait]
impl UserRepository for PgUserRepository {
    async fn add_liked_movie(
        &self,
        user_id: &UserId,
        movie_id: MovieId,
    ) -> AppResult<Option<LikedMovies>> {
        self.update_liked(ADD_LIKED_MOVIE, user_id, movie_id).await
    }

    async fn remove_liked_movie(
        &self,
        user_id: &UserId,
        movie_id: MovieId,
    ) -> AppResult<Option<LikedMovies>> {
        self.update_liked(REMOVE_LIKED_MOVIE, user_id, movie_id).await
    }

    async fn liked_movies(&self, user_id: &UserId) -> AppResult<Option<LikedMovies>> {
        let ids = self.fetch_array("liked_movies", user_id).await?;
        Ok(ids.map(|ids| ids.into_iter().collect()))
    }

    async fn recommended_movies(&self, user_id: &UserId) -> AppResult<Option<Vec<MovieId>>> {
        self.fetch_array("recommended_movies", user_id).await
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
