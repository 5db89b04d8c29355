use reqwest::{Client as HttpClient, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::{
    api::USER_ID_HEADER,
    models::{LikeResponse, LikesResponse, MovieId, RecommendationsResponse, UserId},
};

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status}: {message}")]
    Api { status: u16, message: String },
}

/// Client view of the like/recommendation endpoints
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LikesApi: Send + Sync {
    /// Returns the server's liked set after the like
    async fn add_like(&self, movie_id: MovieId) -> Result<Vec<MovieId>, ClientError>;

    async fn remove_like(&self, movie_id: MovieId) -> Result<Vec<MovieId>, ClientError>;

    async fn get_likes(&self) -> Result<Vec<MovieId>, ClientError>;

    async fn get_recommendations(&self) -> Result<Vec<MovieId>, ClientError>;
}

/// Error body shape shared by every endpoint
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// reqwest implementation of [`LikesApi`]
///
/// Identifies the caller with the same header the auth gateway sets, so it
/// is meant for traffic that already sits behind that gateway.
#[derive(Clone)]
pub struct HttpLikesApi {
    http_client: HttpClient,
    base_url: String,
    user_id: UserId,
}

impl HttpLikesApi {
    pub fn new(base_url: impl Into<String>, user_id: UserId) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_id,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/user{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(USER_ID_HEADER, self.user_id.as_str())
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl LikesApi for HttpLikesApi {
    async fn add_like(&self, movie_id: MovieId) -> Result<Vec<MovieId>, ClientError> {
        let response = self
            .authorized(self.http_client.post(self.url("/likes")))
            .json(&json!({ "movieId": movie_id }))
            .send()
            .await?;

        let body: LikeResponse = Self::parse(response).await?;
        Ok(body.liked_movies)
    }

    async fn remove_like(&self, movie_id: MovieId) -> Result<Vec<MovieId>, ClientError> {
        let response = self
            .authorized(self.http_client.delete(self.url(&format!("/likes/{}", movie_id))))
            .send()
            .await?;

        let body: LikeResponse = Self::parse(response).await?;
        Ok(body.liked_movies)
    }

    async fn get_likes(&self) -> Result<Vec<MovieId>, ClientError> {
        let response = self
            .authorized(self.http_client.get(self.url("/likes")))
            .send()
            .await?;

        let body: LikesResponse = Self::parse(response).await?;
        Ok(body.liked_movies)
    }

    async fn get_recommendations(&self) -> Result<Vec<MovieId>, ClientError> {
        let response = self
            .authorized(self.http_client.get(self.url("/recommendations")))
            .send()
            .await?;

        let body: RecommendationsResponse = Self::parse(response).await?;
        Ok(body.recommendations)
    }
}
