use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::models::{RecommendationUpdateRequest, UserId};

/// Longest slice of a response body kept for logging
const BODY_EXCERPT_CHARS: usize = 500;

/// Failures of the best-effort recommendation notification
///
/// These are logged by the dispatcher and never converted into a response
/// error.
#[derive(thiserror::Error, Debug)]
pub enum NotificationError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Recommendation service returned status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Notification timed out after {0:?}")]
    Timeout(Duration),
}

/// What the recommendation service answered
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationOutcome {
    pub status: u16,
    pub body_excerpt: String,
}

/// Sink for "this user's likes changed" notifications
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationNotifier: Send + Sync {
    async fn notify(&self, user_id: &UserId) -> Result<NotificationOutcome, NotificationError>;

    /// Notifier name for logging
    fn name(&self) -> &'static str;
}

/// Posts `{"userId": ...}` to the recommendation service
#[derive(Clone)]
pub struct HttpRecommendationNotifier {
    http_client: HttpClient,
    endpoint: String,
}

impl HttpRecommendationNotifier {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, NotificationError> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl RecommendationNotifier for HttpRecommendationNotifier {
    async fn notify(&self, user_id: &UserId) -> Result<NotificationOutcome, NotificationError> {
        let body = RecommendationUpdateRequest {
            user_id: user_id.to_string(),
        };

        tracing::debug!(
            user_id = %user_id,
            endpoint = %self.endpoint,
            "Posting recommendation update"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let body_excerpt = excerpt(&text);

        if !status.is_success() {
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
                body: body_excerpt,
            });
        }

        Ok(NotificationOutcome {
            status: status.as_u16(),
            body_excerpt,
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

fn excerpt(text: &str) -> String {
    text.chars().take(BODY_EXCERPT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        let long = "é".repeat(BODY_EXCERPT_CHARS + 10);
        let cut = excerpt(&long);
        assert_eq!(cut.chars().count(), BODY_EXCERPT_CHARS);
        assert_eq!(excerpt("ok"), "ok");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let notifier = HttpRecommendationNotifier::new(
            format!("http://{}/api/python/update_recommendations", addr),
            Duration::from_secs(2),
        )
        .unwrap();

        let result = notifier.notify(&UserId::new("u1")).await;
        assert!(matches!(result, Err(NotificationError::HttpClient(_))));
    }
}
