use std::sync::Arc;

use tokio::task::JoinHandle;

use super::{
    api::{ClientError, LikesApi},
    button::{ButtonView, LikeButtonMachine},
    like_state::LikeState,
    storage::{KeyValueStore, StorageError},
};
use crate::models::MovieId;

/// Result of one click
pub struct ClickOutcome {
    /// Local liked state after the toggle
    pub liked: bool,
    /// Server call started by this click, if any. Dropping it does not
    /// cancel the call.
    pub sync: Option<JoinHandle<Result<Vec<MovieId>, ClientError>>>,
}

/// Like button for a single movie or series page
///
/// Local state decides what the button shows. The server is only told
/// about likes, never about unlikes, and the two stores are not
/// reconciled.
pub struct LikeController<S: KeyValueStore, V: ButtonView> {
    id: String,
    likes: LikeState<S>,
    button: LikeButtonMachine<V>,
    api: Arc<dyn LikesApi>,
}

impl<S: KeyValueStore, V: ButtonView> LikeController<S, V> {
    /// Binds the button to `id` and renders the stored state without
    /// touching the network
    pub fn load(
        id: impl Into<String>,
        likes: LikeState<S>,
        mut button: LikeButtonMachine<V>,
        api: Arc<dyn LikesApi>,
    ) -> Result<Self, StorageError> {
        let id = id.into();
        button.restore(likes.is_liked(&id)?);

        Ok(Self {
            id,
            likes,
            button,
            api,
        })
    }

    pub fn on_click(&mut self) -> Result<ClickOutcome, StorageError> {
        let liked = self.likes.toggle_like(&self.id)?;
        self.button.render_liked(liked);

        let sync = if liked { self.spawn_server_like() } else { None };

        Ok(ClickOutcome { liked, sync })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn button(&self) -> &LikeButtonMachine<V> {
        &self.button
    }

    fn spawn_server_like(&self) -> Option<JoinHandle<Result<Vec<MovieId>, ClientError>>> {
        let Ok(movie_id) = self.id.parse::<MovieId>() else {
            tracing::warn!(id = %self.id, "Non-numeric ID, like kept local only");
            return None;
        };

        let api = Arc::clone(&self.api);
        Some(tokio::spawn(async move {
            let result = api.add_like(movie_id).await;
            match &result {
                Ok(liked) => {
                    tracing::debug!(movie_id, server_count = liked.len(), "Server like recorded")
                }
                Err(e) => tracing::warn!(movie_id, error = %e, "Server like failed"),
            }
            result
        }))
    }
}
