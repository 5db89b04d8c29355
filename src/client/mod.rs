//! Like-state client
//!
//! Keeps the "liked" marker for a movie or series in a local key-value
//! store, animates the like button and tells the API about new likes.

pub mod api;
pub mod button;
pub mod controller;
pub mod like_state;
pub mod storage;

pub use api::{ClientError, HttpLikesApi, LikesApi};
pub use button::{ButtonState, ButtonView, LikeButtonMachine, StageTimings};
pub use controller::{ClickOutcome, LikeController};
pub use like_state::LikeState;
pub use storage::{KeyValueStore, MemoryStore, RedisStore, StorageError, StorageKey};

use crate::{config::ClientConfig, models::UserId};

/// Opens the Redis-backed like record and API client described by `config`
pub fn connect(
    config: &ClientConfig,
    user_id: UserId,
) -> Result<(LikeState<RedisStore>, HttpLikesApi), StorageError> {
    let store = RedisStore::open(&config.redis_url, config.session.clone())?;
    let api = HttpLikesApi::new(config.api_base_url.clone(), user_id);
    Ok((LikeState::new(store), api))
}
