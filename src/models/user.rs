use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MovieId, UserId};

/// Set of movies a user has liked
///
/// Keeps insertion order for stable responses, but membership is what
/// matters: an ID appears at most once.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct LikedMovies(Vec<MovieId>);

impl LikedMovies {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds a movie, returning `false` if it was already liked
    pub fn insert(&mut self, movie_id: MovieId) -> bool {
        if self.contains(movie_id) {
            return false;
        }
        self.0.push(movie_id);
        true
    }

    /// Removes a movie, returning `false` if it was not liked
    pub fn remove(&mut self, movie_id: MovieId) -> bool {
        let before = self.0.len();
        self.0.retain(|id| *id != movie_id);
        self.0.len() != before
    }

    pub fn contains(&self, movie_id: MovieId) -> bool {
        self.0.contains(&movie_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[MovieId] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<MovieId> {
        self.0
    }
}

impl FromIterator<MovieId> for LikedMovies {
    fn from_iter<I: IntoIterator<Item = MovieId>>(iter: I) -> Self {
        let mut liked = LikedMovies::new();
        for id in iter {
            liked.insert(id);
        }
        liked
    }
}

/// The slice of a user document this service reads and writes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    pub id: UserId,
    pub liked_movies: LikedMovies,
    /// Written by the recommendation service only
    pub recommended_movies: Vec<MovieId>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Creates a user with no likes and no recommendations
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            liked_movies: LikedMovies::new(),
            recommended_movies: Vec::new(),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_empty() {
        let user = UserRecord::new(UserId::new("u1"));
        assert!(user.liked_movies.is_empty());
        assert!(user.recommended_movies.is_empty());
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut liked = LikedMovies::new();
        assert!(liked.insert(42));
        assert!(!liked.insert(42));
        assert_eq!(liked.as_slice(), &[42]);
    }

    #[test]
    fn test_remove() {
        let mut liked: LikedMovies = vec![1, 2, 3].into_iter().collect();
        assert!(liked.remove(2));
        assert!(!liked.remove(2));
        assert_eq!(liked.into_vec(), vec![1, 3]);
    }

    #[test]
    fn test_from_iter_drops_duplicates() {
        let liked: LikedMovies = vec![7, 7, 8, 7].into_iter().collect();
        assert_eq!(liked.len(), 2);
        assert!(liked.contains(7));
        assert!(liked.contains(8));
    }
}
