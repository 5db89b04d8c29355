pub mod likes;
pub mod notifier;
pub mod recommendations;

pub use likes::LikesService;
pub use notifier::{HttpRecommendationNotifier, RecommendationNotifier};
pub use recommendations::{DispatcherHandle, RecommendationTrigger};
