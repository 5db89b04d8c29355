use std::sync::Arc;

use crate::{
    config::Config,
    db::{self, PgUserRepository, UserRepository},
    services::{
        DispatcherHandle, HttpRecommendationNotifier, LikesService, RecommendationNotifier,
        RecommendationTrigger,
    },
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub likes: LikesService,
}

impl AppState {
    /// Wires a repository and notifier together and starts the
    /// recommendation dispatcher
    pub fn new(
        repository: Arc<dyn UserRepository>,
        notifier: Arc<dyn RecommendationNotifier>,
        config: &Config,
    ) -> (Self, DispatcherHandle) {
        let (trigger, handle) =
            RecommendationTrigger::spawn(notifier, config.notification_timeout());
        let state = Self {
            likes: LikesService::new(repository, trigger),
        };
        (state, handle)
    }

    /// Builds the production state described by `config`
    pub async fn from_config(config: &Config) -> anyhow::Result<(Self, DispatcherHandle)> {
        let pool = db::create_pool(&config.database_url).await?;
        db::run_migrations(&pool).await?;
        tracing::info!("Connected to PostgreSQL user store");
        let repository: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool));

        let notifier = HttpRecommendationNotifier::new(
            config.recommendation_service_url.clone(),
            config.notification_timeout(),
        )?;
        tracing::info!(endpoint = %notifier.endpoint(), "Recommendation notifier configured");

        Ok(Self::new(repository, Arc::new(notifier), config))
    }
}
