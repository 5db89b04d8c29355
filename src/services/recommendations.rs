use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};

use crate::{
    models::UserId,
    services::notifier::{NotificationError, NotificationOutcome, RecommendationNotifier},
};

/// Enqueues recommendation updates without waiting for them
///
/// Cloning is cheap; every clone feeds the same background dispatcher.
#[derive(Clone)]
pub struct RecommendationTrigger {
    request_tx: mpsc::UnboundedSender<UserId>,
}

/// Handle for gracefully shutting down the dispatcher
pub struct DispatcherHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl DispatcherHandle {
    /// Stops accepting new requests, sends everything already queued and
    /// waits for in-flight notifications to finish or time out.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Recommendation dispatcher shutdown signal sent");

        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Recommendation dispatcher task failed");
        }
    }
}

impl RecommendationTrigger {
    /// Spawns the dispatcher task
    ///
    /// Each request becomes its own task bounded by `timeout`, so a slow
    /// recommendation service never delays the next notification.
    pub fn spawn(
        notifier: Arc<dyn RecommendationNotifier>,
        timeout: Duration,
    ) -> (Self, DispatcherHandle) {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let task = tokio::spawn(async move {
            Self::dispatcher_task(notifier, timeout, request_rx, shutdown_rx).await;
        });

        (Self { request_tx }, DispatcherHandle { shutdown_tx, task })
    }

    /// Requests a recommendation update for `user_id` and returns immediately
    pub fn trigger(&self, user_id: UserId) {
        if let Err(e) = self.request_tx.send(user_id) {
            tracing::error!(user_id = %e.0, "Recommendation dispatcher is gone, update dropped");
        }
    }

    async fn dispatcher_task(
        notifier: Arc<dyn RecommendationNotifier>,
        timeout: Duration,
        mut request_rx: mpsc::UnboundedReceiver<UserId>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!(notifier = notifier.name(), "Recommendation dispatcher started");
        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                Some(user_id) = request_rx.recv() => {
                    in_flight.spawn(notify_once(notifier.clone(), user_id, timeout));
                }
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = joined {
                        tracing::error!(error = %e, "Recommendation notification task panicked");
                    }
                }
                Some(()) = shutdown_rx.recv() => {
                    request_rx.close();
                    while let Some(user_id) = request_rx.recv().await {
                        in_flight.spawn(notify_once(notifier.clone(), user_id, timeout));
                    }

                    tracing::info!(
                        pending = in_flight.len(),
                        "Recommendation dispatcher draining in-flight notifications"
                    );

                    while let Some(joined) = in_flight.join_next().await {
                        if let Err(e) = joined {
                            tracing::error!(error = %e, "Notification task panicked");
                        }
                    }
                    break;
                }
                else => break,
            }
        }

        tracing::info!("Recommendation dispatcher stopped");
    }
}

/// Runs one notification and logs its outcome
///
/// The result is returned for tests; the dispatcher discards it.
pub async fn notify_once(
    notifier: Arc<dyn RecommendationNotifier>,
    user_id: UserId,
    timeout: Duration,
) -> Result<NotificationOutcome, NotificationError> {
    let started = Instant::now();
    tracing::info!(
        user_id = %user_id,
        notifier = notifier.name(),
        "Triggering recommendation update"
    );

    let result = match tokio::time::timeout(timeout, notifier.notify(&user_id)).await {
        Ok(result) => result,
        Err(_) => Err(NotificationError::Timeout(timeout)),
    };

    let elapsed_ms = started.elapsed().as_millis() as u64;
    match &result {
        Ok(outcome) => tracing::info!(
            user_id = %user_id,
            status = outcome.status,
            body = %outcome.body_excerpt,
            elapsed_ms,
            "Recommendation update accepted"
        ),
        Err(e) => tracing::warn!(
            user_id = %user_id,
            error = %e,
            elapsed_ms,
            "Recommendation update failed"
        ),
    }

    result
}
