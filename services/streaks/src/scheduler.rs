//! services/streaks/src/scheduler.rs
//!
//! Periodically recomputes the streaks of every habit.
//!
//! The loop stops as soon as its `CancellationToken` is cancelled; a run that
//! is already in progress is dropped at its next suspension point.

use crate::service::StreakService;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Interval between recompute runs
    pub interval: Duration,
    pub enabled: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3600),
            enabled: true,
        }
    }
}

pub struct RecomputeScheduler {
    service: Arc<StreakService>,
    config: SchedulerConfig,
}

impl RecomputeScheduler {
    pub fn new(service: Arc<StreakService>, config: SchedulerConfig) -> Self {
        Self { service, config }
    }

    /// Spawns the loop onto the runtime.
    pub fn start(self, cancellation_token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run(cancellation_token).await;
        })
    }

    async fn run(self, cancellation_token: CancellationToken) {
        if !self.config.enabled {
            info!("Streak scheduler disabled");
            return;
        }

        info!(
            "Streak scheduler started (interval: {:?})",
            self.config.interval
        );

        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancellation_token.cancelled() => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                _ = cancellation_token.cancelled() => break,
                result = self.service.recompute_all(Utc::now()) => {
                    if let Err(e) = result {
                        error!("Scheduled streak recompute failed: {:?}", e);
                    }
                }
            }
        }

        info!("Streak scheduler stopped");
    }
}
