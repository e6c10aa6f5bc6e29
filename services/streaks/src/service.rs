//! services/streaks/src/service.rs
//!
//! Recomputes the derived streak fields of habits through the `HabitStore` port.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use habit_streaks_core::domain::Habit;
use habit_streaks_core::ports::{HabitStore, PortResult};
use habit_streaks_core::streak;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// Tuning knobs for a recompute run.
#[derive(Debug, Clone, Copy)]
pub struct RecomputeSettings {
    pub entry_window: usize,
    pub page_size: usize,
    pub concurrency: usize,
}

impl Default for RecomputeSettings {
    fn default() -> Self {
        Self {
            entry_window: 120,
            page_size: 200,
            concurrency: 8,
        }
    }
}

/// Counts reported after a run over all habits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct RecomputeSummary {
    pub processed: usize,
    pub failed: usize,
}

pub struct StreakService {
    store: Arc<dyn HabitStore>,
    settings: RecomputeSettings,
}

impl StreakService {
    pub fn new(store: Arc<dyn HabitStore>, settings: RecomputeSettings) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &Arc<dyn HabitStore> {
        &self.store
    }

    /// Reads the habit's recent entries, recalculates, and persists the result.
    pub async fn recompute_habit(&self, habit_id: Uuid, now: DateTime<Utc>) -> PortResult<Habit> {
        let habit = self.store.get_habit(habit_id).await?;
        let entries = self
            .store
            .recent_entries(habit_id, self.settings.entry_window)
            .await?;

        let calculation = streak::calculate(&entries, now);
        if calculation.skipped_entries > 0 {
            warn!(
                "Skipped {} entries without a timestamp for habit {}",
                calculation.skipped_entries, habit_id
            );
        }

        let update = calculation.merge(habit.longest_streak);
        let saved = self.store.save_streaks(habit_id, &update).await?;

        debug!(
            "Habit {} streaks: current={} longest={} days={}",
            habit_id, saved.current_streak, saved.longest_streak, calculation.distinct_days
        );
        Ok(saved)
    }

    /// Recomputes every habit, page by page. A failing habit is logged and counted.
    pub async fn recompute_all(&self, now: DateTime<Utc>) -> PortResult<RecomputeSummary> {
        let mut summary = RecomputeSummary::default();
        let mut cursor: Option<Uuid> = None;

        loop {
            let page = self
                .store
                .list_habit_ids(cursor, self.settings.page_size)
                .await?;
            let Some(&last) = page.last() else {
                break;
            };
            let page_len = page.len();

            let results: Vec<(Uuid, PortResult<Habit>)> = stream::iter(page)
                .map(|habit_id| async move { (habit_id, self.recompute_habit(habit_id, now).await) })
                .buffer_unordered(self.settings.concurrency)
                .collect()
                .await;

            for (habit_id, result) in results {
                match result {
                    Ok(_) => summary.processed += 1,
                    Err(e) => {
                        error!("Failed to recompute streaks for habit {}: {:?}", habit_id, e);
                        summary.failed += 1;
                    }
                }
            }

            if page_len < self.settings.page_size {
                break;
            }
            cursor = Some(last);
        }

        info!(
            "Streak recompute finished: {} processed, {} failed",
            summary.processed, summary.failed
        );
        Ok(summary)
    }
}
