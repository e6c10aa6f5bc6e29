//! In-memory `HabitStore` used by the service and web tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use habit_streaks_core::domain::{Entry, Habit, StreakUpdate};
use habit_streaks_core::ports::{HabitStore, PortError, PortResult};
use std::collections::{BTreeMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryHabitStore {
    habits: RwLock<BTreeMap<Uuid, Habit>>,
    entries: RwLock<Vec<Entry>>,
    failing_saves: RwLock<HashSet<Uuid>>,
}

impl InMemoryHabitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_habit(&self, name: &str, longest_streak: u32) -> Uuid {
        let id = Uuid::new_v4();
        self.habits.write().await.insert(
            id,
            Habit {
                id,
                owner_id: Uuid::nil(),
                name: name.to_string(),
                current_streak: 0,
                longest_streak,
                last_entry_at: None,
            },
        );
        id
    }

    pub async fn log_days_ago(&self, habit_id: Uuid, now: DateTime<Utc>, days: &[i64]) {
        let mut entries = self.entries.write().await;
        for day in days {
            entries.push(Entry {
                id: Uuid::new_v4(),
                habit_id,
                performed_at: Some(now - Duration::days(*day)),
                note: None,
                mood: None,
            });
        }
    }

    pub async fn log_untimed(&self, habit_id: Uuid) {
        self.entries.write().await.push(Entry {
            id: Uuid::new_v4(),
            habit_id,
            performed_at: None,
            note: Some("imported without a date".to_string()),
            mood: None,
        });
    }

    pub async fn fail_saves_for(&self, habit_id: Uuid) {
        self.failing_saves.write().await.insert(habit_id);
    }

    pub async fn habit(&self, habit_id: Uuid) -> Option<Habit> {
        self.habits.read().await.get(&habit_id).cloned()
    }
}

#[async_trait]
impl HabitStore for InMemoryHabitStore {
    async fn list_habit_ids(&self, after: Option<Uuid>, limit: usize) -> PortResult<Vec<Uuid>> {
        let habits = self.habits.read().await;
        Ok(habits
            .keys()
            .filter(|id| after.map_or(true, |a| **id > a))
            .take(limit)
            .copied()
            .collect())
    }

    async fn get_habit(&self, habit_id: Uuid) -> PortResult<Habit> {
        self.habit(habit_id)
            .await
            .ok_or_else(|| PortError::NotFound(format!("Habit {} not found", habit_id)))
    }

    async fn recent_entries(&self, habit_id: Uuid, limit: usize) -> PortResult<Vec<Entry>> {
        let entries = self.entries.read().await;
        let mut matching: Vec<Entry> = entries
            .iter()
            .filter(|e| e.habit_id == habit_id)
            .cloned()
            .collect();
        // Newest first, untimed entries last.
        matching.sort_by(|a, b| match (a.performed_at, b.performed_at) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        matching.truncate(limit);
        Ok(matching)
    }

    async fn save_streaks(&self, habit_id: Uuid, update: &StreakUpdate) -> PortResult<Habit> {
        if self.failing_saves.read().await.contains(&habit_id) {
            return Err(PortError::Unexpected("write rejected".to_string()));
        }
        let mut habits = self.habits.write().await;
        let habit = habits
            .get_mut(&habit_id)
            .ok_or_else(|| PortError::NotFound(format!("Habit {} not found", habit_id)))?;
        habit.current_streak = update.current_streak;
        habit.longest_streak = habit
            .longest_streak
            .max(update.longest_streak)
            .max(update.current_streak);
        habit.last_entry_at = update.last_entry_at;
        Ok(habit.clone())
    }
}
