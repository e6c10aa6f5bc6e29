//! services/streaks/src/adapters/db.rs
//!
//! This module contains the database adapter, the concrete implementation
//! of the `HabitStore` port from the core crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use habit_streaks_core::domain::{Entry, Habit, Mood, StreakUpdate};
use habit_streaks_core::ports::{HabitStore, PortError, PortResult};
use sqlx::{FromRow, PgPool};
use tracing::warn;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `HabitStore` port.
#[derive(Clone)]
pub struct PgHabitStore {
    pool: PgPool,
}

impl PgHabitStore {
    /// Creates a new `PgHabitStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs the embedded database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct HabitRecord {
    id: Uuid,
    owner_id: Uuid,
    name: String,
    current_streak: i32,
    longest_streak: i32,
    last_entry_at: Option<DateTime<Utc>>,
}
impl HabitRecord {
    fn to_domain(self) -> Habit {
        Habit {
            id: self.id,
            owner_id: self.owner_id,
            name: self.name,
            current_streak: self.current_streak.max(0) as u32,
            longest_streak: self.longest_streak.max(0) as u32,
            last_entry_at: self.last_entry_at,
        }
    }
}

#[derive(FromRow)]
struct EntryRecord {
    id: Uuid,
    habit_id: Uuid,
    performed_at: Option<DateTime<Utc>>,
    note: Option<String>,
    mood: Option<String>,
}
impl EntryRecord {
    fn to_domain(self) -> Entry {
        let mood = self.mood.as_deref().and_then(|raw| match raw.parse::<Mood>() {
            Ok(mood) => Some(mood),
            Err(e) => {
                warn!("Ignoring mood on entry {}: {}", self.id, e);
                None
            }
        });
        Entry {
            id: self.id,
            habit_id: self.habit_id,
            performed_at: self.performed_at,
            note: self.note,
            mood,
        }
    }
}

fn not_found_or_unexpected(e: sqlx::Error, habit_id: Uuid) -> PortError {
    match e {
        sqlx::Error::RowNotFound => PortError::NotFound(format!("Habit {} not found", habit_id)),
        _ => PortError::Unexpected(e.to_string()),
    }
}

fn to_db_count(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

//=========================================================================================
// `HabitStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl HabitStore for PgHabitStore {
    async fn list_habit_ids(&self, after: Option<Uuid>, limit: usize) -> PortResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM habits WHERE ($1::uuid IS NULL OR id > $1) ORDER BY id ASC LIMIT $2",
        )
        .bind(after)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))
    }

    async fn get_habit(&self, habit_id: Uuid) -> PortResult<Habit> {
        let record = sqlx::query_as::<_, HabitRecord>(
            "SELECT id, owner_id, name, current_streak, longest_streak, last_entry_at \
             FROM habits WHERE id = $1",
        )
        .bind(habit_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or_unexpected(e, habit_id))?;
        Ok(record.to_domain())
    }

    async fn recent_entries(&self, habit_id: Uuid, limit: usize) -> PortResult<Vec<Entry>> {
        let records = sqlx::query_as::<_, EntryRecord>(
            "SELECT id, habit_id, performed_at, note, mood FROM entries \
             WHERE habit_id = $1 ORDER BY performed_at DESC NULLS LAST LIMIT $2",
        )
        .bind(habit_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn save_streaks(&self, habit_id: Uuid, update: &StreakUpdate) -> PortResult<Habit> {
        // GREATEST keeps the merge atomic when two runs race on the same habit.
        let record = sqlx::query_as::<_, HabitRecord>(
            "UPDATE habits SET current_streak = $2, \
                 longest_streak = GREATEST(longest_streak, $3, $2), \
                 last_entry_at = $4, streaks_updated_at = now() \
             WHERE id = $1 \
             RETURNING id, owner_id, name, current_streak, longest_streak, last_entry_at",
        )
        .bind(habit_id)
        .bind(to_db_count(update.current_streak))
        .bind(to_db_count(update.longest_streak))
        .bind(update.last_entry_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or_unexpected(e, habit_id))?;
        Ok(record.to_domain())
    }
}
