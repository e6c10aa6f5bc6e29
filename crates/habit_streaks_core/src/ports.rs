//! crates/habit_streaks_core/src/ports.rs
//!
//! Defines the persistence contract the streak job runs against.
//! The core stays independent of the concrete store; adapters live in the
//! service crate.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Entry, Habit, StreakUpdate};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Store Port (Trait)
//=========================================================================================

#[async_trait]
pub trait HabitStore: Send + Sync {
    /// Lists habit ids in ascending order, starting strictly after `after`.
    async fn list_habit_ids(&self, after: Option<Uuid>, limit: usize) -> PortResult<Vec<Uuid>>;

    async fn get_habit(&self, habit_id: Uuid) -> PortResult<Habit>;

    /// Returns at most `limit` entries for the habit, newest first.
    async fn recent_entries(&self, habit_id: Uuid, limit: usize) -> PortResult<Vec<Entry>>;

    /// Persists the derived fields and returns the stored habit.
    ///
    /// Implementations must keep the larger of the stored and the given
    /// `longest_streak`, atomically with respect to concurrent writers.
    async fn save_streaks(&self, habit_id: Uuid, update: &StreakUpdate) -> PortResult<Habit>;
}
