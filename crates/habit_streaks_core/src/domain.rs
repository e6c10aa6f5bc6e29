//! crates/habit_streaks_core/src/domain.rs
//!
//! Defines the pure, core data structures for streak tracking.
//! These structs are independent of any database or wire format.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A self-reported mood attached to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Great,
    Good,
    Okay,
    Bad,
    Awful,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Great => "great",
            Mood::Good => "good",
            Mood::Okay => "okay",
            Mood::Bad => "bad",
            Mood::Awful => "awful",
        }
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "great" => Ok(Mood::Great),
            "good" => Ok(Mood::Good),
            "okay" | "ok" => Ok(Mood::Okay),
            "bad" => Ok(Mood::Bad),
            "awful" => Ok(Mood::Awful),
            other => Err(format!("unknown mood '{}'", other)),
        }
    }
}

/// One logged occurrence of performing a habit.
///
/// `performed_at` is `None` when the stored timestamp was missing or could
/// not be decoded. Such entries are skipped by the streak calculation.
#[derive(Debug, Clone)]
pub struct Entry {
    pub id: Uuid,
    pub habit_id: Uuid,
    pub performed_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub mood: Option<Mood>,
}

/// A tracked habit together with its derived streak fields.
#[derive(Debug, Clone)]
pub struct Habit {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_entry_at: Option<DateTime<Utc>>,
}

/// A calendar day in UTC. Entries sharing a `DateKey` count as one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Signed number of whole days from `earlier` to `self`.
    pub fn days_since(&self, earlier: DateKey) -> i64 {
        self.0.signed_duration_since(earlier.0).num_days()
    }
}

impl From<DateTime<Utc>> for DateKey {
    fn from(instant: DateTime<Utc>) -> Self {
        Self(instant.date_naive())
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// The values written back to a habit after a recalculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_entry_at: Option<DateTime<Utc>>,
}
