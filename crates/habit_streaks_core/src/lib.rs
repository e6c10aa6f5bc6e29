pub mod domain;
pub mod ports;
pub mod streak;

pub use domain::{DateKey, Entry, Habit, Mood, StreakUpdate};
pub use ports::{HabitStore, PortError, PortResult};
pub use streak::{calculate, current_streak, day_keys, longest_streak, StreakCalculation};
