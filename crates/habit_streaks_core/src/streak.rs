//! crates/habit_streaks_core/src/streak.rs
//!
//! Derives current and longest consecutive-day streaks from a habit's entries.
//!
//! All functions here are pure: "now" is passed in by the caller and nothing
//! is read from or written to a store.

use crate::domain::{DateKey, Entry, StreakUpdate};
use chrono::{DateTime, Utc};

/// The outcome of one streak calculation over a window of entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakCalculation {
    pub current_streak: u32,
    /// Longest run found inside the scanned window only.
    pub longest_candidate: u32,
    pub last_entry_at: Option<DateTime<Utc>>,
    pub distinct_days: usize,
    /// Entries ignored because they carried no usable timestamp.
    pub skipped_entries: usize,
}

impl StreakCalculation {
    /// Folds in the previously stored longest streak so it never decreases.
    pub fn merge(&self, previous_longest: u32) -> StreakUpdate {
        StreakUpdate {
            current_streak: self.current_streak,
            longest_streak: previous_longest.max(self.longest_candidate),
            last_entry_at: self.last_entry_at,
        }
    }
}

/// Collapses entries into distinct UTC days, newest first.
///
/// Returns the keys and the number of entries skipped for lacking a timestamp.
pub fn day_keys(entries: &[Entry]) -> (Vec<DateKey>, usize) {
    let mut instants: Vec<DateTime<Utc>> =
        entries.iter().filter_map(|e| e.performed_at).collect();
    let skipped = entries.len() - instants.len();

    instants.sort_unstable_by(|a, b| b.cmp(a));

    let mut keys: Vec<DateKey> = instants.into_iter().map(DateKey::from).collect();
    keys.dedup();
    (keys, skipped)
}

/// Length of the run of consecutive days ending today or yesterday.
///
/// `keys` must be distinct and newest first, as produced by [`day_keys`].
pub fn current_streak(keys: &[DateKey], today: DateKey) -> u32 {
    let Some((&newest, older)) = keys.split_first() else {
        return 0;
    };

    // The newest day may be today or yesterday; after that every step must be exactly one day.
    if today.days_since(newest) > 1 {
        return 0;
    }

    let mut streak = 1;
    let mut previous = newest;
    for &key in older {
        match previous.days_since(key) {
            0 => continue,
            1 => {
                streak += 1;
                previous = key;
            }
            _ => break,
        }
    }
    streak
}

/// Longest run of consecutive days anywhere in `keys`.
pub fn longest_streak(keys: &[DateKey]) -> u32 {
    let Some((&first, rest)) = keys.split_first() else {
        return 0;
    };

    let mut run = 1;
    let mut longest = 1;
    let mut previous = first;
    for &key in rest {
        match previous.days_since(key) {
            0 => continue,
            1 => run += 1,
            _ => run = 1,
        }
        previous = key;
        longest = longest.max(run);
    }
    longest
}

/// Runs the full calculation for one habit's entries as of `now`.
pub fn calculate(entries: &[Entry], now: DateTime<Utc>) -> StreakCalculation {
    let (keys, skipped_entries) = day_keys(entries);
    let last_entry_at = entries.iter().filter_map(|e| e.performed_at).max();

    StreakCalculation {
        current_streak: current_streak(&keys, DateKey::from(now)),
        longest_candidate: longest_streak(&keys),
        last_entry_at,
        distinct_days: keys.len(),
        skipped_entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 14, 30, 0).unwrap()
    }

    fn entry_at(at: DateTime<Utc>) -> Entry {
        Entry {
            id: Uuid::new_v4(),
            habit_id: Uuid::nil(),
            performed_at: Some(at),
            note: None,
            mood: None,
        }
    }

    fn days_ago(days: &[i64]) -> Vec<Entry> {
        days.iter()
            .map(|d| entry_at(now() - Duration::days(*d)))
            .collect()
    }

    #[test]
    fn empty_entries_give_zero_streaks() {
        let calc = calculate(&[], now());
        assert_eq!(calc.current_streak, 0);
        assert_eq!(calc.longest_candidate, 0);
        assert_eq!(calc.last_entry_at, None);
        assert_eq!(calc.distinct_days, 0);
    }

    #[test]
    fn single_entry_today_counts_one() {
        let calc = calculate(&days_ago(&[0]), now());
        assert_eq!(calc.current_streak, 1);
        assert_eq!(calc.longest_candidate, 1);
    }

    #[test]
    fn single_entry_yesterday_still_counts() {
        let calc = calculate(&days_ago(&[1]), now());
        assert_eq!(calc.current_streak, 1);
    }

    #[test]
    fn single_entry_two_days_ago_breaks_current() {
        let calc = calculate(&days_ago(&[2]), now());
        assert_eq!(calc.current_streak, 0);
        assert_eq!(calc.longest_candidate, 1);
    }

    #[test]
    fn three_consecutive_days() {
        let calc = calculate(&days_ago(&[0, 1, 2]), now());
        assert_eq!(calc.current_streak, 3);
        assert_eq!(calc.longest_candidate, 3);
    }

    #[test]
    fn trailing_run_and_older_longer_run() {
        let calc = calculate(&days_ago(&[0, 1, 5, 6, 7]), now());
        assert_eq!(calc.current_streak, 2);
        assert_eq!(calc.longest_candidate, 3);
    }

    #[test]
    fn current_streak_starting_yesterday_walks_back() {
        let calc = calculate(&days_ago(&[1, 2, 3, 5]), now());
        assert_eq!(calc.current_streak, 3);
        assert_eq!(calc.longest_candidate, 3);
    }

    #[test]
    fn same_day_entries_collapse() {
        let today_morning = Utc.with_ymd_and_hms(2024, 6, 15, 6, 0, 0).unwrap();
        let today_evening = Utc.with_ymd_and_hms(2024, 6, 15, 21, 0, 0).unwrap();
        let twice = calculate(&[entry_at(today_morning), entry_at(today_evening)], now());
        let once = calculate(&[entry_at(today_morning)], now());

        assert_eq!(twice.current_streak, once.current_streak);
        assert_eq!(twice.longest_candidate, once.longest_candidate);
        assert_eq!(twice.distinct_days, 1);
        assert_eq!(twice.last_entry_at, Some(today_evening));
    }

    #[test]
    fn today_is_utc_day_of_now_not_of_newest_entry() {
        let late_now = Utc.with_ymd_and_hms(2024, 6, 16, 0, 5, 0).unwrap();
        let late_entry = Utc.with_ymd_and_hms(2024, 6, 14, 23, 59, 0).unwrap();
        // Ten minutes apart in wall time, but two UTC days apart.
        let calc = calculate(&[entry_at(late_entry)], late_now);
        assert_eq!(calc.current_streak, 0);
    }

    #[test]
    fn unsorted_input_matches_sorted_input() {
        let sorted = calculate(&days_ago(&[0, 1, 2, 4, 5]), now());
        let shuffled = calculate(&days_ago(&[4, 0, 5, 2, 1]), now());
        assert_eq!(sorted, shuffled);
    }

    #[test]
    fn entries_without_timestamp_are_skipped() {
        let mut entries = days_ago(&[0, 1]);
        entries.insert(1, Entry { performed_at: None, ..entry_at(now()) });

        let calc = calculate(&entries, now());
        assert_eq!(calc.current_streak, 2);
        assert_eq!(calc.longest_candidate, 2);
        assert_eq!(calc.skipped_entries, 1);
    }

    #[test]
    fn only_invalid_entries_behave_like_empty() {
        let entries = vec![Entry { performed_at: None, ..entry_at(now()) }];
        let calc = calculate(&entries, now());
        assert_eq!(calc.current_streak, 0);
        assert_eq!(calc.longest_candidate, 0);
        assert_eq!(calc.last_entry_at, None);
        assert_eq!(calc.skipped_entries, 1);
    }

    #[test]
    fn current_scan_stops_at_first_gap() {
        let keys: Vec<DateKey> = [0, 1, 3, 4, 5, 6]
            .iter()
            .map(|d| DateKey::from(now() - Duration::days(*d)))
            .collect();
        assert_eq!(current_streak(&keys, DateKey::from(now())), 2);
        assert_eq!(longest_streak(&keys), 4);
    }

    #[test]
    fn defensive_duplicate_keys_are_ignored() {
        let today = DateKey::from(now());
        let yesterday = DateKey::from(now() - Duration::days(1));
        let keys = [today, today, yesterday];
        assert_eq!(current_streak(&keys, today), 2);
        assert_eq!(longest_streak(&keys), 2);
    }

    #[test]
    fn merge_keeps_historic_longest() {
        let calc = calculate(&days_ago(&[0, 1]), now());
        let update = calc.merge(10);
        assert_eq!(update.current_streak, 2);
        assert_eq!(update.longest_streak, 10);

        let update = calc.merge(0);
        assert_eq!(update.longest_streak, 2);
    }

    #[test]
    fn merged_longest_is_never_below_current() {
        let windows: [&[i64]; 5] = [&[], &[0], &[1, 2, 3], &[0, 1, 5, 6, 7], &[3, 4]];
        for window in windows {
            let calc = calculate(&days_ago(window), now());
            for previous in [0, 1, 2, 50] {
                let update = calc.merge(previous);
                assert!(update.current_streak <= update.longest_streak);
                assert!(update.longest_streak >= previous);
            }
        }
    }

    #[test]
    fn rerunning_on_unchanged_data_is_stable() {
        let entries = days_ago(&[0, 1, 2, 9]);
        let first = calculate(&entries, now()).merge(1);
        let second = calculate(&entries, now()).merge(first.longest_streak);
        assert_eq!(first.current_streak, second.current_streak);
        assert!(second.longest_streak >= first.longest_streak);
    }
}
