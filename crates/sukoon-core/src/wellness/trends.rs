//! Summaries over mood history.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::day_key::DayKey;
use super::mood::{Mood, MoodEntry};

/// Average mood score for one Monday-start week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyAverage {
    pub week_start: DayKey,
    pub entries: usize,
    pub average: f64,
}

/// Count of entries per mood. Moods with no entries are included as zero.
pub fn distribution(entries: &[MoodEntry]) -> BTreeMap<Mood, usize> {
    let mut counts: BTreeMap<Mood, usize> = Mood::ALL.iter().map(|m| (*m, 0)).collect();
    for entry in entries {
        *counts.entry(entry.mood).or_default() += 1;
    }
    counts
}

pub fn average_score(entries: &[MoodEntry]) -> Option<f64> {
    if entries.is_empty() {
        return None;
    }
    let total: u32 = entries.iter().map(|e| u32::from(e.mood.score())).sum();
    Some(f64::from(total) / entries.len() as f64)
}

/// Per-week averages in chronological order.
pub fn weekly_averages(entries: &[MoodEntry]) -> Vec<WeeklyAverage> {
    let mut weeks: BTreeMap<DayKey, (usize, u32)> = BTreeMap::new();
    for entry in entries {
        let slot = weeks.entry(entry.date.week_start()).or_default();
        slot.0 += 1;
        slot.1 += u32::from(entry.mood.score());
    }
    weeks
        .into_iter()
        .map(|(week_start, (count, total))| WeeklyAverage {
            week_start,
            entries: count,
            average: f64::from(total) / count as f64,
        })
        .collect()
}

/// Consecutive logged days ending at `today`, or at yesterday when today
/// has no entry yet.
pub fn current_streak(entries: &[MoodEntry], today: DayKey) -> u32 {
    let days: BTreeSet<DayKey> = entries.iter().map(|e| e.date).collect();
    let mut cursor = if days.contains(&today) {
        today
    } else {
        today.pred()
    };
    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        cursor = cursor.pred();
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, mood: Mood) -> MoodEntry {
        MoodEntry {
            id: date.to_string(),
            date: date.parse().unwrap(),
            mood,
            note: String::new(),
        }
    }

    #[test]
    fn empty_history() {
        assert_eq!(average_score(&[]), None);
        assert!(weekly_averages(&[]).is_empty());
        assert_eq!(distribution(&[]).values().sum::<usize>(), 0);
        assert_eq!(current_streak(&[], "2024-03-01".parse().unwrap()), 0);
    }

    #[test]
    fn distribution_and_average() {
        let entries = vec![
            entry("2024-03-01", Mood::Great),
            entry("2024-03-02", Mood::Great),
            entry("2024-03-03", Mood::Awful),
        ];
        let dist = distribution(&entries);
        assert_eq!(dist[&Mood::Great], 2);
        assert_eq!(dist[&Mood::Awful], 1);
        assert_eq!(dist[&Mood::Okay], 0);
        let avg = average_score(&entries).unwrap();
        assert!((avg - 11.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn weeks_start_on_monday() {
        // 2024-03-03 is a Sunday, 2024-03-04 a Monday.
        let entries = vec![
            entry("2024-03-03", Mood::Good),
            entry("2024-02-26", Mood::Bad),
            entry("2024-03-04", Mood::Okay),
        ];
        let weeks = weekly_averages(&entries);
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].week_start.to_string(), "2024-02-26");
        assert_eq!(weeks[0].entries, 2);
        assert!((weeks[0].average - 3.0).abs() < 1e-9);
        assert_eq!(weeks[1].week_start.to_string(), "2024-03-04");
    }

    #[test]
    fn streak_counts_back_from_today_or_yesterday() {
        let entries = vec![
            entry("2024-02-28", Mood::Good),
            entry("2024-02-29", Mood::Good),
            entry("2024-03-01", Mood::Good),
        ];
        assert_eq!(current_streak(&entries, "2024-03-01".parse().unwrap()), 3);
        assert_eq!(current_streak(&entries, "2024-03-02".parse().unwrap()), 3);
        assert_eq!(current_streak(&entries, "2024-03-03".parse().unwrap()), 0);
    }
}
