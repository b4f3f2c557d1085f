//! One affirmation per calendar day, remembered in the key-value store.

use rand::seq::SliceRandom;

use crate::storage::KeyValueStore;
use crate::wellness::DayKey;

pub const DAILY_AFFIRMATION_KEY: &str = "dailyAffirmation";
pub const AFFIRMATION_DATE_KEY: &str = "affirmationDate";

pub const AFFIRMATIONS: [&str; 20] = [
    "I am worthy of love and respect.",
    "I trust myself to make the right decisions.",
    "I am in charge of how I feel today.",
    "I am grateful for everything I have in my life.",
    "I am enough just as I am.",
    "My potential is limitless, and I can achieve anything.",
    "I embrace challenges as opportunities to grow.",
    "I am becoming the best version of myself.",
    "I radiate positivity and attract positive energy.",
    "I am resilient and can overcome any obstacle.",
    "I deserve peace and happiness.",
    "My mind is clear, focused, and ready for today.",
    "I release all negative thoughts and welcome positivity.",
    "I am surrounded by supportive and loving people.",
    "I choose to be happy and content in this moment.",
    "I am proud of my progress, no matter how small.",
    "I am capable of amazing things.",
    "I am allowed to make mistakes and learn from them.",
    "I am at peace with my past and excited for my future.",
    "I am exactly where I need to be right now.",
];

pub struct AffirmationBook<S: KeyValueStore> {
    kv: S,
}

impl<S: KeyValueStore> AffirmationBook<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// The affirmation for `day`, picking and remembering a new one when
    /// none is stored for that day yet.
    pub fn today(&self, day: DayKey) -> String {
        if let Some(saved) = self.saved_for(day) {
            return saved;
        }
        let picked = pick(None);
        self.remember(day, picked);
        picked.to_string()
    }

    /// Replace the affirmation for `day` with a different one.
    pub fn refresh(&self, day: DayKey) -> String {
        let current = self.kv.get(DAILY_AFFIRMATION_KEY).ok().flatten();
        let picked = pick(current.as_deref());
        self.remember(day, picked);
        picked.to_string()
    }

    fn saved_for(&self, day: DayKey) -> Option<String> {
        let date = self.kv.get(AFFIRMATION_DATE_KEY).ok().flatten()?;
        if date != day.to_string() {
            return None;
        }
        self.kv
            .get(DAILY_AFFIRMATION_KEY)
            .ok()
            .flatten()
            .filter(|text| !text.trim().is_empty())
    }

    fn remember(&self, day: DayKey, text: &str) {
        let result = self
            .kv
            .set(DAILY_AFFIRMATION_KEY, text)
            .and_then(|()| self.kv.set(AFFIRMATION_DATE_KEY, &day.to_string()));
        if let Err(e) = result {
            tracing::warn!(error = %e, "could not store daily affirmation");
        }
    }
}

/// Random affirmation, avoiding `exclude` when another is available.
fn pick(exclude: Option<&str>) -> &'static str {
    let mut rng = rand::thread_rng();
    let candidates: Vec<&'static str> = AFFIRMATIONS
        .iter()
        .copied()
        .filter(|a| Some(*a) != exclude)
        .collect();
    candidates
        .choose(&mut rng)
        .or_else(|| AFFIRMATIONS.choose(&mut rng))
        .copied()
        .unwrap_or(AFFIRMATIONS[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn day(s: &str) -> DayKey {
        s.parse().unwrap()
    }

    #[test]
    fn same_day_returns_stored_affirmation() {
        let kv = MemoryStore::new();
        let book = AffirmationBook::new(&kv);
        let first = book.today(day("2024-03-01"));
        assert!(AFFIRMATIONS.contains(&first.as_str()));
        for _ in 0..10 {
            assert_eq!(book.today(day("2024-03-01")), first);
        }
        assert_eq!(
            kv.get(AFFIRMATION_DATE_KEY).unwrap().as_deref(),
            Some("2024-03-01")
        );
    }

    #[test]
    fn new_day_replaces_date() {
        let kv = MemoryStore::new();
        kv.set(DAILY_AFFIRMATION_KEY, "Old words.").unwrap();
        kv.set(AFFIRMATION_DATE_KEY, "2024-02-29").unwrap();

        let book = AffirmationBook::new(&kv);
        let text = book.today(day("2024-03-01"));
        assert!(AFFIRMATIONS.contains(&text.as_str()));
        assert_eq!(
            kv.get(AFFIRMATION_DATE_KEY).unwrap().as_deref(),
            Some("2024-03-01")
        );
    }

    #[test]
    fn refresh_picks_a_different_one() {
        let book = AffirmationBook::new(MemoryStore::new());
        let d = day("2024-03-01");
        let mut current = book.today(d);
        for _ in 0..20 {
            let next = book.refresh(d);
            assert_ne!(next, current);
            assert_eq!(book.today(d), next);
            current = next;
        }
    }

    #[test]
    fn write_failure_still_returns_an_affirmation() {
        let book = AffirmationBook::new(MemoryStore::with_quota(0));
        let text = book.today(day("2024-03-01"));
        assert!(AFFIRMATIONS.contains(&text.as_str()));
    }
}
