//! Mood tracking and journaling, keyed by calendar day.

mod day_key;
mod journal;
mod mood;
mod state;
mod store;
pub mod trends;

pub use day_key::DayKey;
pub use journal::{default_title, resolve_title, JournalEntry};
pub use mood::{Mood, MoodEntry};
pub use state::{
    JournalDraft, MoodDraft, Notice, NoticeKind, WellnessState, JOURNAL_SAVED,
    JOURNAL_SAVE_FAILED, MOOD_SAVED, MOOD_SAVE_FAILED,
};
pub use store::{WellnessStore, JOURNAL_ENTRIES_KEY, MOOD_HISTORY_KEY};
pub use trends::WeeklyAverage;
