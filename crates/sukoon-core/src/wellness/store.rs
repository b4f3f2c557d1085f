//! Day-keyed mood and journal persistence over a [`KeyValueStore`].
//!
//! Each collection lives in one JSON blob. Every mutation reads the whole
//! blob, edits it and writes it back; there is no partial update and no
//! coordination between processes, so concurrent writers race under
//! last-write-wins at collection granularity.

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use super::day_key::DayKey;
use super::journal::{resolve_title, JournalEntry};
use super::mood::{Mood, MoodEntry};
use crate::error::{CoreError, StoreError, ValidationError};
use crate::storage::KeyValueStore;

pub const MOOD_HISTORY_KEY: &str = "moodHistory";
pub const JOURNAL_ENTRIES_KEY: &str = "journalEntries";

pub struct WellnessStore<S: KeyValueStore> {
    kv: S,
}

impl<S: KeyValueStore> WellnessStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    // ── Mood ─────────────────────────────────────────────────────────

    /// All stored mood entries. Never fails: unreadable data is logged
    /// and treated as an empty history.
    pub fn load_mood_history(&self) -> Vec<MoodEntry> {
        self.load_collection(MOOD_HISTORY_KEY)
    }

    pub fn mood_for(&self, day: DayKey) -> Option<MoodEntry> {
        self.load_mood_history().into_iter().find(|e| e.date == day)
    }

    /// Replace whatever is stored for `day` with a new entry.
    ///
    /// # Errors
    /// Returns `StoreError::Write` if the collection cannot be saved, or a
    /// backend error if it cannot be read at all.
    pub fn upsert_mood(
        &self,
        day: DayKey,
        mood: Mood,
        note: &str,
    ) -> Result<Vec<MoodEntry>, StoreError> {
        let mut history: Vec<MoodEntry> = self.read_collection(MOOD_HISTORY_KEY)?;
        history.retain(|e| e.date != day);
        history.push(MoodEntry {
            id: Uuid::new_v4().to_string(),
            date: day,
            mood,
            note: note.to_string(),
        });
        self.write_collection(MOOD_HISTORY_KEY, &history)?;
        tracing::info!(%day, %mood, "mood saved");
        Ok(history)
    }

    /// Remove the entry for `day`, if any.
    ///
    /// # Errors
    /// Same as [`WellnessStore::upsert_mood`].
    pub fn delete_mood(&self, day: DayKey) -> Result<Vec<MoodEntry>, StoreError> {
        let mut history: Vec<MoodEntry> = self.read_collection(MOOD_HISTORY_KEY)?;
        let before = history.len();
        history.retain(|e| e.date != day);
        if history.len() != before {
            self.write_collection(MOOD_HISTORY_KEY, &history)?;
            tracing::info!(%day, "mood deleted");
        }
        Ok(history)
    }

    // ── Journal ──────────────────────────────────────────────────────

    /// All stored journal entries. Never fails, like
    /// [`WellnessStore::load_mood_history`].
    pub fn load_journal_entries(&self) -> Vec<JournalEntry> {
        self.load_collection(JOURNAL_ENTRIES_KEY)
    }

    pub fn journal_for(&self, day: DayKey) -> Option<JournalEntry> {
        self.load_journal_entries()
            .into_iter()
            .find(|e| e.date == day)
    }

    /// Replace whatever is stored for `day`. A blank title becomes
    /// `Journal Entry - <date>`; an existing entry for the day keeps its id.
    ///
    /// # Errors
    /// Returns `ValidationError::EmptyEntry` if both title and content are
    /// blank, otherwise the store errors of [`WellnessStore::upsert_mood`].
    pub fn upsert_journal_entry(
        &self,
        day: DayKey,
        title: &str,
        content: &str,
    ) -> Result<Vec<JournalEntry>, CoreError> {
        if title.trim().is_empty() && content.trim().is_empty() {
            return Err(ValidationError::EmptyEntry.into());
        }

        let mut entries: Vec<JournalEntry> = self.read_collection(JOURNAL_ENTRIES_KEY)?;
        let id = entries
            .iter()
            .find(|e| e.date == day)
            .map(|e| e.id.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        entries.retain(|e| e.date != day);

        let entry = JournalEntry {
            id,
            date: day,
            title: resolve_title(day, title),
            content: content.to_string(),
        };
        tracing::info!(%day, title = %entry.title, "journal entry saved");
        entries.push(entry);
        self.write_collection(JOURNAL_ENTRIES_KEY, &entries)?;
        Ok(entries)
    }

    /// # Errors
    /// Same as [`WellnessStore::delete_mood`].
    pub fn delete_journal_entry(&self, day: DayKey) -> Result<Vec<JournalEntry>, StoreError> {
        let mut entries: Vec<JournalEntry> = self.read_collection(JOURNAL_ENTRIES_KEY)?;
        let before = entries.len();
        entries.retain(|e| e.date != day);
        if entries.len() != before {
            self.write_collection(JOURNAL_ENTRIES_KEY, &entries)?;
            tracing::info!(%day, "journal entry deleted");
        }
        Ok(entries)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.read_collection(key).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "could not read collection, using empty list");
            Vec::new()
        })
    }

    /// Missing or corrupt blobs read as empty; only backend failures error,
    /// so a transient read problem never leads to overwriting good data.
    fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        let Some(raw) = self.kv.get(key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding unparseable collection");
                Ok(Vec::new())
            }
        }
    }

    fn write_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(items).map_err(|e| StoreError::Write {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.kv.set(key, &raw).inspect_err(|e| {
            tracing::error!(key, error = %e, "failed to persist collection");
        })
    }
}
