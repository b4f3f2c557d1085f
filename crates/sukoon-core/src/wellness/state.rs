//! Observable wellness state for front ends.
//!
//! Holds the loaded mood and journal collections plus a dismissible notice,
//! and notifies subscribers with an [`Event`] after every change. A failed
//! save keeps the user's draft so it can be retried.

use chrono::Utc;

use super::day_key::DayKey;
use super::journal::JournalEntry;
use super::mood::{Mood, MoodEntry};
use super::store::{WellnessStore, JOURNAL_ENTRIES_KEY, MOOD_HISTORY_KEY};
use crate::error::{CoreError, StoreError};
use crate::events::Event;
use crate::observer::{Subscribers, SubscriptionId};
use crate::storage::KeyValueStore;

pub const MOOD_SAVED: &str = "Mood saved successfully!";
pub const MOOD_SAVE_FAILED: &str = "Error saving mood. Please try again.";
pub const JOURNAL_SAVED: &str = "Journal entry saved successfully!";
pub const JOURNAL_SAVE_FAILED: &str = "Error saving entry. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Feedback shown after a save, until dismissed or replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn success(message: &str) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.to_string(),
        }
    }

    fn error(message: &str) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodDraft {
    pub day: DayKey,
    pub mood: Mood,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalDraft {
    pub day: DayKey,
    pub title: String,
    pub content: String,
}

pub struct WellnessState<S: KeyValueStore> {
    store: WellnessStore<S>,
    moods: Vec<MoodEntry>,
    journal: Vec<JournalEntry>,
    notice: Option<Notice>,
    pending_mood: Option<MoodDraft>,
    pending_journal: Option<JournalDraft>,
    listeners: Subscribers<Event>,
}

impl<S: KeyValueStore> WellnessState<S> {
    /// Load both collections from `store`. Unreadable data loads as empty.
    pub fn load(store: WellnessStore<S>) -> Self {
        let moods = store.load_mood_history();
        let journal = store.load_journal_entries();
        tracing::debug!(moods = moods.len(), journal = journal.len(), "wellness state loaded");
        Self {
            store,
            moods,
            journal,
            notice: None,
            pending_mood: None,
            pending_journal: None,
            listeners: Subscribers::new(),
        }
    }

    pub fn store(&self) -> &WellnessStore<S> {
        &self.store
    }

    pub fn moods(&self) -> &[MoodEntry] {
        &self.moods
    }

    pub fn journal(&self) -> &[JournalEntry] {
        &self.journal
    }

    pub fn mood_for(&self, day: DayKey) -> Option<&MoodEntry> {
        self.moods.iter().find(|e| e.date == day)
    }

    pub fn journal_for(&self, day: DayKey) -> Option<&JournalEntry> {
        self.journal.iter().find(|e| e.date == day)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn pending_mood(&self) -> Option<&MoodDraft> {
        self.pending_mood.as_ref()
    }

    pub fn pending_journal(&self) -> Option<&JournalDraft> {
        self.pending_journal.as_ref()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Event) + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Save the mood for `day`, replacing any earlier one.
    ///
    /// # Errors
    /// Returns the store error; the collections are unchanged and the draft
    /// is kept for [`WellnessState::retry_pending`].
    pub fn save_mood(&mut self, day: DayKey, mood: Mood, note: &str) -> Result<(), StoreError> {
        match self.store.upsert_mood(day, mood, note) {
            Ok(moods) => {
                self.moods = moods;
                self.pending_mood = None;
                self.notice = Some(Notice::success(MOOD_SAVED));
                self.listeners.notify(&Event::MoodSaved {
                    date: day,
                    mood,
                    at: Utc::now(),
                });
                Ok(())
            }
            Err(e) => {
                self.pending_mood = Some(MoodDraft {
                    day,
                    mood,
                    note: note.to_string(),
                });
                self.fail(MOOD_HISTORY_KEY, MOOD_SAVE_FAILED, &e);
                Err(e)
            }
        }
    }

    /// # Errors
    /// Returns the store error; the collections are unchanged.
    pub fn delete_mood(&mut self, day: DayKey) -> Result<(), StoreError> {
        match self.store.delete_mood(day) {
            Ok(moods) => {
                self.moods = moods;
                self.listeners.notify(&Event::MoodDeleted {
                    date: day,
                    at: Utc::now(),
                });
                Ok(())
            }
            Err(e) => {
                self.fail(MOOD_HISTORY_KEY, MOOD_SAVE_FAILED, &e);
                Err(e)
            }
        }
    }

    /// Save the journal entry for `day`, replacing any earlier one.
    ///
    /// # Errors
    /// Returns `ValidationError::EmptyEntry` (no draft kept, nothing to
    /// retry) or the store error, in which case the draft is kept.
    pub fn save_journal(&mut self, day: DayKey, title: &str, content: &str) -> Result<(), CoreError> {
        match self.store.upsert_journal_entry(day, title, content) {
            Ok(entries) => {
                self.journal = entries;
                self.pending_journal = None;
                self.notice = Some(Notice::success(JOURNAL_SAVED));
                let title = self
                    .journal_for(day)
                    .map(|e| e.title.clone())
                    .unwrap_or_default();
                self.listeners.notify(&Event::JournalSaved {
                    date: day,
                    title,
                    at: Utc::now(),
                });
                Ok(())
            }
            Err(CoreError::Store(e)) => {
                self.pending_journal = Some(JournalDraft {
                    day,
                    title: title.to_string(),
                    content: content.to_string(),
                });
                self.fail(JOURNAL_ENTRIES_KEY, JOURNAL_SAVE_FAILED, &e);
                Err(e.into())
            }
            Err(e) => Err(e),
        }
    }

    /// # Errors
    /// Returns the store error; the collections are unchanged.
    pub fn delete_journal(&mut self, day: DayKey) -> Result<(), StoreError> {
        match self.store.delete_journal_entry(day) {
            Ok(entries) => {
                self.journal = entries;
                self.listeners.notify(&Event::JournalDeleted {
                    date: day,
                    at: Utc::now(),
                });
                Ok(())
            }
            Err(e) => {
                self.fail(JOURNAL_ENTRIES_KEY, JOURNAL_SAVE_FAILED, &e);
                Err(e)
            }
        }
    }

    /// Re-attempt any drafts left by failed saves. Returns how many were
    /// saved; a draft that fails again stays pending.
    ///
    /// # Errors
    /// Returns the first failure, after trying every pending draft.
    pub fn retry_pending(&mut self) -> Result<usize, CoreError> {
        let mut saved = 0;
        let mut first_err: Option<CoreError> = None;

        if let Some(draft) = self.pending_mood.clone() {
            match self.save_mood(draft.day, draft.mood, &draft.note) {
                Ok(()) => saved += 1,
                Err(e) => first_err = Some(e.into()),
            }
        }
        if let Some(draft) = self.pending_journal.clone() {
            match self.save_journal(draft.day, &draft.title, &draft.content) {
                Ok(()) => saved += 1,
                Err(e) => {
                    first_err.get_or_insert(e);
                }
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(saved),
        }
    }

    fn fail(&mut self, key: &str, message: &str, err: &StoreError) {
        self.notice = Some(Notice::error(message));
        self.listeners.notify(&Event::SaveFailed {
            key: key.to_string(),
            message: err.to_string(),
            at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::error::ValidationError;
    use crate::storage::MemoryStore;

    fn day(s: &str) -> DayKey {
        s.parse().unwrap()
    }

    fn recorder<S: KeyValueStore>(state: &mut WellnessState<S>) -> Rc<RefCell<Vec<&'static str>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        state.subscribe(move |e: &Event| sink.borrow_mut().push(e.kind()));
        seen
    }

    #[test]
    fn load_reads_existing_data() {
        let kv = MemoryStore::new();
        WellnessStore::new(&kv)
            .upsert_mood(day("2024-03-01"), Mood::Good, "")
            .unwrap();

        let state = WellnessState::load(WellnessStore::new(&kv));
        assert_eq!(state.moods().len(), 1);
        assert!(state.journal().is_empty());
        assert!(state.notice().is_none());
    }

    #[test]
    fn save_mood_updates_state_and_notifies() {
        let mut state = WellnessState::load(WellnessStore::new(MemoryStore::new()));
        let seen = recorder(&mut state);

        state.save_mood(day("2024-03-01"), Mood::Great, "").unwrap();
        state.save_mood(day("2024-03-01"), Mood::Okay, "meh").unwrap();

        assert_eq!(state.moods().len(), 1);
        assert_eq!(state.mood_for(day("2024-03-01")).unwrap().mood, Mood::Okay);
        assert_eq!(state.notice().unwrap().message, MOOD_SAVED);
        assert_eq!(*seen.borrow(), vec!["mood_saved", "mood_saved"]);

        state.dismiss_notice();
        assert!(state.notice().is_none());
    }

    #[test]
    fn failed_save_keeps_draft_and_retries() {
        let kv = MemoryStore::new();
        let mut state = WellnessState::load(WellnessStore::new(&kv));
        let seen = recorder(&mut state);

        kv.set_quota(Some(8));
        let err = state.save_mood(day("2024-03-01"), Mood::Bad, "rough").unwrap_err();
        assert!(err.is_write());
        assert!(state.moods().is_empty());
        assert_eq!(state.notice().unwrap().kind, NoticeKind::Error);
        assert_eq!(state.pending_mood().unwrap().note, "rough");

        let err = state
            .save_journal(day("2024-03-01"), "", "long day")
            .unwrap_err();
        assert!(matches!(err, CoreError::Store(_)));
        assert_eq!(state.notice().unwrap().message, JOURNAL_SAVE_FAILED);
        assert!(state.pending_journal().is_some());

        // Still failing: drafts survive.
        assert!(state.retry_pending().is_err());
        assert!(state.pending_mood().is_some());

        kv.set_quota(None);
        assert_eq!(state.retry_pending().unwrap(), 2);
        assert!(state.pending_mood().is_none());
        assert!(state.pending_journal().is_none());
        assert_eq!(state.moods().len(), 1);
        assert_eq!(
            state.journal()[0].title,
            "Journal Entry - Mar 1, 2024".to_string()
        );
        assert!(seen.borrow().contains(&"save_failed"));
        assert_eq!(seen.borrow().last(), Some(&"journal_saved"));
    }

    #[test]
    fn empty_journal_is_rejected_without_draft() {
        let mut state = WellnessState::load(WellnessStore::new(MemoryStore::new()));
        let err = state.save_journal(day("2024-03-01"), "", " ").unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::EmptyEntry)));
        assert!(state.pending_journal().is_none());
        assert!(state.notice().is_none());
    }

    #[test]
    fn deletes_notify() {
        let mut state = WellnessState::load(WellnessStore::new(MemoryStore::new()));
        state.save_mood(day("2024-03-01"), Mood::Good, "").unwrap();
        state.save_journal(day("2024-03-01"), "t", "c").unwrap();
        let seen = recorder(&mut state);

        state.delete_mood(day("2024-03-01")).unwrap();
        state.delete_journal(day("2024-03-01")).unwrap();
        assert!(state.moods().is_empty());
        assert!(state.journal().is_empty());
        assert_eq!(*seen.borrow(), vec!["mood_deleted", "journal_deleted"]);
    }

    #[test]
    fn retry_with_nothing_pending() {
        let mut state = WellnessState::load(WellnessStore::new(MemoryStore::new()));
        assert_eq!(state.retry_pending().unwrap(), 0);
    }
}
