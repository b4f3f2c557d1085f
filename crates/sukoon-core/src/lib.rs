//! # Sukoon Core Library
//!
//! Core logic for the Sukoon wellness companion. Like the CLI that ships
//! with it, every operation works without a GUI: a front end only has to
//! drive the timer and subscribe to change notifications.
//!
//! ## Architecture
//!
//! - **Breathing Timer**: a four-phase cycle state machine advanced by
//!   explicit `tick(elapsed_ms)` calls; [`BreathingTimer`] derives those
//!   deltas from an injected [`Clock`]
//! - **Wellness Store**: day-keyed mood and journal entries persisted as
//!   whole JSON collections in a [`KeyValueStore`]
//! - **Storage**: SQLite-backed key-value store and TOML configuration
//! - **Chat**: passthrough to a text-generation API with an offline fallback
//!
//! ## Key Components
//!
//! - [`BreathingSession`]: pure phase/cycle state machine
//! - [`WellnessStore`]: mood and journal CRUD with last-write-wins per day
//! - [`WellnessState`]: state holder with change notifications and notices
//! - [`Config`]: application configuration management

pub mod affirmation;
pub mod breathing;
pub mod chat;
pub mod error;
pub mod events;
pub mod observer;
pub mod storage;
pub mod wellness;

pub use affirmation::AffirmationBook;
pub use breathing::{
    BreathingPattern, BreathingSession, BreathingTimer, Clock, ManualClock, Phase, SessionState,
    SystemClock,
};
pub use chat::{Assistant, Responder};
pub use error::{
    BreathingError, ChatError, ConfigError, CoreError, StoreError, ValidationError,
};
pub use events::Event;
pub use observer::{Subscribers, SubscriptionId};
pub use storage::{Config, KeyValueStore, MemoryStore, SqliteStore};
pub use wellness::{DayKey, JournalEntry, Mood, MoodEntry, WellnessState, WellnessStore};
