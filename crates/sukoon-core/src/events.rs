use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::breathing::{Phase, SessionState};
use crate::wellness::{DayKey, Mood};

/// Every state change in the system produces an Event.
/// Front ends subscribe to them; the CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    BreathingStarted {
        pattern: String,
        duration_minutes: u32,
        target_cycles: u32,
        at: DateTime<Utc>,
    },
    BreathingPaused {
        phase: Phase,
        completed_cycles: u32,
        at: DateTime<Utc>,
    },
    BreathingResumed {
        phase: Phase,
        completed_cycles: u32,
        at: DateTime<Utc>,
    },
    PhaseChanged {
        from: Phase,
        to: Phase,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    CycleCompleted {
        completed_cycles: u32,
        target_cycles: u32,
        at: DateTime<Utc>,
    },
    /// Target cycle count reached; the session no longer advances.
    BreathingFinished {
        completed_cycles: u32,
        at: DateTime<Utc>,
    },
    BreathingReset {
        at: DateTime<Utc>,
    },
    BreathingSnapshot {
        state: SessionState,
        pattern: String,
        phase: Phase,
        instruction: String,
        phase_progress: f64,
        phase_remaining_ms: u64,
        completed_cycles: u32,
        target_cycles: u32,
        scale: f64,
        at: DateTime<Utc>,
    },
    MoodSaved {
        date: DayKey,
        mood: Mood,
        at: DateTime<Utc>,
    },
    MoodDeleted {
        date: DayKey,
        at: DateTime<Utc>,
    },
    JournalSaved {
        date: DayKey,
        title: String,
        at: DateTime<Utc>,
    },
    JournalDeleted {
        date: DayKey,
        at: DateTime<Utc>,
    },
    /// A write to the local store failed; the caller's draft is retained.
    SaveFailed {
        key: String,
        message: String,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short tag used for log lines and CLI filtering.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::BreathingStarted { .. } => "breathing_started",
            Event::BreathingPaused { .. } => "breathing_paused",
            Event::BreathingResumed { .. } => "breathing_resumed",
            Event::PhaseChanged { .. } => "phase_changed",
            Event::CycleCompleted { .. } => "cycle_completed",
            Event::BreathingFinished { .. } => "breathing_finished",
            Event::BreathingReset { .. } => "breathing_reset",
            Event::BreathingSnapshot { .. } => "breathing_snapshot",
            Event::MoodSaved { .. } => "mood_saved",
            Event::MoodDeleted { .. } => "mood_deleted",
            Event::JournalSaved { .. } => "journal_saved",
            Event::JournalDeleted { .. } => "journal_deleted",
            Event::SaveFailed { .. } => "save_failed",
        }
    }
}
