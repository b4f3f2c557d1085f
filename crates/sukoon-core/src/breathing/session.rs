//! Breathing session state machine.
//!
//! The session is driven purely by elapsed-time deltas: the caller passes
//! the milliseconds since the previous tick and the session advances
//! through as many phases as that covers.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!            |
//!            v
//!         Finished   (completed_cycles == target_cycles)
//! ```
//!
//! `reset()` returns to `Idle` from any state.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::pattern::{BreathingPattern, Phase};
use crate::error::BreathingError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Runtime state of one breathing exercise.
///
/// Progress is tracked as whole milliseconds into the current phase so
/// that overshoot carried across phase boundaries is exact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreathingSession {
    pattern: BreathingPattern,
    state: SessionState,
    phase: Phase,
    phase_elapsed_ms: u64,
    completed_cycles: u32,
    target_cycles: u32,
    duration_minutes: u32,
}

impl BreathingSession {
    /// Create an idle session for `pattern`.
    ///
    /// # Errors
    /// Returns `InvalidPattern` if every phase has zero duration.
    pub fn new(pattern: BreathingPattern) -> Result<Self, BreathingError> {
        pattern.validate()?;
        let phase = pattern.first_active_phase().unwrap_or(Phase::Inhale);
        Ok(Self {
            pattern,
            state: SessionState::Idle,
            phase,
            phase_elapsed_ms: 0,
            completed_cycles: 0,
            target_cycles: 0,
            duration_minutes: 0,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn pattern(&self) -> &BreathingPattern {
        &self.pattern
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    pub fn target_cycles(&self) -> u32 {
        self.target_cycles
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn phase_progress(&self) -> f64 {
        let total = self.pattern.phase_ms(self.phase);
        if total == 0 {
            return 0.0;
        }
        self.phase_elapsed_ms as f64 / total as f64
    }

    pub fn phase_remaining_ms(&self) -> u64 {
        self.pattern
            .phase_ms(self.phase)
            .saturating_sub(self.phase_elapsed_ms)
    }

    /// Relative size of the breathing guide: grows from 0.5 to 1.0 while
    /// inhaling, stays full during the first hold, shrinks while exhaling
    /// and stays small during the second hold.
    pub fn scale(&self) -> f64 {
        const MIN: f64 = 0.5;
        const MAX: f64 = 1.0;
        let p = self.phase_progress();
        match self.phase {
            Phase::Inhale => MIN + p * (MAX - MIN),
            Phase::HoldA => MAX,
            Phase::Exhale => MAX - p * (MAX - MIN),
            Phase::HoldB => MIN,
        }
    }

    pub fn snapshot(&self) -> Event {
        Event::BreathingSnapshot {
            state: self.state,
            pattern: self.pattern.name.clone(),
            phase: self.phase,
            instruction: self.phase.instruction().to_string(),
            phase_progress: self.phase_progress(),
            phase_remaining_ms: self.phase_remaining_ms(),
            completed_cycles: self.completed_cycles,
            target_cycles: self.target_cycles,
            scale: self.scale(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a fresh session lasting roughly `duration_minutes`.
    ///
    /// Any previous progress is discarded.
    pub fn start(&mut self, duration_minutes: u32) -> Event {
        self.rewind();
        self.duration_minutes = duration_minutes;
        self.target_cycles = self.pattern.target_cycles(duration_minutes);
        self.state = SessionState::Running;
        tracing::info!(
            pattern = %self.pattern.name,
            duration_minutes,
            target_cycles = self.target_cycles,
            "breathing session started"
        );
        Event::BreathingStarted {
            pattern: self.pattern.name.clone(),
            duration_minutes,
            target_cycles: self.target_cycles,
            at: Utc::now(),
        }
    }

    /// Replace the pattern and start in one step.
    ///
    /// # Errors
    /// Returns `InvalidPattern` and leaves the session untouched if the new
    /// pattern has no active phase.
    pub fn start_with(
        &mut self,
        pattern: BreathingPattern,
        duration_minutes: u32,
    ) -> Result<Event, BreathingError> {
        pattern.validate()?;
        self.pattern = pattern;
        Ok(self.start(duration_minutes))
    }

    /// Pause without discarding progress.
    pub fn stop(&mut self) -> Option<Event> {
        if self.state != SessionState::Running {
            return None;
        }
        self.state = SessionState::Paused;
        Some(Event::BreathingPaused {
            phase: self.phase,
            completed_cycles: self.completed_cycles,
            at: Utc::now(),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        if self.state != SessionState::Paused {
            return None;
        }
        self.state = SessionState::Running;
        Some(Event::BreathingResumed {
            phase: self.phase,
            completed_cycles: self.completed_cycles,
            at: Utc::now(),
        })
    }

    pub fn reset(&mut self) -> Event {
        self.rewind();
        self.state = SessionState::Idle;
        self.target_cycles = 0;
        Event::BreathingReset { at: Utc::now() }
    }

    /// Swap the pattern; the session is reset.
    ///
    /// # Errors
    /// Returns `InvalidPattern` and keeps the current pattern if the new one
    /// has no active phase.
    pub fn set_pattern(&mut self, pattern: BreathingPattern) -> Result<Event, BreathingError> {
        pattern.validate()?;
        self.pattern = pattern;
        Ok(self.reset())
    }

    /// Advance by `elapsed_ms`. Returns the events produced, in order.
    ///
    /// Does nothing unless the session is running. Overshoot past the end
    /// of a phase is carried into the following phase, so one call may
    /// cross several phases.
    pub fn tick(&mut self, elapsed_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        if self.state != SessionState::Running {
            return events;
        }

        self.phase_elapsed_ms = self.phase_elapsed_ms.saturating_add(elapsed_ms);
        loop {
            let phase_ms = self.pattern.phase_ms(self.phase);
            if self.phase_elapsed_ms < phase_ms {
                break;
            }
            self.phase_elapsed_ms -= phase_ms;

            let Some((next, wrapped)) = self.pattern.next_active_phase(self.phase) else {
                break;
            };
            let from = self.phase;
            self.phase = next;

            if wrapped {
                self.completed_cycles += 1;
                events.push(Event::CycleCompleted {
                    completed_cycles: self.completed_cycles,
                    target_cycles: self.target_cycles,
                    at: Utc::now(),
                });
                if self.completed_cycles >= self.target_cycles {
                    self.state = SessionState::Finished;
                    self.phase_elapsed_ms = 0;
                    tracing::info!(
                        completed_cycles = self.completed_cycles,
                        "breathing session finished"
                    );
                    events.push(Event::BreathingFinished {
                        completed_cycles: self.completed_cycles,
                        at: Utc::now(),
                    });
                    break;
                }
            }

            tracing::debug!(?from, to = ?next, "phase changed");
            events.push(Event::PhaseChanged {
                from,
                to: next,
                duration_secs: self.pattern.phase_secs(next),
                at: Utc::now(),
            });
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn rewind(&mut self) {
        self.phase = self.pattern.first_active_phase().unwrap_or(Phase::Inhale);
        self.phase_elapsed_ms = 0;
        self.completed_cycles = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase_changes(events: &[Event]) -> Vec<Phase> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::PhaseChanged { to, .. } => Some(*to),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn start_resets_counters() {
        let mut session = BreathingSession::new(BreathingPattern::box_breathing()).unwrap();
        assert_eq!(session.state(), SessionState::Idle);

        let event = session.start(1);
        assert!(matches!(event, Event::BreathingStarted { target_cycles: 4, .. }));
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.phase(), Phase::Inhale);
        assert_eq!(session.completed_cycles(), 0);
        assert_eq!(session.phase_progress(), 0.0);
    }

    #[test]
    fn invalid_pattern_never_runs() {
        let zero = BreathingPattern::new("zero", 0, 0, 0, 0);
        assert!(BreathingSession::new(zero.clone()).is_err());

        let mut session = BreathingSession::new(BreathingPattern::box_breathing()).unwrap();
        assert!(session.start_with(zero.clone(), 3).is_err());
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.set_pattern(zero).is_err());
        assert_eq!(session.pattern().name, "Box Breathing");
    }

    #[test]
    fn tick_accumulates_fractional_progress() {
        let mut session = BreathingSession::new(BreathingPattern::box_breathing()).unwrap();
        session.start(1);

        assert!(session.tick(1000).is_empty());
        assert!((session.phase_progress() - 0.25).abs() < 1e-9);
        assert_eq!(session.phase_remaining_ms(), 3000);
        assert!((session.scale() - 0.625).abs() < 1e-9);
    }

    #[test]
    fn overshoot_carries_into_next_phase() {
        let mut session = BreathingSession::new(BreathingPattern::four_seven_eight()).unwrap();
        session.start(3);

        let events = session.tick(4500);
        assert_eq!(phase_changes(&events), vec![Phase::HoldA]);
        assert_eq!(session.phase(), Phase::HoldA);
        assert_eq!(session.phase_remaining_ms(), 6500);
    }

    #[test]
    fn zero_hold_is_skipped() {
        let mut session = BreathingSession::new(BreathingPattern::four_seven_eight()).unwrap();
        session.start(3);

        let events = session.tick(19_000);
        assert_eq!(
            phase_changes(&events),
            vec![Phase::HoldA, Phase::Exhale, Phase::Inhale]
        );
        assert_eq!(session.completed_cycles(), 1);
    }

    #[test]
    fn box_pattern_runs_exactly_four_cycles_in_one_minute() {
        let mut session = BreathingSession::new(BreathingPattern::box_breathing()).unwrap();
        session.start(1);
        assert_eq!(session.target_cycles(), 4);

        // 60 fps for far longer than needed
        for _ in 0..(120 * 60) {
            session.tick(16);
        }
        assert!(session.is_finished());
        assert_eq!(session.completed_cycles(), 4);

        let before = (session.phase(), session.completed_cycles());
        assert!(session.tick(60_000).is_empty());
        assert_eq!((session.phase(), session.completed_cycles()), before);
    }

    #[test]
    fn single_large_tick_stops_at_target() {
        let mut session = BreathingSession::new(BreathingPattern::box_breathing()).unwrap();
        session.start(1);

        let events = session.tick(10 * 60 * 1000);
        assert!(matches!(events.last(), Some(Event::BreathingFinished { completed_cycles: 4, .. })));
        assert_eq!(session.completed_cycles(), 4);
        assert_eq!(session.phase_progress(), 0.0);
    }

    #[test]
    fn short_duration_still_runs_one_cycle() {
        let slow = BreathingPattern::new("slow", 60, 30, 60, 30);
        let mut session = BreathingSession::new(slow).unwrap();
        session.start(1);
        assert_eq!(session.target_cycles(), 1);

        assert!(session.tick(60_000).iter().all(|e| !matches!(e, Event::BreathingFinished { .. })));
        assert!(session.is_running());
        session.tick(120_000);
        assert!(session.is_finished());
        assert_eq!(session.completed_cycles(), 1);
    }

    #[test]
    fn stop_pauses_without_resetting() {
        let mut session = BreathingSession::new(BreathingPattern::box_breathing()).unwrap();
        session.start(1);
        session.tick(5000);

        assert!(session.stop().is_some());
        assert!(session.stop().is_none());
        assert!(session.tick(10_000).is_empty());
        assert_eq!(session.phase(), Phase::HoldA);
        assert_eq!(session.phase_remaining_ms(), 3000);

        assert!(session.resume().is_some());
        session.tick(3000);
        assert_eq!(session.phase(), Phase::Exhale);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut session = BreathingSession::new(BreathingPattern::box_breathing()).unwrap();
        session.start(1);
        session.tick(20_000);
        assert_eq!(session.completed_cycles(), 1);

        session.reset();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.phase(), Phase::Inhale);
        assert_eq!(session.completed_cycles(), 0);
        assert_eq!(session.phase_progress(), 0.0);
        assert!(session.tick(20_000).is_empty());
    }

    #[test]
    fn pattern_change_resets_session() {
        let mut session = BreathingSession::new(BreathingPattern::box_breathing()).unwrap();
        session.start(1);
        session.tick(6000);

        let event = session.set_pattern(BreathingPattern::relaxing_breath()).unwrap();
        assert!(matches!(event, Event::BreathingReset { .. }));
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.phase(), Phase::Inhale);
        assert_eq!(session.pattern().name, "Relaxing Breath");
    }

    #[test]
    fn session_starts_on_first_active_phase() {
        let pattern = BreathingPattern::new("hold first", 0, 2, 2, 0);
        let mut session = BreathingSession::new(pattern).unwrap();
        session.start(1);
        assert_eq!(session.phase(), Phase::HoldA);

        let events = session.tick(4000);
        assert_eq!(phase_changes(&events), vec![Phase::Exhale, Phase::HoldA]);
        assert_eq!(session.completed_cycles(), 1);
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut session = BreathingSession::new(BreathingPattern::box_breathing()).unwrap();
        session.start(2);
        session.tick(2000);
        match session.snapshot() {
            Event::BreathingSnapshot {
                state,
                instruction,
                phase_progress,
                target_cycles,
                ..
            } => {
                assert_eq!(state, SessionState::Running);
                assert_eq!(instruction, "Breathe In");
                assert!((phase_progress - 0.5).abs() < 1e-9);
                assert_eq!(target_cycles, 8);
            }
            other => panic!("Expected BreathingSnapshot, got {other:?}"),
        }
    }
}
