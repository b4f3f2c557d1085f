//! Wall-clock driver for a [`BreathingSession`].
//!
//! Like the session it wraps, the timer has no internal thread. The host
//! calls [`BreathingTimer::poll`] from whatever periodic callback it has
//! (an animation frame, a tokio interval); the timer turns the time since
//! the previous poll into a `tick`.
//!
//! ```ignore
//! let mut timer = BreathingTimer::new(BreathingPattern::box_breathing(), SystemClock)?;
//! timer.subscribe(|event| println!("{event:?}"));
//! timer.start(3);
//! // In a loop:
//! timer.poll();
//! ```

use super::clock::Clock;
use super::pattern::BreathingPattern;
use super::session::BreathingSession;
use crate::error::BreathingError;
use crate::events::Event;
use crate::observer::{Subscribers, SubscriptionId};

#[derive(Debug)]
pub struct BreathingTimer<C: Clock> {
    session: BreathingSession,
    clock: C,
    /// Instant of the last flush; `None` whenever the session is not running.
    last_tick_ms: Option<u64>,
    listeners: Subscribers<Event>,
}

impl<C: Clock> BreathingTimer<C> {
    /// # Errors
    /// Returns `InvalidPattern` if every phase has zero duration.
    pub fn new(pattern: BreathingPattern, clock: C) -> Result<Self, BreathingError> {
        Ok(Self {
            session: BreathingSession::new(pattern)?,
            clock,
            last_tick_ms: None,
            listeners: Subscribers::new(),
        })
    }

    pub fn session(&self) -> &BreathingSession {
        &self.session
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

    pub fn start(&mut self, duration_minutes: u32) -> Event {
        let event = self.session.start(duration_minutes);
        self.last_tick_ms = Some(self.clock.now_ms());
        self.listeners.notify(&event);
        event
    }

    /// # Errors
    /// Returns `InvalidPattern`; the timer keeps its previous pattern and
    /// state.
    pub fn start_with(
        &mut self,
        pattern: BreathingPattern,
        duration_minutes: u32,
    ) -> Result<Event, BreathingError> {
        pattern.validate()?;
        self.session.set_pattern(pattern)?;
        Ok(self.start(duration_minutes))
    }

    /// Flush elapsed wall-clock time into the session.
    pub fn poll(&mut self) -> Vec<Event> {
        let Some(last) = self.last_tick_ms else {
            return Vec::new();
        };
        let now = self.clock.now_ms();
        let elapsed = now.saturating_sub(last);
        self.last_tick_ms = Some(now);

        let events = self.session.tick(elapsed);
        if !self.session.is_running() {
            self.last_tick_ms = None;
        }
        self.listeners.notify_all(&events);
        events
    }

    /// Pause. Time that passes before `resume` is not counted.
    pub fn stop(&mut self) -> Option<Event> {
        // Count time up to the pause before freezing.
        self.poll();
        self.last_tick_ms = None;
        let event = self.session.stop()?;
        self.listeners.notify(&event);
        Some(event)
    }

    pub fn resume(&mut self) -> Option<Event> {
        let event = self.session.resume()?;
        self.last_tick_ms = Some(self.clock.now_ms());
        self.listeners.notify(&event);
        Some(event)
    }

    pub fn reset(&mut self) -> Event {
        self.last_tick_ms = None;
        let event = self.session.reset();
        self.listeners.notify(&event);
        event
    }

    /// # Errors
    /// Returns `InvalidPattern` and keeps the current pattern.
    pub fn set_pattern(&mut self, pattern: BreathingPattern) -> Result<Event, BreathingError> {
        let event = self.session.set_pattern(pattern)?;
        self.last_tick_ms = None;
        self.listeners.notify(&event);
        Ok(event)
    }
}
