use serde::{Deserialize, Serialize};

use crate::error::BreathingError;

/// One stage of a breathing cycle, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Inhale,
    /// Hold after inhaling.
    HoldA,
    Exhale,
    /// Hold after exhaling.
    HoldB,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Inhale, Phase::HoldA, Phase::Exhale, Phase::HoldB];

    pub fn index(self) -> usize {
        match self {
            Phase::Inhale => 0,
            Phase::HoldA => 1,
            Phase::Exhale => 2,
            Phase::HoldB => 3,
        }
    }

    /// Text shown to the user while the phase is active.
    pub fn instruction(self) -> &'static str {
        match self {
            Phase::Inhale => "Breathe In",
            Phase::HoldA | Phase::HoldB => "Hold",
            Phase::Exhale => "Breathe Out",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathingPattern {
    pub name: String,
    pub inhale_secs: u32,
    pub hold_after_inhale_secs: u32,
    pub exhale_secs: u32,
    pub hold_after_exhale_secs: u32,
    #[serde(default)]
    pub description: String,
}

impl BreathingPattern {
    pub fn new(
        name: impl Into<String>,
        inhale_secs: u32,
        hold_after_inhale_secs: u32,
        exhale_secs: u32,
        hold_after_exhale_secs: u32,
    ) -> Self {
        Self {
            name: name.into(),
            inhale_secs,
            hold_after_inhale_secs,
            exhale_secs,
            hold_after_exhale_secs,
            description: String::new(),
        }
    }

    pub fn box_breathing() -> Self {
        Self {
            description: "Equal parts inhale, hold, exhale, and hold. Great for stress reduction and focus.".into(),
            ..Self::new("Box Breathing", 4, 4, 4, 4)
        }
    }

    pub fn four_seven_eight() -> Self {
        Self {
            description: "Inhale for 4, hold for 7, exhale for 8. Helps with anxiety and sleep.".into(),
            ..Self::new("4-7-8 Breathing", 4, 7, 8, 0)
        }
    }

    pub fn relaxing_breath() -> Self {
        Self {
            description: "Longer exhale than inhale helps activate the parasympathetic nervous system.".into(),
            ..Self::new("Relaxing Breath", 5, 2, 7, 0)
        }
    }

    pub fn presets() -> Vec<Self> {
        vec![
            Self::box_breathing(),
            Self::four_seven_eight(),
            Self::relaxing_breath(),
        ]
    }

    /// Look up a preset by display name or short slug (`box`, `4-7-8`,
    /// `relaxing`), ignoring case.
    pub fn preset(name: &str) -> Result<Self, BreathingError> {
        let wanted = slug(name);
        Self::presets()
            .into_iter()
            .find(|p| {
                let full = slug(&p.name);
                full == wanted
                    || full.split('-').next() == Some(wanted.as_str())
                    || full.strip_suffix("-breathing") == Some(wanted.as_str())
            })
            .ok_or_else(|| BreathingError::UnknownPattern(name.to_string()))
    }

    pub fn phase_secs(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Inhale => self.inhale_secs,
            Phase::HoldA => self.hold_after_inhale_secs,
            Phase::Exhale => self.exhale_secs,
            Phase::HoldB => self.hold_after_exhale_secs,
        }
    }

    pub fn phase_ms(&self, phase: Phase) -> u64 {
        u64::from(self.phase_secs(phase)).saturating_mul(1000)
    }

    pub fn is_active(&self, phase: Phase) -> bool {
        self.phase_secs(phase) > 0
    }

    /// Total length of one cycle in seconds.
    pub fn cycle_secs(&self) -> u64 {
        Phase::ALL
            .iter()
            .map(|&p| u64::from(self.phase_secs(p)))
            .sum()
    }

    pub fn cycle_ms(&self) -> u64 {
        self.cycle_secs().saturating_mul(1000)
    }

    /// # Errors
    /// Returns `InvalidPattern` when every phase is zero seconds long.
    pub fn validate(&self) -> Result<(), BreathingError> {
        if self.cycle_secs() == 0 {
            return Err(BreathingError::InvalidPattern {
                name: self.name.clone(),
            });
        }
        Ok(())
    }

    /// The phase a fresh cycle begins with.
    pub fn first_active_phase(&self) -> Option<Phase> {
        Phase::ALL.into_iter().find(|&p| self.is_active(p))
    }

    /// Next phase with a non-zero duration after `from`, and whether the
    /// move wrapped past the end of the cycle.
    pub fn next_active_phase(&self, from: Phase) -> Option<(Phase, bool)> {
        (1..=Phase::ALL.len()).find_map(|offset| {
            let raw = from.index() + offset;
            let candidate = Phase::ALL[raw % Phase::ALL.len()];
            self.is_active(candidate)
                .then_some((candidate, raw >= Phase::ALL.len()))
        })
    }

    /// Number of whole cycles that fit a session of `duration_minutes`,
    /// rounded to nearest and never less than one.
    pub fn target_cycles(&self, duration_minutes: u32) -> u32 {
        let cycle = self.cycle_secs();
        if cycle == 0 {
            return 1;
        }
        let cycles = (f64::from(duration_minutes) * 60.0 / cycle as f64).round();
        (cycles as u32).max(1)
    }
}

impl Default for BreathingPattern {
    fn default() -> Self {
        Self::box_breathing()
    }
}

fn slug(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
