use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local};
use itertools::Itertools;

use crate::error::DrillError;

/// Settings for one drill. Immutable once a session has started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrillConfig {
    pub prep_secs: u32,
    pub hold_secs: f64,
    pub shoot_percent: u32,
    pub arrows: u32,
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            prep_secs: 10,
            hold_secs: 4.0,
            shoot_percent: 70,
            arrows: 6,
        }
    }
}

impl DrillConfig {
    /// Check every field against its allowed range. Values are never clamped.
    pub fn validate(&self) -> Result<(), DrillError> {
        if self.prep_secs < 1 {
            return Err(DrillError::invalid("prep_secs", "must be at least 1"));
        }
        if !self.hold_secs.is_finite() || self.hold_secs < 0.0 {
            return Err(DrillError::invalid(
                "hold_secs",
                format!("must be a non-negative number of seconds, got {}", self.hold_secs),
            ));
        }
        if Duration::try_from_secs_f64(self.hold_secs).is_err() {
            return Err(DrillError::invalid(
                "hold_secs",
                format!("is too long to time, got {}", self.hold_secs),
            ));
        }
        if self.shoot_percent > 100 {
            return Err(DrillError::invalid(
                "shoot_percent",
                format!("must be between 0 and 100, got {}", self.shoot_percent),
            ));
        }
        if self.arrows < 1 {
            return Err(DrillError::invalid("arrows", "must be at least 1"));
        }
        Ok(())
    }

    pub fn prep_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.prep_secs))
    }

    /// Hold length; zero for a value `validate` would reject.
    pub fn hold_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.hold_secs).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Shoot,
    LetDown,
}

impl Decision {
    /// Text shown on screen when the command is given
    pub fn headline(&self) -> &'static str {
        match self {
            Decision::Shoot => "SHOOT!",
            Decision::LetDown => "LET DOWN!",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Shoot => write!(f, "SHOOT"),
            Decision::LetDown => write!(f, "LET DOWN"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Preparation,
    Hold,
    Decision,
    Complete,
    Aborted,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Complete | Phase::Aborted)
    }
}

/// One committed command. Created when an arrow enters the decision phase.
#[derive(Debug, Clone, PartialEq)]
pub struct DrillResult {
    pub arrow: u32,
    pub decision: Decision,
    pub timestamp: DateTime<Local>,
}

/// What the presentation layer sees after every tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrillSnapshot {
    pub phase: Phase,
    pub remaining: Duration,
    pub arrow: u32,
    pub arrows: u32,
    pub last_decision: Option<Decision>,
}

impl DrillSnapshot {
    /// Whole seconds left, rounded up the way a countdown is read aloud.
    pub fn remaining_whole_secs(&self) -> u64 {
        let millis = self.remaining.as_millis() as u64;
        millis.div_ceil(1000)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultSummary {
    pub shots: usize,
    pub let_downs: usize,
}

impl ResultSummary {
    pub fn from_results(results: &[DrillResult]) -> Self {
        let counts = results.iter().map(|r| r.decision).counts();
        Self {
            shots: counts.get(&Decision::Shoot).copied().unwrap_or(0),
            let_downs: counts.get(&Decision::LetDown).copied().unwrap_or(0),
        }
    }

    pub fn total(&self) -> usize {
        self.shots + self.let_downs
    }
}
