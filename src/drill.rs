//! Drill session controller.
//!
//! A session walks the archer through `arrows` repetitions of
//! Preparation -> Hold -> Decision and finishes in `Complete`, or in
//! `Aborted` when the user stops early.
//!
//! ```text
//! Preparation -> Hold -> Decision -+-> Preparation (next arrow)
//!                                  +-> Complete    (last arrow)
//! any non-terminal phase --abort--> Aborted
//! ```
//!
//! The controller owns no timer. The caller measures wall-clock time and
//! feeds it to [`DrillSession::tick`]; a late tick finishes the current
//! phase but never spills over into the next one.

use std::time::Duration;

use chrono::Local;
use rand::Rng;

use crate::announcer::{Announcer, Cue};
use crate::error::DrillError;
use crate::session::{Decision, DrillConfig, DrillResult, DrillSnapshot, Phase};

/// How long a command stays on screen before the next arrow
pub const ANNOUNCEMENT_HOLD: Duration = Duration::from_secs(2);

/// Hold countdowns at or below this are treated as finished
pub const HOLD_EPSILON: Duration = Duration::from_millis(5);

/// What a single tick produced
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The session is still running; here is the state to display
    Running(DrillSnapshot),
    /// This tick finished the last arrow
    Completed(Vec<DrillResult>),
    /// The session had already ended; nothing changed
    Ignored,
}

/// Runs one drill. Not reused across sessions.
pub struct DrillSession<A: Announcer, R: Rng> {
    config: DrillConfig,
    announcer: A,
    rng: R,
    phase: Phase,
    arrow: u32,
    remaining: Duration,
    last_decision: Option<Decision>,
    results: Vec<DrillResult>,
}

impl<A: Announcer, R: Rng> DrillSession<A, R> {
    /// Validate `config` and begin the first preparation countdown.
    pub fn start(config: DrillConfig, announcer: A, rng: R) -> Result<Self, DrillError> {
        config.validate()?;

        let mut session = Self {
            config,
            announcer,
            rng,
            phase: Phase::Preparation,
            arrow: 1,
            remaining: config.prep_duration(),
            last_decision: None,
            results: Vec::with_capacity(config.arrows as usize),
        };
        log::info!(
            "drill started: {} arrows, prep {}s, hold {}s, shoot {}%",
            config.arrows,
            config.prep_secs,
            config.hold_secs,
            config.shoot_percent
        );
        session.announcer.announce(Cue::Preparation(1));
        Ok(session)
    }

    pub fn config(&self) -> &DrillConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn arrow(&self) -> u32 {
        self.arrow
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn last_decision(&self) -> Option<Decision> {
        self.last_decision
    }

    pub fn results(&self) -> &[DrillResult] {
        &self.results
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn announcer(&self) -> &A {
        &self.announcer
    }

    pub fn announcer_mut(&mut self) -> &mut A {
        &mut self.announcer
    }

    pub fn snapshot(&self) -> DrillSnapshot {
        DrillSnapshot {
            phase: self.phase,
            remaining: self.remaining,
            arrow: self.arrow,
            arrows: self.config.arrows,
            last_decision: self.last_decision,
        }
    }

    /// Advance the active countdown by `elapsed`, performing at most one
    /// phase transition.
    pub fn tick(&mut self, elapsed: Duration) -> TickOutcome {
        if self.phase.is_terminal() {
            return TickOutcome::Ignored;
        }

        self.remaining = self.remaining.saturating_sub(elapsed);

        match self.phase {
            Phase::Preparation if self.remaining.is_zero() => self.enter_hold(),
            Phase::Hold if self.remaining <= HOLD_EPSILON => self.enter_decision(),
            Phase::Decision if self.remaining.is_zero() => {
                if self.arrow >= self.config.arrows {
                    self.phase = Phase::Complete;
                    log::info!("drill complete: {} results", self.results.len());
                    return TickOutcome::Completed(self.results.clone());
                }
                self.next_arrow();
            }
            _ => {}
        }

        TickOutcome::Running(self.snapshot())
    }

    /// Stop the session now and hand back every committed decision.
    ///
    /// Calling this on a finished session changes nothing and returns the
    /// same log.
    pub fn abort(&mut self) -> Vec<DrillResult> {
        if !self.phase.is_terminal() {
            log::info!(
                "drill aborted at arrow {} during {}; {} decisions kept",
                self.arrow,
                self.phase,
                self.results.len()
            );
            self.phase = Phase::Aborted;
            // drop any pending countdown so nothing can fire later
            self.remaining = Duration::ZERO;
        }
        self.results.clone()
    }

    /// Consume the session, handing back its result log together with the
    /// announcer and random source it borrowed for the drill
    pub fn into_parts(self) -> (Vec<DrillResult>, A, R) {
        (self.results, self.announcer, self.rng)
    }

    fn enter_hold(&mut self) {
        log::debug!("arrow {}: preparation -> hold", self.arrow);
        self.phase = Phase::Hold;
        self.remaining = self.config.hold_duration();
        self.announcer.announce(Cue::Hold);
    }

    fn enter_decision(&mut self) {
        let decision = self.draw_decision();
        log::debug!("arrow {}: hold -> decision ({decision})", self.arrow);

        self.phase = Phase::Decision;
        self.remaining = ANNOUNCEMENT_HOLD;
        self.last_decision = Some(decision);

        // one record per arrow, however often the decision phase is entered
        let already_recorded = self
            .results
            .last()
            .is_some_and(|r| r.arrow == self.arrow);
        if !already_recorded {
            self.results.push(DrillResult {
                arrow: self.arrow,
                decision,
                timestamp: Local::now(),
            });
        }

        self.announcer.announce(Cue::Decision(decision));
    }

    fn next_arrow(&mut self) {
        self.arrow += 1;
        log::debug!("decision -> preparation for arrow {}", self.arrow);
        self.phase = Phase::Preparation;
        self.remaining = self.config.prep_duration();
        self.last_decision = None;
        self.announcer.announce(Cue::Preparation(self.arrow));
    }

    fn draw_decision(&mut self) -> Decision {
        let r: u32 = self.rng.gen_range(0..100);
        if r < self.config.shoot_percent {
            Decision::Shoot
        } else {
            Decision::LetDown
        }
    }
}
