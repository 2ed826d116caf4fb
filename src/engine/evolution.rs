//! Current stage and the autoplay timeline.
//!
//! Autoplay is represented by an owned [`AutoplayTimer`]: holding one means
//! playing, dropping it cancels the schedule. The timer is polled from the
//! frame loop with the current `Instant`, so no background thread can mutate
//! the stage after teardown.

use std::time::{Duration, Instant};

use crate::stage::Stage;

/// Period between autoplay steps.
pub const AUTOPLAY_INTERVAL: Duration = Duration::from_millis(5000);

/// Recurring schedule handle. Only exists while autoplay is running.
#[derive(Debug)]
pub struct AutoplayTimer {
    next_fire: Instant,
    interval: Duration,
}

impl AutoplayTimer {
    pub fn start(now: Instant, interval: Duration) -> Self {
        Self {
            next_fire: now + interval,
            interval,
        }
    }

    /// Consume one due firing, if any.
    fn fire(&mut self, now: Instant) -> bool {
        if now >= self.next_fire {
            self.next_fire += self.interval;
            true
        } else {
            false
        }
    }

    /// Time left until the next firing.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next_fire.saturating_duration_since(now)
    }
}

/// Holds the current stage and drives autoplay.
#[derive(Debug)]
pub struct EvolutionController {
    stage: Stage,
    timer: Option<AutoplayTimer>,
    interval: Duration,
    pending_change: Option<Stage>,
}

impl Default for EvolutionController {
    fn default() -> Self {
        Self::new()
    }
}

impl EvolutionController {
    /// Start at the initial stage, paused. The initial stage counts as a
    /// change so the first advisory fact gets requested.
    pub fn new() -> Self {
        Self::with_interval(AUTOPLAY_INTERVAL)
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            stage: Stage::INITIAL,
            timer: None,
            interval,
            pending_change: Some(Stage::INITIAL),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_playing(&self) -> bool {
        self.timer.is_some()
    }

    /// Time until the next autoplay step, when playing.
    pub fn time_to_next_step(&self, now: Instant) -> Option<Duration> {
        self.timer.as_ref().map(|t| t.remaining(now))
    }

    /// Manual selection. Always stops autoplay, whatever the target.
    pub fn select_stage(&mut self, next: Stage) {
        if self.timer.take().is_some() {
            log::debug!("Autoplay cancelled by manual selection");
        }
        self.set_stage(next);
    }

    /// Start or stop autoplay. Starting from the terminal stage rewinds to
    /// the initial stage first.
    pub fn toggle_play(&mut self, now: Instant) {
        if self.timer.take().is_some() {
            log::debug!("Autoplay paused at {}", self.stage);
            return;
        }
        if self.stage.is_terminal() {
            self.set_stage(Stage::INITIAL);
        }
        self.timer = Some(AutoplayTimer::start(now, self.interval));
        log::debug!("Autoplay started at {}", self.stage);
    }

    /// Stop autoplay without touching the stage.
    pub fn stop(&mut self) {
        self.timer = None;
    }

    /// Apply every timer firing due at `now`. Returns how many fired.
    pub fn tick(&mut self, now: Instant) -> u32 {
        let mut fired = 0;
        while let Some(timer) = self.timer.as_mut() {
            if !timer.fire(now) {
                break;
            }
            fired += 1;
            match self.stage.next() {
                Some(next) => {
                    log::debug!("Autoplay step: {} -> {}", self.stage, next);
                    self.set_stage(next);
                    if next.is_terminal() {
                        self.timer = None;
                    }
                }
                // Fired while already at the end.
                None => self.timer = None,
            }
        }
        fired
    }

    /// The stage entered since the last call, if it changed.
    pub fn take_stage_change(&mut self) -> Option<Stage> {
        self.pending_change.take()
    }

    fn set_stage(&mut self, next: Stage) {
        if next != self.stage {
            self.stage = next;
            self.pending_change = Some(next);
        }
    }
}
