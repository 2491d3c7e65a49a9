//! Cancel-and-replace one-shot deadlines.
//!
//! A [`OneShot`] holds at most one pending deadline. Scheduling again
//! supersedes the previous deadline and bumps a generation counter, so a
//! superseded deadline can never fire. The owner polls it from its tick.

use embassy_time::{Duration, Instant};

/// Identifies one scheduling of a [`OneShot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerToken(u32);

/// Single outstanding deferred action.
#[derive(Debug, Clone, Default)]
pub struct OneShot {
    pending: Option<(Instant, TimerToken)>,
    generation: u32,
}

impl OneShot {
    pub const fn new() -> Self {
        Self {
            pending: None,
            generation: 0,
        }
    }

    /// Arm the timer for `at`, discarding any pending deadline.
    pub fn schedule(&mut self, at: Instant) -> TimerToken {
        self.generation = self.generation.wrapping_add(1);
        let token = TimerToken(self.generation);
        self.pending = Some((at, token));
        token
    }

    /// Arm the timer `delay` after `now`.
    pub fn schedule_after(&mut self, now: Instant, delay: Duration) -> TimerToken {
        self.schedule(now + delay)
    }

    /// Disarm the timer. Returns the token that was pending, if any.
    pub fn cancel(&mut self) -> Option<TimerToken> {
        self.pending.take().map(|(_, token)| token)
    }

    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(at, _)| at)
    }

    /// Whether `token` is the one currently armed.
    pub fn is_current(&self, token: TimerToken) -> bool {
        matches!(self.pending, Some((_, pending)) if pending == token)
    }

    /// Fire the timer if its deadline has passed.
    ///
    /// Returns the fired token exactly once per scheduling.
    pub fn poll(&mut self, now: Instant) -> Option<TimerToken> {
        match self.pending {
            Some((at, token)) if now >= at => {
                self.pending = None;
                Some(token)
            }
            _ => None,
        }
    }
}
