//! Heartbeat effect
//!
//! The whole strip pulses: fade up to the color, hold, fade back to black,
//! then rest. Pulses follow either the configured off delay or, in
//! wall-clock sync mode, every second whose Unix time is a multiple of the
//! sync period, so several devices pulse together.

use embassy_time::{Duration, Instant};

use super::{Effect, EffectContext, SyncMode};
use crate::OutputDriver;
use crate::color::{BLACK, Rgb};
use crate::error::Result;
use crate::fade::{Fade, FadeParams, FadeState};

/// How often a resting heartbeat re-checks whether to pulse.
pub const HEARTBEAT_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartbeatParams {
    /// Color at the top of a pulse
    pub color: Rgb,
    /// Hold time at full color
    pub on_delay: Duration,
    /// Minimum rest between two pulses (unsynchronised mode)
    pub off_delay: Duration,
    /// Fade up and fade down
    pub fade: FadeParams,
}

impl Default for HeartbeatParams {
    fn default() -> Self {
        Self {
            color: Rgb {
                r: 100,
                g: 100,
                b: 50,
            },
            on_delay: Duration::from_millis(300),
            off_delay: Duration::from_secs(10),
            fade: FadeParams::new(Duration::from_secs(2), 50),
        }
    }
}

#[derive(Debug, Clone)]
enum HeartbeatPhase<const N: usize> {
    Resting,
    Rising(Fade<N>),
    Holding { until: Instant },
    Falling(Fade<N>),
}

#[derive(Debug, Clone)]
pub struct HeartbeatEffect<const N: usize> {
    params: HeartbeatParams,
    phase: HeartbeatPhase<N>,
    next_check: Instant,
    last_pulse: Option<Instant>,
    last_synced_second: Option<u64>,
}

impl<const N: usize> HeartbeatEffect<N> {
    pub fn new(params: HeartbeatParams, now: Instant) -> Result<Self> {
        params.fade.validate()?;
        Ok(Self::begin(params, now))
    }

    pub(crate) fn begin(params: HeartbeatParams, now: Instant) -> Self {
        Self {
            params,
            phase: HeartbeatPhase::Resting,
            next_check: now,
            last_pulse: None,
            last_synced_second: None,
        }
    }

    pub const fn params(&self) -> &HeartbeatParams {
        &self.params
    }

    /// Whether a pulse is in progress.
    pub const fn is_pulsing(&self) -> bool {
        !matches!(self.phase, HeartbeatPhase::Resting)
    }

    /// End of the last completed pulse.
    pub const fn last_pulse(&self) -> Option<Instant> {
        self.last_pulse
    }

    fn is_due(&mut self, now: Instant, unix_seconds: u64, sync: SyncMode) -> bool {
        match sync {
            SyncMode::None => match self.last_pulse {
                None => true,
                Some(last) => now
                    .checked_duration_since(last)
                    .is_some_and(|rest| rest > self.params.off_delay),
            },
            SyncMode::WallClockPeriod(period) => {
                let aligned = period > 0 && unix_seconds % u64::from(period) == 0;
                // A short pulse must not fire twice within the same second.
                if aligned && self.last_synced_second != Some(unix_seconds) {
                    self.last_synced_second = Some(unix_seconds);
                    return true;
                }
                false
            }
        }
    }
}

impl<const N: usize> Effect<N> for HeartbeatEffect<N> {
    fn tick<O: OutputDriver>(&mut self, ctx: &mut EffectContext<'_, O, N>) {
        let now = ctx.now;
        match &mut self.phase {
            HeartbeatPhase::Resting => {
                if now < self.next_check {
                    return;
                }
                if !self.is_due(now, ctx.unix_seconds, ctx.sync) {
                    self.next_check = now + HEARTBEAT_POLL;
                    return;
                }
                let target = [self.params.color; N];
                let mut fade = Fade::begin(ctx.strip.colors(), target, self.params.fade, true, now);
                fade.tick(now, ctx.strip);
                self.phase = HeartbeatPhase::Rising(fade);
            }
            HeartbeatPhase::Rising(fade) => {
                if fade.tick(now, ctx.strip) == FadeState::Finished {
                    self.phase = HeartbeatPhase::Holding {
                        until: now + self.params.on_delay,
                    };
                }
            }
            HeartbeatPhase::Holding { until } => {
                if now < *until {
                    return;
                }
                let mut fade =
                    Fade::begin(ctx.strip.colors(), [BLACK; N], self.params.fade, true, now);
                fade.tick(now, ctx.strip);
                self.phase = HeartbeatPhase::Falling(fade);
            }
            HeartbeatPhase::Falling(fade) => {
                if fade.tick(now, ctx.strip) == FadeState::Finished {
                    self.last_pulse = Some(now);
                    self.next_check = now;
                    self.phase = HeartbeatPhase::Resting;
                }
            }
        }
    }

    fn next_deadline(&self) -> Instant {
        match &self.phase {
            HeartbeatPhase::Resting => self.next_check,
            HeartbeatPhase::Rising(fade) | HeartbeatPhase::Falling(fade) => fade.next_deadline(),
            HeartbeatPhase::Holding { until } => *until,
        }
    }
}
