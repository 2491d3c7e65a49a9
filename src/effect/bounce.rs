//! Bouncing dot effect
//!
//! A bright pixel with half-brightness neighbours runs back and forth along
//! the strip. Each position is reached through a short breakable fade.

use embassy_time::{Duration, Instant};

use super::{Effect, EffectContext};
use crate::OutputDriver;
use crate::color::{BLACK, Rgb, half};
use crate::error::Result;
use crate::fade::{Fade, FadeParams, FadeState};
use crate::strip::PixelBuffer;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BounceParams {
    /// Color of the dot
    pub color: Rgb,
    /// Pause between two positions
    pub delay: Duration,
    /// Fade from one position to the next
    pub fade: FadeParams,
}

impl Default for BounceParams {
    fn default() -> Self {
        Self {
            color: Rgb {
                r: 255,
                g: 100,
                b: 0,
            },
            delay: Duration::from_millis(0),
            fade: FadeParams::new(Duration::from_millis(10), 10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone)]
enum BouncePhase<const N: usize> {
    Waiting { until: Instant },
    Fading(Fade<N>),
}

#[derive(Debug, Clone)]
pub struct BounceEffect<const N: usize> {
    params: BounceParams,
    index: usize,
    direction: Direction,
    phase: BouncePhase<N>,
}

impl<const N: usize> BounceEffect<N> {
    pub fn new(params: BounceParams, now: Instant) -> Result<Self> {
        params.fade.validate()?;
        Ok(Self::begin(params, now))
    }

    pub(crate) fn begin(params: BounceParams, now: Instant) -> Self {
        Self {
            params,
            index: 0,
            direction: Direction::Forward,
            phase: BouncePhase::Waiting { until: now },
        }
    }

    pub const fn params(&self) -> &BounceParams {
        &self.params
    }

    /// Current position of the dot.
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Target colors for the current position, drawn over `base`.
    ///
    /// Positions past either end are clamped onto the edge pixel, with the
    /// dot itself written last.
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn window(&self, base: &PixelBuffer<N>) -> PixelBuffer<N> {
        let mut colors = *base;
        if N == 0 {
            return colors;
        }
        let last = (N - 1) as isize;
        let center = self.index as isize;
        let at = |offset: isize| (center + offset).clamp(0, last) as usize;

        let dimmed = half(self.params.color);
        colors[at(-2)] = BLACK;
        colors[at(2)] = BLACK;
        colors[at(-1)] = dimmed;
        colors[at(1)] = dimmed;
        colors[self.index] = self.params.color;
        colors
    }

    fn advance(&mut self) {
        if N < 2 {
            return;
        }
        self.index = match self.direction {
            Direction::Forward => self.index + 1,
            Direction::Backward => self.index - 1,
        };
        if self.index == 0 || self.index == N - 1 {
            self.direction = match self.direction {
                Direction::Forward => Direction::Backward,
                Direction::Backward => Direction::Forward,
            };
        }
    }
}

impl<const N: usize> Effect<N> for BounceEffect<N> {
    fn tick<O: OutputDriver>(&mut self, ctx: &mut EffectContext<'_, O, N>) {
        if N == 0 {
            return;
        }
        let now = ctx.now;

        if let BouncePhase::Fading(fade) = &mut self.phase {
            if fade.tick(now, ctx.strip) != FadeState::Finished {
                return;
            }
            self.advance();
            self.phase = BouncePhase::Waiting {
                until: now + self.params.delay,
            };
        }

        if let BouncePhase::Waiting { until } = self.phase {
            if now < until {
                return;
            }
            let target = self.window(ctx.strip.colors());
            let mut fade = Fade::begin(ctx.strip.colors(), target, self.params.fade, true, now);
            fade.tick(now, ctx.strip);
            self.phase = BouncePhase::Fading(fade);
        }
    }

    fn next_deadline(&self) -> Instant {
        match &self.phase {
            BouncePhase::Waiting { until } => *until,
            BouncePhase::Fading(fade) => fade.next_deadline(),
        }
    }
}
