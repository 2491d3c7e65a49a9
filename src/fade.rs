//! Stepped linear fades.
//!
//! Every fade in the crate goes through [`Fade`]: engine transitions and
//! the steps of the bounce and heartbeat effects.

use embassy_time::{Duration, Instant};

use crate::OutputDriver;
use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::strip::{LedStrip, PixelBuffer};

/// Duration and resolution of a fade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeParams {
    /// Total fade duration
    pub duration: Duration,
    /// Number of interpolation steps
    pub steps: u16,
}

impl FadeParams {
    pub const fn new(duration: Duration, steps: u16) -> Self {
        Self { duration, steps }
    }

    pub const fn validate(self) -> Result<Self> {
        if self.steps == 0 {
            return Err(Error::ZeroFadeSteps);
        }
        Ok(self)
    }

    /// Pause between two consecutive steps.
    pub fn step_period(self) -> Duration {
        self.duration / u32::from(self.steps.max(1))
    }
}

impl Default for FadeParams {
    fn default() -> Self {
        Self::new(Duration::from_millis(500), 50)
    }
}

/// Result of advancing a fade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeState {
    /// Nothing due yet
    Waiting,
    /// One step was written and flushed
    Stepped,
    /// All steps written and the trailing pause elapsed
    Finished,
}

/// Linear per-channel interpolation from the colors present when the fade
/// was created towards a target, written in `steps` discrete steps.
///
/// Step `k` writes `start + (target - start) * k / steps`, so the final step
/// lands exactly on the target and nothing accumulates between fades.
#[derive(Debug, Clone)]
pub struct Fade<const N: usize> {
    start: PixelBuffer<N>,
    target: PixelBuffer<N>,
    steps: u16,
    done: u16,
    period: Duration,
    next_step: Instant,
    breakable: bool,
}

impl<const N: usize> Fade<N> {
    /// Prepare a fade whose first step is due at `now`.
    pub fn new(
        start: &PixelBuffer<N>,
        target: PixelBuffer<N>,
        params: FadeParams,
        breakable: bool,
        now: Instant,
    ) -> Result<Self> {
        let params = params.validate()?;
        Ok(Self::begin(start, target, params, breakable, now))
    }

    /// Like [`Fade::new`] for parameters that were validated up front.
    pub(crate) fn begin(
        start: &PixelBuffer<N>,
        target: PixelBuffer<N>,
        params: FadeParams,
        breakable: bool,
        now: Instant,
    ) -> Self {
        Self {
            start: *start,
            target,
            steps: params.steps.max(1),
            done: 0,
            period: params.step_period(),
            next_step: now,
            breakable,
        }
    }

    /// Whether the owner may abandon this fade between steps.
    pub const fn is_breakable(&self) -> bool {
        self.breakable
    }

    pub const fn target(&self) -> &PixelBuffer<N> {
        &self.target
    }

    /// Steps written so far.
    pub const fn steps_done(&self) -> u16 {
        self.done
    }

    pub const fn next_deadline(&self) -> Instant {
        self.next_step
    }

    /// Write the next step if it is due. At most one step per call.
    pub fn tick<O: OutputDriver>(&mut self, now: Instant, strip: &mut LedStrip<O, N>) -> FadeState {
        if now < self.next_step {
            return FadeState::Waiting;
        }
        if self.done >= self.steps {
            return FadeState::Finished;
        }

        self.done += 1;
        let mut colors = self.start;
        for (color, target) in colors.iter_mut().zip(self.target.iter()) {
            *color = interpolate(*color, *target, self.done, self.steps);
        }
        strip.set_all(&colors);
        strip.flush();

        self.next_step = now + self.period;
        FadeState::Stepped
    }
}

fn interpolate(start: Rgb, target: Rgb, step: u16, steps: u16) -> Rgb {
    Rgb {
        r: lerp_channel(start.r, target.r, step, steps),
        g: lerp_channel(start.g, target.g, step, steps),
        b: lerp_channel(start.b, target.b, step, steps),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lerp_channel(start: u8, target: u8, step: u16, steps: u16) -> u8 {
    if step >= steps {
        return target;
    }
    let start = f32::from(start);
    let delta = f32::from(target) - start;
    let value = start + delta * f32::from(step) / f32::from(steps);
    libm::roundf(value).clamp(0.0, 255.0) as u8
}
