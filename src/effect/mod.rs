//! Looped background animations
//!
//! Each effect is a state machine advanced by the engine's tick. Effects
//! are stored in an enum to avoid heap allocations; the engine keeps at
//! most one alive and drops it once it has been stopped.

mod bounce;
mod heartbeat;

use embassy_time::Instant;

pub use bounce::{BounceEffect, BounceParams};
pub use heartbeat::{HEARTBEAT_POLL, HeartbeatEffect, HeartbeatParams};

use crate::OutputDriver;
use crate::error::{Error, Result};
use crate::strip::LedStrip;

const EFFECT_NAME_BOUNCE: &str = "bounce";
const EFFECT_NAME_HEARTBEAT: &str = "heartbeat";

/// Everything an effect sees while it runs one tick.
pub struct EffectContext<'s, O: OutputDriver, const N: usize> {
    /// Monotonic time of this tick
    pub now: Instant,
    /// Wall-clock time of this tick, whole seconds since the Unix epoch
    pub unix_seconds: u64,
    /// Current synchronisation mode
    pub sync: SyncMode,
    /// Strip the effect draws on
    pub strip: &'s mut LedStrip<O, N>,
}

pub trait Effect<const N: usize> {
    /// Advance the animation. Writes at most one fade step.
    fn tick<O: OutputDriver>(&mut self, ctx: &mut EffectContext<'_, O, N>);

    /// When the effect next needs to run.
    fn next_deadline(&self) -> Instant;
}

/// How periodic effects decide when to fire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncMode {
    /// Fire on the effect's own elapsed-time schedule
    #[default]
    None,
    /// Fire when `floor(unix_seconds) % period == 0`
    WallClockPeriod(u32),
}

impl SyncMode {
    pub const fn validate(self) -> Result<Self> {
        if let Self::WallClockPeriod(0) = self {
            return Err(Error::ZeroSyncPeriod);
        }
        Ok(self)
    }
}

/// Known effect ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectId {
    Bounce,
    Heartbeat,
}

impl EffectId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bounce => EFFECT_NAME_BOUNCE,
            Self::Heartbeat => EFFECT_NAME_HEARTBEAT,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            EFFECT_NAME_BOUNCE => Some(Self::Bounce),
            EFFECT_NAME_HEARTBEAT => Some(Self::Heartbeat),
            _ => None,
        }
    }
}

/// An effect together with the parameters it was started with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EffectKind {
    Bounce(BounceParams),
    Heartbeat(HeartbeatParams),
}

impl EffectKind {
    pub const fn id(&self) -> EffectId {
        match self {
            Self::Bounce(_) => EffectId::Bounce,
            Self::Heartbeat(_) => EffectId::Heartbeat,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Bounce(params) => params.fade.validate().map(|_| ()),
            Self::Heartbeat(params) => params.fade.validate().map(|_| ()),
        }
    }

    /// Create the running state for this effect.
    pub(crate) fn launch<const N: usize>(self, now: Instant) -> EffectSlot<N> {
        match self {
            Self::Bounce(params) => EffectSlot::Bounce(BounceEffect::begin(params, now)),
            Self::Heartbeat(params) => EffectSlot::Heartbeat(HeartbeatEffect::begin(params, now)),
        }
    }
}

/// Effect slot - enum containing all possible running effects
#[derive(Debug, Clone)]
pub enum EffectSlot<const N: usize> {
    Bounce(BounceEffect<N>),
    Heartbeat(HeartbeatEffect<N>),
}

impl<const N: usize> EffectSlot<N> {
    pub fn tick<O: OutputDriver>(&mut self, ctx: &mut EffectContext<'_, O, N>) {
        match self {
            Self::Bounce(effect) => effect.tick(ctx),
            Self::Heartbeat(effect) => effect.tick(ctx),
        }
    }

    pub fn next_deadline(&self) -> Instant {
        match self {
            Self::Bounce(effect) => Effect::next_deadline(effect),
            Self::Heartbeat(effect) => Effect::next_deadline(effect),
        }
    }

    pub fn id(&self) -> EffectId {
        match self {
            Self::Bounce(_) => EffectId::Bounce,
            Self::Heartbeat(_) => EffectId::Heartbeat,
        }
    }
}
