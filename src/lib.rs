#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod button;
pub mod callback;
pub mod channel;
pub mod color;
pub mod command;
pub mod effect;
pub mod engine;
pub mod error;
pub mod fade;
pub mod gesture;
pub mod proximity;
pub mod scheduler;
pub mod strip;
pub mod timer;

pub use button::{Button, Edge};
pub use callback::{CallbackRegistry, Handler};
pub use command::{CommandChannel, CommandReceiver, CommandSender, EffectCommand, EffectHandle};
pub use effect::{BounceParams, EffectId, EffectKind, EffectSlot, HeartbeatParams, SyncMode};
pub use engine::{EffectEngine, EffectEngineConfig};
pub use error::{Error, Result};
pub use fade::{Fade, FadeParams, FadeState};
pub use gesture::{
    ButtonId, EdgeChannel, EdgeEvent, EdgeReceiver, EdgeSender, Evaluation, Gesture,
    GestureAggregator, GestureTimings,
};
pub use proximity::{Proximity, ProximityMonitor, ProximitySensor};
pub use scheduler::{Controller, TickResult};
pub use strip::{LedStrip, PixelBuffer};
pub use timer::{OneShot, TimerToken};

pub use color::{GammaTable, Rgb};
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The effect engine is generic over this trait.
pub trait OutputDriver {
    /// Write gamma-corrected colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}

/// Source of wall-clock time for synchronised effects.
pub trait WallClock {
    /// Whole seconds since the Unix epoch.
    fn unix_seconds(&self) -> u64;
}

impl<F: Fn() -> u64> WallClock for F {
    fn unix_seconds(&self) -> u64 {
        self()
    }
}

/// Wall clock backed by the host's system time.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl WallClock for SystemClock {
    fn unix_seconds(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0)
    }
}
