//! Control loop pacing.
//!
//! Portable counterpart of an appliance main loop, without async/await or
//! platform timers. The caller sleeps for the returned duration between
//! ticks.

use embassy_time::{Duration, Instant};

use crate::command::CommandReceiver;
use crate::engine::EffectEngine;
use crate::gesture::{EdgeReceiver, GestureAggregator};
use crate::{OutputDriver, WallClock};

/// Longest the caller may sleep between two ticks.
///
/// Bounds how long a stopped effect can keep the strip before its task is
/// dropped.
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Result of a controller tick.
#[derive(Debug, Clone, Copy)]
pub struct TickResult {
    /// When the controller next has work to do.
    pub next_deadline: Instant,
    /// How long to wait before the next tick (may be zero if behind schedule).
    pub sleep_duration: Duration,
}

/// Drives gesture recognition and the effect engine from one context.
///
/// # Usage
///
/// ```ignore
/// let mut controller =
///     Controller::new(gestures, engine, edges.receiver(), commands.receiver(), clock);
///
/// loop {
///     let result = controller.tick(Instant::now());
///     sleep(result.sleep_duration);
/// }
/// ```
pub struct Controller<
    'a,
    O: OutputDriver,
    W: WallClock,
    const N: usize,
    const EDGES: usize,
    const COMMANDS: usize,
> {
    gestures: GestureAggregator<'a>,
    engine: EffectEngine<O, N>,
    edges: EdgeReceiver<'a, EDGES>,
    commands: CommandReceiver<'a, COMMANDS>,
    clock: W,
}

impl<'a, O: OutputDriver, W: WallClock, const N: usize, const EDGES: usize, const COMMANDS: usize>
    Controller<'a, O, W, N, EDGES, COMMANDS>
{
    pub fn new(
        gestures: GestureAggregator<'a>,
        engine: EffectEngine<O, N>,
        edges: EdgeReceiver<'a, EDGES>,
        commands: CommandReceiver<'a, COMMANDS>,
        clock: W,
    ) -> Self {
        Self {
            gestures,
            engine,
            edges,
            commands,
            clock,
        }
    }

    /// Run one pass of the loop and return timing information.
    ///
    /// Order within a pass:
    /// 1. Queued edge events, in arrival order
    /// 2. Gesture classification if the quiet window elapsed
    /// 3. Queued effect commands, including those just queued by handlers
    /// 4. Engine timers, fades and the running effect
    pub fn tick(&mut self, now: Instant) -> TickResult {
        self.gestures.process_pending(self.edges);
        self.gestures.poll(now);
        self.engine.process_pending(self.commands, now);
        self.engine.tick(now, self.clock.unix_seconds());

        let next_deadline = [
            Some(now + POLL_INTERVAL),
            self.gestures.next_deadline(),
            self.engine.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(now + POLL_INTERVAL);

        let sleep_duration = next_deadline
            .checked_duration_since(now)
            .unwrap_or(Duration::from_ticks(0));

        TickResult {
            next_deadline,
            sleep_duration,
        }
    }

    pub fn gestures(&self) -> &GestureAggregator<'a> {
        &self.gestures
    }

    pub fn gestures_mut(&mut self) -> &mut GestureAggregator<'a> {
        &mut self.gestures
    }

    pub fn engine(&self) -> &EffectEngine<O, N> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut EffectEngine<O, N> {
        &mut self.engine
    }

    pub fn clock(&self) -> &W {
        &self.clock
    }
}
