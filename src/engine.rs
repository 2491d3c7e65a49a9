//! LED effect engine.
//!
//! Owns the strip and at most one looped effect. On top of the effect sits
//! an overlay: `pause` stops the effect and remembers the current colors,
//! `backlight` pauses and fades to a steady color, `resume` undoes either by
//! restarting the remembered effect or fading back to the remembered colors.
//!
//! Everything advances from [`EffectEngine::tick`]. Stopping an effect only
//! clears the `running` flag; the task is dropped at the start of the next
//! tick, before it can write another frame.

use embassy_time::{Duration, Instant};

#[cfg(feature = "log")]
use log::debug;

use crate::OutputDriver;
use crate::color::{BLACK, DEFAULT_GAMMA, GammaTable, Rgb};
use crate::command::{CommandReceiver, EffectCommand};
use crate::effect::{
    BounceParams, EffectContext, EffectKind, EffectSlot, HeartbeatParams, SyncMode,
};
use crate::error::{Error, Result};
use crate::fade::{Fade, FadeParams, FadeState};
use crate::strip::{LedStrip, PixelBuffer};
use crate::timer::OneShot;

/// Configuration for the effect engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectEngineConfig {
    /// Fade used by `fill_fade`, backlight and resume transitions
    pub fade: FadeParams,
    /// Backlight color used when none is given
    pub backlight_color: Rgb,
    /// Bounce parameters used when none are given
    pub bounce: BounceParams,
    /// Heartbeat parameters used when none are given
    pub heartbeat: HeartbeatParams,
    /// Initial synchronisation mode
    pub sync: SyncMode,
    /// Gamma exponent applied on flush
    pub gamma: f32,
}

impl EffectEngineConfig {
    pub fn validate(&self) -> Result<()> {
        self.fade.validate()?;
        self.bounce.fade.validate()?;
        self.heartbeat.fade.validate()?;
        self.sync.validate()?;
        if !self.gamma.is_finite() || self.gamma <= 0.0 {
            return Err(Error::InvalidGamma);
        }
        Ok(())
    }
}

impl Default for EffectEngineConfig {
    fn default() -> Self {
        Self {
            fade: FadeParams::default(),
            backlight_color: Rgb {
                r: 200,
                g: 200,
                b: 50,
            },
            bounce: BounceParams::default(),
            heartbeat: HeartbeatParams::default(),
            sync: SyncMode::None,
            gamma: DEFAULT_GAMMA,
        }
    }
}

/// A fade owned by the engine itself, optionally followed by an effect.
#[derive(Debug, Clone)]
struct Transition<const N: usize> {
    fade: Fade<N>,
    then: Option<EffectKind>,
}

pub struct EffectEngine<O: OutputDriver, const N: usize> {
    strip: LedStrip<O, N>,
    config: EffectEngineConfig,
    sync: SyncMode,

    // Effect lifecycle
    running: bool,
    active_effect: Option<EffectKind>,
    task: Option<EffectSlot<N>>,
    transition: Option<Transition<N>>,

    // Pause / backlight overlay
    paused: bool,
    backlight_active: bool,
    resume_on_unpause: bool,
    paused_snapshot: Option<PixelBuffer<N>>,
    resume_timer: OneShot,
}

impl<O: OutputDriver, const N: usize> EffectEngine<O, N> {
    /// Create an engine driving `output`. Nothing is written until the
    /// first command.
    pub fn new(output: O, config: EffectEngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            strip: LedStrip::new(output, GammaTable::new(config.gamma)),
            config,
            sync: config.sync,
            running: false,
            active_effect: None,
            task: None,
            transition: None,
            paused: false,
            backlight_active: false,
            resume_on_unpause: false,
            paused_snapshot: None,
            resume_timer: OneShot::new(),
        })
    }

    pub const fn config(&self) -> &EffectEngineConfig {
        &self.config
    }

    pub const fn strip(&self) -> &LedStrip<O, N> {
        &self.strip
    }

    pub fn strip_mut(&mut self) -> &mut LedStrip<O, N> {
        &mut self.strip
    }

    /// Intended (pre-gamma) colors.
    pub const fn colors(&self) -> &PixelBuffer<N> {
        self.strip.colors()
    }

    /// Whether an effect is allowed to run.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    pub const fn is_backlit(&self) -> bool {
        self.backlight_active
    }

    /// Whether `resume` will restart the remembered effect.
    pub const fn resumes_effect(&self) -> bool {
        self.resume_on_unpause
    }

    /// Whether an engine-owned fade is in progress.
    pub const fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Last effect started, with its parameters.
    pub const fn active_effect(&self) -> Option<EffectKind> {
        self.active_effect
    }

    pub const fn sync_mode(&self) -> SyncMode {
        self.sync
    }

    /// When a deferred resume will run, if one is scheduled.
    pub fn resume_deadline(&self) -> Option<Instant> {
        self.resume_timer.deadline()
    }

    /// Set every pixel and flush immediately, discarding any engine fade.
    pub fn fill(&mut self, color: Rgb) {
        self.transition = None;
        self.strip.fill(color);
    }

    pub fn clear(&mut self) {
        self.fill(BLACK);
    }

    /// Fade every pixel to `color` with the configured fade.
    pub fn fill_fade(&mut self, color: Rgb, now: Instant) {
        self.begin_transition([color; N], self.config.fade, false, None, now);
    }

    /// Fade from the current colors to `targets`.
    ///
    /// A breakable fade is abandoned between steps once no effect is
    /// running.
    pub fn fade_to(
        &mut self,
        targets: PixelBuffer<N>,
        params: FadeParams,
        breakable: bool,
        now: Instant,
    ) -> Result<()> {
        let params = params.validate()?;
        self.begin_transition(targets, params, breakable, None, now);
        Ok(())
    }

    /// Stop the running effect, remember whether one was running and
    /// snapshot the current colors.
    pub fn pause(&mut self) {
        let pending = self.transition.as_ref().and_then(|transition| transition.then);
        if self.running || pending.is_some() {
            self.resume_on_unpause = true;
        }
        if let Some(kind) = pending {
            self.active_effect = Some(kind);
        }
        self.running = false;
        self.transition = None;
        self.paused = true;
        self.paused_snapshot = Some(*self.strip.colors());

        #[cfg(feature = "log")]
        debug!("[engine] paused (resume effect: {})", self.resume_on_unpause);
    }

    /// Pause and fade to `color`, or the configured backlight color.
    ///
    /// Does nothing while already backlit.
    pub fn backlight(&mut self, color: Option<Rgb>, now: Instant) {
        if self.backlight_active {
            return;
        }
        self.pause();
        let color = color.unwrap_or(self.config.backlight_color);
        self.begin_transition([color; N], self.config.fade, false, None, now);
        self.backlight_active = true;

        #[cfg(feature = "log")]
        debug!("[engine] backlight {:?}", color);
    }

    /// Leave the overlay now, or after `timeout` when it is non-zero.
    ///
    /// Scheduling a deferred resume replaces any earlier one.
    pub fn resume(&mut self, timeout: Duration, now: Instant) {
        if timeout > Duration::from_ticks(0) {
            self.resume_timer.schedule_after(now, timeout);
            return;
        }
        self.resume_now(now);
    }

    fn resume_now(&mut self, now: Instant) {
        self.resume_timer.cancel();
        self.backlight_active = false;
        self.paused = false;
        let snapshot = self.paused_snapshot.take();

        if self.resume_on_unpause {
            self.resume_on_unpause = false;
            if let Some(kind) = self.active_effect {
                #[cfg(feature = "log")]
                debug!("[engine] resume {}", kind.id().as_str());

                self.begin_transition([BLACK; N], self.config.fade, false, Some(kind), now);
                return;
            }
        }
        if let Some(snapshot) = snapshot {
            #[cfg(feature = "log")]
            debug!("[engine] resume to snapshot");

            self.begin_transition(snapshot, self.config.fade, false, None, now);
        }
    }

    /// Start the bounce effect, with the configured parameters if `None`.
    pub fn start_bounce(&mut self, params: Option<BounceParams>, now: Instant) -> Result<()> {
        let params = params.unwrap_or(self.config.bounce);
        self.start_effect(EffectKind::Bounce(params), now)
    }

    /// Start the heartbeat effect, with the configured parameters if `None`.
    pub fn start_heartbeat(&mut self, params: Option<HeartbeatParams>, now: Instant) -> Result<()> {
        let params = params.unwrap_or(self.config.heartbeat);
        self.start_effect(EffectKind::Heartbeat(params), now)
    }

    /// Stop whatever effect is running and start `kind`.
    ///
    /// While paused or backlit the effect is only remembered; it starts
    /// when the overlay is resumed.
    pub fn start_effect(&mut self, kind: EffectKind, now: Instant) -> Result<()> {
        kind.validate()?;
        self.active_effect = Some(kind);

        if self.paused {
            self.resume_on_unpause = true;

            #[cfg(feature = "log")]
            debug!("[engine] {} deferred until resume", kind.id().as_str());

            return Ok(());
        }

        self.transition = None;
        self.launch(kind, now);
        Ok(())
    }

    /// Ask the running effect to stop.
    ///
    /// Also forgets an effect waiting to be restarted by `resume` or by a
    /// resume fade.
    pub fn stop_effect(&mut self) {
        self.running = false;
        self.resume_on_unpause = false;
        if let Some(transition) = self.transition.as_mut() {
            transition.then = None;
        }

        #[cfg(feature = "log")]
        debug!("[engine] stop effect");
    }

    pub fn sync_effect_on(&mut self, mode: SyncMode) -> Result<()> {
        self.sync = mode.validate()?;
        Ok(())
    }

    /// Apply one queued command.
    pub fn apply(&mut self, command: EffectCommand, now: Instant) -> Result<()> {
        match command {
            EffectCommand::Fill(color) => self.fill(color),
            EffectCommand::FillFade(color) => self.fill_fade(color, now),
            EffectCommand::Backlight(color) => self.backlight(color, now),
            EffectCommand::Resume(timeout) => self.resume(timeout, now),
            EffectCommand::Pause => self.pause(),
            EffectCommand::StartBounce(params) => self.start_bounce(params, now)?,
            EffectCommand::StartHeartbeat(params) => self.start_heartbeat(params, now)?,
            EffectCommand::StopEffect => self.stop_effect(),
            EffectCommand::SyncOn(mode) => self.sync_effect_on(mode)?,
        }
        Ok(())
    }

    /// Apply every queued command in arrival order.
    ///
    /// Commands that fail validation are dropped. Returns how many were
    /// applied.
    pub fn process_pending<const SIZE: usize>(
        &mut self,
        commands: CommandReceiver<'_, SIZE>,
        now: Instant,
    ) -> usize {
        let mut applied = 0;
        for command in commands.drain() {
            match self.apply(command, now) {
                Ok(()) => applied += 1,
                Err(_err) => {
                    #[cfg(feature = "log")]
                    debug!("[engine] dropped {:?}: {}", command, _err);
                }
            }
        }
        applied
    }

    /// Advance timers, the engine fade and the running effect.
    ///
    /// While an engine fade is in progress the effect does not draw.
    pub fn tick(&mut self, now: Instant, unix_seconds: u64) {
        if self.resume_timer.poll(now).is_some() {
            self.resume_now(now);
        }

        if !self.running {
            self.task = None;
        }

        if let Some(transition) = self.transition.as_mut() {
            if transition.fade.is_breakable() && !self.running {
                self.transition = None;
                return;
            }
            if transition.fade.tick(now, &mut self.strip) == FadeState::Finished {
                let then = transition.then;
                self.transition = None;
                if let Some(kind) = then {
                    self.launch(kind, now);
                }
            }
            return;
        }

        if let Some(task) = self.task.as_mut() {
            let mut ctx = EffectContext {
                now,
                unix_seconds,
                sync: self.sync,
                strip: &mut self.strip,
            };
            task.tick(&mut ctx);
        }
    }

    /// Earliest instant at which [`EffectEngine::tick`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        let transition = self
            .transition
            .as_ref()
            .map(|transition| transition.fade.next_deadline());
        let task = self
            .task
            .as_ref()
            .filter(|_| self.running && self.transition.is_none())
            .map(EffectSlot::next_deadline);

        [self.resume_timer.deadline(), transition, task]
            .into_iter()
            .flatten()
            .min()
    }

    fn launch(&mut self, kind: EffectKind, now: Instant) {
        #[cfg(feature = "log")]
        debug!("[engine] start {}", kind.id().as_str());

        self.active_effect = Some(kind);
        self.running = true;
        self.task = Some(kind.launch(now));
    }

    fn begin_transition(
        &mut self,
        targets: PixelBuffer<N>,
        params: FadeParams,
        breakable: bool,
        then: Option<EffectKind>,
        now: Instant,
    ) {
        let mut fade = Fade::begin(self.strip.colors(), targets, params, breakable, now);
        fade.tick(now, &mut self.strip);
        self.transition = Some(Transition { fade, then });
    }
}
