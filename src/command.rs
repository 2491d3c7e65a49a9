//! Effect commands queued from handlers.
//!
//! Gesture and proximity handlers run inside the controller's tick and do
//! not own the engine. They hold an [`EffectHandle`] instead and queue
//! commands that the engine applies on its next pass.

use embassy_time::Duration;

use crate::channel::{Channel, Receiver, Sender};
use crate::color::Rgb;
use crate::effect::{BounceParams, EffectKind, HeartbeatParams, SyncMode};
use crate::error::Result;

/// A request for the effect engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectCommand {
    /// Set every pixel at once
    Fill(Rgb),
    /// Fade every pixel to one color with the default fade
    FillFade(Rgb),
    /// Pause and fade to the given (or configured) backlight color
    Backlight(Option<Rgb>),
    /// Leave the pause/backlight overlay, after the given delay if non-zero
    Resume(Duration),
    /// Stop the running effect and remember the current colors
    Pause,
    /// Start the bounce effect, with the configured parameters if `None`
    StartBounce(Option<BounceParams>),
    /// Start the heartbeat effect, with the configured parameters if `None`
    StartHeartbeat(Option<HeartbeatParams>),
    StopEffect,
    SyncOn(SyncMode),
}

impl EffectCommand {
    /// Reject parameters the engine would refuse.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::StartBounce(Some(params)) => EffectKind::Bounce(*params).validate(),
            Self::StartHeartbeat(Some(params)) => EffectKind::Heartbeat(*params).validate(),
            Self::SyncOn(mode) => mode.validate().map(|_| ()),
            _ => Ok(()),
        }
    }
}

/// Type alias for the command channel
pub type CommandChannel<const SIZE: usize> = Channel<EffectCommand, SIZE>;

/// Type alias for command sender
pub type CommandSender<'a, const SIZE: usize> = Sender<'a, EffectCommand, SIZE>;

/// Type alias for command receiver
pub type CommandReceiver<'a, const SIZE: usize> = Receiver<'a, EffectCommand, SIZE>;

/// Cloneable front end for the effect engine.
///
/// Every method validates its arguments before queueing, so invalid
/// parameters fail at the call site rather than inside the engine.
#[derive(Clone, Copy)]
pub struct EffectHandle<'a, const SIZE: usize> {
    commands: CommandSender<'a, SIZE>,
}

impl<'a, const SIZE: usize> EffectHandle<'a, SIZE> {
    pub const fn new(commands: CommandSender<'a, SIZE>) -> Self {
        Self { commands }
    }

    pub fn send(&self, command: EffectCommand) -> Result<()> {
        command.validate()?;
        self.commands.try_send(command)
    }

    pub fn fill(&self, color: Rgb) -> Result<()> {
        self.send(EffectCommand::Fill(color))
    }

    pub fn fill_fade(&self, color: Rgb) -> Result<()> {
        self.send(EffectCommand::FillFade(color))
    }

    pub fn backlight(&self, color: Option<Rgb>) -> Result<()> {
        self.send(EffectCommand::Backlight(color))
    }

    pub fn resume(&self, timeout: Duration) -> Result<()> {
        self.send(EffectCommand::Resume(timeout))
    }

    pub fn pause(&self) -> Result<()> {
        self.send(EffectCommand::Pause)
    }

    pub fn start_bounce(&self, params: Option<BounceParams>) -> Result<()> {
        self.send(EffectCommand::StartBounce(params))
    }

    pub fn start_heartbeat(&self, params: Option<HeartbeatParams>) -> Result<()> {
        self.send(EffectCommand::StartHeartbeat(params))
    }

    pub fn stop_effect(&self) -> Result<()> {
        self.send(EffectCommand::StopEffect)
    }

    pub fn sync_effect_on(&self, mode: SyncMode) -> Result<()> {
        self.send(EffectCommand::SyncOn(mode))
    }
}
