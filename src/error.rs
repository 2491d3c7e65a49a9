//! Crate-wide error type.
//!
//! Every variant carries only fixed-size data so the type stays `Copy`
//! and usable without an allocator.

use core::fmt;

use crate::gesture::Gesture;

/// Errors surfaced by the control core.
///
/// Steady-state operation (classification, dispatch, animation) never
/// fails; these are raised when a caller hands in invalid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A fade was requested with zero interpolation steps.
    ZeroFadeSteps,

    /// Wall-clock sync was requested with a period of zero seconds.
    ZeroSyncPeriod,

    /// The aggregator already holds `MAX_BUTTONS` buttons.
    TooManyButtons,

    /// Another button is already bound to this pin.
    DuplicatePin(u8),

    /// The button id does not belong to this aggregator.
    UnknownButton,

    /// A single-button gesture was registered as combined, or vice versa.
    WrongGestureScope(Gesture),

    /// The gamma exponent is not a positive finite number.
    InvalidGamma,

    /// The handler registry has no free slot for a new label.
    RegistryFull,

    /// The bounded channel is full; the message was dropped.
    ChannelFull,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroFadeSteps => f.write_str("fade requires at least one step"),
            Self::ZeroSyncPeriod => f.write_str("wall-clock sync period must be positive"),
            Self::TooManyButtons => f.write_str("no room for another button"),
            Self::DuplicatePin(pin) => write!(f, "pin {pin} is already bound to a button"),
            Self::UnknownButton => f.write_str("unknown button"),
            Self::WrongGestureScope(gesture) => {
                write!(f, "gesture `{}` cannot be bound here", gesture.as_str())
            }
            Self::InvalidGamma => f.write_str("gamma must be positive and finite"),
            Self::RegistryFull => f.write_str("handler registry is full"),
            Self::ChannelFull => f.write_str("channel is full"),
        }
    }
}

impl core::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
