//! Gesture classification across a group of buttons.
//!
//! Every release (re)arms one shared quiet-window timer. When the window
//! elapses without another release, the accumulated presses are classified
//! once: a single button yields a per-button gesture, several buttons a
//! combined `Multiple*` gesture.

use embassy_time::{Duration, Instant};
use heapless::Vec;

#[cfg(feature = "log")]
use log::debug;

use crate::button::{Button, Edge};
use crate::callback::CallbackRegistry;
use crate::channel::{Channel, Receiver, Sender};
use crate::error::{Error, Result};
use crate::timer::OneShot;

/// Maximum number of buttons one aggregator can own.
pub const MAX_BUTTONS: usize = 4;

const SINGLE_GESTURES: usize = 6;
const COMBINED_GESTURES: usize = 6;

const GESTURE_NAME_SHORT: &str = "short";
const GESTURE_NAME_MEDIUM: &str = "medium";
const GESTURE_NAME_LONG: &str = "long";
const GESTURE_NAME_EXTRA_LONG: &str = "extra_long";
const GESTURE_NAME_TWICE: &str = "twice";
const GESTURE_NAME_THRICE: &str = "thrice";
const GESTURE_NAME_MULTIPLE_SHORT: &str = "multiple_short";
const GESTURE_NAME_MULTIPLE_MEDIUM: &str = "multiple_medium";
const GESTURE_NAME_MULTIPLE_LONG: &str = "multiple_long";
const GESTURE_NAME_MULTIPLE_EXTRA_LONG: &str = "multiple_extra_long";
const GESTURE_NAME_MULTIPLE_TWICE: &str = "multiple_twice";
const GESTURE_NAME_MULTIPLE_THRICE: &str = "multiple_thrice";

/// Recognised gestures, usable as handler labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gesture {
    Short,
    Medium,
    Long,
    ExtraLong,
    Twice,
    Thrice,
    MultipleShort,
    MultipleMedium,
    MultipleLong,
    MultipleExtraLong,
    MultipleTwice,
    MultipleThrice,
}

impl Gesture {
    pub const ALL: [Self; 12] = [
        Self::Short,
        Self::Medium,
        Self::Long,
        Self::ExtraLong,
        Self::Twice,
        Self::Thrice,
        Self::MultipleShort,
        Self::MultipleMedium,
        Self::MultipleLong,
        Self::MultipleExtraLong,
        Self::MultipleTwice,
        Self::MultipleThrice,
    ];

    /// Whether the gesture involves more than one button.
    pub const fn is_combined(self) -> bool {
        matches!(
            self,
            Self::MultipleShort
                | Self::MultipleMedium
                | Self::MultipleLong
                | Self::MultipleExtraLong
                | Self::MultipleTwice
                | Self::MultipleThrice
        )
    }

    /// Duration bucket for a single press. First matching threshold wins.
    pub fn single_length(duration: Duration, timings: &GestureTimings) -> Self {
        match timings.length_bucket(duration) {
            0 => Self::Short,
            1 => Self::Medium,
            2 => Self::Long,
            _ => Self::ExtraLong,
        }
    }

    /// Duration bucket for the longest press of a combined gesture.
    pub fn combined_length(duration: Duration, timings: &GestureTimings) -> Self {
        match timings.length_bucket(duration) {
            0 => Self::MultipleShort,
            1 => Self::MultipleMedium,
            2 => Self::MultipleLong,
            _ => Self::MultipleExtraLong,
        }
    }

    /// Count bucket for the highest press count of a combined gesture.
    pub const fn combined_count(count: u8) -> Option<Self> {
        match count {
            2 => Some(Self::MultipleTwice),
            3 => Some(Self::MultipleThrice),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Short => GESTURE_NAME_SHORT,
            Self::Medium => GESTURE_NAME_MEDIUM,
            Self::Long => GESTURE_NAME_LONG,
            Self::ExtraLong => GESTURE_NAME_EXTRA_LONG,
            Self::Twice => GESTURE_NAME_TWICE,
            Self::Thrice => GESTURE_NAME_THRICE,
            Self::MultipleShort => GESTURE_NAME_MULTIPLE_SHORT,
            Self::MultipleMedium => GESTURE_NAME_MULTIPLE_MEDIUM,
            Self::MultipleLong => GESTURE_NAME_MULTIPLE_LONG,
            Self::MultipleExtraLong => GESTURE_NAME_MULTIPLE_EXTRA_LONG,
            Self::MultipleTwice => GESTURE_NAME_MULTIPLE_TWICE,
            Self::MultipleThrice => GESTURE_NAME_MULTIPLE_THRICE,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|gesture| gesture.as_str() == s)
    }
}

/// Timing thresholds for classification.
#[derive(Debug, Clone, Copy)]
pub struct GestureTimings {
    /// Silence after the last release before classification runs
    pub quiet_window: Duration,
    /// Presses shorter than this extend the repeat sequence
    pub repeat_window: Duration,
    /// Upper bound (inclusive) of a short press
    pub short: Duration,
    /// Upper bound (inclusive) of a medium press
    pub medium: Duration,
    /// Upper bound (inclusive) of a long press; anything longer is extra long
    pub long: Duration,
}

impl GestureTimings {
    fn length_bucket(&self, duration: Duration) -> u8 {
        if duration <= self.short {
            0
        } else if duration <= self.medium {
            1
        } else if duration <= self.long {
            2
        } else {
            3
        }
    }
}

impl Default for GestureTimings {
    fn default() -> Self {
        Self {
            quiet_window: Duration::from_millis(250),
            repeat_window: Duration::from_millis(500),
            short: Duration::from_millis(500),
            medium: Duration::from_millis(1000),
            long: Duration::from_millis(2000),
        }
    }
}

/// Index of a button inside its aggregator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonId(u8);

impl ButtonId {
    #[allow(clippy::cast_possible_truncation)]
    const fn from_index(index: usize) -> Self {
        // Indices are bounded by MAX_BUTTONS.
        Self(index as u8)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A level change reported by the hardware edge source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeEvent {
    pub pin: u8,
    pub is_high: bool,
    pub at: Instant,
}

/// Type alias for the edge channel
pub type EdgeChannel<const SIZE: usize> = Channel<EdgeEvent, SIZE>;

/// Type alias for edge sender
pub type EdgeSender<'a, const SIZE: usize> = Sender<'a, EdgeEvent, SIZE>;

/// Type alias for edge receiver
pub type EdgeReceiver<'a, const SIZE: usize> = Receiver<'a, EdgeEvent, SIZE>;

/// Outcome of one classification pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// No button had pending presses
    Idle,
    /// Exactly one button had pending presses
    Single {
        button: ButtonId,
        gesture: Option<Gesture>,
    },
    /// Several buttons had pending presses
    Combined {
        length: Gesture,
        count: Option<Gesture>,
    },
}

struct ButtonSlot<'a> {
    button: Button,
    callbacks: CallbackRegistry<'a, Gesture, SINGLE_GESTURES>,
}

/// Owns the buttons, the debounce timer and the handler bindings.
pub struct GestureAggregator<'a> {
    buttons: Vec<ButtonSlot<'a>, MAX_BUTTONS>,
    combined: CallbackRegistry<'a, Gesture, COMBINED_GESTURES>,
    debounce: OneShot,
    timings: GestureTimings,
}

impl<'a> GestureAggregator<'a> {
    pub const fn new(timings: GestureTimings) -> Self {
        Self {
            buttons: Vec::new(),
            combined: CallbackRegistry::new(),
            debounce: OneShot::new(),
            timings,
        }
    }

    pub const fn timings(&self) -> &GestureTimings {
        &self.timings
    }

    /// Add a button bound to `pin`.
    pub fn add_button(&mut self, name: &'static str, pin: u8) -> Result<ButtonId> {
        if self.buttons.iter().any(|slot| slot.button.pin() == pin) {
            return Err(Error::DuplicatePin(pin));
        }
        let id = ButtonId::from_index(self.buttons.len());
        let slot = ButtonSlot {
            button: Button::new(name, pin, self.timings.repeat_window),
            callbacks: CallbackRegistry::new(),
        };
        self.buttons.push(slot).map_err(|_| Error::TooManyButtons)?;
        Ok(id)
    }

    /// Look a button up by name.
    pub fn find(&self, name: &str) -> Option<ButtonId> {
        self.buttons
            .iter()
            .position(|slot| slot.button.name() == name)
            .map(ButtonId::from_index)
    }

    pub fn button(&self, id: ButtonId) -> Option<&Button> {
        self.buttons.get(id.index()).map(|slot| &slot.button)
    }

    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.buttons.iter().map(|slot| &slot.button)
    }

    /// Bind a single-button gesture on `button`.
    pub fn register<F>(&mut self, button: ButtonId, gesture: Gesture, handler: F) -> Result<()>
    where
        F: FnMut() + Send + 'a,
    {
        if gesture.is_combined() {
            return Err(Error::WrongGestureScope(gesture));
        }
        let slot = self
            .buttons
            .get_mut(button.index())
            .ok_or(Error::UnknownButton)?;
        slot.callbacks.register(gesture, handler)
    }

    /// Bind a combined (`Multiple*`) gesture.
    pub fn register_combined<F>(&mut self, gesture: Gesture, handler: F) -> Result<()>
    where
        F: FnMut() + Send + 'a,
    {
        if !gesture.is_combined() {
            return Err(Error::WrongGestureScope(gesture));
        }
        self.combined.register(gesture, handler)
    }

    /// Feed a level change to a known button.
    pub fn on_level_change(
        &mut self,
        button: ButtonId,
        is_high: bool,
        now: Instant,
    ) -> Option<Edge> {
        let slot = self.buttons.get_mut(button.index())?;
        let edge = slot.button.on_level_change(is_high, now);
        if let Some(Edge::Released(_)) = edge {
            self.on_button_released(now);
        }
        edge
    }

    /// Feed a level change by pin. Pins without a button are ignored.
    pub fn on_edge(&mut self, pin: u8, is_high: bool, now: Instant) -> Option<Edge> {
        let index = self
            .buttons
            .iter()
            .position(|slot| slot.button.pin() == pin)?;
        self.on_level_change(ButtonId::from_index(index), is_high, now)
    }

    /// Restart the quiet window after a release on any button.
    pub fn on_button_released(&mut self, now: Instant) {
        self.debounce.schedule_after(now, self.timings.quiet_window);
    }

    /// Apply every queued edge event in arrival order.
    pub fn process_pending<const SIZE: usize>(&mut self, edges: EdgeReceiver<'_, SIZE>) {
        for event in edges.drain() {
            self.on_edge(event.pin, event.is_high, event.at);
        }
    }

    /// When the pending classification is due, if one is armed.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// Classify and dispatch once the quiet window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<Evaluation> {
        self.debounce.poll(now)?;
        Some(self.evaluate())
    }

    /// Classify accumulated presses, run the matching handlers and reset
    /// the buttons involved.
    pub fn evaluate(&mut self) -> Evaluation {
        let mut pending = self
            .buttons
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.button.repeat_count() >= 1);

        let Some((first, _)) = pending.next() else {
            return Evaluation::Idle;
        };
        if pending.next().is_none() {
            return self.evaluate_single(ButtonId::from_index(first));
        }
        self.evaluate_combined()
    }

    fn evaluate_single(&mut self, id: ButtonId) -> Evaluation {
        let timings = self.timings;
        let slot = &mut self.buttons[id.index()];
        let gesture = slot.button.classify(&timings);

        #[cfg(feature = "log")]
        debug!(
            "[gesture] {}: {:?} (presses: {})",
            slot.button.name(),
            gesture,
            slot.button.repeat_count()
        );

        if let Some(gesture) = gesture {
            slot.callbacks.invoke(gesture);
        }
        slot.button.reset();

        Evaluation::Single {
            button: id,
            gesture,
        }
    }

    fn evaluate_combined(&mut self) -> Evaluation {
        let mut longest = Duration::from_ticks(0);
        let mut most_presses = 0;
        for slot in self.buttons.iter().filter(|s| s.button.repeat_count() >= 1) {
            longest = longest.max(slot.button.press_duration());
            most_presses = most_presses.max(slot.button.repeat_count());
        }

        let length = Gesture::combined_length(longest, &self.timings);
        let count = Gesture::combined_count(most_presses);

        #[cfg(feature = "log")]
        debug!("[gesture] combined: {:?} / {:?}", length, count);

        self.combined.invoke(length);
        if let Some(count) = count {
            self.combined.invoke(count);
        }

        for slot in self.buttons.iter_mut() {
            if slot.button.repeat_count() >= 1 {
                slot.button.reset();
            }
        }

        Evaluation::Combined { length, count }
    }
}
