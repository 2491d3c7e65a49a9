//! Single push-button edge tracking.
//!
//! Buttons are active-low: a low level means pressed. Only level
//! transitions that match the current state are honoured, so a release
//! without a matching press (or a double press) is ignored.

use embassy_time::{Duration, Instant};

use crate::gesture::{Gesture, GestureTimings};

/// What a level change did to the button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Pressed,
    /// Released after being held for the given duration.
    Released(Duration),
}

#[derive(Debug, Clone)]
pub struct Button {
    name: &'static str,
    pin: u8,
    pressed: bool,
    press_time: Option<Instant>,
    press_duration: Duration,
    repeat_count: u8,
    repeat_window: Duration,
}

impl Button {
    pub const fn new(name: &'static str, pin: u8, repeat_window: Duration) -> Self {
        Self {
            name,
            pin,
            pressed: false,
            press_time: None,
            press_duration: Duration::from_ticks(0),
            repeat_count: 0,
            repeat_window,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn pin(&self) -> u8 {
        self.pin
    }

    pub const fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// When the current press started, while pressed.
    pub const fn press_time(&self) -> Option<Instant> {
        self.press_time
    }

    /// Duration of the last completed press.
    pub const fn press_duration(&self) -> Duration {
        self.press_duration
    }

    /// Presses accumulated since the last reset.
    pub const fn repeat_count(&self) -> u8 {
        self.repeat_count
    }

    /// Feed a level transition observed on the button's pin.
    pub fn on_level_change(&mut self, is_high: bool, now: Instant) -> Option<Edge> {
        match (self.pressed, is_high) {
            (false, false) => {
                self.pressed = true;
                self.press_time = Some(now);
                self.press_duration = Duration::from_ticks(0);
                Some(Edge::Pressed)
            }
            (true, true) => Some(Edge::Released(self.release(now))),
            _ => None,
        }
    }

    fn release(&mut self, now: Instant) -> Duration {
        let started = self.press_time.take().unwrap_or(now);
        self.pressed = false;
        self.press_duration = now
            .checked_duration_since(started)
            .unwrap_or(Duration::from_ticks(0));

        // A slow release always starts a fresh sequence, even mid-sequence.
        if self.press_duration < self.repeat_window {
            self.repeat_count = self.repeat_count.saturating_add(1);
        } else {
            self.repeat_count = 1;
        }
        self.press_duration
    }

    /// Forget accumulated presses. Pressed/released state is kept.
    pub fn reset(&mut self) {
        self.repeat_count = 0;
        self.press_duration = Duration::from_ticks(0);
    }

    /// Single-button gesture described by the current counters.
    ///
    /// One press maps to a duration bucket, two and three presses to
    /// `Twice`/`Thrice`; any other count yields nothing.
    pub fn classify(&self, timings: &GestureTimings) -> Option<Gesture> {
        match self.repeat_count {
            1 => Some(Gesture::single_length(self.press_duration, timings)),
            2 => Some(Gesture::Twice),
            3 => Some(Gesture::Thrice),
            _ => None,
        }
    }
}
