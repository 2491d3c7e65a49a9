//! Near/far classification on top of a proximity sensor.
//!
//! The register-level driver stays outside this crate; it only needs to
//! implement [`ProximitySensor`]. The monitor is driven from the sensor's
//! interrupt line and dispatches `Closing`/`Away` handlers.

#[cfg(feature = "log")]
use log::debug;

use crate::callback::CallbackRegistry;
use crate::error::Result;

/// Readings below this intensity count as "nothing near".
pub const NEAR_THRESHOLD: u16 = 3;

/// Default gap between the low and high interrupt thresholds.
pub const DEFAULT_CALIBRATION_DELTA: u16 = 4;

/// Minimal interface of the proximity sensor driver.
pub trait ProximitySensor {
    type Error;

    /// Current proximity intensity.
    fn read_proximity(&mut self) -> core::result::Result<u16, Self::Error>;

    /// Program the interrupt window to `[threshold, threshold + delta]`.
    fn calibrate(&mut self, threshold: u16, delta: u16) -> core::result::Result<(), Self::Error>;
}

/// Proximity transitions, usable as handler labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Proximity {
    Closing,
    Away,
}

pub struct ProximityMonitor<'a, S> {
    sensor: S,
    callbacks: CallbackRegistry<'a, Proximity, 2>,
    near: bool,
}

impl<'a, S: ProximitySensor> ProximityMonitor<'a, S> {
    pub const fn new(sensor: S) -> Self {
        Self {
            sensor,
            callbacks: CallbackRegistry::new(),
            near: false,
        }
    }

    pub fn register<F>(&mut self, proximity: Proximity, handler: F) -> Result<()>
    where
        F: FnMut() + Send + 'a,
    {
        self.callbacks.register(proximity, handler)
    }

    /// Whether the last interrupt saw something near.
    pub const fn is_near(&self) -> bool {
        self.near
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// Handle the sensor's interrupt: re-read, classify and dispatch.
    ///
    /// Dispatches on every interrupt, not only on a change.
    pub fn on_interrupt(&mut self) -> core::result::Result<Proximity, S::Error> {
        let reading = self.sensor.read_proximity()?;
        self.near = reading >= NEAR_THRESHOLD;
        let proximity = if self.near {
            Proximity::Closing
        } else {
            Proximity::Away
        };

        #[cfg(feature = "log")]
        debug!("[proximity] reading {} -> {:?}", reading, proximity);

        self.callbacks.invoke(proximity);
        Ok(proximity)
    }

    /// Set the interrupt window. Without an explicit `threshold` the current
    /// reading is used as the baseline. Returns the threshold applied.
    pub fn calibrate(
        &mut self,
        threshold: Option<u16>,
        delta: u16,
    ) -> core::result::Result<u16, S::Error> {
        let threshold = match threshold {
            Some(threshold) => threshold,
            None => self.sensor.read_proximity()?,
        };
        self.sensor.calibrate(threshold, delta)?;
        Ok(threshold)
    }
}
