//! Gamma correction applied when a frame is written to hardware.
//!
//! The table maps a logical channel value to the value sent to the LEDs:
//! `round(255 * (v / 255) ^ gamma)`, clamped to `0..=255`.

use super::Rgb;

/// Gamma used for WS2812-class LEDs.
pub const DEFAULT_GAMMA: f32 = 2.8;

#[derive(Debug, Clone)]
pub struct GammaTable {
    lut: [u8; 256],
}

impl GammaTable {
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn new(gamma: f32) -> Self {
        let mut lut = [0u8; 256];
        for (value, corrected) in lut.iter_mut().enumerate() {
            let normalized = value as f32 / 255.0;
            let scaled = libm::roundf(255.0 * libm::powf(normalized, gamma));
            *corrected = scaled.clamp(0.0, 255.0) as u8;
        }
        Self { lut }
    }

    #[inline]
    pub fn correct(&self, value: u8) -> u8 {
        self.lut[value as usize]
    }

    #[inline]
    pub fn correct_rgb(&self, color: Rgb) -> Rgb {
        Rgb {
            r: self.correct(color.r),
            g: self.correct(color.g),
            b: self.correct(color.b),
        }
    }
}

impl Default for GammaTable {
    fn default() -> Self {
        Self::new(DEFAULT_GAMMA)
    }
}
