//! Logical pixel buffer and its hardware projection.
//!
//! The logical buffer holds the intended (pre-gamma) colors and is the only
//! input to interpolation. Every flush recomputes the gamma-corrected frame
//! from it, so repeated fades never feed corrected values back in.

use crate::OutputDriver;
use crate::color::{BLACK, GammaTable, Rgb};

/// Logical colors of an `N`-pixel strip.
pub type PixelBuffer<const N: usize> = [Rgb; N];

pub struct LedStrip<O: OutputDriver, const N: usize> {
    output: O,
    gamma: GammaTable,
    logical: PixelBuffer<N>,
    frame: PixelBuffer<N>,
}

impl<O: OutputDriver, const N: usize> LedStrip<O, N> {
    /// Wrap `output`. Nothing is written until the first flush.
    pub fn new(output: O, gamma: GammaTable) -> Self {
        Self {
            output,
            gamma,
            logical: [BLACK; N],
            frame: [BLACK; N],
        }
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Intended colors.
    pub const fn colors(&self) -> &PixelBuffer<N> {
        &self.logical
    }

    /// Last frame written to hardware.
    pub const fn frame(&self) -> &PixelBuffer<N> {
        &self.frame
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Replace the logical buffer without flushing.
    pub fn set_all(&mut self, colors: &PixelBuffer<N>) {
        self.logical = *colors;
    }

    /// Set every pixel to `color` and flush.
    pub fn fill(&mut self, color: Rgb) {
        self.logical = [color; N];
        self.flush();
    }

    pub fn clear(&mut self) {
        self.fill(BLACK);
    }

    /// Project the logical buffer through the gamma table to hardware.
    pub fn flush(&mut self) {
        for (out, color) in self.frame.iter_mut().zip(self.logical.iter()) {
            *out = self.gamma.correct_rgb(*color);
        }
        self.output.write(&self.frame);
    }
}
