//! Fail-safe animation
//!
//! A traveling sinusoidal brightness wave under a hue that advances with
//! both time and pixel index. Rendered in place of live data whenever the
//! network goes quiet, so a prop never freezes on its last frame or goes
//! unexpectedly dark.

use std::f32::consts::TAU;

use crate::color::{hsv_to_rgb, Rgb};

/// Wave travel rate in radians per scaled second
const WAVE_SPEED: f32 = 0.5;

/// Generates the fallback animation. Pixel color is a pure function of
/// `(index, now_ms)` plus the two externally supplied scalars; there is no
/// time-integrated state, so changing the speed takes effect immediately.
#[derive(Debug)]
pub struct FailsafeFx {
    speed: f32,
}

impl Default for FailsafeFx {
    fn default() -> Self {
        Self { speed: 1.0 }
    }
}

impl FailsafeFx {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the speed multiplier. Zero freezes the brightness wave.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Color of one pixel at one instant.
    ///
    /// `brightness_scalar` (0-1) scales the wave's intensity directly; a
    /// scalar of zero renders black.
    pub fn color_at(
        &self,
        index: usize,
        count: usize,
        now_ms: u64,
        brightness_scalar: f32,
    ) -> Rgb {
        let t = (now_ms as f32 / 1000.0) * self.speed;
        let phase = index as f32 / count.max(1) as f32 * TAU;
        let wave = ((t * WAVE_SPEED + phase).sin() + 1.0) * 0.5;
        let intensity = (wave * 255.0 * brightness_scalar).clamp(0.0, 255.0);

        let hue = ((now_ms / 32 + index as u64 * 2) % 255) as f32 / 255.0;
        hsv_to_rgb(hue, 1.0, intensity / 255.0)
    }

    /// Fill a whole frame with the animation.
    pub fn render(&self, frame: &mut [Rgb], now_ms: u64, brightness_scalar: f32) {
        let count = frame.len();
        for (i, pixel) in frame.iter_mut().enumerate() {
            *pixel = self.color_at(i, count, now_ms, brightness_scalar);
        }
    }
}
