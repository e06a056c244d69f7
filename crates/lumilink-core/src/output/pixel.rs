//! Pixel-strip output driver

use std::io;

use crate::color::Rgb;
use crate::config::PixelConfig;
use crate::error::Result;
use crate::failsafe::FailsafeFx;

/// Physical pixel-strip transmit primitive.
///
/// `show` commits a full frame to hardware and may block for the duration of
/// the strip transmission; it is the one suspension point of the pixel path.
pub trait PixelStrip {
    /// Allocate/configure the chain for `pixel_count` pixels.
    fn begin(&mut self, pixel_count: usize) -> io::Result<()>;

    /// Transmit the frame with a global brightness (0-255) applied.
    fn show(&mut self, frame: &[Rgb], brightness: u8) -> io::Result<()>;
}

/// Renders sink-buffer bytes (or the fail-safe animation) onto a pixel strip.
pub struct PixelDriver {
    strip: Box<dyn PixelStrip>,
    frame: Vec<Rgb>,
    stride: usize,
    base_brightness: u8,
    enabled: bool,
    ready: bool,
}

impl PixelDriver {
    pub fn new(cfg: &PixelConfig, strip: Box<dyn PixelStrip>) -> Self {
        Self {
            strip,
            frame: vec![Rgb::BLACK; cfg.count as usize],
            stride: cfg.stride(),
            base_brightness: cfg.brightness,
            enabled: cfg.enabled,
            ready: false,
        }
    }

    /// Bring up the physical chain. A disabled output stays quietly unready;
    /// a hardware failure is returned and also leaves the driver unready, in
    /// which case every render call is a no-op until a retry succeeds.
    pub fn begin(&mut self) -> Result<()> {
        if !self.enabled {
            tracing::warn!("pixel output disabled via config");
            self.ready = false;
            return Ok(());
        }

        self.strip.begin(self.frame.len())?;
        tracing::info!("configured {} pixels", self.frame.len());
        self.ready = true;
        Ok(())
    }

    /// Decode channel bytes into pixels and commit the frame.
    ///
    /// Bytes are consumed in groups of the configured stride; a fourth white
    /// byte is folded additively into R/G/B. Sources shorter than the chain
    /// leave the remaining pixels at their previous values, longer sources
    /// are truncated. `brightness_scalar` (0-1) scales the configured base
    /// brightness.
    pub fn render(&mut self, data: &[u8], brightness_scalar: f32) -> Result<()> {
        if !self.ready {
            return Ok(());
        }

        let expected = self.frame.len() * self.stride;
        let pixels = data.len().min(expected) / self.stride;

        for i in 0..pixels {
            let base = i * self.stride;
            let mut r = data[base];
            let mut g = data[base + 1];
            let mut b = data[base + 2];
            if self.stride == 4 {
                let w = data[base + 3];
                r = r.saturating_add(w);
                g = g.saturating_add(w);
                b = b.saturating_add(w);
            }
            self.frame[i] = Rgb::new(r, g, b);
        }

        let brightness = scaled_brightness(self.base_brightness, brightness_scalar);
        self.strip.show(&self.frame, brightness)?;
        Ok(())
    }

    /// Render the fail-safe animation in place of live data.
    ///
    /// The animator bakes `brightness_scalar` into the pixel values, so the
    /// commit uses the base brightness unchanged.
    pub fn render_failsafe(
        &mut self,
        fx: &FailsafeFx,
        now_ms: u64,
        brightness_scalar: f32,
    ) -> Result<()> {
        if !self.ready {
            return Ok(());
        }
        fx.render(&mut self.frame, now_ms, brightness_scalar);
        self.strip.show(&self.frame, self.base_brightness)?;
        Ok(())
    }

    /// Zero every pixel and commit, regardless of mode.
    pub fn blackout(&mut self) -> Result<()> {
        if !self.ready {
            return Ok(());
        }
        self.frame.fill(Rgb::BLACK);
        self.strip.show(&self.frame, self.base_brightness)?;
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn pixel_count(&self) -> usize {
        self.frame.len()
    }
}

/// Base brightness scaled by a 0-1 scalar, clamped to the u8 range.
fn scaled_brightness(base: u8, scalar: f32) -> u8 {
    (base as f32 * scalar).clamp(0.0, 255.0) as u8
}
