//! Development transports
//!
//! Stand-ins for the pixel-strip and DMX-serial primitives so the node can
//! run on a plain host: frames are counted and logged at `trace` instead of
//! driving hardware. Real deployments implement [`PixelStrip`] and
//! [`DmxTransport`] against their strip and serial drivers.

use std::io;

use lumilink_core::{DmxTransport, PixelStrip, Rgb};

/// Pixel strip that logs committed frames.
#[derive(Debug, Default)]
pub struct TraceStrip {
    frames: u64,
}

impl PixelStrip for TraceStrip {
    fn begin(&mut self, pixel_count: usize) -> io::Result<()> {
        tracing::info!("trace pixel strip ready ({} pixels)", pixel_count);
        Ok(())
    }

    fn show(&mut self, frame: &[Rgb], brightness: u8) -> io::Result<()> {
        self.frames += 1;
        let lit = frame.iter().filter(|p| **p != Rgb::BLACK).count();
        tracing::trace!(
            "pixel frame {}: {}/{} lit, brightness {}",
            self.frames,
            lit,
            frame.len(),
            brightness
        );
        Ok(())
    }
}

/// DMX port that logs transmitted frames.
#[derive(Debug, Default)]
pub struct TraceDmxPort {
    frames: u64,
}

impl DmxTransport for TraceDmxPort {
    fn begin(&mut self) -> io::Result<()> {
        tracing::info!("trace DMX port ready");
        Ok(())
    }

    fn transmit(&mut self, frame: &[u8]) -> io::Result<()> {
        self.frames += 1;
        tracing::trace!(
            "DMX frame {}: start code {}, {} channels",
            self.frames,
            frame[0],
            frame.len() - 1
        );
        Ok(())
    }
}
