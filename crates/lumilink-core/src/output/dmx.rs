//! DMX512 output driver
//!
//! The driver owns a start-code-prefixed frame and a frame clock. Buffer
//! updates arrive at whatever rate the network delivers; transmission runs
//! at the configured frame rate, which is what the DMX break-and-frame
//! timing requires.

use std::io;

use crate::config::DmxConfig;
use crate::error::Result;

/// Serial transmit primitive for DMX.
///
/// Implementations configure the line for DMX timing (250 kbaud, 8N2) in
/// `begin` and assert the protocol break before each frame in `transmit`.
pub trait DmxTransport {
    fn begin(&mut self) -> io::Result<()>;

    /// Send a break followed by the full frame (start code + channels).
    fn transmit(&mut self, frame: &[u8]) -> io::Result<()>;
}

/// Fixed-rate DMX frame output.
pub struct DmxDriver {
    port: Box<dyn DmxTransport>,
    /// `frame[0]` is the DMX start code, fixed at 0
    frame: Vec<u8>,
    interval_us: u64,
    last_frame_us: u64,
    enabled: bool,
    ready: bool,
}

impl DmxDriver {
    pub fn new(cfg: &DmxConfig, port: Box<dyn DmxTransport>) -> Self {
        let channels = cfg.channels.min(512) as usize;
        Self {
            port,
            frame: vec![0; channels + 1],
            interval_us: 1_000_000 / cfg.fps.max(1) as u64,
            last_frame_us: 0,
            enabled: cfg.enabled,
            ready: false,
        }
    }

    /// Bring up the serial transport and start the frame clock.
    pub fn begin(&mut self, now_us: u64) -> Result<()> {
        if !self.enabled {
            tracing::warn!("DMX output disabled via config");
            self.ready = false;
            return Ok(());
        }

        self.port.begin()?;
        self.last_frame_us = now_us;
        self.ready = true;
        tracing::info!(
            "DMX output started ({} channels every {} us)",
            self.channel_count(),
            self.interval_us
        );
        Ok(())
    }

    /// Copy channel bytes into the frame after the start code. Does not
    /// transmit; truncates to the configured channel count.
    pub fn update(&mut self, data: &[u8]) {
        if !self.ready {
            return;
        }
        let n = data.len().min(self.channel_count());
        self.frame[1..1 + n].copy_from_slice(&data[..n]);
    }

    /// Transmit the frame if it is due. Returns whether a frame went out;
    /// a not-yet-due tick is a non-blocking no-op.
    pub fn tick(&mut self, now_us: u64) -> Result<bool> {
        if !self.ready {
            return Ok(false);
        }
        if now_us.saturating_sub(self.last_frame_us) < self.interval_us {
            return Ok(false);
        }
        self.last_frame_us = now_us;
        self.port.transmit(&self.frame)?;
        Ok(true)
    }

    /// Zero every channel (keeping the start code) and transmit immediately,
    /// bypassing the frame clock. Emergency response must not wait for the
    /// next frame slot.
    pub fn blackout(&mut self) -> Result<()> {
        if !self.ready {
            return Ok(());
        }
        self.frame[1..].fill(0);
        self.port.transmit(&self.frame)?;
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn channel_count(&self) -> usize {
        self.frame.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DmxConfig;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingPort {
        frames: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    impl DmxTransport for RecordingPort {
        fn begin(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn transmit(&mut self, frame: &[u8]) -> io::Result<()> {
            self.frames.lock().unwrap().push(frame.to_vec());
            Ok(())
        }
    }

    fn driver(channels: u16, fps: u16) -> (DmxDriver, RecordingPort) {
        let cfg = DmxConfig {
            channels,
            fps,
            ..DmxConfig::default()
        };
        let port = RecordingPort::default();
        let mut driver = DmxDriver::new(&cfg, Box::new(port.clone()));
        driver.begin(0).unwrap();
        (driver, port)
    }

    #[test]
    fn test_frame_carries_start_code() {
        let (mut driver, port) = driver(8, 40);
        driver.update(&[1, 2, 3]);
        driver.tick(driver.interval_us).unwrap();

        let frames = port.frames.lock().unwrap();
        assert_eq!(frames[0], vec![0, 1, 2, 3, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_tick_transmits_at_most_once_per_interval() {
        // 40 fps -> 25_000 us between frames
        let (mut driver, port) = driver(8, 40);
        assert_eq!(driver.interval_us, 25_000);

        assert!(driver.tick(25_000).unwrap());
        assert!(!driver.tick(30_000).unwrap());
        assert!(!driver.tick(49_999).unwrap());
        assert!(driver.tick(50_000).unwrap());

        assert_eq!(port.frames.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_update_truncates_and_does_not_transmit() {
        let (mut driver, port) = driver(4, 40);
        driver.update(&[9u8; 100]);
        assert!(port.frames.lock().unwrap().is_empty());

        driver.tick(25_000).unwrap();
        assert_eq!(port.frames.lock().unwrap()[0], vec![0, 9, 9, 9, 9]);
    }

    #[test]
    fn test_blackout_bypasses_frame_clock() {
        let (mut driver, port) = driver(4, 40);
        driver.update(&[9u8; 4]);
        assert!(driver.tick(25_000).unwrap());

        // Inside the interval, tick would skip; blackout must not
        driver.blackout().unwrap();

        let frames = port.frames.lock().unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1], vec![0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_channel_count_clamped_to_full_universe() {
        let (driver, _) = driver(2000, 40);
        assert_eq!(driver.channel_count(), 512);
    }

    #[test]
    fn test_zero_fps_does_not_divide_by_zero() {
        let (driver, _) = driver(8, 0);
        assert_eq!(driver.interval_us, 1_000_000);
    }

    #[test]
    fn test_unready_driver_noops() {
        let cfg = DmxConfig {
            enabled: false,
            ..DmxConfig::default()
        };
        let port = RecordingPort::default();
        let frames = port.frames.clone();
        let mut driver = DmxDriver::new(&cfg, Box::new(port));

        driver.begin(0).unwrap();
        assert!(!driver.is_ready());
        driver.update(&[1, 2, 3]);
        assert!(!driver.tick(1_000_000).unwrap());
        driver.blackout().unwrap();
        assert!(frames.lock().unwrap().is_empty());
    }
}
