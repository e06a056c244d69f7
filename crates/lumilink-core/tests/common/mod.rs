//! Shared helpers: a wire-format packet builder and recording transports.
#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use lumilink_core::{DmxTransport, PixelStrip, Rgb};

/// Build an E1.31 data packet the node accepts.
pub fn build_packet(universe: u16, sequence: u8, payload: &[u8]) -> Vec<u8> {
    let total = 126usize.max(120 + payload.len());
    let mut data = vec![0u8; total];

    // Root layer
    data[0..2].copy_from_slice(&0x0010u16.to_be_bytes());
    data[4..13].copy_from_slice(b"ASC-E1.17");

    // Framing layer
    data[38..40].copy_from_slice(&(0x7000u16 | (total as u16 - 38)).to_be_bytes());
    data[40..42].copy_from_slice(&0x0002u16.to_be_bytes());
    data[111] = sequence;
    data[113..115].copy_from_slice(&universe.to_be_bytes());

    // DMP layer: set property, address-and-data type, count, values
    data[115] = 0x02;
    data[116] = 0xa1;
    data[118..120].copy_from_slice(&(payload.len() as u16 + 1).to_be_bytes());
    data[120..120 + payload.len()].copy_from_slice(payload);

    data
}

/// Pixel strip that records every committed frame.
#[derive(Clone, Default)]
pub struct RecordingStrip {
    pub frames: Arc<Mutex<Vec<(Vec<Rgb>, u8)>>>,
}

impl RecordingStrip {
    pub fn frame_count(&self) -> usize {
        self.frames.lock().unwrap().len()
    }

    pub fn last_frame(&self) -> Vec<Rgb> {
        self.frames.lock().unwrap().last().unwrap().0.clone()
    }
}

impl PixelStrip for RecordingStrip {
    fn begin(&mut self, _pixel_count: usize) -> io::Result<()> {
        Ok(())
    }

    fn show(&mut self, frame: &[Rgb], brightness: u8) -> io::Result<()> {
        self.frames
            .lock()
            .unwrap()
            .push((frame.to_vec(), brightness));
        Ok(())
    }
}

/// DMX transport that records every transmitted frame.
#[derive(Clone, Default)]
pub struct RecordingPort {
    pub frames: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl RecordingPort {
    pub fn frame_count(&self) -> usize {
        self.frames.lock().unwrap().len()
    }

    pub fn last_frame(&self) -> Vec<u8> {
        self.frames.lock().unwrap().last().unwrap().clone()
    }
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
