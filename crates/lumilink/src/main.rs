//! LumiLink - streaming-lighting control node
//!
//! Receives sACN (E1.31) and drives a pixel strip plus a DMX512 output, with
//! an animated fail-safe on network loss and a latching emergency stop.
//!
//! Usage: `lumilink [config.json]`. Without a config file the documented
//! defaults apply. This binary wires the core to trace-logging development
//! transports; hardware builds supply their own `PixelStrip`/`DmxTransport`
//! implementations.

mod dev;
mod logging_setup;

use std::fs::File;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::info;

use lumilink_core::{InputSample, LinkNode, NodeConfig};

use crate::dev::{TraceDmxPort, TraceStrip};

/// Status heartbeat interval
const STATUS_INTERVAL_MS: u64 = 5000;

fn load_config() -> Result<NodeConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let file =
                File::open(&path).with_context(|| format!("failed to open config {}", path))?;
            let cfg: NodeConfig = serde_json::from_reader(file)
                .with_context(|| format!("failed to parse config {}", path))?;
            info!("loaded config from {}", path);
            Ok(cfg)
        }
        None => {
            info!("no config given, using defaults");
            Ok(NodeConfig::default())
        }
    }
}

fn main() -> Result<()> {
    logging_setup::init();

    let cfg = load_config()?;
    let mut node = LinkNode::new(
        &cfg,
        Box::<TraceStrip>::default(),
        Box::<TraceDmxPort>::default(),
    )
    .context("invalid configuration")?;

    let start = Instant::now();
    node.begin(0, 0);

    info!(
        "node up: universes {}..{}, {} pixels, {} DMX channels",
        cfg.e131.start_universe,
        cfg.e131.start_universe + cfg.e131.universe_count - 1,
        cfg.pixels.count,
        cfg.dmx.channels
    );

    // No panel wiring on a development host
    let inputs = InputSample::default();
    let mut last_status_ms = 0u64;

    loop {
        let elapsed = start.elapsed();
        let now_ms = elapsed.as_millis() as u64;
        let now_us = elapsed.as_micros() as u64;

        node.poll_cycle(now_ms, now_us, inputs);

        if now_ms.saturating_sub(last_status_ms) >= STATUS_INTERVAL_MS {
            last_status_ms = now_ms;
            let pkt = node.last_packet();
            info!(
                "status: live={} fps={:.1} last universe={} seq={} len={}",
                node.is_live(now_ms),
                node.fps(),
                pkt.universe,
                pkt.sequence,
                pkt.length
            );
        }

        thread::sleep(Duration::from_millis(1));
    }
}
