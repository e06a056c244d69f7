//! Composed poll-cycle behavior: fail-safe takeover, emergency pre-emption,
//! and DMX pacing through a full node.

mod common;

use common::{RecordingPort, RecordingStrip};
use lumilink_core::{ButtonEvent, InputSample, LinkNode, NodeConfig, Rgb};

const IDLE: InputSample = InputSample {
    stop: false,
    cycle: false,
    confirm: false,
};

const STOP: InputSample = InputSample {
    stop: true,
    cycle: false,
    confirm: false,
};

fn test_config() -> NodeConfig {
    let mut cfg = NodeConfig::default();
    cfg.pixels.count = 8;
    cfg.dmx.channels = 8;
    cfg.dmx.fps = 40; // 25_000 us per frame
    cfg
}

fn make_node(cfg: &NodeConfig) -> (LinkNode, RecordingStrip, RecordingPort) {
    let strip = RecordingStrip::default();
    let port = RecordingPort::default();
    let mut node = LinkNode::new(cfg, Box::new(strip.clone()), Box::new(port.clone())).unwrap();
    node.begin(0, 0);
    (node, strip, port)
}

/// No packets for longer than the timeout: the fail-safe animation renders
/// and the DMX output keeps clocking its (empty) frame.
#[test]
fn test_failsafe_takes_over_after_timeout() {
    let (mut node, strip, port) = make_node(&test_config());

    assert!(!node.is_live(10_000));
    node.poll_cycle(10_000, 10_000_000, IDLE);

    assert_eq!(strip.frame_count(), 1);
    let frame = strip.last_frame();
    assert!(frame.iter().any(|p| *p != Rgb::BLACK));

    assert_eq!(port.frame_count(), 1);
    assert_eq!(port.last_frame(), vec![0u8; 9]);
}

#[test]
fn test_failsafe_disabled_blacks_out_instead() {
    let mut cfg = test_config();
    cfg.failsafe.enable_fx = false;
    let (mut node, strip, _port) = make_node(&cfg);

    node.poll_cycle(10_000, 10_000_000, IDLE);

    assert!(strip.last_frame().iter().all(|p| *p == Rgb::BLACK));
}

#[test]
fn test_failsafe_respects_zero_brightness() {
    let (mut node, strip, _port) = make_node(&test_config());
    node.set_brightness_scalar(0.0);

    node.poll_cycle(10_000, 10_000_000, IDLE);

    assert!(strip.last_frame().iter().all(|p| *p == Rgb::BLACK));
}

/// The latch blacks out both outputs on the cycle it engages, stays engaged
/// across any further input, and only clear() releases it.
#[test]
fn test_emergency_latch_blacks_out_and_persists() {
    let (mut node, strip, port) = make_node(&test_config());

    // Running in fail-safe before the stop
    node.poll_cycle(10_000, 10_000_000, IDLE);
    assert!(strip.last_frame().iter().any(|p| *p != Rgb::BLACK));

    let event = node.poll_cycle(10_010, 10_010_000, STOP);
    assert_eq!(event, Some(ButtonEvent::EmergencyStop));
    assert!(node.is_latched());

    // Both outputs dark immediately, DMX bypassing its frame clock
    assert!(strip.last_frame().iter().all(|p| *p == Rgb::BLACK));
    assert_eq!(port.last_frame(), vec![0u8; 9]);

    // Latch holds over later cycles with the button released
    for i in 1..50u64 {
        node.poll_cycle(10_010 + i, 10_010_000 + i * 1000, IDLE);
        assert!(node.is_latched());
        assert!(strip.last_frame().iter().all(|p| *p == Rgb::BLACK));
    }

    node.clear_emergency();
    assert!(!node.is_latched());

    // Fail-safe rendering resumes
    node.poll_cycle(11_000, 11_000_000, IDLE);
    assert!(strip.last_frame().iter().any(|p| *p != Rgb::BLACK));
}

/// While latched, the zeroed DMX frame still goes out at the frame rate,
/// not on every loop cycle.
#[test]
fn test_latched_dmx_stays_rate_limited() {
    let (mut node, _strip, port) = make_node(&test_config());

    // Prime the frame clock, then latch inside the following frame slot
    node.poll_cycle(9_990, 9_990_000, IDLE);
    node.poll_cycle(10_000, 10_000_000, STOP);
    let after_latch = port.frame_count();

    // Still inside the 25 ms frame slot: nothing extra goes out
    for i in 0..10u64 {
        node.poll_cycle(10_001 + i, 10_001_000 + i * 1000, IDLE);
    }
    assert_eq!(port.frame_count(), after_latch);

    // Past the interval the zeroed frame transmits again
    node.poll_cycle(10_030, 10_030_000, IDLE);
    assert_eq!(port.frame_count(), after_latch + 1);
    assert_eq!(port.last_frame(), vec![0u8; 9]);
}

#[test]
fn test_dmx_ticks_once_per_interval_through_the_node() {
    let (mut node, _strip, port) = make_node(&test_config());

    node.poll_cycle(10_000, 10_000_000, IDLE);
    assert_eq!(port.frame_count(), 1);

    // Two cycles inside the same 25 ms frame slot
    node.poll_cycle(10_005, 10_005_000, IDLE);
    node.poll_cycle(10_010, 10_010_000, IDLE);
    assert_eq!(port.frame_count(), 1);

    node.poll_cycle(10_025, 10_025_000, IDLE);
    assert_eq!(port.frame_count(), 2);
}
