//! Emergency stop interlock and panel buttons
//!
//! Three digital inputs (stop, cycle, confirm) are edge-detected against the
//! previous sample only; there is no timed debounce window. A rising edge on
//! stop latches the emergency condition, which the composition layer uses to
//! force every output to blackout until an operator explicitly clears it.

/// One sample of the three panel inputs, already normalized for polarity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSample {
    pub stop: bool,
    pub cycle: bool,
    pub confirm: bool,
}

/// Edge events surfaced to the embedding application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    /// Stop was pressed and the emergency latch engaged
    EmergencyStop,
    /// Mode-cycle button pressed
    CycleMode,
    /// Confirm button pressed
    Confirm,
}

/// Latching emergency interlock with single-sample edge detection.
#[derive(Debug, Default)]
pub struct Interlock {
    latched: bool,
    last: InputSample,
}

impl Interlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one input sample; returns at most one event per call, with stop
    /// taking priority over cycle over confirm.
    pub fn poll(&mut self, sample: InputSample) -> Option<ButtonEvent> {
        let mut event = None;

        if sample.stop && !self.last.stop {
            if !self.latched {
                self.latched = true;
                tracing::warn!("emergency stop engaged");
                event = Some(ButtonEvent::EmergencyStop);
            }
        } else if sample.cycle && !self.last.cycle {
            event = Some(ButtonEvent::CycleMode);
        } else if sample.confirm && !self.last.confirm {
            event = Some(ButtonEvent::Confirm);
        }

        self.last = sample;
        event
    }

    /// True while the emergency condition holds. Unaffected by further input
    /// samples; only [`clear`](Self::clear) releases it.
    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// Operator action: release the emergency latch.
    pub fn clear(&mut self) {
        if self.latched {
            tracing::info!("emergency latch cleared");
        }
        self.latched = false;
    }
}
