//! Mock hardware adapters for integration tests.
//!
//! Every mock records what the domain asked of it so tests can assert on
//! the full history without touching ADC, PWM or I²C registers. Time is
//! virtual: [`VirtualClock`] only moves when a test (or a blocking delay)
//! advances it.

use std::cell::Cell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use pondmonitor::app::events::AppEvent;
use pondmonitor::app::ports::{AdcPort, Clock, EventSink, LedPort, TextDisplay};
use pondmonitor::error::{DisplayError, SensorError};

// ── VirtualClock ──────────────────────────────────────────────

/// Shared virtual time in nanoseconds. Clones see the same clock.
#[derive(Clone, Default)]
pub struct VirtualClock {
    ns: Rc<Cell<u64>>,
}

#[allow(dead_code)]
impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_ms(&self, ms: u64) {
        self.ns.set(self.ns.get() + ms * 1_000_000);
    }

    pub fn set_ms(&self, ms: u64) {
        self.ns.set(ms * 1_000_000);
    }
}

impl Clock for VirtualClock {
    fn now_ms(&self) -> u64 {
        self.ns.get() / 1_000_000
    }
}

impl DelayNs for VirtualClock {
    fn delay_ns(&mut self, ns: u32) {
        self.ns.set(self.ns.get() + u64::from(ns));
    }
}

// ── MockAdc ───────────────────────────────────────────────────

/// Scriptable ADC. The handle is shared so a test can change the raw
/// value after the ADC has been moved into the service.
#[derive(Clone, Default)]
pub struct MockAdc {
    raw: Rc<Cell<u16>>,
    failing: Rc<Cell<bool>>,
    reads: Rc<Cell<u32>>,
}

#[allow(dead_code)]
impl MockAdc {
    pub fn with_raw(raw: u16) -> Self {
        let adc = Self::default();
        adc.set_raw(raw);
        adc
    }

    pub fn set_raw(&self, raw: u16) {
        self.raw.set(raw);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    pub fn reads(&self) -> u32 {
        self.reads.get()
    }
}

impl AdcPort for MockAdc {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        self.reads.set(self.reads.get() + 1);
        if self.failing.get() {
            Err(SensorError::HardwareUnavailable)
        } else {
            Ok(self.raw.get())
        }
    }
}

// ── MockLed ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MockLed {
    pub writes: Vec<(u8, u8, u8)>,
}

#[allow(dead_code)]
impl MockLed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<(u8, u8, u8)> {
        self.writes.last().copied()
    }
}

impl LedPort for MockLed {
    fn set_led(&mut self, r: u8, g: u8, b: u8) {
        self.writes.push((r, g, b));
    }
}

// ── MockDisplay ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCall {
    Char { c: char, at_ms: u64 },
    Clear { at_ms: u64 },
}

/// Character display that timestamps every call against a [`VirtualClock`].
pub struct MockDisplay {
    clock: VirtualClock,
    pub calls: Vec<DisplayCall>,
    pub shown: String,
    fail: Cell<bool>,
}

#[allow(dead_code)]
impl MockDisplay {
    pub fn new(clock: &VirtualClock) -> Self {
        Self {
            clock: clock.clone(),
            calls: Vec::new(),
            shown: String::new(),
            fail: Cell::new(false),
        }
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.set(fail);
    }

    /// Timestamps of the character writes, in order.
    pub fn char_times(&self) -> Vec<u64> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DisplayCall::Char { at_ms, .. } => Some(*at_ms),
                DisplayCall::Clear { .. } => None,
            })
            .collect()
    }

    pub fn clears(&self) -> Vec<u64> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DisplayCall::Clear { at_ms } => Some(*at_ms),
                DisplayCall::Char { .. } => None,
            })
            .collect()
    }
}

impl TextDisplay for MockDisplay {
    fn write_char(&mut self, c: char) -> Result<(), DisplayError> {
        if self.fail.get() {
            return Err(DisplayError::Bus);
        }
        self.calls.push(DisplayCall::Char {
            c,
            at_ms: self.clock.now_ms(),
        });
        self.shown.push(c);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        if self.fail.get() {
            return Err(DisplayError::Bus);
        }
        self.calls.push(DisplayCall::Clear {
            at_ms: self.clock.now_ms(),
        });
        self.shown.clear();
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&AppEvent> {
        self.events.last()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}
