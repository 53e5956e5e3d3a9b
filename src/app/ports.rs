//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (ADC, PWM LED, LCD, clock, event sinks) implement these
//! traits. The [`AppService`](super::service::AppService) and the sensor,
//! LED and LCD engines consume them via generics, so calibration and timing
//! logic never touch hardware directly. Handles are owned by the control
//! loop and passed in at call sites; nothing here is a global.

use crate::error::{DisplayError, SensorError};

// ───────────────────────────────────────────────────────────────
// Analog input (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// One analog input pin.
pub trait AdcPort {
    /// Take a single raw conversion. Errors mean the peripheral did not
    /// answer; range checking is the sampler's job.
    fn read_raw(&mut self) -> Result<u16, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// RGB status LED (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Three PWM channels of the status LED, already intensity-scaled.
pub trait LedPort {
    fn set_led(&mut self, r: u8, g: u8, b: u8);
}

// ───────────────────────────────────────────────────────────────
// Character display (driven adapter: domain → LCD)
// ───────────────────────────────────────────────────────────────

/// Minimal character display: write one character at the cursor, or clear.
pub trait TextDisplay {
    fn write_char(&mut self, c: char) -> Result<(), DisplayError>;

    /// Clear the screen and home the cursor.
    fn clear(&mut self) -> Result<(), DisplayError>;
}

// ───────────────────────────────────────────────────────────────
// Time source
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock. Tests drive a virtual one.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples scheduler from the control loop)
// ───────────────────────────────────────────────────────────────

/// Callback trait that the scheduler invokes when a schedule fires.
pub trait SchedulerDelegate {
    /// * `label` — the label of the schedule that fired.
    /// * `kind`  — whether it was a periodic or one-shot fire.
    fn on_schedule_fired(&mut self, label: &'static str, kind: ScheduleFiredKind);
}

/// Discriminant passed to [`SchedulerDelegate::on_schedule_fired`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleFiredKind {
    /// A recurring periodic schedule fired.
    Periodic,
    /// A one-shot schedule fired (auto-disables after).
    OneShot,
}
