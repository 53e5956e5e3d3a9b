//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (log to serial, publish upstream, …).

use crate::drivers::led_patterns::StatusCode;
use crate::error::{DisplayError, Error};
use crate::sensors::calibration::CalPoint;
use crate::sensors::ph::PhReading;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// The service has started. `sensor_online` is the probe's `begin()` result.
    Started {
        version: &'static str,
        sensor_online: bool,
    },

    /// A full measurement (calibrated and formula pH from one voltage).
    PhReading(PhReading),

    /// A formula-only measurement.
    FormulaPh(f32),

    /// One calibration point was overwritten.
    Calibrated { point: CalPoint, voltage_mv: f32 },

    /// Calibration was reset to factory voltages.
    CalibrationCleared,

    /// The status LED now shows `code`.
    StatusShown(StatusCode),

    /// A measurement or calibration failed.
    SensorFault(Error),

    /// The LCD rejected a write; the pending print was dropped.
    DisplayFault(DisplayError),
}
