//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (serial console,
//! BLE, scheduler) that the [`AppService`](super::service::AppService)
//! interprets and acts upon.

use serde::{Deserialize, Serialize};

use crate::drivers::led_patterns::StatusCode;
use crate::sensors::calibration::CalPoint;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AppCommand {
    /// Sample the probe and report the calibrated and formula pH.
    MeasurePh,

    /// Sample the probe and report the calibration-free estimate only.
    MeasurePhFormula,

    /// Store a calibration point. `None` samples the probe live.
    Calibrate {
        point: CalPoint,
        voltage_mv: Option<f32>,
    },

    /// Restore the factory calibration voltages.
    ClearCalibration,

    /// Show a connectivity state on the status LED.
    ShowStatus(StatusCode),

    /// Solid colour, raw inputs (clamped to 0–255).
    SetColour { r: i32, g: i32, b: i32, intensity: i32 },

    /// Fade in and out, then hold the colour.
    FadeColour {
        r: i32,
        g: i32,
        b: i32,
        intensity: i32,
        duration_ms: u32,
    },

    /// Print a short message on the LCD.
    Print(StatusMessage),
}

/// Fixed LCD messages the service knows how to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusMessage {
    Booting,
    Calibrating,
    CalibrationSaved,
    SensorFault,
}

impl StatusMessage {
    pub const fn text(self) -> &'static str {
        match self {
            Self::Booting => "Pond monitor...",
            Self::Calibrating => "Calibrating...",
            Self::CalibrationSaved => "Calibrated!",
            Self::SensorFault => "pH probe fault!",
        }
    }
}
