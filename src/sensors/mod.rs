//! Sensor subsystem — analog probe drivers behind one capability trait.
//!
//! Each probe kind implements [`AnalogSensor`]; the control loop holds the
//! concrete driver it needs. Only the pH probe is fitted to this board, the
//! other [`SensorKind`] tags identify the rest of the Gravity probe family.
//!
//! ## Dual-target design
//!
//! Drivers read through an [`AdcPort`](crate::app::ports::AdcPort). On
//! ESP-IDF the port is backed by the ADC1 oneshot API; on host/test it is
//! a mock or the simulation adapter in
//! [`adapters::hardware`](crate::adapters::hardware).

pub mod calibration;
pub mod ph;
pub mod sampler;

use serde::{Deserialize, Serialize};

use crate::error::SensorError;

/// Probe family tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum SensorKind {
    Ph = 1,
    DissolvedOxygen = 2,
    Orp = 3,
    Rtd = 4,
}

/// Capability shared by every analog probe.
pub trait AnalogSensor {
    fn kind(&self) -> SensorKind;

    /// Bring the probe up. Returns `false` if the hardware did not answer.
    fn begin(&mut self) -> bool;

    /// Averaged probe voltage in millivolts.
    fn read_voltage_mv(&mut self) -> Result<f32, SensorError>;
}
