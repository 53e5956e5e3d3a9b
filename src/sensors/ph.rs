//! Analog pH probe driver (Atlas Scientific Gravity pH, no-EEPROM variant).
//!
//! Composes a [`VoltageSampler`] with a [`PhCalibration`] store. The pure
//! conversions ([`PhSensor::convert`], [`calc_from_formula`]) take a voltage
//! and never touch the ADC; the `measure_*` operations sample first.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::AdcPort;
use crate::error::{CalibrationError, Result, SensorError};

use super::calibration::{calc_from_formula, CalPoint, CalibrationPoint, PhCalibration};
use super::sampler::VoltageSampler;
use super::{AnalogSensor, SensorKind};

/// One measurement: the averaged voltage and both pH estimates derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhReading {
    pub voltage_mv: f32,
    pub ph: f32,
    pub formula_ph: f32,
}

pub struct PhSensor<A> {
    sampler: VoltageSampler<A>,
    calibration: PhCalibration,
    online: bool,
}

impl<A: AdcPort> PhSensor<A> {
    pub fn new(sampler: VoltageSampler<A>, calibration: PhCalibration) -> Self {
        Self {
            sampler,
            calibration,
            online: false,
        }
    }

    pub fn calibration(&self) -> &PhCalibration {
        &self.calibration
    }

    pub fn point(&self, which: CalPoint) -> CalibrationPoint {
        self.calibration.point(which)
    }

    /// Outcome of the most recent ADC reading (including `begin`).
    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Calibrated conversion of a supplied voltage.
    pub fn convert(&self, voltage_mv: f32) -> core::result::Result<f32, CalibrationError> {
        self.calibration.convert(voltage_mv)
    }

    /// Sample the probe, then convert with the live calibration.
    pub fn measure_and_convert(&mut self) -> Result<f32> {
        let mv = self.read_voltage_mv()?;
        Ok(self.convert(mv)?)
    }

    /// Sample the probe, then apply the fixed formula.
    pub fn measure_formula(&mut self) -> Result<f32> {
        let mv = self.read_voltage_mv()?;
        Ok(calc_from_formula(mv))
    }

    /// Sample once and derive both estimates from the same voltage.
    pub fn measure(&mut self) -> Result<PhReading> {
        let voltage_mv = self.read_voltage_mv()?;
        let ph = self.convert(voltage_mv)?;
        let reading = PhReading {
            voltage_mv,
            ph,
            formula_ph: calc_from_formula(voltage_mv),
        };
        debug!("ph: {:.1} mV -> pH {:.2} (formula {:.2})", voltage_mv, ph, reading.formula_ph);
        Ok(reading)
    }

    /// Store `voltage_mv` (or a fresh sample when `None`) as one point.
    /// Returns the voltage that was stored.
    pub fn calibrate(&mut self, which: CalPoint, voltage_mv: Option<f32>) -> Result<f32> {
        let mv = match voltage_mv {
            Some(mv) => mv,
            None => self.read_voltage_mv()?,
        };
        self.calibration.set_voltage(which, mv);
        info!("ph: {} point calibrated at {:.1} mV", which, mv);
        Ok(mv)
    }

    pub fn clear_calibration(&mut self) {
        self.calibration.clear();
        info!("ph: calibration reset to factory defaults");
    }
}

impl<A: AdcPort> AnalogSensor for PhSensor<A> {
    fn kind(&self) -> SensorKind {
        SensorKind::Ph
    }

    /// Probe the ADC once and report whether a sample came back in range.
    /// Reads are never gated on this: a probe that is absent at boot is
    /// picked up by the next successful reading.
    fn begin(&mut self) -> bool {
        let online = self.read_voltage_mv().is_ok();
        if online {
            info!("ph: probe online ({:?} ADC, {} samples/reading)", self.sampler.profile(), self.sampler.average_len());
        } else {
            warn!("ph: probe did not answer");
        }
        online
    }

    fn read_voltage_mv(&mut self) -> core::result::Result<f32, SensorError> {
        let result = self.sampler.read_voltage_mv();
        if result.is_ok() != self.online {
            self.online = result.is_ok();
            debug!("ph: probe {}", if self.online { "back online" } else { "offline" });
        }
        result
    }
}
