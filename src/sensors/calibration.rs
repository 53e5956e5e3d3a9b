//! pH calibration store and voltage-to-pH conversion.
//!
//! Three calibration points anchor the probe's response curve. The probe
//! output falls as pH rises, so a healthy curve has
//! `low.voltage > mid.voltage > high.voltage`. Conversion is a two-segment
//! linear interpolation anchored at `mid`.
//!
//! Nothing here touches hardware; the live sampling path lives in
//! [`PhSensor`](super::ph::PhSensor).

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CalibrationError;

/// Spans narrower than this are treated as two points sharing a voltage.
pub const MIN_SPAN_MV: f32 = 0.001;

/// Reference pH of the low, mid and high buffer solutions.
pub const LOW_SOLUTION_PH: f32 = 4.01;
pub const MID_SOLUTION_PH: f32 = 6.86;
pub const HIGH_SOLUTION_PH: f32 = 9.18;

/// Factory voltages, solved from the fixed formula for the three buffers.
pub const FACTORY_LOW_MV: f32 = 2033.0;
pub const FACTORY_MID_MV: f32 = 1529.0;
pub const FACTORY_HIGH_MV: f32 = 1119.0;

/// Coefficients of the calibration-free fallback line.
pub const FORMULA_SLOPE_PER_MV: f32 = -5.6548 / 1000.0;
pub const FORMULA_INTERCEPT: f32 = 15.509;

/// Which of the three calibration points an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalPoint {
    Low,
    Mid,
    High,
}

impl fmt::Display for CalPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Mid => write!(f, "mid"),
            Self::High => write!(f, "high"),
        }
    }
}

/// A (voltage, reference value) pair anchoring the curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoint {
    pub voltage_mv: f32,
    pub reference: f32,
}

/// The factory voltages a reset restores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactoryVoltages {
    pub low_mv: f32,
    pub mid_mv: f32,
    pub high_mv: f32,
}

impl Default for FactoryVoltages {
    fn default() -> Self {
        Self {
            low_mv: FACTORY_LOW_MV,
            mid_mv: FACTORY_MID_MV,
            high_mv: FACTORY_HIGH_MV,
        }
    }
}

/// Reference pH values of the buffer solutions used for calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSolutions {
    pub low_ph: f32,
    pub mid_ph: f32,
    pub high_ph: f32,
}

impl Default for ReferenceSolutions {
    fn default() -> Self {
        Self {
            low_ph: LOW_SOLUTION_PH,
            mid_ph: MID_SOLUTION_PH,
            high_ph: HIGH_SOLUTION_PH,
        }
    }
}

/// Calibration store for one pH probe.
#[derive(Debug, Clone, PartialEq)]
pub struct PhCalibration {
    low: CalibrationPoint,
    mid: CalibrationPoint,
    high: CalibrationPoint,
    factory: FactoryVoltages,
}

impl Default for PhCalibration {
    fn default() -> Self {
        Self::new(ReferenceSolutions::default(), FactoryVoltages::default())
    }
}

impl PhCalibration {
    /// Build a store starting at the factory voltages.
    pub fn new(solutions: ReferenceSolutions, factory: FactoryVoltages) -> Self {
        Self {
            low: CalibrationPoint {
                voltage_mv: factory.low_mv,
                reference: solutions.low_ph,
            },
            mid: CalibrationPoint {
                voltage_mv: factory.mid_mv,
                reference: solutions.mid_ph,
            },
            high: CalibrationPoint {
                voltage_mv: factory.high_mv,
                reference: solutions.high_ph,
            },
            factory,
        }
    }

    /// Build a store with explicit voltages for each point.
    pub fn with_voltages(solutions: ReferenceSolutions, low_mv: f32, mid_mv: f32, high_mv: f32) -> Self {
        let mut cal = Self::new(solutions, FactoryVoltages::default());
        cal.low.voltage_mv = low_mv;
        cal.mid.voltage_mv = mid_mv;
        cal.high.voltage_mv = high_mv;
        cal
    }

    pub fn point(&self, which: CalPoint) -> CalibrationPoint {
        match which {
            CalPoint::Low => self.low,
            CalPoint::Mid => self.mid,
            CalPoint::High => self.high,
        }
    }

    /// Overwrite the voltage of exactly one point. The reference value is
    /// fixed by configuration and never recalculated.
    ///
    /// No ordering check is made: an operator can produce a non-monotonic
    /// curve, which [`convert`](Self::convert) will still evaluate.
    pub fn set_voltage(&mut self, which: CalPoint, voltage_mv: f32) {
        match which {
            CalPoint::Low => self.low.voltage_mv = voltage_mv,
            CalPoint::Mid => self.mid.voltage_mv = voltage_mv,
            CalPoint::High => self.high.voltage_mv = voltage_mv,
        }
    }

    /// Reset all three voltages to the factory defaults.
    pub fn clear(&mut self) {
        self.low.voltage_mv = self.factory.low_mv;
        self.mid.voltage_mv = self.factory.mid_mv;
        self.high.voltage_mv = self.factory.high_mv;
    }

    /// Both segments must have a usable slope, whichever one `convert`
    /// would pick for a given voltage.
    pub fn check(&self) -> Result<(), CalibrationError> {
        let usable = |span: f32| span.is_finite() && span.abs() >= MIN_SPAN_MV;
        if !usable(self.low.voltage_mv - self.mid.voltage_mv) {
            return Err(CalibrationError::Degenerate {
                upper: CalPoint::Low,
                lower: CalPoint::Mid,
            });
        }
        if !usable(self.mid.voltage_mv - self.high.voltage_mv) {
            return Err(CalibrationError::Degenerate {
                upper: CalPoint::Mid,
                lower: CalPoint::High,
            });
        }
        Ok(())
    }

    /// Convert a millivolt reading to pH.
    pub fn convert(&self, voltage_mv: f32) -> Result<f32, CalibrationError> {
        self.check()?;
        let (low, mid, high) = (self.low, self.mid, self.high);
        let ph = if voltage_mv > mid.voltage_mv {
            // High voltage means low pH: segment [mid, low].
            mid.reference
                - (mid.reference - low.reference) / (low.voltage_mv - mid.voltage_mv)
                    * (voltage_mv - mid.voltage_mv)
        } else {
            mid.reference
                - (high.reference - mid.reference) / (mid.voltage_mv - high.voltage_mv)
                    * (voltage_mv - mid.voltage_mv)
        };
        Ok(ph)
    }
}

/// Calibration-free pH estimate from a single fixed line.
pub fn calc_from_formula(voltage_mv: f32) -> f32 {
    FORMULA_SLOPE_PER_MV * voltage_mv + FORMULA_INTERCEPT
}
