//! Averaging ADC voltage sampler.
//!
//! Reads one analog pin `N` times in a tight loop and converts the mean to
//! millivolts. ADC bit depth and reference voltage differ per board, so the
//! scaling comes from an [`AdcProfile`]. The ESP32 profile carries an
//! empirically measured +130 mV offset for the known nonlinearity of its
//! ADC (espressif/arduino-esp32#92); it is a rough fix, not a true
//! linearisation.

use serde::{Deserialize, Serialize};

use crate::app::ports::AdcPort;
use crate::error::SensorError;

/// Default number of raw samples averaged per reading.
pub const DEFAULT_AVERAGE_LEN: u16 = 1000;

/// Board families with distinct ADC scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdcProfile {
    Esp32,
    Nano33Iot,
    ArduinoUno,
    MkrWifi1010,
    /// Unknown board: assume a 10-bit, 5 V converter.
    Generic,
}

impl AdcProfile {
    /// Profile of the board this firmware is built for.
    pub const fn for_target() -> Self {
        if cfg!(target_os = "espidf") {
            Self::Esp32
        } else {
            Self::Generic
        }
    }

    /// Divisor applied to the raw count before scaling to full range.
    pub const fn divisor(self) -> f32 {
        match self {
            Self::Esp32 | Self::Nano33Iot | Self::MkrWifi1010 => 4095.0,
            Self::ArduinoUno | Self::Generic => 1024.0,
        }
    }

    pub const fn full_scale_mv(self) -> f32 {
        match self {
            Self::Esp32 | Self::Nano33Iot | Self::MkrWifi1010 => 3300.0,
            Self::ArduinoUno | Self::Generic => 5000.0,
        }
    }

    pub const fn offset_mv(self) -> f32 {
        match self {
            Self::Esp32 => 130.0,
            _ => 0.0,
        }
    }

    pub const fn resolution_bits(self) -> u8 {
        match self {
            Self::Esp32 | Self::Nano33Iot | Self::MkrWifi1010 => 12,
            Self::ArduinoUno | Self::Generic => 10,
        }
    }

    /// Largest raw count the converter can legitimately produce.
    pub const fn max_raw(self) -> u16 {
        (1u16 << self.resolution_bits()) - 1
    }

    /// Scale a (possibly fractional) raw count to millivolts.
    pub fn raw_to_mv(self, raw: f32) -> f32 {
        raw / self.divisor() * self.full_scale_mv() + self.offset_mv()
    }
}

/// Averages `average_len` samples from one [`AdcPort`].
pub struct VoltageSampler<A> {
    adc: A,
    profile: AdcProfile,
    average_len: u16,
}

impl<A: AdcPort> VoltageSampler<A> {
    pub fn new(adc: A, profile: AdcProfile, average_len: u16) -> Self {
        Self {
            adc,
            profile,
            average_len: average_len.max(1),
        }
    }

    pub fn profile(&self) -> AdcProfile {
        self.profile
    }

    pub fn average_len(&self) -> u16 {
        self.average_len
    }

    /// Mean of `average_len` samples, in millivolts.
    ///
    /// Scaling is linear, so the raw counts are averaged first and
    /// converted once. A failed read or an out-of-range count aborts the
    /// whole reading rather than averaging garbage.
    pub fn read_voltage_mv(&mut self) -> Result<f32, SensorError> {
        let max_raw = self.profile.max_raw();
        let mut sum: u32 = 0;
        for _ in 0..self.average_len {
            let raw = self
                .adc
                .read_raw()
                .map_err(|_| SensorError::HardwareUnavailable)?;
            if raw > max_raw {
                log::warn!("sampler: raw {} exceeds {}-bit range", raw, self.profile.resolution_bits());
                return Err(SensorError::HardwareUnavailable);
            }
            sum += u32::from(raw);
        }
        let mean_raw = sum as f32 / f32::from(self.average_len);
        Ok(self.profile.raw_to_mv(mean_raw))
    }

    /// Borrow the underlying ADC (tests use this to script samples).
    pub fn adc_mut(&mut self) -> &mut A {
        &mut self.adc
    }
}
