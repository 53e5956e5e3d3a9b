//! Hardware adapter — bridges the on-board peripherals to domain port traits.
//!
//! [`PhAdc`] is the pH probe's ADC1 channel behind [`AdcPort`]. The status
//! LED's port lives with its driver in
//! [`StatusLed`](crate::drivers::status_led::StatusLed). On non-espidf
//! targets the underlying `hw_init` accessors are simulation stubs.

use crate::app::ports::AdcPort;
use crate::drivers::hw_init;
use crate::error::SensorError;
use crate::pins;

/// One ADC1 oneshot channel.
pub struct PhAdc {
    channel: u32,
}

impl Default for PhAdc {
    fn default() -> Self {
        Self::new(pins::PH_ADC_CHANNEL)
    }
}

impl PhAdc {
    pub fn new(channel: u32) -> Self {
        Self { channel }
    }

    pub fn channel(&self) -> u32 {
        self.channel
    }

    /// Host simulation: make the next reads on this channel return `raw`.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_raw(&self, raw: u16) {
        hw_init::sim_set_adc(self.channel, raw);
    }
}

impl AdcPort for PhAdc {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        hw_init::adc1_read(self.channel).map_err(|e| {
            log::warn!("adc: CH{} read failed (rc={})", self.channel, e.0);
            SensorError::HardwareUnavailable
        })
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn reads_simulated_channel() {
        // Channel 3 is unused by the board; keep clear of the real pH channel.
        let mut adc = PhAdc::new(3);
        adc.sim_set_raw(2048);
        assert_eq!(adc.read_raw(), Ok(2048));
    }

    #[test]
    fn default_is_ph_channel() {
        assert_eq!(PhAdc::default().channel(), pins::PH_ADC_CHANNEL);
    }
}
