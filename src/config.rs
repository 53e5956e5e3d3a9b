//! System configuration parameters
//!
//! All tunable parameters for the pond monitor, plus the templates for the
//! BLE identity and the deployment secrets. Defaults are the compile-time
//! values; host tooling can supply JSON.

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::drivers::lcd::TypewriterTiming;
use crate::drivers::status_led::INTENSITY_MAX;
use crate::error::{Error, Result};
use crate::sensors::calibration::{FactoryVoltages, ReferenceSolutions};
use crate::sensors::sampler::{AdcProfile, DEFAULT_AVERAGE_LEN};

/// Firmware release, reported at boot and in telemetry.
pub const RELEASE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- pH probe ---
    /// ADC scaling of the board the probe is wired to
    pub adc_profile: AdcProfile,
    /// Raw samples averaged per voltage reading
    pub average_len: u16,
    /// Buffer solutions used for the three calibration points
    pub solutions: ReferenceSolutions,
    /// Voltages restored by a calibration reset
    pub factory: FactoryVoltages,

    // --- Status LED ---
    /// Default intensity for status colours (0-255)
    pub led_intensity: u8,
    /// Length of one fade sequence (milliseconds)
    pub fade_duration_ms: u32,

    // --- LCD ---
    pub lcd_timing: TypewriterTiming,
    /// I²C address of the PCF8574 backpack
    pub lcd_i2c_address: u8,

    // --- Timing ---
    /// pH sample interval (milliseconds)
    pub sample_interval_ms: u32,
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            adc_profile: AdcProfile::for_target(),
            average_len: DEFAULT_AVERAGE_LEN,
            solutions: ReferenceSolutions::default(),
            factory: FactoryVoltages::default(),

            led_intensity: INTENSITY_MAX,
            fade_duration_ms: 1000,

            lcd_timing: TypewriterTiming::default(),
            lcd_i2c_address: 0x27,

            sample_interval_ms: 5_000,
            control_loop_interval_ms: 10, // one fade slice
        }
    }
}

impl SystemConfig {
    /// Reject values the firmware cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.average_len == 0 {
            return Err(Error::Config("average_len must be at least 1"));
        }
        let s = &self.solutions;
        if !(s.low_ph < s.mid_ph && s.mid_ph < s.high_ph) {
            return Err(Error::Config("reference solutions must satisfy low < mid < high"));
        }
        let f = &self.factory;
        if !(f.low_mv > f.mid_mv && f.mid_mv > f.high_mv) {
            return Err(Error::Config("factory voltages must satisfy low > mid > high"));
        }
        if !(0x03..=0x77).contains(&self.lcd_i2c_address) {
            return Err(Error::Config("LCD I2C address outside 7-bit range"));
        }
        if self.control_loop_interval_ms == 0 || self.sample_interval_ms < self.control_loop_interval_ms {
            return Err(Error::Config("loop interval must be non-zero and no longer than the sample interval"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// BLE identity template
// ---------------------------------------------------------------------------

/// GATT UUIDs are written in their 36-character hyphenated form.
pub type Uuid = String<36>;

/// BLE peripheral name and the UUIDs of the sensor-data service. Empty by
/// default; deployments fill them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BleConfig {
    pub peripheral_name: String<32>,
    pub sensor_data_service: Uuid,
    pub temperature_characteristic: Uuid,
    pub total_dissolved_solids_characteristic: Uuid,
    pub turbidity_value_characteristic: Uuid,
    pub turbidity_voltage_characteristic: Uuid,
    pub water_level_characteristic: Uuid,
    pub ph_characteristic: Uuid,
}

impl BleConfig {
    pub fn validate(&self) -> Result<()> {
        if !is_printable_ascii(&self.peripheral_name) {
            return Err(Error::Config("BLE peripheral name must be printable ASCII"));
        }
        let uuids = [
            &self.sensor_data_service,
            &self.temperature_characteristic,
            &self.total_dissolved_solids_characteristic,
            &self.turbidity_value_characteristic,
            &self.turbidity_voltage_characteristic,
            &self.water_level_characteristic,
            &self.ph_characteristic,
        ];
        if uuids.iter().all(|u| u.is_empty() || is_uuid(u)) {
            Ok(())
        } else {
            Err(Error::Config("BLE UUIDs must be empty or 8-4-4-4-12 hex"))
        }
    }
}

/// `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`
fn is_uuid(s: &str) -> bool {
    s.len() == 36
        && s.bytes().enumerate().all(|(i, b)| match i {
            8 | 13 | 18 | 23 => b == b'-',
            _ => b.is_ascii_hexdigit(),
        })
}

// ---------------------------------------------------------------------------
// Secrets template
// ---------------------------------------------------------------------------

/// Deployment credentials. Never logged; `Debug` redacts the passwords.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secrets {
    pub database_url: String<128>,
    pub database_secret: String<64>,
    pub wifi_ssid: String<32>,
    pub wifi_pass: String<64>,
    /// MAC of the Ethernet shield (MKR 1010 builds).
    pub eth_shield_mac: [u8; 6],
    pub device_ip: [u8; 4],
    pub dns_gateway: [u8; 4],
    /// Local UDP port for NTP.
    pub ntp_local_port: u16,
}

impl core::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Secrets")
            .field("database_url", &self.database_url)
            .field("database_secret", &"<redacted>")
            .field("wifi_ssid", &self.wifi_ssid)
            .field("wifi_pass", &"<redacted>")
            .field("eth_shield_mac", &self.eth_shield_mac)
            .field("device_ip", &self.device_ip)
            .field("dns_gateway", &self.dns_gateway)
            .field("ntp_local_port", &self.ntp_local_port)
            .finish()
    }
}

impl Secrets {
    pub fn validate(&self) -> Result<()> {
        let fields: [&str; 4] = [
            &self.database_url,
            &self.database_secret,
            &self.wifi_ssid,
            &self.wifi_pass,
        ];
        if fields.iter().all(|f| is_printable_ascii(f)) {
            Ok(())
        } else {
            Err(Error::Config("secrets must be printable ASCII"))
        }
    }

    /// WiFi credentials are present.
    pub fn has_wifi(&self) -> bool {
        !self.wifi_ssid.is_empty()
    }
}

/// Returns `true` if every byte of `s` is in the printable ASCII range
/// `0x20..=0x7E` (space through tilde, inclusive).
pub fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}
