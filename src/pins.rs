//! GPIO / peripheral pin assignments for the pond monitor board.
//!
//! Single source of truth: drivers reference this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// pH probe (Gravity analog, ADC1)
// ---------------------------------------------------------------------------

/// Probe signal. ADC1 channel 6 (GPIO 34 on ESP32).
pub const PH_ADC_GPIO: i32 = 34;
/// ADC1 channel number matching [`PH_ADC_GPIO`].
pub const PH_ADC_CHANNEL: u32 = 6;

// ---------------------------------------------------------------------------
// Status LED (discrete common-cathode RGB)
// ---------------------------------------------------------------------------

pub const LED_R_GPIO: i32 = 25;
pub const LED_G_GPIO: i32 = 26;
pub const LED_B_GPIO: i32 = 27;

// ---------------------------------------------------------------------------
// I²C bus (PCF8574 LCD backpack)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 21;
pub const I2C_SCL_GPIO: i32 = 22;
/// 100 kHz is the PCF8574's rated maximum.
pub const I2C_FREQ_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC frequency for RGB status LED (1 kHz).
pub const LED_PWM_FREQ_HZ: u32 = 1_000;
