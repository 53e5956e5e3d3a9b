//! RGB status LED driver.
//!
//! Three LEDC PWM channels drive the on-board RGB LED. Colours are given
//! as 0–255 channel levels plus a 0–255 intensity; each channel is written
//! as `level * intensity / 255`.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives three LEDC PWM channels via hw_init.
//! On host/test: tracks state in-memory only.

use crate::app::ports::LedPort;
use crate::drivers::hw_init;

/// Colour as (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

pub const INTENSITY_MIN: u8 = 0;
pub const INTENSITY_DIM: u8 = 16;
pub const INTENSITY_LOW: u8 = 64;
pub const INTENSITY_MEDIUM: u8 = 128;
pub const INTENSITY_HIGH: u8 = 192;
pub const INTENSITY_BRIGHT: u8 = 224;
pub const INTENSITY_MAX: u8 = 255;

/// Clamp an untrusted level into 0–255.
pub fn clamp_level(value: i32) -> u8 {
    value.clamp(i32::from(INTENSITY_MIN), i32::from(INTENSITY_MAX)) as u8
}

/// Scale a colour by an intensity (integer, truncating).
pub fn apply_intensity(colour: Rgb, intensity: u8) -> Rgb {
    let scale = |c: u8| ((u16::from(c) * u16::from(intensity)) / u16::from(INTENSITY_MAX)) as u8;
    (scale(colour.0), scale(colour.1), scale(colour.2))
}

/// Clamp raw inputs, scale by intensity and write to the LED.
pub fn set_colour(led: &mut impl LedPort, r: i32, g: i32, b: i32, intensity: i32) {
    let colour = (clamp_level(r), clamp_level(g), clamp_level(b));
    set_code(led, colour, intensity);
}

/// Write a table colour at the given (clamped) intensity.
pub fn set_code(led: &mut impl LedPort, colour: Rgb, intensity: i32) {
    let (r, g, b) = apply_intensity(colour, clamp_level(intensity));
    led.set_led(r, g, b);
}

pub struct StatusLed {
    current: Rgb,
}

impl Default for StatusLed {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusLed {
    pub fn new() -> Self {
        Self { current: (0, 0, 0) }
    }

    pub fn off(&mut self) {
        self.set_led(0, 0, 0);
    }

    pub fn current_colour(&self) -> Rgb {
        self.current
    }
}

impl LedPort for StatusLed {
    fn set_led(&mut self, r: u8, g: u8, b: u8) {
        hw_init::ledc_set(hw_init::LEDC_CH_LED_R, r);
        hw_init::ledc_set(hw_init::LEDC_CH_LED_G, g);
        hw_init::ledc_set(hw_init::LEDC_CH_LED_B, b);
        self.current = (r, g, b);
    }
}
