//! Indicator drivers, hardware initialisation, and peripheral helpers.

pub mod hw_init;
pub mod lcd;
pub mod led_patterns;
pub mod status_led;
