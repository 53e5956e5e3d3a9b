//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements          | Connects to                 |
//! |-------------|---------------------|-----------------------------|
//! | `hardware`  | AdcPort             | ESP32 ADC1 oneshot          |
//! | `lcd_i2c`   | TextDisplay         | HD44780 via PCF8574 on I²C  |
//! | `log_sink`  | EventSink           | Serial log output           |
//! | `time`      | Clock, DelayNs      | ESP32 system timer          |

pub mod hardware;
pub mod lcd_i2c;
pub mod log_sink;
pub mod time;
