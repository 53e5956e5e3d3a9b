//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! Readings are additionally rendered as one JSON object per line so a
//! host script can scrape them off the serial console.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { version, sensor_online } => {
                info!("START | v{} | probe={}", version, if *sensor_online { "online" } else { "OFFLINE" });
            }
            AppEvent::PhReading(r) => {
                info!(
                    "PH    | {:.1} mV | pH {:.2} | formula {:.2}",
                    r.voltage_mv, r.ph, r.formula_ph
                );
                match serde_json::to_string(r) {
                    Ok(json) => info!("JSON  | {}", json),
                    Err(e) => warn!("JSON  | encode failed: {}", e),
                }
            }
            AppEvent::FormulaPh(ph) => {
                info!("PH    | formula {:.2}", ph);
            }
            AppEvent::Calibrated { point, voltage_mv } => {
                info!("CAL   | {} <- {:.1} mV", point, voltage_mv);
            }
            AppEvent::CalibrationCleared => {
                info!("CAL   | reset to factory");
            }
            AppEvent::StatusShown(code) => {
                info!("LED   | {:?}", code);
            }
            AppEvent::SensorFault(e) => {
                warn!("FAULT | {}", e);
            }
            AppEvent::DisplayFault(e) => {
                warn!("LCD   | {}", e);
            }
        }
    }
}
