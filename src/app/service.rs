//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the pH sensor, the live configuration and the
//! in-flight indicator animations (one LED fade, one LCD print). All I/O
//! flows through port traits injected at call sites, making the entire
//! service testable with mock adapters.
//!
//! ```text
//!      AdcPort ──▶ ┌───────────────────────────────┐ ──▶ EventSink
//!                  │          AppService           │
//!      LedPort ◀── │ PhSensor · Fade · Typewriter  │
//!  TextDisplay ◀── └───────────────────────────────┘
//! ```
//!
//! Fades and prints are started by commands and advanced by [`tick`](AppService::tick);
//! nothing here blocks. A new fade or print replaces the one in flight.

use core::fmt::Write as _;

use heapless::String;
use log::{info, warn};

use crate::config::{SystemConfig, RELEASE_VERSION};
use crate::drivers::lcd::{Typewriter, TEXT_CAPACITY};
use crate::drivers::led_patterns::{Fade, StatusCode};
use crate::drivers::status_led::{set_code, set_colour};
use crate::error::Error;
use crate::sensors::calibration::PhCalibration;
use crate::sensors::ph::{PhReading, PhSensor};
use crate::sensors::sampler::VoltageSampler;
use crate::sensors::AnalogSensor;

use super::commands::{AppCommand, StatusMessage};
use super::events::AppEvent;
use super::ports::{AdcPort, EventSink, LedPort, TextDisplay};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

pub struct AppService<A> {
    sensor: PhSensor<A>,
    config: SystemConfig,
    fade: Option<Fade>,
    print: Option<Typewriter>,
    last_reading: Option<PhReading>,
}

impl<A: AdcPort> AppService<A> {
    /// Construct the service from configuration.
    ///
    /// Does **not** probe the sensor; call [`start`](Self::start) next.
    pub fn new(adc: A, config: SystemConfig) -> Self {
        let sampler = VoltageSampler::new(adc, config.adc_profile, config.average_len);
        let calibration = PhCalibration::new(config.solutions, config.factory);
        Self {
            sensor: PhSensor::new(sampler, calibration),
            config,
            fade: None,
            print: None,
            last_reading: None,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Probe the sensor and queue the boot banner. A probe that is offline
    /// here is not disabled; later commands sample it again.
    pub fn start(&mut self, sink: &mut impl EventSink) -> bool {
        let sensor_online = self.sensor.begin();
        sink.emit(&AppEvent::Started {
            version: RELEASE_VERSION,
            sensor_online,
        });
        info!("AppService started (v{}, probe {})", RELEASE_VERSION, if sensor_online { "online" } else { "offline" });
        self.queue_print(StatusMessage::Booting.text(), sink);
        sensor_online
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Advance the in-flight fade and print to `now_ms`.
    pub fn tick(
        &mut self,
        now_ms: u64,
        led: &mut impl LedPort,
        display: &mut impl TextDisplay,
        sink: &mut impl EventSink,
    ) {
        if let Some(fade) = self.fade.as_mut() {
            if fade.poll(now_ms, led) {
                self.fade = None;
            }
        }

        if let Some(print) = self.print.as_mut() {
            match print.poll(now_ms, display) {
                Ok(true) => self.print = None,
                Ok(false) => {}
                Err(e) => {
                    warn!("lcd: dropping print '{}': {}", print.text(), e);
                    self.print = None;
                    sink.emit(&AppEvent::DisplayFault(e));
                }
            }
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (from scheduler, console, etc.).
    pub fn handle_command(&mut self, cmd: AppCommand, led: &mut impl LedPort, sink: &mut impl EventSink) {
        match cmd {
            AppCommand::MeasurePh => match self.sensor.measure() {
                Ok(reading) => {
                    self.last_reading = Some(reading);
                    sink.emit(&AppEvent::PhReading(reading));
                    let line = reading_line(&reading);
                    self.queue_print(&line, sink);
                }
                Err(e) => self.report_fault(e, sink),
            },
            AppCommand::MeasurePhFormula => match self.sensor.measure_formula() {
                Ok(ph) => sink.emit(&AppEvent::FormulaPh(ph)),
                Err(e) => self.report_fault(e, sink),
            },
            AppCommand::Calibrate { point, voltage_mv } => {
                match self.sensor.calibrate(point, voltage_mv) {
                    Ok(mv) => {
                        sink.emit(&AppEvent::Calibrated { point, voltage_mv: mv });
                        self.queue_print(StatusMessage::CalibrationSaved.text(), sink);
                    }
                    Err(e) => self.report_fault(e, sink),
                }
            }
            AppCommand::ClearCalibration => {
                self.sensor.clear_calibration();
                sink.emit(&AppEvent::CalibrationCleared);
            }
            AppCommand::ShowStatus(code) => {
                self.show_status(code, led);
                sink.emit(&AppEvent::StatusShown(code));
            }
            AppCommand::SetColour { r, g, b, intensity } => {
                self.fade = None;
                set_colour(led, r, g, b, intensity);
            }
            AppCommand::FadeColour { r, g, b, intensity, duration_ms } => {
                self.fade = Some(Fade::from_levels(r, g, b, intensity, duration_ms));
            }
            AppCommand::Print(msg) => self.queue_print(msg.text(), sink),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn last_reading(&self) -> Option<PhReading> {
        self.last_reading
    }

    pub fn calibration(&self) -> &PhCalibration {
        self.sensor.calibration()
    }

    pub fn sensor_online(&self) -> bool {
        self.sensor.is_online()
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// A fade or print is still in flight.
    pub fn is_animating(&self) -> bool {
        self.fade.is_some() || self.print.is_some()
    }

    // ── Internal ──────────────────────────────────────────────

    fn show_status(&mut self, code: StatusCode, led: &mut impl LedPort) {
        let intensity = i32::from(self.config.led_intensity);
        if code.fades() {
            self.fade = Some(Fade::for_code(code, intensity, self.config.fade_duration_ms));
        } else {
            self.fade = None;
            set_code(led, code.colour(), intensity);
        }
    }

    fn queue_print(&mut self, text: &str, sink: &mut impl EventSink) {
        match Typewriter::new(text, self.config.lcd_timing) {
            Ok(tw) => self.print = Some(tw),
            Err(e) => sink.emit(&AppEvent::DisplayFault(e)),
        }
    }

    fn report_fault(&mut self, e: Error, sink: &mut impl EventSink) {
        warn!("ph: {}", e);
        sink.emit(&AppEvent::SensorFault(e));
        self.queue_print(StatusMessage::SensorFault.text(), sink);
    }
}

/// LCD line for one reading, e.g. `pH 7.02 (1529mV)`.
pub fn reading_line(reading: &PhReading) -> String<TEXT_CAPACITY> {
    let mut line = String::new();
    // 80 characters always fit two formatted floats.
    if write!(line, "pH {:.2} ({:.0}mV)", reading.ph, reading.voltage_mv).is_err() {
        line.clear();
    }
    line
}
