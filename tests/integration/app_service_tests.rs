//! Integration tests for the AppService → sensor / LED / LCD pipeline.
//!
//! These run on the host (x86_64) and drive the full command-dispatch chain
//! from an incoming command down to port calls, with virtual time.

use crate::mock_hw::{MockAdc, MockDisplay, MockLed, RecordingSink, VirtualClock};

use pondmonitor::app::commands::{AppCommand, StatusMessage};
use pondmonitor::app::events::AppEvent;
use pondmonitor::app::ports::Clock;
use pondmonitor::app::service::AppService;
use pondmonitor::config::SystemConfig;
use pondmonitor::drivers::led_patterns::{StatusCode, COLOUR_GREEN, COLOUR_ORANGE};
use pondmonitor::error::{CalibrationError, DisplayError, Error, SensorError};
use pondmonitor::sensors::calibration::{calc_from_formula, CalPoint};
use pondmonitor::sensors::sampler::AdcProfile;

/// Generic profile: raw 313 -> 313 / 1024 * 5000 ≈ 1528.3 mV, just below
/// the factory mid point (1529 mV).
const RAW_NEAR_MID: u16 = 313;

struct Rig {
    app: AppService<MockAdc>,
    adc: MockAdc,
    clock: VirtualClock,
    led: MockLed,
    display: MockDisplay,
    sink: RecordingSink,
}

impl Rig {
    fn new() -> Self {
        let config = SystemConfig {
            adc_profile: AdcProfile::Generic,
            average_len: 8,
            ..SystemConfig::default()
        };
        let adc = MockAdc::with_raw(RAW_NEAR_MID);
        let clock = VirtualClock::new();
        Self {
            app: AppService::new(adc.clone(), config),
            display: MockDisplay::new(&clock),
            adc,
            clock,
            led: MockLed::new(),
            sink: RecordingSink::new(),
        }
    }

    fn started() -> Self {
        let mut rig = Self::new();
        assert!(rig.app.start(&mut rig.sink));
        rig.sink.clear();
        rig
    }

    fn command(&mut self, cmd: AppCommand) {
        self.app.handle_command(cmd, &mut self.led, &mut self.sink);
    }

    /// Tick every `step_ms` up to and including `until_ms`.
    fn run_until(&mut self, until_ms: u64, step_ms: u64) {
        while self.clock.now_ms() <= until_ms {
            let now = self.clock.now_ms();
            self.app.tick(now, &mut self.led, &mut self.display, &mut self.sink);
            self.clock.advance_ms(step_ms);
        }
    }
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_probes_sensor_and_prints_banner() {
    let mut rig = Rig::new();
    assert!(rig.app.start(&mut rig.sink));
    assert!(matches!(
        rig.sink.events[0],
        AppEvent::Started { sensor_online: true, .. }
    ));
    assert_eq!(rig.adc.reads(), 8, "begin() takes one averaged probe reading");

    rig.run_until(2_000, 10);
    assert_eq!(rig.display.shown, StatusMessage::Booting.text());
    assert!(!rig.app.is_animating());
}

#[test]
fn offline_probe_is_reported_at_start() {
    let mut rig = Rig::new();
    rig.adc.set_failing(true);
    assert!(!rig.app.start(&mut rig.sink));
    assert!(!rig.app.sensor_online());
    assert!(matches!(
        rig.sink.events[0],
        AppEvent::Started { sensor_online: false, .. }
    ));
}

#[test]
fn sensor_offline_at_boot_measures_once_adc_recovers() {
    let mut rig = Rig::new();
    rig.adc.set_failing(true);
    assert!(!rig.app.start(&mut rig.sink));

    rig.command(AppCommand::MeasurePh);
    assert_eq!(
        rig.sink.last(),
        Some(&AppEvent::SensorFault(Error::Sensor(SensorError::HardwareUnavailable)))
    );

    rig.adc.set_failing(false);
    rig.sink.clear();
    rig.command(AppCommand::MeasurePh);
    assert!(
        matches!(rig.sink.events[..], [AppEvent::PhReading(_)]),
        "expected a reading, got {:?}",
        rig.sink.events
    );
    assert!(rig.app.sensor_online());
}

// ── Measurement ───────────────────────────────────────────────

#[test]
fn measure_emits_reading_and_prints_line() {
    let mut rig = Rig::started();
    rig.command(AppCommand::MeasurePh);

    let Some(AppEvent::PhReading(reading)) = rig.sink.last().copied() else {
        panic!("expected a reading, got {:?}", rig.sink.events);
    };
    assert!((reading.voltage_mv - 1528.32).abs() < 0.01);
    assert!((reading.ph - 6.864).abs() < 0.001);
    assert_eq!(reading.formula_ph, calc_from_formula(reading.voltage_mv));
    assert_eq!(rig.app.last_reading(), Some(reading));

    // The reading replaces the boot banner before it printed anything.
    rig.run_until(3_000, 10);
    assert_eq!(rig.display.shown, "pH 6.86 (1528mV)");
}

#[test]
fn adc_failure_reports_hardware_unavailable() {
    let mut rig = Rig::started();
    rig.adc.set_failing(true);
    rig.command(AppCommand::MeasurePh);
    assert_eq!(
        rig.sink.events,
        vec![AppEvent::SensorFault(Error::Sensor(SensorError::HardwareUnavailable))]
    );
    assert_eq!(rig.app.last_reading(), None);

    rig.run_until(3_000, 10);
    assert_eq!(rig.display.shown, StatusMessage::SensorFault.text());
}

#[test]
fn out_of_range_raw_is_hardware_fault() {
    let mut rig = Rig::started();
    rig.adc.set_raw(1024);
    rig.command(AppCommand::MeasurePhFormula);
    assert_eq!(
        rig.sink.events,
        vec![AppEvent::SensorFault(Error::Sensor(SensorError::HardwareUnavailable))]
    );
}

// ── Calibration ───────────────────────────────────────────────

#[test]
fn live_mid_calibration_anchors_reading_at_reference() {
    let mut rig = Rig::started();
    rig.command(AppCommand::Calibrate {
        point: CalPoint::Mid,
        voltage_mv: None,
    });
    let Some(AppEvent::Calibrated { point, voltage_mv }) = rig.sink.last().copied() else {
        panic!("expected Calibrated, got {:?}", rig.sink.events);
    };
    assert_eq!(point, CalPoint::Mid);
    assert_eq!(rig.app.calibration().point(CalPoint::Mid).voltage_mv, voltage_mv);

    rig.command(AppCommand::MeasurePh);
    let Some(AppEvent::PhReading(reading)) = rig.sink.last().copied() else {
        panic!("expected a reading");
    };
    assert_eq!(reading.ph, 6.86);
}

#[test]
fn explicit_calibration_touches_one_point_only() {
    let mut rig = Rig::started();
    let before = rig.app.calibration().clone();
    rig.command(AppCommand::Calibrate {
        point: CalPoint::High,
        voltage_mv: Some(1150.0),
    });
    let after = rig.app.calibration();
    assert_eq!(after.point(CalPoint::High).voltage_mv, 1150.0);
    assert_eq!(after.point(CalPoint::High).reference, before.point(CalPoint::High).reference);
    assert_eq!(after.point(CalPoint::Low), before.point(CalPoint::Low));
    assert_eq!(after.point(CalPoint::Mid), before.point(CalPoint::Mid));
}

#[test]
fn degenerate_calibration_fails_until_cleared() {
    let mut rig = Rig::started();
    rig.command(AppCommand::Calibrate {
        point: CalPoint::Low,
        voltage_mv: Some(1529.0),
    });
    rig.command(AppCommand::MeasurePh);
    assert_eq!(
        rig.sink.last(),
        Some(&AppEvent::SensorFault(Error::Calibration(CalibrationError::Degenerate {
            upper: CalPoint::Low,
            lower: CalPoint::Mid,
        })))
    );

    // The formula path ignores calibration entirely.
    rig.command(AppCommand::MeasurePhFormula);
    assert!(matches!(rig.sink.last(), Some(AppEvent::FormulaPh(_))));

    rig.command(AppCommand::ClearCalibration);
    assert_eq!(rig.sink.last(), Some(&AppEvent::CalibrationCleared));
    rig.command(AppCommand::MeasurePh);
    assert!(matches!(rig.sink.last(), Some(AppEvent::PhReading(_))));
}

// ── Status LED ────────────────────────────────────────────────

#[test]
fn solid_status_code_writes_immediately() {
    let mut rig = Rig::new();
    rig.command(AppCommand::ShowStatus(StatusCode::WifiAndFirebaseConnected));
    assert_eq!(rig.led.writes, vec![COLOUR_GREEN]);
    assert_eq!(
        rig.sink.events,
        vec![AppEvent::StatusShown(StatusCode::WifiAndFirebaseConnected)]
    );
    assert!(!rig.app.is_animating());
}

#[test]
fn fading_status_code_runs_on_tick() {
    let mut rig = Rig::new();
    rig.command(AppCommand::ShowStatus(StatusCode::WifiConnecting));
    assert!(rig.led.writes.is_empty(), "fades start on the next tick");

    // Default fade: 1000 ms -> 100 steps -> 201 frames, 2000 ms long.
    rig.run_until(2_000, 10);
    assert_eq!(rig.led.writes.len(), 201);
    assert_eq!(rig.led.writes[0], (0, 0, 0));
    assert_eq!(rig.led.last(), Some(COLOUR_ORANGE));
    assert!(!rig.app.is_animating());
}

#[test]
fn set_colour_cancels_fade_in_flight() {
    let mut rig = Rig::new();
    rig.command(AppCommand::FadeColour {
        r: 0,
        g: 0,
        b: 255,
        intensity: 255,
        duration_ms: 500,
    });
    rig.run_until(100, 10);
    let during = rig.led.writes.len();
    assert!(during > 0);

    rig.command(AppCommand::SetColour {
        r: 300,
        g: -1,
        b: 0,
        intensity: 128,
    });
    assert_eq!(rig.led.last(), Some((128, 0, 0)));
    rig.run_until(2_000, 10);
    assert_eq!(rig.led.writes.len(), during + 1);
}

// ── LCD ───────────────────────────────────────────────────────

#[test]
fn display_failure_drops_print_and_reports() {
    let mut rig = Rig::started();
    rig.display.set_failing(true);
    rig.run_until(0, 10);
    assert_eq!(rig.sink.events, vec![AppEvent::DisplayFault(DisplayError::Bus)]);
    assert!(!rig.app.is_animating());
}

#[test]
fn print_command_queues_message() {
    let mut rig = Rig::new();
    rig.command(AppCommand::Print(StatusMessage::Calibrating));
    rig.run_until(5_000, 25);
    assert_eq!(rig.display.shown, "Calibrating...");
}
