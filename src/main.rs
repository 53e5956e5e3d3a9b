//! Pond monitor firmware — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  PhAdc        StatusLed    I2cLcd         LogEventSink       │
//! │  (AdcPort)    (LedPort)    (TextDisplay)  (EventSink)        │
//! │  Esp32TimeAdapter (Clock + DelayNs)                          │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ─────────────────       │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │            AppService (pure logic)                     │  │
//! │  │  PhSensor · Fade · Typewriter                          │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                                                              │
//! │  Scheduler (delegate-driven)                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{anyhow, Result};
use esp_idf_hal::delay::Delay;
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::{error, info, warn};

use pondmonitor::adapters::hardware::PhAdc;
use pondmonitor::adapters::lcd_i2c::I2cLcd;
use pondmonitor::adapters::log_sink::LogEventSink;
use pondmonitor::adapters::time::Esp32TimeAdapter;
use pondmonitor::app::commands::AppCommand;
use pondmonitor::app::ports::{Clock, ScheduleFiredKind, SchedulerDelegate};
use pondmonitor::app::service::AppService;
use pondmonitor::config::{SystemConfig, RELEASE_VERSION};
use pondmonitor::drivers::hw_init;
use pondmonitor::drivers::status_led::StatusLed;
use pondmonitor::pins;
use pondmonitor::scheduler::{Schedule, ScheduleKind, Scheduler};

use embedded_hal::delay::DelayNs;

const SCHEDULE_PH_SAMPLE: &str = "ph-sample";

// ── Scheduler delegate ────────────────────────────────────────
//
// Bridges the scheduler (which knows nothing about the service) to
// AppService commands, queued until the loop body drains them.

#[derive(Default)]
struct CommandQueueDelegate {
    pending: heapless::Vec<AppCommand, 4>,
}

impl SchedulerDelegate for CommandQueueDelegate {
    fn on_schedule_fired(&mut self, label: &'static str, kind: ScheduleFiredKind) {
        let cmd = match label {
            SCHEDULE_PH_SAMPLE => AppCommand::MeasurePh,
            other => {
                warn!("Schedule fired: unknown '{}' ({:?})", other, kind);
                return;
            }
        };
        if self.pending.push(cmd).is_err() {
            warn!("Schedule fired: command queue full, dropping {:?}", cmd);
        }
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Pond monitor v{:<22}║", RELEASE_VERSION);
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    config.validate().map_err(|e| anyhow!("invalid config: {e}"))?;

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals().map_err(|e| anyhow!("HAL init failed: {e}"))?;

    let peripherals = Peripherals::take()?;
    // GPIO 21 / 22 = pins::I2C_SDA_GPIO / pins::I2C_SCL_GPIO
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio21,
        peripherals.pins.gpio22,
        &I2cConfig::new().baudrate(Hertz(pins::I2C_FREQ_HZ)),
    )?;
    let mut lcd = I2cLcd::new(i2c, Delay::new_default(), config.lcd_i2c_address, 2);
    if let Err(e) = lcd.init() {
        // Keep running: prints will surface as DisplayFault events.
        warn!("LCD init failed: {}", e);
    }

    let mut led = StatusLed::new();
    let mut log_sink = LogEventSink::new();
    let mut clock = Esp32TimeAdapter::new();

    // ── 4. App service ────────────────────────────────────────
    let mut app = AppService::new(PhAdc::default(), config.clone());
    let online = app.start(&mut log_sink);
    let ready = if online {
        AppCommand::FadeColour { r: 0, g: 255, b: 0, intensity: i32::from(config.led_intensity), duration_ms: config.fade_duration_ms }
    } else {
        error!("pH probe offline at boot; sampling will keep retrying");
        AppCommand::SetColour { r: 255, g: 0, b: 0, intensity: i32::from(config.led_intensity) }
    };
    app.handle_command(ready, &mut led, &mut log_sink);

    // ── 5. Scheduler ──────────────────────────────────────────
    let mut sched = Scheduler::new();
    let mut delegate = CommandQueueDelegate::default();
    sched.add(Schedule {
        label: SCHEDULE_PH_SAMPLE,
        kind: ScheduleKind::Periodic {
            interval_ms: config.sample_interval_ms,
        },
        enabled: true,
    });

    info!("System ready. Entering control loop.");

    // ── 6. Control loop ───────────────────────────────────────
    loop {
        let now_ms = clock.now_ms();
        sched.tick(now_ms, &mut delegate);

        for cmd in core::mem::take(&mut delegate.pending) {
            app.handle_command(cmd, &mut led, &mut log_sink);
        }

        app.tick(now_ms, &mut led, &mut lcd, &mut log_sink);

        clock.delay_ms(config.control_loop_interval_ms);
    }
}
