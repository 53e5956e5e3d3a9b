//! Timing tests for the LCD typewriter and the LED fade against a
//! virtual clock, plus the typewriter driving a real `I2cLcd` over a
//! recording bus.

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};

use crate::mock_hw::{MockDisplay, MockLed, VirtualClock};

use pondmonitor::adapters::lcd_i2c::{I2cLcd, DEFAULT_ADDRESS};
use pondmonitor::app::ports::Clock;
use pondmonitor::drivers::lcd::{pretty_print, Typewriter, TypewriterTiming};
use pondmonitor::drivers::led_patterns::{Fade, FadeMode, StatusCode, COLOUR_BLUE};

// ── Blocking typewriter ───────────────────────────────────────

#[test]
fn pretty_print_paces_exclamation_tail() {
    let clock = VirtualClock::new();
    let mut display = MockDisplay::new(&clock);
    let mut delay = clock.clone();

    pretty_print(&mut display, &mut delay, "Done!", &TypewriterTiming::default()).unwrap();

    assert_eq!(display.char_times(), vec![0, 50, 100, 150, 400]);
    assert!(display.clears().is_empty());
    assert_eq!(display.shown, "Done!");
}

#[test]
fn pretty_print_holds_then_clears() {
    let clock = VirtualClock::new();
    let mut display = MockDisplay::new(&clock);
    let mut delay = clock.clone();
    let timing = TypewriterTiming::default().with_clear(true);

    pretty_print(&mut display, &mut delay, "Hi", &timing).unwrap();

    // Two characters: both fall in the slow tail.
    assert_eq!(display.char_times(), vec![0, 250]);
    assert_eq!(display.clears(), vec![1750]);
    assert_eq!(display.shown, "");
    assert_eq!(clock.now_ms(), 1750);
}

#[test]
fn ellipsis_slows_last_four() {
    let clock = VirtualClock::new();
    let mut display = MockDisplay::new(&clock);
    let mut delay = clock.clone();

    pretty_print(&mut display, &mut delay, "Wait...", &TypewriterTiming::default()).unwrap();

    assert_eq!(display.char_times(), vec![0, 50, 100, 350, 600, 850, 1100]);
}

#[test]
fn failing_display_aborts_blocking_print() {
    let clock = VirtualClock::new();
    let mut display = MockDisplay::new(&clock);
    display.set_failing(true);
    let mut delay = clock.clone();
    assert!(pretty_print(&mut display, &mut delay, "pH 7.00", &TypewriterTiming::default()).is_err());
    assert!(display.calls.is_empty());
}

// ── Cooperative typewriter ────────────────────────────────────

/// Poll every millisecond from `start` until the print reports done.
fn poll_to_completion(tw: &mut Typewriter, clock: &VirtualClock, display: &mut MockDisplay) {
    for _ in 0..10_000 {
        if tw.poll(clock.now_ms(), display).unwrap() {
            return;
        }
        clock.advance_ms(1);
    }
    panic!("typewriter never finished");
}

#[test]
fn poll_matches_blocking_schedule() {
    let timing = TypewriterTiming::default().with_clear(true);
    for text in ["Calibrated!", "pH 6.86 (1528mV)", "Pond monitor...", "x"] {
        let blocking_clock = VirtualClock::new();
        let mut blocking = MockDisplay::new(&blocking_clock);
        let mut delay = blocking_clock.clone();
        pretty_print(&mut blocking, &mut delay, text, &timing).unwrap();

        let polled_clock = VirtualClock::new();
        let mut polled = MockDisplay::new(&polled_clock);
        let mut tw = Typewriter::new(text, timing).unwrap();
        poll_to_completion(&mut tw, &polled_clock, &mut polled);

        assert_eq!(polled.calls, blocking.calls, "{text}");
        assert_eq!(tw.duration_ms(), blocking_clock.now_ms(), "{text}");
    }
}

#[test]
fn late_poll_catches_up_with_original_timeline() {
    let clock = VirtualClock::new();
    let mut display = MockDisplay::new(&clock);
    let mut tw = Typewriter::new("Done!", TypewriterTiming::default().with_clear(true)).unwrap();

    assert!(!tw.poll(0, &mut display).unwrap());
    // A stalled loop: three characters are due at once.
    clock.set_ms(160);
    assert!(!tw.poll(clock.now_ms(), &mut display).unwrap());
    assert_eq!(display.shown, "Done");

    // The hold is measured from when the last character was due (400 ms).
    assert!(!tw.poll(1_899, &mut display).unwrap());
    assert!(tw.poll(1_900, &mut display).unwrap());
    assert_eq!(display.clears().len(), 1);
}

// ── Fade timing ───────────────────────────────────────────────

#[test]
fn blocking_fade_sleeps_two_slices_per_step() {
    let clock = VirtualClock::new();
    let mut delay = clock.clone();
    let mut led = MockLed::new();

    let fade = Fade::from_levels(0, 0, 255, 255, 250);
    let expected_ms = fade.duration_ms();
    fade.run_blocking(&mut led, &mut delay);

    assert_eq!(expected_ms, 2 * 25 * 10);
    assert_eq!(clock.now_ms(), expected_ms);
    assert_eq!(led.writes.len(), 51);
    assert_eq!(led.last(), Some(COLOUR_BLUE));
}

#[test]
fn polled_fade_with_coarse_ticks_still_lands_on_target() {
    let mut led = MockLed::new();
    let mut fade = Fade::for_code(StatusCode::ConnectingToEsp32, 255, 1000);
    let mut now = 0;
    while !fade.poll(now, &mut led) {
        now += 37;
    }
    assert!(led.writes.len() < fade.frame_count() as usize);
    assert_eq!(led.last(), Some(COLOUR_BLUE));
    assert!(now >= fade.duration_ms());
}

#[test]
fn intensity_only_fade_keeps_hue_ratio() {
    let fade = Fade::new((255, 200, 0), 255, 100, FadeMode::IntensityOnly);
    let mut led = MockLed::new();
    let clock = VirtualClock::new();
    let mut delay = clock.clone();
    fade.run_blocking(&mut led, &mut delay);
    for &(r, g, b) in &led.writes {
        assert_eq!(b, 0);
        assert!(g <= r);
    }
}

// ── Typewriter over the I²C adapter ───────────────────────────

#[derive(Default)]
struct RecordingBus {
    bytes: Vec<u8>,
    addresses: Vec<u8>,
}

impl ErrorType for RecordingBus {
    type Error = ErrorKind;
}

impl I2c for RecordingBus {
    fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        for op in operations {
            if let Operation::Write(data) = op {
                self.addresses.push(address);
                self.bytes.extend_from_slice(data);
            }
        }
        Ok(())
    }
}

#[test]
fn typewriter_drives_lcd_over_i2c() {
    let clock = VirtualClock::new();
    let mut lcd = I2cLcd::new(RecordingBus::default(), clock.clone(), DEFAULT_ADDRESS, 2);
    lcd.init().unwrap();
    let (bus, _) = lcd.release();
    let init_len = bus.bytes.len();

    let mut lcd = I2cLcd::new(bus, clock.clone(), DEFAULT_ADDRESS, 2);
    let mut delay = clock.clone();
    pretty_print(&mut lcd, &mut delay, "OK", &TypewriterTiming::default()).unwrap();
    let (bus, _) = lcd.release();

    // Each character is two nibbles of three expander writes.
    assert_eq!(bus.bytes.len(), init_len + 2 * 6);
    assert!(bus.addresses.iter().all(|&a| a == DEFAULT_ADDRESS));
    // 'O' = 0x4F: high nibble 0x4 with RS and backlight set.
    assert_eq!(bus.bytes[init_len], 0x49);
}
