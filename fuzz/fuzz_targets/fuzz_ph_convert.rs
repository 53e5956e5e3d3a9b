//! Fuzz target: `PhCalibration::convert`
//!
//! Interprets the input as four little-endian f32 values (low, mid and
//! high calibration voltages, then the probe voltage) and asserts that
//! conversion never panics and only succeeds on a usable curve.
//!
//! cargo fuzz run fuzz_ph_convert

#![no_main]

use libfuzzer_sys::fuzz_target;
use pondmonitor::sensors::calibration::{CalPoint, PhCalibration, ReferenceSolutions};

fuzz_target!(|data: &[u8]| {
    if data.len() < 16 {
        return;
    }
    let f = |i: usize| f32::from_le_bytes([data[i], data[i + 1], data[i + 2], data[i + 3]]);
    let (low, mid, high, v) = (f(0), f(4), f(8), f(12));

    let mut cal = PhCalibration::with_voltages(ReferenceSolutions::default(), low, mid, high);
    match cal.convert(v) {
        Ok(_) => assert!(cal.check().is_ok(), "converted on a degenerate curve"),
        Err(_) => assert!(cal.check().is_err()),
    }

    // A reset always yields a usable curve again.
    cal.set_voltage(CalPoint::Mid, v);
    cal.clear();
    assert!(cal.convert(v).is_ok());
});
