//! Fuzz target: `Typewriter::poll`
//!
//! Feeds arbitrary UTF-8 text and an arbitrary poll cadence through the
//! cooperative typewriter and asserts it never panics, terminates, and
//! shows exactly the accepted text.
//!
//! cargo fuzz run fuzz_typewriter

#![no_main]

use libfuzzer_sys::fuzz_target;
use pondmonitor::app::ports::TextDisplay;
use pondmonitor::drivers::lcd::{Typewriter, TypewriterTiming};
use pondmonitor::error::DisplayError;

struct Screen(String);

impl TextDisplay for Screen {
    fn write_char(&mut self, c: char) -> Result<(), DisplayError> {
        self.0.push(c);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&step, rest)) = data.split_first() else {
        return;
    };
    let Ok(text) = core::str::from_utf8(rest) else {
        return;
    };
    let timing = TypewriterTiming::default().with_clear(step & 1 == 1);
    let Ok(mut tw) = Typewriter::new(text, timing) else {
        assert!(text.len() > 80);
        return;
    };

    let step = u64::from(step.max(1));
    let mut screen = Screen(String::new());
    let mut now = 0u64;
    while !tw.poll(now, &mut screen).unwrap() {
        now += step;
        assert!(now <= tw.duration_ms() + step, "typewriter overran its schedule");
    }
    assert_eq!(screen.0, text);
});
