//! Character-paced "typewriter" printing for the status LCD.
//!
//! Text appears one character at a time. The last few characters are
//! slowed down for effect: the final four when the text ends in `"..."`,
//! the final one when it ends in `"!"`, otherwise the final three. An
//! optional hold-then-clear follows the last character.
//!
//! [`Typewriter::poll`] is the cooperative engine; [`pretty_print`] is the
//! blocking wrapper.

use embedded_hal::delay::DelayNs;
use heapless::String;
use serde::{Deserialize, Serialize};

use crate::app::ports::TextDisplay;
use crate::error::DisplayError;

/// HD44780 display RAM holds 80 characters.
pub const TEXT_CAPACITY: usize = 80;

/// Pacing of one print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypewriterTiming {
    /// Clear the screen once the text has been shown.
    pub clear_display: bool,
    /// Hold time between the last character and the clear.
    pub delay_before_clear_ms: u32,
    /// Gap between ordinary characters.
    pub char_delay_ms: u32,
    /// Gap before each of the trailing, slowed-down characters.
    pub end_char_delay_ms: u32,
}

impl Default for TypewriterTiming {
    fn default() -> Self {
        Self {
            clear_display: false,
            delay_before_clear_ms: 1500,
            char_delay_ms: 50,
            end_char_delay_ms: 250,
        }
    }
}

impl TypewriterTiming {
    pub fn with_clear(mut self, clear: bool) -> Self {
        self.clear_display = clear;
        self
    }
}

/// Index of the first character printed at the slow pace.
fn slow_from(text: &str, len: usize) -> usize {
    let tail = if text.ends_with("...") {
        4
    } else if text.ends_with('!') {
        1
    } else {
        3
    };
    len.saturating_sub(tail)
}

/// Gap to wait before printing character `index` (the first one is immediate).
fn gap_before(index: usize, slow_from: usize, timing: &TypewriterTiming) -> u32 {
    match index {
        0 => 0,
        i if i >= slow_from => timing.end_char_delay_ms,
        _ => timing.char_delay_ms,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Printing,
    Holding { clear_at: u64 },
    Done,
}

/// Cooperative typewriter: owns its text and advances on each poll.
#[derive(Debug, Clone)]
pub struct Typewriter {
    text: String<TEXT_CAPACITY>,
    timing: TypewriterTiming,
    len: usize,
    slow_from: usize,
    next_index: usize,
    next_due: Option<u64>,
    phase: Phase,
}

impl Typewriter {
    pub fn new(text: &str, timing: TypewriterTiming) -> Result<Self, DisplayError> {
        let mut owned = String::new();
        owned.push_str(text).map_err(|_| DisplayError::TextTooLong)?;
        let len = text.chars().count();
        Ok(Self {
            text: owned,
            timing,
            len,
            slow_from: slow_from(text, len),
            next_index: 0,
            next_due: None,
            phase: Phase::Printing,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Total time the print takes from the first character to the end
    /// (including the hold before clearing).
    pub fn duration_ms(&self) -> u64 {
        let chars: u64 = (0..self.len)
            .map(|i| u64::from(gap_before(i, self.slow_from, &self.timing)))
            .sum();
        if self.timing.clear_display {
            chars + u64::from(self.timing.delay_before_clear_ms)
        } else {
            chars
        }
    }

    /// Write every character that has fallen due by `now_ms`. Returns
    /// `true` once the text is fully printed (and cleared, if requested).
    pub fn poll(&mut self, now_ms: u64, display: &mut impl TextDisplay) -> Result<bool, DisplayError> {
        loop {
            match self.phase {
                Phase::Done => return Ok(true),
                Phase::Holding { clear_at } => {
                    if now_ms < clear_at {
                        return Ok(false);
                    }
                    display.clear()?;
                    self.phase = Phase::Done;
                }
                Phase::Printing => {
                    let Some(c) = self.text.chars().nth(self.next_index) else {
                        let last = self.next_due.unwrap_or(now_ms);
                        self.phase = if self.timing.clear_display {
                            Phase::Holding {
                                clear_at: last + u64::from(self.timing.delay_before_clear_ms),
                            }
                        } else {
                            Phase::Done
                        };
                        continue;
                    };
                    let due = *self.next_due.get_or_insert(now_ms);
                    if now_ms < due {
                        return Ok(false);
                    }
                    display.write_char(c)?;
                    self.next_index += 1;
                    if self.next_index < self.len {
                        let gap = gap_before(self.next_index, self.slow_from, &self.timing);
                        self.next_due = Some(due + u64::from(gap));
                    }
                }
            }
        }
    }
}

/// Print `text` with typewriter pacing, blocking until done.
pub fn pretty_print(
    display: &mut impl TextDisplay,
    delay: &mut impl DelayNs,
    text: &str,
    timing: &TypewriterTiming,
) -> Result<(), DisplayError> {
    let len = text.chars().count();
    let slow = slow_from(text, len);
    for (i, c) in text.chars().enumerate() {
        let gap = gap_before(i, slow, timing);
        if gap > 0 {
            delay.delay_ms(gap);
        }
        display.write_char(c)?;
    }
    if timing.clear_display {
        delay.delay_ms(timing.delay_before_clear_ms);
        display.clear()?;
    }
    Ok(())
}
