//! HD44780 character LCD behind a PCF8574 I²C backpack.
//!
//! Implements [`TextDisplay`] for any blocking `embedded-hal` I²C bus, so
//! the same adapter runs on the ESP-IDF `I2cDriver` and on a mock bus in
//! tests. The controller is driven in 4-bit mode; every nibble costs three
//! single-byte bus writes (set, strobe EN high, strobe EN low).
//!
//! Backpack wiring (the common "LCM1602" board):
//!
//! | PCF8574 | P0 | P1 | P2 | P3        | P4–P7   |
//! |---------|----|----|----|-----------|---------|
//! | LCD     | RS | RW | EN | backlight | D4–D7   |

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::debug;

use crate::app::ports::TextDisplay;
use crate::error::DisplayError;

/// Factory address with A0–A2 pulled high.
pub const DEFAULT_ADDRESS: u8 = 0x27;

const RS: u8 = 0x01;
const EN: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

const CMD_CLEAR: u8 = 0x01;
const CMD_HOME: u8 = 0x02;
const CMD_ENTRY_LEFT: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;

/// DDRAM start of each row (20x4 layout; 16x2 uses the first two).
const ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

pub struct I2cLcd<I, D> {
    i2c: I,
    delay: D,
    address: u8,
    rows: u8,
    row: u8,
    backlight: u8,
}

impl<I: I2c, D: DelayNs> I2cLcd<I, D> {
    /// The display is not usable until [`init`](Self::init) succeeds.
    pub fn new(i2c: I, delay: D, address: u8, rows: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            rows: rows.clamp(1, ROW_OFFSETS.len() as u8),
            row: 0,
            backlight: BACKLIGHT,
        }
    }

    /// Power-on sequence: force 8-bit mode three times, drop to 4-bit,
    /// then configure two lines, display on, cleared, left-to-right entry.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.delay.delay_ms(50);
        self.expander_write(0)?;

        for wait_us in [4_500, 4_500, 150] {
            self.write_nibble(0x03 << 4)?;
            self.delay.delay_us(wait_us);
        }
        self.write_nibble(0x02 << 4)?;

        self.command(CMD_FUNCTION_4BIT_2LINE)?;
        self.command(CMD_DISPLAY_ON)?;
        self.clear()?;
        self.command(CMD_ENTRY_LEFT)?;
        debug!("lcd: HD44780 ready at 0x{:02x} ({} rows)", self.address, self.rows);
        Ok(())
    }

    pub fn set_backlight(&mut self, on: bool) -> Result<(), DisplayError> {
        self.backlight = if on { BACKLIGHT } else { 0 };
        self.expander_write(0)
    }

    /// Move the cursor; out-of-range rows wrap to the last row.
    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
        let row = row.min(self.rows - 1);
        self.row = row;
        self.command(CMD_SET_DDRAM | col.wrapping_add(ROW_OFFSETS[row as usize]))
    }

    pub fn home(&mut self) -> Result<(), DisplayError> {
        self.row = 0;
        self.command(CMD_HOME)?;
        self.delay.delay_us(2_000);
        Ok(())
    }

    /// Hand the bus and delay back.
    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }

    fn command(&mut self, value: u8) -> Result<(), DisplayError> {
        self.send(value, 0)
    }

    fn send(&mut self, value: u8, mode: u8) -> Result<(), DisplayError> {
        self.write_nibble((value & 0xF0) | mode)?;
        self.write_nibble(((value << 4) & 0xF0) | mode)
    }

    fn write_nibble(&mut self, value: u8) -> Result<(), DisplayError> {
        self.expander_write(value)?;
        self.expander_write(value | EN)?;
        self.delay.delay_us(1);
        self.expander_write(value & !EN)?;
        self.delay.delay_us(50);
        Ok(())
    }

    fn expander_write(&mut self, value: u8) -> Result<(), DisplayError> {
        self.i2c
            .write(self.address, &[value | self.backlight])
            .map_err(|_| DisplayError::Bus)
    }
}

impl<I: I2c, D: DelayNs> TextDisplay for I2cLcd<I, D> {
    /// `'\n'` moves to the start of the next row; characters outside the
    /// controller's ASCII range print as `?`.
    fn write_char(&mut self, c: char) -> Result<(), DisplayError> {
        if c == '\n' {
            return self.set_cursor(0, self.row.saturating_add(1));
        }
        let byte = if c.is_ascii() && !c.is_ascii_control() { c as u8 } else { b'?' };
        self.send(byte, RS)
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.row = 0;
        self.command(CMD_CLEAR)?;
        self.delay.delay_us(2_000);
        Ok(())
    }
}
