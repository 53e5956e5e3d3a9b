//! 433 MHz remote codes for the underwater pond lights.
//!
//! Every command is a 24-bit word sharing the `0x051C` prefix; the low byte
//! selects the function. The transmitter sends the word MSB first, so the
//! binary form is the zero-padded 24-character bit string.

use heapless::String;
use serde::{Deserialize, Serialize};

/// Width of one transmitted word.
pub const CODE_BITS: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum RfCode {
    Brightness = 334_849,
    SleepTimer = 334_850,
    Power = 334_851,
    FourHours = 334_852,
    EightHours = 334_853,
    TwelveHours = 334_854,
    Flash = 334_855,
    White = 334_856,
    Fade = 334_857,
    Red = 334_858,
    Green = 334_859,
    Blue = 334_860,
    Orange = 334_861,
    SeaGreen = 334_862,
    Teal = 334_863,
    OrangeYellow = 334_864,
    Cyan = 334_865,
    Indigo = 334_866,
    Yellow = 334_867,
    Azure = 334_868,
    Magenta = 334_869,
}

impl RfCode {
    /// Every code, in remote-button order.
    pub const ALL: [Self; 21] = [
        Self::Brightness,
        Self::SleepTimer,
        Self::Power,
        Self::FourHours,
        Self::EightHours,
        Self::TwelveHours,
        Self::Flash,
        Self::White,
        Self::Fade,
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::Orange,
        Self::SeaGreen,
        Self::Teal,
        Self::OrangeYellow,
        Self::Cyan,
        Self::Indigo,
        Self::Yellow,
        Self::Azure,
        Self::Magenta,
    ];

    /// Decimal form of the transmitted word.
    pub const fn code(self) -> u32 {
        self as u32
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Brightness => "brightness",
            Self::SleepTimer => "sleep_timer",
            Self::Power => "power",
            Self::FourHours => "4h",
            Self::EightHours => "8h",
            Self::TwelveHours => "12h",
            Self::Flash => "flash",
            Self::White => "white",
            Self::Fade => "fade",
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Orange => "orange",
            Self::SeaGreen => "sea_green",
            Self::Teal => "teal",
            Self::OrangeYellow => "orange_yellow",
            Self::Cyan => "cyan",
            Self::Indigo => "indigo",
            Self::Yellow => "yellow",
            Self::Azure => "azure",
            Self::Magenta => "magenta",
        }
    }

    /// Case-insensitive lookup by [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
    }

    /// MSB-first bit string, zero-padded to [`CODE_BITS`].
    pub fn binary(self) -> String<CODE_BITS> {
        let code = self.code();
        let mut out = String::new();
        for bit in (0..CODE_BITS).rev() {
            let c = if (code >> bit) & 1 == 1 { '1' } else { '0' };
            // Capacity is exactly CODE_BITS, so this never overflows.
            let _ = out.push(c);
        }
        out
    }
}

impl core::fmt::Display for RfCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}
