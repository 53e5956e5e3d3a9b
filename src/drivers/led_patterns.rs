//! Status colour table and the LED fade engine.
//!
//! A fade ramps the LED up from black to the target in `duration / 10`
//! steps, back down to black, then settles on the target colour. Each
//! step lasts one 10 ms slice.
//!
//! [`Fade::poll`] is the cooperative form: the control loop calls it with
//! the current time and it writes whichever frame is due, so a fade never
//! stalls the loop. [`Fade::run_blocking`] plays the same frames with a
//! [`DelayNs`] for callers that want to wait it out.
//!
//! ## Status codes
//!
//! | Code                        | Colour | Shown as |
//! |-----------------------------|--------|----------|
//! | WifiDisconnected            | red    | solid    |
//! | WifiConnecting              | orange | fade     |
//! | WifiConnected               | orange | solid    |
//! | WifiNotConnected            | red    | solid    |
//! | FirebaseNotConnected        | red    | solid    |
//! | FirebaseDisconnected        | red    | solid    |
//! | FirebaseConnecting          | orange | fade     |
//! | FirebaseConnected           | yellow | solid    |
//! | FirebaseUploadSuccess       | green  | solid    |
//! | WifiOrFirebaseDisconnected  | red    | solid    |
//! | WifiOrFirebaseConnecting    | yellow | fade     |
//! | WifiAndFirebaseConnected    | green  | solid    |
//! | EthernetAndFirebaseConnected| green  | solid    |
//! | EthernetConnected           | green  | solid    |
//! | Esp32Disconnected           | cyan   | solid    |
//! | ConnectingToEsp32           | blue   | fade     |
//! | ConnectedToEsp32            | purple | solid    |
//! | BleFailed                   | red    | solid    |
//! | BluetoothConnectionFailed   | red    | solid    |
//! | BluetoothDisconnected       | yellow | solid    |
//! | BluetoothServiceStarted     | white  | solid    |
//! | BluetoothServiceStopped     | yellow | solid    |
//! | BluetoothConnected          | cyan   | solid    |
//! | BluetoothConnectionMade     | blue   | solid    |

use embedded_hal::delay::DelayNs;
use serde::{Deserialize, Serialize};

use crate::app::ports::LedPort;
use crate::drivers::status_led::{clamp_level, set_code, Rgb};

/// Length of one fade step.
pub const FADE_SLICE_MS: u32 = 10;

pub const COLOUR_RED: Rgb = (255, 0, 0);
pub const COLOUR_ORANGE: Rgb = (255, 200, 0);
pub const COLOUR_YELLOW: Rgb = (255, 255, 0);
pub const COLOUR_GREEN: Rgb = (0, 255, 0);
pub const COLOUR_CYAN: Rgb = (0, 255, 255);
pub const COLOUR_BLUE: Rgb = (0, 0, 255);
pub const COLOUR_PURPLE: Rgb = (255, 0, 255);
pub const COLOUR_WHITE: Rgb = (255, 255, 255);
pub const COLOUR_OFF: Rgb = (0, 0, 0);

/// Connectivity and peripheral states shown on the status LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCode {
    WifiDisconnected,
    WifiConnecting,
    WifiConnected,
    WifiNotConnected,
    FirebaseNotConnected,
    FirebaseDisconnected,
    FirebaseConnecting,
    FirebaseConnected,
    FirebaseUploadSuccess,
    WifiOrFirebaseDisconnected,
    WifiOrFirebaseConnecting,
    WifiAndFirebaseConnected,
    EthernetAndFirebaseConnected,
    EthernetConnected,
    Esp32Disconnected,
    ConnectingToEsp32,
    ConnectedToEsp32,
    BleFailed,
    BluetoothConnectionFailed,
    BluetoothDisconnected,
    BluetoothServiceStarted,
    BluetoothServiceStopped,
    BluetoothConnected,
    BluetoothConnectionMade,
}

impl StatusCode {
    pub const fn colour(self) -> Rgb {
        match self {
            Self::WifiDisconnected
            | Self::WifiNotConnected
            | Self::FirebaseNotConnected
            | Self::FirebaseDisconnected
            | Self::WifiOrFirebaseDisconnected
            | Self::BleFailed
            | Self::BluetoothConnectionFailed => COLOUR_RED,
            Self::WifiConnecting | Self::WifiConnected | Self::FirebaseConnecting => COLOUR_ORANGE,
            Self::FirebaseConnected
            | Self::WifiOrFirebaseConnecting
            | Self::BluetoothDisconnected
            | Self::BluetoothServiceStopped => COLOUR_YELLOW,
            Self::FirebaseUploadSuccess
            | Self::WifiAndFirebaseConnected
            | Self::EthernetAndFirebaseConnected
            | Self::EthernetConnected => COLOUR_GREEN,
            Self::Esp32Disconnected | Self::BluetoothConnected => COLOUR_CYAN,
            Self::ConnectingToEsp32 | Self::BluetoothConnectionMade => COLOUR_BLUE,
            Self::ConnectedToEsp32 => COLOUR_PURPLE,
            Self::BluetoothServiceStarted => COLOUR_WHITE,
        }
    }

    /// In-progress states are shown as a fade rather than a solid colour.
    pub const fn fades(self) -> bool {
        matches!(
            self,
            Self::WifiConnecting
                | Self::FirebaseConnecting
                | Self::WifiOrFirebaseConnecting
                | Self::ConnectingToEsp32
        )
    }
}

/// What a fade ramps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeMode {
    /// Ramp every channel and the intensity together.
    ColourAndIntensity,
    /// Keep the colour, ramp only the intensity (used for table colours).
    IntensityOnly,
}

/// One fade sequence: `2 * steps` ramp frames followed by the target.
#[derive(Debug, Clone)]
pub struct Fade {
    colour: Rgb,
    intensity: u8,
    mode: FadeMode,
    steps: u32,
    started_at: Option<u64>,
    next_frame: u32,
}

impl Fade {
    pub fn new(colour: Rgb, intensity: u8, duration_ms: u32, mode: FadeMode) -> Self {
        Self {
            colour,
            intensity,
            mode,
            steps: (duration_ms / FADE_SLICE_MS).max(1),
            started_at: None,
            next_frame: 0,
        }
    }

    /// Fade raw, possibly out-of-range inputs (clamped first).
    pub fn from_levels(r: i32, g: i32, b: i32, intensity: i32, duration_ms: u32) -> Self {
        Self::new(
            (clamp_level(r), clamp_level(g), clamp_level(b)),
            clamp_level(intensity),
            duration_ms,
            FadeMode::ColourAndIntensity,
        )
    }

    /// Fade a status code's colour in and out.
    pub fn for_code(code: StatusCode, intensity: i32, duration_ms: u32) -> Self {
        Self::new(code.colour(), clamp_level(intensity), duration_ms, FadeMode::IntensityOnly)
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Ramp frames plus the final target frame.
    pub fn frame_count(&self) -> u32 {
        2 * self.steps + 1
    }

    /// Time from the first frame to the final one.
    pub fn duration_ms(&self) -> u64 {
        u64::from(2 * self.steps * FADE_SLICE_MS)
    }

    pub fn is_finished(&self) -> bool {
        self.next_frame >= self.frame_count()
    }

    /// Colour (before intensity scaling) and intensity of frame `k`.
    pub fn frame(&self, k: u32) -> (Rgb, u8) {
        let n = self.steps;
        let level = match k {
            k if k < n => k,
            k if k < 2 * n => 2 * n - k - 1,
            _ => return (self.colour, self.intensity),
        };
        let ramp = |target: u8| (level as f32 * (f32::from(target) / n as f32)) as i32;
        let intensity = clamp_level(ramp(self.intensity));
        match self.mode {
            FadeMode::ColourAndIntensity => {
                let (r, g, b) = self.colour;
                ((clamp_level(ramp(r)), clamp_level(ramp(g)), clamp_level(ramp(b))), intensity)
            }
            FadeMode::IntensityOnly => (self.colour, intensity),
        }
    }

    /// Write the latest due frame. Returns `true` once the target colour
    /// has been written. Frames that fell due between two polls are
    /// skipped; only the newest one is visible anyway.
    pub fn poll(&mut self, now_ms: u64, led: &mut impl LedPort) -> bool {
        if self.is_finished() {
            return true;
        }
        let start = *self.started_at.get_or_insert(now_ms);
        let elapsed_slices = now_ms.saturating_sub(start) / u64::from(FADE_SLICE_MS);
        let due = elapsed_slices.min(u64::from(2 * self.steps)) as u32;
        if due >= self.next_frame {
            self.write_frame(due, led);
            self.next_frame = due + 1;
        }
        self.is_finished()
    }

    /// Play every frame, sleeping one slice between ramp frames.
    pub fn run_blocking(mut self, led: &mut impl LedPort, delay: &mut impl DelayNs) {
        for k in 0..2 * self.steps {
            self.write_frame(k, led);
            delay.delay_ms(FADE_SLICE_MS);
        }
        self.write_frame(2 * self.steps, led);
        self.next_frame = self.frame_count();
    }

    fn write_frame(&self, k: u32, led: &mut impl LedPort) {
        let (colour, intensity) = self.frame(k);
        set_code(led, colour, i32::from(intensity));
    }
}
