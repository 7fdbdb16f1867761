//! Shared types used across the front end
//!
//! This module defines domain-specific types that enforce invariants
//! at compile time and provide type safety throughout the codebase.

use core::fmt;

/// Frequency in fixed point, hundredths of a hertz
///
/// The synthesizer interface and the band plan both work in this unit, so
/// sub-hertz tuning survives the trip from the table to the clock generator.
/// A `Frequency` is always greater than zero.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Frequency(u64);

impl Frequency {
    /// Fixed-point scale: units per hertz
    pub const SCALE: u64 = 100;

    /// Create from a raw fixed-point value, returns None for zero
    #[must_use]
    pub const fn from_scaled(scaled: u64) -> Option<Self> {
        if scaled > 0 {
            Some(Self(scaled))
        } else {
            None
        }
    }

    /// Create from a raw fixed-point value at compile time (panics on zero)
    #[must_use]
    pub const fn from_scaled_const(scaled: u64) -> Self {
        match Self::from_scaled(scaled) {
            Some(f) => f,
            None => panic!("Frequency must be non-zero"),
        }
    }

    /// Create from whole hertz, returns None for zero
    #[must_use]
    pub const fn from_hz(hz: u32) -> Option<Self> {
        Self::from_scaled(hz as u64 * Self::SCALE)
    }

    /// Create from kHz
    #[must_use]
    pub const fn from_khz(khz: u32) -> Option<Self> {
        Self::from_scaled(khz as u64 * 1000 * Self::SCALE)
    }

    /// Get the raw fixed-point value
    #[must_use]
    pub const fn as_scaled(self) -> u64 {
        self.0
    }

    /// Get the frequency in Hz (truncated)
    #[must_use]
    pub const fn as_hz(self) -> u64 {
        self.0 / Self::SCALE
    }

    /// Get the frequency in kHz (truncated)
    #[must_use]
    pub const fn as_khz(self) -> u64 {
        self.0 / (Self::SCALE * 1000)
    }

    /// Get the sub-hertz remainder in hundredths
    #[must_use]
    pub const fn centihertz(self) -> u8 {
        (self.0 % Self::SCALE) as u8
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({}.{:02} Hz)", self.as_hz(), self.centihertz())
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02} Hz", self.as_hz(), self.centihertz())
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Frequency {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=u64} cHz", self.0);
    }
}

/// Demodulation mode tag
///
/// The front end only looks at [`DemodMode::Autotune`]; the rest are carried
/// through for the DSP chain. Discriminants match the numeric tags stored
/// alongside saved settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum DemodMode {
    /// Upper sideband
    Usb = 0,
    /// Lower sideband
    Lsb = 1,
    /// AM envelope detector
    Am2 = 2,
    /// Synchronous AM
    #[default]
    Sam = 3,
    /// Synchronous AM with pseudo-stereo
    SamStereo = 4,
    /// Raw IQ passthrough
    Iq = 5,
    /// Wideband FM
    Wfm = 6,
    /// AM with automatic frequency search
    Autotune = 10,
    /// Double sideband, stereo
    StereoDsb = 17,
    /// Double sideband
    Dsb = 18,
    /// Lower sideband, stereo
    StereoLsb = 19,
    /// AM with lower sideband suppressed
    AmUsb = 20,
    /// AM with upper sideband suppressed
    AmLsb = 21,
    /// Upper sideband, stereo
    StereoUsb = 22,
    /// AM envelope detector, second variant
    AmMe2 = 26,
    /// Synchronous AM, upper sideband
    SamUsb = 27,
    /// Synchronous AM, lower sideband
    SamLsb = 28,
    /// DCF77 time signal decoding
    Dcf77 = 29,
}

impl DemodMode {
    /// Get the numeric tag
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Look up a mode by numeric tag
    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        let mode = match tag {
            0 => Self::Usb,
            1 => Self::Lsb,
            2 => Self::Am2,
            3 => Self::Sam,
            4 => Self::SamStereo,
            5 => Self::Iq,
            6 => Self::Wfm,
            10 => Self::Autotune,
            17 => Self::StereoDsb,
            18 => Self::Dsb,
            19 => Self::StereoLsb,
            20 => Self::AmUsb,
            21 => Self::AmLsb,
            22 => Self::StereoUsb,
            26 => Self::AmMe2,
            27 => Self::SamUsb,
            28 => Self::SamLsb,
            29 => Self::Dcf77,
            _ => return None,
        };
        Some(mode)
    }

    /// Check if this mode asks the tuner for an automatic frequency search
    #[must_use]
    pub const fn requests_autotune(self) -> bool {
        matches!(self, Self::Autotune)
    }

    /// Short display label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Usb => "USB",
            Self::Lsb => "LSB",
            Self::Am2 => "AM",
            Self::Sam => "SAM",
            Self::SamStereo => "SAM-ST",
            Self::Iq => "IQ",
            Self::Wfm => "WFM",
            Self::Autotune => "AM-AUTO",
            Self::StereoDsb => "DSB-ST",
            Self::Dsb => "DSB",
            Self::StereoLsb => "LSB-ST",
            Self::AmUsb => "AM-U",
            Self::AmLsb => "AM-L",
            Self::StereoUsb => "USB-ST",
            Self::AmMe2 => "AM-ME2",
            Self::SamUsb => "SAM-U",
            Self::SamLsb => "SAM-L",
            Self::Dcf77 => "DCF77",
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for DemodMode {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.label());
    }
}

/// Audio codec sample rate
///
/// The QSD places the signal at a quarter of the sample rate, so the
/// selected rate also fixes the IF offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SampleRate {
    /// 8 kHz
    Sr8k,
    /// 11.025 kHz
    Sr11k,
    /// 16 kHz
    Sr16k,
    /// 22.05 kHz
    Sr22k,
    /// 32 kHz
    Sr32k,
    /// 44.1 kHz
    Sr44k,
    /// 48 kHz
    Sr48k,
    /// 88.2 kHz
    Sr88k,
    /// 96 kHz
    #[default]
    Sr96k,
    /// 100 kHz
    Sr100k,
    /// 176.4 kHz
    Sr176k,
    /// 192 kHz
    Sr192k,
}

impl SampleRate {
    /// All rates in index order
    pub const ALL: [Self; 12] = [
        Self::Sr8k,
        Self::Sr11k,
        Self::Sr16k,
        Self::Sr22k,
        Self::Sr32k,
        Self::Sr44k,
        Self::Sr48k,
        Self::Sr88k,
        Self::Sr96k,
        Self::Sr100k,
        Self::Sr176k,
        Self::Sr192k,
    ];

    /// Get the rate in Hz
    #[must_use]
    pub const fn hz(self) -> u32 {
        match self {
            Self::Sr8k => 8_000,
            Self::Sr11k => 11_025,
            Self::Sr16k => 16_000,
            Self::Sr22k => 22_050,
            Self::Sr32k => 32_000,
            Self::Sr44k => 44_100,
            Self::Sr48k => 48_000,
            Self::Sr88k => 88_200,
            Self::Sr96k => 96_000,
            Self::Sr100k => 100_000,
            Self::Sr176k => 176_400,
            Self::Sr192k => 192_000,
        }
    }

    /// Position in the rate table
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Look up a rate by table position
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        if (index as usize) < Self::ALL.len() {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// IF offset in Hz for this rate (fs / 4)
    #[must_use]
    pub const fn if_offset_hz(self) -> i32 {
        (self.hz() / 4) as i32
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for SampleRate {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{} Hz", self.hz());
    }
}

/// Clock generator output
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockOutput {
    /// CLK0 output
    Clk0,
    /// CLK1 output
    Clk1,
    /// CLK2 output
    Clk2,
}

impl ClockOutput {
    /// Output number (0-2)
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Clk0 => 0,
            Self::Clk1 => 1,
            Self::Clk2 => 2,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ClockOutput {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Clk0 => defmt::write!(f, "CLK0"),
            Self::Clk1 => defmt::write!(f, "CLK1"),
            Self::Clk2 => defmt::write!(f, "CLK2"),
        }
    }
}
