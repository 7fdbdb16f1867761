//! System configuration and hardware constants
//!
//! This module defines compile-time constants for the QSD front end.
//! Bus settings, synthesizer scale factors, and the two supported board
//! variants are centralized here.

use core::num::NonZeroU64;

use crate::radio::band_plan::STARTUP_BAND;
use crate::radio::tuning::SynthScale;
use crate::types::{ClockOutput, Frequency, SampleRate};

/// I2C bus frequency for `Si5351A`
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// `Si5351A` I2C address
pub const SI5351_I2C_ADDR: u8 = 0x60;

/// QSD needs the synthesizer at 4x the LO
pub const MASTER_CLK_MULT: u64 = 4;

/// Synthesizer frequency units per hertz
pub const SI5351_FREQ_MULT: u64 = Frequency::SCALE;

/// Scale applied before the calibration divisor
pub const SYNTH_BASE_SCALE: u64 = 1_000_000_000;

/// Calibration divisor (unity at `SYNTH_BASE_SCALE`)
pub const CALIBRATION_FACTOR: NonZeroU64 = match NonZeroU64::new(1_000_000_000) {
    Some(v) => v,
    None => panic!("calibration factor must be non-zero"),
};

/// Default codec sample rate
pub const DEFAULT_SAMPLE_RATE: SampleRate = SampleRate::Sr96k;

/// Board variant built into the firmware image
pub const DEFAULT_VARIANT: HardwareVariant = HardwareVariant::Elektor;

/// Supported QSD board variants
///
/// The variants differ in which Si5351 output feeds the QSD and in the
/// reference crystal fitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HardwareVariant {
    /// Joris board: CLK2, 27 MHz crystal
    Joris,
    /// Elektor SDR shield: CLK1, 25 MHz crystal
    Elektor,
}

impl HardwareVariant {
    /// Si5351 output wired to the QSD
    #[must_use]
    pub const fn clock_output(self) -> ClockOutput {
        match self {
            Self::Joris => ClockOutput::Clk2,
            Self::Elektor => ClockOutput::Clk1,
        }
    }

    /// Reference crystal frequency
    #[must_use]
    pub const fn crystal_hz(self) -> u32 {
        match self {
            Self::Joris => 27_000_000,
            Self::Elektor => 25_000_000,
        }
    }

    /// Measured crystal correction in parts per billion
    #[must_use]
    pub const fn crystal_correction_ppb(self) -> i32 {
        match self {
            Self::Joris => -8_000,
            Self::Elektor => 108_000,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for HardwareVariant {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Joris => defmt::write!(f, "Joris"),
            Self::Elektor => defmt::write!(f, "Elektor"),
        }
    }
}

/// Front-end settings resolved once at startup
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrontEndConfig {
    /// Board variant
    pub variant: HardwareVariant,
    /// Synthesizer scale factors
    pub scale: SynthScale,
    /// Calibration divisor
    pub calibration_factor: NonZeroU64,
    /// IF offset in Hz
    pub if_offset_hz: i32,
    /// Band selected at power-up
    pub startup_band: usize,
}

impl FrontEndConfig {
    /// Default settings for a board variant
    #[must_use]
    pub const fn for_variant(variant: HardwareVariant) -> Self {
        Self {
            variant,
            scale: SynthScale::QSD,
            calibration_factor: CALIBRATION_FACTOR,
            if_offset_hz: DEFAULT_SAMPLE_RATE.if_offset_hz(),
            startup_band: STARTUP_BAND,
        }
    }

    /// Use the IF implied by a codec sample rate
    #[must_use]
    pub const fn with_sample_rate(self, rate: SampleRate) -> Self {
        Self {
            if_offset_hz: rate.if_offset_hz(),
            ..self
        }
    }

    /// Override the calibration divisor
    #[must_use]
    pub const fn with_calibration(self, calibration_factor: NonZeroU64) -> Self {
        Self {
            calibration_factor,
            ..self
        }
    }
}

impl Default for FrontEndConfig {
    fn default() -> Self {
        Self::for_variant(DEFAULT_VARIANT)
    }
}
