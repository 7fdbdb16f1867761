//! Tuning Arithmetic
//!
//! Pure functions computing the effective RF frequencies and the value to
//! program into the clock synthesizer. The filter selection and the
//! synthesizer both read the same [`EffectiveFrequency`], so the LPF always
//! agrees with the programmed LO.

use core::num::NonZeroU64;

use super::band_plan::BandDescriptor;

/// Fixed scale multipliers of the synthesizer path
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SynthScale {
    /// Synthesizer frequency units per hertz
    pub freq_unit_multiplier: u64,
    /// Scale applied before the calibration divisor
    pub base_scale: u64,
    /// Hardware clock multiplier (QSD runs at 4x LO)
    pub clock_multiplier: u64,
}

impl SynthScale {
    /// Quadrature sampling detector: 0.01 Hz units, 4x clock
    pub const QSD: Self = Self {
        freq_unit_multiplier: crate::config::SI5351_FREQ_MULT,
        base_scale: crate::config::SYNTH_BASE_SCALE,
        clock_multiplier: crate::config::MASTER_CLK_MULT,
    };

    /// IF offset expressed in synthesizer units
    #[must_use]
    pub const fn if_offset_units(&self, if_offset_hz: i32) -> i64 {
        if_offset_hz as i64 * self.freq_unit_multiplier as i64
    }
}

impl Default for SynthScale {
    fn default() -> Self {
        Self::QSD
    }
}

/// Band frequency shifted by the IF, in synthesizer units
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectiveFrequency {
    /// `band + IF`: drives the LO and every LPF threshold except longwave
    pub high_side: i64,
    /// `band - IF`: only used to detect the longwave case
    pub low_side: i64,
}

impl EffectiveFrequency {
    /// Shift a band frequency by the IF offset
    #[must_use]
    pub fn new(band: &BandDescriptor, if_offset_hz: i32, scale: &SynthScale) -> Self {
        let base = i64::try_from(band.frequency.as_scaled()).unwrap_or(i64::MAX);
        let offset = scale.if_offset_units(if_offset_hz);
        Self {
            high_side: base.saturating_add(offset),
            low_side: base.saturating_sub(offset),
        }
    }
}

/// Synthesizer value for a band
///
/// `((band + if * unit) * base_scale * clock_multiplier) / calibration`,
/// evaluated in 128-bit integers since the product exceeds `2^63` at the top
/// of the band plan. A negative effective frequency yields 0.
#[must_use]
pub fn compute_synthesizer_frequency(
    band: &BandDescriptor,
    if_offset_hz: i32,
    calibration_factor: NonZeroU64,
    scale: &SynthScale,
) -> u64 {
    let effective = EffectiveFrequency::new(band, if_offset_hz, scale);
    synthesizer_value(effective.high_side, calibration_factor, scale)
}

/// Synthesizer value for an already shifted frequency
#[must_use]
pub fn synthesizer_value(high_side: i64, calibration_factor: NonZeroU64, scale: &SynthScale) -> u64 {
    let product = i128::from(high_side)
        * i128::from(scale.base_scale)
        * i128::from(scale.clock_multiplier);
    let value = product / i128::from(calibration_factor.get());
    u64::try_from(value.max(0)).unwrap_or(u64::MAX)
}

/// Tuning state owned by the front end
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TuningState {
    /// Index into the band plan
    pub band_index: usize,
    /// IF offset in Hz
    pub if_offset_hz: i32,
    /// Calibration divisor
    pub calibration_factor: NonZeroU64,
}

impl TuningState {
    /// Create a tuning state
    #[must_use]
    pub const fn new(band_index: usize, if_offset_hz: i32, calibration_factor: NonZeroU64) -> Self {
        Self {
            band_index,
            if_offset_hz,
            calibration_factor,
        }
    }

    /// Same state on another band
    #[must_use]
    pub const fn with_band(self, band_index: usize) -> Self {
        Self { band_index, ..self }
    }

    /// Same state with another IF offset
    #[must_use]
    pub const fn with_if_offset(self, if_offset_hz: i32) -> Self {
        Self {
            if_offset_hz,
            ..self
        }
    }
}
