//! QSD Front End Controller
//!
//! Owns the tuning state, the clock generator, the LPF relay lines and the
//! tuner flag. Every retune goes through [`FrontEnd::set_frequency`], which
//! programs the LO and switches the filter from one shared effective
//! frequency.
//!
//! Taking `&mut self` for every operation keeps other code off the clock
//! generator while a frequency is being written.

use core::fmt;

use embedded_hal::digital::OutputPin;

use super::band_plan::{BandDescriptor, BandPlan, OutOfRange};
use super::filter_bank::{select_filter_bank, FilterBank, FilterBankSwitch};
use super::tuner::Tuner;
use super::tuning::{synthesizer_value, EffectiveFrequency, SynthScale, TuningState};
use crate::config::FrontEndConfig;
use crate::drivers::ClockGenerator;
use crate::types::ClockOutput;

/// Front-end error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrontEndError<C, P> {
    /// Band index not in the plan
    OutOfRange(OutOfRange),
    /// Clock generator write failed
    Clock(C),
    /// Filter relay line write failed
    FilterLine(P),
}

impl<C, P> From<OutOfRange> for FrontEndError<C, P> {
    fn from(err: OutOfRange) -> Self {
        Self::OutOfRange(err)
    }
}

impl<C: fmt::Debug, P: fmt::Debug> fmt::Display for FrontEndError<C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange(err) => write!(f, "{err}"),
            Self::Clock(err) => write!(f, "clock generator write failed: {err:?}"),
            Self::FilterLine(err) => write!(f, "filter line write failed: {err:?}"),
        }
    }
}

/// Value handed to the clock generator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SynthesizerSetting {
    /// Frequency in hundredths of a hertz
    pub frequency: u64,
    /// Output feeding the QSD
    pub output: ClockOutput,
}

#[cfg(feature = "embedded")]
impl defmt::Format for SynthesizerSetting {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=u64} cHz on {}", self.frequency, self.output);
    }
}

/// Outcome of a retune
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tuning {
    /// LO programmed into the synthesizer
    pub synthesizer: SynthesizerSetting,
    /// Filter bank put in circuit
    pub bank: FilterBank,
}

/// Result type for front-end operations
pub type FrontEndResult<T, C, P> =
    Result<T, FrontEndError<<C as ClockGenerator>::Error, <P as embedded_hal::digital::ErrorType>::Error>>;

/// QSD front end
pub struct FrontEnd<C, P> {
    plan: BandPlan,
    band: &'static BandDescriptor,
    clock: C,
    output: ClockOutput,
    filters: FilterBankSwitch<P>,
    tuner: Tuner,
    state: TuningState,
    scale: SynthScale,
}

impl<C, P> FrontEnd<C, P>
where
    C: ClockGenerator,
    P: OutputPin,
{
    /// Assemble the front end
    ///
    /// Nothing is written to the hardware until the first
    /// [`set_frequency`](Self::set_frequency).
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if the configured startup band is not in `plan`.
    pub fn new(
        plan: BandPlan,
        clock: C,
        filters: FilterBankSwitch<P>,
        config: &FrontEndConfig,
    ) -> FrontEndResult<Self, C, P> {
        let band = plan.get(config.startup_band)?;
        Ok(Self {
            plan,
            band,
            clock,
            output: config.variant.clock_output(),
            filters,
            tuner: Tuner::new(),
            state: TuningState::new(
                config.startup_band,
                config.if_offset_hz,
                config.calibration_factor,
            ),
            scale: config.scale,
        })
    }

    /// Current tuning state
    #[must_use]
    pub const fn state(&self) -> &TuningState {
        &self.state
    }

    /// Descriptor of the selected band
    #[must_use]
    pub const fn band(&self) -> &'static BandDescriptor {
        self.band
    }

    /// Band plan in use
    #[must_use]
    pub const fn plan(&self) -> &BandPlan {
        &self.plan
    }

    /// Tuner flags
    #[must_use]
    pub const fn tuner(&self) -> &Tuner {
        &self.tuner
    }

    /// Tuner flags, for the autotune search to consume
    pub fn tuner_mut(&mut self) -> &mut Tuner {
        &mut self.tuner
    }

    /// Bank currently in circuit
    #[must_use]
    pub const fn active_bank(&self) -> Option<FilterBank> {
        self.filters.active()
    }

    /// Clock generator
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// IF-shifted frequencies of the selected band
    #[must_use]
    pub fn effective_frequency(&self) -> EffectiveFrequency {
        EffectiveFrequency::new(self.band(), self.state.if_offset_hz, &self.scale)
    }

    /// What [`set_frequency`](Self::set_frequency) would program, without
    /// touching the hardware
    #[must_use]
    pub fn plan_tuning(&self) -> Tuning {
        let effective = self.effective_frequency();
        let unit = i64::try_from(self.scale.freq_unit_multiplier).unwrap_or(i64::MAX);
        Tuning {
            synthesizer: SynthesizerSetting {
                frequency: synthesizer_value(
                    effective.high_side,
                    self.state.calibration_factor,
                    &self.scale,
                ),
                output: self.output,
            },
            bank: select_filter_bank(&effective, unit),
        }
    }

    /// Program the LO and the LPF for the current tuning state
    ///
    /// Raises the tuner's autotune request when the band's mode asks for it.
    ///
    /// # Errors
    ///
    /// Propagates clock generator and filter line failures without retry.
    /// A retry of the whole call brings the hardware back in line.
    pub fn set_frequency(&mut self) -> FrontEndResult<Tuning, C, P> {
        let tuning = self.plan_tuning();
        let setting = tuning.synthesizer;

        self.clock
            .set_frequency(setting.frequency, setting.output)
            .map_err(FrontEndError::Clock)?;

        self.filters
            .select(tuning.bank)
            .map_err(FrontEndError::FilterLine)?;

        if self.band().mode.requests_autotune() {
            self.tuner.request_autotune();
        }

        #[cfg(feature = "embedded")]
        defmt::debug!(
            "tuned {} -> LO {}, LPF {}",
            self.band(),
            setting,
            tuning.bank
        );

        Ok(tuning)
    }

    /// Switch band and retune
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` without touching any state if `index` is not in
    /// the plan, otherwise as [`set_frequency`](Self::set_frequency).
    pub fn select_band(&mut self, index: usize) -> FrontEndResult<Tuning, C, P> {
        self.band = self.plan.get(index)?;
        self.state = self.state.with_band(index);
        self.set_frequency()
    }

    /// Cycle to the next band and retune
    ///
    /// # Errors
    ///
    /// As [`set_frequency`](Self::set_frequency).
    pub fn next_band(&mut self) -> FrontEndResult<Tuning, C, P> {
        self.select_band(self.plan.next_index(self.state.band_index))
    }

    /// Cycle to the previous band and retune
    ///
    /// # Errors
    ///
    /// As [`set_frequency`](Self::set_frequency).
    pub fn previous_band(&mut self) -> FrontEndResult<Tuning, C, P> {
        self.select_band(self.plan.previous_index(self.state.band_index))
    }

    /// Change the IF offset and retune
    ///
    /// # Errors
    ///
    /// As [`set_frequency`](Self::set_frequency).
    pub fn set_if_offset(&mut self, if_offset_hz: i32) -> FrontEndResult<Tuning, C, P> {
        self.state = self.state.with_if_offset(if_offset_hz);
        self.set_frequency()
    }

    /// Tear down, returning the clock generator and relay driver
    pub fn release(self) -> (C, FilterBankSwitch<P>) {
        (self.clock, self.filters)
    }
}
