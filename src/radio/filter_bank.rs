//! LPF Bank Selection
//!
//! Five relay-switched low-pass filters sit in front of the QSD:
//!
//! ```text
//!   bank            cutoff    selected when (kHz, IF-shifted)
//!   Longwave        295 kHz   band - IF < 300
//!   MediumWaveLow   955 kHz   300 < band + IF < 955.001
//!   MediumWaveHigh  2 MHz     955 < band + IF < 1996.001
//!   ShortwaveLow    5.4 MHz   1996 < band + IF < 5400.001
//!   ShortwaveHigh   30 MHz    band + IF > 5400
//! ```
//!
//! Rules are evaluated in that order and the first match wins. The ±1 Hz
//! edges are part of the contract.

use core::fmt;

use embedded_hal::digital::OutputPin;

use super::tuning::EffectiveFrequency;

/// Low-pass filter bank
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterBank {
    /// Longwave, 295 kHz cutoff
    Longwave,
    /// Mediumwave I, 955 kHz cutoff
    MediumWaveLow,
    /// Mediumwave II, 2 MHz cutoff
    MediumWaveHigh,
    /// Tropical bands, 5.4 MHz cutoff
    ShortwaveLow,
    /// Everything above, 30 MHz cutoff
    ShortwaveHigh,
}

impl FilterBank {
    /// Number of banks
    pub const COUNT: usize = 5;

    /// All banks in output-line order
    pub const ALL: [Self; Self::COUNT] = [
        Self::Longwave,
        Self::MediumWaveLow,
        Self::MediumWaveHigh,
        Self::ShortwaveLow,
        Self::ShortwaveHigh,
    ];

    /// Output line index (0-4)
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Longwave => 0,
            Self::MediumWaveLow => 1,
            Self::MediumWaveHigh => 2,
            Self::ShortwaveLow => 3,
            Self::ShortwaveHigh => 4,
        }
    }

    /// Nominal cutoff in kHz
    #[must_use]
    pub const fn cutoff_khz(self) -> u32 {
        match self {
            Self::Longwave => 295,
            Self::MediumWaveLow => 955,
            Self::MediumWaveHigh => 2_000,
            Self::ShortwaveLow => 5_400,
            Self::ShortwaveHigh => 30_000,
        }
    }

    /// Short display label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Longwave => "LW",
            Self::MediumWaveLow => "MW-L",
            Self::MediumWaveHigh => "MW-H",
            Self::ShortwaveLow => "HF-L",
            Self::ShortwaveHigh => "HF-H",
        }
    }
}

impl fmt::Display for FilterBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for FilterBank {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.label());
    }
}

/// Which IF-shifted frequency a rule tests
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// `band + IF`
    High,
    /// `band - IF`
    Low,
}

/// One entry of the selection table
///
/// Bounds are exclusive and given in Hz; they are scaled to synthesizer units
/// before comparing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterRule {
    /// Bank selected on match
    pub bank: FilterBank,
    /// Frequency under test
    pub side: Side,
    /// Match only above this
    pub above_hz: Option<i64>,
    /// Match only below this
    pub below_hz: Option<i64>,
}

impl FilterRule {
    /// Check the rule against an effective frequency
    #[must_use]
    pub fn matches(&self, freq: &EffectiveFrequency, unit: i64) -> bool {
        let value = match self.side {
            Side::High => freq.high_side,
            Side::Low => freq.low_side,
        };
        let above = self.above_hz.is_none_or(|hz| value > hz * unit);
        let below = self.below_hz.is_none_or(|hz| value < hz * unit);
        above && below
    }
}

/// Selection table, evaluated in order
///
/// Neighbouring high-side windows overlap by 0.99 Hz just above 955 kHz,
/// 1996 kHz and 5400 kHz. The lower bank wins there since it comes first.
pub const FILTER_RULES: [FilterRule; FilterBank::COUNT] = [
    FilterRule {
        bank: FilterBank::Longwave,
        side: Side::Low,
        above_hz: None,
        below_hz: Some(300_000),
    },
    FilterRule {
        bank: FilterBank::MediumWaveLow,
        side: Side::High,
        above_hz: Some(300_000),
        below_hz: Some(955_001),
    },
    FilterRule {
        bank: FilterBank::MediumWaveHigh,
        side: Side::High,
        above_hz: Some(955_000),
        below_hz: Some(1_996_001),
    },
    FilterRule {
        bank: FilterBank::ShortwaveLow,
        side: Side::High,
        above_hz: Some(1_996_000),
        below_hz: Some(5_400_001),
    },
    FilterRule {
        bank: FilterBank::ShortwaveHigh,
        side: Side::High,
        above_hz: Some(5_400_000),
        below_hz: None,
    },
];

/// Bank used when no rule matches
///
/// Only reachable when `band + IF` sits at or below 300 kHz while
/// `band - IF` does not, i.e. a non-positive IF on the 300 kHz edge.
pub const FALLBACK_BANK: FilterBank = FilterBank::MediumWaveLow;

/// First matching rule, if any
#[must_use]
pub fn matching_rule(freq: &EffectiveFrequency, unit: i64) -> Option<&'static FilterRule> {
    FILTER_RULES.iter().find(|rule| rule.matches(freq, unit))
}

/// Pick the filter bank for an effective frequency
#[must_use]
pub fn select_filter_bank(freq: &EffectiveFrequency, unit: i64) -> FilterBank {
    matching_rule(freq, unit).map_or(FALLBACK_BANK, |rule| rule.bank)
}

/// Relay driver for the five filter lines
///
/// Lines are indexed by [`FilterBank::index`]. Switching is
/// break-before-make: all other lines go low before the selected one goes
/// high, so two filters are never in circuit at once.
pub struct FilterBankSwitch<P> {
    lines: [P; FilterBank::COUNT],
    active: Option<FilterBank>,
}

impl<P: OutputPin> FilterBankSwitch<P> {
    /// Take ownership of the lines and drive them all low
    ///
    /// # Errors
    ///
    /// Returns the first pin error.
    pub fn new(lines: [P; FilterBank::COUNT]) -> Result<Self, P::Error> {
        let mut switch = Self {
            lines,
            active: None,
        };
        switch.release_all()?;
        Ok(switch)
    }

    /// Put a bank in circuit
    ///
    /// # Errors
    ///
    /// Returns the first pin error. The switch then reports no active bank
    /// until the next successful `select`.
    pub fn select(&mut self, bank: FilterBank) -> Result<(), P::Error> {
        self.active = None;
        for other in FilterBank::ALL.iter().filter(|&&b| b != bank) {
            self.lines[other.index()].set_low()?;
        }
        self.lines[bank.index()].set_high()?;
        self.active = Some(bank);
        Ok(())
    }

    /// Drive every line low
    ///
    /// # Errors
    ///
    /// Returns the first pin error.
    pub fn release_all(&mut self) -> Result<(), P::Error> {
        self.active = None;
        for line in &mut self.lines {
            line.set_low()?;
        }
        Ok(())
    }

    /// Bank currently in circuit
    #[must_use]
    pub const fn active(&self) -> Option<FilterBank> {
        self.active
    }

    /// Give the lines back
    pub fn release(self) -> [P; FilterBank::COUNT] {
        self.lines
    }
}
