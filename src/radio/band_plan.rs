//! Band Plan
//!
//! Fixed table of receive bands with their tuning and demodulation
//! defaults. Bands are selected by index into the table.

use core::fmt;

use crate::types::{DemodMode, Frequency};

/// Number of configured bands
pub const NUM_BANDS: usize = 16;

/// Band indices into [`BAND_TABLE`]
pub mod band {
    //! Named indices for the standard band table

    /// Longwave broadcast
    pub const LW: usize = 0;
    /// Mediumwave broadcast
    pub const MW: usize = 1;
    /// 120 m tropical band
    pub const M120: usize = 2;
    /// 90 m tropical band
    pub const M90: usize = 3;
    /// 75 m broadcast
    pub const M75: usize = 4;
    /// 60 m tropical band
    pub const M60: usize = 5;
    /// 49 m broadcast
    pub const M49: usize = 6;
    /// 41 m broadcast
    pub const M41: usize = 7;
    /// 31 m broadcast
    pub const M31: usize = 8;
    /// 25 m broadcast
    pub const M25: usize = 9;
    /// 22 m broadcast
    pub const M22: usize = 10;
    /// 19 m broadcast
    pub const M19: usize = 11;
    /// 16 m broadcast
    pub const M16: usize = 12;
    /// 15 m slot (wideband FM)
    pub const M15: usize = 13;
    /// 13 m broadcast
    pub const M13: usize = 14;
    /// 11 m broadcast
    pub const M11: usize = 15;
}

/// First band reached when cycling
pub const FIRST_BAND: usize = band::LW;

/// Last band reached when cycling (11 m is only reachable by index)
pub const LAST_BAND: usize = band::M13;

/// Band selected at power-up
pub const STARTUP_BAND: usize = band::MW;

/// Per-band tuning and demodulation defaults
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BandDescriptor {
    /// Tuned frequency
    pub frequency: Frequency,
    /// Display label
    pub name: &'static str,
    /// Default demodulation mode
    pub mode: DemodMode,
    /// Audio filter upper edge in Hz (informational)
    pub filter_high_cut: i32,
    /// Audio filter lower edge in Hz (informational)
    pub filter_low_cut: i32,
    /// RF gain index
    pub rf_gain: u8,
}

impl BandDescriptor {
    /// Build a descriptor with the default ±3.6 kHz audio passband
    #[must_use]
    pub const fn new(scaled_frequency: u64, name: &'static str, mode: DemodMode, rf_gain: u8) -> Self {
        Self {
            frequency: Frequency::from_scaled_const(scaled_frequency),
            name,
            mode,
            filter_high_cut: 3600,
            filter_low_cut: -3600,
            rf_gain,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for BandDescriptor {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str} ({}, {})", self.name, self.frequency, self.mode);
    }
}

/// The standard band table
///
/// Ordered by ascending frequency by convention only; the 15 m slot sits
/// above 13 m and 11 m.
pub static BAND_TABLE: [BandDescriptor; NUM_BANDS] = [
    BandDescriptor::new(22_500_000, "LW", DemodMode::Sam, 0),
    BandDescriptor::new(63_900_000, "MW", DemodMode::Sam, 0),
    BandDescriptor::new(248_500_000, "120M", DemodMode::Sam, 0),
    BandDescriptor::new(350_000_000, "90M", DemodMode::Lsb, 6),
    BandDescriptor::new(390_500_000, "75M", DemodMode::Sam, 4),
    BandDescriptor::new(502_500_000, "60M", DemodMode::Sam, 7),
    BandDescriptor::new(593_200_000, "49M", DemodMode::Sam, 0),
    BandDescriptor::new(712_000_000, "41M", DemodMode::Sam, 0),
    BandDescriptor::new(942_000_000, "31M", DemodMode::Sam, 0),
    BandDescriptor::new(1_173_500_000, "25M", DemodMode::Sam, 2),
    BandDescriptor::new(1_357_000_000, "22M", DemodMode::Sam, 2),
    BandDescriptor::new(1_514_000_000, "19M", DemodMode::Sam, 4),
    BandDescriptor::new(1_748_000_000, "16M", DemodMode::Sam, 5),
    BandDescriptor::new(3_146_866_600, "15M", DemodMode::Wfm, 21),
    BandDescriptor::new(2_145_000_000, "13M", DemodMode::Sam, 6),
    BandDescriptor::new(2_567_000_000, "11M", DemodMode::Sam, 6),
];

/// Band index outside the configured table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutOfRange {
    /// Requested index
    pub index: usize,
    /// Number of configured bands
    pub len: usize,
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "band index {} out of range (0..{})", self.index, self.len)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for OutOfRange {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "band index {} out of range (0..{})", self.index, self.len);
    }
}

/// Read-only view over a band table
#[derive(Clone, Copy, Debug)]
pub struct BandPlan {
    bands: &'static [BandDescriptor],
    first: usize,
    last: usize,
}

impl BandPlan {
    /// The standard 16-band plan
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bands: &BAND_TABLE,
            first: FIRST_BAND,
            last: LAST_BAND,
        }
    }

    /// Plan over a custom table, cycling through every entry
    ///
    /// Returns None for an empty table.
    #[must_use]
    pub const fn from_table(bands: &'static [BandDescriptor]) -> Option<Self> {
        if bands.is_empty() {
            None
        } else {
            Some(Self {
                bands,
                first: 0,
                last: bands.len() - 1,
            })
        }
    }

    /// Get a band by index
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`] when `index` is not in the table.
    pub fn get(&self, index: usize) -> Result<&'static BandDescriptor, OutOfRange> {
        self.bands.get(index).ok_or(OutOfRange {
            index,
            len: self.bands.len(),
        })
    }

    /// Number of bands
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bands.len()
    }

    /// Plans are never empty
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Iterate bands in table order
    pub fn iter(&self) -> impl Iterator<Item = &'static BandDescriptor> {
        self.bands.iter()
    }

    /// Find a band index by display label
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.bands.iter().position(|b| b.name == name)
    }

    /// Next band when cycling up (wraps to the first band)
    #[must_use]
    pub const fn next_index(&self, index: usize) -> usize {
        if index >= self.last || index < self.first {
            self.first
        } else {
            index + 1
        }
    }

    /// Previous band when cycling down (wraps to the last band)
    #[must_use]
    pub const fn previous_index(&self, index: usize) -> usize {
        if index <= self.first || index > self.last {
            self.last
        } else {
            index - 1
        }
    }
}

impl Default for BandPlan {
    fn default() -> Self {
        Self::standard()
    }
}
