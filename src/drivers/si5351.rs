//! `Si5351A` Clock Synthesizer Driver
//!
//! Provides the QSD clock (4x LO) from one multisynth output. Register
//! writes are blocking so a frequency change completes before anything
//! else gets on the bus.
//!
//! The `Si5351A` generates three independent clock outputs from a single
//! crystal reference using fractional PLLs and multisynth dividers. This
//! driver runs every output from PLL A.

use core::fmt;

use embedded_hal::i2c::I2c;

use super::si5351_calc::{calculate_frequency, corrected_xtal_hz, MsParams, PllParams};
use super::ClockGenerator;
use crate::types::{ClockOutput, Frequency};

/// `Si5351A` register addresses
mod reg {
    pub const DEVICE_STATUS: u8 = 0;
    pub const OUTPUT_ENABLE: u8 = 3;
    pub const CLK0_CONTROL: u8 = 16;
    pub const PLLA_PARAMS: u8 = 26;
    pub const MS0_PARAMS: u8 = 42;
    pub const PLL_RESET: u8 = 177;
    pub const CRYSTAL_LOAD: u8 = 183;
}

/// Default I2C address
pub const DEFAULT_ADDRESS: u8 = crate::config::SI5351_I2C_ADDR;

/// `SYS_INIT` polls before giving up on the ready bit
const READY_POLLS: u32 = 1000;

/// Clock control: power down
const CLK_POWER_DOWN: u8 = 0x80;
/// Clock control: multisynth integer mode
const CLK_INTEGER_MODE: u8 = 0x40;
/// Clock control: source is the multisynth
const CLK_SRC_MULTISYNTH: u8 = 0x0C;
/// PLL reset: PLL A
const PLLA_RESET: u8 = 0x20;
/// Multisynth divide-by-4 bits
const MS_DIVBY4: u8 = 0x0C;

const fn control_reg(output: ClockOutput) -> u8 {
    reg::CLK0_CONTROL + output.index()
}

const fn ms_reg(output: ClockOutput) -> u8 {
    reg::MS0_PARAMS + 8 * output.index()
}

/// Drive strength setting
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DriveStrength {
    /// 2mA drive
    Drive2mA,
    /// 4mA drive
    Drive4mA,
    /// 6mA drive
    Drive6mA,
    /// 8mA drive (maximum)
    #[default]
    Drive8mA,
}

impl DriveStrength {
    /// Get register value
    const fn as_reg(self) -> u8 {
        match self {
            Self::Drive2mA => 0,
            Self::Drive4mA => 1,
            Self::Drive6mA => 2,
            Self::Drive8mA => 3,
        }
    }
}

/// Crystal load capacitance
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CrystalLoad {
    /// 6 pF load
    Load6pF,
    /// 8 pF load
    Load8pF,
    /// 10 pF load
    #[default]
    Load10pF,
}

impl CrystalLoad {
    const fn as_reg(self) -> u8 {
        match self {
            Self::Load6pF => 0b0101_0010,
            Self::Load8pF => 0b1001_0010,
            Self::Load10pF => 0b1101_0010,
        }
    }
}

/// Driver error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Si5351Error<E> {
    /// I2C transfer failed
    Bus(E),
    /// Device never cleared `SYS_INIT`
    NotReady,
    /// No PLL/multisynth setting produces this frequency
    Unreachable {
        /// Requested output in Hz
        target_hz: u64,
    },
}

impl<E: fmt::Debug> fmt::Display for Si5351Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(err) => write!(f, "I2C error: {err:?}"),
            Self::NotReady => f.write_str("Si5351 not ready"),
            Self::Unreachable { target_hz } => write!(f, "{target_hz} Hz not reachable"),
        }
    }
}

#[cfg(feature = "embedded")]
impl<E> defmt::Format for Si5351Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Bus(_) => defmt::write!(f, "I2C error"),
            Self::NotReady => defmt::write!(f, "Si5351 not ready"),
            Self::Unreachable { target_hz } => defmt::write!(f, "{=u64} Hz not reachable", target_hz),
        }
    }
}

/// Driver result
pub type Si5351Result<T, E> = Result<T, Si5351Error<E>>;

/// `Si5351A` driver
pub struct Si5351<I> {
    i2c: I,
    address: u8,
    xtal_hz: u64,
    drive: DriveStrength,
    output_enable: u8,
    /// Last PLL A setting written, to skip redundant PLL resets
    pll_cache: Option<PllParams>,
}

impl<I: I2c> Si5351<I> {
    /// Create a driver
    ///
    /// `correction_ppb` is the measured crystal error in parts per billion.
    #[must_use]
    pub fn new(i2c: I, xtal_hz: u32, correction_ppb: i32) -> Self {
        Self {
            i2c,
            address: DEFAULT_ADDRESS,
            xtal_hz: corrected_xtal_hz(xtal_hz, correction_ppb),
            drive: DriveStrength::default(),
            output_enable: 0xFF, // All outputs disabled
            pll_cache: None,
        }
    }

    /// Use a non-default I2C address
    #[must_use]
    pub fn with_address(self, address: u8) -> Self {
        Self {
            address: address & 0x7F,
            ..self
        }
    }

    /// Use a different output drive strength
    #[must_use]
    pub fn with_drive(self, drive: DriveStrength) -> Self {
        Self { drive, ..self }
    }

    /// Effective (corrected) crystal frequency
    #[must_use]
    pub const fn xtal_hz(&self) -> u64 {
        self.xtal_hz
    }

    /// Initialize the `Si5351A`
    ///
    /// # Errors
    ///
    /// Returns `NotReady` if the device stays in `SYS_INIT`, or the bus error.
    pub fn init(&mut self, load: CrystalLoad) -> Si5351Result<(), I::Error> {
        self.wait_ready()?;

        // Disable all outputs during configuration
        self.output_enable = 0xFF;
        self.write_reg(reg::OUTPUT_ENABLE, self.output_enable)?;
        self.write_reg(reg::CRYSTAL_LOAD, load.as_reg())?;

        for clk in [ClockOutput::Clk0, ClockOutput::Clk1, ClockOutput::Clk2] {
            self.write_reg(control_reg(clk), CLK_POWER_DOWN)?;
        }

        self.pll_cache = None;
        Ok(())
    }

    /// Wait for device to be ready (`SYS_INIT` cleared)
    fn wait_ready(&mut self) -> Si5351Result<(), I::Error> {
        for _ in 0..READY_POLLS {
            if self.read_reg(reg::DEVICE_STATUS)? & 0x80 == 0 {
                return Ok(());
            }
        }
        Err(Si5351Error::NotReady)
    }

    /// Program an output in whole hertz
    ///
    /// # Errors
    ///
    /// Returns `Unreachable` for frequencies the chip cannot produce, or the
    /// bus error.
    pub fn set_frequency_hz(&mut self, output: ClockOutput, target_hz: u64) -> Si5351Result<(), I::Error> {
        let synth = calculate_frequency(self.xtal_hz, target_hz)
            .ok_or(Si5351Error::Unreachable { target_hz })?;

        let pll_changed = self.pll_cache != Some(synth.pll);
        if pll_changed {
            self.pll_cache = None;
            self.program_pll(&synth.pll)?;
        }

        self.program_multisynth(output, &synth.ms)?;

        let control = CLK_INTEGER_MODE | CLK_SRC_MULTISYNTH | self.drive.as_reg();
        self.write_reg(control_reg(output), control)?;

        if pll_changed {
            self.write_reg(reg::PLL_RESET, PLLA_RESET)?;
            self.pll_cache = Some(synth.pll);
        }

        self.enable(output)
    }

    /// Enable a clock output
    ///
    /// # Errors
    ///
    /// Returns the bus error.
    pub fn enable(&mut self, output: ClockOutput) -> Si5351Result<(), I::Error> {
        self.output_enable &= !(1 << output.index());
        self.write_reg(reg::OUTPUT_ENABLE, self.output_enable)
    }

    /// Disable a clock output
    ///
    /// # Errors
    ///
    /// Returns the bus error.
    pub fn disable(&mut self, output: ClockOutput) -> Si5351Result<(), I::Error> {
        self.output_enable |= 1 << output.index();
        self.write_reg(reg::OUTPUT_ENABLE, self.output_enable)
    }

    /// Give the bus back
    pub fn release(self) -> I {
        self.i2c
    }

    /// Program PLL A registers
    fn program_pll(&mut self, params: &PllParams) -> Si5351Result<(), I::Error> {
        let (p1, p2, p3) = params.to_registers();
        let regs = [
            ((p3 >> 8) & 0xFF) as u8,
            (p3 & 0xFF) as u8,
            ((p1 >> 16) & 0x03) as u8,
            ((p1 >> 8) & 0xFF) as u8,
            (p1 & 0xFF) as u8,
            (((p3 >> 12) & 0xF0) | ((p2 >> 16) & 0x0F)) as u8,
            ((p2 >> 8) & 0xFF) as u8,
            (p2 & 0xFF) as u8,
        ];
        self.write_regs(reg::PLLA_PARAMS, &regs)
    }

    /// Program multisynth registers
    fn program_multisynth(&mut self, output: ClockOutput, params: &MsParams) -> Si5351Result<(), I::Error> {
        let (p1, p2, p3) = params.to_registers();
        let divby4 = if params.is_divby4() { MS_DIVBY4 } else { 0 };
        let regs = [
            ((p3 >> 8) & 0xFF) as u8,
            (p3 & 0xFF) as u8,
            (params.r_div << 4) | divby4 | ((p1 >> 16) & 0x03) as u8,
            ((p1 >> 8) & 0xFF) as u8,
            (p1 & 0xFF) as u8,
            (((p3 >> 12) & 0xF0) | ((p2 >> 16) & 0x0F)) as u8,
            ((p2 >> 8) & 0xFF) as u8,
            (p2 & 0xFF) as u8,
        ];
        self.write_regs(ms_reg(output), &regs)
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Si5351Result<(), I::Error> {
        self.i2c
            .write(self.address, &[reg, value])
            .map_err(Si5351Error::Bus)
    }

    fn write_regs(&mut self, base_reg: u8, values: &[u8; 8]) -> Si5351Result<(), I::Error> {
        let mut buf = [0u8; 9];
        buf[0] = base_reg;
        buf[1..].copy_from_slice(values);
        self.i2c.write(self.address, &buf).map_err(Si5351Error::Bus)
    }

    fn read_reg(&mut self, reg: u8) -> Si5351Result<u8, I::Error> {
        let mut buf = [0u8];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(Si5351Error::Bus)?;
        Ok(buf[0])
    }
}

impl<I: I2c> ClockGenerator for Si5351<I> {
    type Error = Si5351Error<I::Error>;

    /// `frequency` is in hundredths of a hertz and is rounded to the nearest
    /// whole hertz. The multisynth runs in integer mode, so the sub-hertz
    /// part of the request is not reproduced at the output.
    fn set_frequency(&mut self, frequency: u64, output: ClockOutput) -> Result<(), Self::Error> {
        let target_hz = frequency.saturating_add(Frequency::SCALE / 2) / Frequency::SCALE;
        self.set_frequency_hz(output, target_hz)
    }
}
