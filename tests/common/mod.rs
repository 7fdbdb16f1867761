//! Test doubles for the front-end collaborators
//!
//! Relay lines, clock generator and I2C bus, each recording what the code
//! under test did to it.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::digital::{self, OutputPin};
use embedded_hal::i2c::{self, I2c, Operation};
use qsd_frontend::drivers::ClockGenerator;
use qsd_frontend::radio::filter_bank::FilterBank;
use qsd_frontend::types::ClockOutput;

// =============================================================================
// Relay Lines
// =============================================================================

/// Shared record of pin writes: (line, high)
pub type PinLog = Rc<RefCell<Vec<(usize, bool)>>>;

/// Relay line that logs every write and can be told to fail
pub struct MockPin {
    id: usize,
    log: PinLog,
    fail_on: Rc<Cell<Option<usize>>>,
}

impl digital::ErrorType for MockPin {
    type Error = digital::ErrorKind;
}

impl MockPin {
    fn write(&mut self, high: bool) -> Result<(), digital::ErrorKind> {
        if self.fail_on.get() == Some(self.id) {
            return Err(digital::ErrorKind::Other);
        }
        self.log.borrow_mut().push((self.id, high));
        Ok(())
    }
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true)
    }
}

/// Five relay lines plus handles to inspect them
pub struct MockLines {
    pub pins: [MockPin; FilterBank::COUNT],
    pub log: PinLog,
    pub fail_on: Rc<Cell<Option<usize>>>,
}

pub fn mock_lines() -> MockLines {
    let log: PinLog = Rc::default();
    let fail_on = Rc::new(Cell::new(None));
    let pins = core::array::from_fn(|id| MockPin {
        id,
        log: Rc::clone(&log),
        fail_on: Rc::clone(&fail_on),
    });
    MockLines { pins, log, fail_on }
}

/// Replay a pin log and return the line levels after each write
pub fn replay(log: &[(usize, bool)]) -> Vec<[bool; FilterBank::COUNT]> {
    let mut levels = [false; FilterBank::COUNT];
    log.iter()
        .map(|&(id, high)| {
            levels[id] = high;
            levels
        })
        .collect()
}

/// Levels after the last write
pub fn final_levels(log: &[(usize, bool)]) -> [bool; FilterBank::COUNT] {
    replay(log).last().copied().unwrap_or_default()
}

/// Assert no two lines were ever high together
pub fn assert_break_before_make(log: &[(usize, bool)]) {
    for (step, levels) in replay(log).iter().enumerate() {
        let high = levels.iter().filter(|&&l| l).count();
        assert!(high <= 1, "{high} lines high after write {step}: {levels:?}");
    }
}

// =============================================================================
// Clock Generator
// =============================================================================

/// Clock generator that records every request
#[derive(Default)]
pub struct MockClock {
    pub calls: Vec<(u64, ClockOutput)>,
    pub fail: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockFault;

impl ClockGenerator for MockClock {
    type Error = ClockFault;

    fn set_frequency(&mut self, frequency: u64, output: ClockOutput) -> Result<(), Self::Error> {
        if self.fail {
            return Err(ClockFault);
        }
        self.calls.push((frequency, output));
        Ok(())
    }
}

// =============================================================================
// I2C Bus
// =============================================================================

/// I2C bus that records writes and answers reads with a fixed status byte
#[derive(Default)]
pub struct MockI2c {
    pub writes: Vec<(u8, Vec<u8>)>,
    pub status: u8,
    pub fail: bool,
}

impl MockI2c {
    /// Register writes as (register, values), skipping status polls
    pub fn register_writes(&self) -> Vec<(u8, Vec<u8>)> {
        self.writes
            .iter()
            .filter(|(_, bytes)| bytes.len() > 1)
            .map(|(_, bytes)| (bytes[0], bytes[1..].to_vec()))
            .collect()
    }

    /// Last value written to a single register
    pub fn last_value(&self, reg: u8) -> Option<u8> {
        self.register_writes()
            .iter()
            .rev()
            .find(|(r, v)| *r == reg && v.len() == 1)
            .map(|(_, v)| v[0])
    }

    /// Number of writes touching a register
    pub fn count(&self, reg: u8) -> usize {
        self.register_writes().iter().filter(|(r, _)| *r == reg).count()
    }
}

impl i2c::ErrorType for MockI2c {
    type Error = i2c::ErrorKind;
}

impl I2c for MockI2c {
    fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        if self.fail {
            return Err(i2c::ErrorKind::Bus);
        }
        for op in operations {
            match op {
                Operation::Write(bytes) => self.writes.push((address, bytes.to_vec())),
                Operation::Read(buf) => buf.fill(self.status),
            }
        }
        Ok(())
    }
}
