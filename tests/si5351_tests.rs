//! Si5351 Driver Tests
//!
//! Register-level tests of the clock generator against a mocked I2C bus.
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test si5351_tests

mod common;

use common::MockI2c;
use embedded_hal::i2c::ErrorKind;
use qsd_frontend::drivers::si5351::{CrystalLoad, DriveStrength, Si5351, Si5351Error, DEFAULT_ADDRESS};
use qsd_frontend::drivers::ClockGenerator;
use qsd_frontend::types::ClockOutput;

const XTAL: u32 = 25_000_000;

/// PLL A for 602.004 MHz from 25 MHz: 24 + 501/6250
const PLL_MW: [u8; 8] = [0x18, 0x6A, 0x00, 0x0A, 0x0A, 0x00, 0x06, 0x5C];
/// Multisynth /227
const MS_227: [u8; 8] = [0x00, 0x01, 0x00, 0x6F, 0x80, 0x00, 0x00, 0x00];

fn ready_bus() -> MockI2c {
    MockI2c::default()
}

// =============================================================================
// Initialization
// =============================================================================

#[test]
fn test_init_sequence() {
    let mut si = Si5351::new(ready_bus(), XTAL, 0);
    si.init(CrystalLoad::Load10pF).unwrap();
    let bus = si.release();

    assert_eq!(
        bus.register_writes(),
        vec![
            (3, vec![0xFF]),
            (183, vec![0xD2]),
            (16, vec![0x80]),
            (17, vec![0x80]),
            (18, vec![0x80]),
        ]
    );
    assert!(bus.writes.iter().all(|(addr, _)| *addr == DEFAULT_ADDRESS));
}

#[test]
fn test_init_crystal_load() {
    for (load, value) in [
        (CrystalLoad::Load6pF, 0x52),
        (CrystalLoad::Load8pF, 0x92),
        (CrystalLoad::Load10pF, 0xD2),
    ] {
        let mut si = Si5351::new(ready_bus(), XTAL, 0);
        si.init(load).unwrap();
        assert_eq!(si.release().last_value(183), Some(value));
    }
}

#[test]
fn test_init_not_ready() {
    let bus = MockI2c {
        status: 0x80,
        ..MockI2c::default()
    };
    let mut si = Si5351::new(bus, XTAL, 0);
    assert_eq!(si.init(CrystalLoad::default()), Err(Si5351Error::NotReady));
    assert!(si.release().register_writes().is_empty());
}

#[test]
fn test_init_bus_error() {
    let bus = MockI2c {
        fail: true,
        ..MockI2c::default()
    };
    let mut si = Si5351::new(bus, XTAL, 0);
    assert_eq!(si.init(CrystalLoad::default()), Err(Si5351Error::Bus(ErrorKind::Bus)));
}

#[test]
fn test_crystal_correction() {
    let si = Si5351::new(ready_bus(), 25_000_000, 108_000);
    assert_eq!(si.xtal_hz(), 25_002_700);
    let si = Si5351::new(ready_bus(), 27_000_000, -8_000);
    assert_eq!(si.xtal_hz(), 26_999_784);
}

// =============================================================================
// Frequency Programming
// =============================================================================

#[test]
fn test_set_frequency_register_sequence() {
    let mut si = Si5351::new(ready_bus(), XTAL, 0);
    si.set_frequency_hz(ClockOutput::Clk1, 2_652_000).unwrap();
    let bus = si.release();

    assert_eq!(
        bus.register_writes(),
        vec![
            (26, PLL_MW.to_vec()),
            (50, MS_227.to_vec()),
            (17, vec![0x4F]),
            (177, vec![0x20]),
            (3, vec![0xFD]),
        ]
    );
}

#[test]
fn test_multisynth_register_per_output() {
    for (output, ms_reg, ctrl_reg, enable) in [
        (ClockOutput::Clk0, 42, 16, 0xFE),
        (ClockOutput::Clk1, 50, 17, 0xFD),
        (ClockOutput::Clk2, 58, 18, 0xFB),
    ] {
        let mut si = Si5351::new(ready_bus(), XTAL, 0);
        si.set_frequency_hz(output, 2_652_000).unwrap();
        let bus = si.release();
        assert_eq!(bus.count(ms_reg), 1);
        assert_eq!(bus.last_value(ctrl_reg), Some(0x4F));
        assert_eq!(bus.last_value(3), Some(enable));
    }
}

#[test]
fn test_same_pll_skips_reset() {
    let mut si = Si5351::new(ready_bus(), XTAL, 0);
    si.set_frequency_hz(ClockOutput::Clk1, 2_652_000).unwrap();
    si.set_frequency_hz(ClockOutput::Clk1, 2_652_000).unwrap();
    let bus = si.release();

    assert_eq!(bus.count(26), 1);
    assert_eq!(bus.count(177), 1);
    assert_eq!(bus.count(50), 2);
}

#[test]
fn test_new_pll_resets() {
    let mut si = Si5351::new(ready_bus(), XTAL, 0);
    si.set_frequency_hz(ClockOutput::Clk1, 2_652_000).unwrap();
    si.set_frequency_hz(ClockOutput::Clk1, 996_000).unwrap();
    let bus = si.release();
    assert_eq!(bus.count(26), 2);
    assert_eq!(bus.count(177), 2);
}

#[test]
fn test_init_clears_pll_cache() {
    let mut si = Si5351::new(ready_bus(), XTAL, 0);
    si.set_frequency_hz(ClockOutput::Clk1, 2_652_000).unwrap();
    si.init(CrystalLoad::default()).unwrap();
    si.set_frequency_hz(ClockOutput::Clk1, 2_652_000).unwrap();
    assert_eq!(si.release().count(177), 2);
}

#[test]
fn test_divide_by_4() {
    let mut si = Si5351::new(ready_bus(), XTAL, 0);
    si.set_frequency_hz(ClockOutput::Clk0, 200_000_000).unwrap();
    let bus = si.release();

    let ms: Vec<_> = bus.register_writes().into_iter().filter(|(r, _)| *r == 42).collect();
    assert_eq!(ms, vec![(42, vec![0x00, 0x01, 0x0C, 0x00, 0x00, 0x00, 0x00, 0x00])]);
}

#[test]
fn test_r_divider() {
    // 100 kHz: 600 MHz / 1500 / 4
    let mut si = Si5351::new(ready_bus(), XTAL, 0);
    si.set_frequency_hz(ClockOutput::Clk0, 100_000).unwrap();
    let bus = si.release();

    let ms: Vec<_> = bus.register_writes().into_iter().filter(|(r, _)| *r == 42).collect();
    assert_eq!(ms, vec![(42, vec![0x00, 0x01, 0x22, 0xEC, 0x00, 0x00, 0x00, 0x00])]);
}

#[test]
fn test_unreachable_frequency() {
    let mut si = Si5351::new(ready_bus(), XTAL, 0);
    assert_eq!(
        si.set_frequency_hz(ClockOutput::Clk0, 1_000),
        Err(Si5351Error::Unreachable { target_hz: 1_000 })
    );
    assert_eq!(
        si.set_frequency_hz(ClockOutput::Clk0, 300_000_000),
        Err(Si5351Error::Unreachable { target_hz: 300_000_000 })
    );
    assert!(si.release().writes.is_empty());
}

// =============================================================================
// Options
// =============================================================================

#[test]
fn test_drive_strength() {
    let mut si = Si5351::new(ready_bus(), XTAL, 0).with_drive(DriveStrength::Drive2mA);
    si.set_frequency_hz(ClockOutput::Clk1, 2_652_000).unwrap();
    assert_eq!(si.release().last_value(17), Some(0x4C));
}

#[test]
fn test_custom_address() {
    let mut si = Si5351::new(ready_bus(), XTAL, 0).with_address(0x61);
    si.init(CrystalLoad::default()).unwrap();
    assert!(si.release().writes.iter().all(|(addr, _)| *addr == 0x61));
}

#[test]
fn test_enable_disable() {
    let mut si = Si5351::new(ready_bus(), XTAL, 0);
    si.enable(ClockOutput::Clk2).unwrap();
    si.enable(ClockOutput::Clk0).unwrap();
    si.disable(ClockOutput::Clk2).unwrap();
    let bus = si.release();
    let enables: Vec<_> = bus
        .register_writes()
        .into_iter()
        .filter(|(r, _)| *r == 3)
        .map(|(_, v)| v[0])
        .collect();
    assert_eq!(enables, vec![0xFB, 0xFA, 0xFE]);
}

// =============================================================================
// Clock Generator Interface
// =============================================================================

#[test]
fn test_clock_generator_takes_centihertz() {
    let mut si = Si5351::new(ready_bus(), XTAL, 0);
    ClockGenerator::set_frequency(&mut si, 265_200_000, ClockOutput::Clk1).unwrap();
    let bus = si.release();
    assert_eq!(bus.register_writes()[0], (26, PLL_MW.to_vec()));
    assert_eq!(bus.register_writes()[1], (50, MS_227.to_vec()));
}

#[test]
fn test_clock_generator_rounds_to_hertz() {
    let mut si = Si5351::new(ready_bus(), XTAL, 0);
    // 2_651_999.50 Hz rounds up to the MW LO
    ClockGenerator::set_frequency(&mut si, 265_199_950, ClockOutput::Clk1).unwrap();
    si.set_frequency_hz(ClockOutput::Clk1, 2_652_000).unwrap();
    assert_eq!(si.release().count(26), 1);
}

#[test]
fn test_sub_hertz_request_programs_whole_hertz() {
    let mut exact = Si5351::new(ready_bus(), XTAL, 0);
    ClockGenerator::set_frequency(&mut exact, 265_200_000, ClockOutput::Clk1).unwrap();

    let mut fractional = Si5351::new(ready_bus(), XTAL, 0);
    ClockGenerator::set_frequency(&mut fractional, 265_200_049, ClockOutput::Clk1).unwrap();

    assert_eq!(
        exact.release().register_writes(),
        fractional.release().register_writes()
    );
}

#[test]
fn test_clock_generator_through_mut_ref() {
    fn program<C: ClockGenerator>(mut clock: C) -> Result<(), C::Error> {
        clock.set_frequency(265_200_000, ClockOutput::Clk1)
    }

    let mut si = Si5351::new(ready_bus(), XTAL, 0);
    program(&mut si).unwrap();
    assert_eq!(si.release().last_value(17), Some(0x4F));
}

#[test]
fn test_error_display() {
    let err: Si5351Error<ErrorKind> = Si5351Error::Unreachable { target_hz: 1_000 };
    assert_eq!(format!("{err}"), "1000 Hz not reachable");
    let err: Si5351Error<ErrorKind> = Si5351Error::NotReady;
    assert_eq!(format!("{err}"), "Si5351 not ready");
}
