//! Configuration and Constants Tests
//!
//! Tests to verify configuration values are valid and consistent.
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test config_tests

use core::num::NonZeroU64;

use qsd_frontend::config::*;
use qsd_frontend::drivers::si5351;
use qsd_frontend::radio::band_plan::{band, STARTUP_BAND};
use qsd_frontend::radio::tuning::SynthScale;
use qsd_frontend::types::{ClockOutput, SampleRate};

// =============================================================================
// I2C Configuration Tests
// =============================================================================

#[test]
fn i2c_frequency_valid() {
    // Standard I2C speeds: 100kHz, 400kHz, 1MHz
    assert!(I2C_FREQUENCY_HZ == 100_000 || I2C_FREQUENCY_HZ == 400_000 || I2C_FREQUENCY_HZ == 1_000_000);
}

#[test]
fn si5351_address_valid() {
    // Si5351A default address is 0x60 or 0x61
    assert!(SI5351_I2C_ADDR == 0x60 || SI5351_I2C_ADDR == 0x61);
}

#[test]
fn si5351_driver_uses_configured_address() {
    assert_eq!(si5351::DEFAULT_ADDRESS, SI5351_I2C_ADDR);
}

// =============================================================================
// Synthesizer Scale Tests
// =============================================================================

#[test]
fn synth_scale_constants() {
    assert_eq!(SI5351_FREQ_MULT, 100);
    assert_eq!(MASTER_CLK_MULT, 4);
    assert_eq!(SYNTH_BASE_SCALE, 1_000_000_000);
}

#[test]
fn calibration_is_unity_by_default() {
    assert_eq!(CALIBRATION_FACTOR.get(), SYNTH_BASE_SCALE);
}

#[test]
fn qsd_scale_uses_config_constants() {
    let scale = SynthScale::QSD;
    assert_eq!(scale.freq_unit_multiplier, SI5351_FREQ_MULT);
    assert_eq!(scale.base_scale, SYNTH_BASE_SCALE);
    assert_eq!(scale.clock_multiplier, MASTER_CLK_MULT);
    assert_eq!(SynthScale::default(), scale);
}

// =============================================================================
// Board Variant Tests
// =============================================================================

#[test]
fn joris_variant() {
    let v = HardwareVariant::Joris;
    assert_eq!(v.clock_output(), ClockOutput::Clk2);
    assert_eq!(v.crystal_hz(), 27_000_000);
    assert_eq!(v.crystal_correction_ppb(), -8_000);
}

#[test]
fn elektor_variant() {
    let v = HardwareVariant::Elektor;
    assert_eq!(v.clock_output(), ClockOutput::Clk1);
    assert_eq!(v.crystal_hz(), 25_000_000);
    assert_eq!(v.crystal_correction_ppb(), 108_000);
}

// =============================================================================
// Front End Config Tests
// =============================================================================

#[test]
fn default_config() {
    let config = FrontEndConfig::default();
    assert_eq!(config.variant, DEFAULT_VARIANT);
    assert_eq!(config.if_offset_hz, 24_000);
    assert_eq!(config.startup_band, STARTUP_BAND);
    assert_eq!(config.startup_band, band::MW);
    assert_eq!(config.calibration_factor, CALIBRATION_FACTOR);
    assert_eq!(config.scale, SynthScale::QSD);
}

#[test]
fn config_with_sample_rate() {
    let config = FrontEndConfig::for_variant(HardwareVariant::Joris).with_sample_rate(SampleRate::Sr48k);
    assert_eq!(config.variant, HardwareVariant::Joris);
    assert_eq!(config.if_offset_hz, 12_000);
}

#[test]
fn config_with_calibration() {
    let cal = NonZeroU64::new(999_999_000).unwrap();
    let config = FrontEndConfig::default().with_calibration(cal);
    assert_eq!(config.calibration_factor, cal);
    assert_eq!(config.if_offset_hz, DEFAULT_SAMPLE_RATE.if_offset_hz());
}
