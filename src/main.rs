//! QSD Receiver Main Application
//!
//! Entry point for the STM32G474-based QSD receiver front end.
//! Brings up the `Si5351A` and the LPF relays, tunes the startup band,
//! and spawns the heartbeat task.

#![no_std]
#![no_main]

use defmt::{error, info};
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::i2c::I2c;
use embassy_stm32::time::Hertz;
use embassy_time::{Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use qsd_frontend::config::{DEFAULT_VARIANT, I2C_FREQUENCY_HZ};
use qsd_frontend::drivers::si5351::{CrystalLoad, Si5351};
use qsd_frontend::prelude::*;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("QSD front end v{}", env!("CARGO_PKG_VERSION"));

    let p = embassy_stm32::init(embassy_stm32::Config::default());
    info!("Peripherals initialized");

    let led = Output::new(p.PA5, Level::Low, Speed::Low);

    // LPF relays in FilterBank::index order, HIGH puts the filter in circuit
    let lines = [
        Output::new(p.PC0, Level::Low, Speed::Low), // LW 295 kHz
        Output::new(p.PC1, Level::Low, Speed::Low), // MW 955 kHz
        Output::new(p.PC2, Level::Low, Speed::Low), // MW 2 MHz
        Output::new(p.PC3, Level::Low, Speed::Low), // HF 5.4 MHz
        Output::new(p.PC4, Level::Low, Speed::Low), // HF 30 MHz
    ];
    let filters = match FilterBankSwitch::new(lines) {
        Ok(filters) => filters,
        Err(never) => match never {},
    };

    // Blocking I2C: a frequency change must finish before other bus traffic
    let i2c = I2c::new_blocking(
        p.I2C1,
        p.PB8, // SCL
        p.PB9, // SDA
        Hertz(I2C_FREQUENCY_HZ),
        Default::default(),
    );

    let config = FrontEndConfig::for_variant(DEFAULT_VARIANT);
    let mut clock = Si5351::new(
        i2c,
        config.variant.crystal_hz(),
        config.variant.crystal_correction_ppb(),
    );
    if let Err(e) = clock.init(CrystalLoad::Load10pF) {
        error!("Si5351 init failed: {}", e);
    }
    info!("Si5351 on {} ready, xtal {} Hz", config.variant, clock.xtal_hz());

    let mut front_end = match FrontEnd::new(BandPlan::standard(), clock, filters, &config) {
        Ok(front_end) => front_end,
        Err(e) => defmt::panic!("bad front end config: {}", defmt::Display2Format(&e)),
    };

    match front_end.set_frequency() {
        Ok(tuning) => info!(
            "Tuned {=str}: LO {}, LPF {}",
            front_end.band().name,
            tuning.synthesizer,
            tuning.bank
        ),
        Err(e) => error!("Tuning failed: {}", defmt::Display2Format(&e)),
    }

    spawner.spawn(heartbeat_task(led)).unwrap();

    loop {
        Timer::after(Duration::from_secs(10)).await;
        info!("Main loop tick");
    }
}

/// Heartbeat task - blinks LED to show system is running
#[embassy_executor::task]
async fn heartbeat_task(mut led: Output<'static>) {
    loop {
        led.set_high();
        Timer::after(Duration::from_millis(100)).await;
        led.set_low();
        Timer::after(Duration::from_millis(900)).await;
    }
}
