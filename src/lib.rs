//! QSD Receiver Front End Library
//!
//! Frequency planning and band-filter selection for a quadrature sampling
//! detector (QSD) receiver. Given a band from the band plan and the IF
//! offset, the front end programs the `Si5351A` LO and puts exactly one of
//! five low-pass filters in circuit.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │   FrontEnd (band select, set_frequency)  │  Tuner flags      │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     TUNING CORE                              │
//! │   BandPlan  │  LO arithmetic  │  LPF selection rules         │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      DRIVERS                                 │
//! │   ClockGenerator (Si5351A over I2C)  │  OutputPin relays     │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RTOS / SCHEDULER                          │
//! │           embassy-rs (async/await executor)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Functional core, imperative shell**: LO and LPF decisions are pure
//!   functions; `FrontEnd` applies them to the hardware
//! - **Type-driven design**: `Frequency` is never zero, the calibration
//!   divisor is a `NonZeroU64`
//! - **No unsafe in application code**
//! - **Explicit error handling**: collaborator failures are returned, never
//!   retried behind the caller's back

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Peripheral Drivers
///
/// Clock generator seam and the `Si5351A` driver.
pub mod drivers;

/// Radio Control Logic
///
/// Band plan, tuning arithmetic, LPF selection and the front-end controller.
pub mod radio;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::{FrontEndConfig, HardwareVariant};
    pub use crate::drivers::ClockGenerator;
    pub use crate::radio::band_plan::{band, BandDescriptor, BandPlan, OutOfRange};
    pub use crate::radio::filter_bank::{FilterBank, FilterBankSwitch};
    pub use crate::radio::frontend::{FrontEnd, FrontEndError, SynthesizerSetting, Tuning};
    pub use crate::types::{ClockOutput, DemodMode, Frequency, SampleRate};

    // Common traits
    pub use embedded_hal::digital::OutputPin;
    pub use embedded_hal::i2c::I2c;

    // Logging
    #[cfg(feature = "embedded")]
    pub use defmt::{debug, error, info, trace, warn};
}
