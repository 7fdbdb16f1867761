//! Radio Control Logic
//!
//! Band plan, tuning arithmetic and the front-end controller that turns a
//! band selection into an LO frequency and an LPF selection.

pub mod band_plan;
pub mod filter_bank;
pub mod frontend;
pub mod tuner;
pub mod tuning;
