//! Peripheral Drivers
//!
//! Drivers for external ICs. The front end talks to the clock generator
//! through [`ClockGenerator`] so that any synthesizer (or a test double)
//! can stand in for the `Si5351A`.

pub mod si5351;
pub mod si5351_calc;

use crate::types::ClockOutput;

/// Clock generator programmed by the front end
pub trait ClockGenerator {
    /// Error raised by the underlying bus
    type Error;

    /// Set an output frequency
    ///
    /// `frequency` is in hundredths of a hertz.
    ///
    /// # Errors
    ///
    /// Returns the driver error; the output state is then unknown.
    fn set_frequency(&mut self, frequency: u64, output: ClockOutput) -> Result<(), Self::Error>;
}

impl<T: ClockGenerator + ?Sized> ClockGenerator for &mut T {
    type Error = T::Error;

    fn set_frequency(&mut self, frequency: u64, output: ClockOutput) -> Result<(), Self::Error> {
        T::set_frequency(self, frequency, output)
    }
}
