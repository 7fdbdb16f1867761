//! Tuner Flags
//!
//! Hand-off point between the front end and the automatic frequency search.
//! The front end only ever raises the request; the search consumes it.

/// Autotune request flag
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tuner {
    autotune_requested: bool,
}

impl Tuner {
    /// Create a tuner with no pending request
    #[must_use]
    pub const fn new() -> Self {
        Self {
            autotune_requested: false,
        }
    }

    /// Ask for an automatic frequency search
    pub fn request_autotune(&mut self) {
        self.autotune_requested = true;
    }

    /// Check for a pending request
    #[must_use]
    pub const fn autotune_requested(&self) -> bool {
        self.autotune_requested
    }

    /// Consume a pending request
    pub fn take_autotune(&mut self) -> bool {
        core::mem::take(&mut self.autotune_requested)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Tuner {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Tuner(autotune={})", self.autotune_requested);
    }
}
