//! Error types for encoder construction.

use core::fmt;

/// Reasons an [`Encoder`](crate::Encoder) could not be constructed.
///
/// Construction is the only fallible operation. Once an encoder exists,
/// every tick and accessor is defined for every reachable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// No quadrature state getter was supplied.
    MissingStateSampler,
    /// No button level getter was supplied.
    MissingButtonSampler,
    /// The tick period was zero; tick budgets are derived by dividing by it.
    ZeroPeriod,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingStateSampler => write!(f, "missing encoder state sampler"),
            Error::MissingButtonSampler => write!(f, "missing encoder button sampler"),
            Error::ZeroPeriod => write!(f, "tick period must be greater than zero"),
        }
    }
}
