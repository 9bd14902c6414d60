//! Error types for the tracer simulation
//!
//! Both kinds abort the current run: an invalid parameter is caught before
//! any integration happens, a numerical instability stops the step loop.

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SimError {
    #[error("invalid parameter `{name}`: {reason}")]
    ParameterValidation { name: &'static str, reason: String },

    #[error("non-finite state for tracer {index} after step {step} (t = {t} Gyr); dt is too large for the dynamical time")]
    NumericalInstability { step: usize, index: usize, t: f64 },
}

pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SimError::ParameterValidation { name, reason: reason.into() }
    }
}
