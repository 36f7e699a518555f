//! Filter error types.

use thiserror::Error;

/// Errors returned by the filter operations.
///
/// `E` is the error type of the caller-supplied callables. Their failures
/// are carried in [`FilterError::Model`] exactly as they were returned; the
/// filter never guesses a forbidden-region answer to recover from them.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FilterError<E> {
    #[error("State {state} already lies in the forbidden region")]
    AlreadyForbidden { state: String },

    #[error("Distance function returned {distance}, expected a non-negative value")]
    InvalidDistance { distance: f64 },

    #[error("Safety margin must be positive and finite (got {epsilon})")]
    InvalidMargin { epsilon: f64 },

    #[error("Caller-supplied function failed: {0}")]
    Model(E),
}

impl<E> FilterError<E> {
    /// Return the caller's own error, if this is one.
    pub fn into_model(self) -> Option<E> {
        match self {
            Self::Model(err) => Some(err),
            _ => None,
        }
    }
}

impl<E> From<E> for FilterError<E> {
    fn from(err: E) -> Self {
        Self::Model(err)
    }
}
