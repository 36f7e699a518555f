//! Build errors for safety filters.

use thiserror::Error;

/// Errors that can occur when building a safety filter.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Transition function not specified. Call .transition(f) before .build()")]
    MissingTransition,

    #[error("Forbidden region not specified. Call .forbidden(region) before .build()")]
    MissingForbiddenRegion,

    #[error("Invalid filter settings: {0}")]
    InvalidSettings(String),
}
