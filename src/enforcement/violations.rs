//! Admission violations and handling strategies.

use thiserror::Error;

use crate::margin::RiskLevel;

/// Reasons a proposed action is refused
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Violation {
    #[error("Action '{action}' is not in the safe set (verified over {horizon} steps)")]
    OutsideSafeSet { action: String, horizon: usize },

    #[error("Risk level {level} is at or above the blocking threshold {threshold}")]
    RiskAtOrAbove {
        level: RiskLevel,
        threshold: RiskLevel,
    },

    #[error("Risk level unknown, blocking threshold {threshold} cannot be checked")]
    RiskUnknown { threshold: RiskLevel },

    #[error("Custom check failed: {message}")]
    CustomCheckFailed { message: String },
}

/// What the embedding system should do when an action is refused
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ViolationStrategy {
    /// Refuse this action; the agent may propose another
    #[default]
    Reject,

    /// Stop the agent altogether
    Halt,
}
