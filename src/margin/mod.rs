//! Graduated risk from the distance to the forbidden-region boundary.
//!
//! Risk levels are advisory. They never remove an action from a safe set on
//! their own; an embedding system decides what to do with them, for example
//! through [`AdmissionRules`](crate::enforcement::AdmissionRules).

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

use crate::core::{DistanceFn, State};
use crate::reach::FilterError;

/// Risk classification of a state outside the forbidden region.
///
/// Levels are ordered from least to most severe, so
/// `level >= RiskLevel::Danger` reads as "Danger or worse".
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    /// More than 10 margins from the boundary.
    Safe,
    /// Between 3 and 10 margins.
    Caution,
    /// Between 1 and 3 margins.
    Warning,
    /// Within one margin.
    Danger,
    /// On the boundary.
    Collapse,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Caution => "caution",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Collapse => "collapse",
        }
    }

    pub fn is_at_least(&self, threshold: RiskLevel) -> bool {
        *self >= threshold
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket a raw distance using safety margin `epsilon`.
///
/// Buckets are `(10e, inf)` Safe, `(3e, 10e]` Caution, `(e, 3e]` Warning,
/// `(0, e]` Danger and exactly `0` Collapse.
///
/// # Example
///
/// ```rust
/// use horizon_guard::margin::{classify, RiskLevel};
///
/// assert_eq!(classify::<()>(5.0, 0.5), Ok(RiskLevel::Caution));
/// assert_eq!(classify::<()>(0.5, 0.5), Ok(RiskLevel::Danger));
/// assert_eq!(classify::<()>(0.0, 0.5), Ok(RiskLevel::Collapse));
/// ```
pub fn classify<E>(distance: f64, epsilon: f64) -> Result<RiskLevel, FilterError<E>> {
    if !(epsilon.is_finite() && epsilon > 0.0) {
        return Err(FilterError::InvalidMargin { epsilon });
    }
    if distance.is_nan() || distance < 0.0 {
        return Err(FilterError::InvalidDistance { distance });
    }

    let level = if distance > 10.0 * epsilon {
        RiskLevel::Safe
    } else if distance > 3.0 * epsilon {
        RiskLevel::Caution
    } else if distance > epsilon {
        RiskLevel::Warning
    } else if distance > 0.0 {
        RiskLevel::Danger
    } else {
        RiskLevel::Collapse
    };
    Ok(level)
}

/// Risk level of `state`, which the caller knows to be outside the
/// forbidden region.
///
/// # Example
///
/// ```rust
/// use horizon_guard::core::{DistanceFn, State};
/// use horizon_guard::margin::{risk_level, RiskLevel};
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Temp(f64);
/// impl State for Temp {}
///
/// // Boundary at 42 degrees
/// let distance = DistanceFn::new(|t: &Temp| 42.0 - t.0);
///
/// assert_eq!(risk_level(&Temp(37.0), &distance, 1.0).unwrap(), RiskLevel::Caution);
/// assert_eq!(risk_level(&Temp(41.5), &distance, 1.0).unwrap(), RiskLevel::Danger);
/// ```
pub fn risk_level<S: State, E>(
    state: &S,
    distance: &DistanceFn<S, E>,
    epsilon: f64,
) -> Result<RiskLevel, FilterError<E>> {
    let d = distance.measure(state)?;
    let level = classify(d, epsilon)?;
    trace!(state = %state.describe(), distance = d, %level, "risk classified");
    Ok(level)
}
