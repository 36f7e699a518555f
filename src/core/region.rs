//! Forbidden-region predicates.
//!
//! The forbidden region (Omega) is the set of states the system must never
//! enter. What it means is entirely up to the host: the filter only asks
//! whether a given state lies inside it.

use super::state::State;
use std::convert::Infallible;
use std::marker::PhantomData;

/// Pure predicate answering whether a state lies in the forbidden region.
///
/// The predicate must be deterministic and free of side effects. Fallible
/// predicates may report their own error type `E`; the filter hands such
/// errors back to the caller without interpreting them.
///
/// # Example
///
/// ```rust
/// use horizon_guard::core::{ForbiddenRegion, State};
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Position {
///     x: i64,
/// }
///
/// impl State for Position {}
///
/// // Everything at or beyond x = 10 is off limits
/// let omega = ForbiddenRegion::new(|s: &Position| s.x >= 10);
///
/// assert!(!omega.contains(&Position { x: 9 }).unwrap());
/// assert!(omega.contains(&Position { x: 10 }).unwrap());
/// ```
pub struct ForbiddenRegion<S: State, E = Infallible> {
    predicate: Box<dyn Fn(&S) -> Result<bool, E> + Send + Sync>,
    _phantom: PhantomData<S>,
}

impl<S: State> ForbiddenRegion<S, Infallible> {
    /// Create a region from an infallible predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        ForbiddenRegion {
            predicate: Box::new(move |state: &S| Ok(predicate(state))),
            _phantom: PhantomData,
        }
    }
}

impl<S: State, E> ForbiddenRegion<S, E> {
    /// Create a region from a predicate that may fail.
    ///
    /// # Example
    ///
    /// ```rust
    /// use horizon_guard::core::{ForbiddenRegion, State};
    ///
    /// #[derive(Clone, PartialEq, Debug)]
    /// struct Reading(Option<f64>);
    ///
    /// impl State for Reading {}
    ///
    /// let omega = ForbiddenRegion::try_new(|r: &Reading| {
    ///     r.0.map(|v| v > 40.0).ok_or("sensor offline")
    /// });
    ///
    /// assert_eq!(omega.contains(&Reading(Some(41.0))), Ok(true));
    /// assert_eq!(omega.contains(&Reading(None)), Err("sensor offline"));
    /// ```
    pub fn try_new<F>(predicate: F) -> Self
    where
        F: Fn(&S) -> Result<bool, E> + Send + Sync + 'static,
    {
        ForbiddenRegion {
            predicate: Box::new(predicate),
            _phantom: PhantomData,
        }
    }

    /// Check whether the state lies in the forbidden region.
    pub fn contains(&self, state: &S) -> Result<bool, E> {
        (self.predicate)(state)
    }
}
