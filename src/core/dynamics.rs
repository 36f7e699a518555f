//! Caller-supplied dynamics: transitions, policies and boundary distances.
//!
//! Each callable is a boxed closure owned by the caller's filter. The filter
//! only invokes them; it never caches their results beyond a single
//! top-level call.

use super::state::{Action, State};
use std::convert::Infallible;
use std::marker::PhantomData;

type StepFn<S, A, E> = Box<dyn Fn(&S, &A) -> Result<S, E> + Send + Sync>;
type ChooseFn<S, A, E> = Box<dyn Fn(&S) -> Result<A, E> + Send + Sync>;
type MeasureFn<S, E> = Box<dyn Fn(&S) -> Result<f64, E> + Send + Sync>;

/// Deterministic transition function `State x Action -> State`.
///
/// # Example
///
/// ```rust
/// use horizon_guard::core::{Action, State, TransitionFn};
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Position {
///     x: i64,
/// }
///
/// impl State for Position {}
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum Move {
///     Left,
///     Right,
/// }
///
/// impl Action for Move {
///     fn name(&self) -> &str {
///         match self {
///             Self::Left => "left",
///             Self::Right => "right",
///         }
///     }
/// }
///
/// let step = TransitionFn::new(|s: &Position, a: &Move| match a {
///     Move::Left => Position { x: s.x - 1 },
///     Move::Right => Position { x: s.x + 1 },
/// });
///
/// assert_eq!(step.apply(&Position { x: 0 }, &Move::Right).unwrap(), Position { x: 1 });
/// ```
pub struct TransitionFn<S: State, A: Action, E = Infallible> {
    step: StepFn<S, A, E>,
    _phantom: PhantomData<(S, A)>,
}

impl<S: State, A: Action> TransitionFn<S, A, Infallible> {
    /// Create a transition from an infallible closure.
    pub fn new<F>(step: F) -> Self
    where
        F: Fn(&S, &A) -> S + Send + Sync + 'static,
    {
        TransitionFn {
            step: Box::new(move |state: &S, action: &A| Ok(step(state, action))),
            _phantom: PhantomData,
        }
    }
}

impl<S: State, A: Action, E> TransitionFn<S, A, E> {
    /// Create a transition from a closure that may fail.
    pub fn try_new<F>(step: F) -> Self
    where
        F: Fn(&S, &A) -> Result<S, E> + Send + Sync + 'static,
    {
        TransitionFn {
            step: Box::new(step),
            _phantom: PhantomData,
        }
    }

    /// Compute the successor of `state` under `action`.
    pub fn apply(&self, state: &S, action: &A) -> Result<S, E> {
        (self.step)(state, action)
    }
}

/// Fixed decision rule `State -> Action` used for single-rollout checks.
pub struct Policy<S: State, A: Action, E = Infallible> {
    choose: ChooseFn<S, A, E>,
    _phantom: PhantomData<(S, A)>,
}

impl<S: State, A: Action> Policy<S, A, Infallible> {
    /// Create a policy from an infallible closure.
    pub fn new<F>(choose: F) -> Self
    where
        F: Fn(&S) -> A + Send + Sync + 'static,
    {
        Policy {
            choose: Box::new(move |state: &S| Ok(choose(state))),
            _phantom: PhantomData,
        }
    }

    /// Policy that always picks the same action.
    pub fn constant(action: A) -> Self {
        Self::new(move |_| action.clone())
    }
}

impl<S: State, A: Action, E> Policy<S, A, E> {
    /// Create a policy from a closure that may fail.
    pub fn try_new<F>(choose: F) -> Self
    where
        F: Fn(&S) -> Result<A, E> + Send + Sync + 'static,
    {
        Policy {
            choose: Box::new(choose),
            _phantom: PhantomData,
        }
    }

    /// Pick the action the policy takes in `state`.
    pub fn choose(&self, state: &S) -> Result<A, E> {
        (self.choose)(state)
    }
}

/// Distance from a state to the forbidden-region boundary.
///
/// Values are expected to be non-negative; [`risk_level`](crate::margin::risk_level)
/// rejects anything else.
pub struct DistanceFn<S: State, E = Infallible> {
    measure: MeasureFn<S, E>,
    _phantom: PhantomData<S>,
}

impl<S: State> DistanceFn<S, Infallible> {
    /// Create a distance function from an infallible closure.
    pub fn new<F>(measure: F) -> Self
    where
        F: Fn(&S) -> f64 + Send + Sync + 'static,
    {
        DistanceFn {
            measure: Box::new(move |state: &S| Ok(measure(state))),
            _phantom: PhantomData,
        }
    }
}

impl<S: State, E> DistanceFn<S, E> {
    /// Create a distance function from a closure that may fail.
    pub fn try_new<F>(measure: F) -> Self
    where
        F: Fn(&S) -> Result<f64, E> + Send + Sync + 'static,
    {
        DistanceFn {
            measure: Box::new(measure),
            _phantom: PhantomData,
        }
    }

    /// Measure the distance from `state` to the boundary.
    pub fn measure(&self, state: &S) -> Result<f64, E> {
        (self.measure)(state)
    }
}
