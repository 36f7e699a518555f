//! Horizon Guard: bounded-horizon reachability filtering for agents
//!
//! At every state an agent may choose among a finite set of actions. Some of
//! those actions lead, immediately or after a few more steps, into a
//! forbidden region of the state space. Horizon Guard enumerates the reachable
//! futures up to a chosen horizon and keeps only the actions that provably
//! stay out of that region.
//!
//! The library is pure computation. Everything domain specific (what a state
//! is, how it evolves, what counts as forbidden) is supplied by the caller as
//! closures, and no state survives between calls.
//!
//! # Core Concepts
//!
//! - **State / Action**: opaque caller types via the [`State`] and [`Action`] traits
//! - **Forbidden region**: a pure predicate, see [`ForbiddenRegion`]
//! - **Safe set**: the admissible actions at a state, proven over a finite horizon
//! - **Risk level**: advisory classification by distance to the boundary
//!
//! Safety beyond the horizon is never verified. Results report the horizon
//! they hold for through [`SafeActionSet::verified_horizon`].
//!
//! # Example
//!
//! ```rust
//! use horizon_guard::{compute_safe_actions, ForbiddenRegion, State, TransitionFn};
//! use horizon_guard::action_enum;
//!
//! #[derive(Clone, PartialEq, Eq, Hash, Debug)]
//! struct Pos {
//!     x: i64,
//! }
//! impl State for Pos {}
//!
//! action_enum! {
//!     enum Move { Left, Right, Stop }
//! }
//!
//! let transition = TransitionFn::new(|s: &Pos, a: &Move| match a {
//!     Move::Left => Pos { x: s.x - 1 },
//!     Move::Right => Pos { x: s.x + 1 },
//!     Move::Stop => s.clone(),
//! });
//! let forbidden = ForbiddenRegion::new(|s: &Pos| s.x >= 10);
//!
//! let safe = compute_safe_actions(&Pos { x: 9 }, &Move::all(), &transition, &forbidden, 1).unwrap();
//! assert_eq!(safe.into_vec(), vec![Move::Left, Move::Stop]);
//!
//! let safe = compute_safe_actions(&Pos { x: 9 }, &Move::all(), &transition, &forbidden, 2).unwrap();
//! assert_eq!(safe.into_vec(), vec![Move::Left]);
//! ```

pub mod builder;
pub mod core;
pub mod enforcement;
pub mod margin;
pub mod reach;

use std::hash::Hash;

use crate::reach::search::{self, Branching};

// Re-export commonly used types
pub use builder::{BuildError, FilterSettings, SafetyFilterBuilder};
pub use self::core::{Action, DistanceFn, ForbiddenRegion, Policy, State, Trajectory, TransitionFn};
pub use margin::{risk_level, RiskLevel};
pub use reach::{
    FilterConfig, FilterError, FilterReport, Memoization, Parallelism, SafeActionSet,
    SafetyFilter, SearchBudget,
};

fn eq_config<S: State + Eq + Hash>(horizon: usize) -> FilterConfig<S> {
    FilterConfig {
        horizon,
        memoization: Memoization::by_eq(),
        ..FilterConfig::default()
    }
}

/// Actions at `state` that cannot reach the forbidden region within
/// `horizon` steps under any sequence of later actions.
///
/// Revisited states are recognised with the state's own `Eq` and `Hash`. Use
/// [`SafetyFilterBuilder`] for other memoization policies, parallel
/// evaluation or search budgets.
///
/// Fails with [`FilterError::AlreadyForbidden`] if `state` itself is
/// forbidden. An empty action space yields an empty set.
pub fn compute_safe_actions<S, A, E>(
    state: &S,
    actions: &[A],
    transition: &TransitionFn<S, A, E>,
    forbidden: &ForbiddenRegion<S, E>,
    horizon: usize,
) -> Result<SafeActionSet<A>, FilterError<E>>
where
    S: State + Eq + Hash,
    A: Action,
    E: Send,
{
    let config = eq_config(horizon);
    let report = search::evaluate(
        transition,
        forbidden,
        &config,
        state,
        actions,
        Branching::Exhaustive(actions),
    )?;
    Ok(report.safe_set())
}

/// Actions at `state` whose single rollout under `policy` stays out of the
/// forbidden region for `horizon` steps.
///
/// Only the first action varies; every later step is `policy(state)`. When
/// the policy only picks actions from `actions`, the result contains the
/// [`compute_safe_actions`] result for the same inputs, since one
/// continuation is checked instead of all of them.
pub fn compute_safe_actions_under_policy<S, A, E>(
    state: &S,
    actions: &[A],
    transition: &TransitionFn<S, A, E>,
    forbidden: &ForbiddenRegion<S, E>,
    policy: &Policy<S, A, E>,
    horizon: usize,
) -> Result<SafeActionSet<A>, FilterError<E>>
where
    S: State + Eq + Hash,
    A: Action,
    E: Send,
{
    let config = eq_config(horizon);
    let report = search::evaluate(
        transition,
        forbidden,
        &config,
        state,
        actions,
        Branching::Policy(policy),
    )?;
    Ok(report.safe_set())
}
