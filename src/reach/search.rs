//! Bounded forward-reachability search.
//!
//! Each top-level call walks `Exploring(state, remaining_depth)` nodes until
//! every branch ends in `Forbidden` or `Safe`. Work below the first step is
//! shared across candidates through the memo table.

use rayon::prelude::*;
use std::borrow::Cow;
use std::collections::HashSet;
use tracing::{debug, trace, warn};

use super::budget::BudgetTracker;
use super::config::{FilterConfig, Parallelism};
use super::error::FilterError;
use super::memo::{MemoKey, MemoTable, Memoization, Reach};
use super::outcome::{ActionVerdict, Exclusion, Explanation, FilterReport, SearchMode, Verdict};
use crate::core::{Action, ForbiddenRegion, Policy, State, Step, Trajectory, TransitionFn};

/// Source of continuation actions below the first step.
pub(crate) enum Branching<'a, S: State, A: Action, E> {
    /// Every action in the action space.
    Exhaustive(&'a [A]),
    /// The single action a fixed policy picks.
    Policy(&'a Policy<S, A, E>),
}

impl<S: State, A: Action, E> Branching<'_, S, A, E> {
    fn mode(&self) -> SearchMode {
        match self {
            Self::Exhaustive(_) => SearchMode::Exhaustive,
            Self::Policy(_) => SearchMode::Policy,
        }
    }
}

struct Search<'a, S: State, A: Action, E> {
    transition: &'a TransitionFn<S, A, E>,
    forbidden: &'a ForbiddenRegion<S, E>,
    memoization: &'a Memoization<S>,
    branching: Branching<'a, S, A, E>,
    lookahead: usize,
    memo: MemoTable,
    budget: BudgetTracker,
}

impl<'a, S: State, A: Action, E> Search<'a, S, A, E> {
    fn new(
        transition: &'a TransitionFn<S, A, E>,
        forbidden: &'a ForbiddenRegion<S, E>,
        config: &'a FilterConfig<S>,
        branching: Branching<'a, S, A, E>,
    ) -> Self {
        Self {
            transition,
            forbidden,
            memoization: &config.memoization,
            branching,
            lookahead: config.lookahead(),
            memo: MemoTable::new(),
            budget: BudgetTracker::start(&config.budget),
        }
    }

    fn continuations(&self, state: &S) -> Result<Cow<'a, [A]>, E> {
        match self.branching {
            Branching::Exhaustive(actions) => Ok(Cow::Borrowed(actions)),
            Branching::Policy(policy) => Ok(Cow::Owned(vec![policy.choose(state)?])),
        }
    }

    /// Judge one candidate first action.
    fn judge(&self, state: &S, action: &A) -> Result<ActionVerdict<A>, E> {
        let next = self.transition.apply(state, action)?;
        let verdict = if self.forbidden.contains(&next)? {
            Verdict::Excluded(Exclusion::ImmediatelyForbidden)
        } else {
            match self.reach(&next, self.lookahead)? {
                Reach::Clear => Verdict::Admitted,
                Reach::Reaches => Verdict::Excluded(Exclusion::ReachesForbidden),
                Reach::Unresolved => Verdict::Excluded(Exclusion::Unresolved),
            }
        };

        trace!(action = action.name(), ?verdict, "candidate judged");
        Ok(ActionVerdict {
            action: action.clone(),
            verdict,
        })
    }

    /// Whether some continuation from `state` enters the forbidden region
    /// within `depth` steps. `state` itself is known to be outside it.
    fn reach(&self, state: &S, depth: usize) -> Result<Reach, E> {
        if depth == 0 {
            return Ok(Reach::Clear);
        }
        match self.memoization.key(state) {
            Some(key) => self
                .memo
                .get_or_compute(key, depth, || self.expand(state, depth)),
            None => self.expand(state, depth),
        }
    }

    fn expand(&self, state: &S, depth: usize) -> Result<Reach, E> {
        if !self.budget.try_expand() {
            return Ok(Reach::Unresolved);
        }
        trace!(state = %state.describe(), depth, "expanding");

        let mut outcome = Reach::Clear;
        for action in self.continuations(state)?.iter() {
            let next = self.transition.apply(state, action)?;
            let branch = if self.forbidden.contains(&next)? {
                Reach::Reaches
            } else {
                self.reach(&next, depth - 1)?
            };
            outcome = outcome.merge(branch);
            if outcome == Reach::Reaches {
                break;
            }
        }
        Ok(outcome)
    }

    /// Depth-first search for a path into the forbidden region, in
    /// continuation order. Steps are returned last-to-first.
    fn witness(
        &self,
        state: &S,
        depth: usize,
        cleared: &mut HashSet<(MemoKey, usize)>,
    ) -> Result<Option<Vec<Step<S, A>>>, E> {
        if depth == 0 {
            return Ok(None);
        }
        let key = self.memoization.key(state).map(|k| (k, depth));
        if key.as_ref().is_some_and(|k| cleared.contains(k)) {
            return Ok(None);
        }
        if !self.budget.try_expand() {
            return Ok(None);
        }

        for action in self.continuations(state)?.iter() {
            let next = self.transition.apply(state, action)?;
            let step = Step {
                from: state.clone(),
                action: action.clone(),
                to: next.clone(),
            };
            if self.forbidden.contains(&next)? {
                return Ok(Some(vec![step]));
            }
            if let Some(mut rest) = self.witness(&next, depth - 1, cleared)? {
                rest.push(step);
                return Ok(Some(rest));
            }
        }

        if let Some(key) = key {
            cleared.insert(key);
        }
        Ok(None)
    }
}

fn ensure_outside<S: State, E>(
    forbidden: &ForbiddenRegion<S, E>,
    state: &S,
) -> Result<(), FilterError<E>> {
    if forbidden.contains(state)? {
        return Err(FilterError::AlreadyForbidden {
            state: state.describe(),
        });
    }
    Ok(())
}

/// Evaluate every candidate action at `state`.
pub(crate) fn evaluate<S, A, E>(
    transition: &TransitionFn<S, A, E>,
    forbidden: &ForbiddenRegion<S, E>,
    config: &FilterConfig<S>,
    state: &S,
    actions: &[A],
    branching: Branching<'_, S, A, E>,
) -> Result<FilterReport<A>, FilterError<E>>
where
    S: State,
    A: Action,
    E: Send,
{
    ensure_outside(forbidden, state)?;

    let mode = branching.mode();
    debug!(
        state = %state.describe(),
        candidates = actions.len(),
        horizon = config.horizon,
        ?mode,
        "filtering actions"
    );

    let search = Search::new(transition, forbidden, config, branching);
    let verdicts = match config.parallelism {
        Parallelism::Sequential => actions
            .iter()
            .map(|action| search.judge(state, action))
            .collect::<Result<Vec<_>, E>>()?,
        Parallelism::Parallel => actions
            .par_iter()
            .map(|action| search.judge(state, action))
            .collect::<Result<Vec<_>, E>>()?,
    };

    let budget_exhausted = search.budget.is_exhausted();
    if budget_exhausted {
        warn!(
            expansions = search.budget.expansions(),
            "search budget exhausted; unexplored subtrees treated as unsafe"
        );
    }

    let report = FilterReport {
        mode,
        horizon: config.horizon,
        verdicts,
        expansions: search.budget.expansions(),
        memo_hits: search.memo.hits(),
        budget_exhausted,
        evaluated_at: chrono::Utc::now(),
    };
    debug!(
        admitted = report.verdicts.iter().filter(|v| v.verdict.is_admitted()).count(),
        expansions = report.expansions,
        memo_hits = report.memo_hits,
        "filtering finished"
    );
    Ok(report)
}

/// Find a path from `state` that starts with `action` and enters the
/// forbidden region within the horizon.
pub(crate) fn explain<S: State, A: Action, E>(
    transition: &TransitionFn<S, A, E>,
    forbidden: &ForbiddenRegion<S, E>,
    config: &FilterConfig<S>,
    state: &S,
    action: &A,
    branching: Branching<'_, S, A, E>,
) -> Result<Explanation<S, A>, FilterError<E>> {
    ensure_outside(forbidden, state)?;

    let search = Search::new(transition, forbidden, config, branching);
    let next = transition.apply(state, action)?;
    let first = Step {
        from: state.clone(),
        action: action.clone(),
        to: next.clone(),
    };

    let mut reversed = if forbidden.contains(&next)? {
        vec![first]
    } else {
        let mut cleared = HashSet::new();
        match search.witness(&next, search.lookahead, &mut cleared)? {
            Some(mut rest) => {
                rest.push(first);
                rest
            }
            None if search.budget.is_exhausted() => {
                warn!(
                    action = action.name(),
                    expansions = search.budget.expansions(),
                    "search budget exhausted before a witness was found"
                );
                return Ok(Explanation::Unresolved);
            }
            None => return Ok(Explanation::Clear),
        }
    };

    let mut trajectory = Trajectory::new();
    while let Some(step) = reversed.pop() {
        trajectory = trajectory.record(step);
    }
    Ok(Explanation::Witness(trajectory))
}

/// Follow `policy` after `first`, stopping at the horizon or at the first
/// forbidden state.
pub(crate) fn rollout<S: State, A: Action, E>(
    transition: &TransitionFn<S, A, E>,
    forbidden: &ForbiddenRegion<S, E>,
    horizon: usize,
    state: &S,
    first: &A,
    policy: &Policy<S, A, E>,
) -> Result<Trajectory<S, A>, FilterError<E>> {
    ensure_outside(forbidden, state)?;

    let steps = horizon.max(1);
    let mut trajectory = Trajectory::new();
    let mut current = state.clone();
    let mut action = first.clone();

    for taken in 1..=steps {
        let next = transition.apply(&current, &action)?;
        trajectory = trajectory.record(Step {
            from: current,
            action,
            to: next.clone(),
        });
        if forbidden.contains(&next)? || taken == steps {
            break;
        }
        action = policy.choose(&next)?;
        current = next;
    }
    Ok(trajectory)
}
