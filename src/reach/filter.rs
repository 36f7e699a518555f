//! The safety filter: owned dynamics plus configuration.

use super::config::FilterConfig;
use super::error::FilterError;
use super::outcome::{Explanation, FilterReport, SafeActionSet};
use super::search::{self, Branching};
use crate::core::{Action, ForbiddenRegion, Policy, State, Trajectory, TransitionFn};

/// Reachability filter for one system.
///
/// The filter owns the transition function and the forbidden region but
/// keeps no state between calls: every call starts from an empty memo table.
/// Build one with [`SafetyFilterBuilder`](crate::builder::SafetyFilterBuilder).
pub struct SafetyFilter<S: State, A: Action, E> {
    pub(crate) transition: TransitionFn<S, A, E>,
    pub(crate) forbidden: ForbiddenRegion<S, E>,
    pub(crate) config: FilterConfig<S>,
}

impl<S: State, A: Action, E: Send> SafetyFilter<S, A, E> {
    pub fn new(
        transition: TransitionFn<S, A, E>,
        forbidden: ForbiddenRegion<S, E>,
        config: FilterConfig<S>,
    ) -> Self {
        Self {
            transition,
            forbidden,
            config,
        }
    }

    pub fn config(&self) -> &FilterConfig<S> {
        &self.config
    }

    pub fn horizon(&self) -> usize {
        self.config.horizon
    }

    /// Actions whose every continuation over the action space stays out of
    /// the forbidden region for the configured horizon.
    pub fn safe_actions(&self, state: &S, actions: &[A]) -> Result<SafeActionSet<A>, FilterError<E>> {
        Ok(self.evaluate(state, actions)?.safe_set())
    }

    /// Actions that stay out of the forbidden region when the agent follows
    /// `policy` after taking them.
    pub fn safe_actions_under_policy(
        &self,
        state: &S,
        actions: &[A],
        policy: &Policy<S, A, E>,
    ) -> Result<SafeActionSet<A>, FilterError<E>> {
        Ok(self.evaluate_under_policy(state, actions, policy)?.safe_set())
    }

    /// Exhaustive-branching evaluation with per-action verdicts.
    pub fn evaluate(&self, state: &S, actions: &[A]) -> Result<FilterReport<A>, FilterError<E>> {
        search::evaluate(
            &self.transition,
            &self.forbidden,
            &self.config,
            state,
            actions,
            Branching::Exhaustive(actions),
        )
    }

    /// Policy-rollout evaluation with per-action verdicts.
    pub fn evaluate_under_policy(
        &self,
        state: &S,
        actions: &[A],
        policy: &Policy<S, A, E>,
    ) -> Result<FilterReport<A>, FilterError<E>> {
        search::evaluate(
            &self.transition,
            &self.forbidden,
            &self.config,
            state,
            actions,
            Branching::Policy(policy),
        )
    }

    /// Path showing how `action` can lead into the forbidden region when
    /// later steps range over `actions`.
    ///
    /// The answer is [`Explanation::Unresolved`] rather than
    /// [`Explanation::Clear`] when the search budget runs out first.
    pub fn explain(
        &self,
        state: &S,
        action: &A,
        actions: &[A],
    ) -> Result<Explanation<S, A>, FilterError<E>> {
        search::explain(
            &self.transition,
            &self.forbidden,
            &self.config,
            state,
            action,
            Branching::Exhaustive(actions),
        )
    }

    /// The single continuation the policy variant checks for `first`.
    pub fn rollout(
        &self,
        state: &S,
        first: &A,
        policy: &Policy<S, A, E>,
    ) -> Result<Trajectory<S, A>, FilterError<E>> {
        search::rollout(
            &self.transition,
            &self.forbidden,
            self.config.horizon,
            state,
            first,
            policy,
        )
    }
}
