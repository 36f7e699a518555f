//! Builder API for creating admission rules.

use crate::core::{Action, State};
use crate::enforcement::context::AdmissionContext;
use crate::enforcement::rules::{AdmissionCheck, AdmissionRules};
use crate::enforcement::violations::{Violation, ViolationStrategy};
use crate::margin::RiskLevel;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for creating admission rules
pub struct AdmissionBuilder<S: State, A: Action> {
    require_safe_set: bool,
    block_at: Option<RiskLevel>,
    required_checks: Vec<AdmissionCheck<S, A>>,
    on_violation: ViolationStrategy,
}

impl<S: State, A: Action> AdmissionBuilder<S, A> {
    pub fn new() -> Self {
        Self {
            require_safe_set: true,
            block_at: None,
            required_checks: Vec::new(),
            on_violation: ViolationStrategy::Reject,
        }
    }

    /// Require the action to be in the filter's safe set (on by default)
    pub fn require_safe_set(mut self, required: bool) -> Self {
        self.require_safe_set = required;
        self
    }

    /// Refuse actions taken at this risk level or worse
    pub fn block_at(mut self, threshold: RiskLevel) -> Self {
        self.block_at = Some(threshold);
        self
    }

    /// Add a custom validation check
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: Fn(&AdmissionContext<S, A>) -> Validation<(), NonEmptyVec<Violation>>
            + Send
            + Sync
            + 'static,
    {
        self.required_checks.push(Box::new(check));
        self
    }

    /// Add a simple predicate check with error message
    pub fn require_pred<F>(mut self, predicate: F, error_msg: String) -> Self
    where
        F: Fn(&AdmissionContext<S, A>) -> bool + Send + Sync + 'static,
    {
        let check = move |ctx: &AdmissionContext<S, A>| {
            if predicate(ctx) {
                Validation::success(())
            } else {
                Validation::fail(Violation::CustomCheckFailed {
                    message: error_msg.clone(),
                })
            }
        };
        self.required_checks.push(Box::new(check));
        self
    }

    /// Set violation handling strategy
    pub fn on_violation(mut self, strategy: ViolationStrategy) -> Self {
        self.on_violation = strategy;
        self
    }

    /// Build the admission rules
    pub fn build(self) -> AdmissionRules<S, A> {
        AdmissionRules {
            require_safe_set: self.require_safe_set,
            block_at: self.block_at,
            required_checks: self.required_checks,
            on_violation: self.on_violation,
        }
    }
}

impl<S: State, A: Action> Default for AdmissionBuilder<S, A> {
    fn default() -> Self {
        Self::new()
    }
}
