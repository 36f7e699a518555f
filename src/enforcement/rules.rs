//! Admission rules for proposed actions using Validation.

use crate::core::{Action, State};
use crate::enforcement::context::AdmissionContext;
use crate::enforcement::violations::{Violation, ViolationStrategy};
use crate::margin::RiskLevel;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::debug;

/// Type alias for admission check functions
pub type AdmissionCheck<S, A> =
    Box<dyn Fn(&AdmissionContext<S, A>) -> Validation<(), NonEmptyVec<Violation>> + Send + Sync>;

/// Outcome of applying admission rules to one proposed action
#[derive(Debug, Clone, PartialEq)]
pub enum Admission {
    Admit,
    Reject(Vec<Violation>),
    Halt(Vec<Violation>),
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admit)
    }
}

/// Admission rules for proposed actions.
/// Uses Validation to accumulate ALL violations.
pub struct AdmissionRules<S: State, A: Action> {
    pub(crate) require_safe_set: bool,
    pub(crate) block_at: Option<RiskLevel>,
    pub(crate) required_checks: Vec<AdmissionCheck<S, A>>,
    pub(crate) on_violation: ViolationStrategy,
}

impl<S: State, A: Action> AdmissionRules<S, A> {
    /// Enforce all rules, accumulating ALL violations.
    /// Returns Validation::Success(()) if all checks pass.
    /// Returns Validation::Failure with ALL violations if any fail.
    pub fn enforce(
        &self,
        context: &AdmissionContext<S, A>,
    ) -> Validation<(), NonEmptyVec<Violation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<Violation>>> = Vec::new();

        if self.require_safe_set {
            let check = if context.is_filtered_safe() {
                Validation::success(())
            } else {
                Validation::fail(Violation::OutsideSafeSet {
                    action: context.action.name().to_string(),
                    horizon: context.safe_set.verified_horizon(),
                })
            };
            checks.push(check);
        }

        // Unknown risk fails closed
        if let Some(threshold) = self.block_at {
            let check = match context.risk {
                Some(level) if level.is_at_least(threshold) => {
                    Validation::fail(Violation::RiskAtOrAbove { level, threshold })
                }
                Some(_) => Validation::success(()),
                None => Validation::fail(Violation::RiskUnknown { threshold }),
            };
            checks.push(check);
        }

        for check_fn in &self.required_checks {
            checks.push(check_fn(context));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Enforce the rules and apply the violation strategy.
    pub fn decide(&self, context: &AdmissionContext<S, A>) -> Admission {
        match self.enforce(context) {
            Validation::Success(_) => Admission::Admit,
            Validation::Failure(errors) => {
                let violations: Vec<Violation> = errors.iter().cloned().collect();
                debug!(
                    action = context.action.name(),
                    violations = violations.len(),
                    strategy = ?self.on_violation,
                    "action refused"
                );
                match self.on_violation {
                    ViolationStrategy::Reject => Admission::Reject(violations),
                    ViolationStrategy::Halt => Admission::Halt(violations),
                }
            }
        }
    }

    pub fn violation_strategy(&self) -> ViolationStrategy {
        self.on_violation
    }
}
