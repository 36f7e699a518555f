//! Builder for constructing safety filters.

use std::time::Duration;

use crate::builder::error::BuildError;
use crate::builder::settings::FilterSettings;
use crate::core::{Action, ForbiddenRegion, State, TransitionFn};
use crate::reach::{FilterConfig, Memoization, Parallelism, SafetyFilter, SearchBudget};

/// Builder for constructing safety filters with a fluent API.
///
/// # Example
///
/// ```rust
/// use horizon_guard::builder::SafetyFilterBuilder;
/// use horizon_guard::core::{Action, ForbiddenRegion, State, TransitionFn};
/// use horizon_guard::reach::Memoization;
/// use serde::Serialize;
///
/// #[derive(Clone, PartialEq, Debug, Serialize)]
/// struct Altitude(i32);
/// impl State for Altitude {}
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum Throttle { Climb, Hold, Descend }
/// impl Action for Throttle {
///     fn name(&self) -> &str {
///         match self {
///             Self::Climb => "climb",
///             Self::Hold => "hold",
///             Self::Descend => "descend",
///         }
///     }
/// }
///
/// let filter = SafetyFilterBuilder::new()
///     .transition(TransitionFn::new(|s: &Altitude, t: &Throttle| match t {
///         Throttle::Climb => Altitude(s.0 + 100),
///         Throttle::Hold => s.clone(),
///         Throttle::Descend => Altitude(s.0 - 100),
///     }))
///     .forbidden(ForbiddenRegion::new(|s: &Altitude| s.0 < 200))
///     .horizon(3)
///     .memoization(Memoization::exact())
///     .build()
///     .unwrap();
///
/// let safe = filter
///     .safe_actions(&Altitude(400), &[Throttle::Climb, Throttle::Hold, Throttle::Descend])
///     .unwrap();
/// // Descending twice from 300 would drop below the floor
/// assert_eq!(safe.into_vec(), vec![Throttle::Climb, Throttle::Hold]);
/// ```
pub struct SafetyFilterBuilder<S: State, A: Action, E> {
    transition: Option<TransitionFn<S, A, E>>,
    forbidden: Option<ForbiddenRegion<S, E>>,
    config: FilterConfig<S>,
}

impl<S: State, A: Action, E> SafetyFilterBuilder<S, A, E> {
    pub fn new() -> Self {
        Self {
            transition: None,
            forbidden: None,
            config: FilterConfig::default(),
        }
    }

    /// Set the transition function (required).
    pub fn transition(mut self, transition: TransitionFn<S, A, E>) -> Self {
        self.transition = Some(transition);
        self
    }

    /// Set the forbidden region (required).
    pub fn forbidden(mut self, region: ForbiddenRegion<S, E>) -> Self {
        self.forbidden = Some(region);
        self
    }

    /// Set the number of steps to verify.
    pub fn horizon(mut self, horizon: usize) -> Self {
        self.config.horizon = horizon;
        self
    }

    pub fn memoization(mut self, memoization: Memoization<S>) -> Self {
        self.config.memoization = memoization;
        self
    }

    pub fn parallelism(mut self, parallelism: Parallelism) -> Self {
        self.config.parallelism = parallelism;
        self
    }

    /// Cap node expansions per call
    pub fn max_expansions(mut self, n: usize) -> Self {
        self.config.budget.max_expansions = Some(n);
        self
    }

    /// Cap wall-clock time per call
    pub fn deadline(mut self, duration: Duration) -> Self {
        self.config.budget.deadline = Some(duration);
        self
    }

    pub fn budget(mut self, budget: SearchBudget) -> Self {
        self.config.budget = budget;
        self
    }

    /// Apply loaded settings, replacing horizon, parallelism and budget.
    pub fn settings(mut self, settings: &FilterSettings) -> Self {
        self.config.horizon = settings.horizon;
        self.config.parallelism = settings.parallelism();
        self.config.budget = settings.budget();
        self
    }

    /// Build the filter.
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<SafetyFilter<S, A, E>, BuildError> {
        let transition = self.transition.ok_or(BuildError::MissingTransition)?;
        let forbidden = self.forbidden.ok_or(BuildError::MissingForbiddenRegion)?;

        Ok(SafetyFilter {
            transition,
            forbidden,
            config: self.config,
        })
    }
}

impl<S: State, A: Action, E> Default for SafetyFilterBuilder<S, A, E> {
    fn default() -> Self {
        Self::new()
    }
}
