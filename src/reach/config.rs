//! Filter configuration.

use serde::{Deserialize, Serialize};

use super::budget::SearchBudget;
use super::memo::Memoization;
use crate::core::State;

/// How sibling first-level actions are evaluated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parallelism {
    #[default]
    Sequential,
    /// Evaluate first-level candidates on the rayon pool.
    Parallel,
}

/// Settings for one filter.
pub struct FilterConfig<S: State> {
    pub horizon: usize,
    pub memoization: Memoization<S>,
    pub parallelism: Parallelism,
    pub budget: SearchBudget,
}

impl<S: State> FilterConfig<S> {
    /// Configuration with the given horizon and every other setting at its default.
    pub fn with_horizon(horizon: usize) -> Self {
        Self {
            horizon,
            ..Self::default()
        }
    }

    /// Steps explored after the first one.
    pub(crate) fn lookahead(&self) -> usize {
        self.horizon.saturating_sub(1)
    }
}

impl<S: State> Default for FilterConfig<S> {
    fn default() -> Self {
        Self {
            horizon: 0,
            memoization: Memoization::disabled(),
            parallelism: Parallelism::Sequential,
            budget: SearchBudget::unlimited(),
        }
    }
}
