//! Search budgets bounding work independently of the horizon.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Limits on a single top-level call.
///
/// The horizon already guarantees termination; a budget additionally bounds
/// wall-clock time when the action space is large. Subtrees left unexplored
/// because the budget ran out are treated as unsafe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchBudget {
    /// Maximum number of node expansions below the first step.
    pub max_expansions: Option<usize>,
    /// Maximum wall-clock time, measured from the start of the call.
    pub deadline: Option<Duration>,
}

impl SearchBudget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn is_unlimited(&self) -> bool {
        self.max_expansions.is_none() && self.deadline.is_none()
    }
}

/// Per-call tracker enforcing a [`SearchBudget`].
pub(crate) struct BudgetTracker {
    max_expansions: Option<usize>,
    deadline: Option<Instant>,
    expansions: AtomicUsize,
    exhausted: AtomicBool,
}

impl BudgetTracker {
    pub(crate) fn start(budget: &SearchBudget) -> Self {
        let now = Instant::now();
        Self {
            max_expansions: budget.max_expansions,
            deadline: budget.deadline.and_then(|d| now.checked_add(d)),
            expansions: AtomicUsize::new(0),
            exhausted: AtomicBool::new(false),
        }
    }

    /// Claim one expansion. Returns `false` once the budget is spent.
    pub(crate) fn try_expand(&self) -> bool {
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                self.exhausted.store(true, Ordering::Relaxed);
                return false;
            }
        }

        let limit = self.max_expansions;
        let claimed = self
            .expansions
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| match limit {
                Some(max) if n >= max => None,
                _ => Some(n + 1),
            });

        if claimed.is_err() {
            self.exhausted.store(true, Ordering::Relaxed);
        }
        claimed.is_ok()
    }

    pub(crate) fn expansions(&self) -> usize {
        self.expansions.load(Ordering::Acquire)
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.exhausted.load(Ordering::Relaxed)
    }
}
