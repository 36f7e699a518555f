//! Results of a filter run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{Action, Trajectory};

/// Actions judged admissible at a state.
///
/// Safety is only established up to [`verified_horizon`](Self::verified_horizon)
/// steps. Nothing is known about what happens after that.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SafeActionSet<A> {
    actions: Vec<A>,
    horizon: usize,
}

impl<A: Action> SafeActionSet<A> {
    pub(crate) fn new(actions: Vec<A>, horizon: usize) -> Self {
        Self { actions, horizon }
    }

    /// Number of steps over which the retained actions were checked.
    pub fn verified_horizon(&self) -> usize {
        self.horizon
    }

    pub fn contains(&self, action: &A) -> bool {
        self.actions.contains(action)
    }

    /// True if every action in `self` also appears in `other`.
    pub fn is_subset_of(&self, other: &SafeActionSet<A>) -> bool {
        self.actions.iter().all(|a| other.contains(a))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, A> {
        self.actions.iter()
    }

    pub fn as_slice(&self) -> &[A] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn into_vec(self) -> Vec<A> {
        self.actions
    }
}

impl<'a, A> IntoIterator for &'a SafeActionSet<A> {
    type Item = &'a A;
    type IntoIter = std::slice::Iter<'a, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

/// Why an action was left out of the safe set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exclusion {
    /// The action's own successor is forbidden.
    ImmediatelyForbidden,
    /// Some continuation enters the forbidden region within the horizon.
    ReachesForbidden,
    /// The search budget ran out before the action could be cleared.
    Unresolved,
}

/// Verdict for one candidate action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Admitted,
    Excluded(Exclusion),
}

impl Verdict {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionVerdict<A> {
    pub action: A,
    pub verdict: Verdict,
}

/// Answer to "how can this action lead into the forbidden region?".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Explanation<S, A> {
    /// A path that starts with the action and ends in the forbidden region.
    Witness(Trajectory<S, A>),
    /// No such path exists within the horizon.
    Clear,
    /// The search budget ran out before a path was found.
    Unresolved,
}

impl<S, A> Explanation<S, A> {
    pub fn witness(&self) -> Option<&Trajectory<S, A>> {
        match self {
            Self::Witness(path) => Some(path),
            _ => None,
        }
    }

    pub fn into_witness(self) -> Option<Trajectory<S, A>> {
        match self {
            Self::Witness(path) => Some(path),
            _ => None,
        }
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, Self::Clear)
    }
}

/// How continuations after the first step are generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMode {
    /// Branch over the full action space at every depth.
    Exhaustive,
    /// Follow a fixed policy after the first step.
    Policy,
}

/// Full account of a filter run.
///
/// # Example
///
/// ```rust
/// use horizon_guard::core::{Action, ForbiddenRegion, State, TransitionFn};
/// use horizon_guard::reach::{Exclusion, Verdict};
/// use horizon_guard::SafetyFilterBuilder;
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Depth(u32);
/// impl State for Depth {}
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum Dive { Down, Up }
/// impl Action for Dive {
///     fn name(&self) -> &str {
///         match self {
///             Self::Down => "down",
///             Self::Up => "up",
///         }
///     }
/// }
///
/// let filter = SafetyFilterBuilder::new()
///     .transition(TransitionFn::new(|d: &Depth, a: &Dive| match a {
///         Dive::Down => Depth(d.0 + 10),
///         Dive::Up => Depth(d.0.saturating_sub(10)),
///     }))
///     .forbidden(ForbiddenRegion::new(|d: &Depth| d.0 > 40))
///     .horizon(1)
///     .build()
///     .unwrap();
///
/// let report = filter.evaluate(&Depth(40), &[Dive::Down, Dive::Up]).unwrap();
/// assert_eq!(
///     report.verdict_for(&Dive::Down),
///     Some(Verdict::Excluded(Exclusion::ImmediatelyForbidden))
/// );
/// assert_eq!(report.safe_set().into_vec(), vec![Dive::Up]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FilterReport<A> {
    pub mode: SearchMode,
    pub horizon: usize,
    /// One verdict per candidate, in action-space order.
    pub verdicts: Vec<ActionVerdict<A>>,
    /// Nodes expanded below the first step.
    pub expansions: usize,
    pub memo_hits: usize,
    pub budget_exhausted: bool,
    pub evaluated_at: DateTime<Utc>,
}

impl<A: Action> FilterReport<A> {
    /// Admitted actions, in action-space order.
    pub fn safe_set(&self) -> SafeActionSet<A> {
        let admitted = self
            .verdicts
            .iter()
            .filter(|v| v.verdict.is_admitted())
            .map(|v| v.action.clone())
            .collect();
        SafeActionSet::new(admitted, self.horizon)
    }

    pub fn verdict_for(&self, action: &A) -> Option<Verdict> {
        self.verdicts
            .iter()
            .find(|v| &v.action == action)
            .map(|v| v.verdict)
    }

    /// Excluded actions together with the reason.
    pub fn excluded(&self) -> Vec<(&A, Exclusion)> {
        self.verdicts
            .iter()
            .filter_map(|v| match v.verdict {
                Verdict::Excluded(reason) => Some((&v.action, reason)),
                Verdict::Admitted => None,
            })
            .collect()
    }
}
