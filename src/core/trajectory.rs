//! Trajectories through the state space.
//!
//! A trajectory is an immutable record of the steps taken from a starting
//! state. The filter produces them as witnesses (why an action was excluded)
//! and as policy rollouts (what the agent would do after a first action).

use super::state::{Action, State};
use serde::{Deserialize, Serialize};

/// Record of a single step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step<S, A> {
    /// The state the step was taken from
    pub from: S,
    /// The action applied
    pub action: A,
    /// The resulting state
    pub to: S,
}

/// Ordered sequence of steps.
///
/// Trajectories are immutable - the `record` method returns a new trajectory
/// with the step appended.
///
/// # Example
///
/// ```rust
/// use horizon_guard::core::{Action, State, Step, Trajectory};
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Position(i64);
///
/// impl State for Position {}
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Right;
///
/// impl Action for Right {
///     fn name(&self) -> &str {
///         "right"
///     }
/// }
///
/// let trajectory = Trajectory::new()
///     .record(Step { from: Position(0), action: Right, to: Position(1) })
///     .record(Step { from: Position(1), action: Right, to: Position(2) });
///
/// let path = trajectory.get_path();
/// assert_eq!(path, vec![&Position(0), &Position(1), &Position(2)]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trajectory<S, A> {
    steps: Vec<Step<S, A>>,
}

impl<S: State, A: Action> Default for Trajectory<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, A: Action> Trajectory<S, A> {
    /// Create a new empty trajectory.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Record a step, returning a new trajectory.
    ///
    /// The existing trajectory is left untouched.
    pub fn record(&self, step: Step<S, A>) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }

    /// Get the sequence of states visited.
    ///
    /// Returns the starting state followed by the `to` state of each step.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.steps.len() + 1);
        if let Some(first) = self.steps.first() {
            path.push(&first.from);
        }
        for step in &self.steps {
            path.push(&step.to);
        }
        path
    }

    /// Actions taken, in order.
    pub fn actions(&self) -> Vec<&A> {
        self.steps.iter().map(|step| &step.action).collect()
    }

    /// State reached by the last step, if any.
    pub fn final_state(&self) -> Option<&S> {
        self.steps.last().map(|step| &step.to)
    }

    pub fn steps(&self) -> &[Step<S, A>] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
