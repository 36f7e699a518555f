//! Context provided to admission checks.

use crate::core::{Action, State};
use crate::margin::RiskLevel;
use crate::reach::SafeActionSet;

/// Everything known about a proposed action when it is checked
#[derive(Clone, Debug)]
pub struct AdmissionContext<S: State, A: Action> {
    pub state: S,
    pub action: A,
    pub safe_set: SafeActionSet<A>,
    /// Risk of the current state, if the caller measured it
    pub risk: Option<RiskLevel>,
}

impl<S: State, A: Action> AdmissionContext<S, A> {
    /// Whether the proposed action was admitted by the filter (pure)
    pub fn is_filtered_safe(&self) -> bool {
        self.safe_set.contains(&self.action)
    }
}
