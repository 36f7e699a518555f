//! Serializable filter settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::builder::error::BuildError;
use crate::reach::{Parallelism, SearchBudget};

/// Plain-data subset of a filter configuration.
///
/// Embedding systems can keep these in their own configuration files and
/// apply them with [`SafetyFilterBuilder::settings`](crate::builder::SafetyFilterBuilder::settings).
/// Missing fields take their defaults.
///
/// # Example
///
/// ```rust
/// use horizon_guard::builder::FilterSettings;
///
/// let settings = FilterSettings::from_json(r#"{ "horizon": 4, "parallel": true }"#).unwrap();
/// assert_eq!(settings.horizon, 4);
/// assert!(settings.parallel);
/// assert_eq!(settings.max_expansions, None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterSettings {
    pub horizon: usize,
    pub parallel: bool,
    pub max_expansions: Option<usize>,
    pub deadline_ms: Option<u64>,
}

impl FilterSettings {
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        serde_json::from_str(json).map_err(|e| BuildError::InvalidSettings(e.to_string()))
    }

    pub fn parallelism(&self) -> Parallelism {
        if self.parallel {
            Parallelism::Parallel
        } else {
            Parallelism::Sequential
        }
    }

    pub fn budget(&self) -> SearchBudget {
        SearchBudget {
            max_expansions: self.max_expansions,
            deadline: self.deadline_ms.map(Duration::from_millis),
        }
    }
}
