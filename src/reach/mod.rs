//! Bounded-horizon reachability filtering.
//!
//! Given a state, a finite action space, a transition function and a
//! forbidden-region predicate, the filter computes which actions are
//! admissible. Two search modes are provided and they are not
//! interchangeable:
//!
//! - **Exhaustive** ([`SafetyFilter::safe_actions`]): an action is excluded if
//!   *any* continuation over the full action space enters the forbidden
//!   region within the horizon. Cost grows as `O(|A|^horizon)` without
//!   memoization.
//! - **Policy** ([`SafetyFilter::safe_actions_under_policy`]): after the first
//!   action the agent follows a fixed policy, so each candidate is checked
//!   against a single rollout. Cost is `O(|A| * horizon)`.
//!
//! # Horizon
//!
//! The first step is always checked. A horizon of `h` then explores `h - 1`
//! further steps, so horizons 0 and 1 both give the plain one-step filter.
//! Safety beyond the horizon is not verified; [`SafeActionSet`] carries the
//! horizon it was proven for.
//!
//! # Example
//!
//! ```rust
//! use horizon_guard::core::{Action, ForbiddenRegion, State, TransitionFn};
//! use horizon_guard::reach::{FilterConfig, Memoization, SafetyFilter};
//!
//! #[derive(Clone, PartialEq, Eq, Hash, Debug)]
//! struct Pos {
//!     x: i64,
//! }
//! impl State for Pos {}
//!
//! #[derive(Clone, PartialEq, Debug)]
//! enum Move { Left, Right, Stop }
//! impl Action for Move {
//!     fn name(&self) -> &str {
//!         match self {
//!             Self::Left => "left",
//!             Self::Right => "right",
//!             Self::Stop => "stop",
//!         }
//!     }
//! }
//!
//! let mut config = FilterConfig::with_horizon(2);
//! config.memoization = Memoization::by_eq();
//!
//! let filter = SafetyFilter::new(
//!     TransitionFn::new(|s: &Pos, a: &Move| match a {
//!         Move::Left => Pos { x: s.x - 1 },
//!         Move::Right => Pos { x: s.x + 1 },
//!         Move::Stop => s.clone(),
//!     }),
//!     ForbiddenRegion::new(|s: &Pos| s.x >= 10),
//!     config,
//! );
//!
//! let safe = filter
//!     .safe_actions(&Pos { x: 9 }, &[Move::Left, Move::Right, Move::Stop])
//!     .unwrap();
//! assert_eq!(safe.into_vec(), vec![Move::Left]);
//! ```

mod budget;
mod config;
mod error;
mod filter;
mod memo;
mod outcome;
pub(crate) mod search;

pub use budget::SearchBudget;
pub use config::{FilterConfig, Parallelism};
pub use error::FilterError;
pub use filter::SafetyFilter;
pub use memo::Memoization;
pub use outcome::{
    ActionVerdict, Exclusion, Explanation, FilterReport, SafeActionSet, SearchMode, Verdict,
};
