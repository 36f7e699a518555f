//! Core value types and caller-supplied callables.
//!
//! This module contains the pure building blocks the filter works with:
//! - State and action traits
//! - The forbidden-region predicate
//! - Transition, policy and distance callables
//! - Immutable trajectories
//!
//! Nothing in this module holds state between calls.

mod dynamics;
mod region;
mod state;
mod trajectory;

pub use dynamics::{DistanceFn, Policy, TransitionFn};
pub use region::ForbiddenRegion;
pub use state::{Action, State};
pub use trajectory::{Step, Trajectory};
