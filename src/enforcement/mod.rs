//! Admission policy for proposed actions.
//!
//! The filter and the risk classifier only describe the situation. This
//! module turns that description into a decision the embedding system can
//! act on, using Stillwater's `Validation` type to report every violation
//! at once instead of stopping at the first.
//!
//! Rules fail closed: an action outside the safe set is refused, and a
//! missing risk measurement counts as a violation when a risk threshold is
//! configured.
//!
//! # Example
//!
//! ```rust
//! use horizon_guard::action_enum;
//! use horizon_guard::core::State;
//! use horizon_guard::enforcement::{AdmissionBuilder, AdmissionRules, ViolationStrategy};
//! use horizon_guard::margin::RiskLevel;
//!
//! #[derive(Clone, PartialEq, Debug)]
//! struct Dose(f64);
//! impl State for Dose {}
//!
//! action_enum! {
//!     enum Infusion { Increase, Hold }
//! }
//!
//! let rules: AdmissionRules<Dose, Infusion> = AdmissionBuilder::new()
//!     .block_at(RiskLevel::Danger)
//!     .on_violation(ViolationStrategy::Halt)
//!     .build();
//! ```

pub mod builder;
pub mod context;
pub mod rules;
pub mod violations;

pub use builder::AdmissionBuilder;
pub use context::AdmissionContext;
pub use rules::{Admission, AdmissionCheck, AdmissionRules};
pub use violations::{Violation, ViolationStrategy};
