//! State and action traits for filtered systems.
//!
//! The filter never looks inside a state or an action. Both are opaque values
//! supplied by the host system; these traits only ask for what the search
//! needs to copy them between worker threads and to describe them in logs
//! and errors.

use std::fmt::Debug;

/// Trait for states of the system being filtered.
///
/// A state may be a robot pose, an embedding vector, a physiological reading
/// or anything else the host models. Equality for memoization is not taken
/// from this trait: it is chosen per filter through
/// [`Memoization`](crate::reach::Memoization), since continuous states often
/// need a quantized notion of "the same state".
///
/// # Example
///
/// ```rust
/// use horizon_guard::core::State;
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Position {
///     x: i64,
/// }
///
/// impl State for Position {}
///
/// assert_eq!(Position { x: 3 }.describe(), "Position { x: 3 }");
/// ```
pub trait State: Clone + Debug + Send + Sync + 'static {
    /// Human readable description used in log events and errors.
    ///
    /// Default implementation uses the `Debug` representation.
    fn describe(&self) -> String {
        format!("{self:?}")
    }
}

/// Trait for candidate actions.
///
/// Actions must be comparable so that safe sets can be checked for
/// membership and inclusion.
///
/// # Example
///
/// ```rust
/// use horizon_guard::core::Action;
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum Move {
///     Left,
///     Right,
/// }
///
/// impl Action for Move {
///     fn name(&self) -> &str {
///         match self {
///             Self::Left => "left",
///             Self::Right => "right",
///         }
///     }
/// }
///
/// assert_eq!(Move::Left.name(), "left");
/// ```
pub trait Action: Clone + PartialEq + Debug + Send + Sync + 'static {
    /// Get the action's name for display/logging.
    fn name(&self) -> &str;
}
