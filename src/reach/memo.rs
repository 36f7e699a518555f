//! Memoization of explored subtrees.
//!
//! Entries are keyed on `(state key, remaining depth)`. Depth is part of the
//! key because a state reached with more lookahead left may still reach the
//! forbidden region where a shallower visit could not. The table lives for a
//! single top-level call and is dropped with it.

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::core::State;

/// Type-erased key value compared with its own `Eq` and `Hash`.
trait KeyValue: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn eq_key(&self, other: &dyn KeyValue) -> bool;
    fn hash_key(&self, state: &mut dyn Hasher);
}

impl<T: Eq + Hash + Send + Sync + 'static> KeyValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_key(&self, other: &dyn KeyValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn hash_key(&self, mut state: &mut dyn Hasher) {
        self.hash(&mut state);
    }
}

/// Memo key for one state.
pub(crate) struct MemoKey(Box<dyn KeyValue>);

impl MemoKey {
    pub(crate) fn new<T: Eq + Hash + Send + Sync + 'static>(value: T) -> Self {
        Self(Box::new(value))
    }
}

impl PartialEq for MemoKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_key(&*other.0)
    }
}

impl Eq for MemoKey {}

impl Hash for MemoKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash_key(state);
    }
}

impl fmt::Debug for MemoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MemoKey(..)")
    }
}

type KeyFn<S> = Box<dyn Fn(&S) -> Option<MemoKey> + Send + Sync>;

/// Equality policy used to recognise revisited states.
///
/// Without a policy the filter cannot tell two states apart safely, so it
/// recomputes every subtree. That costs time but never changes a result.
///
/// # Example
///
/// ```rust
/// use horizon_guard::core::State;
/// use horizon_guard::reach::Memoization;
/// use serde::Serialize;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize)]
/// struct Cell {
///     row: i32,
///     col: i32,
/// }
///
/// impl State for Cell {}
///
/// #[derive(Clone, PartialEq, Debug, Serialize)]
/// struct Pose {
///     x: f64,
///     y: f64,
/// }
///
/// impl State for Pose {}
///
/// // The state's own equality
/// let cells: Memoization<Cell> = Memoization::by_eq();
///
/// // Bit-exact equality of the serialized form
/// let exact: Memoization<Pose> = Memoization::exact();
///
/// // States in the same 0.1 x 0.1 cell count as equal
/// let grid = Memoization::quantized(|p: &Pose| {
///     ((p.x * 10.0).round() as i64, (p.y * 10.0).round() as i64)
/// });
///
/// assert!(cells.is_enabled());
/// assert!(exact.is_enabled());
/// assert!(grid.is_enabled());
/// ```
pub struct Memoization<S: State> {
    key_fn: Option<KeyFn<S>>,
}

impl<S: State> Memoization<S> {
    /// Never memoize.
    pub fn disabled() -> Self {
        Self { key_fn: None }
    }

    /// Treat states as equal when their `Eq` implementation says so.
    pub fn by_eq() -> Self
    where
        S: Eq + Hash,
    {
        Self {
            key_fn: Some(Box::new(|state: &S| Some(MemoKey::new(state.clone())))),
        }
    }

    /// Treat states as equal when their serialized forms are identical.
    ///
    /// Only sound when `Serialize` is injective: a state with skipped or
    /// lossily serialized fields can share an entry with a different state
    /// and inherit its result. Prefer [`by_eq`](Self::by_eq) for such states.
    pub fn exact() -> Self
    where
        S: Serialize,
    {
        Self {
            key_fn: Some(Box::new(|state: &S| {
                bincode::serialize(state).ok().map(MemoKey::new)
            })),
        }
    }

    /// Treat states as equal when `project` maps them to the same key.
    ///
    /// Use this for continuous states, e.g. to snap a pose onto a grid.
    pub fn quantized<K, F>(project: F) -> Self
    where
        K: Eq + Hash + Send + Sync + 'static,
        F: Fn(&S) -> K + Send + Sync + 'static,
    {
        Self {
            key_fn: Some(Box::new(move |state: &S| Some(MemoKey::new(project(state))))),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.key_fn.is_some()
    }

    /// Key for `state`.
    ///
    /// Returns `None` when memoization is disabled or the key cannot be
    /// encoded, in which case the caller recomputes.
    pub(crate) fn key(&self, state: &S) -> Option<MemoKey> {
        let key_fn = self.key_fn.as_ref()?;
        key_fn(state)
    }
}

impl<S: State> Default for Memoization<S> {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Result of exploring one subtree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Reach {
    /// No continuation enters the forbidden region within the depth.
    Clear,
    /// Some continuation enters the forbidden region.
    Reaches,
    /// The search budget ran out before the subtree was settled.
    Unresolved,
}

impl Reach {
    /// Combine sibling results: any reaching branch wins, then any unresolved one.
    pub(crate) fn merge(self, other: Reach) -> Reach {
        match (self, other) {
            (Reach::Reaches, _) | (_, Reach::Reaches) => Reach::Reaches,
            (Reach::Unresolved, _) | (_, Reach::Unresolved) => Reach::Unresolved,
            _ => Reach::Clear,
        }
    }
}

/// Concurrent memo table with at-most-once computation per key.
pub(crate) struct MemoTable {
    cells: DashMap<(MemoKey, usize), Arc<OnceCell<Reach>>>,
    hits: AtomicUsize,
}

impl MemoTable {
    pub(crate) fn new() -> Self {
        Self {
            cells: DashMap::new(),
            hits: AtomicUsize::new(0),
        }
    }

    /// Look up `(key, depth)`, computing it with `compute` on first use.
    ///
    /// Concurrent callers for the same key wait for the first computation.
    /// A failed computation leaves the entry empty so the error reaches
    /// every caller that tries it.
    pub(crate) fn get_or_compute<E, F>(&self, key: MemoKey, depth: usize, compute: F) -> Result<Reach, E>
    where
        F: FnOnce() -> Result<Reach, E>,
    {
        // Clone the cell out so the shard lock is released before computing.
        let cell = self
            .cells
            .entry((key, depth))
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .value()
            .clone();

        if let Some(reach) = cell.get() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(*reach);
        }
        cell.get_or_try_init(compute).copied()
    }

    pub(crate) fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }
}
