//! Ordered map with rank-balanced guarantees and order statistics.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::error::Error;
use crate::raw::{Handle, RawWavlMap};

/// An ordered map from `i64` keys to `String` values, balanced as a WAVL
/// tree.
///
/// Search, insert, and remove run in logarithmic time; the cached extremes
/// make [`min`](Self::min) and [`max`](Self::max) constant-time, and
/// per-node subtree sizes make [`select`](Self::select) logarithmic.
/// Mutating operations return the number of rebalancing operations they
/// performed, which callers can use to observe the amortized-constant
/// rebalancing behavior of the tree.
///
/// # Examples
///
/// ```
/// use wavl_tree::WavlMap;
///
/// let mut map = WavlMap::new();
/// map.insert(2, "two".to_string()).unwrap();
/// map.insert(1, "one".to_string()).unwrap();
/// map.insert(3, "three".to_string()).unwrap();
///
/// assert_eq!(map.get(2), Some("two"));
/// assert_eq!(map.select(3), Ok("three"));
/// assert_eq!(map.keys(), vec![1, 2, 3]);
/// ```
pub struct WavlMap {
    raw: RawWavlMap,
}

impl WavlMap {
    /// Creates an empty map. Does not allocate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            raw: RawWavlMap::new(),
        }
    }

    /// Number of entries in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the value stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: i64) -> Option<&str> {
        self.raw.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: i64) -> bool {
        self.get(key).is_some()
    }

    /// Inserts `key` with `value`, returning the number of rebalancing
    /// operations performed.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateKey`] if the key is already present; the map is
    /// left unchanged.
    pub fn insert(&mut self, key: i64, value: String) -> Result<usize, Error> {
        self.raw.insert(key, value)
    }

    /// Removes the entry under `key`, returning the number of rebalancing
    /// operations performed.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if the key is absent; the map is left
    /// unchanged.
    pub fn remove(&mut self, key: i64) -> Result<usize, Error> {
        self.raw.remove(key)
    }

    /// Value under the smallest key, in constant time.
    #[must_use]
    pub fn min(&self) -> Option<&str> {
        self.raw.min_handle().map(|handle| self.raw.node(handle).value())
    }

    /// Value under the largest key, in constant time.
    #[must_use]
    pub fn max(&self) -> Option<&str> {
        self.raw.max_handle().map(|handle| self.raw.node(handle).value())
    }

    #[must_use]
    pub fn min_key(&self) -> Option<i64> {
        self.raw.min_handle().map(|handle| self.raw.node(handle).key())
    }

    #[must_use]
    pub fn max_key(&self) -> Option<i64> {
        self.raw.max_handle().map(|handle| self.raw.node(handle).key())
    }

    /// Value under the `rank`-th smallest key, 1-based.
    ///
    /// # Errors
    ///
    /// [`Error::RankOutOfRange`] unless `1 <= rank <= len`.
    pub fn select(&self, rank: usize) -> Result<&str, Error> {
        self.raw.select(rank)
    }

    /// All keys in ascending order.
    #[must_use]
    pub fn keys(&self) -> Vec<i64> {
        self.raw.keys()
    }

    /// All values in ascending key order.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        self.raw.values()
    }

    /// All entries in ascending key order.
    #[must_use]
    pub fn entries(&self) -> Vec<(i64, &str)> {
        self.raw.entries()
    }

    /// The root of the tree, for structural inspection.
    #[must_use]
    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.raw.root().map(|handle| NodeRef {
            raw: &self.raw,
            handle,
        })
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Panics if any structural invariant is broken.
    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        self.raw.assert_invariants();
    }
}

impl Default for WavlMap {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WavlMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.raw.entries()).finish()
    }
}

impl FromIterator<(i64, String)> for WavlMap {
    fn from_iter<I: IntoIterator<Item = (i64, String)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl Extend<(i64, String)> for WavlMap {
    /// The first occurrence of a key wins; later duplicates are dropped.
    fn extend<I: IntoIterator<Item = (i64, String)>>(&mut self, iter: I) {
        for (key, value) in iter {
            let _ = self.raw.insert(key, value);
        }
    }
}

/// A read-only view of one tree node, exposing its rank and subtree size
/// alongside the entry it holds.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    raw: &'a RawWavlMap,
    handle: Handle,
}

impl<'a> NodeRef<'a> {
    #[must_use]
    pub fn key(&self) -> i64 {
        self.raw.node(self.handle).key()
    }

    #[must_use]
    pub fn value(&self) -> &'a str {
        self.raw.node(self.handle).value()
    }

    /// WAVL rank of this node.
    #[must_use]
    pub fn rank(&self) -> i8 {
        self.raw.node(self.handle).rank()
    }

    /// Number of entries in the subtree rooted here, this node included.
    #[must_use]
    pub fn subtree_size(&self) -> usize {
        self.raw.node(self.handle).size().to_usize()
    }

    #[must_use]
    pub fn left(&self) -> Option<NodeRef<'a>> {
        self.raw.node(self.handle).left().map(|handle| NodeRef {
            raw: self.raw,
            handle,
        })
    }

    #[must_use]
    pub fn right(&self) -> Option<NodeRef<'a>> {
        self.raw.node(self.handle).right().map(|handle| NodeRef {
            raw: self.raw,
            handle,
        })
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.raw.node(self.handle).parent().map(|handle| NodeRef {
            raw: self.raw,
            handle,
        })
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", &self.key())
            .field("value", &self.value())
            .field("rank", &self.rank())
            .field("subtree_size", &self.subtree_size())
            .finish()
    }
}
