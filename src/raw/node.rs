use alloc::string::String;
use core::ops::Not;

use super::handle::Handle;
use super::size::Size;

/// Child-slot orientation. `!dir` is the mirror side, which lets the
/// left/right symmetric rebalancing cases share one code path.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Dir {
    Left = 0,
    Right = 1,
}

impl Not for Dir {
    type Output = Dir;

    fn not(self) -> Dir {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// A present tree node.
///
/// Absent children are `None` links rather than sentinel nodes; the tree
/// reads them through helpers that yield rank −1 and size 0, so the rank
/// arithmetic never branches on presence.
///
/// Rank invariant: every present child hangs exactly 1 or 2 ranks below its
/// parent, and leaves have rank 0.
pub(crate) struct Node {
    key: i64,
    value: String,
    rank: i8,
    /// Nodes in the subtree rooted here, this node included.
    size: Size,
    /// Non-owning back-link, used only for upward walks.
    parent: Option<Handle>,
    children: [Option<Handle>; 2],
}

impl Node {
    /// A detached leaf: rank 0, size 1, no links.
    pub(crate) fn new(key: i64, value: String) -> Self {
        Self {
            key,
            value,
            rank: 0,
            size: Size::from_usize(1),
            parent: None,
            children: [None; 2],
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> i64 {
        self.key
    }

    #[inline]
    pub(crate) fn value(&self) -> &str {
        &self.value
    }

    #[inline]
    pub(crate) fn rank(&self) -> i8 {
        self.rank
    }

    #[inline]
    pub(crate) fn set_rank(&mut self, rank: i8) {
        self.rank = rank;
    }

    #[inline]
    pub(crate) fn size(&self) -> Size {
        self.size
    }

    #[inline]
    pub(crate) fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    #[inline]
    pub(crate) fn parent(&self) -> Option<Handle> {
        self.parent
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) fn child(&self, dir: Dir) -> Option<Handle> {
        self.children[dir as usize]
    }

    #[inline]
    pub(crate) fn set_child(&mut self, dir: Dir, child: Option<Handle>) {
        self.children[dir as usize] = child;
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<Handle> {
        self.child(Dir::Left)
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<Handle> {
        self.child(Dir::Right)
    }

    /// True iff both children are absent.
    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.children == [None, None]
    }
}
