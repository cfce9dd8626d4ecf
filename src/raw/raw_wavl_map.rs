use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::error::Error;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Dir, Node};
use super::size::Size;

/// Arena-backed WAVL tree keyed by `i64`.
///
/// Ranks follow the weak-AVL rule: every present child hangs 1 or 2 ranks
/// below its parent, leaves sit at rank 0, and absent children read as
/// rank −1. Insert and remove return the number of rebalancing operations
/// they performed (promotions, demotions, and rotation work).
///
/// Min and max handles are cached so boundary lookups and in-order walks
/// skip the initial descent. Every node carries its subtree size, which
/// funds `select` in logarithmic time.
pub(crate) struct RawWavlMap {
    nodes: Arena<Node>,
    root: Option<Handle>,
    min: Option<Handle>,
    max: Option<Handle>,
}

impl RawWavlMap {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            min: None,
            max: None,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.size_of(self.root)
    }

    #[inline]
    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    #[inline]
    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    #[inline]
    pub(crate) fn min_handle(&self) -> Option<Handle> {
        self.min
    }

    #[inline]
    pub(crate) fn max_handle(&self) -> Option<Handle> {
        self.max
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut Node {
        self.nodes.get_mut(handle)
    }

    /// Rank of a link, reading absence as rank −1.
    #[inline]
    fn rank_of(&self, link: Option<Handle>) -> i8 {
        link.map_or(-1, |handle| self.node(handle).rank())
    }

    /// Subtree size of a link, reading absence as 0.
    #[inline]
    fn size_of(&self, link: Option<Handle>) -> usize {
        link.map_or(0, |handle| self.node(handle).size().to_usize())
    }

    fn which_child(&self, parent: Handle, child: Handle) -> Dir {
        if self.node(parent).left() == Some(child) {
            Dir::Left
        } else {
            debug_assert_eq!(self.node(parent).right(), Some(child));
            Dir::Right
        }
    }

    fn sibling(&self, parent: Handle, child: Handle) -> Option<Handle> {
        self.node(parent).child(!self.which_child(parent, child))
    }

    /// Recomputes the node's rank from its children, returning whether it
    /// changed. A node sitting exactly 3 ranks above both children steps
    /// down one rank; otherwise the rank snaps to one above the taller
    /// child.
    fn update_rank(&mut self, handle: Handle) -> bool {
        let node = self.node(handle);
        let rank = node.rank();
        let left = self.rank_of(node.left());
        let right = self.rank_of(node.right());
        let new_rank = if rank - left == 3 && rank - right == 3 {
            rank - 1
        } else {
            left.max(right) + 1
        };
        if new_rank == rank {
            false
        } else {
            self.node_mut(handle).set_rank(new_rank);
            true
        }
    }

    fn update_size(&mut self, handle: Handle) {
        let node = self.node(handle);
        let (left, right) = (node.left(), node.right());
        let size = 1 + self.size_of(left) + self.size_of(right);
        self.node_mut(handle).set_size(Size::from_usize(size));
    }

    fn update_sizes_to_root(&mut self, from: Option<Handle>) {
        let mut cursor = from;
        while let Some(handle) = cursor {
            self.update_size(handle);
            cursor = self.node(handle).parent();
        }
    }

    fn min_in_subtree(&self, mut cursor: Handle) -> Handle {
        while let Some(left) = self.node(cursor).left() {
            cursor = left;
        }
        cursor
    }

    fn max_in_subtree(&self, mut cursor: Handle) -> Handle {
        while let Some(right) = self.node(cursor).right() {
            cursor = right;
        }
        cursor
    }

    /// The next node in key order, if any.
    pub(crate) fn successor(&self, handle: Handle) -> Option<Handle> {
        if let Some(right) = self.node(handle).right() {
            return Some(self.min_in_subtree(right));
        }
        let mut cursor = handle;
        loop {
            let parent = self.node(cursor).parent()?;
            if self.node(parent).left() == Some(cursor) {
                return Some(parent);
            }
            cursor = parent;
        }
    }

    fn predecessor(&self, handle: Handle) -> Option<Handle> {
        if let Some(left) = self.node(handle).left() {
            return Some(self.max_in_subtree(left));
        }
        let mut cursor = handle;
        loop {
            let parent = self.node(cursor).parent()?;
            if self.node(parent).right() == Some(cursor) {
                return Some(parent);
            }
            cursor = parent;
        }
    }

    pub(crate) fn find(&self, key: i64) -> Option<Handle> {
        let mut cursor = self.root;
        while let Some(handle) = cursor {
            let node = self.node(handle);
            match key.cmp(&node.key()) {
                Ordering::Less => cursor = node.left(),
                Ordering::Greater => cursor = node.right(),
                Ordering::Equal => return Some(handle),
            }
        }
        None
    }

    pub(crate) fn get(&self, key: i64) -> Option<&str> {
        // The cached extremes answer boundary and out-of-range probes
        // without a descent.
        if let Some(min) = self.min {
            match key.cmp(&self.node(min).key()) {
                Ordering::Less => return None,
                Ordering::Equal => return Some(self.node(min).value()),
                Ordering::Greater => {}
            }
        }
        if let Some(max) = self.max {
            match key.cmp(&self.node(max).key()) {
                Ordering::Greater => return None,
                Ordering::Equal => return Some(self.node(max).value()),
                Ordering::Less => {}
            }
        }
        self.find(key).map(|handle| self.node(handle).value())
    }

    /// Rotates `up` above its parent, keeping subtree sizes current.
    fn rotate_up(&mut self, up: Handle) {
        let down = self
            .node(up)
            .parent()
            .expect("`RawWavlMap::rotate_up()` - `up` has no parent!");
        let dir = self.which_child(down, up);
        let across = self.node(up).child(!dir);
        let grand = self.node(down).parent();

        self.node_mut(down).set_child(dir, across);
        if let Some(across) = across {
            self.node_mut(across).set_parent(Some(down));
        }
        self.node_mut(up).set_child(!dir, Some(down));
        self.node_mut(down).set_parent(Some(up));
        self.node_mut(up).set_parent(grand);
        match grand {
            Some(grand) => {
                let slot = self.which_child(grand, down);
                self.node_mut(grand).set_child(slot, Some(up));
            }
            None => self.root = Some(up),
        }

        self.update_size(down);
        self.update_size(up);
    }

    /// Inserts a new entry, returning the rebalancing operation count.
    pub(crate) fn insert(&mut self, key: i64, value: String) -> Result<usize, Error> {
        if self.find(key).is_some() {
            return Err(Error::DuplicateKey(key));
        }
        let handle = self.nodes.alloc(Node::new(key, value));
        let Some(root) = self.root else {
            self.root = Some(handle);
            self.min = Some(handle);
            self.max = Some(handle);
            return Ok(0);
        };

        let (parent, dir) = {
            let mut cursor = root;
            loop {
                let node = self.node(cursor);
                let dir = if key < node.key() { Dir::Left } else { Dir::Right };
                match node.child(dir) {
                    Some(child) => cursor = child,
                    None => break (cursor, dir),
                }
            }
        };
        self.node_mut(parent).set_child(dir, Some(handle));
        self.node_mut(handle).set_parent(Some(parent));

        let mut ops = usize::from(self.update_rank(parent));
        self.update_sizes_to_root(Some(parent));
        ops += self.rebalance_inserted(parent);

        if let Some(min) = self.min {
            if key < self.node(min).key() {
                self.min = Some(handle);
            }
        }
        if let Some(max) = self.max {
            if key > self.node(max).key() {
                self.max = Some(handle);
            }
        }
        Ok(ops)
    }

    /// Restores the rank rule on the path above a fresh leaf's parent.
    fn rebalance_inserted(&mut self, start: Handle) -> usize {
        let mut ops = 0;
        let mut cursor = start;
        while let Some(parent) = self.node(cursor).parent() {
            let parent_rank = self.node(parent).rank();
            let gap = parent_rank - self.node(cursor).rank();
            let sibling_gap = parent_rank - self.rank_of(self.sibling(parent, cursor));
            if gap == 0 && sibling_gap == 1 {
                // Promote and keep climbing.
                self.node_mut(parent).set_rank(parent_rank + 1);
                ops += 1;
                cursor = parent;
                continue;
            }
            if gap == 0 && sibling_gap == 2 {
                ops += self.rotate_inserted(parent, cursor);
            }
            break;
        }
        ops
    }

    /// Terminal rotation for a 0-child whose sibling hangs 2 below.
    fn rotate_inserted(&mut self, parent: Handle, cursor: Handle) -> usize {
        let dir = self.which_child(parent, cursor);
        let cursor_rank = self.node(cursor).rank();
        let outer_gap = cursor_rank - self.rank_of(self.node(cursor).child(dir));
        if outer_gap == 1 {
            self.rotate_up(cursor);
            self.update_rank(parent);
            2
        } else {
            let pivot = self
                .node(cursor)
                .child(!dir)
                .expect("`RawWavlMap::rotate_inserted()` - 0-child has no inner child!");
            self.rotate_up(pivot);
            self.rotate_up(pivot);
            self.update_rank(parent);
            self.update_rank(cursor);
            self.update_rank(pivot);
            5
        }
    }

    /// Removes an entry, returning the rebalancing operation count.
    pub(crate) fn remove(&mut self, key: i64) -> Result<usize, Error> {
        let Some(target) = self.find(key) else {
            return Err(Error::KeyNotFound(key));
        };
        // Recompute the cached extremes while the node is still linked.
        let new_min = if self.min == Some(target) {
            self.successor(target)
        } else {
            self.min
        };
        let new_max = if self.max == Some(target) {
            self.predecessor(target)
        } else {
            self.max
        };

        let (slot_child, slot_parent, slot_dir) = self.unlink(target);
        self.nodes.take(target);
        self.min = new_min;
        self.max = new_max;
        self.update_sizes_to_root(slot_parent);

        let ops = match slot_parent {
            Some(parent) => self.rebalance_removed(slot_child, parent, slot_dir),
            None => match slot_child {
                // A unary root was deleted; its child restates its rank.
                Some(root) => {
                    self.update_rank(root);
                    1
                }
                None => 0,
            },
        };
        Ok(ops)
    }

    /// Detaches `target` from the tree, leaving its arena slot to the
    /// caller. Returns the vacated position: the link that moved into it,
    /// its parent, and which side of the parent it sits on.
    fn unlink(&mut self, target: Handle) -> (Option<Handle>, Option<Handle>, Dir) {
        let node = self.node(target);
        let parent = node.parent();
        let left = node.left();
        let right = node.right();
        match (left, right) {
            (None, None) => {
                let dir = self.replace_child(parent, target, None);
                (None, parent, dir)
            }
            (Some(child), None) | (None, Some(child)) => {
                let dir = self.replace_child(parent, target, Some(child));
                self.node_mut(child).set_parent(parent);
                (Some(child), parent, dir)
            }
            (Some(left), Some(right)) => {
                // The successor is the right subtree's minimum; it has no
                // left child, so detaching it is the unary or leaf case.
                let successor = self.min_in_subtree(right);
                let successor_right = self.node(successor).right();
                let (slot_parent, slot_dir) = if successor == right {
                    // Hoisting in place vacates the successor's right slot.
                    (successor, Dir::Right)
                } else {
                    let successor_parent = self
                        .node(successor)
                        .parent()
                        .expect("`RawWavlMap::unlink()` - successor has no parent!");
                    self.node_mut(successor_parent).set_child(Dir::Left, successor_right);
                    if let Some(successor_right) = successor_right {
                        self.node_mut(successor_right).set_parent(Some(successor_parent));
                    }
                    self.node_mut(successor).set_child(Dir::Right, Some(right));
                    self.node_mut(right).set_parent(Some(successor));
                    (successor_parent, Dir::Left)
                };

                // The successor takes over the target's position, links,
                // rank, and size; no rebalancing count accrues here.
                self.replace_child(parent, target, Some(successor));
                self.node_mut(successor).set_parent(parent);
                self.node_mut(successor).set_child(Dir::Left, Some(left));
                self.node_mut(left).set_parent(Some(successor));
                let (rank, size) = {
                    let target_node = self.node(target);
                    (target_node.rank(), target_node.size())
                };
                self.node_mut(successor).set_rank(rank);
                self.node_mut(successor).set_size(size);

                (successor_right, Some(slot_parent), slot_dir)
            }
        }
    }

    /// Repoints the parent's slot that held `old` (or the root link) at
    /// `new`, returning which side the slot is on.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) -> Dir {
        match parent {
            Some(parent) => {
                let dir = self.which_child(parent, old);
                self.node_mut(parent).set_child(dir, new);
                dir
            }
            None => {
                self.root = new;
                Dir::Left
            }
        }
    }

    /// Restores the rank rule above a vacated slot. `cursor` is the link
    /// now occupying the slot (possibly absent), `parent` the slot's
    /// owner, `dir` the slot's side.
    fn rebalance_removed(
        &mut self,
        mut cursor: Option<Handle>,
        mut parent: Handle,
        mut dir: Dir,
    ) -> usize {
        let mut ops = 0;
        loop {
            let parent_rank = self.node(parent).rank();
            let gap = parent_rank - self.rank_of(cursor);
            let sibling = self.node(parent).child(!dir);
            let sibling_gap = parent_rank - self.rank_of(sibling);

            if self.node(parent).is_leaf() && parent_rank == 1 {
                // A leaf stranded at rank 1 demotes to 0.
                self.node_mut(parent).set_rank(0);
                ops += 1;
            } else if gap == 3 && sibling_gap == 2 {
                self.node_mut(parent).set_rank(parent_rank - 1);
                ops += 1;
            } else if gap == 3 && sibling_gap == 1 {
                let sibling = sibling
                    .expect("`RawWavlMap::rebalance_removed()` - 3-child has no sibling!");
                let sibling_rank = self.node(sibling).rank();
                let near_gap = sibling_rank - self.rank_of(self.node(sibling).child(dir));
                let far_gap = sibling_rank - self.rank_of(self.node(sibling).child(!dir));
                if near_gap == 2 && far_gap == 2 {
                    // 2,2 sibling: demote it together with the parent.
                    self.node_mut(sibling).set_rank(sibling_rank - 1);
                    self.node_mut(parent).set_rank(parent_rank - 1);
                    ops += 2;
                } else if far_gap == 1 {
                    // Single rotation, terminal.
                    self.rotate_up(sibling);
                    self.update_rank(parent);
                    self.update_rank(sibling);
                    self.update_rank(parent);
                    return ops + 3;
                } else {
                    // Double rotation through the near child, terminal.
                    let pivot = self
                        .node(sibling)
                        .child(dir)
                        .expect("`RawWavlMap::rebalance_removed()` - sibling has no near child!");
                    self.rotate_up(pivot);
                    self.rotate_up(pivot);
                    self.node_mut(parent).set_rank(parent_rank - 2);
                    self.update_rank(sibling);
                    let pivot_rank = self.node(pivot).rank();
                    self.node_mut(pivot).set_rank(pivot_rank + 2);
                    return ops + 5;
                }
            } else {
                return ops;
            }

            match self.node(parent).parent() {
                Some(grand) => {
                    cursor = Some(parent);
                    dir = self.which_child(grand, parent);
                    parent = grand;
                }
                None => return ops,
            }
        }
    }

    /// Value of the entry holding the `rank`-th smallest key, 1-based.
    pub(crate) fn select(&self, rank: usize) -> Result<&str, Error> {
        if rank == 0 || rank > self.len() {
            return Err(Error::RankOutOfRange(rank));
        }
        let mut remaining = rank;
        let mut cursor = self
            .root
            .expect("`RawWavlMap::select()` - in-range rank on an empty tree!");
        loop {
            let node = self.node(cursor);
            let left = self.size_of(node.left());
            match remaining.cmp(&(left + 1)) {
                Ordering::Equal => return Ok(node.value()),
                Ordering::Less => {
                    cursor = node
                        .left()
                        .expect("`RawWavlMap::select()` - rank points into an absent subtree!");
                }
                Ordering::Greater => {
                    remaining -= left + 1;
                    cursor = node
                        .right()
                        .expect("`RawWavlMap::select()` - rank points into an absent subtree!");
                }
            }
        }
    }

    pub(crate) fn keys(&self) -> Vec<i64> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.min;
        while let Some(handle) = cursor {
            keys.push(self.node(handle).key());
            cursor = self.successor(handle);
        }
        keys
    }

    pub(crate) fn values(&self) -> Vec<&str> {
        let mut values = Vec::with_capacity(self.len());
        let mut cursor = self.min;
        while let Some(handle) = cursor {
            values.push(self.node(handle).value());
            cursor = self.successor(handle);
        }
        values
    }

    pub(crate) fn entries(&self) -> Vec<(i64, &str)> {
        let mut entries = Vec::with_capacity(self.len());
        let mut cursor = self.min;
        while let Some(handle) = cursor {
            let node = self.node(handle);
            entries.push((node.key(), node.value()));
            cursor = self.successor(handle);
        }
        entries
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.min = None;
        self.max = None;
    }

    /// Walks the whole tree and panics on any broken structural invariant:
    /// rank rule, parent links, subtree sizes, key order, cached extremes.
    pub(crate) fn assert_invariants(&self) {
        let Some(root) = self.root else {
            assert!(self.min.is_none(), "empty tree caches a minimum");
            assert!(self.max.is_none(), "empty tree caches a maximum");
            assert_eq!(self.nodes.len(), 0, "empty tree holds live arena slots");
            return;
        };
        assert!(self.node(root).parent().is_none(), "root has a parent link");
        let count = self.check_subtree(root);
        assert_eq!(count, self.nodes.len(), "tree and arena disagree on node count");
        assert_eq!(self.min, Some(self.min_in_subtree(root)), "stale minimum cache");
        assert_eq!(self.max, Some(self.max_in_subtree(root)), "stale maximum cache");
        let keys = self.keys();
        assert!(keys.windows(2).all(|pair| pair[0] < pair[1]), "keys out of order");
    }

    fn check_subtree(&self, handle: Handle) -> usize {
        let node = self.node(handle);
        let rank = node.rank();
        if node.is_leaf() {
            assert_eq!(rank, 0, "leaf at nonzero rank");
        }
        let mut count = 1;
        for dir in [Dir::Left, Dir::Right] {
            match node.child(dir) {
                Some(child) => {
                    let child_node = self.node(child);
                    assert_eq!(child_node.parent(), Some(handle), "broken parent link");
                    let gap = rank - child_node.rank();
                    assert!(gap == 1 || gap == 2, "rank gap {gap} outside 1..=2");
                    match dir {
                        Dir::Left => assert!(child_node.key() < node.key(), "left key not smaller"),
                        Dir::Right => assert!(child_node.key() > node.key(), "right key not larger"),
                    }
                    count += self.check_subtree(child);
                }
                None => {
                    assert!(rank <= 1, "rank gap to an absent child exceeds 2");
                }
            }
        }
        assert_eq!(node.size().to_usize(), count, "stale subtree size");
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::ToString;
    use alloc::vec;
    use pretty_assertions::assert_eq;

    fn insert_all(map: &mut RawWavlMap, keys: &[i64]) -> Vec<usize> {
        keys.iter()
            .map(|&key| {
                let ops = map.insert(key, format!("v{key}")).unwrap();
                map.assert_invariants();
                ops
            })
            .collect()
    }

    fn rank_at(map: &RawWavlMap, key: i64) -> i8 {
        map.node(map.find(key).unwrap()).rank()
    }

    #[test]
    fn ascending_inserts_promote_and_rotate() {
        let mut map = RawWavlMap::new();
        let ops = insert_all(&mut map, &[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(ops, vec![0, 1, 3, 2, 3, 4, 3]);
        assert_eq!(map.len(), 7);
        assert_eq!(map.keys(), vec![1, 2, 3, 4, 5, 6, 7]);
        // Root is the median with a perfectly even rank profile.
        assert_eq!(map.node(map.root().unwrap()).key(), 4);
        assert_eq!(rank_at(&map, 4), 2);
        assert_eq!(rank_at(&map, 2), 1);
        assert_eq!(rank_at(&map, 6), 1);
    }

    #[test]
    fn eighth_insert_promotes_to_the_root() {
        let mut map = RawWavlMap::new();
        insert_all(&mut map, &[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(map.insert(8, "v8".to_string()).unwrap(), 3);
        map.assert_invariants();
        assert_eq!(rank_at(&map, 4), 3);
        assert_eq!(rank_at(&map, 6), 2);
        assert_eq!(rank_at(&map, 7), 1);
    }

    #[test]
    fn mixed_inserts_count_every_operation() {
        let mut map = RawWavlMap::new();
        let ops = insert_all(&mut map, &[10, 20, 5, 30, 1]);
        assert_eq!(ops, vec![0, 1, 0, 2, 1]);
        assert_eq!(map.keys(), vec![1, 5, 10, 20, 30]);
    }

    #[test]
    fn zig_zag_insert_costs_a_double_rotation() {
        let mut map = RawWavlMap::new();
        let ops = insert_all(&mut map, &[10, 30, 20]);
        assert_eq!(ops, vec![0, 1, 6]);
        assert_eq!(map.node(map.root().unwrap()).key(), 20);
        assert_eq!(map.keys(), vec![10, 20, 30]);
    }

    #[test]
    fn removing_the_root_rotates_once() {
        let mut map = RawWavlMap::new();
        insert_all(&mut map, &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(map.remove(4).unwrap(), 3);
        map.assert_invariants();
        assert_eq!(map.keys(), vec![1, 2, 3, 5, 6, 7, 8]);
        assert_eq!(map.node(map.root().unwrap()).key(), 5);
        assert_eq!(rank_at(&map, 5), 3);
        assert_eq!(rank_at(&map, 7), 2);
        assert_eq!(rank_at(&map, 6), 0);
        assert_eq!(rank_at(&map, 8), 0);
    }

    #[test]
    fn removing_a_leaf_can_need_no_rebalancing() {
        let mut map = RawWavlMap::new();
        insert_all(&mut map, &[1, 2, 3, 4, 5, 6, 7, 8]);
        map.remove(4).unwrap();
        assert_eq!(map.remove(1).unwrap(), 0);
        map.assert_invariants();
        assert_eq!(map.keys(), vec![2, 3, 5, 6, 7, 8]);
        assert_eq!(map.get(2), Some("v2"));
    }

    #[test]
    fn removing_a_lone_leaf_sibling_demotes_the_parent() {
        let mut map = RawWavlMap::new();
        insert_all(&mut map, &[1, 2]);
        assert_eq!(map.remove(2).unwrap(), 1);
        map.assert_invariants();
        assert_eq!(rank_at(&map, 1), 0);
    }

    #[test]
    fn removing_a_unary_root_counts_one_operation() {
        let mut map = RawWavlMap::new();
        insert_all(&mut map, &[1, 2]);
        assert_eq!(map.remove(1).unwrap(), 1);
        map.assert_invariants();
        assert_eq!(map.keys(), vec![2]);
    }

    #[test]
    fn removing_the_last_entry_empties_the_tree() {
        let mut map = RawWavlMap::new();
        insert_all(&mut map, &[5]);
        assert_eq!(map.remove(5).unwrap(), 0);
        map.assert_invariants();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn removal_double_rotation_costs_five() {
        let mut map = RawWavlMap::new();
        insert_all(&mut map, &[10, 5, 20, 15]);
        assert_eq!(map.remove(5).unwrap(), 5);
        map.assert_invariants();
        assert_eq!(map.keys(), vec![10, 15, 20]);
        assert_eq!(map.node(map.root().unwrap()).key(), 15);
    }

    #[test]
    fn duplicate_and_missing_keys_are_reported() {
        let mut map = RawWavlMap::new();
        insert_all(&mut map, &[1, 2, 3]);
        assert_eq!(map.insert(2, "again".to_string()), Err(Error::DuplicateKey(2)));
        assert_eq!(map.remove(9), Err(Error::KeyNotFound(9)));
        // Failed operations leave the tree untouched.
        map.assert_invariants();
        assert_eq!(map.len(), 3);
        assert_eq!(map.get(2), Some("v2"));
    }

    #[test]
    fn select_walks_by_subtree_sizes() {
        let mut map = RawWavlMap::new();
        insert_all(&mut map, &[40, 10, 30, 20, 50]);
        assert_eq!(map.select(1), Ok("v10"));
        assert_eq!(map.select(3), Ok("v30"));
        assert_eq!(map.select(5), Ok("v50"));
        assert_eq!(map.select(0), Err(Error::RankOutOfRange(0)));
        assert_eq!(map.select(6), Err(Error::RankOutOfRange(6)));
    }

    #[test]
    fn extremes_track_inserts_and_removals() {
        let mut map = RawWavlMap::new();
        insert_all(&mut map, &[10, 5, 20]);
        assert_eq!(map.node(map.min_handle().unwrap()).key(), 5);
        assert_eq!(map.node(map.max_handle().unwrap()).key(), 20);
        map.remove(5).unwrap();
        assert_eq!(map.node(map.min_handle().unwrap()).key(), 10);
        map.remove(20).unwrap();
        assert_eq!(map.node(map.max_handle().unwrap()).key(), 10);
        map.remove(10).unwrap();
        assert!(map.min_handle().is_none());
        assert!(map.max_handle().is_none());
    }

    #[test]
    fn boundary_probes_use_the_cached_extremes() {
        let mut map = RawWavlMap::new();
        insert_all(&mut map, &[10, 20, 30]);
        assert_eq!(map.get(9), None);
        assert_eq!(map.get(31), None);
        assert_eq!(map.get(10), Some("v10"));
        assert_eq!(map.get(30), Some("v30"));
        assert_eq!(map.get(25), None);
    }

    #[test]
    fn clear_releases_everything() {
        let mut map = RawWavlMap::new();
        insert_all(&mut map, &[1, 2, 3]);
        map.clear();
        map.assert_invariants();
        assert!(map.is_empty());
        assert_eq!(map.insert(7, "v7".to_string()).unwrap(), 0);
        assert_eq!(map.keys(), vec![7]);
    }

    // Weyl-style key scramble, enough to hit the demote cascades and both
    // rotation shapes during teardown.
    #[test]
    fn scrambled_workload_holds_every_invariant() {
        let mut map = RawWavlMap::new();
        let keys: Vec<i64> = (0..200).map(|i| (i * 73) % 211).collect();
        for &key in &keys {
            map.insert(key, format!("v{key}")).unwrap();
            map.assert_invariants();
        }
        assert_eq!(map.len(), 200);

        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(map.keys(), sorted);
        for (position, &key) in sorted.iter().enumerate() {
            assert_eq!(map.select(position + 1), Ok(format!("v{key}").as_str()));
        }

        for &key in &keys {
            map.remove(key).unwrap();
            map.assert_invariants();
        }
        assert!(map.is_empty());
    }
}
