use core::borrow::Borrow;
use core::cmp::Ordering;

use alloc::vec::Vec;

use super::arena::Arena;
use super::node::{Node, Side};
use super::node_id::NodeId;
use super::size::Size;

/// Default balance factor for scapegoat instances.
pub(crate) const DEFAULT_ALPHA: f64 = 0.75;

/// Per-instance balancing strategy, fixed at construction.
///
/// The engine performs every structural change itself and then hands the
/// affected position to the strategy, which may reshape the tree. This is the
/// only point where the three tree flavors differ.
#[derive(Clone, Copy)]
pub(crate) enum Balance {
    /// No rebalancing.
    Unbalanced,
    /// Height balancing via rotations.
    Avl,
    /// Weight balancing via partial rebuilding. `max_len` is the high-water
    /// mark of `len` since the last rebuild; it drives the delete trigger.
    Scapegoat { alpha: f64, max_len: usize },
}

/// The core binary search tree backing `TreeMap`.
///
/// Nodes and values live in two separate arenas and are linked by [`NodeId`].
/// Keeping values out of the node arena means relocating an entry between
/// nodes (deletion) never moves a `V`, and lets `iter_mut` reason about the
/// two arenas independently.
pub(crate) struct RawTreeMap<K, V> {
    /// Arena storing all tree nodes.
    pub(super) nodes: Arena<Node<K>>,
    /// Arena storing all values.
    pub(super) values: Arena<V>,
    /// Id of the root node, if the tree is non-empty.
    pub(super) root: Option<NodeId>,
    /// Total number of key-value pairs in the tree.
    pub(super) len: usize,
    /// The balancing strategy, fixed at construction.
    pub(super) balance: Balance,
}

impl<K: Clone, V: Clone> Clone for RawTreeMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            values: self.values.clone(),
            root: self.root,
            len: self.len,
            balance: self.balance,
        }
    }
}

impl<K, V> RawTreeMap<K, V> {
    /// Creates a new, empty tree with the given strategy.
    pub(crate) const fn new(balance: Balance) -> Self {
        Self {
            nodes: Arena::new(),
            values: Arena::new(),
            root: None,
            len: 0,
            balance,
        }
    }

    /// Creates a new tree with capacity for `capacity` entries.
    pub(crate) fn with_capacity(balance: Balance, capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            values: Arena::with_capacity(capacity),
            root: None,
            len: 0,
            balance,
        }
    }

    /// Returns the number of key-value pairs in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no elements.
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the capacity of the tree.
    pub(crate) fn capacity(&self) -> usize {
        self.values.capacity()
    }

    /// Returns the balancing strategy tag.
    pub(crate) const fn balance(&self) -> Balance {
        self.balance
    }

    /// Clears all elements from the tree by dropping the whole node graph.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.values.clear();
        self.root = None;
        self.len = 0;
        self.set_scapegoat_max_len(0);
    }

    /// Returns a reference to a node by id.
    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<K> {
        self.nodes.get(id)
    }

    /// Returns a reference to a node by id from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawTreeMap<K, V>`.
    pub(crate) unsafe fn node_ptr<'a>(ptr: *const Self, id: NodeId) -> &'a Node<K> {
        // SAFETY: We only access the `nodes` field through addr_of, avoiding
        // aliasing with the `values` field.
        unsafe { Arena::get_ptr(core::ptr::addr_of!((*ptr).nodes), id) }
    }

    /// Returns a reference to a value by id.
    #[inline]
    pub(crate) fn value(&self, id: NodeId) -> &V {
        self.values.get(id)
    }

    /// Returns a mutable reference to a value by id.
    #[inline]
    pub(crate) fn value_mut(&mut self, id: NodeId) -> &mut V {
        self.values.get_mut(id)
    }

    /// Returns a mutable reference to a value by id from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawTreeMap<K, V>`.
    /// - The caller must have logical exclusive access to the value at `id`,
    ///   and must not hold another reference obtained through this function
    ///   for the same id.
    pub(crate) unsafe fn value_mut_ptr<'a>(ptr: *mut Self, id: NodeId) -> &'a mut V {
        // SAFETY: We only access the `values` field, avoiding aliasing with
        // the `nodes` field.
        unsafe { (*core::ptr::addr_of_mut!((*ptr).values)).get_mut(id) }
    }

    /// Returns the id of the leftmost (first in sorted order) node.
    pub(crate) fn first_node(&self) -> Option<NodeId> {
        let mut current = self.root?;
        while let Some(left) = self.nodes.get(current).child(Side::Left) {
            current = left;
        }
        Some(current)
    }

    /// Returns the id of the rightmost (last in sorted order) node.
    pub(crate) fn last_node(&self) -> Option<NodeId> {
        let mut current = self.root?;
        while let Some(right) = self.nodes.get(current).child(Side::Right) {
            current = right;
        }
        Some(current)
    }

    /// Returns the in-order successor of `id`.
    pub(crate) fn next_node(&self, id: NodeId) -> Option<NodeId> {
        // SAFETY: `self` is a valid reference and only the nodes arena is read.
        unsafe { Self::successor_ptr(core::ptr::from_ref(self), id) }
    }

    /// Returns the in-order predecessor of `id`.
    pub(crate) fn prev_node(&self, id: NodeId) -> Option<NodeId> {
        // SAFETY: `self` is a valid reference and only the nodes arena is read.
        unsafe { Self::predecessor_ptr(core::ptr::from_ref(self), id) }
    }

    /// Returns the in-order successor of `id` from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawTreeMap<K, V>`.
    pub(crate) unsafe fn successor_ptr(ptr: *const Self, id: NodeId) -> Option<NodeId> {
        // SAFETY: Only the nodes arena is read, via `node_ptr`.
        let node = unsafe { Self::node_ptr(ptr, id) };
        if let Some(right) = node.child(Side::Right) {
            // Leftmost node of the right subtree.
            let mut current = right;
            loop {
                match unsafe { Self::node_ptr(ptr, current) }.child(Side::Left) {
                    Some(left) => current = left,
                    None => return Some(current),
                }
            }
        }

        // Climb until we arrive from a left child; that parent is next.
        let mut child = id;
        let mut parent = node.parent();
        while let Some(p) = parent {
            let parent_node = unsafe { Self::node_ptr(ptr, p) };
            if parent_node.child(Side::Left) == Some(child) {
                return Some(p);
            }
            child = p;
            parent = parent_node.parent();
        }
        None
    }

    /// Returns the in-order predecessor of `id` from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawTreeMap<K, V>`.
    pub(crate) unsafe fn predecessor_ptr(ptr: *const Self, id: NodeId) -> Option<NodeId> {
        // SAFETY: Only the nodes arena is read, via `node_ptr`.
        let node = unsafe { Self::node_ptr(ptr, id) };
        if let Some(left) = node.child(Side::Left) {
            // Rightmost node of the left subtree.
            let mut current = left;
            loop {
                match unsafe { Self::node_ptr(ptr, current) }.child(Side::Right) {
                    Some(right) => current = right,
                    None => return Some(current),
                }
            }
        }

        // Climb until we arrive from a right child; that parent is previous.
        let mut child = id;
        let mut parent = node.parent();
        while let Some(p) = parent {
            let parent_node = unsafe { Self::node_ptr(ptr, p) };
            if parent_node.child(Side::Right) == Some(child) {
                return Some(p);
            }
            child = p;
            parent = parent_node.parent();
        }
        None
    }

    /// Returns the first key-value pair in the tree.
    pub(crate) fn first_key_value(&self) -> Option<(&K, &V)> {
        let id = self.first_node()?;
        let node = self.nodes.get(id);
        Some((node.key(), self.values.get(node.value_id())))
    }

    /// Returns the last key-value pair in the tree.
    pub(crate) fn last_key_value(&self) -> Option<(&K, &V)> {
        let id = self.last_node()?;
        let node = self.nodes.get(id);
        Some((node.key(), self.values.get(node.value_id())))
    }

    /// Gets the node at `rank` (0-indexed position in sorted order).
    pub(crate) fn node_by_rank(&self, rank: usize) -> Option<NodeId> {
        if rank >= self.len {
            return None;
        }

        let mut current = self.root?;
        let mut remaining = rank;

        loop {
            let node = self.nodes.get(current);
            if let Some(left) = node.child(Side::Left) {
                let left_size = self.nodes.get(left).size().to_usize();
                if remaining < left_size {
                    current = left;
                    continue;
                }
                remaining -= left_size;
            }
            if remaining == 0 {
                return Some(current);
            }
            remaining -= 1;
            // The bounds check at entry guarantees the rank lives in some
            // right subtree along this path.
            debug_assert!(
                node.child(Side::Right).is_some(),
                "node_by_rank: tree size invariant violated - rank {rank} not reachable"
            );
            current = node.child(Side::Right)?;
        }
    }

    /// Gets an element by its rank (0-indexed position in sorted order).
    pub(crate) fn get_by_rank(&self, rank: usize) -> Option<(&K, &V)> {
        let id = self.node_by_rank(rank)?;
        let node = self.nodes.get(id);
        Some((node.key(), self.values.get(node.value_id())))
    }

    /// Gets an element by its rank, with a mutable reference to the value.
    pub(crate) fn get_by_rank_mut(&mut self, rank: usize) -> Option<(&K, &mut V)> {
        let id = self.node_by_rank(rank)?;
        // Keys live in the nodes arena, values in the values arena; borrowing
        // the two fields separately lets both references coexist.
        let node = self.nodes.get(id);
        let value_id = node.value_id();
        Some((node.key(), self.values.get_mut(value_id)))
    }

    /// Removes the element at `rank` and returns it.
    pub(crate) fn remove_by_rank(&mut self, rank: usize) -> Option<(K, V)> {
        let id = self.node_by_rank(rank)?;
        Some(self.remove_node(id))
    }

    /// Removes and returns the first key-value pair.
    pub(crate) fn pop_first(&mut self) -> Option<(K, V)> {
        let id = self.first_node()?;
        Some(self.remove_node(id))
    }

    /// Removes and returns the last key-value pair.
    pub(crate) fn pop_last(&mut self) -> Option<(K, V)> {
        let id = self.last_node()?;
        Some(self.remove_node(id))
    }

    /// Removes the node `id` from the tree and returns its entry.
    ///
    /// Handles the three classic cases: a node with two children is emptied by
    /// promoting its in-order predecessor (the rightmost node of the left
    /// subtree, which has at most a left child) and physically removing the
    /// predecessor instead; a node with one child is spliced out; a leaf is
    /// unlinked. The balancing strategy then runs from the parent of the
    /// physical removal point.
    pub(crate) fn remove_node(&mut self, id: NodeId) -> (K, V) {
        let node = self.nodes.get(id);
        let physical = if let (Some(left), Some(_)) = (node.child(Side::Left), node.child(Side::Right)) {
            let mut predecessor = left;
            while let Some(right) = self.nodes.get(predecessor).child(Side::Right) {
                predecessor = right;
            }
            predecessor
        } else {
            id
        };

        let physical_node = self.nodes.get(physical);
        let parent = physical_node.parent();
        let spliced = physical_node.child(Side::Left).or(physical_node.child(Side::Right));

        match parent {
            None => self.root = spliced,
            Some(p) => {
                let side = self.child_side(p, physical);
                self.nodes.get_mut(p).set_child(side, spliced);
            }
        }
        if let Some(child) = spliced {
            self.nodes.get_mut(child).set_parent(parent);
        }

        self.shrink_sizes_above(parent);
        self.len -= 1;

        let removed = self.nodes.take(physical);
        let (key, value_id) = if physical == id {
            removed.into_entry()
        } else {
            // Promote the predecessor's entry into the emptied node.
            let (predecessor_key, predecessor_value) = removed.into_entry();
            self.nodes.get_mut(id).replace_entry(predecessor_key, predecessor_value)
        };
        let value = self.values.take(value_id);

        self.after_delete(parent);
        (key, value)
    }

    /// Drains all key-value pairs from the tree in sorted order.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let mut ids = Vec::with_capacity(self.len);
        let mut current = self.first_node();
        while let Some(id) = current {
            ids.push(id);
            current = self.next_node(id);
        }

        let mut result = Vec::with_capacity(ids.len());
        for id in ids {
            let (key, value_id) = self.nodes.take(id).into_entry();
            result.push((key, self.values.take(value_id)));
        }

        self.clear();
        result
    }

    /// Returns which child slot of `parent` holds `child`.
    pub(super) fn child_side(&self, parent: NodeId, child: NodeId) -> Side {
        if self.nodes.get(parent).child(Side::Left) == Some(child) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Returns the cached size of an optional subtree.
    pub(super) fn subtree_size(&self, link: Option<NodeId>) -> usize {
        link.map_or(0, |id| self.nodes.get(id).size().to_usize())
    }

    /// Returns the cached height of an optional subtree.
    pub(super) fn subtree_height(&self, link: Option<NodeId>) -> u8 {
        link.map_or(0, |id| self.nodes.get(id).height())
    }

    /// Recomputes `id`'s cached size and height from its children.
    pub(super) fn refresh(&mut self, id: NodeId) {
        let node = self.nodes.get(id);
        let (left, right) = (node.child(Side::Left), node.child(Side::Right));
        let size = 1 + self.subtree_size(left) + self.subtree_size(right);
        let height = 1 + self.subtree_height(left).max(self.subtree_height(right));
        let node = self.nodes.get_mut(id);
        node.set_size(Size::from_usize(size));
        node.set_height(height);
    }

    /// Adds one to the cached size of every node from `start` to the root.
    fn bump_sizes_above(&mut self, start: Option<NodeId>) {
        let mut current = start;
        while let Some(id) = current {
            let node = self.nodes.get_mut(id);
            node.set_size(Size::from_usize(node.size().to_usize() + 1));
            current = node.parent();
        }
    }

    /// Subtracts one from the cached size of every node from `start` to the root.
    fn shrink_sizes_above(&mut self, start: Option<NodeId>) {
        let mut current = start;
        while let Some(id) = current {
            let node = self.nodes.get_mut(id);
            node.set_size(Size::from_usize(node.size().to_usize() - 1));
            current = node.parent();
        }
    }

    /// Overwrites the scapegoat high-water mark; no-op for other strategies.
    pub(super) fn set_scapegoat_max_len(&mut self, new_max: usize) {
        if let Balance::Scapegoat { max_len, .. } = &mut self.balance {
            *max_len = new_max;
        }
    }

    /// Runs the strategy's insert repair at the freshly linked node.
    /// `depth` is the new node's distance from the root in edges.
    fn after_insert(&mut self, new_id: NodeId, depth: usize) {
        match self.balance {
            Balance::Unbalanced => {}
            Balance::Avl => self.avl_after_insert(new_id),
            Balance::Scapegoat { alpha, max_len } => {
                self.scapegoat_after_insert(new_id, depth, alpha, max_len);
            }
        }
    }

    /// Runs the strategy's delete repair from the parent of the physical
    /// removal point.
    fn after_delete(&mut self, start: Option<NodeId>) {
        match self.balance {
            Balance::Unbalanced => {}
            Balance::Avl => self.avl_after_delete(start),
            Balance::Scapegoat { alpha: _, max_len } => self.scapegoat_after_delete(max_len),
        }
    }
}

impl<K: Ord, V> RawTreeMap<K, V> {
    /// Searches for a key and returns its node id if present.
    pub(crate) fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root?;
        loop {
            let node = self.nodes.get(current);
            match key.cmp(node.key().borrow()) {
                Ordering::Less => current = node.child(Side::Left)?,
                Ordering::Greater => current = node.child(Side::Right)?,
                Ordering::Equal => return Some(current),
            }
        }
    }

    /// Returns a reference to the value corresponding to the key.
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let id = self.find(key)?;
        Some(self.values.get(self.nodes.get(id).value_id()))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let id = self.find(key)?;
        let value_id = self.nodes.get(id).value_id();
        Some(self.values.get_mut(value_id))
    }

    /// Returns the key-value pair corresponding to the key.
    pub(crate) fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let id = self.find(key)?;
        let node = self.nodes.get(id);
        Some((node.key(), self.values.get(node.value_id())))
    }

    /// Returns true if the tree contains the specified key.
    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.find(key).is_some()
    }

    /// Returns the rank (0-indexed position in sorted order) of a key.
    pub(crate) fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root?;
        let mut rank = 0;

        loop {
            let node = self.nodes.get(current);
            match key.cmp(node.key().borrow()) {
                Ordering::Less => current = node.child(Side::Left)?,
                Ordering::Greater => {
                    rank += self.subtree_size(node.child(Side::Left)) + 1;
                    current = node.child(Side::Right)?;
                }
                Ordering::Equal => return Some(rank + self.subtree_size(node.child(Side::Left))),
            }
        }
    }

    /// Inserts a key-value pair, returning the node id and the previous value
    /// if the key was already present. This is the upsert primitive; an equal
    /// key replaces the value in place with no structural change.
    pub(crate) fn insert_full(&mut self, key: K, value: V) -> (NodeId, Option<V>) {
        let Some(root) = self.root else {
            let value_id = self.values.alloc(value);
            let new_id = self.nodes.alloc(Node::new(key, value_id, None));
            self.root = Some(new_id);
            self.len = 1;
            self.after_insert(new_id, 0);
            return (new_id, None);
        };

        // Iterative descent to the key or to the null slot where it belongs.
        let mut current = root;
        let mut depth = 0;
        let side = loop {
            let node = self.nodes.get(current);
            match key.cmp(node.key()) {
                Ordering::Equal => {
                    // Replace the value in place to avoid alloc/free churn.
                    let value_id = node.value_id();
                    let old_value = core::mem::replace(self.values.get_mut(value_id), value);
                    return (current, Some(old_value));
                }
                Ordering::Less => match node.child(Side::Left) {
                    Some(next) => {
                        current = next;
                        depth += 1;
                    }
                    None => break Side::Left,
                },
                Ordering::Greater => match node.child(Side::Right) {
                    Some(next) => {
                        current = next;
                        depth += 1;
                    }
                    None => break Side::Right,
                },
            }
        };

        let value_id = self.values.alloc(value);
        let new_id = self.nodes.alloc(Node::new(key, value_id, Some(current)));
        self.nodes.get_mut(current).set_child(side, Some(new_id));
        self.len += 1;
        self.bump_sizes_above(Some(current));
        self.after_insert(new_id, depth + 1);
        (new_id, None)
    }

    /// Inserts a key-value pair, returning the old value if the key was
    /// already present.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.insert_full(key, value).1
    }

    /// Removes a key from the tree and returns the value.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the tree and returns the key-value pair.
    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let id = self.find(key)?;
        Some(self.remove_node(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;
    use alloc::format;
    use alloc::string::String;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    impl<K: Ord, V> RawTreeMap<K, V> {
        /// Validates all tree invariants. Panics with a descriptive message if
        /// any are violated. Intended for tests to catch corruption.
        pub(crate) fn validate_invariants(&self) {
            let mut errors: Vec<String> = Vec::new();

            let Some(root) = self.root else {
                assert_eq!(self.len, 0, "Empty tree should have len 0");
                return;
            };

            if self.nodes.get(root).parent().is_some() {
                errors.push("root has a parent".into());
            }

            let (size, _height, _max_depth) = self.validate_node(root, 0, &mut errors);

            if size != self.len {
                errors.push(format!("len mismatch: self.len={}, actual count={size}", self.len));
            }

            // In-order keys must be strictly increasing.
            let mut current = self.first_node();
            let mut previous: Option<NodeId> = None;
            let mut walked = 0;
            while let Some(id) = current {
                if let Some(prev) = previous
                    && self.nodes.get(prev).key() >= self.nodes.get(id).key()
                {
                    errors.push(format!("in-order keys not strictly increasing at step {walked}"));
                }
                previous = Some(id);
                walked += 1;
                current = self.next_node(id);
            }
            if walked != self.len {
                errors.push(format!("in-order walk visited {walked} nodes, len is {}", self.len));
            }

            match self.balance {
                Balance::Unbalanced | Balance::Avl => {}
                Balance::Scapegoat { alpha: _, max_len } => {
                    if max_len < self.len {
                        errors.push(format!("scapegoat max_len {max_len} below len {}", self.len));
                    }
                    // The delete trigger fires (and resets the mark) whenever
                    // len falls to half the mark, so a settled tree is always
                    // strictly above it.
                    if max_len / 2 >= self.len {
                        errors.push(format!(
                            "scapegoat delete trigger missed: len {} at or below max_len {max_len} / 2",
                            self.len
                        ));
                    }
                }
            }

            assert!(errors.is_empty(), "Tree invariant violations:\n{}", errors.join("\n"));
        }

        /// Returns (`subtree_size`, `subtree_height`, `max_depth`).
        fn validate_node(&self, id: NodeId, depth: usize, errors: &mut Vec<String>) -> (usize, usize, usize) {
            let node = self.nodes.get(id);
            let mut size = 1;
            let mut height = 0;
            let mut max_depth = depth;

            for side in [Side::Left, Side::Right] {
                if let Some(child) = node.child(side) {
                    if self.nodes.get(child).parent() != Some(id) {
                        errors.push(format!("child {child:?} has a stale parent link"));
                    }
                    let key_ordering = self.nodes.get(child).key().cmp(node.key());
                    let expected = match side {
                        Side::Left => Ordering::Less,
                        Side::Right => Ordering::Greater,
                    };
                    if key_ordering != expected {
                        errors.push(format!("BST order violated between {id:?} and its {side:?} child"));
                    }
                    let (child_size, child_height, child_depth) = self.validate_node(child, depth + 1, errors);
                    size += child_size;
                    height = height.max(child_height);
                    max_depth = max_depth.max(child_depth);
                }
            }
            let height = height + 1;

            if node.size().to_usize() != size {
                errors.push(format!(
                    "size mismatch at {id:?}: cached={}, actual={size}",
                    node.size().to_usize()
                ));
            }

            if matches!(self.balance, Balance::Avl) {
                if usize::from(node.height()) != height {
                    errors.push(format!("height mismatch at {id:?}: cached={}, actual={height}", node.height()));
                }
                let left = i64::try_from(self.subtree_height(node.child(Side::Left))).unwrap();
                let right = i64::try_from(self.subtree_height(node.child(Side::Right))).unwrap();
                if (left - right).abs() > 1 {
                    errors.push(format!("AVL balance violated at {id:?}: left={left}, right={right}"));
                }
            }

            (size, height, max_depth)
        }
    }

    fn balances() -> [Balance; 3] {
        [
            Balance::Unbalanced,
            Balance::Avl,
            Balance::Scapegoat {
                alpha: DEFAULT_ALPHA,
                max_len: 0,
            },
        ]
    }

    // Test operations enum for property testing.
    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
        RemoveByRank(usize),
        PopFirst,
        PopLast,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            6 => (0i32..1000).prop_map(Op::Insert),
            2 => (0i32..1000).prop_map(Op::Remove),
            1 => (0usize..1200).prop_map(Op::RemoveByRank),
            1 => Just(Op::PopFirst),
            1 => Just(Op::PopLast),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn tree_invariants_maintained_after_operations(ops in prop::collection::vec(op_strategy(), 0..400)) {
            for balance in balances() {
                let mut tree: RawTreeMap<i32, i32> = RawTreeMap::new(balance);
                let mut model: BTreeMap<i32, i32> = BTreeMap::new();
                let mut high_water = 0usize;

                for op in &ops {
                    match *op {
                        Op::Insert(key) => {
                            prop_assert_eq!(tree.insert(key, key * 2), model.insert(key, key * 2));
                        }
                        Op::Remove(key) => {
                            prop_assert_eq!(tree.remove(&key), model.remove(&key));
                        }
                        Op::RemoveByRank(rank) => {
                            let expected = model.keys().nth(rank).copied();
                            let removed = tree.remove_by_rank(rank);
                            prop_assert_eq!(removed.map(|(k, _)| k), expected);
                            if let Some(key) = expected {
                                model.remove(&key);
                            }
                        }
                        Op::PopFirst => {
                            prop_assert_eq!(tree.pop_first(), model.pop_first());
                        }
                        Op::PopLast => {
                            prop_assert_eq!(tree.pop_last(), model.pop_last());
                        }
                    }
                    prop_assert_eq!(tree.len(), model.len());
                    tree.validate_invariants();

                    // No node may sit deeper than the α-log of the largest
                    // population this tree has ever held.
                    high_water = high_water.max(tree.len());
                    if let Balance::Scapegoat { alpha, .. } = balance {
                        let depth = tree_height(&tree).saturating_sub(1);
                        let bound = RawTreeMap::<i32, i32>::allowed_depth(high_water, alpha) + 2;
                        prop_assert!(depth <= bound, "scapegoat depth {} exceeds bound {}", depth, bound);
                    }
                }

                // Full contents agree at the end.
                let drained = tree.drain_to_vec();
                let expected: Vec<(i32, i32)> = model.into_iter().collect();
                prop_assert_eq!(drained, expected);
            }
        }

        #[test]
        fn rank_operations_match_sorted_order(keys in prop::collection::btree_set(0i32..10_000, 1..300)) {
            for balance in balances() {
                let mut tree: RawTreeMap<i32, i32> = RawTreeMap::new(balance);
                for &key in &keys {
                    tree.insert(key, key);
                }

                let sorted: Vec<i32> = keys.iter().copied().collect();
                for (rank, &key) in sorted.iter().enumerate() {
                    prop_assert_eq!(tree.get_by_rank(rank).map(|(k, _)| *k), Some(key));
                    prop_assert_eq!(tree.rank_of(&key), Some(rank));
                }
                prop_assert_eq!(tree.get_by_rank(sorted.len()), None);
            }
        }

        #[test]
        fn sorted_insertion_stays_balanced(n in 1usize..512) {
            // The classic worst case for a plain BST; both balanced variants
            // must keep logarithmic depth.
            for balance in [Balance::Avl, Balance::Scapegoat { alpha: DEFAULT_ALPHA, max_len: 0 }] {
                let mut tree: RawTreeMap<usize, usize> = RawTreeMap::new(balance);
                for i in 0..n {
                    tree.insert(i, i);
                }
                tree.validate_invariants();

                let mut cap = 1usize;
                let mut log2 = 0usize;
                while cap < n {
                    cap *= 2;
                    log2 += 1;
                }
                let depth = tree_height(&tree);
                // 1.44 log2(n) for AVL, log_{4/3}(n) ~ 2.41 log2(n) for the
                // default scapegoat alpha.
                prop_assert!(depth <= 5 * log2 / 2 + 2, "depth {} too large for n {}", depth, n);
            }
        }
    }

    fn tree_height<K: Ord, V>(tree: &RawTreeMap<K, V>) -> usize {
        fn walk<K: Ord, V>(tree: &RawTreeMap<K, V>, id: NodeId) -> usize {
            let node = tree.node(id);
            let left = node.child(Side::Left).map_or(0, |c| walk(tree, c));
            let right = node.child(Side::Right).map_or(0, |c| walk(tree, c));
            1 + left.max(right)
        }
        tree.root.map_or(0, |root| walk(tree, root))
    }

    #[test]
    fn remove_node_covers_all_cases() {
        for balance in balances() {
            // Root with both children: {2: [1, 3]}.
            let mut tree: RawTreeMap<i32, &str> = RawTreeMap::new(balance);
            tree.insert(2, "two");
            tree.insert(1, "one");
            tree.insert(3, "three");

            // Leaf removal.
            assert_eq!(tree.remove(&1), Some("one"));
            tree.validate_invariants();
            assert_eq!(tree.first_key_value(), Some((&2, &"two")));

            // Re-add, then remove the two-child root.
            tree.insert(1, "one");
            assert_eq!(tree.remove(&2), Some("two"));
            tree.validate_invariants();
            assert_eq!(tree.len(), 2);
            assert_eq!(tree.first_key_value(), Some((&1, &"one")));
            assert_eq!(tree.last_key_value(), Some((&3, &"three")));

            // One-child removal down to a single node, then empty.
            assert_eq!(tree.remove(&1), Some("one"));
            tree.validate_invariants();
            assert_eq!(tree.remove(&3), Some("three"));
            tree.validate_invariants();
            assert!(tree.is_empty());
            assert_eq!(tree.remove(&3), None);
        }
    }

    #[test]
    fn scapegoat_rebuild_restores_depth_bound() {
        let mut tree: RawTreeMap<usize, usize> = RawTreeMap::new(Balance::Scapegoat {
            alpha: DEFAULT_ALPHA,
            max_len: 0,
        });
        for i in 0..1000 {
            tree.insert(i, i);
            let depth = tree_height(&tree).saturating_sub(1);
            let Balance::Scapegoat { alpha, max_len } = tree.balance() else {
                unreachable!();
            };
            assert!(
                depth <= RawTreeMap::<usize, usize>::allowed_depth(max_len, alpha) + 1,
                "depth {depth} exceeds scapegoat bound after inserting {i}"
            );
        }
        tree.validate_invariants();
    }

    #[test]
    fn scapegoat_delete_trigger_rebuilds() {
        let mut tree: RawTreeMap<usize, usize> = RawTreeMap::new(Balance::Scapegoat {
            alpha: DEFAULT_ALPHA,
            max_len: 0,
        });
        for i in 0..256 {
            tree.insert(i, i);
        }
        // Deleting more than half the entries must fire the rebuild trigger
        // and reset the high-water mark.
        for i in 0..160 {
            assert_eq!(tree.remove(&i), Some(i));
            tree.validate_invariants();
        }
        // The trigger fires when len first reaches 128 and resets the mark.
        let Balance::Scapegoat { max_len, .. } = tree.balance() else {
            unreachable!();
        };
        assert_eq!(max_len, 128);
        assert_eq!(tree.len(), 96);
    }
}
