//! Height balancing: rotation primitives and the AVL repair walks.

use super::node::Side;
use super::node_id::NodeId;
use super::raw_tree_map::RawTreeMap;

impl<K, V> RawTreeMap<K, V> {
    /// Height difference between `id`'s left and right subtrees.
    fn balance_factor(&self, id: NodeId) -> i16 {
        let node = self.node(id);
        i16::from(self.subtree_height(node.child(Side::Left))) - i16::from(self.subtree_height(node.child(Side::Right)))
    }

    /// Rotates `id` down toward `dir`, promoting its opposite child.
    ///
    /// Reassigns three links (the pivot's inner subtree, the pivot itself, and
    /// the parent's slot), fixes the parent back-references, and recomputes
    /// the cached size and height of the two pivoted nodes. The in-order key
    /// sequence is unchanged. Returns the id now rooting the subtree.
    pub(super) fn rotate(&mut self, id: NodeId, dir: Side) -> NodeId {
        let up = dir.opposite();
        let pivot = self.node(id).child(up).expect("`rotate()` - pivot child is missing!");
        let inner = self.node(pivot).child(dir);
        let parent = self.node(id).parent();

        self.nodes.get_mut(id).set_child(up, inner);
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).set_parent(Some(id));
        }

        self.nodes.get_mut(pivot).set_child(dir, Some(id));
        self.nodes.get_mut(id).set_parent(Some(pivot));

        self.nodes.get_mut(pivot).set_parent(parent);
        match parent {
            None => self.root = Some(pivot),
            Some(p) => {
                let side = self.child_side(p, id);
                self.nodes.get_mut(p).set_child(side, Some(pivot));
            }
        }

        // The demoted node first; the pivot's metadata depends on it.
        self.refresh(id);
        self.refresh(pivot);
        pivot
    }

    /// Restores the height invariant at `id`, which must be out of balance.
    ///
    /// Picks the single or double rotation according to which grandchild
    /// subtree is taller. Returns the id now rooting the subtree.
    fn rebalance(&mut self, id: NodeId) -> NodeId {
        if self.balance_factor(id) > 0 {
            let left = self.node(id).child(Side::Left).expect("`rebalance()` - left child is missing!");
            if self.balance_factor(left) < 0 {
                self.rotate(left, Side::Left);
            }
            self.rotate(id, Side::Right)
        } else {
            let right = self.node(id).child(Side::Right).expect("`rebalance()` - right child is missing!");
            if self.balance_factor(right) > 0 {
                self.rotate(right, Side::Right);
            }
            self.rotate(id, Side::Left)
        }
    }

    /// Repairs heights upward from a freshly inserted node.
    ///
    /// At most one rebalancing operation is needed: a rotation returns the
    /// subtree to its pre-insert height, so no ancestor above it can have
    /// changed. The walk also stops as soon as an ancestor's height is
    /// unaffected by the insert.
    pub(super) fn avl_after_insert(&mut self, new_id: NodeId) {
        let mut child = new_id;
        while let Some(id) = self.node(child).parent() {
            let before = self.node(id).height();
            self.refresh(id);
            if self.balance_factor(id).abs() > 1 {
                self.rebalance(id);
                break;
            }
            if self.node(id).height() == before {
                break;
            }
            child = id;
        }
    }

    /// Repairs heights upward from the parent of a structural removal.
    ///
    /// Unlike the insert case, a delete can shorten a subtree and expose an
    /// imbalance at every ancestor, so the walk continues to the root and
    /// rotates wherever needed.
    pub(super) fn avl_after_delete(&mut self, start: Option<NodeId>) {
        let mut current = start;
        while let Some(id) = current {
            self.refresh(id);
            let top = if self.balance_factor(id).abs() > 1 { self.rebalance(id) } else { id };
            current = self.node(top).parent();
        }
    }
}
