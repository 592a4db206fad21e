//! Weight balancing: scapegoat discovery and subtree rebuilding.

use alloc::vec::Vec;

use smallvec::SmallVec;

use super::node::Side;
use super::node_id::NodeId;
use super::raw_tree_map::RawTreeMap;
use super::size::Size;

impl<K, V> RawTreeMap<K, V> {
    /// The deepest position a node may occupy in a tree of `len` entries:
    /// `floor(log(len) / log(1 / alpha))`, with the root at depth 0.
    ///
    /// Computed by repeated multiplication instead of `ln` so the crate stays
    /// off `std`'s float intrinsics: the bound is the largest `d` with
    /// `len * alpha^d >= 1`.
    pub(super) fn allowed_depth(len: usize, alpha: f64) -> usize {
        if len <= 1 {
            return 0;
        }
        #[allow(clippy::cast_precision_loss)]
        let mut bound = len as f64;
        let mut depth = 0;
        loop {
            bound *= alpha;
            if bound < 1.0 {
                return depth;
            }
            depth += 1;
        }
    }

    /// Walks upward from `start` and returns the first ancestor that fails
    /// the α-weight check (`size(child) > alpha * size(ancestor)`), falling
    /// back to the root.
    fn find_scapegoat(&self, start: NodeId, alpha: f64) -> NodeId {
        let mut child = start;
        while let Some(parent) = self.node(child).parent() {
            #[allow(clippy::cast_precision_loss)]
            let child_size = self.node(child).size().to_usize() as f64;
            #[allow(clippy::cast_precision_loss)]
            let parent_size = self.node(parent).size().to_usize() as f64;
            if child_size > alpha * parent_size {
                return parent;
            }
            child = parent;
        }
        child
    }

    /// Flattens the subtree rooted at `subtree` into sorted order and relinks
    /// it as a median-split balanced subtree in place.
    ///
    /// Ancestor metadata is untouched: the rebuilt subtree holds exactly the
    /// same entries, so every cached size above it remains valid.
    pub(super) fn rebuild_subtree(&mut self, subtree: NodeId) {
        let parent = self.node(subtree).parent();
        let side = parent.map(|p| self.child_side(p, subtree));

        // In-order flatten with an explicit stack; the stack never grows past
        // the (untrusted) height of the subtree being replaced.
        let mut flat: Vec<NodeId> = Vec::with_capacity(self.node(subtree).size().to_usize());
        let mut stack: SmallVec<[NodeId; 32]> = SmallVec::new();
        let mut current = Some(subtree);
        while let Some(id) = current {
            stack.push(id);
            current = self.node(id).child(Side::Left);
        }
        while let Some(id) = stack.pop() {
            flat.push(id);
            let mut current = self.node(id).child(Side::Right);
            while let Some(id) = current {
                stack.push(id);
                current = self.node(id).child(Side::Left);
            }
        }

        // Isolate every node's links before relinking.
        for &id in &flat {
            let node = self.nodes.get_mut(id);
            node.set_parent(None);
            node.set_child(Side::Left, None);
            node.set_child(Side::Right, None);
            node.set_size(Size::ONE);
            node.set_height(1);
        }

        let new_root = self.build_balanced(&flat);
        self.nodes.get_mut(new_root).set_parent(parent);
        match (parent, side) {
            (Some(p), Some(side)) => self.nodes.get_mut(p).set_child(side, Some(new_root)),
            _ => self.root = Some(new_root),
        }
    }

    /// Links `ids` (already in sorted order) into a balanced subtree by
    /// picking the median as the sub-root and recursing into the halves.
    /// Recursion depth is the height of the result, so it is logarithmic in
    /// the rebuilt subtree's size.
    fn build_balanced(&mut self, ids: &[NodeId]) -> NodeId {
        let mid = ids.len() / 2;
        let root = ids[mid];
        if mid > 0 {
            let left = self.build_balanced(&ids[..mid]);
            self.nodes.get_mut(left).set_parent(Some(root));
            self.nodes.get_mut(root).set_child(Side::Left, Some(left));
        }
        if mid + 1 < ids.len() {
            let right = self.build_balanced(&ids[mid + 1..]);
            self.nodes.get_mut(right).set_parent(Some(root));
            self.nodes.get_mut(root).set_child(Side::Right, Some(right));
        }
        self.refresh(root);
        root
    }

    /// Insert repair: bump the high-water mark and, if the new node landed
    /// below the allowed depth, rebuild at the scapegoat.
    pub(super) fn scapegoat_after_insert(&mut self, new_id: NodeId, depth: usize, alpha: f64, max_len: usize) {
        self.set_scapegoat_max_len(max_len.max(self.len));
        if depth > Self::allowed_depth(self.len, alpha) {
            let scapegoat = self.find_scapegoat(new_id, alpha);
            self.rebuild_subtree(scapegoat);
            self.set_scapegoat_max_len(self.len);
        }
    }

    /// Delete repair: once half the high-water mark has been removed, rebuild
    /// the whole tree and reset the mark.
    pub(super) fn scapegoat_after_delete(&mut self, max_len: usize) {
        if self.len <= max_len / 2 {
            if let Some(root) = self.root {
                self.rebuild_subtree(root);
            }
            self.set_scapegoat_max_len(self.len);
        }
    }
}
