use super::node_id::NodeId;
use super::size::Size;

/// Which child slot of a node a link occupies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// One stored entry plus its structural state.
///
/// `left`/`right` are the owning edges; `parent` is a plain back-reference
/// used to walk upward without a path stack. The value itself lives in the
/// values arena and is addressed by `value`, so relocating an entry between
/// nodes (deletion's predecessor promotion) never moves the `V`.
///
/// `size` is kept exact by every strategy (rank operations and the scapegoat
/// weight check both read it). `height` is kept exact only by the AVL walks
/// and by scapegoat rebuilds; an unbalanced tree leaves it at its insert-time
/// value.
pub(crate) struct Node<K> {
    key: K,
    value: NodeId,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
    size: Size,
    height: u8,
}

impl<K> Node<K> {
    /// Creates a fresh leaf holding `key` and pointing at `value`.
    pub(crate) const fn new(key: K, value: NodeId, parent: Option<NodeId>) -> Self {
        Self {
            key,
            value,
            parent,
            left: None,
            right: None,
            size: Size::ONE,
            height: 1,
        }
    }

    #[inline]
    pub(crate) const fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) const fn value_id(&self) -> NodeId {
        self.value
    }

    #[inline]
    pub(crate) const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub(crate) const fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) const fn set_child(&mut self, side: Side, child: Option<NodeId>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    #[inline]
    pub(crate) const fn size(&self) -> Size {
        self.size
    }

    #[inline]
    pub(crate) const fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    #[inline]
    pub(crate) const fn height(&self) -> u8 {
        self.height
    }

    #[inline]
    pub(crate) const fn set_height(&mut self, height: u8) {
        self.height = height;
    }

    /// Replaces this node's entry, returning the previous key and value id.
    /// Used by deletion to promote the in-order predecessor into the node
    /// whose key was removed.
    pub(crate) fn replace_entry(&mut self, key: K, value: NodeId) -> (K, NodeId) {
        let old_key = core::mem::replace(&mut self.key, key);
        let old_value = core::mem::replace(&mut self.value, value);
        (old_key, old_value)
    }

    /// Consumes the node, returning its key and value id.
    pub(crate) fn into_entry(self) -> (K, NodeId) {
        (self.key, self.value)
    }
}

impl<K: Clone> Clone for Node<K> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            value: self.value,
            parent: self.parent,
            left: self.left,
            right: self.right,
            size: self.size,
            height: self.height,
        }
    }
}
