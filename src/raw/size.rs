use super::node_id::NodeId;

/// Number of entries in a subtree, including the subtree root itself.
///
/// A newtype over [`NodeId`] so it inherits the same niche; a subtree can
/// never hold more entries than the arena can hold nodes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Size(NodeId);

impl Size {
    pub(crate) const MAX: usize = NodeId::MAX;
    pub(crate) const ONE: Self = Self::from_usize(1);

    #[inline]
    pub(crate) const fn from_usize(size: usize) -> Self {
        assert!(size <= Self::MAX, "`Size::from_usize()` - `size` > `Size::MAX`!");
        Self(NodeId::from_index(size))
    }

    #[inline]
    pub(crate) const fn to_usize(self) -> usize {
        self.0.to_index()
    }
}
