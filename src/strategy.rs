/// The balancing strategy of a [`TreeMap`](crate::TreeMap) instance.
///
/// Chosen at construction and fixed for the lifetime of the map. All three
/// strategies share the same engine, API, and order-statistic support; they
/// differ only in how (and whether) the tree is reshaped after mutations.
///
/// # Examples
///
/// ```
/// use rowan_tree::{Strategy, TreeMap};
///
/// let map: TreeMap<i32, i32> = TreeMap::new();
/// assert_eq!(map.strategy(), Strategy::Avl);
///
/// let map: TreeMap<i32, i32> = TreeMap::scapegoat();
/// assert_eq!(map.strategy(), Strategy::Scapegoat);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Strategy {
    /// No rebalancing. Operations are O(depth), which degenerates to O(n) for
    /// sorted insertion orders.
    Unbalanced,
    /// Height balancing via rotations. Worst-case O(log n) per operation.
    Avl,
    /// Weight balancing via amortized partial rebuilding. Amortized O(log n)
    /// per operation, with occasional O(subtree) rebuilds.
    Scapegoat,
}
