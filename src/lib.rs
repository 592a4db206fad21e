//! Self-balancing binary search tree collections for Rust.
//!
//! This crate provides [`TreeMap`], an ordered map whose balancing strategy is
//! chosen per instance at construction:
//!
//! - [`TreeMap::new`] / [`TreeMap::avl`] - an AVL tree: height-balanced via
//!   rotations, with at most one rebalancing operation per insert.
//! - [`TreeMap::scapegoat`] - a scapegoat tree: weight-balanced via amortized
//!   partial rebuilding, trading occasional O(n) rebuilds for rotation-free
//!   inserts.
//! - [`TreeMap::unbalanced`] - the plain BST engine with no rebalancing.
//!
//! Every strategy shares the same iterative engine and supports O(log n)
//! order-statistic operations in addition to the usual `BTreeMap`-style API:
//!
//! - [`get_by_rank`](TreeMap::get_by_rank) - get the element at a given sorted
//!   position
//! - [`rank_of`](TreeMap::rank_of) - get the sorted position of a key
//! - [`remove_by_rank`](TreeMap::remove_by_rank) - remove the element at a
//!   given sorted position
//! - Indexing by [`Rank`] - e.g., `map[Rank(0)]` for the first element
//!
//! # Example
//!
//! ```
//! use rowan_tree::{Rank, TreeMap};
//!
//! let mut scores = TreeMap::new();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! // Standard ordered-map operations work as expected.
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//! assert_eq!(scores.len(), 3);
//!
//! // Order-statistic operations (O(log n)).
//! let (name, score) = scores.get_by_rank(1).unwrap();
//! assert_eq!((*name, *score), ("Bob", 85));
//!
//! assert_eq!(scores.rank_of(&"Carol"), Some(2));
//! assert_eq!(scores[Rank(0)], 100); // Alice's score (first alphabetically)
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - only requires `alloc`, no standard library
//!   dependency
//! - **Strategy per instance** - unbalanced, AVL, and scapegoat trees share
//!   one engine and one API
//! - **O(log n) rank operations** - order-statistic queries via subtree size
//!   augmentation, on every strategy
//! - **Arena storage** - nodes live in a contiguous arena and are linked by
//!   integer ids, so rotations and rebuilds are O(1) index reassignments
//!
//! # Implementation
//!
//! The tree is a classic binary search tree with parent back-links. Each node
//! caches the size of its subtree (used by rank operations and the scapegoat
//! weight-balance check) and, for AVL instances, its height. Search, insert,
//! and delete are iterative, so a degenerate unbalanced tree cannot overflow
//! the call stack; only the scapegoat rebuild recurses, and its depth is
//! bounded by the height of the balanced result.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_op_in_unsafe_fn)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]

extern crate alloc;

mod order_statistic;
mod raw;
mod strategy;

pub mod tree_map;

pub use order_statistic::Rank;
pub use strategy::Strategy;
pub use tree_map::TreeMap;
