mod arena;
mod avl;
mod node;
mod node_id;
mod raw_tree_map;
mod scapegoat;
mod size;

pub(crate) use node_id::NodeId;
pub(crate) use raw_tree_map::{Balance, DEFAULT_ALPHA, RawTreeMap};
