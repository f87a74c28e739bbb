//! Intrusive binary trees over caller-owned nodes.
//!
//! Nodes live in a slice the caller owns and are addressed by [`NodeId`]. Each
//! node embeds a [`NodeLink`] (dad, son and bro links plus a balance status)
//! and exposes it through [`Linked`]. The containers relink headers and flip
//! statuses; they never move, copy or drop a node.
//!
//! * [`tree`] holds the key-agnostic node algebra: stepping in four orders and
//!   both directions, structural queries, swaps, AVL checks and rotations.
//! * [`AvlMap`] is an ordered map or multimap built on that algebra, with bound
//!   queries, ranges and set-algebra merges over two maps.
//!
//! ```
//! use ucl::{AvlMap, Node, NodeId};
//!
//! let mut nodes: Vec<Node<u32, &str>> = Vec::new();
//! let mut map = AvlMap::multimap();
//! for (key, value) in [(2, "b"), (1, "a"), (2, "c")] {
//!     let id = NodeId::from_index(nodes.len());
//!     nodes.push(Node::new(key, value));
//!     map.insert(&mut nodes, id);
//! }
//!
//! let values: Vec<&str> = map.equal_range(&nodes, &2).map(|(_, node)| node.value).collect();
//! assert_eq!(values, ["b", "c"]);
//! ```

mod error;
mod link;
pub mod map;
mod order;
pub mod tree;

pub use error::InvariantError;
pub use link::{Balance, Linked, NodeId, NodeLink};
pub use map::{AvlMap, Node};
pub use order::{KeyOrder, Keyed, Natural, OrderBy};
pub use tree::{Direction, Order, Walk};
