//! An in-memory B-tree set with a configurable order.
//!
//! This crate provides [`BTree`], an ordered set of unique keys backed by a
//! classic B-tree whose order `M` (the maximum branching factor) is chosen at
//! construction rather than baked into the type. Alongside the usual set
//! operations it exposes the structural queries a B-tree makes cheap:
//!
//! - [`range_search`](BTree::range_search) - all keys in an inclusive range,
//!   via a subtree-pruning walk
//! - [`min_key`](BTree::min_key) / [`max_key`](BTree::max_key) - O(log n)
//!   extremes
//! - [`height`](BTree::height) - edges from root to the (uniform) leaf level
//! - [`check_properties`](BTree::check_properties) - a full structural
//!   validator for test harnesses
//!
//! # Example
//!
//! ```
//! use ord_btree::BTree;
//!
//! let mut tree = BTree::new(3);
//! for key in [10, 20, 5, 6, 12, 30, 7, 17] {
//!     tree.insert(key);
//! }
//!
//! assert_eq!(tree.len(), 8);
//! assert_eq!(tree.join(","), "5,6,7,10,12,17,20,30");
//! assert_eq!(tree.range_search(&6, &17), [6, 7, 10, 12, 17]);
//!
//! tree.remove(&10);
//! assert!(!tree.contains(&10));
//! ```
//!
//! # Implementation
//!
//! Nodes live in a slotted arena and link to their children through compact
//! handles; insertion splits full nodes preemptively on the way down, and
//! deletion repairs underfull nodes by borrowing from or merging with a
//! sibling. The tree is single-threaded and entirely in memory.

// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]

mod raw;

pub mod btree;
pub mod error;

pub use btree::BTree;
pub use error::Error;
