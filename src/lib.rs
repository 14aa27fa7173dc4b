//! An ordered set backed by a Binary Search Tree (BST) with parent
//! back-references, mostly for educational purposes.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` will typically store
//! some sort of value (the value that was inserted, for example) and will
//! sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    value less than its own value.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    value greater than its own value.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! The benefits of these invariants are many. For instance, searching for
//! values in the tree takes `O(height)` (where `height` is defined as the longest
//! path from the root `Node` to a leaf `Node`). BSTs also naturally support
//! sorted iteration by visiting the left subtree, then the subtree root, then
//! the right subtree.
//!
//! ## This crate
//!
//! [`Set`] stores unique values of an [`Ord`] type and supports sorted
//! traversal in both directions. Because every node also records its parent,
//! stepping to the next or previous element needs only local link
//! information - no auxiliary stack. Positions in the set are represented by
//! a small copyable [`Cursor`] token, and a distinguished sentinel node plays
//! the role of the one-past-the-end position so that stepping backward from
//! the end lands on the maximum element.
//!
//! Nodes live in an index-addressed arena rather than individually boxed
//! allocations, so the link graph is plain data and the whole crate is safe
//! code.
//!
//! The tree is *not* self-balancing: an adversarial insertion order (say,
//! strictly ascending values) degenerates it into a linked list and every
//! operation becomes `O(n)`. All descents are iterative, so even such chains
//! cannot overflow the call stack.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod arena;
pub mod set;

pub use set::{Cursor, Iter, Set};
