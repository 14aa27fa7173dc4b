//! Index-addressed storage for tree nodes.
//!
//! Every node of a [`Set`](crate::set::Set) lives in a slot of an [`Arena`]
//! and is referred to by its [`NodeId`]. Freed slots go on a free list and
//! are reused by later allocations, so a `NodeId` stays valid exactly as
//! long as the node it was issued for - which is what lets cursors survive
//! mutations that do not erase their node.
//!
//! Slot 0 is special: it is the sentinel, the only node without a value. Its
//! `left` link anchors the real root of the tree and it doubles as the
//! one-past-the-end position. It is created with the arena and never freed.

use std::ops::{Index, IndexMut};

/// Identifies a node slot in an [`Arena`]. Stable until that node is freed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct NodeId(usize);

/// The slot holding the sentinel node.
pub(crate) const SENTINEL: NodeId = NodeId(0);

/// A tree vertex. `left` and `right` are owning links; `parent` is a
/// non-owning back-reference and never decides whether a slot gets freed.
#[derive(Clone)]
pub(crate) struct Node<T> {
    /// `None` only in the sentinel slot.
    pub(crate) value: Option<T>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl<T> Node<T> {
    /// A childless node holding `value`, ready to be attached under `parent`.
    pub(crate) fn leaf(value: T, parent: NodeId) -> Self {
        Node {
            value: Some(value),
            left: None,
            right: None,
            parent: Some(parent),
        }
    }

    fn sentinel() -> Self {
        Node {
            value: None,
            left: None,
            right: None,
            parent: None,
        }
    }
}

#[derive(Clone)]
enum Slot<T> {
    Occupied(Node<T>),
    Vacant { next_free: Option<NodeId> },
}

/// A growable pool of node slots with a free list threaded through the
/// vacant ones.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<NodeId>,
}

impl<T> Arena<T> {
    /// An arena holding only the sentinel.
    pub(crate) fn new() -> Self {
        Arena {
            slots: vec![Slot::Occupied(Node::sentinel())],
            free_head: None,
        }
    }

    /// Stores `node` in a vacant slot (reusing a freed one if available) and
    /// returns its id.
    pub(crate) fn alloc(&mut self, node: Node<T>) -> NodeId {
        match self.free_head {
            Some(id) => {
                self.free_head = match self.slots[id.0] {
                    Slot::Vacant { next_free } => next_free,
                    Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
                };
                self.slots[id.0] = Slot::Occupied(node);
                id
            }
            None => {
                let id = NodeId(self.slots.len());
                self.slots.push(Slot::Occupied(node));
                id
            }
        }
    }

    /// Drops the node in `id`'s slot and pushes the slot onto the free list.
    pub(crate) fn free(&mut self, id: NodeId) {
        debug_assert!(id != SENTINEL, "the sentinel slot is never freed");
        let old = std::mem::replace(
            &mut self.slots[id.0],
            Slot::Vacant {
                next_free: self.free_head,
            },
        );
        debug_assert!(matches!(old, Slot::Occupied(_)), "double free of {:?}", id);
        self.free_head = Some(id);
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = Node<T>;

    fn index(&self, id: NodeId) -> &Node<T> {
        match &self.slots[id.0] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("dangling {:?}", id),
        }
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<T> {
        match &mut self.slots[id.0] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("dangling {:?}", id),
        }
    }
}
