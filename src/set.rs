//! An ordered set of unique values with cursor-based bidirectional traversal.
//!
//! The tree layout follows the classic sentinel trick: a distinguished node
//! with no value sits above the real root (which hangs off the sentinel's
//! left link). The sentinel *is* the one-past-the-end position, which unifies
//! the empty-tree and end-of-sequence edge cases: stepping backward from
//! [`Set::end`] lands on the maximum element, and stepping forward from the
//! maximum lands on `end`.
//!
//! # Examples
//!
//! ```
//! use bstset::Set;
//!
//! let mut set = Set::new();
//!
//! for x in [5, 3, 8, 1, 4, 7, 9] {
//!     set.insert(x);
//! }
//!
//! // Sorted traversal, both ways.
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 3, 4, 5, 7, 8, 9]);
//! assert_eq!(set.iter().rev().next(), Some(&9));
//!
//! // Erasing hands back the position of the following element.
//! let next = set.erase(set.find(&5));
//! assert_eq!(set.get(next), Some(&7));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;

use crate::arena::{Arena, Node, NodeId, SENTINEL};

/// An ordered set of unique values, backed by an unbalanced binary search
/// tree whose nodes carry parent back-references.
///
/// Lookup-style operations return a [`Cursor`]; a cursor equal to
/// [`Set::end`] means "no such element". Operation cost is `O(height)`,
/// which is `O(n)` in the worst case since the tree does not rebalance
/// itself.
pub struct Set<T> {
    arena: Arena<T>,
}

/// A position inside a [`Set`]: either one of its elements or the
/// one-past-the-end position returned by [`Set::end`].
///
/// Cursors are cheap to copy and compare equal exactly when they refer to
/// the same node. A cursor is only meaningful for the set that produced it,
/// and stays valid until the element it refers to is erased; erasing one
/// element never invalidates cursors to the others.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Cursor(NodeId);

impl<T> Default for Set<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Set<T> {
    /// Generates a new, empty `Set`.
    pub fn new() -> Self {
        Set {
            arena: Arena::new(),
        }
    }

    /// Whether the set holds no elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstset::Set;
    ///
    /// let mut set = Set::new();
    /// assert!(set.is_empty());
    ///
    /// set.insert(1);
    /// assert!(!set.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.root().is_none()
    }

    /// Removes every element, keeping the allocated slots around for reuse.
    pub fn clear(&mut self) {
        let mut pending = Vec::new();
        pending.extend(self.root());
        while let Some(id) = pending.pop() {
            pending.extend(self.arena[id].left);
            pending.extend(self.arena[id].right);
            self.arena.free(id);
        }
        self.arena[SENTINEL].left = None;
    }

    /// The position of the smallest element, or [`Set::end`] if the set is
    /// empty.
    pub fn begin(&self) -> Cursor {
        match self.root() {
            Some(root) => Cursor(self.min_of(root)),
            None => self.end(),
        }
    }

    /// The one-past-the-end position.
    pub fn end(&self) -> Cursor {
        Cursor(SENTINEL)
    }

    /// The element at `pos`, or `None` if `pos` is [`Set::end`].
    ///
    /// # Examples
    ///
    /// ```
    /// use bstset::Set;
    ///
    /// let mut set = Set::new();
    /// let (pos, _) = set.insert(7);
    ///
    /// assert_eq!(set.get(pos), Some(&7));
    /// assert_eq!(set.get(set.end()), None);
    /// ```
    pub fn get(&self, pos: Cursor) -> Option<&T> {
        self.arena[pos.0].value.as_ref()
    }

    /// The position after `pos` in sorted order.
    ///
    /// Advancing [`Set::end`] is a contract violation; it is tolerated and
    /// returns `end` unchanged.
    pub fn next(&self, pos: Cursor) -> Cursor {
        if pos == self.end() {
            return pos;
        }
        Cursor(self.successor(pos.0))
    }

    /// The position before `pos` in sorted order. The predecessor of
    /// [`Set::end`] is the maximum element.
    ///
    /// Stepping before [`Set::begin`] is a contract violation; it is
    /// tolerated and returns the position unchanged.
    pub fn prev(&self, pos: Cursor) -> Cursor {
        match self.predecessor(pos.0) {
            Some(id) => Cursor(id),
            None => pos,
        }
    }

    /// A double-ended iterator over the elements in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstset::Set;
    ///
    /// let set: Set<i32> = [3, 1, 2].iter().copied().collect();
    ///
    /// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
    /// assert_eq!(set.iter().rev().copied().collect::<Vec<_>>(), [3, 2, 1]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            set: self,
            front: self.begin(),
            back: self.end(),
        }
    }

    fn root(&self) -> Option<NodeId> {
        self.arena[SENTINEL].left
    }

    /// The value stored at `id`, which must not be the sentinel.
    fn key(&self, id: NodeId) -> &T {
        self.arena[id]
            .value
            .as_ref()
            .expect("the sentinel holds no value")
    }

    fn min_of(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.arena[id].left {
            id = left;
        }
        id
    }

    /// The node following `id` in sorted order; the sentinel when `id` is
    /// the maximum. `id` must not be the sentinel.
    fn successor(&self, id: NodeId) -> NodeId {
        if let Some(right) = self.arena[id].right {
            return self.min_of(right);
        }
        let mut cur = id;
        loop {
            let parent = self.arena[cur]
                .parent
                .expect("walked above the sentinel looking for a successor");
            if self.arena[parent].left == Some(cur) {
                return parent;
            }
            cur = parent;
        }
    }

    /// The node preceding `id` in sorted order, or `None` when `id` is the
    /// first position. Works for the sentinel too: its left link is the
    /// root, so the ordinary descend-left-then-max rule yields the maximum.
    fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(left) = self.arena[id].left {
            let mut cur = left;
            while let Some(right) = self.arena[cur].right {
                cur = right;
            }
            return Some(cur);
        }
        let mut cur = id;
        loop {
            let parent = self.arena[cur].parent?;
            if self.arena[parent].right == Some(cur) {
                return Some(parent);
            }
            cur = parent;
        }
    }

    /// Swings the link in `parent` that points at `old` over to `new`.
    fn replace_child(&mut self, parent: NodeId, old: NodeId, new: Option<NodeId>) {
        if self.arena[parent].left == Some(old) {
            self.arena[parent].left = new;
        } else {
            debug_assert_eq!(self.arena[parent].right, Some(old));
            self.arena[parent].right = new;
        }
    }
}

impl<T> Set<T>
where
    T: Ord,
{
    /// Inserts `value`, returning its position and whether it was newly
    /// added. The set never stores duplicates: inserting a value that is
    /// already present leaves the set unchanged and reports `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstset::Set;
    ///
    /// let mut set = Set::new();
    ///
    /// let (pos, inserted) = set.insert(1);
    /// assert!(inserted);
    /// assert_eq!(set.get(pos), Some(&1));
    ///
    /// let (again, inserted) = set.insert(1);
    /// assert!(!inserted);
    /// assert_eq!(again, pos);
    /// ```
    pub fn insert(&mut self, value: T) -> (Cursor, bool) {
        let mut cur = match self.root() {
            Some(root) => root,
            None => {
                let id = self.arena.alloc(Node::leaf(value, SENTINEL));
                self.arena[SENTINEL].left = Some(id);
                return (Cursor(id), true);
            }
        };
        loop {
            match value.cmp(self.key(cur)) {
                Ordering::Less => match self.arena[cur].left {
                    Some(left) => cur = left,
                    None => {
                        let id = self.arena.alloc(Node::leaf(value, cur));
                        self.arena[cur].left = Some(id);
                        return (Cursor(id), true);
                    }
                },
                Ordering::Greater => match self.arena[cur].right {
                    Some(right) => cur = right,
                    None => {
                        let id = self.arena.alloc(Node::leaf(value, cur));
                        self.arena[cur].right = Some(id);
                        return (Cursor(id), true);
                    }
                },
                Ordering::Equal => return (Cursor(cur), false),
            }
        }
    }

    /// The position of `value`, or [`Set::end`] if it is not present.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstset::Set;
    ///
    /// let mut set = Set::new();
    /// set.insert(1);
    ///
    /// assert_eq!(set.get(set.find(&1)), Some(&1));
    /// assert_eq!(set.find(&42), set.end());
    /// ```
    pub fn find(&self, value: &T) -> Cursor {
        let mut cur = self.root();
        while let Some(id) = cur {
            match value.cmp(self.key(id)) {
                Ordering::Less => cur = self.arena[id].left,
                Ordering::Greater => cur = self.arena[id].right,
                Ordering::Equal => return Cursor(id),
            }
        }
        self.end()
    }

    /// The position of the smallest element that is not less than `value`:
    /// `value` itself when present, otherwise the same as
    /// [`Set::upper_bound`].
    pub fn lower_bound(&self, value: &T) -> Cursor {
        let found = self.find(value);
        if found != self.end() {
            found
        } else {
            self.upper_bound(value)
        }
    }

    /// The position of the smallest element strictly greater than `value`,
    /// or [`Set::end`] if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstset::Set;
    ///
    /// let set: Set<i32> = [1, 3, 5].iter().copied().collect();
    ///
    /// assert_eq!(set.get(set.upper_bound(&2)), Some(&3));
    /// assert_eq!(set.get(set.upper_bound(&3)), Some(&5));
    /// assert_eq!(set.upper_bound(&5), set.end());
    /// ```
    pub fn upper_bound(&self, value: &T) -> Cursor {
        let mut cur = self.root();
        // Tightest strictly-greater node seen so far; every left turn
        // visits one.
        let mut above = self.end();
        while let Some(id) = cur {
            if *value < *self.key(id) {
                above = Cursor(id);
                cur = self.arena[id].left;
            } else {
                cur = self.arena[id].right;
            }
        }
        above
    }

    /// Erases the element at `pos` and returns the position of the element
    /// that followed it. Erasing [`Set::end`] does nothing and returns
    /// `end`.
    ///
    /// The returned cursor is computed before the tree changes shape, so the
    /// caller can keep walking forward without re-seeking. Cursors to other
    /// elements remain valid: when the erased node has two children its
    /// in-order successor node is relinked into the vacated position rather
    /// than having its value moved.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstset::Set;
    ///
    /// let mut set: Set<i32> = [1, 2, 3].iter().copied().collect();
    ///
    /// let next = set.erase(set.find(&2));
    /// assert_eq!(set.get(next), Some(&3));
    /// assert_eq!(set.find(&2), set.end());
    /// ```
    pub fn erase(&mut self, pos: Cursor) -> Cursor {
        if pos == self.end() {
            return pos;
        }
        let id = pos.0;
        let next = Cursor(self.successor(id));
        let parent = self.arena[id]
            .parent
            .expect("every non-sentinel node has a parent");
        match (self.arena[id].left, self.arena[id].right) {
            (None, None) => {
                self.replace_child(parent, id, None);
            }
            (Some(child), None) | (None, Some(child)) => {
                self.replace_child(parent, id, Some(child));
                self.arena[child].parent = Some(parent);
            }
            (Some(_), Some(_)) => {
                // With two children the precomputed successor is the minimum
                // of the right subtree and has no left child. Detach it,
                // then relink it into the erased node's position.
                let succ = next.0;
                let succ_parent = self.arena[succ]
                    .parent
                    .expect("the successor hangs below the erased node");
                let succ_right = self.arena[succ].right;
                self.replace_child(succ_parent, succ, succ_right);
                if let Some(right) = succ_right {
                    self.arena[right].parent = Some(succ_parent);
                }

                // Re-read the erased node's links: the detach above rewrote
                // its right link when the successor was its direct child.
                let left = self.arena[id].left;
                let right = self.arena[id].right;
                self.arena[succ].left = left;
                if let Some(left) = left {
                    self.arena[left].parent = Some(succ);
                }
                self.arena[succ].right = right;
                if let Some(right) = right {
                    self.arena[right].parent = Some(succ);
                }
                self.arena[succ].parent = Some(parent);
                self.replace_child(parent, id, Some(succ));
            }
        }
        self.arena.free(id);
        next
    }
}

impl<T> Clone for Set<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        // Links are arena-relative indices, so cloning the slots clones the
        // whole node graph with no sharing and no fixups.
        Set {
            arena: self.arena.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        // Clone into a temporary first: if the clone panics partway, `self`
        // is left unmodified.
        let mut tmp = source.clone();
        std::mem::swap(self, &mut tmp);
    }
}

impl<T> fmt::Debug for Set<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> Extend<T> for Set<T>
where
    T: Ord,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T> std::iter::FromIterator<T> for Set<T>
where
    T: Ord,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Set::new();
        set.extend(iter);
        set
    }
}

/// A double-ended iterator over a [`Set`]'s elements in sorted order.
///
/// Created by [`Set::iter`]. Walks the tree through parent and child links
/// alone, carrying no stack of its own.
pub struct Iter<'a, T> {
    set: &'a Set<T>,
    front: Cursor,
    /// Exclusive: the next element yielded from the back lies just before
    /// this position.
    back: Cursor,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        let id = self.front.0;
        self.front = Cursor(self.set.successor(id));
        Some(self.set.key(id))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        let id = self
            .set
            .predecessor(self.back.0)
            .expect("a non-empty range has a predecessor");
        self.back = Cursor(id);
        Some(self.set.key(id))
    }
}

impl<'a, T> FusedIterator for Iter<'a, T> {}

impl<'a, T> IntoIterator for &'a Set<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(xs: &[i32]) -> Set<i32> {
        xs.iter().copied().collect()
    }

    fn contents(set: &Set<i32>) -> Vec<i32> {
        set.iter().copied().collect()
    }

    #[test]
    fn empty_set_basics() {
        let set: Set<i32> = Set::new();

        assert!(set.is_empty());
        assert_eq!(set.begin(), set.end());
        assert_eq!(set.find(&1), set.end());
        assert_eq!(set.get(set.end()), None);
        assert!(contents(&set).is_empty());
    }

    #[test]
    fn erasing_end_is_a_noop() {
        let mut set = set_of(&[1, 2]);

        assert_eq!(set.erase(set.end()), set.end());
        assert_eq!(contents(&set), [1, 2]);

        let mut empty: Set<i32> = Set::new();
        assert_eq!(empty.erase(empty.end()), empty.end());
    }

    #[test]
    fn traversal_is_sorted() {
        let set = set_of(&[5, 3, 8, 1, 4, 7, 9]);

        assert_eq!(contents(&set), [1, 3, 4, 5, 7, 8, 9]);
        assert_eq!(set.iter().rev().copied().collect::<Vec<_>>(), [9, 8, 7, 5, 4, 3, 1]);
    }

    #[test]
    fn duplicate_insert_reports_existing_position() {
        let mut set = set_of(&[2, 1, 3]);

        let (pos, inserted) = set.insert(2);
        assert!(!inserted);
        assert_eq!(pos, set.find(&2));
        assert_eq!(contents(&set), [1, 2, 3]);
    }

    #[test]
    fn erase_leaf() {
        let mut set = set_of(&[5, 3, 8]);

        let next = set.erase(set.find(&3));
        assert_eq!(set.get(next), Some(&5));
        assert_eq!(contents(&set), [5, 8]);
    }

    #[test]
    fn erase_with_only_left_child() {
        // 8 hangs right of 5 and carries only a left child (7).
        let mut set = set_of(&[5, 8, 7]);

        let next = set.erase(set.find(&8));
        assert_eq!(next, set.end());
        assert_eq!(contents(&set), [5, 7]);
    }

    #[test]
    fn erase_with_only_right_child() {
        let mut set = set_of(&[5, 3, 4]);

        let next = set.erase(set.find(&3));
        assert_eq!(set.get(next), Some(&4));
        assert_eq!(contents(&set), [4, 5]);
    }

    #[test]
    fn erase_with_two_children() {
        let mut set = set_of(&[5, 3, 8, 7, 9]);

        let next = set.erase(set.find(&8));
        assert_eq!(set.get(next), Some(&9));
        assert_eq!(contents(&set), [3, 5, 7, 9]);
    }

    #[test]
    fn erase_root_with_two_children() {
        let mut set = set_of(&[5, 3, 8, 1, 4, 7, 9]);

        let next = set.erase(set.find(&5));
        assert_eq!(set.get(next), Some(&7));
        assert_eq!(contents(&set), [1, 3, 4, 7, 8, 9]);
    }

    #[test]
    fn erase_where_successor_is_direct_right_child() {
        // 8's right child 9 is also its in-order successor.
        let mut set = set_of(&[5, 8, 7, 9, 10]);

        let next = set.erase(set.find(&8));
        assert_eq!(set.get(next), Some(&9));
        assert_eq!(contents(&set), [5, 7, 9, 10]);
    }

    #[test]
    fn erase_returns_successor_while_draining() {
        let mut set = set_of(&[5, 3, 8, 1, 4, 7, 9]);

        let mut drained = Vec::new();
        while !set.is_empty() {
            let first = *set.get(set.begin()).unwrap();
            let next = set.erase(set.begin());
            drained.push(first);
            assert_eq!(next, set.begin());
        }

        assert_eq!(drained, [1, 3, 4, 5, 7, 8, 9]);
    }

    #[test]
    fn bound_queries() {
        let set = set_of(&[5, 3, 8, 1, 4, 7, 9]);

        // Present: lower_bound is find, upper_bound is the next element.
        assert_eq!(set.lower_bound(&4), set.find(&4));
        assert_eq!(set.get(set.upper_bound(&4)), Some(&5));

        // Absent: both bounds agree on the next greater element.
        assert_eq!(set.lower_bound(&6), set.upper_bound(&6));
        assert_eq!(set.get(set.lower_bound(&6)), Some(&7));

        // Off both ends.
        assert_eq!(set.get(set.lower_bound(&0)), Some(&1));
        assert_eq!(set.upper_bound(&9), set.end());
        assert_eq!(set.lower_bound(&10), set.end());
    }

    #[test]
    fn cursor_navigation_is_symmetric() {
        let set = set_of(&[2, 1, 3]);

        let two = set.find(&2);
        assert_eq!(set.next(set.prev(two)), two);
        assert_eq!(set.prev(set.next(two)), two);

        // The predecessor of end is the maximum.
        assert_eq!(set.get(set.prev(set.end())), Some(&3));
        assert_eq!(set.next(set.find(&3)), set.end());

        // Contract-violating steps saturate.
        assert_eq!(set.prev(set.begin()), set.begin());
        assert_eq!(set.next(set.end()), set.end());
    }

    #[test]
    fn iteration_meets_in_the_middle() {
        let set = set_of(&[1, 2, 3, 4]);
        let mut iter = set.iter();

        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next_back(), Some(&3));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn cursors_survive_unrelated_erases() {
        let mut set = set_of(&[5, 3, 8, 7, 9]);

        let seven = set.find(&7);
        // Erasing 5 (two children) relinks the successor node 7 higher up
        // in the tree without touching its identity.
        set.erase(set.find(&5));
        assert_eq!(set.get(seven), Some(&7));
        assert_eq!(seven, set.find(&7));

        // A plain leaf erase elsewhere leaves it alone too.
        set.erase(set.find(&9));
        assert_eq!(set.get(seven), Some(&7));
    }

    #[test]
    fn clone_is_independent() {
        let original = set_of(&[2, 1, 3]);
        let mut copy = original.clone();

        copy.insert(4);
        copy.erase(copy.find(&1));

        assert_eq!(contents(&original), [1, 2, 3]);
        assert_eq!(contents(&copy), [2, 3, 4]);
    }

    #[test]
    fn clone_from_replaces_contents() {
        let source = set_of(&[4, 5, 6]);
        let mut target = set_of(&[1, 2, 3]);

        target.clone_from(&source);

        assert_eq!(contents(&target), [4, 5, 6]);
        assert_eq!(contents(&source), [4, 5, 6]);
    }

    #[test]
    fn swap_exchanges_contents() {
        let mut a = set_of(&[1, 2]);
        let mut b = set_of(&[3, 4, 5]);

        std::mem::swap(&mut a, &mut b);

        assert_eq!(contents(&a), [3, 4, 5]);
        assert_eq!(contents(&b), [1, 2]);
    }

    #[test]
    fn clear_allows_reuse() {
        let mut set = set_of(&[5, 3, 8]);

        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.begin(), set.end());

        set.insert(2);
        set.insert(1);
        assert_eq!(contents(&set), [1, 2]);
    }

    #[test]
    fn degenerate_ascending_chain() {
        // Strictly ascending input produces a right-leaning linked list;
        // every walk here must stay iterative to survive the depth.
        let n = 10_000;
        let mut set = Set::new();
        for x in 0..n {
            set.insert(x);
        }

        assert!(set.iter().copied().eq(0..n));
        assert!(set.iter().rev().copied().eq((0..n).rev()));
        assert_eq!(set.get(set.find(&(n - 1))), Some(&(n - 1)));
        assert_eq!(set.get(set.upper_bound(&0)), Some(&1));

        let next = set.erase(set.find(&0));
        assert_eq!(set.get(next), Some(&1));
        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn debug_formats_as_a_set() {
        let set = set_of(&[2, 1]);
        assert_eq!(format!("{:?}", set), "{1, 2}");
    }
}
