use core::borrow::Borrow;
use core::mem;

use smallvec::SmallVec;

use super::handle::NodeId;

/// Inline key capacity; orders up to 9 stay free of per-node heap spill.
const INLINE_KEYS: usize = 8;
const INLINE_CHILDREN: usize = INLINE_KEYS + 1;

/// A single B-tree node: ordered keys plus child links.
///
/// A node of a tree with order `M` holds at most `M - 1` keys. A leaf has no
/// child links; an internal node holds exactly `key_count() + 1`. The hard
/// capacity bound is enforced by the engine (nodes are split before they can
/// overflow) and checked by the validator, so the node itself only maintains
/// ordering within its own slots.
pub(crate) struct Node<K> {
    keys: SmallVec<[K; INLINE_KEYS]>,
    children: SmallVec<[NodeId; INLINE_CHILDREN]>,
    leaf: bool,
}

/// Result of searching for a key within one node.
pub(crate) enum SearchResult {
    /// Key sits at the given slot.
    Found(usize),
    /// Key is absent; the slot is where it would be inserted, which is also
    /// the index of the child to descend into.
    NotFound(usize),
}

impl<K> Node<K> {
    pub(crate) fn leaf() -> Self {
        Self {
            keys: SmallVec::new(),
            children: SmallVec::new(),
            leaf: true,
        }
    }

    pub(crate) fn internal() -> Self {
        Self {
            keys: SmallVec::new(),
            children: SmallVec::new(),
            leaf: false,
        }
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.leaf
    }

    #[inline]
    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub(crate) fn child_count(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub(crate) fn key(&self, index: usize) -> &K {
        &self.keys[index]
    }

    #[inline]
    pub(crate) fn first_key(&self) -> Option<&K> {
        self.keys.first()
    }

    #[inline]
    pub(crate) fn last_key(&self) -> Option<&K> {
        self.keys.last()
    }

    #[inline]
    pub(crate) fn child(&self, index: usize) -> NodeId {
        self.children[index]
    }

    pub(crate) fn insert_key(&mut self, index: usize, key: K) {
        self.keys.insert(index, key);
    }

    pub(crate) fn remove_key(&mut self, index: usize) -> K {
        self.keys.remove(index)
    }

    pub(crate) fn pop_key(&mut self) -> Option<K> {
        self.keys.pop()
    }

    /// Swaps a new key into a slot, returning the old one.
    pub(crate) fn replace_key(&mut self, index: usize, key: K) -> K {
        mem::replace(&mut self.keys[index], key)
    }

    pub(crate) fn insert_child(&mut self, index: usize, child: NodeId) {
        self.children.insert(index, child);
    }

    pub(crate) fn remove_child(&mut self, index: usize) -> NodeId {
        self.children.remove(index)
    }

    pub(crate) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    pub(crate) fn pop_child(&mut self) -> Option<NodeId> {
        self.children.pop()
    }

    /// Searches this node's keys for the first slot holding a key `>= key`.
    #[inline]
    pub(crate) fn search<Q>(&self, key: &Q) -> SearchResult
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.keys.binary_search_by(|k| k.borrow().cmp(key)) {
            Ok(index) => SearchResult::Found(index),
            Err(index) => SearchResult::NotFound(index),
        }
    }

    /// Splits the node at `mid`: keys `[0, mid)` stay, `keys[mid]` is promoted
    /// to the caller, and everything above moves into the returned right node
    /// (along with the corresponding child links when internal).
    pub(crate) fn split_off(&mut self, mid: usize) -> (K, Node<K>) {
        let mut right = if self.leaf { Node::leaf() } else { Node::internal() };
        right.keys = self.keys.drain(mid + 1..).collect();
        if !self.leaf {
            right.children = self.children.drain(mid + 1..).collect();
        }
        let promoted = self.keys.pop().expect("`Node::split_off()` - split of a node with no key to promote!");
        (promoted, right)
    }

    /// Concatenates `separator` and a right sibling's contents onto this node.
    /// The sibling must already be unlinked from its parent.
    pub(crate) fn absorb(&mut self, separator: K, mut right: Node<K>) {
        self.keys.push(separator);
        self.keys.append(&mut right.keys);
        self.children.append(&mut right.children);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_with(keys: &[i32]) -> Node<i32> {
        let mut node = Node::leaf();
        for (i, &k) in keys.iter().enumerate() {
            node.insert_key(i, k);
        }
        node
    }

    #[test]
    fn search_reports_slot() {
        let node = leaf_with(&[10, 20, 30]);
        assert!(matches!(node.search(&20), SearchResult::Found(1)));
        assert!(matches!(node.search(&5), SearchResult::NotFound(0)));
        assert!(matches!(node.search(&25), SearchResult::NotFound(2)));
        assert!(matches!(node.search(&40), SearchResult::NotFound(3)));
    }

    #[test]
    fn split_off_promotes_middle_key() {
        let mut node = leaf_with(&[1, 2, 3, 4, 5]);
        let (promoted, right) = node.split_off(2);
        assert_eq!(promoted, 3);
        assert_eq!(node.key_count(), 2);
        assert_eq!(right.key_count(), 2);
        assert_eq!(*right.key(0), 4);
    }

    #[test]
    fn split_off_at_zero_leaves_left_empty() {
        let mut node = leaf_with(&[1, 2]);
        let (promoted, right) = node.split_off(0);
        assert_eq!(promoted, 1);
        assert_eq!(node.key_count(), 0);
        assert_eq!(right.key_count(), 1);
        assert_eq!(*right.key(0), 2);
    }

    #[test]
    fn absorb_concatenates() {
        let mut left = leaf_with(&[1, 2]);
        let right = leaf_with(&[4, 5]);
        left.absorb(3, right);
        assert_eq!(left.key_count(), 5);
        assert_eq!(*left.key(2), 3);
        assert_eq!(*left.last_key().unwrap(), 5);
    }

    #[test]
    fn split_off_moves_children_for_internal_nodes() {
        let mut node: Node<i32> = Node::internal();
        for (i, k) in [1, 2, 3].into_iter().enumerate() {
            node.insert_key(i, k);
        }
        for i in 0..4 {
            node.push_child(NodeId::from_index(i));
        }
        let (promoted, right) = node.split_off(1);
        assert_eq!(promoted, 2);
        assert_eq!(node.key_count(), 1);
        assert_eq!(node.child_count(), 2);
        assert_eq!(right.key_count(), 1);
        assert_eq!(right.child_count(), 2);
        assert_eq!(right.child(0), NodeId::from_index(2));
    }
}
