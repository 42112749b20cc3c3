use core::borrow::Borrow;
use core::cmp::Ordering;

use super::arena::Arena;
use super::handle::NodeId;
use super::node::{Node, SearchResult};

/// The core B-tree engine backing `BTree`.
///
/// All nodes live in the arena; parents hold `NodeId` links to their children
/// and every link is owned by exactly one parent. The order is fixed at
/// construction (validated by the public wrapper) and drives the capacity
/// arithmetic of every split, borrow, and merge below.
pub(crate) struct RawBTree<K> {
    nodes: Arena<Node<K>>,
    root: Option<NodeId>,
    order: usize,
    len: usize,
}

impl<K> RawBTree<K> {
    pub(crate) const fn new(order: usize) -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            order,
            len: 0,
        }
    }

    pub(crate) const fn order(&self) -> usize {
        self.order
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum keys per node.
    #[inline]
    fn max_keys(&self) -> usize {
        self.order - 1
    }

    /// Minimum keys for a non-root node: `ceil(M / 2) - 1`.
    #[inline]
    fn min_keys(&self) -> usize {
        self.order.div_ceil(2) - 1
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Number of edges from the root down to any leaf; 0 for an empty tree.
    pub(crate) fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root;
        while let Some(id) = current {
            let node = self.nodes.get(id);
            if node.is_leaf() {
                break;
            }
            height += 1;
            current = Some(node.child(0));
        }
        height
    }

    /// Collects references to every key in ascending order.
    pub(crate) fn keys_in_order(&self) -> Vec<&K> {
        let mut out = Vec::with_capacity(self.len);
        if let Some(root) = self.root {
            self.collect_in_order(root, &mut out);
        }
        out
    }

    fn collect_in_order<'a>(&'a self, id: NodeId, out: &mut Vec<&'a K>) {
        let node = self.nodes.get(id);
        for i in 0..node.key_count() {
            if !node.is_leaf() {
                self.collect_in_order(node.child(i), out);
            }
            out.push(node.key(i));
        }
        if !node.is_leaf() {
            self.collect_in_order(node.child(node.key_count()), out);
        }
    }

    pub(crate) fn min_key(&self) -> Option<&K> {
        self.root.map(|id| self.min_in_subtree(id))
    }

    pub(crate) fn max_key(&self) -> Option<&K> {
        self.root.map(|id| self.max_in_subtree(id))
    }

    /// Smallest key of a non-empty subtree, by descending leftmost.
    fn min_in_subtree(&self, mut id: NodeId) -> &K {
        loop {
            let node = self.nodes.get(id);
            if node.is_leaf() {
                return node.first_key().expect("`RawBTree::min_in_subtree()` - node has no keys!");
            }
            id = node.child(0);
        }
    }

    /// Largest key of a non-empty subtree, by descending rightmost.
    fn max_in_subtree(&self, mut id: NodeId) -> &K {
        loop {
            let node = self.nodes.get(id);
            if node.is_leaf() {
                return node.last_key().expect("`RawBTree::max_in_subtree()` - node has no keys!");
            }
            id = node.child(node.child_count() - 1);
        }
    }
}

impl<K: Ord> RawBTree<K> {
    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(id) = current {
            let node = self.nodes.get(id);
            match node.search(key) {
                SearchResult::Found(_) => return true,
                SearchResult::NotFound(index) => {
                    if node.is_leaf() {
                        return false;
                    }
                    current = Some(node.child(index));
                }
            }
        }
        false
    }

    /// Collects every key in `[lo, hi]` in ascending order, pruning subtrees
    /// whose open key interval cannot intersect the range.
    pub(crate) fn range_search(&self, lo: &K, hi: &K) -> Vec<K>
    where
        K: Clone,
    {
        let mut out = Vec::new();
        if let Some(root) = self.root {
            self.range_into(root, lo, hi, &mut out);
        }
        out
    }

    fn range_into(&self, id: NodeId, lo: &K, hi: &K, out: &mut Vec<K>)
    where
        K: Clone,
    {
        let node = self.nodes.get(id);
        let count = node.key_count();
        for i in 0..=count {
            if !node.is_leaf() {
                // Child i covers the open interval (keys[i-1], keys[i]).
                let above_lo = i == count || node.key(i) > lo;
                let below_hi = i == 0 || node.key(i - 1) < hi;
                if above_lo && below_hi {
                    self.range_into(node.child(i), lo, hi, out);
                }
            }
            if i < count {
                let key = node.key(i);
                if key > hi {
                    return;
                }
                if key >= lo {
                    out.push(key.clone());
                }
            }
        }
    }

    /// Inserts a key, keeping the tree a set: returns `false` without
    /// structural change in key content if the key is already present.
    ///
    /// Splitting is preemptive: a full child is split before descent so the
    /// parent always has room for the promoted median.
    pub(crate) fn insert(&mut self, key: K) -> bool {
        // Resolve duplicates before touching the structure: a preemptive
        // split must always be followed by an insertion so the repair pass
        // below can even out the halves.
        if self.contains(&key) {
            return false;
        }

        let Some(root) = self.root else {
            let mut node = Node::leaf();
            node.insert_key(0, key);
            self.root = Some(self.nodes.alloc(node));
            self.len = 1;
            return true;
        };

        let mut root = root;
        if self.nodes.get(root).key_count() == self.max_keys() {
            // Grow upward: fresh root with the old root as its only child,
            // then split that child so the descent below finds room.
            let mut new_root = Node::internal();
            new_root.push_child(root);
            let new_root_id = self.nodes.alloc(new_root);
            self.split_child(new_root_id, 0);
            self.root = Some(new_root_id);
            root = new_root_id;
        }

        let inserted = self.insert_non_full(root, key);
        if inserted {
            self.len += 1;
        }

        // A merge in the repair pass can drain a freshly grown root down to
        // zero keys; hand the tree to its only child, as removal does.
        if self.nodes.get(root).key_count() == 0 && !self.nodes.get(root).is_leaf() {
            self.root = Some(self.nodes.get(root).child(0));
            self.nodes.free(root);
        }

        inserted
    }

    fn insert_non_full(&mut self, id: NodeId, key: K) -> bool {
        let (mut index, is_leaf) = {
            let node = self.nodes.get(id);
            match node.search(&key) {
                SearchResult::Found(_) => return false,
                SearchResult::NotFound(index) => (index, node.is_leaf()),
            }
        };

        if is_leaf {
            debug_assert!(self.nodes.get(id).key_count() < self.max_keys());
            self.nodes.get_mut(id).insert_key(index, key);
            return true;
        }

        let child = self.nodes.get(id).child(index);
        if self.nodes.get(child).key_count() == self.max_keys() {
            self.split_child(id, index);
            // The promoted median now sits at `index`; re-aim the descent.
            match key.cmp(self.nodes.get(id).key(index)) {
                Ordering::Equal => return false,
                Ordering::Greater => index += 1,
                Ordering::Less => {}
            }
        }

        let target = self.nodes.get(id).child(index);
        let inserted = self.insert_non_full(target, key);
        if inserted {
            self.repair_after_insert(id, index);
        }
        inserted
    }

    /// Splits the full child at `index` under `parent`, promoting the key at
    /// the split point into the parent.
    ///
    /// The split point is `(M - 1) / 2`. When the right half would come out
    /// empty (order 3: two keys, one promoted) the split point shifts down by
    /// one so the right half receives exactly one key; the post-insert
    /// neighbor repair then evens out whichever half ended up short.
    fn split_child(&mut self, parent: NodeId, index: usize) {
        let child_id = self.nodes.get(parent).child(index);
        let full = self.max_keys();
        let mut mid = full / 2;
        if full - mid == 1 && mid > 0 {
            mid -= 1;
        }

        let (promoted, right) = self.nodes.get_mut(child_id).split_off(mid);
        let right_id = self.nodes.alloc(right);

        let parent_node = self.nodes.get_mut(parent);
        debug_assert!(parent_node.key_count() < full);
        parent_node.insert_key(index, promoted);
        parent_node.insert_child(index + 1, right_id);
    }

    /// After a recursive insert into child `index`, re-checks that child and
    /// its immediate siblings for key counts below the minimum and repairs
    /// any underfull one. An odd-order split promotes one key out of an even
    /// total, so one half always lands a single key short; the insertion
    /// itself tops it up when the split node was a leaf, and this pass covers
    /// the remaining cases by borrowing from a sibling with surplus keys or,
    /// failing that, merging the lopsided halves back together.
    fn repair_after_insert(&mut self, parent: NodeId, index: usize) {
        let mut i = index.saturating_sub(1);
        // A merge shifts later children down by one, so bounds are re-read
        // every iteration.
        while i <= index + 1 && i < self.nodes.get(parent).child_count() {
            let child = self.nodes.get(parent).child(i);
            if self.nodes.get(child).key_count() < self.min_keys() {
                i = self.fix_underflow(parent, i);
            }
            i += 1;
        }
    }

    /// Repairs the underfull child at `index`, in priority order: borrow from
    /// the left sibling, borrow from the right sibling, merge into the left
    /// sibling, merge the right sibling into the child. Returns the index now
    /// holding the child's key range (it shifts down after a left merge).
    ///
    /// A merge only happens when the result fits in a node. It always does
    /// once the child is genuinely below minimum (`(min - 1) + 1 + min <=
    /// M - 1` for every order), but the preemptive fix on the removal descent
    /// can call this with the child still at minimum, where merging two
    /// at-minimum siblings would overflow an odd-order node; the child is
    /// then left as is and the re-check after the recursive removal repairs
    /// it.
    fn fix_underflow(&mut self, parent: NodeId, index: usize) -> usize {
        if index > 0 {
            let left = self.nodes.get(parent).child(index - 1);
            if self.nodes.get(left).key_count() > self.min_keys() {
                self.borrow_from_left(parent, index);
                return index;
            }
        }
        let child_count = self.nodes.get(parent).child_count();
        if index + 1 < child_count {
            let right = self.nodes.get(parent).child(index + 1);
            if self.nodes.get(right).key_count() > self.min_keys() {
                self.borrow_from_right(parent, index);
                return index;
            }
        }

        let child = self.nodes.get(parent).child(index);
        let child_keys = self.nodes.get(child).key_count();
        if index > 0 {
            let left = self.nodes.get(parent).child(index - 1);
            if self.nodes.get(left).key_count() + 1 + child_keys <= self.max_keys() {
                self.merge_children(parent, index - 1);
                return index - 1;
            }
        }
        if index + 1 < child_count {
            let right = self.nodes.get(parent).child(index + 1);
            if child_keys + 1 + self.nodes.get(right).key_count() <= self.max_keys() {
                self.merge_children(parent, index);
            }
        }
        index
    }

    /// Merges `children[index + 1]` into `children[index]`: the separator at
    /// `index` drops into the merged node, the parent loses that key and the
    /// right child link, and the right node is freed.
    fn merge_children(&mut self, parent: NodeId, index: usize) {
        let left_id = self.nodes.get(parent).child(index);
        let right_id = self.nodes.get(parent).child(index + 1);

        let parent_node = self.nodes.get_mut(parent);
        let separator = parent_node.remove_key(index);
        parent_node.remove_child(index + 1);

        let right = self.nodes.take(right_id);
        let left = self.nodes.get_mut(left_id);
        left.absorb(separator, right);
        debug_assert!(left.key_count() <= self.order - 1);
    }

    /// Rotates one key from the left sibling through the parent separator
    /// into child `index` (and carries the sibling's last child link across
    /// when the nodes are internal).
    fn borrow_from_left(&mut self, parent: NodeId, index: usize) {
        let left_id = self.nodes.get(parent).child(index - 1);
        let child_id = self.nodes.get(parent).child(index);

        let left = self.nodes.get_mut(left_id);
        let lent_key = left.pop_key().expect("`RawBTree::borrow_from_left()` - left sibling has no key to lend!");
        let lent_child = if left.is_leaf() { None } else { left.pop_child() };

        let separator = self.nodes.get_mut(parent).replace_key(index - 1, lent_key);

        let child = self.nodes.get_mut(child_id);
        child.insert_key(0, separator);
        if let Some(lent) = lent_child {
            child.insert_child(0, lent);
        }
    }

    /// Mirror of `borrow_from_left` for the right sibling.
    fn borrow_from_right(&mut self, parent: NodeId, index: usize) {
        let right_id = self.nodes.get(parent).child(index + 1);
        let child_id = self.nodes.get(parent).child(index);

        let right = self.nodes.get_mut(right_id);
        let lent_key = right.remove_key(0);
        let lent_child = if right.is_leaf() { None } else { Some(right.remove_child(0)) };

        let separator = self.nodes.get_mut(parent).replace_key(index, lent_key);

        let child = self.nodes.get_mut(child_id);
        let count = child.key_count();
        child.insert_key(count, separator);
        if let Some(lent) = lent_child {
            child.push_child(lent);
        }
    }
}

impl<K: Ord + Clone> RawBTree<K> {
    /// Removes a key if present. Absent keys are a silent no-op (`false`).
    pub(crate) fn remove(&mut self, key: &K) -> bool {
        let Some(root) = self.root else {
            return false;
        };

        let removed = self.remove_from(root, key);
        if removed {
            self.len -= 1;
        }

        // Root collapse: a drained root hands the tree to its only child, or
        // empties the tree outright.
        if self.nodes.get(root).key_count() == 0 {
            if self.nodes.get(root).is_leaf() {
                self.root = None;
            } else {
                self.root = Some(self.nodes.get(root).child(0));
            }
            self.nodes.free(root);
        }

        removed
    }

    fn remove_from(&mut self, id: NodeId, key: &K) -> bool {
        let (found, index, is_leaf) = {
            let node = self.nodes.get(id);
            match node.search(key) {
                SearchResult::Found(index) => (true, index, node.is_leaf()),
                SearchResult::NotFound(index) => (false, index, node.is_leaf()),
            }
        };

        if found {
            if is_leaf {
                self.nodes.get_mut(id).remove_key(index);
            } else {
                self.remove_internal_key(id, index);
            }
            return true;
        }

        if is_leaf {
            return false;
        }

        // Preemptive repair mirrors the insert path's preemptive split: give
        // the child a key to spare before descending, where possible. The
        // re-check below covers the case where no safe repair existed.
        let mut child_index = index;
        let child = self.nodes.get(id).child(child_index);
        if self.nodes.get(child).key_count() <= self.min_keys() {
            child_index = self.fix_underflow(id, child_index);
        }

        let child = self.nodes.get(id).child(child_index);
        let removed = self.remove_from(child, key);

        // The recursive call can still leave the child short (substitution
        // deletes below the minimum before merging); repair once more.
        let child = self.nodes.get(id).child(child_index);
        if self.nodes.get(child).key_count() < self.min_keys() {
            self.fix_underflow(id, child_index);
        }

        removed
    }

    /// Removes the key at `index` of an internal node by substituting its
    /// predecessor or successor, preferring whichever flanking child has a
    /// key to spare. When both sit at the minimum, the predecessor is
    /// substituted and deleted, then the two children merge around it if the
    /// deletion left the child short.
    fn remove_internal_key(&mut self, id: NodeId, index: usize) {
        let left = self.nodes.get(id).child(index);
        let right = self.nodes.get(id).child(index + 1);
        let min = self.min_keys();

        if self.nodes.get(left).key_count() > min {
            let predecessor = self.max_in_subtree(left).clone();
            self.nodes.get_mut(id).replace_key(index, predecessor.clone());
            self.remove_from(left, &predecessor);
        } else if self.nodes.get(right).key_count() > min {
            let successor = self.min_in_subtree(right).clone();
            self.nodes.get_mut(id).replace_key(index, successor.clone());
            self.remove_from(right, &successor);
        } else {
            let predecessor = self.max_in_subtree(left).clone();
            self.nodes.get_mut(id).replace_key(index, predecessor.clone());
            self.remove_from(left, &predecessor);
            // An internal left child can lose the predecessor deep in its
            // subtree without shrinking itself; merging an intact pair would
            // overflow an odd-order node, so merge only on actual underflow.
            if self.nodes.get(left).key_count() < min {
                self.merge_children(id, index);
            }
        }
    }
}

// Structural validation. Read-only; exercised from tests, never from the
// mutating operations themselves.
impl<K: Ord> RawBTree<K> {
    /// Checks every structural invariant:
    /// the inorder key sequence is strictly ascending and matches `len`,
    /// key counts respect the root and non-root bounds, internal nodes carry
    /// exactly `count + 1` children, leaves carry none, and all leaves sit at
    /// the same depth. Strict global ascent plus in-node ordering also pins
    /// each subtree inside its separators' open interval.
    pub(crate) fn check_invariants(&self) -> bool {
        let Some(root) = self.root else {
            return self.len == 0 && self.nodes.is_empty();
        };

        let keys = self.keys_in_order();
        if keys.len() != self.len {
            return false;
        }
        if keys.windows(2).any(|pair| pair[0] >= pair[1]) {
            return false;
        }

        let mut leaf_depth = None;
        self.check_node(root, 0, true, &mut leaf_depth)
    }

    fn check_node(&self, id: NodeId, depth: usize, is_root: bool, leaf_depth: &mut Option<usize>) -> bool {
        let node = self.nodes.get(id);
        let count = node.key_count();

        let min = if is_root { 1 } else { self.min_keys() };
        if count < min || count > self.max_keys() {
            return false;
        }
        for i in 1..count {
            if node.key(i - 1) >= node.key(i) {
                return false;
            }
        }

        if node.is_leaf() {
            if node.child_count() != 0 {
                return false;
            }
            match *leaf_depth {
                None => {
                    *leaf_depth = Some(depth);
                    true
                }
                Some(expected) => depth == expected,
            }
        } else {
            if node.child_count() != count + 1 {
                return false;
            }
            (0..=count).all(|i| self.check_node(node.child(i), depth + 1, false, leaf_depth))
        }
    }
}
