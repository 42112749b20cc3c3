use core::borrow::Borrow;
use core::fmt;
use core::fmt::Write as _;

use crate::error::Error;
use crate::raw::RawBTree;

/// An ordered set of unique keys stored as a B-tree of configurable order.
///
/// The order `M` is the maximum number of children an internal node may have;
/// every node holds at most `M - 1` keys and every non-root node at least
/// `ceil(M / 2) - 1`. The order is fixed at construction and must be at least
/// 3. All operations on the search path are `O(log n)`.
///
/// Keys only need a total order ([`Ord`]); a handful of operations ask for
/// more ([`Clone`] to extract owned keys, [`Display`](core::fmt::Display) to
/// render). It is a logic error for a key to be modified in such a way that
/// its ordering relative to any other key changes while it is in the tree.
///
/// # Examples
///
/// ```
/// use ord_btree::BTree;
///
/// let mut tree = BTree::new(4);
///
/// tree.insert("cedar");
/// tree.insert("alder");
/// tree.insert("birch");
///
/// assert!(tree.contains("birch"));
/// assert_eq!(tree.len(), 3);
/// assert_eq!(tree.min_key(), Some(&"alder"));
/// assert_eq!(tree.join(", "), "alder, birch, cedar");
///
/// tree.remove(&"birch");
/// assert!(!tree.contains("birch"));
/// ```
pub struct BTree<K> {
    raw: RawBTree<K>,
}

impl<K> BTree<K> {
    /// Creates an empty tree of the given order.
    ///
    /// Returns [`Error::InvalidOrder`] if `order < 3`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ord_btree::{BTree, Error};
    ///
    /// let tree: BTree<i32> = BTree::try_new(3)?;
    /// assert!(tree.is_empty());
    ///
    /// assert_eq!(BTree::<i32>::try_new(2).unwrap_err(), Error::InvalidOrder(2));
    /// # Ok::<(), Error>(())
    /// ```
    pub fn try_new(order: usize) -> Result<Self, Error> {
        if order < 3 {
            return Err(Error::InvalidOrder(order));
        }
        Ok(Self {
            raw: RawBTree::new(order),
        })
    }

    /// Creates an empty tree of the given order.
    ///
    /// # Panics
    ///
    /// Panics if `order < 3`; use [`try_new`](BTree::try_new) to handle the
    /// error instead.
    #[must_use]
    pub fn new(order: usize) -> Self {
        match Self::try_new(order) {
            Ok(tree) => tree,
            Err(error) => panic!("`BTree::new()` - {error}"),
        }
    }

    /// The order the tree was constructed with.
    #[must_use]
    pub fn order(&self) -> usize {
        self.raw.order()
    }

    /// Returns the number of keys in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree contains no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Number of edges from the root to any leaf; 0 for an empty tree.
    ///
    /// All leaves sit at the same depth, so the choice of leaf is immaterial.
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns the smallest key, or `None` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ord_btree::BTree;
    ///
    /// let mut tree = BTree::new(3);
    /// assert_eq!(tree.min_key(), None);
    ///
    /// tree.insert(7);
    /// tree.insert(2);
    /// assert_eq!(tree.min_key(), Some(&2));
    /// assert_eq!(tree.max_key(), Some(&7));
    /// ```
    #[must_use]
    pub fn min_key(&self) -> Option<&K> {
        self.raw.min_key()
    }

    /// Returns the largest key, or `None` if the tree is empty.
    #[must_use]
    pub fn max_key(&self) -> Option<&K> {
        self.raw.max_key()
    }

    /// Removes every key, releasing all nodes. The order is retained.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Renders the ascending key sequence with `separator` between elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use ord_btree::BTree;
    ///
    /// let mut tree = BTree::new(3);
    /// for key in [10, 20, 5, 6, 12, 30, 7, 17] {
    ///     tree.insert(key);
    /// }
    /// assert_eq!(tree.join(","), "5,6,7,10,12,17,20,30");
    /// ```
    #[must_use]
    pub fn join(&self, separator: &str) -> String
    where
        K: fmt::Display,
    {
        let mut rendered = String::new();
        for (i, key) in self.raw.keys_in_order().into_iter().enumerate() {
            if i > 0 {
                rendered.push_str(separator);
            }
            // Writing into a `String` cannot fail.
            let _ = write!(rendered, "{key}");
        }
        rendered
    }

    /// Collects every key in ascending order.
    #[must_use]
    pub fn inorder(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.raw.keys_in_order().into_iter().cloned().collect()
    }
}

impl<K: Ord> BTree<K> {
    /// Builds a tree of the given order by inserting `elements` one at a
    /// time, in iteration order. Duplicates in the input are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use ord_btree::{BTree, Error};
    ///
    /// let tree = BTree::from_elements([7, 3, 5, 1, 9, 2, 8], 4)?;
    /// assert_eq!(tree.len(), 7);
    /// assert_eq!(tree.join(","), "1,2,3,5,7,8,9");
    /// # Ok::<(), Error>(())
    /// ```
    pub fn from_elements<I>(elements: I, order: usize) -> Result<Self, Error>
    where
        I: IntoIterator<Item = K>,
    {
        let mut tree = Self::try_new(order)?;
        for element in elements {
            tree.insert(element);
        }
        Ok(tree)
    }

    /// Returns `true` if the tree contains the key.
    ///
    /// The key may be any borrowed form of the tree's key type, as with the
    /// standard library's ordered collections.
    ///
    /// # Examples
    ///
    /// ```
    /// use ord_btree::BTree;
    ///
    /// let mut tree = BTree::new(4);
    /// tree.insert(String::from("fig"));
    /// assert!(tree.contains("fig"));
    /// assert!(!tree.contains("kiwi"));
    /// ```
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.contains(key)
    }

    /// Adds a key to the tree.
    ///
    /// Returns `true` if the key was newly inserted; inserting a key that is
    /// already present leaves the tree unchanged and returns `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ord_btree::BTree;
    ///
    /// let mut tree = BTree::new(3);
    /// assert!(tree.insert(2));
    /// assert!(!tree.insert(2));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K) -> bool {
        self.raw.insert(key)
    }

    /// Collects every key `k` with `lo <= k <= hi`, in ascending order.
    ///
    /// Only subtrees whose key interval can intersect the range are visited.
    /// An inverted range (`lo > hi`) yields an empty result.
    ///
    /// # Examples
    ///
    /// ```
    /// use ord_btree::BTree;
    ///
    /// let mut tree = BTree::new(3);
    /// for key in [10, 20, 5, 6, 12, 30, 7, 17] {
    ///     tree.insert(key);
    /// }
    /// assert_eq!(tree.range_search(&6, &17), [6, 7, 10, 12, 17]);
    /// ```
    #[must_use]
    pub fn range_search(&self, lo: &K, hi: &K) -> Vec<K>
    where
        K: Clone,
    {
        self.raw.range_search(lo, hi)
    }

    /// Checks every structural invariant of the tree: strictly ascending
    /// inorder sequence of the tracked length, per-node key-count bounds,
    /// exact child counts, and uniform leaf depth.
    ///
    /// Read-only and `O(n)`; meant for test harnesses, never called by the
    /// mutating operations themselves.
    #[must_use]
    pub fn check_properties(&self) -> bool {
        self.raw.check_invariants()
    }
}

impl<K: Ord + Clone> BTree<K> {
    /// Removes a key from the tree, rebalancing as needed.
    ///
    /// Returns `true` if the key was present; removing an absent key leaves
    /// the tree's contents unchanged and returns `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ord_btree::BTree;
    ///
    /// let mut tree = BTree::from_elements([1, 2, 3], 3).unwrap();
    /// assert!(tree.remove(&2));
    /// assert!(!tree.remove(&2));
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn remove(&mut self, key: &K) -> bool {
        self.raw.remove(key)
    }
}

impl<K: fmt::Debug> fmt::Debug for BTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.raw.keys_in_order()).finish()
    }
}
