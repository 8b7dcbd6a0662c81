use compare::natural;

use super::RedBlackTree;
use crate::raw::RawTree;

impl<T: Ord> RedBlackTree<T> {
    /// Creates an empty tree with node slots for at least `capacity` elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::RedBlackTree;
    ///
    /// let tree: RedBlackTree<i32> = RedBlackTree::with_capacity(16);
    /// assert!(tree.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RedBlackTree::with_capacity_and_cmp(capacity, natural())
    }
}

impl<T, C> RedBlackTree<T, C> {
    /// Creates an empty tree ordered by `cmp` with node slots for at least `capacity`
    /// elements.
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity_and_cmp(capacity: usize, cmp: C) -> Self {
        RedBlackTree {
            raw: RawTree::with_capacity(capacity),
            cmp,
        }
    }

    /// Returns the number of elements the tree can hold without reallocating.
    ///
    /// Slots freed by removals are reused before the arena grows.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::RedBlackTree;
    ///
    /// let tree: RedBlackTree<i32> = RedBlackTree::with_capacity(32);
    /// assert_eq!(tree.capacity(), 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
