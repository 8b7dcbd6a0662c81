//! The [`RedBlackTree`] ordered multiset and its iterators.

use core::fmt;
use core::iter::FusedIterator;

use compare::{Compare, Natural, natural};
use log::{debug, trace};

use crate::raw::{Handle, Insertion, Occurrence, RawTree};

mod capacity;
mod validate;

/// An ordered multiset based on a red-black tree.
///
/// Elements are kept in non-decreasing order under the comparator `C`, which defaults to the
/// element type's [`Ord`] implementation. Elements that compare equal may be stored any
/// number of times; [`add`] always inserts, while [`add_if_missing`] and [`add_overwrite`]
/// treat an existing equal element as already present. Because the comparator alone decides
/// equality, an element can carry a payload beyond its ordering key and [`find`] returns
/// the stored element, payload included.
///
/// Point operations take worst-case logarithmic time. Nodes live in an arena and refer to
/// their children and parent by index, so the structure holds no raw pointers.
///
/// It is a logic error for an element to be modified in such a way that its ordering
/// relative to any other element, as determined by the comparator, changes while it is in
/// the tree. The behavior resulting from such a logic error is not specified, but will not
/// result in undefined behavior. [`validate`] can be used to detect it.
///
/// [`add`]: RedBlackTree::add
/// [`add_if_missing`]: RedBlackTree::add_if_missing
/// [`add_overwrite`]: RedBlackTree::add_overwrite
/// [`find`]: RedBlackTree::find
/// [`validate`]: RedBlackTree::validate
///
/// # Examples
///
/// ```
/// use rb_multiset::RedBlackTree;
///
/// let mut tree = RedBlackTree::new();
/// for n in [5, 3, 8, 3, 1] {
///     tree.add(n);
/// }
///
/// assert_eq!(tree.len(), 5);
/// assert_eq!(tree.occurrences_of(&3), 2);
/// assert!(tree.iter().copied().eq([1, 3, 3, 5, 8]));
///
/// assert!(tree.remove_all(&3));
/// assert!(tree.iter().copied().eq([1, 5, 8]));
///
/// assert_eq!(tree.pop(), Some(1));
/// ```
///
/// A custom comparator is any [`Compare`] implementation, closures included:
///
/// ```
/// use compare::{Compare, natural};
/// use rb_multiset::RedBlackTree;
///
/// let mut tree = RedBlackTree::<i32, _>::with_cmp(natural().rev());
/// tree.extend([1, 3, 2]);
/// assert!(tree.iter().copied().eq([3, 2, 1]));
///
/// let mut by_len = RedBlackTree::with_cmp(|a: &&str, b: &&str| a.len().cmp(&b.len()));
/// by_len.extend(["ccc", "a", "bb"]);
/// assert_eq!(by_len.first(), Some(&"a"));
/// ```
pub struct RedBlackTree<T, C = Natural<T>> {
    raw: RawTree<T>,
    cmp: C,
}

/// An iterator over the elements of a `RedBlackTree`, in ascending order.
///
/// This `struct` is created by the [`iter`] method on [`RedBlackTree`].
/// Each step is a successor (or, from the back, predecessor) lookup: worst-case
/// logarithmic, amortized constant.
///
/// # Examples
///
/// ```
/// use rb_multiset::RedBlackTree;
///
/// let tree = RedBlackTree::from([3, 1, 2]);
/// let mut iter = tree.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&3));
/// assert_eq!(iter.next(), Some(&2));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: RedBlackTree::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    raw: &'a RawTree<T>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

/// An owning iterator over the elements of a `RedBlackTree`, in ascending order.
///
/// This `struct` is created by the [`into_iter`] method on [`RedBlackTree`]
/// (provided by the [`IntoIterator`] trait). Each step removes the current minimum
/// (or maximum) from the tree it owns.
///
/// [`into_iter`]: RedBlackTree#method.into_iter
pub struct IntoIter<T> {
    raw: RawTree<T>,
}

impl<T: Ord> RedBlackTree<T> {
    /// Makes a new, empty `RedBlackTree` ordered by `T`'s [`Ord`] implementation.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.add(1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn new() -> RedBlackTree<T> {
        RedBlackTree::with_cmp(natural())
    }
}

impl<T, C> RedBlackTree<T, C> {
    /// Makes a new, empty `RedBlackTree` ordered by `cmp`.
    ///
    /// `cmp` must be a total order. If it is not, operations still complete but the
    /// resulting order and counts are unspecified.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn with_cmp(cmp: C) -> RedBlackTree<T, C> {
        RedBlackTree {
            raw: RawTree::new(),
            cmp,
        }
    }

    /// Returns a reference to the tree's comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use compare::Compare;
    /// use rb_multiset::RedBlackTree;
    ///
    /// let tree: RedBlackTree<i32> = RedBlackTree::new();
    /// assert!(tree.cmp().compares_lt(&1, &2));
    /// ```
    pub const fn cmp(&self) -> &C {
        &self.cmp
    }

    /// Returns the number of elements in the tree, counting every occurrence.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree contains no elements.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the tree, removing all elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::from([1, 1, 2]);
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.pop(), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1) when `T` needs no drop; otherwise the elements are dropped in O(n).
    pub fn clear(&mut self) {
        trace!("clearing {} elements", self.raw.len());
        self.raw.clear();
    }

    /// Returns the minimum element, if any, without removing it.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.raw.first().map(|h| self.raw.element(h))
    }

    /// Returns the maximum element, if any, without removing it.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.raw.last().map(|h| self.raw.element(h))
    }

    /// Removes and returns the minimum element, or `None` if the tree is empty.
    ///
    /// When several elements tie for the minimum, the leftmost one is taken.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::from([2, 1, 2]);
    /// assert_eq!(tree.pop(), Some(1));
    /// assert_eq!(tree.pop(), Some(2));
    /// assert_eq!(tree.pop(), Some(2));
    /// assert_eq!(tree.pop(), None);
    /// assert_eq!(tree.len(), 0);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop(&mut self) -> Option<T> {
        let first = self.raw.first()?;
        Some(self.raw.remove(first))
    }

    /// Removes and returns the maximum element, or `None` if the tree is empty.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_last(&mut self) -> Option<T> {
        let last = self.raw.last()?;
        Some(self.raw.remove(last))
    }

    /// Gets an iterator that visits the elements in ascending order.
    ///
    /// The iterator borrows the tree, so the tree cannot be mutated while it is alive.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::RedBlackTree;
    ///
    /// let tree = RedBlackTree::from([3, 1, 3]);
    /// let v: Vec<_> = tree.iter().collect();
    /// assert_eq!(v, [&1, &3, &3]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; O(1) amortized per step.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            raw: &self.raw,
            front: self.raw.first(),
            back: self.raw.last(),
            remaining: self.raw.len(),
        }
    }

    /// Clones the elements, in ascending order, into `dest` starting at `offset`.
    ///
    /// Copying stops at the end of `dest` or of the tree, whichever comes first. Returns the
    /// number of elements written; an `offset` past the end of `dest` writes nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::RedBlackTree;
    ///
    /// let tree = RedBlackTree::from([30, 10, 20]);
    /// let mut buf = [0; 4];
    /// assert_eq!(tree.copy_to(&mut buf, 2), 2);
    /// assert_eq!(buf, [0, 0, 10, 20]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(min(n, dest.len() - offset))
    pub fn copy_to(&self, dest: &mut [T], offset: usize) -> usize
    where
        T: Clone,
    {
        let Some(dest) = dest.get_mut(offset..) else {
            return 0;
        };
        let mut written = 0;
        for (slot, element) in dest.iter_mut().zip(self.iter()) {
            slot.clone_from(element);
            written += 1;
        }
        written
    }
}

impl<T, C: Compare<T>> RedBlackTree<T, C> {
    /// Returns `true` if the tree contains an element equal to `element`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::RedBlackTree;
    ///
    /// let tree = RedBlackTree::from([1, 2, 3]);
    /// assert!(tree.contains(&1));
    /// assert!(!tree.contains(&4));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn contains(&self, element: &T) -> bool {
        self.raw.find(element, &self.cmp).is_some()
    }

    /// Returns the stored element equal to `element`, if any.
    ///
    /// With duplicates present, the first one met on the way down from the root is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::with_cmp(|a: &(u8, &str), b: &(u8, &str)| a.0.cmp(&b.0));
    /// tree.add((7, "seven"));
    /// assert_eq!(tree.find(&(7, "")), Some(&(7, "seven")));
    /// assert_eq!(tree.find(&(8, "")), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn find(&self, element: &T) -> Option<&T> {
        self.raw.find(element, &self.cmp).map(|h| self.raw.element(h))
    }

    /// Returns how many stored elements are equal to `element`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::RedBlackTree;
    ///
    /// let tree = RedBlackTree::from([5, 3, 8, 3, 1]);
    /// assert_eq!(tree.occurrences_of(&3), 2);
    /// assert_eq!(tree.occurrences_of(&4), 0);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n + m) where m is the number of matching elements.
    pub fn occurrences_of(&self, element: &T) -> usize {
        self.raw.count(element, &self.cmp)
    }

    /// Adds an element, even if equal elements are already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.add(2);
    /// tree.add(2);
    /// assert_eq!(tree.len(), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn add(&mut self, element: T) {
        self.raw.insert(element, &self.cmp, Occurrence::AlwaysAdd);
    }

    /// Adds an element unless an equal one is already present.
    ///
    /// Returns whether the element was inserted; a rejected element is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// assert!(tree.add_if_missing(2));
    /// assert!(!tree.add_if_missing(2));
    /// assert_eq!(tree.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn add_if_missing(&mut self, element: T) -> bool {
        matches!(
            self.raw.insert(element, &self.cmp, Occurrence::AddIfMissing),
            Insertion::Inserted
        )
    }

    /// Adds an element, or overwrites an equal element in place if one is present.
    ///
    /// Returns `true` if a new element was inserted and `false` if an existing one was
    /// replaced. Overwriting does not change the tree's shape or length.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::with_cmp(|a: &(u8, char), b: &(u8, char)| a.0.cmp(&b.0));
    /// assert!(tree.add_overwrite((1, 'a')));
    /// assert!(!tree.add_overwrite((1, 'b')));
    /// assert_eq!(tree.len(), 1);
    /// assert_eq!(tree.find(&(1, '?')), Some(&(1, 'b')));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn add_overwrite(&mut self, element: T) -> bool {
        self.replace(element).is_none()
    }

    /// Adds an element, overwriting an equal element in place if one is present, and
    /// returns the element that was overwritten.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::with_cmp(|a: &(u8, char), b: &(u8, char)| a.0.cmp(&b.0));
    /// assert_eq!(tree.replace((1, 'a')), None);
    /// assert_eq!(tree.replace((1, 'b')), Some((1, 'a')));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn replace(&mut self, element: T) -> Option<T> {
        match self.raw.insert(element, &self.cmp, Occurrence::Overwrite) {
            Insertion::Replaced(old) => Some(old),
            Insertion::Inserted | Insertion::Rejected => None,
        }
    }

    /// Removes one element equal to `element`. Returns whether one was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::from([2, 2]);
    /// assert!(tree.remove(&2));
    /// assert_eq!(tree.occurrences_of(&2), 1);
    /// assert!(tree.remove(&2));
    /// assert!(!tree.remove(&2));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove(&mut self, element: &T) -> bool {
        self.take(element).is_some()
    }

    /// Removes one element equal to `element` and returns it.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn take(&mut self, element: &T) -> Option<T> {
        let found = self.raw.find(element, &self.cmp)?;
        Some(self.raw.remove(found))
    }

    /// Removes every element equal to `element`. Returns whether any was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::from([5, 3, 8, 3, 1]);
    /// assert!(tree.remove_all(&3));
    /// assert!(tree.iter().copied().eq([1, 5, 8]));
    /// assert!(!tree.remove_all(&3));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(m log n) where m is the number of matching elements.
    pub fn remove_all(&mut self, element: &T) -> bool {
        let mut removed = 0usize;
        while let Some(found) = self.raw.find(element, &self.cmp) {
            drop(self.raw.remove(found));
            removed += 1;
        }
        if removed > 1 {
            debug!("removed {removed} equal elements");
        }
        removed > 0
    }
}

impl<T: fmt::Debug, C> fmt::Debug for RedBlackTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Clone, C: Clone> Clone for RedBlackTree<T, C> {
    fn clone(&self) -> Self {
        RedBlackTree {
            raw: self.raw.clone(),
            cmp: self.cmp.clone(),
        }
    }
}

impl<T: Ord> Default for RedBlackTree<T> {
    /// Creates an empty `RedBlackTree`.
    fn default() -> RedBlackTree<T> {
        RedBlackTree::new()
    }
}

impl<T: PartialEq, C> PartialEq for RedBlackTree<T, C> {
    /// Two trees are equal if they hold equal elements in the same sorted order.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, C> Eq for RedBlackTree<T, C> {}

impl<T: Ord> FromIterator<T> for RedBlackTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = RedBlackTree::new();
        tree.extend(iter);
        tree
    }
}

impl<T, C: Compare<T>> Extend<T> for RedBlackTree<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(move |element| self.add(element));
    }
}

impl<'a, T: 'a + Copy, C: Compare<T>> Extend<&'a T> for RedBlackTree<T, C> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for RedBlackTree<T> {
    /// Converts a `[T; N]` into a `RedBlackTree<T>`, keeping every duplicate.
    ///
    /// ```
    /// use rb_multiset::RedBlackTree;
    ///
    /// let tree = RedBlackTree::from([1, 2, 2]);
    /// assert_eq!(tree.len(), 3);
    /// ```
    fn from(arr: [T; N]) -> Self {
        RedBlackTree::from_iter(arr)
    }
}

impl<T, C> IntoIterator for RedBlackTree<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an iterator for moving out the `RedBlackTree`'s contents in ascending order.
    ///
    /// ```
    /// use rb_multiset::RedBlackTree;
    ///
    /// let tree = RedBlackTree::from([4, 1, 2, 1]);
    /// let v: Vec<_> = tree.into_iter().collect();
    /// assert_eq!(v, [1, 1, 2, 4]);
    /// ```
    fn into_iter(self) -> IntoIter<T> {
        IntoIter { raw: self.raw }
    }
}

impl<'a, T, C> IntoIterator for &'a RedBlackTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.front?;
        self.front = self.raw.successor(current);
        self.remaining -= 1;
        Some(self.raw.element(current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.back?;
        self.back = self.raw.predecessor(current);
        self.remaining -= 1;
        Some(self.raw.element(current))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let first = self.raw.first()?;
        Some(self.raw.remove(first))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.raw.len(), Some(self.raw.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        let last = self.raw.last()?;
        Some(self.raw.remove(last))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.raw.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let remaining = Iter {
            raw: &self.raw,
            front: self.raw.first(),
            back: self.raw.last(),
            remaining: self.raw.len(),
        };
        f.debug_tuple("IntoIter").field(&remaining).finish()
    }
}
