use core::cmp::Ordering;

use compare::Compare;
use log::trace;
use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node, Side};

/// The arena-backed red-black tree underneath `RedBlackTree`.
///
/// Every structural operation that can move the root takes the current root handle and
/// returns the (possibly new) one; only the top-level methods write `self.root`.
#[derive(Clone)]
pub(crate) struct RawTree<T> {
    /// Arena storing every node; its occupied-slot count is the element count.
    nodes: Arena<Node<T>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
}

/// How an insertion treats an element that compares equal to one already stored.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Occurrence {
    /// Always insert; ties descend left.
    AlwaysAdd,
    /// Insert only if no equal element exists.
    AddIfMissing,
    /// Replace the first equal element found, in place.
    Overwrite,
}

/// Result of an insertion attempt.
pub(crate) enum Insertion<T> {
    /// A new node was linked in.
    Inserted,
    /// An equal element exists; the offered one was dropped.
    Rejected,
    /// An equal element was overwritten; the previous one is handed back.
    Replaced(T),
}

/// Pending subtrees for the occurrence count.
type Pending = SmallVec<[Handle; 32]>;

impl<T> RawTree<T> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    /// Creates a new, empty tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
        }
    }

    /// Returns the number of elements in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Discards every node.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    pub(crate) fn node(&self, handle: Handle) -> &Node<T> {
        self.nodes.get(handle)
    }

    pub(crate) fn element(&self, handle: Handle) -> &T {
        self.nodes.get(handle).element()
    }

    // ─── Null-tolerant accessors; an absent node is black and has no links ──────

    fn color_of(&self, node: Option<Handle>) -> Color {
        node.map_or(Color::Black, |h| self.nodes.get(h).color())
    }

    fn set_color(&mut self, node: Option<Handle>, color: Color) {
        if let Some(h) = node {
            self.nodes.get_mut(h).set_color(color);
        }
    }

    fn parent_of(&self, node: Option<Handle>) -> Option<Handle> {
        node.and_then(|h| self.nodes.get(h).parent())
    }

    fn child_of(&self, node: Option<Handle>, side: Side) -> Option<Handle> {
        node.and_then(|h| self.nodes.get(h).child(side))
    }

    /// Which side of its parent `node` hangs from; `None` for the root.
    fn side_of(&self, node: Handle) -> Option<Side> {
        let parent = self.nodes.get(node).parent()?;
        if self.nodes.get(parent).left() == Some(node) {
            Some(Side::Left)
        } else {
            Some(Side::Right)
        }
    }

    /// Repoints whichever link held `old` (its parent's child link, or the root) at `new`.
    /// Returns the new root.
    fn replace_in_parent(&mut self, old: Handle, new: Handle, root: Handle) -> Handle {
        let Some(parent) = self.nodes.get(old).parent() else {
            return new;
        };
        let parent_node = self.nodes.get_mut(parent);
        if parent_node.left() == Some(old) {
            parent_node.set_left(Some(new));
        } else {
            parent_node.set_right(Some(new));
        }
        root
    }

    // ─── Navigation ─────────────────────────────────────────────────────────────

    /// Returns the minimum node of the subtree at `node`.
    pub(crate) fn leftmost(&self, mut node: Handle) -> Handle {
        while let Some(left) = self.nodes.get(node).left() {
            node = left;
        }
        node
    }

    /// Returns the maximum node of the subtree at `node`.
    pub(crate) fn rightmost(&self, mut node: Handle) -> Handle {
        while let Some(right) = self.nodes.get(node).right() {
            node = right;
        }
        node
    }

    /// Returns the in-order successor of `node`, or `None` if it is the maximum.
    pub(crate) fn successor(&self, node: Handle) -> Option<Handle> {
        self.neighbor(node, Side::Right)
    }

    /// Returns the in-order predecessor of `node`, or `None` if it is the minimum.
    pub(crate) fn predecessor(&self, node: Handle) -> Option<Handle> {
        self.neighbor(node, Side::Left)
    }

    /// Next node towards `side` in sorted order: the extreme of the `side` subtree if there
    /// is one, else the first ancestor reached from its opposite side.
    fn neighbor(&self, node: Handle, side: Side) -> Option<Handle> {
        if let Some(child) = self.nodes.get(node).child(side) {
            return Some(match side {
                Side::Right => self.leftmost(child),
                Side::Left => self.rightmost(child),
            });
        }
        let mut child = node;
        let mut parent = self.nodes.get(node).parent();
        while let Some(p) = parent {
            if self.nodes.get(p).child(side) != Some(child) {
                break;
            }
            child = p;
            parent = self.nodes.get(p).parent();
        }
        parent
    }

    /// Returns the first (minimum) node.
    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| self.leftmost(root))
    }

    /// Returns the last (maximum) node.
    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|root| self.rightmost(root))
    }

    // ─── Search ─────────────────────────────────────────────────────────────────

    /// Returns the first node found by descent whose element compares equal to `element`.
    pub(crate) fn find<C>(&self, element: &T, cmp: &C) -> Option<Handle>
    where
        C: Compare<T>,
    {
        let mut current = self.root;
        while let Some(h) = current {
            let node = self.nodes.get(h);
            current = match cmp.compare(element, node.element()) {
                Ordering::Equal => return Some(h),
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
            };
        }
        None
    }

    /// Counts the elements that compare equal to `element`.
    ///
    /// Rotations can leave equal elements on both sides of a matching node, so on a match
    /// the right subtree is queued for a separate descent while this one continues left.
    pub(crate) fn count<C>(&self, element: &T, cmp: &C) -> usize
    where
        C: Compare<T>,
    {
        let mut count = 0;
        let mut pending: Pending = SmallVec::new();
        pending.extend(self.root);

        while let Some(subtree) = pending.pop() {
            let mut current = Some(subtree);
            while let Some(h) = current {
                let node = self.nodes.get(h);
                current = match cmp.compare(element, node.element()) {
                    Ordering::Equal => {
                        count += 1;
                        match (node.left(), node.right()) {
                            (None, right) => right,
                            (left, None) => left,
                            (Some(left), Some(right)) => {
                                pending.push(right);
                                Some(left)
                            }
                        }
                    }
                    Ordering::Less => node.left(),
                    Ordering::Greater => node.right(),
                };
            }
        }
        count
    }

    // ─── Rotations ──────────────────────────────────────────────────────────────

    /// Rotates `pivot` down towards `side`; its child on the opposite side takes its place.
    ///
    /// `rotate(p, Side::Left, ..)` is the classic left rotation. Returns the new root.
    fn rotate(&mut self, pivot: Handle, side: Side, root: Handle) -> Handle {
        let other = side.opposite();
        let Some(riser) = self.nodes.get(pivot).child(other) else {
            panic!("`RawTree::rotate()` - pivot {pivot:?} has no {other:?} child!");
        };

        let inner = self.nodes.get(riser).child(side);
        self.nodes.get_mut(pivot).set_child(other, inner);
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).set_parent(Some(pivot));
        }

        let parent = self.nodes.get(pivot).parent();
        self.nodes.get_mut(riser).set_parent(parent);
        let root = self.replace_in_parent(pivot, riser, root);
        if root == riser {
            trace!("rotation at {pivot:?} promoted {riser:?} to root");
        }

        let (pivot_node, riser_node) = self.nodes.get2_mut(pivot, riser);
        riser_node.set_child(side, Some(pivot));
        pivot_node.set_parent(Some(riser));
        root
    }

    // ─── Insertion ──────────────────────────────────────────────────────────────

    /// Inserts `element` according to `policy`.
    pub(crate) fn insert<C>(&mut self, element: T, cmp: &C, policy: Occurrence) -> Insertion<T>
    where
        C: Compare<T>,
    {
        let Some(root) = self.root else {
            let handle = self.nodes.alloc(Node::new(element, None));
            self.nodes.get_mut(handle).set_color(Color::Black);
            self.root = Some(handle);
            return Insertion::Inserted;
        };

        let mut current = root;
        loop {
            let node = self.nodes.get(current);
            let ordering = cmp.compare(&element, node.element());
            if ordering == Ordering::Equal {
                match policy {
                    Occurrence::AddIfMissing => return Insertion::Rejected,
                    Occurrence::Overwrite => {
                        let old = core::mem::replace(self.nodes.get_mut(current).element_mut(), element);
                        return Insertion::Replaced(old);
                    }
                    Occurrence::AlwaysAdd => {}
                }
            }
            let side = if ordering == Ordering::Greater { Side::Right } else { Side::Left };
            match node.child(side) {
                Some(child) => current = child,
                None => {
                    self.root = Some(self.attach(current, side, element, root));
                    return Insertion::Inserted;
                }
            }
        }
    }

    /// Links a new node as the `side` child of `parent` and rebalances. Returns the new root.
    fn attach(&mut self, parent: Handle, side: Side, element: T, root: Handle) -> Handle {
        let handle = self.nodes.alloc(Node::new(element, Some(parent)));
        self.nodes.get_mut(parent).set_child(side, Some(handle));
        self.fix_after_insertion(handle, root)
    }

    /// Restores the red-black invariants after `node` was linked in red. Returns the new root.
    pub(crate) fn fix_after_insertion(&mut self, node: Handle, mut root: Handle) -> Handle {
        self.nodes.get_mut(node).set_color(Color::Red);
        let mut x = node;

        while x != root && self.color_of(self.parent_of(Some(x))) == Color::Red {
            let parent = self.parent_of(Some(x));
            let grandparent = self.parent_of(parent);
            let side = if self.child_of(grandparent, Side::Left) == parent {
                Side::Left
            } else {
                Side::Right
            };
            let uncle = self.child_of(grandparent, side.opposite());

            if self.color_of(uncle) == Color::Red {
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                match grandparent {
                    Some(g) => x = g,
                    None => break,
                }
            } else {
                if self.child_of(parent, side.opposite()) == Some(x) {
                    // Inner grandchild: straighten into the outer case.
                    if let Some(p) = parent {
                        x = p;
                        root = self.rotate(x, side, root);
                    }
                }
                let parent = self.parent_of(Some(x));
                let grandparent = self.parent_of(parent);
                self.set_color(parent, Color::Black);
                self.set_color(grandparent, Color::Red);
                if let Some(g) = grandparent {
                    root = self.rotate(g, side.opposite(), root);
                }
            }
        }

        self.nodes.get_mut(root).set_color(Color::Black);
        root
    }

    // ─── Deletion ───────────────────────────────────────────────────────────────

    /// Removes `node` and returns its element.
    pub(crate) fn remove(&mut self, node: Handle) -> T {
        let Some(root) = self.root else {
            panic!("`RawTree::remove()` - tree is empty!");
        };
        let (root, element) = self.delete(node, root);
        self.root = root;
        element
    }

    /// Unlinks `node`, rebalancing as needed. Returns the new root and the removed element.
    ///
    /// A node with two children trades elements with its successor, which is then deleted
    /// instead; the successor has at most a right child.
    pub(crate) fn delete(&mut self, node: Handle, root: Handle) -> (Option<Handle>, T) {
        let mut node = node;
        let current = self.nodes.get(node);
        if current.left().is_some() && current.right().is_some() {
            let Some(successor) = self.successor(node) else {
                panic!("`RawTree::delete()` - inner node {node:?} has no successor!");
            };
            let (a, b) = self.nodes.get2_mut(node, successor);
            core::mem::swap(a.element_mut(), b.element_mut());
            node = successor;
        }

        let current = self.nodes.get(node);
        let was_black = current.color() == Color::Black;
        let replacement = current.left().or(current.right());

        if let Some(replacement) = replacement {
            let parent = current.parent();
            self.nodes.get_mut(replacement).set_parent(parent);
            let mut root = self.replace_in_parent(node, replacement, root);

            let unlinked = self.nodes.get_mut(node);
            unlinked.set_left(None);
            unlinked.set_right(None);
            unlinked.set_parent(None);

            if was_black {
                root = self.fix_after_deletion(replacement, root);
            }
            (Some(root), self.nodes.take(node).into_element())
        } else if current.is_root() {
            trace!("removed the last node {node:?}");
            (None, self.nodes.take(node).into_element())
        } else {
            // No children: rebalance with `node` standing in for the removed leaf, then unlink.
            let root = if was_black { self.fix_after_deletion(node, root) } else { root };
            if let Some(parent) = self.nodes.get(node).parent() {
                let parent_node = self.nodes.get_mut(parent);
                if parent_node.left() == Some(node) {
                    parent_node.set_left(None);
                } else if parent_node.right() == Some(node) {
                    parent_node.set_right(None);
                }
            }
            (Some(root), self.nodes.take(node).into_element())
        }
    }

    /// Restores the red-black invariants after a black node was removed from above `node`.
    /// Returns the new root.
    pub(crate) fn fix_after_deletion(&mut self, node: Handle, mut root: Handle) -> Handle {
        let mut x = node;

        while x != root && self.color_of(Some(x)) == Color::Black {
            let Some(side) = self.side_of(x) else {
                panic!("`RawTree::fix_after_deletion()` - non-root {x:?} has no parent!");
            };
            let far = side.opposite();
            let parent = self.parent_of(Some(x));
            let mut sibling = self.child_of(parent, far);

            if self.color_of(sibling) == Color::Red {
                self.set_color(sibling, Color::Black);
                self.set_color(parent, Color::Red);
                if let Some(p) = parent {
                    root = self.rotate(p, side, root);
                }
                sibling = self.child_of(self.parent_of(Some(x)), far);
            }

            if self.color_of(self.child_of(sibling, side)) == Color::Black
                && self.color_of(self.child_of(sibling, far)) == Color::Black
            {
                self.set_color(sibling, Color::Red);
                match self.parent_of(Some(x)) {
                    Some(p) => x = p,
                    None => break,
                }
            } else {
                if self.color_of(self.child_of(sibling, far)) == Color::Black {
                    self.set_color(self.child_of(sibling, side), Color::Black);
                    self.set_color(sibling, Color::Red);
                    if let Some(s) = sibling {
                        root = self.rotate(s, far, root);
                    }
                    sibling = self.child_of(self.parent_of(Some(x)), far);
                }
                let parent = self.parent_of(Some(x));
                self.set_color(sibling, self.color_of(parent));
                self.set_color(parent, Color::Black);
                self.set_color(self.child_of(sibling, far), Color::Black);
                if let Some(p) = parent {
                    root = self.rotate(p, side, root);
                }
                x = root;
            }
        }

        self.nodes.get_mut(x).set_color(Color::Black);
        root
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use compare::{Compare, natural};
    use proptest::prelude::*;

    fn build(values: &[i32]) -> RawTree<i32> {
        let mut tree = RawTree::new();
        for &v in values {
            assert!(matches!(tree.insert(v, &natural(), Occurrence::AlwaysAdd), Insertion::Inserted));
        }
        tree
    }

    fn in_order(tree: &RawTree<i32>) -> Vec<i32> {
        let mut out = Vec::new();
        let mut current = tree.first();
        while let Some(h) = current {
            out.push(*tree.element(h));
            current = tree.successor(h);
        }
        out
    }

    /// Black height of the subtree at `node`, asserting the coloring rules on the way.
    fn black_height(tree: &RawTree<i32>, node: Option<Handle>) -> usize {
        let Some(h) = node else { return 1 };
        let n = tree.node(h);
        for child in [n.left(), n.right()].into_iter().flatten() {
            assert_eq!(tree.node(child).parent(), Some(h), "broken parent link");
            if n.is_red() {
                assert!(!tree.node(child).is_red(), "red node {h:?} has a red child");
            }
        }
        let left = black_height(tree, n.left());
        let right = black_height(tree, n.right());
        assert_eq!(left, right, "black height differs under {h:?}");
        left + usize::from(!n.is_red())
    }

    fn assert_red_black(tree: &RawTree<i32>) {
        if let Some(root) = tree.root() {
            assert!(!tree.node(root).is_red(), "root is red");
            assert!(tree.node(root).is_root());
        }
        black_height(tree, tree.root());
        let sorted = in_order(tree);
        assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(sorted.len(), tree.len());
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        let tree = build(&(0..1000).collect::<Vec<_>>());
        assert_red_black(&tree);
        // n >= 2^bh - 1 caps the black height of 1000 nodes at 9, plus the nil leaf.
        assert!(black_height(&tree, tree.root()) <= 10);
    }

    #[test]
    fn rotations_preserve_order_and_return_root() {
        let mut tree = build(&[2, 1, 3]);
        let root = tree.root().unwrap();
        assert_eq!(*tree.element(root), 2);

        let root = tree.rotate(root, Side::Left, root);
        assert_eq!(*tree.element(root), 3);
        assert!(tree.node(root).is_root());
        tree.root = Some(root);
        assert_eq!(in_order(&tree), [1, 2, 3]);

        let root = tree.rotate(root, Side::Right, root);
        assert_eq!(*tree.element(root), 2);
        tree.root = Some(root);
        assert_eq!(in_order(&tree), [1, 2, 3]);
    }

    #[test]
    fn successor_and_predecessor_walk_both_ways() {
        let tree = build(&[50, 20, 80, 10, 30, 70, 90, 25]);
        let mut backwards = Vec::new();
        let mut current = tree.last();
        while let Some(h) = current {
            backwards.push(*tree.element(h));
            current = tree.predecessor(h);
        }
        assert_eq!(backwards, [90, 80, 70, 50, 30, 25, 20, 10]);
        assert_eq!(in_order(&tree), [10, 20, 25, 30, 50, 70, 80, 90]);
    }

    #[test]
    fn delete_inner_node_hands_back_its_own_element() {
        let mut tree = build(&[4, 2, 6, 1, 3, 5, 7]);
        let four = tree.find(&4, &natural()).unwrap();
        assert_eq!(tree.remove(four), 4);
        assert_eq!(in_order(&tree), [1, 2, 3, 5, 6, 7]);
        assert_red_black(&tree);
    }

    #[test]
    fn count_sees_ties_on_both_sides() {
        // Ascending duplicates get rotated so equal keys land on either side of a match.
        let tree = build(&[5, 5, 5, 5, 5, 5, 5, 1, 9, 5]);
        assert_eq!(tree.count(&5, &natural()), 8);
        assert_eq!(tree.count(&1, &natural()), 1);
        assert_eq!(tree.count(&4, &natural()), 0);
    }

    #[test]
    fn custom_comparator_orders_descending() {
        let cmp = natural::<i32>().rev();
        let mut tree = RawTree::new();
        for v in [3, 1, 2] {
            tree.insert(v, &cmp, Occurrence::AlwaysAdd);
        }
        assert_eq!(in_order(&tree), [3, 2, 1]);
        assert!(cmp.compares_lt(&3, &1));
    }

    #[test]
    fn insert_policies() {
        let mut tree = build(&[1, 2]);
        assert!(matches!(tree.insert(2, &natural(), Occurrence::AddIfMissing), Insertion::Rejected));
        assert!(matches!(tree.insert(2, &natural(), Occurrence::Overwrite), Insertion::Replaced(2)));
        assert!(matches!(tree.insert(3, &natural(), Occurrence::Overwrite), Insertion::Inserted));
        assert_eq!(tree.len(), 3);
    }

    proptest! {
        #[test]
        fn random_mutations_keep_invariants(
            ops in prop::collection::vec((any::<bool>(), 0i32..64), 0..400),
        ) {
            let mut tree = RawTree::new();
            let mut model: Vec<i32> = Vec::new();
            for (insert, value) in ops {
                if insert {
                    tree.insert(value, &natural(), Occurrence::AlwaysAdd);
                    model.push(value);
                } else if let Some(h) = tree.find(&value, &natural()) {
                    prop_assert_eq!(tree.remove(h), value);
                    let at = model.iter().position(|&v| v == value).unwrap();
                    model.swap_remove(at);
                }
                assert_red_black(&tree);
                prop_assert_eq!(tree.count(&value, &natural()), model.iter().filter(|&&v| v == value).count());
            }
            model.sort_unstable();
            prop_assert_eq!(in_order(&tree), model);
        }
    }
}
