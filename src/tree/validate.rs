use core::cmp::Ordering;

use compare::Compare;

use super::RedBlackTree;
use crate::InvariantError;
use crate::raw::{Handle, RawTree};

/// What a subtree check hands back to its parent.
struct Subtree {
    black_height: usize,
    size: usize,
}

impl<T, C: Compare<T>> RedBlackTree<T, C> {
    /// Checks every structural invariant and reports the first one found broken.
    ///
    /// A tree only ever fails this check if its comparator is not a total order, or if a
    /// stored element's ordering changed after insertion.
    ///
    /// # Errors
    ///
    /// Returns the [`InvariantError`] describing the first violation found: coloring and
    /// black height are checked bottom-up, then in-order sortedness.
    ///
    /// # Examples
    ///
    /// ```
    /// use rb_multiset::RedBlackTree;
    ///
    /// let tree: RedBlackTree<_> = (0..100).rev().collect();
    /// assert_eq!(tree.validate(), Ok(()));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn validate(&self) -> Result<(), InvariantError> {
        let Some(root) = self.raw.root() else {
            return match self.raw.len() {
                0 => Ok(()),
                len => Err(InvariantError::CountMismatch { len, reachable: 0 }),
            };
        };

        let root_node = self.raw.node(root);
        if root_node.parent().is_some() {
            return Err(InvariantError::RootHasParent { node: root.index() });
        }
        if root_node.is_red() {
            return Err(InvariantError::RedRoot { node: root.index() });
        }

        let Subtree { size, .. } = check_subtree(&self.raw, root)?;
        if size != self.raw.len() {
            return Err(InvariantError::CountMismatch {
                len: self.raw.len(),
                reachable: size,
            });
        }

        let mut previous = self.raw.first();
        while let Some(prev) = previous {
            let Some(next) = self.raw.successor(prev) else { break };
            if self.cmp.compare(self.raw.element(prev), self.raw.element(next)) == Ordering::Greater {
                return Err(InvariantError::OutOfOrder { node: next.index() });
            }
            previous = Some(next);
        }
        Ok(())
    }
}

/// Checks links and coloring below `node`. Recursion depth is bounded by the tree height,
/// which the coloring rules keep under 2 log2(n + 1).
fn check_subtree<T>(raw: &RawTree<T>, node: Handle) -> Result<Subtree, InvariantError> {
    let current = raw.node(node);
    let mut heights = [1, 1];
    let mut size = 1;

    for (slot, child) in [current.left(), current.right()].into_iter().enumerate() {
        let Some(child) = child else { continue };
        let child_node = raw.node(child);
        if child_node.parent() != Some(node) {
            return Err(InvariantError::BrokenParentLink {
                node: node.index(),
                child: child.index(),
            });
        }
        if current.is_red() && child_node.is_red() {
            return Err(InvariantError::RedChildOfRed {
                node: node.index(),
                child: child.index(),
            });
        }
        let subtree = check_subtree(raw, child)?;
        heights[slot] = subtree.black_height;
        size += subtree.size;
    }

    let [left, right] = heights;
    if left != right {
        return Err(InvariantError::BlackHeight {
            node: node.index(),
            left,
            right,
        });
    }
    Ok(Subtree {
        black_height: left + usize::from(!current.is_red()),
        size,
    })
}
