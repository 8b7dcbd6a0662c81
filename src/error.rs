use thiserror::Error;

/// A red-black or ordering invariant found broken by [`RedBlackTree::validate`].
///
/// Public operations never produce a tree in this state when the comparator is a genuine
/// total order. Seeing one means the comparator (or an element's ordering through interior
/// mutability) changed its mind while elements were stored.
///
/// [`RedBlackTree::validate`]: crate::RedBlackTree::validate
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum InvariantError {
    /// The root node is red.
    #[error("root node #{node} is red")]
    RedRoot {
        /// Arena index of the root.
        node: usize,
    },
    /// The root node has a parent link.
    #[error("root node #{node} has a parent")]
    RootHasParent {
        /// Arena index of the root.
        node: usize,
    },
    /// A red node has a red child.
    #[error("red node #{node} has red child #{child}")]
    RedChildOfRed {
        /// Arena index of the red parent.
        node: usize,
        /// Arena index of the red child.
        child: usize,
    },
    /// Two root-to-leaf paths through a node carry different numbers of black nodes.
    #[error("black height under node #{node} differs: left {left}, right {right}")]
    BlackHeight {
        /// Arena index of the node whose subtrees disagree.
        node: usize,
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },
    /// A child's parent link does not point back at its parent.
    #[error("node #{child} is a child of #{node} but does not link back to it")]
    BrokenParentLink {
        /// Arena index of the parent.
        node: usize,
        /// Arena index of the child.
        child: usize,
    },
    /// In-order traversal produced a descending pair.
    #[error("node #{node} sorts before its in-order predecessor")]
    OutOfOrder {
        /// Arena index of the offending node.
        node: usize,
    },
    /// The stored element count disagrees with the number of reachable nodes.
    #[error("tree reports {len} elements but {reachable} nodes are reachable")]
    CountMismatch {
        /// Count reported by `len()`.
        len: usize,
        /// Nodes reachable from the root.
        reachable: usize,
    },
}
