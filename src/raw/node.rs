use super::handle::Handle;

/// Node color. An absent child counts as [`Color::Black`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// A tree node living in the arena.
///
/// Children are owned through the arena by the tree; `parent` is a navigation link only.
#[derive(Clone)]
pub(crate) struct Node<T> {
    element: T,
    color: Color,
    left: Option<Handle>,
    right: Option<Handle>,
    parent: Option<Handle>,
}

impl<T> Node<T> {
    /// Creates a detached node. New nodes are red until insertion fixup decides otherwise.
    pub(crate) fn new(element: T, parent: Option<Handle>) -> Self {
        Self {
            element,
            color: Color::Red,
            left: None,
            right: None,
            parent,
        }
    }

    #[inline]
    pub(crate) fn element(&self) -> &T {
        &self.element
    }

    #[inline]
    pub(crate) fn element_mut(&mut self) -> &mut T {
        &mut self.element
    }

    pub(crate) fn into_element(self) -> T {
        self.element
    }

    #[inline]
    pub(crate) fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) fn set_left(&mut self, left: Option<Handle>) {
        self.left = left;
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) fn set_right(&mut self, right: Option<Handle>) {
        self.right = right;
    }

    /// Returns the child on `side`.
    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    #[inline]
    pub(crate) fn parent(&self) -> Option<Handle> {
        self.parent
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    /// Returns `true` if the node has no parent.
    #[inline]
    pub(crate) fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Which child link of a parent a node hangs from.
///
/// Rebalancing cases come in mirrored pairs; they are written once against `Side` and its
/// [`opposite`](Side::opposite).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn new_node_is_red_and_detached() {
        let node = Node::new(5, None);
        assert!(node.is_red());
        assert!(node.is_root());
        assert_eq!(node.left(), None);
        assert_eq!(node.right(), None);
        assert_eq!(*node.element(), 5);
    }

    #[test]
    fn child_by_side() {
        let mut node = Node::new('x', Some(Handle::new(0)));
        let l = Handle::new(1);
        let r = Handle::new(2);
        node.set_child(Side::Left, Some(l));
        node.set_child(Side::Right.opposite().opposite(), Some(r));
        assert_eq!(node.left(), Some(l));
        assert_eq!(node.child(Side::Right), Some(r));
        assert!(!node.is_root());
    }
}
