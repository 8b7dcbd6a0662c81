use core::fmt;
use core::num::NonZero;

// Narrow under test so the overflow path is reachable.
#[cfg(test)]
type Repr = u16;
#[cfg(not(test))]
type Repr = u32;

/// Position of a node in the arena.
///
/// Every child and parent link is an `Option<Handle>`. The index is kept biased by one
/// inside a `NonZero`, which lets `None` use the zero bit pattern.
#[derive(Clone, Copy, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<Repr>);

impl Handle {
    /// Largest slot index a handle can name.
    pub(crate) const MAX: usize = (Repr::MAX - 1) as usize;

    /// Panics if `index` exceeds [`Handle::MAX`].
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) const fn new(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::new()` - `index` > `Handle::MAX`!");
        match NonZero::new((index + 1) as Repr) {
            Some(biased) => Self(biased),
            None => unreachable!(),
        }
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::format;
    use proptest::prelude::*;
    use static_assertions::assert_eq_size;

    // Absent links cost nothing extra per node.
    assert_eq_size!(Option<Handle>, Handle);
    assert_eq_size!(Handle, Repr);

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(Handle::new(0).index(), 0);
        assert_eq!(Handle::new(Handle::MAX).index(), Handle::MAX);
    }

    #[test]
    #[should_panic(expected = "`Handle::new()` - `index` > `Handle::MAX`!")]
    fn index_past_max_panics() {
        let _ = Handle::new(Handle::MAX + 1);
    }

    #[test]
    fn debug_shows_index() {
        assert_eq!(format!("{:?}", Handle::new(7)), "#7");
    }

    proptest! {
        #[test]
        fn index_survives_biasing(index in 0..=Handle::MAX) {
            prop_assert_eq!(Handle::new(index).index(), index);
        }
    }
}
