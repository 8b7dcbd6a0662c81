use alloc::vec::Vec;

use super::handle::Handle;

/// A slot is either live or a link in the chain of reclaimed slots.
#[derive(Clone)]
enum Slot<T> {
    Occupied(T),
    Vacant { next_free: Option<Handle> },
}

/// Resizable pool of node slots addressed by [`Handle`].
///
/// Freed slots are threaded into an intrusive free-list and handed out again, most recently
/// freed first, before the backing vector grows.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<Handle>,
    len: usize,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Number of occupied slots.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        let handle = if let Some(h) = self.free_head {
            let slot = &mut self.slots[h.index()];
            let Slot::Vacant { next_free } = *slot else {
                panic!("`Arena::alloc()` - free-list points at an occupied slot!");
            };
            self.free_head = next_free;
            *slot = Slot::Occupied(element);
            h
        } else {
            // Strict less-than keeps every pushed index representable as a `Handle`.
            assert!(
                self.slots.len() < Handle::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::MAX
            );
            self.slots.push(Slot::Occupied(element));
            Handle::new(self.slots.len() - 1)
        };
        self.len += 1;
        handle
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        match &self.slots[handle.index()] {
            Slot::Occupied(element) => element,
            Slot::Vacant { .. } => panic!("`Arena::get()` - `handle` is invalid!"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        match &mut self.slots[handle.index()] {
            Slot::Occupied(element) => element,
            Slot::Vacant { .. } => panic!("`Arena::get_mut()` - `handle` is invalid!"),
        }
    }

    /// Returns mutable references to two distinct occupied slots.
    pub(crate) fn get2_mut(&mut self, a: Handle, b: Handle) -> (&mut T, &mut T) {
        let (ia, ib) = (a.index(), b.index());
        assert_ne!(ia, ib, "`Arena::get2_mut()` - handles alias!");
        let (lo, hi, swapped) = if ia < ib { (ia, ib, false) } else { (ib, ia, true) };
        let (head, tail) = self.slots.split_at_mut(hi);
        let (Slot::Occupied(x), Slot::Occupied(y)) = (&mut head[lo], &mut tail[0]) else {
            panic!("`Arena::get2_mut()` - `handle` is invalid!");
        };
        if swapped { (y, x) } else { (x, y) }
    }

    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let slot = core::mem::replace(
            &mut self.slots[handle.index()],
            Slot::Vacant {
                next_free: self.free_head,
            },
        );
        match slot {
            Slot::Occupied(element) => {
                self.free_head = Some(handle);
                self.len -= 1;
                element
            }
            Slot::Vacant { .. } => panic!("`Arena::take()` - `handle` is invalid!"),
        }
    }

    /// Drops every element and forgets all slots; capacity is retained.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.len = 0;
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    extern crate std;

    use super::*;
    use alloc::vec::Vec;
    use proptest::prelude::*;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    #[test]
    fn arena_capacity() {
        let arena: Arena<u32> = Arena::with_capacity(10);
        assert_eq!(arena.capacity(), 10);
        assert!(arena.is_empty());
    }

    #[test]
    fn freed_slots_are_reused_lifo() {
        let mut arena = Arena::new();
        let a = arena.alloc('a');
        let b = arena.alloc('b');
        let _c = arena.alloc('c');
        assert_eq!(arena.take(a), 'a');
        assert_eq!(arena.take(b), 'b');
        assert_eq!(arena.alloc('d'), b);
        assert_eq!(arena.alloc('e'), a);
        assert_eq!(arena.len(), 3);
        assert!(arena.capacity() >= 3);
    }

    #[test]
    fn get2_mut_respects_argument_order() {
        let mut arena = Arena::new();
        let a = arena.alloc(1);
        let b = arena.alloc(2);
        let (y, x) = arena.get2_mut(b, a);
        core::mem::swap(x, y);
        assert_eq!(*arena.get(a), 2);
        assert_eq!(*arena.get(b), 1);
    }

    #[test]
    fn full_arena_rejects_alloc_without_counting_it() {
        let mut arena = Arena::with_capacity(Handle::MAX);
        for _ in 0..Handle::MAX {
            arena.alloc(0u8);
        }
        assert_eq!(arena.len(), Handle::MAX);

        let rejected = catch_unwind(AssertUnwindSafe(|| arena.alloc(1)));
        assert!(rejected.is_err());
        assert_eq!(arena.len(), Handle::MAX);

        // A freed slot can still be handed out again.
        let last = Handle::new(Handle::MAX - 1);
        assert_eq!(arena.take(last), 0);
        assert_eq!(arena.alloc(2), last);
        assert_eq!(arena.len(), Handle::MAX);
    }

    #[test]
    #[should_panic(expected = "`Arena::take()` - `handle` is invalid!")]
    fn double_take_panics() {
        let mut arena = Arena::new();
        let a = arena.alloc(1);
        arena.take(a);
        arena.take(a);
    }

    proptest! {
        #[test]
        fn arena_behaves_like_vec(operations in prop::collection::vec(strategy(), 0..256)) {
            let mut model: Vec<(Handle, u32)> = Vec::new();
            let mut arena: Arena<u32> = Arena::new();

            for operation in operations {
                match operation {
                    Operation::Alloc(value) => {
                        let handle = arena.alloc(value);
                        prop_assert!(model.iter().all(|&(h, _)| h != handle));
                        model.push((handle, value));
                    }
                    Operation::GetMut(which, value) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        *arena.get_mut(model[index].0) = value;
                        model[index].1 = value;
                    }
                    Operation::Take(which) => {
                        if model.is_empty() {
                            continue;
                        }

                        let index = which % model.len();
                        let value = arena.take(model[index].0);
                        let (_, expected) = model.swap_remove(index);
                        prop_assert_eq!(value, expected);
                    }
                    Operation::Clear => {
                        arena.clear();
                        model.clear();
                    }
                }

                prop_assert_eq!(arena.len(), model.len());
                prop_assert_eq!(arena.is_empty(), model.is_empty());

                for &(handle, value) in &model {
                    prop_assert_eq!(*arena.get(handle), value);
                }
            }
        }
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Alloc(u32),
        GetMut(usize, u32),
        Take(usize),
        Clear,
    }

    fn strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            20 => any::<u32>().prop_map(Operation::Alloc),
            5 => (any::<usize>(), any::<u32>()).prop_map(|(which, value)| Operation::GetMut(which, value)),
            10 => any::<usize>().prop_map(Operation::Take),
            1 => Just(Operation::Clear),
        ]
    }
}
