use alloc::vec::Vec;

use super::handle::Handle;

/// Slot arena owning every tree node.
///
/// Nodes refer to each other by `Handle`, so parent back-links cost nothing
/// in ownership terms: the arena owns, the tree navigates. Freed slots go on
/// a free list and are reused by later allocations.
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Number of live (allocated, not freed) elements.
    pub(crate) fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(handle) = self.free.pop() {
            self.slots[handle.to_index()] = Some(element);
            handle
        } else {
            // Every slot index must stay addressable by a `Handle`.
            assert!(
                self.slots.len() <= Handle::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::MAX
            );
            self.slots.push(Some(element));
            Handle::from_index(self.slots.len() - 1)
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Removes the element, putting its slot back into circulation.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.to_index()].take().expect("`Arena::take()` - `handle` is invalid!");
        self.free.push(handle);
        element
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Clone, Debug)]
    enum Step {
        Alloc(u64),
        Mutate(usize, u64),
        Take(usize),
        Clear,
    }

    fn step_strategy() -> impl Strategy<Value = Step> {
        prop_oneof![
            8 => any::<u64>().prop_map(Step::Alloc),
            3 => (any::<usize>(), any::<u64>()).prop_map(|(which, value)| Step::Mutate(which, value)),
            3 => any::<usize>().prop_map(Step::Take),
            1 => Just(Step::Clear),
        ]
    }

    proptest! {
        /// Drives the arena alongside a plain `Vec` mirror; every live handle
        /// must keep resolving to the value it was allocated (or mutated) to,
        /// across slot reuse.
        #[test]
        fn arena_matches_mirror(steps in prop::collection::vec(step_strategy(), 0..200)) {
            let mut arena: Arena<u64> = Arena::new();
            let mut mirror: Vec<(Handle, u64)> = Vec::new();

            for step in steps {
                match step {
                    Step::Alloc(value) => {
                        let handle = arena.alloc(value);
                        mirror.push((handle, value));
                    }
                    Step::Mutate(which, value) => {
                        let idx = which % mirror.len().max(1);
                        if let Some(entry) = mirror.get_mut(idx) {
                            *arena.get_mut(entry.0) = value;
                            entry.1 = value;
                        }
                    }
                    Step::Take(which) => {
                        if !mirror.is_empty() {
                            let (handle, expected) = mirror.swap_remove(which % mirror.len());
                            prop_assert_eq!(arena.take(handle), expected);
                        }
                    }
                    Step::Clear => {
                        arena.clear();
                        mirror.clear();
                    }
                }

                prop_assert_eq!(arena.len(), mirror.len());
                for &(handle, value) in &mirror {
                    prop_assert_eq!(*arena.get(handle), value);
                }
            }
        }
    }
}
