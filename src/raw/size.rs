use super::handle::Handle;

/// Count of entries in a subtree.
///
/// Shares `Handle`'s representation (stored as `count + 1`), which caps every
/// subtree size at the number of addressable arena slots and keeps the niche
/// available for `Option<Size>`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Size(Handle);

impl Size {
    pub(crate) const MAX: usize = Handle::MAX;

    #[inline]
    pub(crate) const fn from_usize(size: usize) -> Self {
        assert!(size <= Self::MAX, "`Size::from_usize()` - `size` > `Size::MAX`!");
        Self(Handle::from_index(size))
    }

    #[inline]
    pub(crate) const fn to_usize(self) -> usize {
        self.0.to_index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use static_assertions::assert_eq_size;

    assert_eq_size!(Size, Option<Size>);
    assert_eq_size!(Size, Handle);

    #[test]
    #[should_panic(expected = "`Size::from_usize()` - `size` > `Size::MAX`!")]
    fn size_past_max_panics() {
        let _ = Size::from_usize(Size::MAX + 1);
    }

    proptest! {
        #[test]
        fn size_round_trips(size in 0..=Size::MAX) {
            prop_assert_eq!(Size::from_usize(size).to_usize(), size);
        }
    }
}
