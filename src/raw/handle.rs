use core::num::NonZero;

/// Identifier of a node slot in the arena.
///
/// Stored as `NonZero<u32>` so that `Option<NodeId>` (the root reference)
/// costs no extra space.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct NodeId(NonZero<u32>);

impl NodeId {
    pub(crate) const MAX: usize = (u32::MAX - 1) as usize;

    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`NodeId::from_index()` - `index` > `NodeId::MAX`!");
        // `index + 1` cannot be zero and cannot overflow after the assert.
        #[allow(clippy::cast_possible_truncation)]
        Self(NonZero::new((index + 1) as u32).unwrap())
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use static_assertions::assert_eq_size;

    // Verify the niche optimization actually applies.
    assert_eq_size!(NodeId, Option<NodeId>);
    assert_eq_size!(NodeId, u32);

    #[test]
    #[should_panic(expected = "`NodeId::from_index()` - `index` > `NodeId::MAX`!")]
    fn invalid_id() {
        let _ = NodeId::from_index(NodeId::MAX + 1);
    }

    proptest! {
        #[test]
        fn id_round_trip(index in 0..=NodeId::MAX) {
            let id = NodeId::from_index(index);
            assert_eq!(id.index(), index);
        }
    }
}
