use std::fmt;

use fixedbitset::FixedBitSet;

use crate::ecs::component::Id;

/// A fixed-width bit-vector of component IDs.
///
/// Bit *i* is set when the owner (an entity, or a system's requirement set) includes the
/// component with [`Id`] *i*. The width is chosen when the signature is created and never
/// changes; it matches the capacity of the world's component registry.
///
/// Signatures are only mutated by the world (component add/remove, entity removal) and by
/// [`Requirements`](crate::ecs::Requirements) while a system declares what it needs.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Signature {
    bits: FixedBitSet,
}

impl Signature {
    /// Construct an empty signature `capacity` bits wide.
    #[inline]
    pub fn new(capacity: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(capacity),
        }
    }

    /// Number of component bits this signature can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.bits.len()
    }

    /// Whether the bit for `id` is set.
    #[inline]
    pub fn contains(&self, id: Id) -> bool {
        self.bits.contains(id.index())
    }

    /// Whether every bit of `required` is also set here, i.e. `(required & self) == required`.
    #[inline]
    pub fn satisfies(&self, required: &Signature) -> bool {
        required.bits.is_subset(&self.bits)
    }

    /// Number of set bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Whether no bit is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    /// Iterate the component IDs whose bits are set, in ascending order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = Id> + '_ {
        self.bits.ones().map(Id::from)
    }

    /// Set the bit for `id`.
    ///
    /// # Panics
    /// If `id` is outside the signature's capacity.
    #[inline]
    pub(crate) fn insert(&mut self, id: Id) {
        self.bits.insert(id.index());
    }

    /// Clear the bit for `id`. Out of range IDs are ignored.
    #[inline]
    pub(crate) fn remove(&mut self, id: Id) {
        if id.index() < self.bits.len() {
            self.bits.set(id.index(), false);
        }
    }

    /// Clear every bit.
    #[inline]
    pub(crate) fn reset(&mut self) {
        self.bits.clear();
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.bits.ones()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signature(capacity: usize, ids: &[u32]) -> Signature {
        let mut signature = Signature::new(capacity);
        for id in ids {
            signature.insert(Id::new(*id));
        }
        signature
    }

    #[test]
    fn insert_and_remove() {
        // Given
        let mut sig = Signature::new(32);

        // When
        sig.insert(Id::new(3));
        sig.insert(Id::new(31));

        // Then
        assert!(sig.contains(Id::new(3)));
        assert!(sig.contains(Id::new(31)));
        assert!(!sig.contains(Id::new(4)));
        assert_eq!(sig.len(), 2);
        assert_eq!(sig.iter().collect::<Vec<_>>(), vec![Id::new(3), Id::new(31)]);

        // When
        sig.remove(Id::new(3));
        sig.remove(Id::new(200));

        // Then
        assert!(!sig.contains(Id::new(3)));
        assert_eq!(sig.len(), 1);
        assert_eq!(sig.capacity(), 32);
    }

    #[test]
    fn satisfies_requires_superset() {
        // Given
        let required = signature(32, &[0, 2]);

        // Then
        assert!(signature(32, &[0, 1, 2]).satisfies(&required));
        assert!(signature(32, &[0, 2]).satisfies(&required));
        assert!(!signature(32, &[0, 1]).satisfies(&required));
        assert!(!Signature::new(32).satisfies(&required));

        // Then - An empty requirement is satisfied by anything
        assert!(Signature::new(32).satisfies(&Signature::new(32)));
    }

    #[test]
    fn reset_clears_all_bits() {
        // Given
        let mut sig = signature(8, &[1, 5, 7]);

        // When
        sig.reset();

        // Then
        assert!(sig.is_empty());
        assert_eq!(sig.capacity(), 8);
    }

    #[test]
    #[should_panic]
    fn insert_beyond_capacity_panics() {
        let mut sig = Signature::new(4);
        sig.insert(Id::new(4));
    }
}
