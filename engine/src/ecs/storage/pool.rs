//! Dense, entity-indexed storage for a single component type.

use std::any::{Any, type_name};

use crate::ecs::component::Component;

/// Dense storage for every instance of one component type, indexed by entity ID.
///
/// Slot `i` holds the component of the entity with ID `i`, or `None` if that entity does not
/// have one. Slots are never compacted: removing a component only empties its slot.
#[derive(Debug)]
pub struct Pool<T> {
    slots: Vec<Option<T>>,
}

impl<T: Component> Pool<T> {
    /// Construct a pool with `capacity` empty slots.
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { slots }
    }

    /// Number of slots (occupied or not).
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the pool has no slots at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Grow the pool to at least `len` slots. Existing slots are kept; the pool never shrinks.
    pub fn resize(&mut self, len: usize) {
        if len > self.slots.len() {
            self.slots.resize_with(len, || None);
        }
    }

    /// Drop every held instance and every slot.
    #[inline]
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Store `value` at `index`, returning the instance it replaced.
    ///
    /// # Panics
    /// If `index` is out of bounds. Callers resize first.
    #[inline]
    pub fn insert(&mut self, index: usize, value: T) -> Option<T> {
        self.slots[index].replace(value)
    }

    /// Get the instance at `index`, if the slot exists and is occupied.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Get the instance at `index` mutably, if the slot exists and is occupied.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Take the instance out of `index`, leaving the slot unused.
    #[inline]
    pub fn remove(&mut self, index: usize) -> Option<T> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Number of occupied slots.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

/// Object-safe view of a [`Pool`], so pools of different component types can share one table.
///
/// The world stores `Box<dyn ErasedPool>` and uses [`as_any()`](Self::as_any) and
/// [`as_any_mut()`](Self::as_any_mut) to downcast back to `Pool<T>` wherever `T` is known.
pub trait ErasedPool {
    /// Number of slots.
    fn len(&self) -> usize;

    /// Whether the pool has no slots.
    fn is_empty(&self) -> bool;

    /// Grow to at least `len` slots.
    fn resize(&mut self, len: usize);

    /// Drop every instance and slot.
    fn clear(&mut self);

    /// Drop the instance at `index`, if any. Returns whether one was dropped.
    fn release(&mut self, index: usize) -> bool;

    /// The stored component's type name.
    fn type_name(&self) -> &'static str;

    /// Returns a reference to self as `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns a mutable reference to self as `&mut dyn Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedPool for Pool<T> {
    fn len(&self) -> usize {
        Pool::len(self)
    }

    fn is_empty(&self) -> bool {
        Pool::is_empty(self)
    }

    fn resize(&mut self, len: usize) {
        Pool::resize(self, len);
    }

    fn clear(&mut self) {
        Pool::clear(self);
    }

    fn release(&mut self, index: usize) -> bool {
        self.remove(index).is_some()
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
