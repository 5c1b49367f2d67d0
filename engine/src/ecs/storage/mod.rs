//! Component storage: one type-erased [`Pool`] per component type.
//!
//! [`Pools`] is the table the world owns. It is indexed by [`component::Id`], and each entry is
//! created lazily the first time a component of that type is added. The generic accessors
//! downcast the boxed [`ErasedPool`] back to `Pool<C>`; this is the only place where the concrete
//! type is recovered.

mod pool;

pub use pool::{ErasedPool, Pool};

use crate::ecs::component::{self, Component};

/// The table of component pools, indexed by component ID.
pub struct Pools {
    pools: Vec<Option<Box<dyn ErasedPool>>>,

    /// Slot count for freshly created pools.
    initial_capacity: usize,
}

impl Pools {
    /// Construct an empty table. New pools start with `initial_capacity` slots.
    #[inline]
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            pools: Vec::new(),
            initial_capacity,
        }
    }

    /// Get the pool for `C`, if one has been created.
    pub fn get<C: Component>(&self, id: component::Id) -> Option<&Pool<C>> {
        self.pools
            .get(id.index())?
            .as_ref()?
            .as_any()
            .downcast_ref::<Pool<C>>()
    }

    /// Get the pool for `C` mutably, if one has been created.
    pub fn get_mut<C: Component>(&mut self, id: component::Id) -> Option<&mut Pool<C>> {
        self.pools
            .get_mut(id.index())?
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<Pool<C>>()
    }

    /// Get the pool for `C`, creating it if needed, grown to hold at least `len` slots.
    ///
    /// # Panics
    /// If the pool at `id` was created for another type. Component IDs are unique per type, so
    /// this indicates a bug in the caller.
    pub fn ensure<C: Component>(&mut self, id: component::Id, len: usize) -> &mut Pool<C> {
        let index = id.index();
        if index >= self.pools.len() {
            self.pools.resize_with(index + 1, || None);
        }

        let initial_capacity = self.initial_capacity;
        let pool = self.pools[index]
            .get_or_insert_with(|| Box::new(Pool::<C>::new(initial_capacity)));
        pool.resize(len);

        pool.as_any_mut()
            .downcast_mut::<Pool<C>>()
            .expect("component pool registered under another type")
    }

    /// Drop the instance stored for entity slot `index` in the pool at `id`, if any.
    pub fn release(&mut self, id: component::Id, index: usize) -> bool {
        match self.pools.get_mut(id.index()) {
            Some(Some(pool)) => pool.release(index),
            _ => false,
        }
    }

    /// Get the type-erased pool at `id`.
    pub fn erased(&self, id: component::Id) -> Option<&dyn ErasedPool> {
        self.pools.get(id.index())?.as_deref()
    }

    /// Number of pools created so far.
    pub fn len(&self) -> usize {
        self.pools.iter().filter(|pool| pool.is_some()).count()
    }

    /// Whether no pool has been created yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every pool and every instance they hold.
    pub fn clear(&mut self) {
        self.pools.clear();
    }
}
