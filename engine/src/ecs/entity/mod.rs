//! Entity identity and lifecycle.
//!
//! An entity is nothing but an integer ID plus the ID of the [`World`] that created it. The
//! world owns all entity state; an [`Entity`] handle is a `Copy` value that can be stored by
//! systems, sent in events, and compared cheaply.
//!
//! # Architecture
//!
//! - **[`Entity`]**: the handle. Equality, ordering and hashing use the entity ID only.
//! - **[`Allocator`]**: hands out IDs, reusing freed IDs (FIFO) before growing the ID space.
//! - **[`Registry`]**: the per-entity table of lifecycle state and component [`Signature`]s,
//!   indexed by entity ID.
//!
//! # Ownership
//!
//! The handle refers back to its world through [`world::Id`], never through a pointer or a
//! reference count, so an entity can never keep its world alive. Component forwarders take the
//! world explicitly and fail with [`Error::Detached`](crate::ecs::Error::Detached) or
//! [`Error::ForeignEntity`](crate::ecs::Error::ForeignEntity) when the handle does not belong to
//! it.
//!
//! [`Signature`]: crate::ecs::Signature

mod registry;

use std::{cmp::Ordering, fmt, hash};

use crossbeam::queue::SegQueue;
use log::trace;

use crate::ecs::{
    Result,
    component::Component,
    world::{self, World},
};

pub use registry::{Registry, State};

/// An entity identifier.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// Construct an Id from a raw u32 value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw identifier value.
    #[inline]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Get the index of this entity if it were to live in indexable storage (e.g. Vec)
    #[inline]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for Id {
    #[inline]
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A handle to an entity in a [`World`].
#[derive(Debug, Clone, Copy)]
pub struct Entity {
    /// The entity's identifier.
    id: Id,

    /// The world that created this entity, if any.
    owner: Option<world::Id>,
}

impl Entity {
    /// Construct a handle owned by `owner`.
    #[inline]
    pub(crate) const fn new(id: Id, owner: world::Id) -> Self {
        Self {
            id,
            owner: Some(owner),
        }
    }

    /// Construct a handle with no owning world.
    ///
    /// Detached handles compare equal to owned handles with the same ID, which makes them
    /// useful as lookup keys, but every world operation rejects them.
    #[inline]
    pub fn detached(id: u32) -> Self {
        Self {
            id: Id(id),
            owner: None,
        }
    }

    /// Get the id of this entity.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Get the index of this entity if it were to live in indexable storage (e.g. Vec)
    #[inline]
    pub fn index(&self) -> usize {
        self.id.index()
    }

    /// The world that created this entity.
    #[inline]
    pub fn owner(&self) -> Option<world::Id> {
        self.owner
    }

    /// Attach a component to this entity. See [`World::add_component`].
    #[inline]
    pub fn add_component<C: Component>(&self, world: &mut World, component: C) -> Result<()> {
        world.add_component(*self, component)
    }

    /// Detach a component from this entity. See [`World::remove_component`].
    #[inline]
    pub fn remove_component<C: Component>(&self, world: &mut World) -> Result<()> {
        world.remove_component::<C>(*self)
    }

    /// Whether this entity has a `C` component. See [`World::has_component`].
    #[inline]
    pub fn has_component<C: Component>(&self, world: &World) -> Result<bool> {
        world.has_component::<C>(*self)
    }

    /// Borrow this entity's `C` component. See [`World::get_component`].
    #[inline]
    pub fn get_component<'w, C: Component>(&self, world: &'w World) -> Result<&'w C> {
        world.get_component::<C>(*self)
    }

    /// Mutably borrow this entity's `C` component. See [`World::get_component_mut`].
    #[inline]
    pub fn get_component_mut<'w, C: Component>(&self, world: &'w mut World) -> Result<&'w mut C> {
        world.get_component_mut::<C>(*self)
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Entity {}

impl hash::Hash for Entity {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Entity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity {}", self.id)
    }
}

/// An allocator for entity IDs.
///
/// Freed IDs go to the back of a dead pool and are handed out again, oldest first, before any
/// fresh ID is minted. Fresh IDs are sequential from 0 and capped by `max`.
#[derive(Debug)]
pub struct Allocator {
    /// Pool of IDs available for reuse.
    dead_pool: SegQueue<Id>,

    /// Next fresh ID to allocate.
    next_id: u32,

    /// Fresh IDs are allocated strictly below this value.
    max: u32,
}

impl Allocator {
    /// Construct a new allocator starting from ID 0 and minting IDs below `max`.
    #[inline]
    pub const fn new(max: u32) -> Self {
        Self {
            dead_pool: SegQueue::new(),
            next_id: 0,
            max,
        }
    }

    /// Allocate an ID, reusing a freed one if available.
    ///
    /// # Panics
    /// If the dead pool is empty and every ID below `max` is in use.
    pub fn alloc(&mut self) -> Id {
        if let Some(id) = self.dead_pool.pop() {
            trace!("reusing entity id {}", id);
            return id;
        }

        assert!(
            self.next_id < self.max,
            "entity capacity exceeded: all {} entity ids are in use",
            self.max
        );
        let id = Id(self.next_id);
        self.next_id += 1;
        id
    }

    /// Return an ID for reuse.
    pub fn free(&mut self, id: Id) {
        self.dead_pool.push(id);
    }

    /// Number of IDs ever minted (the high-water mark of the ID space).
    #[inline]
    pub fn minted(&self) -> u32 {
        self.next_id
    }

    /// Number of IDs waiting for reuse.
    #[inline]
    pub fn reusable(&self) -> usize {
        self.dead_pool.len()
    }
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new(crate::ecs::config::MAX_ENTITIES)
    }
}
