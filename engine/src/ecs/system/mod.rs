//! Systems: per-frame logic over the entities that have a required set of components.
//!
//! # Overview
//!
//! A system declares the components it needs once, in [`System::require`], and from then on the
//! [`World`] keeps its member list in sync: an entity is a member exactly when its signature
//! contains every required component. Each frame the world calls [`System::update`] with a
//! snapshot of the members.
//!
//! ```rust,ignore
//! use kestrel_engine::ecs::{Component, Entity, Requirements, Result, System, World};
//!
//! #[derive(Component)]
//! struct Position { x: f32, y: f32 }
//!
//! #[derive(Component, Clone, Copy)]
//! struct Velocity { dx: f32, dy: f32 }
//!
//! struct Movement;
//!
//! impl System for Movement {
//!     fn require(&self, requires: &mut Requirements<'_>) {
//!         requires.component::<Position>().component::<Velocity>();
//!     }
//!
//!     fn update(&mut self, world: &mut World, entities: &[Entity], delta: f32) -> Result<()> {
//!         for entity in entities {
//!             let velocity = *world.get_component::<Velocity>(*entity)?;
//!             let position = world.get_component_mut::<Position>(*entity)?;
//!             position.x += velocity.dx * delta;
//!             position.y += velocity.dy * delta;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! world.add_system(Movement);
//! ```
//!
//! # Membership timing
//!
//! Component changes re-evaluate membership immediately. Entity creation and destruction only
//! reach systems at the next flush, which the world performs at the start of every
//! [`World::update`]. The entity slice handed to `update` is taken when the system's turn
//! starts, so a system never sees its own list change under it.

mod members;
mod registry;

use std::any::Any;

use crate::ecs::{
    Result,
    component::{self, Component, Signature},
    entity::Entity,
    world::World,
};

pub use members::Members;
pub use registry::Registry;

use members::{ComponentKey, SortKey};

/// Behaviour run once per frame over the entities matching a component signature.
pub trait System: 'static {
    /// Declare required components. Called once, when the system is added to a world and before
    /// any entity is evaluated against it.
    fn require(&self, requires: &mut Requirements<'_>);

    /// Run one frame over `entities`, the members at the start of this system's turn.
    ///
    /// Entities created or destroyed here become visible to systems only at the next frame.
    fn update(&mut self, world: &mut World, entities: &[Entity], delta: f32) -> Result<()>;
}

/// Collects the component signature (and optional member ordering) of a system.
pub struct Requirements<'a> {
    components: &'a mut component::Registry,
    signature: Signature,
    order: Option<Box<dyn SortKey>>,
}

impl<'a> Requirements<'a> {
    pub(crate) fn new(components: &'a mut component::Registry) -> Self {
        let signature = Signature::new(components.capacity());
        Self {
            components,
            signature,
            order: None,
        }
    }

    /// Require component `C`.
    ///
    /// # Panics
    /// If `C` is a new component type and the world's component type capacity is exhausted.
    pub fn component<C: Component>(&mut self) -> &mut Self {
        let id = self.components.register::<C>();
        self.signature.insert(id);
        self
    }

    /// Require component `C` and keep members ordered by `key`, read from each entity's `C`
    /// when it joins.
    pub fn order_by<C: Component>(&mut self, key: fn(&C) -> i64) -> &mut Self {
        let id = self.components.register::<C>();
        self.signature.insert(id);
        self.order = Some(Box::new(ComponentKey::<C> { id, key }));
        self
    }

    /// The signature collected so far.
    #[inline]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub(crate) fn into_members(self) -> Members {
        Members::new(self.signature, self.order)
    }
}

/// Object-safe view of a [`System`], so systems of different types share one table.
pub(crate) trait ErasedSystem {
    fn run(&mut self, world: &mut World, entities: &[Entity], delta: f32) -> Result<()>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<S: System> ErasedSystem for S {
    fn run(&mut self, world: &mut World, entities: &[Entity], delta: f32) -> Result<()> {
        self.update(world, entities, delta)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
