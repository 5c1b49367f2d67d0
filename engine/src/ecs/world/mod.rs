//! The World is the central container for all entities, components, and systems in the ECS.
//!
//! # Architecture
//!
//! The World coordinates several subsystems:
//! - **Entity Allocator**: hands out entity IDs, reusing freed IDs first
//! - **Entity Registry**: the signature table, with the lifecycle state of every ID
//! - **Component Registry**: assigns a small integer ID to each component type
//! - **Pools**: one typed pool per component type, indexed by entity ID
//! - **System Registry**: the systems, in registration order, with their member lists
//!
//! # Frame protocol
//!
//! Creating and destroying entities is deferred: both are queued and applied by [`World::flush`],
//! which [`World::update`] calls before running any system. Component changes are applied at
//! once, and re-evaluate the entity's membership in every system straight away.
//!
//! ```ignore
//! use kestrel_engine::ecs::World;
//!
//! let mut world = World::new();
//! world.add_system(MovementSystem);
//!
//! let entity = world.create_entity();
//! world.add_component(entity, Transform::default())?;
//! world.add_component(entity, RigidBody::new(5.0, 0.0))?;
//!
//! // Flushes the new entity into MovementSystem, then runs it.
//! world.update(1.0)?;
//! ```
//!
//! A destroyed entity keeps its ID (and its components) until the next flush. Handles held in
//! events or system state therefore stay valid for the rest of the frame.

use std::{
    any::type_name,
    collections::BTreeSet,
    fmt,
    marker::PhantomData,
    sync::atomic::{AtomicU32, Ordering},
};

use log::{debug, info, trace, warn};

use crate::ecs::{
    Config, Error, Result,
    config::MAX_COMPONENT_TYPES,
    component::{self, Component, Signature},
    entity::{self, Entity, State},
    storage::Pools,
    system::{self, Requirements, System},
};

static NEXT_WORLD_ID: AtomicU32 = AtomicU32::new(0);

/// A world identifier. This is a unique identifier for a world in the ECS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// Create a new world identifier.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Id(id)
    }

    /// Get the raw identifier value.
    #[inline]
    pub const fn value(&self) -> u32 {
        self.0
    }

    fn next() -> Self {
        Id(NEXT_WORLD_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The World is the central container for all entities, components, and their relationships.
///
/// Each world is isolated from other worlds: entity handles carry the ID of the world that
/// created them and are rejected everywhere else.
pub struct World {
    /// The world's unique identifier.
    id: Id,

    config: Config,

    allocator: entity::Allocator,

    /// Lifecycle state and signature of every entity ID.
    entities: entity::Registry,

    components: component::Registry,

    pools: Pools,

    systems: system::Registry,

    /// Created since the last flush.
    pending_add: BTreeSet<Entity>,

    /// Destroyed since the last flush.
    pending_remove: BTreeSet<Entity>,

    /// Reused member snapshot for the running system.
    scratch: Vec<Entity>,

    /// Worlds are single-threaded.
    _not_send: PhantomData<*mut ()>,
}

impl World {
    /// Create a world with the default [`Config`].
    pub fn new() -> Self {
        Self::with_config(Config::new())
    }

    /// Create a world with the given limits.
    ///
    /// # Panics
    /// If `config.max_component_types` is larger than [`MAX_COMPONENT_TYPES`].
    pub fn with_config(config: Config) -> Self {
        assert!(
            config.max_component_types <= MAX_COMPONENT_TYPES,
            "component type capacity {} exceeds MAX_COMPONENT_TYPES ({})",
            config.max_component_types,
            MAX_COMPONENT_TYPES
        );
        let id = Id::next();
        debug!("creating world {} with {:?}", id, config);
        Self {
            id,
            config,
            allocator: entity::Allocator::new(config.max_entities),
            entities: entity::Registry::new(config.max_component_types),
            components: component::Registry::new(config.max_component_types),
            pools: Pools::new(config.pool_capacity),
            systems: system::Registry::new(),
            pending_add: BTreeSet::new(),
            pending_remove: BTreeSet::new(),
            scratch: Vec::new(),
            _not_send: PhantomData,
        }
    }

    /// Get the unique identifier of this world.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Get the limits this world was created with.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the component type registry.
    #[inline]
    pub fn components(&self) -> &component::Registry {
        &self.components
    }

    // ==== Entities ====

    /// Create a new entity.
    ///
    /// The entity accepts components immediately, but systems only see it after the next flush.
    ///
    /// # Panics
    /// If every entity ID below [`Config::max_entities`] is in use.
    pub fn create_entity(&mut self) -> Entity {
        let id = self.allocator.alloc();
        self.entities.spawn(id);

        let entity = Entity::new(id, self.id);
        self.pending_add.insert(entity);
        debug!("created entity {} in world {}", id, self.id);
        entity
    }

    /// Destroy an entity at the next flush.
    ///
    /// Until then the entity keeps its components and stays in its systems. Destroying an entity
    /// that is already queued for removal does nothing.
    pub fn destroy_entity(&mut self, entity: Entity) -> Result<()> {
        self.check(entity)?;

        if self.entities.doom(entity.id()) {
            self.pending_remove.insert(entity);
            debug!("destroying entity {} at next flush", entity.id());
        } else {
            warn!("entity {} is already queued for removal", entity.id());
        }
        Ok(())
    }

    /// Get the lifecycle state of `entity`.
    pub fn state(&self, entity: Entity) -> Result<State> {
        self.check_owner(entity)?;
        Ok(self.entities.state(entity.id()))
    }

    /// Whether `entity` belongs to this world and is visible to systems.
    pub fn is_alive(&self, entity: Entity) -> bool {
        matches!(self.state(entity), Ok(State::Alive))
    }

    /// Number of entity IDs in use: pending, alive, or destroyed but not yet flushed.
    pub fn entity_count(&self) -> usize {
        self.entities.live_count()
    }

    /// Get the component signature of `entity`.
    pub fn signature(&self, entity: Entity) -> Result<&Signature> {
        self.check(entity)?;
        self.entities
            .signature(entity.id())
            .ok_or(Error::DeadEntity(entity.id()))
    }

    // ==== Components ====

    /// Attach `component` to `entity`, replacing any previous `C`.
    ///
    /// # Panics
    /// If `C` is a new component type and [`Config::max_component_types`] types are already
    /// registered.
    pub fn add_component<C: Component>(&mut self, entity: Entity, component: C) -> Result<()> {
        self.check(entity)?;

        let id = self.components.register::<C>();
        let index = entity.index();
        let replaced = self.pools.ensure::<C>(id, index + 1).insert(index, component);
        if let Some(signature) = self.entities.signature_mut(entity.id()) {
            signature.insert(id);
        }

        trace!(
            "{} `{}` on entity {}",
            if replaced.is_some() { "replaced" } else { "added" },
            type_name::<C>(),
            entity.id()
        );
        self.refresh_membership(entity);
        Ok(())
    }

    /// Detach `C` from `entity`. Removing a component the entity does not have does nothing.
    pub fn remove_component<C: Component>(&mut self, entity: Entity) -> Result<()> {
        self.check(entity)?;

        let Some(id) = self.components.get::<C>() else {
            return Ok(());
        };
        let Some(signature) = self.entities.signature_mut(entity.id()) else {
            return Ok(());
        };
        if !signature.contains(id) {
            return Ok(());
        }

        signature.remove(id);
        self.pools.release(id, entity.index());
        trace!("removed `{}` from entity {}", type_name::<C>(), entity.id());
        self.refresh_membership(entity);
        Ok(())
    }

    /// Whether `entity` has a `C`.
    pub fn has_component<C: Component>(&self, entity: Entity) -> Result<bool> {
        self.check(entity)?;
        Ok(self.component_id::<C>(entity).is_some())
    }

    /// Borrow the `C` of `entity`.
    pub fn get_component<C: Component>(&self, entity: Entity) -> Result<&C> {
        self.check(entity)?;
        self.component_id::<C>(entity)
            .and_then(|id| self.pools.get::<C>(id))
            .and_then(|pool| pool.get(entity.index()))
            .ok_or_else(|| missing_component::<C>(entity))
    }

    /// Mutably borrow the `C` of `entity`.
    pub fn get_component_mut<C: Component>(&mut self, entity: Entity) -> Result<&mut C> {
        self.check(entity)?;
        let id = self
            .component_id::<C>(entity)
            .ok_or_else(|| missing_component::<C>(entity))?;
        self.pools
            .get_mut::<C>(id)
            .and_then(|pool| pool.get_mut(entity.index()))
            .ok_or_else(|| missing_component::<C>(entity))
    }

    // ==== Systems ====

    /// Register `system`, returning `false` (and dropping `system`) if one of the same type is
    /// already registered.
    ///
    /// The system's requirements are collected once, here, and every entity already visible to
    /// systems (alive, or destroyed but not yet flushed) that matches them becomes a member.
    ///
    /// # Panics
    /// If the system requires new component types beyond [`Config::max_component_types`].
    pub fn add_system<S: System>(&mut self, system: S) -> bool {
        if self.systems.contains::<S>() {
            debug!("system `{}` is already registered", type_name::<S>());
            return false;
        }

        let mut requires = Requirements::new(&mut self.components);
        system.require(&mut requires);
        let mut members = requires.into_members();

        for id in self.entities.visible() {
            if let Some(signature) = self.entities.signature(id) {
                members.refresh(Entity::new(id, self.id), signature, &self.pools);
            }
        }

        info!(
            "registered system `{}` with {} entities",
            type_name::<S>(),
            members.len()
        );
        self.systems.insert(system, members);
        true
    }

    /// Unregister system `S`. Returns `false` if it was not registered.
    ///
    /// A system may remove itself during its own update; it is dropped when the update returns.
    pub fn remove_system<S: System>(&mut self) -> bool {
        let removed = self.systems.remove::<S>();
        if removed {
            info!("removed system `{}`", type_name::<S>());
        }
        removed
    }

    /// Whether a system of type `S` is registered.
    #[inline]
    pub fn has_system<S: System>(&self) -> bool {
        self.systems.contains::<S>()
    }

    /// Borrow system `S`. Fails if it is not registered or is currently running.
    pub fn get_system<S: System>(&self) -> Result<&S> {
        self.systems
            .get::<S>()
            .ok_or(Error::MissingSystem(type_name::<S>()))
    }

    /// Mutably borrow system `S`. Fails if it is not registered or is currently running.
    pub fn get_system_mut<S: System>(&mut self) -> Result<&mut S> {
        self.systems
            .get_mut::<S>()
            .ok_or(Error::MissingSystem(type_name::<S>()))
    }

    /// The current members of system `S`, in iteration order.
    pub fn system_entities<S: System>(&self) -> Result<&[Entity]> {
        self.systems
            .members::<S>()
            .map(|members| members.entities())
            .ok_or(Error::MissingSystem(type_name::<S>()))
    }

    /// Number of registered systems.
    #[inline]
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    // ==== Frame ====

    /// Apply deferred entity creation, then deferred destruction.
    ///
    /// New entities become visible and join every system they match. Destroyed entities leave
    /// every system, then lose their signature and components, and only then is their ID free
    /// for reuse.
    pub fn flush(&mut self) {
        let added = std::mem::take(&mut self.pending_add);
        for entity in &added {
            if !self.entities.activate(entity.id()) {
                trace!("entity {} was destroyed before it was flushed", entity.id());
                continue;
            }
            self.refresh_membership(*entity);
        }

        let removed = std::mem::take(&mut self.pending_remove);
        for entity in &removed {
            for members in self.systems.members_mut() {
                members.remove(*entity);
            }
            if let Some(signature) = self.entities.signature(entity.id()) {
                for id in signature.iter() {
                    self.pools.release(id, entity.index());
                }
            }
            self.entities.release(entity.id());
            self.allocator.free(entity.id());
        }

        if !added.is_empty() || !removed.is_empty() {
            debug!(
                "flushed world {}: {} added, {} removed",
                self.id,
                added.len(),
                removed.len()
            );
        }
    }

    /// Run one frame: [`flush`](World::flush), then every system in registration order.
    ///
    /// Each system receives its members as they are when its turn starts. The first system error
    /// stops the frame and is returned.
    pub fn update(&mut self, delta: f32) -> Result<()> {
        self.flush();

        let mut entities = std::mem::take(&mut self.scratch);
        let result = self.run_systems(&mut entities, delta);
        entities.clear();
        self.scratch = entities;
        result
    }

    fn run_systems(&mut self, entities: &mut Vec<Entity>, delta: f32) -> Result<()> {
        for type_id in self.systems.order() {
            let Some((name, mut system)) = self.systems.checkout(type_id, entities) else {
                continue;
            };

            trace!("running system `{}` over {} entities", name, entities.len());
            let result = system.run(self, entities.as_slice(), delta);
            self.systems.checkin(type_id, system);

            if let Err(error) = result {
                warn!("system `{}` failed: {}", name, error);
                return Err(error);
            }
        }
        Ok(())
    }

    // ==== Internals ====

    /// Verify that `entity` was created by this world.
    fn check_owner(&self, entity: Entity) -> Result<()> {
        match entity.owner() {
            None => Err(Error::Detached(entity.id())),
            Some(owner) if owner != self.id => Err(Error::ForeignEntity {
                entity: entity.id(),
                owner,
                world: self.id,
            }),
            Some(_) => Ok(()),
        }
    }

    /// Verify that `entity` was created by this world and its ID is still in use.
    fn check(&self, entity: Entity) -> Result<()> {
        self.check_owner(entity)?;
        if self.entities.state(entity.id()).is_live() {
            Ok(())
        } else {
            Err(Error::DeadEntity(entity.id()))
        }
    }

    /// The component ID of `C`, if `entity` has one.
    fn component_id<C: Component>(&self, entity: Entity) -> Option<component::Id> {
        let id = self.components.get::<C>()?;
        self.entities
            .signature(entity.id())
            .filter(|signature| signature.contains(id))
            .map(|_| id)
    }

    /// Re-evaluate `entity` against every system. Pending entities are left for the flush.
    fn refresh_membership(&mut self, entity: Entity) {
        if !self.entities.state(entity.id()).is_visible() {
            return;
        }
        let Some(signature) = self.entities.signature(entity.id()) else {
            return;
        };
        for members in self.systems.members_mut() {
            if members.refresh(entity, signature, &self.pools) {
                trace!("entity {} membership changed", entity.id());
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("id", &self.id)
            .field("entities", &self.entities.live_count())
            .field("components", &self.components.len())
            .field("systems", &self.systems.len())
            .finish()
    }
}

fn missing_component<C: Component>(entity: Entity) -> Error {
    Error::MissingComponent {
        entity: entity.id(),
        component: type_name::<C>(),
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::ecs::{Component, config::MAX_COMPONENT_TYPES};

    #[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(Component, Debug, Clone, Copy, PartialEq)]
    struct Velocity {
        dx: f32,
        dy: f32,
    }

    #[derive(Component, Debug, Clone, Copy, PartialEq)]
    struct Depth(i64);

    #[derive(Component)]
    struct Tag;

    struct Movement;

    impl System for Movement {
        fn require(&self, requires: &mut Requirements<'_>) {
            requires.component::<Position>().component::<Velocity>();
        }

        fn update(&mut self, world: &mut World, entities: &[Entity], delta: f32) -> Result<()> {
            for entity in entities {
                let velocity = *world.get_component::<Velocity>(*entity)?;
                let position = world.get_component_mut::<Position>(*entity)?;
                position.x += velocity.dx * delta;
                position.y += velocity.dy * delta;
            }
            Ok(())
        }
    }

    /// Records the depth of every member, in iteration order.
    #[derive(Default)]
    struct Layers {
        seen: Vec<i64>,
    }

    impl System for Layers {
        fn require(&self, requires: &mut Requirements<'_>) {
            requires.order_by::<Depth>(|depth| depth.0);
        }

        fn update(&mut self, world: &mut World, entities: &[Entity], _: f32) -> Result<()> {
            self.seen.clear();
            for entity in entities {
                self.seen.push(world.get_component::<Depth>(*entity)?.0);
            }
            Ok(())
        }
    }

    /// Spawns one tagged entity per frame and records how many members it saw.
    struct Spawner {
        counts: Rc<RefCell<Vec<usize>>>,
    }

    impl System for Spawner {
        fn require(&self, requires: &mut Requirements<'_>) {
            requires.component::<Tag>();
        }

        fn update(&mut self, world: &mut World, entities: &[Entity], _: f32) -> Result<()> {
            self.counts.borrow_mut().push(entities.len());
            let entity = world.create_entity();
            world.add_component(entity, Tag)
        }
    }

    /// Counts frames; optionally fails.
    struct Probe {
        frames: u32,
        fail: bool,
    }

    impl System for Probe {
        fn require(&self, _: &mut Requirements<'_>) {}

        fn update(&mut self, world: &mut World, _: &[Entity], _: f32) -> Result<()> {
            self.frames += 1;
            if self.fail {
                // A running system cannot be borrowed from the world.
                world.get_system::<Probe>()?;
            }
            Ok(())
        }
    }

    struct Tail {
        frames: u32,
    }

    impl System for Tail {
        fn require(&self, _: &mut Requirements<'_>) {}

        fn update(&mut self, _: &mut World, _: &[Entity], _: f32) -> Result<()> {
            self.frames += 1;
            Ok(())
        }
    }

    struct SelfRemoving;

    impl System for SelfRemoving {
        fn require(&self, _: &mut Requirements<'_>) {}

        fn update(&mut self, world: &mut World, _: &[Entity], _: f32) -> Result<()> {
            world.remove_system::<SelfRemoving>();
            Ok(())
        }
    }

    fn spawn_moving(world: &mut World, velocity: Velocity) -> Entity {
        let entity = world.create_entity();
        world
            .add_component(entity, Position::default())
            .expect("add position");
        world.add_component(entity, velocity).expect("add velocity");
        entity
    }

    // ==== Entities ====

    #[test]
    fn world_ids_are_unique() {
        let a = World::new();
        let b = World::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn live_entity_ids_are_unique() {
        // Given
        let mut world = World::new();

        // When
        let entities: Vec<Entity> = (0..50).map(|_| world.create_entity()).collect();

        // Then
        let unique: BTreeSet<u32> = entities.iter().map(|e| e.id().value()).collect();
        assert_eq!(unique.len(), 50);
        assert_eq!(world.entity_count(), 50);
    }

    #[test]
    fn freed_ids_are_reused_after_flush() {
        // Given
        let mut world = World::new();
        let a = world.create_entity();
        let b = world.create_entity();
        let _c = world.create_entity();
        world.flush();

        // When - destroyed but not flushed
        world.destroy_entity(b).expect("destroy");
        let d = world.create_entity();

        // Then - the doomed ID is still reserved
        assert_ne!(d.id(), b.id());
        assert_eq!(world.state(b), Ok(State::Doomed));

        // When
        world.flush();
        let e = world.create_entity();

        // Then
        assert_eq!(e.id(), b.id());
        assert_ne!(e.id(), a.id());
        assert_eq!(world.state(e), Ok(State::Pending));
    }

    #[test]
    fn created_entity_is_pending_until_flush() {
        // Given
        let mut world = World::new();
        world.add_system(Movement);

        // When
        let entity = spawn_moving(&mut world, Velocity { dx: 1.0, dy: 0.0 });

        // Then
        assert_eq!(world.state(entity), Ok(State::Pending));
        assert!(!world.is_alive(entity));
        assert_eq!(world.system_entities::<Movement>(), Ok(&[][..]));

        // When
        world.flush();

        // Then
        assert!(world.is_alive(entity));
        assert_eq!(world.system_entities::<Movement>(), Ok(&[entity][..]));
    }

    #[test]
    fn destroy_leaves_systems_at_flush() {
        // Given
        let mut world = World::new();
        world.add_system(Movement);
        let entity = spawn_moving(&mut world, Velocity { dx: 1.0, dy: 0.0 });
        world.flush();

        // When
        world.destroy_entity(entity).expect("destroy");

        // Then - still a member, components still readable
        assert_eq!(world.system_entities::<Movement>(), Ok(&[entity][..]));
        assert!(world.get_component::<Position>(entity).is_ok());

        // When
        world.flush();

        // Then
        assert_eq!(world.system_entities::<Movement>(), Ok(&[][..]));
        assert_eq!(world.state(entity), Ok(State::Free));
        assert_eq!(
            world.get_component::<Position>(entity),
            Err(Error::DeadEntity(entity.id()))
        );
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn double_destroy_is_noop() {
        // Given
        let mut world = World::new();
        let entity = world.create_entity();
        world.flush();

        // When
        let first = world.destroy_entity(entity);
        let second = world.destroy_entity(entity);
        world.flush();

        // Then
        assert_eq!(first, Ok(()));
        assert_eq!(second, Ok(()));
        assert_eq!(
            world.destroy_entity(entity),
            Err(Error::DeadEntity(entity.id()))
        );
    }

    #[test]
    fn entity_destroyed_before_flush_never_joins() {
        // Given
        let mut world = World::new();
        world.add_system(Movement);
        let entity = spawn_moving(&mut world, Velocity { dx: 1.0, dy: 0.0 });

        // When
        world.destroy_entity(entity).expect("destroy");
        world.flush();

        // Then
        assert_eq!(world.system_entities::<Movement>(), Ok(&[][..]));
        assert_eq!(world.state(entity), Ok(State::Free));
        assert_eq!(world.create_entity().id(), entity.id());
    }

    // ==== Components ====

    #[test]
    fn add_get_remove_component() {
        // Given
        let mut world = World::new();
        let entity = world.create_entity();

        // When
        world
            .add_component(entity, Position { x: 1.0, y: 2.0 })
            .expect("add");

        // Then
        assert_eq!(world.has_component::<Position>(entity), Ok(true));
        assert_eq!(
            world.get_component::<Position>(entity),
            Ok(&Position { x: 1.0, y: 2.0 })
        );
        assert_eq!(world.has_component::<Velocity>(entity), Ok(false));

        // When - replace
        world
            .add_component(entity, Position { x: 3.0, y: 4.0 })
            .expect("replace");

        // Then
        assert_eq!(entity.get_component::<Position>(&world).map(|p| p.x), Ok(3.0));

        // When
        world.remove_component::<Position>(entity).expect("remove");
        world.remove_component::<Position>(entity).expect("remove again");
        world.remove_component::<Velocity>(entity).expect("remove unknown");

        // Then
        assert_eq!(world.has_component::<Position>(entity), Ok(false));
        assert_eq!(
            world.get_component::<Position>(entity),
            Err(Error::MissingComponent {
                entity: entity.id(),
                component: type_name::<Position>(),
            })
        );
    }

    #[test]
    fn entity_forwarders_reach_world() {
        // Given
        let mut world = World::new();
        let entity = world.create_entity();

        // When
        entity.add_component(&mut world, Depth(4)).expect("add");
        entity
            .get_component_mut::<Depth>(&mut world)
            .expect("get")
            .0 += 1;

        // Then
        assert_eq!(entity.get_component::<Depth>(&world), Ok(&Depth(5)));
        assert_eq!(entity.has_component::<Depth>(&world), Ok(true));
        entity.remove_component::<Depth>(&mut world).expect("remove");
        assert_eq!(entity.has_component::<Depth>(&world), Ok(false));
    }

    #[test]
    fn reused_id_does_not_inherit_components() {
        // Given
        let mut world = World::new();
        let entity = world.create_entity();
        world.add_component(entity, Depth(9)).expect("add");
        world.flush();
        world.destroy_entity(entity).expect("destroy");
        world.flush();

        // When
        let reused = world.create_entity();

        // Then
        assert_eq!(reused.id(), entity.id());
        assert_eq!(world.has_component::<Depth>(reused), Ok(false));
        assert!(world.signature(reused).expect("signature").is_empty());
    }

    #[test]
    fn invalid_handles_are_rejected() {
        // Given
        let mut world = World::new();
        let mut other = World::new();
        let foreign = other.create_entity();
        let detached = Entity::detached(0);

        // Then
        assert_eq!(
            world.add_component(detached, Tag),
            Err(Error::Detached(entity::Id::new(0)))
        );
        assert_eq!(
            world.has_component::<Tag>(foreign),
            Err(Error::ForeignEntity {
                entity: foreign.id(),
                owner: other.id(),
                world: world.id(),
            })
        );
        assert_eq!(
            foreign.get_component::<Tag>(&world).err(),
            Some(Error::ForeignEntity {
                entity: foreign.id(),
                owner: other.id(),
                world: world.id(),
            })
        );
    }

    #[test]
    #[should_panic(expected = "component type capacity exceeded")]
    fn component_type_beyond_capacity_panics() {
        // Given
        let mut world = World::with_config(Config::new().with_max_component_types(2));
        let entity = world.create_entity();
        world.add_component(entity, Tag).expect("first type");
        world.add_component(entity, Depth(0)).expect("second type");

        // When
        let _ = world.add_component(entity, Position::default());
    }

    #[test]
    #[should_panic(expected = "exceeds MAX_COMPONENT_TYPES")]
    fn config_literal_beyond_hard_cap_panics() {
        World::with_config(Config {
            max_component_types: MAX_COMPONENT_TYPES + 1,
            ..Config::new()
        });
    }

    #[test]
    fn default_config_allows_max_component_types() {
        let world = World::default();
        assert_eq!(world.config().max_component_types, MAX_COMPONENT_TYPES);
    }

    // ==== Membership ====

    #[test]
    fn membership_follows_signature_immediately() {
        // Given
        let mut world = World::new();
        world.add_system(Movement);
        let entity = world.create_entity();
        world.flush();

        // When
        world.add_component(entity, Position::default()).expect("add");

        // Then
        assert_eq!(world.system_entities::<Movement>(), Ok(&[][..]));

        // When
        world
            .add_component(entity, Velocity { dx: 0.0, dy: 1.0 })
            .expect("add");

        // Then
        assert_eq!(world.system_entities::<Movement>(), Ok(&[entity][..]));

        // When - unrelated component
        world.add_component(entity, Tag).expect("add");

        // Then
        assert_eq!(world.system_entities::<Movement>(), Ok(&[entity][..]));

        // When
        world.remove_component::<Velocity>(entity).expect("remove");

        // Then
        assert_eq!(world.system_entities::<Movement>(), Ok(&[][..]));
    }

    #[test]
    fn new_system_adopts_visible_entities() {
        // Given
        let mut world = World::new();
        let pending = spawn_moving(&mut world, Velocity { dx: 1.0, dy: 0.0 });
        world.flush();
        let later = spawn_moving(&mut world, Velocity { dx: 1.0, dy: 0.0 });

        // When
        assert!(world.add_system(Movement));

        // Then - only flushed entities join now
        assert_eq!(world.system_entities::<Movement>(), Ok(&[pending][..]));

        // When
        world.flush();

        // Then
        assert_eq!(
            world.system_entities::<Movement>(),
            Ok(&[pending, later][..])
        );
    }

    #[test]
    fn new_system_adopts_entities_awaiting_removal() {
        // Given
        let mut world = World::new();
        let doomed = spawn_moving(&mut world, Velocity { dx: 1.0, dy: 0.0 });
        world.flush();
        world.destroy_entity(doomed).expect("destroy");

        // When
        world.add_system(Movement);

        // Then - still visible until the flush
        assert_eq!(world.system_entities::<Movement>(), Ok(&[doomed][..]));

        // When - an unrelated component changes nothing
        world.add_component(doomed, Tag).expect("add");

        // Then
        assert_eq!(world.system_entities::<Movement>(), Ok(&[doomed][..]));

        // When
        world.flush();

        // Then
        assert_eq!(world.system_entities::<Movement>(), Ok(&[][..]));
    }

    #[test]
    fn add_system_is_idempotent() {
        // Given
        let mut world = World::new();

        // When
        let first = world.add_system(Tail { frames: 7 });
        let second = world.add_system(Tail { frames: 0 });

        // Then
        assert!(first);
        assert!(!second);
        assert_eq!(world.system_count(), 1);
        assert_eq!(world.get_system::<Tail>().map(|tail| tail.frames), Ok(7));
    }

    #[test]
    fn remove_and_query_systems() {
        // Given
        let mut world = World::new();
        world.add_system(Tail { frames: 0 });

        // When
        world.get_system_mut::<Tail>().expect("tail").frames = 3;

        // Then
        assert!(world.has_system::<Tail>());
        assert_eq!(world.get_system::<Tail>().map(|tail| tail.frames), Ok(3));
        assert!(world.remove_system::<Tail>());
        assert!(!world.remove_system::<Tail>());
        assert!(!world.has_system::<Tail>());
        assert_eq!(
            world.get_system::<Tail>().err(),
            Some(Error::MissingSystem(type_name::<Tail>()))
        );
        assert!(world.system_entities::<Tail>().is_err());
    }

    // ==== Frames ====

    #[test]
    fn movement_over_two_frames() {
        // Given
        let mut world = World::new();
        world.add_system(Movement);
        let entity = spawn_moving(&mut world, Velocity { dx: 5.0, dy: 0.0 });

        // When
        world.update(1.0).expect("frame 1");
        world.update(1.0).expect("frame 2");

        // Then
        assert_eq!(
            world.get_component::<Position>(entity),
            Ok(&Position { x: 10.0, y: 0.0 })
        );
    }

    #[test]
    fn ordered_system_iterates_by_key() {
        // Given
        let mut world = World::new();
        world.add_system(Layers::default());
        for depth in [5, 1, 3] {
            let entity = world.create_entity();
            world.add_component(entity, Depth(depth)).expect("add");
        }

        // When
        world.update(0.0).expect("frame");

        // Then
        assert_eq!(world.get_system::<Layers>().map(|l| l.seen.clone()), Ok(vec![1, 3, 5]));
    }

    #[test]
    fn entities_created_during_update_wait_for_next_frame() {
        // Given
        let counts = Rc::new(RefCell::new(Vec::new()));
        let mut world = World::new();
        world.add_system(Spawner {
            counts: counts.clone(),
        });
        let seed = world.create_entity();
        world.add_component(seed, Tag).expect("add");

        // When
        world.update(0.0).expect("frame 1");

        // Then - the spawned entity exists but is not a member yet
        assert_eq!(*counts.borrow(), vec![1]);
        assert_eq!(world.entity_count(), 2);
        assert_eq!(world.system_entities::<Spawner>().map(<[_]>::len), Ok(1));

        // When
        world.update(0.0).expect("frame 2");

        // Then
        assert_eq!(*counts.borrow(), vec![1, 2]);
    }

    #[test]
    fn system_error_aborts_frame() {
        // Given
        let mut world = World::new();
        world.add_system(Probe {
            frames: 0,
            fail: true,
        });
        world.add_system(Tail { frames: 0 });

        // When
        let result = world.update(0.0);

        // Then
        assert_eq!(result, Err(Error::MissingSystem(type_name::<Probe>())));
        assert_eq!(world.get_system::<Probe>().map(|p| p.frames), Ok(1));
        assert_eq!(world.get_system::<Tail>().map(|t| t.frames), Ok(0));
    }

    #[test]
    fn systems_run_in_registration_order() {
        // Given
        let mut world = World::new();
        world.add_system(Probe {
            frames: 0,
            fail: false,
        });
        world.add_system(Tail { frames: 0 });

        // When
        world.update(0.0).expect("frame 1");
        world.update(0.0).expect("frame 2");

        // Then
        assert_eq!(world.get_system::<Probe>().map(|p| p.frames), Ok(2));
        assert_eq!(world.get_system::<Tail>().map(|t| t.frames), Ok(2));
    }

    #[test]
    fn system_can_remove_itself() {
        // Given
        let mut world = World::new();
        world.add_system(SelfRemoving);
        world.add_system(Tail { frames: 0 });

        // When
        world.update(0.0).expect("frame");

        // Then
        assert!(!world.has_system::<SelfRemoving>());
        assert_eq!(world.get_system::<Tail>().map(|t| t.frames), Ok(1));
    }
}
