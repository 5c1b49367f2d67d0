//! The ordered table of systems registered in a world.

use std::any::{TypeId, type_name};

use crate::ecs::{
    entity::Entity,
    system::{ErasedSystem, Members, System},
};

/// One registered system: its member list and its behaviour.
struct Slot {
    type_id: TypeId,
    name: &'static str,
    members: Members,
    /// `None` while the system is running.
    system: Option<Box<dyn ErasedSystem>>,
}

/// The systems of a world, keyed by type, in registration order.
///
/// Member lists stay in the table while their system runs, so component changes made during an
/// update still reach every system's membership, including the running one.
#[derive(Default)]
pub struct Registry {
    slots: Vec<Slot>,
}

impl Registry {
    /// Create a new, empty system registry.
    #[inline]
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Number of registered systems.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no system is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether a system of type `S` is registered.
    #[inline]
    pub fn contains<S: System>(&self) -> bool {
        self.position(TypeId::of::<S>()).is_some()
    }

    /// Type names of registered systems, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots.iter().map(|slot| slot.name)
    }

    /// The member list of system `S`.
    pub fn members<S: System>(&self) -> Option<&Members> {
        let index = self.position(TypeId::of::<S>())?;
        Some(&self.slots[index].members)
    }

    /// Append system `S` with its member list. The caller checks for duplicates.
    pub(crate) fn insert<S: System>(&mut self, system: S, members: Members) {
        self.slots.push(Slot {
            type_id: TypeId::of::<S>(),
            name: type_name::<S>(),
            members,
            system: Some(Box::new(system)),
        });
    }

    /// Remove system `S` and its member list. A running system is dropped when its turn ends.
    pub(crate) fn remove<S: System>(&mut self) -> bool {
        match self.position(TypeId::of::<S>()) {
            Some(index) => {
                self.slots.remove(index);
                true
            }
            None => false,
        }
    }

    /// Borrow system `S`, unless it is absent or running.
    pub(crate) fn get<S: System>(&self) -> Option<&S> {
        let index = self.position(TypeId::of::<S>())?;
        self.slots[index].system.as_ref()?.as_any().downcast_ref::<S>()
    }

    /// Mutably borrow system `S`, unless it is absent or running.
    pub(crate) fn get_mut<S: System>(&mut self) -> Option<&mut S> {
        let index = self.position(TypeId::of::<S>())?;
        self.slots[index]
            .system
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<S>()
    }

    /// Type ids of the registered systems, in registration order.
    pub(crate) fn order(&self) -> Vec<TypeId> {
        self.slots.iter().map(|slot| slot.type_id).collect()
    }

    /// Take the system with `type_id` out of its slot to run it, copying its members into
    /// `entities`. Returns `None` if it is absent or already running.
    pub(crate) fn checkout(
        &mut self,
        type_id: TypeId,
        entities: &mut Vec<Entity>,
    ) -> Option<(&'static str, Box<dyn ErasedSystem>)> {
        let index = self.position(type_id)?;
        let slot = &mut self.slots[index];
        let system = slot.system.take()?;
        entities.clear();
        entities.extend_from_slice(slot.members.entities());
        Some((slot.name, system))
    }

    /// Put a system back after running it. If its slot was removed (or refilled) meanwhile, the
    /// system is dropped.
    pub(crate) fn checkin(&mut self, type_id: TypeId, system: Box<dyn ErasedSystem>) {
        if let Some(index) = self.position(type_id) {
            let slot = &mut self.slots[index];
            if slot.system.is_none() {
                slot.system = Some(system);
            }
        }
    }

    /// Every member list, for membership updates.
    pub(crate) fn members_mut(&mut self) -> impl Iterator<Item = &mut Members> + '_ {
        self.slots.iter_mut().map(|slot| &mut slot.members)
    }

    fn position(&self, type_id: TypeId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.type_id == type_id)
    }
}
