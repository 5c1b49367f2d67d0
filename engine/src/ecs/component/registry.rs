use std::{
    any::{TypeId, type_name},
    collections::HashMap,
};

use log::trace;

use crate::ecs::component::{Component, Id};

/// The component type registry. Hands out component [`Id`]s in first-seen order.
///
/// Each world owns its own registry, so IDs depend only on the order in which that world first
/// saw each type. The registry is bounded: its capacity is the signature width, and registering
/// one type more than that panics instead of silently wrapping into another type's bit.
#[derive(Debug)]
pub struct Registry {
    /// Map from TypeId to component Id.
    type_map: HashMap<TypeId, Id>,

    /// Type names of registered components, indexed by component Id.
    names: Vec<&'static str>,

    /// Maximum number of component types.
    capacity: usize,
}

impl Registry {
    /// Create a new component registry that accepts at most `capacity` types.
    #[inline]
    pub fn new(capacity: usize) -> Self {
        Self {
            type_map: HashMap::new(),
            names: Vec::new(),
            capacity,
        }
    }

    /// Register a component type and get its identifier.
    ///
    /// If the component type is already registered, returns the existing ID.
    ///
    /// # Panics
    /// If `C` is a new type and the registry already holds `capacity` types.
    pub fn register<C: Component>(&mut self) -> Id {
        let type_id = TypeId::of::<C>();

        if let Some(id) = self.type_map.get(&type_id) {
            return *id;
        }

        assert!(
            self.names.len() < self.capacity,
            "component type capacity exceeded: cannot register `{}`, limit is {} types",
            type_name::<C>(),
            self.capacity
        );

        let id = Id::from(self.names.len());
        self.names.push(type_name::<C>());
        self.type_map.insert(type_id, id);
        trace!("registered component `{}` as {:?}", type_name::<C>(), id);
        id
    }

    /// Get the component ID for a provided type `C`, if registered.
    #[inline]
    pub fn get<C: Component>(&self) -> Option<Id> {
        self.type_map.get(&TypeId::of::<C>()).copied()
    }

    /// Get the type name registered for `id`.
    #[inline]
    pub fn name(&self, id: Id) -> Option<&'static str> {
        self.names.get(id.index()).copied()
    }

    /// Number of registered component types.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no component type has been registered yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Maximum number of component types this registry accepts.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
